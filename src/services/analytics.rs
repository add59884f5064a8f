// src/services/analytics.rs

use crate::{
    error::AppError,
    models::{
        principal::Principal,
        quiz_result::{LedgerStats, QuizAnalytics, QuizResult},
    },
    store::ResultLedger,
};

/// Loads the analytics summary for one quiz from the ledger.
///
/// The caller's latest attempt is only looked up for authenticated principals.
pub async fn quiz_summary(
    ledger: &dyn ResultLedger,
    quiz_id: i64,
    principal: &Principal,
) -> Result<QuizAnalytics, AppError> {
    let stats = ledger.quiz_stats(quiz_id).await?;
    let last_attempt = match principal.user_id() {
        Some(user_id) => ledger.latest_result_for_user(quiz_id, user_id).await?,
        None => None,
    };

    Ok(summarize(stats, last_attempt))
}

/// Shapes ledger aggregates into the response.
///
/// * `average_score` is rounded to 2 decimals, 0 with no attempts.
/// * `attempts_count` spans all users.
pub fn summarize(stats: LedgerStats, last_attempt: Option<QuizResult>) -> QuizAnalytics {
    QuizAnalytics {
        average_score: stats.average_score.map(round2).unwrap_or(0.0),
        attempts_count: stats.attempts,
        user_last_attempt: last_attempt,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
