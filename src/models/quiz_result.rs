// src/models/quiz_result.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'quiz_results' table: one row per graded submission.
/// Rows are only ever inserted.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct QuizResult {
    pub id: i64,
    pub user_id: i64,
    pub quiz_id: i64,
    /// Percentage of correctly answered questions, in [0, 100].
    pub score: f64,
    pub passed_at: chrono::DateTime<chrono::Utc>,
}

/// A graded attempt waiting to be appended to the ledger.
#[derive(Debug, Clone)]
pub struct NewQuizResult {
    pub user_id: i64,
    pub quiz_id: i64,
    pub score: f64,
    pub passed_at: chrono::DateTime<chrono::Utc>,
}

/// Aggregate over one quiz's ledger rows, computed by the store.
#[derive(Debug, Clone, Copy, PartialEq, Default, FromRow)]
pub struct LedgerStats {
    /// Unrounded mean score; `None` when the quiz has no attempts.
    pub average_score: Option<f64>,
    pub attempts: i64,
}

/// DTO for submitting a quiz attempt.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitQuizRequest {
    /// Chosen answer ids, one per question, in question order.
    #[validate(length(min = 1, message = "At least one answer is required"))]
    pub answers: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct SubmitQuizResponse {
    pub score: f64,
}

/// Per-quiz analytics summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizAnalytics {
    pub average_score: f64,
    pub attempts_count: i64,
    pub user_last_attempt: Option<QuizResult>,
}
