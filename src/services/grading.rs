// src/services/grading.rs

use crate::{
    error::AppError,
    models::{
        quiz::{Question, QuizSnapshot},
        quiz_result::{NewQuizResult, QuizResult},
    },
    store::ResultLedger,
};

/// Scores an ordered answer submission against a quiz snapshot.
///
/// Matching is POSITIONAL: the i-th submitted answer id is checked against the
/// i-th question in stored order. Reordering stored questions changes how every
/// later submission is graded.
///
/// An answer id that does not belong to its question counts as incorrect.
/// Returns the percentage of correct answers, unrounded.
pub fn score_submission(quiz: &QuizSnapshot, answer_ids: &[i64]) -> Result<f64, AppError> {
    let total = quiz.question_count();
    if total == 0 {
        return Err(AppError::BadRequest(
            "Quiz has no questions and cannot be graded".to_string(),
        ));
    }

    if answer_ids.len() != total {
        return Err(AppError::BadRequest(format!(
            "Answer count mismatch: expected {}, got {}",
            total,
            answer_ids.len()
        )));
    }

    let correct = quiz
        .questions
        .iter()
        .zip(answer_ids)
        .filter(|(question, answer_id)| is_correct_choice(question, **answer_id))
        .count();

    Ok(correct as f64 / total as f64 * 100.0)
}

fn is_correct_choice(question: &Question, answer_id: i64) -> bool {
    question
        .answers
        .iter()
        .find(|a| a.id == answer_id)
        .is_some_and(|a| a.is_correct)
}

/// Grades a submission and appends exactly one result to the ledger.
///
/// Nothing is recorded when validation fails.
pub async fn grade(
    ledger: &dyn ResultLedger,
    quiz: &QuizSnapshot,
    answer_ids: &[i64],
    user_id: i64,
) -> Result<QuizResult, AppError> {
    let score = score_submission(quiz, answer_ids)?;

    let result = ledger
        .append_result(NewQuizResult {
            user_id,
            quiz_id: quiz.id,
            score,
            passed_at: chrono::Utc::now(),
        })
        .await?;

    tracing::info!(
        "User {} scored {:.2} on quiz {} (result {})",
        user_id,
        score,
        quiz.id,
        result.id
    );

    Ok(result)
}
