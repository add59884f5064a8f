// src/store/mod.rs

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        lesson::{Lesson, NewLesson},
        quiz::{QuizDraft, QuizSnapshot},
        quiz_result::{LedgerStats, NewQuizResult, QuizResult},
    },
};

/// Lessons and their quizzes.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn create_category(&self, title: &str) -> Result<i64, AppError>;

    async fn create_lesson(&self, lesson: NewLesson) -> Result<Lesson, AppError>;

    async fn find_lesson(&self, id: i64) -> Result<Option<Lesson>, AppError>;

    /// All lessons ordered by id, optionally narrowed to one category.
    async fn list_lessons(&self, category_id: Option<i64>) -> Result<Vec<Lesson>, AppError>;

    /// Loads the lesson's quiz with every question and answer in one consistent read.
    async fn find_quiz_by_lesson(&self, lesson_id: i64) -> Result<Option<QuizSnapshot>, AppError>;

    /// Atomically creates a quiz with its questions and answers.
    /// Fails with `Conflict` when the lesson already owns a quiz.
    async fn create_quiz(&self, lesson_id: i64, draft: QuizDraft)
    -> Result<QuizSnapshot, AppError>;
}

/// Append-only ledger of graded attempts.
#[async_trait]
pub trait ResultLedger: Send + Sync {
    async fn append_result(&self, result: NewQuizResult) -> Result<QuizResult, AppError>;

    /// Mean score and attempt count across all users of a quiz.
    async fn quiz_stats(&self, quiz_id: i64) -> Result<LedgerStats, AppError>;

    /// The user's most recent attempt at a quiz (latest `passed_at`, then highest id).
    async fn latest_result_for_user(
        &self,
        quiz_id: i64,
        user_id: i64,
    ) -> Result<Option<QuizResult>, AppError>;
}
