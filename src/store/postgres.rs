// src/store/postgres.rs

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    error::AppError,
    models::{
        lesson::{Lesson, LessonRow, NewLesson},
        quiz::{Answer, Question, QuizDraft, QuizKeyRow, QuizSnapshot},
        quiz_result::{LedgerStats, NewQuizResult, QuizResult},
    },
    store::{CatalogStore, ResultLedger},
};

const CONNECT_RETRIES: u32 = 5;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects with retry (the database may still be starting) and applies migrations.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let mut retry_count = 0;
        let pool = loop {
            match PgPoolOptions::new()
                .max_connections(5)
                .acquire_timeout(Duration::from_secs(3))
                .connect(database_url)
                .await
            {
                Ok(pool) => break pool,
                Err(e) => {
                    retry_count += 1;
                    if retry_count > CONNECT_RETRIES {
                        return Err(AppError::InternalServerError(format!(
                            "Failed to connect to database after {} retries: {}",
                            CONNECT_RETRIES, e
                        )));
                    }
                    tracing::warn!(
                        "Database not ready, retrying in 2s... (Attempt {})",
                        retry_count
                    );
                    tokio::time::sleep(Duration::from_secs(2)).await;
                }
            }
        };
        tracing::info!("Database connected...");

        tracing::info!("Running migrations...");
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Migrations applied successfully.");

        Ok(Self::new(pool))
    }
}

const LESSON_COLUMNS: &str =
    "id, title, description, owner_id, category_id, access_type, token, created_at";

#[async_trait]
impl CatalogStore for PgStore {
    async fn create_category(&self, title: &str) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar("INSERT INTO categories (title) VALUES ($1) RETURNING id")
            .bind(title)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    async fn create_lesson(&self, lesson: NewLesson) -> Result<Lesson, AppError> {
        lesson.validate()?;

        let row = sqlx::query_as::<_, LessonRow>(&format!(
            r#"
            INSERT INTO lessons (title, description, owner_id, category_id, access_type, token)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            LESSON_COLUMNS
        ))
        .bind(&lesson.title)
        .bind(&lesson.description)
        .bind(lesson.owner_id)
        .bind(lesson.category_id)
        .bind(lesson.access_tier.as_str())
        .bind(&lesson.token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|d| d.is_foreign_key_violation())
            {
                AppError::NotFound("Category not found".to_string())
            } else {
                tracing::error!("Failed to create lesson: {:?}", e);
                AppError::from(e)
            }
        })?;

        Lesson::try_from(row)
    }

    async fn find_lesson(&self, id: i64) -> Result<Option<Lesson>, AppError> {
        sqlx::query_as::<_, LessonRow>(&format!(
            "SELECT {} FROM lessons WHERE id = $1",
            LESSON_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Lesson::try_from)
        .transpose()
    }

    async fn list_lessons(&self, category_id: Option<i64>) -> Result<Vec<Lesson>, AppError> {
        let rows = sqlx::query_as::<_, LessonRow>(&format!(
            r#"
            SELECT {}
            FROM lessons
            WHERE ($1::BIGINT IS NULL OR category_id = $1)
            ORDER BY id
            "#,
            LESSON_COLUMNS
        ))
        .bind(category_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list lessons: {:?}", e);
            AppError::from(e)
        })?;

        rows.into_iter().map(Lesson::try_from).collect()
    }

    async fn find_quiz_by_lesson(&self, lesson_id: i64) -> Result<Option<QuizSnapshot>, AppError> {
        // One statement, so the key cannot change halfway through the read.
        let rows = sqlx::query_as::<_, QuizKeyRow>(
            r#"
            SELECT
                z.id AS quiz_id,
                z.lesson_id,
                z.title,
                q.id AS question_id,
                q.text AS question_text,
                a.id AS answer_id,
                a.text AS answer_text,
                a.is_correct
            FROM quizzes z
            LEFT JOIN questions q ON q.quiz_id = z.id
            LEFT JOIN answers a ON a.question_id = q.id
            WHERE z.lesson_id = $1
            ORDER BY q.id, a.id
            "#,
        )
        .bind(lesson_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load quiz for lesson {}: {:?}", lesson_id, e);
            AppError::from(e)
        })?;

        Ok(QuizSnapshot::from_rows(rows))
    }

    async fn create_quiz(
        &self,
        lesson_id: i64,
        draft: QuizDraft,
    ) -> Result<QuizSnapshot, AppError> {
        let mut tx = self.pool.begin().await?;

        let lesson_exists: Option<i64> = sqlx::query_scalar("SELECT id FROM lessons WHERE id = $1")
            .bind(lesson_id)
            .fetch_optional(&mut *tx)
            .await?;
        if lesson_exists.is_none() {
            return Err(AppError::NotFound("Lesson not found".to_string()));
        }

        // UNIQUE(lesson_id) settles concurrent creations.
        let quiz_id: i64 =
            sqlx::query_scalar("INSERT INTO quizzes (lesson_id, title) VALUES ($1, $2) RETURNING id")
                .bind(lesson_id)
                .bind(&draft.title)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| {
                    if e.as_database_error().is_some_and(|d| d.is_unique_violation()) {
                        AppError::Conflict("Quiz already exists for this lesson".to_string())
                    } else {
                        tracing::error!("Failed to create quiz: {:?}", e);
                        AppError::from(e)
                    }
                })?;

        let mut questions = Vec::with_capacity(draft.questions.len());
        for q in draft.questions {
            let question_id: i64 = sqlx::query_scalar(
                "INSERT INTO questions (quiz_id, text) VALUES ($1, $2) RETURNING id",
            )
            .bind(quiz_id)
            .bind(&q.text)
            .fetch_one(&mut *tx)
            .await?;

            let mut answers = Vec::with_capacity(q.answers.len());
            for a in q.answers {
                let answer_id: i64 = sqlx::query_scalar(
                    "INSERT INTO answers (question_id, text, is_correct) VALUES ($1, $2, $3) RETURNING id",
                )
                .bind(question_id)
                .bind(&a.text)
                .bind(a.is_correct)
                .fetch_one(&mut *tx)
                .await?;

                answers.push(Answer {
                    id: answer_id,
                    text: a.text,
                    is_correct: a.is_correct,
                });
            }

            questions.push(Question {
                id: question_id,
                text: q.text,
                answers,
            });
        }

        tx.commit().await?;

        Ok(QuizSnapshot {
            id: quiz_id,
            lesson_id,
            title: draft.title,
            questions,
        })
    }
}

#[async_trait]
impl ResultLedger for PgStore {
    async fn append_result(&self, result: NewQuizResult) -> Result<QuizResult, AppError> {
        sqlx::query_as::<_, QuizResult>(
            r#"
            INSERT INTO quiz_results (user_id, quiz_id, score, passed_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, quiz_id, score, passed_at
            "#,
        )
        .bind(result.user_id)
        .bind(result.quiz_id)
        .bind(result.score)
        .bind(result.passed_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to append quiz result: {:?}", e);
            AppError::from(e)
        })
    }

    async fn quiz_stats(&self, quiz_id: i64) -> Result<LedgerStats, AppError> {
        sqlx::query_as::<_, LedgerStats>(
            r#"
            SELECT AVG(score) AS average_score, COUNT(*) AS attempts
            FROM quiz_results
            WHERE quiz_id = $1
            "#,
        )
        .bind(quiz_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to aggregate quiz results: {:?}", e);
            AppError::from(e)
        })
    }

    async fn latest_result_for_user(
        &self,
        quiz_id: i64,
        user_id: i64,
    ) -> Result<Option<QuizResult>, AppError> {
        let result = sqlx::query_as::<_, QuizResult>(
            r#"
            SELECT id, user_id, quiz_id, score, passed_at
            FROM quiz_results
            WHERE quiz_id = $1 AND user_id = $2
            ORDER BY passed_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(quiz_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch latest quiz result: {:?}", e);
            AppError::from(e)
        })?;

        Ok(result)
    }
}
