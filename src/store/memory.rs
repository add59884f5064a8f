// src/store/memory.rs

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    error::AppError,
    models::{
        lesson::{Lesson, NewLesson},
        quiz::{Answer, Question, QuizDraft, QuizSnapshot},
        quiz_result::{LedgerStats, NewQuizResult, QuizResult},
    },
    store::{CatalogStore, ResultLedger},
};

/// In-process store. Used when no database is configured and in tests.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    categories: Vec<(i64, String)>,
    lessons: Vec<Lesson>,
    quizzes: Vec<QuizSnapshot>,
    results: Vec<QuizResult>,
    next_id: i64,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn create_category(&self, title: &str) -> Result<i64, AppError> {
        let mut state = self.state.write().await;
        let id = state.next_id();
        state.categories.push((id, title.to_string()));
        Ok(id)
    }

    async fn create_lesson(&self, lesson: NewLesson) -> Result<Lesson, AppError> {
        lesson.validate()?;

        let mut state = self.state.write().await;
        if !state.categories.iter().any(|(id, _)| *id == lesson.category_id) {
            return Err(AppError::NotFound("Category not found".to_string()));
        }

        let created = Lesson {
            id: state.next_id(),
            title: lesson.title,
            description: lesson.description,
            owner_id: lesson.owner_id,
            category_id: lesson.category_id,
            access_tier: lesson.access_tier,
            token: lesson.token,
            created_at: chrono::Utc::now(),
        };
        state.lessons.push(created.clone());
        Ok(created)
    }

    async fn find_lesson(&self, id: i64) -> Result<Option<Lesson>, AppError> {
        let state = self.state.read().await;
        Ok(state.lessons.iter().find(|l| l.id == id).cloned())
    }

    async fn list_lessons(&self, category_id: Option<i64>) -> Result<Vec<Lesson>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .lessons
            .iter()
            .filter(|l| category_id.is_none_or(|c| l.category_id == c))
            .cloned()
            .collect())
    }

    async fn find_quiz_by_lesson(&self, lesson_id: i64) -> Result<Option<QuizSnapshot>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .quizzes
            .iter()
            .find(|q| q.lesson_id == lesson_id)
            .cloned())
    }

    async fn create_quiz(
        &self,
        lesson_id: i64,
        draft: QuizDraft,
    ) -> Result<QuizSnapshot, AppError> {
        // Existence check and insert happen under one write lock.
        let mut state = self.state.write().await;

        if !state.lessons.iter().any(|l| l.id == lesson_id) {
            return Err(AppError::NotFound("Lesson not found".to_string()));
        }
        if state.quizzes.iter().any(|q| q.lesson_id == lesson_id) {
            return Err(AppError::Conflict(
                "Quiz already exists for this lesson".to_string(),
            ));
        }

        let quiz_id = state.next_id();
        let mut questions = Vec::with_capacity(draft.questions.len());
        for q in draft.questions {
            let question_id = state.next_id();
            let answers = q
                .answers
                .into_iter()
                .map(|a| Answer {
                    id: state.next_id(),
                    text: a.text,
                    is_correct: a.is_correct,
                })
                .collect();
            questions.push(Question {
                id: question_id,
                text: q.text,
                answers,
            });
        }

        let quiz = QuizSnapshot {
            id: quiz_id,
            lesson_id,
            title: draft.title,
            questions,
        };
        state.quizzes.push(quiz.clone());
        Ok(quiz)
    }
}

#[async_trait]
impl ResultLedger for MemoryStore {
    async fn append_result(&self, result: NewQuizResult) -> Result<QuizResult, AppError> {
        let mut state = self.state.write().await;
        let stored = QuizResult {
            id: state.next_id(),
            user_id: result.user_id,
            quiz_id: result.quiz_id,
            score: result.score,
            passed_at: result.passed_at,
        };
        state.results.push(stored.clone());
        Ok(stored)
    }

    async fn quiz_stats(&self, quiz_id: i64) -> Result<LedgerStats, AppError> {
        let state = self.state.read().await;
        let (total, attempts) = state
            .results
            .iter()
            .filter(|r| r.quiz_id == quiz_id)
            .fold((0.0, 0i64), |(total, n), r| (total + r.score, n + 1));

        Ok(LedgerStats {
            average_score: (attempts > 0).then(|| total / attempts as f64),
            attempts,
        })
    }

    async fn latest_result_for_user(
        &self,
        quiz_id: i64,
        user_id: i64,
    ) -> Result<Option<QuizResult>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .results
            .iter()
            .filter(|r| r.quiz_id == quiz_id && r.user_id == user_id)
            .max_by_key(|r| (r.passed_at, r.id))
            .cloned())
    }
}
