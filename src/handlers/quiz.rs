// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    handlers::{lesson::load_accessible_lesson, parse_payload},
    models::{
        lesson::AccessParams,
        principal::Principal,
        quiz::{CreateQuizRequest, QuizDraft, QuizSnapshot},
        quiz_result::{SubmitQuizRequest, SubmitQuizResponse},
    },
    services::{analytics::quiz_summary, grading::grade},
    store::{CatalogStore, ResultLedger},
};

async fn load_quiz(catalog: &dyn CatalogStore, lesson_id: i64) -> Result<QuizSnapshot, AppError> {
    catalog
        .find_quiz_by_lesson(lesson_id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))
}

/// Returns the lesson's quiz without correctness flags.
/// Gated by the same access policy as the lesson itself.
pub async fn get_quiz(
    State(catalog): State<Arc<dyn CatalogStore>>,
    Extension(principal): Extension<Principal>,
    Path(lesson_id): Path<i64>,
    Query(params): Query<AccessParams>,
) -> Result<impl IntoResponse, AppError> {
    load_accessible_lesson(catalog.as_ref(), lesson_id, &principal, params.token.as_deref())
        .await?;
    let quiz = load_quiz(catalog.as_ref(), lesson_id).await?;

    Ok(Json(quiz.to_public()))
}

/// Grades a submission and records the attempt.
///
/// * Body: `{"answers": [answer_id, ...]}`, one id per question in quiz order.
/// * Returns 201 with the unrounded score.
pub async fn submit_quiz(
    State(catalog): State<Arc<dyn CatalogStore>>,
    State(ledger): State<Arc<dyn ResultLedger>>,
    Extension(principal): Extension<Principal>,
    Path(lesson_id): Path<i64>,
    Query(params): Query<AccessParams>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let user_id = principal.require_user()?;

    load_accessible_lesson(catalog.as_ref(), lesson_id, &principal, params.token.as_deref())
        .await?;
    let quiz = load_quiz(catalog.as_ref(), lesson_id).await?;

    let req: SubmitQuizRequest = parse_payload(&body)?;
    let result = grade(ledger.as_ref(), &quiz, &req.answers, user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitQuizResponse {
            score: result.score,
        }),
    ))
}

/// Average score, attempt count and the caller's latest attempt for a lesson's quiz.
pub async fn quiz_analytics(
    State(catalog): State<Arc<dyn CatalogStore>>,
    State(ledger): State<Arc<dyn ResultLedger>>,
    Extension(principal): Extension<Principal>,
    Path(lesson_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = load_quiz(catalog.as_ref(), lesson_id).await?;
    let summary = quiz_summary(ledger.as_ref(), quiz.id, &principal).await?;

    Ok(Json(summary))
}

/// Attaches a quiz to a lesson owned by the caller.
///
/// Unknown lessons and lessons owned by someone else are both reported as 404.
/// A lesson that already has a quiz yields 409.
pub async fn create_quiz(
    State(catalog): State<Arc<dyn CatalogStore>>,
    Extension(principal): Extension<Principal>,
    Path(lesson_id): Path<i64>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let user_id = principal.require_user()?;

    let lesson = catalog
        .find_lesson(lesson_id)
        .await?
        .filter(|l| l.owner_id == Some(user_id))
        .ok_or(AppError::NotFound("Lesson not found".to_string()))?;

    let req: CreateQuizRequest = parse_payload(&body)?;

    let quiz = catalog
        .create_quiz(lesson.id, QuizDraft::from_request(req)?)
        .await
        .inspect_err(|e| {
            if matches!(e, AppError::Conflict(_)) {
                tracing::warn!("Rejected second quiz for lesson {}", lesson.id);
            }
        })?;

    tracing::info!(
        "User {} created quiz {} with {} questions for lesson {}",
        user_id,
        quiz.id,
        quiz.question_count(),
        lesson.id
    );

    Ok((StatusCode::CREATED, Json(quiz.to_public())))
}
