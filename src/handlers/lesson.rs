// src/handlers/lesson.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::{
        lesson::{AccessParams, Lesson, LessonListParams},
        principal::Principal,
    },
    services::access::{ensure_access, filter_visible},
    store::CatalogStore,
};

/// Lists the lessons visible to the caller, optionally filtered by category.
///
/// Anonymous callers see public lessons, authenticated callers everything but
/// token lessons, staff everything.
pub async fn list_lessons(
    State(catalog): State<Arc<dyn CatalogStore>>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<LessonListParams>,
) -> Result<impl IntoResponse, AppError> {
    let lessons = catalog.list_lessons(params.category).await?;

    Ok(Json(filter_visible(lessons, &principal)))
}

/// Retrieves a single lesson after the access check.
pub async fn get_lesson(
    State(catalog): State<Arc<dyn CatalogStore>>,
    Extension(principal): Extension<Principal>,
    Path(lesson_id): Path<i64>,
    Query(params): Query<AccessParams>,
) -> Result<impl IntoResponse, AppError> {
    let lesson =
        load_accessible_lesson(catalog.as_ref(), lesson_id, &principal, params.token.as_deref())
            .await?;

    Ok(Json(lesson))
}

/// Fetches a lesson and runs it through the access policy before anything is returned.
pub(crate) async fn load_accessible_lesson(
    catalog: &dyn CatalogStore,
    lesson_id: i64,
    principal: &Principal,
    token: Option<&str>,
) -> Result<Lesson, AppError> {
    let lesson = catalog
        .find_lesson(lesson_id)
        .await?
        .ok_or(AppError::NotFound("Lesson not found".to_string()))?;

    ensure_access(&lesson, principal, token)?;

    Ok(lesson)
}
