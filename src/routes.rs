// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{lesson, quiz},
    state::AppState,
    utils::jwt::{auth_middleware, identity_middleware},
};

/// Assembles the main application router.
///
/// * Public lesson and quiz routes resolve the caller to a `Principal` (possibly anonymous).
/// * Submission and authoring additionally require an authenticated caller.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let protected_routes = Router::new()
        .route("/{lesson_id}/quiz/submit", post(quiz::submit_quiz))
        .route("/{lesson_id}/quiz/create", post(quiz::create_quiz))
        .layer(middleware::from_fn(auth_middleware));

    let lesson_routes = Router::new()
        .route("/", get(lesson::list_lessons))
        .route("/{lesson_id}", get(lesson::get_lesson))
        .route("/{lesson_id}/quiz", get(quiz::get_quiz))
        .route("/{lesson_id}/quiz/analytics", get(quiz::quiz_analytics))
        .merge(protected_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            identity_middleware,
        ));

    Router::new()
        .nest("/api/lessons", lesson_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
