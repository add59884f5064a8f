// src/services/access.rs

use crate::{
    error::AppError,
    models::{
        lesson::{AccessTier, Lesson},
        principal::Principal,
    },
};

/// Decides whether `principal` may retrieve `lesson`. First matching rule wins:
///
/// 1. `public` lessons are open to everyone.
/// 2. `registered` lessons are open to any authenticated principal.
/// 3. `token` lessons need the lesson's token, or a privileged principal.
/// 4. Anything else is denied.
pub fn can_access(lesson: &Lesson, principal: &Principal, supplied_token: Option<&str>) -> bool {
    match lesson.access_tier {
        AccessTier::Public => true,
        AccessTier::Registered => principal.is_authenticated(),
        AccessTier::Token => token_matches(lesson, supplied_token) || principal.is_privileged(),
    }
}

/// Single-object retrieval check. Denial is a `Forbidden` error.
pub fn ensure_access(
    lesson: &Lesson,
    principal: &Principal,
    supplied_token: Option<&str>,
) -> Result<(), AppError> {
    if can_access(lesson, principal, supplied_token) {
        return Ok(());
    }

    tracing::info!(
        "Access denied to lesson {} ({}) for {:?}",
        lesson.id,
        lesson.access_tier,
        principal.user_id()
    );
    Err(AppError::Forbidden(
        "You don't have permission to access this lesson.".to_string(),
    ))
}

/// Bulk-listing filter.
///
/// No token is supplied in a list context, so non-privileged principals never see
/// `token` lessons here even when they could open one directly with its token.
pub fn filter_visible(lessons: Vec<Lesson>, principal: &Principal) -> Vec<Lesson> {
    lessons
        .into_iter()
        .filter(|lesson| is_listed(lesson.access_tier, principal))
        .collect()
}

fn is_listed(tier: AccessTier, principal: &Principal) -> bool {
    match principal {
        Principal::Anonymous => tier == AccessTier::Public,
        _ if principal.is_privileged() => true,
        Principal::Authenticated { .. } => tier != AccessTier::Token,
    }
}

// Empty tokens never match, on either side.
fn token_matches(lesson: &Lesson, supplied_token: Option<&str>) -> bool {
    match (lesson.token.as_deref(), supplied_token) {
        (Some(expected), Some(given)) => !expected.is_empty() && expected == given,
        _ => false,
    }
}
