// src/models/principal.rs

use crate::{config::PRIVILEGED_ROLES, error::AppError, utils::jwt::Claims};

/// The actor behind a request, resolved by the identity middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Anonymous,
    Authenticated { user_id: i64, role: String },
}

impl Principal {
    pub fn from_claims(claims: &Claims) -> Result<Self, AppError> {
        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::AuthError("Invalid subject in token".to_string()))?;

        Ok(Principal::Authenticated {
            user_id,
            role: claims.role.clone(),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Principal::Authenticated { .. })
    }

    /// Staff-equivalent rights: bypasses token checks and sees every lesson in listings.
    pub fn is_privileged(&self) -> bool {
        match self {
            Principal::Authenticated { role, .. } => PRIVILEGED_ROLES.contains(&role.as_str()),
            Principal::Anonymous => false,
        }
    }

    pub fn user_id(&self) -> Option<i64> {
        match self {
            Principal::Authenticated { user_id, .. } => Some(*user_id),
            Principal::Anonymous => None,
        }
    }

    /// Returns the user id, or 401 for anonymous callers.
    pub fn require_user(&self) -> Result<i64, AppError> {
        self.user_id()
            .ok_or_else(|| AppError::AuthError("Authentication required".to_string()))
    }
}
