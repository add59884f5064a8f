// src/models/lesson.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

/// Access-control classification of a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessTier {
    Public,
    Registered,
    Token,
}

impl AccessTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessTier::Public => "public",
            AccessTier::Registered => "registered",
            AccessTier::Token => "token",
        }
    }
}

impl fmt::Display for AccessTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessTier {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(AccessTier::Public),
            "registered" => Ok(AccessTier::Registered),
            "token" => Ok(AccessTier::Token),
            other => Err(AppError::BadRequest(format!("Unknown access tier '{}'", other))),
        }
    }
}

/// A lesson as seen by the access policy and the API.
#[derive(Debug, Clone, Serialize)]
pub struct Lesson {
    pub id: i64,
    pub title: String,
    pub description: String,

    /// Authoring user. Only the owner may attach a quiz.
    pub owner_id: Option<i64>,

    pub category_id: i64,

    pub access_tier: AccessTier,

    /// Shared secret for `token`-tier lessons. Never serialized.
    #[serde(skip_serializing)]
    pub token: Option<String>,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Raw row of the 'lessons' table. `access_type` is stored as TEXT.
#[derive(Debug, FromRow)]
pub struct LessonRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub owner_id: Option<i64>,
    pub category_id: i64,
    pub access_type: String,
    pub token: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<LessonRow> for Lesson {
    type Error = AppError;

    fn try_from(row: LessonRow) -> Result<Self, Self::Error> {
        let access_tier = row
            .access_type
            .parse::<AccessTier>()
            .map_err(|e| AppError::InternalServerError(format!("Lesson {}: {}", row.id, e)))?;

        Ok(Lesson {
            id: row.id,
            title: row.title,
            description: row.description,
            owner_id: row.owner_id,
            category_id: row.category_id,
            access_tier,
            token: row.token,
            created_at: row.created_at,
        })
    }
}

/// Input for inserting a lesson through the store.
#[derive(Debug, Clone)]
pub struct NewLesson {
    pub title: String,
    pub description: String,
    pub owner_id: Option<i64>,
    pub category_id: i64,
    pub access_tier: AccessTier,
    pub token: Option<String>,
}

impl NewLesson {
    /// A `token`-tier lesson must carry a non-empty token; other tiers carry none.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::BadRequest("Lesson title is required".to_string()));
        }
        match (self.access_tier, self.token.as_deref()) {
            (AccessTier::Token, Some(token)) if !token.is_empty() => Ok(()),
            (AccessTier::Token, _) => Err(AppError::BadRequest(
                "Token-tier lessons require a non-empty token".to_string(),
            )),
            (_, Some(_)) => Err(AppError::BadRequest(
                "Only token-tier lessons may carry a token".to_string(),
            )),
            (_, None) => Ok(()),
        }
    }
}

/// Query parameters for listing lessons.
#[derive(Debug, Default, Deserialize)]
pub struct LessonListParams {
    pub category: Option<i64>,
}

/// Query parameters carrying the access token for `token`-tier lessons.
#[derive(Debug, Default, Deserialize)]
pub struct AccessParams {
    pub token: Option<String>,
}
