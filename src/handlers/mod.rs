// src/handlers/mod.rs

pub mod lesson;
pub mod quiz;

use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// Deserializes and validates a JSON body.
///
/// Bodies are taken as raw bytes so that unparsable JSON, missing or mistyped
/// fields all surface as 400 with the `{"error": ...}` shape instead of the
/// `Json` extractor's plain-text 400/415/422 rejections.
pub(crate) fn parse_payload<T>(body: &[u8]) -> Result<T, AppError>
where
    T: DeserializeOwned + Validate,
{
    let payload: T = serde_json::from_slice(body)?;
    payload.validate()?;
    Ok(payload)
}
