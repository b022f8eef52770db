use crate::error::ApiError;
use crate::models::CountryRequest;
use axum::{Json, extract::rejection::JsonRejection};
use tracing::debug;

/// Resolve the inbound body to a non-blank, trimmed country name.
///
/// Any schema problem (bad JSON, wrong content type, non-string `country`) is
/// reported the same way as a missing country.
pub fn require_country(
    payload: Result<Json<CountryRequest>, JsonRejection>,
) -> Result<String, ApiError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!("Rejected request body: {}", rejection.body_text());
            return Err(ApiError::missing_country());
        }
    };

    match request.country.as_deref().map(str::trim) {
        Some(country) if !country.is_empty() => Ok(country.to_string()),
        _ => Err(ApiError::missing_country()),
    }
}
