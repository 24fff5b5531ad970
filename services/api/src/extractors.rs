use axum::{
    async_trait,
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use simulator::ServiceError;

use crate::errors::error_response;

/// Custom JSON extractor that provides better error messages
///
/// This wrapper catches JSON deserialization errors and formats them as
/// standardized JSON error responses instead of plain text.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ValidationJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidatedJson(value)),
            Err(rejection) => Err(ValidationJsonRejection::Json(rejection)),
        }
    }
}

/// Same body limit axum applies to `Json`
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// JSON body that may be left out entirely
///
/// An empty or whitespace-only body yields `T::default()`, so a bare `POST`
/// behaves like `{}`. Any other body is parsed as [`ValidatedJson`].
pub struct JsonOrDefault<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonOrDefault<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ValidationJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = req.into_parts();
        let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|e| ValidationJsonRejection::Body(e.to_string()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonOrDefault(T::default()));
        }

        let req = Request::from_parts(parts, Body::from(bytes));
        let ValidatedJson(value) = ValidatedJson::<T>::from_request(req, state).await?;
        Ok(JsonOrDefault(value))
    }
}

/// Custom rejection type that formats JSON errors as standardized responses
pub enum ValidationJsonRejection {
    Json(JsonRejection),
    /// The body could not be read (too large or interrupted)
    Body(String),
}

/// Strip axum's prefix and serde's position suffix from a rejection message
fn rejection_detail(message: &str) -> &str {
    let detail = message
        .split_once("target type: ")
        .map(|(_, rest)| rest)
        .unwrap_or(message);
    detail
        .split(" at line")
        .next()
        .unwrap_or(detail)
        .trim()
}

pub(crate) fn classify_rejection(message: &str) -> ServiceError {
    if let Some(field) = message
        .split("missing field `")
        .nth(1)
        .and_then(|s| s.split('`').next())
    {
        ServiceError::missing_field(field)
    } else if message.contains("Failed to deserialize") {
        ServiceError::invalid_input(format!("Invalid request body: {}", rejection_detail(message)))
    } else if message.contains("Content-Type") {
        ServiceError::invalid_input("Expected request with `Content-Type: application/json`")
    } else {
        ServiceError::invalid_input("Invalid request body: failed to parse JSON")
    }
}

impl IntoResponse for ValidationJsonRejection {
    fn into_response(self) -> Response {
        let (original_error, error) = match self {
            ValidationJsonRejection::Json(rejection) => {
                let text = rejection.body_text();
                let error = classify_rejection(&text);
                (text, error)
            }
            ValidationJsonRejection::Body(detail) => (
                detail,
                ServiceError::invalid_input("Invalid request body: could not be read"),
            ),
        };

        tracing::debug!(
            original_error = %original_error,
            "Request validation failed during JSON deserialization"
        );

        error_response(&error)
    }
}
