//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and structured JSON error response.
//!
//! Storage-level uniqueness violations are never surfaced directly: both
//! the registry commit path and the PostgreSQL archive remap them to
//! [`GatewayError::DuplicateIdentity`], so callers see the same error
//! vocabulary regardless of which check caught the collision.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ids::{EventId, RequirementId, SubscriberId};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2101,
///     "message": "identity number already registered for this event",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges below).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category           | HTTP Status                |
/// |-----------|--------------------|----------------------------|
/// | 1000–1999 | Validation         | 400 Bad Request            |
/// | 2000–2099 | Not Found          | 404 Not Found              |
/// | 2100–2199 | Duplicate/Conflict | 409 Conflict               |
/// | 3000–3999 | Server             | 500 Internal Server Error  |
/// | 4000–4999 | Workflow-Specific  | 422 / 502                  |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Identity number is malformed (wrong length, non-digit characters,
    /// or an unrecognized leading digit).
    #[error("invalid identity number: {0}")]
    IdentityFormat(String),

    /// Identity number fails the check-digit verification.
    #[error("identity number checksum failed: expected check digit {expected}, got {actual}")]
    IdentityChecksum {
        /// Check digit recomputed from the first nine digits.
        expected: u8,
        /// Check digit actually present in the input.
        actual: u8,
    },

    /// Identity number is already registered for the target event.
    #[error("identity number already registered for this event")]
    DuplicateIdentity,

    /// Request payload validation failed.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Event with the given ID was not found.
    #[error("event not found: {0}")]
    EventNotFound(EventId),

    /// Subscriber with the given ID was not found.
    #[error("subscriber not found: {0}")]
    SubscriberNotFound(SubscriberId),

    /// Job requirement with the given ID was not found.
    #[error("job requirement not found: {0}")]
    RequirementNotFound(RequirementId),

    /// Asset store failure (upload, delete, or timeout).
    #[error("asset store error: {0}")]
    Upload(String),

    /// Export requested for an event with no subscribers.
    #[error("nothing to export for event {0}")]
    NothingToExport(EventId),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::IdentityFormat(_) => 1002,
            Self::IdentityChecksum { .. } => 1003,
            Self::EventNotFound(_) => 2001,
            Self::SubscriberNotFound(_) => 2002,
            Self::RequirementNotFound(_) => 2003,
            Self::DuplicateIdentity => 2101,
            Self::NothingToExport(_) => 4001,
            Self::Upload(_) => 4002,
            Self::Persistence(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::IdentityFormat(_) | Self::IdentityChecksum { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::EventNotFound(_) | Self::SubscriberNotFound(_) | Self::RequirementNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::DuplicateIdentity => StatusCode::CONFLICT,
            Self::NothingToExport(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Upload(_) => StatusCode::BAD_GATEWAY,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_maps_to_conflict() {
        let err = GatewayError::DuplicateIdentity;
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), 2101);
    }

    #[test]
    fn identity_errors_map_to_bad_request() {
        let format = GatewayError::IdentityFormat("too short".to_string());
        let checksum = GatewayError::IdentityChecksum {
            expected: 8,
            actual: 0,
        };
        assert_eq!(format.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(checksum.status_code(), StatusCode::BAD_REQUEST);
        assert_ne!(format.error_code(), checksum.error_code());
    }

    #[test]
    fn empty_export_is_unprocessable() {
        let err = GatewayError::NothingToExport(EventId::new());
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
