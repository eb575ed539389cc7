//! Error types for the VOD catalog platform
//!
//! A query either fully succeeds with a well-formed page or fails with one
//! of these variants; no partial results cross the component boundary.

use actix_web::HttpResponse;
use serde_json::json;

/// Platform-wide error taxonomy
///
/// Maps onto HTTP status codes at the service edge:
/// validation → 400, not-found → 404, access-denied → 403, dependency → 500.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Malformed or forbidden input (search term too short, child profile
    /// requesting a disallowed genre or rating)
    #[error("validation error: {0}")]
    Validation(String),

    /// Unknown content or shelf id
    #[error("not found: {0}")]
    NotFound(String),

    /// Content exists but fails the child-safety or geo gate for this viewer
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// Backing store unreachable or misbehaving; not retried here
    #[error("dependency error: {0}")]
    Dependency(String),

    /// Invalid or missing configuration value
    #[error("configuration error: {message}")]
    Configuration {
        message: String,
        key: Option<String>,
    },
}

impl CatalogError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::AccessDenied(message.into())
    }

    pub fn dependency(message: impl Into<String>) -> Self {
        Self::Dependency(message.into())
    }

    pub fn configuration(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Stable machine-readable code for the error body
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::AccessDenied(_) => "access_denied",
            Self::Dependency(_) => "dependency_error",
            Self::Configuration { .. } => "configuration_error",
        }
    }
}

impl From<sqlx::Error> for CatalogError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => Self::NotFound("record not found".to_string()),
            other => Self::Dependency(format!("database error: {}", other)),
        }
    }
}

impl actix_web::ResponseError for CatalogError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({
            "error": self.code(),
            "message": self.to_string(),
        });

        match self {
            Self::Validation(_) => HttpResponse::BadRequest().json(body),
            Self::NotFound(_) => HttpResponse::NotFound().json(body),
            Self::AccessDenied(_) => HttpResponse::Forbidden().json(body),
            Self::Dependency(_) | Self::Configuration { .. } => {
                HttpResponse::InternalServerError().json(body)
            }
        }
    }
}

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;
