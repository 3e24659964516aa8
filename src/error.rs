// HTTP-facing error taxonomy shared by both presentations
use serde_json::{json, Value};
use thiserror::Error;

use crate::database::StoreError;

/// Errors a handler can surface. Each presentation decides how a variant
/// is rendered (redirect, plain text or JSON envelope).
#[derive(Debug, Error)]
pub enum AppError {
    // Credential lookup miss; rendered like a failed authentication
    #[error("the requested resource is not found")]
    NotFound,

    // 400 Bad Request
    #[error("{message}")]
    Validation {
        message: String,
        fields: Vec<String>,
    },

    // 400 (JSON) / redirect to sign-in (HTML)
    #[error("authentication failed")]
    AuthenticationFailed,

    // 401 (JSON) / redirect to sign-in (HTML)
    #[error("unauthorized")]
    Unauthorized,

    // 500 Internal Server Error, detail is logged and never sent to clients
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>, field: &str) -> Self {
        AppError::Validation {
            message: message.into(),
            fields: vec![field.to_string()],
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::Internal(message.into())
    }

    /// Get HTTP status code used by the JSON presentation
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::NotFound => 400,
            AppError::Validation { .. } => 400,
            AppError::AuthenticationFailed => 400,
            AppError::Unauthorized => 401,
            AppError::Internal(_) => 500,
        }
    }

    /// Machine-readable `type` of the JSON error envelope
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::NotFound | AppError::AuthenticationFailed => "authentication",
            AppError::Validation { .. } => "validation",
            AppError::Unauthorized => "unauthorized",
            AppError::Internal(_) => "internal_server",
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            AppError::NotFound | AppError::AuthenticationFailed => "Invalid authentication details",
            AppError::Validation { message, .. } => message,
            AppError::Unauthorized => "Unauthorized access. Do you have a valid bearer token set?",
            AppError::Internal(_) => "Something went wrong. Try again later.",
        }
    }

    /// Convert to the JSON error envelope
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "error": self.message(),
            "type": self.error_type(),
        });
        if let AppError::Validation { fields, .. } = self {
            body["fields"] = json!(fields);
        }
        body
    }
}

// Detail is logged when the presentation renders the error
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound,
            other => AppError::internal(format!("store: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_envelope_lists_fields() {
        let err = AppError::validation("Price must be integer", "price");
        let body = err.to_json();
        assert_eq!(err.status_code(), 400);
        assert_eq!(body["type"], "validation");
        assert_eq!(body["error"], "Price must be integer");
        assert_eq!(body["fields"], json!(["price"]));
    }

    #[test]
    fn internal_detail_is_not_exposed() {
        let err = AppError::internal("disk I/O error");
        let body = err.to_json();
        assert_eq!(err.status_code(), 500);
        assert_eq!(body["type"], "internal_server");
        assert!(!body["error"].as_str().unwrap_or_default().contains("disk"));
        assert!(body.get("fields").is_none());
    }

    #[test]
    fn not_found_funnels_into_authentication() {
        assert_eq!(AppError::NotFound.error_type(), "authentication");
        assert_eq!(AppError::from(StoreError::NotFound).status_code(), 400);
    }
}
