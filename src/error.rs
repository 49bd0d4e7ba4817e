//! Service error taxonomy.
//!
//! Every error that can reach an HTTP caller is an [`AvatarError`] carrying a
//! stable `code`, a human message, an HTTP status and optional details.

use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::validate::ValidationIssue;

/// Errors surfaced by the avatar service.
#[derive(Debug, Error)]
pub enum AvatarError {
    #[error("{message}")]
    Validation {
        message: String,
        issues: Vec<ValidationIssue>,
    },

    #[error("{0}")]
    RateLimit(String),

    #[error("{0}")]
    Processing(String),

    #[error("Failed to load font: {0}")]
    FontLoad(String),

    #[error("{message}")]
    ImageGeneration {
        message: String,
        detail: Option<String>,
    },
}

impl AvatarError {
    pub fn validation(message: impl Into<String>, issues: Vec<ValidationIssue>) -> Self {
        Self::Validation {
            message: message.into(),
            issues,
        }
    }

    pub fn rate_limited() -> Self {
        Self::RateLimit("Rate limit exceeded".to_string())
    }

    pub fn processing(message: impl Into<String>) -> Self {
        Self::Processing(message.into())
    }

    pub fn image_generation(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::ImageGeneration {
            message: message.into(),
            detail: Some(detail.into()),
        }
    }

    /// Stable machine-readable code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::RateLimit(_) => "RATE_LIMIT_EXCEEDED",
            Self::Processing(_) => "PROCESSING_ERROR",
            Self::FontLoad(_) => "FONT_LOAD_ERROR",
            Self::ImageGeneration { .. } => "IMAGE_GENERATION_ERROR",
        }
    }

    /// HTTP status code.
    pub const fn status(&self) -> u16 {
        match self {
            Self::Validation { .. } | Self::FontLoad(_) => 400,
            Self::RateLimit(_) => 429,
            Self::Processing(_) | Self::ImageGeneration { .. } => 500,
        }
    }

    pub fn details(&self) -> Option<Value> {
        match self {
            Self::Validation { issues, .. } => serde_json::to_value(issues).ok(),
            Self::ImageGeneration {
                detail: Some(detail),
                ..
            } => Some(json!({ "detail": detail })),
            _ => None,
        }
    }

    /// Errors that are reported to callers as they are.
    ///
    /// Everything else collapses to a generic processing error at the boundary.
    pub const fn is_client_facing(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::RateLimit(_))
    }

    /// Structured error body: `{error: {code, message, details?}}`.
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: ErrorPayload {
                code: self.code(),
                message: self.to_string(),
                details: self.details(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorPayload,
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_statuses() {
        let cases = [
            (AvatarError::validation("bad", vec![]), "VALIDATION_ERROR", 400),
            (AvatarError::rate_limited(), "RATE_LIMIT_EXCEEDED", 429),
            (AvatarError::processing("boom"), "PROCESSING_ERROR", 500),
            (AvatarError::FontLoad("Comic".into()), "FONT_LOAD_ERROR", 400),
            (
                AvatarError::image_generation("encode", "png"),
                "IMAGE_GENERATION_ERROR",
                500,
            ),
        ];
        for (err, code, status) in cases {
            assert_eq!(err.code(), code);
            assert_eq!(err.status(), status);
        }
    }

    #[test]
    fn test_font_load_message() {
        let err = AvatarError::FontLoad("Comic Sans".into());
        assert_eq!(err.to_string(), "Failed to load font: Comic Sans");
    }

    #[test]
    fn test_body_shape() {
        let err = AvatarError::validation(
            "Invalid configuration",
            vec![ValidationIssue::new("name", "must not be empty")],
        );
        let body = serde_json::to_value(err.to_body()).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "Invalid configuration");
        assert_eq!(body["error"]["details"][0]["path"], "name");

        let body = serde_json::to_value(AvatarError::rate_limited().to_body()).unwrap();
        assert!(body["error"].get("details").is_none());
    }

    #[test]
    fn test_client_facing() {
        assert!(AvatarError::rate_limited().is_client_facing());
        assert!(!AvatarError::processing("x").is_client_facing());
    }
}
