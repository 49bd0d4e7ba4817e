//! Schema validation for incoming configurations.
//!
//! Validation is all-or-nothing: either a complete, defaulted
//! [`AvatarConfig`](crate::schema::AvatarConfig) comes out, or every
//! field-level problem found is reported together.
//!
//! - [`validate_config`] / [`validate_request`]: structured JSON input
//! - [`validate_image_params`]: flat parameters of the legacy endpoint

mod avatar;
mod fields;
mod legacy;

pub use avatar::{validate_config, validate_request};
pub use legacy::validate_image_params;

use serde::Serialize;
use std::fmt;

/// A single field-level validation problem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    /// Dotted field path (e.g. `shape.border.width`).
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Collects issues while walking a configuration.
#[derive(Debug, Default)]
pub struct Diagnostics {
    issues: Vec<ValidationIssue>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue::new(path, message));
    }

    /// Record an issue unless `min <= value <= max`.
    pub fn range<T>(&mut self, path: &str, value: T, min: T, max: T)
    where
        T: PartialOrd + fmt::Display + Copy,
    {
        if !(value >= min && value <= max) {
            self.error(path, format!("must be between {min} and {max} (got {value})"));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Convert to Result (returns Err if there are issues).
    pub fn into_result(self) -> Result<(), Vec<ValidationIssue>> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(self.issues)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bounds_inclusive() {
        let mut diag = Diagnostics::new();
        diag.range("a", 0, 0, 10);
        diag.range("b", 10, 0, 10);
        assert!(diag.is_empty());

        diag.range("c", 11, 0, 10);
        diag.range("d", -0.5, 0.0, 1.0);
        assert_eq!(diag.len(), 2);
        assert_eq!(diag.issues()[0].path, "c");
        assert!(diag.issues()[0].message.contains("between 0 and 10"));
    }

    #[test]
    fn test_range_rejects_nan() {
        let mut diag = Diagnostics::new();
        diag.range("x", f64::NAN, 0.0, 1.0);
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn test_into_result() {
        assert!(Diagnostics::new().into_result().is_ok());
        let mut diag = Diagnostics::new();
        diag.error("name", "required");
        let issues = diag.into_result().unwrap_err();
        assert_eq!(issues[0].to_string(), "name: required");
    }
}
