//! # Error Types
//!
//! Structured error types for girder_core. Every failure is reported
//! synchronously and carries enough context (field, value, reason) to fix the
//! input without reading the source.
//!
//! ## Example
//!
//! ```rust
//! use girder_core::errors::{SectionError, SectionResult};
//!
//! fn validate_height(height_mm: f64) -> SectionResult<()> {
//!     if height_mm <= 0.0 {
//!         return Err(SectionError::geometry(
//!             "height",
//!             height_mm.to_string(),
//!             "Height must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_height(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for girder_core operations
pub type SectionResult<T> = Result<T, SectionError>;

/// Structured error type for layout, drawing and export operations.
///
/// None of these are transient: the same input always produces the same
/// error, so callers should never retry.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum SectionError {
    /// Invalid or degenerate section parameters
    #[error("Geometry error for '{field}': {value} - {reason}")]
    GeometryError {
        field: String,
        value: String,
        reason: String,
    },

    /// A dimension chain was given fewer than two or non-increasing breakpoints
    #[error("Invalid dimension chain {points}: {reason}")]
    InvalidChainError { points: String, reason: String },

    /// The layout handed to the renderer is internally inconsistent
    #[error("Layout error: {reason}")]
    LayoutError { reason: String },

    /// Drawing style configuration is unsupported or out of range
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },

    /// Rasterization or document compilation failed
    #[error("Export error ({format}): {reason}")]
    ExportError { format: String, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl SectionError {
    /// Create a GeometryError
    pub fn geometry(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        SectionError::GeometryError {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidChainError from the offending breakpoints
    pub fn invalid_chain(points: &[f64], reason: impl Into<String>) -> Self {
        SectionError::InvalidChainError {
            points: format!("{:?}", points),
            reason: reason.into(),
        }
    }

    /// Create a LayoutError
    pub fn layout(reason: impl Into<String>) -> Self {
        SectionError::LayoutError {
            reason: reason.into(),
        }
    }

    /// Create a ConfigError
    pub fn config(reason: impl Into<String>) -> Self {
        SectionError::ConfigError {
            reason: reason.into(),
        }
    }

    /// Create an ExportError
    pub fn export(format: impl Into<String>, reason: impl Into<String>) -> Self {
        SectionError::ExportError {
            format: format.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        SectionError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            SectionError::GeometryError { .. } => "GEOMETRY_ERROR",
            SectionError::InvalidChainError { .. } => "INVALID_CHAIN",
            SectionError::LayoutError { .. } => "LAYOUT_ERROR",
            SectionError::ConfigError { .. } => "CONFIG_ERROR",
            SectionError::ExportError { .. } => "EXPORT_ERROR",
            SectionError::FileError { .. } => "FILE_ERROR",
            SectionError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for SectionError {
    fn from(e: serde_json::Error) -> Self {
        SectionError::SerializationError {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = SectionError::geometry("web_setback", "2600", "degenerate clear width");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"GeometryError\""));
        let roundtrip: SectionError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(SectionError::layout("crossed webs").error_code(), "LAYOUT_ERROR");
        assert_eq!(SectionError::invalid_chain(&[0.0], "too short").error_code(), "INVALID_CHAIN");
        assert_eq!(SectionError::export("png", "empty").error_code(), "EXPORT_ERROR");
    }

    #[test]
    fn test_invalid_chain_lists_points() {
        let error = SectionError::invalid_chain(&[0.0, 0.0], "not increasing");
        assert!(error.to_string().contains("[0.0, 0.0]"));
    }
}
