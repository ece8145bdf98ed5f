//! Error types for the reliefmill core crate.
//!
//! This module provides structured error types for heightmap loading,
//! parameter validation, and toolpath generation.

use std::io;
use thiserror::Error;

/// Errors that can occur during relief carving operations.
#[derive(Error, Debug)]
pub enum CarveError {
    /// Invalid parameters were provided to the planner.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// The heightmap image could not be loaded or decoded.
    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    /// G-code generation failed.
    #[error("G-code generation failed: {0}")]
    GenerationFailed(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A parameter validation error occurred.
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),
}

/// Errors related to carving parameter validation.
#[derive(Error, Debug)]
pub enum ParameterError {
    /// A required parameter is missing.
    #[error("Missing required parameter: {0}")]
    Missing(String),

    /// A parameter value is out of the valid range.
    #[error("Parameter '{name}' out of range: {value} (valid: {min}..{max})")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A parameter value is invalid.
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: String, reason: String },

    /// Dimensions are invalid (zero or negative).
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),
}

/// Result type alias for carving operations.
pub type CarveResult<T> = Result<T, CarveError>;

/// Result type alias for parameter validation.
pub type ParameterResult<T> = Result<T, ParameterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_carve_error_display() {
        let err = CarveError::InvalidParameters("height must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid parameters: height must be positive"
        );

        let err = CarveError::GenerationFailed("empty toolpath".to_string());
        assert_eq!(err.to_string(), "G-code generation failed: empty toolpath");
    }

    #[test]
    fn test_parameter_error_display() {
        let err = ParameterError::OutOfRange {
            name: "height_mm".to_string(),
            value: -5.0,
            min: 0.0,
            max: 1000.0,
        };
        assert_eq!(
            err.to_string(),
            "Parameter 'height_mm' out of range: -5 (valid: 0..1000)"
        );

        let err = ParameterError::Missing("tool_diameters".to_string());
        assert_eq!(err.to_string(), "Missing required parameter: tool_diameters");
    }

    #[test]
    fn test_error_conversion() {
        let param_err = ParameterError::InvalidDimensions("width_mm is zero".to_string());
        let carve_err: CarveError = param_err.into();
        assert!(matches!(carve_err, CarveError::Parameter(_)));

        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let carve_err: CarveError = io_err.into();
        assert!(matches!(carve_err, CarveError::IoError(_)));
    }
}
