//! Error handling for Constel
//!
//! All four domain error kinds are local, recoverable conditions that the
//! caller is expected to catch and surface; none should crash the process.

use thiserror::Error;

/// Result type alias for Constel operations
pub type Result<T> = std::result::Result<T, ConstelError>;

/// Main error type for Constel operations
#[derive(Error, Debug)]
pub enum ConstelError {
    // Configuration Errors
    #[error("Invalid adaptation config: {reason}")]
    InvalidConfig { reason: String },

    // Weight Errors
    #[error("Invalid adaptation weights: {reason}")]
    InvalidWeights { reason: String },

    // Extraction Errors
    #[error("No adaptation record found on layer '{layer_id}'")]
    NoAdaptation { layer_id: String },

    // Generator / Stack Errors
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ConstelError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            ConstelError::InvalidConfig { .. } => "INVALID_CONFIG",
            ConstelError::InvalidWeights { .. } => "INVALID_WEIGHTS",
            ConstelError::NoAdaptation { .. } => "NO_ADAPTATION",
            ConstelError::InvalidInput { .. } => "INVALID_INPUT",
            ConstelError::Io(_) => "IO_ERROR",
            ConstelError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable
    ///
    /// All four domain error kinds are recoverable: the caller can adjust
    /// the offending input and retry. Retrying is a caller decision, never
    /// automatic.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ConstelError::InvalidConfig { .. } => true,
            ConstelError::InvalidWeights { .. } => true,
            ConstelError::NoAdaptation { .. } => true,
            ConstelError::InvalidInput { .. } => true,
            _ => false,
        }
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            ConstelError::InvalidConfig { .. } => vec![
                "Supported ranks are 4, 8, 16, 32 and 64",
                "Alpha must be a positive number (default 32)",
            ],
            ConstelError::InvalidWeights { .. } => vec![
                "Regenerate the weights with 'constel-cli create-weights'",
                "Check that matrix A has rank rows and matrix B has rank columns",
                "The weights file may be corrupted - try re-exporting from source",
            ],
            ConstelError::NoAdaptation { .. } => vec![
                "Apply weights to the layer first with 'constel-cli apply'",
                "Check the layer id - only adapted layers carry weights",
            ],
            ConstelError::InvalidInput { .. } => vec![
                "Timelines need at least 2 frames",
                "Layer ids must be unique within a stack",
            ],
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = ConstelError::InvalidConfig {
            reason: "unsupported rank: 7".to_string(),
        };
        assert_eq!(err.error_code(), "INVALID_CONFIG");

        let err = ConstelError::NoAdaptation {
            layer_id: "layer-1".to_string(),
        };
        assert_eq!(err.error_code(), "NO_ADAPTATION");
    }

    #[test]
    fn test_domain_errors_are_recoverable() {
        let err = ConstelError::InvalidWeights {
            reason: "matrix A has 8 rows, expected rank 16".to_string(),
        };
        assert!(err.is_recoverable());
        assert!(!err.recovery_suggestions().is_empty());

        let err = ConstelError::InvalidInput {
            reason: "frame count must be at least 2".to_string(),
        };
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_io_error_not_recoverable() {
        let err = ConstelError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        assert!(!err.is_recoverable());
        assert_eq!(err.error_code(), "IO_ERROR");
    }

    #[test]
    fn test_error_display_includes_reason() {
        let err = ConstelError::InvalidConfig {
            reason: "unsupported rank: 7".to_string(),
        };
        assert!(err.to_string().contains("unsupported rank: 7"));
    }
}
