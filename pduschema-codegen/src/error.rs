//! Error types for schema generation.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for schema generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Record description parsing error.
    #[error("record parse error: {0}")]
    Parse(#[from] pduschema_model::ParseError),

    /// Record model error.
    #[error("model error: {0}")]
    Model(#[from] pduschema_model::ModelError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing one output file failed.
    #[error("failed to write '{}': {source}", path.display())]
    Write {
        /// Target file path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl CodegenError {
    /// Creates a write error for the given path.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Returns true for errors that must abort the whole run.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Write { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_error_is_recoverable() {
        let err = CodegenError::write(
            "out/FirePdu.schema",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("FirePdu.schema"));
    }

    #[test]
    fn test_model_error_is_fatal() {
        let err: CodegenError = pduschema_model::ModelError::cycle(&["A", "A"]).into();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("A -> A"));
    }
}
