//! Error handling for the gateway
//!
//! This module defines the crate-wide error type and a Result alias. Note that
//! the decode path never produces these: a frame that cannot be understood
//! becomes an empty [`SensorUpdate`](crate::model::SensorUpdate) instead.

use crate::pipeline::PipelineError;
use thiserror::Error;

/// Main error type for gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors building or wiring the dataflow graph
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Errors parsing capture files or driver input
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<GatewayError>,
    },
}

impl GatewayError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        GatewayError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GatewayError::Config("missing tick rate".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing tick rate");
    }

    #[test]
    fn test_error_with_context() {
        let err = GatewayError::Parse {
            line: 3,
            message: "bad identifier".to_string(),
        };
        let with_ctx = err.with_context("reading capture harbour.log");
        assert!(with_ctx.to_string().contains("reading capture harbour.log"));
        assert!(with_ctx.to_string().contains("bad identifier"));
    }

    #[test]
    fn test_parse_error_names_line() {
        let err = GatewayError::Parse {
            line: 12,
            message: "bad identifier".to_string(),
        };
        assert!(err.to_string().contains("line 12"));
    }

    #[test]
    fn test_result_ext_context() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let res: Result<()> = Err(GatewayError::from(io));
        let err = res.context("opening capture").unwrap_err();
        assert!(err.to_string().starts_with("opening capture"));
        assert!(matches!(err, GatewayError::WithContext { .. }));
    }
}
