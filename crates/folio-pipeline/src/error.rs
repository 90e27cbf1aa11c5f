//! Error types for the resolution pipeline
//!
//! Per-node resolution failures are not errors - they degrade to status
//! annotations inside the passes. The types here cover pass-level
//! failures: I/O problems, structural surprises, anything that aborts the
//! current pipeline run.

use serde::{Deserialize, Serialize};

/// A structured failure raised by a single pass.
///
/// `message` is human-readable and may surface to callers; `debug` carries
/// machine context (paths, underlying error text) and is only ever logged
/// or attached to development error responses.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct PassError {
    /// Human-readable failure message
    pub message: String,
    /// Machine-debug string, never shown to end users
    pub debug: String,
}

impl PassError {
    /// Create a pass failure
    #[inline]
    #[must_use]
    pub fn new(message: impl Into<String>, debug: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            debug: debug.into(),
        }
    }

    /// Failure with no extra debug context
    #[inline]
    #[must_use]
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            debug: String::new(),
        }
    }
}

/// A pipeline run that terminated early, attributed to the failing pass.
///
/// Serializable so the HTTP collaborator can attach it to error responses.
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
#[error("pass '{pass}' failed: {message}")]
pub struct PipelineError {
    /// Name of the pass that failed
    pub pass: String,
    /// Human-readable failure message
    pub message: String,
    /// Machine-debug string, never shown to end users
    pub debug: String,
}

impl PipelineError {
    /// Attribute a pass failure to a named pass
    #[inline]
    #[must_use]
    pub fn from_pass(pass: impl Into<String>, error: PassError) -> Self {
        Self {
            pass: pass.into(),
            message: error.message,
            debug: error.debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_error_display_hides_debug() {
        let err = PassError::new("could not load fragment", "/data/x.xml: ENOENT");
        assert_eq!(err.to_string(), "could not load fragment");
    }

    #[test]
    fn pipeline_error_from_pass() {
        let err = PipelineError::from_pass("table-sync", PassError::message_only("boom"));
        assert_eq!(err.pass, "table-sync");
        assert_eq!(err.to_string(), "pass 'table-sync' failed: boom");
    }

    #[test]
    fn pipeline_error_serializes() {
        let err = PipelineError::from_pass("x", PassError::new("m", "d"));
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["pass"], "x");
        assert_eq!(json["message"], "m");
        assert_eq!(json["debug"], "d");
    }
}
