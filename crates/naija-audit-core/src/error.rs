use thiserror::Error;

/// Errors surfaced by the engine.
///
/// `Validation` means the caller sent malformed input and retrying the same
/// payload cannot succeed. `Configuration` means the deployment itself is
/// wrong (unknown regulation, missing benchmark, inconsistent thresholds).
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Validation error: {field} — {reason}")]
    Validation { field: String, reason: String },

    #[error("Configuration error: {context} — {reason}")]
    Configuration { context: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AuditError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AuditError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn configuration(context: impl Into<String>, reason: impl Into<String>) -> Self {
        AuditError::Configuration {
            context: context.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for AuditError {
    fn from(e: serde_json::Error) -> Self {
        AuditError::Serialization(e.to_string())
    }
}
