//! Error types for the override model.

/// Errors raised by master record operations.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Variant {name}={value} not found")]
    VariantNotFound { name: String, value: String },

    #[error("Variant name {0} not found")]
    VariantNameNotFound(String),

    #[error("JCS serialization error: {0}")]
    JcsError(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
