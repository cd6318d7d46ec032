use thiserror::Error;

/// Reasons a model response does not satisfy the audit report contract
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("response is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("response does not match the audit schema: {}", errors.join("; "))]
    SchemaViolation { errors: Vec<String> },

    #[error("invalid value in response: {0}")]
    InvalidValue(String),

    #[error("audit schema could not be compiled: {0}")]
    Compile(String),
}
