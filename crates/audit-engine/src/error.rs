use shared_types::SchemaError;
use thiserror::Error;

/// Failures of a single call to the LLM service
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("model refused the request: {0}")]
    Refused(String),

    #[error("model returned no content")]
    EmptyResponse,

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// User-facing outcome of an audit run that did not produce a report.
///
/// Display strings are the notices shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    #[error("Por favor, insira sua OpenAI API Key na barra lateral.")]
    MissingCredential,

    #[error("Por favor, forneça um contrato para análise.")]
    MissingContractText,

    #[error("Erro na análise: {0}")]
    AuditRequestFailure(String),
}
