//! OpenAI chat-completions client with strict structured output.
//!
//! The request carries the fixed auditor instruction, the contract text and
//! a `json_schema` response format built from
//! [`shared_types::audit_report_schema`]. The message content is then run
//! through [`shared_types::decode_report`], so a response that passes here
//! is guaranteed to satisfy the audit schema.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use shared_types::{audit_report_schema, decode_report, AuditReport, SCHEMA_NAME};
use tracing::{debug, info, warn};

use crate::error::RequestError;
use crate::prompt::{user_message, DEFAULT_MODEL, SYSTEM_PROMPT};
use crate::requestor::AuditRequestor;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Audit requestor backed by the OpenAI chat-completions endpoint
#[derive(Debug, Clone)]
pub struct OpenAiRequestor {
    http: reqwest::Client,
    api_base: String,
    model: String,
}

impl OpenAiRequestor {
    /// Create a requestor. `timeout` of `None` keeps the client default
    /// (no timeout).
    pub fn new(
        api_base: impl Into<String>,
        model: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, RequestError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }

    /// JSON body of the chat-completions request
    pub fn request_body(&self, contract_text: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_message(contract_text) }
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": SCHEMA_NAME,
                    "strict": true,
                    "schema": audit_report_schema()
                }
            }
        })
    }
}

impl Default for OpenAiRequestor {
    fn default() -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

#[async_trait]
impl AuditRequestor for OpenAiRequestor {
    async fn request_audit(
        &self,
        contract_text: &str,
        credential: &str,
    ) -> Result<AuditReport, RequestError> {
        info!(
            "Requesting audit: model={}, contract_chars={}",
            self.model,
            contract_text.chars().count()
        );

        let resp = self
            .http
            .post(self.endpoint())
            .bearer_auth(credential)
            .json(&self.request_body(contract_text))
            .send()
            .await?;
        let resp = check_response(resp).await?;

        let completion: ChatCompletion = resp.json().await?;
        let report = parse_completion(completion)?;

        debug!(
            "Audit decoded: {} risk items, {} guarantees",
            report.risk_items.len(),
            report.summary.guarantees_found.len()
        );
        Ok(report)
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

/// Map non-success statuses to [`RequestError::Api`], keeping the
/// service's own error message when the body carries one.
async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, RequestError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    warn!("LLM service returned {}", status);
    Err(RequestError::Api {
        status: status.as_u16(),
        message: api_error_message(&body),
    })
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

fn parse_completion(completion: ChatCompletion) -> Result<AuditReport, RequestError> {
    let message = completion
        .choices
        .into_iter()
        .next()
        .map(|c| c.message)
        .ok_or(RequestError::EmptyResponse)?;

    if let Some(refusal) = message.refusal.filter(|r| !r.trim().is_empty()) {
        return Err(RequestError::Refused(refusal));
    }

    let content = message
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or(RequestError::EmptyResponse)?;

    Ok(decode_report(&content)?)
}
