//! API handlers for the JurisMatch server
//!
//! Provides:
//! - `GET /` - the audit page
//! - `POST /audit` - form submission (multipart), answered with the page
//! - `POST /api/audit` - JSON variant returning the report view model
//! - `GET /health`
//!
//! Every submission runs in its own [`AuditSession`]: at most one outbound
//! request, and the response only ever contains a complete report or a
//! notice, never both halves of a failed run.

use axum::{
    extract::{Multipart, State},
    response::Html,
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use audit_engine::present::{Notice, Tone};
use audit_engine::{AuditSession, ReportView};
use shared_pdf::ContractSource;

use crate::error::ServerError;
use crate::page::{render_page, PageModel};
use crate::AppState;

pub const PDF_LOADED_NOTICE: &str = "PDF lido com sucesso!";

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "jurismatch-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Handler: GET /
pub async fn handle_index() -> Html<String> {
    Html(render_page(&PageModel::default()))
}

/// Fields submitted by the audit form
#[derive(Debug, Default)]
pub struct AuditForm {
    pub api_key: String,
    pub pdf: Option<Vec<u8>>,
    pub text: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> Result<AuditForm, ServerError> {
    let mut form = AuditForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::InvalidRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "api_key" => {
                form.api_key = field
                    .text()
                    .await
                    .map_err(|e| ServerError::InvalidRequest(e.to_string()))?;
            }
            "contract_text" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ServerError::InvalidRequest(e.to_string()))?;
                form.text = Some(text);
            }
            "contract_pdf" => {
                // Browsers send an empty part when no file was chosen
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::InvalidRequest(e.to_string()))?;
                if !bytes.is_empty() {
                    form.pdf = Some(bytes.to_vec());
                }
            }
            other => debug!("Ignoring form field '{}'", other),
        }
    }

    Ok(form)
}

/// Resolve the contract text off the async executor; lopdf parsing is
/// CPU-bound and uploads can be large.
async fn read_source(
    pdf: Option<Vec<u8>>,
    text: Option<String>,
) -> Result<ContractSource, ServerError> {
    tokio::task::spawn_blocking(move || ContractSource::from_inputs(pdf.as_deref(), text))
        .await
        .map_err(|e| ServerError::Internal(format!("PDF extraction task failed: {}", e)))?
        .map_err(|e| ServerError::InvalidPdf(e.to_string()))
}

/// Run one audit for a form submission and build the page to show.
///
/// The credential is checked before the upload is touched, so a missing key
/// is reported as such even when the PDF is unreadable.
pub async fn run_form_audit(state: &AppState, form: AuditForm) -> PageModel {
    let mut session = AuditSession::new();
    if session.require_credential(&form.api_key).is_err() {
        return PageModel {
            notices: session.phase().notice().into_iter().collect(),
            report: None,
        };
    }

    let mut notices = Vec::new();

    let source = match read_source(form.pdf, form.text).await {
        Ok(source) => source,
        Err(e) => {
            warn!("Uploaded contract could not be read: {}", e);
            notices.push(Notice::new(Tone::Error, e.to_string()));
            return PageModel {
                notices,
                report: None,
            };
        }
    };

    if source.pdf_loaded() {
        notices.push(Notice::new(Tone::Success, PDF_LOADED_NOTICE));
    }

    if let Err(e) = session
        .trigger(state.requestor.as_ref(), &form.api_key, source.resolve())
        .await
    {
        debug!("Audit run ended without a report: {}", e);
    }

    notices.extend(session.phase().notice());

    PageModel {
        notices,
        report: session.report().cloned(),
    }
}

/// Handler: POST /audit
pub async fn handle_audit_form(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Html<String>, ServerError> {
    let form = read_form(multipart).await?;
    info!(
        "Audit form: pdf={}, pasted_chars={}",
        form.pdf.as_ref().map_or(0, Vec::len),
        form.text.as_deref().map_or(0, |t| t.chars().count())
    );

    let model = run_form_audit(&state, form).await;
    Ok(Html(render_page(&model)))
}

/// Audit request body
#[derive(Deserialize)]
pub struct AuditApiRequest {
    /// OpenAI API key, used for this request only
    #[serde(default)]
    pub api_key: String,

    /// Pasted contract text; wins over the PDF when non-blank
    #[serde(default)]
    pub text: Option<String>,

    /// Base64-encoded PDF
    #[serde(default)]
    pub pdf_base64: Option<String>,
}

/// Audit response
#[derive(Serialize)]
pub struct AuditApiResponse {
    pub success: bool,
    pub pdf_loaded: bool,
    pub report: ReportView,
}

/// Handler: POST /api/audit
pub async fn handle_audit_json(
    State(state): State<AppState>,
    Json(req): Json<AuditApiRequest>,
) -> Result<Json<AuditApiResponse>, ServerError> {
    info!(
        "Audit API request: pdf={}, pasted_chars={}",
        req.pdf_base64.is_some(),
        req.text.as_deref().map_or(0, |t| t.chars().count())
    );

    let mut session = AuditSession::new();
    session.require_credential(&req.api_key)?;

    let pdf_bytes = req
        .pdf_base64
        .as_deref()
        .filter(|b| !b.is_empty())
        .map(|b| BASE64.decode(b))
        .transpose()
        .map_err(|e| ServerError::InvalidPdf(format!("invalid base64: {}", e)))?;

    let source = read_source(pdf_bytes, req.text).await?;

    let report = session
        .trigger(state.requestor.as_ref(), &req.api_key, source.resolve())
        .await?;

    Ok(Json(AuditApiResponse {
        success: true,
        pdf_loaded: source.pdf_loaded(),
        report,
    }))
}
