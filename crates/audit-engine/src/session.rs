//! Per-run audit state.
//!
//! ```text
//! Idle -> WarnMissingCredential          (no credential)
//! Idle -> WarnMissingText                (no contract text)
//! Idle -> Requesting -> Rendered         (report decoded)
//! Idle -> Requesting -> ErrorShown       (any request failure)
//! ```
//!
//! Warnings and errors are terminal for the run; the next `trigger` starts
//! again from `Idle` and replaces whatever was shown before.

use tracing::{error, info, warn};

use crate::error::AuditError;
use crate::present::{Notice, ReportView, Tone};
use crate::requestor::AuditRequestor;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuditPhase {
    #[default]
    Idle,
    WarnMissingCredential,
    WarnMissingText,
    Requesting,
    Rendered(ReportView),
    ErrorShown(String),
}

impl AuditPhase {
    /// Notice to show for this phase, if it is a warning or an error
    pub fn notice(&self) -> Option<Notice> {
        match self {
            AuditPhase::WarnMissingCredential => Some(Notice::new(
                Tone::Warning,
                AuditError::MissingCredential.to_string(),
            )),
            AuditPhase::WarnMissingText => Some(Notice::new(
                Tone::Warning,
                AuditError::MissingContractText.to_string(),
            )),
            AuditPhase::ErrorShown(message) => Some(Notice::new(
                Tone::Error,
                AuditError::AuditRequestFailure(message.clone()).to_string(),
            )),
            AuditPhase::Idle | AuditPhase::Requesting | AuditPhase::Rendered(_) => None,
        }
    }
}

/// Holds the single current result of one user's audit runs
#[derive(Debug, Default)]
pub struct AuditSession {
    phase: AuditPhase,
}

impl AuditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &AuditPhase {
        &self.phase
    }

    /// Currently rendered report, if the last run succeeded
    pub fn report(&self) -> Option<&ReportView> {
        match &self.phase {
            AuditPhase::Rendered(view) => Some(view),
            _ => None,
        }
    }

    /// Check the credential on its own, before any contract input is
    /// decoded. A blank credential moves the run to `WarnMissingCredential`.
    pub fn require_credential(&mut self, credential: &str) -> Result<(), AuditError> {
        if credential.trim().is_empty() {
            warn!("Audit triggered without a credential");
            self.phase = AuditPhase::WarnMissingCredential;
            return Err(AuditError::MissingCredential);
        }
        Ok(())
    }

    /// Run one audit.
    ///
    /// The credential is checked before the contract text, and the
    /// requestor is called at most once, only when both are present.
    pub async fn trigger(
        &mut self,
        requestor: &dyn AuditRequestor,
        credential: &str,
        contract_text: Option<&str>,
    ) -> Result<ReportView, AuditError> {
        self.phase = AuditPhase::Idle;
        self.require_credential(credential)?;

        // Whitespace-only text is the same as no text
        let Some(text) = contract_text.filter(|t| !t.trim().is_empty()) else {
            warn!("Audit triggered without contract text");
            self.phase = AuditPhase::WarnMissingText;
            return Err(AuditError::MissingContractText);
        };

        self.phase = AuditPhase::Requesting;
        info!("Audit requested: {} chars", text.chars().count());

        match requestor.request_audit(text, credential).await {
            Ok(report) => {
                let view = ReportView::from_report(&report);
                info!(
                    "Audit rendered: {} critical, {} attention, {} conformant",
                    view.critical.len(),
                    view.attention.len(),
                    view.conformant_topics.len()
                );
                self.phase = AuditPhase::Rendered(view.clone());
                Ok(view)
            }
            Err(e) => {
                error!("Audit request failed: {}", e);
                let message = e.to_string();
                self.phase = AuditPhase::ErrorShown(message.clone());
                Err(AuditError::AuditRequestFailure(message))
            }
        }
    }
}
