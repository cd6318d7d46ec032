//! Lease audit engine
//!
//! - [`requestor`]: the seam to the structured-output LLM, with the
//!   OpenAI-backed implementation in [`openai`]
//! - [`present`]: groups the returned findings by severity and builds the
//!   view model the shell renders
//! - [`session`]: the per-run state machine tying validation, the request
//!   and the rendered result together

pub mod error;
pub mod openai;
pub mod present;
pub mod prompt;
pub mod requestor;
pub mod session;

pub use error::{AuditError, RequestError};
pub use openai::OpenAiRequestor;
pub use present::{partition_risks, ReportView, RiskGroups};
pub use requestor::AuditRequestor;
pub use session::{AuditPhase, AuditSession};
