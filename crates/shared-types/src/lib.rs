//! Data contract between the audit UI and the structured-output LLM.
//!
//! The model is asked to return exactly one [`AuditReport`]; everything the
//! presenter renders is derived from it.

pub mod error;
pub mod schema;
pub mod types;

pub use error::SchemaError;
pub use schema::{audit_report_schema, decode_report, validate_report_value, SCHEMA_NAME};
pub use types::{AuditReport, ContractSummary, RiskItem, RiskLevel};
