use async_trait::async_trait;
use shared_types::AuditReport;

use crate::error::RequestError;

/// Anything that can turn contract text into an [`AuditReport`].
///
/// One call is one outbound request: no retry, caching or deduplication.
/// The credential is only borrowed for the duration of the call.
#[async_trait]
pub trait AuditRequestor: Send + Sync {
    async fn request_audit(
        &self,
        contract_text: &str,
        credential: &str,
    ) -> Result<AuditReport, RequestError>;
}
