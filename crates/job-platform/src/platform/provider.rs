use serde::{Deserialize, Serialize};

use super::domain::{JobPosting, ProjectScope};
use super::query::SearchQuery;

/// External job-search/indexing backend.
///
/// Implementations own their transport, including timeouts; the core never
/// retries a failed call.
pub trait JobSearchProvider: Send + Sync {
    /// Returns the provider path of the new tenant.
    fn create_tenant(
        &self,
        project: &ProjectScope,
        external_id: &str,
    ) -> Result<String, ProviderFailure>;

    /// Returns the provider path of the new company.
    fn create_company(
        &self,
        tenant_path: &str,
        display_name: &str,
        external_id: &str,
    ) -> Result<String, ProviderFailure>;

    /// Returns the provider path of the new job.
    fn create_job(
        &self,
        tenant_path: &str,
        company_path: &str,
        job: &JobPosting,
    ) -> Result<String, ProviderFailure>;

    fn search_jobs(
        &self,
        tenant_path: &str,
        query: &SearchQuery,
    ) -> Result<Vec<ProviderMatch>, ProviderFailure>;
}

/// Failure reported by a provider implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderFailure {
    #[error("provider timed out: {0}")]
    Timeout(String),
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    #[error("provider rejected request (status {status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("provider response malformed: {0}")]
    Malformed(String),
}

impl ProviderFailure {
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderFailure::Timeout(_) | ProviderFailure::Unavailable(_) => true,
            ProviderFailure::Rejected { status, .. } => {
                *status == 408 || *status == 429 || *status >= 500
            }
            ProviderFailure::Malformed(_) => false,
        }
    }
}

/// One search hit as returned by the provider. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMatch {
    #[serde(default)]
    pub job: MatchedJob,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchedJob {
    pub title: String,
    pub company: String,
    pub description: String,
    pub addresses: Vec<String>,
}
