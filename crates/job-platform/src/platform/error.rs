use std::fmt;

use super::provider::ProviderFailure;

/// Caller-supplied data violated a documented precondition. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title required")]
    MissingTitle,
    #[error("description required")]
    MissingDescription,
    #[error("{field} required")]
    MissingField { field: &'static str },
    #[error("address at position {index} must not be blank")]
    EmptyAddress { index: usize },
    #[error("attribute name required")]
    MissingAttributeName,
    #[error(
        "attribute name '{name}' must start with a letter and contain only letters, digits, or underscores"
    )]
    MalformedAttributeName { name: String },
    #[error("attribute '{name}' requires at least one value")]
    EmptyAttributeValues { name: String },
    #[error("attribute '{name}' contains a blank value")]
    BlankAttributeValue { name: String },
    #[error("attribute '{name}' is defined more than once")]
    DuplicateAttribute { name: String },
    #[error("unknown job benefit '{0}'")]
    UnknownBenefit(String),
    #[error("unknown posting region '{0}'")]
    UnknownPostingRegion(String),
    #[error("application info {field} entries must not be blank")]
    InvalidApplicationInfo { field: &'static str },
    #[error("{field} must be an RFC 3339 timestamp (found '{value}')")]
    InvalidTimestamp { field: &'static str, value: String },
    #[error("posting must expire after it is published")]
    InvalidPostingWindow,
    #[error("search query text required")]
    EmptyQuery,
}

/// An operation was invoked out of its required order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("tenant already registered")]
    TenantAlreadyRegistered,
    #[error("tenant must be registered first")]
    TenantNotRegistered,
    #[error("company already registered")]
    CompanyAlreadyRegistered,
    #[error("company must be registered first")]
    CompanyNotRegistered,
}

/// Provider call that failed, used to give a `ProviderError` its context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderOperation {
    CreateTenant,
    CreateCompany,
    CreateJob,
    SearchJobs,
}

impl ProviderOperation {
    pub const fn label(self) -> &'static str {
        match self {
            ProviderOperation::CreateTenant => "create tenant",
            ProviderOperation::CreateCompany => "create company",
            ProviderOperation::CreateJob => "create job",
            ProviderOperation::SearchJobs => "search jobs",
        }
    }
}

impl fmt::Display for ProviderOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The external provider failed or timed out.
///
/// Carries the operation and the entity path involved so callers can decide
/// on retry/backoff; the underlying failure is kept as the error source.
#[derive(Debug, thiserror::Error)]
#[error("{operation} failed for '{entity}': {source}")]
pub struct ProviderError {
    pub operation: ProviderOperation,
    pub entity: String,
    pub retryable: bool,
    #[source]
    pub source: ProviderFailure,
}

impl ProviderError {
    pub fn new(
        operation: ProviderOperation,
        entity: impl Into<String>,
        source: ProviderFailure,
    ) -> Self {
        Self {
            operation,
            entity: entity.into(),
            retryable: source.is_retryable(),
            source,
        }
    }
}

/// Error returned by every facade operation.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl PlatformError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, PlatformError::Provider(err) if err.retryable)
    }
}
