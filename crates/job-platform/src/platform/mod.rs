//! Tenant, company, and job posting management on top of an external
//! job-search provider.
//!
//! Validation, query translation, and result mapping happen locally; the
//! provider is reached only through [`JobSearchProvider`].

pub mod attributes;
pub mod builder;
pub mod domain;
pub mod error;
pub mod facade;
pub mod import;
pub mod provider;
pub mod query;
pub mod registry;
pub mod results;
pub mod router;
pub mod talent;

#[cfg(test)]
mod tests;

pub use attributes::{AttributeValue, CustomAttributes};
pub use builder::{ApplicationInfoRequest, AttributeRequest, JobBuilder, JobRequest};
pub use domain::{
    ApplicationInfo, CompanyRef, JobBenefit, JobPosting, PostingRegion, ProjectScope, TenantRef,
    DEFAULT_LANGUAGE_CODE,
};
pub use error::{PlatformError, ProviderError, ProviderOperation, StateError, ValidationError};
pub use facade::JobPlatform;
pub use import::{JobCsvImporter, JobImportError};
pub use provider::{JobSearchProvider, MatchedJob, ProviderFailure, ProviderMatch};
pub use query::{translate, AttributeFilters, SearchMode, SearchQuery};
pub use registry::EntityRegistry;
pub use results::{map_results, MappedResults, PrimaryLocation, SearchResultItem};
pub use router::{platform_router, SearchRequest};
pub use talent::{TalentConfig, TalentRestProvider};
