use std::sync::Arc;

use tracing::{info, warn};

use super::builder::{JobBuilder, JobRequest};
use super::domain::{CompanyRef, JobPosting, ProjectScope, TenantRef};
use super::error::{PlatformError, ProviderError, ProviderOperation};
use super::provider::JobSearchProvider;
use super::query::{translate, AttributeFilters, SearchQuery};
use super::registry::EntityRegistry;
use super::results::{map_results, SearchResultItem};

/// Entry point for the presentation layer.
///
/// Caller input is validated locally before the provider is contacted, and
/// provider failures come back as [`ProviderError`] with the cause attached.
pub struct JobPlatform<P: ?Sized> {
    registry: EntityRegistry,
    provider: Arc<P>,
}

impl<P> JobPlatform<P>
where
    P: JobSearchProvider + ?Sized,
{
    pub fn new(provider: Arc<P>, project: ProjectScope) -> Self {
        Self {
            registry: EntityRegistry::new(project),
            provider,
        }
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn create_tenant(&mut self, external_id: &str) -> Result<TenantRef, PlatformError> {
        self.registry
            .register_tenant(&*self.provider, external_id)
    }

    pub fn create_company(
        &mut self,
        display_name: &str,
        external_id: &str,
    ) -> Result<CompanyRef, PlatformError> {
        self.registry
            .register_company(&*self.provider, display_name, external_id)
    }

    /// Build, submit, and return the posting with its provider path.
    pub fn post_job(
        &self,
        company: &CompanyRef,
        request: JobRequest,
    ) -> Result<JobPosting, PlatformError> {
        let posting = JobBuilder::build(request)?;

        let job_path = self
            .provider
            .create_job(&company.tenant_path, &company.provider_path, &posting)
            .map_err(|source| {
                warn!(company = %company.provider_path, title = %posting.title, error = %source, "job creation failed");
                ProviderError::new(
                    ProviderOperation::CreateJob,
                    company.provider_path.as_str(),
                    source,
                )
            })?;

        info!(job = %job_path, "created job");
        Ok(posting.with_provider_path(job_path))
    }

    /// Post each request independently; a failure does not stop the batch.
    pub fn post_jobs<I>(
        &self,
        company: &CompanyRef,
        requests: I,
    ) -> Vec<Result<JobPosting, PlatformError>>
    where
        I: IntoIterator<Item = JobRequest>,
    {
        requests
            .into_iter()
            .map(|request| self.post_job(company, request))
            .collect()
    }

    pub fn search_jobs(
        &self,
        tenant: &TenantRef,
        text: &str,
        location: Option<&str>,
    ) -> Result<Vec<SearchResultItem>, PlatformError> {
        self.search_with_filters(tenant, text, location, None)
    }

    pub fn search_with_filters(
        &self,
        tenant: &TenantRef,
        text: &str,
        location: Option<&str>,
        filters: Option<AttributeFilters>,
    ) -> Result<Vec<SearchResultItem>, PlatformError> {
        let query = translate(text, location, filters)?;
        self.run_search(tenant, &query)
    }

    /// Run an already translated query, e.g. one switched to featured-job mode.
    pub fn run_search(
        &self,
        tenant: &TenantRef,
        query: &SearchQuery,
    ) -> Result<Vec<SearchResultItem>, PlatformError> {
        let matches = self
            .provider
            .search_jobs(&tenant.provider_path, query)
            .map_err(|source| {
                warn!(tenant = %tenant.provider_path, query = %query.text, error = %source, "job search failed");
                ProviderError::new(
                    ProviderOperation::SearchJobs,
                    tenant.provider_path.as_str(),
                    source,
                )
            })?;

        let results: Vec<SearchResultItem> = map_results(&matches).into_iter().collect();
        info!(
            tenant = %tenant.provider_path,
            query = %query.text,
            mode = ?query.mode,
            matches = results.len(),
            "searched jobs"
        );
        Ok(results)
    }
}
