use job_platform::config::{AppConfig, ProviderConfig, ProviderKind};
use job_platform::error::AppError;
use job_platform::platform::{
    JobPlatform, JobPosting, JobSearchProvider, MatchedJob, ProjectScope, ProviderFailure,
    ProviderMatch, SearchQuery, TalentRestProvider,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

pub(crate) type SharedPlatform = JobPlatform<dyn JobSearchProvider>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Local stand-in for the hosted provider. Jobs live for the life of the
/// process and are searched with plain substring matching.
#[derive(Default, Clone)]
pub(crate) struct InMemoryJobSearchProvider {
    catalog: Arc<Mutex<Catalog>>,
}

#[derive(Default)]
struct Catalog {
    next_id: u64,
    tenants: HashMap<String, String>,
    companies: HashMap<String, String>,
    jobs: Vec<StoredJob>,
}

impl Catalog {
    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

struct StoredJob {
    tenant_path: String,
    company_path: String,
    posting: JobPosting,
}

impl StoredJob {
    fn matches(&self, query: &SearchQuery) -> bool {
        let text = query.text.to_lowercase();
        let text_hit = self.posting.title.to_lowercase().contains(&text)
            || self.posting.description.to_lowercase().contains(&text);

        let location_hit = query.location_filter.as_ref().map_or(true, |location| {
            let location = location.to_lowercase();
            self.posting
                .addresses
                .iter()
                .any(|address| address.to_lowercase().contains(&location))
        });

        let attributes_hit = query.attribute_filters.iter().all(|(name, expected)| {
            self.posting
                .custom_attributes
                .get(name)
                .map_or(false, |attribute| {
                    attribute.filterable
                        && attribute.string_values.iter().any(|value| value == expected)
                })
        });

        text_hit && location_hit && attributes_hit
    }
}

fn rejected(status: u16, message: String) -> ProviderFailure {
    ProviderFailure::Rejected { status, message }
}

impl JobSearchProvider for InMemoryJobSearchProvider {
    fn create_tenant(
        &self,
        project: &ProjectScope,
        external_id: &str,
    ) -> Result<String, ProviderFailure> {
        let mut catalog = self.catalog.lock().expect("catalog mutex poisoned");
        if catalog.tenants.values().any(|existing| existing == external_id) {
            return Err(rejected(409, format!("tenant '{external_id}' already exists")));
        }
        let path = format!("{}/tenants/{}", project.path(), catalog.allocate());
        catalog.tenants.insert(path.clone(), external_id.to_string());
        Ok(path)
    }

    fn create_company(
        &self,
        tenant_path: &str,
        _display_name: &str,
        external_id: &str,
    ) -> Result<String, ProviderFailure> {
        let mut catalog = self.catalog.lock().expect("catalog mutex poisoned");
        if !catalog.tenants.contains_key(tenant_path) {
            return Err(rejected(404, format!("tenant '{tenant_path}' not found")));
        }
        let path = format!("{tenant_path}/companies/{}", catalog.allocate());
        catalog
            .companies
            .insert(path.clone(), external_id.to_string());
        Ok(path)
    }

    fn create_job(
        &self,
        tenant_path: &str,
        company_path: &str,
        job: &JobPosting,
    ) -> Result<String, ProviderFailure> {
        let mut catalog = self.catalog.lock().expect("catalog mutex poisoned");
        if !catalog.companies.contains_key(company_path) {
            return Err(rejected(404, format!("company '{company_path}' not found")));
        }
        let path = format!("{tenant_path}/jobs/{}", catalog.allocate());
        catalog.jobs.push(StoredJob {
            tenant_path: tenant_path.to_string(),
            company_path: company_path.to_string(),
            posting: job.clone(),
        });
        Ok(path)
    }

    fn search_jobs(
        &self,
        tenant_path: &str,
        query: &SearchQuery,
    ) -> Result<Vec<ProviderMatch>, ProviderFailure> {
        let catalog = self.catalog.lock().expect("catalog mutex poisoned");
        Ok(catalog
            .jobs
            .iter()
            .filter(|job| job.tenant_path == tenant_path && job.matches(query))
            .map(|job| ProviderMatch {
                job: MatchedJob {
                    title: job.posting.title.clone(),
                    company: job.company_path.clone(),
                    description: job.posting.description.clone(),
                    addresses: job.posting.addresses.clone(),
                },
            })
            .collect())
    }
}

/// Must run off the async workers: the hosted provider uses a blocking client.
pub(crate) fn build_provider(
    config: &ProviderConfig,
) -> Result<Arc<dyn JobSearchProvider>, AppError> {
    match config.kind {
        ProviderKind::Memory => Ok(Arc::new(InMemoryJobSearchProvider::default())),
        ProviderKind::Talent => Ok(Arc::new(TalentRestProvider::new(config.talent())?)),
    }
}

/// Builds the platform and registers the configured tenant and company.
pub(crate) fn bootstrap(config: &AppConfig) -> Result<SharedPlatform, AppError> {
    let provider = build_provider(&config.provider)?;
    let mut platform: SharedPlatform = JobPlatform::new(provider, config.provider.project());

    let tenant = platform.create_tenant(&config.platform.tenant_external_id)?;
    let company = platform.create_company(
        &config.platform.company_name,
        &config.platform.company_external_id,
    )?;
    info!(tenant = %tenant.provider_path, company = %company.provider_path, "platform registered");

    Ok(platform)
}
