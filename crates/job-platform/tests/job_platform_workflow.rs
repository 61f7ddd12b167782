use std::sync::{Arc, Mutex};

use job_platform::platform::{
    JobCsvImporter, JobPlatform, JobPosting, JobRequest, JobSearchProvider, MatchedJob,
    PlatformError, PrimaryLocation, ProjectScope, ProviderFailure, ProviderMatch, SearchQuery,
    StateError, ValidationError,
};

/// Keeps posted jobs and answers searches by title substring.
#[derive(Default)]
struct CatalogProvider {
    jobs: Mutex<Vec<(String, JobPosting)>>,
}

impl JobSearchProvider for CatalogProvider {
    fn create_tenant(
        &self,
        project: &ProjectScope,
        external_id: &str,
    ) -> Result<String, ProviderFailure> {
        Ok(format!("{}/tenants/{external_id}", project.path()))
    }

    fn create_company(
        &self,
        tenant_path: &str,
        _display_name: &str,
        external_id: &str,
    ) -> Result<String, ProviderFailure> {
        Ok(format!("{tenant_path}/companies/{external_id}"))
    }

    fn create_job(
        &self,
        tenant_path: &str,
        company_path: &str,
        job: &JobPosting,
    ) -> Result<String, ProviderFailure> {
        let mut jobs = self.jobs.lock().expect("catalog mutex poisoned");
        jobs.push((company_path.to_string(), job.clone()));
        Ok(format!("{tenant_path}/jobs/{}", jobs.len()))
    }

    fn search_jobs(
        &self,
        _tenant_path: &str,
        query: &SearchQuery,
    ) -> Result<Vec<ProviderMatch>, ProviderFailure> {
        let needle = query.text.to_lowercase();
        let jobs = self.jobs.lock().expect("catalog mutex poisoned");
        Ok(jobs
            .iter()
            .filter(|(_, job)| {
                job.title.to_lowercase().contains(&needle)
                    || job.description.to_lowercase().contains(&needle)
            })
            .map(|(company, job)| ProviderMatch {
                job: MatchedJob {
                    title: job.title.clone(),
                    company: company.clone(),
                    description: job.description.clone(),
                    addresses: job.addresses.clone(),
                },
            })
            .collect())
    }
}

fn platform() -> JobPlatform<CatalogProvider> {
    JobPlatform::new(
        Arc::new(CatalogProvider::default()),
        ProjectScope::new("idc-integration"),
    )
}

#[test]
fn registration_posting_and_search_round_trip() {
    let mut platform = platform();
    let tenant = platform
        .create_tenant("indigenous-job-platform")
        .expect("tenant registers");
    let company = platform
        .create_company("Indigenous Development Corp", "idc-001")
        .expect("company registers");

    let request: JobRequest = serde_json::from_value(serde_json::json!({
        "title": "Cultural Program Manager",
        "description": "Managing cultural programs and events that celebrate Indigenous heritage.",
        "addresses": ["Toronto, ON, Canada"],
        "benefits": ["PAID_TIME_OFF", "HEALTH_INSURANCE"],
        "custom_attributes": {
            "indigenous_focused": { "string_values": ["true"], "filterable": true }
        }
    }))
    .expect("request deserializes");

    let posting = platform.post_job(&company, request).expect("job posts");
    assert_eq!(
        posting.provider_path.as_deref(),
        Some("projects/idc-integration/tenants/indigenous-job-platform/jobs/1")
    );

    let results = platform
        .search_jobs(&tenant, "cultural", Some("Canada"))
        .expect("search succeeds");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].company_ref, company.provider_path);
    assert_eq!(
        results[0].primary_location,
        PrimaryLocation::Address("Toronto, ON, Canada".to_string())
    );
}

#[test]
fn posting_requires_registration_order() {
    let mut platform = platform();
    assert!(matches!(
        platform.create_company("Indigenous Development Corp", "idc-001"),
        Err(PlatformError::State(StateError::TenantNotRegistered))
    ));
    assert!(matches!(
        platform.registry().company(),
        Err(StateError::CompanyNotRegistered)
    ));
}

#[test]
fn csv_export_posts_every_valid_row() {
    let data = include_bytes!("../sample_jobs.csv");
    let requests = JobCsvImporter::from_reader(&data[..]).expect("export parses");
    assert_eq!(requests.len(), 4);

    let mut platform = platform();
    let tenant = platform
        .create_tenant("indigenous-job-platform")
        .expect("tenant registers");
    let company = platform
        .create_company("Indigenous Development Corp", "idc-001")
        .expect("company registers");

    let outcomes = platform.post_jobs(&company, requests);
    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 3);
    assert!(matches!(
        outcomes[3],
        Err(PlatformError::Validation(ValidationError::MissingTitle))
    ));

    let coordinator = outcomes[2].as_ref().expect("coordinator posts");
    assert_eq!(coordinator.addresses[0], "Remote");
    let nation = coordinator
        .custom_attributes
        .get("nation")
        .expect("nation attribute kept");
    assert_eq!(nation.string_values, vec!["Anishinaabe", "Cree"]);

    let results = platform
        .search_jobs(&tenant, "Indigenous", None)
        .expect("search succeeds");
    assert_eq!(results.len(), 2);
}
