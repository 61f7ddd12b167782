use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::platform::builder::{AttributeRequest, JobRequest};
use crate::platform::domain::{CompanyRef, JobPosting, ProjectScope, TenantRef};
use crate::platform::facade::JobPlatform;
use crate::platform::provider::{JobSearchProvider, MatchedJob, ProviderFailure, ProviderMatch};
use crate::platform::query::SearchQuery;

/// Provider double that records every call it receives.
#[derive(Default)]
pub(super) struct RecordingProvider {
    calls: Mutex<Vec<String>>,
    jobs: Mutex<Vec<(String, JobPosting)>>,
    queries: Mutex<Vec<SearchQuery>>,
    matches: Mutex<Vec<ProviderMatch>>,
    failure: Mutex<Option<ProviderFailure>>,
}

impl RecordingProvider {
    pub(super) fn with_matches(matches: Vec<ProviderMatch>) -> Self {
        let provider = Self::default();
        *provider.matches.lock().expect("matches mutex poisoned") = matches;
        provider
    }

    /// Every later call fails with `failure` until cleared.
    pub(super) fn fail_with(&self, failure: ProviderFailure) {
        *self.failure.lock().expect("failure mutex poisoned") = Some(failure);
    }

    pub(super) fn recover(&self) {
        *self.failure.lock().expect("failure mutex poisoned") = None;
    }

    pub(super) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    pub(super) fn jobs(&self) -> Vec<(String, JobPosting)> {
        self.jobs.lock().expect("jobs mutex poisoned").clone()
    }

    pub(super) fn queries(&self) -> Vec<SearchQuery> {
        self.queries.lock().expect("queries mutex poisoned").clone()
    }

    fn record(&self, call: String) -> Result<(), ProviderFailure> {
        self.calls.lock().expect("calls mutex poisoned").push(call);
        match self.failure.lock().expect("failure mutex poisoned").clone() {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }
}

impl JobSearchProvider for RecordingProvider {
    fn create_tenant(
        &self,
        project: &ProjectScope,
        external_id: &str,
    ) -> Result<String, ProviderFailure> {
        self.record(format!("create_tenant:{external_id}"))?;
        Ok(format!("{}/tenants/{external_id}", project.path()))
    }

    fn create_company(
        &self,
        tenant_path: &str,
        display_name: &str,
        external_id: &str,
    ) -> Result<String, ProviderFailure> {
        self.record(format!("create_company:{display_name}"))?;
        Ok(format!("{tenant_path}/companies/{external_id}"))
    }

    fn create_job(
        &self,
        tenant_path: &str,
        company_path: &str,
        job: &JobPosting,
    ) -> Result<String, ProviderFailure> {
        self.record(format!("create_job:{}", job.title))?;
        let mut jobs = self.jobs.lock().expect("jobs mutex poisoned");
        jobs.push((company_path.to_string(), job.clone()));
        Ok(format!("{tenant_path}/jobs/{}", jobs.len()))
    }

    fn search_jobs(
        &self,
        _tenant_path: &str,
        query: &SearchQuery,
    ) -> Result<Vec<ProviderMatch>, ProviderFailure> {
        self.record(format!("search_jobs:{}", query.text))?;
        self.queries
            .lock()
            .expect("queries mutex poisoned")
            .push(query.clone());
        Ok(self.matches.lock().expect("matches mutex poisoned").clone())
    }
}

pub(super) fn project() -> ProjectScope {
    ProjectScope::new("idc-test")
}

pub(super) fn platform_with(provider: Arc<RecordingProvider>) -> JobPlatform<RecordingProvider> {
    JobPlatform::new(provider, project())
}

/// Platform with the tenant and company already created.
pub(super) fn registered_platform(
    provider: Arc<RecordingProvider>,
) -> (JobPlatform<RecordingProvider>, TenantRef, CompanyRef) {
    let mut platform = platform_with(provider);
    let tenant = platform
        .create_tenant("indigenous-job-platform")
        .expect("tenant registers");
    let company = platform
        .create_company("Indigenous Development Corp", "idc-001")
        .expect("company registers");
    (platform, tenant, company)
}

pub(super) fn liaison_request() -> JobRequest {
    JobRequest {
        title: Some("Indigenous Community Liaison".to_string()),
        description: Some("Working with Indigenous communities to support engagement.".to_string()),
        addresses: vec!["Vancouver, BC, Canada".to_string()],
        benefits: vec!["PAID_TIME_OFF".to_string(), "HEALTH_INSURANCE".to_string()],
        custom_attributes: vec![AttributeRequest {
            name: "indigenous_focused".to_string(),
            string_values: vec!["true".to_string()],
            filterable: true,
        }],
        ..JobRequest::default()
    }
}

pub(super) fn untitled_request() -> JobRequest {
    JobRequest {
        title: None,
        ..liaison_request()
    }
}

pub(super) fn canned_matches() -> Vec<ProviderMatch> {
    vec![
        ProviderMatch {
            job: MatchedJob {
                title: "Indigenous Community Liaison".to_string(),
                company: "projects/idc-test/tenants/indigenous-job-platform/companies/idc-001"
                    .to_string(),
                description: "Working with Indigenous communities.".to_string(),
                addresses: vec!["Vancouver, BC, Canada".to_string()],
            },
        },
        ProviderMatch {
            job: MatchedJob {
                title: "Remote Language Keeper".to_string(),
                company: "projects/idc-test/tenants/indigenous-job-platform/companies/idc-001"
                    .to_string(),
                description: "Supporting Indigenous language revitalization.".to_string(),
                addresses: Vec::new(),
            },
        },
    ]
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
