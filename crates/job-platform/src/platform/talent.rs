use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::attributes::is_valid_key;
use super::domain::{JobPosting, ProjectScope};
use super::provider::{JobSearchProvider, ProviderFailure, ProviderMatch};
use super::query::{AttributeFilters, SearchMode, SearchQuery};

/// Connection settings for the Cloud Talent Solution REST API.
#[derive(Debug, Clone)]
pub struct TalentConfig {
    pub endpoint: String,
    pub access_token: Option<String>,
    pub timeout: Duration,
    pub request_domain: String,
}

/// [`JobSearchProvider`] backed by the Cloud Talent Solution v4 REST API.
///
/// Uses the blocking reqwest client; callers on an async runtime must invoke
/// it from a blocking context.
pub struct TalentRestProvider {
    client: reqwest::blocking::Client,
    config: TalentConfig,
}

impl std::fmt::Debug for TalentRestProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TalentRestProvider")
            .field("endpoint", &self.config.endpoint)
            .finish_non_exhaustive()
    }
}

impl TalentRestProvider {
    pub fn new(config: TalentConfig) -> Result<Self, ProviderFailure> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| ProviderFailure::Unavailable(err.to_string()))?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.endpoint.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ProviderFailure>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(token) = &self.config.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(transport_failure)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(transport_failure)?;
        decode_response(status, &body)
    }
}

/// Non-2xx statuses become `Rejected`; a 2xx body that does not decode as `R`
/// is `Malformed`.
fn decode_response<R: DeserializeOwned>(status: u16, body: &str) -> Result<R, ProviderFailure> {
    if !(200..300).contains(&status) {
        return Err(ProviderFailure::Rejected {
            status,
            message: body.trim().to_string(),
        });
    }

    serde_json::from_str(body).map_err(|err| ProviderFailure::Malformed(err.to_string()))
}

fn transport_failure(err: reqwest::Error) -> ProviderFailure {
    if err.is_timeout() {
        ProviderFailure::Timeout(err.to_string())
    } else if err.is_decode() {
        ProviderFailure::Malformed(err.to_string())
    } else {
        ProviderFailure::Unavailable(err.to_string())
    }
}

impl JobSearchProvider for TalentRestProvider {
    fn create_tenant(
        &self,
        project: &ProjectScope,
        external_id: &str,
    ) -> Result<String, ProviderFailure> {
        let created: CreatedResource = self.post(
            &format!("{}/tenants", project.path()),
            &TenantPayload { external_id },
        )?;
        Ok(created.name)
    }

    fn create_company(
        &self,
        tenant_path: &str,
        display_name: &str,
        external_id: &str,
    ) -> Result<String, ProviderFailure> {
        let created: CreatedResource = self.post(
            &format!("{tenant_path}/companies"),
            &CompanyPayload {
                display_name,
                external_id,
            },
        )?;
        Ok(created.name)
    }

    fn create_job(
        &self,
        tenant_path: &str,
        company_path: &str,
        job: &JobPosting,
    ) -> Result<String, ProviderFailure> {
        let created: CreatedResource = self.post(
            &format!("{tenant_path}/jobs"),
            &JobPayload::new(company_path, job),
        )?;
        Ok(created.name)
    }

    fn search_jobs(
        &self,
        tenant_path: &str,
        query: &SearchQuery,
    ) -> Result<Vec<ProviderMatch>, ProviderFailure> {
        let payload = SearchPayload::new(&self.config.request_domain, query)?;
        let response: SearchResponsePayload =
            self.post(&format!("{tenant_path}/jobs:search"), &payload)?;
        Ok(response.matching_jobs)
    }
}

#[derive(Debug, Deserialize)]
struct CreatedResource {
    name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TenantPayload<'a> {
    external_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompanyPayload<'a> {
    display_name: &'a str,
    external_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JobPayload<'a> {
    company: &'a str,
    title: &'a str,
    description: &'a str,
    language_code: &'a str,
    addresses: &'a [String],
    job_benefits: Vec<&'static str>,
    posting_region: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    application_info: Option<ApplicationInfoPayload<'a>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    custom_attributes: BTreeMap<&'a str, CustomAttributePayload<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    requisition_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    posting_publish_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    posting_expire_time: Option<DateTime<Utc>>,
}

impl<'a> JobPayload<'a> {
    fn new(company: &'a str, job: &'a JobPosting) -> Self {
        Self {
            company,
            title: &job.title,
            description: &job.description,
            language_code: &job.language_code,
            addresses: &job.addresses,
            job_benefits: job.benefits.iter().map(|benefit| benefit.as_str()).collect(),
            posting_region: job.posting_region.as_str(),
            application_info: job.application_info.as_ref().map(|info| ApplicationInfoPayload {
                emails: &info.emails,
                instruction: info.instruction.as_deref(),
                uris: &info.uris,
            }),
            custom_attributes: job
                .custom_attributes
                .iter()
                .map(|attribute| {
                    (
                        attribute.name.as_str(),
                        CustomAttributePayload {
                            string_values: &attribute.string_values,
                            filterable: attribute.filterable,
                        },
                    )
                })
                .collect(),
            requisition_id: job.requisition_id.as_deref(),
            posting_publish_time: job.posting_publish_time,
            posting_expire_time: job.posting_expire_time,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApplicationInfoPayload<'a> {
    #[serde(skip_serializing_if = "no_entries")]
    emails: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    instruction: Option<&'a str>,
    #[serde(skip_serializing_if = "no_entries")]
    uris: &'a [String],
}

fn no_entries(entries: &&[String]) -> bool {
    entries.is_empty()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CustomAttributePayload<'a> {
    string_values: &'a [String],
    filterable: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchPayload<'a> {
    request_metadata: RequestMetadata<'a>,
    search_mode: SearchMode,
    job_query: JobQueryPayload<'a>,
}

impl<'a> SearchPayload<'a> {
    fn new(domain: &'a str, query: &'a SearchQuery) -> Result<Self, ProviderFailure> {
        Ok(Self {
            request_metadata: RequestMetadata {
                domain,
                session_id: "anonymous",
                user_id: "anonymous",
            },
            search_mode: query.mode,
            job_query: JobQueryPayload {
                query: &query.text,
                location_filters: query
                    .location_filter
                    .as_deref()
                    .map(|address| vec![LocationFilterPayload { address }])
                    .unwrap_or_default(),
                custom_attribute_filter: custom_attribute_filter(&query.attribute_filters)?,
            },
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestMetadata<'a> {
    domain: &'a str,
    session_id: &'a str,
    user_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JobQueryPayload<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    location_filters: Vec<LocationFilterPayload<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_attribute_filter: Option<String>,
}

#[derive(Debug, Serialize)]
struct LocationFilterPayload<'a> {
    address: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SearchResponsePayload {
    matching_jobs: Vec<ProviderMatch>,
}

/// `name = "value"` clauses joined with `AND`, in name order.
///
/// Names must be valid attribute keys since they are written unquoted; values
/// are quoted with `\` and `"` escaped.
fn custom_attribute_filter(filters: &AttributeFilters) -> Result<Option<String>, ProviderFailure> {
    if filters.is_empty() {
        return Ok(None);
    }

    let clauses = filters
        .iter()
        .map(|(name, constraint)| {
            if !is_valid_key(name) {
                return Err(ProviderFailure::Rejected {
                    status: 400,
                    message: format!("attribute filter name '{name}' is not a valid attribute key"),
                });
            }
            Ok(format!("{name} = \"{}\"", quote_filter_value(constraint)))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(clauses.join(" AND ")))
}

fn quote_filter_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
