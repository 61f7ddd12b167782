use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::attributes::CustomAttributes;

/// Locale applied to postings that do not declare one.
pub const DEFAULT_LANGUAGE_CODE: &str = "en-US";

/// Provider project that owns the tenant (`projects/{project_id}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectScope {
    pub project_id: String,
}

impl ProjectScope {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
        }
    }

    pub fn path(&self) -> String {
        format!("projects/{}", self.project_id)
    }
}

/// Isolated recruiting namespace created by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantRef {
    pub external_id: String,
    pub provider_path: String,
}

/// Employer record scoped to exactly one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRef {
    pub display_name: String,
    pub external_id: String,
    pub provider_path: String,
    pub tenant_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobBenefit {
    ChildCare,
    Dental,
    DomesticPartner,
    FlexibleHours,
    HealthInsurance,
    LifeInsurance,
    Medical,
    PaidTimeOff,
    ParentalLeave,
    RetirementPlan,
    SickDays,
    Vacation,
    Vision,
}

impl JobBenefit {
    pub const ALL: [JobBenefit; 13] = [
        JobBenefit::ChildCare,
        JobBenefit::Dental,
        JobBenefit::DomesticPartner,
        JobBenefit::FlexibleHours,
        JobBenefit::HealthInsurance,
        JobBenefit::LifeInsurance,
        JobBenefit::Medical,
        JobBenefit::PaidTimeOff,
        JobBenefit::ParentalLeave,
        JobBenefit::RetirementPlan,
        JobBenefit::SickDays,
        JobBenefit::Vacation,
        JobBenefit::Vision,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            JobBenefit::ChildCare => "CHILD_CARE",
            JobBenefit::Dental => "DENTAL",
            JobBenefit::DomesticPartner => "DOMESTIC_PARTNER",
            JobBenefit::FlexibleHours => "FLEXIBLE_HOURS",
            JobBenefit::HealthInsurance => "HEALTH_INSURANCE",
            JobBenefit::LifeInsurance => "LIFE_INSURANCE",
            JobBenefit::Medical => "MEDICAL",
            JobBenefit::PaidTimeOff => "PAID_TIME_OFF",
            JobBenefit::ParentalLeave => "PARENTAL_LEAVE",
            JobBenefit::RetirementPlan => "RETIREMENT_PLAN",
            JobBenefit::SickDays => "SICK_DAYS",
            JobBenefit::Vacation => "VACATION",
            JobBenefit::Vision => "VISION",
        }
    }

    /// Accepts `PAID_TIME_OFF`, `paid-time-off`, or `Paid time off`.
    pub fn parse(raw: &str) -> Option<Self> {
        let key = normalize_enum_key(raw);
        Self::ALL
            .into_iter()
            .find(|benefit| benefit.as_str() == key)
    }
}

impl fmt::Display for JobBenefit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geographic reach of a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostingRegion {
    AdministrativeArea,
    #[default]
    Nation,
    Telecommute,
}

impl PostingRegion {
    pub const fn as_str(self) -> &'static str {
        match self {
            PostingRegion::AdministrativeArea => "ADMINISTRATIVE_AREA",
            PostingRegion::Nation => "NATION",
            PostingRegion::Telecommute => "TELECOMMUTE",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match normalize_enum_key(raw).as_str() {
            "ADMINISTRATIVE_AREA" => Some(PostingRegion::AdministrativeArea),
            "NATION" => Some(PostingRegion::Nation),
            "TELECOMMUTE" => Some(PostingRegion::Telecommute),
            _ => None,
        }
    }
}

fn normalize_enum_key(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

/// How candidates apply to a posting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationInfo {
    pub emails: Vec<String>,
    pub instruction: Option<String>,
    pub uris: Vec<String>,
}

/// Canonical, validated job posting.
///
/// Only [`JobBuilder`](super::JobBuilder) produces these; `provider_path` is
/// filled in once the provider accepts the job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobPosting {
    pub title: String,
    pub description: String,
    pub language_code: String,
    pub addresses: Vec<String>,
    pub benefits: BTreeSet<JobBenefit>,
    pub posting_region: PostingRegion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_info: Option<ApplicationInfo>,
    pub custom_attributes: CustomAttributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requisition_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posting_publish_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posting_expire_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_path: Option<String>,
}

impl JobPosting {
    pub(crate) fn with_provider_path(self, provider_path: String) -> Self {
        Self {
            provider_path: Some(provider_path),
            ..self
        }
    }
}
