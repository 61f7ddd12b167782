use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use super::attributes::{AttributeValue, CustomAttributes};
use super::domain::{
    ApplicationInfo, JobBenefit, JobPosting, PostingRegion, DEFAULT_LANGUAGE_CODE,
};
use super::error::ValidationError;

/// Raw job-posting request as it arrives from a form, JSON body, or CSV row.
///
/// Everything is optional and loosely typed; [`JobBuilder::build`] decides
/// what is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct JobRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub addresses: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub benefits: Vec<String>,
    #[serde(deserialize_with = "deserialize_attribute_requests")]
    pub custom_attributes: Vec<AttributeRequest>,
    pub application_info: Option<ApplicationInfoRequest>,
    pub language_code: Option<String>,
    pub posting_region: Option<String>,
    pub requisition_id: Option<String>,
    pub posting_publish_time: Option<String>,
    pub posting_expire_time: Option<String>,
}

/// One entry of the `custom_attributes` map, in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRequest {
    pub name: String,
    pub string_values: Vec<String>,
    pub filterable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApplicationInfoRequest {
    #[serde(deserialize_with = "null_as_empty")]
    pub emails: Vec<String>,
    pub instruction: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub uris: Vec<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
struct AttributeBody {
    #[serde(default, alias = "stringValues", deserialize_with = "null_as_empty")]
    string_values: Vec<String>,
    #[serde(default)]
    filterable: bool,
}

// Visits the map entry by entry so repeated keys reach the attribute model
// instead of being collapsed by a map type.
fn deserialize_attribute_requests<'de, D>(deserializer: D) -> Result<Vec<AttributeRequest>, D::Error>
where
    D: Deserializer<'de>,
{
    struct AttributeMapVisitor;

    impl<'de> Visitor<'de> for AttributeMapVisitor {
        type Value = Vec<AttributeRequest>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of attribute name to { string_values, filterable }")
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut attributes = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, body)) = map.next_entry::<String, AttributeBody>()? {
                attributes.push(AttributeRequest {
                    name,
                    string_values: body.string_values,
                    filterable: body.filterable,
                });
            }
            Ok(attributes)
        }
    }

    deserializer.deserialize_any(AttributeMapVisitor)
}

/// Validates raw requests and produces canonical [`JobPosting`] values.
pub struct JobBuilder;

impl JobBuilder {
    /// Checks run in a fixed order and the first failure wins. No provider
    /// call is made here.
    pub fn build(request: JobRequest) -> Result<JobPosting, ValidationError> {
        let JobRequest {
            title,
            description,
            addresses,
            benefits,
            custom_attributes,
            application_info,
            language_code,
            posting_region,
            requisition_id,
            posting_publish_time,
            posting_expire_time,
        } = request;

        let title = optional_text(title).ok_or(ValidationError::MissingTitle)?;
        let description = optional_text(description).ok_or(ValidationError::MissingDescription)?;
        let addresses = normalize_addresses(addresses)?;
        let custom_attributes = build_attributes(custom_attributes)?;

        let benefits = benefits
            .iter()
            .map(|raw| {
                JobBenefit::parse(raw).ok_or_else(|| ValidationError::UnknownBenefit(raw.clone()))
            })
            .collect::<Result<BTreeSet<_>, _>>()?;

        let posting_region = match optional_text(posting_region) {
            Some(raw) => PostingRegion::parse(&raw)
                .ok_or(ValidationError::UnknownPostingRegion(raw))?,
            None => PostingRegion::default(),
        };

        let application_info = application_info.map(build_application_info).transpose()?.flatten();

        let posting_publish_time = parse_timestamp("posting_publish_time", posting_publish_time)?;
        let posting_expire_time = parse_timestamp("posting_expire_time", posting_expire_time)?;
        if let (Some(publish), Some(expire)) = (posting_publish_time, posting_expire_time) {
            if expire <= publish {
                return Err(ValidationError::InvalidPostingWindow);
            }
        }

        Ok(JobPosting {
            title,
            description,
            language_code: optional_text(language_code)
                .unwrap_or_else(|| DEFAULT_LANGUAGE_CODE.to_string()),
            addresses,
            benefits,
            posting_region,
            application_info,
            custom_attributes,
            requisition_id: optional_text(requisition_id),
            posting_publish_time,
            posting_expire_time,
            provider_path: None,
        })
    }
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

fn normalize_addresses(addresses: Vec<String>) -> Result<Vec<String>, ValidationError> {
    addresses
        .into_iter()
        .enumerate()
        .map(|(index, address)| {
            let trimmed = address.trim();
            if trimmed.is_empty() {
                Err(ValidationError::EmptyAddress { index })
            } else {
                Ok(trimmed.to_string())
            }
        })
        .collect()
}

fn build_attributes(requests: Vec<AttributeRequest>) -> Result<CustomAttributes, ValidationError> {
    let mut attributes = CustomAttributes::new();
    for request in requests {
        let attribute =
            AttributeValue::define(&request.name, request.string_values, request.filterable)?;
        attributes.insert(attribute)?;
    }
    Ok(attributes)
}

// An entirely empty block is treated as absent.
fn build_application_info(
    request: ApplicationInfoRequest,
) -> Result<Option<ApplicationInfo>, ValidationError> {
    let instruction = optional_text(request.instruction);
    if request.emails.is_empty() && request.uris.is_empty() && instruction.is_none() {
        return Ok(None);
    }

    let emails = non_blank_entries("emails", request.emails)?;
    let uris = non_blank_entries("uris", request.uris)?;

    Ok(Some(ApplicationInfo {
        emails,
        instruction,
        uris,
    }))
}

fn non_blank_entries(
    field: &'static str,
    entries: Vec<String>,
) -> Result<Vec<String>, ValidationError> {
    entries
        .into_iter()
        .map(|entry| {
            let trimmed = entry.trim();
            if trimmed.is_empty() {
                Err(ValidationError::InvalidApplicationInfo { field })
            } else {
                Ok(trimmed.to_string())
            }
        })
        .collect()
}

fn parse_timestamp(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<DateTime<Utc>>, ValidationError> {
    let Some(raw) = optional_text(value) else {
        return Ok(None);
    };

    DateTime::parse_from_rfc3339(&raw)
        .map(|parsed| Some(parsed.with_timezone(&Utc)))
        .map_err(|_| ValidationError::InvalidTimestamp { field, value: raw })
}
