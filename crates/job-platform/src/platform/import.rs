use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::builder::{ApplicationInfoRequest, AttributeRequest, JobRequest};

#[derive(Debug)]
pub enum JobImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MalformedAttribute { row: usize, entry: String },
}

impl std::fmt::Display for JobImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobImportError::Io(err) => write!(f, "failed to read job export: {}", err),
            JobImportError::Csv(err) => write!(f, "invalid job CSV data: {}", err),
            JobImportError::MalformedAttribute { row, entry } => write!(
                f,
                "row {}: attribute '{}' must look like name=value|value",
                row, entry
            ),
        }
    }
}

impl std::error::Error for JobImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            JobImportError::Io(err) => Some(err),
            JobImportError::Csv(err) => Some(err),
            JobImportError::MalformedAttribute { .. } => None,
        }
    }
}

impl From<std::io::Error> for JobImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for JobImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads a CSV export into raw job requests.
///
/// Rows are not validated here beyond their shape; each request still goes
/// through `JobBuilder` when it is posted.
pub struct JobCsvImporter;

impl JobCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<JobRequest>, JobImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<JobRequest>, JobImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut requests = Vec::new();
        for (index, record) in csv_reader.deserialize::<JobRow>().enumerate() {
            let row = record?;
            requests.push(row.into_request(index + 1)?);
        }
        Ok(requests)
    }
}

#[derive(Debug, Deserialize)]
struct JobRow {
    #[serde(rename = "Title", default, deserialize_with = "empty_string_as_none")]
    title: Option<String>,
    #[serde(rename = "Description", default, deserialize_with = "empty_string_as_none")]
    description: Option<String>,
    #[serde(rename = "Addresses", default, deserialize_with = "empty_string_as_none")]
    addresses: Option<String>,
    #[serde(rename = "Benefits", default, deserialize_with = "empty_string_as_none")]
    benefits: Option<String>,
    #[serde(rename = "Language", default, deserialize_with = "empty_string_as_none")]
    language: Option<String>,
    #[serde(rename = "Region", default, deserialize_with = "empty_string_as_none")]
    region: Option<String>,
    #[serde(rename = "Apply Email", default, deserialize_with = "empty_string_as_none")]
    apply_email: Option<String>,
    #[serde(rename = "Apply Url", default, deserialize_with = "empty_string_as_none")]
    apply_url: Option<String>,
    #[serde(rename = "Attributes", default, deserialize_with = "empty_string_as_none")]
    attributes: Option<String>,
}

impl JobRow {
    fn into_request(self, row: usize) -> Result<JobRequest, JobImportError> {
        let custom_attributes = split_cell(self.attributes.as_deref())
            .into_iter()
            .map(|entry| parse_attribute(row, &entry))
            .collect::<Result<Vec<_>, _>>()?;

        let emails = split_cell(self.apply_email.as_deref());
        let uris = split_cell(self.apply_url.as_deref());
        let application_info = if emails.is_empty() && uris.is_empty() {
            None
        } else {
            Some(ApplicationInfoRequest {
                emails,
                instruction: None,
                uris,
            })
        };

        Ok(JobRequest {
            title: self.title,
            description: self.description,
            addresses: split_cell(self.addresses.as_deref()),
            benefits: split_cell(self.benefits.as_deref()),
            custom_attributes,
            application_info,
            language_code: self.language,
            posting_region: self.region,
            ..JobRequest::default()
        })
    }
}

// Blank entries inside a non-empty cell are kept so `JobBuilder` rejects them.
fn split_cell(cell: Option<&str>) -> Vec<String> {
    cell.map(|value| value.split(';').map(|part| part.trim().to_string()).collect())
        .unwrap_or_default()
}

fn parse_attribute(row: usize, entry: &str) -> Result<AttributeRequest, JobImportError> {
    let malformed = || JobImportError::MalformedAttribute {
        row,
        entry: entry.to_string(),
    };

    let (name, values) = entry.split_once('=').ok_or_else(malformed)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(malformed());
    }

    Ok(AttributeRequest {
        name: name.to_string(),
        string_values: values
            .split('|')
            .map(|value| value.trim().to_string())
            .collect(),
        filterable: true,
    })
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
