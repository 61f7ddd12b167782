use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Attribute name → constraint pairs, forwarded to the provider untouched.
pub type AttributeFilters = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchMode {
    #[default]
    JobSearch,
    FeaturedJobSearch,
}

/// Provider-agnostic structured query. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_filter: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attribute_filters: AttributeFilters,
    pub mode: SearchMode,
}

impl SearchQuery {
    pub fn with_mode(self, mode: SearchMode) -> Self {
        Self { mode, ..self }
    }
}

/// Turn free text plus an optional location into a [`SearchQuery`].
///
/// A missing, empty, or whitespace-only location yields no location filter at
/// all; an empty filter and no filter mean different things to the provider.
pub fn translate(
    text: &str,
    location: Option<&str>,
    attribute_filters: Option<AttributeFilters>,
) -> Result<SearchQuery, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyQuery);
    }

    let location_filter = location
        .map(str::trim)
        .filter(|location| !location.is_empty())
        .map(str::to_string);

    Ok(SearchQuery {
        text: text.to_string(),
        location_filter,
        attribute_filters: attribute_filters.unwrap_or_default(),
        mode: SearchMode::default(),
    })
}
