use std::fmt;
use std::iter::Map;
use std::slice::Iter;

use serde::{Serialize, Serializer};

use super::provider::ProviderMatch;

const NO_LOCATION: &str = "no location";

/// First address of a match, or an explicit marker when it has none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimaryLocation {
    Address(String),
    Unspecified,
}

impl PrimaryLocation {
    pub fn as_str(&self) -> &str {
        match self {
            PrimaryLocation::Address(address) => address,
            PrimaryLocation::Unspecified => NO_LOCATION,
        }
    }
}

impl fmt::Display for PrimaryLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PrimaryLocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Flat job summary handed back to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResultItem {
    pub title: String,
    pub company_ref: String,
    pub description: String,
    pub primary_location: PrimaryLocation,
}

impl From<&ProviderMatch> for SearchResultItem {
    fn from(provider_match: &ProviderMatch) -> Self {
        let job = &provider_match.job;
        SearchResultItem {
            title: job.title.clone(),
            company_ref: job.company.clone(),
            description: job.description.clone(),
            primary_location: job
                .addresses
                .first()
                .map(|address| PrimaryLocation::Address(address.clone()))
                .unwrap_or(PrimaryLocation::Unspecified),
        }
    }
}

type MapMatch<'a> = fn(&'a ProviderMatch) -> SearchResultItem;

fn to_item(provider_match: &ProviderMatch) -> SearchResultItem {
    SearchResultItem::from(provider_match)
}

/// Lazy view over a materialized provider response. Each call to
/// [`MappedResults::iter`] starts over from the first match.
#[derive(Debug, Clone, Copy)]
pub struct MappedResults<'a> {
    matches: &'a [ProviderMatch],
}

impl<'a> MappedResults<'a> {
    pub fn iter(&self) -> Map<Iter<'a, ProviderMatch>, MapMatch<'a>> {
        self.matches.iter().map(to_item as MapMatch<'a>)
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

impl<'a> IntoIterator for MappedResults<'a> {
    type Item = SearchResultItem;
    type IntoIter = Map<Iter<'a, ProviderMatch>, MapMatch<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub fn map_results(matches: &[ProviderMatch]) -> MappedResults<'_> {
    MappedResults { matches }
}
