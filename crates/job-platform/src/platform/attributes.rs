use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Named, filterable tag attached to a job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeValue {
    pub name: String,
    pub string_values: Vec<String>,
    pub filterable: bool,
}

impl AttributeValue {
    /// Validate and construct an attribute. Pure; collisions are checked by
    /// [`CustomAttributes::insert`].
    pub fn define<I, S>(
        name: &str,
        values: I,
        filterable: bool,
    ) -> Result<AttributeValue, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingAttributeName);
        }
        if !is_valid_key(name) {
            return Err(ValidationError::MalformedAttributeName {
                name: name.to_string(),
            });
        }

        let string_values: Vec<String> = values
            .into_iter()
            .map(|value| Into::<String>::into(value).trim().to_string())
            .collect();
        if string_values.is_empty() {
            return Err(ValidationError::EmptyAttributeValues {
                name: name.to_string(),
            });
        }
        if string_values.iter().any(String::is_empty) {
            return Err(ValidationError::BlankAttributeValue {
                name: name.to_string(),
            });
        }

        Ok(AttributeValue {
            name: name.to_string(),
            string_values,
            filterable,
        })
    }
}

// Provider keys: a leading ASCII letter followed by letters, digits, or `_`.
pub(crate) fn is_valid_key(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A job's attribute set, keyed by attribute name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CustomAttributes(BTreeMap<String, AttributeValue>);

impl CustomAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, attribute: AttributeValue) -> Result<(), ValidationError> {
        if self.0.contains_key(&attribute.name) {
            return Err(ValidationError::DuplicateAttribute {
                name: attribute.name,
            });
        }
        self.0.insert(attribute.name.clone(), attribute);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeValue> {
        self.0.values()
    }

    pub fn filterable_names(&self) -> impl Iterator<Item = &str> {
        self.0
            .values()
            .filter(|attribute| attribute.filterable)
            .map(|attribute| attribute.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_rejects_empty_name_and_values() {
        assert_eq!(
            AttributeValue::define("  ", ["true"], true),
            Err(ValidationError::MissingAttributeName)
        );
        assert_eq!(
            AttributeValue::define("indigenous_focused", Vec::<String>::new(), true),
            Err(ValidationError::EmptyAttributeValues {
                name: "indigenous_focused".to_string()
            })
        );
        assert!(matches!(
            AttributeValue::define("indigenous_focused", ["true", " "], true),
            Err(ValidationError::BlankAttributeValue { .. })
        ));
    }

    #[test]
    fn define_trims_values() {
        let attribute =
            AttributeValue::define("nation", [" Haida ", "Cree\t"], true).expect("valid values");
        assert_eq!(attribute.string_values, vec!["Haida", "Cree"]);
    }

    #[test]
    fn define_rejects_keys_the_provider_cannot_index() {
        for name in ["1st_language", "remote-ok", "has space"] {
            assert!(
                matches!(
                    AttributeValue::define(name, ["x"], false),
                    Err(ValidationError::MalformedAttributeName { .. })
                ),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn insert_rejects_collisions() {
        let mut attributes = CustomAttributes::new();
        attributes
            .insert(AttributeValue::define("indigenous_focused", ["true"], true).expect("valid"))
            .expect("first insert");
        attributes
            .insert(AttributeValue::define("shift", ["day", "night"], false).expect("valid"))
            .expect("second insert");

        let duplicate = AttributeValue::define("indigenous_focused", ["false"], true)
            .expect("valid on its own");
        assert_eq!(
            attributes.insert(duplicate),
            Err(ValidationError::DuplicateAttribute {
                name: "indigenous_focused".to_string()
            })
        );
        assert_eq!(attributes.len(), 2);
        assert_eq!(
            attributes.filterable_names().collect::<Vec<_>>(),
            vec!["indigenous_focused"]
        );
        assert_eq!(
            attributes
                .get("indigenous_focused")
                .map(|attr| attr.string_values.clone()),
            Some(vec!["true".to_string()])
        );
    }
}
