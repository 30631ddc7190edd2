//! Validation errors collected by a resource while it is created or updated.

use crate::inflect;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Attribute name used for errors that are not tied to a single field.
pub const BASE: &str = "base";

/// Messages keyed by attribute, in the order they were added.
///
/// ```
/// use crud_framework::ValidationErrors;
///
/// let mut errors = ValidationErrors::new();
/// errors.add("title", "can't be blank");
/// errors.add_to_base("Flange is locked");
/// assert_eq!(
///     errors.full_messages(),
///     vec!["Title can't be blank".to_string(), "Flange is locked".to_string()]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: IndexMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding a single base error.
    pub fn base(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add_to_base(message);
        errors
    }

    pub fn add(&mut self, attribute: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(attribute.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_to_base(&mut self, message: impl Into<String>) {
        self.add(BASE, message);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of messages across all attributes.
    pub fn len(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    /// Messages recorded against `attribute`.
    pub fn on(&self, attribute: &str) -> &[String] {
        self.errors
            .get(attribute)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors
            .iter()
            .map(|(attribute, messages)| (attribute.as_str(), messages.as_slice()))
    }

    /// Human readable messages, prefixed with the humanized attribute name
    /// except for base errors.
    pub fn full_messages(&self) -> Vec<String> {
        self.iter()
            .flat_map(|(attribute, messages)| {
                messages.iter().map(move |message| {
                    if attribute == BASE {
                        message.clone()
                    } else {
                        format!("{} {}", inflect::humanize(attribute), message)
                    }
                })
            })
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_messages().join(", "))
    }
}

impl std::error::Error for ValidationErrors {}
