//! Resource descriptors: every name a controller needs for its resource.

use crate::error::CrudError;
use crate::inflect;
use std::fmt::Display;

pub const DEFAULT_ROUTE_PREFIX: &str = "/admin";

/// The names derived from one canonical model name.
///
/// For a `StrangeRabbit` model:
///
/// | accessor | value |
/// |---|---|
/// | `model_name` / `model_symbol` | `StrangeRabbit` |
/// | `pluralized_model_name` | `Strange rabbits` |
/// | `assigns_key` | `strange_rabbit` |
/// | `plural_assigns_key` | `strange_rabbits` |
/// | `index_path` | `/admin/strange_rabbits` |
///
/// Descriptors are immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    model_name: String,
    pluralized_model_name: String,
    assigns_key: String,
    plural_assigns_key: String,
    route_prefix: String,
}

impl ResourceDescriptor {
    /// Describe the model named `model_name` (CamelCase, singular).
    pub fn new(model_name: impl Into<String>) -> Self {
        let model_name = model_name.into();
        let assigns_key = inflect::underscore(&model_name);
        let plural_assigns_key = inflect::pluralize(&assigns_key);
        Self {
            pluralized_model_name: inflect::pluralize(&inflect::humanize(&model_name)),
            model_name,
            assigns_key,
            plural_assigns_key,
            route_prefix: DEFAULT_ROUTE_PREFIX.to_string(),
        }
    }

    /// Override the plural key used for routes and list assigns, for models
    /// the inflector gets wrong.
    pub fn with_plural(mut self, plural_assigns_key: impl Into<String>) -> Self {
        self.plural_assigns_key = plural_assigns_key.into();
        self.pluralized_model_name = inflect::humanize(&self.plural_assigns_key);
        self
    }

    pub fn with_route_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.route_prefix = format!("/{}", prefix.trim_matches('/'));
        self
    }

    /// Derive the descriptor from a controller name such as
    /// `Admin::StrangeRabbitsController`, `StrangeRabbitsController` or
    /// `StrangeRabbits`.
    pub fn from_controller_name(controller_name: &str) -> Result<Self, CrudError> {
        let base = controller_name
            .rsplit("::")
            .next()
            .unwrap_or(controller_name)
            .trim();
        let base = base.strip_suffix("Controller").unwrap_or(base);
        if base.is_empty() || !base.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(CrudError::UnknownType(controller_name.to_string()));
        }
        let model_name = inflect::camelize(&inflect::singularize(base));
        Ok(Self::new(model_name))
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// The key the model is registered under. Same text as the model name.
    pub fn model_symbol(&self) -> &str {
        &self.model_name
    }

    pub fn pluralized_model_name(&self) -> &str {
        &self.pluralized_model_name
    }

    pub fn assigns_key(&self) -> &str {
        &self.assigns_key
    }

    pub fn plural_assigns_key(&self) -> &str {
        &self.plural_assigns_key
    }

    pub fn route_prefix(&self) -> &str {
        &self.route_prefix
    }

    /// Element name for a single record in XML (`strange-rabbit`).
    pub fn xml_element(&self) -> String {
        inflect::dasherize(&self.assigns_key)
    }

    /// Element name for a collection in XML (`strange-rabbits`).
    pub fn xml_collection(&self) -> String {
        inflect::dasherize(&self.plural_assigns_key)
    }

    /// Human name of one record, used in flash notices (`Strange rabbit`).
    pub fn human_name(&self) -> String {
        inflect::humanize(&self.assigns_key)
    }

    pub fn index_path(&self) -> String {
        format!("{}/{}", self.route_prefix.trim_end_matches('/'), self.plural_assigns_key)
    }

    pub fn new_path(&self) -> String {
        format!("{}/new", self.index_path())
    }

    pub fn show_path(&self, id: impl Display) -> String {
        format!("{}/{}", self.index_path(), id)
    }

    pub fn edit_path(&self, id: impl Display) -> String {
        format!("{}/edit/{}", self.index_path(), id)
    }

    /// Template name for `view` when the resource ships its own templates.
    pub fn template_name(&self, view: &str) -> String {
        format!("admin/{}/{}.html", self.plural_assigns_key, view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_word_model() {
        let d = ResourceDescriptor::from_controller_name("Admin::FlangesController").unwrap();
        assert_eq!(d.model_name(), "Flange");
        assert_eq!(d.model_symbol(), "Flange");
        assert_eq!(d.pluralized_model_name(), "Flanges");
        assert_eq!(d.assigns_key(), "flange");
        assert_eq!(d.plural_assigns_key(), "flanges");
        assert_eq!(d.index_path(), "/admin/flanges");
        assert_eq!(d.edit_path(7), "/admin/flanges/edit/7");
    }

    #[test]
    fn test_multi_word_model() {
        let d = ResourceDescriptor::from_controller_name("StrangeRabbits").unwrap();
        assert_eq!(d.model_name(), "StrangeRabbit");
        assert_eq!(d.pluralized_model_name(), "Strange rabbits");
        assert_eq!(d.assigns_key(), "strange_rabbit");
        assert_eq!(d.plural_assigns_key(), "strange_rabbits");
        assert_eq!(d.xml_element(), "strange-rabbit");
        assert_eq!(d.xml_collection(), "strange-rabbits");
        assert_eq!(d.human_name(), "Strange rabbit");
        assert_eq!(d.template_name("index"), "admin/strange_rabbits/index.html");
    }

    #[test]
    fn test_controller_name_variants_agree() {
        let names = [
            "Admin::StrangeRabbitsController",
            "StrangeRabbitsController",
            "StrangeRabbits",
        ];
        let descriptors: Vec<_> = names
            .iter()
            .map(|n| ResourceDescriptor::from_controller_name(n).unwrap())
            .collect();
        assert!(descriptors.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(descriptors[0], ResourceDescriptor::new("StrangeRabbit"));
    }

    #[test]
    fn test_rejects_empty_or_odd_names() {
        assert!(matches!(
            ResourceDescriptor::from_controller_name("Admin::Controller"),
            Err(CrudError::UnknownType(_))
        ));
        assert!(ResourceDescriptor::from_controller_name("Strange Rabbits").is_err());
    }

    #[test]
    fn test_explicit_overrides() {
        let d = ResourceDescriptor::new("Person")
            .with_plural("persons")
            .with_route_prefix("backstage/");
        assert_eq!(d.plural_assigns_key(), "persons");
        assert_eq!(d.pluralized_model_name(), "Persons");
        assert_eq!(d.index_path(), "/backstage/persons");
        assert_eq!(d.new_path(), "/backstage/persons/new");
        assert_eq!(d.show_path("3"), "/backstage/persons/3");
    }
}
