//! # HTML Views
//!
//! A minijinja environment holding the generic `crud/*.html` templates. A
//! resource can override any view by providing `admin/<plural>/<view>.html`,
//! either registered directly or found in a template directory.
//!
//! Every template sees the action's assigns plus:
//! - `resource`: the descriptor's names and paths,
//! - `records`: the plural assign (index),
//! - `record`: the singular assign (show, new, edit),
//! - `errors`: validation errors, when present.

use crate::descriptor::ResourceDescriptor;
use crate::error::CrudError;
use crate::response::{Assigns, View};
use minijinja::{Environment, ErrorKind};
use serde_json::{json, Value};
use std::path::Path;
use tracing::debug;

const BUILTIN: &[(&str, &str)] = &[
    ("crud/layout.html", include_str!("../templates/crud/layout.html")),
    ("crud/_errors.html", include_str!("../templates/crud/_errors.html")),
    ("crud/_fields.html", include_str!("../templates/crud/_fields.html")),
    ("crud/index.html", include_str!("../templates/crud/index.html")),
    ("crud/show.html", include_str!("../templates/crud/show.html")),
    ("crud/new.html", include_str!("../templates/crud/new.html")),
    ("crud/edit.html", include_str!("../templates/crud/edit.html")),
];

pub struct Views {
    env: Environment<'static>,
}

impl Default for Views {
    fn default() -> Self {
        Self::new()
    }
}

impl Views {
    /// The built-in templates only.
    pub fn new() -> Self {
        let mut env = Environment::new();
        for &(name, source) in BUILTIN {
            if let Err(e) = env.add_template(name, source) {
                tracing::error!(template = name, error = %e, "Invalid built-in template");
            }
        }
        Self { env }
    }

    /// Built-in templates plus anything under `dir`, looked up by relative
    /// path (`admin/flanges/index.html`).
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let mut views = Self::new();
        views
            .env
            .set_loader(minijinja::path_loader(dir.as_ref().to_path_buf()));
        views
    }

    /// Register a template under `name`, replacing an existing one.
    pub fn add_template(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<(), CrudError> {
        self.env
            .add_template_owned(name.into(), source.into())
            .map_err(CrudError::from)
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }

    /// Render `view` for the resource, preferring `template` over the
    /// generic `crud/<view>.html`.
    pub fn render(
        &self,
        descriptor: &ResourceDescriptor,
        view: View,
        template: &str,
        assigns: &Assigns,
    ) -> Result<String, CrudError> {
        let tmpl = match self.env.get_template(template) {
            Ok(tmpl) => tmpl,
            Err(e) if e.kind() == ErrorKind::TemplateNotFound => {
                debug!(template, view = %view, "Falling back to generic template");
                self.env.get_template(&format!("crud/{}.html", view))?
            }
            Err(e) => return Err(e.into()),
        };
        let context = Self::context(descriptor, view, assigns);
        Ok(tmpl.render(context)?)
    }

    fn context(descriptor: &ResourceDescriptor, view: View, assigns: &Assigns) -> Value {
        let mut context = assigns.clone();
        context.insert(
            "resource".into(),
            json!({
                "model_name": descriptor.model_name(),
                "human_name": descriptor.human_name(),
                "pluralized_model_name": descriptor.pluralized_model_name(),
                "assigns_key": descriptor.assigns_key(),
                "plural_assigns_key": descriptor.plural_assigns_key(),
                "index_path": descriptor.index_path(),
                "new_path": descriptor.new_path(),
            }),
        );
        match view {
            View::Index => {
                let records = assigns
                    .get(descriptor.plural_assigns_key())
                    .cloned()
                    .unwrap_or_else(|| json!([]));
                context.insert("records".into(), records);
            }
            View::Show | View::New | View::Edit => {
                let record = assigns
                    .get(descriptor.assigns_key())
                    .cloned()
                    .unwrap_or_else(|| json!({}));
                context.insert("record".into(), record);
            }
        }
        context.entry("errors").or_insert_with(|| json!({}));
        Value::Object(context)
    }
}
