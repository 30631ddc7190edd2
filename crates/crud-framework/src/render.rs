//! # Responders
//!
//! One [`Responder`] per [`Format`]. The controller decides *what* happened
//! (records listed, record not found, validation failed...) and the
//! responder for the requested format decides what that looks like.

use crate::descriptor::ResourceDescriptor;
use crate::entity::Resource;
use crate::error::CrudError;
use crate::ext_json;
use crate::format::Format;
use crate::response::{Assigns, CrudResponse, View};
use crate::validation::ValidationErrors;
use crate::xml;
use http::StatusCode;
use serde_json::Value;

/// Turns controller outcomes into format-specific responses.
pub trait Responder<T: Resource>: Send + Sync {
    fn format(&self) -> Format;

    /// The index action. `count` is the total number of records.
    fn list(&self, d: &ResourceDescriptor, items: &[T], count: usize)
        -> Result<CrudResponse, CrudError>;

    /// A found record, for the show or edit view.
    fn item(&self, d: &ResourceDescriptor, view: View, item: &T)
        -> Result<CrudResponse, CrudError>;

    /// The empty form for a new record.
    fn blank(&self, d: &ResourceDescriptor) -> Result<CrudResponse, CrudError>;

    fn created(&self, d: &ResourceDescriptor, item: &T) -> Result<CrudResponse, CrudError>;

    fn updated(&self, d: &ResourceDescriptor, item: &T) -> Result<CrudResponse, CrudError>;

    fn destroyed(&self, d: &ResourceDescriptor) -> Result<CrudResponse, CrudError>;

    /// The record refused to go; `errors` says why.
    fn not_destroyed(
        &self,
        d: &ResourceDescriptor,
        errors: &ValidationErrors,
    ) -> Result<CrudResponse, CrudError>;

    fn not_found(&self, d: &ResourceDescriptor) -> Result<CrudResponse, CrudError>;

    /// Validation failed. `view` is the form to show again (`New` after a
    /// create, `Edit` after an update) and `attributes` what it is filled with.
    fn invalid(
        &self,
        d: &ResourceDescriptor,
        view: View,
        attributes: Value,
        errors: &ValidationErrors,
    ) -> Result<CrudResponse, CrudError>;
}

/// The responder serving `format`.
pub fn responder_for<T: Resource>(format: Format) -> Box<dyn Responder<T>> {
    match format {
        Format::Html => Box::new(HtmlResponder),
        Format::Xml => Box::new(XmlResponder),
        Format::ExtJson => Box::new(ExtJsonResponder),
    }
}

fn to_value<S: serde::Serialize>(value: &S) -> Result<Value, CrudError> {
    Ok(serde_json::to_value(value)?)
}

// =============================================================================
// HTML
// =============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlResponder;

impl HtmlResponder {
    fn render(d: &ResourceDescriptor, view: View, assigns: Assigns, status: StatusCode) -> CrudResponse {
        CrudResponse::Render {
            view,
            template: d.template_name(view.as_str()),
            assigns,
            status,
        }
    }

    fn redirect(location: String, notice: Option<String>) -> CrudResponse {
        CrudResponse::Redirect { location, notice }
    }
}

impl<T: Resource> Responder<T> for HtmlResponder {
    fn format(&self) -> Format {
        Format::Html
    }

    fn list(&self, d: &ResourceDescriptor, items: &[T], count: usize) -> Result<CrudResponse, CrudError> {
        let mut assigns = Assigns::new();
        assigns.insert(d.plural_assigns_key().to_string(), to_value(&items)?);
        assigns.insert("count".to_string(), Value::from(count));
        Ok(Self::render(d, View::Index, assigns, StatusCode::OK))
    }

    fn item(&self, d: &ResourceDescriptor, view: View, item: &T) -> Result<CrudResponse, CrudError> {
        let mut assigns = Assigns::new();
        assigns.insert(d.assigns_key().to_string(), to_value(item)?);
        Ok(Self::render(d, view, assigns, StatusCode::OK))
    }

    fn blank(&self, d: &ResourceDescriptor) -> Result<CrudResponse, CrudError> {
        let mut assigns = Assigns::new();
        assigns.insert(d.assigns_key().to_string(), Value::Object(Default::default()));
        Ok(Self::render(d, View::New, assigns, StatusCode::OK))
    }

    fn created(&self, d: &ResourceDescriptor, item: &T) -> Result<CrudResponse, CrudError> {
        Ok(Self::redirect(
            d.edit_path(item.id()),
            Some(format!("{} was successfully created.", d.human_name())),
        ))
    }

    fn updated(&self, d: &ResourceDescriptor, _item: &T) -> Result<CrudResponse, CrudError> {
        Ok(Self::redirect(
            d.index_path(),
            Some(format!("{} was successfully updated.", d.human_name())),
        ))
    }

    fn destroyed(&self, d: &ResourceDescriptor) -> Result<CrudResponse, CrudError> {
        Ok(Self::redirect(
            d.index_path(),
            Some(format!("{} was successfully deleted.", d.human_name())),
        ))
    }

    fn not_destroyed(
        &self,
        d: &ResourceDescriptor,
        errors: &ValidationErrors,
    ) -> Result<CrudResponse, CrudError> {
        Ok(Self::redirect(
            d.index_path(),
            Some(format!("{} could not be deleted: {}", d.human_name(), errors)),
        ))
    }

    fn not_found(&self, d: &ResourceDescriptor) -> Result<CrudResponse, CrudError> {
        Ok(Self::redirect(d.index_path(), None))
    }

    fn invalid(
        &self,
        d: &ResourceDescriptor,
        view: View,
        attributes: Value,
        errors: &ValidationErrors,
    ) -> Result<CrudResponse, CrudError> {
        let mut assigns = Assigns::new();
        assigns.insert(d.assigns_key().to_string(), attributes);
        assigns.insert("errors".to_string(), to_value(errors)?);
        Ok(Self::render(d, view, assigns, StatusCode::OK))
    }
}

// =============================================================================
// XML
// =============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct XmlResponder;

impl XmlResponder {
    fn body(status: StatusCode, body: String) -> CrudResponse {
        CrudResponse::Body {
            status,
            format: Format::Xml,
            body,
        }
    }
}

impl<T: Resource> Responder<T> for XmlResponder {
    fn format(&self) -> Format {
        Format::Xml
    }

    fn list(&self, d: &ResourceDescriptor, items: &[T], _count: usize) -> Result<CrudResponse, CrudError> {
        let body = xml::collection(&d.xml_collection(), &d.xml_element(), items)?;
        Ok(Self::body(StatusCode::OK, body))
    }

    fn item(&self, d: &ResourceDescriptor, _view: View, item: &T) -> Result<CrudResponse, CrudError> {
        Ok(Self::body(StatusCode::OK, xml::record(&d.xml_element(), item)?))
    }

    fn blank(&self, _d: &ResourceDescriptor) -> Result<CrudResponse, CrudError> {
        Ok(CrudResponse::Head {
            status: StatusCode::NOT_ACCEPTABLE,
        })
    }

    fn created(&self, d: &ResourceDescriptor, item: &T) -> Result<CrudResponse, CrudError> {
        Ok(Self::body(StatusCode::CREATED, xml::record(&d.xml_element(), item)?))
    }

    fn updated(&self, _d: &ResourceDescriptor, _item: &T) -> Result<CrudResponse, CrudError> {
        Ok(CrudResponse::Head { status: StatusCode::OK })
    }

    fn destroyed(&self, _d: &ResourceDescriptor) -> Result<CrudResponse, CrudError> {
        Ok(CrudResponse::Head { status: StatusCode::OK })
    }

    fn not_destroyed(
        &self,
        _d: &ResourceDescriptor,
        errors: &ValidationErrors,
    ) -> Result<CrudResponse, CrudError> {
        Ok(Self::body(StatusCode::UNPROCESSABLE_ENTITY, xml::errors(errors)?))
    }

    fn not_found(&self, _d: &ResourceDescriptor) -> Result<CrudResponse, CrudError> {
        Ok(CrudResponse::Head {
            status: StatusCode::NOT_FOUND,
        })
    }

    fn invalid(
        &self,
        _d: &ResourceDescriptor,
        _view: View,
        _attributes: Value,
        errors: &ValidationErrors,
    ) -> Result<CrudResponse, CrudError> {
        Ok(Self::body(StatusCode::UNPROCESSABLE_ENTITY, xml::errors(errors)?))
    }
}

// =============================================================================
// EXT_JSON
// =============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct ExtJsonResponder;

impl ExtJsonResponder {
    fn body(payload: &Value) -> Result<CrudResponse, CrudError> {
        Ok(CrudResponse::Body {
            status: StatusCode::OK,
            format: Format::ExtJson,
            body: ext_json::to_body(payload)?,
        })
    }
}

impl<T: Resource> Responder<T> for ExtJsonResponder {
    fn format(&self) -> Format {
        Format::ExtJson
    }

    fn list(&self, _d: &ResourceDescriptor, items: &[T], count: usize) -> Result<CrudResponse, CrudError> {
        Self::body(&ext_json::collection(items, count)?)
    }

    fn item(&self, d: &ResourceDescriptor, _view: View, item: &T) -> Result<CrudResponse, CrudError> {
        Self::body(&ext_json::record(d.assigns_key(), item)?)
    }

    fn blank(&self, _d: &ResourceDescriptor) -> Result<CrudResponse, CrudError> {
        Ok(CrudResponse::Head {
            status: StatusCode::NOT_ACCEPTABLE,
        })
    }

    fn created(&self, d: &ResourceDescriptor, item: &T) -> Result<CrudResponse, CrudError> {
        Self::body(&ext_json::record(d.assigns_key(), item)?)
    }

    fn updated(&self, d: &ResourceDescriptor, item: &T) -> Result<CrudResponse, CrudError> {
        Self::body(&ext_json::record(d.assigns_key(), item)?)
    }

    fn destroyed(&self, _d: &ResourceDescriptor) -> Result<CrudResponse, CrudError> {
        Self::body(&ext_json::success())
    }

    fn not_destroyed(
        &self,
        _d: &ResourceDescriptor,
        _errors: &ValidationErrors,
    ) -> Result<CrudResponse, CrudError> {
        Self::body(&ext_json::failure())
    }

    fn not_found(&self, _d: &ResourceDescriptor) -> Result<CrudResponse, CrudError> {
        Self::body(&ext_json::failure())
    }

    fn invalid(
        &self,
        d: &ResourceDescriptor,
        view: View,
        _attributes: Value,
        errors: &ValidationErrors,
    ) -> Result<CrudResponse, CrudError> {
        match view {
            View::New => Self::body(&ext_json::invalid(d.assigns_key(), errors)),
            _ => Self::body(&ext_json::failure()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::Site;
    use async_trait::async_trait;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, Serialize)]
    struct Flange {
        id: u32,
        title: String,
    }

    #[derive(Debug, Deserialize)]
    struct Attrs {}

    #[async_trait]
    impl Resource for Flange {
        type Id = u32;
        type Create = Attrs;
        type Update = Attrs;
        type Error = ValidationErrors;

        fn id(&self) -> &u32 {
            &self.id
        }
        fn from_create_params(id: u32, _: Attrs) -> Result<Self, Self::Error> {
            Ok(Self { id, title: String::new() })
        }
        fn assign_site(&mut self, _: &Site) {}
        async fn on_update(&mut self, _: Attrs) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    fn d() -> ResourceDescriptor {
        ResourceDescriptor::new("Flange")
    }

    fn flange() -> Flange {
        Flange { id: 5, title: "Wide".into() }
    }

    #[test]
    fn test_selection_by_format() {
        for format in Format::ALL {
            assert_eq!(responder_for::<Flange>(format).format(), format);
        }
    }

    #[test]
    fn test_html_redirects_and_renders() {
        let html = responder_for::<Flange>(Format::Html);
        let created = html.created(&d(), &flange()).unwrap();
        assert_eq!(created.location(), Some("/admin/flanges/edit/5"));
        assert!(created.notice().is_some());

        let missing = html.not_found(&d()).unwrap();
        assert_eq!(missing.location(), Some("/admin/flanges"));

        let kept = html.not_destroyed(&d(), &ValidationErrors::base("Flange is bolted down")).unwrap();
        assert_eq!(kept.location(), Some("/admin/flanges"));
        assert_eq!(kept.notice(), Some("Flange could not be deleted: Flange is bolted down"));

        let listed = html.list(&d(), &[flange()], 1).unwrap();
        assert_eq!(listed.view(), Some(View::Index));
        assert_eq!(listed.assign("flanges").unwrap()[0]["title"], "Wide");
        assert_eq!(listed.assign("count"), Some(&Value::from(1)));
    }

    #[test]
    fn test_xml_status_codes() {
        let xml = responder_for::<Flange>(Format::Xml);
        assert_eq!(xml.created(&d(), &flange()).unwrap().status(), StatusCode::CREATED);
        assert_eq!(xml.not_found(&d()).unwrap().status(), StatusCode::NOT_FOUND);
        assert_eq!(xml.blank(&d()).unwrap().status(), StatusCode::NOT_ACCEPTABLE);
        let invalid = xml
            .invalid(&d(), View::New, Value::Null, &ValidationErrors::base("nope"))
            .unwrap();
        assert_eq!(invalid.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(invalid.body().unwrap().contains("<error>nope</error>"));
        let kept = xml.not_destroyed(&d(), &ValidationErrors::base("locked")).unwrap();
        assert_eq!(kept.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(kept.body().unwrap().contains("<error>locked</error>"));
    }

    #[test]
    fn test_ext_json_payloads() {
        let ext = responder_for::<Flange>(Format::ExtJson);
        let shown = ext.item(&d(), View::Show, &flange()).unwrap().json().unwrap();
        assert_eq!(shown["data"]["flange[title]"], "Wide");

        let missing = ext.not_found(&d()).unwrap();
        assert_eq!(missing.status(), StatusCode::OK);
        assert_eq!(missing.json().unwrap(), serde_json::json!({"success": false}));

        let mut errors = ValidationErrors::new();
        errors.add("title", "can't be blank");
        let create = ext.invalid(&d(), View::New, Value::Null, &errors).unwrap();
        assert_eq!(create.json().unwrap()["errors"]["flange[title]"], "can't be blank");
        let update = ext.invalid(&d(), View::Edit, Value::Null, &errors).unwrap();
        assert_eq!(update.json().unwrap(), serde_json::json!({"success": false}));
        let kept = ext.not_destroyed(&d(), &errors).unwrap();
        assert_eq!(kept.json().unwrap(), serde_json::json!({"success": false}));
    }
}
