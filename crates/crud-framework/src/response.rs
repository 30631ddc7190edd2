//! What a controller action produces, before it becomes an HTTP response.

use crate::format::Format;
use http::StatusCode;
use serde_json::{Map, Value};
use std::fmt;

/// The HTML views every resource has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Index,
    Show,
    New,
    Edit,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Index => "index",
            View::Show => "show",
            View::New => "new",
            View::Edit => "edit",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values handed to a view, keyed by assigns key.
pub type Assigns = Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum CrudResponse {
    /// Render an HTML view. `template` is the resource-specific template name;
    /// the generic one is used when it does not exist.
    Render {
        view: View,
        template: String,
        assigns: Assigns,
        status: StatusCode,
    },
    Redirect {
        location: String,
        notice: Option<String>,
    },
    /// A serialized payload (xml or ext_json).
    Body {
        status: StatusCode,
        format: Format,
        body: String,
    },
    /// Status only, empty body.
    Head { status: StatusCode },
}

impl CrudResponse {
    pub fn status(&self) -> StatusCode {
        match self {
            CrudResponse::Render { status, .. }
            | CrudResponse::Body { status, .. }
            | CrudResponse::Head { status } => *status,
            CrudResponse::Redirect { .. } => StatusCode::FOUND,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, CrudResponse::Redirect { .. })
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            CrudResponse::Redirect { location, .. } => Some(location),
            _ => None,
        }
    }

    pub fn notice(&self) -> Option<&str> {
        match self {
            CrudResponse::Redirect { notice, .. } => notice.as_deref(),
            _ => None,
        }
    }

    pub fn view(&self) -> Option<View> {
        match self {
            CrudResponse::Render { view, .. } => Some(*view),
            _ => None,
        }
    }

    pub fn assigns(&self) -> Option<&Assigns> {
        match self {
            CrudResponse::Render { assigns, .. } => Some(assigns),
            _ => None,
        }
    }

    /// A single assigned value.
    pub fn assign(&self, key: &str) -> Option<&Value> {
        self.assigns().and_then(|assigns| assigns.get(key))
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            CrudResponse::Body { body, .. } => Some(body),
            _ => None,
        }
    }

    /// The body parsed as JSON, for ext_json responses.
    pub fn json(&self) -> Option<Value> {
        match self {
            CrudResponse::Body {
                format: Format::ExtJson,
                body,
                ..
            } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }
}
