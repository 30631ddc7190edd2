//! REST route recognition for admin resources.
//!
//! | Method | Path | Action |
//! |---|---|---|
//! | GET | `/admin/<plural>` | index |
//! | POST | `/admin/<plural>` | create |
//! | GET | `/admin/<plural>/new` | new |
//! | GET | `/admin/<plural>/edit/<id>` | edit |
//! | GET | `/admin/<plural>/<id>/edit` | edit |
//! | GET | `/admin/<plural>/<id>` | show |
//! | PUT, PATCH | `/admin/<plural>/<id>` | update |
//! | DELETE | `/admin/<plural>/<id>` | destroy |
//!
//! Any path may end in a format extension (`/admin/flanges/1.xml`).

use crate::controller::Action;
use http::Method;

/// A recognized admin route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Plural assigns key of the resource (`strange_rabbits`).
    pub resource: String,
    pub action: Action,
    pub id: Option<String>,
    /// Format extension from the path, not yet validated.
    pub format: Option<String>,
}

#[derive(Clone, Copy)]
enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

/// Match `method` and `path` against the admin routes under `prefix`.
pub fn recognize(prefix: &str, method: &Method, path: &str) -> Option<RouteMatch> {
    let rest = strip_prefix(prefix, path)?;
    let (rest, format) = split_extension(rest);
    let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();

    let verb = if *method == Method::GET {
        Verb::Get
    } else if *method == Method::POST {
        Verb::Post
    } else if *method == Method::PUT || *method == Method::PATCH {
        Verb::Put
    } else if *method == Method::DELETE {
        Verb::Delete
    } else {
        return None;
    };

    let (resource, action, id) = match (segments.as_slice(), verb) {
        ([resource], Verb::Get) => (resource, Action::Index, None),
        ([resource], Verb::Post) => (resource, Action::Create, None),
        ([resource, "new"], Verb::Get) => (resource, Action::New, None),
        ([resource, "edit", id], Verb::Get) => (resource, Action::Edit, Some(id)),
        ([resource, id, "edit"], Verb::Get) => (resource, Action::Edit, Some(id)),
        ([resource, id], Verb::Get) => (resource, Action::Show, Some(id)),
        ([resource, id], Verb::Put) => (resource, Action::Update, Some(id)),
        ([resource, id], Verb::Delete) => (resource, Action::Destroy, Some(id)),
        _ => return None,
    };

    Some(RouteMatch {
        resource: resource.to_string(),
        action,
        id: id.map(|id| decode_segment(id)),
        format: format.map(str::to_string),
    })
}

fn strip_prefix<'a>(prefix: &str, path: &'a str) -> Option<&'a str> {
    let prefix = prefix.trim_end_matches('/');
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

/// `/flanges/1.xml` -> (`/flanges/1`, `xml`). Only the last segment counts.
fn split_extension(path: &str) -> (&str, Option<&str>) {
    let last_segment_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[last_segment_start..].rfind('.') {
        Some(dot) if dot > 0 => {
            let split = last_segment_start + dot;
            let extension = &path[split + 1..];
            if !extension.is_empty() && extension.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                (&path[..split], Some(extension))
            } else {
                (path, None)
            }
        }
        _ => (path, None),
    }
}

fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(method: Method, path: &str) -> Option<(Action, Option<String>, Option<String>)> {
        recognize("/admin", &method, path).map(|m| {
            assert_eq!(m.resource, "strange_rabbits");
            (m.action, m.id, m.format)
        })
    }

    fn id(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_collection_routes() {
        assert_eq!(route(Method::GET, "/admin/strange_rabbits"), Some((Action::Index, None, None)));
        assert_eq!(route(Method::GET, "/admin/strange_rabbits/"), Some((Action::Index, None, None)));
        assert_eq!(route(Method::POST, "/admin/strange_rabbits"), Some((Action::Create, None, None)));
        assert_eq!(route(Method::GET, "/admin/strange_rabbits/new"), Some((Action::New, None, None)));
    }

    #[test]
    fn test_member_routes() {
        assert_eq!(route(Method::GET, "/admin/strange_rabbits/7"), Some((Action::Show, id("7"), None)));
        assert_eq!(route(Method::GET, "/admin/strange_rabbits/edit/7"), Some((Action::Edit, id("7"), None)));
        assert_eq!(route(Method::GET, "/admin/strange_rabbits/7/edit"), Some((Action::Edit, id("7"), None)));
        assert_eq!(route(Method::PUT, "/admin/strange_rabbits/7"), Some((Action::Update, id("7"), None)));
        assert_eq!(route(Method::PATCH, "/admin/strange_rabbits/7"), Some((Action::Update, id("7"), None)));
        assert_eq!(route(Method::DELETE, "/admin/strange_rabbits/-1"), Some((Action::Destroy, id("-1"), None)));
    }

    #[test]
    fn test_format_extensions() {
        assert_eq!(
            route(Method::GET, "/admin/strange_rabbits.xml"),
            Some((Action::Index, None, id("xml")))
        );
        assert_eq!(
            route(Method::GET, "/admin/strange_rabbits/3.ext_json"),
            Some((Action::Show, id("3"), id("ext_json")))
        );
        assert_eq!(
            route(Method::GET, "/admin/strange_rabbits/edit/3.yaml"),
            Some((Action::Edit, id("3"), id("yaml")))
        );
    }

    #[test]
    fn test_unrecognized() {
        assert!(recognize("/admin", &Method::GET, "/admin").is_none());
        assert!(recognize("/admin", &Method::GET, "/administrators/x").is_none());
        assert!(recognize("/admin", &Method::GET, "/public/flanges").is_none());
        assert!(recognize("/admin", &Method::POST, "/admin/flanges/new").is_none());
        assert!(recognize("/admin", &Method::DELETE, "/admin/flanges").is_none());
        assert!(recognize("/admin", &Method::GET, "/admin/flanges/1/2/3").is_none());
    }

    #[test]
    fn test_custom_prefix() {
        let m = recognize("/backstage/", &Method::GET, "/backstage/flanges/2").unwrap();
        assert_eq!((m.resource.as_str(), m.action), ("flanges", Action::Show));
    }
}
