//! # HTTP Adapter
//!
//! [`AdminRouter`] turns `http::Request`s into controller calls and controller
//! responses into `http::Response`s. Controllers for different resource types
//! are mounted side by side behind the [`CrudEndpoint`] trait object.

use crate::controller::{Action, CrudController, CrudRequest};
use crate::descriptor::{ResourceDescriptor, DEFAULT_ROUTE_PREFIX};
use crate::entity::Resource;
use crate::error::CrudError;
use crate::format::Format;
use crate::params::{self, Params};
use crate::response::CrudResponse;
use crate::routes;
use crate::views::Views;
use async_trait::async_trait;
use http::header::{CONTENT_TYPE, HOST, LOCATION};
use http::{Method, Request, Response, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Header carrying the flash notice of a redirect.
pub const FLASH_NOTICE_HEADER: &str = "x-flash-notice";

/// A controller with its resource type erased.
#[async_trait]
pub trait CrudEndpoint: Send + Sync {
    fn descriptor(&self) -> &ResourceDescriptor;

    async fn dispatch(&self, action: Action, req: &CrudRequest) -> Result<CrudResponse, CrudError>;
}

#[async_trait]
impl<T: Resource> CrudEndpoint for CrudController<T> {
    fn descriptor(&self) -> &ResourceDescriptor {
        CrudController::descriptor(self)
    }

    async fn dispatch(&self, action: Action, req: &CrudRequest) -> Result<CrudResponse, CrudError> {
        CrudController::dispatch(self, action, req).await
    }
}

/// Routes admin requests to the mounted controllers.
pub struct AdminRouter {
    prefix: String,
    endpoints: HashMap<String, Arc<dyn CrudEndpoint>>,
    views: Arc<Views>,
}

impl Default for AdminRouter {
    fn default() -> Self {
        Self::new(DEFAULT_ROUTE_PREFIX, Views::new())
    }
}

impl AdminRouter {
    pub fn new(prefix: impl Into<String>, views: Views) -> Self {
        Self {
            prefix: prefix.into(),
            endpoints: HashMap::new(),
            views: Arc::new(views),
        }
    }

    /// Serve `endpoint` under its plural assigns key.
    ///
    /// The endpoint's descriptor must use this router's prefix, otherwise the
    /// links and redirects it produces would point at routes nobody serves.
    pub fn mount(&mut self, endpoint: impl CrudEndpoint + 'static) -> Result<&mut Self, CrudError> {
        let descriptor = endpoint.descriptor();
        if !same_prefix(descriptor.route_prefix(), &self.prefix) {
            return Err(CrudError::Config(format!(
                "{} routes under {} but the router serves {}",
                descriptor.model_name(),
                descriptor.route_prefix(),
                self.prefix
            )));
        }
        let key = descriptor.plural_assigns_key().to_string();
        info!(resource = descriptor.model_name(), path = %descriptor.index_path(), "Mounted");
        self.endpoints.insert(key, Arc::new(endpoint));
        Ok(self)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Plural keys of the mounted resources, sorted.
    pub fn resources(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.endpoints.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn views(&self) -> &Views {
        &self.views
    }

    /// Handle one request. Failures become error responses: unknown routes
    /// 404, unknown formats 406, undecodable bodies 400, anything else 500.
    pub async fn handle(&self, request: Request<String>) -> Response<String> {
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        let response = match self.try_handle(request).await {
            Ok(response) => response,
            Err(e) => {
                let status = match &e {
                    CrudError::UnknownType(_)
                    | CrudError::UnknownAction(_)
                    | CrudError::SiteNotFound(_) => StatusCode::NOT_FOUND,
                    CrudError::UnknownFormat(_) => StatusCode::NOT_ACCEPTABLE,
                    CrudError::BadRequest(_) => StatusCode::BAD_REQUEST,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                if status.is_server_error() {
                    error!(%method, %path, error = %e, "Request failed");
                } else {
                    warn!(%method, %path, error = %e, "Request rejected");
                }
                plain(status, &e.to_string())
            }
        };
        info!(%method, %path, status = response.status().as_u16(), "Handled");
        response
    }

    /// Like [`handle`](Self::handle), but returns the failure instead of an
    /// error response.
    pub async fn try_handle(&self, request: Request<String>) -> Result<Response<String>, CrudError> {
        let (parts, body) = request.into_parts();
        let mut params = parts
            .uri
            .query()
            .map(params::parse_urlencoded)
            .unwrap_or_default();
        params::merge(&mut params, decode_body(&parts.headers, &body)?);

        let method = method_override(&parts.method, &params);
        let path = parts.uri.path();
        let route = routes::recognize(&self.prefix, &method, path)
            .ok_or_else(|| CrudError::UnknownType(format!("{} {}", method, path)))?;
        let endpoint = self
            .endpoints
            .get(&route.resource)
            .ok_or_else(|| CrudError::UnknownType(route.resource.clone()))?;

        let format: Format = match route.format.as_deref() {
            Some(extension) => extension.parse()?,
            None => match params.get("format") {
                Some(Value::String(format)) => format.parse()?,
                _ => Format::default(),
            },
        };
        let host = parts
            .headers
            .get(HOST)
            .and_then(|value| value.to_str().ok())
            .or_else(|| parts.uri.host())
            .unwrap_or_default()
            .to_string();

        debug!(resource = %route.resource, action = %route.action, %format, id = ?route.id, "Dispatching");
        let req = CrudRequest {
            format,
            id: route.id,
            params,
            host,
        };
        let response = endpoint.dispatch(route.action, &req).await?;
        self.to_http(endpoint.descriptor(), response)
    }

    /// Convert a controller response, rendering HTML views on the way.
    pub fn to_http(
        &self,
        descriptor: &ResourceDescriptor,
        response: CrudResponse,
    ) -> Result<Response<String>, CrudError> {
        let response = match response {
            CrudResponse::Render {
                view,
                template,
                assigns,
                status,
            } => {
                let html = self.views.render(descriptor, view, &template, &assigns)?;
                Response::builder()
                    .status(status)
                    .header(CONTENT_TYPE, Format::Html.content_type())
                    .body(html)?
            }
            CrudResponse::Redirect { location, notice } => {
                let mut builder = Response::builder()
                    .status(StatusCode::FOUND)
                    .header(LOCATION, location);
                if let Some(notice) = notice {
                    builder = builder.header(FLASH_NOTICE_HEADER, notice);
                }
                builder.body(String::new())?
            }
            CrudResponse::Body {
                status,
                format,
                body,
            } => Response::builder()
                .status(status)
                .header(CONTENT_TYPE, format.content_type())
                .body(body)?,
            CrudResponse::Head { status } => Response::builder().status(status).body(String::new())?,
        };
        Ok(response)
    }
}

fn same_prefix(a: &str, b: &str) -> bool {
    a.trim_matches('/') == b.trim_matches('/')
}

fn decode_body(headers: &http::HeaderMap, body: &str) -> Result<Params, CrudError> {
    if body.trim().is_empty() {
        return Ok(Params::new());
    }
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if content_type.starts_with("application/json")
        || (content_type.is_empty() && body.trim_start().starts_with('{'))
    {
        params::parse_json(body)
    } else {
        Ok(params::parse_urlencoded(body))
    }
}

/// HTML forms can only POST; `_method=put` (or `delete`, `patch`) stands in
/// for the real verb.
fn method_override(method: &Method, params: &Params) -> Method {
    if *method != Method::POST {
        return method.clone();
    }
    match params.get("_method") {
        Some(Value::String(name)) => match name.to_ascii_uppercase().as_str() {
            "PUT" => Method::PUT,
            "PATCH" => Method::PATCH,
            "DELETE" => Method::DELETE,
            _ => Method::POST,
        },
        _ => Method::POST,
    }
}

fn plain(status: StatusCode, message: &str) -> Response<String> {
    let mut response = Response::new(message.to_string());
    *response.status_mut() = status;
    if let Ok(value) = http::HeaderValue::from_str("text/plain; charset=utf-8") {
        response.headers_mut().insert(CONTENT_TYPE, value);
    }
    response
}
