//! # Generic Resource Controller
//!
//! `CrudController<T>` implements the seven admin actions once for every
//! resource type. It asks the object store for records, resolves the tenant
//! on create, and hands each outcome to the [`Responder`] for the requested
//! format.
//!
//! Not-found and validation failures never leave an action as errors; they
//! become redirects, status codes or negative payloads. Everything else
//! (closed stores, serialization, unknown sites) propagates as [`CrudError`].

use crate::client::StoreClient;
use crate::descriptor::ResourceDescriptor;
use crate::entity::Resource;
use crate::error::{CrudError, StoreError};
use crate::format::Format;
use crate::params::Params;
use crate::registry::ResourceRegistry;
use crate::render::{responder_for, Responder};
use crate::response::{CrudResponse, View};
use crate::site::{Site, SiteResolver};
use crate::validation::ValidationErrors;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// The actions a controller answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Index,
    Show,
    New,
    Create,
    Edit,
    Update,
    Destroy,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Index => "index",
            Action::Show => "show",
            Action::New => "new",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Update => "update",
            Action::Destroy => "destroy",
        }
    }

    /// Whether the action works on one existing record.
    pub fn is_member(&self) -> bool {
        matches!(
            self,
            Action::Show | Action::Edit | Action::Update | Action::Destroy
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = CrudError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "index" => Ok(Action::Index),
            "show" => Ok(Action::Show),
            "new" => Ok(Action::New),
            "create" => Ok(Action::Create),
            "edit" => Ok(Action::Edit),
            "update" => Ok(Action::Update),
            "destroy" => Ok(Action::Destroy),
            other => Err(CrudError::UnknownAction(other.to_string())),
        }
    }
}

/// Everything an action reads from the incoming request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrudRequest {
    pub format: Format,
    /// Raw `id` path parameter.
    pub id: Option<String>,
    pub params: Params,
    /// Request host, used to resolve the site on create.
    pub host: String,
}

impl CrudRequest {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl ToString) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Nest `attributes` under `key`, the way a submitted form does.
    pub fn with_attributes(mut self, key: &str, attributes: Value) -> Self {
        self.params.insert(key.to_string(), attributes);
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }
}

/// Serves the admin actions for one resource type.
pub struct CrudController<T: Resource> {
    descriptor: ResourceDescriptor,
    store: StoreClient<T>,
    sites: Arc<dyn SiteResolver>,
}

impl<T: Resource> Clone for CrudController<T> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor.clone(),
            store: self.store.clone(),
            sites: self.sites.clone(),
        }
    }
}

impl<T: Resource> CrudController<T> {
    pub fn new(
        descriptor: ResourceDescriptor,
        store: StoreClient<T>,
        sites: Arc<dyn SiteResolver>,
    ) -> Self {
        debug!(resource = descriptor.model_name(), "Controller ready");
        Self {
            descriptor,
            store,
            sites,
        }
    }

    /// Derive the descriptor from `controller_name`
    /// (`Admin::StrangeRabbitsController`) and look its store up in
    /// `registry`.
    pub fn from_registry(
        controller_name: &str,
        registry: &ResourceRegistry,
        sites: Arc<dyn SiteResolver>,
    ) -> Result<Self, CrudError> {
        let descriptor = ResourceDescriptor::from_controller_name(controller_name)?;
        let store = registry.lookup::<T>(descriptor.model_symbol())?;
        Ok(Self::new(descriptor, store, sites))
    }

    /// Serve the resource under `prefix` instead of the default `/admin`.
    /// Must match the prefix of the router the controller is mounted on.
    pub fn with_route_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.descriptor = self.descriptor.with_route_prefix(prefix);
        self
    }

    pub fn descriptor(&self) -> &ResourceDescriptor {
        &self.descriptor
    }

    pub fn model_name(&self) -> &str {
        self.descriptor.model_name()
    }

    pub fn model_symbol(&self) -> &str {
        self.descriptor.model_symbol()
    }

    /// The Rust type serving this resource.
    pub fn model_type(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    pub fn pluralized_model_name(&self) -> &str {
        self.descriptor.pluralized_model_name()
    }

    pub fn assigns_key(&self) -> &str {
        self.descriptor.assigns_key()
    }

    pub fn plural_assigns_key(&self) -> &str {
        self.descriptor.plural_assigns_key()
    }

    pub async fn dispatch(&self, action: Action, req: &CrudRequest) -> Result<CrudResponse, CrudError> {
        match action {
            Action::Index => self.index(req).await,
            Action::Show => self.show(req).await,
            Action::New => self.new_form(req).await,
            Action::Create => self.create(req).await,
            Action::Edit => self.edit(req).await,
            Action::Update => self.update(req).await,
            Action::Destroy => self.destroy(req).await,
        }
    }

    #[instrument(skip_all, fields(resource = %self.descriptor.model_name(), format = %req.format))]
    pub async fn index(&self, req: &CrudRequest) -> Result<CrudResponse, CrudError> {
        let items = self.store.list().await?;
        let count = self.store.count().await?;
        debug!(count, "Listing");
        self.responder(req).list(&self.descriptor, &items, count)
    }

    #[instrument(skip_all, fields(resource = %self.descriptor.model_name(), format = %req.format, id = ?req.id))]
    pub async fn show(&self, req: &CrudRequest) -> Result<CrudResponse, CrudError> {
        self.member(req, View::Show).await
    }

    #[instrument(skip_all, fields(resource = %self.descriptor.model_name(), format = %req.format, id = ?req.id))]
    pub async fn edit(&self, req: &CrudRequest) -> Result<CrudResponse, CrudError> {
        self.member(req, View::Edit).await
    }

    #[instrument(skip_all, fields(resource = %self.descriptor.model_name(), format = %req.format))]
    pub async fn new_form(&self, req: &CrudRequest) -> Result<CrudResponse, CrudError> {
        self.responder(req).blank(&self.descriptor)
    }

    #[instrument(skip_all, fields(resource = %self.descriptor.model_name(), format = %req.format))]
    pub async fn create(&self, req: &CrudRequest) -> Result<CrudResponse, CrudError> {
        let responder = self.responder(req);
        let attributes = self.attributes(req);
        let site = self.current_site(&req.host).await?;

        let params = match decode::<T::Create>(&attributes) {
            Ok(params) => params,
            Err(errors) => {
                warn!(%errors, "Unreadable attributes");
                return responder.invalid(&self.descriptor, View::New, Value::Object(attributes), &errors);
            }
        };

        match self.store.create(params, site).await {
            Ok(item) => {
                info!(id = %item.id(), "Created");
                responder.created(&self.descriptor, &item)
            }
            Err(StoreError::Invalid(errors)) => {
                debug!(%errors, "Create rejected");
                responder.invalid(&self.descriptor, View::New, Value::Object(attributes), &errors)
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip_all, fields(resource = %self.descriptor.model_name(), format = %req.format, id = ?req.id))]
    pub async fn update(&self, req: &CrudRequest) -> Result<CrudResponse, CrudError> {
        let responder = self.responder(req);
        let Some(existing) = self.lookup(req).await? else {
            return responder.not_found(&self.descriptor);
        };
        let attributes = self.attributes(req);
        let overlay = overlay(&existing, &attributes)?;

        let update = match decode::<T::Update>(&attributes) {
            Ok(update) => update,
            Err(errors) => {
                warn!(%errors, "Unreadable attributes");
                return responder.invalid(&self.descriptor, View::Edit, overlay, &errors);
            }
        };

        match self.store.update(existing.id().clone(), update).await {
            Ok(item) => {
                info!(id = %item.id(), "Updated");
                responder.updated(&self.descriptor, &item)
            }
            Err(StoreError::Invalid(errors)) => {
                debug!(%errors, "Update rejected");
                responder.invalid(&self.descriptor, View::Edit, overlay, &errors)
            }
            Err(StoreError::NotFound(_)) => responder.not_found(&self.descriptor),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip_all, fields(resource = %self.descriptor.model_name(), format = %req.format, id = ?req.id))]
    pub async fn destroy(&self, req: &CrudRequest) -> Result<CrudResponse, CrudError> {
        let responder = self.responder(req);
        let Some(existing) = self.lookup(req).await? else {
            return responder.not_found(&self.descriptor);
        };
        match self.store.delete(existing.id().clone()).await {
            Ok(()) => {
                info!(id = %existing.id(), "Deleted");
                responder.destroyed(&self.descriptor)
            }
            Err(StoreError::Invalid(errors)) => {
                debug!(%errors, "Delete rejected");
                responder.not_destroyed(&self.descriptor, &errors)
            }
            Err(StoreError::NotFound(_)) => responder.not_found(&self.descriptor),
            Err(e) => Err(e.into()),
        }
    }

    async fn member(&self, req: &CrudRequest, view: View) -> Result<CrudResponse, CrudError> {
        let responder = self.responder(req);
        match self.lookup(req).await? {
            Some(item) => responder.item(&self.descriptor, view, &item),
            None => responder.not_found(&self.descriptor),
        }
    }

    fn responder(&self, req: &CrudRequest) -> Box<dyn Responder<T>> {
        responder_for::<T>(req.format)
    }

    /// The record named by the `id` parameter. An id that does not parse is
    /// the same as an unknown one.
    async fn lookup(&self, req: &CrudRequest) -> Result<Option<T>, CrudError> {
        let Some(id) = req.id.as_deref().and_then(|raw| raw.parse::<T::Id>().ok()) else {
            debug!(id = ?req.id, "Unparseable id");
            return Ok(None);
        };
        match self.store.find(id).await {
            Ok(item) => Ok(Some(item)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// The submitted attributes, nested under the assigns key. Anything else
    /// (missing, or not a map) counts as no attributes.
    fn attributes(&self, req: &CrudRequest) -> Params {
        match req.params.get(self.descriptor.assigns_key()) {
            Some(Value::Object(attributes)) => attributes.clone(),
            _ => Params::new(),
        }
    }

    async fn current_site(&self, host: &str) -> Result<Site, CrudError> {
        self.sites
            .find_active_by_hostname(host)
            .await?
            .ok_or_else(|| CrudError::SiteNotFound(host.to_string()))
    }
}

fn decode<P: DeserializeOwned>(attributes: &Params) -> Result<P, ValidationErrors> {
    serde_json::from_value(Value::Object(attributes.clone()))
        .map_err(|e| ValidationErrors::base(format!("Invalid attributes: {}", e)))
}

/// The stored record with the submitted attributes written over it.
fn overlay<T: Resource>(existing: &T, attributes: &Params) -> Result<Value, CrudError> {
    let mut record = serde_json::to_value(existing)?;
    if let Value::Object(fields) = &mut record {
        for (name, value) in attributes {
            fields.insert(name.clone(), value.clone());
        }
    }
    Ok(record)
}
