//! # Resource Trait
//!
//! The `Resource` trait is the contract every administrable model implements so
//! that one [`StoreActor`](crate::StoreActor) and one
//! [`CrudController`](crate::CrudController) can serve it. It names the id type,
//! the create and update payloads (deserialized straight from request
//! attributes), and the error type its hooks report, and it provides lifecycle
//! hooks that run inside the store task.
//!
//! # Provided Methods (Hooks)
//! - [`Resource::on_create`] runs after the record is built and associated with
//!   its site, right before it is stored. Reject it here to fail validation.
//! - [`Resource::on_delete`] runs right before the record is removed.
//!
//! Both default to `Ok(())`.

use crate::site::Site;
use crate::validation::ValidationErrors;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::str::FromStr;

/// Trait that any model must implement to be managed by the admin CRUD stack.
///
/// ```rust
/// use crud_framework::{Resource, Site, ValidationErrors};
/// use async_trait::async_trait;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Debug, Serialize)]
/// struct Flange { id: u32, title: String, site_id: Option<u32> }
///
/// #[derive(Debug, Deserialize)]
/// struct FlangeAttributes { #[serde(default)] title: String }
///
/// #[derive(Debug, Deserialize)]
/// struct FlangeUpdate { title: Option<String> }
///
/// #[async_trait]
/// impl Resource for Flange {
///     type Id = u32;
///     type Create = FlangeAttributes;
///     type Update = FlangeUpdate;
///     type Error = ValidationErrors;
///
///     fn id(&self) -> &u32 { &self.id }
///
///     fn from_create_params(id: u32, params: FlangeAttributes) -> Result<Self, Self::Error> {
///         Ok(Self { id, title: params.title, site_id: None })
///     }
///
///     fn assign_site(&mut self, site: &Site) { self.site_id = Some(site.id); }
///
///     async fn on_update(&mut self, update: FlangeUpdate) -> Result<(), Self::Error> {
///         if let Some(title) = update.title { self.title = title; }
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Resource: Clone + Serialize + Send + Sync + 'static {
    /// The unique identifier. Path parameters are parsed with `FromStr`;
    /// new ids are allocated from a `u32` sequence.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + FromStr + From<u32> + Serialize;

    /// Attributes submitted to build a new record.
    type Create: DeserializeOwned + Send + Sync + Debug;

    /// Attributes submitted to change an existing record.
    type Update: DeserializeOwned + Send + Sync + Debug;

    /// The error reported by construction and hooks. It always ends up as
    /// validation errors on the form or payload.
    type Error: std::error::Error + Into<ValidationErrors> + Send + Sync + 'static;

    fn id(&self) -> &Self::Id;

    /// Construct the record from its freshly allocated id and the submitted
    /// attributes. Called before `assign_site` and `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Associate the record with the tenant it was created under.
    fn assign_site(&mut self, site: &Site);

    // --- Lifecycle Hooks (Async) ---

    async fn on_create(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Apply an update. The store runs this on a copy and only keeps the copy
    /// when the hook succeeds.
    async fn on_update(&mut self, update: Self::Update) -> Result<(), Self::Error>;

    async fn on_delete(&self) -> Result<(), Self::Error> {
        Ok(())
    }
}
