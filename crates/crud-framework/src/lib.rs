//! # CRUD Framework
//!
//! Building blocks for administrative CRUD controllers: one generic
//! controller serves list, show, new, create, edit, update and delete for any
//! model, answering in HTML, XML or the extended-JSON format used by grid
//! widgets.
//!
//! ## Architecture Overview
//!
//! 1. **Model Layer** ([`Resource`]) - your record type, its create/update
//!    payloads and lifecycle hooks.
//! 2. **Store Layer** ([`StoreActor`], [`StoreClient`]) - one actor task per
//!    resource type owns the records; controllers talk to it over channels.
//! 3. **Controller Layer** ([`CrudController`]) - the seven admin actions,
//!    written once. Names and paths come from a [`ResourceDescriptor`].
//! 4. **Presentation Layer** ([`Responder`], [`Views`]) - one responder per
//!    [`Format`]; HTML goes through minijinja templates.
//! 5. **HTTP Layer** ([`AdminRouter`]) - `http::Request` in,
//!    `http::Response` out.
//!
//! ## Example
//!
//! ```rust
//! use crud_framework::{
//!     AdminRouter, CrudController, Resource, ResourceDescriptor, Site, SiteDirectory,
//!     StoreActor, ValidationErrors, Views,
//! };
//! use async_trait::async_trait;
//! use serde::{Deserialize, Serialize};
//! use std::sync::Arc;
//!
//! #[derive(Clone, Debug, Serialize)]
//! struct Flange { id: u32, title: String, site_id: Option<u32> }
//!
//! #[derive(Debug, Deserialize)]
//! struct FlangeAttributes { #[serde(default)] title: String }
//!
//! #[async_trait]
//! impl Resource for Flange {
//!     type Id = u32;
//!     type Create = FlangeAttributes;
//!     type Update = FlangeAttributes;
//!     type Error = ValidationErrors;
//!
//!     fn id(&self) -> &u32 { &self.id }
//!     fn from_create_params(id: u32, params: FlangeAttributes) -> Result<Self, Self::Error> {
//!         Ok(Self { id, title: params.title, site_id: None })
//!     }
//!     fn assign_site(&mut self, site: &Site) { self.site_id = Some(site.id); }
//!     async fn on_update(&mut self, update: FlangeAttributes) -> Result<(), Self::Error> {
//!         self.title = update.title;
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, store) = StoreActor::<Flange>::new(8);
//!     let handle = tokio::spawn(actor.run());
//!
//!     let sites = Arc::new(SiteDirectory::new(vec![Site::new(1, "Main", "*")]));
//!     let controller = CrudController::new(ResourceDescriptor::new("Flange"), store, sites);
//!
//!     let mut router = AdminRouter::new("/admin", Views::new());
//!     router.mount(controller).unwrap();
//!
//!     let request = http::Request::post("/admin/flanges")
//!         .header("host", "example.com")
//!         .header("content-type", "application/x-www-form-urlencoded")
//!         .body("flange[title]=Wide".to_string())
//!         .unwrap();
//!     let response = router.handle(request).await;
//!     assert_eq!(response.status(), 302);
//!     assert_eq!(response.headers()["location"], "/admin/flanges/edit/1");
//!
//!     drop(router);
//!     handle.await.unwrap();
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Each store runs in its own Tokio task and handles requests one at a time.
//! - Controllers hold no per-request state and can be shared freely.
//! - A store stops once every client (and so every controller) is dropped.
//!
//! ## Testing
//!
//! [`mock::MockStore`] answers store requests from scripted expectations and
//! logs what it received, so controller behaviour can be tested in every
//! format without a running store.

pub mod actor;
pub mod app;
pub mod client;
pub mod config;
pub mod controller;
pub mod descriptor;
pub mod entity;
pub mod error;
pub mod ext_json;
pub mod format;
pub mod inflect;
pub mod message;
pub mod mock;
pub mod params;
pub mod registry;
pub mod render;
pub mod response;
pub mod routes;
pub mod site;
pub mod validation;
pub mod views;
pub mod xml;

// Re-export core types for convenience
pub use actor::StoreActor;
pub use app::{AdminRouter, CrudEndpoint, FLASH_NOTICE_HEADER};
pub use client::StoreClient;
pub use config::AdminConfig;
pub use controller::{Action, CrudController, CrudRequest};
pub use descriptor::ResourceDescriptor;
pub use entity::Resource;
pub use error::{CrudError, StoreError};
pub use format::Format;
pub use message::{Response, StoreRequest};
pub use params::Params;
pub use registry::ResourceRegistry;
pub use render::{responder_for, Responder};
pub use response::{Assigns, CrudResponse, View};
pub use site::{Site, SiteDirectory, SiteResolver};
pub use validation::ValidationErrors;
pub use views::Views;
