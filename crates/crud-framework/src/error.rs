//! # Framework Errors
//!
//! Two layers of errors live here. [`StoreError`] is what the object store
//! reports back over its response channel. [`CrudError`] is what a controller
//! action returns when it cannot turn a failure into a format-specific
//! response on its own.
//!
//! Controllers absorb `StoreError::NotFound` and `StoreError::Invalid` into
//! redirects and negative payloads; everything else bubbles up with `?`.

use crate::validation::ValidationErrors;

/// Errors reported by a [`StoreActor`](crate::StoreActor) and its client.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("Store closed")]
    StoreClosed,
    #[error("Store dropped response channel")]
    StoreDropped,
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("No ids left to allocate")]
    IdsExhausted,
    #[error("Validation failed: {0}")]
    Invalid(ValidationErrors),
}

/// Errors surfaced by controllers, the registry and the HTTP adapter.
#[derive(Debug, thiserror::Error)]
pub enum CrudError {
    #[error("Unknown resource type: {0}")]
    UnknownType(String),
    #[error("Unknown response format: {0}")]
    UnknownFormat(String),
    #[error("Unknown action: {0}")]
    UnknownAction(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("No active site for host: {0}")]
    SiteNotFound(String),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Serialization failed: {0}")]
    Serialization(String),
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] http::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CrudError {
    pub(crate) fn serialization(e: impl std::fmt::Display) -> Self {
        CrudError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for CrudError {
    fn from(e: serde_json::Error) -> Self {
        CrudError::serialization(e)
    }
}
