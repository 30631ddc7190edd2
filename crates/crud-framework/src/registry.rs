//! # Resource Registry
//!
//! Explicit mapping from a model name to the typed store handle serving it.
//! Controllers built from a controller name look their store up here instead
//! of resolving the model type by naming convention at runtime.

use crate::client::StoreClient;
use crate::entity::Resource;
use crate::error::CrudError;
use std::any::Any;
use std::collections::HashMap;
use tracing::debug;

/// Model name (`StrangeRabbit`) to `StoreClient<T>`.
#[derive(Default)]
pub struct ResourceRegistry {
    stores: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the store for `model_name`, replacing any earlier entry.
    pub fn register<T: Resource>(&mut self, model_name: impl Into<String>, store: StoreClient<T>) {
        let model_name = model_name.into();
        debug!(resource = %model_name, "Registered store");
        self.stores.insert(model_name, Box::new(store));
    }

    /// The store registered for `model_name`.
    ///
    /// Fails with [`CrudError::UnknownType`] when the name is unknown or was
    /// registered with a store for a different resource type.
    pub fn lookup<T: Resource>(&self, model_name: &str) -> Result<StoreClient<T>, CrudError> {
        self.stores
            .get(model_name)
            .and_then(|store| store.downcast_ref::<StoreClient<T>>())
            .cloned()
            .ok_or_else(|| CrudError::UnknownType(model_name.to_string()))
    }

    pub fn contains(&self, model_name: &str) -> bool {
        self.stores.contains_key(model_name)
    }

    /// Registered model names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.stores.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("names", &self.names())
            .finish()
    }
}
