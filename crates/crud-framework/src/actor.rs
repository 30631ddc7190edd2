//! # Object Store Actor
//!
//! `StoreActor<T>` is the persistence side of the admin stack. It owns every
//! record of one resource type and processes [`StoreRequest`]s sequentially in
//! its own Tokio task, so the record map needs no locking.

use crate::client::StoreClient;
use crate::entity::Resource;
use crate::error::StoreError;
use crate::message::StoreRequest;
use indexmap::IndexMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// In-memory object store for one resource type.
///
/// Records are kept in creation order, which is also the order `List`
/// returns them in. Ids come from a `u32` counter starting at 1 and are never
/// reused, even after a failed create or a delete. Once the counter is spent,
/// every further create answers `StoreError::IdsExhausted`.
///
/// # Usage Pattern
///
/// 1. **Create**: `StoreActor::new()` returns the actor (server) and a client.
/// 2. **Run**: spawn `actor.run()` on the runtime.
/// 3. **Use**: clone the client into every controller that needs it. The
///    actor stops once the last client is dropped.
///
/// # Operations
///
/// * **Create**: allocate the id, build with `from_create_params`, call
///   `assign_site`, run `on_create`, then insert. Any failure leaves the store
///   unchanged and answers `StoreError::Invalid`.
/// * **Update**: run `on_update` on a clone and swap it in only on success.
/// * **Delete**: run `on_delete`, then remove.
pub struct StoreActor<T: Resource> {
    receiver: mpsc::Receiver<StoreRequest<T>>,
    store: IndexMap<T::Id, T>,
    /// `None` once `u32::MAX` has been handed out.
    next_id: Option<u32>,
}

impl<T: Resource> StoreActor<T> {
    /// Creates a new `StoreActor` and its associated `StoreClient`.
    ///
    /// `buffer_size` is the channel capacity; callers wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, StoreClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: IndexMap::new(),
            next_id: Some(1),
        };
        (actor, StoreClient::new(sender))
    }

    /// Runs the store's event loop until every client has been dropped.
    pub async fn run(mut self) {
        // "Flange" rather than "admin_crud::model::flange::Flange"
        let resource = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(resource, "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::List { respond_to } => {
                    let items: Vec<T> = self.store.values().cloned().collect();
                    debug!(resource, count = items.len(), "List");
                    let _ = respond_to.send(Ok(items));
                }
                StoreRequest::Count { respond_to } => {
                    debug!(resource, count = self.store.len(), "Count");
                    let _ = respond_to.send(Ok(self.store.len()));
                }
                StoreRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(resource, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                StoreRequest::Create {
                    params,
                    site,
                    respond_to,
                } => {
                    debug!(resource, ?params, site = site.id, "Create");
                    let Some(raw) = self.next_id else {
                        warn!(resource, "Create failed, no ids left");
                        let _ = respond_to.send(Err(StoreError::IdsExhausted));
                        continue;
                    };
                    self.next_id = raw.checked_add(1);
                    let id = T::Id::from(raw);

                    let mut item = match T::from_create_params(id.clone(), params) {
                        Ok(item) => item,
                        Err(e) => {
                            warn!(resource, error = %e, "Create failed");
                            let _ = respond_to.send(Err(StoreError::Invalid(e.into())));
                            continue;
                        }
                    };
                    item.assign_site(&site);
                    if let Err(e) = item.on_create().await {
                        warn!(resource, error = %e, "on_create failed");
                        let _ = respond_to.send(Err(StoreError::Invalid(e.into())));
                        continue;
                    }
                    self.store.insert(id.clone(), item.clone());
                    info!(resource, %id, site = site.id, size = self.store.len(), "Created");
                    let _ = respond_to.send(Ok(item));
                }
                StoreRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(resource, %id, ?update, "Update");
                    let Some(item) = self.store.get_mut(&id) else {
                        warn!(resource, %id, "Not found");
                        let _ = respond_to.send(Err(StoreError::NotFound(id.to_string())));
                        continue;
                    };
                    let mut updated = item.clone();
                    if let Err(e) = updated.on_update(update).await {
                        warn!(resource, %id, error = %e, "Update failed");
                        let _ = respond_to.send(Err(StoreError::Invalid(e.into())));
                        continue;
                    }
                    *item = updated.clone();
                    info!(resource, %id, "Updated");
                    let _ = respond_to.send(Ok(updated));
                }
                StoreRequest::Delete { id, respond_to } => {
                    debug!(resource, %id, "Delete");
                    let Some(item) = self.store.get(&id) else {
                        warn!(resource, %id, "Not found");
                        let _ = respond_to.send(Err(StoreError::NotFound(id.to_string())));
                        continue;
                    };
                    if let Err(e) = item.on_delete().await {
                        warn!(resource, %id, error = %e, "on_delete failed");
                        let _ = respond_to.send(Err(StoreError::Invalid(e.into())));
                        continue;
                    }
                    self.store.shift_remove(&id);
                    info!(resource, %id, size = self.store.len(), "Deleted");
                    let _ = respond_to.send(Ok(()));
                }
            }
        }

        info!(resource, size = self.store.len(), "Shutdown");
    }
}
