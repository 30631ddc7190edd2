//! # Store Client
//!
//! The cloneable handle controllers use to talk to a [`StoreActor`](crate::StoreActor).

use crate::entity::Resource;
use crate::error::StoreError;
use crate::message::StoreRequest;
use crate::site::Site;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

/// A type-safe client for a `StoreActor<T>`.
///
/// Holds only the sender half of the store channel, so cloning is cheap. Every
/// method sends one request and awaits the one-shot reply; a closed channel
/// becomes [`StoreError::StoreClosed`] and a dropped reply becomes
/// [`StoreError::StoreDropped`].
pub struct StoreClient<T: Resource> {
    sender: mpsc::Sender<StoreRequest<T>>,
}

impl<T: Resource> Clone for StoreClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Resource> StoreClient<T> {
    pub fn new(sender: mpsc::Sender<StoreRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R, StoreError>>) -> StoreRequest<T>,
    ) -> Result<R, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)?
    }

    /// All records, in creation order.
    pub async fn list(&self) -> Result<Vec<T>, StoreError> {
        self.request(|respond_to| StoreRequest::List { respond_to })
            .await
    }

    pub async fn count(&self) -> Result<usize, StoreError> {
        self.request(|respond_to| StoreRequest::Count { respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, StoreError> {
        self.request(|respond_to| StoreRequest::Get { id, respond_to })
            .await
    }

    /// Like [`get`](Self::get), but a missing record is an error.
    #[instrument(skip(self))]
    pub async fn find(&self, id: T::Id) -> Result<T, StoreError> {
        let missing = id.to_string();
        match self.get(id).await? {
            Some(item) => Ok(item),
            None => {
                debug!("Record missing");
                Err(StoreError::NotFound(missing))
            }
        }
    }

    /// Build, associate with `site`, validate and store a new record.
    pub async fn create(&self, params: T::Create, site: Site) -> Result<T, StoreError> {
        self.request(|respond_to| StoreRequest::Create {
            params,
            site,
            respond_to,
        })
        .await
    }

    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<T, StoreError> {
        self.request(|respond_to| StoreRequest::Update {
            id,
            update,
            respond_to,
        })
        .await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), StoreError> {
        self.request(|respond_to| StoreRequest::Delete { id, respond_to })
            .await
    }
}
