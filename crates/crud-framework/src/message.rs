//! # Store Messages
//!
//! Request types exchanged between a [`StoreClient`](crate::StoreClient) and
//! its [`StoreActor`](crate::StoreActor).

use crate::entity::Resource;
use crate::error::StoreError;
use crate::site::Site;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the store.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// A request to the object store.
///
/// The variants are the persistence operations the generic controller needs:
/// `List` and `Count` back the index action, `Get` backs every lookup by id,
/// and `Create`/`Update`/`Delete` carry the writes. `Create` carries the
/// resolved [`Site`] so the record is associated with its tenant before it is
/// validated and stored.
#[derive(Debug)]
pub enum StoreRequest<T: Resource> {
    List {
        respond_to: Response<Vec<T>>,
    },
    Count {
        respond_to: Response<usize>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Create {
        params: T::Create,
        site: Site,
        respond_to: Response<T>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
}
