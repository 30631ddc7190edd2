//! # Mock Store & Testing Guide
//!
//! `MockStore<T>` hands out a real [`StoreClient<T>`] whose requests are
//! answered from a FIFO queue of expectations instead of an in-memory store.
//! Controllers cannot tell the difference, which makes it the tool of choice
//! for testing controller behaviour in every format.
//!
//! ## When to use Mocks vs Real Stores
//!
//! | Feature | MockStore | StoreActor |
//! |---------|-----------|------------|
//! | **Speed** | Instant | Fast (spawns a task) |
//! | **State** | None (scripted answers) | Real records |
//! | **Assertions** | Every received request is logged | Inspect state afterwards |
//! | **Error Injection** | `return_err(..)` | Needs a failing hook |
//!
//! ## Example
//!
//! ```rust
//! use crud_framework::mock::{MockStore, Received};
//! use crud_framework::{Resource, Site, StoreError, ValidationErrors};
//! use async_trait::async_trait;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Debug, PartialEq, Serialize)]
//! struct Flange { id: u32 }
//! #[derive(Debug, Deserialize)] struct FlangeAttributes {}
//!
//! #[async_trait]
//! impl Resource for Flange {
//!     type Id = u32; type Create = FlangeAttributes; type Update = FlangeAttributes;
//!     type Error = ValidationErrors;
//!     fn id(&self) -> &u32 { &self.id }
//!     fn from_create_params(id: u32, _: FlangeAttributes) -> Result<Self, Self::Error> { Ok(Self { id }) }
//!     fn assign_site(&mut self, _: &Site) {}
//!     async fn on_update(&mut self, _: FlangeAttributes) -> Result<(), Self::Error> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockStore::<Flange>::new();
//!     mock.expect_get(1).return_ok(Some(Flange { id: 1 }));
//!     mock.expect_delete(1).return_err(StoreError::StoreClosed);
//!
//!     let store = mock.client();
//!     assert_eq!(store.find(1).await.unwrap(), Flange { id: 1 });
//!     assert_eq!(store.delete(1).await, Err(StoreError::StoreClosed));
//!
//!     assert!(matches!(mock.take_received()[..], [Received::Get(1), Received::Delete(1)]));
//!     mock.verify();
//! }
//! ```
//!
//! A request that does not match the next expectation (wrong kind or wrong
//! id), or arrives when none is queued, is recorded as a failure and its
//! response channel is dropped, so the caller sees
//! [`StoreError::StoreDropped`]. [`MockStore::verify`] panics on recorded
//! failures and on unmet expectations.

use crate::client::StoreClient;
use crate::entity::Resource;
use crate::error::StoreError;
use crate::message::StoreRequest;
use crate::site::Site;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

enum Expectation<T: Resource> {
    List(Result<Vec<T>, StoreError>),
    Count(Result<usize, StoreError>),
    Get {
        id: T::Id,
        response: Result<Option<T>, StoreError>,
    },
    Create(Result<T, StoreError>),
    Update {
        id: T::Id,
        response: Result<T, StoreError>,
    },
    Delete {
        id: T::Id,
        response: Result<(), StoreError>,
    },
}

impl<T: Resource> Expectation<T> {
    fn describe(&self) -> String {
        match self {
            Expectation::List(_) => "List".to_string(),
            Expectation::Count(_) => "Count".to_string(),
            Expectation::Get { id, .. } => format!("Get({id})"),
            Expectation::Create(_) => "Create".to_string(),
            Expectation::Update { id, .. } => format!("Update({id})"),
            Expectation::Delete { id, .. } => format!("Delete({id})"),
        }
    }
}

/// A request the mock received, with everything it carried.
#[derive(Debug)]
pub enum Received<T: Resource> {
    List,
    Count,
    Get(T::Id),
    Create { params: T::Create, site: Site },
    Update { id: T::Id, update: T::Update },
    Delete(T::Id),
}

type Shared<X> = Arc<Mutex<X>>;

fn lock<X>(shared: &Mutex<X>) -> MutexGuard<'_, X> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A scripted object store.
pub struct MockStore<T: Resource> {
    client: StoreClient<T>,
    expectations: Shared<VecDeque<Expectation<T>>>,
    received: Shared<Vec<Received<T>>>,
    failures: Shared<Vec<String>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: Resource> Default for MockStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Resource> MockStore<T> {
    /// Creates a mock with no expectations. Must be called inside a Tokio
    /// runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<StoreRequest<T>>(100);
        let expectations: Shared<VecDeque<Expectation<T>>> = Arc::default();
        let received: Shared<Vec<Received<T>>> = Arc::default();
        let failures: Shared<Vec<String>> = Arc::default();

        let handle = {
            let expectations = expectations.clone();
            let received = received.clone();
            let failures = failures.clone();
            tokio::spawn(async move {
                while let Some(request) = receiver.recv().await {
                    let expectation = lock(&expectations).pop_front();
                    if let Err(failure) = answer(request, expectation, &mut lock(&received)) {
                        lock(&failures).push(failure);
                    }
                }
            })
        };

        Self {
            client: StoreClient::new(sender),
            expectations,
            received,
            failures,
            _handle: handle,
        }
    }

    /// Returns the client to hand to the code under test.
    pub fn client(&self) -> StoreClient<T> {
        self.client.clone()
    }

    pub fn expect_list(&self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(Expectation::List)
    }

    pub fn expect_count(&self) -> ExpectationBuilder<T, usize> {
        self.builder(Expectation::Count)
    }

    pub fn expect_get(&self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.builder(move |response| Expectation::Get { id, response })
    }

    pub fn expect_create(&self) -> ExpectationBuilder<T, T> {
        self.builder(Expectation::Create)
    }

    pub fn expect_update(&self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(move |response| Expectation::Update { id, response })
    }

    pub fn expect_delete(&self, id: T::Id) -> ExpectationBuilder<T, ()> {
        self.builder(move |response| Expectation::Delete { id, response })
    }

    fn builder<R>(
        &self,
        make: impl FnOnce(Result<R, StoreError>) -> Expectation<T> + 'static,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
            make: Box::new(make),
        }
    }

    /// Drains and returns every request received so far, oldest first.
    pub fn take_received(&self) -> Vec<Received<T>> {
        std::mem::take(&mut *lock(&self.received))
    }

    /// Panics if a request did not match its expectation or if expectations
    /// remain unmet.
    pub fn verify(&self) {
        let failures = lock(&self.failures);
        if !failures.is_empty() {
            panic!("Mock store received unexpected requests: {}", failures.join("; "));
        }
        let remaining: Vec<String> = lock(&self.expectations)
            .iter()
            .map(Expectation::describe)
            .collect();
        if !remaining.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining: {}",
                remaining.len(),
                remaining.join(", ")
            );
        }
    }
}

fn answer<T: Resource>(
    request: StoreRequest<T>,
    expectation: Option<Expectation<T>>,
    log: &mut Vec<Received<T>>,
) -> Result<(), String> {
    let mismatch = |got: String, expectation: &Option<Expectation<T>>| match expectation {
        Some(expected) => format!("expected {}, got {}", expected.describe(), got),
        None => format!("no expectation left for {}", got),
    };

    match (request, expectation) {
        (StoreRequest::List { respond_to }, Some(Expectation::List(response))) => {
            log.push(Received::List);
            let _ = respond_to.send(response);
        }
        (StoreRequest::Count { respond_to }, Some(Expectation::Count(response))) => {
            log.push(Received::Count);
            let _ = respond_to.send(response);
        }
        (StoreRequest::Get { id, respond_to }, Some(Expectation::Get { id: expected, response }))
            if id == expected =>
        {
            log.push(Received::Get(id));
            let _ = respond_to.send(response);
        }
        (
            StoreRequest::Create {
                params,
                site,
                respond_to,
            },
            Some(Expectation::Create(response)),
        ) => {
            log.push(Received::Create { params, site });
            let _ = respond_to.send(response);
        }
        (
            StoreRequest::Update {
                id,
                update,
                respond_to,
            },
            Some(Expectation::Update { id: expected, response }),
        ) if id == expected => {
            log.push(Received::Update { id, update });
            let _ = respond_to.send(response);
        }
        (StoreRequest::Delete { id, respond_to }, Some(Expectation::Delete { id: expected, response }))
            if id == expected =>
        {
            log.push(Received::Delete(id));
            let _ = respond_to.send(response);
        }
        (request, expectation) => {
            let got = match request {
                StoreRequest::List { .. } => "List".to_string(),
                StoreRequest::Count { .. } => "Count".to_string(),
                StoreRequest::Get { id, .. } => format!("Get({id})"),
                StoreRequest::Create { .. } => "Create".to_string(),
                StoreRequest::Update { id, .. } => format!("Update({id})"),
                StoreRequest::Delete { id, .. } => format!("Delete({id})"),
            };
            return Err(mismatch(got, &expectation));
        }
    }
    Ok(())
}

/// Completes an expectation with the answer the mock should give.
pub struct ExpectationBuilder<T: Resource, R> {
    expectations: Shared<VecDeque<Expectation<T>>>,
    make: Box<dyn FnOnce(Result<R, StoreError>) -> Expectation<T>>,
}

impl<T: Resource, R> ExpectationBuilder<T, R> {
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: StoreError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, StoreError>) {
        let expectation = (self.make)(response);
        lock(&self.expectations).push_back(expectation);
    }
}
