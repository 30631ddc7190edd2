use crate::model::{Flange, StrangeRabbit};
use crud_framework::{
    AdminConfig, AdminRouter, CrudController, CrudError, Resource, ResourceRegistry, SiteResolver,
    StoreActor, StoreClient,
};
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info};

/// The running admin backend.
///
/// `AdminSystem` is responsible for:
/// - **Lifecycle Management**: starting one store task per model and stopping them again
/// - **Registry**: recording each store under its model name
/// - **Wiring**: building the controllers from the registry and mounting them on one router
///
/// # Example
///
/// ```ignore
/// let system = AdminSystem::new(&AdminConfig::default())?;
/// let response = system.router.handle(request).await;
/// system.shutdown().await?;
/// ```
pub struct AdminSystem {
    /// Entry point for admin HTTP requests.
    pub router: AdminRouter,

    /// Direct access to the flange store, for seeding and inspection.
    pub flanges: StoreClient<Flange>,

    /// Direct access to the strange rabbit store.
    pub strange_rabbits: StoreClient<StrangeRabbit>,

    registry: ResourceRegistry,
    handles: Vec<JoinHandle<()>>,
}

impl AdminSystem {
    /// Start the stores and build the router described by `config`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: &AdminConfig) -> Result<Self, CrudError> {
        let mut registry = ResourceRegistry::new();
        let mut handles = Vec::new();

        let flanges = spawn_store::<Flange>("Flange", config.store_buffer, &mut registry, &mut handles);
        let strange_rabbits = spawn_store::<StrangeRabbit>(
            "StrangeRabbit",
            config.store_buffer,
            &mut registry,
            &mut handles,
        );

        let sites: Arc<dyn SiteResolver> = Arc::new(config.site_directory());
        let prefix = config.route_prefix.as_str();
        let mut router = AdminRouter::new(prefix, config.views());
        router
            .mount(
                CrudController::<Flange>::from_registry(
                    "Admin::FlangesController",
                    &registry,
                    sites.clone(),
                )?
                .with_route_prefix(prefix),
            )?
            .mount(
                CrudController::<StrangeRabbit>::from_registry(
                    "Admin::StrangeRabbitsController",
                    &registry,
                    sites,
                )?
                .with_route_prefix(prefix),
            )?;

        info!(resources = ?registry.names(), prefix = %config.route_prefix, "Admin system started");
        Ok(Self {
            router,
            flanges,
            strange_rabbits,
            registry,
            handles,
        })
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Gracefully shuts down every store.
    ///
    /// Dropping the router, the registry and the direct clients closes the
    /// store channels; each store then finishes its loop and its task is
    /// awaited. Fails if a store task panicked.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        info!("Shutting down admin system...");

        drop(self.router);
        drop(self.registry);
        drop(self.flanges);
        drop(self.strange_rabbits);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Store task failed: {:?}", e);
                return Err(e);
            }
        }

        info!("Admin system shutdown complete.");
        Ok(())
    }
}

fn spawn_store<T: Resource>(
    model_name: &str,
    buffer: usize,
    registry: &mut ResourceRegistry,
    handles: &mut Vec<JoinHandle<()>>,
) -> StoreClient<T> {
    let (actor, client) = StoreActor::<T>::new(buffer);
    handles.push(tokio::spawn(actor.run()));
    registry.register(model_name, client.clone());
    client
}
