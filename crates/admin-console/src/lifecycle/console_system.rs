use crate::clients::{
    ClassClient, EnterpriseClient, PackageClient, PromoCodeClient, ReportClient, RoleClient,
};
use crate::config::ConsoleConfig;
use crate::error::ConsoleError;
use crate::http::HttpGateway;
use std::sync::{Arc, Mutex, PoisonError};
use sync_framework::{
    CollectionActor, MutationCoordinator, QueryHandle, Resource, ResourceClient, SharedGateway,
    SyncSettings,
};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Composition root of the admin console.
///
/// `ConsoleSystem` owns one collection actor per resource and hands out the typed
/// clients screens use. All clients share one [`SharedGateway`].
///
/// # Example
///
/// ```ignore
/// let config = ConsoleConfig::load()?;
/// let system = ConsoleSystem::from_config(&config)?;
///
/// let list = system.open_list::<PromoCodes, _>(&system.promo_codes);
/// list.search("SPRING").await?;
/// system.promo_codes.toggle_active(RecordId::new("p-1")).await?;
///
/// system.shutdown().await?;
/// ```
pub struct ConsoleSystem {
    pub enterprises: EnterpriseClient,
    pub classes: ClassClient,
    pub packages: PackageClient,
    pub promo_codes: PromoCodeClient,
    pub roles: RoleClient,
    pub reports: ReportClient,

    /// Settings list screens are opened with.
    pub settings: SyncSettings,

    /// Task handles for all running actors (used for graceful shutdown)
    handles: Vec<JoinHandle<()>>,

    /// Debouncers of list screens opened through [`ConsoleSystem::open_list`]
    lists: Mutex<Vec<JoinHandle<()>>>,
}

impl ConsoleSystem {
    /// Spawns every collection actor and wires its client to `gateway`.
    pub fn new(gateway: SharedGateway, settings: SyncSettings) -> Self {
        let mut handles = Vec::with_capacity(6);

        let enterprises =
            EnterpriseClient::new(spawn_collection(&gateway, &settings, &mut handles));
        let classes = ClassClient::new(spawn_collection(&gateway, &settings, &mut handles));
        let packages = PackageClient::new(spawn_collection(&gateway, &settings, &mut handles));
        let promo_codes = PromoCodeClient::new(spawn_collection(&gateway, &settings, &mut handles));
        let roles = RoleClient::new(spawn_collection(&gateway, &settings, &mut handles));
        let reports = ReportClient::new(spawn_collection(&gateway, &settings, &mut handles));

        info!(collections = handles.len(), "Console system started");
        Self {
            enterprises,
            classes,
            packages,
            promo_codes,
            roles,
            reports,
            settings,
            handles,
            lists: Mutex::new(Vec::new()),
        }
    }

    /// Builds the system on an [`HttpGateway`] for `config.api`.
    pub fn from_config(config: &ConsoleConfig) -> Result<Self, ConsoleError> {
        let gateway: SharedGateway = Arc::new(HttpGateway::new(&config.api)?);
        Ok(Self::new(gateway, config.sync))
    }

    /// Opens a debounced list screen that [`shutdown`](Self::shutdown) stops even if
    /// the returned handle is still alive.
    pub fn open_list<R, C>(&self, client: &C) -> QueryHandle
    where
        R: Resource,
        C: ResourceClient<R>,
    {
        let (handle, task) = client.open_list(&self.settings);
        self.lists
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(task);
        handle
    }

    /// Gracefully shuts down every list screen and collection actor.
    ///
    /// Debouncers opened with [`open_list`](Self::open_list) are stopped first, then
    /// dropping the clients closes the actors' channels. A list started straight from
    /// [`ResourceClient::open_list`] holds its own coordinator: drop its handle and
    /// await its task before calling this, or the matching actor never stops.
    pub async fn shutdown(self) -> Result<(), ConsoleError> {
        info!("Shutting down console...");

        let Self {
            enterprises,
            classes,
            packages,
            promo_codes,
            roles,
            reports,
            handles,
            lists,
            ..
        } = self;

        let lists = lists.into_inner().unwrap_or_else(PoisonError::into_inner);
        for list in &lists {
            list.abort();
        }
        for list in lists {
            match list.await {
                Err(e) if !e.is_cancelled() => {
                    error!("List screen failed: {:?}", e);
                    return Err(ConsoleError::Communication(format!("List screen failed: {e}")));
                }
                _ => debug!("List screen stopped"),
            }
        }

        drop(enterprises);
        drop(classes);
        drop(packages);
        drop(promo_codes);
        drop(roles);
        drop(reports);

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Collection actor failed: {:?}", e);
                return Err(ConsoleError::Communication(format!(
                    "Collection actor failed: {e}"
                )));
            }
        }

        info!("Console shutdown complete.");
        Ok(())
    }
}

fn spawn_collection<R: Resource>(
    gateway: &SharedGateway,
    settings: &SyncSettings,
    handles: &mut Vec<JoinHandle<()>>,
) -> MutationCoordinator<R> {
    let (actor, collection) = CollectionActor::<R>::new(settings.buffer_size);
    handles.push(tokio::spawn(actor.run()));
    MutationCoordinator::new(gateway.clone(), collection)
}
