//! Core service façade and bootstrap helpers.
//!
//! This crate wires the archive store, the host HTTP bridge and the YouTube
//! connector into the sync core. Desktop builds enable the `desktop-shims`
//! feature (which depends on `bridge-desktop`) to get a reqwest-backed HTTP
//! client; other hosts inject their own through `CoreConfig::http_client`.

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use bridge_traits::{
    catalog::MediaCatalog,
    http::HttpClient,
    time::{Clock, SystemClock},
};
use core_library::{
    db::{create_pool, DatabaseConfig},
    ArchiveRepository, SqliteArchiveRepository,
};
use core_runtime::config::{CoreConfig, StoreConfig, SyncSettings};
use core_sync::{ArchiveSelector, ArchiveStatus, ArchiveSyncCoordinator, SyncReport};
use provider_youtube::YouTubeConnector;
use sqlx::SqlitePool;
use tracing::info;

/// Aggregated handle to everything a sync run depends on.
pub struct CoreDependencies {
    pub pool: SqlitePool,
    pub http_client: Arc<dyn HttpClient>,
    pub catalog: Arc<dyn MediaCatalog>,
    pub clock: Arc<dyn Clock>,
}

impl CoreDependencies {
    /// Construct a dependency bundle from explicit handles.
    pub fn new(
        pool: SqlitePool,
        http_client: Arc<dyn HttpClient>,
        catalog: Arc<dyn MediaCatalog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            pool,
            http_client,
            catalog,
            clock,
        }
    }
}

/// Primary façade used by the `archive-sync` binary and embedding hosts.
#[derive(Clone)]
pub struct CoreService {
    deps: Arc<CoreDependencies>,
    coordinator: Arc<ArchiveSyncCoordinator>,
}

impl CoreService {
    /// Create a new service from the provided dependencies.
    pub fn new(deps: CoreDependencies, settings: SyncSettings) -> Result<Self> {
        let archives: Arc<dyn ArchiveRepository> =
            Arc::new(SqliteArchiveRepository::new(deps.pool.clone()));
        let coordinator = ArchiveSyncCoordinator::new(
            archives,
            deps.catalog.clone(),
            deps.clock.clone(),
            settings,
        )?;

        Ok(Self {
            deps: Arc::new(deps),
            coordinator: Arc::new(coordinator),
        })
    }

    /// Build the full service from configuration.
    ///
    /// Opens (and migrates) the archive store, resolves the HTTP client and
    /// creates the YouTube connector.
    ///
    /// ```ignore
    /// use core_runtime::config::CoreConfigBuilder;
    /// use core_service::CoreService;
    ///
    /// let config = CoreConfigBuilder::from_env()?.build()?;
    /// let service = CoreService::bootstrap(config).await?;
    /// let report = service.run_sync().await?;
    /// ```
    pub async fn bootstrap(config: CoreConfig) -> Result<Self> {
        let pool = create_pool(DatabaseConfig::new(&config.database_path)).await?;
        let http_client = resolve_http_client(&config)?;

        let catalog: Arc<dyn MediaCatalog> = Arc::new(
            YouTubeConnector::new(http_client.clone(), config.youtube.api_key.clone())
                .with_timeout(config.youtube.request_timeout),
        );

        info!(
            database = %config.database_path.display(),
            "Archive sync service initialized"
        );

        Self::new(
            CoreDependencies::new(pool, http_client, catalog, Arc::new(SystemClock)),
            config.sync,
        )
    }

    /// Access the dependencies being used by the service.
    pub fn dependencies(&self) -> Arc<CoreDependencies> {
        Arc::clone(&self.deps)
    }

    /// Perform one selection-and-sync pass.
    pub async fn run_sync(&self) -> Result<SyncReport> {
        Ok(self.coordinator.run().await?)
    }

    /// Count top-level, due and child records.
    pub async fn status(&self) -> Result<ArchiveStatus> {
        Ok(self.coordinator.status().await?)
    }
}

/// Read the store status without remote credentials.
pub async fn archive_status(config: &StoreConfig) -> Result<ArchiveStatus> {
    let pool = create_pool(DatabaseConfig::new(&config.database_path)).await?;
    let archives: Arc<dyn ArchiveRepository> = Arc::new(SqliteArchiveRepository::new(pool));
    let selector = ArchiveSelector::new(archives.clone(), Arc::new(SystemClock), config.sync.clone());

    Ok(ArchiveStatus {
        top_level: archives.count_top_level().await?,
        due: selector.count_due().await?,
        children: archives.count_children().await?,
    })
}

fn resolve_http_client(config: &CoreConfig) -> Result<Arc<dyn HttpClient>> {
    if let Some(client) = &config.http_client {
        return Ok(client.clone());
    }

    #[cfg(feature = "desktop-shims")]
    {
        use bridge_desktop::{HttpClientConfig, ReqwestHttpClient};

        let client = ReqwestHttpClient::from_config(
            HttpClientConfig::default()
                .with_timeout(config.youtube.request_timeout)
                .with_keep_alive(config.youtube.keep_alive),
        )
        .map_err(|e| CoreError::InitializationFailed(e.to_string()))?;

        Ok(Arc::new(client))
    }

    #[cfg(not(feature = "desktop-shims"))]
    {
        Err(CoreError::CapabilityMissing {
            capability: "HttpClient".to_string(),
            message: "No HTTP client provided. Inject one via CoreConfig::http_client or enable \
                      the desktop-shims feature."
                .to_string(),
        })
    }
}
