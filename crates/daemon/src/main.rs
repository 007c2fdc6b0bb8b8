//! Courier - Main Entry Point
//! Composition root: settings, logging, storage, policies, JSON-RPC server

mod settings;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Import workspace crates
use courier_api_rpc::{RpcHandler, RpcServer, RpcServerConfig};
use courier_core::application::MessagingService;
use courier_core::port::id_provider::SecureIdProvider;
use courier_core::port::time_provider::SystemTimeProvider;
use courier_core::port::{MessageStore, QueueStore};
use courier_infra_memory::{InMemoryMessageStore, InMemoryQueueStore};
use courier_infra_metrics::PrometheusStats;
use courier_infra_sqlite::{create_pool, run_migrations, SqliteMessageStore, SqliteQueueStore};

use crate::settings::{LogFormat, Settings, StorageBackend};

const VERSION: &str = env!("CARGO_PKG_VERSION");

type Stores = (Arc<dyn QueueStore>, Arc<dyn MessageStore>);

fn init_logging(format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("courier=info"))
        .context("Failed to create env filter")?;

    match format {
        LogFormat::Json => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Pretty => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }
    Ok(())
}

async fn open_stores(settings: &Settings) -> Result<Stores> {
    match settings.storage {
        StorageBackend::Memory => {
            warn!("Using in-memory storage: queues and messages are lost on exit");
            let queues: Arc<dyn QueueStore> = Arc::new(InMemoryQueueStore::new());
            let messages: Arc<dyn MessageStore> = Arc::new(InMemoryMessageStore::new());
            Ok((queues, messages))
        }
        StorageBackend::Sqlite => {
            let database_url = settings.database_url();
            info!(database_url = %database_url, "Initializing database...");

            if let Some(parent) = database_url
                .strip_prefix("sqlite://")
                .filter(|path| !path.contains(":memory:"))
                .and_then(|path| Path::new(path).parent())
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }

            let pool = create_pool(&database_url)
                .await
                .context("DB pool creation failed")?;
            run_migrations(&pool).await.context("Migration failed")?;

            let queues: Arc<dyn QueueStore> = Arc::new(SqliteQueueStore::new(pool.clone()));
            let messages: Arc<dyn MessageStore> = Arc::new(SqliteMessageStore::new(pool));
            Ok((queues, messages))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    let settings = Settings::load()?;

    // 2. Initialize logging
    init_logging(settings.log_format)?;
    info!("Courier v{} starting...", VERSION);

    // 3. Storage
    let (queues, messages) = open_stores(&settings).await?;

    // 4. Access control (immutable once serving)
    let access = Arc::new(settings.access_manager()?);
    let keys = Arc::new(settings.key_manager()?);
    if keys.is_empty() || access.is_empty() {
        warn!(
            keys = keys.len(),
            policies = access.len(),
            "No access keys or no policies configured: every request will be rejected"
        );
    } else {
        info!(keys = keys.len(), policies = access.len(), "Access control loaded");
    }

    // 5. Setup dependencies (DI wiring)
    let stats = Arc::new(PrometheusStats::new());
    let service = Arc::new(MessagingService::new(
        queues,
        messages,
        stats.clone(),
        Arc::new(SecureIdProvider),
        Arc::new(SystemTimeProvider),
    ));

    // 6. Start JSON-RPC server
    let rpc_config = RpcServerConfig {
        host: settings.rpc_host.clone(),
        port: settings.rpc_port,
    };
    let handler = RpcHandler::new(service, access, keys, stats);
    let (addr, rpc_handle) = RpcServer::new(rpc_config, handler)
        .start()
        .await
        .context("RPC server start failed")?;

    info!(address = %addr, "System ready");
    info!("Press Ctrl+C to shutdown");

    // 7. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 8. Graceful shutdown
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    rpc_handle.stopped().await;

    info!("Shutdown complete.");

    Ok(())
}
