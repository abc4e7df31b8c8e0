use anyhow::Result;
use blog_core::storage::{DatabaseStorage, InMemoryStorage, Storage};
use blog_core::DatabaseManager;
use blog_graphql::config::{Args, Config, StorageBackend};
use blog_graphql::observability::{logging, metrics};
use blog_graphql::server;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

async fn create_storage(backend: &StorageBackend) -> Result<Arc<dyn Storage>> {
    match backend {
        StorageBackend::Database(target) => {
            info!("Initializing database storage...");
            let db_manager = DatabaseManager::new(target).await?;
            db_manager.ensure_schema().await?;
            info!("Database storage initialized successfully");
            Ok(Arc::new(DatabaseStorage::new(Arc::new(db_manager))))
        }
        StorageBackend::InMemory => {
            info!("Using in-memory storage (data will not persist)");
            Ok(Arc::new(InMemoryStorage::new()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let args = Args::parse();
    let config = Config::load(&args, |key| std::env::var(key).ok())?;

    let _log_guard = logging::init_logging(config.log_dir.as_deref())?;

    info!("Starting blog GraphQL API server on {}", config.listen_addr());

    let metrics_handle = if config.metrics_enabled {
        Some(metrics::init()?)
    } else {
        None
    };

    let storage = create_storage(&config.storage).await?;
    let app = server::create_server(storage, metrics_handle);

    server::start_server(app, config.listen_addr()).await
}
