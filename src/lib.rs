pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

// Export API types
pub use api::handlers::AppState;
pub use api::routes::create_router;

pub use error::{ContractError, ContractResult};

// Export logic types
pub use logic::{
    ClauseBook, ContractRegistry, DocumentComposer, DocumentRenderer, PdfRenderer,
    TemplateRegistry,
};

// Export all model types
pub use model::*;

// Export store types
pub use store::{InMemoryStore, PostgresStore, Store};

use crate::config::{AppConfig, StoreBackend};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Connect the configured store and serve the API until shutdown
pub async fn run_server(config: &AppConfig) -> anyhow::Result<()> {
    let renderer: Arc<dyn DocumentRenderer> = Arc::new(PdfRenderer::default());

    match config.database.backend {
        StoreBackend::Postgres => {
            log::info!("Connecting to PostgreSQL...");
            let store =
                PostgresStore::new(&config.database_url(), config.database.max_connections)
                    .await?;

            log::info!("Running database migrations...");
            store.migrate().await?;

            serve(Arc::new(store), renderer, config).await
        }
        StoreBackend::Memory => {
            log::warn!("Using the in-memory store; data will not survive a restart");
            serve(Arc::new(InMemoryStore::new()), renderer, config).await
        }
    }
}

async fn serve<S: Store + 'static>(
    store: Arc<S>,
    renderer: Arc<dyn DocumentRenderer>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    // Load seed data for demonstration (optional)
    if std::env::var("LOAD_SEED_DATA").unwrap_or_default() == "true" {
        log::info!("Loading seed data...");
        seed::load_seed_data(store.clone()).await?;
    }

    let app = create_router().with_state(AppState::new(store, renderer));

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("Contract forms server running on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
