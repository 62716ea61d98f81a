/// LaunchDate catalog service entry point
mod clients;
mod config;
mod domain;
mod errors;
mod handlers;
mod repo;
mod routes;
mod services;
mod utils;

#[cfg(test)]
mod test_support;

use crate::clients::{CatalogSource, Collection, LaunchApiClient};
use crate::config::{AppConfig, DataSource};
use crate::handlers::AppState;
use crate::repo::SampleCatalog;
use crate::routes::build_router;
use crate::services::CatalogService;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("launchdate=info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load configuration
    let config = AppConfig::from_env()?;
    info!(
        source = config.data_source.as_str(),
        bind = %config.bind_addr,
        "Configuration loaded successfully"
    );

    // Initialize record source
    let source = build_source(&config)?;

    // Initialize application state
    let catalog = CatalogService::new(source, config.countdown_tick);
    let state = AppState {
        catalog: Arc::new(catalog),
    };

    // Build router
    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("launchdate listening on {}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn build_source(config: &AppConfig) -> anyhow::Result<Arc<dyn CatalogSource>> {
    let source: Arc<dyn CatalogSource> = match config.data_source {
        DataSource::Api => {
            let client = LaunchApiClient::new(config.api_base_url.clone(), config.http_timeout)?;
            info!(base_url = client.base_url(), "Using LaunchDate REST backend");
            Arc::new(client)
        }
        DataSource::Sample => {
            let catalog = SampleCatalog::bundled()?;
            info!(
                launches = catalog.len(Collection::Launches),
                "Using bundled sample catalog"
            );
            Arc::new(catalog)
        }
    };
    Ok(source)
}
