use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ai_client::Gemini;
use shoefinder_api::analysis::{AnalysisGateway, INTENT_INSTRUCTION};
use shoefinder_api::catalog::MySqlCatalog;
use shoefinder_api::{build_router, AppState};
use shoefinder_common::Config;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let config = Config::from_env()?;

    let catalog = MySqlCatalog::connect(&config).await?;
    info!(host = %config.db_host, database = %config.db_name, "Connected to MySQL catalog");

    let mut gemini = Gemini::new(&config.gemini_api_key, &config.gemini_model)
        .with_system_instruction(INTENT_INSTRUCTION);
    if let Some(ref url) = config.gemini_base_url {
        gemini = gemini.with_base_url(url);
    }
    info!(model = %gemini.model(), "Gemini analysis configured");

    let state = Arc::new(AppState {
        analyzer: AnalysisGateway::new(Arc::new(gemini)),
        catalog: Arc::new(catalog.clone()),
    });

    let app = build_router(state, &config.allowed_origins);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Shoefinder API listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    catalog.close().await;
    info!("Shut down cleanly");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
