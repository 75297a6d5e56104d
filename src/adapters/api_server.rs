use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

use crate::api::{create_router, AppState};
use crate::config::AppConfig;
use crate::error::{KanteiError, Result};
use crate::predictor::PredictionService;

/// Load the model artifacts and serve the API until SIGINT/SIGTERM.
///
/// A failed artifact load does not stop the server: it comes up unready and
/// answers 503 on /health and /predict.
pub async fn start_api_server(config: &AppConfig) -> Result<()> {
    let service = PredictionService::load(&config.model.dir);
    if !service.is_ready() {
        warn!("Starting without a loaded model; predictions will return 503");
    }

    let app_state = AppState::new(service, config.batch.max_size);
    let app = create_router(app_state, &config.server.cors_origins);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| KanteiError::Other(anyhow::anyhow!("invalid bind address: {e}")))?;
    info!("🚀 Real Estate Appraisal API listening on http://{}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down Real Estate Appraisal API...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
