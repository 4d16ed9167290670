use std::net::SocketAddr;

use anyhow::anyhow;
use axum::{Json, Router, routing::get};
use config::{HealthConfig, TlsServerConfig};
use http::StatusCode;

#[derive(Debug, serde::Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub(crate) enum HealthState {
    /// The server is up and answering requests.
    Healthy,
}

/// Handles health check requests and returns the current health status of the server.
pub(crate) async fn health() -> (StatusCode, Json<HealthState>) {
    (StatusCode::OK, Json(HealthState::Healthy))
}

/// Health route to merge into the main application.
pub(super) fn router(config: &HealthConfig) -> Router {
    Router::new().route(&config.path, get(health))
}

/// Serves the health endpoint on its own listener until the process ends.
pub(super) async fn serve_separately(addr: SocketAddr, tls_config: Option<TlsServerConfig>, config: HealthConfig) {
    if let Err(e) = bind_health_endpoint(addr, tls_config, &config).await {
        log::error!("Health endpoint on {addr} stopped: {e}");
    }
}

async fn bind_health_endpoint(
    addr: SocketAddr,
    tls_config: Option<TlsServerConfig>,
    config: &HealthConfig,
) -> anyhow::Result<()> {
    let app = router(config).into_make_service();

    match tls_config {
        Some(tls) => {
            let rustls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(&tls.certificate, &tls.key)
                .await
                .map_err(|e| anyhow!("Failed to load TLS certificate and key: {e}"))?;

            log::info!("Health check endpoint exposed at https://{addr}{}", config.path);

            axum_server::bind_rustls(addr, rustls_config).serve(app).await?;
        }
        None => {
            log::info!("Health check endpoint exposed at http://{addr}{}", config.path);

            axum_server::bind(addr).serve(app).await?;
        }
    }

    Ok(())
}
