//! Relay server library.
//!
//! Provides a reusable server function to serve the relay either for the binary, or for the integration tests.

#![deny(missing_docs)]

mod health;

use std::{net::SocketAddr, sync::Arc};

use anyhow::anyhow;
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use config::Config;
use llm::Provider;
use tokio::net::TcpListener;

/// Configuration for serving the relay.
pub struct ServeConfig {
    /// The socket address (IP and port) the server will bind to
    pub listen_address: SocketAddr,
    /// The deserialized relay TOML configuration.
    pub config: Config,
    /// Produces the text every chat completion is built from.
    pub provider: Arc<dyn Provider>,
}

/// Starts and runs the relay server with the provided configuration.
pub async fn serve(
    ServeConfig {
        listen_address,
        config,
        provider,
    }: ServeConfig,
) -> anyhow::Result<()> {
    let mut app = Router::new();

    if config.llm.enabled() {
        app = app.merge(llm::router(&config.llm, provider));
    } else {
        log::debug!("LLM endpoints are disabled and will not be exposed");
    }

    if config.server.health.enabled {
        if let Some(listen) = config.server.health.listen {
            tokio::spawn(health::serve_separately(
                listen,
                config.server.tls.clone(),
                config.server.health.clone(),
            ));
        } else {
            app = app.merge(health::router(&config.server.health));
        }
    }

    let listener = TcpListener::bind(listen_address)
        .await
        .map_err(|e| anyhow!("Failed to bind to {listen_address}: {e}"))?;

    let scheme = if config.server.tls.is_some() { "https" } else { "http" };

    if config.llm.enabled() {
        log::info!("LLM endpoint available at: {scheme}://{listen_address}{}", config.llm.path);
    }

    match &config.server.tls {
        Some(tls_config) => {
            let rustls_config = RustlsConfig::from_pem_file(&tls_config.certificate, &tls_config.key)
                .await
                .map_err(|e| anyhow!("Failed to load TLS certificate and key: {e}"))?;

            axum_server::from_tcp_rustls(listener.into_std()?, rustls_config)
                .serve(app.into_make_service())
                .await
                .map_err(|e| anyhow!("Failed to start HTTPS server: {e}"))?;
        }
        None => {
            axum::serve(listener, app)
                .await
                .map_err(|e| anyhow!("Failed to start HTTP server: {e}"))?;
        }
    }

    Ok(())
}
