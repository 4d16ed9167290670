//! HTTP server configuration settings.

use std::{borrow::Cow, net::SocketAddr, path::PathBuf};

use serde::Deserialize;

/// HTTP server configuration settings.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// The socket address the server should listen on.
    pub listen_address: Option<SocketAddr>,
    /// Serve HTTPS with these PEM files instead of plain HTTP.
    pub tls: Option<TlsServerConfig>,
    /// Health endpoint configuration.
    #[serde(default)]
    pub health: HealthConfig,
}

/// Certificate and key for HTTPS.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TlsServerConfig {
    /// Path to the certificate chain in PEM format.
    pub certificate: PathBuf,
    /// Path to the private key in PEM format.
    pub key: PathBuf,
}

/// Health endpoint configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HealthConfig {
    /// Whether the health endpoint is served at all.
    pub enabled: bool,
    /// Serve the endpoint on this address instead of the main listener.
    pub listen: Option<SocketAddr>,
    /// Route of the endpoint.
    pub path: Cow<'static, str>,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            listen: None,
            path: Cow::Borrowed("/health"),
        }
    }
}
