//! Relay configuration structures to map the relay.toml configuration.

#![deny(missing_docs)]

mod llm;
mod loader;
mod server;

use std::path::Path;

pub use llm::{DEFAULT_MODEL, LlmConfig};
use serde::Deserialize;
pub use server::{HealthConfig, ServerConfig, TlsServerConfig};

/// Main configuration structure for the relay.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP server configuration settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Chat completion endpoint settings.
    #[serde(default)]
    pub llm: LlmConfig,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
        loader::load(path)
    }

    /// Validates values serde cannot check on its own.
    pub fn validate(&self) -> anyhow::Result<()> {
        loader::validate(self)
    }
}
