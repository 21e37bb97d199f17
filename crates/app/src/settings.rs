//! Application settings, read from `settings.toml` (see the sample file
//! at the repository root) plus `BRIGADE_*` environment overrides.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Database backing the server.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    /// In-memory sqlite, for local experiments. Data is lost on exit.
    Memory,
    /// Sqlite file at the given path.
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct App {
    /// Tracing level filter applied to all crates (`info`, `debug`, ...).
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub database: Database,
    pub bind: Option<String>,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings"))
            .add_source(Environment::with_prefix("BRIGADE").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
