//! Server configuration.
//!
//! Command-line flags with environment fallbacks, resolved into a
//! serializable `ServerConfig` with defaults.

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which store backs the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// File-backed SQLite database, one connection per request.
    #[default]
    Sqlite,
    /// Process-local store, lost on exit. Development only.
    Memory,
}

/// Command-line interface of the `wowscales` binary.
#[derive(Debug, Parser)]
#[command(name = "wowscales", version, about = "WOW Scales verification records API")]
pub struct Cli {
    /// Address to bind to.
    #[arg(long, env = "HOST", default_value_t = default_host())]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = default_port())]
    pub port: u16,

    /// Record store backend.
    #[arg(long, env = "WOWSCALES_STORE", value_enum, default_value_t = StoreKind::Sqlite)]
    pub store: StoreKind,

    /// SQLite database file (created and migrated on startup).
    #[arg(long, env = "DATABASE_PATH", default_value_os_t = default_database_path())]
    pub database_path: PathBuf,

    /// trace|debug|info|warn|error. Defaults by build mode.
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; stderr only when unset.
    #[arg(long, env = "LOG_DIR")]
    pub log_dir: Option<String>,

    /// Allowed CORS origin; repeat or comma-separate. Empty allows any origin.
    #[arg(long = "cors-origin", env = "CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,
}

impl Cli {
    pub fn into_config(self) -> ServerConfig {
        ServerConfig {
            host: self.host,
            port: self.port,
            store: self.store,
            database_path: self.database_path,
            log_level: self
                .log_level
                .unwrap_or_else(|| wowscales_core::default_log_level().to_string()),
            log_dir: self.log_dir.filter(|dir| !dir.trim().is_empty()),
            cors_origins: self
                .cors_origins
                .into_iter()
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
        }
    }
}

/// Resolved server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub store: StoreKind,

    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_dir: Option<String>,

    /// Empty means any origin is allowed.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_database_path() -> PathBuf {
    PathBuf::from("wowscales.sqlite3")
}

fn default_log_level() -> String {
    wowscales_core::default_log_level().to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            store: StoreKind::default(),
            database_path: default_database_path(),
            log_level: default_log_level(),
            log_dir: None,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Default config listening on `port`.
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// `host:port` as given; may be a hostname.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
