//! # Configuration
//!
//! Layered settings, lowest to highest precedence:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config <file>`, or `ppc.toml` in the working directory)
//! 3. Environment (`PPC_DATA_FILE`, `PPC_HOST`, `PPC_PORT`, `PPC_RATE_LIMIT`,
//!    `PPC_CORS_ORIGINS`)
//! 4. CLI flags (applied by the caller)
//!
//! ```toml
//! [data]
//! file = "curriculo.json"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! rate_limit = 100
//! cors_origins = "http://localhost:3000"
//! ```

use ppc_core::PpcError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "ppc.toml";

/// Working-set file used when nothing else is configured.
pub const DEFAULT_DATA_FILE: &str = "curriculo.json";

/// Default requests per second of the HTTP API.
pub const DEFAULT_RATE_LIMIT: u32 = 100;

// =============================================================================
// FILE SHAPE
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub data: Option<DataSection>,
    pub server: Option<ServerSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataSection {
    pub file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub rate_limit: Option<u32>,
    pub cors_origins: Option<String>,
}

// =============================================================================
// RESOLVED SETTINGS
// =============================================================================

/// Fully resolved application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub host: String,
    pub port: u16,
    /// Requests per second; 0 disables rate limiting.
    pub rate_limit: u32,
    /// `None` = localhost only, `"*"` = any origin, else a comma list.
    pub cors_origins: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            host: "127.0.0.1".to_string(),
            port: 8080,
            rate_limit: DEFAULT_RATE_LIMIT,
            cors_origins: None,
        }
    }
}

impl AppConfig {
    /// Resolve defaults, config file and process environment.
    ///
    /// An explicit config path must exist; the implicit `ppc.toml` is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, PpcError> {
        let mut config = Self::default();

        let file = match explicit {
            Some(path) => Some(read_config_file(path)?),
            None => {
                let implicit = Path::new(DEFAULT_CONFIG_FILE);
                if implicit.is_file() {
                    Some(read_config_file(implicit)?)
                } else {
                    None
                }
            }
        };
        if let Some(file) = file {
            config.apply_file(file);
        }

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Overlay the values present in a config file.
    pub fn apply_file(&mut self, file: ConfigFile) {
        if let Some(path) = file.data.and_then(|d| d.file) {
            self.data_file = path;
        }
        if let Some(server) = file.server {
            if let Some(host) = server.host {
                self.host = host;
            }
            if let Some(port) = server.port {
                self.port = port;
            }
            if let Some(rate_limit) = server.rate_limit {
                self.rate_limit = rate_limit;
            }
            if server.cors_origins.is_some() {
                self.cors_origins = server.cors_origins;
            }
        }
    }

    /// Overlay environment variables read through `lookup`.
    ///
    /// Unparseable numbers are ignored with a warning.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("PPC_DATA_FILE") {
            self.data_file = PathBuf::from(path);
        }
        if let Some(host) = lookup("PPC_HOST") {
            self.host = host;
        }
        if let Some(raw) = lookup("PPC_PORT") {
            match raw.parse() {
                Ok(port) => self.port = port,
                Err(e) => tracing::warn!("Ignoring PPC_PORT '{}': {}", raw, e),
            }
        }
        if let Some(raw) = lookup("PPC_RATE_LIMIT") {
            match raw.parse() {
                Ok(limit) => self.rate_limit = limit,
                Err(e) => tracing::warn!("Ignoring PPC_RATE_LIMIT '{}': {}", raw, e),
            }
        }
        if let Some(origins) = lookup("PPC_CORS_ORIGINS") {
            self.cors_origins = Some(origins);
        }
    }
}

/// Parse the text of a config file.
pub fn parse_config(text: &str) -> Result<ConfigFile, PpcError> {
    toml::from_str(text).map_err(|e| PpcError::SerializationError(format!("Config: {}", e)))
}

fn read_config_file(path: &Path) -> Result<ConfigFile, PpcError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        PpcError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
    })?;
    let file = parse_config(&text)?;
    tracing::debug!(path = %path.display(), "Loaded configuration file");
    Ok(file)
}

// =============================================================================
// TESTS
// =============================================================================
