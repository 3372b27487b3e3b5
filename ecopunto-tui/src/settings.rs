use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use ecopunto_core::engine::BrowserSettings;
use ecopunto_provider_local::LocalOptions;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Settings {
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub location: LocationSettings,
    #[serde(default)]
    pub engine: BrowserSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct CatalogSettings {
    /// TOML catalog file; the built-in catalog is used when unset.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LocationSettings {
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    #[serde(default)]
    pub denied: bool,
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            latitude: default_latitude(),
            longitude: default_longitude(),
            delay_ms: default_delay_ms(),
            denied: false,
        }
    }
}

// Obelisco, Buenos Aires
fn default_latitude() -> f64 { -34.6037 }
fn default_longitude() -> f64 { -58.3816 }
fn default_delay_ms() -> u64 { 1500 }

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

fn default_log_level() -> String { "info".to_owned() }
fn default_log_file() -> PathBuf { PathBuf::from("ecopunto.log") }

impl Settings {
    /// Load configuration from files and environment variables.
    ///
    /// Later sources override earlier ones:
    /// 1. Defaults in the structs
    /// 2. `config/default.toml`
    /// 3. `config/local.toml` (development overrides)
    /// 4. Environment variables prefixed with `ECOPUNTO__`, e.g. `ECOPUNTO__LOCATION__DENIED=true`
    pub(crate) fn load() -> Result<Self, ConfigError> {
        Self::from_config(
            Config::builder()
                .add_source(File::with_name("config/default").required(false))
                .add_source(File::with_name("config/local").required(false))
                .add_source(
                    Environment::with_prefix("ECOPUNTO")
                        .prefix_separator("__")
                        .separator("__")
                        .try_parsing(true),
                )
                .build()?,
        )
    }

    fn from_config(config: Config) -> Result<Self, ConfigError> {
        config.try_deserialize()
    }

    pub(crate) fn local_options(&self) -> LocalOptions {
        LocalOptions {
            catalog_path: self.catalog.path.clone(),
            latitude: self.location.latitude,
            longitude: self.location.longitude,
            location_denied: self.location.denied,
        }
    }

    pub(crate) fn search_delay(&self) -> Duration {
        Duration::from_millis(self.location.delay_ms)
    }
}
