use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::ViewLimits;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_flights_path")]
    pub flights_path: PathBuf,
    #[serde(default = "default_users_path")]
    pub users_path: PathBuf,
    #[serde(default = "default_lodging_path")]
    pub lodging_path: PathBuf,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            flights_path: default_flights_path(),
            users_path: default_users_path(),
            lodging_path: default_lodging_path(),
        }
    }
}

fn default_flights_path() -> PathBuf { PathBuf::from("data/flights_data.json") }
fn default_users_path() -> PathBuf { PathBuf::from("data/user_profiles.json") }
fn default_lodging_path() -> PathBuf { PathBuf::from("data/hotels_data.json") }

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_llm_enabled")]
    pub enabled: bool,
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    pub api_key: Option<String>,
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            enabled: default_llm_enabled(),
            endpoint: default_llm_endpoint(),
            model: default_llm_model(),
            api_key: None,
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}

impl LlmSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// API key to use, if the remote service should be called at all
    pub fn active_api_key(&self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }
}

fn default_llm_enabled() -> bool { true }
fn default_llm_endpoint() -> String { "https://generativelanguage.googleapis.com/v1beta".to_string() }
fn default_llm_model() -> String { "gemini-1.5-flash".to_string() }
fn default_llm_timeout_secs() -> u64 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_view_limit")]
    pub view_limit: usize,
    #[serde(default = "default_bad_sample_limit")]
    pub bad_sample_limit: usize,
    #[serde(default = "default_explained_bad_limit")]
    pub explained_bad_limit: usize,
    #[serde(default = "default_lodging_count")]
    pub lodging_count: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            view_limit: default_view_limit(),
            bad_sample_limit: default_bad_sample_limit(),
            explained_bad_limit: default_explained_bad_limit(),
            lodging_count: default_lodging_count(),
        }
    }
}

impl SearchSettings {
    pub fn limits(&self) -> ViewLimits {
        ViewLimits {
            view_limit: self.view_limit,
            bad_sample_limit: self.bad_sample_limit,
            explained_bad_limit: self.explained_bad_limit,
        }
    }
}

fn default_view_limit() -> usize { 20 }
fn default_bad_sample_limit() -> usize { 5 }
fn default_explained_bad_limit() -> usize { 3 }
fn default_lodging_count() -> usize { 3 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with FLIGHT_RANK__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., FLIGHT_RANK__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("FLIGHT_RANK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("FLIGHT_RANK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply well-known environment variables on top of the layered config
///
/// GOOGLE_API_KEY fills in the text-generation API key.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    let mut builder = Config::builder().add_source(settings);

    if let Ok(api_key) = std::env::var("GOOGLE_API_KEY") {
        builder = builder.set_override("llm.api_key", api_key)?;
    }

    builder.build()
}
