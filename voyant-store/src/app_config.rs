use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    /// Unset means requests wait indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Token file. Without it tokens only live as long as the process.
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_access_key")]
    pub access_key: String,
    #[serde(default = "default_refresh_key")]
    pub refresh_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            access_key: default_access_key(),
            refresh_key: default_refresh_key(),
        }
    }
}

fn default_access_key() -> String { "access_token".to_string() }
fn default_refresh_key() -> String { "refresh_token".to_string() }

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { currency: default_currency() }
    }
}

fn default_currency() -> String { "USD".to_string() }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Developer-local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `VOYANT__API__BASE_URL=https://api.example.com`
            .add_source(config::Environment::with_prefix("VOYANT").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    /// Minimal config pointing at `base_url`, everything else defaulted.
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                base_url: base_url.into(),
                request_timeout_secs: None,
            },
            storage: StorageConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}
