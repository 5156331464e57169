//! # Configuration
//!
//! The console reads a TOML file and then lets environment variables override the
//! two values that differ most between machines: the API base URL and the token.
//!
//! ```toml
//! [api]
//! base_url = "https://api.example.edu/admin"
//! token = "..."
//! timeout_secs = 30
//!
//! [sync]
//! debounce_ms = 500
//! page_size = 10
//! buffer_size = 32
//! ```
//!
//! The file is `admin-console.toml` in the working directory unless
//! `ADMIN_CONSOLE_CONFIG` names another path. A missing default file is fine; a
//! missing explicit file is an error.

use crate::error::ConsoleError;
use secrecy::{ExposeSecret, SecretBox};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use sync_framework::SyncSettings;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "admin-console.toml";
pub const CONFIG_PATH_ENV: &str = "ADMIN_CONSOLE_CONFIG";
pub const API_URL_ENV: &str = "ADMIN_CONSOLE_API_URL";
pub const TOKEN_ENV: &str = "ADMIN_CONSOLE_TOKEN";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the console API.
#[derive(Debug)]
pub struct ApiConfig {
    pub base_url: String,
    token: Option<SecretBox<String>>,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretBox::new(Box::new(token.into())));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_ref().map(|t| t.expose_secret().as_str())
    }
}

/// Everything the console needs at startup.
#[derive(Debug)]
pub struct ConsoleConfig {
    pub api: ApiConfig,
    pub sync: SyncSettings,
}

/// Values taken from the environment, applied on top of the file.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    pub api_url: Option<String>,
    pub token: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            api_url: non_empty_var(API_URL_ENV),
            token: non_empty_var(TOKEN_ENV),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    api: ApiSection,
    sync: SyncSettings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ApiSection {
    base_url: Option<String>,
    token: Option<String>,
    timeout_secs: Option<u64>,
}

impl ConsoleConfig {
    /// Loads the file named by `ADMIN_CONSOLE_CONFIG` (or the default file) and
    /// applies environment overrides.
    pub fn load() -> Result<Self, ConsoleError> {
        let contents = match non_empty_var(CONFIG_PATH_ENV) {
            Some(path) => Some(read_file(Path::new(&path))?),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Some(read_file(&default)?)
                } else {
                    debug!(path = DEFAULT_CONFIG_FILE, "No config file, using environment only");
                    None
                }
            }
        };
        Self::from_sources(contents.as_deref(), EnvOverrides::from_env())
    }

    /// Builds a config from optional TOML text and explicit overrides.
    pub fn from_sources(
        toml_text: Option<&str>,
        overrides: EnvOverrides,
    ) -> Result<Self, ConsoleError> {
        let file: ConfigFile = match toml_text {
            Some(text) => toml::from_str(text)
                .map_err(|e| ConsoleError::Config(format!("invalid config file: {e}")))?,
            None => ConfigFile::default(),
        };

        let base_url = overrides
            .api_url
            .or(file.api.base_url)
            .ok_or_else(|| {
                ConsoleError::Config(format!(
                    "api.base_url is not set; add it to {DEFAULT_CONFIG_FILE} or set {API_URL_ENV}"
                ))
            })?;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConsoleError::Config(format!(
                "api.base_url must be an http(s) URL, got {base_url:?}"
            )));
        }

        let mut api = ApiConfig::new(base_url).with_timeout(Duration::from_secs(
            file.api.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        ));
        if let Some(token) = overrides.token.or(file.api.token) {
            api = api.with_token(token);
        }

        Ok(Self {
            api,
            sync: file.sync,
        })
    }
}

fn read_file(path: &Path) -> Result<String, ConsoleError> {
    debug!(path = %path.display(), "Reading config file");
    std::fs::read_to_string(path)
        .map_err(|e| ConsoleError::Config(format!("cannot read {}: {e}", path.display())))
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
