use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const NEWS_API_KEY_VAR: &str = "NEWS_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingCredential(&'static str),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid value in config file {path}: {reason}")]
    Invalid { path: String, reason: &'static str },
}

/// Upstream settings that can be overridden from a YAML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub strategy: StrategySettings,
    pub news: NewsSettings,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategySettings {
    pub api_base: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for StrategySettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsSettings {
    pub api_base: String,
    pub language: String,
    pub max_articles: u32,
}

impl Default for NewsSettings {
    fn default() -> Self {
        Self {
            api_base: "https://gnews.io/api/v4".to_string(),
            language: "en".to_string(),
            max_articles: 3,
        }
    }
}

impl Settings {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        let settings: Settings =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_string(),
                source,
            })?;
        if settings.request_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid {
                path: path.to_string(),
                reason: "request_timeout_secs must be at least 1",
            });
        }
        Ok(settings)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(10))
    }
}

/// Credentials for both upstreams. Values are never printed by `Debug`.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub openai_api_key: SecretString,
    pub news_api_key: SecretString,
}

impl Credentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .map(SecretString::new)
                .ok_or(ConfigError::MissingCredential(name))
        };
        Ok(Self {
            openai_api_key: require(OPENAI_API_KEY_VAR)?,
            news_api_key: require(NEWS_API_KEY_VAR)?,
        })
    }
}

/// Validated process configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub settings: Settings,
    pub credentials: Credentials,
}

impl Config {
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let settings = match path {
            Some(p) => Settings::from_file(p)?,
            None => Settings::default(),
        };
        Ok(Self {
            settings,
            credentials: Credentials::from_env()?,
        })
    }
}

pub(crate) fn is_blank(secret: &SecretString) -> bool {
    secret.expose_secret().trim().is_empty()
}
