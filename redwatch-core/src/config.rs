//! TOML configuration for the watcher binary.

use crate::credentials::{user_agent, Credentials, GrantType, DEFAULT_DOMAIN};
use crate::error::ConfigError;
use serde::Deserialize;
use std::io;
use std::path::Path;
use std::time::Duration;

pub const CLIENT_SECRET_ENV: &str = "REDDIT_CLIENT_SECRET";
pub const PASSWORD_ENV: &str = "REDDIT_PASSWORD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenDuration {
    #[default]
    Temporary,
    Permanent,
}

impl TokenDuration {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenDuration::Temporary => "temporary",
            TokenDuration::Permanent => "permanent",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub reddit: RedditConfig,
    #[serde(default)]
    pub polling: PollingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditConfig {
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub duration: TokenDuration,
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default = "default_version")]
    pub version: String,
    pub author: String,
    #[serde(default = "default_domain")]
    pub domain: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    #[serde(default)]
    pub subreddits: Vec<String>,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            subreddits: Vec::new(),
            interval_secs: default_interval_secs(),
            page_limit: default_page_limit(),
        }
    }
}

fn default_platform() -> String {
    std::env::consts::OS.to_string()
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_domain() -> String {
    DEFAULT_DOMAIN.to_string()
}

const fn default_interval_secs() -> u64 {
    60
}

const fn default_page_limit() -> u32 {
    25
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::Unreadable {
                path: path.display().to_string(),
                source: e,
            },
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let mut config: AppConfig = toml::from_str(raw)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if self.reddit.client_secret.is_none() {
            self.reddit.client_secret = std::env::var(CLIENT_SECRET_ENV).ok();
        }
        if self.reddit.username.is_some() && self.reddit.password.is_none() {
            self.reddit.password = std::env::var(PASSWORD_ENV).ok();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reddit.client_id.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "reddit.client_id".to_string(),
            });
        }
        if self.reddit.author.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "reddit.author".to_string(),
            });
        }
        if self.reddit.username.is_some() && self.reddit.password.is_none() {
            return Err(ConfigError::MissingField {
                field: "reddit.password".to_string(),
            });
        }
        if self.reddit.username.is_some() && self.reddit.refresh_token.is_some() {
            return Err(ConfigError::ValidationFailed {
                reason: "set either username/password or refresh_token, not both".to_string(),
            });
        }
        if self.polling.interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "polling.interval_secs".to_string(),
                value: "0".to_string(),
            });
        }
        if !(1..=100).contains(&self.polling.page_limit) {
            return Err(ConfigError::InvalidValue {
                field: "polling.page_limit".to_string(),
                value: self.polling.page_limit.to_string(),
            });
        }
        Ok(())
    }

    pub fn user_agent(&self) -> String {
        user_agent(
            &self.reddit.platform,
            &self.reddit.client_id,
            &self.reddit.version,
            &self.reddit.author,
        )
    }

    pub fn credentials(&self) -> Credentials {
        let reddit = &self.reddit;
        let grant = match (&reddit.username, &reddit.password, &reddit.refresh_token) {
            (Some(username), Some(password), _) => GrantType::Password {
                username: username.clone(),
                password: password.clone(),
            },
            (_, _, Some(refresh_token)) => GrantType::RefreshToken {
                refresh_token: refresh_token.clone(),
            },
            _ => GrantType::ClientCredentials,
        };

        Credentials {
            domain: reddit.domain.clone(),
            client_id: reddit.client_id.clone(),
            client_secret: reddit.client_secret.clone().unwrap_or_default(),
            grant,
            user_agent: self.user_agent(),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.polling.interval_secs)
    }
}
