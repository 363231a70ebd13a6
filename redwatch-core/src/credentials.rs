//! Application identity used to obtain access tokens.
//!
//! The grant carried by [`Credentials`] decides how a session behaves: whether it acts
//! on behalf of a user and whether an expired token can be renewed without asking the
//! caller to log in again.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_DOMAIN: &str = "reddit.com";

/// How an access token is obtained.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GrantType {
    /// Script apps: the owning account's username and password.
    Password { username: String, password: String },
    /// Application-only access with no user context.
    ClientCredentials,
    /// A refresh token issued by an earlier authorization.
    RefreshToken { refresh_token: String },
}

impl GrantType {
    pub fn can_refresh(&self) -> bool {
        self.refresh_token().is_some()
    }

    /// The configured refresh token, for grants that carry one.
    pub fn refresh_token(&self) -> Option<&str> {
        match self {
            GrantType::RefreshToken { refresh_token } => Some(refresh_token),
            _ => None,
        }
    }

    pub fn requires_user_context(&self) -> bool {
        !matches!(self, GrantType::ClientCredentials)
    }

    pub fn name(&self) -> &'static str {
        match self {
            GrantType::Password { .. } => "password",
            GrantType::ClientCredentials => "client_credentials",
            GrantType::RefreshToken { .. } => "refresh_token",
        }
    }
}

// Keeps secrets out of logs.
impl fmt::Debug for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrantType::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            GrantType::ClientCredentials => f.write_str("ClientCredentials"),
            GrantType::RefreshToken { .. } => f
                .debug_struct("RefreshToken")
                .field("refresh_token", &"<redacted>")
                .finish(),
        }
    }
}

/// Builds the `User-Agent` value Reddit asks every client to send:
/// `<platform>:<app-id>:<version> (by /u/<author>)`.
pub fn user_agent(platform: &str, app_id: &str, version: &str, author: &str) -> String {
    format!("{}:{}:{} (by /u/{})", platform, app_id, version, author)
}

#[derive(Clone)]
pub struct Credentials {
    pub domain: String,
    pub client_id: String,
    pub client_secret: String,
    pub grant: GrantType,
    pub user_agent: String,
}

impl Credentials {
    pub fn script(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            grant: GrantType::Password {
                username: username.into(),
                password: password.into(),
            },
            user_agent: user_agent.into(),
        }
    }

    pub fn userless(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            grant: GrantType::ClientCredentials,
            user_agent: user_agent.into(),
        }
    }

    pub fn refreshable(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            grant: GrantType::RefreshToken {
                refresh_token: refresh_token.into(),
            },
            user_agent: user_agent.into(),
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Host serving authenticated API calls.
    pub fn oauth_host(&self) -> String {
        format!("oauth.{}", self.domain)
    }

    /// Host serving token issuance and revocation.
    pub fn www_host(&self) -> String {
        format!("www.{}", self.domain)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("domain", &self.domain)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("grant", &self.grant)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
