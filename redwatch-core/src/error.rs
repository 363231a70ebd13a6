use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Reddit API error: {0}")]
    RedditApi(#[from] RedditApiError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RedditApiError {
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Session expired and cannot be refreshed; log in again")]
    SessionExpired,

    #[error("Rate limit exceeded. Retry after {retry_after} seconds")]
    RateLimitExceeded { retry_after: u64 },

    #[error("Forbidden access to resource: {resource}")]
    Forbidden { resource: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Invalid OAuth token")]
    InvalidToken,

    #[error("Request timeout")]
    RequestTimeout,

    #[error("Invalid API response: {details}")]
    InvalidResponse { details: String },

    #[error("Server error: {status_code}")]
    ServerError { status_code: u16 },

    #[error("Request to {endpoint} failed with status {status_code}")]
    RequestFailed { endpoint: String, status_code: u16 },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Cannot read configuration file {path}: {source}")]
    Unreadable {
        path: String,
        source: std::io::Error,
    },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Configuration validation failed: {reason}")]
    ValidationFailed { reason: String },

    #[error("Configuration parsing error: {0}")]
    Parse(#[from] toml::de::Error),
}

impl CoreError {
    pub fn authentication(reason: impl Into<String>) -> Self {
        CoreError::RedditApi(RedditApiError::AuthenticationFailed {
            reason: reason.into(),
        })
    }

    pub fn invalid_response(details: impl Into<String>) -> Self {
        CoreError::RedditApi(RedditApiError::InvalidResponse {
            details: details.into(),
        })
    }

    /// True for the failures a caller fixes by logging in again.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            CoreError::RedditApi(
                RedditApiError::SessionExpired
                    | RedditApiError::InvalidToken
                    | RedditApiError::AuthenticationFailed { .. }
            )
        )
    }
}
