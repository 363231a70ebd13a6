//! Access-token lifecycle: login, transparent refresh, logout, request authorization.
//!
//! Token issuance and revocation go through the `oauth2` crate, with its HTTP exchange
//! routed over the same [`Transport`] as every other call. The held token sits behind
//! an async mutex so that checking expiry, refreshing and storing the new token form one
//! critical section: concurrent callers that find the token expired share one refresh.

use crate::endpoint::Endpoint;
use crate::query::Query;
use crate::transport::{RawRequest, RawResponse, Transport};
use oauth2::basic::{BasicClient, BasicErrorResponse, BasicTokenResponse};
use oauth2::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use oauth2::{
    AccessToken, AuthUrl, ClientId, ClientSecret, HttpRequest, HttpResponse, RefreshToken,
    RequestTokenError, ResourceOwnerPassword, ResourceOwnerUsername, RevocationUrl,
    StandardRevocableToken, TokenResponse, TokenUrl,
};
use redwatch_core::{CoreError, Credentials, GrantType, RedditApiError, TokenDuration};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use url::Url;

/// Tokens with less validity left than this are treated as expired.
pub const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

const DEFAULT_LIFETIME_SECS: u64 = 3600;
const AUTHORIZE_PATH: &str = "/api/v1/authorize";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub refresh_token: Option<String>,
    pub scope: Vec<String>,
    pub created_at: SystemTime,
}

impl SessionToken {
    pub fn expires_at(&self) -> SystemTime {
        self.created_at + Duration::from_secs(self.expires_in)
    }

    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        match self.expires_at().duration_since(now) {
            Ok(remaining) => remaining < EXPIRY_MARGIN,
            Err(_) => true,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(SystemTime::now())
    }

    fn from_response(response: &BasicTokenResponse, fallback_refresh: Option<String>) -> Self {
        Self {
            access_token: response.access_token().secret().clone(),
            token_type: format!("{:?}", response.token_type()).to_lowercase(),
            expires_in: response
                .expires_in()
                .map(|d| d.as_secs())
                .unwrap_or(DEFAULT_LIFETIME_SECS),
            refresh_token: response
                .refresh_token()
                .map(|t| t.secret().clone())
                .or(fallback_refresh),
            scope: response
                .scopes()
                .map(|scopes| scopes.iter().map(|s| s.as_str().to_string()).collect())
                .unwrap_or_default(),
            created_at: SystemTime::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    Active,
    Expired,
}

pub struct Session {
    credentials: Credentials,
    transport: Arc<dyn Transport>,
    oauth: BasicClient,
    token: Mutex<Option<SessionToken>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(credentials: Credentials, transport: Arc<dyn Transport>) -> Result<Self, CoreError> {
        let token_url = Query::new(Endpoint::AccessToken)
            .to_request(&credentials)?
            .url;
        let revoke_url = Query::new(Endpoint::RevokeToken)
            .to_request(&credentials)?
            .url;
        let auth_url = format!("https://{}{}", credentials.www_host(), AUTHORIZE_PATH);

        let invalid = |e: url::ParseError| CoreError::InvalidInput {
            message: format!("invalid OAuth URL: {}", e),
        };
        let oauth = BasicClient::new(
            ClientId::new(credentials.client_id.clone()),
            Some(ClientSecret::new(credentials.client_secret.clone())),
            AuthUrl::new(auth_url).map_err(invalid)?,
            Some(TokenUrl::new(token_url.to_string()).map_err(invalid)?),
        )
        .set_revocation_uri(RevocationUrl::new(revoke_url.to_string()).map_err(invalid)?);

        Ok(Self {
            credentials,
            transport,
            oauth,
            token: Mutex::new(None),
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Exchanges the configured grant for a fresh access token.
    pub async fn login(&self, duration: TokenDuration) -> Result<(), CoreError> {
        let mut guard = self.token.lock().await;
        info!(
            "Logging in with {} grant ({})",
            self.credentials.grant.name(),
            duration.as_str()
        );

        let token = self.exchange(duration).await?;
        debug!(
            "Received {} token valid for {}s, refreshable: {}",
            token.token_type,
            token.expires_in,
            token.refresh_token.is_some()
        );
        *guard = Some(token);
        info!("Login successful");
        Ok(())
    }

    /// Revokes the held token, best effort. The local token is always cleared.
    pub async fn logout(&self) {
        let mut guard = self.token.lock().await;
        let token = match guard.take() {
            Some(token) => token,
            None => {
                debug!("Logout requested with no active session");
                return;
            }
        };

        self.revoke(StandardRevocableToken::AccessToken(AccessToken::new(
            token.access_token,
        )))
        .await;

        // A refresh token issued for this session dies with it; a configured one is kept.
        let configured = self.credentials.grant.refresh_token();
        if let Some(refresh_token) = token.refresh_token {
            if configured != Some(refresh_token.as_str()) {
                self.revoke(StandardRevocableToken::RefreshToken(RefreshToken::new(
                    refresh_token,
                )))
                .await;
            }
        }
        info!("Logged out");
    }

    pub async fn state(&self) -> SessionState {
        match self.token.lock().await.as_ref() {
            None => SessionState::LoggedOut,
            Some(token) if token.is_expired() && !self.can_refresh(token) => {
                SessionState::Expired
            }
            Some(_) => SessionState::Active,
        }
    }

    pub async fn token(&self) -> Option<SessionToken> {
        self.token.lock().await.clone()
    }

    /// Installs a previously obtained token, e.g. one restored from disk.
    pub async fn set_token(&self, token: SessionToken) {
        *self.token.lock().await = Some(token);
    }

    /// Returns a usable access token, refreshing it first if it is about to expire.
    pub async fn access_token(&self) -> Result<String, CoreError> {
        let mut guard = self.token.lock().await;
        let refresh_token = match guard.as_ref() {
            None => {
                return Err(CoreError::authentication(
                    "Not authenticated; call login first",
                ))
            }
            Some(token) if !token.is_expired() => return Ok(token.access_token.clone()),
            Some(token) => self.refresh_source(token),
        };

        let refresh_token = match refresh_token {
            Some(refresh_token) => refresh_token,
            None => {
                warn!("Access token expired and the grant cannot refresh");
                return Err(CoreError::RedditApi(RedditApiError::SessionExpired));
            }
        };

        info!("Access token expired, refreshing");
        let refreshed = self.refresh(refresh_token).await?;
        let access_token = refreshed.access_token.clone();
        *guard = Some(refreshed);
        Ok(access_token)
    }

    /// Adds the bearer token and agent headers to an outgoing request.
    pub async fn authorize(&self, request: RawRequest) -> Result<RawRequest, CoreError> {
        let access_token = self.access_token().await?;
        Ok(request
            .with_header("Authorization", format!("bearer {}", access_token))
            .with_header("User-Agent", self.credentials.user_agent.as_str()))
    }

    /// Authorizes and sends a request, returning the body of a successful response.
    pub async fn send(&self, request: RawRequest) -> Result<String, CoreError> {
        let request = self.authorize(request).await?;
        let method = request.method.clone();
        let endpoint = request.url.path().to_string();

        debug!("Making Reddit API request: {} {}", method, endpoint);
        let response = self.transport.execute(request).await?;
        check_status(&method, &endpoint, response)
    }

    pub async fn execute(&self, query: &Query) -> Result<String, CoreError> {
        if query.endpoint.requires_user() && !self.credentials.grant.requires_user_context() {
            return Err(CoreError::InvalidInput {
                message: format!(
                    "{:?} needs a user context, the {} grant has none",
                    query.endpoint,
                    self.credentials.grant.name()
                ),
            });
        }
        let request = query.to_request(&self.credentials)?;
        self.send(request).await
    }

    fn can_refresh(&self, token: &SessionToken) -> bool {
        token.refresh_token.is_some() || self.credentials.grant.can_refresh()
    }

    fn refresh_source(&self, token: &SessionToken) -> Option<String> {
        token
            .refresh_token
            .clone()
            .or_else(|| self.credentials.grant.refresh_token().map(str::to_string))
    }

    async fn exchange(&self, duration: TokenDuration) -> Result<SessionToken, CoreError> {
        let response = match &self.credentials.grant {
            GrantType::Password { username, password } => {
                let username = ResourceOwnerUsername::new(username.clone());
                let password = ResourceOwnerPassword::new(password.clone());
                self.oauth
                    .exchange_password(&username, &password)
                    .add_extra_param("duration", duration.as_str())
                    .request_async(|request| self.send_token_request(request))
                    .await
            }
            GrantType::ClientCredentials => {
                self.oauth
                    .exchange_client_credentials()
                    .add_extra_param("duration", duration.as_str())
                    .request_async(|request| self.send_token_request(request))
                    .await
            }
            GrantType::RefreshToken { refresh_token } => {
                return self.refresh(refresh_token.clone()).await;
            }
        }
        .map_err(map_token_error)?;

        Ok(SessionToken::from_response(&response, None))
    }

    async fn refresh(&self, refresh_token: String) -> Result<SessionToken, CoreError> {
        let token = RefreshToken::new(refresh_token.clone());
        let response = self
            .oauth
            .exchange_refresh_token(&token)
            .request_async(|request| self.send_token_request(request))
            .await
            .map_err(map_token_error)?;

        // Reddit does not rotate refresh tokens; keep the one we used.
        Ok(SessionToken::from_response(&response, Some(refresh_token)))
    }

    async fn revoke(&self, token: StandardRevocableToken) {
        let request = match self.oauth.revoke_token(token) {
            Ok(request) => request,
            Err(e) => {
                warn!("Cannot build token revocation request: {}", e);
                return;
            }
        };

        match request
            .request_async(|request| self.send_token_request(request))
            .await
        {
            Ok(()) => debug!("Token revoked"),
            Err(e) => warn!("Token revocation failed: {}", e),
        }
    }

    /// Carries an `oauth2` token-endpoint exchange over our transport.
    async fn send_token_request(&self, request: HttpRequest) -> Result<HttpResponse, CoreError> {
        let method = Method::from_bytes(request.method.as_str().as_bytes()).map_err(|e| {
            CoreError::Internal {
                message: format!("unsupported token request method: {}", e),
            }
        })?;
        let url = Url::parse(request.url.as_str()).map_err(|e| CoreError::InvalidInput {
            message: format!("invalid token endpoint URL: {}", e),
        })?;

        let mut raw = RawRequest::new(method, url);
        for (name, value) in request.headers.iter() {
            if let Ok(value) = value.to_str() {
                raw = raw.with_header(name.as_str(), value);
            }
        }
        raw = raw.with_header("User-Agent", self.credentials.user_agent.as_str());
        if !request.body.is_empty() {
            raw = raw.with_body(String::from_utf8_lossy(&request.body).into_owned());
        }

        debug!("Token endpoint request: {} {}", raw.method, raw.url.path());
        let response = self.transport.execute(raw).await?;
        into_oauth_response(response)
    }
}

fn into_oauth_response(response: RawResponse) -> Result<HttpResponse, CoreError> {
    // Reddit answers revocation with 204; oauth2 only accepts 200 for a bodiless success.
    let status = if response.status == 204 {
        200
    } else {
        response.status
    };
    let status_code = StatusCode::from_u16(status).map_err(|e| {
        CoreError::invalid_response(format!("invalid status {}: {}", response.status, e))
    })?;

    let mut headers = HeaderMap::new();
    for (name, value) in &response.headers {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            headers.append(name, value);
        }
    }

    Ok(HttpResponse {
        status_code,
        headers,
        body: response.body.into_bytes(),
    })
}

fn map_token_error(error: RequestTokenError<CoreError, BasicErrorResponse>) -> CoreError {
    match error {
        RequestTokenError::ServerResponse(response) => {
            let mut reason = response.error().as_ref().to_string();
            if let Some(description) = response.error_description() {
                reason = format!("{}: {}", reason, description);
            }
            error!("Token exchange rejected: {}", reason);
            CoreError::authentication(reason)
        }
        RequestTokenError::Request(e) => e,
        RequestTokenError::Parse(e, body) => {
            let body = String::from_utf8_lossy(&body);
            error!("Unparsable token response: {}", e);
            CoreError::authentication(format!("unparsable token response ({}): {}", e, body))
        }
        RequestTokenError::Other(message) => CoreError::authentication(message),
    }
}

/// Maps a transport response onto the error taxonomy, returning the body on success.
pub(crate) fn check_status(
    method: &Method,
    endpoint: &str,
    response: RawResponse,
) -> Result<String, CoreError> {
    if response.is_success() {
        debug!("Request successful: {} for {}", response.status, endpoint);
        return Ok(response.body);
    }

    error!(
        "Request failed with status: {} for {} {}",
        response.status, method, endpoint
    );
    let api_error = match response.status {
        429 => {
            let retry_after = response
                .header("retry-after")
                .or_else(|| response.header("x-ratelimit-reset"))
                .and_then(|v| v.trim().parse::<f64>().ok())
                .map(|secs| secs.ceil() as u64)
                .unwrap_or(60);
            warn!("Rate limited, retry after {} seconds", retry_after);
            RedditApiError::RateLimitExceeded { retry_after }
        }
        401 => RedditApiError::InvalidToken,
        403 => RedditApiError::Forbidden {
            resource: endpoint.to_string(),
        },
        404 => RedditApiError::NotFound {
            resource: endpoint.to_string(),
        },
        status if status >= 500 => RedditApiError::ServerError {
            status_code: status,
        },
        status => RedditApiError::RequestFailed {
            endpoint: endpoint.to_string(),
            status_code: status,
        },
    };
    Err(CoreError::RedditApi(api_error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::support::{token_body, MockTransport};
    use std::sync::atomic::Ordering;

    fn token(lifetime: u64, created_at: SystemTime) -> SessionToken {
        SessionToken {
            access_token: "abc".to_string(),
            token_type: "bearer".to_string(),
            expires_in: lifetime,
            refresh_token: None,
            scope: vec!["*".to_string()],
            created_at,
        }
    }

    fn script_credentials() -> Credentials {
        Credentials::script("id", "secret", "bot", "hunter2", "test:redwatch:0.1 (by /u/tester)")
    }

    #[test]
    fn test_expiry_boundary() {
        let created = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let token = token(3600, created);

        assert!(!token.is_expired_at(created + Duration::from_secs(3600 - 61)));
        assert!(token.is_expired_at(created + Duration::from_secs(3600 - 59)));
        assert!(token.is_expired_at(created + Duration::from_secs(7200)));
    }

    #[test]
    fn test_token_serialization() {
        let token = token(3600, SystemTime::UNIX_EPOCH + Duration::from_secs(1640995200));
        let serialized = serde_json::to_string(&token).unwrap();
        let deserialized: SessionToken = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, token);
    }

    #[tokio::test]
    async fn test_password_login() {
        let transport = Arc::new(MockTransport::new(|request| {
            assert_eq!(request.url.path(), "/api/v1/access_token");
            assert_eq!(request.url.host_str(), Some("www.reddit.com"));
            let body = request.body.clone().unwrap_or_default();
            assert!(body.contains("grant_type=password"));
            assert!(body.contains("username=bot"));
            assert!(body.contains("duration=permanent"));
            assert!(request.header("authorization").unwrap().starts_with("Basic "));
            assert_eq!(
                request.header("user-agent"),
                Some("test:redwatch:0.1 (by /u/tester)")
            );
            Ok(RawResponse::new(200, token_body("tok-1", 3600, None)))
        }));
        let session = Session::new(script_credentials(), transport.clone()).unwrap();

        assert_eq!(session.state().await, SessionState::LoggedOut);
        session.login(TokenDuration::Permanent).await.unwrap();
        assert_eq!(session.state().await, SessionState::Active);

        let token = session.token().await.unwrap();
        assert_eq!(token.access_token, "tok-1");
        assert_eq!(token.expires_in, 3600);
        assert!(token.refresh_token.is_none());
    }

    #[tokio::test]
    async fn test_rejected_login() {
        let transport = Arc::new(MockTransport::new(|_| {
            Ok(RawResponse::new(200, r#"{"error": "invalid_grant"}"#))
        }));
        let session = Session::new(script_credentials(), transport).unwrap();

        let result = session.login(TokenDuration::Temporary).await;
        assert!(matches!(
            result,
            Err(CoreError::RedditApi(RedditApiError::AuthenticationFailed { .. }))
        ));
        assert_eq!(session.state().await, SessionState::LoggedOut);
    }

    #[tokio::test]
    async fn test_error_status_login() {
        let transport = Arc::new(MockTransport::new(|_| {
            Ok(RawResponse::new(
                401,
                r#"{"error": "invalid_client", "error_description": "bad secret"}"#,
            ))
        }));
        let session = Session::new(script_credentials(), transport).unwrap();

        match session.login(TokenDuration::Temporary).await {
            Err(CoreError::RedditApi(RedditApiError::AuthenticationFailed { reason })) => {
                assert!(reason.contains("invalid_client"));
            }
            other => panic!("Expected AuthenticationFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_authorize_requires_login() {
        let transport = Arc::new(MockTransport::new(|_| Ok(RawResponse::new(200, "{}"))));
        let session = Session::new(script_credentials(), transport.clone()).unwrap();

        let request = Query::new(Endpoint::Me)
            .to_request(session.credentials())
            .unwrap();
        let result = session.authorize(request).await;
        if let Err(CoreError::RedditApi(RedditApiError::AuthenticationFailed { reason })) = result {
            assert!(reason.contains("Not authenticated"));
        } else {
            panic!("Expected AuthenticationFailed error");
        }
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_authorize_adds_headers() {
        let transport = Arc::new(MockTransport::new(|_| Ok(RawResponse::new(200, "{}"))));
        let session = Session::new(script_credentials(), transport).unwrap();
        session.set_token(token(3600, SystemTime::now())).await;

        let request = Query::new(Endpoint::Me)
            .to_request(session.credentials())
            .unwrap();
        let request = session.authorize(request).await.unwrap();
        assert_eq!(request.header("Authorization"), Some("bearer abc"));
        assert_eq!(
            request.header("User-Agent"),
            Some("test:redwatch:0.1 (by /u/tester)")
        );
    }

    #[tokio::test]
    async fn test_expired_without_refresh_capability() {
        let transport = Arc::new(MockTransport::new(|_| Ok(RawResponse::new(200, "{}"))));
        let session = Session::new(script_credentials(), transport.clone()).unwrap();
        session
            .set_token(token(3600, SystemTime::now() - Duration::from_secs(3600)))
            .await;

        assert_eq!(session.state().await, SessionState::Expired);
        let result = session.access_token().await;
        assert!(matches!(
            result,
            Err(CoreError::RedditApi(RedditApiError::SessionExpired))
        ));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_expired_token_is_refreshed_once() {
        let transport = Arc::new(MockTransport::new(|request| {
            let body = request.body.clone().unwrap_or_default();
            assert!(body.contains("grant_type=refresh_token"));
            assert!(body.contains("refresh_token=rt-1"));
            Ok(RawResponse::new(200, token_body("fresh", 3600, None)))
        }));
        let credentials =
            Credentials::refreshable("id", "secret", "rt-1", "test:redwatch:0.1 (by /u/tester)");
        let session = Arc::new(Session::new(credentials, transport.clone()).unwrap());
        session
            .set_token(token(3600, SystemTime::now() - Duration::from_secs(3590)))
            .await;
        assert_eq!(session.state().await, SessionState::Active);

        let (a, b) = tokio::join!(session.access_token(), session.access_token());
        assert_eq!(a.unwrap(), "fresh");
        assert_eq!(b.unwrap(), "fresh");
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

        let token = session.token().await.unwrap();
        assert_eq!(token.refresh_token.as_deref(), Some("rt-1"));
    }

    #[tokio::test]
    async fn test_userless_session_rejects_account_endpoints() {
        let transport = Arc::new(MockTransport::new(|_| Ok(RawResponse::new(200, "{}"))));
        let credentials = Credentials::userless("id", "secret", "test:redwatch:0.1 (by /u/tester)");
        let session = Session::new(credentials, transport.clone()).unwrap();
        session.set_token(token(3600, SystemTime::now())).await;

        for endpoint in [Endpoint::Me, Endpoint::MySubscriptions] {
            let result = session.execute(&Query::new(endpoint)).await;
            assert!(matches!(result, Err(CoreError::InvalidInput { .. })));
        }
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);

        let listing = Query::new(Endpoint::SubredditNew).with_arg("rust");
        assert_eq!(session.execute(&listing).await.unwrap(), "{}");
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_logout_clears_token_even_when_revocation_fails() {
        let transport = Arc::new(MockTransport::new(|request| {
            assert_eq!(request.url.path(), "/api/v1/revoke_token");
            Err(CoreError::Transport {
                message: "connection reset".to_string(),
            })
        }));
        let session = Session::new(script_credentials(), transport.clone()).unwrap();
        session.set_token(token(3600, SystemTime::now())).await;

        session.logout().await;
        assert_eq!(session.state().await, SessionState::LoggedOut);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

        // idempotent
        session.logout().await;
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_logout_accepts_no_content() {
        let transport = Arc::new(MockTransport::new(|_| Ok(RawResponse::new(204, ""))));
        let session = Session::new(script_credentials(), transport.clone()).unwrap();
        let mut issued = token(3600, SystemTime::now());
        issued.refresh_token = Some("session-rt".to_string());
        session.set_token(issued).await;

        session.logout().await;
        // access token and session-issued refresh token
        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
        assert!(session.token().await.is_none());
    }

    #[test]
    fn test_status_mapping() {
        let ok = check_status(&Method::GET, "/r/rust/new", RawResponse::new(200, "body"));
        assert_eq!(ok.unwrap(), "body");

        let mut limited = RawResponse::new(429, "");
        limited.headers.push(("Retry-After".to_string(), "12".to_string()));
        assert!(matches!(
            check_status(&Method::GET, "/x", limited),
            Err(CoreError::RedditApi(RedditApiError::RateLimitExceeded { retry_after: 12 }))
        ));

        assert!(matches!(
            check_status(&Method::GET, "/x", RawResponse::new(401, "")),
            Err(CoreError::RedditApi(RedditApiError::InvalidToken))
        ));
        assert!(matches!(
            check_status(&Method::GET, "/x", RawResponse::new(404, "")),
            Err(CoreError::RedditApi(RedditApiError::NotFound { .. }))
        ));
        assert!(matches!(
            check_status(&Method::GET, "/x", RawResponse::new(503, "")),
            Err(CoreError::RedditApi(RedditApiError::ServerError { status_code: 503 }))
        ));
        assert!(matches!(
            check_status(&Method::GET, "/x", RawResponse::new(409, "")),
            Err(CoreError::RedditApi(RedditApiError::RequestFailed { status_code: 409, .. }))
        ));
    }
}
