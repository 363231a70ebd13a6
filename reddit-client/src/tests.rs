pub(crate) mod support {
    use crate::models::{RedditListing, RedditListingChild, RedditListingData, RedditPostData};
    use crate::session::{Session, SessionToken};
    use crate::transport::{RawRequest, RawResponse, Transport};
    use async_trait::async_trait;
    use redwatch_core::{CoreError, Credentials};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::SystemTime;

    pub const TEST_USER_AGENT: &str = "test:redwatch:0.1 (by /u/tester)";

    type Handler = dyn Fn(&RawRequest) -> Result<RawResponse, CoreError> + Send + Sync;

    /// In-memory transport answering every request with a scripted handler.
    pub struct MockTransport {
        handler: Box<Handler>,
        requests: Mutex<Vec<RawRequest>>,
        pub calls: AtomicUsize,
    }

    impl MockTransport {
        pub fn new<F>(handler: F) -> Self
        where
            F: Fn(&RawRequest) -> Result<RawResponse, CoreError> + Send + Sync + 'static,
        {
            Self {
                handler: Box::new(handler),
                requests: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn requests(&self) -> Vec<RawRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn execute(&self, request: RawRequest) -> Result<RawResponse, CoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let response = (self.handler)(&request);
            self.requests.lock().unwrap().push(request);
            response
        }
    }

    pub fn token_body(access_token: &str, expires_in: u64, refresh_token: Option<&str>) -> String {
        let mut body = serde_json::json!({
            "access_token": access_token,
            "token_type": "bearer",
            "expires_in": expires_in,
            "scope": "*",
        });
        if let Some(refresh_token) = refresh_token {
            body["refresh_token"] = serde_json::Value::from(refresh_token);
        }
        body.to_string()
    }

    pub fn post(id: &str) -> RedditPostData {
        RedditPostData {
            id: id.to_string(),
            name: format!("t3_{}", id),
            title: format!("post {}", id),
            subreddit: "rust".to_string(),
            created_utc: 1_700_000_000.0,
            ..Default::default()
        }
    }

    pub fn listing<T>(
        kind: &str,
        items: Vec<T>,
        after: Option<&str>,
        before: Option<&str>,
    ) -> RedditListing<T> {
        RedditListing {
            kind: "Listing".to_string(),
            data: RedditListingData {
                children: items
                    .into_iter()
                    .map(|data| RedditListingChild {
                        kind: kind.to_string(),
                        data,
                    })
                    .collect(),
                after: after.map(str::to_string),
                before: before.map(str::to_string),
                modhash: None,
                dist: None,
            },
        }
    }

    pub fn listing_body(ids: &[&str], after: Option<&str>, before: Option<&str>) -> String {
        let items: Vec<RedditPostData> = ids.iter().map(|id| post(id)).collect();
        serde_json::to_string(&listing("t3", items, after, before)).unwrap()
    }

    /// A session holding a valid token, so no token exchange hits the transport.
    pub async fn active_session(transport: Arc<MockTransport>) -> Arc<Session> {
        let credentials = Credentials::userless("id", "secret", TEST_USER_AGENT);
        let session = Session::new(credentials, transport).unwrap();
        session
            .set_token(SessionToken {
                access_token: "test-token".to_string(),
                token_type: "bearer".to_string(),
                expires_in: 3600,
                refresh_token: None,
                scope: vec!["*".to_string()],
                created_at: SystemTime::now(),
            })
            .await;
        Arc::new(session)
    }

    #[derive(Default)]
    struct FeedState {
        ids: Vec<String>,
        failure: Option<u16>,
        cursor_only: bool,
        body: Option<String>,
    }

    /// A newest-first listing served with `limit`/`after` paging, the way `/r/{}/new`
    /// behaves.
    pub struct Feed {
        state: Arc<Mutex<FeedState>>,
        transport: Arc<MockTransport>,
    }

    impl Feed {
        pub fn new(ids: &[&str]) -> Self {
            let state = Arc::new(Mutex::new(FeedState {
                ids: ids.iter().map(|id| id.to_string()).collect(),
                ..Default::default()
            }));
            let served = state.clone();
            let transport = Arc::new(MockTransport::new(move |request| {
                Ok(serve(&served.lock().unwrap(), request))
            }));
            Self { state, transport }
        }

        pub fn transport(&self) -> Arc<MockTransport> {
            self.transport.clone()
        }

        pub fn requests(&self) -> Vec<RawRequest> {
            self.transport.requests()
        }

        /// Publishes a new item at the top of the listing.
        pub fn push(&self, id: &str) {
            self.state.lock().unwrap().ids.insert(0, id.to_string());
        }

        pub fn fail_with(&self, status: u16) {
            let mut state = self.state.lock().unwrap();
            state.failure = Some(status);
            state.cursor_only = false;
        }

        /// Fails every request past the first page.
        pub fn fail_after_cursor(&self, status: u16) {
            let mut state = self.state.lock().unwrap();
            state.failure = Some(status);
            state.cursor_only = true;
        }

        /// Answers every request with `body` and a 200 until [`Feed::recover`].
        pub fn serve_body(&self, body: &str) {
            self.state.lock().unwrap().body = Some(body.to_string());
        }

        pub fn recover(&self) {
            let mut state = self.state.lock().unwrap();
            state.failure = None;
            state.body = None;
        }
    }

    fn serve(state: &FeedState, request: &RawRequest) -> RawResponse {
        let params: HashMap<String, String> = request.url.query_pairs().into_owned().collect();
        let cursor = params.get("after");

        if let Some(body) = &state.body {
            return RawResponse::new(200, body.clone());
        }
        if let Some(status) = state.failure {
            if !state.cursor_only || cursor.is_some() {
                return RawResponse::new(status, "");
            }
        }

        let limit = params
            .get("limit")
            .and_then(|l| l.parse::<usize>().ok())
            .unwrap_or(25);
        let start = match cursor {
            Some(cursor) => state
                .ids
                .iter()
                .position(|id| format!("t3_{}", id) == *cursor)
                .map(|i| i + 1)
                .unwrap_or(state.ids.len()),
            None => 0,
        };
        let end = (start + limit).min(state.ids.len());
        let page: Vec<&str> = state.ids[start..end].iter().map(String::as_str).collect();
        let after = match page.last() {
            Some(last) if end < state.ids.len() => Some(format!("t3_{}", last)),
            _ => None,
        };

        RawResponse::new(200, listing_body(&page, after.as_deref(), None))
    }
}

mod client {
    use super::support::{listing_body, token_body, Feed, MockTransport, TEST_USER_AGENT};
    use crate::api::{RedditClient, Sort, TimeRange};
    use crate::models::RedditPostData;
    use crate::session::SessionState;
    use crate::transport::RawResponse;
    use redwatch_core::{CoreError, Credentials, RedditApiError, TokenDuration};
    use std::sync::atomic::Ordering;
    use std::sync::{Arc, Mutex};

    fn userless() -> Credentials {
        Credentials::userless("id", "secret", TEST_USER_AGENT)
    }

    fn script() -> Credentials {
        Credentials::script("id", "secret", "tester", "hunter2", TEST_USER_AGENT)
    }

    async fn logged_in(transport: Arc<MockTransport>) -> RedditClient {
        let client = RedditClient::with_transport(script(), transport).unwrap();
        client.login(TokenDuration::Temporary).await.unwrap();
        client
    }

    /// Answers the token endpoint and delegates everything else.
    fn with_token_endpoint<F>(api: F) -> Arc<MockTransport>
    where
        F: Fn(&crate::transport::RawRequest) -> Result<RawResponse, CoreError>
            + Send
            + Sync
            + 'static,
    {
        Arc::new(MockTransport::new(move |request| {
            if request.url.path() == "/api/v1/access_token" {
                return Ok(RawResponse::new(200, token_body("api-token", 3600, None)));
            }
            api(request)
        }))
    }

    #[test]
    fn test_client_creation() {
        let client = RedditClient::new(userless()).unwrap();
        let state = tokio_test::block_on(client.session().state());
        assert_eq!(state, SessionState::LoggedOut);
    }

    #[tokio::test]
    async fn test_get_user_info() {
        let transport = with_token_endpoint(|request| {
            assert_eq!(request.url.host_str(), Some("oauth.reddit.com"));
            assert_eq!(request.url.path(), "/api/v1/me");
            assert_eq!(request.header("authorization"), Some("bearer api-token"));
            Ok(RawResponse::new(
                200,
                r#"{"id": "abc", "name": "tester", "link_karma": 12, "comment_karma": 3}"#,
            ))
        });
        let client = logged_in(transport.clone()).await;

        let user = client.get_user_info().await.unwrap();
        assert_eq!(user.name, "tester");
        assert_eq!(user.link_karma, 12);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_call_before_login_fails() {
        let transport = Arc::new(MockTransport::new(|_| Ok(RawResponse::new(200, "{}"))));
        let client = RedditClient::with_transport(script(), transport.clone()).unwrap();

        let result = client.get_user_info().await;
        assert!(matches!(
            result,
            Err(CoreError::RedditApi(RedditApiError::AuthenticationFailed { .. }))
        ));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_userless_client_has_no_account() {
        let transport =
            with_token_endpoint(|request| panic!("unexpected request to {}", request.url.path()));
        let client = RedditClient::with_transport(userless(), transport.clone()).unwrap();
        client.login(TokenDuration::Temporary).await.unwrap();

        assert!(matches!(
            client.get_user_info().await,
            Err(CoreError::InvalidInput { .. })
        ));
        assert!(matches!(
            client.get_user_subreddits(10).await,
            Err(CoreError::InvalidInput { .. })
        ));
        // only the token exchange
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_subreddit_info() {
        let transport = with_token_endpoint(|request| {
            assert_eq!(request.url.path(), "/r/rust/about");
            Ok(RawResponse::new(
                200,
                r#"{"kind": "t5", "data": {"id": "2s7lj", "display_name": "rust", "subscribers": 300000}}"#,
            ))
        });
        let client = logged_in(transport).await;

        let subreddit = client.get_subreddit_info("rust").await.unwrap();
        assert_eq!(subreddit.display_name, "rust");
        assert_eq!(subreddit.subscribers, 300000);
    }

    #[tokio::test]
    async fn test_missing_subreddit() {
        let transport = with_token_endpoint(|_| Ok(RawResponse::new(404, "")));
        let client = logged_in(transport).await;

        let result = client.get_subreddit_info("doesnotexist").await;
        assert!(matches!(
            result,
            Err(CoreError::RedditApi(RedditApiError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_get_subreddit_posts() {
        let transport = with_token_endpoint(|request| {
            assert_eq!(request.url.path(), "/r/rust/top");
            assert_eq!(request.url.query(), Some("limit=100&t=week"));
            Ok(RawResponse::new(200, listing_body(&["b", "a"], Some("t3_a"), None)))
        });
        let client = logged_in(transport).await;

        let posts = client
            .get_subreddit_posts("rust", Sort::Top(TimeRange::Week), 500)
            .await
            .unwrap();
        let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(posts[0].title, "post b");
        assert_eq!(posts[0].subreddit, "rust");
    }

    #[tokio::test]
    async fn test_get_user_subreddits_spans_pages() {
        let transport = with_token_endpoint(|request| {
            assert_eq!(request.url.path(), "/subreddits/mine/subscriber");
            let body = if request.url.query().unwrap_or_default().contains("after=") {
                r#"{"kind": "Listing", "data": {"children": [
                    {"kind": "t5", "data": {"id": "3", "display_name": "golang"}}
                ], "after": null, "before": null}}"#
            } else {
                r#"{"kind": "Listing", "data": {"children": [
                    {"kind": "t5", "data": {"id": "1", "display_name": "rust"}},
                    {"kind": "t5", "data": {"id": "2", "display_name": "linux"}}
                ], "after": "t5_2", "before": null}}"#
            };
            Ok(RawResponse::new(200, body))
        });
        let client = logged_in(transport).await;

        let all = client.get_user_subreddits(10).await.unwrap();
        let names: Vec<_> = all.iter().map(|s| s.display_name.as_str()).collect();
        assert_eq!(names, vec!["rust", "linux", "golang"]);

        let first_two = client.get_user_subreddits(2).await.unwrap();
        assert_eq!(first_two.len(), 2);
    }

    #[tokio::test]
    async fn test_get_user_subreddits_propagates_errors() {
        let transport = with_token_endpoint(|_| Ok(RawResponse::new(403, "")));
        let client = logged_in(transport).await;

        let result = client.get_user_subreddits(10).await;
        assert!(matches!(
            result,
            Err(CoreError::RedditApi(RedditApiError::Forbidden { .. }))
        ));
    }

    #[tokio::test]
    async fn test_rate_limit_surfaces_retry_after() {
        let transport = with_token_endpoint(|_| {
            let mut response = RawResponse::new(429, "");
            response
                .headers
                .push(("x-ratelimit-reset".to_string(), "42".to_string()));
            Ok(response)
        });
        let client = logged_in(transport).await;

        let result = client.get_subreddit_posts("rust", Sort::New, 10).await;
        assert!(matches!(
            result,
            Err(CoreError::RedditApi(RedditApiError::RateLimitExceeded { retry_after: 42 }))
        ));
    }

    #[tokio::test]
    async fn test_watch_subreddit_end_to_end() {
        let feed = Feed::new(&["3", "2", "1"]);
        let transport = feed.transport();
        let client = RedditClient::with_transport(userless(), transport).unwrap();
        client
            .session()
            .set_token(crate::session::SessionToken {
                access_token: "t".to_string(),
                token_type: "bearer".to_string(),
                expires_in: 3600,
                refresh_token: None,
                scope: Vec::new(),
                created_at: std::time::SystemTime::now(),
            })
            .await;

        let registry = client.watch_subreddit("rust");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        registry.add_listener(Arc::new(move |post: &RedditPostData| {
            sink.lock().unwrap().push(post.id.clone())
        }));

        // arming cycle delivers nothing
        assert_eq!(registry.notify_all().await.unwrap(), 0);

        feed.push("4");
        feed.push("5");
        assert_eq!(registry.notify_all().await.unwrap(), 2);
        assert_eq!(*seen.lock().unwrap(), vec!["4", "5"]);
        assert_eq!(registry.poller().watermark().await.unwrap().id, "5");

        for request in feed.requests() {
            assert_eq!(request.url.path(), "/r/rust/new");
        }
    }

    #[tokio::test]
    async fn test_logout_through_client() {
        let transport = with_token_endpoint(|request| {
            assert_eq!(request.url.path(), "/api/v1/revoke_token");
            Ok(RawResponse::new(200, ""))
        });
        let client = logged_in(transport.clone()).await;
        assert_eq!(client.session().state().await, SessionState::Active);

        client.logout().await;
        assert_eq!(client.session().state().await, SessionState::LoggedOut);
    }
}
