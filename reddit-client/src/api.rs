use crate::endpoint::Endpoint;
use crate::models::{
    parse_listing, parse_object, parse_thing, RedditCommentData, RedditPostData,
    RedditSubredditData, RedditUserData,
};
use crate::paginator::Paginator;
use crate::poller::Poller;
use crate::query::Query;
use crate::registry::ListenerRegistry;
use crate::session::Session;
use crate::transport::{ReqwestTransport, Transport};
use redwatch_core::{AppConfig, CoreError, Credentials, RedditPost, TokenDuration};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info};

const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    Hour,
    #[default]
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Hour => "hour",
            TimeRange::Day => "day",
            TimeRange::Week => "week",
            TimeRange::Month => "month",
            TimeRange::Year => "year",
            TimeRange::All => "all",
        }
    }
}

/// Listing order for subreddit posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sort {
    #[default]
    Hot,
    New,
    Rising,
    Top(TimeRange),
    Controversial(TimeRange),
}

impl Sort {
    fn query(&self, subreddit: &str) -> Query {
        let (endpoint, range) = match self {
            Sort::Hot => (Endpoint::SubredditHot, None),
            Sort::New => (Endpoint::SubredditNew, None),
            Sort::Rising => (Endpoint::SubredditRising, None),
            Sort::Top(range) => (Endpoint::SubredditTop, Some(range)),
            Sort::Controversial(range) => (Endpoint::SubredditControversial, Some(range)),
        };
        let query = Query::new(endpoint).with_arg(subreddit);
        match range {
            Some(range) => query.with_param("t", range.as_str()),
            None => query,
        }
    }
}

/// Typed entry point over a shared [`Session`].
#[derive(Debug, Clone)]
pub struct RedditClient {
    session: Arc<Session>,
}

impl RedditClient {
    pub fn new(credentials: Credentials) -> Result<Self, CoreError> {
        let transport = Arc::new(ReqwestTransport::new()?);
        Self::with_transport(credentials, transport)
    }

    pub fn with_transport(
        credentials: Credentials,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, CoreError> {
        let session = Session::new(credentials, transport)?;
        Ok(Self {
            session: Arc::new(session),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, CoreError> {
        Self::new(config.credentials())
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub async fn login(&self, duration: TokenDuration) -> Result<(), CoreError> {
        self.session.login(duration).await
    }

    pub async fn logout(&self) {
        self.session.logout().await
    }

    pub async fn get_user_info(&self) -> Result<RedditUserData, CoreError> {
        let body = self.session.execute(&Query::new(Endpoint::Me)).await?;
        let user_data: RedditUserData = parse_object(&body)?;
        debug!("Retrieved user info for: {}", user_data.name);
        Ok(user_data)
    }

    pub async fn get_subreddit_info(
        &self,
        subreddit: &str,
    ) -> Result<RedditSubredditData, CoreError> {
        let query = Query::new(Endpoint::SubredditAbout).with_arg(subreddit);
        let body = self.session.execute(&query).await?;
        let subreddit_data: RedditSubredditData = parse_thing(&body)?;
        debug!(
            "Retrieved subreddit info for r/{} ({} subscribers)",
            subreddit_data.display_name, subreddit_data.subscribers
        );
        Ok(subreddit_data)
    }

    /// First page of a subreddit in the given order.
    pub async fn get_subreddit_posts(
        &self,
        subreddit: &str,
        sort: Sort,
        limit: u32,
    ) -> Result<Vec<RedditPost>, CoreError> {
        let query = sort
            .query(subreddit)
            .with_limit(limit.clamp(1, MAX_PAGE_SIZE));
        let body = self.session.execute(&query).await?;
        let page = parse_listing::<RedditPostData>(&body)?;

        info!("Retrieved {} posts from r/{}", page.len(), subreddit);
        Ok(page.items.into_iter().map(RedditPost::from).collect())
    }

    /// Subreddits the authenticated user subscribes to, up to `max_items`.
    pub async fn get_user_subreddits(
        &self,
        max_items: usize,
    ) -> Result<Vec<RedditSubredditData>, CoreError> {
        let query = Query::new(Endpoint::MySubscriptions).with_limit(MAX_PAGE_SIZE);
        let mut paginator: Paginator<RedditSubredditData> = self.pages(query);
        let mut subreddits = Vec::new();

        while subreddits.len() < max_items {
            match paginator.next_page().await {
                Some(page) => subreddits.extend(page?.items),
                None => break,
            }
        }
        subreddits.truncate(max_items);

        info!("Retrieved {} subscribed subreddits", subreddits.len());
        Ok(subreddits)
    }

    pub fn pages<T: DeserializeOwned>(&self, query: Query) -> Paginator<T> {
        Paginator::new(self.session.clone(), query)
    }

    pub fn new_posts_poller(&self, subreddit: &str) -> Poller<RedditPostData> {
        Poller::new(
            self.session.clone(),
            Query::new(Endpoint::SubredditNew).with_arg(subreddit),
        )
    }

    pub fn new_comments_poller(&self, subreddit: &str) -> Poller<RedditCommentData> {
        Poller::new(
            self.session.clone(),
            Query::new(Endpoint::SubredditComments).with_arg(subreddit),
        )
    }

    /// A registry fed by the subreddit's newest posts.
    pub fn watch_subreddit(&self, subreddit: &str) -> ListenerRegistry<RedditPostData> {
        ListenerRegistry::new(self.new_posts_poller(subreddit))
    }
}
