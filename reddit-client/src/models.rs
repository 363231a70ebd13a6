use redwatch_core::{CoreError, RedditPost, Thing};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::error;

/// One page of a listing: items in server order plus the cursors to move on.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub after: Option<String>,
    pub before: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, after: Option<String>, before: Option<String>) -> Self {
        Self {
            items,
            after: normalize_cursor(after),
            before: normalize_cursor(before),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// A freshly fetched page with neither cursor is the last one.
    pub fn is_exhausted(&self) -> bool {
        self.after.is_none() && self.before.is_none()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

fn normalize_cursor(cursor: Option<String>) -> Option<String> {
    cursor.filter(|c| !c.trim().is_empty())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListing<T> {
    pub kind: String,
    pub data: RedditListingData<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListingData<T> {
    pub children: Vec<RedditListingChild<T>>,
    pub after: Option<String>,
    pub before: Option<String>,
    #[serde(default)]
    pub modhash: Option<String>,
    #[serde(default)]
    pub dist: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListingChild<T> {
    pub kind: String,
    pub data: T,
}

impl<T> From<RedditListing<T>> for Page<T> {
    fn from(listing: RedditListing<T>) -> Self {
        let data = listing.data;
        Page::new(
            data.children.into_iter().map(|child| child.data).collect(),
            data.after,
            data.before,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedditPostData {
    #[serde(deserialize_with = "thing_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub subreddit_name_prefixed: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub score: i32,
    #[serde(default)]
    pub num_comments: u32,
    #[serde(default)]
    pub over_18: bool,
    #[serde(default)]
    pub stickied: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub ups: i32,
    #[serde(default)]
    pub downs: i32,
    #[serde(default)]
    pub upvote_ratio: Option<f64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub is_self: bool,
    #[serde(default)]
    pub domain: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedditCommentData {
    #[serde(deserialize_with = "thing_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub link_id: String,
    #[serde(default)]
    pub parent_id: String,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub score: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedditUserData {
    #[serde(deserialize_with = "thing_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub link_karma: i32,
    #[serde(default)]
    pub comment_karma: i32,
    #[serde(default)]
    pub is_gold: bool,
    #[serde(default)]
    pub is_mod: bool,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub has_verified_email: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedditSubredditData {
    #[serde(deserialize_with = "thing_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub public_description: String,
    #[serde(default)]
    pub subscribers: u32,
    #[serde(default)]
    pub active_user_count: Option<u32>,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub over18: bool,
    #[serde(default)]
    pub lang: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub icon_img: Option<String>,
}

impl Thing for RedditPostData {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_utc(&self) -> f64 {
        self.created_utc
    }
}

impl Thing for RedditCommentData {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_utc(&self) -> f64 {
        self.created_utc
    }
}

impl Thing for RedditSubredditData {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_utc(&self) -> f64 {
        self.created_utc
    }
}

impl From<RedditPostData> for RedditPost {
    fn from(post_data: RedditPostData) -> Self {
        Self {
            id: post_data.id,
            title: post_data.title,
            author: post_data.author,
            content: if post_data.is_self && !post_data.selftext.is_empty() {
                Some(post_data.selftext)
            } else {
                None
            },
            subreddit: post_data.subreddit,
            url: post_data.url,
            permalink: post_data.permalink,
            score: post_data.score,
            num_comments: post_data.num_comments,
            created_utc: post_data.created_utc as i64,
        }
    }
}

/// Ids drive the poller's watermark, so a thing without one is rejected.
fn thing_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let id = String::deserialize(deserializer)?;
    if id.trim().is_empty() {
        return Err(de::Error::invalid_value(
            de::Unexpected::Str(&id),
            &"a non-empty id",
        ));
    }
    Ok(id)
}

/// Parses a `Listing` body into a [`Page`].
pub fn parse_listing<T: DeserializeOwned>(body: &str) -> Result<Page<T>, CoreError> {
    let listing: RedditListing<T> = serde_json::from_str(body).map_err(|e| {
        error!("Failed to parse listing: {}", e);
        CoreError::invalid_response(format!("malformed listing: {}", e))
    })?;
    Ok(listing.into())
}

/// Parses a single `{kind, data}` wrapped object, e.g. `/r/{}/about`.
pub fn parse_thing<T: DeserializeOwned>(body: &str) -> Result<T, CoreError> {
    let child: RedditListingChild<T> = serde_json::from_str(body).map_err(|e| {
        error!("Failed to parse thing: {}", e);
        CoreError::invalid_response(format!("malformed thing: {}", e))
    })?;
    Ok(child.data)
}

/// Parses an unwrapped JSON object, e.g. `/api/v1/me`.
pub fn parse_object<T: DeserializeOwned>(body: &str) -> Result<T, CoreError> {
    serde_json::from_str(body).map_err(|e| {
        error!("Failed to parse response: {}", e);
        CoreError::invalid_response(format!("malformed object: {}", e))
    })
}
