use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Anything listed by the API that carries a creation-ordered id.
pub trait Thing {
    /// Base-36 id without the kind prefix, e.g. `1abc2d`.
    fn id(&self) -> &str;

    /// Seconds since the Unix epoch.
    fn created_utc(&self) -> f64;

    fn created_at(&self) -> Option<DateTime<Utc>> {
        let secs = self.created_utc();
        Utc.timestamp_opt(secs.trunc() as i64, 0).single()
    }
}

/// Orders ids by creation: a longer base-36 id was assigned later, equal lengths
/// compare lexicographically.
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// True when `candidate` was created after `watermark`.
pub fn is_newer(candidate: &str, watermark: &str) -> bool {
    compare_ids(candidate, watermark) == Ordering::Greater
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedditPost {
    pub id: String,
    pub title: String,
    pub author: String,
    pub content: Option<String>,
    pub subreddit: String,
    pub url: String,
    pub permalink: String,
    pub score: i32,
    pub num_comments: u32,
    pub created_utc: i64,
}

impl Thing for RedditPost {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_utc(&self) -> f64 {
        self.created_utc as f64
    }
}
