//! Turns a newest-first listing into a stream of items not seen before.
//!
//! The poller remembers the newest item it has observed (the watermark). The first
//! call only arms it; every later call walks the listing from the top and keeps items
//! until it reaches one whose id is not greater than the watermark's. Ids are assigned
//! in creation order, so everything past that point has been seen already.

use crate::paginator::Paginator;
use crate::query::Query;
use crate::session::Session;
use redwatch_core::{is_newer, CoreError, Thing};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

pub const DEFAULT_PAGE_LIMIT: u32 = 25;

pub struct Poller<T> {
    session: Arc<Session>,
    query: Query,
    page_limit: u32,
    // Held for the whole cycle: concurrent next() calls are serialized.
    watermark: Mutex<Option<T>>,
}

impl<T> Poller<T>
where
    T: Thing + Clone + DeserializeOwned + Send,
{
    /// `query` must name a listing sorted newest first, e.g. `/r/{}/new`.
    pub fn new(session: Arc<Session>, query: Query) -> Self {
        Self {
            session,
            query,
            page_limit: DEFAULT_PAGE_LIMIT,
            watermark: Mutex::new(None),
        }
    }

    pub fn with_page_limit(mut self, page_limit: u32) -> Self {
        self.page_limit = page_limit.max(1);
        self
    }

    /// Starts from a known item instead of arming on the first call.
    pub fn with_watermark(mut self, item: T) -> Self {
        self.watermark = Mutex::new(Some(item));
        self
    }

    /// Human-readable name of the polled listing.
    pub fn resource(&self) -> String {
        self.query
            .path()
            .unwrap_or_else(|_| format!("{:?}", self.query.endpoint))
    }

    pub async fn watermark(&self) -> Option<T> {
        self.watermark.lock().await.clone()
    }

    /// Returns the items created since the previous call, newest first.
    ///
    /// The watermark only moves when the whole cycle succeeds; on error it is left as
    /// it was and the error is returned.
    pub async fn next(&self) -> Result<Vec<T>, CoreError> {
        let mut watermark = self.watermark.lock().await;

        let Some(mark_id) = watermark.as_ref().map(|item| item.id().to_string()) else {
            if let Some(newest) = self.fetch_newest().await? {
                info!(
                    "Armed poller for {} at {}",
                    self.resource(),
                    newest.id()
                );
                *watermark = Some(newest);
            } else {
                debug!("{} is empty, poller stays unarmed", self.resource());
            }
            return Ok(Vec::new());
        };

        let fresh = self.collect_newer(&mark_id).await?;
        if let Some(newest) = fresh.first() {
            info!(
                "{} new item(s) in {}, watermark {} -> {}",
                fresh.len(),
                self.resource(),
                mark_id,
                newest.id()
            );
            *watermark = Some(newest.clone());
        } else {
            debug!("No new items in {}", self.resource());
        }
        Ok(fresh)
    }

    async fn fetch_newest(&self) -> Result<Option<T>, CoreError> {
        let query = self.query.clone().with_limit(1);
        let mut paginator: Paginator<T> = Paginator::new(self.session.clone(), query);
        match paginator.next_page().await {
            Some(page) => Ok(page?.items.into_iter().next()),
            None => Ok(None),
        }
    }

    async fn collect_newer(&self, mark_id: &str) -> Result<Vec<T>, CoreError> {
        let query = self.query.clone().with_limit(self.page_limit);
        let mut paginator: Paginator<T> = Paginator::new(self.session.clone(), query);
        let mut fresh = Vec::new();

        while let Some(page) = paginator.next_page().await {
            for item in page?.items {
                if !is_newer(item.id(), mark_id) {
                    return Ok(fresh);
                }
                fresh.push(item);
            }
        }
        Ok(fresh)
    }
}
