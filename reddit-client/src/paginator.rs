//! Cursor-driven traversal of listing endpoints.
//!
//! A [`Paginator`] turns one listing query into a lazy sequence of [`Page`]s. Every call
//! to [`Paginator::next_page`] costs exactly one round trip and reports one of three
//! outcomes: `Some(Ok(page))`, `Some(Err(error))` after which the sequence is over, or
//! `None` once the listing is exhausted.

use crate::models::{parse_listing, Page};
use crate::query::Query;
use crate::session::Session;
use futures::stream::{self, Stream};
use redwatch_core::CoreError;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, warn};

/// Which cursor is carried from one page to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Follow `after`: newest to oldest on time-sorted listings.
    #[default]
    Forward,
    /// Follow `before`.
    Backward,
}

pub struct Paginator<T> {
    session: Arc<Session>,
    query: Query,
    direction: Direction,
    cursor: Option<String>,
    items_seen: usize,
    pages_fetched: usize,
    finished: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Paginator<T> {
    pub fn new(session: Arc<Session>, query: Query) -> Self {
        Self {
            session,
            query,
            direction: Direction::Forward,
            cursor: None,
            items_seen: 0,
            pages_fetched: 0,
            finished: false,
            _marker: PhantomData,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Starts the traversal over from the template query.
    pub fn restart(&mut self) {
        self.cursor = None;
        self.items_seen = 0;
        self.pages_fetched = 0;
        self.finished = false;
    }

    fn next_query(&self) -> Query {
        let Some(cursor) = self.cursor.as_ref() else {
            return self.query.clone();
        };

        let (carry, drop) = match self.direction {
            Direction::Forward => ("after", "before"),
            Direction::Backward => ("before", "after"),
        };
        self.query
            .clone()
            .without_param(drop)
            .with_param(carry, cursor.clone())
            .with_param("count", self.items_seen.to_string())
    }

    pub async fn next_page(&mut self) -> Option<Result<Page<T>, CoreError>> {
        if self.finished {
            return None;
        }

        let query = self.next_query();
        let result = match self.session.execute(&query).await {
            Ok(body) => parse_listing::<T>(&body),
            Err(e) => Err(e),
        };

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                warn!(
                    "Page {} of {:?} failed: {}",
                    self.pages_fetched + 1,
                    self.query.endpoint,
                    e
                );
                self.finished = true;
                return Some(Err(e));
            }
        };

        self.pages_fetched += 1;
        self.items_seen += page.len();
        let cursor = match self.direction {
            Direction::Forward => page.after.clone(),
            Direction::Backward => page.before.clone(),
        };
        if page.is_empty() || page.is_exhausted() || cursor.is_none() {
            debug!(
                "Listing {:?} exhausted after {} page(s)",
                self.query.endpoint, self.pages_fetched
            );
            self.finished = true;
        }
        self.cursor = cursor;

        Some(Ok(page))
    }

    /// The same traversal as a [`Stream`]; an error is its final element.
    pub fn into_stream(self) -> impl Stream<Item = Result<Page<T>, CoreError>> {
        stream::unfold(self, |mut paginator| async move {
            let next = paginator.next_page().await?;
            Some((next, paginator))
        })
    }

    /// Gathers up to `max_items` items across pages. A failed page ends the walk
    /// and whatever was gathered so far is returned.
    pub async fn collect_items(mut self, max_items: usize) -> Vec<T> {
        let mut items = Vec::new();
        while items.len() < max_items {
            match self.next_page().await {
                Some(Ok(page)) => items.extend(page.items),
                Some(Err(e)) => {
                    warn!("Truncating listing after {} item(s): {}", items.len(), e);
                    break;
                }
                None => break,
            }
        }
        items.truncate(max_items);
        items
    }
}
