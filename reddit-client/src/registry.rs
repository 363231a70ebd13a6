//! Fan-out of poller deltas to registered listeners.

use crate::poller::Poller;
use async_trait::async_trait;
use redwatch_core::{compare_ids, CoreError, Thing};
use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

/// Receives new items, oldest first.
pub trait Listener<T>: Send + Sync {
    fn on_item(&self, item: &T);
}

impl<T, F> Listener<T> for F
where
    F: Fn(&T) + Send + Sync,
{
    fn on_item(&self, item: &T) {
        self(item)
    }
}

/// Something the poll service can drive on an interval.
#[async_trait]
pub trait PollTarget: Send + Sync {
    fn resource(&self) -> String;

    /// Runs one poll cycle and returns the number of items delivered.
    async fn notify_all(&self) -> Result<usize, CoreError>;
}

pub struct ListenerRegistry<T> {
    poller: Poller<T>,
    listeners: Mutex<Vec<Arc<dyn Listener<T>>>>,
    broadcast: tokio::sync::Mutex<()>,
}

fn same_listener<T>(a: &Arc<dyn Listener<T>>, b: &Arc<dyn Listener<T>>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

impl<T> ListenerRegistry<T>
where
    T: Thing + Clone + DeserializeOwned + Send + Sync,
{
    pub fn new(poller: Poller<T>) -> Self {
        Self {
            poller,
            listeners: Mutex::new(Vec::new()),
            broadcast: tokio::sync::Mutex::new(()),
        }
    }

    pub fn poller(&self) -> &Poller<T> {
        &self.poller
    }

    /// Returns false if the listener was already registered.
    pub fn add_listener(&self, listener: Arc<dyn Listener<T>>) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        if listeners.iter().any(|l| same_listener(l, &listener)) {
            return false;
        }
        listeners.push(listener);
        true
    }

    /// Returns false if the listener was not registered.
    pub fn remove_listener(&self, listener: &Arc<dyn Listener<T>>) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|l| !same_listener(l, listener));
        listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> Vec<Arc<dyn Listener<T>>> {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn delta(&self) -> Result<Vec<T>, CoreError> {
        let mut items = self.poller.next().await?;
        items.sort_by(|a, b| compare_ids(a.id(), b.id()));
        Ok(items)
    }

    /// Polls once and hands every new item, oldest first, to each listener registered
    /// when the broadcast began. Returns the number of new items.
    pub async fn notify_all(&self) -> Result<usize, CoreError> {
        let _broadcast = self.broadcast.lock().await;
        let listeners = self.snapshot();
        let items = self.delta().await?;

        if !items.is_empty() {
            info!(
                "Delivering {} item(s) from {} to {} listener(s)",
                items.len(),
                self.poller.resource(),
                listeners.len()
            );
        }
        for listener in &listeners {
            for item in &items {
                listener.on_item(item);
            }
        }
        Ok(items.len())
    }

    /// Polls once on behalf of a single listener.
    pub async fn notify_one(&self, listener: &dyn Listener<T>) -> Result<usize, CoreError> {
        let _broadcast = self.broadcast.lock().await;
        let items = self.delta().await?;
        debug!(
            "Delivering {} item(s) from {} to one listener",
            items.len(),
            self.poller.resource()
        );
        for item in &items {
            listener.on_item(item);
        }
        Ok(items.len())
    }
}

#[async_trait]
impl<T> PollTarget for ListenerRegistry<T>
where
    T: Thing + Clone + DeserializeOwned + Send + Sync,
{
    fn resource(&self) -> String {
        self.poller.resource()
    }

    async fn notify_all(&self) -> Result<usize, CoreError> {
        ListenerRegistry::notify_all(self).await
    }
}
