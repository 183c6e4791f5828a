//! Rendered-view cache with path revalidation
//!
//! Views are cached by route path. Mutations call
//! [`ViewCache::revalidate_path`] to drop the stale entry; the next read
//! recomputes it. Every revalidation is also broadcast so other parts of the
//! process can react to it.
//!
//! ```text
//! invoice action ──▶ revalidate_path("/dashboard/invoices") ──▶ entry dropped
//!                                                          └──▶ broadcast ──▶ subscribers
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

/// Notification that a cached path went stale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revalidation {
    pub path: String,
    pub timestamp: DateTime<Utc>,
}

/// Path-keyed cache of JSON views
///
/// Cheap to clone; clones share the same entries and broadcast channel.
#[derive(Debug, Clone)]
pub struct ViewCache {
    entries: Arc<RwLock<HashMap<String, Value>>>,
    sender: broadcast::Sender<Revalidation>,
}

impl ViewCache {
    /// Create a cache whose revalidation channel buffers `capacity` events
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            sender,
        }
    }

    /// Cached view for `path`, if present
    pub fn get(&self, path: &str) -> Option<Value> {
        match self.entries.read() {
            Ok(entries) => entries.get(path).cloned(),
            Err(e) => {
                tracing::warn!(path, "view cache lock poisoned: {}", e);
                None
            }
        }
    }

    pub fn insert(&self, path: impl Into<String>, view: Value) {
        match self.entries.write() {
            Ok(mut entries) => {
                entries.insert(path.into(), view);
            }
            Err(e) => tracing::warn!("view cache lock poisoned: {}", e),
        }
    }

    /// Return the cached view or compute, store and return it
    ///
    /// A failed computation is not cached.
    pub async fn get_or_compute<F, Fut, E>(&self, path: &str, compute: F) -> Result<Value, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
    {
        if let Some(view) = self.get(path) {
            tracing::debug!(path, "view cache hit");
            return Ok(view);
        }

        tracing::debug!(path, "view cache miss");
        let view = compute().await?;
        self.insert(path, view.clone());
        Ok(view)
    }

    /// Mark the view at `path` stale
    pub fn revalidate_path(&self, path: &str) {
        let removed = match self.entries.write() {
            Ok(mut entries) => entries.remove(path).is_some(),
            Err(e) => {
                tracing::warn!(path, "view cache lock poisoned: {}", e);
                false
            }
        };
        tracing::debug!(path, removed, "revalidated path");

        // No subscribers is fine.
        let _ = self.sender.send(Revalidation {
            path: path.to_string(),
            timestamp: Utc::now(),
        });
    }

    /// Subscribe to revalidation notifications
    pub fn subscribe(&self) -> broadcast::Receiver<Revalidation> {
        self.sender.subscribe()
    }
}

impl Default for ViewCache {
    fn default() -> Self {
        Self::new(256)
    }
}
