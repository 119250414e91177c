//! Registry of live push subscriptions.
//!
//! The registry is created when the server starts, shared through the
//! application state, and shut down when the server stops. Each WebSocket
//! connection holds a [`SubscriptionHandle`]; dropping the handle removes the
//! subscription.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use uuid::Uuid;

use super::production::QueryMode;

/// Snapshot of one subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionInfo {
    pub id: Uuid,
    pub unit: String,
    pub mode: QueryMode,
    /// Requested range; unset until the client sends its first request.
    pub start_time: Option<NaiveDateTime>,
    /// `None` means "up to now" on every push.
    pub end_time: Option<NaiveDateTime>,
    pub connected_at: DateTime<Utc>,
    pub last_push_at: Option<DateTime<Utc>>,
    pub push_count: u64,
}

struct RegistryInner {
    subscriptions: RwLock<HashMap<Uuid, SubscriptionInfo>>,
    shutdown: watch::Sender<bool>,
}

/// Shared registry of active subscriptions.
#[derive(Clone)]
pub struct SubscriptionRegistry {
    inner: Arc<RegistryInner>,
}

impl SubscriptionRegistry {
    /// Create an empty, running registry.
    pub fn new() -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            inner: Arc::new(RegistryInner {
                subscriptions: RwLock::new(HashMap::new()),
                shutdown,
            }),
        }
    }

    /// Register a new subscription and return its handle.
    pub fn register(&self, unit: impl Into<String>, mode: QueryMode) -> SubscriptionHandle {
        let id = Uuid::new_v4();
        let info = SubscriptionInfo {
            id,
            unit: unit.into(),
            mode,
            start_time: None,
            end_time: None,
            connected_at: Utc::now(),
            last_push_at: None,
            push_count: 0,
        };
        tracing::info!("Subscription {} registered for {} ({})", id, info.unit, mode);
        self.inner.subscriptions.write().insert(id, info);

        SubscriptionHandle {
            id,
            registry: self.clone(),
        }
    }

    /// Record the range a subscription is now following.
    pub fn update_range(&self, id: Uuid, start: NaiveDateTime, end: Option<NaiveDateTime>) {
        if let Some(info) = self.inner.subscriptions.write().get_mut(&id) {
            info.start_time = Some(start);
            info.end_time = end;
        }
    }

    /// Record a successful push.
    pub fn mark_pushed(&self, id: Uuid) {
        if let Some(info) = self.inner.subscriptions.write().get_mut(&id) {
            info.last_push_at = Some(Utc::now());
            info.push_count += 1;
        }
    }

    /// Remove a subscription, returning its final state.
    pub fn unregister(&self, id: Uuid) -> Option<SubscriptionInfo> {
        let removed = self.inner.subscriptions.write().remove(&id);
        if let Some(info) = &removed {
            tracing::info!(
                "Subscription {} for {} closed after {} pushes",
                id,
                info.unit,
                info.push_count
            );
        }
        removed
    }

    /// Get one subscription by id.
    pub fn get(&self, id: Uuid) -> Option<SubscriptionInfo> {
        self.inner.subscriptions.read().get(&id).cloned()
    }

    /// All subscriptions, oldest first.
    pub fn list(&self) -> Vec<SubscriptionInfo> {
        let mut subscriptions: Vec<_> = self.inner.subscriptions.read().values().cloned().collect();
        subscriptions.sort_by_key(|s| s.connected_at);
        subscriptions
    }

    pub fn len(&self) -> usize {
        self.inner.subscriptions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ask every push loop to stop.
    pub fn shutdown(&self) {
        tracing::info!("Shutting down {} subscriptions", self.len());
        self.inner.shutdown.send_replace(true);
    }

    pub fn is_shutdown(&self) -> bool {
        *self.inner.shutdown.borrow()
    }

    /// Resolves once [`shutdown`](Self::shutdown) has been called.
    pub fn shutdown_signal(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.inner.shutdown.subscribe();
        async move {
            loop {
                let stopped = *rx.borrow_and_update();
                if stopped || rx.changed().await.is_err() {
                    return;
                }
            }
        }
    }
}

impl Default for SubscriptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Ownership of one registered subscription.
pub struct SubscriptionHandle {
    id: Uuid,
    registry: SubscriptionRegistry,
}

impl SubscriptionHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn update_range(&self, start: NaiveDateTime, end: Option<NaiveDateTime>) {
        self.registry.update_range(self.id, start, end);
    }

    pub fn mark_pushed(&self) {
        self.registry.mark_pushed(self.id);
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.registry.unregister(self.id);
    }
}
