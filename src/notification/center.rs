//! In-process notification center.
//!
//! Each pending request is a tokio task sleeping until its fire time.
//! Removing a request aborts its task.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use super::delegate::NotificationDelegate;
use super::error::NotificationError;
use super::request::NotificationRequest;

type PendingMap = HashMap<String, JoinHandle<()>>;

pub struct NotificationCenter {
    runtime: Handle,
    delegate: NotificationDelegate,
    pending: Arc<Mutex<PendingMap>>,
}

impl NotificationCenter {
    /// Creates a center bound to the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError::RuntimeUnavailable` outside a runtime.
    pub fn current(delegate: NotificationDelegate) -> Result<Self, NotificationError> {
        let runtime = Handle::try_current().map_err(|_| NotificationError::RuntimeUnavailable)?;
        Ok(Self {
            runtime,
            delegate,
            pending: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Adds a request that fires after `request.fire_after`.
    pub fn add_notification_request(&self, request: NotificationRequest) {
        let identifier = request.identifier.clone();
        let pending = Arc::clone(&self.pending);
        let delegate = self.delegate.clone();

        // Held across spawn so a zero-delay task cannot fire before it is recorded.
        let mut guard = lock(&self.pending);
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(request.fire_after).await;
            lock(&pending).remove(&request.identifier);
            debug!("Notification fired: {}", request.identifier);
            delegate.will_present(request);
        });

        if let Some(previous) = guard.insert(identifier, handle) {
            previous.abort();
        }
    }

    /// Identifiers of requests that have not fired yet.
    #[must_use]
    pub fn pending_identifiers(&self) -> Vec<String> {
        let mut ids: Vec<String> = lock(&self.pending).keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Removes the given pending requests. Returns how many were removed.
    pub fn remove_pending(&self, identifiers: &[String]) -> usize {
        let mut pending = lock(&self.pending);
        let mut removed = 0;
        for handle in identifiers.iter().filter_map(|id| pending.remove(id)) {
            handle.abort();
            removed += 1;
        }
        removed
    }

    pub fn remove_all_pending(&self) {
        for (_, handle) in lock(&self.pending).drain() {
            handle.abort();
        }
    }

    #[must_use]
    pub fn delegate(&self) -> &NotificationDelegate {
        &self.delegate
    }
}

impl Drop for NotificationCenter {
    fn drop(&mut self) {
        self.remove_all_pending();
    }
}

fn lock(pending: &Mutex<PendingMap>) -> MutexGuard<'_, PendingMap> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}
