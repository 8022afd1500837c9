//! Completion notifications.
//!
//! This module provides the notifier the countdown engine uses to announce
//! that time is up, even when the app is in the background:
//!
//! - Scheduling a completion notification for a delay
//! - Cancelling every pending timer notification
//! - A "stop and reset" action button on delivered notifications
//! - Permission handling
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use tinytimer::notification::{CompletionNotifier, NotifierConfig, ScheduledNotifier};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (notifier, mut receivers) = ScheduledNotifier::new(NotifierConfig::default())?;
//!     notifier.schedule_completion(Duration::from_secs(10))?;
//!
//!     if let Some(delivered) = receivers.delivered.recv().await {
//!         println!("{}", delivered.request.content.title);
//!     }
//!     Ok(())
//! }
//! ```

mod actions;
mod center;
mod content;
mod delegate;
pub mod error;
mod request;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver};

pub use self::actions::{
    action_ids, category_ids, create_categories, parse_action, NotificationAction,
    NotificationCategory,
};
pub use self::content::{
    create_completion_content, NotificationContent, NotificationContentBuilder,
    COMPLETION_BODY, COMPLETION_TITLE,
};
pub use self::delegate::{DeliveredNotification, NotificationActionEvent, NotificationDelegate};
pub use self::error::NotificationError;
pub use self::request::{
    create_completion_request, is_timer_request, NotificationRequest, REQUEST_ID_PREFIX,
};

use self::center::NotificationCenter;

/// Notification commands issued by the countdown engine.
///
/// Delivery while the app is backgrounded is the notifier's job; the engine
/// only schedules and cancels.
pub trait CompletionNotifier {
    /// Schedules the completion notification `after` from now, replacing any
    /// pending one.
    fn schedule_completion(&self, after: Duration) -> Result<(), NotificationError>;

    /// Cancels every pending completion notification.
    fn cancel_scheduled(&self);

    /// Returns true if notifications may be shown.
    fn is_authorized(&self) -> bool;
}

fn default_true() -> bool {
    true
}

/// Notifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotifierConfig {
    /// Whether the user allows notifications.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Whether delivered notifications ring the terminal bell.
    #[serde(default = "default_true")]
    pub bell: bool,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bell: true,
        }
    }
}

impl NotifierConfig {
    /// Configuration with notifications denied.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Receiving ends for delivered notifications and action responses.
#[derive(Debug)]
pub struct NotificationReceivers {
    pub delivered: UnboundedReceiver<DeliveredNotification>,
    pub actions: UnboundedReceiver<NotificationActionEvent>,
}

/// Notifier that fires completion notifications from tokio timers.
pub struct ScheduledNotifier {
    center: NotificationCenter,
    config: NotifierConfig,
    categories: Vec<NotificationCategory>,
    authorized: AtomicBool,
}

impl ScheduledNotifier {
    /// Creates a notifier on the current tokio runtime.
    ///
    /// This will:
    /// 1. Set up the delegate and its channels
    /// 2. Register the notification categories (action buttons)
    /// 3. Request authorization
    ///
    /// # Errors
    ///
    /// Returns `NotificationError::RuntimeUnavailable` when called outside a
    /// tokio runtime.
    pub fn new(config: NotifierConfig) -> Result<(Self, NotificationReceivers), NotificationError> {
        let (delivered_tx, delivered) = mpsc::unbounded_channel();
        let (action_tx, actions) = mpsc::unbounded_channel();

        let delegate = NotificationDelegate::new(delivered_tx, action_tx);
        let center = NotificationCenter::current(delegate)?;

        let notifier = Self {
            center,
            config,
            categories: create_categories(),
            authorized: AtomicBool::new(false),
        };
        notifier.request_authorization();

        Ok((notifier, NotificationReceivers { delivered, actions }))
    }

    /// Requests permission to show notifications. Returns whether it was granted.
    pub fn request_authorization(&self) -> bool {
        let granted = self.config.enabled;
        self.authorized.store(granted, Ordering::SeqCst);
        if !granted {
            tracing::info!("通知は無効です");
        }
        granted
    }

    #[must_use]
    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    #[must_use]
    pub fn categories(&self) -> &[NotificationCategory] {
        &self.categories
    }

    /// Identifiers of pending completion notifications.
    #[must_use]
    pub fn pending_identifiers(&self) -> Vec<String> {
        self.center
            .pending_identifiers()
            .into_iter()
            .filter(|id| is_timer_request(id))
            .collect()
    }

    /// Reports a user response to a delivered notification.
    pub fn respond(&self, action_identifier: &str) {
        self.center.delegate().did_receive_response(action_identifier);
    }
}

impl CompletionNotifier for ScheduledNotifier {
    fn schedule_completion(&self, after: Duration) -> Result<(), NotificationError> {
        if !self.is_authorized() {
            return Err(NotificationError::PermissionDenied);
        }

        self.cancel_scheduled();

        let request = create_completion_request(after);
        tracing::debug!(
            "Scheduled notification with ID: {} for {} seconds",
            request.identifier,
            after.as_secs()
        );
        self.center.add_notification_request(request);
        Ok(())
    }

    fn cancel_scheduled(&self) {
        let ids = self.pending_identifiers();
        if ids.is_empty() {
            return;
        }
        let removed = self.center.remove_pending(&ids);
        tracing::debug!("Cancelled {} timer notifications", removed);
    }

    fn is_authorized(&self) -> bool {
        self.authorized.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for ScheduledNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledNotifier")
            .field("config", &self.config)
            .field("authorized", &self.is_authorized())
            .finish_non_exhaustive()
    }
}

/// A call recorded by [`MockNotifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierCall {
    Schedule(Duration),
    Cancel,
}

#[derive(Debug)]
pub struct MockNotifier {
    calls: std::sync::Mutex<Vec<NotifierCall>>,
    pending: std::sync::Mutex<Option<Duration>>,
    authorized: std::sync::atomic::AtomicBool,
    should_fail: std::sync::atomic::AtomicBool,
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self {
            calls: std::sync::Mutex::new(Vec::new()),
            pending: std::sync::Mutex::new(None),
            authorized: std::sync::atomic::AtomicBool::new(true),
            should_fail: std::sync::atomic::AtomicBool::new(false),
        }
    }

    pub fn set_authorized(&self, authorized: bool) {
        self.authorized
            .store(authorized, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<NotifierCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Delay of the notification currently scheduled, if any.
    #[must_use]
    pub fn pending(&self) -> Option<Duration> {
        *self.pending.lock().unwrap()
    }

    #[must_use]
    pub fn cancel_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| **c == NotifierCall::Cancel)
            .count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl CompletionNotifier for MockNotifier {
    fn schedule_completion(&self, after: Duration) -> Result<(), NotificationError> {
        self.calls.lock().unwrap().push(NotifierCall::Schedule(after));
        if !self.is_authorized() {
            return Err(NotificationError::PermissionDenied);
        }
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(NotificationError::ScheduleFailed("Mock failure".to_string()));
        }
        *self.pending.lock().unwrap() = Some(after);
        Ok(())
    }

    fn cancel_scheduled(&self) {
        self.calls.lock().unwrap().push(NotifierCall::Cancel);
        *self.pending.lock().unwrap() = None;
    }

    fn is_authorized(&self) -> bool {
        self.authorized.load(std::sync::atomic::Ordering::SeqCst)
    }
}
