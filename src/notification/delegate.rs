//! Notification delegate.
//!
//! Receives presentation and response callbacks from the notification center
//! and forwards them to the UI loop over channels, so nothing here touches
//! countdown state directly.

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use super::actions::parse_action;
use super::request::{is_timer_request, NotificationRequest};

/// Events triggered by notification actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationActionEvent {
    /// User chose "stop and reset".
    StopTimer,
    /// User opened the notification itself.
    Default,
    /// User dismissed the notification.
    Dismiss,
}

/// A notification that fired and should be presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredNotification {
    pub request: NotificationRequest,
}

/// Forwards notification center callbacks to channels.
#[derive(Debug, Clone)]
pub struct NotificationDelegate {
    delivered_tx: UnboundedSender<DeliveredNotification>,
    action_tx: UnboundedSender<NotificationActionEvent>,
}

impl NotificationDelegate {
    #[must_use]
    pub fn new(
        delivered_tx: UnboundedSender<DeliveredNotification>,
        action_tx: UnboundedSender<NotificationActionEvent>,
    ) -> Self {
        Self {
            delivered_tx,
            action_tx,
        }
    }

    /// Called when a scheduled request fires.
    ///
    /// Timer notifications are presented even while the app is in the
    /// foreground. Returns true if the notification was forwarded.
    pub fn will_present(&self, request: NotificationRequest) -> bool {
        if !is_timer_request(&request.identifier) {
            debug!("Ignoring unknown notification: {}", request.identifier);
            return false;
        }
        self.delivered_tx
            .send(DeliveredNotification { request })
            .is_ok()
    }

    /// Called when the user interacts with a notification.
    pub fn did_receive_response(&self, action_identifier: &str) {
        match parse_action(action_identifier) {
            Some(event) => {
                if self.action_tx.send(event).is_err() {
                    debug!("Notification action receiver closed");
                }
            }
            None => debug!("Ignoring unknown notification action: {}", action_identifier),
        }
    }
}
