//! Notification action and category definitions.

use super::delegate::NotificationActionEvent;

/// Notification action identifiers.
pub mod action_ids {
    /// Action ID for stopping and resetting the timer.
    pub const STOP_TIMER: &str = "STOP_TIMER";
    /// The user opened the notification itself.
    pub const DEFAULT: &str = "DEFAULT_ACTION";
    /// The user dismissed the notification.
    pub const DISMISS: &str = "DISMISS_ACTION";
}

/// Notification category identifiers.
pub mod category_ids {
    /// Category for timer completion notifications.
    pub const TIMER_COMPLETE: &str = "TIMER_COMPLETE";
}

/// A button shown on a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationAction {
    pub identifier: &'static str,
    pub title: &'static str,
    /// Whether choosing the action brings the app to the foreground.
    pub foreground: bool,
}

/// A set of actions attached to notifications of one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationCategory {
    pub identifier: &'static str,
    pub actions: Vec<NotificationAction>,
    /// Whether dismissing the notification is reported as an action.
    pub custom_dismiss_action: bool,
}

/// Creates the stop action.
#[must_use]
pub fn create_stop_action() -> NotificationAction {
    NotificationAction {
        identifier: action_ids::STOP_TIMER,
        title: "停止してリセット",
        foreground: true,
    }
}

/// Creates all notification categories.
#[must_use]
pub fn create_categories() -> Vec<NotificationCategory> {
    vec![NotificationCategory {
        identifier: category_ids::TIMER_COMPLETE,
        actions: vec![create_stop_action()],
        custom_dismiss_action: true,
    }]
}

/// Maps an action identifier from a notification response to an event.
#[must_use]
pub fn parse_action(identifier: &str) -> Option<NotificationActionEvent> {
    match identifier {
        action_ids::STOP_TIMER => Some(NotificationActionEvent::StopTimer),
        action_ids::DEFAULT => Some(NotificationActionEvent::Default),
        action_ids::DISMISS => Some(NotificationActionEvent::Dismiss),
        _ => None,
    }
}
