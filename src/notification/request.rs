//! Notification request creation.

use std::time::Duration;

use uuid::Uuid;

use super::content::{create_completion_content, NotificationContent};

/// Prefix shared by every timer completion request identifier.
pub const REQUEST_ID_PREFIX: &str = "timer-complete";

/// A notification scheduled to fire after a delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub identifier: String,
    pub content: NotificationContent,
    pub fire_after: Duration,
}

#[must_use]
pub fn create_completion_request(fire_after: Duration) -> NotificationRequest {
    NotificationRequest {
        identifier: format!("{}-{}", REQUEST_ID_PREFIX, Uuid::new_v4()),
        content: create_completion_content(),
        fire_after,
    }
}

/// Returns true if `identifier` belongs to a timer completion request.
#[must_use]
pub fn is_timer_request(identifier: &str) -> bool {
    identifier.starts_with(REQUEST_ID_PREFIX)
}
