//! Notification content construction.
//!
//! This module provides a builder for creating notification content
//! with a fluent API.

use super::actions::category_ids;

/// Title of the completion notification.
pub const COMPLETION_TITLE: &str = "🎉 タイムアップ！ 🎉";

/// Body of the completion notification.
pub const COMPLETION_BODY: &str = "タイマーが終了しました！";

/// What a notification shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationContent {
    pub title: String,
    pub subtitle: Option<String>,
    pub body: String,
    pub category_identifier: Option<String>,
    /// Whether the default notification sound plays.
    pub sound: bool,
}

/// Builder for constructing notification content.
#[derive(Debug, Default)]
pub struct NotificationContentBuilder {
    content: NotificationContent,
}

impl NotificationContentBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        self.content.title = sanitize(title);
        self
    }

    #[must_use]
    pub fn subtitle(mut self, subtitle: &str) -> Self {
        self.content.subtitle = Some(sanitize(subtitle)).filter(|s| !s.is_empty());
        self
    }

    #[must_use]
    pub fn body(mut self, body: &str) -> Self {
        self.content.body = sanitize(body);
        self
    }

    /// Sets the category identifier for action buttons.
    #[must_use]
    pub fn category_identifier(mut self, category_id: &str) -> Self {
        self.content.category_identifier = Some(category_id.to_string());
        self
    }

    #[must_use]
    pub fn default_sound(mut self) -> Self {
        self.content.sound = true;
        self
    }

    #[must_use]
    pub fn build(self) -> NotificationContent {
        self.content
    }
}

/// Strips control characters so content renders on a single terminal line.
fn sanitize(text: &str) -> String {
    text.chars().filter(|c| !c.is_control()).collect()
}

/// Creates the content for the timer completion notification.
#[must_use]
pub fn create_completion_content() -> NotificationContent {
    NotificationContentBuilder::new()
        .title(COMPLETION_TITLE)
        .body(COMPLETION_BODY)
        .category_identifier(category_ids::TIMER_COMPLETE)
        .default_sound()
        .build()
}
