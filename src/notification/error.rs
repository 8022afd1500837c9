//! Notification system error types.

use thiserror::Error;

/// Errors that can occur in the completion notifier.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Failed to request notification authorization.
    #[error("通知許可の取得に失敗しました: {0}")]
    AuthorizationFailed(String),

    /// Notification permission was denied by the user.
    #[error("通知許可が拒否されています")]
    PermissionDenied,

    /// Failed to schedule a notification.
    #[error("通知のスケジュールに失敗しました: {0}")]
    ScheduleFailed(String),

    /// No async runtime to run scheduled notifications on.
    #[error("通知スケジューラが利用できません")]
    RuntimeUnavailable,

    /// Invalid input provided to the notification system.
    #[error("無効な入力: {0}")]
    InvalidInput(String),
}

impl NotificationError {
    /// Returns true if this error is related to permissions.
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::AuthorizationFailed(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::AuthorizationFailed(_) | Self::PermissionDenied => {
                "--no-notify を外して通知を許可してください"
            }
            Self::ScheduleFailed(_) => "タイマーをリセットしてください",
            Self::RuntimeUnavailable => "アプリケーションを再起動してください",
            Self::InvalidInput(_) => "入力値を確認してください",
        }
    }
}
