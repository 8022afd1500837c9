//! Live status error types.

use thiserror::Error;

/// Errors raised by a live status display.
///
/// None of these affect the countdown; the engine logs them and moves on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LiveStatusError {
    /// The display is not supported in this environment.
    #[error("ライブステータスは利用できません: {0}")]
    Unavailable(String),

    /// The renderer side of the channel went away.
    #[error("ライブステータスの表示先が切断されました")]
    Disconnected,

    /// An update was published before `start`.
    #[error("ライブステータスが開始されていません")]
    NotStarted,
}

impl LiveStatusError {
    /// Returns true if the renderer is gone and further updates are pointless.
    #[must_use]
    pub fn is_disconnected(&self) -> bool {
        matches!(self, Self::Disconnected)
    }

    #[must_use]
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Unavailable(_) => Some("--no-live を指定するとライブステータスを無効にできます"),
            Self::Disconnected | Self::NotStarted => None,
        }
    }
}
