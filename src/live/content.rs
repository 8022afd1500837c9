//! Glanceable status content.
//!
//! Builds the short text shown by the live status line (e.g. "🦕 1:30").
//! The rendering logic is platform-independent and fully testable.

use serde::Serialize;

use crate::types::{format_time, AnimationOption};

// ============================================================================
// Constants
// ============================================================================

/// Emoji shown once the countdown is over.
const FINISHED_EMOJI: &str = "🎉";

/// Text shown next to [`FINISHED_EMOJI`].
const FINISHED_LABEL: &str = "完了！";

// ============================================================================
// LiveStatusContent
// ============================================================================

/// What the live status currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStatusContent {
    pub character: AnimationOption,
    pub total_seconds: u32,
    pub remaining_seconds: u32,
    pub is_finished: bool,
}

impl LiveStatusContent {
    /// Content for a countdown that has just started.
    #[must_use]
    pub fn new(character: AnimationOption, total_seconds: u32) -> Self {
        Self {
            character,
            total_seconds,
            remaining_seconds: total_seconds,
            is_finished: false,
        }
    }

    /// Returns a copy showing `remaining_seconds`.
    #[must_use]
    pub fn with_remaining(self, remaining_seconds: u32, is_finished: bool) -> Self {
        Self {
            remaining_seconds: remaining_seconds.min(self.total_seconds),
            is_finished,
            ..self
        }
    }

    /// Returns a copy in the completed state.
    #[must_use]
    pub fn finished(self) -> Self {
        self.with_remaining(0, true)
    }

    /// Generates the one-line title.
    ///
    /// Format:
    /// - Counting down: "🦕 1:30"
    /// - Finished: "🎉 完了！"
    #[must_use]
    pub fn title(&self) -> String {
        if self.is_finished {
            format!("{} {}", FINISHED_EMOJI, FINISHED_LABEL)
        } else {
            format!(
                "{} {}",
                self.character.emoji(),
                format_time(self.remaining_seconds)
            )
        }
    }

    /// Fraction of the countdown that has elapsed, in whole seconds.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.is_finished {
            return 1.0;
        }
        if self.total_seconds == 0 {
            return 0.0;
        }
        f64::from(self.total_seconds - self.remaining_seconds) / f64::from(self.total_seconds)
    }
}

impl std::fmt::Display for LiveStatusContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title())
    }
}

// ============================================================================
// Tests
// ============================================================================
