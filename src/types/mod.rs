//! Core data types for TinyTimer.
//!
//! This module defines the data structures used for:
//! - Countdown state
//! - Music and animation themes
//! - Timer configuration with validation
//! - Read-only snapshots for the presentation layer

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Shortest duration a run may be started with, in seconds.
pub const MIN_DURATION_SECONDS: u32 = 10;

/// Largest selectable minute value.
pub const MAX_MINUTES: u32 = 60;

/// Largest selectable second value.
pub const MAX_SECONDS: u32 = 59;

// ============================================================================
// TimerState
// ============================================================================

/// Represents the current state of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    /// Configured but not started
    #[default]
    Idle,
    /// Counting down
    Running,
    /// Countdown frozen by the user
    Paused,
    /// Countdown reached zero
    Finished,
}

impl TimerState {
    /// Returns the string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerState::Idle => "idle",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
            TimerState::Finished => "finished",
        }
    }

    /// Returns true if a run is in progress (running or paused).
    pub fn is_active(&self) -> bool {
        matches!(self, TimerState::Running | TimerState::Paused)
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// MusicOption
// ============================================================================

/// Completion music track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MusicOption {
    #[default]
    StormDance,
    ChillHappy,
    WeMadeIt,
}

impl MusicOption {
    pub const ALL: [MusicOption; 3] = [
        MusicOption::StormDance,
        MusicOption::ChillHappy,
        MusicOption::WeMadeIt,
    ];

    /// Identifier, also used as the track file stem.
    pub fn id(&self) -> &'static str {
        match self {
            MusicOption::StormDance => "storm-dance",
            MusicOption::ChillHappy => "chill-happy",
            MusicOption::WeMadeIt => "we-made-it",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MusicOption::StormDance => "Storm Dance",
            MusicOption::ChillHappy => "Upbeat Jovial",
            MusicOption::WeMadeIt => "We Made It",
        }
    }
}

impl fmt::Display for MusicOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for MusicOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "不明な音楽です: {} (storm-dance, chill-happy, we-made-it から選択してください)",
                    s
                )
            })
    }
}

// ============================================================================
// AnimationOption
// ============================================================================

/// Character shown with the countdown and on the completion screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationOption {
    Alpaca,
    #[default]
    Dino,
    Pig,
}

impl AnimationOption {
    pub const ALL: [AnimationOption; 3] = [
        AnimationOption::Alpaca,
        AnimationOption::Dino,
        AnimationOption::Pig,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            AnimationOption::Alpaca => "alpaca",
            AnimationOption::Dino => "dino",
            AnimationOption::Pig => "pig",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AnimationOption::Alpaca => "Alpaca",
            AnimationOption::Dino => "Dinosaur",
            AnimationOption::Pig => "Pig",
        }
    }

    /// Emoji used to draw the character in the terminal.
    pub fn emoji(&self) -> &'static str {
        match self {
            AnimationOption::Alpaca => "🦙",
            AnimationOption::Dino => "🦕",
            AnimationOption::Pig => "🐷",
        }
    }

    /// Next character, wrapping around.
    pub fn next(&self) -> Self {
        let index = self.index();
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// Previous character, wrapping around.
    pub fn previous(&self) -> Self {
        let index = self.index();
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn index(&self) -> usize {
        match self {
            AnimationOption::Alpaca => 0,
            AnimationOption::Dino => 1,
            AnimationOption::Pig => 2,
        }
    }
}

impl fmt::Display for AnimationOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for AnimationOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "不明なアニメーションです: {} (alpaca, dino, pig から選択してください)",
                    s
                )
            })
    }
}

// ============================================================================
// TimerConfig
// ============================================================================

/// Duration and theme picked by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Minutes (0-60)
    pub minutes: u32,
    /// Seconds (0-59)
    pub seconds: u32,
    /// Completion music
    #[serde(default)]
    pub music: MusicOption,
    /// Character animation
    #[serde(default)]
    pub animation: AnimationOption,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            minutes: 1,
            seconds: 0,
            music: MusicOption::default(),
            animation: AnimationOption::default(),
        }
    }
}

impl TimerConfig {
    /// Creates a configuration for the given duration with the default theme.
    pub fn new(minutes: u32, seconds: u32) -> Self {
        Self {
            minutes,
            seconds,
            ..Self::default()
        }
    }

    pub fn with_music(mut self, music: MusicOption) -> Self {
        self.music = music;
        self
    }

    pub fn with_animation(mut self, animation: AnimationOption) -> Self {
        self.animation = animation;
        self
    }

    /// Total duration in seconds.
    pub fn total_seconds(&self) -> u32 {
        self.minutes * 60 + self.seconds
    }

    /// Returns true if nothing has been picked yet.
    pub fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.minutes > MAX_MINUTES {
            return Err(format!("分は0-{}の範囲で指定してください", MAX_MINUTES));
        }
        if self.seconds > MAX_SECONDS {
            return Err(format!("秒は0-{}の範囲で指定してください", MAX_SECONDS));
        }
        if self.total_seconds() < MIN_DURATION_SECONDS {
            return Err(format!(
                "タイマーは{}秒以上に設定してください",
                MIN_DURATION_SECONDS
            ));
        }
        Ok(())
    }
}

// ============================================================================
// CountdownSnapshot
// ============================================================================

/// Read-only view of the countdown for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownSnapshot {
    pub state: TimerState,
    pub remaining_seconds: u32,
    pub total_duration_seconds: u32,
    pub smooth_progress: f64,
    pub display_time: String,
    pub music: MusicOption,
    pub animation: AnimationOption,
    pub is_playing_completion_music: bool,
    pub is_showing_confetti: bool,
}

/// Formats seconds as `M:SS`.
pub fn format_time(total_seconds: u32) -> String {
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

// ============================================================================
// Tests
// ============================================================================
