//! TinyTimer Library
//!
//! This library provides the core functionality for the TinyTimer CLI.
//! It includes:
//! - Countdown engine with pause/resume and background catch-up
//! - Completion music and ticking sound playback
//! - Scheduled completion notifications with a stop action
//! - Live status display for a glanceable countdown
//! - CLI command parsing, display utilities and the interactive session
//! - Type definitions for configuration and snapshots

pub mod cli;
pub mod engine;
pub mod live;
pub mod notification;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    format_time, AnimationOption, CountdownSnapshot, MusicOption, TimerConfig, TimerState,
};

// Re-export engine types
pub use engine::{
    Clock, Collaborators, CountdownEngine, MockClock, RefreshHandle, RefreshTimer, SystemClock,
    TimerEvent,
};

// Re-export sound types
pub use sound::{
    try_create_player, AudioPlayer, MockAudioPlayer, RodioAudioPlayer, SilentAudioPlayer,
    SoundError, SoundLibrary,
};

// Re-export notification types
pub use notification::{
    CompletionNotifier, MockNotifier, NotificationActionEvent, NotificationError, NotifierConfig,
    ScheduledNotifier,
};

// Re-export live status types
pub use live::{
    ChannelLiveStatus, LiveStatusContent, LiveStatusDisplay, LiveStatusError, LiveUpdate,
    MockLiveStatus, NoopLiveStatus,
};
