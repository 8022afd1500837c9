//! Audio playback for TinyTimer.
//!
//! This module provides the audio collaborator of the countdown engine:
//!
//! - A ticking loop while the countdown runs
//! - A looping completion track for the selected music theme
//! - Built-in synthesized fallbacks when track files are missing
//! - Graceful degradation when no audio device exists
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   AudioPlayer    │ ← Trait used by the engine
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │   SoundLibrary   │────▶│  Sounds dir      │
//! │                  │     │  (<id>.mp3 ...)  │
//! │                  │     ├──────────────────┤
//! │                  │────▶│ Built-in synth   │
//! └──────────────────┘     │  (fallback)      │
//!                          └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use tinytimer::sound::{RodioAudioPlayer, SoundLibrary};
//! use tinytimer::types::MusicOption;
//!
//! let player = RodioAudioPlayer::new(SoundLibrary::new("sounds"), false).expect("audio init");
//! player.start_ticking().expect("ticking");
//! player.play_completion_track(MusicOption::WeMadeIt).expect("music");
//! ```

mod embedded;
mod error;
mod player;
mod source;

pub use embedded::{fanfare, fanfare_length, ticking_period, BuiltinSource, TICK_PERIOD};
pub use error::SoundError;
pub use player::{try_create_player, RodioAudioPlayer, MUSIC_VOLUME, TICKING_VOLUME};
pub use source::{SoundLibrary, TrackSource, TICKING_TRACK};

use crate::types::MusicOption;

/// Audio commands issued by the countdown engine.
///
/// Commands are fire-and-forget: the engine logs an `Err` and carries on as
/// if the sound had played.
pub trait AudioPlayer {
    /// Starts the ticking loop.
    fn start_ticking(&self) -> Result<(), SoundError>;

    /// Stops the ticking loop.
    fn stop_ticking(&self);

    /// Starts the looping completion track for `music`.
    fn play_completion_track(&self, music: MusicOption) -> Result<(), SoundError>;

    /// Stops the completion track.
    fn stop_music(&self);

    /// Stops everything.
    fn stop_all_audio(&self) {
        self.stop_music();
        self.stop_ticking();
    }

    /// Returns true if the audio system is available.
    fn is_available(&self) -> bool;
}

impl AudioPlayer for RodioAudioPlayer {
    fn start_ticking(&self) -> Result<(), SoundError> {
        RodioAudioPlayer::start_ticking(self)
    }

    fn stop_ticking(&self) {
        RodioAudioPlayer::stop_ticking(self)
    }

    fn play_completion_track(&self, music: MusicOption) -> Result<(), SoundError> {
        RodioAudioPlayer::play_completion_track(self, music)
    }

    fn stop_music(&self) {
        RodioAudioPlayer::stop_music(self)
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Player used when no audio device is present.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudioPlayer;

impl AudioPlayer for SilentAudioPlayer {
    fn start_ticking(&self) -> Result<(), SoundError> {
        Ok(())
    }

    fn stop_ticking(&self) {}

    fn play_completion_track(&self, _music: MusicOption) -> Result<(), SoundError> {
        Ok(())
    }

    fn stop_music(&self) {}

    fn is_available(&self) -> bool {
        false
    }
}

/// A call recorded by [`MockAudioPlayer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCall {
    StartTicking,
    StopTicking,
    PlayCompletion(MusicOption),
    StopMusic,
    StopAll,
}

/// Mock audio player for testing.
#[derive(Debug, Default)]
pub struct MockAudioPlayer {
    calls: std::sync::Mutex<Vec<AudioCall>>,
    ticking: std::sync::atomic::AtomicBool,
    music: std::sync::Mutex<Option<MusicOption>>,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockAudioPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<AudioCall> {
        self.calls.lock().unwrap().clone()
    }

    #[must_use]
    pub fn count(&self, call: AudioCall) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == call).count()
    }

    /// Returns true if the ticking loop is currently playing.
    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.ticking.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Returns the completion track currently playing, if any.
    #[must_use]
    pub fn playing_track(&self) -> Option<MusicOption> {
        *self.music.lock().unwrap()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: AudioCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn fail_if_requested(&self) -> Result<(), SoundError> {
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(SoundError::Sink(rodio::PlayError::NoDevice));
        }
        Ok(())
    }
}

impl AudioPlayer for MockAudioPlayer {
    fn start_ticking(&self) -> Result<(), SoundError> {
        self.record(AudioCall::StartTicking);
        self.fail_if_requested()?;
        self.ticking
            .store(true, std::sync::atomic::Ordering::SeqCst);
        Ok(())
    }

    fn stop_ticking(&self) {
        self.record(AudioCall::StopTicking);
        self.ticking
            .store(false, std::sync::atomic::Ordering::SeqCst);
    }

    fn play_completion_track(&self, music: MusicOption) -> Result<(), SoundError> {
        self.record(AudioCall::PlayCompletion(music));
        self.fail_if_requested()?;
        self.ticking
            .store(false, std::sync::atomic::Ordering::SeqCst);
        *self.music.lock().unwrap() = Some(music);
        Ok(())
    }

    fn stop_music(&self) {
        self.record(AudioCall::StopMusic);
        *self.music.lock().unwrap() = None;
    }

    fn stop_all_audio(&self) {
        self.record(AudioCall::StopAll);
        self.ticking
            .store(false, std::sync::atomic::Ordering::SeqCst);
        *self.music.lock().unwrap() = None;
    }

    fn is_available(&self) -> bool {
        true
    }
}
