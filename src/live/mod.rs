//! Live status display.
//!
//! A glanceable, always-visible summary of the running countdown (character
//! and remaining time). Where no such surface exists the engine uses
//! [`NoopLiveStatus`]; the terminal front end uses [`ChannelLiveStatus`] and
//! renders the updates it receives.

mod content;
pub mod error;

use std::sync::Mutex;

use crossbeam_channel::{Receiver, Sender};
use tracing::debug;

pub use self::content::LiveStatusContent;
pub use self::error::LiveStatusError;

use crate::types::AnimationOption;

// ============================================================================
// LiveStatusDisplay
// ============================================================================

/// Live status commands issued by the countdown engine.
pub trait LiveStatusDisplay {
    /// Begins showing a countdown of `total_seconds` with `character`.
    fn start(&self, total_seconds: u32, character: AnimationOption) -> Result<(), LiveStatusError>;

    /// Updates the remaining time.
    fn publish(&self, remaining_seconds: u32, is_finished: bool) -> Result<(), LiveStatusError>;

    /// Ends the session, leaving the completion content visible.
    fn end(&self);

    /// Removes everything from the display.
    fn clear(&self);
}

/// Display used when no live status surface is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLiveStatus;

impl LiveStatusDisplay for NoopLiveStatus {
    fn start(&self, _total_seconds: u32, _character: AnimationOption) -> Result<(), LiveStatusError> {
        Ok(())
    }

    fn publish(&self, _remaining_seconds: u32, _is_finished: bool) -> Result<(), LiveStatusError> {
        Ok(())
    }

    fn end(&self) {}

    fn clear(&self) {}
}

// ============================================================================
// ChannelLiveStatus
// ============================================================================

/// Updates sent from [`ChannelLiveStatus`] to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveUpdate {
    /// A new session began.
    Started(LiveStatusContent),
    /// The remaining time changed.
    Updated(LiveStatusContent),
    /// The session ended; the content stays visible.
    Ended(LiveStatusContent),
    /// The display should be emptied.
    Cleared,
}

impl LiveUpdate {
    /// Content to render, if any.
    #[must_use]
    pub fn content(&self) -> Option<&LiveStatusContent> {
        match self {
            Self::Started(content) | Self::Updated(content) | Self::Ended(content) => Some(content),
            Self::Cleared => None,
        }
    }
}

/// Live status that forwards updates over a crossbeam channel.
#[derive(Debug)]
pub struct ChannelLiveStatus {
    tx: Sender<LiveUpdate>,
    current: Mutex<Option<LiveStatusContent>>,
}

impl ChannelLiveStatus {
    /// Creates the display and the receiver the renderer drains.
    #[must_use]
    pub fn new() -> (Self, Receiver<LiveUpdate>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (
            Self {
                tx,
                current: Mutex::new(None),
            },
            rx,
        )
    }

    /// Content most recently sent, if a session is active or ended.
    #[must_use]
    pub fn current(&self) -> Option<LiveStatusContent> {
        *self.lock()
    }

    fn send(&self, update: LiveUpdate) -> Result<(), LiveStatusError> {
        self.tx
            .send(update)
            .map_err(|_| LiveStatusError::Disconnected)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<LiveStatusContent>> {
        self.current
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl LiveStatusDisplay for ChannelLiveStatus {
    fn start(&self, total_seconds: u32, character: AnimationOption) -> Result<(), LiveStatusError> {
        let content = LiveStatusContent::new(character, total_seconds);
        *self.lock() = Some(content);
        self.send(LiveUpdate::Started(content))
    }

    fn publish(&self, remaining_seconds: u32, is_finished: bool) -> Result<(), LiveStatusError> {
        let content = {
            let mut current = self.lock();
            let content = current
                .ok_or(LiveStatusError::NotStarted)?
                .with_remaining(remaining_seconds, is_finished);
            *current = Some(content);
            content
        };
        self.send(LiveUpdate::Updated(content))
    }

    fn end(&self) {
        let content = {
            let mut current = self.lock();
            let Some(content) = current.map(LiveStatusContent::finished) else {
                return;
            };
            *current = Some(content);
            content
        };
        if self.send(LiveUpdate::Ended(content)).is_err() {
            debug!("Live status renderer disconnected");
        }
    }

    fn clear(&self) {
        *self.lock() = None;
        if self.send(LiveUpdate::Cleared).is_err() {
            debug!("Live status renderer disconnected");
        }
    }
}

// ============================================================================
// MockLiveStatus
// ============================================================================

/// A call recorded by [`MockLiveStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveCall {
    Start(u32, AnimationOption),
    Publish(u32, bool),
    End,
    Clear,
}

#[derive(Debug, Default)]
pub struct MockLiveStatus {
    calls: std::sync::Mutex<Vec<LiveCall>>,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockLiveStatus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<LiveCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Remaining seconds of every `publish` call, in order.
    #[must_use]
    pub fn published(&self) -> Vec<u32> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                LiveCall::Publish(remaining, _) => Some(*remaining),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn last_call(&self) -> Option<LiveCall> {
        self.calls.lock().unwrap().last().copied()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: LiveCall) -> Result<(), LiveStatusError> {
        self.calls.lock().unwrap().push(call);
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(LiveStatusError::Unavailable("Mock failure".to_string()));
        }
        Ok(())
    }
}

impl LiveStatusDisplay for MockLiveStatus {
    fn start(&self, total_seconds: u32, character: AnimationOption) -> Result<(), LiveStatusError> {
        self.record(LiveCall::Start(total_seconds, character))
    }

    fn publish(&self, remaining_seconds: u32, is_finished: bool) -> Result<(), LiveStatusError> {
        self.record(LiveCall::Publish(remaining_seconds, is_finished))
    }

    fn end(&self) {
        let _ = self.record(LiveCall::End);
    }

    fn clear(&self) {
        let _ = self.record(LiveCall::Clear);
    }
}

// ============================================================================
// Tests
// ============================================================================
