//! Countdown engine.
//!
//! This module provides the core countdown functionality:
//! - State transitions (Idle → Running ⇄ Paused → Finished)
//! - Remaining time derived from a start anchor, so missed refreshes lose nothing
//! - Background/foreground catch-up
//! - Side effects on audio, notification and live status collaborators
//!
//! The engine has no task of its own. The caller drives it with
//! [`CountdownEngine::tick_with`] from a [`super::RefreshTimer`] while
//! [`CountdownEngine::is_refreshing`] is true.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::clock::{Clock, SystemClock};
use crate::live::LiveStatusDisplay;
use crate::notification::CompletionNotifier;
use crate::sound::AudioPlayer;
use crate::types::{
    format_time, AnimationOption, CountdownSnapshot, MusicOption, TimerConfig, TimerState,
    MIN_DURATION_SECONDS,
};

// ============================================================================
// TimerEvent
// ============================================================================

/// Countdown events for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// A new duration was set
    Configured {
        /// Total duration in seconds
        total_seconds: u32,
    },
    /// Countdown started
    Started {
        /// Total duration in seconds
        total_seconds: u32,
    },
    /// The whole-second remaining time changed
    Tick {
        /// Remaining seconds
        remaining_seconds: u32,
    },
    /// Countdown paused
    Paused {
        /// Remaining seconds
        remaining_seconds: u32,
    },
    /// Countdown resumed
    Resumed {
        /// Remaining seconds
        remaining_seconds: u32,
    },
    /// Countdown stopped before completion
    Stopped,
    /// Countdown reached zero
    Finished,
    /// The app moved to the background
    Backgrounded,
    /// The app returned to the foreground
    Foregrounded {
        /// Remaining seconds after catch-up
        remaining_seconds: u32,
    },
}

// ============================================================================
// RefreshHandle
// ============================================================================

/// Identifies one refresh generation.
///
/// Every start/resume begins a new generation; pausing, stopping and
/// finishing end it. Ticks carrying an older handle are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RefreshHandle(u64);

impl RefreshHandle {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.0
    }
}

// ============================================================================
// Collaborators
// ============================================================================

/// Side-effect services used by the engine.
#[derive(Clone)]
pub struct Collaborators {
    pub audio: Arc<dyn AudioPlayer>,
    pub notifier: Arc<dyn CompletionNotifier>,
    pub live: Arc<dyn LiveStatusDisplay>,
}

impl Collaborators {
    #[must_use]
    pub fn new(
        audio: Arc<dyn AudioPlayer>,
        notifier: Arc<dyn CompletionNotifier>,
        live: Arc<dyn LiveStatusDisplay>,
    ) -> Self {
        Self {
            audio,
            notifier,
            live,
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("audio_available", &self.audio.is_available())
            .field("notifications_authorized", &self.notifier.is_authorized())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// CountdownEngine
// ============================================================================

/// Countdown state machine.
///
/// Invalid calls (e.g. `pause` while idle) are silent no-ops logged at
/// `debug`.
pub struct CountdownEngine<C: Clock = SystemClock> {
    clock: C,
    services: Collaborators,
    event_tx: mpsc::UnboundedSender<TimerEvent>,

    state: TimerState,
    music: MusicOption,
    animation: AnimationOption,
    total_duration: u32,
    remaining: u32,
    smooth_progress: f64,

    /// Start of the current running segment.
    anchor: Option<Instant>,
    /// Countdown time already consumed when the segment started.
    anchor_offset: Duration,
    background_time: Option<Instant>,

    is_playing_completion_music: bool,
    is_showing_confetti: bool,

    refresh: Option<RefreshHandle>,
    next_generation: u64,
}

impl CountdownEngine<SystemClock> {
    /// Creates an idle engine on the system clock.
    pub fn new(services: Collaborators, event_tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self::with_clock(SystemClock, services, event_tx)
    }
}

impl<C: Clock> CountdownEngine<C> {
    /// Creates an idle engine reading time from `clock`.
    pub fn with_clock(
        clock: C,
        services: Collaborators,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        Self {
            clock,
            services,
            event_tx,
            state: TimerState::Idle,
            music: MusicOption::default(),
            animation: AnimationOption::default(),
            total_duration: 0,
            remaining: 0,
            smooth_progress: 0.0,
            anchor: None,
            anchor_offset: Duration::ZERO,
            background_time: None,
            is_playing_completion_music: false,
            is_showing_confetti: false,
            refresh: None,
            next_generation: 0,
        }
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Sets the duration and theme.
    ///
    /// Ignored while running. From any other state the engine returns to
    /// idle with the new duration armed.
    pub fn configure(&mut self, duration_seconds: u32, music: MusicOption, animation: AnimationOption) {
        if self.state == TimerState::Running {
            debug!("configure ignored while running");
            return;
        }

        self.total_duration = duration_seconds;
        self.remaining = duration_seconds;
        self.smooth_progress = 0.0;
        self.music = music;
        self.animation = animation;
        self.state = TimerState::Idle;
        self.anchor = None;
        self.anchor_offset = Duration::ZERO;
        self.background_time = None;
        self.is_playing_completion_music = false;
        self.is_showing_confetti = false;

        debug!("Configured countdown: {}", format_time(duration_seconds));
        self.emit(TimerEvent::Configured {
            total_seconds: duration_seconds,
        });
    }

    /// Applies a [`TimerConfig`] through [`Self::configure`].
    pub fn apply(&mut self, config: &TimerConfig) {
        self.configure(config.total_seconds(), config.music, config.animation);
    }

    /// Starts the countdown.
    ///
    /// Requires an idle engine with at least 10 seconds armed.
    pub fn start(&mut self) {
        if self.state != TimerState::Idle {
            debug!("start ignored in state {}", self.state);
            return;
        }
        if self.remaining < MIN_DURATION_SECONDS {
            debug!(
                "start ignored: {} seconds is below the {} second minimum",
                self.remaining, MIN_DURATION_SECONDS
            );
            return;
        }

        self.state = TimerState::Running;
        self.anchor = Some(self.clock.now());
        self.anchor_offset = Duration::from_secs(u64::from(self.total_duration - self.remaining));
        self.background_time = None;
        self.begin_refresh();

        if let Err(e) = self.services.audio.start_ticking() {
            warn!("Failed to start ticking sound: {}", e);
        }
        if let Err(e) = self
            .services
            .live
            .start(self.total_duration, self.animation)
        {
            warn!("Failed to start live status: {}", e);
        }
        self.schedule_notification();

        info!("Countdown started: {}", format_time(self.remaining));
        self.emit(TimerEvent::Started {
            total_seconds: self.total_duration,
        });
    }

    /// Pauses a running countdown.
    ///
    /// If the countdown has already run out it finishes instead. Time spent
    /// in the background so far is counted here, since the anchor kept
    /// running.
    pub fn pause(&mut self) {
        if self.state != TimerState::Running {
            debug!("pause ignored in state {}", self.state);
            return;
        }

        self.sync_remaining();
        self.background_time = None;
        if self.remaining == 0 {
            self.on_finished();
            return;
        }

        self.state = TimerState::Paused;
        self.anchor = None;
        self.refresh = None;
        self.services.audio.stop_ticking();
        self.services.notifier.cancel_scheduled();

        debug!("Countdown paused at {}", format_time(self.remaining));
        self.emit(TimerEvent::Paused {
            remaining_seconds: self.remaining,
        });
    }

    /// Resumes a paused countdown from the remaining whole seconds.
    pub fn resume(&mut self) {
        if self.state != TimerState::Paused {
            debug!("resume ignored in state {}", self.state);
            return;
        }

        self.reanchor();
        self.state = TimerState::Running;
        self.background_time = None;
        self.begin_refresh();

        if let Err(e) = self.services.audio.start_ticking() {
            warn!("Failed to start ticking sound: {}", e);
        }
        self.schedule_notification();

        debug!("Countdown resumed at {}", format_time(self.remaining));
        self.emit(TimerEvent::Resumed {
            remaining_seconds: self.remaining,
        });
    }

    /// Stops a running or paused countdown and re-arms the configured duration.
    ///
    /// A scheduled completion notification is left in place; use
    /// [`Self::force_stop`] to cancel it as well.
    pub fn stop(&mut self) {
        if !self.state.is_active() {
            debug!("stop ignored in state {}", self.state);
            return;
        }

        self.halt();
        self.state = TimerState::Idle;
        self.remaining = self.total_duration;
        self.smooth_progress = 0.0;
        self.anchor = None;
        self.anchor_offset = Duration::ZERO;
        self.background_time = None;

        debug!("Countdown stopped");
        self.emit(TimerEvent::Stopped);
    }

    /// Stops the countdown and cancels the completion notification.
    pub fn force_stop(&mut self) {
        if !self.state.is_active() {
            debug!("force_stop ignored in state {}", self.state);
            return;
        }
        self.stop();
        self.services.notifier.cancel_scheduled();
    }

    /// Silences everything and arms a new duration, from any state.
    pub fn reset(&mut self, duration_seconds: u32, music: MusicOption, animation: AnimationOption) {
        self.force_stop();
        self.services.audio.stop_all_audio();
        self.services.live.clear();
        self.configure(duration_seconds, music, animation);
    }

    /// Recomputes remaining time and progress from the clock.
    ///
    /// Does nothing while backgrounded; [`Self::enter_foreground`] catches up.
    pub fn tick(&mut self) {
        if self.state != TimerState::Running || self.background_time.is_some() {
            return;
        }

        let previous = self.remaining;
        self.sync_remaining();

        if self.remaining != previous {
            if let Err(e) = self.services.live.publish(self.remaining, false) {
                debug!("Failed to update live status: {}", e);
            }
            self.emit(TimerEvent::Tick {
                remaining_seconds: self.remaining,
            });
        }

        if self.remaining == 0 {
            self.on_finished();
        }
    }

    /// Like [`Self::tick`], but ignored unless `handle` is the current
    /// refresh generation.
    pub fn tick_with(&mut self, handle: RefreshHandle) {
        if self.refresh != Some(handle) {
            debug!("Ignoring stale refresh generation {}", handle.generation());
            return;
        }
        self.tick();
    }

    /// Records that the app moved to the background.
    ///
    /// Refresh and ticking stop until [`Self::enter_foreground`]. Repeated
    /// calls keep the earliest timestamp.
    pub fn enter_background(&mut self) {
        if self.background_time.is_none() {
            self.background_time = Some(self.clock.now());
        }
        if self.state == TimerState::Running {
            self.refresh = None;
            self.services.audio.stop_ticking();
        }
        debug!("Entered background");
        self.emit(TimerEvent::Backgrounded);
    }

    /// Catches the countdown up with the time spent in the background.
    pub fn enter_foreground(&mut self) {
        let background_time = self.background_time.take();

        if let (TimerState::Running, Some(since)) = (self.state, background_time) {
            let away = self.clock.now().saturating_duration_since(since).as_secs();
            self.remaining = self.remaining.saturating_sub(secs_u32(away));
            debug!("Back from background after {}s", away);

            if self.remaining == 0 {
                self.on_finished();
            } else {
                self.reanchor();
                self.smooth_progress = self.progress();
                self.begin_refresh();
                if let Err(e) = self.services.audio.start_ticking() {
                    warn!("Failed to start ticking sound: {}", e);
                }
                if let Err(e) = self.services.live.publish(self.remaining, false) {
                    debug!("Failed to update live status: {}", e);
                }
            }
        }

        self.emit(TimerEvent::Foregrounded {
            remaining_seconds: self.remaining,
        });
    }

    /// Plays the completion track for `music`.
    pub fn start_completion_music(&mut self, music: MusicOption) {
        if let Err(e) = self.services.audio.play_completion_track(music) {
            warn!("Failed to play completion music: {}", e);
        }
        self.is_playing_completion_music = true;
    }

    pub fn stop_completion_music(&mut self) {
        self.services.audio.stop_music();
        self.is_playing_completion_music = false;
    }

    pub fn stop_confetti(&mut self) {
        self.is_showing_confetti = false;
    }

    /// Stops both the completion music and the confetti.
    pub fn dismiss_celebration(&mut self) {
        self.stop_completion_music();
        self.stop_confetti();
    }

    // ------------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------------

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining
    }

    pub fn total_duration_seconds(&self) -> u32 {
        self.total_duration
    }

    /// Continuous progress in [0, 1], updated on every tick.
    pub fn smooth_progress(&self) -> f64 {
        self.smooth_progress
    }

    /// Progress in whole seconds.
    pub fn progress(&self) -> f64 {
        if self.total_duration == 0 {
            return 0.0;
        }
        f64::from(self.total_duration - self.remaining) / f64::from(self.total_duration)
    }

    /// Remaining time as `M:SS`.
    pub fn display_time(&self) -> String {
        format_time(self.remaining)
    }

    pub fn music(&self) -> MusicOption {
        self.music
    }

    pub fn animation(&self) -> AnimationOption {
        self.animation
    }

    pub fn is_playing_completion_music(&self) -> bool {
        self.is_playing_completion_music
    }

    pub fn is_showing_confetti(&self) -> bool {
        self.is_showing_confetti
    }

    pub fn is_backgrounded(&self) -> bool {
        self.background_time.is_some()
    }

    /// Current refresh generation, if refreshing.
    pub fn refresh_handle(&self) -> Option<RefreshHandle> {
        self.refresh
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh.is_some()
    }

    pub fn snapshot(&self) -> CountdownSnapshot {
        CountdownSnapshot {
            state: self.state,
            remaining_seconds: self.remaining,
            total_duration_seconds: self.total_duration,
            smooth_progress: self.smooth_progress,
            display_time: self.display_time(),
            music: self.music,
            animation: self.animation,
            is_playing_completion_music: self.is_playing_completion_music,
            is_showing_confetti: self.is_showing_confetti,
        }
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    /// Handles the countdown reaching zero. Runs once per run.
    fn on_finished(&mut self) {
        if self.state == TimerState::Finished {
            return;
        }

        self.halt();
        self.remaining = 0;
        self.smooth_progress = 1.0;
        self.state = TimerState::Finished;
        self.anchor = None;
        self.background_time = None;

        if let Err(e) = self.services.live.publish(0, true) {
            debug!("Failed to update live status: {}", e);
        }
        if let Err(e) = self.services.audio.play_completion_track(self.music) {
            warn!("Failed to play completion music: {}", e);
        }
        self.is_playing_completion_music = true;
        self.is_showing_confetti = true;

        info!("Countdown finished");
        self.emit(TimerEvent::Finished);
    }

    /// Ends refresh and ticking and closes the live status session.
    fn halt(&mut self) {
        self.refresh = None;
        self.services.audio.stop_ticking();
        self.services.live.end();
    }

    fn begin_refresh(&mut self) {
        self.next_generation += 1;
        self.refresh = Some(RefreshHandle(self.next_generation));
    }

    /// Starts a new running segment from the current whole-second remaining time.
    fn reanchor(&mut self) {
        self.anchor = Some(self.clock.now());
        self.anchor_offset =
            Duration::from_secs(u64::from(self.total_duration.saturating_sub(self.remaining)));
    }

    fn elapsed(&self) -> Duration {
        match self.anchor {
            Some(anchor) => self.anchor_offset + self.clock.now().saturating_duration_since(anchor),
            None => self.anchor_offset,
        }
    }

    fn sync_remaining(&mut self) {
        let elapsed = self.elapsed();
        self.remaining = self
            .total_duration
            .saturating_sub(secs_u32(elapsed.as_secs()));
        if self.total_duration > 0 {
            self.smooth_progress =
                (elapsed.as_secs_f64() / f64::from(self.total_duration)).min(1.0);
        }
    }

    fn schedule_notification(&self) {
        let after = Duration::from_secs(u64::from(self.remaining));
        match self.services.notifier.schedule_completion(after) {
            Ok(()) => {}
            Err(e) if e.is_permission_error() => debug!("Notification not scheduled: {}", e),
            Err(e) => warn!("Failed to schedule notification: {}", e),
        }
    }

    fn emit(&self, event: TimerEvent) {
        // The receiver may be gone; the engine keeps working without it.
        let _ = self.event_tx.send(event);
    }
}

fn secs_u32(secs: u64) -> u32 {
    u32::try_from(secs).unwrap_or(u32::MAX)
}

impl<C: Clock> std::fmt::Debug for CountdownEngine<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountdownEngine")
            .field("state", &self.state)
            .field("remaining", &self.remaining)
            .field("total_duration", &self.total_duration)
            .field("refresh", &self.refresh)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::clock::MockClock;
    use crate::live::{LiveCall, MockLiveStatus};
    use crate::notification::{MockNotifier, NotifierCall};
    use crate::sound::{AudioCall, MockAudioPlayer};

    struct Harness {
        engine: CountdownEngine<MockClock>,
        clock: MockClock,
        audio: Arc<MockAudioPlayer>,
        notifier: Arc<MockNotifier>,
        live: Arc<MockLiveStatus>,
        rx: mpsc::UnboundedReceiver<TimerEvent>,
    }

    impl Harness {
        fn drain(&mut self) -> Vec<TimerEvent> {
            let mut events = Vec::new();
            while let Ok(event) = self.rx.try_recv() {
                events.push(event);
            }
            events
        }
    }

    fn create_engine() -> Harness {
        let (tx, rx) = mpsc::unbounded_channel();
        let clock = MockClock::new();
        let audio = Arc::new(MockAudioPlayer::new());
        let notifier = Arc::new(MockNotifier::new());
        let live = Arc::new(MockLiveStatus::new());
        let services = Collaborators::new(audio.clone(), notifier.clone(), live.clone());
        let engine = CountdownEngine::with_clock(clock.clone(), services, tx);
        Harness {
            engine,
            clock,
            audio,
            notifier,
            live,
            rx,
        }
    }

    fn create_running(duration: u32) -> Harness {
        let mut h = create_engine();
        h.engine
            .configure(duration, MusicOption::StormDance, AnimationOption::Dino);
        h.engine.start();
        h.drain();
        h
    }

    // ------------------------------------------------------------------------
    // Configure Tests
    // ------------------------------------------------------------------------

    mod configure_tests {
        use super::*;

        #[test]
        fn test_new_engine_is_idle() {
            let h = create_engine();
            assert_eq!(h.engine.state(), TimerState::Idle);
            assert_eq!(h.engine.remaining_seconds(), 0);
            assert!(!h.engine.is_refreshing());
        }

        #[test]
        fn test_configure_arms_duration() {
            let mut h = create_engine();
            h.engine
                .configure(90, MusicOption::WeMadeIt, AnimationOption::Pig);

            assert_eq!(h.engine.state(), TimerState::Idle);
            assert_eq!(h.engine.remaining_seconds(), 90);
            assert_eq!(h.engine.total_duration_seconds(), 90);
            assert_eq!(h.engine.smooth_progress(), 0.0);
            assert_eq!(h.engine.music(), MusicOption::WeMadeIt);
            assert_eq!(h.engine.animation(), AnimationOption::Pig);
            assert_eq!(h.drain(), vec![TimerEvent::Configured { total_seconds: 90 }]);
        }

        #[test]
        fn test_configure_ignored_while_running() {
            let mut h = create_running(60);
            h.engine
                .configure(30, MusicOption::ChillHappy, AnimationOption::Alpaca);

            assert_eq!(h.engine.state(), TimerState::Running);
            assert_eq!(h.engine.total_duration_seconds(), 60);
            assert!(h.drain().is_empty());
        }

        #[test]
        fn test_configure_from_paused_returns_to_idle() {
            let mut h = create_running(60);
            h.engine.pause();
            h.engine
                .configure(30, MusicOption::StormDance, AnimationOption::Dino);

            assert_eq!(h.engine.state(), TimerState::Idle);
            assert_eq!(h.engine.remaining_seconds(), 30);
        }

        #[test]
        fn test_apply_timer_config() {
            let mut h = create_engine();
            let config = TimerConfig::new(2, 5).with_animation(AnimationOption::Alpaca);
            h.engine.apply(&config);

            assert_eq!(h.engine.remaining_seconds(), 125);
            assert_eq!(h.engine.animation(), AnimationOption::Alpaca);
        }
    }

    // ------------------------------------------------------------------------
    // Start Tests
    // ------------------------------------------------------------------------

    mod start_tests {
        use super::*;

        #[test]
        fn test_start() {
            let mut h = create_engine();
            h.engine
                .configure(90, MusicOption::StormDance, AnimationOption::Dino);
            h.drain();
            h.engine.start();

            assert_eq!(h.engine.state(), TimerState::Running);
            assert!(h.engine.is_refreshing());
            assert!(h.audio.is_ticking());
            assert_eq!(h.live.calls(), vec![LiveCall::Start(90, AnimationOption::Dino)]);
            assert_eq!(h.notifier.pending(), Some(Duration::from_secs(90)));
            assert_eq!(h.drain(), vec![TimerEvent::Started { total_seconds: 90 }]);
        }

        #[test]
        fn test_tick_at_zero_elapsed() {
            let mut h = create_running(90);
            h.engine.tick();

            assert_eq!(h.engine.remaining_seconds(), 90);
            assert_eq!(h.engine.smooth_progress(), 0.0);
            assert!(h.drain().is_empty());
        }

        #[test]
        fn test_start_below_minimum_is_ignored() {
            let mut h = create_engine();
            h.engine
                .configure(9, MusicOption::StormDance, AnimationOption::Dino);
            h.engine.start();

            assert_eq!(h.engine.state(), TimerState::Idle);
            assert!(!h.engine.is_refreshing());
            assert!(h.audio.calls().is_empty());
            assert!(h.notifier.calls().is_empty());
        }

        #[test]
        fn test_start_at_minimum() {
            let mut h = create_engine();
            h.engine
                .configure(MIN_DURATION_SECONDS, MusicOption::StormDance, AnimationOption::Dino);
            h.engine.start();
            assert_eq!(h.engine.state(), TimerState::Running);
        }

        #[test]
        fn test_start_while_running_is_ignored() {
            let mut h = create_running(60);
            let handle = h.engine.refresh_handle();
            h.engine.start();

            assert_eq!(h.engine.refresh_handle(), handle);
            assert_eq!(h.audio.count(AudioCall::StartTicking), 1);
            assert!(h.drain().is_empty());
        }

        #[test]
        fn test_start_while_paused_is_ignored() {
            let mut h = create_running(60);
            h.engine.pause();
            h.engine.start();
            assert_eq!(h.engine.state(), TimerState::Paused);
        }

        #[test]
        fn test_collaborator_failures_do_not_block_start() {
            let mut h = create_engine();
            h.audio.set_should_fail(true);
            h.notifier.set_should_fail(true);
            h.live.set_should_fail(true);
            h.engine
                .configure(30, MusicOption::StormDance, AnimationOption::Dino);
            h.engine.start();

            assert_eq!(h.engine.state(), TimerState::Running);
            assert!(h.engine.is_refreshing());
        }
    }

    // ------------------------------------------------------------------------
    // Tick Tests
    // ------------------------------------------------------------------------

    mod tick_tests {
        use super::*;

        #[test]
        fn test_tick_counts_down() {
            let mut h = create_running(90);
            h.clock.advance_millis(30_500);
            h.engine.tick();

            assert_eq!(h.engine.remaining_seconds(), 60);
            assert_eq!(h.engine.display_time(), "1:00");
            assert!((h.engine.smooth_progress() - 30.5 / 90.0).abs() < 1e-9);
            assert_eq!(h.live.published(), vec![60]);
            assert_eq!(
                h.drain(),
                vec![TimerEvent::Tick {
                    remaining_seconds: 60
                }]
            );
        }

        #[test]
        fn test_publishes_only_on_whole_second_change() {
            let mut h = create_running(30);
            for _ in 0..10 {
                h.clock.advance_millis(16);
                h.engine.tick();
            }
            assert!(h.live.published().is_empty());

            h.clock.advance_millis(900);
            h.engine.tick();
            h.engine.tick();
            assert_eq!(h.live.published(), vec![29]);
        }

        #[test]
        fn test_tick_ignored_when_not_running() {
            let mut h = create_engine();
            h.engine
                .configure(30, MusicOption::StormDance, AnimationOption::Dino);
            h.clock.advance_secs(10);
            h.engine.tick();
            assert_eq!(h.engine.remaining_seconds(), 30);
        }

        #[test]
        fn test_stale_refresh_handle_is_ignored() {
            let mut h = create_running(60);
            let stale = h.engine.refresh_handle().unwrap();
            h.engine.pause();
            h.engine.resume();
            let current = h.engine.refresh_handle().unwrap();
            assert_ne!(stale, current);

            h.clock.advance_secs(5);
            h.engine.tick_with(stale);
            assert_eq!(h.engine.remaining_seconds(), 60);

            h.engine.tick_with(current);
            assert_eq!(h.engine.remaining_seconds(), 55);
        }
    }

    // ------------------------------------------------------------------------
    // Completion Tests
    // ------------------------------------------------------------------------

    mod completion_tests {
        use super::*;

        #[test]
        fn test_finishes_for_any_duration() {
            for duration in [10, 11, 59, 60, 61, 90, 3599, 3659] {
                let mut h = create_running(duration);
                h.clock.advance_secs(u64::from(duration));
                h.engine.tick();

                assert_eq!(h.engine.state(), TimerState::Finished, "duration {}", duration);
                assert_eq!(h.engine.remaining_seconds(), 0);
                let finished = h
                    .drain()
                    .into_iter()
                    .filter(|e| *e == TimerEvent::Finished)
                    .count();
                assert_eq!(finished, 1);
            }
        }

        #[test]
        fn test_finish_side_effects() {
            let mut h = create_engine();
            h.engine
                .configure(20, MusicOption::ChillHappy, AnimationOption::Dino);
            h.engine.start();
            h.clock.advance_secs(25);
            h.engine.tick();

            assert_eq!(h.engine.smooth_progress(), 1.0);
            assert!(!h.engine.is_refreshing());
            assert!(h.engine.is_playing_completion_music());
            assert!(h.engine.is_showing_confetti());
            assert!(!h.audio.is_ticking());
            assert_eq!(h.audio.playing_track(), Some(MusicOption::ChillHappy));
            assert_eq!(h.live.last_call(), Some(LiveCall::Publish(0, true)));
            // The scheduled notification stays in place.
            assert_eq!(h.notifier.cancel_count(), 0);
        }

        #[test]
        fn test_finish_runs_once() {
            let mut h = create_running(10);
            h.clock.advance_secs(10);
            h.engine.tick();
            h.clock.advance_secs(10);
            h.engine.tick();
            h.engine.pause();
            h.engine.enter_background();
            h.engine.enter_foreground();

            assert_eq!(h.audio.count(AudioCall::PlayCompletion(MusicOption::StormDance)), 1);
            let finished = h
                .drain()
                .into_iter()
                .filter(|e| *e == TimerEvent::Finished)
                .count();
            assert_eq!(finished, 1);
        }

        #[test]
        fn test_pause_after_deadline_finishes() {
            let mut h = create_running(15);
            h.clock.advance_secs(20);
            h.engine.pause();

            assert_eq!(h.engine.state(), TimerState::Finished);
            assert_eq!(h.notifier.cancel_count(), 0);
        }

        #[test]
        fn test_dismiss_celebration() {
            let mut h = create_running(10);
            h.clock.advance_secs(10);
            h.engine.tick();
            h.engine.dismiss_celebration();

            assert!(!h.engine.is_playing_completion_music());
            assert!(!h.engine.is_showing_confetti());
            assert_eq!(h.audio.playing_track(), None);
        }

        #[test]
        fn test_stop_confetti_keeps_music() {
            let mut h = create_running(10);
            h.clock.advance_secs(10);
            h.engine.tick();
            h.engine.stop_confetti();

            assert!(h.engine.is_playing_completion_music());
            assert!(!h.engine.is_showing_confetti());
        }

        #[test]
        fn test_start_completion_music() {
            let mut h = create_engine();
            h.engine.start_completion_music(MusicOption::WeMadeIt);
            assert!(h.engine.is_playing_completion_music());
            assert_eq!(h.audio.playing_track(), Some(MusicOption::WeMadeIt));

            h.engine.stop_completion_music();
            assert!(!h.engine.is_playing_completion_music());
        }

        #[test]
        fn test_configure_after_finish() {
            let mut h = create_running(10);
            h.clock.advance_secs(10);
            h.engine.tick();
            h.engine
                .configure(45, MusicOption::StormDance, AnimationOption::Dino);

            assert_eq!(h.engine.state(), TimerState::Idle);
            assert_eq!(h.engine.remaining_seconds(), 45);
            assert!(!h.engine.is_showing_confetti());
        }
    }

    // ------------------------------------------------------------------------
    // Pause / Resume Tests
    // ------------------------------------------------------------------------

    mod pause_resume_tests {
        use super::*;

        #[test]
        fn test_pause() {
            let mut h = create_running(60);
            h.clock.advance_millis(10_400);
            h.engine.pause();

            assert_eq!(h.engine.state(), TimerState::Paused);
            assert_eq!(h.engine.remaining_seconds(), 50);
            assert!(!h.engine.is_refreshing());
            assert!(!h.audio.is_ticking());
            assert_eq!(h.notifier.pending(), None);
            assert_eq!(
                h.drain(),
                vec![TimerEvent::Paused {
                    remaining_seconds: 50
                }]
            );
        }

        #[test]
        fn test_pause_gap_does_not_consume_time() {
            for gap in [1, 30, 100, 10_000] {
                let mut h = create_running(60);
                h.clock.advance_secs(20);
                h.engine.pause();
                h.clock.advance_secs(gap);
                h.engine.resume();
                h.engine.tick();

                assert_eq!(h.engine.remaining_seconds(), 40, "gap {}", gap);
            }
        }

        #[test]
        fn test_resume_reschedules_notification() {
            let mut h = create_running(60);
            h.clock.advance_secs(15);
            h.engine.pause();
            h.engine.resume();

            assert_eq!(h.engine.state(), TimerState::Running);
            assert!(h.audio.is_ticking());
            assert_eq!(h.notifier.pending(), Some(Duration::from_secs(45)));
            assert_eq!(
                h.drain().last(),
                Some(&TimerEvent::Resumed {
                    remaining_seconds: 45
                })
            );
        }

        #[test]
        fn test_pause_not_running_is_ignored() {
            let mut h = create_engine();
            h.engine.pause();
            assert_eq!(h.engine.state(), TimerState::Idle);
            assert!(h.drain().is_empty());
        }

        #[test]
        fn test_resume_not_paused_is_ignored() {
            let mut h = create_running(60);
            let handle = h.engine.refresh_handle();
            h.engine.resume();
            assert_eq!(h.engine.refresh_handle(), handle);
            assert!(h.drain().is_empty());
        }
    }

    // ------------------------------------------------------------------------
    // Stop Tests
    // ------------------------------------------------------------------------

    mod stop_tests {
        use super::*;

        #[test]
        fn test_stop_rearms_duration() {
            let mut h = create_running(60);
            h.clock.advance_secs(20);
            h.engine.tick();
            h.engine.stop();

            assert_eq!(h.engine.state(), TimerState::Idle);
            assert_eq!(h.engine.remaining_seconds(), 60);
            assert_eq!(h.engine.smooth_progress(), 0.0);
            assert!(!h.engine.is_refreshing());
            assert!(!h.audio.is_ticking());
            assert_eq!(h.live.last_call(), Some(LiveCall::End));
            assert_eq!(h.drain().last(), Some(&TimerEvent::Stopped));
        }

        #[test]
        fn test_stop_keeps_notification() {
            let mut h = create_running(60);
            h.engine.stop();
            assert_eq!(h.notifier.cancel_count(), 0);
            assert_eq!(h.notifier.pending(), Some(Duration::from_secs(60)));
        }

        #[test]
        fn test_force_stop_cancels_notification() {
            let mut h = create_running(60);
            h.engine.pause();
            h.engine.resume();
            h.notifier.clear_calls();
            h.engine.force_stop();

            assert_eq!(h.engine.state(), TimerState::Idle);
            assert_eq!(h.notifier.calls(), vec![NotifierCall::Cancel]);
            assert_eq!(h.notifier.pending(), None);
        }

        #[test]
        fn test_stop_from_paused() {
            let mut h = create_running(60);
            h.engine.pause();
            h.engine.stop();
            assert_eq!(h.engine.state(), TimerState::Idle);
        }

        #[test]
        fn test_stop_when_idle_is_ignored() {
            let mut h = create_engine();
            h.engine.stop();
            h.engine.force_stop();
            assert!(h.audio.calls().is_empty());
            assert!(h.notifier.calls().is_empty());
            assert!(h.drain().is_empty());
        }

        #[test]
        fn test_reset_from_finished() {
            let mut h = create_running(10);
            h.clock.advance_secs(10);
            h.engine.tick();
            h.engine
                .reset(120, MusicOption::WeMadeIt, AnimationOption::Alpaca);

            assert_eq!(h.engine.state(), TimerState::Idle);
            assert_eq!(h.engine.remaining_seconds(), 120);
            assert!(!h.engine.is_playing_completion_music());
            assert_eq!(h.audio.count(AudioCall::StopAll), 1);
            assert_eq!(h.audio.playing_track(), None);
            assert_eq!(h.live.last_call(), Some(LiveCall::Clear));
        }

        #[test]
        fn test_reset_while_running() {
            let mut h = create_running(60);
            h.engine
                .reset(30, MusicOption::StormDance, AnimationOption::Dino);

            assert_eq!(h.engine.state(), TimerState::Idle);
            assert_eq!(h.engine.remaining_seconds(), 30);
            assert_eq!(h.notifier.pending(), None);
        }
    }

    // ------------------------------------------------------------------------
    // Background Tests
    // ------------------------------------------------------------------------

    mod background_tests {
        use super::*;

        #[test]
        fn test_background_shorter_than_remaining() {
            for away in [1, 15, 59] {
                let mut h = create_running(90);
                h.clock.advance_secs(30);
                h.engine.tick();
                h.engine.enter_background();
                h.clock.advance_secs(away);
                h.engine.enter_foreground();

                assert_eq!(h.engine.state(), TimerState::Running);
                assert_eq!(h.engine.remaining_seconds(), 60 - away as u32);
                assert!(h.engine.is_refreshing());
                assert!(h.audio.is_ticking());
                assert!(!h.engine.is_backgrounded());

                h.engine.tick();
                assert_eq!(h.engine.remaining_seconds(), 60 - away as u32);
            }
        }

        #[test]
        fn test_background_longer_than_remaining() {
            for away in [60, 61, 3600] {
                let mut h = create_running(90);
                h.clock.advance_secs(30);
                h.engine.tick();
                h.engine.enter_background();
                h.clock.advance_secs(away);
                h.engine.enter_foreground();

                assert_eq!(h.engine.state(), TimerState::Finished);
                assert_eq!(h.engine.remaining_seconds(), 0);
            }
        }

        #[test]
        fn test_background_does_not_change_remaining() {
            let mut h = create_running(60);
            h.engine.enter_background();
            h.clock.advance_secs(10);

            assert_eq!(h.engine.remaining_seconds(), 60);
            assert!(!h.engine.is_refreshing());
            assert!(!h.audio.is_ticking());
            assert!(h.engine.is_backgrounded());
        }

        #[test]
        fn test_foreground_while_paused_only_clears() {
            let mut h = create_running(60);
            h.engine.pause();
            h.engine.enter_background();
            h.clock.advance_secs(100);
            h.engine.enter_foreground();

            assert_eq!(h.engine.state(), TimerState::Paused);
            assert_eq!(h.engine.remaining_seconds(), 60);
            assert!(!h.engine.is_backgrounded());
        }

        #[test]
        fn test_foreground_without_background_is_harmless() {
            let mut h = create_running(60);
            h.engine.enter_foreground();
            assert_eq!(h.engine.remaining_seconds(), 60);
            assert_eq!(
                h.drain(),
                vec![TimerEvent::Foregrounded {
                    remaining_seconds: 60
                }]
            );
        }

        #[test]
        fn test_pause_while_backgrounded_counts_background_time() {
            let mut h = create_running(90);
            h.engine.enter_background();
            h.clock.advance_secs(20);
            h.engine.pause();

            assert_eq!(h.engine.state(), TimerState::Paused);
            assert_eq!(h.engine.remaining_seconds(), 70);
            assert!(!h.engine.is_backgrounded());
        }

        #[test]
        fn test_paused_gap_while_backgrounded_is_not_subtracted() {
            let mut h = create_running(90);
            h.clock.advance_secs(30);
            h.engine.tick();
            h.engine.enter_background();
            h.engine.pause();
            h.clock.advance_secs(100);
            h.engine.resume();
            h.engine.enter_foreground();

            assert_eq!(h.engine.state(), TimerState::Running);
            assert_eq!(h.engine.remaining_seconds(), 60);
            assert!(h.engine.is_refreshing());
        }

        #[test]
        fn test_resume_while_backgrounded_counts_time_once() {
            let mut h = create_running(90);
            h.engine.enter_background();
            h.engine.pause();
            h.engine.resume();
            h.clock.advance_secs(30);
            h.engine.tick();
            assert_eq!(h.engine.remaining_seconds(), 60);

            h.engine.enter_foreground();
            assert_eq!(h.engine.remaining_seconds(), 60);
        }

        #[test]
        fn test_background_before_start_is_not_subtracted() {
            let mut h = create_engine();
            h.engine
                .configure(90, MusicOption::StormDance, AnimationOption::Dino);
            h.engine.enter_background();
            h.clock.advance_secs(50);
            h.engine.start();
            h.engine.enter_foreground();

            assert_eq!(h.engine.state(), TimerState::Running);
            assert_eq!(h.engine.remaining_seconds(), 90);
        }

        #[test]
        fn test_repeated_background_keeps_earliest_time() {
            let mut h = create_running(90);
            h.engine.enter_background();
            h.clock.advance_secs(30);
            h.engine.enter_background();
            h.clock.advance_secs(30);
            h.engine.enter_foreground();

            assert_eq!(h.engine.remaining_seconds(), 30);
        }

        #[test]
        fn test_tick_while_backgrounded_is_ignored() {
            let mut h = create_running(90);
            h.engine.enter_background();
            h.clock.advance_secs(30);
            h.engine.tick();
            assert_eq!(h.engine.remaining_seconds(), 90);
            assert!(h.live.published().is_empty());

            h.engine.enter_foreground();
            assert_eq!(h.engine.remaining_seconds(), 60);
        }
    }

    // ------------------------------------------------------------------------
    // Snapshot Tests
    // ------------------------------------------------------------------------

    mod snapshot_tests {
        use super::*;

        #[test]
        fn test_snapshot() {
            let mut h = create_running(90);
            h.clock.advance_secs(30);
            h.engine.tick();
            let snapshot = h.engine.snapshot();

            assert_eq!(snapshot.state, TimerState::Running);
            assert_eq!(snapshot.remaining_seconds, 60);
            assert_eq!(snapshot.total_duration_seconds, 90);
            assert_eq!(snapshot.display_time, "1:00");
            assert_eq!(snapshot.animation, AnimationOption::Dino);
            assert!(!snapshot.is_showing_confetti);
        }

        #[test]
        fn test_events_survive_dropped_receiver() {
            let mut h = create_engine();
            drop(h.rx);
            h.engine
                .configure(30, MusicOption::StormDance, AnimationOption::Dino);
            h.engine.start();
            assert_eq!(h.engine.state(), TimerState::Running);
        }
    }
}
