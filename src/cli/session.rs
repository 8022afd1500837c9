//! Interactive countdown session.
//!
//! One task owns the engine and `select!`s over the refresh timer, stdin,
//! delivered notifications, notification actions and Ctrl-C, so every
//! engine mutation happens in one place.

use std::ops::ControlFlow;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

use super::display::Display;
use crate::engine::{Clock, CountdownEngine, RefreshTimer, SystemClock, TimerEvent};
use crate::live::LiveUpdate;
use crate::notification::{
    action_ids, DeliveredNotification, NotificationActionEvent, NotificationReceivers,
    ScheduledNotifier,
};
use crate::types::{CountdownSnapshot, TimerConfig};

// ============================================================================
// SessionCommand
// ============================================================================

/// A command typed on stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Pause,
    Resume,
    Stop,
    Background,
    Foreground,
    DismissCelebration,
    Restart,
    /// Simulates pressing the notification's stop action.
    NotificationStop,
    Help,
    Quit,
}

impl SessionCommand {
    /// Parses one input line. Returns `None` for blank or unknown input.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "p" | "pause" => Some(Self::Pause),
            "r" | "resume" => Some(Self::Resume),
            "s" | "stop" => Some(Self::Stop),
            "b" | "background" => Some(Self::Background),
            "f" | "foreground" => Some(Self::Foreground),
            "x" | "dismiss" => Some(Self::DismissCelebration),
            "n" | "restart" => Some(Self::Restart),
            "a" | "action" => Some(Self::NotificationStop),
            "h" | "help" | "?" => Some(Self::Help),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// Drives one countdown from the terminal.
pub struct Session<C: Clock = SystemClock> {
    engine: CountdownEngine<C>,
    config: TimerConfig,
    events: UnboundedReceiver<TimerEvent>,
    live_updates: Option<crossbeam_channel::Receiver<LiveUpdate>>,
    notifier: Option<Arc<ScheduledNotifier>>,
    bell: bool,
}

impl<C: Clock> Session<C> {
    /// Creates a session around `engine`, whose events arrive on `events`.
    pub fn new(
        engine: CountdownEngine<C>,
        events: UnboundedReceiver<TimerEvent>,
        config: TimerConfig,
    ) -> Self {
        Self {
            engine,
            config,
            events,
            live_updates: None,
            notifier: None,
            bell: false,
        }
    }

    /// Renders updates from a `ChannelLiveStatus`.
    #[must_use]
    pub fn with_live_updates(mut self, updates: crossbeam_channel::Receiver<LiveUpdate>) -> Self {
        self.live_updates = Some(updates);
        self
    }

    /// Lets the session answer notification actions through `notifier`.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<ScheduledNotifier>) -> Self {
        self.bell = notifier.config().bell;
        self.notifier = Some(notifier);
        self
    }

    pub fn engine(&self) -> &CountdownEngine<C> {
        &self.engine
    }

    /// Arms the configured duration and starts counting down.
    pub fn begin(&mut self) {
        self.engine.apply(&self.config);
        self.engine.start();
        self.render();
    }

    /// Runs the session until the user quits, input ends with nothing left to
    /// count, or Ctrl-C.
    ///
    /// Returns the final snapshot.
    pub async fn run<R>(
        mut self,
        input: R,
        receivers: Option<NotificationReceivers>,
    ) -> Result<CountdownSnapshot>
    where
        R: AsyncBufRead + Unpin,
    {
        let (mut delivered, mut actions) = match receivers {
            Some(r) => (Some(r.delivered), Some(r.actions)),
            None => (None, None),
        };

        let mut lines = input.lines();
        let mut input_open = true;
        let mut refresh = RefreshTimer::new();
        let mut current_handle = None;

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        Display::show_key_help();
        self.begin();

        loop {
            let handle = self.engine.refresh_handle();
            if handle.is_some() && handle != current_handle {
                refresh.reset();
            }
            current_handle = handle;

            if !input_open && handle.is_none() {
                debug!("Input closed and nothing is counting down");
                break;
            }

            tokio::select! {
                _ = refresh.tick(), if handle.is_some() => {
                    if let Some(handle) = handle {
                        self.engine.tick_with(handle);
                    }
                }
                line = lines.next_line(), if input_open => {
                    match line.context("Failed to read from stdin")? {
                        Some(line) => {
                            if let Some(command) = SessionCommand::parse(&line) {
                                if self.handle_command(command).is_break() {
                                    break;
                                }
                            }
                        }
                        None => input_open = false,
                    }
                }
                notification = recv_or_pending(&mut delivered) => {
                    match notification {
                        Some(notification) => self.handle_delivered(&notification),
                        None => delivered = None,
                    }
                }
                action = recv_or_pending(&mut actions) => {
                    match action {
                        Some(action) => self.handle_action(action),
                        None => actions = None,
                    }
                }
                result = &mut ctrl_c => {
                    result.context("Failed to listen for Ctrl-C")?;
                    debug!("Interrupted");
                    break;
                }
            }

            self.render();
        }

        let snapshot = self.engine.snapshot();
        self.shutdown();
        Ok(snapshot)
    }

    /// Applies one stdin command.
    pub fn handle_command(&mut self, command: SessionCommand) -> ControlFlow<()> {
        debug!("Command: {:?}", command);
        match command {
            SessionCommand::Pause => self.engine.pause(),
            SessionCommand::Resume => self.engine.resume(),
            SessionCommand::Stop => self.engine.force_stop(),
            SessionCommand::Background => self.engine.enter_background(),
            SessionCommand::Foreground => self.engine.enter_foreground(),
            SessionCommand::DismissCelebration => {
                self.engine.dismiss_celebration();
                Display::show_celebration_dismissed();
            }
            SessionCommand::Restart => self.restart(),
            SessionCommand::NotificationStop => match &self.notifier {
                Some(notifier) => notifier.respond(action_ids::STOP_TIMER),
                None => Display::show_warning("通知は無効です"),
            },
            SessionCommand::Help => Display::show_key_help(),
            SessionCommand::Quit => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    /// Applies a notification action.
    pub fn handle_action(&mut self, action: NotificationActionEvent) {
        debug!("Notification action: {:?}", action);
        match action {
            NotificationActionEvent::StopTimer => {
                self.engine.reset(
                    self.config.total_seconds(),
                    self.config.music,
                    self.config.animation,
                );
            }
            NotificationActionEvent::Default => self.engine.enter_foreground(),
            NotificationActionEvent::Dismiss => {}
        }
    }

    fn handle_delivered(&self, notification: &DeliveredNotification) {
        Display::show_notification(&notification.request.content, self.bell);
    }

    fn restart(&mut self) {
        self.engine.reset(
            self.config.total_seconds(),
            self.config.music,
            self.config.animation,
        );
        self.engine.start();
    }

    /// Prints pending engine events and live updates.
    fn render(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            let snapshot = self.engine.snapshot();
            match event {
                TimerEvent::Configured { .. } => {}
                TimerEvent::Started { .. } => Display::show_started(&snapshot),
                TimerEvent::Tick { .. } => Display::show_status(&snapshot),
                TimerEvent::Paused { remaining_seconds } => Display::show_paused(remaining_seconds),
                TimerEvent::Resumed { remaining_seconds } => {
                    Display::show_resumed(remaining_seconds)
                }
                TimerEvent::Stopped => Display::show_stopped(&snapshot),
                TimerEvent::Finished => {
                    Display::show_celebration(snapshot.animation, snapshot.music)
                }
                TimerEvent::Backgrounded => Display::show_backgrounded(),
                TimerEvent::Foregrounded { .. } => Display::show_foregrounded(&snapshot),
            }
        }

        if let Some(updates) = &self.live_updates {
            for update in updates.try_iter() {
                Display::show_live(&update);
            }
        }
    }

    /// Silences audio, cancels notifications and clears the live status.
    fn shutdown(&mut self) {
        self.engine.reset(
            self.config.total_seconds(),
            self.config.music,
            self.config.animation,
        );
        while self.events.try_recv().is_ok() {}
        if let Some(updates) = &self.live_updates {
            for update in updates.try_iter() {
                Display::show_live(&update);
            }
        }
    }
}

async fn recv_or_pending<T>(rx: &mut Option<UnboundedReceiver<T>>) -> Option<T> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

// ============================================================================
// Tests
// ============================================================================
