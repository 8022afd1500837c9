//! High-frequency display refresh.

use tokio::time::{interval, Duration, Interval, MissedTickBehavior};

/// Interval between display refreshes while a countdown runs (~60 fps).
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(16);

/// Drives `CountdownEngine::tick_with` while the engine is refreshing.
///
/// Late ticks are skipped rather than bunched up; the engine derives the
/// remaining time from its clock, so a skipped tick loses nothing.
#[derive(Debug)]
pub struct RefreshTimer {
    ticker: Interval,
}

impl Default for RefreshTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshTimer {
    /// Creates a timer at [`REFRESH_INTERVAL`]. Must be called inside a tokio runtime.
    #[must_use]
    pub fn new() -> Self {
        Self::with_period(REFRESH_INTERVAL)
    }

    #[must_use]
    pub fn with_period(period: Duration) -> Self {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { ticker }
    }

    /// Waits for the next refresh.
    pub async fn tick(&mut self) {
        self.ticker.tick().await;
    }

    /// Restarts the period from now, so a resumed countdown does not get an
    /// immediate burst.
    pub fn reset(&mut self) {
        self.ticker.reset();
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.ticker.period()
    }
}
