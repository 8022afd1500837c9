//! Countdown engine and its time sources.

mod clock;
mod refresh;
mod timer;

pub use clock::{Clock, MockClock, SystemClock};
pub use refresh::{RefreshTimer, REFRESH_INTERVAL};
pub use timer::{Collaborators, CountdownEngine, RefreshHandle, TimerEvent};
