//! Built-in fallback audio.
//!
//! Used when no track file is available for the ticking loop or a completion
//! track. Both sources are synthesized, so nothing has to ship alongside the
//! binary.

use std::time::Duration;

use rodio::source::{from_iter, SineWave, Source};

/// Length of one ticking period.
pub const TICK_PERIOD: Duration = Duration::from_millis(1000);

/// Length of the audible click inside a period.
const TICK_CLICK: Duration = Duration::from_millis(40);

/// Fanfare notes as (frequency Hz, duration ms, amplitude). The last note is a rest.
const FANFARE: &[(f32, u64, f32)] = &[
    (523.25, 180, 0.25),
    (659.25, 180, 0.25),
    (783.99, 180, 0.25),
    (1046.50, 420, 0.3),
    (440.0, 600, 0.0),
];

/// Boxed sample source handed to a sink.
pub type BuiltinSource = Box<dyn Source<Item = f32> + Send>;

/// One ticking period: silence followed by a short click.
#[must_use]
pub fn ticking_period() -> BuiltinSource {
    Box::new(
        SineWave::new(1000.0)
            .take_duration(TICK_CLICK)
            .amplify(0.2)
            .delay(TICK_PERIOD - TICK_CLICK),
    )
}

/// One pass of the completion fanfare, including the trailing rest.
#[must_use]
pub fn fanfare() -> BuiltinSource {
    Box::new(from_iter(FANFARE.iter().map(|&(freq, ms, amp)| {
        SineWave::new(freq)
            .take_duration(Duration::from_millis(ms))
            .amplify(amp)
    })))
}

/// Total length of one fanfare pass.
#[must_use]
pub fn fanfare_length() -> Duration {
    FANFARE
        .iter()
        .map(|&(_, ms, _)| Duration::from_millis(ms))
        .sum()
}
