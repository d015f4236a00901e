//! Human-pacing jitter model
//!
//! Stateless helpers parametrized by (min, max) bounds. All values here are
//! policy constants; nothing is derived from a feedback signal.

use rand::Rng;
use std::time::Duration;

/// Per-character typing delay bounds, in seconds
pub const TYPING_CHAR_DELAY: (f64, f64) = (0.04, 0.15);

/// Occasional longer pause injected mid-typing, in seconds
pub const THINKING_PAUSE: (f64, f64) = (0.2, 0.6);

/// Probability of a thinking pause landing on any given character
pub const THINKING_PAUSE_PROBABILITY: f64 = 0.08;

/// Scroll distance bounds, in pixels
pub const SCROLL_STEP_PX: (u32, u32) = (400, 900);

/// Pause after a scroll step, in seconds
pub const SCROLL_PAUSE: (f64, f64) = (0.8, 2.5);

/// Uniform random delay within `[min_secs, max_secs]`.
pub fn delay_between(min_secs: f64, max_secs: f64) -> Duration {
    let secs = if max_secs > min_secs {
        rand::thread_rng().gen_range(min_secs..=max_secs)
    } else {
        min_secs
    };
    Duration::from_secs_f64(secs)
}

/// Per-character delays for simulated typing.
///
/// One delay per character; a low-probability thinking pause is folded into
/// the delay of the character it lands on, so cadence is never fixed.
pub fn typing_delays(text: &str) -> Vec<Duration> {
    let mut rng = rand::thread_rng();
    text.chars()
        .map(|_| {
            let mut secs = rng.gen_range(TYPING_CHAR_DELAY.0..=TYPING_CHAR_DELAY.1);
            if rng.gen_bool(THINKING_PAUSE_PROBABILITY) {
                secs += rng.gen_range(THINKING_PAUSE.0..=THINKING_PAUSE.1);
            }
            Duration::from_secs_f64(secs)
        })
        .collect()
}

/// Randomized scroll distance in pixels.
pub fn scroll_step() -> u32 {
    rand::thread_rng().gen_range(SCROLL_STEP_PX.0..=SCROLL_STEP_PX.1)
}

/// Pause after a scroll step.
pub fn scroll_pause() -> Duration {
    delay_between(SCROLL_PAUSE.0, SCROLL_PAUSE.1)
}
