//! Block timers
//!
//! [`BlockTimer`] runs a callback once after a delay, or repeatedly at a fixed
//! interval, on a chosen [`Queue`](crate::dispatch::Queue).
//!
//! # Lifecycle
//!
//! ```text
//! Created --start--> Armed --deadline--> Fired        (one-shot)
//!                      |  \--deadline--> Armed        (repeating)
//!    any state --cancel/drop--> Cancelled
//! ```
//!
//! The countdown runs on a shared driver thread ([`TimerDriver`]); only the
//! callback itself runs on the target queue, and never on the thread that
//! called `start`.

mod block_timer;
mod defaults;
pub mod driver;

pub use block_timer::{
    BlockTimer, Callback, Timer, TimerBuilder, TimerId, TimerState, MIN_REPEAT_INTERVAL,
};
pub use defaults::{defaults, set_default_queue, set_default_repeats, set_defaults, TimerDefaults};
pub use driver::TimerDriver;

use std::time::Duration;

/// Convert a floating-point number of seconds to a timer interval.
///
/// Negative and NaN values become zero, meaning "fire as soon as possible";
/// values too large for a `Duration` saturate.
pub fn seconds(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}
