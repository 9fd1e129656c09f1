//! Process-wide timer defaults.

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::dispatch::Queue;

/// Values used when a timer is built without an explicit repeat flag or queue.
#[derive(Debug, Clone)]
pub struct TimerDefaults {
    /// Whether timers repeat.
    pub repeats: bool,
    /// Queue callbacks run on.
    pub queue: Queue,
}

impl Default for TimerDefaults {
    fn default() -> Self {
        Self {
            repeats: false,
            queue: Queue::main(),
        }
    }
}

static DEFAULTS: Lazy<RwLock<TimerDefaults>> = Lazy::new(|| RwLock::new(TimerDefaults::default()));

/// Current defaults.
pub fn defaults() -> TimerDefaults {
    DEFAULTS.read().clone()
}

/// Replace the defaults for timers built from now on.
pub fn set_defaults(defaults: TimerDefaults) {
    *DEFAULTS.write() = defaults;
}

/// Change only the default repeat flag.
pub fn set_default_repeats(repeats: bool) {
    DEFAULTS.write().repeats = repeats;
}

/// Change only the default queue.
pub fn set_default_queue(queue: Queue) {
    DEFAULTS.write().queue = queue;
}
