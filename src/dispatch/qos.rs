//! Quality-of-service classes for the global concurrent queues.

use std::fmt;
use std::thread;

use serde::{Deserialize, Serialize};

/// Quality-of-service class.
///
/// Each class gets its own pool so background work cannot starve
/// interactive work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Qos {
    /// Work the user is actively waiting on.
    UserInteractive,
    /// Work the user started and expects soon.
    UserInitiated,
    /// No explicit class.
    #[default]
    Default,
    /// Long-running work with progress visible to the user.
    Utility,
    /// Work the user does not see.
    Background,
}

impl Qos {
    /// Number of classes.
    pub const COUNT: usize = 5;

    /// All classes, highest priority first.
    pub const ALL: [Qos; Qos::COUNT] = [
        Qos::UserInteractive,
        Qos::UserInitiated,
        Qos::Default,
        Qos::Utility,
        Qos::Background,
    ];

    /// Dense index, used to address per-class storage.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Qos::UserInteractive => 0,
            Qos::UserInitiated => 1,
            Qos::Default => 2,
            Qos::Utility => 3,
            Qos::Background => 4,
        }
    }

    /// Short name used in thread names and log records.
    pub fn name(self) -> &'static str {
        match self {
            Qos::UserInteractive => "user-interactive",
            Qos::UserInitiated => "user-initiated",
            Qos::Default => "default",
            Qos::Utility => "utility",
            Qos::Background => "background",
        }
    }

    /// Worker count for this class's pool.
    pub fn num_threads(self) -> usize {
        let cpus = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);

        match self {
            Qos::UserInteractive | Qos::UserInitiated | Qos::Default => cpus.max(2),
            Qos::Utility => (cpus / 2).max(2),
            Qos::Background => 1,
        }
    }
}

impl fmt::Display for Qos {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.name())
    }
}
