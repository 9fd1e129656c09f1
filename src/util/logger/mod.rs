//! Logging setup for Feige applications
//!
//! Lines look like ` INFO feige-main feige::timer: armed timer=Timer(0)`:
//! level, the emitting thread (queue workers are named `feige-<label>`), the
//! target, then message and structured fields.
//!
//! The library itself only emits `tracing` events under the `feige::dispatch`,
//! `feige::sync` and `feige::timer` targets; installing a subscriber is left
//! to the application. These helpers install the one the demo CLI uses.
//!
//! # Usage
//!
//! ```rust
//! use feige::util::logger;
//!
//! logger::init();
//! tracing::info!("Hello, {}", "world");
//! ```

use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

/// Minimum level, as written in the `[log]` config table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Install the subscriber at `info`.
pub fn init() {
    init_with_level(LogLevel::Info);
}

/// Install the subscriber at `level`.
///
/// Does nothing if a global subscriber is already installed, so tests and
/// embedding applications can call it freely.
pub fn init_with_level(level: LogLevel) {
    let filter = tracing_subscriber::filter::LevelFilter::from_level(level.into());

    // 不显示时间；线程名区分队列，target 区分模块
    let layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_target(true)
        .with_level(true)
        .with_thread_names(true)
        .with_ansi(false)
        .compact()
        .with_filter(filter);

    let _ = Registry::default().with(layer).try_init();
}

/// Install the subscriber at `debug`, which includes arm/cancel/fire records.
pub fn init_debug() {
    init_with_level(LogLevel::Debug);
}
