//! Feige
//!
//! Small concurrency and ergonomics utilities.
//!
//! - [`ReadWriteLock`]: many concurrent readers, fire-and-forget FIFO writers
//! - [`BlockTimer`]: one-shot or repeating callbacks on a chosen [`Queue`]
//! - [`dispatch`]: the serial and concurrent queues both of the above run on
//! - [`ext`]: scope functions, emptiness helpers, [`Indirect`] references
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use feige::{BlockTimer, Queue, ReadWriteLock};
//!
//! let hits = std::sync::Arc::new(ReadWriteLock::new(0u64));
//! let counter = hits.clone();
//! let timer = BlockTimer::scheduled(Duration::from_millis(100), true, Queue::main(), move |_| {
//!     counter.mutate(|n| *n += 1);
//! });
//! std::thread::sleep(Duration::from_secs(1));
//! drop(timer);
//! println!("{} ticks", hits.read());
//! ```

#![doc(html_root_url = "https://docs.rs/feige")]
#![warn(rust_2018_idioms)]

pub mod dispatch;
pub mod error;
pub mod ext;
pub mod sync;
pub mod timer;

// Utility modules
pub mod util;

// Re-exports
pub use dispatch::{ExecutionContext, Qos, Queue};
pub use error::{FeigeError, Result};
pub use ext::{run, Emptyable, Indirect, OptionEmptyExt, ScopeFunctions, SliceExt};
pub use sync::{LockOptions, ReadWriteLock};
pub use timer::{BlockTimer, Timer, TimerBuilder, TimerState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = "Feige";
