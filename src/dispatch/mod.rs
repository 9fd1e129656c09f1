//! Execution contexts
//!
//! A [`Queue`] is a cheap, cloneable handle to something that accepts a job
//! and runs it later on some other thread. The guarded value and the block
//! timer never run user code on the caller's thread; they hand it to a queue.
//!
//! # Queues
//!
//! | Queue | Ordering | Backing |
//! |-------|----------|---------|
//! | [`Queue::main`] | serial, FIFO | one process-wide `feige-main` thread |
//! | [`Queue::serial`] | serial, FIFO | one named thread per queue |
//! | [`Queue::global`] | concurrent | one `rayon` pool per [`Qos`] class |
//!
//! Host environments with their own event loop implement
//! [`ExecutionContext`] and wrap it with [`Queue::custom`].

pub mod concurrent;
pub mod qos;
pub mod serial;

pub use concurrent::ConcurrentQueue;
pub use qos::Qos;
pub use serial::SerialQueue;

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};
use tracing::{error, trace};

use crate::error::Result;

/// A unit of work submitted to a queue.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Something capable of running a job later.
///
/// Implementations must not run the job synchronously on the calling thread.
pub trait ExecutionContext: Send + Sync {
    /// Submit a job. Never blocks waiting for the job to finish.
    fn execute(
        &self,
        job: Job,
    );

    /// Human readable label, used in log records.
    fn label(&self) -> &str;
}

/// Shared handle to an execution context.
#[derive(Clone)]
pub struct Queue {
    inner: Arc<dyn ExecutionContext>,
}

static MAIN: Lazy<Queue> = Lazy::new(|| {
    Queue::serial("main").expect("failed to spawn the main queue thread")
});

static GLOBALS: [OnceCell<Queue>; Qos::COUNT] = [const { OnceCell::new() }; Qos::COUNT];

impl Queue {
    /// The process-wide serial queue.
    pub fn main() -> Queue {
        MAIN.clone()
    }

    /// The shared concurrent queue for a quality-of-service class.
    pub fn global(qos: Qos) -> Queue {
        GLOBALS[qos.index()]
            .get_or_init(|| Queue::custom(ConcurrentQueue::global(qos)))
            .clone()
    }

    /// Create a new serial queue backed by its own thread.
    pub fn serial(label: impl Into<String>) -> Result<Queue> {
        Ok(Queue::custom(SerialQueue::spawn(label)?))
    }

    /// Wrap a host-supplied execution context.
    pub fn custom<C>(context: C) -> Queue
    where
        C: ExecutionContext + 'static,
    {
        Self {
            inner: Arc::new(context),
        }
    }

    /// Submit a closure to run asynchronously on this queue.
    pub fn async_run<F>(
        &self,
        f: F,
    ) where
        F: FnOnce() + Send + 'static,
    {
        trace!(target: "feige::dispatch", queue = self.label(), "async");
        self.inner.execute(Box::new(f));
    }

    /// The queue's label.
    #[inline]
    pub fn label(&self) -> &str {
        self.inner.label()
    }

    /// Whether both handles refer to the same underlying queue.
    #[inline]
    pub fn same_queue(
        &self,
        other: &Queue,
    ) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for Queue {
    fn default() -> Self {
        Queue::main()
    }
}

impl fmt::Debug for Queue {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Queue")
            .field("label", &self.label())
            .finish()
    }
}

/// Run a job, containing any panic so the worker that runs it survives.
pub(crate) fn run_job(
    label: &str,
    job: Job,
) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
        error!(
            target: "feige::dispatch",
            queue = label,
            "job panicked: {}",
            panic_message(payload.as_ref())
        );
    }
}

/// Best-effort extraction of a panic payload's message.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}

#[cfg(test)]
mod tests;
