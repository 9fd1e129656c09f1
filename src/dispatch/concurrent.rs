//! Concurrent queue
//!
//! Jobs are handed to a `rayon` pool and may run in parallel with each other.
//! If the dedicated pool cannot be built, jobs fall back to rayon's global
//! pool rather than being lost.

use std::fmt;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::warn;

use super::{panic_message, run_job, ExecutionContext, Job, Qos};
use crate::error::{FeigeError, Result};

/// Queue that runs jobs concurrently on a thread pool.
pub struct ConcurrentQueue {
    label: String,
    qos: Qos,
    pool: Option<ThreadPool>,
}

impl ConcurrentQueue {
    /// Build a queue with its own pool sized for `qos`.
    pub fn new(
        label: impl Into<String>,
        qos: Qos,
    ) -> Result<Self> {
        let label = label.into();
        let thread_label = label.clone();
        let handler_label = label.clone();

        let pool = ThreadPoolBuilder::new()
            .num_threads(qos.num_threads())
            .thread_name(move |i| format!("feige-{}-{}", thread_label, i))
            .panic_handler(move |payload| {
                tracing::error!(
                    target: "feige::dispatch",
                    queue = %handler_label,
                    "pool job panicked: {}",
                    panic_message(payload.as_ref())
                );
            })
            .build()
            .map_err(|e| FeigeError::PoolBuild {
                label: label.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            label,
            qos,
            pool: Some(pool),
        })
    }

    /// The shared queue for `qos`, degrading to rayon's global pool on failure.
    pub(crate) fn global(qos: Qos) -> Self {
        let label = format!("global-{}", qos.name());
        match Self::new(label.clone(), qos) {
            Ok(queue) => queue,
            Err(err) => {
                warn!(target: "feige::dispatch", queue = %label, "{}; using rayon's global pool", err);
                Self {
                    label,
                    qos,
                    pool: None,
                }
            }
        }
    }

    /// The queue's quality-of-service class.
    #[inline]
    pub fn qos(&self) -> Qos {
        self.qos
    }
}

impl ExecutionContext for ConcurrentQueue {
    fn execute(
        &self,
        job: Job,
    ) {
        let label = self.label.clone();
        let job = move || run_job(&label, job);
        match &self.pool {
            Some(pool) => pool.spawn(job),
            None => rayon::spawn(job),
        }
    }

    fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Debug for ConcurrentQueue {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("ConcurrentQueue")
            .field("label", &self.label)
            .field("qos", &self.qos)
            .field("threads", &self.pool.as_ref().map(|p| p.current_num_threads()))
            .finish()
    }
}
