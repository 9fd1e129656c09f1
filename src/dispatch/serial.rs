//! Serial queue
//!
//! One named worker thread draining a `crossbeam` channel. Jobs run one at a
//! time in submission order. The worker exits once every handle to the queue
//! has been dropped and the backlog is drained.

use std::fmt;
use std::thread;

use crossbeam::channel::{self, Sender};
use tracing::{debug, warn};

use super::{run_job, ExecutionContext, Job};
use crate::error::{FeigeError, Result};

/// FIFO queue backed by a dedicated thread.
pub struct SerialQueue {
    label: String,
    sender: Sender<Job>,
}

impl SerialQueue {
    /// Spawn the worker thread and return the queue.
    pub fn spawn(label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        let (sender, receiver) = channel::unbounded::<Job>();

        let worker_label = label.clone();
        thread::Builder::new()
            .name(format!("feige-{}", label))
            .spawn(move || {
                for job in receiver.iter() {
                    run_job(&worker_label, job);
                }
                debug!(target: "feige::dispatch", queue = %worker_label, "serial queue drained");
            })
            .map_err(|source| FeigeError::QueueSpawn {
                label: label.clone(),
                source,
            })?;

        debug!(target: "feige::dispatch", queue = %label, "serial queue started");
        Ok(Self { label, sender })
    }

    /// Number of jobs waiting to run.
    #[inline]
    pub fn backlog(&self) -> usize {
        self.sender.len()
    }
}

impl ExecutionContext for SerialQueue {
    fn execute(
        &self,
        job: Job,
    ) {
        if self.sender.send(job).is_err() {
            // Only possible if the worker thread died outside a job.
            warn!(target: "feige::dispatch", queue = %self.label, "serial queue worker is gone, job dropped");
        }
    }

    fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Debug for SerialQueue {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("SerialQueue")
            .field("label", &self.label)
            .field("backlog", &self.backlog())
            .finish()
    }
}
