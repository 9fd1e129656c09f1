//! Countdown driver
//!
//! A single background thread owns a min-heap of deadlines. Timers talk to it
//! over a `crossbeam` channel; the thread sleeps in `recv_deadline` until the
//! earliest deadline or the next command, whichever comes first. Due timers
//! are handed to their target queue; the driver thread never runs callbacks.

use std::cmp::{Ordering as CmpOrdering, Reverse};
use std::collections::BinaryHeap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use std::thread;
use std::time::Instant;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use once_cell::sync::Lazy;
use tracing::{debug, trace};

use super::block_timer::{Timer, TimerId};
use crate::error::{FeigeError, Result};

static GLOBAL: Lazy<TimerDriver> = Lazy::new(|| {
    TimerDriver::spawn("timer").expect("failed to spawn the timer driver thread")
});

/// A pending deadline for one timer.
pub(crate) struct Entry {
    pub(crate) deadline: Instant,
    pub(crate) id: TimerId,
    pub(crate) timer: Weak<Timer>,
}

impl PartialEq for Entry {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.cmp(other) == CmpOrdering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(
        &self,
        other: &Self,
    ) -> CmpOrdering {
        self.deadline
            .cmp(&other.deadline)
            .then_with(|| self.id.cmp(&other.id))
    }
}

enum Command {
    Schedule(Entry),
    Cancel(TimerId),
}

/// Handle to a countdown thread.
#[derive(Clone)]
pub struct TimerDriver {
    label: Arc<str>,
    sender: Sender<Command>,
    pending: Arc<AtomicUsize>,
}

impl TimerDriver {
    /// The process-wide driver used by timers that do not name one.
    pub fn global() -> TimerDriver {
        GLOBAL.clone()
    }

    /// Spawn a new driver thread. It exits once every handle is dropped.
    pub fn spawn(label: &str) -> Result<TimerDriver> {
        let (sender, receiver) = channel::unbounded();
        let pending = Arc::new(AtomicUsize::new(0));

        let worker_pending = pending.clone();
        thread::Builder::new()
            .name(format!("feige-{}", label))
            .spawn(move || run(receiver, worker_pending))
            .map_err(|source| FeigeError::QueueSpawn {
                label: label.to_string(),
                source,
            })?;

        debug!(target: "feige::timer", driver = label, "timer driver started");
        Ok(TimerDriver {
            label: label.into(),
            sender,
            pending,
        })
    }

    /// Number of deadlines the driver is currently holding.
    ///
    /// Updated by the driver thread after it processes each command, so it
    /// lags behind `schedule`/`cancel` calls briefly.
    #[inline]
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// The driver's label.
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn schedule(
        &self,
        entry: Entry,
    ) {
        let _ = self.sender.send(Command::Schedule(entry));
    }

    pub(crate) fn cancel(
        &self,
        id: TimerId,
    ) {
        let _ = self.sender.send(Command::Cancel(id));
    }
}

impl fmt::Debug for TimerDriver {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("TimerDriver")
            .field("label", &self.label)
            .field("pending", &self.pending())
            .finish()
    }
}

/// Driver thread main loop.
fn run(
    receiver: Receiver<Command>,
    pending: Arc<AtomicUsize>,
) {
    let mut heap: BinaryHeap<Reverse<Entry>> = BinaryHeap::new();

    loop {
        let next_deadline = heap.peek().map(|Reverse(entry)| entry.deadline);
        let command = match next_deadline {
            Some(deadline) => match receiver.recv_deadline(deadline) {
                Ok(command) => Some(command),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => break,
            },
            None => match receiver.recv() {
                Ok(command) => Some(command),
                Err(_) => break,
            },
        };

        match command {
            Some(Command::Schedule(entry)) => heap.push(Reverse(entry)),
            Some(Command::Cancel(id)) => heap.retain(|Reverse(entry)| entry.id != id),
            None => {}
        }

        let now = Instant::now();
        while heap
            .peek()
            .is_some_and(|Reverse(entry)| entry.deadline <= now)
        {
            if let Some(Reverse(entry)) = heap.pop() {
                if let Some(next) = expire(entry, now) {
                    heap.push(Reverse(next));
                }
            }
        }

        pending.store(heap.len(), Ordering::SeqCst);
    }

    trace!(target: "feige::timer", "timer driver exiting");
}

/// Dispatch a due entry; returns the follow-up entry for repeating timers.
fn expire(
    entry: Entry,
    now: Instant,
) -> Option<Entry> {
    let timer = entry.timer.upgrade()?;
    let period = timer.expire()?;

    // Fixed rate; ticks missed while the driver was late are skipped.
    let mut deadline = entry.deadline.checked_add(period)?;
    if deadline <= now {
        deadline = now.checked_add(period)?;
    }

    Some(Entry {
        deadline,
        id: entry.id,
        timer: entry.timer,
    })
}
