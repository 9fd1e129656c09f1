//! Block based timer.

use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use super::defaults::defaults;
use super::driver::{Entry, TimerDriver};
use crate::dispatch::Queue;
use crate::ext::ScopeFunctions;

/// Shortest period a repeating timer will tick at.
pub const MIN_REPEAT_INTERVAL: Duration = Duration::from_millis(1);

/// Callback invoked whenever a timer fires.
pub type Callback = dyn Fn(&Timer) + Send + Sync + 'static;

/// Unique timer identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

impl TimerId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TimerId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "Timer({})", self.0)
    }
}

/// Timer lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Constructed, not yet started.
    Created,
    /// Counting down (or repeating).
    Armed,
    /// A one-shot timer that has fired.
    Fired,
    /// Cancelled; will never fire again.
    Cancelled,
}

impl TimerState {
    /// Convert from u8 (for atomic storage).
    #[inline]
    pub fn from_u8(val: u8) -> Self {
        match val {
            0 => TimerState::Created,
            1 => TimerState::Armed,
            2 => TimerState::Fired,
            _ => TimerState::Cancelled,
        }
    }

    /// Convert to u8 (for atomic storage).
    #[inline]
    pub fn as_u8(&self) -> u8 {
        match self {
            TimerState::Created => 0,
            TimerState::Armed => 1,
            TimerState::Fired => 2,
            TimerState::Cancelled => 3,
        }
    }
}

/// Shared timer state, handed to the callback on every fire.
///
/// Callbacks receive `&Timer` for the duration of the call only. The driver
/// and queued jobs keep weak references, so a callback never keeps its own
/// timer alive.
pub struct Timer {
    id: TimerId,
    interval: Duration,
    repeats: bool,
    queue: Queue,
    callback: Box<Callback>,
    state: AtomicU8,
    /// A scheduled tick is queued and has not started running.
    tick_queued: AtomicBool,
    driver: TimerDriver,
    this: Weak<Timer>,
}

impl Timer {
    /// Timer id.
    #[inline]
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Delay before the first fire, and period between repeats.
    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether the timer repeats.
    #[inline]
    pub fn repeats(&self) -> bool {
        self.repeats
    }

    /// Queue the callback runs on.
    #[inline]
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> TimerState {
        TimerState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Whether [`cancel`](Self::cancel) has been called.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.state() == TimerState::Cancelled
    }

    /// Start counting down. The delay is measured from this call.
    ///
    /// Calling this more than once, or after cancelling, does nothing.
    pub fn start(&self) {
        let armed = self.state.compare_exchange(
            TimerState::Created.as_u8(),
            TimerState::Armed.as_u8(),
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
        if armed.is_err() {
            return;
        }

        debug!(
            target: "feige::timer",
            timer = %self.id,
            interval = ?self.interval,
            repeats = self.repeats,
            queue = self.queue.label(),
            "armed"
        );
        // An interval past the end of `Instant` is armed but never due.
        let Some(deadline) = Instant::now().checked_add(self.interval) else {
            return;
        };
        self.driver.schedule(Entry {
            deadline,
            id: self.id,
            timer: self.this.clone(),
        });
    }

    /// Stop the timer. It will never fire again.
    ///
    /// A callback already queued on the target queue sees the cancellation
    /// and is skipped. Calling this more than once does nothing.
    pub fn cancel(&self) {
        let previous = TimerState::from_u8(
            self.state
                .swap(TimerState::Cancelled.as_u8(), Ordering::SeqCst),
        );
        match previous {
            TimerState::Cancelled => return,
            TimerState::Armed => self.driver.cancel(self.id),
            TimerState::Created | TimerState::Fired => {}
        }
        debug!(target: "feige::timer", timer = %self.id, from = ?previous, "cancelled");
    }

    /// Invoke the callback once, asynchronously on the target queue, outside
    /// the schedule. Does nothing on a cancelled timer.
    pub fn fire(&self) {
        if self.is_cancelled() {
            return;
        }
        debug!(target: "feige::timer", timer = %self.id, "manual fire");
        self.dispatch(false);
    }

    /// Queue one invocation of the callback.
    ///
    /// Scheduled ticks coalesce: while one is waiting on a busy queue, later
    /// ticks are dropped instead of piling up behind it.
    fn dispatch(
        &self,
        scheduled: bool,
    ) {
        if scheduled && self.tick_queued.swap(true, Ordering::SeqCst) {
            trace!(target: "feige::timer", timer = %self.id, "tick coalesced");
            return;
        }
        let timer = self.this.clone();
        self.queue.async_run(move || {
            let Some(timer) = timer.upgrade() else {
                return;
            };
            if scheduled {
                timer.tick_queued.store(false, Ordering::SeqCst);
            }
            if timer.is_cancelled() {
                return;
            }
            (timer.callback)(&timer);
        });
    }

    /// Called by the driver when the deadline passes. Returns the repeat
    /// period if the timer should be rescheduled.
    pub(crate) fn expire(&self) -> Option<Duration> {
        if self.repeats {
            if self.state() != TimerState::Armed {
                return None;
            }
            self.dispatch(true);
            Some(self.interval.max(MIN_REPEAT_INTERVAL))
        } else {
            let fired = self.state.compare_exchange(
                TimerState::Armed.as_u8(),
                TimerState::Fired.as_u8(),
                Ordering::SeqCst,
                Ordering::SeqCst,
            );
            if fired.is_ok() {
                self.dispatch(true);
            }
            None
        }
    }
}

impl fmt::Debug for Timer {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Timer")
            .field("id", &self.id)
            .field("interval", &self.interval)
            .field("repeats", &self.repeats)
            .field("queue", &self.queue.label())
            .field("state", &self.state())
            .finish()
    }
}

/// Owning handle to a [`Timer`]. Dropping it cancels the timer.
///
/// ```no_run
/// use std::time::Duration;
/// use feige::{BlockTimer, Queue};
///
/// let timer = BlockTimer::scheduled(Duration::from_secs(1), true, Queue::main(), |timer| {
///     tracing::info!("tick from {}", timer.id());
/// });
/// // ...
/// drop(timer); // cancels
/// ```
pub struct BlockTimer {
    timer: Arc<Timer>,
}

impl BlockTimer {
    /// Create a timer that is not yet started.
    pub fn new<F>(
        interval: Duration,
        repeats: bool,
        queue: Queue,
        callback: F,
    ) -> Self
    where
        F: Fn(&Timer) + Send + Sync + 'static,
    {
        TimerBuilder::new(interval)
            .repeats(repeats)
            .queue(queue)
            .build(callback)
    }

    /// Create a timer and start it.
    pub fn scheduled<F>(
        interval: Duration,
        repeats: bool,
        queue: Queue,
        callback: F,
    ) -> Self
    where
        F: Fn(&Timer) + Send + Sync + 'static,
    {
        Self::new(interval, repeats, queue, callback).also(|timer| timer.start())
    }

    /// Create a timer using the process defaults for `repeats` and the queue.
    pub fn with_defaults<F>(
        interval: Duration,
        callback: F,
    ) -> Self
    where
        F: Fn(&Timer) + Send + Sync + 'static,
    {
        TimerBuilder::new(interval).build(callback)
    }

    /// Create and start a timer using the process defaults.
    pub fn scheduled_with_defaults<F>(
        interval: Duration,
        callback: F,
    ) -> Self
    where
        F: Fn(&Timer) + Send + Sync + 'static,
    {
        TimerBuilder::new(interval).schedule(callback)
    }

    /// Start building a timer.
    #[inline]
    pub fn builder(interval: Duration) -> TimerBuilder {
        TimerBuilder::new(interval)
    }
}

impl Deref for BlockTimer {
    type Target = Timer;

    fn deref(&self) -> &Self::Target {
        &self.timer
    }
}

impl Drop for BlockTimer {
    fn drop(&mut self) {
        self.timer.cancel();
    }
}

impl fmt::Debug for BlockTimer {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        fmt::Debug::fmt(&*self.timer, f)
    }
}

/// Builder for [`BlockTimer`]. Unset fields take the process defaults.
#[derive(Debug)]
pub struct TimerBuilder {
    interval: Duration,
    repeats: Option<bool>,
    queue: Option<Queue>,
    driver: Option<TimerDriver>,
}

impl TimerBuilder {
    /// Start a builder for a timer firing after `interval`.
    #[inline]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            repeats: None,
            queue: None,
            driver: None,
        }
    }

    /// Set whether the timer repeats.
    #[inline]
    pub fn repeats(
        mut self,
        repeats: bool,
    ) -> Self {
        self.repeats = Some(repeats);
        self
    }

    /// Set the queue the callback runs on.
    #[inline]
    pub fn queue(
        mut self,
        queue: Queue,
    ) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Use a specific countdown driver instead of the global one.
    #[inline]
    pub fn driver(
        mut self,
        driver: TimerDriver,
    ) -> Self {
        self.driver = Some(driver);
        self
    }

    /// Build the timer without starting it.
    pub fn build<F>(
        self,
        callback: F,
    ) -> BlockTimer
    where
        F: Fn(&Timer) + Send + Sync + 'static,
    {
        let (repeats, queue) = match (self.repeats, self.queue) {
            (Some(repeats), Some(queue)) => (repeats, queue),
            (repeats, queue) => {
                let defaults = defaults();
                (
                    repeats.unwrap_or(defaults.repeats),
                    queue.unwrap_or(defaults.queue),
                )
            }
        };
        let driver = self.driver.unwrap_or_else(TimerDriver::global);
        let interval = self.interval;

        let timer = Arc::new_cyclic(|this| Timer {
            id: TimerId::next(),
            interval,
            repeats,
            queue,
            callback: Box::new(callback),
            state: AtomicU8::new(TimerState::Created.as_u8()),
            tick_queued: AtomicBool::new(false),
            driver,
            this: this.clone(),
        });

        BlockTimer { timer }
    }

    /// Build the timer and start it.
    pub fn schedule<F>(
        self,
        callback: F,
    ) -> BlockTimer
    where
        F: Fn(&Timer) + Send + Sync + 'static,
    {
        self.build(callback).also(|timer| timer.start())
    }
}
