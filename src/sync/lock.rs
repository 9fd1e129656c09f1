//! Many readers, single writer lock.

use std::any::type_name;
use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::{const_rwlock, Mutex, RwLock};
use tracing::{error, trace};

use crate::dispatch::{panic_message, Qos, Queue};

type Mutation<T> = Box<dyn FnOnce(&mut T) + Send + 'static>;

/// QoS of the global queue used by locks created without an explicit queue.
static DEFAULT_QOS: RwLock<Qos> = const_rwlock(Qos::Utility);

/// QoS used by [`ReadWriteLock::new`].
pub fn default_qos() -> Qos {
    *DEFAULT_QOS.read()
}

/// Change the QoS used by locks created from now on.
pub fn set_default_qos(qos: Qos) {
    *DEFAULT_QOS.write() = qos;
}

/// Construction options for [`ReadWriteLock`].
#[derive(Debug, Clone, Default)]
pub struct LockOptions {
    label: Option<String>,
    qos: Option<Qos>,
    queue: Option<Queue>,
}

impl LockOptions {
    /// Create empty options; every field falls back to its default.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Label used in log records. Defaults to the value's type name.
    pub fn label(
        mut self,
        label: impl Into<String>,
    ) -> Self {
        self.label = Some(label.into());
        self
    }

    /// QoS of the global queue mutations drain on. Ignored if a queue is set.
    pub fn qos(
        mut self,
        qos: Qos,
    ) -> Self {
        self.qos = Some(qos);
        self
    }

    /// Explicit queue for mutations.
    pub fn queue(
        mut self,
        queue: Queue,
    ) -> Self {
        self.queue = Some(queue);
        self
    }
}

/// Submitted mutations not yet applied.
struct Pending<T> {
    mutations: VecDeque<Mutation<T>>,
    /// A drain job is queued or running.
    draining: bool,
}

struct Shared<T> {
    label: String,
    value: RwLock<T>,
    pending: Mutex<Pending<T>>,
}

impl<T> Shared<T> {
    /// Apply queued mutations in submission order until none are left.
    fn drain(&self) {
        loop {
            let batch = {
                let mut pending = self.pending.lock();
                if pending.mutations.is_empty() {
                    pending.draining = false;
                    return;
                }
                std::mem::take(&mut pending.mutations)
            };

            let count = batch.len();
            let mut value = self.value.write();
            for mutation in batch {
                let result = panic::catch_unwind(AssertUnwindSafe(|| mutation(&mut *value)));
                if let Err(payload) = result {
                    error!(
                        target: "feige::sync",
                        lock = %self.label,
                        "mutation panicked: {}",
                        panic_message(payload.as_ref())
                    );
                }
            }
            drop(value);
            trace!(target: "feige::sync", lock = %self.label, count, "applied mutations");
        }
    }
}

/// Many readers, single writer generic lock.
///
/// Reads run concurrently and always see a value produced by a completed
/// mutation (or the initial value). Mutations are fire-and-forget: they are
/// queued and applied in order on the lock's queue, so a read issued right
/// after [`mutate`](Self::mutate) returns may not see that mutation yet.
pub struct ReadWriteLock<T> {
    shared: Arc<Shared<T>>,
    queue: Queue,
}

impl<T> ReadWriteLock<T>
where
    T: Send + Sync + 'static,
{
    /// Wrap `value`, draining mutations on the default global queue.
    pub fn new(value: T) -> Self {
        Self::with_options(value, LockOptions::default())
    }

    /// Wrap `value` with explicit options.
    pub fn with_options(
        value: T,
        options: LockOptions,
    ) -> Self {
        let label = options
            .label
            .unwrap_or_else(|| type_name::<T>().to_string());
        let queue = options
            .queue
            .unwrap_or_else(|| Queue::global(options.qos.unwrap_or_else(default_qos)));

        Self {
            shared: Arc::new(Shared {
                label,
                value: RwLock::new(value),
                pending: Mutex::new(Pending {
                    mutations: VecDeque::new(),
                    draining: false,
                }),
            }),
            queue,
        }
    }

    /// A snapshot of the current value.
    pub fn read(&self) -> T
    where
        T: Clone,
    {
        self.shared.value.read().clone()
    }

    /// Inspect the current value without cloning it.
    ///
    /// `f` runs under the read guard; it must not call [`mutate`](Self::mutate)
    /// and then wait for that mutation.
    pub fn read_with<R>(
        &self,
        f: impl FnOnce(&T) -> R,
    ) -> R {
        let value = self.shared.value.read();
        f(&*value)
    }

    /// Queue an exclusive mutation and return immediately.
    pub fn mutate<F>(
        &self,
        f: F,
    ) where
        F: FnOnce(&mut T) + Send + 'static,
    {
        let schedule = {
            let mut pending = self.shared.pending.lock();
            pending.mutations.push_back(Box::new(f));
            !std::mem::replace(&mut pending.draining, true)
        };

        if schedule {
            let shared = self.shared.clone();
            self.queue.async_run(move || shared.drain());
        }
    }

    /// Whether every submitted mutation has been applied.
    pub fn is_settled(&self) -> bool {
        let pending = self.shared.pending.lock();
        !pending.draining && pending.mutations.is_empty()
    }

    /// Label used in log records.
    #[inline]
    pub fn label(&self) -> &str {
        &self.shared.label
    }

    /// Queue mutations drain on.
    #[inline]
    pub fn queue(&self) -> &Queue {
        &self.queue
    }
}

impl<T> Default for ReadWriteLock<T>
where
    T: Default + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for ReadWriteLock<T> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let mut d = f.debug_struct("ReadWriteLock");
        d.field("label", &self.shared.label);
        match self.shared.value.try_read() {
            Some(value) => d.field("value", &*value),
            None => d.field("value", &format_args!("<writing>")),
        };
        d.field("queue", &self.queue.label()).finish()
    }
}
