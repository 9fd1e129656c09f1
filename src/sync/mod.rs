//! Guarded values
//!
//! [`ReadWriteLock`] gives many readers and one writer access to a single
//! value. Reads are synchronous and may run in parallel. Writes are submitted
//! fire-and-forget and applied one batch at a time on the lock's queue, in the
//! order they were submitted.
//!
//! ```
//! use feige::ReadWriteLock;
//!
//! let lock = ReadWriteLock::new(Vec::<u32>::new());
//! lock.mutate(|v| v.push(1));
//! lock.mutate(|v| v.push(2));
//! // `mutate` does not wait; a read may still see an older snapshot.
//! let snapshot = lock.read();
//! assert!(snapshot.len() <= 2);
//! ```

mod lock;

pub use lock::{default_qos, set_default_qos, LockOptions, ReadWriteLock};
