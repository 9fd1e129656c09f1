//! Copy-on-write indirect reference.
//!
//! Lets a value type contain itself (through a pointer) while keeping value
//! semantics: clones share storage until one of them is written.
//!
//! ```
//! use feige::Indirect;
//!
//! #[derive(Clone, PartialEq, Eq, Hash)]
//! struct Node {
//!     id: u32,
//!     next: Option<Indirect<Node>>,
//! }
//!
//! let tail = Node { id: 2, next: None };
//! let head = Node { id: 1, next: Some(Indirect::new(tail)) };
//! assert_eq!(head.next.as_ref().map(|n| n.get().id), Some(2));
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Shared box with value semantics.
pub struct Indirect<T> {
    inner: Arc<T>,
}

impl<T> Indirect<T> {
    /// Box `value`.
    #[inline]
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }

    /// Borrow the referenced value.
    #[inline]
    pub fn get(&self) -> &T {
        &self.inner
    }

    /// Replace the referenced value. Other clones keep the old value.
    #[inline]
    pub fn set(
        &mut self,
        value: T,
    ) {
        match Arc::get_mut(&mut self.inner) {
            Some(slot) => *slot = value,
            None => self.inner = Arc::new(value),
        }
    }

    /// Whether this handle is the only one referencing its storage.
    #[inline]
    pub fn is_unique(&self) -> bool {
        Arc::strong_count(&self.inner) == 1
    }
}

impl<T: Clone> Indirect<T> {
    /// Mutable access, cloning the value first if it is shared.
    #[inline]
    pub fn get_mut(&mut self) -> &mut T {
        Arc::make_mut(&mut self.inner)
    }

    /// Take the value out, cloning it if it is shared.
    pub fn into_inner(self) -> T {
        Arc::try_unwrap(self.inner).unwrap_or_else(|shared| (*shared).clone())
    }
}

impl<T> Clone for Indirect<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Deref for Indirect<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T: PartialEq> PartialEq for Indirect<T> {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        *self.inner == *other.inner
    }
}

impl<T: Eq> Eq for Indirect<T> {}

impl<T: Hash> Hash for Indirect<T> {
    fn hash<H: Hasher>(
        &self,
        state: &mut H,
    ) {
        self.inner.hash(state);
    }
}

impl<T: fmt::Debug> fmt::Debug for Indirect<T> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_tuple("Indirect").field(&*self.inner).finish()
    }
}

impl<T> From<T> for Indirect<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}
