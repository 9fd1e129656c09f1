//! Emptiness helpers.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use indexmap::{IndexMap, IndexSet};

/// Something that can be empty.
pub trait Emptyable {
    /// Whether the receiver is empty.
    fn is_empty(&self) -> bool;

    /// Whether the receiver is **not** empty.
    #[inline]
    fn is_not_empty(&self) -> bool {
        !Emptyable::is_empty(self)
    }

    /// `None` if the receiver is empty, otherwise `Some(self)`.
    #[inline]
    fn none_if_empty(self) -> Option<Self>
    where
        Self: Sized,
    {
        if Emptyable::is_empty(&self) {
            None
        } else {
            Some(self)
        }
    }
}

macro_rules! impl_emptyable {
    ($(impl[$($g:tt)*] $ty:ty;)*) => {
        $(
            impl<$($g)*> Emptyable for $ty {
                #[inline]
                fn is_empty(&self) -> bool {
                    <$ty>::is_empty(self)
                }
            }
        )*
    };
}

impl_emptyable! {
    impl[] String;
    impl[] str;
    impl[T] Vec<T>;
    impl[T] [T];
    impl[T] VecDeque<T>;
    impl[K, V, S] HashMap<K, V, S>;
    impl[T, S] HashSet<T, S>;
    impl[K, V] BTreeMap<K, V>;
    impl[T] BTreeSet<T>;
    impl[K, V, S] IndexMap<K, V, S>;
    impl[T, S] IndexSet<T, S>;
}

impl Emptyable for &str {
    #[inline]
    fn is_empty(&self) -> bool {
        str::is_empty(self)
    }
}

impl<T> Emptyable for &[T] {
    #[inline]
    fn is_empty(&self) -> bool {
        <[T]>::is_empty(self)
    }
}

/// Helpers on optional emptyable values.
pub trait OptionEmptyExt<E> {
    /// `true` for `None` or an empty value.
    fn is_empty_or_none(&self) -> bool;

    /// `true` for a non-empty `Some`.
    fn is_not_empty_or_none(&self) -> bool {
        !self.is_empty_or_none()
    }

    /// The wrapped value, or the empty value for `None`.
    ///
    /// ```
    /// use feige::OptionEmptyExt;
    ///
    /// let value: Option<String> = None;
    /// assert_eq!(value.value_or_empty(), "");
    /// ```
    fn value_or_empty(self) -> E
    where
        E: Default;
}

impl<E: Emptyable> OptionEmptyExt<E> for Option<E> {
    #[inline]
    fn is_empty_or_none(&self) -> bool {
        match self {
            Some(value) => Emptyable::is_empty(value),
            None => true,
        }
    }

    #[inline]
    fn value_or_empty(self) -> E
    where
        E: Default,
    {
        self.unwrap_or_default()
    }
}
