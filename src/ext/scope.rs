//! Kotlin-style scope functions.
//!
//! See <https://kotlinlang.org/docs/scope-functions.html>.

/// Invoke `f` and return its result.
///
/// ```
/// let retval = feige::run(|| {
///     let x = 2;
///     x * 21
/// });
/// assert_eq!(retval, 42);
/// ```
#[inline(always)]
pub fn run<T>(f: impl FnOnce() -> T) -> T {
    f()
}

/// Scope functions, implemented for every sized type.
pub trait ScopeFunctions: Sized {
    /// Pass the receiver to `f` and return `f`'s result (Kotlin's `let`).
    ///
    /// ```
    /// use feige::ScopeFunctions;
    ///
    /// let len = String::from("feige").let_in(|s| s.len());
    /// assert_eq!(len, 5);
    /// ```
    #[inline(always)]
    fn let_in<R>(
        self,
        f: impl FnOnce(Self) -> R,
    ) -> R {
        f(self)
    }

    /// Let `f` configure the receiver, then return it.
    ///
    /// ```
    /// use feige::ScopeFunctions;
    ///
    /// let v = Vec::new().also(|v| v.push(1));
    /// assert_eq!(v, vec![1]);
    /// ```
    #[inline(always)]
    fn also(
        mut self,
        f: impl FnOnce(&mut Self),
    ) -> Self {
        f(&mut self);
        self
    }

    /// `Some(self)` if `predicate` holds, otherwise `None`.
    #[inline(always)]
    fn take_if(
        self,
        predicate: impl FnOnce(&Self) -> bool,
    ) -> Option<Self> {
        if predicate(&self) {
            Some(self)
        } else {
            None
        }
    }

    /// `None` if `predicate` holds, otherwise `Some(self)`.
    #[inline(always)]
    fn take_unless(
        self,
        predicate: impl FnOnce(&Self) -> bool,
    ) -> Option<Self> {
        if predicate(&self) {
            None
        } else {
            Some(self)
        }
    }
}

impl<T> ScopeFunctions for T {}
