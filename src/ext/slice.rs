//! Slice helpers.

/// Extra slice operations.
pub trait SliceExt<T> {
    /// The elements within `length` positions of `index`, on both sides.
    ///
    /// Returns at most `length * 2 + 1` elements, clipped to the slice bounds,
    /// or an empty slice if `index` is out of bounds.
    ///
    /// ```
    /// use feige::SliceExt;
    ///
    /// let v = [1, 2, 3, 4, 5];
    /// assert_eq!(v.subslice_with_middle_index(1, 2), &[1, 2, 3, 4]);
    /// ```
    fn subslice_with_middle_index(
        &self,
        index: usize,
        length: usize,
    ) -> &[T];

    /// As [`subslice_with_middle_index`](Self::subslice_with_middle_index),
    /// anchored at the first element equal to `value`.
    fn subslice_with_middle_element(
        &self,
        value: &T,
        length: usize,
    ) -> &[T]
    where
        T: PartialEq;
}

impl<T> SliceExt<T> for [T] {
    fn subslice_with_middle_index(
        &self,
        index: usize,
        length: usize,
    ) -> &[T] {
        if index >= self.len() {
            return &[];
        }
        let start = index.saturating_sub(length);
        let end = index.saturating_add(length).min(self.len() - 1);
        &self[start..=end]
    }

    fn subslice_with_middle_element(
        &self,
        value: &T,
        length: usize,
    ) -> &[T]
    where
        T: PartialEq,
    {
        match self.iter().position(|item| item == value) {
            Some(index) => self.subslice_with_middle_index(index, length),
            None => &[],
        }
    }
}
