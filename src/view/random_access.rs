use std::cmp::Ordering;
use std::iter::FusedIterator;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::ptr;

/// A read-only cursor over a contiguous region owned by someone else.
///
/// The cursor is either within bounds (`offset < length`, dereferenceable)
/// or at the end (`offset == length`). Stepping outside that range is a
/// caller bug caught by `debug_assert!` in debug builds only.
///
/// Two views are equal when they point into the same resource at the same
/// offset. Views over different resources have no ordering.
#[derive(Debug)]
pub struct RandomAccessView<'a, T> {
    resource: &'a [T],
    offset: usize,
}

impl<'a, T> Clone for RandomAccessView<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for RandomAccessView<'a, T> {}

impl<'a, T> Default for RandomAccessView<'a, T> {
    fn default() -> Self {
        RandomAccessView { resource: &[], offset: 0 }
    }
}

impl<'a, T> RandomAccessView<'a, T> {
    /// A view positioned at the first element of `resource`.
    pub fn new(resource: &'a [T]) -> Self {
        RandomAccessView { resource, offset: 0 }
    }

    pub fn at(resource: &'a [T], offset: usize) -> Self {
        debug_assert!(
            offset <= resource.len(),
            "view offset {} past length {}",
            offset,
            resource.len()
        );
        RandomAccessView { resource, offset }
    }

    /// The end sentinel of `resource`.
    pub fn end(resource: &'a [T]) -> Self {
        RandomAccessView { resource, offset: resource.len() }
    }

    pub fn length(&self) -> usize {
        self.resource.len()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_end(&self) -> bool {
        self.offset == self.resource.len()
    }

    pub fn as_ptr(&self) -> *const T {
        self.resource.as_ptr()
    }

    /// The whole underlying region, independent of the current offset.
    pub fn resource(&self) -> &'a [T] {
        self.resource
    }

    /// Elements from the current offset to the end.
    pub fn remaining(&self) -> &'a [T] {
        &self.resource[self.offset..]
    }

    pub fn same_resource(&self, other: &Self) -> bool {
        ptr::eq(self.resource.as_ptr(), other.resource.as_ptr())
    }

    /// The element under the cursor.
    #[inline]
    pub fn get(&self) -> &'a T {
        debug_assert!(self.offset < self.resource.len(), "dereferenced an end view");
        &self.resource[self.offset]
    }

    /// The element under the cursor, without a bounds check in release builds.
    ///
    /// # Safety
    /// The view must not be at the end (`offset < length`).
    #[inline]
    pub unsafe fn get_unchecked(&self) -> &'a T {
        debug_assert!(self.offset < self.resource.len(), "dereferenced an end view");
        self.resource.get_unchecked(self.offset)
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    #[inline]
    pub fn advance(&mut self) -> &mut Self {
        self.offset += 1;
        debug_assert!(self.offset <= self.resource.len(), "advanced past the end");
        self
    }

    #[inline]
    pub fn retreat(&mut self) -> &mut Self {
        debug_assert!(self.offset > 0, "retreated before the start");
        self.offset = self.offset.wrapping_sub(1);
        self
    }
}

impl<'a, T> PartialEq for RandomAccessView<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        self.same_resource(other) && self.offset == other.offset
    }
}

impl<'a, T> Eq for RandomAccessView<'a, T> {}

impl<'a, T> PartialOrd for RandomAccessView<'a, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.same_resource(other) {
            Some(self.offset.cmp(&other.offset))
        } else {
            None
        }
    }
}

impl<'a, T> Add<usize> for RandomAccessView<'a, T> {
    type Output = Self;

    fn add(self, n: usize) -> Self {
        debug_assert!(self.offset + n <= self.resource.len(), "view moved past the end");
        RandomAccessView { resource: self.resource, offset: self.offset + n }
    }
}

impl<'a, T> Sub<usize> for RandomAccessView<'a, T> {
    type Output = Self;

    fn sub(self, n: usize) -> Self {
        debug_assert!(n <= self.offset, "view moved before the start");
        RandomAccessView { resource: self.resource, offset: self.offset.wrapping_sub(n) }
    }
}

impl<'a, T> AddAssign<usize> for RandomAccessView<'a, T> {
    fn add_assign(&mut self, n: usize) {
        *self = *self + n;
    }
}

impl<'a, T> SubAssign<usize> for RandomAccessView<'a, T> {
    fn sub_assign(&mut self, n: usize) {
        *self = *self - n;
    }
}

/// Signed distance between two views over the same resource.
impl<'a, T> Sub for RandomAccessView<'a, T> {
    type Output = isize;

    fn sub(self, other: Self) -> isize {
        debug_assert!(
            self.same_resource(&other),
            "distance between views over different resources"
        );
        self.offset as isize - other.offset as isize
    }
}

impl<'a, T> Iterator for RandomAccessView<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        let item = self.resource.get(self.offset)?;
        self.offset += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.resource.len().saturating_sub(self.offset);
        (n, Some(n))
    }
}

impl<'a, T> ExactSizeIterator for RandomAccessView<'a, T> {}

impl<'a, T> FusedIterator for RandomAccessView<'a, T> {}

/// The writable counterpart of [`RandomAccessView`].
///
/// Only obtainable from a mutable borrow of the owner, so a shared
/// container can never hand one out.
#[derive(Debug)]
pub struct RandomAccessViewMut<'a, T> {
    resource: &'a mut [T],
    offset: usize,
}

impl<'a, T> Default for RandomAccessViewMut<'a, T> {
    fn default() -> Self {
        RandomAccessViewMut { resource: Default::default(), offset: 0 }
    }
}

impl<'a, T> RandomAccessViewMut<'a, T> {
    pub fn new(resource: &'a mut [T]) -> Self {
        RandomAccessViewMut { resource, offset: 0 }
    }

    pub fn at(resource: &'a mut [T], offset: usize) -> Self {
        debug_assert!(
            offset <= resource.len(),
            "view offset {} past length {}",
            offset,
            resource.len()
        );
        RandomAccessViewMut { resource, offset }
    }

    pub fn length(&self) -> usize {
        self.resource.len()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_end(&self) -> bool {
        self.offset == self.resource.len()
    }

    pub fn as_ptr(&self) -> *const T {
        self.resource.as_ptr()
    }

    #[inline]
    pub fn get(&self) -> &T {
        debug_assert!(self.offset < self.resource.len(), "dereferenced an end view");
        &self.resource[self.offset]
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut T {
        debug_assert!(self.offset < self.resource.len(), "dereferenced an end view");
        &mut self.resource[self.offset]
    }

    pub fn set(&mut self, value: T) {
        *self.get_mut() = value;
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    #[inline]
    pub fn advance(&mut self) -> &mut Self {
        self.offset += 1;
        debug_assert!(self.offset <= self.resource.len(), "advanced past the end");
        self
    }

    #[inline]
    pub fn retreat(&mut self) -> &mut Self {
        debug_assert!(self.offset > 0, "retreated before the start");
        self.offset = self.offset.wrapping_sub(1);
        self
    }

    /// A read-only view at the same position, borrowing this one.
    pub fn as_view(&self) -> RandomAccessView<'_, T> {
        RandomAccessView { resource: self.resource, offset: self.offset }
    }

    pub fn into_view(self) -> RandomAccessView<'a, T> {
        RandomAccessView { resource: self.resource, offset: self.offset }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_view_is_empty_and_at_end() {
        let view: RandomAccessView<'_, u8> = RandomAccessView::default();
        assert_eq!(view.length(), 0);
        assert_eq!(view.offset(), 0);
        assert!(view.is_end());
        assert_eq!(view.count(), 0);
    }

    #[test]
    fn steps_and_dereferences() {
        let data = [10, 20, 30];
        let mut view = RandomAccessView::new(&data);
        assert_eq!(*view.get(), 10);
        view.advance().advance();
        assert_eq!(*view.get(), 30);
        view.retreat();
        assert_eq!(*view.get(), 20);
        assert_eq!(unsafe { *view.get_unchecked() }, 20);
        view.advance().advance();
        assert!(view.is_end());
        assert_eq!(view, RandomAccessView::end(&data));
        view.reset();
        assert_eq!(view.offset(), 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "advanced past the end")]
    fn advancing_past_end_is_caught_in_debug() {
        let data = [1u8];
        let mut view = RandomAccessView::end(&data);
        view.advance();
    }

    #[test]
    fn mutable_view_writes_through() {
        let mut data = vec![1, 2, 3];
        {
            let mut view = RandomAccessViewMut::new(&mut data);
            while !view.is_end() {
                let doubled = *view.get() * 2;
                view.set(doubled);
                view.advance();
            }
            assert_eq!(view.as_view().offset(), 3);
        }
        assert_eq!(data, [2, 4, 6]);
    }
}
