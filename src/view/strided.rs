use std::cmp::Ordering;
use std::iter::FusedIterator;
use std::ops::{Add, Sub};
use std::ptr;

/// A read-only cursor that steps `stride` elements at a time.
///
/// Used to walk one column of row-major data: start at the column index,
/// step by the column count. The offsets it visits form a *lane*
/// (`lane, lane + stride, lane + 2*stride, ...`).
///
/// Unlike [`RandomAccessView`](super::RandomAccessView), stepping forward
/// never overshoots: an advance that would pass `length` lands exactly on
/// `length`, which is the end sentinel. Stepping back from the end lands on
/// the last element of the lane. `stride` does not take part in
/// comparisons.
#[derive(Debug)]
pub struct StridedView<'a, T> {
    resource: &'a [T],
    offset: usize,
    stride: usize,
    lane: usize,
}

impl<'a, T> Clone for StridedView<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for StridedView<'a, T> {}

impl<'a, T> Default for StridedView<'a, T> {
    fn default() -> Self {
        StridedView { resource: &[], offset: 0, stride: 1, lane: 0 }
    }
}

impl<'a, T> StridedView<'a, T> {
    /// A view at `start`, stepping by `stride`. `stride` must be positive.
    pub fn new(resource: &'a [T], start: usize, stride: usize) -> Self {
        debug_assert!(stride > 0, "stride must be positive");
        debug_assert!(
            start <= resource.len(),
            "view offset {} past length {}",
            start,
            resource.len()
        );
        let stride = stride.max(1);
        let offset = start.min(resource.len());
        StridedView { resource, offset, stride, lane: offset % stride }
    }

    /// The end sentinel of the lane starting at `start`.
    pub fn end(resource: &'a [T], start: usize, stride: usize) -> Self {
        let mut view = StridedView::new(resource, start, stride);
        view.offset = resource.len();
        view
    }

    pub fn length(&self) -> usize {
        self.resource.len()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn lane(&self) -> usize {
        self.lane
    }

    pub fn is_end(&self) -> bool {
        self.offset >= self.resource.len()
    }

    pub fn as_ptr(&self) -> *const T {
        self.resource.as_ptr()
    }

    pub fn same_resource(&self, other: &Self) -> bool {
        ptr::eq(self.resource.as_ptr(), other.resource.as_ptr())
    }

    #[inline]
    pub fn get(&self) -> &'a T {
        debug_assert!(self.offset < self.resource.len(), "dereferenced an end view");
        &self.resource[self.offset]
    }

    pub fn reset(&mut self) {
        self.offset = self.lane.min(self.resource.len());
    }

    #[inline]
    pub fn advance(&mut self) -> &mut Self {
        self.offset = self.offset.saturating_add(self.stride).min(self.resource.len());
        self
    }

    #[inline]
    pub fn retreat(&mut self) -> &mut Self {
        if self.is_end() {
            debug_assert!(self.lane < self.resource.len(), "retreated into an empty lane");
            self.offset = self.last_in_lane();
        } else {
            debug_assert!(self.offset >= self.lane + self.stride, "retreated before the start");
            self.offset = self.offset.wrapping_sub(self.stride);
        }
        self
    }

    fn last_in_lane(&self) -> usize {
        let len = self.resource.len();
        self.lane + (len.saturating_sub(1).saturating_sub(self.lane) / self.stride) * self.stride
    }

    /// Number of lane steps from the lane start to the current position.
    fn steps(&self) -> usize {
        let len = self.resource.len();
        if self.offset >= len {
            len.saturating_sub(self.lane).div_ceil(self.stride)
        } else {
            self.offset.saturating_sub(self.lane) / self.stride
        }
    }

    fn total_steps(&self) -> usize {
        self.resource.len().saturating_sub(self.lane).div_ceil(self.stride)
    }
}

impl<'a, T> PartialEq for StridedView<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        self.same_resource(other) && self.offset == other.offset
    }
}

impl<'a, T> Eq for StridedView<'a, T> {}

impl<'a, T> PartialOrd for StridedView<'a, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.same_resource(other) {
            Some(self.offset.cmp(&other.offset))
        } else {
            None
        }
    }
}

/// Moves `n` lane steps forward, clamping at the end.
impl<'a, T> Add<usize> for StridedView<'a, T> {
    type Output = Self;

    fn add(self, n: usize) -> Self {
        let offset = self
            .offset
            .saturating_add(n.saturating_mul(self.stride))
            .min(self.resource.len());
        StridedView { offset, ..self }
    }
}

/// Moves `n` lane steps back; from the end the first step lands on the last
/// element of the lane.
impl<'a, T> Sub<usize> for StridedView<'a, T> {
    type Output = Self;

    fn sub(self, n: usize) -> Self {
        debug_assert!(n <= self.steps(), "view moved before the start");
        let mut view = self;
        if n == 0 {
            return view;
        }
        if view.is_end() {
            view.offset = view.last_in_lane();
            view.offset = view.offset.wrapping_sub((n - 1).wrapping_mul(view.stride));
        } else {
            view.offset = view.offset.wrapping_sub(n.wrapping_mul(view.stride));
        }
        view
    }
}

/// Signed distance, in lane steps, between two views over the same resource.
impl<'a, T> Sub for StridedView<'a, T> {
    type Output = isize;

    fn sub(self, other: Self) -> isize {
        debug_assert!(
            self.same_resource(&other),
            "distance between views over different resources"
        );
        debug_assert!(self.stride == other.stride, "distance between views with different strides");
        self.steps() as isize - other.steps() as isize
    }
}

impl<'a, T> Iterator for StridedView<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        let item = self.resource.get(self.offset)?;
        self.advance();
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.total_steps() - self.steps();
        (n, Some(n))
    }
}

impl<'a, T> ExactSizeIterator for StridedView<'a, T> {}

impl<'a, T> FusedIterator for StridedView<'a, T> {}
