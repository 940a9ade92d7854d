//! Bounds-aware cursors shared by the IDX containers and [`crate::Matrix`].

pub mod random_access;
pub mod strided;

pub use random_access::{RandomAccessView, RandomAccessViewMut};
pub use strided::StridedView;
