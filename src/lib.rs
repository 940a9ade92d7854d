pub mod config;
pub mod error;
pub mod idx;
pub mod io;
pub mod math;
pub mod view;

// Convenience re-exports
pub use config::LoadConfig;
pub use error::{IdxError, MatrixError};
pub use idx::{IdxImageSet, IdxKind, IdxLabelSet, LabeledImages};
pub use io::{ByteSource, FileSystem, MemoryStore};
pub use math::matrix::Matrix;
pub use view::{RandomAccessView, RandomAccessViewMut, StridedView};
