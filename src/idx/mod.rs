pub mod header;
pub mod images;
pub mod labels;
pub mod pair;
mod storage;

pub use header::{DataType, IdxKind, IMAGE_MAGIC, LABEL_MAGIC};
pub use images::IdxImageSet;
pub use labels::IdxLabelSet;
pub use pair::LabeledImages;
