pub mod byte_source;

pub use byte_source::{ByteSource, FileSystem, MemoryStore};
