use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Whole-file byte I/O used by the IDX containers.
///
/// Neither operation panics or returns an error value: a failed read is
/// `None`, a failed write is `false`. Implementations report the cause
/// through `tracing`.
pub trait ByteSource {
    /// Reads the entire file at `path` into an owned buffer.
    fn read(&self, path: &Path) -> Option<Vec<u8>>;

    /// Writes `bytes` to `path`, replacing any existing file.
    fn write(&self, path: &Path, bytes: &[u8]) -> bool;
}

/// `ByteSource` backed by the local file system.
///
/// A write that fails midway may leave a truncated file behind; no
/// temp-file-and-rename is attempted.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSystem;

impl ByteSource for FileSystem {
    fn read(&self, path: &Path) -> Option<Vec<u8>> {
        match std::fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::error!("Cannot read '{}': {}", path.display(), e);
                None
            }
        }
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> bool {
        match std::fs::write(path, bytes) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Cannot write '{}': {}", path.display(), e);
                false
            }
        }
    }
}

/// In-memory `ByteSource`, keyed by path. Single-threaded.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RefCell<HashMap<PathBuf, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Stores `bytes` under `path`, replacing any previous entry.
    pub fn insert(&self, path: impl Into<PathBuf>, bytes: Vec<u8>) {
        self.files.borrow_mut().insert(path.into(), bytes);
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.borrow().is_empty()
    }
}

impl ByteSource for MemoryStore {
    fn read(&self, path: &Path) -> Option<Vec<u8>> {
        let found = self.files.borrow().get(path).cloned();
        if found.is_none() {
            tracing::error!("No in-memory file at '{}'", path.display());
        }
        found
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> bool {
        self.files.borrow_mut().insert(path.to_path_buf(), bytes.to_vec());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_bytes() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert!(store.write(Path::new("a.idx"), &[1, 2, 3]));
        assert_eq!(store.read(Path::new("a.idx")), Some(vec![1, 2, 3]));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn inserted_files_are_readable() {
        let store = MemoryStore::new();
        store.insert("train-labels-idx1-ubyte", vec![0, 0, 8, 1]);
        assert!(store.contains(Path::new("train-labels-idx1-ubyte")));
        assert!(!store.contains(Path::new("t10k-labels-idx1-ubyte")));
        store.insert("train-labels-idx1-ubyte", vec![9]);
        assert_eq!(store.read(Path::new("train-labels-idx1-ubyte")), Some(vec![9]));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn missing_file_reads_as_none() {
        assert_eq!(MemoryStore::new().read(Path::new("missing")), None);
        assert_eq!(FileSystem.read(Path::new("/definitely/not/here.idx")), None);
    }
}
