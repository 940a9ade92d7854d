use std::fmt;
use std::path::Path;

use crate::config::LoadConfig;
use crate::error::IdxError;
use crate::idx::header::{self, IdxKind, LABEL_HEADER_LEN, LABEL_MAGIC};
use crate::idx::storage::copy_reusing;
use crate::io::{ByteSource, FileSystem};
use crate::view::{RandomAccessView, RandomAccessViewMut};

/// An idx1 label file held in memory.
///
/// The whole file lives in one owned buffer; [`labels`](Self::labels) is a
/// slice into it starting right after the 8-byte header, so no payload is
/// ever copied out of the file buffer.
///
/// A failed load produces the default value (magic 0, count 0, no buffer),
/// which is safe to iterate, clone and drop. Check [`is_usable`](Self::is_usable)
/// before trusting a freshly loaded set.
///
/// # Layout
/// ```text
/// bytes 0-3:  0x00000801  (magic, big-endian)
/// bytes 4-7:  N           (label count, big-endian u32)
/// bytes 8..:  N bytes, one label each
/// ```
#[derive(Debug, Default)]
pub struct IdxLabelSet {
    magic: u32,
    count: u32,
    storage: Vec<u8>,
}

impl IdxLabelSet {
    /// Loads `path` from the file system with the default [`LoadConfig`].
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::open_with(&FileSystem, path, &LoadConfig::default())
    }

    /// Loads `path` through `source`. On any failure the error is logged and
    /// the default (empty) set is returned.
    pub fn open_with(
        source: &impl ByteSource,
        path: impl AsRef<Path>,
        config: &LoadConfig,
    ) -> Self {
        let path = path.as_ref();
        Self::try_open_with(source, path, config).unwrap_or_else(|e| {
            tracing::error!("Loading idx1 '{}' failed, set left empty: {}", path.display(), e);
            Self::default()
        })
    }

    pub fn try_open_with(
        source: &impl ByteSource,
        path: impl AsRef<Path>,
        config: &LoadConfig,
    ) -> Result<Self, IdxError> {
        let path = path.as_ref();
        let bytes = source
            .read(path)
            .ok_or_else(|| IdxError::ReadFailed { path: path.to_path_buf() })?;
        Self::try_from_bytes(bytes, config)
    }

    /// Takes ownership of an in-memory idx1 buffer. On failure the error is
    /// logged and the default (empty) set is returned.
    pub fn from_bytes(bytes: Vec<u8>, config: &LoadConfig) -> Self {
        Self::try_from_bytes(bytes, config).unwrap_or_else(|e| {
            tracing::error!("Parsing idx1 buffer failed, set left empty: {}", e);
            Self::default()
        })
    }

    pub fn try_from_bytes(bytes: Vec<u8>, config: &LoadConfig) -> Result<Self, IdxError> {
        let magic = header::validate_header(&bytes, IdxKind::Labels, config)?;
        let count = header::read_be_u32(&bytes, 4);
        header::validate_payload(bytes.len(), LABEL_HEADER_LEN, count as usize, config)?;

        tracing::debug!("Parsed idx1: magic={} count={}", magic, count);
        Ok(IdxLabelSet { magic, count, storage: bytes })
    }

    /// Builds a set from raw label values, writing a fresh header.
    pub fn from_labels(labels: &[u8]) -> Result<Self, IdxError> {
        let count = u32::try_from(labels.len()).map_err(|_| IdxError::Overflow)?;
        let mut storage = Vec::with_capacity(LABEL_HEADER_LEN + labels.len());
        header::push_be_u32(&mut storage, LABEL_MAGIC);
        header::push_be_u32(&mut storage, count);
        storage.extend_from_slice(labels);
        Ok(IdxLabelSet { magic: LABEL_MAGIC, count, storage })
    }

    pub fn magic(&self) -> u32 {
        self.magic
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// `true` once a valid header has been parsed.
    pub fn is_usable(&self) -> bool {
        self.magic != 0
    }

    /// `true` while the set owns an allocation.
    pub fn has_buffer(&self) -> bool {
        self.storage.capacity() != 0
    }

    /// Header plus the declared payload, ready to be written back to disk.
    pub fn as_bytes(&self) -> &[u8] {
        if self.storage.is_empty() {
            &[]
        } else {
            &self.storage[..LABEL_HEADER_LEN + self.count as usize]
        }
    }

    pub fn labels(&self) -> &[u8] {
        if self.storage.is_empty() {
            &[]
        } else {
            &self.storage[LABEL_HEADER_LEN..LABEL_HEADER_LEN + self.count as usize]
        }
    }

    pub fn labels_mut(&mut self) -> &mut [u8] {
        if self.storage.is_empty() {
            Default::default()
        } else {
            let end = LABEL_HEADER_LEN + self.count as usize;
            &mut self.storage[LABEL_HEADER_LEN..end]
        }
    }

    pub fn iter(&self) -> RandomAccessView<'_, u8> {
        RandomAccessView::new(self.labels())
    }

    /// The end sentinel matching [`iter`](Self::iter).
    pub fn end(&self) -> RandomAccessView<'_, u8> {
        RandomAccessView::end(self.labels())
    }

    pub fn iter_mut(&mut self) -> RandomAccessViewMut<'_, u8> {
        RandomAccessViewMut::new(self.labels_mut())
    }

    /// Copies the labels into a vector of a wider numeric type. Every `U`
    /// with `From<u8>` represents each label exactly.
    pub fn labels_as<U: From<u8>>(&self) -> Vec<U> {
        self.labels().iter().map(|&l| U::from(l)).collect()
    }

    /// Moves the contents out, leaving `self` in the default state.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Writes header and labels to `path` through `sink`.
    pub fn save(&self, sink: &impl ByteSource, path: impl AsRef<Path>) -> bool {
        sink.write(path.as_ref(), self.as_bytes())
    }
}

impl Clone for IdxLabelSet {
    fn clone(&self) -> Self {
        IdxLabelSet {
            magic: self.magic,
            count: self.count,
            storage: self.as_bytes().to_vec(),
        }
    }

    /// Reuses the existing buffer when it already holds at least
    /// `8 + source.count()` bytes; the unused tail is zeroed.
    fn clone_from(&mut self, source: &Self) {
        if copy_reusing(&mut self.storage, source.as_bytes()) {
            tracing::debug!("idx1 copy reused a {} byte buffer", self.storage.len());
        }
        self.magic = source.magic;
        self.count = source.count;
    }
}

impl PartialEq for IdxLabelSet {
    fn eq(&self, other: &Self) -> bool {
        self.magic == other.magic && self.count == other.count && self.labels() == other.labels()
    }
}

impl Eq for IdxLabelSet {}

impl<'a> IntoIterator for &'a IdxLabelSet {
    type Item = &'a u8;
    type IntoIter = RandomAccessView<'a, u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for IdxLabelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "idx1 [magic {}, count {}]", self.magic, self.count)
    }
}
