use std::fmt;
use std::path::Path;

use crate::config::LoadConfig;
use crate::error::{IdxError, MatrixError};
use crate::idx::header::{self, IdxKind, IMAGE_HEADER_LEN, IMAGE_MAGIC};
use crate::idx::storage::copy_reusing;
use crate::io::{ByteSource, FileSystem};
use crate::math::matrix::Matrix;
use crate::view::{RandomAccessView, RandomAccessViewMut};

/// An idx3 image file held in memory.
///
/// Same ownership model as [`IdxLabelSet`](super::IdxLabelSet): one owned
/// buffer holding the whole file, with [`pixels`](Self::pixels) aliasing the
/// bytes after the 16-byte header. The pixel view has
/// `count * rows * cols` elements, images stored back to back, each one
/// row-major.
///
/// # Layout
/// ```text
/// bytes  0-3:   0x00000803  (magic, big-endian)
/// bytes  4-7:   N           (image count)
/// bytes  8-11:  rows        (image height in pixels)
/// bytes 12-15:  cols        (image width in pixels)
/// bytes 16..:   N * rows * cols bytes
/// ```
#[derive(Debug, Default)]
pub struct IdxImageSet {
    magic: u32,
    count: u32,
    rows: u32,
    cols: u32,
    storage: Vec<u8>,
}

impl IdxImageSet {
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
            tracing::error!("Loading idx3 '{}' failed, set left empty: {}", path.display(), e);
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

    /// Takes ownership of an in-memory idx3 buffer. On failure the error is
    /// logged and the default (empty) set is returned.
    pub fn from_bytes(bytes: Vec<u8>, config: &LoadConfig) -> Self {
        Self::try_from_bytes(bytes, config).unwrap_or_else(|e| {
            tracing::error!("Parsing idx3 buffer failed, set left empty: {}", e);
            Self::default()
        })
    }

    pub fn try_from_bytes(bytes: Vec<u8>, config: &LoadConfig) -> Result<Self, IdxError> {
        let magic = header::validate_header(&bytes, IdxKind::Images, config)?;
        let count = header::read_be_u32(&bytes, 4);
        let rows = header::read_be_u32(&bytes, 8);
        let cols = header::read_be_u32(&bytes, 12);

        let payload = pixel_count(count, rows, cols)?;
        header::validate_payload(bytes.len(), IMAGE_HEADER_LEN, payload, config)?;

        tracing::debug!("Parsed idx3: magic={} count={} shape=({}, {})", magic, count, rows, cols);
        Ok(IdxImageSet { magic, count, rows, cols, storage: bytes })
    }

    /// Builds a set of `rows x cols` images from back-to-back pixel data,
    /// writing a fresh header.
    pub fn from_pixels(rows: u32, cols: u32, pixels: &[u8]) -> Result<Self, IdxError> {
        let image_len = (rows as usize)
            .checked_mul(cols as usize)
            .ok_or(IdxError::Overflow)?;
        let ragged = IdxError::RaggedPixels { len: pixels.len(), rows, cols };
        let count = match image_len {
            0 if pixels.is_empty() => 0,
            0 => return Err(ragged),
            n if pixels.len() % n != 0 => return Err(ragged),
            n => u32::try_from(pixels.len() / n).map_err(|_| IdxError::Overflow)?,
        };

        let mut storage = Vec::with_capacity(IMAGE_HEADER_LEN + pixels.len());
        header::push_be_u32(&mut storage, IMAGE_MAGIC);
        header::push_be_u32(&mut storage, count);
        header::push_be_u32(&mut storage, rows);
        header::push_be_u32(&mut storage, cols);
        storage.extend_from_slice(pixels);
        Ok(IdxImageSet { magic: IMAGE_MAGIC, count, rows, cols, storage })
    }

    pub fn magic(&self) -> u32 {
        self.magic
    }

    /// Number of images.
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// `(rows, cols)` of a single image.
    pub fn dim(&self) -> (u32, u32) {
        (self.rows, self.cols)
    }

    /// Pixels per image.
    pub fn image_len(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Total pixel count, `count * rows * cols`.
    pub fn len(&self) -> usize {
        self.count as usize * self.image_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_usable(&self) -> bool {
        self.magic != 0
    }

    pub fn has_buffer(&self) -> bool {
        self.storage.capacity() != 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        if self.storage.is_empty() {
            &[]
        } else {
            &self.storage[..IMAGE_HEADER_LEN + self.len()]
        }
    }

    pub fn pixels(&self) -> &[u8] {
        if self.storage.is_empty() {
            &[]
        } else {
            &self.storage[IMAGE_HEADER_LEN..IMAGE_HEADER_LEN + self.len()]
        }
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        if self.storage.is_empty() {
            Default::default()
        } else {
            let end = IMAGE_HEADER_LEN + self.len();
            &mut self.storage[IMAGE_HEADER_LEN..end]
        }
    }

    /// Pixels of the `index`-th image, row-major.
    pub fn image(&self, index: usize) -> Option<&[u8]> {
        if index >= self.count as usize {
            return None;
        }
        let n = self.image_len();
        self.pixels().get(index * n..(index + 1) * n)
    }

    pub fn image_view(&self, index: usize) -> Option<RandomAccessView<'_, u8>> {
        self.image(index).map(RandomAccessView::new)
    }

    /// Iterates over the images as `rows * cols` slices. Always yields
    /// `count` items, empty ones when the images have no pixels.
    pub fn images(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        let pixels = self.pixels();
        let n = self.image_len();
        (0..self.count as usize).map(move |i| &pixels[i * n..(i + 1) * n])
    }

    pub fn iter(&self) -> RandomAccessView<'_, u8> {
        RandomAccessView::new(self.pixels())
    }

    pub fn end(&self) -> RandomAccessView<'_, u8> {
        RandomAccessView::end(self.pixels())
    }

    pub fn iter_mut(&mut self) -> RandomAccessViewMut<'_, u8> {
        RandomAccessViewMut::new(self.pixels_mut())
    }

    pub fn pixels_as<U: From<u8>>(&self) -> Vec<U> {
        self.pixels().iter().map(|&p| U::from(p)).collect()
    }

    /// One image per row, pixels scaled from `[0, 255]` to `[0.0, 1.0]`.
    pub fn to_matrix(&self) -> Result<Matrix<f64>, MatrixError> {
        let data = self.pixels().iter().map(|&p| p as f64 / 255.0).collect();
        Matrix::from_vec(self.count as usize, self.image_len(), data)
    }

    /// Writes the `index`-th image as an 8-bit grayscale PNG.
    pub fn export_png(&self, index: usize, path: impl AsRef<Path>) -> Result<(), IdxError> {
        let out_of_range = || IdxError::ImageOutOfRange { index, count: self.count as usize };
        let pixels = self.image(index).ok_or_else(out_of_range)?;
        let img = image::GrayImage::from_raw(self.cols, self.rows, pixels.to_vec())
            .ok_or_else(out_of_range)?;
        img.save(path)?;
        Ok(())
    }

    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    pub fn save(&self, sink: &impl ByteSource, path: impl AsRef<Path>) -> bool {
        sink.write(path.as_ref(), self.as_bytes())
    }
}

fn pixel_count(count: u32, rows: u32, cols: u32) -> Result<usize, IdxError> {
    (count as usize)
        .checked_mul(rows as usize)
        .and_then(|n| n.checked_mul(cols as usize))
        .ok_or(IdxError::Overflow)
}

impl Clone for IdxImageSet {
    fn clone(&self) -> Self {
        IdxImageSet {
            magic: self.magic,
            count: self.count,
            rows: self.rows,
            cols: self.cols,
            storage: self.as_bytes().to_vec(),
        }
    }

    /// Reuses the existing buffer when it already holds at least
    /// `16 + count * rows * cols` bytes of the source; the unused tail is
    /// zeroed.
    fn clone_from(&mut self, source: &Self) {
        if copy_reusing(&mut self.storage, source.as_bytes()) {
            tracing::debug!("idx3 copy reused a {} byte buffer", self.storage.len());
        }
        self.magic = source.magic;
        self.count = source.count;
        self.rows = source.rows;
        self.cols = source.cols;
    }
}

impl PartialEq for IdxImageSet {
    fn eq(&self, other: &Self) -> bool {
        self.magic == other.magic
            && self.count == other.count
            && self.dim() == other.dim()
            && self.pixels() == other.pixels()
    }
}

impl Eq for IdxImageSet {}

impl<'a> IntoIterator for &'a IdxImageSet {
    type Item = &'a u8;
    type IntoIter = RandomAccessView<'a, u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for IdxImageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "idx3 [magic {}, count {} ({}, {})]",
            self.magic, self.count, self.rows, self.cols
        )
    }
}
