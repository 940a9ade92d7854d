use num_traits::{Num, Zero};
use rand::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::f64::consts::PI;
use std::ops::{Add, Sub, Mul, Index, IndexMut};

use crate::error::MatrixError;
use crate::view::{RandomAccessView, RandomAccessViewMut, StridedView};

// Contiguous row-major storage. Element (r, c) lives at data[r * cols + c]
// and data.len() == rows * cols at all times.
#[derive(Debug, PartialEq, Serialize)]
pub struct Matrix<T = f64> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T> Default for Matrix<T> {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: Vec::new() }
    }
}

impl<T> Matrix<T> {
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Matrix<T>, MatrixError> {
        let len = rows.checked_mul(cols).ok_or(MatrixError::Overflow { rows, cols })?;
        if data.len() != len {
            return Err(MatrixError::DataLength { len: data.len(), rows, cols });
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Builds a matrix from a list of equally long rows.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Matrix<T>, MatrixError> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for row in rows {
            if row.len() != n_cols {
                return Err(MatrixError::DataLength { len: row.len(), rows: 1, cols: n_cols });
            }
            data.extend(row);
        }
        Ok(Matrix { rows: n_rows, cols: n_cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> &[T] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        let cols = self.cols;
        &mut self.data[row * cols..(row + 1) * cols]
    }

    /// Walks every element in row-major order.
    pub fn iter(&self) -> RandomAccessView<'_, T> {
        RandomAccessView::new(&self.data)
    }

    pub fn iter_mut(&mut self) -> RandomAccessViewMut<'_, T> {
        RandomAccessViewMut::new(&mut self.data)
    }

    pub fn row_view(&self, row: usize) -> RandomAccessView<'_, T> {
        RandomAccessView::new(self.row(row))
    }

    /// Walks column `col` top to bottom, one element per row.
    pub fn column(&self, col: usize) -> StridedView<'_, T> {
        debug_assert!(col < self.cols || self.data.is_empty(), "column {} out of range", col);
        StridedView::new(&self.data, col.min(self.data.len()), self.cols.max(1))
    }

    /// The end sentinel matching [`column`](Self::column).
    pub fn column_end(&self, col: usize) -> StridedView<'_, T> {
        StridedView::end(&self.data, col.min(self.data.len()), self.cols.max(1))
    }
}

impl<T: Copy + Zero> Matrix<T> {
    /// Allocates a zero-filled `rows x cols` matrix, reporting allocation
    /// failure instead of aborting.
    pub fn try_zeros(rows: usize, cols: usize) -> Result<Matrix<T>, MatrixError> {
        let len = rows.checked_mul(cols).ok_or(MatrixError::Overflow { rows, cols })?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| MatrixError::Allocation { rows, cols })?;
        data.resize(len, T::zero());
        Ok(Matrix { rows, cols, data })
    }

    /// Like [`try_zeros`](Self::try_zeros), but a failed allocation is
    /// logged and leaves a `(0, 0)` matrix.
    pub fn zeros(rows: usize, cols: usize) -> Matrix<T> {
        Self::try_zeros(rows, cols).unwrap_or_else(|e| {
            tracing::error!("{}; matrix left in (0, 0) shape", e);
            Matrix::default()
        })
    }

    pub fn transpose(&self) -> Matrix<T> {
        let mut data = Vec::with_capacity(self.data.len());
        for c in 0..self.cols {
            data.extend(self.column(c).copied());
        }
        Matrix { rows: self.cols, cols: self.rows, data }
    }

    pub fn map<U, F>(&self, functor: F) -> Matrix<U>
    where
        F: Fn(T) -> U,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| functor(x)).collect(),
        }
    }
}

impl<T: Copy + Num> Matrix<T> {
    /// Computes `out = left · right`.
    ///
    /// Returns `false` and leaves `out` untouched when
    /// `left.cols() != right.rows()`. On success `out` takes the shape
    /// `(left.rows(), right.cols())`; its buffer is reused in place whenever
    /// its capacity already covers `left.rows() * right.cols()` elements, so
    /// repeated calls with unchanging shapes never reallocate.
    #[must_use]
    pub fn dot(left: &Matrix<T>, right: &Matrix<T>, out: &mut Matrix<T>) -> bool {
        if left.cols != right.rows {
            tracing::warn!(
                "dot refused: ({}, {}) x ({}, {})",
                left.rows, left.cols, right.rows, right.cols
            );
            return false;
        }

        let len = match left.rows.checked_mul(right.cols) {
            Some(len) => len,
            None => {
                tracing::error!("dot output ({}, {}) overflows usize", left.rows, right.cols);
                return false;
            }
        };
        if out.data.capacity() < len
            && out.data.try_reserve_exact(len - out.data.len()).is_err()
        {
            tracing::error!("dot could not grow output to ({}, {})", left.rows, right.cols);
            return false;
        }

        out.data.clear();
        out.data.resize(len, T::zero());
        out.rows = left.rows;
        out.cols = right.cols;

        for i in 0..left.rows {
            let row = left.row(i);
            for j in 0..right.cols {
                out.data[i * right.cols + j] = row
                    .iter()
                    .zip(right.column(j))
                    .fold(T::zero(), |acc, (&a, &b)| acc + a * b);
            }
        }
        true
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, other: &Matrix<T>) -> Result<Matrix<T>, MatrixError> {
        if self.shape() != other.shape() {
            return Err(MatrixError::ShapeMismatch(self.rows, self.cols, other.rows, other.cols));
        }
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().zip(&other.data).map(|(&x, &y)| x * y).collect(),
        })
    }
}

impl Matrix<f64> {
    pub fn random(rows: usize, cols: usize) -> Matrix {
        let mut rng = rand::thread_rng();
        let mut res = Matrix::zeros(rows, cols);
        for x in res.data.iter_mut() {
            *x = rng.gen::<f64>() * 2.0 - 1.0;
        }
        res
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    /// Both u1 and u2 must be uniform on (0, 1].
    fn sample_standard_normal(rng: &mut ThreadRng) -> f64 {
        // Draw two independent uniform samples in (0, 1] to avoid log(0).
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// He initialization: samples from N(0, sqrt(2 / cols)).
    ///
    /// Shape: (rows, cols). `cols` is the fan-in.
    pub fn he(rows: usize, cols: usize) -> Matrix {
        Self::normal(rows, cols, (2.0 / cols as f64).sqrt())
    }

    /// Xavier (Glorot) initialization: samples from N(0, sqrt(1 / cols)).
    pub fn xavier(rows: usize, cols: usize) -> Matrix {
        Self::normal(rows, cols, (1.0 / cols as f64).sqrt())
    }

    fn normal(rows: usize, cols: usize, std_dev: f64) -> Matrix {
        let mut rng = rand::thread_rng();
        let mut res = Matrix::zeros(rows, cols);
        for x in res.data.iter_mut() {
            *x = Self::sample_standard_normal(&mut rng) * std_dev;
        }
        res
    }
}

impl<T: Serialize> Matrix<T> {
    /// Serializes the matrix to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}

impl<T: DeserializeOwned> Matrix<T> {
    /// Deserializes a matrix previously written by `save_json`.
    pub fn load_json(path: &str) -> std::io::Result<Matrix<T>> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader).map_err(std::io::Error::from)
    }
}

// Goes through `from_vec` so a decoded matrix always satisfies
// data.len() == rows * cols.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Matrix<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(rename = "Matrix")]
        struct Raw<E> {
            rows: usize,
            cols: usize,
            data: Vec<E>,
        }

        let raw = Raw::<T>::deserialize(deserializer)?;
        Matrix::from_vec(raw.rows, raw.cols, raw.data).map_err(serde::de::Error::custom)
    }
}

impl<T: Clone> Clone for Matrix<T> {
    fn clone(&self) -> Self {
        Matrix { rows: self.rows, cols: self.cols, data: self.data.clone() }
    }

    /// Keeps this matrix's buffer when its capacity covers the source.
    fn clone_from(&mut self, source: &Self) {
        self.rows = source.rows;
        self.cols = source.cols;
        self.data.clone_from(&source.data);
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        debug_assert!(col < self.cols, "column {} out of range", col);
        &self.data[row * self.cols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        debug_assert!(col < self.cols, "column {} out of range", col);
        &mut self.data[row * self.cols + col]
    }
}

impl<T: Copy + Num> Add for &Matrix<T> {
    type Output = Matrix<T>;

    fn add(self, rhs: Self) -> Self::Output {
        if self.shape() != rhs.shape() {
            panic!("Matrices are of incorrect sizes")
        }
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().zip(&rhs.data).map(|(&x, &y)| x + y).collect(),
        }
    }
}

impl<T: Copy + Num> Sub for &Matrix<T> {
    type Output = Matrix<T>;

    fn sub(self, rhs: Self) -> Self::Output {
        if self.shape() != rhs.shape() {
            panic!("Matrices are of incorrect sizes")
        }
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().zip(&rhs.data).map(|(&x, &y)| x - y).collect(),
        }
    }
}

impl<T: Copy + Num> Mul for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: Self) -> Self::Output {
        let mut res = Matrix::default();
        if !Matrix::dot(self, rhs, &mut res) {
            panic!("Matrices are of incorrect sizes")
        }
        res
    }
}

impl<T: Copy + Num> Add for Matrix<T> {
    type Output = Matrix<T>;

    fn add(self, rhs: Self) -> Self::Output {
        &self + &rhs
    }
}

impl<T: Copy + Num> Sub for Matrix<T> {
    type Output = Matrix<T>;

    fn sub(self, rhs: Self) -> Self::Output {
        &self - &rhs
    }
}

impl<T: Copy + Num> Mul for Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: Self) -> Self::Output {
        &self * &rhs
    }
}
