//! Two-dimensional SI arrays
//!
//! A matrix is a [`VectorData`] over row-major linear positions
//! (`row * cols + col`) plus its shape. Storage kinds, promotion rules,
//! merge-joins, equality and hashing all come from the vector engine.

use crate::element::Element;
use crate::error::{ArrayError, Result};
use crate::quantity::SiValue;
use crate::scale::{IdentityScale, Scale};
use crate::storage::StorageKind;
use crate::vector::VectorData;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use tracing::debug;

/// SI matrix in dense or sparse storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MatrixParts<T>", bound(deserialize = ""))]
pub struct MatrixData<T: Element> {
    rows: usize,
    cols: usize,
    data: VectorData<T>,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = ""))]
struct MatrixParts<T: Element> {
    rows: usize,
    cols: usize,
    data: VectorData<T>,
}

impl<T: Element> TryFrom<MatrixParts<T>> for MatrixData<T> {
    type Error = ArrayError;

    fn try_from(parts: MatrixParts<T>) -> Result<Self> {
        Self::from_vector(parts.rows, parts.cols, parts.data)
    }
}

impl<T: Element> MatrixData<T> {
    /// Build from rows of raw values in `scale`'s unit
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidArgument`] if there are no rows, the rows
    /// are empty, or the rows differ in length.
    pub fn from_rows<S>(rows: &[Vec<T>], scale: &S, kind: StorageKind) -> Result<Self>
    where
        S: Scale<T> + ?Sized,
    {
        let cols = row_width(rows)?;
        let flat: Vec<T> = rows.iter().flatten().copied().collect();
        Self::from_flat(rows.len(), cols, flat, scale, kind)
    }

    /// Build from rows of SI-tagged scalars
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidArgument`] if there are no rows, the rows
    /// are empty, or the rows differ in length.
    pub fn from_scalar_rows<Q>(rows: &[Vec<Q>], kind: StorageKind) -> Result<Self>
    where
        Q: SiValue<T>,
    {
        let cols = row_width(rows)?;
        let flat: Vec<T> = rows.iter().flatten().map(SiValue::si).collect();
        Self::from_flat(rows.len(), cols, flat, &IdentityScale, kind)
    }

    /// Build from row-major raw values
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidArgument`] if either dimension is zero or
    /// `values.len() != rows * cols`.
    pub fn from_flat<S>(
        rows: usize,
        cols: usize,
        values: Vec<T>,
        scale: &S,
        kind: StorageKind,
    ) -> Result<Self>
    where
        S: Scale<T> + ?Sized,
    {
        check_dims(rows, cols, values.len())?;
        debug!(rows, cols, %kind, "Ingesting matrix");
        let data = VectorData::from_list(values, scale, kind)?;
        Ok(Self { rows, cols, data })
    }

    /// Wrap a vector of row-major SI magnitudes
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidArgument`] if either dimension is zero or
    /// `data.size() != rows * cols`.
    pub fn from_vector(rows: usize, cols: usize, data: VectorData<T>) -> Result<Self> {
        check_dims(rows, cols, data.size())?;
        Ok(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// The underlying row-major vector
    pub fn data(&self) -> &VectorData<T> {
        &self.data
    }

    pub fn storage_kind(&self) -> StorageKind {
        self.data.storage_kind()
    }

    pub fn is_dense(&self) -> bool {
        self.data.is_dense()
    }

    pub fn is_sparse(&self) -> bool {
        self.data.is_sparse()
    }

    pub fn cardinality(&self) -> usize {
        self.data.cardinality()
    }

    pub fn zsum(&self) -> T {
        self.data.zsum()
    }

    fn position(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows {
            return Err(ArrayError::IndexOutOfBounds {
                index: row,
                len: self.rows,
            });
        }
        if col >= self.cols {
            return Err(ArrayError::IndexOutOfBounds {
                index: col,
                len: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    /// SI magnitude at `(row, col)`
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::IndexOutOfBounds`] naming the offending
    /// coordinate.
    pub fn get_si(&self, row: usize, col: usize) -> Result<T> {
        self.data.get_si(self.position(row, col)?)
    }

    /// Set the SI magnitude at `(row, col)`
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::IndexOutOfBounds`] naming the offending
    /// coordinate.
    pub fn set_si(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let position = self.position(row, col)?;
        self.data.set_si(position, value)
    }

    pub fn to_dense(&self) -> Self {
        self.with_data(self.data.to_dense())
    }

    pub fn to_sparse(&self) -> Self {
        self.with_data(self.data.to_sparse())
    }

    fn with_data(&self, data: VectorData<T>) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data,
        }
    }

    fn check_shape(&self, other: &Self) -> Result<()> {
        if self.shape() == other.shape() {
            Ok(())
        } else {
            debug!(
                left = ?self.shape(),
                right = ?other.shape(),
                "Rejected matrices of different shape"
            );
            Err(ArrayError::ShapeMismatch {
                left: self.shape(),
                right: other.shape(),
            })
        }
    }

    /// Element-wise sum as a new matrix
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::ShapeMismatch`] if the shapes differ.
    pub fn plus(&self, other: &Self) -> Result<Self> {
        self.check_shape(other)?;
        Ok(self.with_data(self.data.plus(&other.data)?))
    }

    /// Element-wise difference as a new matrix
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::ShapeMismatch`] if the shapes differ.
    pub fn minus(&self, other: &Self) -> Result<Self> {
        self.check_shape(other)?;
        Ok(self.with_data(self.data.minus(&other.data)?))
    }

    /// Element-wise (Hadamard) product as a new matrix
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::ShapeMismatch`] if the shapes differ.
    pub fn times(&self, other: &Self) -> Result<Self> {
        self.check_shape(other)?;
        Ok(self.with_data(self.data.times(&other.data)?))
    }

    /// Element-wise quotient as a new matrix
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::ShapeMismatch`] if the shapes differ.
    pub fn divide(&self, other: &Self) -> Result<Self> {
        self.check_shape(other)?;
        Ok(self.with_data(self.data.divide(&other.data)?))
    }

    /// # Errors
    ///
    /// Returns [`ArrayError::ShapeMismatch`] if the shapes differ.
    pub fn increment_by(&mut self, other: &Self) -> Result<()> {
        self.check_shape(other)?;
        self.data.increment_by(&other.data)
    }

    /// # Errors
    ///
    /// Returns [`ArrayError::ShapeMismatch`] if the shapes differ.
    pub fn decrement_by(&mut self, other: &Self) -> Result<()> {
        self.check_shape(other)?;
        self.data.decrement_by(&other.data)
    }

    /// # Errors
    ///
    /// Returns [`ArrayError::ShapeMismatch`] if the shapes differ.
    pub fn multiply_by(&mut self, other: &Self) -> Result<()> {
        self.check_shape(other)?;
        self.data.multiply_by(&other.data)
    }

    /// # Errors
    ///
    /// Returns [`ArrayError::ShapeMismatch`] if the shapes differ.
    pub fn divide_by(&mut self, other: &Self) -> Result<()> {
        self.check_shape(other)?;
        self.data.divide_by(&other.data)
    }

    pub fn increment_by_scalar(&mut self, s: T) {
        self.data.increment_by_scalar(s);
    }

    pub fn decrement_by_scalar(&mut self, s: T) {
        self.data.decrement_by_scalar(s);
    }

    pub fn multiply_by_scalar(&mut self, s: T) {
        self.data.multiply_by_scalar(s);
    }

    pub fn divide_by_scalar(&mut self, s: T) {
        self.data.divide_by_scalar(s);
    }

    /// Owned row-major copy of every magnitude
    pub fn dense_rows(&self) -> Vec<Vec<T>> {
        self.data
            .dense_view()
            .chunks(self.cols)
            .map(<[T]>::to_vec)
            .collect()
    }

    /// Copy of one row
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::IndexOutOfBounds`] if `row >= rows()`.
    pub fn row(&self, row: usize) -> Result<Vec<T>> {
        self.position(row, 0)?;
        (0..self.cols).map(|col| self.get_si(row, col)).collect()
    }

    /// Copy of one column
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::IndexOutOfBounds`] if `col >= cols()`.
    pub fn column(&self, col: usize) -> Result<Vec<T>> {
        self.position(0, col)?;
        (0..self.rows).map(|row| self.get_si(row, col)).collect()
    }

    /// Storage-independent 64-bit hash of shape and content
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl<T: Element> Hash for MatrixData<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rows.hash(state);
        self.cols.hash(state);
        self.data.hash(state);
    }
}

/// Common row length of a non-empty, rectangular set of rows
fn row_width<R>(rows: &[Vec<R>]) -> Result<usize> {
    let cols = rows.first().map_or(0, Vec::len);
    if cols == 0 {
        return Err(ArrayError::empty("rows"));
    }
    if let Some((r, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != cols) {
        return Err(ArrayError::invalid_argument(
            "rows",
            format!("row {r} has {} columns, expected {cols}", row.len()),
        ));
    }
    Ok(cols)
}

fn check_dims(rows: usize, cols: usize, len: usize) -> Result<()> {
    if rows == 0 {
        return Err(ArrayError::empty("rows"));
    }
    if cols == 0 {
        return Err(ArrayError::empty("cols"));
    }
    if rows.checked_mul(cols) != Some(len) {
        return Err(ArrayError::invalid_argument(
            "values",
            format!("{len} values do not fill a {rows}x{cols} matrix"),
        ));
    }
    Ok(())
}
