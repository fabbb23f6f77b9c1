//! Conversions to and from nalgebra's dynamically sized types
//!
//! nalgebra stores matrices column-major while [`MatrixData`] is row-major;
//! the conversions here reorder explicitly.

use crate::element::Element;
use crate::error::{ArrayError, Result};
use crate::matrix::MatrixData;
use crate::scale::IdentityScale;
use crate::storage::StorageKind;
use crate::vector::{DenseVector, VectorData};
use nalgebra::{DMatrix, DVector};

impl<T: Element> DenseVector<T> {
    /// Copy into a nalgebra column vector
    pub fn to_dvector(&self) -> DVector<T> {
        DVector::from_column_slice(self.as_slice())
    }
}

impl<T: Element> From<DVector<T>> for DenseVector<T> {
    fn from(v: DVector<T>) -> Self {
        Self::new(v.iter().copied().collect())
    }
}

impl<T: Element> VectorData<T> {
    /// Copy every magnitude into a nalgebra column vector
    pub fn to_dvector(&self) -> DVector<T> {
        DVector::from_column_slice(&self.dense_view())
    }

    /// Build from a nalgebra vector of SI magnitudes
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidArgument`] if `v` is empty.
    pub fn from_dvector(v: &DVector<T>, kind: StorageKind) -> Result<Self> {
        Self::from_raw(v.as_slice(), &IdentityScale, kind)
    }
}

impl<T: Element> MatrixData<T> {
    /// Copy into a nalgebra matrix
    pub fn to_dmatrix(&self) -> DMatrix<T> {
        DMatrix::from_row_slice(self.rows(), self.cols(), &self.data().dense_view())
    }

    /// Build from a nalgebra matrix of SI magnitudes
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidArgument`] if `m` has no rows or no
    /// columns.
    pub fn from_dmatrix(m: &DMatrix<T>, kind: StorageKind) -> Result<Self> {
        let (rows, cols) = m.shape();
        if rows == 0 || cols == 0 {
            return Err(ArrayError::empty("matrix"));
        }
        let row_major: Vec<T> = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| m[(r, c)]))
            .collect();
        Self::from_flat(rows, cols, row_major, &IdentityScale, kind)
    }
}
