//! One-dimensional SI array engine
//!
//! [`VectorData`] is either a [`DenseVector`] or a [`SparseVector`]. Both
//! expose the same logical view (a sequence of SI magnitudes of fixed length)
//! and are interchangeable in every operation; the storage kind only affects
//! cost and the kind of the result.
//!
//! # Promotion rules for allocating operators
//!
//! | operation       | Dense, Dense | Dense, Sparse | Sparse, Dense | Sparse, Sparse |
//! |-----------------|--------------|---------------|---------------|----------------|
//! | `plus`, `minus` | Dense        | Dense         | Dense         | Sparse         |
//! | `times`         | Dense        | Sparse        | Sparse        | Sparse         |
//! | `divide`        | Dense        | Sparse        | Sparse        | Sparse         |
//!
//! Mutating operators (`increment_by`, ...) keep the receiver's kind.

mod dense;
mod ingest;
mod merge;
mod sparse;

pub use dense::DenseVector;
pub use sparse::SparseVector;

use crate::element::Element;
use crate::error::{ArrayError, Result};
use crate::scale::Scale;
use crate::storage::StorageKind;
use dense::{map_to_vec, zip_map};
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::hash::{Hash, Hasher};
use tracing::debug;

/// An SI array in dense or sparse storage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "storage", rename_all = "lowercase", bound(deserialize = ""))]
pub enum VectorData<T: Element> {
    /// One stored magnitude per position
    Dense(DenseVector<T>),
    /// Only non-zero magnitudes are stored
    Sparse(SparseVector<T>),
}

impl<T: Element> VectorData<T> {
    /// Storage kind of this instance
    pub fn storage_kind(&self) -> StorageKind {
        match self {
            Self::Dense(_) => StorageKind::Dense,
            Self::Sparse(_) => StorageKind::Sparse,
        }
    }

    pub fn is_dense(&self) -> bool {
        matches!(self, Self::Dense(_))
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self, Self::Sparse(_))
    }

    /// Logical length
    pub fn size(&self) -> usize {
        match self {
            Self::Dense(d) => d.size(),
            Self::Sparse(s) => s.size(),
        }
    }

    /// SI magnitude at `index`
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::IndexOutOfBounds`] if `index >= size()`.
    pub fn get_si(&self, index: usize) -> Result<T> {
        match self {
            Self::Dense(d) => d.get_si(index),
            Self::Sparse(s) => s.get_si(index),
        }
    }

    /// Set the SI magnitude at `index`
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::IndexOutOfBounds`] if `index >= size()`.
    pub fn set_si(&mut self, index: usize, value: T) -> Result<()> {
        match self {
            Self::Dense(d) => d.set_si(index, value),
            Self::Sparse(s) => s.set_si(index, value),
        }
    }

    /// Value at `index` expressed in `scale`'s unit
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::IndexOutOfBounds`] if `index >= size()`.
    pub fn get_in<S>(&self, index: usize, scale: &S) -> Result<T>
    where
        S: Scale<T> + ?Sized,
    {
        Ok(scale.from_standard_unit(self.get_si(index)?))
    }

    /// Every value expressed in `scale`'s unit
    pub fn values_in<S>(&self, scale: &S) -> Vec<T>
    where
        S: Scale<T> + ?Sized,
    {
        map_to_vec(&self.dense_view(), |v| scale.from_standard_unit(v))
    }

    /// Number of non-zero magnitudes
    pub fn cardinality(&self) -> usize {
        match self {
            Self::Dense(d) => d.cardinality(),
            Self::Sparse(s) => s.cardinality(),
        }
    }

    /// Sum of all magnitudes
    ///
    /// Large dense arrays are summed in parallel, so the result may differ
    /// from a sequential sum in the last bits.
    pub fn zsum(&self) -> T {
        match self {
            Self::Dense(d) => d.zsum(),
            Self::Sparse(s) => s.zsum(),
        }
    }

    /// Dense copy of this array
    pub fn to_dense(&self) -> Self {
        match self {
            Self::Dense(d) => Self::Dense(d.clone()),
            Self::Sparse(s) => Self::Dense(s.to_dense()),
        }
    }

    /// Sparse copy of this array
    pub fn to_sparse(&self) -> Self {
        match self {
            Self::Dense(d) => {
                let sparse = d.to_sparse();
                debug!(
                    size = sparse.size(),
                    cardinality = sparse.cardinality(),
                    "Converted dense to sparse"
                );
                Self::Sparse(sparse)
            }
            Self::Sparse(s) => Self::Sparse(s.clone()),
        }
    }

    /// Dense form, reusing `self` when it already is dense
    pub fn into_dense(self) -> Self {
        match self {
            Self::Dense(_) => self,
            Self::Sparse(s) => Self::Dense(s.to_dense()),
        }
    }

    /// Sparse form, reusing `self` when it already is sparse
    pub fn into_sparse(self) -> Self {
        match self {
            Self::Dense(_) => self.to_sparse(),
            Self::Sparse(_) => self,
        }
    }

    /// Every magnitude in order; borrowed for dense storage
    pub fn dense_view(&self) -> Cow<'_, [T]> {
        match self {
            Self::Dense(d) => Cow::Borrowed(d.as_slice()),
            Self::Sparse(s) => Cow::Owned(s.to_dense().into_vec()),
        }
    }

    fn check_size(&self, other: &Self) -> Result<()> {
        if self.size() == other.size() {
            Ok(())
        } else {
            debug!(
                left = self.size(),
                right = other.size(),
                "Rejected operands of different size"
            );
            Err(ArrayError::SizeMismatch {
                left: self.size(),
                right: other.size(),
            })
        }
    }

    /// Element-wise sum as a new array
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::SizeMismatch`] if the sizes differ.
    pub fn plus(&self, other: &Self) -> Result<Self> {
        self.check_size(other)?;
        Ok(self.additive(other, |a, b| a + b))
    }

    /// Element-wise difference as a new array
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::SizeMismatch`] if the sizes differ.
    pub fn minus(&self, other: &Self) -> Result<Self> {
        self.check_size(other)?;
        Ok(self.additive(other, |a, b| a - b))
    }

    /// Element-wise product as a new array
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::SizeMismatch`] if the sizes differ.
    pub fn times(&self, other: &Self) -> Result<Self> {
        self.check_size(other)?;
        let product = |a: T, b: T| a * b;
        Ok(match (self, other) {
            (Self::Dense(a), Self::Dense(b)) => {
                Self::Dense(DenseVector::new(zip_map(a.as_slice(), b.as_slice(), product)))
            }
            (Self::Sparse(a), Self::Sparse(b)) => Self::Sparse(a.merged(b, product)),
            (Self::Sparse(a), Self::Dense(b)) => {
                Self::Sparse(a.merged_with_dense(b.as_slice(), product))
            }
            (Self::Dense(a), Self::Sparse(b)) => {
                Self::Sparse(b.merged_with_dense(a.as_slice(), |y, x| x * y))
            }
        })
    }

    /// Element-wise quotient as a new array
    ///
    /// Any sparse operand is materialised first, so a zero denominator
    /// yields the IEEE result (±∞ or NaN) at that position.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::SizeMismatch`] if the sizes differ.
    pub fn divide(&self, other: &Self) -> Result<Self> {
        self.check_size(other)?;
        let quotient = zip_map(&self.dense_view(), &other.dense_view(), |a, b| a / b);
        Ok(match (self, other) {
            (Self::Dense(_), Self::Dense(_)) => Self::Dense(DenseVector::new(quotient)),
            _ => Self::Sparse(SparseVector::from_dense_slice(&quotient)),
        })
    }

    fn additive<F>(&self, other: &Self, f: F) -> Self
    where
        F: Fn(T, T) -> T + Sync + Send,
    {
        match (self, other) {
            (Self::Sparse(a), Self::Sparse(b)) => Self::Sparse(a.merged(b, f)),
            _ => Self::Dense(DenseVector::new(zip_map(
                &self.dense_view(),
                &other.dense_view(),
                f,
            ))),
        }
    }

    /// In-place `self[i] += other[i]`
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::SizeMismatch`] if the sizes differ.
    pub fn increment_by(&mut self, other: &Self) -> Result<()> {
        self.check_size(other)?;
        self.apply(other, |a, b| a + b, true);
        Ok(())
    }

    /// In-place `self[i] -= other[i]`
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::SizeMismatch`] if the sizes differ.
    pub fn decrement_by(&mut self, other: &Self) -> Result<()> {
        self.check_size(other)?;
        self.apply(other, |a, b| a - b, true);
        Ok(())
    }

    /// In-place `self[i] *= other[i]`
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::SizeMismatch`] if the sizes differ.
    pub fn multiply_by(&mut self, other: &Self) -> Result<()> {
        self.assign(|a, b| a * b, other)
    }

    /// In-place `self[i] /= other[i]`
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::SizeMismatch`] if the sizes differ.
    pub fn divide_by(&mut self, other: &Self) -> Result<()> {
        self.assign(|a, b| a / b, other)
    }

    /// In-place `self[i] = f(self[i], other[i])`, keeping the storage kind
    ///
    /// A sparse receiver is rebuilt with a merge-join when `f(0, 0) == 0`
    /// and with a walk over every position otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::SizeMismatch`] if the sizes differ.
    pub fn assign<F>(&mut self, f: F, other: &Self) -> Result<()>
    where
        F: Fn(T, T) -> T + Sync + Send,
    {
        self.check_size(other)?;
        self.apply(other, f, false);
        Ok(())
    }

    /// `zero_is_identity` means `f(x, 0) == x`, which lets a dense receiver
    /// skip the implicit zeros of a sparse argument.
    fn apply<F>(&mut self, other: &Self, f: F, zero_is_identity: bool)
    where
        F: Fn(T, T) -> T + Sync + Send,
    {
        match (self, other) {
            (Self::Dense(a), Self::Dense(b)) => a.zip_assign(b.as_slice(), f),
            (Self::Dense(a), Self::Sparse(b)) if zero_is_identity => a.scatter_assign(b, f),
            (Self::Dense(a), Self::Sparse(b)) => a.assign_positional(b, f),
            (Self::Sparse(a), Self::Sparse(b)) => a.merge_assign(b, f),
            (Self::Sparse(a), Self::Dense(b)) => a.merge_assign_dense(b.as_slice(), f),
        }
    }

    /// In-place `self[i] = f(self[i])`, keeping the storage kind
    ///
    /// On sparse storage only the stored values are visited when `f(0) == 0`;
    /// otherwise every position is evaluated and may become populated.
    pub fn map_in_place<F>(&mut self, f: F)
    where
        F: Fn(T) -> T + Sync + Send,
    {
        match self {
            Self::Dense(d) => d.map_assign(f),
            Self::Sparse(s) => s.map_assign(f),
        }
    }

    /// Add `s` to every position
    pub fn increment_by_scalar(&mut self, s: T) {
        self.map_in_place(|v| v + s);
    }

    /// Subtract `s` from every position
    pub fn decrement_by_scalar(&mut self, s: T) {
        self.map_in_place(|v| v - s);
    }

    /// Multiply every position by `s`
    ///
    /// A finite factor only rescales the stored values of a sparse array.
    pub fn multiply_by_scalar(&mut self, s: T) {
        if let Self::Sparse(sparse) = self {
            if s.is_finite() {
                sparse.map_stored(|v| v * s);
                return;
            }
        }
        self.map_in_place(|v| v * s);
    }

    /// Divide every position by `s`
    ///
    /// Dividing by zero is not an error: the results follow IEEE rules.
    pub fn divide_by_scalar(&mut self, s: T) {
        if let Self::Sparse(sparse) = self {
            if !s.is_zero() && !s.is_nan() {
                sparse.map_stored(|v| v / s);
                return;
            }
        }
        self.map_in_place(|v| v / s);
    }

    pub fn abs(&mut self) {
        self.map_in_place(T::abs);
    }

    pub fn neg(&mut self) {
        self.map_in_place(|v| -v);
    }

    pub fn ceil(&mut self) {
        self.map_in_place(T::ceil);
    }

    pub fn floor(&mut self) {
        self.map_in_place(T::floor);
    }

    /// Round to the nearest integer, ties to even
    pub fn rint(&mut self) {
        self.map_in_place(T::rint);
    }

    /// Storage-independent 64-bit hash of the logical content
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl<T: Element> PartialEq for VectorData<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Dense(a), Self::Dense(b)) => a.as_slice() == b.as_slice(),
            // Both sides hold exactly the non-zero positions in ascending order
            (Self::Sparse(a), Self::Sparse(b)) => {
                a.size() == b.size() && a.indices() == b.indices() && a.values() == b.values()
            }
            (Self::Dense(d), Self::Sparse(s)) | (Self::Sparse(s), Self::Dense(d)) => {
                d.size() == s.size() && d.as_slice().iter().copied().eq(s.iter_positional())
            }
        }
    }
}

impl<T: Element> Hash for VectorData<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.size().hash(state);
        let mut visit = |index: usize, value: T| {
            index.hash(state);
            value.hash_bits().hash(state);
        };
        match self {
            Self::Dense(d) => d
                .as_slice()
                .iter()
                .enumerate()
                .filter(|(_, v)| !v.is_zero())
                .for_each(|(i, &v)| visit(i, v)),
            Self::Sparse(s) => s.iter_nonzero().for_each(|(i, v)| visit(i, v)),
        }
    }
}

impl<T: Element> From<DenseVector<T>> for VectorData<T> {
    fn from(dense: DenseVector<T>) -> Self {
        Self::Dense(dense)
    }
}

impl<T: Element> From<SparseVector<T>> for VectorData<T> {
    fn from(sparse: SparseVector<T>) -> Self {
        Self::Sparse(sparse)
    }
}
