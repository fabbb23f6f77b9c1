//! Sparse store: ascending non-zero positions plus their SI magnitudes
//!
//! Invariants, re-established by every mutating operation before it returns:
//! 1. `indices` is strictly ascending (unique).
//! 2. No stored value is zero.
//! 3. Every position not in `indices` is logically zero.
//!
//! `indices` and `values` always have the same length and grow or shrink
//! together.

use super::dense::{count_nonzero, map_assign, sum, DenseVector};
use super::merge::{collect_nonzero, merge_sparse};
use crate::element::Element;
use crate::error::{ArrayError, Result};
use serde::{Deserialize, Serialize};

/// Non-zero positions of an SI array with an explicit logical length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SparseParts<T>", bound(deserialize = ""))]
pub struct SparseVector<T: Element> {
    indices: Vec<usize>,
    values: Vec<T>,
    length: usize,
}

/// Unvalidated wire form of a [`SparseVector`]
#[derive(Deserialize)]
struct SparseParts<T> {
    indices: Vec<usize>,
    values: Vec<T>,
    length: usize,
}

impl<T: Element> TryFrom<SparseParts<T>> for SparseVector<T> {
    type Error = ArrayError;

    fn try_from(parts: SparseParts<T>) -> Result<Self> {
        Self::new(parts.indices, parts.values, parts.length)
    }
}

impl<T: Element> SparseVector<T> {
    /// Build from parallel index/value arrays, validating the invariants
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidArgument`] if the arrays differ in length,
    /// if `indices` is not strictly ascending, if an index is not below
    /// `length`, or if a value is zero.
    pub fn new(indices: Vec<usize>, values: Vec<T>, length: usize) -> Result<Self> {
        if indices.len() != values.len() {
            return Err(ArrayError::invalid_argument(
                "values",
                format!(
                    "{} values for {} indices",
                    values.len(),
                    indices.len()
                ),
            ));
        }
        if indices.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ArrayError::invalid_argument(
                "indices",
                "must be strictly ascending",
            ));
        }
        if let Some(&last) = indices.last() {
            if last >= length {
                return Err(ArrayError::invalid_argument(
                    "indices",
                    format!("index {last} out of range for length {length}"),
                ));
            }
        }
        if values.iter().any(|v| v.is_zero()) {
            return Err(ArrayError::invalid_argument(
                "values",
                "sparse storage must not hold zeros",
            ));
        }
        Ok(Self {
            indices,
            values,
            length,
        })
    }

    /// All-zero sparse vector of the given length
    #[must_use]
    pub fn zeros(length: usize) -> Self {
        Self {
            indices: Vec::new(),
            values: Vec::new(),
            length,
        }
    }

    /// Build from already-valid parts
    pub(crate) fn from_parts(indices: Vec<usize>, values: Vec<T>, length: usize) -> Self {
        let built = Self {
            indices,
            values,
            length,
        };
        debug_assert!(built.invariants_hold());
        built
    }

    /// Filter the zeros out of a dense buffer
    ///
    /// The non-zero count is taken first (in parallel for large inputs) so
    /// both arrays are allocated at their exact size. The fill pass depends
    /// on an increasing write cursor and stays sequential.
    pub fn from_dense_slice(values: &[T]) -> Self {
        let count = count_nonzero(values);
        let mut indices = Vec::with_capacity(count);
        let mut stored = Vec::with_capacity(count);
        for (index, &value) in values.iter().enumerate() {
            if !value.is_zero() {
                indices.push(index);
                stored.push(value);
            }
        }
        Self::from_parts(indices, stored, values.len())
    }

    /// Logical length
    #[inline]
    pub fn size(&self) -> usize {
        self.length
    }

    /// Ascending positions of the stored values
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Stored magnitudes, parallel to [`SparseVector::indices`]
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Number of non-zero magnitudes (O(1))
    #[inline]
    pub fn cardinality(&self) -> usize {
        self.indices.len()
    }

    /// Sum of the stored magnitudes
    pub fn zsum(&self) -> T {
        sum(&self.values)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.length {
            Ok(())
        } else {
            Err(ArrayError::IndexOutOfBounds {
                index,
                len: self.length,
            })
        }
    }

    /// SI magnitude at `index`; binary search over the stored positions
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::IndexOutOfBounds`] if `index >= size()`.
    pub fn get_si(&self, index: usize) -> Result<T> {
        self.check_index(index)?;
        Ok(match self.indices.binary_search(&index) {
            Ok(slot) => self.values[slot],
            Err(_) => T::ZERO,
        })
    }

    /// Set the SI magnitude at `index`
    ///
    /// Updates the slot in place, removes it when `value` is zero, or
    /// inserts a new slot at its ordered position.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::IndexOutOfBounds`] if `index >= size()`.
    pub fn set_si(&mut self, index: usize, value: T) -> Result<()> {
        self.check_index(index)?;
        match self.indices.binary_search(&index) {
            Ok(slot) if value.is_zero() => {
                self.indices.remove(slot);
                self.values.remove(slot);
            }
            Ok(slot) => self.values[slot] = value,
            Err(slot) if !value.is_zero() => {
                self.indices.insert(slot, index);
                self.values.insert(slot, value);
            }
            Err(_) => {}
        }
        Ok(())
    }

    /// Dense copy: zero-filled buffer with the stored values scattered in
    pub fn to_dense(&self) -> DenseVector<T> {
        let mut dense = vec![T::ZERO; self.length];
        for (&index, &value) in self.indices.iter().zip(&self.values) {
            dense[index] = value;
        }
        DenseVector::new(dense)
    }

    /// Every logical position in order, implicit zeros included
    pub fn iter_positional(&self) -> impl Iterator<Item = T> + '_ {
        let mut cursor = 0;
        (0..self.length).map(move |position| {
            if self.indices.get(cursor) == Some(&position) {
                cursor += 1;
                self.values[cursor - 1]
            } else {
                T::ZERO
            }
        })
    }

    /// `(index, value)` pairs of the stored entries
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (usize, T)> + '_ {
        self.indices
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    /// Result of `f(self[i], other[i])` as a new sparse vector
    pub(crate) fn merged<F>(&self, other: &Self, f: F) -> Self
    where
        F: Fn(T, T) -> T,
    {
        debug_assert_eq!(self.length, other.length);
        let (indices, values) = if f(T::ZERO, T::ZERO).is_zero() {
            merge_sparse(
                (&self.indices, &self.values),
                (&other.indices, &other.values),
                self.length,
                f,
            )
        } else {
            collect_nonzero(
                self.iter_positional()
                    .zip(other.iter_positional())
                    .map(|(a, b)| f(a, b)),
                self.length,
            )
        };
        Self::from_parts(indices, values, self.length)
    }

    /// Result of `f(self[i], dense[i])` as a new sparse vector
    pub(crate) fn merged_with_dense<F>(&self, dense: &[T], f: F) -> Self
    where
        F: Fn(T, T) -> T,
    {
        debug_assert_eq!(self.length, dense.len());
        let (indices, values) = collect_nonzero(
            self.iter_positional()
                .zip(dense.iter().copied())
                .map(|(a, b)| f(a, b)),
            self.length,
        );
        Self::from_parts(indices, values, self.length)
    }

    /// In-place `self[i] = f(self[i], other[i])`, re-deriving the index set
    pub(crate) fn merge_assign<F>(&mut self, other: &Self, f: F)
    where
        F: Fn(T, T) -> T,
    {
        *self = self.merged(other, f);
    }

    /// In-place `self[i] = f(self[i], dense[i])`, re-deriving the index set
    pub(crate) fn merge_assign_dense<F>(&mut self, dense: &[T], f: F)
    where
        F: Fn(T, T) -> T,
    {
        *self = self.merged_with_dense(dense, f);
    }

    /// In-place `self[i] = f(self[i])` over every logical position
    ///
    /// When `f(0) == 0` only the stored values are visited. Otherwise every
    /// position is evaluated and the store may become fully populated.
    pub(crate) fn map_assign<F>(&mut self, f: F)
    where
        F: Fn(T) -> T + Sync + Send,
    {
        if f(T::ZERO).is_zero() {
            self.map_stored(f);
        } else {
            let (indices, values) =
                collect_nonzero(self.iter_positional().map(&f), self.length);
            self.indices = indices;
            self.values = values;
        }
    }

    /// Apply `f` to the stored values only
    ///
    /// Callers guarantee `f(0) == 0`, so the implicit zeros are unchanged.
    pub(crate) fn map_stored<F>(&mut self, f: F)
    where
        F: Fn(T) -> T + Sync + Send,
    {
        map_assign(&mut self.values, f);
        self.retain_nonzero();
    }

    /// Drop stored slots whose value became zero, keeping both arrays aligned
    fn retain_nonzero(&mut self) {
        let mut write = 0;
        for read in 0..self.values.len() {
            let value = self.values[read];
            if !value.is_zero() {
                self.indices[write] = self.indices[read];
                self.values[write] = value;
                write += 1;
            }
        }
        self.indices.truncate(write);
        self.values.truncate(write);
    }

    fn invariants_hold(&self) -> bool {
        self.indices.len() == self.values.len()
            && self.indices.windows(2).all(|w| w[0] < w[1])
            && self.indices.iter().all(|&index| index < self.length)
            && self.values.iter().all(|v| !v.is_zero())
    }
}
