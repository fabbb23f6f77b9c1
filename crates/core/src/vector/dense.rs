//! Dense store: one SI magnitude per logical position
//!
//! Bulk loops in this module fan out over rayon once the element count
//! exceeds [`EngineConfig::parallel_threshold`]. Every parallel region writes
//! disjoint slots, so results are identical to the sequential path except
//! for the accumulation order of [`sum`].

use super::sparse::SparseVector;
use crate::config::EngineConfig;
use crate::element::Element;
use crate::error::{ArrayError, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Contiguous buffer of SI magnitudes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = ""))]
pub struct DenseVector<T: Element> {
    values: Vec<T>,
}

impl<T: Element> DenseVector<T> {
    /// Wrap a buffer of SI magnitudes
    #[must_use]
    pub fn new(values: Vec<T>) -> Self {
        Self { values }
    }

    /// All-zero vector of the given length
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self {
            values: vec![T::ZERO; len],
        }
    }

    /// Logical length
    #[inline]
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// SI magnitude at `index`
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::IndexOutOfBounds`] if `index >= size()`.
    #[inline]
    pub fn get_si(&self, index: usize) -> Result<T> {
        self.values
            .get(index)
            .copied()
            .ok_or(ArrayError::IndexOutOfBounds {
                index,
                len: self.values.len(),
            })
    }

    /// Overwrite the SI magnitude at `index`
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::IndexOutOfBounds`] if `index >= size()`.
    #[inline]
    pub fn set_si(&mut self, index: usize, value: T) -> Result<()> {
        let len = self.values.len();
        let slot = self
            .values
            .get_mut(index)
            .ok_or(ArrayError::IndexOutOfBounds { index, len })?;
        *slot = value;
        Ok(())
    }

    /// Borrow the magnitudes
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    /// Take the buffer
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.values
    }

    /// Number of non-zero magnitudes (O(n) scan)
    pub fn cardinality(&self) -> usize {
        count_nonzero(&self.values)
    }

    /// Sum of all magnitudes; accumulation order is unspecified
    pub fn zsum(&self) -> T {
        sum(&self.values)
    }

    /// Sparse copy: one counting pass, then an ordered fill
    pub fn to_sparse(&self) -> SparseVector<T> {
        SparseVector::from_dense_slice(&self.values)
    }

    /// `self[i] = f(self[i], other[i])` for every position
    pub(crate) fn zip_assign<F>(&mut self, other: &[T], f: F)
    where
        F: Fn(T, T) -> T + Sync + Send,
    {
        zip_assign(&mut self.values, other, f);
    }

    /// `self[i] = f(self[i], other[i])` at the stored positions of `other` only
    ///
    /// Valid when `f(x, 0) == x` for every `x`, as for addition and
    /// subtraction.
    pub(crate) fn scatter_assign<F>(&mut self, other: &SparseVector<T>, f: F)
    where
        F: Fn(T, T) -> T,
    {
        for (&index, &value) in other.indices().iter().zip(other.values()) {
            self.values[index] = f(self.values[index], value);
        }
    }

    /// `self[i] = f(self[i], other[i])` walking `other` positionally
    pub(crate) fn assign_positional<F>(&mut self, other: &SparseVector<T>, f: F)
    where
        F: Fn(T, T) -> T,
    {
        for (slot, value) in self.values.iter_mut().zip(other.iter_positional()) {
            *slot = f(*slot, value);
        }
    }

    /// `self[i] = f(self[i])` for every position
    pub(crate) fn map_assign<F>(&mut self, f: F)
    where
        F: Fn(T) -> T + Sync + Send,
    {
        map_assign(&mut self.values, f);
    }
}

impl<T: Element> From<Vec<T>> for DenseVector<T> {
    fn from(values: Vec<T>) -> Self {
        Self::new(values)
    }
}

/// Element-wise `f(a[i], b[i])` into a fresh buffer
pub(crate) fn zip_map<T, F>(a: &[T], b: &[T], f: F) -> Vec<T>
where
    T: Element,
    F: Fn(T, T) -> T + Sync + Send,
{
    debug_assert_eq!(a.len(), b.len());
    if EngineConfig::current().parallel_for(a.len()) {
        a.par_iter()
            .zip(b.par_iter())
            .map(|(&x, &y)| f(x, y))
            .collect()
    } else {
        a.iter().zip(b).map(|(&x, &y)| f(x, y)).collect()
    }
}

/// Element-wise `f(values[i])` into a fresh buffer
pub(crate) fn map_to_vec<T, F>(values: &[T], f: F) -> Vec<T>
where
    T: Element,
    F: Fn(T) -> T + Sync + Send,
{
    if EngineConfig::current().parallel_for(values.len()) {
        values.par_iter().map(|&v| f(v)).collect()
    } else {
        values.iter().map(|&v| f(v)).collect()
    }
}

/// In-place `dst[i] = f(dst[i], src[i])`
pub(crate) fn zip_assign<T, F>(dst: &mut [T], src: &[T], f: F)
where
    T: Element,
    F: Fn(T, T) -> T + Sync + Send,
{
    debug_assert_eq!(dst.len(), src.len());
    if EngineConfig::current().parallel_for(dst.len()) {
        dst.par_iter_mut()
            .zip(src.par_iter())
            .for_each(|(d, &s)| *d = f(*d, s));
    } else {
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = f(*d, s);
        }
    }
}

/// In-place `values[i] = f(values[i])`
pub(crate) fn map_assign<T, F>(values: &mut [T], f: F)
where
    T: Element,
    F: Fn(T) -> T + Sync + Send,
{
    if EngineConfig::current().parallel_for(values.len()) {
        values.par_iter_mut().for_each(|v| *v = f(*v));
    } else {
        for v in values {
            *v = f(*v);
        }
    }
}

/// Count of non-zero entries; order-independent, so safe to parallelise
pub(crate) fn count_nonzero<T: Element>(values: &[T]) -> usize {
    if EngineConfig::current().parallel_for(values.len()) {
        values.par_iter().filter(|v| !v.is_zero()).count()
    } else {
        values.iter().filter(|v| !v.is_zero()).count()
    }
}

/// Sum of all entries
pub(crate) fn sum<T: Element>(values: &[T]) -> T {
    if EngineConfig::current().parallel_for(values.len()) {
        values.par_iter().copied().sum()
    } else {
        values.iter().copied().sum()
    }
}
