//! Merge-join of sparse index lists
//!
//! Both inputs are ascending, duplicate-free index lists paired with their
//! non-zero values. The join walks them with two cursors and emits
//! `f(own, other)` for every index present on either side, substituting zero
//! for the side that has no entry. Emitted zeros are dropped, so the output
//! satisfies the same invariants as the inputs.
//!
//! Positions absent from both sides are never visited, which is only correct
//! when `f(0, 0) == 0`. Callers fall back to [`collect_nonzero`] over a full
//! positional walk otherwise.
//!
//! The merge is inherently sequential.

use crate::config::EngineConfig;
use crate::element::Element;
use std::cmp::Ordering;
use tracing::trace;

/// Output of a merge: parallel index and value buffers of exact length
pub(crate) type MergeOutput<T> = (Vec<usize>, Vec<T>);

/// Growable pair of output buffers that grow and shrink in lock-step
struct MergeBuffers<T> {
    indices: Vec<usize>,
    values: Vec<T>,
}

impl<T: Element> MergeBuffers<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            indices: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Append unless the value is zero
    #[inline]
    fn emit(&mut self, index: usize, value: T) {
        if !value.is_zero() {
            self.indices.push(index);
            self.values.push(value);
        }
    }

    /// Trim to the emitted count
    fn finish(mut self) -> MergeOutput<T> {
        self.indices.shrink_to_fit();
        self.values.shrink_to_fit();
        (self.indices, self.values)
    }
}

/// Two-cursor merge of two sparse operands of logical length `length`
pub(crate) fn merge_sparse<T, F>(
    own: (&[usize], &[T]),
    other: (&[usize], &[T]),
    length: usize,
    f: F,
) -> MergeOutput<T>
where
    T: Element,
    F: Fn(T, T) -> T,
{
    let (own_indices, own_values) = own;
    let (other_indices, other_values) = other;
    debug_assert_eq!(own_indices.len(), own_values.len());
    debug_assert_eq!(other_indices.len(), other_values.len());

    let mut out = MergeBuffers::with_capacity(EngineConfig::current().merge_capacity(length));
    let (mut i, mut j) = (0, 0);

    while i < own_indices.len() && j < other_indices.len() {
        match own_indices[i].cmp(&other_indices[j]) {
            Ordering::Equal => {
                out.emit(own_indices[i], f(own_values[i], other_values[j]));
                i += 1;
                j += 1;
            }
            Ordering::Less => {
                out.emit(own_indices[i], f(own_values[i], T::ZERO));
                i += 1;
            }
            Ordering::Greater => {
                out.emit(other_indices[j], f(T::ZERO, other_values[j]));
                j += 1;
            }
        }
    }
    // At most one side still has entries; pair them with an implicit zero
    for k in i..own_indices.len() {
        out.emit(own_indices[k], f(own_values[k], T::ZERO));
    }
    for k in j..other_indices.len() {
        out.emit(other_indices[k], f(T::ZERO, other_values[k]));
    }

    trace!(
        own = own_indices.len(),
        other = other_indices.len(),
        emitted = out.indices.len(),
        "Sparse merge-join"
    );
    out.finish()
}

/// Enumerate a full positional sequence and keep the non-zero entries
///
/// Used for sparse-vs-dense merges and for operations where `f(0, 0) != 0`.
pub(crate) fn collect_nonzero<T, I>(values: I, length: usize) -> MergeOutput<T>
where
    T: Element,
    I: IntoIterator<Item = T>,
{
    let mut out = MergeBuffers::with_capacity(EngineConfig::current().merge_capacity(length));
    for (index, value) in values.into_iter().enumerate() {
        out.emit(index, value);
    }
    trace!(length, emitted = out.indices.len(), "Positional sparse walk");
    out.finish()
}
