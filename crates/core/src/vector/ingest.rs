//! Construction of [`VectorData`] from external inputs
//!
//! Every entry point converts to SI exactly once per element and then hands
//! the SI buffer to the requested store. Dense targets keep the buffer; sparse
//! targets count the non-zeros and fill their index/value arrays in one
//! ordered pass.

use super::dense::{map_assign, map_to_vec, DenseVector};
use super::sparse::SparseVector;
use super::VectorData;
use crate::config::EngineConfig;
use crate::element::Element;
use crate::error::{ArrayError, Result};
use crate::quantity::SiValue;
use crate::scale::Scale;
use crate::storage::StorageKind;
use rayon::prelude::*;
use tracing::debug;

impl<T: Element> VectorData<T> {
    /// Build from raw values expressed in `scale`'s unit
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidArgument`] if `values` is empty.
    pub fn from_raw<S>(values: &[T], scale: &S, kind: StorageKind) -> Result<Self>
    where
        S: Scale<T> + ?Sized,
    {
        if values.is_empty() {
            return Err(ArrayError::empty("values"));
        }
        debug!(
            len = values.len(),
            %kind,
            base_si = scale.is_base_si_scale(),
            parallel = EngineConfig::current().parallel_for(values.len()),
            "Ingesting raw values"
        );
        let si = if scale.is_base_si_scale() {
            values.to_vec()
        } else {
            map_to_vec(values, |v| scale.to_standard_unit(v))
        };
        Ok(Self::from_si_buffer(si, kind))
    }

    /// Build from an owned list of raw values, converting in place
    ///
    /// With a base SI scale and a dense target the list becomes the store
    /// without copying.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidArgument`] if `values` is empty.
    pub fn from_list<S>(mut values: Vec<T>, scale: &S, kind: StorageKind) -> Result<Self>
    where
        S: Scale<T> + ?Sized,
    {
        if values.is_empty() {
            return Err(ArrayError::empty("values"));
        }
        debug!(len = values.len(), %kind, "Ingesting raw list");
        if !scale.is_base_si_scale() {
            map_assign(&mut values, |v| scale.to_standard_unit(v));
        }
        Ok(Self::from_si_buffer(values, kind))
    }

    /// Build from SI-tagged scalars; no scale is involved
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidArgument`] if `values` is empty.
    pub fn from_scalars<Q>(values: &[Q], kind: StorageKind) -> Result<Self>
    where
        Q: SiValue<T> + Sync,
    {
        if values.is_empty() {
            return Err(ArrayError::empty("values"));
        }
        let parallel = EngineConfig::current().parallel_for(values.len());
        debug!(len = values.len(), %kind, parallel, "Ingesting scalars");
        let si: Vec<T> = if parallel {
            values.par_iter().map(SiValue::si).collect()
        } else {
            values.iter().map(SiValue::si).collect()
        };
        Ok(Self::from_si_buffer(si, kind))
    }

    /// Build from a sequence of SI-tagged scalars
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidArgument`] if the sequence is empty.
    pub fn from_scalar_iter<Q, I>(values: I, kind: StorageKind) -> Result<Self>
    where
        Q: SiValue<T>,
        I: IntoIterator<Item = Q>,
    {
        let si: Vec<T> = values.into_iter().map(|q| q.si()).collect();
        if si.is_empty() {
            return Err(ArrayError::empty("values"));
        }
        debug!(len = si.len(), %kind, "Ingesting scalar sequence");
        Ok(Self::from_si_buffer(si, kind))
    }

    /// Build from `position -> raw value` entries plus an explicit length
    ///
    /// Entries may arrive in any order. Absent positions hold the raw value
    /// zero converted through `scale`, which is not SI zero on an offset scale.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidArgument`] if `length` is zero, or if a
    /// key is out of range or repeated.
    pub fn from_sparse_map<S, I>(
        entries: I,
        length: usize,
        scale: &S,
        kind: StorageKind,
    ) -> Result<Self>
    where
        S: Scale<T> + ?Sized,
        I: IntoIterator<Item = (usize, T)>,
    {
        let mut entries = ordered_entries(entries, length)?;
        if !scale.is_base_si_scale() {
            if EngineConfig::current().parallel_for(entries.len()) {
                entries
                    .par_iter_mut()
                    .for_each(|(_, v)| *v = scale.to_standard_unit(*v));
            } else {
                for (_, v) in &mut entries {
                    *v = scale.to_standard_unit(*v);
                }
            }
        }
        let fill = scale.to_standard_unit(T::ZERO);
        debug!(entries = entries.len(), length, %kind, "Ingesting raw map");
        Ok(Self::from_si_entries(&entries, length, fill, kind))
    }

    /// Build from `position -> SI-tagged scalar` entries plus an explicit length
    ///
    /// Absent positions are SI zero.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidArgument`] if `length` is zero, or if a
    /// key is out of range or repeated.
    pub fn from_scalar_map<Q, I>(entries: I, length: usize, kind: StorageKind) -> Result<Self>
    where
        Q: SiValue<T>,
        I: IntoIterator<Item = (usize, Q)>,
    {
        let entries = ordered_entries(
            entries.into_iter().map(|(index, q)| (index, q.si())),
            length,
        )?;
        debug!(entries = entries.len(), length, %kind, "Ingesting scalar map");
        Ok(Self::from_si_entries(&entries, length, T::ZERO, kind))
    }

    fn from_si_buffer(si: Vec<T>, kind: StorageKind) -> Self {
        match kind {
            StorageKind::Dense => Self::Dense(DenseVector::new(si)),
            StorageKind::Sparse => Self::Sparse(SparseVector::from_dense_slice(&si)),
        }
    }

    /// `entries` must be ascending, unique and in range
    fn from_si_entries(
        entries: &[(usize, T)],
        length: usize,
        fill: T,
        kind: StorageKind,
    ) -> Self {
        if kind == StorageKind::Sparse && fill.is_zero() {
            if entries.is_empty() {
                return Self::Sparse(SparseVector::zeros(length));
            }
            let (indices, values) = entries
                .iter()
                .filter(|(_, v)| !v.is_zero())
                .copied()
                .unzip();
            return Self::Sparse(SparseVector::from_parts(indices, values, length));
        }
        let mut si = vec![fill; length];
        for &(index, value) in entries {
            si[index] = value;
        }
        Self::from_si_buffer(si, kind)
    }
}

/// Collect map entries, reject bad keys, and sort by key if needed
fn ordered_entries<T, I>(entries: I, length: usize) -> Result<Vec<(usize, T)>>
where
    T: Element,
    I: IntoIterator<Item = (usize, T)>,
{
    if length == 0 {
        return Err(ArrayError::empty("length"));
    }
    let mut entries: Vec<(usize, T)> = entries.into_iter().collect();
    if let Some(&(index, _)) = entries.iter().find(|(index, _)| *index >= length) {
        return Err(ArrayError::invalid_argument(
            "map",
            format!("key {index} out of range for length {length}"),
        ));
    }
    if entries.windows(2).any(|w| w[0].0 > w[1].0) {
        entries.sort_unstable_by_key(|&(index, _)| index);
    }
    if let Some(w) = entries.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(ArrayError::invalid_argument(
            "map",
            format!("duplicate key {}", w[0].0),
        ));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::{Dimension, Quantity};
    use crate::scale::{IdentityScale, LinearScale, OffsetLinearScale};
    use rustc_hash::FxHashMap;
    use std::collections::BTreeMap;

    #[derive(Debug, Clone, Copy)]
    struct Length;

    impl Dimension for Length {
        const SI_UNIT: &'static str = "m";
    }

    #[test]
    fn test_dense_ingestion_applies_scale() {
        let km = LinearScale::new(1000.0);
        let v = VectorData::from_raw(&[1.0, 2.0, 3.0], &km, StorageKind::Dense).unwrap();
        assert!(v.is_dense());
        assert_eq!(v.dense_view().as_ref(), &[1000.0, 2000.0, 3000.0]);
    }

    #[test]
    fn test_sparse_ingestion_filters_zeros() {
        let raw = [0.0, 5.0, 0.0, 3.0, 0.0];
        let v = VectorData::from_raw(&raw, &IdentityScale, StorageKind::Sparse).unwrap();
        let VectorData::Sparse(s) = v else {
            panic!("expected sparse storage");
        };
        assert_eq!(s.indices(), &[1, 3]);
        assert_eq!(s.values(), &[5.0, 3.0]);
        assert_eq!(s.size(), 5);
    }

    #[test]
    fn test_empty_inputs_rejected() {
        let err = VectorData::<f64>::from_raw(&[], &IdentityScale, StorageKind::Dense).unwrap_err();
        assert_eq!(err, ArrayError::empty("values"));
        assert!(VectorData::<f64>::from_list(vec![], &IdentityScale, StorageKind::Sparse).is_err());
        let no_scalars: [Quantity<f64, Length>; 0] = [];
        assert!(VectorData::from_scalars(&no_scalars, StorageKind::Dense).is_err());
    }

    #[test]
    fn test_list_converts_in_place() {
        let half = LinearScale::new(0.5);
        let v = VectorData::from_list(vec![100.0, 0.0, 250.0], &half, StorageKind::Sparse).unwrap();
        assert_eq!(v.cardinality(), 2);
        assert_eq!(v.get_si(2), Ok(125.0));
    }

    #[test]
    fn test_scalars_read_their_own_si() {
        let km = LinearScale::new(1000.0);
        let q: Vec<Quantity<f64, Length>> = vec![Quantity::new(1.5, &km), Quantity::from_si(0.0)];
        let v = VectorData::from_scalars(&q, StorageKind::Sparse).unwrap();
        assert_eq!(v.cardinality(), 1);
        assert_eq!(v.get_si(0), Ok(1500.0));

        let w = VectorData::from_scalar_iter(q.iter(), StorageKind::Dense).unwrap();
        assert_eq!(v, w);
    }

    #[test]
    fn test_unordered_map_is_sorted() {
        let mut map = FxHashMap::default();
        map.insert(7, 2.0);
        map.insert(2, 1.0);
        map.insert(4, 0.0);
        let v = VectorData::from_sparse_map(map, 10, &IdentityScale, StorageKind::Sparse).unwrap();
        let VectorData::Sparse(s) = v else {
            panic!("expected sparse storage");
        };
        assert_eq!(s.indices(), &[2, 7]);
        assert_eq!(s.values(), &[1.0, 2.0]);
    }

    #[test]
    fn test_map_keys_validated() {
        let err = VectorData::from_sparse_map([(10, 1.0)], 10, &IdentityScale, StorageKind::Dense)
            .unwrap_err();
        assert!(matches!(err, ArrayError::InvalidArgument { param: "map", .. }));

        let err = VectorData::from_sparse_map(
            [(3, 1.0), (3, 2.0)],
            10,
            &IdentityScale,
            StorageKind::Sparse,
        )
        .unwrap_err();
        assert!(matches!(err, ArrayError::InvalidArgument { param: "map", .. }));

        let err = VectorData::<f64>::from_sparse_map([], 0, &IdentityScale, StorageKind::Dense)
            .unwrap_err();
        assert_eq!(err, ArrayError::empty("length"));
    }

    #[test]
    fn test_empty_map_is_all_zero() {
        let v = VectorData::<f64>::from_sparse_map([], 4, &IdentityScale, StorageKind::Sparse)
            .unwrap();
        assert_eq!(v.size(), 4);
        assert_eq!(v.cardinality(), 0);
        assert_eq!(v, VectorData::Sparse(SparseVector::zeros(4)));
    }

    #[test]
    fn test_offset_scale_map_fills_absent_positions() {
        let celsius = OffsetLinearScale::new(1.0, 273.15);
        let map = BTreeMap::from([(1, 10.0)]);
        let v = VectorData::from_sparse_map(map, 3, &celsius, StorageKind::Sparse).unwrap();
        assert_eq!(v.cardinality(), 3);
        assert!((v.get_si(0).unwrap() - 273.15).abs() < 1e-9);
        assert!((v.get_si(1).unwrap() - 283.15).abs() < 1e-9);
    }

    #[test]
    fn test_scalar_map_dense_target() {
        let map = BTreeMap::from([
            (0, Quantity::<f64, Length>::from_si(4.0)),
            (2, Quantity::from_si(-1.0)),
        ]);
        let v = VectorData::from_scalar_map(map, 3, StorageKind::Dense).unwrap();
        assert_eq!(v.dense_view().as_ref(), &[4.0, 0.0, -1.0]);
    }

    #[test]
    fn test_large_map_conversion_matches_sequential() {
        let scale = LinearScale::new(3.0);
        let entries: Vec<(usize, f64)> = (0..3000).rev().map(|i| (i, (i % 4) as f64)).collect();
        let v = VectorData::from_sparse_map(entries, 3000, &scale, StorageKind::Sparse).unwrap();
        assert_eq!(v.cardinality(), 2250);
        assert_eq!(v.get_si(2999), Ok(9.0));
        assert_eq!(v.get_si(2998), Ok(6.0));
        assert_eq!(v.get_si(2996), Ok(0.0));
    }
}
