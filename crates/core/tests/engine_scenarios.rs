//! End-to-end behaviour of the vector engine: conversions, promotion,
//! merge-join results, mutation and size checks

mod common;

use approx::assert_relative_eq;
use common::{init_tracing, vector};
use si_array_core::{ArrayError, LinearScale, Scale, SparseVector, StorageKind, VectorData};

const BOTH: [StorageKind; 2] = [StorageKind::Dense, StorageKind::Sparse];

#[test]
fn test_dense_to_sparse_scenario() {
    init_tracing();
    let d = vector(&[0.0, 5.0, 0.0, 3.0, 0.0], StorageKind::Dense);
    let VectorData::Sparse(s) = d.to_sparse() else {
        panic!("to_sparse must yield sparse storage");
    };
    assert_eq!(s.indices(), &[1, 3]);
    assert_eq!(s.values(), &[5.0, 3.0]);
    assert_eq!(s.size(), 5);
    assert_eq!(d.cardinality(), 2);
    assert_eq!(d.zsum(), 8.0);
}

#[test]
fn test_sparse_merge_drops_cancelled_position() {
    init_tracing();
    let a = VectorData::from(SparseVector::new(vec![0, 2], vec![2.0, 4.0], 3).unwrap());
    let b = VectorData::from(SparseVector::new(vec![1, 2], vec![10.0, -4.0], 3).unwrap());
    let VectorData::Sparse(sum) = a.plus(&b).unwrap() else {
        panic!("sparse plus sparse must stay sparse");
    };
    assert_eq!(sum.indices(), &[0, 1]);
    assert_eq!(sum.values(), &[2.0, 10.0]);
    assert_eq!(sum.size(), 3);
}

#[test]
fn test_set_si_removes_then_inserts_slot() {
    let mut a = VectorData::from(SparseVector::new(vec![1, 3], vec![5.0, 3.0], 5).unwrap());
    a.set_si(1, 0.0).unwrap();
    let VectorData::Sparse(s) = &a else {
        panic!("set_si must keep sparse storage");
    };
    assert_eq!(s.indices(), &[3]);
    assert_eq!(s.values(), &[3.0]);

    a.set_si(0, 7.0).unwrap();
    let VectorData::Sparse(s) = &a else {
        panic!("set_si must keep sparse storage");
    };
    assert_eq!(s.indices(), &[0, 3]);
    assert_eq!(s.values(), &[7.0, 3.0]);
}

#[test]
fn test_size_mismatch_reports_both_sizes() {
    init_tracing();
    for left_kind in BOTH {
        for right_kind in BOTH {
            let a = vector(&[1.0, 2.0, 3.0, 4.0], left_kind);
            let b = vector(&[1.0, 2.0, 3.0, 4.0, 5.0], right_kind);
            let err = a.plus(&b).unwrap_err();
            assert_eq!(err, ArrayError::SizeMismatch { left: 4, right: 5 });
            assert!(err.to_string().contains('4') && err.to_string().contains('5'));
        }
    }
}

#[test]
fn test_scaled_ingestion_for_either_kind() {
    let km = LinearScale::new(1000.0_f64);
    assert!(!km.is_base_si_scale());
    for kind in BOTH {
        let v = VectorData::from_raw(&[1.0, 2.0], &km, kind).unwrap();
        assert_eq!(v.storage_kind(), kind);
        assert_eq!(v.get_si(0), Ok(1000.0));
        assert_eq!(v.get_si(1), Ok(2000.0));
    }
}

#[test]
fn test_round_trip_conversions_preserve_content() {
    let raw = [0.0, -1.5, 0.0, 0.0, 8.25, f64::INFINITY, 0.0];
    for kind in BOTH {
        let a = vector(&raw, kind);
        assert_eq!(a.to_sparse().to_dense(), a);
        assert_eq!(a.to_dense().to_sparse(), a);
        assert_eq!(a.clone().into_sparse().into_dense(), a);
    }
}

#[test]
fn test_plus_promotion_and_commutativity() {
    let x = [0.0, 1.0, 0.0, -2.0, 7.5];
    let y = [3.0, 0.0, 0.0, 2.0, 0.5];
    for left_kind in BOTH {
        for right_kind in BOTH {
            let a = vector(&x, left_kind);
            let b = vector(&y, right_kind);
            let ab = a.plus(&b).unwrap();
            assert_eq!(ab, b.plus(&a).unwrap());
            assert_eq!(ab.is_sparse(), a.is_sparse() && b.is_sparse());
            assert_eq!(ab.dense_view().as_ref(), &[3.0, 1.0, 0.0, 0.0, 8.0]);
        }
    }
}

#[test]
fn test_times_and_divide_promotion() {
    let x = [0.0, 2.0, 3.0];
    let y = [4.0, 0.0, 2.0];
    for left_kind in BOTH {
        for right_kind in BOTH {
            let a = vector(&x, left_kind);
            let b = vector(&y, right_kind);
            let both_dense = a.is_dense() && b.is_dense();

            let product = a.times(&b).unwrap();
            assert_eq!(product.is_dense(), both_dense);
            assert_eq!(product.dense_view().as_ref(), &[0.0, 0.0, 6.0]);

            let quotient = a.divide(&b).unwrap();
            assert_eq!(quotient.is_dense(), both_dense);
            assert_eq!(quotient.get_si(0), Ok(0.0));
            assert_eq!(quotient.get_si(1), Ok(f64::INFINITY));
            assert_eq!(quotient.get_si(2), Ok(1.5));
        }
    }
}

#[test]
fn test_copy_is_independent() {
    for kind in BOTH {
        let a = vector(&[1.0, 0.0, 2.0], kind);
        let mut copy = a.to_dense();
        copy.set_si(0, 42.0).unwrap();
        copy.multiply_by_scalar(2.0);
        assert_eq!(a.get_si(0), Ok(1.0));
        assert_eq!(a.get_si(2), Ok(2.0));

        let mut clone = a.clone();
        clone.increment_by(&a).unwrap();
        assert_eq!(a.get_si(2), Ok(2.0));
        assert_eq!(clone.get_si(2), Ok(4.0));
    }
}

#[test]
fn test_large_zsum_agrees_across_kinds() {
    init_tracing();
    let n: usize = 20_000;
    let raw: Vec<f64> = (0..n)
        .map(|i| if i % 3 == 0 { 0.0 } else { 1e3 + (i as f64 * 0.37).sin() * 1e2 })
        .collect();
    let dense = vector(&raw, StorageKind::Dense);
    let sparse = vector(&raw, StorageKind::Sparse);
    assert_eq!(dense, sparse);
    assert_eq!(dense.cardinality(), sparse.cardinality());
    let sequential: f64 = raw.iter().sum();
    assert_relative_eq!(dense.zsum(), sparse.zsum(), max_relative = 1e-9);
    assert_relative_eq!(dense.zsum(), sequential, max_relative = 1e-9);
}

#[test]
fn test_large_dense_operators_match_elementwise_reference() {
    let n: usize = 4096;
    let x: Vec<f64> = (0..n).map(|i| (i % 11) as f64 - 5.0).collect();
    let y: Vec<f64> = (0..n).map(|i| (i % 7) as f64 + 1.0).collect();
    let a = vector(&x, StorageKind::Dense);
    let b = vector(&y, StorageKind::Dense);

    let expected: Vec<f64> = x.iter().zip(&y).map(|(p, q)| p / q).collect();
    assert_eq!(a.divide(&b).unwrap().dense_view().as_ref(), expected.as_slice());

    let mut c = a.clone();
    c.decrement_by(&b).unwrap();
    let expected: Vec<f64> = x.iter().zip(&y).map(|(p, q)| p - q).collect();
    assert_eq!(c.dense_view().as_ref(), expected.as_slice());
}

#[test]
fn test_hash_ignores_storage_kind() {
    let raw = [0.0, 0.0, -3.0, 0.0, 1e-12];
    let d = vector(&raw, StorageKind::Dense);
    let s = vector(&raw, StorageKind::Sparse);
    assert_eq!(d.fingerprint(), s.fingerprint());

    let mut negated_zero = d.clone();
    negated_zero.set_si(0, -0.0).unwrap();
    assert_eq!(negated_zero, s);
    assert_eq!(negated_zero.fingerprint(), s.fingerprint());
}
