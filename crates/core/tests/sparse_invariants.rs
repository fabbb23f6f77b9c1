//! Randomized checks that sparse storage keeps its layout invariants and
//! agrees with a plain dense reference under every operation

mod common;

use common::{init_tracing, vector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use si_array_core::{StorageKind, VectorData};

fn assert_sparse_layout(v: &VectorData<f64>) {
    let VectorData::Sparse(s) = v else {
        panic!("expected sparse storage");
    };
    assert_eq!(s.indices().len(), s.values().len());
    assert!(s.indices().windows(2).all(|w| w[0] < w[1]));
    assert!(s.indices().iter().all(|&i| i < s.size()));
    assert!(s.values().iter().all(|&v| v != 0.0));
}

/// Mostly-zero random values with a few small integers
fn random_values(rng: &mut StdRng, len: usize) -> Vec<f64> {
    (0..len)
        .map(|_| {
            if rng.random_bool(0.7) {
                0.0
            } else {
                f64::from(rng.random_range(-4_i32..=4))
            }
        })
        .collect()
}

fn same(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

fn assert_matches_reference(v: &VectorData<f64>, reference: &[f64]) {
    let view = v.dense_view();
    assert_eq!(view.len(), reference.len());
    for (i, (&got, &want)) in view.iter().zip(reference).enumerate() {
        assert!(same(got, want), "position {i}: got {got}, want {want}");
    }
}

#[test]
fn test_random_set_si_keeps_invariants() {
    init_tracing();
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let len = 64;
    let mut shadow = vec![0.0; len];
    let mut v = vector(&shadow, StorageKind::Sparse);

    for _ in 0..2000 {
        let index = rng.random_range(0..len);
        let value = if rng.random_bool(0.4) {
            0.0
        } else {
            rng.random_range(-10.0..10.0)
        };
        v.set_si(index, value).unwrap();
        shadow[index] = value;
        assert_sparse_layout(&v);
    }
    assert_matches_reference(&v, &shadow);
    assert_eq!(v.cardinality(), shadow.iter().filter(|x| **x != 0.0).count());
}

#[test]
fn test_random_binary_operators_match_reference() {
    init_tracing();
    let mut rng = StdRng::seed_from_u64(42);
    let kinds = [StorageKind::Dense, StorageKind::Sparse];
    let ops: [(&str, fn(f64, f64) -> f64); 4] = [
        ("plus", |a, b| a + b),
        ("minus", |a, b| a - b),
        ("times", |a, b| a * b),
        ("divide", |a, b| a / b),
    ];

    for _ in 0..25 {
        let len = rng.random_range(1..40);
        let x = random_values(&mut rng, len);
        let y = random_values(&mut rng, len);
        for left in kinds {
            for right in kinds {
                let a = vector(&x, left);
                let b = vector(&y, right);
                for (name, f) in ops {
                    let reference: Vec<f64> = x.iter().zip(&y).map(|(&p, &q)| f(p, q)).collect();
                    let result = match name {
                        "plus" => a.plus(&b),
                        "minus" => a.minus(&b),
                        "times" => a.times(&b),
                        _ => a.divide(&b),
                    }
                    .unwrap();
                    assert_matches_reference(&result, &reference);
                    if result.is_sparse() {
                        assert_sparse_layout(&result);
                    }

                    let mut target = a.clone();
                    match name {
                        "plus" => target.increment_by(&b),
                        "minus" => target.decrement_by(&b),
                        "times" => target.multiply_by(&b),
                        _ => target.divide_by(&b),
                    }
                    .unwrap();
                    assert_eq!(target.storage_kind(), left);
                    assert_matches_reference(&target, &reference);
                    if target.is_sparse() {
                        assert_sparse_layout(&target);
                    }
                }
            }
        }
    }
}

#[test]
fn test_random_scalar_operators_match_reference() {
    let mut rng = StdRng::seed_from_u64(7);
    let scalars = [0.0, 2.0, -0.5, f64::INFINITY, f64::NAN];
    for _ in 0..20 {
        let len = rng.random_range(1..30);
        let x = random_values(&mut rng, len);
        for s in scalars {
            let mut v = vector(&x, StorageKind::Sparse);
            v.multiply_by_scalar(s);
            let reference: Vec<f64> = x.iter().map(|p| p * s).collect();
            assert_matches_reference(&v, &reference);
            assert_sparse_layout(&v);

            let mut v = vector(&x, StorageKind::Sparse);
            v.divide_by_scalar(s);
            let reference: Vec<f64> = x.iter().map(|p| p / s).collect();
            assert_matches_reference(&v, &reference);
            assert_sparse_layout(&v);

            let mut v = vector(&x, StorageKind::Sparse);
            v.increment_by_scalar(s);
            let reference: Vec<f64> = x.iter().map(|p| p + s).collect();
            assert_matches_reference(&v, &reference);
            assert_sparse_layout(&v);
        }
    }
}

#[test]
fn test_large_sparse_merge_agrees_with_dense() {
    let mut rng = StdRng::seed_from_u64(2024);
    let len = 5000;
    let x = random_values(&mut rng, len);
    let y = random_values(&mut rng, len);

    let sparse_sum = vector(&x, StorageKind::Sparse)
        .plus(&vector(&y, StorageKind::Sparse))
        .unwrap();
    let dense_sum = vector(&x, StorageKind::Dense)
        .plus(&vector(&y, StorageKind::Dense))
        .unwrap();
    assert!(sparse_sum.is_sparse());
    assert_sparse_layout(&sparse_sum);
    assert_eq!(sparse_sum, dense_sum);
    assert_eq!(sparse_sum.fingerprint(), dense_sum.fingerprint());
}
