//! Installing an engine config before first use. Runs in its own process so
//! the global config starts uninstalled.

mod common;

use common::{init_tracing, vector};
use si_array_core::{ArrayError, EngineConfig, StorageKind, VectorData};

#[test]
fn test_install_before_first_use_drives_parallel_paths() {
    let config = EngineConfig {
        parallel_threshold: 2,
        ..EngineConfig::default()
    };
    assert_eq!(config.install(), Ok(()));
    init_tracing();

    let current = EngineConfig::current();
    assert_eq!(current, &config);
    assert!(current.parallel_for(3));

    let a = vector(&[1.5, -2.0, 0.1], StorageKind::Dense);
    let b = vector(&[0.25, 4.0, 0.2], StorageKind::Dense);
    let sum = a.plus(&b).unwrap();
    let expected = [1.5_f64 + 0.25, -2.0 + 4.0, 0.1 + 0.2];
    let got = sum.dense_view();
    for (g, e) in got.iter().zip(expected) {
        assert_eq!(g.to_bits(), e.to_bits());
    }

    let sparse: VectorData<f64> = vector(&[0.0, 3.0, 0.0, 1.0], StorageKind::Sparse);
    assert_eq!(sparse.cardinality(), 2);
    assert_eq!(sparse.zsum(), 4.0);
    assert_eq!(sparse.to_dense().zsum(), 4.0);

    let err = EngineConfig::default().install().unwrap_err();
    assert!(matches!(
        err,
        ArrayError::InvalidArgument {
            param: "config",
            ..
        }
    ));
    assert_eq!(EngineConfig::current().parallel_threshold, 2);
}
