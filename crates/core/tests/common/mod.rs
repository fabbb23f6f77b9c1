//! Shared helpers for the integration tests

use si_array_core::{IdentityScale, StorageKind, VectorData};
use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Route engine logs to the test output; filter with `RUST_LOG`
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// SI vector built from already-SI values
pub fn vector(values: &[f64], kind: StorageKind) -> VectorData<f64> {
    VectorData::from_raw(values, &IdentityScale, kind).unwrap()
}
