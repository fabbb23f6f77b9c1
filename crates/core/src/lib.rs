//! SI Array Core Library
//!
//! Storage and arithmetic engine for arrays of physical quantities. Every
//! value is held as an SI magnitude; unit scales are applied once, on the
//! way in, and optionally on the way out.
//!
//! ## Storage
//!
//! Arrays are either dense (one magnitude per position) or sparse (ascending
//! non-zero positions plus their magnitudes). Both layouts answer the same
//! queries, compare equal when their logical content is equal, and combine
//! freely in element-wise arithmetic:
//! - allocating `plus`/`minus` stay sparse only when both operands are sparse
//! - allocating `times`/`divide` stay dense only when both operands are dense
//! - mutating operators keep the receiver's layout
//! - two sparse operands are combined with a linear merge-join
//!
//! Bulk work above [`EngineConfig::parallel_threshold`] elements runs on
//! rayon's global pool.
//!
//! ## Usage
//! ```
//! use si_array_core::{IdentityScale, LinearScale, StorageKind, VectorData};
//!
//! let km = LinearScale::new(1000.0_f64);
//! let a = VectorData::from_raw(&[0.0, 1.5, 0.0, 2.0], &km, StorageKind::Sparse)?;
//! let b = VectorData::from_raw(&[500.0, 0.0, 0.0, 0.0], &IdentityScale, StorageKind::Dense)?;
//!
//! let sum = a.plus(&b)?;
//! assert!(sum.is_dense());
//! assert_eq!(sum.get_si(0)?, 500.0);
//! assert_eq!(sum.get_in(1, &km)?, 1.5);
//! # Ok::<(), si_array_core::ArrayError>(())
//! ```

pub mod config;
pub mod element;
pub mod error;
pub mod interop;
pub mod matrix;
pub mod quantity;
pub mod scale;
pub mod storage;
pub mod vector;

// Re-export the engine surface
pub use config::EngineConfig;
pub use element::Element;
pub use error::{ArrayError, Result};
pub use matrix::MatrixData;
pub use quantity::{Dimension, Quantity, SiValue};
pub use scale::{IdentityScale, LinearScale, OffsetLinearScale, Scale};
pub use storage::StorageKind;
pub use vector::{DenseVector, SparseVector, VectorData};
