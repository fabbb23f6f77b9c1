//! Physical layout of an SI array

use crate::error::ArrayError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Storage layout of an array of SI magnitudes
///
/// Fixed at construction. Conversions always produce a new array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// One magnitude per logical position
    Dense,
    /// Ascending non-zero positions with their magnitudes
    Sparse,
}

impl StorageKind {
    /// Decode a numeric storage code (`0` = dense, `1` = sparse)
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::UnsupportedStorageKind`] for any other code.
    pub fn from_code(code: u8) -> Result<Self, ArrayError> {
        match code {
            0 => Ok(Self::Dense),
            1 => Ok(Self::Sparse),
            other => Err(ArrayError::UnsupportedStorageKind(format!("code {other}"))),
        }
    }

    /// Numeric storage code, inverse of [`StorageKind::from_code`]
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Dense => 0,
            Self::Sparse => 1,
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dense => write!(f, "dense"),
            Self::Sparse => write!(f, "sparse"),
        }
    }
}

impl FromStr for StorageKind {
    type Err = ArrayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dense" => Ok(Self::Dense),
            "sparse" => Ok(Self::Sparse),
            _ => Err(ArrayError::UnsupportedStorageKind(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_storage_kind() {
        assert_eq!("dense".parse::<StorageKind>(), Ok(StorageKind::Dense));
        assert_eq!(" Sparse ".parse::<StorageKind>(), Ok(StorageKind::Sparse));
    }

    #[test]
    fn test_unknown_storage_kind_rejected() {
        let err = "banded".parse::<StorageKind>().unwrap_err();
        assert_eq!(err, ArrayError::UnsupportedStorageKind("banded".into()));
        assert!(matches!(
            StorageKind::from_code(7),
            Err(ArrayError::UnsupportedStorageKind(_))
        ));
    }

    #[test]
    fn test_code_round_trip() {
        for kind in [StorageKind::Dense, StorageKind::Sparse] {
            assert_eq!(StorageKind::from_code(kind.code()), Ok(kind));
        }
    }
}
