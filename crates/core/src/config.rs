//! Engine tuning shared by every array operation
//!
//! The configuration is process-wide, in the same way as rayon's global
//! thread pool: it can be installed once before first use, and is otherwise
//! initialised lazily from the environment.
//!
//! | Variable                       | Field                    | Default |
//! |--------------------------------|--------------------------|---------|
//! | `SI_ARRAY_PARALLEL_THRESHOLD`  | `parallel_threshold`     | 1000    |
//! | `SI_ARRAY_MERGE_CAPACITY`      | `merge_initial_capacity` | 16      |

use crate::error::{ArrayError, Result};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Environment variable overriding [`EngineConfig::parallel_threshold`]
pub const PARALLEL_THRESHOLD_ENV: &str = "SI_ARRAY_PARALLEL_THRESHOLD";

/// Environment variable overriding [`EngineConfig::merge_initial_capacity`]
pub const MERGE_CAPACITY_ENV: &str = "SI_ARRAY_MERGE_CAPACITY";

static GLOBAL: OnceLock<EngineConfig> = OnceLock::new();

/// Tuning knobs for the array engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Element count above which bulk operations fan out over rayon.
    /// Conversion, dense element-wise operators, reductions and scalar
    /// scaling all honour it.
    pub parallel_threshold: usize,

    /// Starting capacity of the output buffers of a sparse merge-join.
    /// Buffers grow geometrically and are trimmed to the emitted count.
    pub merge_initial_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 1000,
            merge_initial_capacity: 16,
        }
    }
}

impl EngineConfig {
    /// Build a config from the environment, falling back to defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            parallel_threshold: read_var(
                PARALLEL_THRESHOLD_ENV,
                lookup(PARALLEL_THRESHOLD_ENV),
                defaults.parallel_threshold,
            ),
            merge_initial_capacity: read_var(
                MERGE_CAPACITY_ENV,
                lookup(MERGE_CAPACITY_ENV),
                defaults.merge_initial_capacity,
            ),
        }
    }

    /// Install this config as the process-wide engine config
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidArgument`] if a config was already
    /// installed, or if an array operation already initialised it lazily.
    pub fn install(self) -> Result<()> {
        GLOBAL.set(self).map_err(|_| {
            ArrayError::invalid_argument("config", "engine config is already initialised")
        })?;
        debug!(config = ?self, "Installed engine config");
        Ok(())
    }

    /// The process-wide engine config
    pub fn current() -> &'static EngineConfig {
        GLOBAL.get_or_init(|| {
            let config = Self::from_env();
            debug!(?config, "Initialised engine config from environment");
            config
        })
    }

    /// True if a bulk operation over `len` elements should run in parallel
    #[inline]
    #[must_use]
    pub fn parallel_for(&self, len: usize) -> bool {
        len > self.parallel_threshold
    }

    /// Initial merge buffer capacity for a result of logical length `len`
    #[inline]
    #[must_use]
    pub fn merge_capacity(&self, len: usize) -> usize {
        self.merge_initial_capacity.min(len)
    }
}

fn read_var(key: &str, raw: Option<String>, default: usize) -> usize {
    let Some(raw) = raw else {
        return default;
    };
    raw.trim().parse().unwrap_or_else(|_| {
        warn!("Ignoring unparsable {key}={raw:?}, using {default}");
        default
    })
}
