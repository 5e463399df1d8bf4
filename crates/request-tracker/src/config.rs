// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Tracker configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tracker::DEFAULT_CAPACITY;

/// Largest accepted capacity. Lookups scan every slot, so the ring is meant to
/// stay small.
pub const MAX_CAPACITY: usize = 65_536;

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Serialization/deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Requested capacity exceeds [`MAX_CAPACITY`].
    #[error("capacity {requested} exceeds the maximum of {max}")]
    CapacityTooLarge {
        /// Capacity that was asked for.
        requested: usize,
        /// Upper bound.
        max: usize,
    },
}

/// Construction-time settings for a [`RequestTracker`](crate::RequestTracker).
///
/// Missing fields take their defaults, so `{}` is a valid document. The
/// synchronization mode is chosen through the tracker's type parameter and is
/// not part of this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    /// Number of call slots; `0` disables tracking.
    pub capacity: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl TrackerConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(bytes)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<Vec<u8>, ConfigError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Check the settings against hard limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity > MAX_CAPACITY {
            return Err(ConfigError::CapacityTooLarge {
                requested: self.capacity,
                max: MAX_CAPACITY,
            });
        }
        Ok(())
    }
}
