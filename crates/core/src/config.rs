// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bus configuration
//!
//! ```toml
//! # Log unmatched unsubscribe calls at warn level (debug otherwise)
//! warn_on_unregistered = true
//! # Maximum nesting of sends; 0 (the default) disables the limit
//! max_depth = 256
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default limit on nested sends; 0 means unlimited
pub const DEFAULT_MAX_DEPTH: usize = 0;

/// Settings for an [`EventBus`](crate::EventBus)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BusConfig {
    /// Report unsubscribe calls that match no listener at warn level
    pub warn_on_unregistered: bool,
    /// Maximum nesting of `send` calls; 0 means unlimited
    pub max_depth: usize,
}

impl BusConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_warn_on_unregistered(mut self, warn: bool) -> Self {
        self.warn_on_unregistered = warn;
        self
    }

    /// The effective depth limit, if any
    pub fn depth_limit(&self) -> Option<usize> {
        (self.max_depth > 0).then_some(self.max_depth)
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            warn_on_unregistered: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
