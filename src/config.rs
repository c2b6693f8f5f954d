// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

use crate::record::MAX_SALT_CHARS;

/// Maximum size of a record value in bytes as defined by BEP0044.
pub const MAX_VALUE_SIZE: usize = 1000;

/// Limits a resolver enforces on candidate records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Candidates with a larger value (in bytes) are rejected.
    ///
    /// Defaults to 1000 bytes.
    pub max_value_size: usize,

    /// Candidates with a longer salt (in characters) are rejected.
    ///
    /// Defaults to 64 characters. Salts are already cut to this length when records get
    /// normalized, so only lower limits have an effect.
    pub max_salt_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_value_size: MAX_VALUE_SIZE,
            max_salt_length: MAX_SALT_CHARS,
        }
    }
}

impl Config {
    pub fn with_max_value_size(mut self, max_value_size: usize) -> Self {
        self.max_value_size = max_value_size;
        self
    }

    pub fn with_max_salt_length(mut self, max_salt_length: usize) -> Self {
        self.max_salt_length = max_salt_length;
        self
    }
}
