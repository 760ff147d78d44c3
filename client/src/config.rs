///////////////////////////////////////////////////////////////////////////////
//
//  Copyright 2018-2026 Robonomics Network <research@robonomics.network>
//
//  Licensed under the Apache License, Version 2.0 (the "License");
//  you may not use this file except in compliance with the License.
//  You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
//
///////////////////////////////////////////////////////////////////////////////
//! Per-chain construction settings.
//!
//! # Examples
//!
//! ```
//! use libtxkit::config::{ChainConfig, NonceWidth};
//!
//! let config = ChainConfig::from_toml_str(r#"
//!     ss58_prefix = 32
//!     mortal_period = 64
//!
//!     [account_layouts]
//!     base = "with_sufficients"
//!     upgrades = [{ from_spec = 9420, layout = "with_frozen" }]
//! "#).unwrap();
//!
//! assert_eq!(config.ss58_prefix, 32);
//! assert_eq!(config.nonce_width, NonceWidth::U32);
//! assert_eq!(config.payload_hash_threshold, 256);
//! ```

use crate::error::ConfigError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;
use txkit_primitives::era::{MAX_PERIOD, MIN_PERIOD};
use txkit_primitives::AccountInfoLayouts;

/// The only extrinsic format version produced and accepted.
pub const EXTRINSIC_VERSION: u8 = 4;

/// Largest valid SS58 network id.
pub const MAX_SS58_PREFIX: u16 = 16_383;

/// Width of the account nonce in the target runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonceWidth {
    /// `u32` nonce.
    #[default]
    U32,
    /// `u64` nonce.
    U64,
}

impl NonceWidth {
    /// Largest representable nonce.
    pub fn max(&self) -> u64 {
        match self {
            NonceWidth::U32 => u32::MAX as u64,
            NonceWidth::U64 => u64::MAX,
        }
    }

    /// Type name.
    pub fn name(&self) -> &'static str {
        match self {
            NonceWidth::U32 => "u32",
            NonceWidth::U64 => "u64",
        }
    }
}

/// Chain specific settings for building and signing extrinsics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// SS58 network id used for rendered addresses.
    pub ss58_prefix: u16,
    /// Extrinsic format version.
    pub extrinsic_version: u8,
    /// Signing payloads longer than this are signed by their blake2-256 hash.
    pub payload_hash_threshold: usize,
    /// Account nonce width.
    pub nonce_width: NonceWidth,
    /// Mortality window for new transactions, immortal when unset.
    pub mortal_period: Option<u64>,
    /// `System.Account` layouts by spec version.
    pub account_layouts: AccountInfoLayouts,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            ss58_prefix: 42,
            extrinsic_version: EXTRINSIC_VERSION,
            payload_hash_threshold: 256,
            nonce_width: NonceWidth::U32,
            mortal_period: None,
            account_layouts: AccountInfoLayouts::default(),
        }
    }
}

impl ChainConfig {
    /// Load and validate a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("Loading chain config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate TOML configuration text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: ChainConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extrinsic_version != EXTRINSIC_VERSION {
            return Err(ConfigError::Invalid(format!(
                "extrinsic_version {} is not supported, only {EXTRINSIC_VERSION}",
                self.extrinsic_version
            )));
        }
        if self.ss58_prefix > MAX_SS58_PREFIX {
            return Err(ConfigError::Invalid(format!(
                "ss58_prefix {} is above {MAX_SS58_PREFIX}",
                self.ss58_prefix
            )));
        }
        if self.payload_hash_threshold == 0 {
            return Err(ConfigError::Invalid(
                "payload_hash_threshold must be positive".into(),
            ));
        }
        if let Some(period) = self.mortal_period {
            if !(MIN_PERIOD..=MAX_PERIOD).contains(&period) {
                return Err(ConfigError::Invalid(format!(
                    "mortal_period {period} is outside {MIN_PERIOD}..={MAX_PERIOD}"
                )));
            }
        }
        Ok(())
    }
}
