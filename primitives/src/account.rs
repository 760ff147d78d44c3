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
//! `System.Account` value shapes.
//!
//! The layout of the stored account record changed several times over the
//! life of Substrate runtimes, and two of the layouts have the same length.
//! The shape is therefore chosen by runtime spec version through
//! [`AccountInfoLayouts`] and never guessed from the bytes.

use crate::codec::{self, decode_exact};
use crate::{Balance, Nonce};
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Balances with separate misc and fee freezes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode)]
pub struct LegacyAccountData {
    /// Free balance.
    pub free: Balance,
    /// Reserved balance.
    pub reserved: Balance,
    /// Frozen for anything but transaction fees.
    pub misc_frozen: Balance,
    /// Frozen for transaction fees.
    pub fee_frozen: Balance,
}

/// Balances with a single freeze amount and status flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode)]
pub struct AccountData {
    /// Free balance.
    pub free: Balance,
    /// Reserved balance.
    pub reserved: Balance,
    /// Frozen balance.
    pub frozen: Balance,
    /// Account status bits.
    pub flags: u128,
}

/// Account record before provider reference counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode)]
pub struct LegacyAccountInfo {
    /// Number of transactions sent.
    pub nonce: Nonce,
    /// Modules depending on this account.
    pub refcount: u32,
    /// Balances.
    pub data: LegacyAccountData,
}

/// Account record with consumer and provider counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode)]
pub struct AccountInfoWithProviders {
    /// Number of transactions sent.
    pub nonce: Nonce,
    /// Other modules that depend on this account.
    pub consumers: u32,
    /// Other modules that allow this account to exist.
    pub providers: u32,
    /// Balances.
    pub data: LegacyAccountData,
}

/// Account record with sufficient references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode)]
pub struct AccountInfoWithSufficients {
    /// Number of transactions sent.
    pub nonce: Nonce,
    /// Other modules that depend on this account.
    pub consumers: u32,
    /// Other modules that allow this account to exist.
    pub providers: u32,
    /// Modules that allow this account to exist for their own purposes.
    pub sufficients: u32,
    /// Balances.
    pub data: LegacyAccountData,
}

/// Current account record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode)]
pub struct AccountInfoWithFrozen {
    /// Number of transactions sent.
    pub nonce: Nonce,
    /// Other modules that depend on this account.
    pub consumers: u32,
    /// Other modules that allow this account to exist.
    pub providers: u32,
    /// Modules that allow this account to exist for their own purposes.
    pub sufficients: u32,
    /// Balances.
    pub data: AccountData,
}

/// Decoded `System.Account` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountInfo {
    /// See [`LegacyAccountInfo`].
    Legacy(LegacyAccountInfo),
    /// See [`AccountInfoWithProviders`].
    WithProviders(AccountInfoWithProviders),
    /// See [`AccountInfoWithSufficients`].
    WithSufficients(AccountInfoWithSufficients),
    /// See [`AccountInfoWithFrozen`].
    WithFrozen(AccountInfoWithFrozen),
}

impl AccountInfo {
    /// Transaction count of the account.
    pub fn nonce(&self) -> Nonce {
        match self {
            AccountInfo::Legacy(info) => info.nonce,
            AccountInfo::WithProviders(info) => info.nonce,
            AccountInfo::WithSufficients(info) => info.nonce,
            AccountInfo::WithFrozen(info) => info.nonce,
        }
    }

    /// Free balance of the account.
    pub fn free(&self) -> Balance {
        match self {
            AccountInfo::Legacy(info) => info.data.free,
            AccountInfo::WithProviders(info) => info.data.free,
            AccountInfo::WithSufficients(info) => info.data.free,
            AccountInfo::WithFrozen(info) => info.data.free,
        }
    }

    /// Reserved balance of the account.
    pub fn reserved(&self) -> Balance {
        match self {
            AccountInfo::Legacy(info) => info.data.reserved,
            AccountInfo::WithProviders(info) => info.data.reserved,
            AccountInfo::WithSufficients(info) => info.data.reserved,
            AccountInfo::WithFrozen(info) => info.data.reserved,
        }
    }

    /// Layout this value was decoded with.
    pub fn layout(&self) -> AccountInfoLayout {
        match self {
            AccountInfo::Legacy(_) => AccountInfoLayout::Legacy,
            AccountInfo::WithProviders(_) => AccountInfoLayout::WithProviders,
            AccountInfo::WithSufficients(_) => AccountInfoLayout::WithSufficients,
            AccountInfo::WithFrozen(_) => AccountInfoLayout::WithFrozen,
        }
    }
}

/// Known shapes of the account record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountInfoLayout {
    /// `nonce, refcount, legacy data`.
    Legacy,
    /// `nonce, consumers, providers, legacy data`.
    WithProviders,
    /// `nonce, consumers, providers, sufficients, legacy data`.
    WithSufficients,
    /// `nonce, consumers, providers, sufficients, data with flags`.
    WithFrozen,
}

impl AccountInfoLayout {
    /// Decode a value that must span all of `bytes`.
    pub fn decode(&self, bytes: &[u8]) -> codec::Result<AccountInfo> {
        Ok(match self {
            AccountInfoLayout::Legacy => AccountInfo::Legacy(decode_exact(bytes)?),
            AccountInfoLayout::WithProviders => AccountInfo::WithProviders(decode_exact(bytes)?),
            AccountInfoLayout::WithSufficients => {
                AccountInfo::WithSufficients(decode_exact(bytes)?)
            }
            AccountInfoLayout::WithFrozen => AccountInfo::WithFrozen(decode_exact(bytes)?),
        })
    }
}

/// Account layout per runtime spec version.
///
/// ```
/// use txkit_primitives::{AccountInfoLayout, AccountInfoLayouts};
///
/// let layouts = AccountInfoLayouts::new(AccountInfoLayout::WithProviders)
///     .with(9100, AccountInfoLayout::WithSufficients)
///     .with(9420, AccountInfoLayout::WithFrozen);
/// assert_eq!(layouts.layout_for(9000), AccountInfoLayout::WithProviders);
/// assert_eq!(layouts.layout_for(9100), AccountInfoLayout::WithSufficients);
/// assert_eq!(layouts.layout_for(9430), AccountInfoLayout::WithFrozen);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LayoutTable", into = "LayoutTable")]
pub struct AccountInfoLayouts {
    base: AccountInfoLayout,
    upgrades: BTreeMap<u32, AccountInfoLayout>,
}

/// Serialized form: `{ base, upgrades: [{ from_spec, layout }] }`.
#[derive(Serialize, Deserialize)]
struct LayoutTable {
    base: AccountInfoLayout,
    #[serde(default)]
    upgrades: Vec<LayoutUpgrade>,
}

#[derive(Serialize, Deserialize)]
struct LayoutUpgrade {
    from_spec: u32,
    layout: AccountInfoLayout,
}

impl From<LayoutTable> for AccountInfoLayouts {
    fn from(table: LayoutTable) -> Self {
        table
            .upgrades
            .into_iter()
            .fold(Self::new(table.base), |layouts, upgrade| {
                layouts.with(upgrade.from_spec, upgrade.layout)
            })
    }
}

impl From<AccountInfoLayouts> for LayoutTable {
    fn from(layouts: AccountInfoLayouts) -> Self {
        Self {
            base: layouts.base,
            upgrades: layouts
                .upgrades
                .into_iter()
                .map(|(from_spec, layout)| LayoutUpgrade { from_spec, layout })
                .collect(),
        }
    }
}

impl AccountInfoLayouts {
    /// Use `base` for every spec version until an upgrade is registered.
    pub fn new(base: AccountInfoLayout) -> Self {
        Self {
            base,
            upgrades: BTreeMap::new(),
        }
    }

    /// Use `layout` from `from_spec` onwards.
    pub fn with(mut self, from_spec: u32, layout: AccountInfoLayout) -> Self {
        self.upgrades.insert(from_spec, layout);
        self
    }

    /// Layout in force at `spec_version`.
    pub fn layout_for(&self, spec_version: u32) -> AccountInfoLayout {
        self.upgrades
            .range(..=spec_version)
            .next_back()
            .map(|(_, layout)| *layout)
            .unwrap_or(self.base)
    }

    /// Decode `bytes` with the layout in force at `spec_version`.
    pub fn decode(&self, spec_version: u32, bytes: &[u8]) -> codec::Result<AccountInfo> {
        self.layout_for(spec_version).decode(bytes)
    }
}

impl Default for AccountInfoLayouts {
    /// Current runtimes only.
    fn default() -> Self {
        Self::new(AccountInfoLayout::WithFrozen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecError;

    fn legacy_data() -> LegacyAccountData {
        LegacyAccountData {
            free: 1_000_000_000_000,
            reserved: 5,
            misc_frozen: 6,
            fee_frozen: 7,
        }
    }

    #[test]
    fn test_layout_sizes() {
        assert_eq!(LegacyAccountInfo::default().encode().len(), 72);
        assert_eq!(AccountInfoWithProviders::default().encode().len(), 76);
        assert_eq!(AccountInfoWithSufficients::default().encode().len(), 80);
        assert_eq!(AccountInfoWithFrozen::default().encode().len(), 80);
    }

    #[test]
    fn test_decode_with_providers() {
        let stored = AccountInfoWithProviders {
            nonce: 3,
            consumers: 1,
            providers: 1,
            data: legacy_data(),
        };
        let info = AccountInfoLayout::WithProviders
            .decode(&stored.encode())
            .unwrap();
        assert_eq!(info, AccountInfo::WithProviders(stored));
        assert_eq!(info.nonce(), 3);
        assert_eq!(info.free(), 1_000_000_000_000);
        assert_eq!(info.reserved(), 5);
    }

    #[test]
    fn test_wrong_layout_is_rejected() {
        let stored = AccountInfoWithProviders::default().encode();
        assert_eq!(
            AccountInfoLayout::Legacy.decode(&stored),
            Err(CodecError::TrailingBytes(4))
        );
        assert!(matches!(
            AccountInfoLayout::WithSufficients.decode(&stored),
            Err(CodecError::Truncated { .. })
        ));
    }

    #[test]
    fn test_same_length_layouts_follow_spec_version() {
        let stored = AccountInfoWithFrozen {
            nonce: 9,
            consumers: 0,
            providers: 1,
            sufficients: 0,
            data: AccountData {
                free: 10,
                reserved: 0,
                frozen: 0,
                flags: 1 << 127,
            },
        };
        let layouts = AccountInfoLayouts::new(AccountInfoLayout::WithSufficients)
            .with(9420, AccountInfoLayout::WithFrozen);

        let current = layouts.decode(9430, &stored.encode()).unwrap();
        assert_eq!(current, AccountInfo::WithFrozen(stored));

        let old = layouts.decode(9300, &stored.encode()).unwrap();
        assert_eq!(old.layout(), AccountInfoLayout::WithSufficients);
        assert_eq!(old.nonce(), 9);
    }

    #[test]
    fn test_layouts_from_json() {
        let layouts: AccountInfoLayouts = serde_json::from_str(
            r#"{"base": "legacy", "upgrades": [{"from_spec": 28, "layout": "with_providers"}]}"#,
        )
        .unwrap();
        assert_eq!(layouts.layout_for(27), AccountInfoLayout::Legacy);
        assert_eq!(layouts.layout_for(28), AccountInfoLayout::WithProviders);
        assert_eq!(AccountInfoLayouts::default().layout_for(0), AccountInfoLayout::WithFrozen);
    }
}
