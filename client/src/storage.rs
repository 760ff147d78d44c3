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
//! Storage key derivation.
//!
//! ```text
//! key = twox128(pallet prefix) ++ twox128(item name) ++ hasher_1(key_1) ++ ... ++ hasher_n(key_n)
//! ```
//!
//! `*Concat` hashers and `Identity` keep the raw key after the hash so map
//! keys can be recovered when iterating.

use crate::error::BuildError;
use crate::metadata::MetadataIndex;
use log::{trace, warn};
use serde::{Deserialize, Serialize};
use sp_core::hashing::{blake2_128, blake2_256, twox_128, twox_256, twox_64};
use std::fmt;
use txkit_primitives::codec::{self, Value};

/// Hasher applied to one storage map key.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageHasher {
    /// 128-bit Blake2 hash.
    Blake2_128,
    /// 256-bit Blake2 hash.
    Blake2_256,
    /// 128-bit Blake2 hash followed by the raw key.
    Blake2_128Concat,
    /// 128-bit XX hash.
    Twox128,
    /// 256-bit XX hash.
    Twox256,
    /// 64-bit XX hash followed by the raw key.
    Twox64Concat,
    /// Raw key.
    Identity,
}

impl StorageHasher {
    /// Hash `key`, appending it again for concat hashers.
    pub fn hash(&self, key: &[u8]) -> Vec<u8> {
        match self {
            StorageHasher::Blake2_128 => blake2_128(key).to_vec(),
            StorageHasher::Blake2_256 => blake2_256(key).to_vec(),
            StorageHasher::Blake2_128Concat => [&blake2_128(key)[..], key].concat(),
            StorageHasher::Twox128 => twox_128(key).to_vec(),
            StorageHasher::Twox256 => twox_256(key).to_vec(),
            StorageHasher::Twox64Concat => [&twox_64(key)[..], key].concat(),
            StorageHasher::Identity => key.to_vec(),
        }
    }

    /// Whether the raw key can be read back from the hashed form.
    pub fn is_transparent(&self) -> bool {
        matches!(
            self,
            StorageHasher::Blake2_128Concat | StorageHasher::Twox64Concat | StorageHasher::Identity
        )
    }
}

/// Derived storage address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(pub Vec<u8>);

impl StorageKey {
    /// Key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into key bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for StorageKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

/// Builds storage keys from metadata names.
#[derive(Debug, Clone, Copy)]
pub struct StorageKeyBuilder<'a> {
    index: &'a MetadataIndex,
}

impl<'a> StorageKeyBuilder<'a> {
    /// Builder resolving names through `index`.
    pub fn new(index: &'a MetadataIndex) -> Self {
        Self { index }
    }

    /// Full key of `pallet.item` for SCALE encoded `keys`.
    ///
    /// A map takes exactly one key per declared hasher, a plain value takes
    /// none. `hasher_override` replaces the declared hasher of single-key maps.
    pub fn build(
        &self,
        pallet: &str,
        item: &str,
        keys: &[&[u8]],
        hasher_override: Option<StorageHasher>,
    ) -> Result<StorageKey, BuildError> {
        let declared = self.index.resolve_storage_item(pallet, item)?.entry.ty.hashers().len();
        if keys.len() != declared {
            return Err(BuildError::KeyCountMismatch {
                expected: declared,
                found: keys.len(),
            });
        }
        self.derive(pallet, item, keys, hasher_override)
    }

    /// Partial key of `pallet.item` covering the first `keys.len()` map keys.
    ///
    /// With no keys this is the prefix shared by every value of the item.
    pub fn build_prefix(&self, pallet: &str, item: &str, keys: &[&[u8]]) -> Result<StorageKey, BuildError> {
        self.derive(pallet, item, keys, None)
    }

    /// Full key of `pallet.item` for keys given as values of their declared types.
    pub fn build_values(&self, pallet: &str, item: &str, keys: &[Value]) -> Result<StorageKey, BuildError> {
        let encoded = keys
            .iter()
            .enumerate()
            .map(|(position, key)| self.encode_key(pallet, item, position, key))
            .collect::<Result<Vec<_>, _>>()?;
        let borrowed: Vec<&[u8]> = encoded.iter().map(Vec::as_slice).collect();
        self.build(pallet, item, &borrowed, None)
    }

    /// SCALE encode the map key at `position` with its declared type.
    pub fn encode_key(
        &self,
        pallet: &str,
        item: &str,
        position: usize,
        key: &Value,
    ) -> Result<Vec<u8>, BuildError> {
        let entry = self.index.resolve_storage_item(pallet, item)?.entry;
        let hint = entry.ty.keys().get(position).ok_or(BuildError::KeyCountMismatch {
            expected: entry.ty.keys().len(),
            found: position + 1,
        })?;
        codec::encode(key, hint).map_err(|source| BuildError::ArgTypeMismatch {
            arg: format!("{item} key {position}"),
            source,
        })
    }

    fn derive(
        &self,
        pallet: &str,
        item: &str,
        keys: &[&[u8]],
        hasher_override: Option<StorageHasher>,
    ) -> Result<StorageKey, BuildError> {
        let resolved = self.index.resolve_storage_item(pallet, item)?;
        let hashers = resolved.entry.ty.hashers();
        if keys.len() > hashers.len() {
            return Err(BuildError::KeyCountMismatch {
                expected: hashers.len(),
                found: keys.len(),
            });
        }
        if hasher_override.is_some() && hashers.len() != 1 {
            warn!(
                "Ignoring hasher override for `{pallet}.{item}` with {} keys",
                hashers.len()
            );
        }

        let mut key = Vec::with_capacity(32 + keys.iter().map(|k| k.len() + 32).sum::<usize>());
        key.extend_from_slice(&twox_128(resolved.prefix.as_bytes()));
        key.extend_from_slice(&twox_128(resolved.entry.name.as_bytes()));
        for (raw, declared) in keys.iter().zip(hashers) {
            let hasher = match hasher_override {
                Some(hasher) if hashers.len() == 1 => hasher,
                _ => *declared,
            };
            key.extend(hasher.hash(raw));
        }

        let key = StorageKey(key);
        trace!("Storage key for {pallet}.{item}: {key}");
        Ok(key)
    }
}
