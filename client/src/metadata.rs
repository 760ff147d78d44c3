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
//! Runtime metadata descriptors and name lookup.
//!
//! [`Metadata`] is the pre-parsed description of one runtime version: its
//! pallets, their dispatchable calls and storage entries. [`MetadataIndex`]
//! builds hash lookups over it once so encoding never scans pallet lists.
//!
//! # Examples
//!
//! ```
//! use libtxkit::metadata::MetadataIndex;
//!
//! let index = MetadataIndex::from_json(r#"{
//!     "spec_version": 9430,
//!     "pallets": [{
//!         "name": "Balances",
//!         "index": 4,
//!         "calls": [{
//!             "name": "transfer",
//!             "index": 0,
//!             "args": [
//!                 { "name": "dest", "ty": { "variant": [
//!                     { "name": "Id", "index": 0, "fields": [{ "ty": { "fixed_bytes": 32 } }] }
//!                 ] } },
//!                 { "name": "value", "ty": "compact" }
//!             ]
//!         }]
//!     }]
//! }"#).unwrap();
//!
//! let call = index.resolve_call("Balances", "transfer").unwrap();
//! assert_eq!((call.pallet_index, call.call_index), (4, 0));
//! ```

use crate::error::MetadataError;
use crate::storage::StorageHasher;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use txkit_primitives::codec::{FieldHint, TypeHint, VariantHint};

/// Runtime metadata for one spec version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Runtime spec version this metadata describes.
    pub spec_version: u32,
    /// Pallets in declaration order.
    pub pallets: Vec<PalletMetadata>,
}

/// One pallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PalletMetadata {
    /// Pallet name, e.g. `Balances`.
    pub name: String,
    /// Pallet index, first byte of every call.
    pub index: u8,
    /// Storage prefix, the pallet name when absent.
    #[serde(default)]
    pub storage_prefix: Option<String>,
    /// Dispatchable calls.
    #[serde(default)]
    pub calls: Vec<CallMetadata>,
    /// Storage entries.
    #[serde(default)]
    pub storage: Vec<StorageEntryMetadata>,
}

impl PalletMetadata {
    /// Prefix hashed into the first half of storage keys.
    pub fn storage_prefix(&self) -> &str {
        self.storage_prefix.as_deref().unwrap_or(&self.name)
    }
}

/// One dispatchable call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallMetadata {
    /// Call name, e.g. `transfer`.
    pub name: String,
    /// Call index within the pallet.
    pub index: u8,
    /// Arguments in encoding order.
    #[serde(default)]
    pub args: Vec<ArgMetadata>,
}

/// One call argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgMetadata {
    /// Argument name.
    pub name: String,
    /// Argument type.
    pub ty: TypeHint,
}

/// Whether a missing storage value reads as `None` or as a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageModifier {
    /// Missing value is `None`.
    #[default]
    Optional,
    /// Missing value is the type default.
    Default,
}

/// One storage entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEntryMetadata {
    /// Item name, e.g. `Account`.
    pub name: String,
    /// Missing value behaviour.
    #[serde(default)]
    pub modifier: StorageModifier,
    /// Key and value layout.
    pub ty: StorageEntryType,
}

/// Key and value layout of a storage entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageEntryType {
    /// Single value.
    Plain {
        /// Value type.
        value: TypeHint,
    },
    /// Map with one hasher per key.
    Map {
        /// Hasher per key, outermost first.
        hashers: Vec<StorageHasher>,
        /// Key types, one per hasher.
        keys: Vec<TypeHint>,
        /// Value type.
        value: TypeHint,
    },
}

impl StorageEntryType {
    /// Declared hashers, empty for plain values.
    pub fn hashers(&self) -> &[StorageHasher] {
        match self {
            StorageEntryType::Plain { .. } => &[],
            StorageEntryType::Map { hashers, .. } => hashers,
        }
    }

    /// Declared key types, empty for plain values.
    pub fn keys(&self) -> &[TypeHint] {
        match self {
            StorageEntryType::Plain { .. } => &[],
            StorageEntryType::Map { keys, .. } => keys,
        }
    }

    /// Value type.
    pub fn value(&self) -> &TypeHint {
        match self {
            StorageEntryType::Plain { value } | StorageEntryType::Map { value, .. } => value,
        }
    }
}

/// Resolved call target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedCall<'a> {
    /// Pallet index byte.
    pub pallet_index: u8,
    /// Call index byte.
    pub call_index: u8,
    /// Declared arguments.
    pub args: &'a [ArgMetadata],
}

/// Resolved storage entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedStorage<'a> {
    /// Pallet storage prefix.
    pub prefix: &'a str,
    /// Entry descriptor.
    pub entry: &'a StorageEntryMetadata,
}

/// Names of a call found by its indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallByIndex<'a> {
    /// Pallet name.
    pub pallet: &'a str,
    /// Call descriptor.
    pub call: &'a CallMetadata,
}

/// Name and index lookups over [`Metadata`].
#[derive(Debug, Clone)]
pub struct MetadataIndex {
    metadata: Metadata,
    pallets: HashMap<String, usize>,
    calls: Vec<HashMap<String, usize>>,
    storage: Vec<HashMap<String, usize>>,
    call_indices: HashMap<(u8, u8), (usize, usize)>,
}

impl MetadataIndex {
    /// Index `metadata`, rejecting duplicate names or indices.
    pub fn new(metadata: Metadata) -> Result<Self, MetadataError> {
        let mut pallets = HashMap::new();
        let mut pallet_indices = HashMap::new();
        let mut calls = Vec::with_capacity(metadata.pallets.len());
        let mut storage = Vec::with_capacity(metadata.pallets.len());
        let mut call_indices = HashMap::new();

        for (p, pallet) in metadata.pallets.iter().enumerate() {
            if pallets.insert(pallet.name.clone(), p).is_some() {
                return Err(MetadataError::Ambiguous(format!(
                    "pallet `{}` declared twice",
                    pallet.name
                )));
            }
            if let Some(other) = pallet_indices.insert(pallet.index, p) {
                return Err(MetadataError::Ambiguous(format!(
                    "pallets `{}` and `{}` share index {}",
                    metadata.pallets[other].name, pallet.name, pallet.index
                )));
            }

            let mut by_name = HashMap::with_capacity(pallet.calls.len());
            for (c, call) in pallet.calls.iter().enumerate() {
                if by_name.insert(call.name.clone(), c).is_some() {
                    return Err(MetadataError::Ambiguous(format!(
                        "call `{}.{}` declared twice",
                        pallet.name, call.name
                    )));
                }
                if call_indices.insert((pallet.index, call.index), (p, c)).is_some() {
                    return Err(MetadataError::Ambiguous(format!(
                        "call index {} declared twice in `{}`",
                        call.index, pallet.name
                    )));
                }
            }
            calls.push(by_name);

            let mut entries = HashMap::with_capacity(pallet.storage.len());
            for (s, entry) in pallet.storage.iter().enumerate() {
                if entries.insert(entry.name.clone(), s).is_some() {
                    return Err(MetadataError::Ambiguous(format!(
                        "storage item `{}.{}` declared twice",
                        pallet.name, entry.name
                    )));
                }
                if entry.ty.hashers().len() != entry.ty.keys().len() {
                    return Err(MetadataError::Ambiguous(format!(
                        "storage item `{}.{}` declares {} hashers for {} keys",
                        pallet.name,
                        entry.name,
                        entry.ty.hashers().len(),
                        entry.ty.keys().len()
                    )));
                }
            }
            storage.push(entries);
        }

        debug!(
            "Indexed {} pallets, {} calls for spec version {}",
            metadata.pallets.len(),
            call_indices.len(),
            metadata.spec_version
        );

        Ok(Self {
            metadata,
            pallets,
            calls,
            storage,
            call_indices,
        })
    }

    /// Parse JSON metadata and index it.
    pub fn from_json(text: &str) -> Result<Self, MetadataError> {
        let metadata: Metadata =
            serde_json::from_str(text).map_err(|e| MetadataError::Parse(e.to_string()))?;
        Self::new(metadata)
    }

    /// Indexed metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Runtime spec version of the indexed metadata.
    pub fn spec_version(&self) -> u32 {
        self.metadata.spec_version
    }

    /// Fail unless the index describes runtime `spec_version`.
    pub fn ensure_spec_version(&self, spec_version: u32) -> Result<(), MetadataError> {
        if self.metadata.spec_version == spec_version {
            Ok(())
        } else {
            Err(MetadataError::SpecVersionMismatch {
                indexed: self.metadata.spec_version,
                runtime: spec_version,
            })
        }
    }

    /// Pallet descriptor by name.
    pub fn pallet(&self, name: &str) -> Result<&PalletMetadata, MetadataError> {
        self.pallets
            .get(name)
            .map(|&p| &self.metadata.pallets[p])
            .ok_or_else(|| MetadataError::UnknownPallet(name.to_string()))
    }

    /// Pallet index by name.
    pub fn resolve_pallet(&self, name: &str) -> Result<u8, MetadataError> {
        self.pallet(name).map(|pallet| pallet.index)
    }

    /// Call indices and argument layout by name.
    pub fn resolve_call(&self, pallet: &str, function: &str) -> Result<ResolvedCall<'_>, MetadataError> {
        let unknown = || MetadataError::UnknownCall {
            pallet: pallet.to_string(),
            function: function.to_string(),
        };
        let &p = self.pallets.get(pallet).ok_or_else(unknown)?;
        let &c = self.calls[p].get(function).ok_or_else(unknown)?;
        let pallet = &self.metadata.pallets[p];
        let call = &pallet.calls[c];
        Ok(ResolvedCall {
            pallet_index: pallet.index,
            call_index: call.index,
            args: &call.args,
        })
    }

    /// Storage entry by name.
    pub fn resolve_storage_item(&self, pallet: &str, item: &str) -> Result<ResolvedStorage<'_>, MetadataError> {
        let &p = self
            .pallets
            .get(pallet)
            .ok_or_else(|| MetadataError::UnknownPallet(pallet.to_string()))?;
        let &s = self.storage[p]
            .get(item)
            .ok_or_else(|| MetadataError::UnknownItem {
                pallet: pallet.to_string(),
                item: item.to_string(),
            })?;
        let pallet = &self.metadata.pallets[p];
        Ok(ResolvedStorage {
            prefix: pallet.storage_prefix(),
            entry: &pallet.storage[s],
        })
    }

    /// Call descriptor by its index bytes.
    pub fn call_by_index(&self, pallet_index: u8, call_index: u8) -> Result<CallByIndex<'_>, MetadataError> {
        let &(p, c) = self
            .call_indices
            .get(&(pallet_index, call_index))
            .ok_or(MetadataError::UnknownCallIndex {
                pallet_index,
                call_index,
            })?;
        let pallet = &self.metadata.pallets[p];
        Ok(CallByIndex {
            pallet: &pallet.name,
            call: &pallet.calls[c],
        })
    }

    /// Layout of a pallet's call enum, for nesting calls as arguments.
    pub fn call_type_hint(&self, pallet: &str) -> Result<TypeHint, MetadataError> {
        let pallet = self.pallet(pallet)?;
        Ok(TypeHint::Variant(
            pallet
                .calls
                .iter()
                .map(|call| VariantHint {
                    name: call.name.clone(),
                    index: call.index,
                    fields: call
                        .args
                        .iter()
                        .map(|arg| FieldHint::named(&arg.name, arg.ty.clone()))
                        .collect(),
                })
                .collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{new_metadata, new_index};

    #[test]
    fn test_resolve_pallet() {
        let index = new_index();
        assert_eq!(index.resolve_pallet("System"), Ok(0));
        assert_eq!(index.resolve_pallet("Balances"), Ok(4));
        assert_eq!(
            index.resolve_pallet("balances"),
            Err(MetadataError::UnknownPallet("balances".into()))
        );
    }

    #[test]
    fn test_resolve_call() {
        let index = new_index();
        let call = index.resolve_call("Balances", "transfer").unwrap();
        assert_eq!(call.pallet_index, 4);
        assert_eq!(call.call_index, 0);
        assert_eq!(call.args.len(), 2);
        assert_eq!(call.args[0].ty, TypeHint::multi_address());

        assert_eq!(
            index.resolve_call("Balances", "burn"),
            Err(MetadataError::UnknownCall {
                pallet: "Balances".into(),
                function: "burn".into()
            })
        );
        assert!(matches!(
            index.resolve_call("Treasury", "spend"),
            Err(MetadataError::UnknownCall { .. })
        ));
    }

    #[test]
    fn test_resolve_storage_item() {
        let index = new_index();
        let resolved = index.resolve_storage_item("System", "Account").unwrap();
        assert_eq!(resolved.prefix, "System");
        assert_eq!(resolved.entry.ty.hashers(), &[StorageHasher::Blake2_128Concat]);

        assert_eq!(
            index.resolve_storage_item("System", "Accounts"),
            Err(MetadataError::UnknownItem {
                pallet: "System".into(),
                item: "Accounts".into()
            })
        );
        assert!(matches!(
            index.resolve_storage_item("Nope", "Account"),
            Err(MetadataError::UnknownPallet(_))
        ));
    }

    #[test]
    fn test_call_by_index() {
        let index = new_index();
        let found = index.call_by_index(4, 0).unwrap();
        assert_eq!(found.pallet, "Balances");
        assert_eq!(found.call.name, "transfer");
        assert_eq!(
            index.call_by_index(4, 99),
            Err(MetadataError::UnknownCallIndex {
                pallet_index: 4,
                call_index: 99
            })
        );
    }

    #[test]
    fn test_duplicates_are_ambiguous() {
        let mut metadata = new_metadata();
        let copy = metadata.pallets[0].clone();
        metadata.pallets.push(copy);
        assert!(matches!(
            MetadataIndex::new(metadata),
            Err(MetadataError::Ambiguous(_))
        ));

        let mut metadata = new_metadata();
        metadata.pallets[1].index = 0;
        assert!(matches!(
            MetadataIndex::new(metadata),
            Err(MetadataError::Ambiguous(_))
        ));

        let mut metadata = new_metadata();
        let call = metadata.pallets[1].calls[0].clone();
        metadata.pallets[1].calls.push(CallMetadata {
            name: "transfer_again".into(),
            ..call
        });
        assert!(matches!(
            MetadataIndex::new(metadata),
            Err(MetadataError::Ambiguous(_))
        ));
    }

    #[test]
    fn test_spec_version_guard() {
        let index = new_index();
        assert_eq!(index.ensure_spec_version(9430), Ok(()));
        assert_eq!(
            index.ensure_spec_version(9431),
            Err(MetadataError::SpecVersionMismatch {
                indexed: 9430,
                runtime: 9431
            })
        );
    }

    #[test]
    fn test_from_json() {
        let index = MetadataIndex::from_json(
            r#"{
                "spec_version": 1,
                "pallets": [{
                    "name": "System",
                    "index": 0,
                    "storage": [{
                        "name": "Account",
                        "ty": { "map": {
                            "hashers": ["Blake2_128Concat"],
                            "keys": [{ "fixed_bytes": 32 }],
                            "value": "bytes"
                        } }
                    }]
                }]
            }"#,
        )
        .unwrap();
        let resolved = index.resolve_storage_item("System", "Account").unwrap();
        assert_eq!(resolved.entry.ty.keys(), &[TypeHint::account_id()]);

        assert!(matches!(
            MetadataIndex::from_json("{"),
            Err(MetadataError::Parse(_))
        ));
    }

    #[test]
    fn test_call_type_hint() {
        let index = new_index();
        let TypeHint::Variant(variants) = index.call_type_hint("Balances").unwrap() else {
            panic!("call enum must be a variant");
        };
        assert!(variants.iter().any(|v| v.name == "transfer" && v.index == 0));
    }
}
