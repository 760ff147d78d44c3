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
//! Mock runtime metadata and keys for testing.

use crate::extrinsic::SignatureOptions;
use crate::metadata::{
    ArgMetadata, CallMetadata, Metadata, MetadataIndex, PalletMetadata, StorageEntryMetadata,
    StorageEntryType, StorageModifier,
};
use crate::storage::StorageHasher;
use hex_literal::hex;
use txkit_primitives::codec::{FieldHint, TypeHint};
use txkit_primitives::{Era, Hash};

pub const BOB: [u8; 32] = hex!("8eaf04151687736326c9fea17e25fc5287613693c912909cb226aa4794f26a48");

/// RFC 8032 test vector 1 secret key.
pub const RFC_SEED: &str = "0x9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
pub const RFC_PUBLIC: [u8; 32] =
    hex!("d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a");

pub const WESTEND_GENESIS: [u8; 32] =
    hex!("e143f23803ac50e8f6f8e62695d1ce9e4e1d68aa36c1cd2cfd15340213f3423e");

pub const SPEC_VERSION: u32 = 9430;
pub const TRANSACTION_VERSION: u32 = 22;

/// `Balances.transfer(Id(BOB), 600000000000)`.
pub const TRANSFER_CALL: [u8; 41] = hex!(
    "0400008eaf04151687736326c9fea17e25fc5287613693c912909cb226aa4794f26a48070070c9b28b"
);

fn arg(name: &str, ty: TypeHint) -> ArgMetadata {
    ArgMetadata {
        name: name.to_string(),
        ty,
    }
}

fn call(name: &str, index: u8, args: Vec<ArgMetadata>) -> CallMetadata {
    CallMetadata {
        name: name.to_string(),
        index,
        args,
    }
}

fn account_data() -> TypeHint {
    TypeHint::Composite(
        ["nonce", "consumers", "providers", "sufficients"]
            .iter()
            .map(|name| FieldHint::named(name, TypeHint::U32))
            .chain(
                ["free", "reserved", "frozen", "flags"]
                    .iter()
                    .map(|name| FieldHint::named(name, TypeHint::U128)),
            )
            .collect(),
    )
}

pub fn new_metadata() -> Metadata {
    Metadata {
        spec_version: SPEC_VERSION,
        pallets: vec![
            PalletMetadata {
                name: "System".into(),
                index: 0,
                storage_prefix: None,
                calls: vec![call("remark", 0, vec![arg("remark", TypeHint::Bytes)])],
                storage: vec![
                    StorageEntryMetadata {
                        name: "Account".into(),
                        modifier: StorageModifier::Default,
                        ty: StorageEntryType::Map {
                            hashers: vec![StorageHasher::Blake2_128Concat],
                            keys: vec![TypeHint::account_id()],
                            value: account_data(),
                        },
                    },
                    StorageEntryMetadata {
                        name: "Number".into(),
                        modifier: StorageModifier::Default,
                        ty: StorageEntryType::Plain {
                            value: TypeHint::U32,
                        },
                    },
                ],
            },
            PalletMetadata {
                name: "Balances".into(),
                index: 4,
                storage_prefix: None,
                calls: vec![
                    call(
                        "transfer",
                        0,
                        vec![
                            arg("dest", TypeHint::multi_address()),
                            arg("value", TypeHint::Compact),
                        ],
                    ),
                    call(
                        "transfer_keep_alive",
                        3,
                        vec![
                            arg("dest", TypeHint::multi_address()),
                            arg("value", TypeHint::Compact),
                        ],
                    ),
                ],
                storage: vec![StorageEntryMetadata {
                    name: "TotalIssuance".into(),
                    modifier: StorageModifier::Default,
                    ty: StorageEntryType::Plain {
                        value: TypeHint::U128,
                    },
                }],
            },
            PalletMetadata {
                name: "Staking".into(),
                index: 6,
                storage_prefix: None,
                calls: vec![call(
                    "bond_extra",
                    1,
                    vec![arg("max_additional", TypeHint::Compact)],
                )],
                storage: vec![StorageEntryMetadata {
                    name: "ErasStakers".into(),
                    modifier: StorageModifier::Default,
                    ty: StorageEntryType::Map {
                        hashers: vec![StorageHasher::Twox64Concat, StorageHasher::Twox64Concat],
                        keys: vec![TypeHint::U32, TypeHint::account_id()],
                        value: TypeHint::Bytes,
                    },
                }],
            },
        ],
    }
}

pub fn new_index() -> MetadataIndex {
    MetadataIndex::new(new_metadata()).expect("mock metadata is consistent")
}

/// Immortal options for nonce 0, tip 100 on Westend.
pub fn westend_options() -> SignatureOptions {
    SignatureOptions {
        block_hash: Hash::from(WESTEND_GENESIS),
        genesis_hash: Hash::from(WESTEND_GENESIS),
        era: Era::Immortal,
        nonce: 0,
        spec_version: SPEC_VERSION,
        transaction_version: TRANSACTION_VERSION,
        tip: 100,
    }
}
