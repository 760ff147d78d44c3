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
//! # libtxkit - Substrate transaction construction
//!
//! `libtxkit` builds, signs and submits extrinsics for Substrate based chains
//! using runtime metadata known only at runtime. It does not generate code
//! from metadata: pallets, calls and storage items are resolved by name.
//!
//! ## Features
//!
//! - **Metadata Index**: name and index lookups over pre-parsed runtime metadata
//! - **Storage Keys**: hashed storage key derivation for plain values and maps
//! - **Calls**: argument encoding driven by declared type hints
//! - **Extrinsics**: version 4 signing payloads, signatures and wire encoding
//! - **Head Subscriptions**: cancellable new head streams
//! - **RPC Helpers**: typed requests over an injected JSON-RPC transport
//!
//! ## Quick Start
//!
//! ```no_run
//! use libtxkit::call::CallBuilder;
//! use libtxkit::extrinsic::{ExtrinsicBuilder, SignatureOptions};
//! use libtxkit::keyring::{CryptoScheme, KeyringPair};
//! use libtxkit::metadata::MetadataIndex;
//! use txkit_primitives::{Hash, MultiAddress, Value};
//!
//! # fn example(metadata_json: &str, genesis: Hash) -> Result<(), libtxkit::Error> {
//! let index = MetadataIndex::from_json(metadata_json)?;
//! let dest = MultiAddress::from_hex_account_id(
//!     "0x8eaf04151687736326c9fea17e25fc5287613693c912909cb226aa4794f26a48",
//! )?;
//! let call = CallBuilder::new(&index)
//!     .build("Balances.transfer", &[Value::from(dest), Value::from(600_000_000_000u128)])?;
//!
//! let alice = KeyringPair::from_secret("//Alice", 42, CryptoScheme::Sr25519)?;
//! let builder = ExtrinsicBuilder::default();
//! let options = SignatureOptions::immortal(genesis, index.spec_version(), 22, 0);
//! let signed = builder.sign(&builder.unsigned(call), &alice, &options)?;
//! println!("{}", signed.encode());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`metadata`]: Runtime metadata descriptors and lookups
//! - [`storage`]: Storage hashers and key derivation
//! - [`call`]: Call encoding and decoding
//! - [`extrinsic`]: Signing payloads and extrinsic assembly
//! - [`keyring`]: Key pairs and the [`Signer`](keyring::Signer) capability
//! - [`subscription`]: New head subscriptions
//! - [`rpc`]: JSON-RPC request helpers
//! - [`config`]: Chain settings loaded from TOML
//!
//! ## Configuration File Support
//!
//! ```toml
//! ss58_prefix = 42
//! payload_hash_threshold = 256
//! nonce_width = "u32"
//! mortal_period = 64
//!
//! [account_layouts]
//! base = "with_providers"
//! upgrades = [{ from_spec = 9420, layout = "with_frozen" }]
//! ```
//!
//! A loaded [`ChainConfig`] is handed to [`ExtrinsicBuilder::new`],
//! [`rpc::ChainApi::with_config`] and [`keyring::KeyringPair::from_config`].

pub mod call;
pub mod config;
pub mod error;
pub mod extrinsic;
pub mod keyring;
pub mod metadata;
pub mod rpc;
pub mod ss58;
pub mod storage;
pub mod subscription;

#[cfg(test)]
mod mock;

pub use call::{Call, CallBuilder};
pub use config::ChainConfig;
pub use error::{Error, Result};
pub use extrinsic::{Extrinsic, ExtrinsicBuilder, SignatureOptions};
pub use keyring::{CryptoScheme, KeyringPair, Signer};
pub use metadata::MetadataIndex;
pub use storage::{StorageHasher, StorageKey, StorageKeyBuilder};
pub use subscription::{ChainHeadSubscription, Subscription};

/// Primitive wire types.
pub use txkit_primitives as primitives;
