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
//! Low-level types used throughout the txkit code.
//!
//! Every type here has a fixed SCALE wire representation shared with
//! Substrate runtimes. The [`codec`] module adds a metadata-driven codec for
//! values whose shape is only known at runtime.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod account;
pub mod address;
pub mod codec;
pub mod era;
pub mod header;
pub mod signature;

pub use account::{AccountInfo, AccountInfoLayout, AccountInfoLayouts};
pub use address::MultiAddress;
pub use codec::{CodecError, TypeHint, Value};
pub use era::Era;
pub use header::{Digest, DigestItem, Header};
pub use signature::MultiSignature;

/// An index to a block.
pub type BlockNumber = u32;

/// Index of a transaction in the chain.
pub type Nonce = u32;

/// Balance of an account.
pub type Balance = u128;

/// A hash of some data used by the chain.
pub type Hash = sp_core::H256;

/// Some way of identifying an account on the chain.
pub type AccountId = sp_core::crypto::AccountId32;

/// The type for looking up accounts. We don't expect more than 4 billion of them.
pub type AccountIndex = u32;
