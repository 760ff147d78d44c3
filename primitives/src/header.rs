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
//! Block header as delivered by head subscriptions.

use crate::codec::{self, CodecError};
use crate::{BlockNumber, Hash};
use parity_scale_codec::{Decode, Encode};
use serde::Deserialize;
use sp_core::hashing::blake2_256;

/// Consensus engine identifier, e.g. `*b"BABE"`.
pub type ConsensusEngineId = [u8; 4];

/// Digest item that is able to encode/decode 'system' digest items and
/// provide opaque access to other items.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub enum DigestItem {
    /// Not a digest item recognised by the system.
    #[codec(index = 0)]
    Other(Vec<u8>),
    /// A message from the runtime to the consensus engine.
    #[codec(index = 4)]
    Consensus(ConsensusEngineId, Vec<u8>),
    /// Put a Seal on it.
    #[codec(index = 5)]
    Seal(ConsensusEngineId, Vec<u8>),
    /// A pre-runtime digest.
    #[codec(index = 6)]
    PreRuntime(ConsensusEngineId, Vec<u8>),
    /// Runtime code or heap pages were updated.
    #[codec(index = 8)]
    RuntimeEnvironmentUpdated,
}

/// Header digest.
#[derive(Debug, Clone, PartialEq, Eq, Default, Encode, Decode)]
pub struct Digest {
    /// A list of logs in the digest.
    pub logs: Vec<DigestItem>,
}

/// Abstraction over a block header for a substrate chain.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, Deserialize)]
#[serde(try_from = "RpcHeader")]
pub struct Header {
    /// The parent hash.
    pub parent_hash: Hash,
    /// The block number.
    #[codec(compact)]
    pub number: BlockNumber,
    /// The state trie merkle root
    pub state_root: Hash,
    /// The merkle root of the extrinsics.
    pub extrinsics_root: Hash,
    /// A chain-specific digest of data useful for light clients or referencing auxiliary data.
    pub digest: Digest,
}

impl Header {
    /// Block hash: blake2-256 of the SCALE encoded header.
    pub fn hash(&self) -> Hash {
        Hash::from(blake2_256(&self.encode()))
    }
}

/// JSON-RPC shape of a header, numbers and digest logs as hex strings.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcHeader {
    parent_hash: Hash,
    number: String,
    state_root: Hash,
    extrinsics_root: Hash,
    #[serde(default)]
    digest: RpcDigest,
}

#[derive(Default, Deserialize)]
struct RpcDigest {
    logs: Vec<String>,
}

impl TryFrom<RpcHeader> for Header {
    type Error = CodecError;

    fn try_from(rpc: RpcHeader) -> codec::Result<Self> {
        let digits = rpc.number.strip_prefix("0x").unwrap_or(&rpc.number);
        let number = BlockNumber::from_str_radix(digits, 16).map_err(|_| CodecError::OutOfRange {
            type_name: "block number",
        })?;
        let logs = rpc
            .digest
            .logs
            .iter()
            .map(|log| codec::decode_exact::<DigestItem>(&codec::from_hex(log)?))
            .collect::<codec::Result<Vec<_>>>()?;

        Ok(Header {
            parent_hash: rpc.parent_hash,
            number,
            state_root: rpc.state_root,
            extrinsics_root: rpc.extrinsics_root,
            digest: Digest { logs },
        })
    }
}
