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
//! Scheme-tagged transaction signature.

use crate::codec::{self, Tagged};
use parity_scale_codec::{Decode, Encode};

/// Signature container carrying its scheme as the first byte.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub enum MultiSignature {
    /// An Ed25519 signature.
    #[codec(index = 0)]
    Ed25519([u8; 64]),
    /// An Sr25519 signature.
    #[codec(index = 1)]
    Sr25519([u8; 64]),
    /// An ECDSA/SECP256k1 signature, recoverable.
    #[codec(index = 2)]
    Ecdsa([u8; 65]),
}

impl MultiSignature {
    /// Raw signature bytes without the scheme tag.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            MultiSignature::Ed25519(raw) | MultiSignature::Sr25519(raw) => raw,
            MultiSignature::Ecdsa(raw) => raw,
        }
    }

    /// Decode a complete signature.
    pub fn decode_exact(bytes: &[u8]) -> codec::Result<Self> {
        codec::decode_tagged(bytes)
    }
}

impl Tagged for MultiSignature {
    const NAME: &'static str = "MultiSignature";

    fn is_known_tag(tag: u8) -> bool {
        tag <= 2
    }
}
