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
//! Extrinsic assembly and signing (format version 4).
//!
//! Signed extrinsic layout:
//!
//! ```text
//! compact(len) ++ 0x84 ++ signer ++ signature ++ era ++ compact(nonce) ++ compact(tip) ++ call
//! ```
//!
//! The signature covers the signing payload:
//!
//! ```text
//! call ++ era ++ compact(nonce) ++ compact(tip) ++ spec_version ++ transaction_version
//!      ++ genesis_hash ++ checkpoint
//! ```
//!
//! where `checkpoint` is the block hash the era starts at for mortal
//! transactions and the genesis hash for immortal ones. Payloads longer than
//! 256 bytes are signed by their blake2-256 hash.

use crate::call::Call;
use crate::config::{ChainConfig, EXTRINSIC_VERSION};
use crate::error::{BuildError, ConfigError, Error, SigningError};
use crate::keyring::{self, Signer};
use log::{debug, trace};
use parity_scale_codec::{Compact, Decode, Encode, Output};
use sp_core::hashing::blake2_256;
use std::fmt;
use txkit_primitives::codec::{self, CodecError};
use txkit_primitives::{Era, Hash, MultiAddress, MultiSignature};

/// Signed flag in the version byte.
const SIGNED_FLAG: u8 = 0b1000_0000;

/// Payload length above which the hash is signed instead.
pub const DEFAULT_PAYLOAD_HASH_THRESHOLD: usize = 256;

/// Chain state a signature commits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureOptions {
    /// Block the era is anchored at, ignored for immortal transactions.
    pub block_hash: Hash,
    /// Genesis hash of the chain.
    pub genesis_hash: Hash,
    /// Validity window.
    pub era: Era,
    /// Sender account nonce.
    pub nonce: u64,
    /// Runtime spec version.
    pub spec_version: u32,
    /// Runtime transaction version.
    pub transaction_version: u32,
    /// Tip paid to the block author.
    pub tip: u128,
}

impl SignatureOptions {
    /// Immortal transaction without tip.
    pub fn immortal(genesis_hash: Hash, spec_version: u32, transaction_version: u32, nonce: u64) -> Self {
        Self {
            block_hash: genesis_hash,
            genesis_hash,
            era: Era::Immortal,
            nonce,
            spec_version,
            transaction_version,
            tip: 0,
        }
    }

    /// Valid for `period` blocks from block `block_number` with hash `block_hash`.
    pub fn mortal(self, block_hash: Hash, block_number: u64, period: u64) -> Self {
        Self {
            block_hash,
            era: Era::mortal(period, block_number),
            ..self
        }
    }

    /// Pay `tip` to the block author.
    pub fn with_tip(self, tip: u128) -> Self {
        Self { tip, ..self }
    }

    /// Last hash of the signing payload.
    fn checkpoint(&self) -> Hash {
        if self.era.is_immortal() {
            self.genesis_hash
        } else {
            self.block_hash
        }
    }
}

/// Sender, signature and signed extensions of an extrinsic.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct ExtrinsicSignature {
    /// Sender address.
    pub signer: MultiAddress,
    /// Signature over the signing payload.
    pub signature: MultiSignature,
    /// Validity window.
    pub era: Era,
    /// Sender account nonce.
    #[codec(compact)]
    pub nonce: u64,
    /// Tip paid to the block author.
    #[codec(compact)]
    pub tip: u128,
}

/// Bytes a signer commits to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningPayload<'a> {
    call: &'a Call,
    era: Era,
    nonce: u64,
    tip: u128,
    spec_version: u32,
    transaction_version: u32,
    genesis_hash: Hash,
    checkpoint: Hash,
}

impl<'a> SigningPayload<'a> {
    /// Payload for `call` under `options`.
    pub fn new(call: &'a Call, options: &SignatureOptions) -> Self {
        Self {
            call,
            era: options.era,
            nonce: options.nonce,
            tip: options.tip,
            spec_version: options.spec_version,
            transaction_version: options.transaction_version,
            genesis_hash: options.genesis_hash,
            checkpoint: options.checkpoint(),
        }
    }

    /// Bytes handed to the signer: the payload, or its blake2-256 hash when
    /// longer than `threshold`.
    pub fn signable(&self, threshold: usize) -> Vec<u8> {
        let encoded = self.encode();
        if encoded.len() > threshold {
            debug!(
                "Signing payload of {} bytes exceeds {threshold}, signing its hash",
                encoded.len()
            );
            blake2_256(&encoded).to_vec()
        } else {
            encoded
        }
    }
}

impl Encode for SigningPayload<'_> {
    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        self.call.encode_to(dest);
        self.era.encode_to(dest);
        Compact(self.nonce).encode_to(dest);
        Compact(self.tip).encode_to(dest);
        self.spec_version.encode_to(dest);
        self.transaction_version.encode_to(dest);
        self.genesis_hash.encode_to(dest);
        self.checkpoint.encode_to(dest);
    }
}

/// Transaction ready to sign or submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extrinsic {
    /// Format version without the signed flag.
    pub version: u8,
    /// Signature part, `None` for unsigned extrinsics.
    pub signature: Option<ExtrinsicSignature>,
    /// Encoded call.
    pub call: Call,
}

impl Extrinsic {
    /// Whether a signature is attached.
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Length-prefixed wire encoding.
    pub fn encode(&self) -> EncodedExtrinsic {
        let mut body = Vec::new();
        match &self.signature {
            Some(signature) => {
                body.push(self.version | SIGNED_FLAG);
                signature.encode_to(&mut body);
            }
            None => body.push(self.version),
        }
        self.call.encode_to(&mut body);
        EncodedExtrinsic(body.encode())
    }

    /// Parse a length-prefixed version 4 extrinsic.
    pub fn decode(bytes: &[u8]) -> Result<Self, BuildError> {
        let (len, prefix) = codec::decode_prefix::<Compact<u32>>(bytes)?;
        let body = &bytes[prefix..];
        let len = len.0 as usize;
        if body.len() < len {
            return Err(CodecError::Truncated {
                needed: len,
                available: body.len(),
            }
            .into());
        }
        if body.len() > len {
            return Err(CodecError::TrailingBytes(body.len() - len).into());
        }

        let (&version, rest) = body.split_first().ok_or(CodecError::Truncated {
            needed: 1,
            available: 0,
        })?;
        let signed = version & SIGNED_FLAG != 0;
        let version = version & !SIGNED_FLAG;
        if version != EXTRINSIC_VERSION {
            return Err(BuildError::UnsupportedVersion(version));
        }

        let (signature, call) = if signed {
            let (signer, rest) = split_prefix(rest, codec::decode_tagged_prefix::<MultiAddress>)?;
            let (signature, rest) = split_prefix(rest, codec::decode_tagged_prefix::<MultiSignature>)?;
            let ((era, nonce, tip), rest) =
                split_prefix(rest, codec::decode_prefix::<(Era, Compact<u64>, Compact<u128>)>)?;
            let signature = ExtrinsicSignature {
                signer,
                signature,
                era,
                nonce: nonce.0,
                tip: tip.0,
            };
            (Some(signature), rest)
        } else {
            (None, rest)
        };

        Ok(Self {
            version,
            signature,
            call: Call::from_bytes(call)?,
        })
    }

    /// Check the attached signature against `options`.
    ///
    /// Era, nonce and tip are taken from the extrinsic itself; runtime
    /// versions and hashes come from `options`.
    pub fn verify(&self, options: &SignatureOptions) -> Result<(), SigningError> {
        self.verify_with_threshold(options, DEFAULT_PAYLOAD_HASH_THRESHOLD)
    }

    fn verify_with_threshold(&self, options: &SignatureOptions, threshold: usize) -> Result<(), SigningError> {
        let signature = self.signature.as_ref().ok_or(SigningError::NotSigned)?;
        let MultiAddress::Id(signer) = &signature.signer else {
            return Err(SigningError::Unsupported("signer address without public key"));
        };
        let options = SignatureOptions {
            era: signature.era,
            nonce: signature.nonce,
            tip: signature.tip,
            ..*options
        };
        let payload = SigningPayload::new(&self.call, &options).signable(threshold);
        let public: [u8; 32] = signer.clone().into();
        keyring::verify(&signature.signature, &payload, &public)
    }
}

fn split_prefix<'a, T>(
    bytes: &'a [u8],
    decode: impl FnOnce(&'a [u8]) -> codec::Result<(T, usize)>,
) -> Result<(T, &'a [u8]), CodecError> {
    let (value, consumed) = decode(bytes)?;
    Ok((value, &bytes[consumed..]))
}

/// Final extrinsic bytes, length prefix included.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedExtrinsic(pub Vec<u8>);

impl EncodedExtrinsic {
    /// Extrinsic bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into extrinsic bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }

    /// Transaction hash as reported by the node.
    pub fn hash(&self) -> Hash {
        Hash::from(blake2_256(&self.0))
    }
}

impl AsRef<[u8]> for EncodedExtrinsic {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for EncodedExtrinsic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

/// Wraps calls into extrinsics and signs them.
#[derive(Debug, Clone, Default)]
pub struct ExtrinsicBuilder {
    config: ChainConfig,
}

impl ExtrinsicBuilder {
    /// Builder for a chain described by `config`, rejected if the
    /// configuration does not validate.
    pub fn new(config: ChainConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Chain configuration.
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Unsigned extrinsic carrying `call`.
    pub fn unsigned(&self, call: Call) -> Extrinsic {
        Extrinsic {
            version: self.config.extrinsic_version,
            signature: None,
            call,
        }
    }

    /// Signing payload for `call`, after checking `options` against the chain limits.
    pub fn signing_payload<'a>(
        &self,
        call: &'a Call,
        options: &SignatureOptions,
    ) -> Result<SigningPayload<'a>, BuildError> {
        let width = self.config.nonce_width;
        if options.nonce > width.max() {
            return Err(BuildError::EncodingOverflow {
                field: "nonce",
                value: options.nonce.into(),
                width: width.name(),
            });
        }
        if let Era::Mortal(period, phase) = options.era {
            if !options.era.is_canonical() {
                return Err(BuildError::InvalidEra { period, phase });
            }
        }
        Ok(SigningPayload::new(call, options))
    }

    /// Sign `extrinsic`, returning a new signed extrinsic.
    ///
    /// The input is never modified; signing an already signed extrinsic
    /// fails with [`SigningError::AlreadySigned`].
    pub fn sign(
        &self,
        extrinsic: &Extrinsic,
        signer: &dyn Signer,
        options: &SignatureOptions,
    ) -> Result<Extrinsic, Error> {
        if extrinsic.is_signed() {
            return Err(SigningError::AlreadySigned.into());
        }
        let payload = self
            .signing_payload(&extrinsic.call, options)?
            .signable(self.config.payload_hash_threshold);
        let signature = signer.sign(&payload)?;
        let signer = signer.signer_address();
        trace!("Signed extrinsic for {signer:?} with nonce {}", options.nonce);

        Ok(Extrinsic {
            version: extrinsic.version,
            signature: Some(ExtrinsicSignature {
                signer,
                signature,
                era: options.era,
                nonce: options.nonce,
                tip: options.tip,
            }),
            call: extrinsic.call.clone(),
        })
    }

    /// Check the signature of `extrinsic` with this chain's payload threshold.
    pub fn verify(&self, extrinsic: &Extrinsic, options: &SignatureOptions) -> Result<(), SigningError> {
        extrinsic.verify_with_threshold(options, self.config.payload_hash_threshold)
    }
}
