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
//! Errors that can occur while building, signing and submitting transactions.

use txkit_primitives::CodecError;

/// libtxkit Result typedef.
pub type Result<T> = std::result::Result<T, Error>;

/// Metadata lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetadataError {
    /// No pallet with this name.
    #[error("unknown pallet `{0}`")]
    UnknownPallet(String),
    /// Pallet has no storage item with this name.
    #[error("unknown storage item `{pallet}.{item}`")]
    UnknownItem {
        /// Pallet name.
        pallet: String,
        /// Storage item name.
        item: String,
    },
    /// Pallet has no call with this name.
    #[error("unknown call `{pallet}.{function}`")]
    UnknownCall {
        /// Pallet name.
        pallet: String,
        /// Call name.
        function: String,
    },
    /// No call is registered under these indices.
    #[error("no call at pallet index {pallet_index}, call index {call_index}")]
    UnknownCallIndex {
        /// Pallet index byte.
        pallet_index: u8,
        /// Call index byte.
        call_index: u8,
    },
    /// Source metadata declares a name or index twice.
    #[error("ambiguous metadata: {0}")]
    Ambiguous(String),
    /// Index was built for another runtime.
    #[error("metadata indexed for spec version {indexed}, runtime is at {runtime}")]
    SpecVersionMismatch {
        /// Spec version of the indexed metadata.
        indexed: u32,
        /// Spec version reported by the chain.
        runtime: u32,
    },
    /// Metadata descriptor could not be parsed.
    #[error("metadata parse error: {0}")]
    Parse(String),
}

/// Call, storage key and extrinsic construction failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    /// Name lookup failed.
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    /// Argument value does not fit its declared type.
    #[error("argument `{arg}` rejected: {source}")]
    ArgTypeMismatch {
        /// Argument name.
        arg: String,
        /// Codec failure.
        source: CodecError,
    },
    /// Wrong number of call arguments.
    #[error("expected {expected} arguments, got {found}")]
    ArgCountMismatch {
        /// Declared argument count.
        expected: usize,
        /// Supplied argument count.
        found: usize,
    },
    /// Storage key material does not match the declared hashers.
    #[error("storage item takes {expected} keys, got {found}")]
    KeyCountMismatch {
        /// Declared key count.
        expected: usize,
        /// Supplied key count.
        found: usize,
    },
    /// Numeric field exceeds the width configured for the chain.
    #[error("{field} {value} exceeds {width}")]
    EncodingOverflow {
        /// Field name.
        field: &'static str,
        /// Supplied value.
        value: u128,
        /// Configured width.
        width: &'static str,
    },
    /// Mortal era whose period and phase do not survive the two byte encoding.
    #[error("mortal era with period {period} and phase {phase} has no exact encoding")]
    InvalidEra {
        /// Era period in blocks.
        period: u64,
        /// Era phase.
        phase: u64,
    },
    /// Extrinsic format version other than 4.
    #[error("unsupported extrinsic version {0}")]
    UnsupportedVersion(u8),
    /// Wire encoding failure.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Signing and verification failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SigningError {
    /// Extrinsic already carries a signature.
    #[error("extrinsic is already signed")]
    AlreadySigned,
    /// The signer refused or failed to sign.
    #[error("signer rejected payload: {0}")]
    SignerRejected(String),
    /// Extrinsic has no signature to verify.
    #[error("extrinsic is not signed")]
    NotSigned,
    /// Signature scheme or signer address form is not supported for verification.
    #[error("cannot verify {0}")]
    Unsupported(&'static str),
    /// Signature does not match payload and signer.
    #[error("bad signature")]
    BadSignature,
}

/// Key derivation and address failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    /// Secret phrase, seed or derivation path was rejected.
    #[error("invalid secret: {0}")]
    InvalidSecret(String),
    /// SS58 address could not be decoded.
    #[error("invalid SS58 address: {0}")]
    InvalidAddress(String),
    /// Address belongs to another network.
    #[error("address is for network {found}, expected {expected}")]
    WrongNetwork {
        /// Expected network id.
        expected: u16,
        /// Network id carried by the address.
        found: u16,
    },
}

/// Head subscription failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubscriptionError {
    /// Transport ended the stream.
    #[error("subscription transport closed")]
    TransportClosed,
    /// Subscription was cancelled locally.
    #[error("subscription cancelled")]
    Cancelled,
    /// Transport reported an error.
    #[error("subscription transport error: {0}")]
    Transport(String),
}

/// JSON-RPC request failures.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// Transport could not deliver the request.
    #[error("rpc transport error: {0}")]
    Transport(String),
    /// Node answered with an error object.
    #[error("rpc error {code}: {message}")]
    Response {
        /// JSON-RPC error code.
        code: i64,
        /// Error message.
        message: String,
    },
    /// Node answered `null` where a value is required.
    #[error("node returned no {0}")]
    Missing(&'static str),
    /// Response did not have the expected shape.
    #[error("unexpected rpc response: {0}")]
    Json(#[from] serde_json::Error),
    /// Response carried undecodable bytes.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    /// Configuration is not valid TOML for this schema.
    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// Configuration values are inconsistent.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// libtxkit errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Codec error.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// Metadata error.
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    /// Build error.
    #[error(transparent)]
    Build(#[from] BuildError),
    /// Signing error.
    #[error(transparent)]
    Signing(#[from] SigningError),
    /// Key error.
    #[error(transparent)]
    Key(#[from] KeyError),
    /// Subscription error.
    #[error(transparent)]
    Subscription(#[from] SubscriptionError),
    /// Rpc error.
    #[error(transparent)]
    Rpc(#[from] RpcError),
    /// Config error.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
