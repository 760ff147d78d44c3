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
//! Errors that can occur during encoding and decoding.

/// Codec Result typedef.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Encoding and decoding failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    /// Input ended before the value was complete.
    #[error("input truncated: needed {needed} bytes, {available} available")]
    Truncated {
        /// Bytes required by the pending read.
        needed: usize,
        /// Bytes left in the input.
        available: usize,
    },
    /// A tag byte selects no known variant.
    #[error("invalid discriminant {value} for `{type_name}`")]
    InvalidDiscriminant {
        /// Type being decoded.
        type_name: String,
        /// Offending tag byte.
        value: u8,
    },
    /// Value decoded but input bytes remain.
    #[error("{0} trailing bytes after decoded value")]
    TrailingBytes(usize),
    /// Value shape disagrees with its type hint.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Name of the declared type.
        expected: &'static str,
        /// Kind of the supplied value.
        found: &'static str,
    },
    /// Sized container got the wrong number of elements.
    #[error("length mismatch: expected {expected}, found {found}")]
    LengthMismatch {
        /// Declared length.
        expected: usize,
        /// Supplied length.
        found: usize,
    },
    /// Numeric value does not fit the declared width.
    #[error("value out of range for `{type_name}`")]
    OutOfRange {
        /// Declared type.
        type_name: &'static str,
    },
    /// Compact integer not in its shortest form.
    #[error("compact integer is not canonically encoded")]
    NonCanonical,
    /// Text payload is not UTF-8.
    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,
    /// Statically typed value failed to decode for a reason other than truncation.
    #[error("malformed `{type_name}` encoding")]
    Malformed {
        /// Type being decoded.
        type_name: String,
    },
    /// Hex text could not be parsed.
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}
