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
//! Runtime call encoding.
//!
//! A call is `pallet_index ++ call_index ++ args`, where each argument is
//! encoded with the type declared for it in metadata.
//!
//! # Examples
//!
//! ```
//! use libtxkit::call::CallBuilder;
//! use libtxkit::metadata::MetadataIndex;
//! use txkit_primitives::{MultiAddress, Value};
//!
//! # let index = MetadataIndex::from_json(r#"{"spec_version": 1, "pallets": [{"name": "Balances", "index": 4,
//! #   "calls": [{"name": "transfer", "index": 0, "args": [
//! #     {"name": "dest", "ty": {"variant": [{"name": "Id", "index": 0, "fields": [{"ty": {"fixed_bytes": 32}}]}]}},
//! #     {"name": "value", "ty": "compact"}]}]}]}"#).unwrap();
//! let dest = MultiAddress::from_hex_account_id(
//!     "0x8eaf04151687736326c9fea17e25fc5287613693c912909cb226aa4794f26a48",
//! ).unwrap();
//! let call = CallBuilder::new(&index)
//!     .build("Balances.transfer", &[Value::from(dest), Value::from(600_000_000_000u128)])
//!     .unwrap();
//! assert_eq!((call.pallet_index, call.call_index), (4, 0));
//! ```

use crate::error::{BuildError, MetadataError};
use crate::metadata::MetadataIndex;
use log::trace;
use parity_scale_codec::{Encode, EncodeLike, Output};
use txkit_primitives::codec::{self, CodecError, Value};

/// Encoded runtime call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// Pallet index.
    pub pallet_index: u8,
    /// Call index within the pallet.
    pub call_index: u8,
    /// Concatenated encoded arguments.
    pub args: Vec<u8>,
}

impl Call {
    /// Split encoded call bytes into indices and arguments.
    pub fn from_bytes(bytes: &[u8]) -> codec::Result<Self> {
        match bytes {
            [pallet_index, call_index, args @ ..] => Ok(Call {
                pallet_index: *pallet_index,
                call_index: *call_index,
                args: args.to_vec(),
            }),
            _ => Err(CodecError::Truncated {
                needed: 2,
                available: bytes.len(),
            }),
        }
    }
}

impl Encode for Call {
    fn size_hint(&self) -> usize {
        2 + self.args.len()
    }

    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        dest.push_byte(self.pallet_index);
        dest.push_byte(self.call_index);
        dest.write(&self.args);
    }
}

impl EncodeLike for Call {}

/// Call decoded back into names and values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCall {
    /// Pallet name.
    pub pallet: String,
    /// Call name.
    pub function: String,
    /// Argument names and values in declaration order.
    pub args: Vec<(String, Value)>,
}

/// Builds calls from `Pallet.function` names.
#[derive(Debug, Clone, Copy)]
pub struct CallBuilder<'a> {
    index: &'a MetadataIndex,
}

impl<'a> CallBuilder<'a> {
    /// Builder resolving names through `index`.
    pub fn new(index: &'a MetadataIndex) -> Self {
        Self { index }
    }

    /// Encode `target` (`"Pallet.function"`) with `args`.
    pub fn build(&self, target: &str, args: &[Value]) -> Result<Call, BuildError> {
        let (pallet, function) = target.split_once('.').ok_or_else(|| MetadataError::UnknownCall {
            pallet: target.to_string(),
            function: String::new(),
        })?;
        let resolved = self.index.resolve_call(pallet, function)?;
        if resolved.args.len() != args.len() {
            return Err(BuildError::ArgCountMismatch {
                expected: resolved.args.len(),
                found: args.len(),
            });
        }

        let mut encoded = Vec::new();
        for (declared, value) in resolved.args.iter().zip(args) {
            codec::encode_to(value, &declared.ty, &mut encoded).map_err(|source| {
                BuildError::ArgTypeMismatch {
                    arg: declared.name.clone(),
                    source,
                }
            })?;
        }
        trace!("Encoded {target} with {} argument bytes", encoded.len());

        Ok(Call {
            pallet_index: resolved.pallet_index,
            call_index: resolved.call_index,
            args: encoded,
        })
    }

    /// Decode `call` back into names and argument values.
    pub fn decode(&self, call: &Call) -> Result<DecodedCall, BuildError> {
        let found = self.index.call_by_index(call.pallet_index, call.call_index)?;
        let mut rest = call.args.as_slice();
        let mut args = Vec::with_capacity(found.call.args.len());
        for declared in &found.call.args {
            let (value, consumed) = codec::decode(rest, &declared.ty)?;
            rest = &rest[consumed..];
            args.push((declared.name.clone(), value));
        }
        if !rest.is_empty() {
            return Err(CodecError::TrailingBytes(rest.len()).into());
        }

        Ok(DecodedCall {
            pallet: found.pallet.to_string(),
            function: found.call.name.clone(),
            args,
        })
    }

    /// Decode encoded call bytes.
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<DecodedCall, BuildError> {
        self.decode(&Call::from_bytes(bytes)?)
    }
}
