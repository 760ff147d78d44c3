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
//! Transaction sender and call argument addressing.

use crate::codec::{self, CodecError, Tagged, TypeHint, Value};
use crate::{AccountId, AccountIndex};
use parity_scale_codec::{Decode, Encode};

/// A multi-format address wrapper for on-chain accounts.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub enum MultiAddress {
    /// It's an account ID (pubkey).
    #[codec(index = 0)]
    Id(AccountId),
    /// It's an account index.
    #[codec(index = 1)]
    Index(#[codec(compact)] AccountIndex),
    /// It's some arbitrary raw bytes.
    #[codec(index = 2)]
    Raw(Vec<u8>),
    /// It's a 32 byte representation.
    #[codec(index = 3)]
    Address32([u8; 32]),
    /// It's a 20 byte representation.
    #[codec(index = 4)]
    Address20([u8; 20]),
}

impl MultiAddress {
    /// Build an `Id` address from a hex encoded 32 byte public key.
    pub fn from_hex_account_id(text: &str) -> codec::Result<Self> {
        let raw = codec::from_hex(text)?;
        let bytes: [u8; 32] = raw
            .as_slice()
            .try_into()
            .map_err(|_| CodecError::LengthMismatch {
                expected: 32,
                found: raw.len(),
            })?;
        Ok(MultiAddress::Id(AccountId::new(bytes)))
    }

    /// Account id behind an `Id` address.
    pub fn account_id(&self) -> Option<&AccountId> {
        match self {
            MultiAddress::Id(id) => Some(id),
            _ => None,
        }
    }

    /// Metadata shape of this type.
    pub fn type_hint() -> TypeHint {
        TypeHint::multi_address()
    }

    /// Decode a complete address.
    pub fn decode_exact(bytes: &[u8]) -> codec::Result<Self> {
        codec::decode_tagged(bytes)
    }
}

impl From<AccountId> for MultiAddress {
    fn from(id: AccountId) -> Self {
        MultiAddress::Id(id)
    }
}

impl Tagged for MultiAddress {
    const NAME: &'static str = "MultiAddress";

    fn is_known_tag(tag: u8) -> bool {
        tag <= 4
    }
}

impl From<&MultiAddress> for Value {
    fn from(address: &MultiAddress) -> Self {
        let (index, field) = match address {
            MultiAddress::Id(id) => (0, Value::Bytes(AsRef::<[u8]>::as_ref(id).to_vec())),
            MultiAddress::Index(i) => (1, Value::Uint((*i).into())),
            MultiAddress::Raw(raw) => (2, Value::Bytes(raw.clone())),
            MultiAddress::Address32(raw) => (3, Value::Bytes(raw.to_vec())),
            MultiAddress::Address20(raw) => (4, Value::Bytes(raw.to_vec())),
        };
        Value::Variant {
            index,
            fields: vec![field],
        }
    }
}

impl From<MultiAddress> for Value {
    fn from(address: MultiAddress) -> Self {
        Value::from(&address)
    }
}

impl TryFrom<&Value> for MultiAddress {
    type Error = CodecError;

    fn try_from(value: &Value) -> codec::Result<Self> {
        let bytes = codec::encode(value, &TypeHint::multi_address())?;
        MultiAddress::decode_exact(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const BOB: [u8; 32] = hex!("8eaf04151687736326c9fea17e25fc5287613693c912909cb226aa4794f26a48");

    #[test]
    fn test_id_encoding() {
        let address = MultiAddress::Id(AccountId::new(BOB));
        let mut expected = vec![0u8];
        expected.extend_from_slice(&BOB);
        assert_eq!(address.encode(), expected);
    }

    #[test]
    fn test_from_hex_account_id() {
        let address = MultiAddress::from_hex_account_id(
            "0x8eaf04151687736326c9fea17e25fc5287613693c912909cb226aa4794f26a48",
        )
        .unwrap();
        assert_eq!(address, MultiAddress::Id(AccountId::new(BOB)));
        assert_eq!(address.account_id(), Some(&AccountId::new(BOB)));

        assert_eq!(
            MultiAddress::from_hex_account_id("0x8eaf"),
            Err(CodecError::LengthMismatch {
                expected: 32,
                found: 2
            })
        );
        assert!(matches!(
            MultiAddress::from_hex_account_id("not hex"),
            Err(CodecError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_dynamic_encoding_matches_static() {
        let addresses = [
            MultiAddress::Id(AccountId::new(BOB)),
            MultiAddress::Index(70_000),
            MultiAddress::Raw(vec![1, 2, 3]),
            MultiAddress::Address32([9; 32]),
            MultiAddress::Address20([3; 20]),
        ];
        for address in addresses {
            let dynamic = codec::encode(&Value::from(&address), &MultiAddress::type_hint()).unwrap();
            assert_eq!(dynamic, address.encode());
            let back = MultiAddress::try_from(&Value::from(&address)).unwrap();
            assert_eq!(back, address);
        }
    }

    #[test]
    fn test_unknown_tag() {
        assert_eq!(
            MultiAddress::decode_exact(&[5, 0]),
            Err(CodecError::InvalidDiscriminant {
                type_name: "MultiAddress".into(),
                value: 5
            })
        );
    }

    #[test]
    fn test_truncated_address() {
        assert!(matches!(
            MultiAddress::decode_exact(&hex!("008eaf")),
            Err(CodecError::Truncated { .. })
        ));
    }
}
