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
//! SS58 address conversion.

use crate::error::KeyError;
use sp_core::crypto::{AccountId32, Ss58AddressFormat, Ss58Codec};

/// Render a 32 byte public key as an SS58 address for `network`.
pub fn encode(public: &[u8; 32], network: u16) -> String {
    AccountId32::new(*public).to_ss58check_with_version(Ss58AddressFormat::custom(network))
}

/// Parse an SS58 address into its public key and network id.
pub fn decode(address: &str) -> Result<([u8; 32], u16), KeyError> {
    let (account, format) = AccountId32::from_ss58check_with_version(address)
        .map_err(|e| KeyError::InvalidAddress(format!("{address}: {e:?}")))?;
    Ok((account.into(), format.prefix()))
}

/// Parse an SS58 address that must belong to `network`.
pub fn decode_for(address: &str, network: u16) -> Result<[u8; 32], KeyError> {
    let (public, found) = decode(address)?;
    if found != network {
        return Err(KeyError::WrongNetwork {
            expected: network,
            found,
        });
    }
    Ok(public)
}
