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
//! Account keys and the signing capability.
//!
//! Extrinsic construction only needs something that implements [`Signer`].
//! [`KeyringPair`] is the in-process implementation backed by `sp-core`
//! ed25519 and sr25519 pairs; hardware wallets or remote signers plug in the
//! same way.
//!
//! # Examples
//!
//! ```
//! use libtxkit::keyring::{CryptoScheme, KeyringPair, Signer};
//!
//! let alice = KeyringPair::from_secret("//Alice", 42, CryptoScheme::Ed25519).unwrap();
//! assert_eq!(alice.address(), "5FA9nQDVg267DEd8m1ZypXLBnvN7SFxYwV7ndqSYGiN9TTpu");
//!
//! let signature = alice.sign(b"payload").unwrap();
//! assert!(libtxkit::keyring::verify(&signature, b"payload", alice.public_key()).is_ok());
//! ```

use crate::config::ChainConfig;
use crate::error::{KeyError, SigningError};
use crate::ss58;
use log::debug;
use serde::{Deserialize, Serialize};
use sp_core::crypto::SecretStringError;
use sp_core::{ed25519, sr25519, Pair};
use std::fmt;
use std::str::FromStr;
use txkit_primitives::{AccountId, MultiAddress, MultiSignature};

/// Signature scheme of an account key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CryptoScheme {
    /// Schnorrkel SR25519 keys (Substrate native)
    Sr25519,
    /// ED25519 keys
    Ed25519,
}

impl CryptoScheme {
    /// Get a human-readable name for this cryptographic scheme.
    ///
    /// ```
    /// use libtxkit::keyring::CryptoScheme;
    ///
    /// assert_eq!(CryptoScheme::Sr25519.name(), "SR25519");
    /// assert_eq!(CryptoScheme::Ed25519.name(), "ED25519");
    /// ```
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sr25519 => "SR25519",
            Self::Ed25519 => "ED25519",
        }
    }
}

impl Default for CryptoScheme {
    fn default() -> Self {
        Self::Sr25519
    }
}

impl fmt::Display for CryptoScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoScheme::Sr25519 => write!(f, "sr25519"),
            CryptoScheme::Ed25519 => write!(f, "ed25519"),
        }
    }
}

impl FromStr for CryptoScheme {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sr25519" | "sr" => Ok(CryptoScheme::Sr25519),
            "ed25519" | "ed" => Ok(CryptoScheme::Ed25519),
            _ => Err(KeyError::InvalidSecret(format!(
                "invalid cryptographic scheme: '{s}'. Supported: sr25519, ed25519"
            ))),
        }
    }
}

/// Produces extrinsic signatures.
pub trait Signer: Send + Sync {
    /// Address placed in the extrinsic as the sender.
    fn signer_address(&self) -> MultiAddress;

    /// Sign `payload` as given; hashing of long payloads happens before this call.
    fn sign(&self, payload: &[u8]) -> Result<MultiSignature, SigningError>;
}

enum SecretPair {
    Ed25519(ed25519::Pair),
    Sr25519(sr25519::Pair),
}

/// Key pair derived from a secret URI.
pub struct KeyringPair {
    uri: String,
    address: String,
    public_key: [u8; 32],
    scheme: CryptoScheme,
    pair: SecretPair,
}

impl KeyringPair {
    /// Derive a key pair from a mnemonic phrase, hex seed or secret URI.
    ///
    /// `secret` accepts everything `sp_core::Pair::from_string` does:
    /// `"bottom drive obey lake ...//hard/soft"`, `"0x<32 byte seed>"` or
    /// dev shortcuts such as `"//Alice"`. `network` selects the SS58 prefix
    /// of the rendered address.
    pub fn from_secret(secret: &str, network: u16, scheme: CryptoScheme) -> Result<Self, KeyError> {
        let invalid = |e: SecretStringError| KeyError::InvalidSecret(format!("{e:?}"));
        let (pair, public_key) = match scheme {
            CryptoScheme::Ed25519 => {
                let pair = ed25519::Pair::from_string(secret, None).map_err(invalid)?;
                let public = pair.public().0;
                (SecretPair::Ed25519(pair), public)
            }
            CryptoScheme::Sr25519 => {
                let pair = sr25519::Pair::from_string(secret, None).map_err(invalid)?;
                let public = pair.public().0;
                (SecretPair::Sr25519(pair), public)
            }
        };
        let address = ss58::encode(&public_key, network);
        debug!("Derived {scheme} key {address}");

        Ok(Self {
            uri: secret.to_string(),
            address,
            public_key,
            scheme,
            pair,
        })
    }

    /// [`KeyringPair::from_secret`] rendering the address with the chain's
    /// configured SS58 prefix.
    pub fn from_config(secret: &str, config: &ChainConfig, scheme: CryptoScheme) -> Result<Self, KeyError> {
        Self::from_secret(secret, config.ss58_prefix, scheme)
    }

    /// Secret URI the pair was derived from.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// SS58 address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Raw public key.
    pub fn public_key(&self) -> &[u8; 32] {
        &self.public_key
    }

    /// Signature scheme.
    pub fn scheme(&self) -> CryptoScheme {
        self.scheme
    }

    /// Account id of the public key.
    pub fn account_id(&self) -> AccountId {
        AccountId::new(self.public_key)
    }
}

impl fmt::Debug for KeyringPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyringPair")
            .field("address", &self.address)
            .field("scheme", &self.scheme)
            .finish_non_exhaustive()
    }
}

impl Signer for KeyringPair {
    fn signer_address(&self) -> MultiAddress {
        MultiAddress::Id(self.account_id())
    }

    fn sign(&self, payload: &[u8]) -> Result<MultiSignature, SigningError> {
        Ok(match &self.pair {
            SecretPair::Ed25519(pair) => MultiSignature::Ed25519(pair.sign(payload).0),
            SecretPair::Sr25519(pair) => MultiSignature::Sr25519(pair.sign(payload).0),
        })
    }
}

/// Check `signature` over `message` against a 32 byte public key.
pub fn verify(signature: &MultiSignature, message: &[u8], public: &[u8; 32]) -> Result<(), SigningError> {
    let valid = match signature {
        MultiSignature::Ed25519(raw) => ed25519::Pair::verify(
            &ed25519::Signature::from_raw(*raw),
            message,
            &ed25519::Public::from_raw(*public),
        ),
        MultiSignature::Sr25519(raw) => sr25519::Pair::verify(
            &sr25519::Signature::from_raw(*raw),
            message,
            &sr25519::Public::from_raw(*public),
        ),
        MultiSignature::Ecdsa(_) => return Err(SigningError::Unsupported("ecdsa signatures")),
    };
    if valid {
        Ok(())
    } else {
        Err(SigningError::BadSignature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{RFC_PUBLIC, RFC_SEED};
    use hex_literal::hex;

    #[test]
    fn test_dev_key_ed25519() {
        let alice = KeyringPair::from_secret("//Alice", 42, CryptoScheme::Ed25519).unwrap();
        assert_eq!(
            alice.public_key(),
            &hex!("88dc3417d5058ec4b4503e0c12ea1a0a89be200fe98922423d4334014fa6b0ee")
        );
        assert_eq!(alice.address(), "5FA9nQDVg267DEd8m1ZypXLBnvN7SFxYwV7ndqSYGiN9TTpu");
        assert_eq!(alice.uri(), "//Alice");
    }

    #[test]
    fn test_dev_key_sr25519() {
        let alice = KeyringPair::from_secret("//Alice", 42, CryptoScheme::Sr25519).unwrap();
        assert_eq!(alice.address(), "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY");
        assert_eq!(
            alice.signer_address(),
            MultiAddress::Id(AccountId::new(hex!(
                "d43593c715fdd31c61141abd04a99fd6822c8558854ccde39a5684e7a56da27d"
            )))
        );
    }

    #[test]
    fn test_hex_seed() {
        let pair = KeyringPair::from_secret(RFC_SEED, 42, CryptoScheme::Ed25519).unwrap();
        assert_eq!(pair.public_key(), &RFC_PUBLIC);
        assert_eq!(pair.address(), "5Gw54ghuAHodDGAS91DUxqvKa6PeT9bhDdns3ztBupY8pSyn");
    }

    #[test]
    fn test_network_changes_address_only() {
        let generic = KeyringPair::from_secret(RFC_SEED, 42, CryptoScheme::Ed25519).unwrap();
        let polkadot = KeyringPair::from_secret(RFC_SEED, 0, CryptoScheme::Ed25519).unwrap();
        assert_eq!(generic.public_key(), polkadot.public_key());
        assert_ne!(generic.address(), polkadot.address());
        assert_eq!(ss58::decode(polkadot.address()).unwrap(), (RFC_PUBLIC, 0));
    }

    #[test]
    fn test_config_selects_network() {
        let config = ChainConfig {
            ss58_prefix: 0,
            ..Default::default()
        };
        let pair = KeyringPair::from_config(RFC_SEED, &config, CryptoScheme::Ed25519).unwrap();
        assert_eq!(ss58::decode(pair.address()).unwrap(), (RFC_PUBLIC, 0));

        let generic = KeyringPair::from_config(RFC_SEED, &ChainConfig::default(), CryptoScheme::Ed25519).unwrap();
        assert_eq!(generic.address(), "5Gw54ghuAHodDGAS91DUxqvKa6PeT9bhDdns3ztBupY8pSyn");
    }

    #[test]
    fn test_invalid_secret() {
        assert!(matches!(
            KeyringPair::from_secret("0x1234", 42, CryptoScheme::Ed25519),
            Err(KeyError::InvalidSecret(_))
        ));
    }

    #[test]
    fn test_sign_and_verify() {
        for scheme in [CryptoScheme::Ed25519, CryptoScheme::Sr25519] {
            let pair = KeyringPair::from_secret("//Bob", 42, scheme).unwrap();
            let signature = pair.sign(b"robonomics").unwrap();
            assert_eq!(verify(&signature, b"robonomics", pair.public_key()), Ok(()));
            assert_eq!(
                verify(&signature, b"tampered", pair.public_key()),
                Err(SigningError::BadSignature)
            );
        }
        assert_eq!(
            verify(&MultiSignature::Ecdsa([0; 65]), b"x", &[0; 32]),
            Err(SigningError::Unsupported("ecdsa signatures"))
        );
    }

    #[test]
    fn test_ed25519_signature_is_deterministic() {
        let pair = KeyringPair::from_secret(RFC_SEED, 42, CryptoScheme::Ed25519).unwrap();
        // RFC 8032 test vector 1 signs the empty message.
        assert_eq!(
            pair.sign(b"").unwrap(),
            MultiSignature::Ed25519(hex!(
                "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e065224901555fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b"
            ))
        );
    }

    #[test]
    fn test_debug_hides_secret() {
        let pair = KeyringPair::from_secret("//Alice", 42, CryptoScheme::Sr25519).unwrap();
        let shown = format!("{pair:?}");
        assert!(!shown.contains("//Alice"));
        assert!(shown.contains(pair.address()));
    }

    #[test]
    fn test_scheme_parsing() {
        assert_eq!("ED25519".parse::<CryptoScheme>(), Ok(CryptoScheme::Ed25519));
        assert_eq!("sr".parse::<CryptoScheme>(), Ok(CryptoScheme::Sr25519));
        assert!("ecdsa".parse::<CryptoScheme>().is_err());
        assert_eq!(CryptoScheme::default().to_string(), "sr25519");
    }
}
