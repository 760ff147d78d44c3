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
//! JSON-RPC request helpers.
//!
//! [`ChainApi`] shapes the handful of node requests a transaction needs:
//! chain identity, runtime version, storage reads and submission. The
//! connection itself is any [`RpcTransport`]; the [`ChainConfig`] it carries
//! picks the account record layout and the era of new transactions.

use crate::config::ChainConfig;
use crate::error::{ConfigError, Error, RpcError};
use crate::extrinsic::{EncodedExtrinsic, SignatureOptions};
use crate::metadata::MetadataIndex;
use crate::storage::{StorageKey, StorageKeyBuilder};
use async_trait::async_trait;
use log::{debug, trace};
use parity_scale_codec::Encode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use txkit_primitives::codec;
use txkit_primitives::{AccountId, AccountInfo, BlockNumber, Hash, Header};

/// JSON-RPC request/response channel to a node.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Call `method` with positional `params` and return the `result` member.
    async fn request(&self, method: &str, params: JsonValue) -> Result<JsonValue, RpcError>;
}

/// Runtime version as reported by `state_getRuntimeVersion`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeVersion {
    /// Runtime name.
    #[serde(default)]
    pub spec_name: String,
    /// Runtime spec version.
    pub spec_version: u32,
    /// Transaction format version.
    pub transaction_version: u32,
}

/// Node identity from the `system_*` methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    /// Chain name.
    pub chain: String,
    /// Node implementation name.
    pub name: String,
    /// Node implementation version.
    pub version: String,
}

/// Typed chain requests over a transport.
pub struct ChainApi<T> {
    transport: T,
    config: ChainConfig,
}

impl<T: RpcTransport> ChainApi<T> {
    /// Wrap `transport` for a chain with the default configuration.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            config: ChainConfig::default(),
        }
    }

    /// Wrap `transport` for a chain described by `config`.
    pub fn with_config(transport: T, config: ChainConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { transport, config })
    }

    /// Underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Chain configuration.
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    async fn call<R: DeserializeOwned>(&self, method: &str, params: JsonValue) -> Result<R, RpcError> {
        trace!("RPC {method} {params}");
        let result = self.transport.request(method, params).await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Chain name, node name and node version.
    pub async fn node_info(&self) -> Result<NodeInfo, RpcError> {
        let info = NodeInfo {
            chain: self.call("system_chain", json!([])).await?,
            name: self.call("system_name", json!([])).await?,
            version: self.call("system_version", json!([])).await?,
        };
        debug!("Connected to chain {} using {} v{}", info.chain, info.name, info.version);
        Ok(info)
    }

    /// Hash of block `number`, `None` if the node does not know it.
    pub async fn block_hash(&self, number: BlockNumber) -> Result<Option<Hash>, RpcError> {
        self.call("chain_getBlockHash", json!([number])).await
    }

    /// Hash of block zero.
    pub async fn genesis_hash(&self) -> Result<Hash, RpcError> {
        self.block_hash(0).await?.ok_or(RpcError::Missing("genesis hash"))
    }

    /// Hash of the last finalized block.
    pub async fn finalized_head(&self) -> Result<Hash, RpcError> {
        self.call("chain_getFinalizedHead", json!([])).await
    }

    /// Header of block `hash`.
    pub async fn header(&self, hash: Hash) -> Result<Option<Header>, RpcError> {
        self.call("chain_getHeader", json!([hash])).await
    }

    /// Version of the latest runtime.
    pub async fn runtime_version(&self) -> Result<RuntimeVersion, RpcError> {
        self.call("state_getRuntimeVersion", json!([])).await
    }

    /// Raw value at `key` in the latest state, `None` when unset.
    pub async fn storage(&self, key: &StorageKey) -> Result<Option<Vec<u8>>, RpcError> {
        let value: Option<String> = self.call("state_getStorage", json!([key.to_string()])).await?;
        Ok(value.as_deref().map(codec::from_hex).transpose()?)
    }

    /// `System.Account` record of `account`, `None` when the account does not exist.
    ///
    /// The record layout is picked from the configured `account_layouts` for
    /// the spec version of `index`.
    pub async fn account_info(&self, index: &MetadataIndex, account: &AccountId) -> Result<Option<AccountInfo>, Error> {
        let encoded = account.encode();
        let key = StorageKeyBuilder::new(index).build("System", "Account", &[encoded.as_slice()], None)?;
        let Some(bytes) = self.storage(&key).await? else {
            debug!("No account record for {account}");
            return Ok(None);
        };
        Ok(Some(self.config.account_layouts.decode(index.spec_version(), &bytes)?))
    }

    /// Next nonce of `account`; zero for accounts without a record.
    pub async fn account_nonce(&self, index: &MetadataIndex, account: &AccountId) -> Result<u64, Error> {
        let info = self.account_info(index, account).await?;
        Ok(info.map_or(0, |info| u64::from(info.nonce())))
    }

    /// Signature options for `nonce` against the current chain state.
    ///
    /// Mortal transactions are anchored at the finalized head when
    /// `mortal_period` is configured.
    pub async fn signature_options(&self, nonce: u64) -> Result<SignatureOptions, RpcError> {
        let genesis = self.genesis_hash().await?;
        let version = self.runtime_version().await?;
        let options = SignatureOptions::immortal(genesis, version.spec_version, version.transaction_version, nonce);
        let Some(period) = self.config.mortal_period else {
            return Ok(options);
        };

        let head = self.finalized_head().await?;
        let header = self.header(head).await?.ok_or(RpcError::Missing("finalized header"))?;
        debug!("Anchoring era of {period} blocks at #{}", header.number);
        Ok(options.mortal(head, header.number.into(), period))
    }

    /// Submit `extrinsic` and return its hash.
    pub async fn submit_extrinsic(&self, extrinsic: &EncodedExtrinsic) -> Result<Hash, RpcError> {
        let hash: Hash = self.call("author_submitExtrinsic", json!([extrinsic.to_string()])).await?;
        debug!("Submitted extrinsic {hash:?}");
        Ok(hash)
    }
}
