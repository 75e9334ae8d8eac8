//! Shared JSON-RPC transport and nonce bookkeeping for the two chain
//! clients.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use primitive_types::{H160, H256};
use serde_json::json;
use sha3::{Digest, Keccak256};

use crate::error::{classify_chain_error, ChainError, RpcRequestError};

/// Blocking JSON-RPC transport: request envelope, id counter, and
/// success/failure decoding.
pub(crate) struct JsonRpcClient {
    name: &'static str,
    url: reqwest::Url,
    client: reqwest::blocking::Client,
    id: u64,
}

impl JsonRpcClient {
    pub(crate) fn new(name: &'static str, url: &str) -> Result<Self> {
        let url = reqwest::Url::parse(url)
            .map_err(|err| anyhow!("{} rpc url {:?}: {}", name, url, err))?;
        Ok(JsonRpcClient {
            name,
            url,
            client: reqwest::blocking::Client::new(),
            id: 0,
        })
    }

    pub(crate) fn request<SuccessResponse: serde::de::DeserializeOwned>(
        &mut self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<SuccessResponse, ChainError> {
        self.id += 1;
        let mut req_json = serde_json::Map::new();
        req_json.insert("id".to_owned(), json!(self.id));
        req_json.insert("jsonrpc".to_owned(), json!("2.0"));
        req_json.insert("method".to_owned(), json!(method));
        req_json.insert("params".to_owned(), params);

        let resp = self
            .client
            .post(self.url.clone())
            .json(&req_json)
            .send()
            .map_err(|err| RpcRequestError::new(self.name, method.to_string(), err))?;
        let output = resp
            .json::<jsonrpc_core::response::Output>()
            .map_err(|err| RpcRequestError::new(self.name, method.to_string(), err))?;
        match output {
            jsonrpc_core::response::Output::Success(success) => {
                serde_json::from_value(success.result)
                    .map_err(|err| RpcRequestError::new(self.name, method.to_string(), err).into())
            }
            jsonrpc_core::response::Output::Failure(failure) => Err(classify_chain_error(
                failure.error.code.code(),
                &failure.error.message,
            )),
        }
    }
}

/// Per-sender transaction nonce cache. The first submission for a
/// sender fetches the nonce from the chain; accepted submissions
/// advance the cached value locally, so back-to-back transactions from
/// the same key do not collide on a stale chain nonce.
#[derive(Default)]
pub(crate) struct NonceCache {
    nonces: HashMap<H160, u64>,
}

impl NonceCache {
    pub(crate) fn next(
        &mut self,
        sender: H160,
        fetch: impl FnOnce() -> Result<u64, ChainError>,
    ) -> Result<u64, ChainError> {
        if let Some(nonce) = self.nonces.get(&sender) {
            return Ok(*nonce);
        }
        let nonce = fetch()?;
        self.nonces.insert(sender, nonce);
        Ok(nonce)
    }

    /// Call only after the chain accepted the submission.
    pub(crate) fn bump(&mut self, sender: H160) {
        if let Some(nonce) = self.nonces.get_mut(&sender) {
            *nonce += 1;
        }
    }
}

pub(crate) fn envelope_digest(envelope: &serde_json::Value) -> Result<H256> {
    let bytes = serde_json::to_vec(envelope)?;
    let mut hasher = Keccak256::new();
    hasher.update(&bytes);
    let buf = hasher.finalize();
    Ok(H256::from_slice(&buf))
}
