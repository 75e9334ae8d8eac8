use anyhow::Result;
use primitive_types::{H160, H256};
use serde::Deserialize;
use serde_json::json;
use xr_crypto::Account;

use crate::error::{ChainError, RpcRequestError};
use crate::rpc::{envelope_digest, JsonRpcClient, NonceCache};
use crate::traits::SourceChain;

const CLIENT_NAME: &str = "side chain client";

#[derive(Deserialize)]
struct HeaderWithHash {
    header: serde_json::Value,
    hash: H256,
}

/// Blocking JSON-RPC wrapper around a side-chain node.
pub struct SideChainClient {
    rpc: JsonRpcClient,
    nonces: NonceCache,
}

impl SideChainClient {
    pub fn new(url: &str) -> Result<Self> {
        Ok(SideChainClient {
            rpc: JsonRpcClient::new(CLIENT_NAME, url)?,
            nonces: NonceCache::default(),
        })
    }
}

impl SourceChain for SideChainClient {
    fn current_height(&mut self) -> Result<u64, ChainError> {
        self.rpc.request("get_current_height", serde_json::Value::Null)
    }

    fn header_at(&mut self, height: u64) -> Result<(Vec<u8>, H256), ChainError> {
        let response: HeaderWithHash = self.rpc.request("get_block_header", json!([height]))?;
        let header = serde_json::to_vec(&response.header).map_err(|err| {
            RpcRequestError::new(CLIENT_NAME, "get_block_header".to_string(), err)
        })?;
        Ok((header, response.hash))
    }

    fn call(
        &mut self,
        contract: H160,
        method: &str,
        args: serde_json::Value,
    ) -> Result<serde_json::Value, ChainError> {
        self.rpc.request(
            "call_contract",
            json!([{ "contract": contract, "method": method, "args": args }]),
        )
    }

    fn send_tx(
        &mut self,
        contract: H160,
        method: &str,
        args: serde_json::Value,
        signer: &Account,
    ) -> Result<H256, ChainError> {
        let sender = signer.address();
        let rpc = &mut self.rpc;
        let nonce = self
            .nonces
            .next(sender, || rpc.request("get_nonce", json!([sender])))?;
        let envelope = json!({
            "contract": contract,
            "method": method,
            "args": args,
            "nonce": nonce,
            "sender": sender,
        });
        let digest = envelope_digest(&envelope)
            .map_err(|err| RpcRequestError::new(CLIENT_NAME, method.to_string(), err))?;
        let signature = signer
            .sign_recoverable(&digest)
            .map_err(|err| RpcRequestError::new(CLIENT_NAME, method.to_string(), err))?;

        let tx_hash: H256 = self.rpc.request(
            "send_transaction",
            json!([{
                "envelope": envelope,
                "signature": format!("0x{}", hex::encode(signature)),
            }]),
        )?;
        self.nonces.bump(sender);
        log::debug!("side chain tx {:#x} submitted ({})", tx_hash, method);
        Ok(tx_hash)
    }

    fn tx_block_height(&mut self, tx_hash: &H256) -> Result<Option<u64>, ChainError> {
        self.rpc.request("get_tx_block_height", json!([tx_hash]))
    }
}
