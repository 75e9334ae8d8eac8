use anyhow::Result;
use primitive_types::H256;
use serde::Deserialize;
use serde_json::json;
use xr_crypto::Account;

use crate::error::{ChainError, RpcRequestError};
use crate::rpc::{envelope_digest, JsonRpcClient, NonceCache};
use crate::traits::{AnchorBlock, AnchorChain};

const CLIENT_NAME: &str = "anchor client";

#[derive(Deserialize)]
struct BlockResponse {
    /// Hex of the self-describing header wire form.
    header: String,
    /// Hex of the consensus payload embedded in the header.
    consensus_payload: String,
}

/// Blocking JSON-RPC wrapper around an anchor-chain node.
pub struct AnchorClient {
    rpc: JsonRpcClient,
    nonces: NonceCache,
}

impl AnchorClient {
    pub fn new(url: &str) -> Result<Self> {
        Ok(AnchorClient {
            rpc: JsonRpcClient::new(CLIENT_NAME, url)?,
            nonces: NonceCache::default(),
        })
    }

    fn decode_hex(&self, method: &str, value: &str) -> Result<Vec<u8>, ChainError> {
        hex::decode(value.trim_start_matches("0x"))
            .map_err(|err| RpcRequestError::new(CLIENT_NAME, method.to_string(), err).into())
    }
}

impl AnchorChain for AnchorClient {
    fn current_height(&mut self) -> Result<u32, ChainError> {
        self.rpc.request("get_current_height", serde_json::Value::Null)
    }

    fn block_at(&mut self, height: u32) -> Result<AnchorBlock, ChainError> {
        let response: BlockResponse = self.rpc.request("get_block", json!([height]))?;
        Ok(AnchorBlock {
            header: self.decode_hex("get_block", &response.header)?,
            consensus_payload: self.decode_hex("get_block", &response.consensus_payload)?,
        })
    }

    fn send_native_tx(
        &mut self,
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
            "send_native_transaction",
            json!([{
                "envelope": envelope,
                "signature": format!("0x{}", hex::encode(signature)),
            }]),
        )?;
        self.nonces.bump(sender);
        log::debug!("anchor tx {:#x} submitted ({})", tx_hash, method);
        Ok(tx_hash)
    }

    fn native_call(
        &mut self,
        method: &str,
        args: serde_json::Value,
    ) -> Result<serde_json::Value, ChainError> {
        self.rpc.request("call_native", json!([{ "method": method, "args": args }]))
    }

    fn tx_block_height(&mut self, tx_hash: &H256) -> Result<Option<u32>, ChainError> {
        self.rpc.request("get_tx_block_height", json!([tx_hash]))
    }
}
