use std::thread;
use std::time::{Duration, Instant};

use primitive_types::{H160, H256};
use xr_crypto::Account;

use crate::ChainError;

/// An anchor-chain block: the self-describing header bytes plus the
/// consensus payload carrying the committee configuration.
#[derive(Debug, Clone)]
pub struct AnchorBlock {
    pub header: Vec<u8>,
    pub consensus_payload: Vec<u8>,
}

/// Anchor (relay) chain surface used by the governance engine and the
/// genesis relay orchestrator. The blanket waits live here so mock
/// backends in tests inherit the exact confirmation discipline.
pub trait AnchorChain {
    fn current_height(&mut self) -> Result<u32, ChainError>;
    fn block_at(&mut self, height: u32) -> Result<AnchorBlock, ChainError>;
    /// Invoke a native management-contract method, signed by one
    /// account.
    fn send_native_tx(
        &mut self,
        method: &str,
        args: serde_json::Value,
        signer: &Account,
    ) -> Result<H256, ChainError>;
    /// Read-only native contract call.
    fn native_call(
        &mut self,
        method: &str,
        args: serde_json::Value,
    ) -> Result<serde_json::Value, ChainError>;
    fn tx_block_height(&mut self, tx_hash: &H256) -> Result<Option<u32>, ChainError>;

    /// Block until the transaction is included in some block, or the
    /// deadline passes.
    fn wait_included(
        &mut self,
        tx_hash: &H256,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<u32, ChainError> {
        let start = Instant::now();
        loop {
            if let Some(height) = self.tx_block_height(tx_hash)? {
                return Ok(height);
            }
            if start.elapsed() >= timeout {
                return Err(ChainError::ConfirmationTimeout {
                    tx_hash: *tx_hash,
                    timeout,
                });
            }
            thread::sleep(poll_interval);
        }
    }

    /// Block until the chain's current height strictly exceeds the
    /// transaction's inclusion height. Inclusion alone is not
    /// confirmation: the including block must no longer be the tip.
    fn wait_confirmed(
        &mut self,
        tx_hash: &H256,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<(), ChainError> {
        let start = Instant::now();
        let included_at = self.wait_included(tx_hash, timeout, poll_interval)?;
        loop {
            if self.current_height()? > included_at {
                return Ok(());
            }
            if start.elapsed() >= timeout {
                return Err(ChainError::ConfirmationTimeout {
                    tx_hash: *tx_hash,
                    timeout,
                });
            }
            thread::sleep(poll_interval);
        }
    }
}

/// Source (side) chain surface.
pub trait SourceChain {
    fn current_height(&mut self) -> Result<u64, ChainError>;
    /// Header at the given height in its self-describing JSON wire
    /// form, together with the block hash.
    fn header_at(&mut self, height: u64) -> Result<(Vec<u8>, H256), ChainError>;
    fn call(
        &mut self,
        contract: H160,
        method: &str,
        args: serde_json::Value,
    ) -> Result<serde_json::Value, ChainError>;
    fn send_tx(
        &mut self,
        contract: H160,
        method: &str,
        args: serde_json::Value,
        signer: &Account,
    ) -> Result<H256, ChainError>;
    fn tx_block_height(&mut self, tx_hash: &H256) -> Result<Option<u64>, ChainError>;

    /// Same confirmation rule as the anchor side: included and no
    /// longer at the tip, within an explicit deadline.
    fn confirm(
        &mut self,
        tx_hash: &H256,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<(), ChainError> {
        let start = Instant::now();
        loop {
            if let Some(included_at) = self.tx_block_height(tx_hash)? {
                if self.current_height()? > included_at {
                    return Ok(());
                }
            }
            if start.elapsed() >= timeout {
                return Err(ChainError::ConfirmationTimeout {
                    tx_hash: *tx_hash,
                    timeout,
                });
            }
            thread::sleep(poll_interval);
        }
    }
}
