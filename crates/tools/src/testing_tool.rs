//! In-process chain backends for driving the governance and relay
//! flows in tests.

use std::collections::HashMap;

use primitive_types::{H160, H256};
use serde_json::{json, Value};
use xr_config::ConfirmConfig;
use xr_crypto::Account;
use xr_rpc_client::{AnchorBlock, AnchorChain, ChainError, SourceChain};

use crate::side_chain::{SideChain, SideChainState};

pub fn test_accounts(count: usize) -> Vec<Account> {
    (1..=count as u64)
        .map(|i| Account::from_privkey(H256::from_low_u64_be(i)).expect("test account"))
        .collect()
}

pub fn test_confirm() -> ConfirmConfig {
    ConfirmConfig {
        timeout_secs: 5,
        poll_interval_ms: 1,
    }
}

/// Deadline that expires on the first poll, for timeout paths.
pub fn stalled_confirm() -> ConfirmConfig {
    ConfirmConfig {
        timeout_secs: 0,
        poll_interval_ms: 1,
    }
}

fn rejected(message: &str) -> ChainError {
    ChainError::Rejected {
        code: -1,
        message: message.to_string(),
    }
}

/// Anchor chain with the management contract's state machine.
pub struct MockAnchor {
    pub height: u32,
    pub registry: HashMap<u64, SideChain>,
    /// Accepted approvals per method, in submission order.
    pub approvals: HashMap<String, Vec<H160>>,
    /// Every sender that attempted a transaction, accepted or not.
    pub attempts: Vec<H160>,
    pub genesis_headers: HashMap<u64, Vec<u8>>,
    pub blocks: HashMap<u32, AnchorBlock>,
    /// Hard-fail submissions from this sender.
    pub fail_for: Option<H160>,
    /// Accept submissions but never include them in a block.
    pub stall: bool,
    approval_threshold: usize,
    txs: HashMap<H256, u32>,
    next_hash: u64,
}

impl MockAnchor {
    pub fn new(approval_threshold: usize) -> Self {
        MockAnchor {
            height: 1,
            registry: HashMap::new(),
            approvals: HashMap::new(),
            attempts: Vec::new(),
            genesis_headers: HashMap::new(),
            blocks: HashMap::new(),
            fail_for: None,
            stall: false,
            approval_threshold,
            txs: HashMap::new(),
            next_hash: 0,
        }
    }

    /// Install a committee at block 0. Entries are
    /// `(tag, label, point_len)`; a zero tag produces a bare P-256
    /// point.
    pub fn with_committee(mut self, entries: &[(u8, u8, usize)]) -> Self {
        let peers: Vec<Value> = entries
            .iter()
            .enumerate()
            .map(|(i, (tag, label, point_len))| {
                let mut point = vec![(i + 1) as u8; *point_len];
                point[0] = 0x04;
                let mut bytes = Vec::new();
                if *tag != 0 {
                    bytes.push(*tag);
                    bytes.push(*label);
                }
                bytes.extend_from_slice(&point);
                json!({ "index": i as u32 + 1, "id": hex::encode(bytes) })
            })
            .collect();
        let payload = serde_json::to_vec(&json!({ "peers": peers })).expect("payload json");
        self.blocks.insert(
            0,
            AnchorBlock {
                header: b"anchor-epoch-header".to_vec(),
                consensus_payload: payload,
            },
        );
        self
    }

    fn allocate_tx(&mut self) -> H256 {
        self.next_hash += 1;
        let tx_hash = H256::from_low_u64_be(self.next_hash);
        if !self.stall {
            self.txs.insert(tx_hash, self.height);
            self.height += 1;
        }
        tx_hash
    }

    fn apply(&mut self, method: &str, args: &Value, sender: H160) -> Result<(), ChainError> {
        let chain_id = args["chain_id"].as_u64().ok_or_else(|| rejected("bad args"))?;
        match method {
            "register_side_chain" => match self.registry.get(&chain_id).map(|r| r.state) {
                None => {
                    self.registry.insert(
                        chain_id,
                        SideChain {
                            chain_id,
                            router: args["router"].as_u64().unwrap_or_default(),
                            name: args["name"].as_str().unwrap_or_default().to_string(),
                            relay_contract: serde_json::from_value(args["relay_contract"].clone())
                                .map_err(|_| rejected("bad relay contract"))?,
                            state: SideChainState::Requested,
                        },
                    );
                    Ok(())
                }
                Some(SideChainState::Requested) => Err(ChainError::AlreadyRequested),
                Some(SideChainState::Active) => Err(ChainError::AlreadyRegistered),
                Some(_) => Err(rejected("side chain is quitting")),
            },
            "update_side_chain" => {
                let record = self
                    .registry
                    .get_mut(&chain_id)
                    .ok_or_else(|| rejected("unknown side chain"))?;
                if record.state != SideChainState::Active {
                    return Err(rejected("side chain is not active"));
                }
                record.router = args["router"].as_u64().unwrap_or_default();
                record.name = args["name"].as_str().unwrap_or_default().to_string();
                record.relay_contract = serde_json::from_value(args["relay_contract"].clone())
                    .map_err(|_| rejected("bad relay contract"))?;
                Ok(())
            }
            "quit_side_chain" => {
                let record = self
                    .registry
                    .get_mut(&chain_id)
                    .ok_or_else(|| rejected("unknown side chain"))?;
                if record.state != SideChainState::Active {
                    return Err(rejected("side chain is not active"));
                }
                record.state = SideChainState::QuitRequested;
                Ok(())
            }
            "approve_register_side_chain"
            | "approve_update_side_chain"
            | "approve_quit_side_chain" => {
                if !self.registry.contains_key(&chain_id) {
                    return Err(rejected("unknown side chain"));
                }
                let approvals = self.approvals.entry(method.to_string()).or_default();
                approvals.push(sender);
                if approvals.len() >= self.approval_threshold {
                    let record = self.registry.get_mut(&chain_id).expect("checked above");
                    match method {
                        "approve_register_side_chain" => record.state = SideChainState::Active,
                        "approve_quit_side_chain" => record.state = SideChainState::Quit,
                        _ => {}
                    }
                }
                Ok(())
            }
            "sync_genesis_header" => {
                if self.genesis_headers.contains_key(&chain_id) {
                    return Err(ChainError::AlreadyInitialized);
                }
                let header_hex = args["header"].as_str().ok_or_else(|| rejected("bad args"))?;
                let header = hex::decode(header_hex.trim_start_matches("0x"))
                    .map_err(|_| rejected("bad header hex"))?;
                self.genesis_headers.insert(chain_id, header);
                Ok(())
            }
            other => Err(rejected(&format!("unknown native method {}", other))),
        }
    }
}

impl AnchorChain for MockAnchor {
    fn current_height(&mut self) -> Result<u32, ChainError> {
        Ok(self.height)
    }

    fn block_at(&mut self, height: u32) -> Result<AnchorBlock, ChainError> {
        self.blocks
            .get(&height)
            .cloned()
            .ok_or_else(|| rejected("no such block"))
    }

    fn send_native_tx(
        &mut self,
        method: &str,
        args: Value,
        signer: &Account,
    ) -> Result<H256, ChainError> {
        let sender = signer.address();
        self.attempts.push(sender);
        if self.fail_for == Some(sender) {
            return Err(rejected("injected member failure"));
        }
        if self.stall {
            // Accepted into the mempool, never mined.
            self.next_hash += 1;
            return Ok(H256::from_low_u64_be(self.next_hash));
        }
        self.apply(method, &args, sender)?;
        Ok(self.allocate_tx())
    }

    fn native_call(&mut self, method: &str, args: Value) -> Result<Value, ChainError> {
        match method {
            "get_side_chain" => {
                let chain_id = args["chain_id"].as_u64().ok_or_else(|| rejected("bad args"))?;
                match self.registry.get(&chain_id) {
                    Some(record) => {
                        serde_json::to_value(record).map_err(|_| rejected("encode record"))
                    }
                    None => Ok(Value::Null),
                }
            }
            other => Err(rejected(&format!("unknown native method {}", other))),
        }
    }

    fn tx_block_height(&mut self, tx_hash: &H256) -> Result<Option<u32>, ChainError> {
        Ok(self.txs.get(tx_hash).copied())
    }
}

/// Side chain holding a relay contract.
pub struct MockSource {
    pub tip: u64,
    /// `(contract, method)` per accepted submission.
    pub sent: Vec<(H160, String)>,
    pub init_genesis: Option<(Vec<u8>, Vec<u8>)>,
    txs: HashMap<H256, u64>,
    next_hash: u64,
}

impl MockSource {
    pub fn new(tip: u64) -> Self {
        MockSource {
            tip,
            sent: Vec::new(),
            init_genesis: None,
            txs: HashMap::new(),
            next_hash: 0,
        }
    }

    pub fn header_bytes_at(&self, height: u64) -> Vec<u8> {
        serde_json::to_vec(&json!({ "height": height })).expect("header json")
    }
}

impl SourceChain for MockSource {
    fn current_height(&mut self) -> Result<u64, ChainError> {
        Ok(self.tip)
    }

    fn header_at(&mut self, height: u64) -> Result<(Vec<u8>, H256), ChainError> {
        Ok((
            self.header_bytes_at(height),
            H256::from_low_u64_be(0x1000 + height),
        ))
    }

    fn call(&mut self, _contract: H160, _method: &str, _args: Value) -> Result<Value, ChainError> {
        Ok(Value::Null)
    }

    fn send_tx(
        &mut self,
        contract: H160,
        method: &str,
        args: Value,
        _signer: &Account,
    ) -> Result<H256, ChainError> {
        self.sent.push((contract, method.to_string()));
        match method {
            "init_genesis_block" => {
                if self.init_genesis.is_some() {
                    return Err(ChainError::AlreadyInitialized);
                }
                let decode = |key: &str| -> Result<Vec<u8>, ChainError> {
                    let value = args[key].as_str().ok_or_else(|| rejected("bad args"))?;
                    hex::decode(value.trim_start_matches("0x"))
                        .map_err(|_| rejected("bad hex arg"))
                };
                self.init_genesis = Some((decode("header")?, decode("bookkeepers")?));
            }
            other => return Err(rejected(&format!("unknown contract method {}", other))),
        }
        self.next_hash += 1;
        let tx_hash = H256::from_low_u64_be(0x9000 + self.next_hash);
        self.txs.insert(tx_hash, self.tip);
        self.tip += 1;
        Ok(tx_hash)
    }

    fn tx_block_height(&mut self, tx_hash: &H256) -> Result<Option<u64>, ChainError> {
        Ok(self.txs.get(tx_hash).copied())
    }
}
