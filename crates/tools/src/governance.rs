use anyhow::{ensure, Context, Result};
use primitive_types::{H160, H256};
use serde_json::json;
use xr_config::ConfirmConfig;
use xr_crypto::Account;
use xr_rpc_client::AnchorChain;

use crate::side_chain::SideChain;

/// Drives the side-chain register/approve/update/quit state machine
/// on the anchor chain's management contract.
///
/// Owner-authority operations are signed by the first quorum account;
/// approvals fan out over the whole quorum, strictly in account-list
/// order, one confirmed transaction at a time. The engine keeps no
/// local state: the anchor chain is the source of truth, and
/// idempotent-conflict rejections on re-runs count as success.
pub struct GovernanceEngine<'a, A: AnchorChain> {
    anchor: &'a mut A,
    quorum: &'a [Account],
    confirm: ConfirmConfig,
}

impl<'a, A: AnchorChain> GovernanceEngine<'a, A> {
    pub fn new(anchor: &'a mut A, quorum: &'a [Account], confirm: ConfirmConfig) -> Self {
        GovernanceEngine {
            anchor,
            quorum,
            confirm,
        }
    }

    /// The side-chain owner account: first entry of the quorum list
    /// by convention.
    fn owner(&self) -> Result<&'a Account> {
        self.quorum
            .first()
            .context("quorum account list is empty")
    }

    pub fn register(
        &mut self,
        chain_id: u64,
        router: u64,
        name: &str,
        relay_contract: H160,
    ) -> Result<()> {
        let args = json!({
            "chain_id": chain_id,
            "router": router,
            "name": name,
            "relay_contract": relay_contract,
        });
        self.owner_op("register_side_chain", args)
            .with_context(|| format!("register side chain {}", chain_id))
    }

    pub fn update(
        &mut self,
        chain_id: u64,
        router: u64,
        name: &str,
        relay_contract: H160,
    ) -> Result<()> {
        let args = json!({
            "chain_id": chain_id,
            "router": router,
            "name": name,
            "relay_contract": relay_contract,
        });
        self.owner_op("update_side_chain", args)
            .with_context(|| format!("update side chain {}", chain_id))
    }

    pub fn quit(&mut self, chain_id: u64) -> Result<()> {
        self.owner_op("quit_side_chain", json!({ "chain_id": chain_id }))
            .with_context(|| format!("quit side chain {}", chain_id))
    }

    pub fn approve_register(&mut self, chain_id: u64) -> Result<Option<H256>> {
        self.quorum_approve("approve_register_side_chain", chain_id)
    }

    pub fn approve_update(&mut self, chain_id: u64) -> Result<Option<H256>> {
        self.quorum_approve("approve_update_side_chain", chain_id)
    }

    pub fn approve_quit(&mut self, chain_id: u64) -> Result<Option<H256>> {
        self.quorum_approve("approve_quit_side_chain", chain_id)
    }

    /// Current registration record on the anchor chain, if any.
    pub fn side_chain(&mut self, chain_id: u64) -> Result<Option<SideChain>> {
        let value = self
            .anchor
            .native_call("get_side_chain", json!({ "chain_id": chain_id }))
            .with_context(|| format!("query side chain {}", chain_id))?;
        if value.is_null() {
            return Ok(None);
        }
        let side_chain = serde_json::from_value(value)
            .with_context(|| format!("decode side chain {} record", chain_id))?;
        Ok(Some(side_chain))
    }

    fn owner_op(&mut self, method: &str, args: serde_json::Value) -> Result<()> {
        let owner = self.owner()?;
        match self.anchor.send_native_tx(method, args, owner) {
            Ok(tx_hash) => {
                log::info!("Sent {} tx {:#x}", method, tx_hash);
                self.anchor.wait_confirmed(
                    &tx_hash,
                    self.confirm.timeout(),
                    self.confirm.poll_interval(),
                )?;
                Ok(())
            }
            Err(err) if err.is_idempotent_conflict() => {
                log::info!("{}: {}, continuing", method, err);
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// One approval transaction per quorum member, submitted and
    /// awaited sequentially in account-list order. A member's hard
    /// failure aborts the remaining members; the operator re-runs the
    /// whole operation, which is safe. Returns the last submitted
    /// member's transaction hash, or `None` when every member's
    /// approval already held.
    fn quorum_approve(&mut self, method: &str, chain_id: u64) -> Result<Option<H256>> {
        ensure!(!self.quorum.is_empty(), "quorum account list is empty");
        let args = json!({ "chain_id": chain_id });
        let mut last_hash = None;
        for (index, account) in self.quorum.iter().enumerate() {
            match self.anchor.send_native_tx(method, args.clone(), account) {
                Ok(tx_hash) => {
                    log::info!(
                        "Sent {} tx {:#x} (member {}, {:#x})",
                        method,
                        tx_hash,
                        index,
                        account.address()
                    );
                    // Overlapping submissions from one logical
                    // operation would race on nonces and on the
                    // contract's incremental quorum count.
                    self.anchor
                        .wait_included(
                            &tx_hash,
                            self.confirm.timeout(),
                            self.confirm.poll_interval(),
                        )
                        .with_context(|| format!("{} member {}", method, index))?;
                    last_hash = Some(tx_hash);
                }
                Err(err) if err.is_idempotent_conflict() => {
                    log::info!("{} member {}: {}, continuing", method, index, err);
                }
                Err(err) => {
                    return Err(err).with_context(|| format!("{} member {}", method, index));
                }
            }
        }
        if let Some(tx_hash) = last_hash {
            self.anchor.wait_confirmed(
                &tx_hash,
                self.confirm.timeout(),
                self.confirm.poll_interval(),
            )?;
        }
        Ok(last_hash)
    }
}
