use anyhow::{Context, Result};
use primitive_types::H160;
use serde_json::json;
use xr_config::ConfirmConfig;
use xr_crypto::{encode_bookkeepers, extract_bookkeepers, Account};
use xr_rpc_client::{AnchorChain, SourceChain};

/// Two-phase genesis bootstrap between one side chain and the anchor
/// chain.
///
/// Phase 1 pushes the side chain's current header to the anchor
/// chain; phase 2 pushes the anchor chain's epoch block header plus
/// its canonical committee encoding back into the side chain's relay
/// contract. Phase 2 is gated on phase 1 being confirmed: the side
/// chain's header submission is validated against anchor state that
/// phase 1 creates. Re-running the whole protocol is safe, both
/// entry points answer an idempotent conflict once initialized.
pub struct GenesisRelay<'a, S: SourceChain, A: AnchorChain> {
    side: &'a mut S,
    anchor: &'a mut A,
    quorum: &'a [Account],
    confirm: ConfirmConfig,
}

impl<'a, S: SourceChain, A: AnchorChain> GenesisRelay<'a, S, A> {
    pub fn new(
        side: &'a mut S,
        anchor: &'a mut A,
        quorum: &'a [Account],
        confirm: ConfirmConfig,
    ) -> Self {
        GenesisRelay {
            side,
            anchor,
            quorum,
            confirm,
        }
    }

    pub fn run(&mut self, chain_id: u64, relay_contract: H160, epoch_height: u32) -> Result<()> {
        self.push_side_header(chain_id)
            .context("phase 1: sync side chain genesis header")?;
        self.push_anchor_genesis(relay_contract, epoch_height)
            .context("phase 2: init side chain genesis block")?;
        Ok(())
    }

    fn owner(&self) -> Result<&'a Account> {
        self.quorum
            .first()
            .context("quorum account list is empty")
    }

    /// Phase 1: read the side chain's tip header and register it as
    /// the chain's genesis state on the anchor chain.
    fn push_side_header(&mut self, chain_id: u64) -> Result<()> {
        let owner = self.owner()?;
        let height = self.side.current_height()?;
        let (header, hash) = self.side.header_at(height)?;
        log::info!(
            "side chain tip: height {}, header hash {:#x} ({} bytes)",
            height,
            hash,
            header.len()
        );

        let args = json!({
            "chain_id": chain_id,
            "header": format!("0x{}", hex::encode(&header)),
        });
        match self.anchor.send_native_tx("sync_genesis_header", args, owner) {
            Ok(tx_hash) => {
                log::info!("Sent sync_genesis_header tx {:#x}", tx_hash);
                // Hard ordering gate: phase 2 must observe this
                // committed.
                self.anchor.wait_confirmed(
                    &tx_hash,
                    self.confirm.timeout(),
                    self.confirm.poll_interval(),
                )?;
                Ok(())
            }
            Err(err) if err.is_idempotent_conflict() => {
                log::info!("sync_genesis_header: {}, continuing", err);
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Phase 2: take the anchor chain's epoch block, derive the
    /// canonical committee encoding, and seed the side chain's relay
    /// contract with both.
    fn push_anchor_genesis(&mut self, relay_contract: H160, epoch_height: u32) -> Result<()> {
        let owner = self.owner()?;
        let block = self.anchor.block_at(epoch_height)?;
        let bookkeepers = extract_bookkeepers(&block.consensus_payload)
            .with_context(|| format!("anchor block {} consensus payload", epoch_height))?;
        let blob = encode_bookkeepers(&bookkeepers);
        log::info!(
            "anchor block {}: {} bookkeepers, {} byte committee blob",
            epoch_height,
            bookkeepers.len(),
            blob.len()
        );

        let args = json!({
            "header": format!("0x{}", hex::encode(&block.header)),
            "bookkeepers": format!("0x{}", hex::encode(&blob)),
        });
        match self
            .side
            .send_tx(relay_contract, "init_genesis_block", args, owner)
        {
            Ok(tx_hash) => {
                log::info!("Sent init_genesis_block tx {:#x}", tx_hash);
                self.side.confirm(
                    &tx_hash,
                    self.confirm.timeout(),
                    self.confirm.poll_interval(),
                )?;
                Ok(())
            }
            Err(err) if err.is_idempotent_conflict() => {
                log::info!("init_genesis_block: {}, continuing", err);
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}
