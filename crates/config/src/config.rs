use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use primitive_types::H160;
use serde::{Deserialize, Serialize};

/// Explicit per-environment configuration. Every component takes the
/// piece of this it needs; there is no ambient global client or
/// account state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub side_chain: SideChainConfig,
    pub anchor: AnchorConfig,
    pub quorum: QuorumConfig,
    #[serde(default)]
    pub confirm: ConfirmConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideChainConfig {
    pub rpc_url: String,
    /// Registered chain ID on the anchor chain.
    pub chain_id: u64,
    /// The side chain's light-client/data relay contract.
    pub relay_contract: H160,
    pub router: u64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorConfig {
    pub rpc_url: String,
    /// Height whose block carries the committee configuration. Only
    /// needs to move off 0 after a validator rotation.
    #[serde(default)]
    pub epoch_height: u32,
}

/// Ordered quorum account list. The first entry is the side-chain
/// owner by convention; approval transactions are submitted in list
/// order and never reordered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumConfig {
    pub privkey_paths: Vec<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmConfig {
    pub timeout_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for ConfirmConfig {
    fn default() -> Self {
        ConfirmConfig {
            timeout_secs: 300,
            poll_interval_ms: 500,
        }
    }
}

impl ConfirmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("parse config file {}", path.display()))?;
        Ok(config)
    }
}
