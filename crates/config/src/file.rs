use crate::{ChainContracts, ChainContractsBuilder, ConfigError};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

const DEFAULT_POLL_INTERVAL_SECS: u64 = 12;

/// Top-level configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// L1 RPC endpoint url
    pub l1_rpc_url: String,

    /// L2 RPC endpoint url
    pub l2_rpc_url: String,

    /// L2 chain id, selects the contract preset
    pub l2_chain_id: u64,

    /// Seconds between output polls
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Portal version override (e.g. "3.10.0"), skips the on-chain version read
    #[serde(default)]
    pub portal_version: Option<String>,

    /// Contract address overrides
    #[serde(default)]
    pub contracts: ContractOverrides,
}

/// Optional per-contract address overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractOverrides {
    pub portal: Option<Address>,
    pub l2_output_oracle: Option<Address>,
    pub dispute_game_factory: Option<Address>,
}

const fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        if config.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_secs must be > 0".to_string(),
            ));
        }

        Ok(config)
    }

    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Chain contracts: the preset for `l2_chain_id` with overrides applied.
    ///
    /// A chain without a preset needs at least a portal override.
    pub fn chain_contracts(&self) -> Result<ChainContracts, ConfigError> {
        let mut builder = match (
            ChainContracts::from_chain_id(self.l2_chain_id),
            self.contracts.portal,
        ) {
            (Some(preset), _) => ChainContractsBuilder::from_preset(preset),
            (None, Some(portal)) => ChainContractsBuilder::new(self.l2_chain_id, portal),
            (None, None) => return Err(ConfigError::UnknownChain(self.l2_chain_id)),
        };

        if let Some(portal) = self.contracts.portal {
            builder = builder.portal(portal);
        }
        if let Some(oracle) = self.contracts.l2_output_oracle {
            builder = builder.l2_output_oracle(oracle);
        }
        if let Some(factory) = self.contracts.dispute_game_factory {
            builder = builder.dispute_game_factory(factory);
        }

        Ok(builder.build())
    }
}
