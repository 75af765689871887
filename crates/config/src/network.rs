//! Per-chain contract registry.
//!
//! Provides the L1 contract addresses that govern withdrawals from each
//! supported L2 chain, keyed by the L2 chain id.

use crate::ConfigError;
use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};
use std::fmt;

/// L1 contracts involved in proving and finalizing withdrawals from one L2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainContracts {
    /// L2 chain id these contracts serve
    pub l2_chain_id: u64,
    /// OptimismPortal proxy on L1
    pub portal: Address,
    /// L2OutputOracle proxy (legacy output proposals)
    pub l2_output_oracle: Option<Address>,
    /// DisputeGameFactory proxy (fault proof output proposals)
    pub dispute_game_factory: Option<Address>,
}

/// Contracts that can be resolved by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractName {
    Portal,
    L2OutputOracle,
    DisputeGameFactory,
}

impl fmt::Display for ContractName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Portal => "portal",
            Self::L2OutputOracle => "l2OutputOracle",
            Self::DisputeGameFactory => "disputeGameFactory",
        };
        f.write_str(name)
    }
}

impl ChainContracts {
    /// OP Mainnet contracts on Ethereum mainnet.
    pub const fn optimism() -> Self {
        Self {
            l2_chain_id: 10,
            portal: address!("0xbEb5Fc579115071764c7423A4f12eDde41f106Ed"),
            l2_output_oracle: Some(address!("0xdfe97868233d1aa22e815a266982f2cf17685a27")),
            dispute_game_factory: Some(address!("0xe5965Ab5962eDc7477C8520243A95517CD252fA9")),
        }
    }

    /// Base mainnet contracts on Ethereum mainnet.
    pub const fn base() -> Self {
        Self {
            l2_chain_id: 8453,
            portal: address!("0x49048044D57e1C92A77f79988d21Fa8fAF74E97e"),
            l2_output_oracle: Some(address!("0x56315b90c40730925ec5485cf004d835058518A0")),
            dispute_game_factory: Some(address!("0x43edB88C4B80fDD2AdFF2412A7BebF9dF42cB40e")),
        }
    }

    /// Unichain Sepolia contracts on Ethereum Sepolia.
    pub const fn unichain_sepolia() -> Self {
        Self {
            l2_chain_id: 1301,
            portal: address!("0x0d83dab629f0e0F9d36c0Cbc89B69a489f0751bD"),
            l2_output_oracle: None,
            dispute_game_factory: Some(address!("0xeff73e5aa3B9AEC32c659Aa3E00444d20a84394b")),
        }
    }

    /// Look up the preset for an L2 chain id.
    pub const fn from_chain_id(l2_chain_id: u64) -> Option<Self> {
        match l2_chain_id {
            10 => Some(Self::optimism()),
            8453 => Some(Self::base()),
            1301 => Some(Self::unichain_sepolia()),
            _ => None,
        }
    }

    /// Address of the named contract, if this chain has one.
    pub fn address(&self, name: ContractName) -> Result<Address, ConfigError> {
        let address = match name {
            ContractName::Portal => Some(self.portal),
            ContractName::L2OutputOracle => self.l2_output_oracle,
            ContractName::DisputeGameFactory => self.dispute_game_factory,
        };

        address.ok_or(ConfigError::MissingContract {
            chain_id: self.l2_chain_id,
            name,
        })
    }
}

/// Resolve a contract address for an L2 chain from the built-in presets.
pub fn resolve_contract_address(
    l2_chain_id: u64,
    name: ContractName,
) -> Result<Address, ConfigError> {
    ChainContracts::from_chain_id(l2_chain_id)
        .ok_or(ConfigError::UnknownChain(l2_chain_id))?
        .address(name)
}

/// Builder for custom chain contracts.
#[derive(Debug, Clone)]
pub struct ChainContractsBuilder {
    contracts: ChainContracts,
}

impl ChainContractsBuilder {
    /// Start from a preset.
    pub const fn from_preset(contracts: ChainContracts) -> Self {
        Self { contracts }
    }

    /// Start from scratch with only a portal address.
    pub const fn new(l2_chain_id: u64, portal: Address) -> Self {
        Self {
            contracts: ChainContracts {
                l2_chain_id,
                portal,
                l2_output_oracle: None,
                dispute_game_factory: None,
            },
        }
    }

    /// Override the portal address.
    pub const fn portal(mut self, address: Address) -> Self {
        self.contracts.portal = address;
        self
    }

    /// Override the L2OutputOracle address.
    pub const fn l2_output_oracle(mut self, address: Address) -> Self {
        self.contracts.l2_output_oracle = Some(address);
        self
    }

    /// Override the DisputeGameFactory address.
    pub const fn dispute_game_factory(mut self, address: Address) -> Self {
        self.contracts.dispute_game_factory = Some(address);
        self
    }

    /// Build the chain contracts.
    pub const fn build(self) -> ChainContracts {
        self.contracts
    }
}
