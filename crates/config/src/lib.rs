//! Configuration types for withdrawal status resolution.
//!
//! This crate provides:
//! - L1 contract addresses for supported L2 chains
//! - Contract address resolution by chain id
//! - Configuration file loading and validation

pub mod file;
pub mod network;

pub use file::{Config, ContractOverrides};
pub use network::{resolve_contract_address, ChainContracts, ChainContractsBuilder, ContractName};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// No contract preset exists for the chain
    #[error("Unknown L2 chain id: {0}")]
    UnknownChain(u64),

    /// The chain has no such contract configured
    #[error("Contract {name} not configured for chain {chain_id}")]
    MissingContract { chain_id: u64, name: ContractName },

    /// Error reading the config file
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing the config file
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config parsed but failed validation
    #[error("Invalid config: {0}")]
    Invalid(String),
}
