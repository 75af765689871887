use crate::error::Error;
use alloy_primitives::{Address, Bytes, B256, U256};
use binding::opstack::WithdrawalTransaction;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type WithdrawalHash = B256;

/// A withdrawal message initiated on L2, as emitted by `MessagePassed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Withdrawal {
    pub nonce: U256,
    pub sender: Address,
    pub target: Address,
    pub value: U256,
    pub gas_limit: U256,
    pub data: Bytes,
    pub withdrawal_hash: WithdrawalHash,
}

impl Withdrawal {
    /// The ABI struct accepted by the portal.
    pub fn transaction(&self) -> WithdrawalTransaction {
        WithdrawalTransaction {
            nonce: self.nonce,
            sender: self.sender,
            target: self.target,
            value: self.value,
            gasLimit: self.gas_limit,
            data: self.data.clone(),
        }
    }
}

/// Where a withdrawal stands relative to the prove and finalize steps on L1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WithdrawalStatus {
    WaitingToProve,
    ReadyToProve,
    WaitingToFinalize,
    ReadyToFinalize,
    Finalized,
}

impl WithdrawalStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WaitingToProve => "waiting-to-prove",
            Self::ReadyToProve => "ready-to-prove",
            Self::WaitingToFinalize => "waiting-to-finalize",
            Self::ReadyToFinalize => "ready-to-finalize",
            Self::Finalized => "finalized",
        }
    }
}

impl fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semver of a portal contract. Only `major` selects behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProtocolVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

/// Which proof system a portal version belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolPath {
    /// Output proposals come from the L2OutputOracle.
    Legacy,
    /// Output proposals come from dispute games.
    FaultProof,
}

impl ProtocolVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a semver string such as `3.10.0` or `2.8.1-beta.1`.
    ///
    /// Pre-release and build suffixes are ignored.
    pub fn parse(version: &str) -> Result<Self, Error> {
        let invalid = || Error::Decode(format!("invalid contract version: {version:?}"));

        let core = version
            .trim()
            .trim_start_matches('v')
            .split(['-', '+'])
            .next()
            .unwrap_or_default();

        let mut parts = core.split('.').map(|part| part.parse::<u64>());
        let (Some(Ok(major)), Some(Ok(minor)), Some(Ok(patch)), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        Ok(Self::new(major, minor, patch))
    }

    pub const fn path(&self) -> ProtocolPath {
        if self.major >= 3 {
            ProtocolPath::FaultProof
        } else {
            ProtocolPath::Legacy
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Proven record from the legacy portal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyProvenWithdrawal {
    pub output_root: B256,
    pub timestamp: u64,
    pub l2_output_index: U256,
}

/// Proven record from the fault proof portal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvenWithdrawal {
    pub dispute_game_proxy: Address,
    pub timestamp: u64,
}

/// A commitment to L2 state as of `l2_block_number`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputProposal {
    pub l2_block_number: u64,
    pub output_root: B256,
    pub timestamp: u64,
    pub source: OutputSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum OutputSource {
    /// Output stored in the L2OutputOracle at `index`.
    Oracle { index: U256 },
    /// Root claim of a dispute game.
    DisputeGame {
        index: U256,
        game_type: u32,
        proxy: Address,
    },
}

/// A dispute game as returned by `DisputeGameFactory.findLatestGames`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub index: U256,
    pub metadata: B256,
    pub timestamp: u64,
    pub root_claim: B256,
    pub extra_data: Bytes,
}

impl GameRecord {
    /// Game proxy address.
    ///
    /// GameId format: type (32 bits) | timestamp (64 bits) | proxy address (160 bits)
    pub fn proxy(&self) -> Address {
        Address::from_slice(&self.metadata.as_slice()[12..32])
    }

    /// L2 block number the root claim commits to, the first word of `extraData`.
    pub fn l2_block_number(&self) -> Result<u64, Error> {
        let word = self.extra_data.get(..32).ok_or_else(|| {
            Error::Decode(format!(
                "game {} extraData is {} bytes, expected at least 32",
                self.index,
                self.extra_data.len()
            ))
        })?;

        u64::try_from(U256::from_be_slice(word)).map_err(|_| {
            Error::Decode(format!("game {} l2 block number overflows u64", self.index))
        })
    }

    pub fn into_proposal(self, game_type: u32, l2_block_number: u64) -> OutputProposal {
        OutputProposal {
            l2_block_number,
            output_root: self.root_claim,
            timestamp: self.timestamp,
            source: OutputSource::DisputeGame {
                index: self.index,
                game_type,
                proxy: self.proxy(),
            },
        }
    }
}
