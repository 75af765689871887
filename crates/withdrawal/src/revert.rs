//! Known revert reasons and the statuses they imply.
//!
//! The portal and output oracle signal several withdrawal states by reverting
//! with a fixed `Error(string)` message. Those messages are kept here as data so
//! the mapping can be audited and tested on its own. Any message not in
//! [`KNOWN_REVERTS`] decodes to [`RevertReason::Unknown`] and is never mapped to a
//! status.

use crate::types::WithdrawalStatus;
use alloy_primitives::hex;
use alloy_sol_types::{decode_revert_reason, Revert, SolError};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownRevert {
    OutputNotProposed,
    InvalidGameType,
    NotProven,
    NotProvenBySubmitter,
    GameBeforeRespectedTypeUpdate,
    WithdrawalBeforeGameCreation,
    GameBlacklisted,
    ProofNotMatured,
    OutputNotFinalized,
    OutputInAirGap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevertEntry {
    pub reason: KnownRevert,
    pub message: &'static str,
    pub status: WithdrawalStatus,
}

/// Every known revert, indexed by `KnownRevert` discriminant.
pub const KNOWN_REVERTS: [RevertEntry; 10] = [
    RevertEntry {
        reason: KnownRevert::OutputNotProposed,
        message: "L2OutputOracle: cannot get output for a block that has not been proposed",
        status: WithdrawalStatus::WaitingToProve,
    },
    RevertEntry {
        reason: KnownRevert::InvalidGameType,
        message: "OptimismPortal: invalid game type",
        status: WithdrawalStatus::ReadyToProve,
    },
    RevertEntry {
        reason: KnownRevert::NotProven,
        message: "OptimismPortal: withdrawal has not been proven yet",
        status: WithdrawalStatus::ReadyToProve,
    },
    RevertEntry {
        reason: KnownRevert::NotProvenBySubmitter,
        message: "OptimismPortal: withdrawal has not been proven by proof submitter address yet",
        status: WithdrawalStatus::ReadyToProve,
    },
    RevertEntry {
        reason: KnownRevert::GameBeforeRespectedTypeUpdate,
        message: "OptimismPortal: dispute game created before respected game type was updated",
        status: WithdrawalStatus::ReadyToProve,
    },
    RevertEntry {
        reason: KnownRevert::WithdrawalBeforeGameCreation,
        message: "OptimismPortal: withdrawal timestamp less than dispute game creation timestamp",
        status: WithdrawalStatus::ReadyToProve,
    },
    RevertEntry {
        reason: KnownRevert::GameBlacklisted,
        message: "OptimismPortal: dispute game has been blacklisted",
        status: WithdrawalStatus::ReadyToProve,
    },
    RevertEntry {
        reason: KnownRevert::ProofNotMatured,
        message: "OptimismPortal: proven withdrawal has not matured yet",
        status: WithdrawalStatus::WaitingToFinalize,
    },
    RevertEntry {
        reason: KnownRevert::OutputNotFinalized,
        message: "OptimismPortal: output proposal has not been finalized yet",
        status: WithdrawalStatus::WaitingToFinalize,
    },
    RevertEntry {
        reason: KnownRevert::OutputInAirGap,
        message: "OptimismPortal: output proposal in air-gap",
        status: WithdrawalStatus::WaitingToFinalize,
    },
];

/// Reverts of `checkWithdrawal` that describe the withdrawal rather than a fault.
pub const FINALIZE_CHECK_ALLOW_LIST: [KnownRevert; 9] = [
    KnownRevert::InvalidGameType,
    KnownRevert::NotProven,
    KnownRevert::NotProvenBySubmitter,
    KnownRevert::GameBeforeRespectedTypeUpdate,
    KnownRevert::WithdrawalBeforeGameCreation,
    KnownRevert::GameBlacklisted,
    KnownRevert::ProofNotMatured,
    KnownRevert::OutputNotFinalized,
    KnownRevert::OutputInAirGap,
];

impl KnownRevert {
    const fn entry(self) -> RevertEntry {
        KNOWN_REVERTS[self as usize]
    }

    pub const fn message(self) -> &'static str {
        self.entry().message
    }

    pub const fn status(self) -> WithdrawalStatus {
        self.entry().status
    }

    pub fn from_message(message: &str) -> Option<Self> {
        KNOWN_REVERTS
            .iter()
            .find(|entry| entry.message == message)
            .map(|entry| entry.reason)
    }

    pub fn is_finalize_check_allowed(self) -> bool {
        FINALIZE_CHECK_ALLOW_LIST.contains(&self)
    }
}

/// Decoded revert reason of a contract read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevertReason {
    Known(KnownRevert),
    Unknown(String),
}

impl RevertReason {
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        KnownRevert::from_message(&message).map_or(Self::Unknown(message), Self::Known)
    }

    /// Decode raw revert data.
    ///
    /// `Error(string)` payloads yield their message; anything else (custom errors,
    /// panics, raw bytes) is kept in readable form and is never a known reason.
    pub fn from_revert_data(data: &[u8]) -> Self {
        if let Ok(revert) = Revert::abi_decode(data) {
            return Self::from_message(revert.reason);
        }

        let message = decode_revert_reason(data).unwrap_or_else(|| hex::encode_prefixed(data));
        Self::Unknown(message)
    }

    pub const fn known(&self) -> Option<KnownRevert> {
        match self {
            Self::Known(reason) => Some(*reason),
            Self::Unknown(_) => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Known(reason) => reason.message(),
            Self::Unknown(message) => message,
        }
    }
}

impl From<KnownRevert> for RevertReason {
    fn from(reason: KnownRevert) -> Self {
        Self::Known(reason)
    }
}

impl fmt::Display for RevertReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
