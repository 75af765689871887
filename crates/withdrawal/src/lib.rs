//! Status resolution for OP Stack L2 to L1 withdrawals.
//!
//! Given a withdrawal initiated on L2, this crate reads the L1 portal and its
//! output source (L2OutputOracle on legacy portals, DisputeGameFactory on fault
//! proof portals) to classify the withdrawal, and can wait for an output
//! proposal covering a given L2 block.

pub mod error;
pub mod hash;
pub mod metrics;
pub mod output;
pub mod reader;
pub mod receipt;
pub mod revert;
pub mod status;
pub mod types;
pub mod version;
pub mod waiter;

pub use error::{Error, ReadError, ReadResult, Result};
pub use hash::hash_withdrawal;
pub use reader::{ContractReader, L1Reader};
pub use receipt::{extract_withdrawals, first_withdrawal};
pub use revert::{KnownRevert, RevertReason};
pub use status::{FaultProofStatus, LegacyStatus, StatusResolver, StatusStrategy};
pub use types::{OutputProposal, ProtocolPath, ProtocolVersion, Withdrawal, WithdrawalStatus};
pub use version::resolve_version;
pub use waiter::{OutputWaiter, MIN_POLL_INTERVAL};
