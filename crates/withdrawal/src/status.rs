//! Withdrawal status resolution.
//!
//! The portal version picks one of two strategies. Each strategy issues its four
//! reads concurrently and waits for all of them, since a failed read can itself
//! describe the withdrawal. Results are then inspected in a fixed order
//! (output, proven, finalized, finalize check), independent of completion order.

use crate::{
    error::{Error, ReadError, ReadResult, Result},
    metrics::Metrics,
    output::find_output,
    reader::L1Reader,
    receipt::first_withdrawal,
    types::{
        LegacyProvenWithdrawal, OutputProposal, ProtocolPath, ProtocolVersion, ProvenWithdrawal,
        Withdrawal, WithdrawalStatus,
    },
    version::version_or_resolve,
};
use alloy_primitives::Address;
use alloy_rpc_types_eth::TransactionReceipt;
use config::{ChainContracts, ContractName};
use std::future::Future;
use tracing::{debug, info};

/// One way of deriving a withdrawal's status from L1 state.
pub trait StatusStrategy: Send + Sync {
    fn resolve(
        &self,
        withdrawal: &Withdrawal,
        l2_block: u64,
    ) -> impl Future<Output = Result<WithdrawalStatus>> + Send;
}

/// Legacy portal backed by the L2OutputOracle.
pub struct LegacyStatus<'a, R> {
    reader: &'a R,
    contracts: &'a ChainContracts,
}

impl<'a, R: L1Reader> LegacyStatus<'a, R> {
    pub const fn new(reader: &'a R, contracts: &'a ChainContracts) -> Self {
        Self { reader, contracts }
    }
}

/// Fault proof portal backed by the DisputeGameFactory.
pub struct FaultProofStatus<'a, R> {
    reader: &'a R,
    contracts: &'a ChainContracts,
    proof_submitter: Option<Address>,
}

impl<'a, R: L1Reader> FaultProofStatus<'a, R> {
    pub const fn new(
        reader: &'a R,
        contracts: &'a ChainContracts,
        proof_submitter: Option<Address>,
    ) -> Self {
        Self {
            reader,
            contracts,
            proof_submitter,
        }
    }
}

/// Inputs to the legacy finalization countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FinalizationClock {
    pub(crate) period: u64,
    pub(crate) now: u64,
}

impl FinalizationClock {
    pub(crate) const fn seconds_remaining(&self, proven_at: u64) -> u64 {
        proven_at
            .saturating_add(self.period)
            .saturating_sub(self.now)
    }
}

async fn finalization_clock<R: L1Reader>(
    reader: &R,
    oracle: Address,
) -> ReadResult<FinalizationClock> {
    let (period, now) = tokio::join!(
        reader.finalization_period_seconds(oracle),
        reader.latest_l1_timestamp(),
    );

    Ok(FinalizationClock {
        period: period?,
        now: now?,
    })
}

impl<R: L1Reader> StatusStrategy for LegacyStatus<'_, R> {
    async fn resolve(&self, withdrawal: &Withdrawal, l2_block: u64) -> Result<WithdrawalStatus> {
        let portal = self.contracts.portal;
        let oracle = self.contracts.address(ContractName::L2OutputOracle)?;
        let hash = withdrawal.withdrawal_hash;

        let (output, proven, finalized, clock) = tokio::join!(
            find_output(self.reader, self.contracts, ProtocolPath::Legacy, l2_block),
            self.reader.legacy_proven_withdrawal(portal, hash),
            self.reader.finalized_withdrawal(portal, hash),
            finalization_clock(self.reader, oracle),
        );

        decide_legacy(output, proven, finalized, clock)
    }
}

impl<R: L1Reader> StatusStrategy for FaultProofStatus<'_, R> {
    async fn resolve(&self, withdrawal: &Withdrawal, l2_block: u64) -> Result<WithdrawalStatus> {
        let portal = self.contracts.portal;
        let hash = withdrawal.withdrawal_hash;
        let proof_submitter = self.proof_submitter.unwrap_or(withdrawal.sender);

        let (output, proven, finalized, check) = tokio::join!(
            find_output(
                self.reader,
                self.contracts,
                ProtocolPath::FaultProof,
                l2_block
            ),
            self.reader.proven_withdrawal(portal, hash, proof_submitter),
            self.reader.finalized_withdrawal(portal, hash),
            self.reader.check_withdrawal(portal, hash, proof_submitter),
        );

        decide_fault_proof(output, proven, finalized, check)
    }
}

pub(crate) fn decide_legacy(
    output: Result<Option<OutputProposal>>,
    proven: ReadResult<LegacyProvenWithdrawal>,
    finalized: ReadResult<bool>,
    clock: ReadResult<FinalizationClock>,
) -> Result<WithdrawalStatus> {
    if output?.is_none() {
        return Ok(WithdrawalStatus::WaitingToProve);
    }
    let proven = proven?;
    if finalized? {
        return Ok(WithdrawalStatus::Finalized);
    }
    if proven.timestamp == 0 {
        return Ok(WithdrawalStatus::ReadyToProve);
    }

    let remaining = clock?.seconds_remaining(proven.timestamp);
    debug!(
        proven_at = proven.timestamp,
        remaining, "Legacy finalization countdown"
    );

    if remaining > 0 {
        Ok(WithdrawalStatus::WaitingToFinalize)
    } else {
        Ok(WithdrawalStatus::ReadyToFinalize)
    }
}

pub(crate) fn decide_fault_proof(
    output: Result<Option<OutputProposal>>,
    proven: ReadResult<ProvenWithdrawal>,
    finalized: ReadResult<bool>,
    check: ReadResult<()>,
) -> Result<WithdrawalStatus> {
    if output?.is_none() {
        return Ok(WithdrawalStatus::WaitingToProve);
    }
    let proven = proven?;
    if finalized? {
        return Ok(WithdrawalStatus::Finalized);
    }
    if proven.timestamp == 0 {
        return Ok(WithdrawalStatus::ReadyToProve);
    }

    classify_finalize_check(check)
}

/// Map the simulated `checkWithdrawal` outcome to a status.
///
/// Only allow-listed reverts are informative; any other revert is returned as
/// [`Error::UnclassifiedRevert`].
pub(crate) fn classify_finalize_check(check: ReadResult<()>) -> Result<WithdrawalStatus> {
    match check {
        Ok(()) => Ok(WithdrawalStatus::ReadyToFinalize),
        Err(ReadError::Reverted(reason)) => match reason.known() {
            Some(known) if known.is_finalize_check_allowed() => {
                debug!(reason = %reason, status = %known.status(), "Finalize check reverted");
                Ok(known.status())
            }
            _ => Err(Error::UnclassifiedRevert(reason)),
        },
        Err(e) => Err(e.into()),
    }
}

/// Resolves withdrawal status against one chain's portal.
pub struct StatusResolver<R> {
    reader: R,
    contracts: ChainContracts,
    proof_submitter: Option<Address>,
    metrics: Metrics,
}

impl<R: L1Reader> StatusResolver<R> {
    pub fn new(reader: R, contracts: ChainContracts) -> Self {
        Self {
            reader,
            contracts,
            proof_submitter: None,
            metrics: Metrics::new(),
        }
    }

    /// Check proofs submitted by this address instead of the withdrawal sender.
    ///
    /// Without it, a withdrawal proven by a relayer resolves as ready-to-prove.
    pub fn with_proof_submitter(mut self, proof_submitter: Address) -> Self {
        self.proof_submitter = Some(proof_submitter);
        self
    }

    /// Status of the first withdrawal initiated by an L2 transaction.
    pub async fn receipt_status(
        &self,
        receipt: &TransactionReceipt,
        version: Option<ProtocolVersion>,
    ) -> Result<WithdrawalStatus> {
        let withdrawal = first_withdrawal(receipt)?;
        let l2_block = receipt.block_number.ok_or(Error::ReceiptPending)?;

        self.status(&withdrawal, l2_block, version).await
    }

    /// Status of a withdrawal initiated in `l2_block`.
    pub async fn status(
        &self,
        withdrawal: &Withdrawal,
        l2_block: u64,
        version: Option<ProtocolVersion>,
    ) -> Result<WithdrawalStatus> {
        let version = version_or_resolve(&self.reader, self.contracts.portal, version).await?;

        let status = match version.path() {
            ProtocolPath::Legacy => {
                LegacyStatus::new(&self.reader, &self.contracts)
                    .resolve(withdrawal, l2_block)
                    .await?
            }
            ProtocolPath::FaultProof => {
                FaultProofStatus::new(&self.reader, &self.contracts, self.proof_submitter)
                    .resolve(withdrawal, l2_block)
                    .await?
            }
        };

        info!(
            withdrawal_hash = %withdrawal.withdrawal_hash,
            l2_block,
            %version,
            %status,
            "Resolved withdrawal status"
        );
        self.metrics.record_status(status);

        Ok(status)
    }
}
