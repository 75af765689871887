//! Contract reads performed against L1.
//!
//! [`L1Reader`] is the seam between status/output logic and the RPC layer: one
//! typed method per read, each returning a [`ReadError`] that keeps the revert
//! reason separate from transport failures. [`ContractReader`] implements it on
//! top of an alloy [`Provider`].

use crate::{
    error::{ReadError, ReadResult},
    revert::RevertReason,
    types::{
        GameRecord, LegacyProvenWithdrawal, OutputProposal, OutputSource, ProvenWithdrawal,
        WithdrawalHash,
    },
};
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use alloy_rpc_types_eth::BlockNumberOrTag;
use binding::opstack::{
    IDisputeGameFactory, IL2OutputOracle, IOptimismPortal, IOptimismPortal2, ISemver,
};
use std::future::Future;
use tracing::debug;

/// Typed contract reads needed to resolve withdrawal status and find outputs.
pub trait L1Reader: Send + Sync {
    /// Semver string of a versioned contract.
    fn contract_version(&self, address: Address)
        -> impl Future<Output = ReadResult<String>> + Send;

    /// Timestamp of the latest L1 block.
    fn latest_l1_timestamp(&self) -> impl Future<Output = ReadResult<u64>> + Send;

    /// Legacy portal `provenWithdrawals(hash)`.
    fn legacy_proven_withdrawal(
        &self,
        portal: Address,
        hash: WithdrawalHash,
    ) -> impl Future<Output = ReadResult<LegacyProvenWithdrawal>> + Send;

    /// Fault proof portal `provenWithdrawals(hash, submitter)`.
    fn proven_withdrawal(
        &self,
        portal: Address,
        hash: WithdrawalHash,
        proof_submitter: Address,
    ) -> impl Future<Output = ReadResult<ProvenWithdrawal>> + Send;

    /// `finalizedWithdrawals(hash)`, same ABI on both portals.
    fn finalized_withdrawal(
        &self,
        portal: Address,
        hash: WithdrawalHash,
    ) -> impl Future<Output = ReadResult<bool>> + Send;

    /// Simulated `checkWithdrawal(hash, submitter)`. Reverts when the withdrawal
    /// cannot be finalized yet.
    fn check_withdrawal(
        &self,
        portal: Address,
        hash: WithdrawalHash,
        proof_submitter: Address,
    ) -> impl Future<Output = ReadResult<()>> + Send;

    fn respected_game_type(&self, portal: Address) -> impl Future<Output = ReadResult<u32>> + Send;

    /// Index of the first output covering `l2_block`. Reverts if none exists yet.
    fn l2_output_index_after(
        &self,
        oracle: Address,
        l2_block: u64,
    ) -> impl Future<Output = ReadResult<U256>> + Send;

    fn l2_output(
        &self,
        oracle: Address,
        index: U256,
    ) -> impl Future<Output = ReadResult<OutputProposal>> + Send;

    fn latest_output_index(&self, oracle: Address)
        -> impl Future<Output = ReadResult<U256>> + Send;

    /// Blocks between legacy output submissions.
    fn submission_interval(&self, oracle: Address) -> impl Future<Output = ReadResult<u64>> + Send;

    fn l2_block_time(&self, oracle: Address) -> impl Future<Output = ReadResult<u64>> + Send;

    fn finalization_period_seconds(
        &self,
        oracle: Address,
    ) -> impl Future<Output = ReadResult<u64>> + Send;

    fn game_count(&self, factory: Address) -> impl Future<Output = ReadResult<U256>> + Send;

    /// Up to `n` games of `game_type`, searching backwards from index `start`.
    fn find_latest_games(
        &self,
        factory: Address,
        game_type: u32,
        start: U256,
        n: U256,
    ) -> impl Future<Output = ReadResult<Vec<GameRecord>>> + Send;
}

/// [`L1Reader`] backed by an alloy provider.
#[derive(Debug, Clone)]
pub struct ContractReader<P> {
    provider: P,
}

impl<P> ContractReader<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }
}

/// Split a contract error into revert, transport, or decode failure.
fn read_error(err: alloy_contract::Error) -> ReadError {
    if let Some(data) = err.as_revert_data() {
        return ReadError::Reverted(RevertReason::from_revert_data(&data));
    }

    match err {
        alloy_contract::Error::TransportError(e) => ReadError::Transport(e.to_string()),
        other => ReadError::Decode(other.to_string()),
    }
}

fn to_u64<T>(value: T, field: &str) -> ReadResult<u64>
where
    T: TryInto<u64> + std::fmt::Display + Copy,
{
    value
        .try_into()
        .map_err(|_| ReadError::Decode(format!("{field} overflows u64: {value}")))
}

impl<P> L1Reader for ContractReader<P>
where
    P: Provider + Clone,
{
    async fn contract_version(&self, address: Address) -> ReadResult<String> {
        debug!(%address, "Reading contract version");
        let contract = ISemver::new(address, &self.provider);
        contract.version().call().await.map_err(read_error)
    }

    async fn latest_l1_timestamp(&self) -> ReadResult<u64> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Latest)
            .await
            .map_err(|e| ReadError::Transport(e.to_string()))?
            .ok_or_else(|| ReadError::Transport("Failed to get latest block".to_string()))?;
        Ok(block.header.timestamp)
    }

    async fn legacy_proven_withdrawal(
        &self,
        portal: Address,
        hash: WithdrawalHash,
    ) -> ReadResult<LegacyProvenWithdrawal> {
        let contract = IOptimismPortal::new(portal, &self.provider);
        let proven = contract
            .provenWithdrawals(hash)
            .call()
            .await
            .map_err(read_error)?;

        Ok(LegacyProvenWithdrawal {
            output_root: proven.outputRoot,
            timestamp: to_u64(proven.timestamp, "proven timestamp")?,
            l2_output_index: U256::from(proven.l2OutputIndex),
        })
    }

    async fn proven_withdrawal(
        &self,
        portal: Address,
        hash: WithdrawalHash,
        proof_submitter: Address,
    ) -> ReadResult<ProvenWithdrawal> {
        let contract = IOptimismPortal2::new(portal, &self.provider);
        let proven = contract
            .provenWithdrawals(hash, proof_submitter)
            .call()
            .await
            .map_err(read_error)?;

        Ok(ProvenWithdrawal {
            dispute_game_proxy: proven.disputeGameProxy,
            timestamp: proven.timestamp,
        })
    }

    async fn finalized_withdrawal(
        &self,
        portal: Address,
        hash: WithdrawalHash,
    ) -> ReadResult<bool> {
        let contract = IOptimismPortal2::new(portal, &self.provider);
        contract
            .finalizedWithdrawals(hash)
            .call()
            .await
            .map_err(read_error)
    }

    async fn check_withdrawal(
        &self,
        portal: Address,
        hash: WithdrawalHash,
        proof_submitter: Address,
    ) -> ReadResult<()> {
        let contract = IOptimismPortal2::new(portal, &self.provider);
        contract
            .checkWithdrawal(hash, proof_submitter)
            .call()
            .await
            .map(|_| ())
            .map_err(read_error)
    }

    async fn respected_game_type(&self, portal: Address) -> ReadResult<u32> {
        let contract = IOptimismPortal2::new(portal, &self.provider);
        contract
            .respectedGameType()
            .call()
            .await
            .map_err(read_error)
    }

    async fn l2_output_index_after(&self, oracle: Address, l2_block: u64) -> ReadResult<U256> {
        let contract = IL2OutputOracle::new(oracle, &self.provider);
        contract
            .getL2OutputIndexAfter(U256::from(l2_block))
            .call()
            .await
            .map_err(read_error)
    }

    async fn l2_output(&self, oracle: Address, index: U256) -> ReadResult<OutputProposal> {
        let contract = IL2OutputOracle::new(oracle, &self.provider);
        let output = contract
            .getL2Output(index)
            .call()
            .await
            .map_err(read_error)?;

        Ok(OutputProposal {
            l2_block_number: to_u64(output.l2BlockNumber, "output l2 block number")?,
            output_root: output.outputRoot,
            timestamp: to_u64(output.timestamp, "output timestamp")?,
            source: OutputSource::Oracle { index },
        })
    }

    async fn latest_output_index(&self, oracle: Address) -> ReadResult<U256> {
        let contract = IL2OutputOracle::new(oracle, &self.provider);
        contract
            .latestOutputIndex()
            .call()
            .await
            .map_err(read_error)
    }

    async fn submission_interval(&self, oracle: Address) -> ReadResult<u64> {
        let contract = IL2OutputOracle::new(oracle, &self.provider);
        let interval = contract
            .SUBMISSION_INTERVAL()
            .call()
            .await
            .map_err(read_error)?;
        to_u64(interval, "submission interval")
    }

    async fn l2_block_time(&self, oracle: Address) -> ReadResult<u64> {
        let contract = IL2OutputOracle::new(oracle, &self.provider);
        let block_time = contract.L2_BLOCK_TIME().call().await.map_err(read_error)?;
        to_u64(block_time, "l2 block time")
    }

    async fn finalization_period_seconds(&self, oracle: Address) -> ReadResult<u64> {
        let contract = IL2OutputOracle::new(oracle, &self.provider);
        let period = contract
            .FINALIZATION_PERIOD_SECONDS()
            .call()
            .await
            .map_err(read_error)?;
        to_u64(period, "finalization period")
    }

    async fn game_count(&self, factory: Address) -> ReadResult<U256> {
        let contract = IDisputeGameFactory::new(factory, &self.provider);
        contract.gameCount().call().await.map_err(read_error)
    }

    async fn find_latest_games(
        &self,
        factory: Address,
        game_type: u32,
        start: U256,
        n: U256,
    ) -> ReadResult<Vec<GameRecord>> {
        let contract = IDisputeGameFactory::new(factory, &self.provider);
        let games = contract
            .findLatestGames(game_type, start, n)
            .call()
            .await
            .map_err(read_error)?;

        Ok(games
            .into_iter()
            .map(|game| GameRecord {
                index: game.index,
                metadata: game.metadata,
                timestamp: game.timestamp,
                root_claim: game.rootClaim,
                extra_data: game.extraData,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_u64_overflow() {
        assert_eq!(to_u64(42u128, "value").unwrap(), 42);
        assert!(matches!(
            to_u64(u128::MAX, "value"),
            Err(ReadError::Decode(msg)) if msg.contains("value overflows u64")
        ));
        assert!(matches!(
            to_u64(U256::MAX, "count"),
            Err(ReadError::Decode(_))
        ));
    }
}
