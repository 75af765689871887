//! Lookup of the output proposal covering an L2 block.
//!
//! Shared by status resolution (is the withdrawal block committed yet?) and the
//! output waiter (poll until it is).

use crate::{
    error::{ReadError, ReadResult, Result},
    reader::L1Reader,
    revert::KnownRevert,
    types::{OutputProposal, ProtocolPath},
};
use alloy_primitives::{Address, U256};
use config::{ChainContracts, ContractName};
use tracing::debug;

/// Most recent dispute games inspected per lookup.
pub const MAX_GAMES_TO_SCAN: u64 = 100;

/// Find an output covering `l2_block`, or `None` if none has been proposed yet.
pub async fn find_output<R: L1Reader>(
    reader: &R,
    contracts: &ChainContracts,
    path: ProtocolPath,
    l2_block: u64,
) -> Result<Option<OutputProposal>> {
    match path {
        ProtocolPath::Legacy => {
            let oracle = contracts.address(ContractName::L2OutputOracle)?;
            find_oracle_output(reader, oracle, l2_block).await
        }
        ProtocolPath::FaultProof => {
            let factory = contracts.address(ContractName::DisputeGameFactory)?;
            find_game_output(reader, contracts.portal, factory, l2_block).await
        }
    }
}

async fn find_oracle_output<R: L1Reader>(
    reader: &R,
    oracle: Address,
    l2_block: u64,
) -> Result<Option<OutputProposal>> {
    let Some(index) = proposed(reader.l2_output_index_after(oracle, l2_block).await)? else {
        debug!(l2_block, "No oracle output covers block yet");
        return Ok(None);
    };

    let output = reader.l2_output(oracle, index).await?;
    debug!(
        l2_block,
        output_index = %index,
        output_l2_block = output.l2_block_number,
        "Found oracle output"
    );
    Ok(Some(output))
}

/// Scan the latest games of the respected type for one covering `l2_block`.
///
/// Any covering game is accepted; the batch is not assumed to be sorted.
async fn find_game_output<R: L1Reader>(
    reader: &R,
    portal: Address,
    factory: Address,
    l2_block: u64,
) -> Result<Option<OutputProposal>> {
    let game_count = reader.game_count(factory).await?;
    let game_type = reader.respected_game_type(portal).await?;

    if game_count.is_zero() {
        debug!(game_type, "No dispute games exist yet");
        return Ok(None);
    }

    let start = game_count - U256::from(1);
    let n = game_count.min(U256::from(MAX_GAMES_TO_SCAN));
    let latest = reader.find_latest_games(factory, game_type, start, n).await;
    let Some(games) = proposed(latest)? else {
        debug!(game_type, l2_block, "No game proposed for block yet");
        return Ok(None);
    };

    debug!(
        total_games = %game_count,
        game_type,
        fetched = games.len(),
        l2_block,
        "Scanning dispute games"
    );

    for game in games {
        // a malformed record could hide the match, so it is fatal
        let game_l2_block = game.l2_block_number()?;
        if game_l2_block >= l2_block {
            debug!(
                game_index = %game.index,
                game_l2_block,
                l2_block,
                "Found dispute game covering block"
            );
            return Ok(Some(game.into_proposal(game_type, game_l2_block)));
        }
    }

    Ok(None)
}

/// `None` when a read reverted because no output covers the block yet.
fn proposed<T>(result: ReadResult<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ReadError::Reverted(reason))
            if reason.known() == Some(KnownRevert::OutputNotProposed) =>
        {
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
