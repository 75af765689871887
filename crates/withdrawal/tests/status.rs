//! Status resolution against a scripted L1.

use crate::mock::{
    contracts, fault_proof_reader, game, legacy_reader, not_proposed, reverted, withdrawal,
    MockReader, FACTORY, GAME_TYPE, PORTAL,
};
use alloy_primitives::{Address, U256};
use alloy_rpc_types_eth::TransactionReceipt;
use config::{ChainContractsBuilder, ConfigError, ContractName};
use withdrawal::{
    revert::{KnownRevert, RevertReason},
    types::{LegacyProvenWithdrawal, ProvenWithdrawal},
    Error, ProtocolVersion, ReadError, StatusResolver, WithdrawalStatus,
};


const WITHDRAWAL_BLOCK: u64 = 1_000;
const NEW_REVERT: &str = "OptimismPortal: something new";

fn proven_at(timestamp: u64) -> ProvenWithdrawal {
    ProvenWithdrawal {
        dispute_game_proxy: Address::repeat_byte(0x0d),
        timestamp,
    }
}

fn legacy_proven_at(timestamp: u64) -> LegacyProvenWithdrawal {
    LegacyProvenWithdrawal {
        output_root: Default::default(),
        timestamp,
        l2_output_index: U256::from(3),
    }
}

/// Fault proof portal where the withdrawal block is covered by a game.
fn covered() -> MockReader {
    fault_proof_reader(WITHDRAWAL_BLOCK + 10)
}

async fn status_of(reader: &MockReader) -> Result<WithdrawalStatus, Error> {
    StatusResolver::new(reader.clone(), contracts())
        .status(&withdrawal(), WITHDRAWAL_BLOCK, None)
        .await
}

fn receipt_without_logs() -> TransactionReceipt {
    let json = serde_json::json!({
        "type": "0x2",
        "status": "0x1",
        "cumulativeGasUsed": "0x5208",
        "logs": [],
        "logsBloom": format!("0x{}", "0".repeat(512)),
        "transactionHash": format!("0x{}", "11".repeat(32)),
        "transactionIndex": "0x0",
        "blockHash": format!("0x{}", "22".repeat(32)),
        "blockNumber": "0x3e8",
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x3b9aca00",
        "from": "0x5cffa347b0ae99cc01e5c01714ca5658e54a23d1",
        "to": "0x4200000000000000000000000000000000000016",
        "contractAddress": null
    });
    serde_json::from_value(json).unwrap()
}

#[tokio::test]
async fn test_receipt_without_withdrawal_fails_before_any_read() {
    let reader = covered();
    let resolver = StatusResolver::new(reader.clone(), contracts());

    let err = resolver
        .receipt_status(&receipt_without_logs(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NoWithdrawalInReceipt));
    assert_eq!(reader.total_calls(), 0);
}

#[tokio::test]
async fn test_output_not_proposed_is_waiting_to_prove() {
    let reader = covered();
    reader.script(|s| {
        s.latest_games.clear();
        s.latest_games.push_back(Err(not_proposed()));
    });

    assert_eq!(
        status_of(&reader).await.unwrap(),
        WithdrawalStatus::WaitingToProve
    );
    // every branch ran even though the first one decided
    assert_eq!(reader.call_count("proven_withdrawal"), 1);
    assert_eq!(reader.call_count("finalized_withdrawal"), 1);
    assert_eq!(reader.call_count("check_withdrawal"), 1);
}

#[tokio::test]
async fn test_no_covering_game_is_waiting_to_prove() {
    let reader = MockReader::new();
    reader.script(|s| {
        s.version = Some(Ok("3.10.0".into()));
        s.respected_game_type = Some(Ok(GAME_TYPE));
        s.game_count = Some(Ok(U256::from(250)));
        s.latest_games
            .push_back(Ok((0..100).map(|i| game(150 + i, i)).collect()));
        s.proven = Some(Ok(proven_at(0)));
        s.finalized = Some(Ok(false));
        s.check = Some(Err(reverted(KnownRevert::NotProvenBySubmitter)));
    });

    assert_eq!(
        status_of(&reader).await.unwrap(),
        WithdrawalStatus::WaitingToProve
    );
    assert_eq!(
        reader.last_games_query(),
        Some((GAME_TYPE, U256::from(249), U256::from(100)))
    );
}

#[tokio::test]
async fn test_unproven_is_ready_to_prove() {
    let reader = covered();
    reader.script(|s| {
        s.proven = Some(Ok(proven_at(0)));
        s.finalized = Some(Ok(false));
        s.check = Some(Err(reverted(KnownRevert::NotProvenBySubmitter)));
    });

    assert_eq!(
        status_of(&reader).await.unwrap(),
        WithdrawalStatus::ReadyToProve
    );
}

#[tokio::test]
async fn test_passing_finalize_check_is_ready_to_finalize() {
    let reader = covered();
    reader.script(|s| {
        s.proven = Some(Ok(proven_at(1_700_000_000)));
        s.finalized = Some(Ok(false));
        s.check = Some(Ok(()));
    });

    assert_eq!(
        status_of(&reader).await.unwrap(),
        WithdrawalStatus::ReadyToFinalize
    );
}

#[tokio::test]
async fn test_unrecognized_finalize_revert_is_an_error() {
    let reader = covered();
    let revert = ReadError::Reverted(RevertReason::from_message(NEW_REVERT));
    reader.script(|s| {
        s.proven = Some(Ok(proven_at(1_700_000_000)));
        s.finalized = Some(Ok(false));
        s.check = Some(Err(revert));
    });

    let err = status_of(&reader).await.unwrap_err();
    assert!(matches!(
        err,
        Error::UnclassifiedRevert(RevertReason::Unknown(msg)) if msg == NEW_REVERT
    ));
}

#[tokio::test]
async fn test_allow_listed_finalize_reverts() {
    let cases = [
        (KnownRevert::ProofNotMatured, WithdrawalStatus::WaitingToFinalize),
        (KnownRevert::OutputInAirGap, WithdrawalStatus::WaitingToFinalize),
        (KnownRevert::GameBlacklisted, WithdrawalStatus::ReadyToProve),
        (KnownRevert::InvalidGameType, WithdrawalStatus::ReadyToProve),
    ];

    for (reason, expected) in cases {
        let reader = covered();
        reader.script(|s| {
            s.proven = Some(Ok(proven_at(1_700_000_000)));
            s.finalized = Some(Ok(false));
            s.check = Some(Err(reverted(reason)));
        });

        assert_eq!(status_of(&reader).await.unwrap(), expected, "{reason:?}");
    }
}

#[tokio::test]
async fn test_finalized_regardless_of_proven_record() {
    for timestamp in [0, 1_700_000_000] {
        let reader = covered();
        reader.script(|s| {
            s.proven = Some(Ok(proven_at(timestamp)));
            s.finalized = Some(Ok(true));
            s.check = Some(Err(ReadError::Reverted(RevertReason::from_message(
                "OptimismPortal: withdrawal has already been finalized",
            ))));
        });
        assert_eq!(
            status_of(&reader).await.unwrap(),
            WithdrawalStatus::Finalized
        );

        let reader = legacy_reader();
        reader.script(|s| {
            s.legacy_proven = Some(Ok(legacy_proven_at(timestamp)));
            s.finalized = Some(Ok(true));
        });
        assert_eq!(
            status_of(&reader).await.unwrap(),
            WithdrawalStatus::Finalized
        );
    }
}

#[tokio::test]
async fn test_errors_surface_in_priority_order() {
    let reader = covered();
    reader.script(|s| {
        s.proven = Some(Err(ReadError::Transport("proven".into())));
        s.finalized = Some(Err(ReadError::Transport("finalized".into())));
        s.check = Some(Ok(()));
    });

    let err = status_of(&reader).await.unwrap_err();
    assert!(matches!(err, Error::ContractRead(msg) if msg == "proven"));
}

#[tokio::test]
async fn test_malformed_game_is_an_error() {
    let reader = covered();
    reader.script(|s| {
        let mut broken = game(0, WITHDRAWAL_BLOCK + 10);
        broken.extra_data = Default::default();
        s.latest_games.clear();
        s.latest_games.push_back(Ok(vec![broken]));
        s.proven = Some(Ok(proven_at(0)));
        s.finalized = Some(Ok(false));
        s.check = Some(Ok(()));
    });

    assert!(matches!(status_of(&reader).await, Err(Error::Decode(_))));
}

#[tokio::test]
async fn test_status_is_idempotent() {
    let reader = covered();
    reader.script(|s| {
        s.proven = Some(Ok(proven_at(1_700_000_000)));
        s.finalized = Some(Ok(false));
        s.check = Some(Err(reverted(KnownRevert::ProofNotMatured)));
    });
    let resolver = StatusResolver::new(reader.clone(), contracts());

    let first = resolver.status(&withdrawal(), WITHDRAWAL_BLOCK, None).await;
    let second = resolver.status(&withdrawal(), WITHDRAWAL_BLOCK, None).await;
    let (first, second) = (first.unwrap(), second.unwrap());

    assert_eq!(first, second);
    assert_eq!(first, WithdrawalStatus::WaitingToFinalize);
}

#[tokio::test]
async fn test_supplied_version_skips_version_read() {
    let reader = covered();
    reader.script(|s| {
        s.version = None;
        s.proven = Some(Ok(proven_at(0)));
        s.finalized = Some(Ok(false));
        s.check = Some(Ok(()));
    });
    let resolver = StatusResolver::new(reader.clone(), contracts());
    let version = Some(ProtocolVersion::new(3, 10, 0));

    let status = resolver
        .status(&withdrawal(), WITHDRAWAL_BLOCK, version)
        .await
        .unwrap();

    assert_eq!(status, WithdrawalStatus::ReadyToProve);
    assert_eq!(reader.call_count("contract_version"), 0);
}

#[tokio::test]
async fn test_version_read_failure_propagates() {
    let reader = covered();
    reader.script(|s| s.version = Some(Ok("not-a-version".into())));
    assert!(matches!(status_of(&reader).await, Err(Error::Decode(_))));

    let reader = covered();
    reader.script(|s| {
        s.version = Some(Err(ReadError::Transport("down".into())));
    });
    let result = status_of(&reader).await;
    assert!(matches!(result, Err(Error::ContractRead(_))));
}

#[tokio::test]
async fn test_legacy_statuses() {
    let reader = legacy_reader();
    reader.script(|s| {
        s.output_index_after.clear();
        s.output_index_after.push_back(Err(not_proposed()));
        s.legacy_proven = Some(Ok(legacy_proven_at(0)));
        s.finalized = Some(Ok(false));
    });
    assert_eq!(
        status_of(&reader).await.unwrap(),
        WithdrawalStatus::WaitingToProve
    );

    let reader = legacy_reader();
    reader.script(|s| {
        s.legacy_proven = Some(Ok(legacy_proven_at(0)));
        s.finalized = Some(Ok(false));
    });
    assert_eq!(
        status_of(&reader).await.unwrap(),
        WithdrawalStatus::ReadyToProve
    );

    // proven one day ago, seven day period
    let reader = legacy_reader();
    reader.script(|s| {
        s.legacy_proven = Some(Ok(legacy_proven_at(2_000_000 - 86_400)));
        s.finalized = Some(Ok(false));
    });
    assert_eq!(
        status_of(&reader).await.unwrap(),
        WithdrawalStatus::WaitingToFinalize
    );

    // proven exactly one period ago
    let reader = legacy_reader();
    reader.script(|s| {
        s.legacy_proven = Some(Ok(legacy_proven_at(2_000_000 - 604_800)));
        s.finalized = Some(Ok(false));
    });
    assert_eq!(
        status_of(&reader).await.unwrap(),
        WithdrawalStatus::ReadyToFinalize
    );
    assert_eq!(reader.call_count("check_withdrawal"), 0);
}

#[tokio::test]
async fn test_legacy_unknown_oracle_revert_is_an_error() {
    let reader = legacy_reader();
    reader.script(|s| {
        s.output_index_after.clear();
        s.output_index_after
            .push_back(Err(reverted(KnownRevert::ProofNotMatured)));
        s.legacy_proven = Some(Ok(legacy_proven_at(0)));
        s.finalized = Some(Ok(false));
    });

    assert!(matches!(
        status_of(&reader).await,
        Err(Error::UnclassifiedRevert(RevertReason::Known(
            KnownRevert::ProofNotMatured
        )))
    ));
}

#[tokio::test]
async fn test_legacy_without_oracle_is_config_error() {
    let reader = legacy_reader();
    let contracts = ChainContractsBuilder::new(901, PORTAL)
        .dispute_game_factory(FACTORY)
        .build();

    let err = StatusResolver::new(reader.clone(), contracts)
        .status(&withdrawal(), WITHDRAWAL_BLOCK, None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Config(ConfigError::MissingContract {
            name: ContractName::L2OutputOracle,
            ..
        })
    ));
}
