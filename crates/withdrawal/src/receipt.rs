//! Withdrawal extraction from L2 transaction receipts.

use crate::{
    error::{Error, Result},
    hash::hash_withdrawal,
    types::Withdrawal,
};
use alloy_primitives::Log;
use alloy_rpc_types_eth::TransactionReceipt;
use alloy_sol_types::SolEvent;
use binding::opstack::{IL2ToL1MessagePasser::MessagePassed, MESSAGE_PASSER_ADDRESS};
use tracing::{debug, error};

/// All withdrawals initiated by a transaction, in log order.
pub fn extract_withdrawals(receipt: &TransactionReceipt) -> Vec<Withdrawal> {
    withdrawals_from_logs(receipt.inner.logs().iter().map(|log| &log.inner))
}

/// The first withdrawal initiated by a transaction.
pub fn first_withdrawal(receipt: &TransactionReceipt) -> Result<Withdrawal> {
    extract_withdrawals(receipt)
        .into_iter()
        .next()
        .ok_or(Error::NoWithdrawalInReceipt)
}

/// Decode `MessagePassed` events emitted by the message passer predeploy.
///
/// Records whose recomputed hash does not match the emitted hash are dropped.
pub fn withdrawals_from_logs<'a>(logs: impl IntoIterator<Item = &'a Log>) -> Vec<Withdrawal> {
    let mut withdrawals = vec![];

    for log in logs {
        if log.address != MESSAGE_PASSER_ADDRESS {
            continue;
        }

        let event = match MessagePassed::decode_log(log) {
            Ok(decoded) => decoded.data,
            Err(e) => {
                debug!(error = %e, "Skipping non-MessagePassed log from message passer");
                continue;
            }
        };

        let withdrawal = Withdrawal {
            nonce: event.nonce,
            sender: event.sender,
            target: event.target,
            value: event.value,
            gas_limit: event.gasLimit,
            data: event.data,
            withdrawal_hash: event.withdrawalHash,
        };

        let computed_hash = hash_withdrawal(&withdrawal);
        if computed_hash != withdrawal.withdrawal_hash {
            error!(
                computed_hash = %computed_hash,
                withdrawal_hash = %withdrawal.withdrawal_hash,
                "Withdrawal hash mismatch, skipping record"
            );
            continue;
        }

        withdrawals.push(withdrawal);
    }

    withdrawals
}
