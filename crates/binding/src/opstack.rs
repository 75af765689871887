//! OP Stack contract bindings.
//!
//! Includes the contracts read while resolving withdrawal status:
//! - L2ToL1MessagePasser (L2 predeploy)
//! - OptimismPortal (legacy, output oracle based) and OptimismPortal2 (fault proofs)
//! - L2OutputOracle (legacy)
//! - DisputeGameFactory

use alloy_primitives::{address, Address};
use alloy_sol_types::sol;

/// L2ToL1MessagePasser predeploy address (same on all OP Stack chains).
pub const MESSAGE_PASSER_ADDRESS: Address = address!("4200000000000000000000000000000000000016");

sol! {
    /// L2ToL1MessagePasser - L2 predeploy contract for initiating withdrawals
    #[sol(rpc)]
    interface IL2ToL1MessagePasser {
        /// Emitted when a withdrawal is initiated on L2
        event MessagePassed(
            uint256 indexed nonce,
            address indexed sender,
            address indexed target,
            uint256 value,
            uint256 gasLimit,
            bytes data,
            bytes32 withdrawalHash
        );
    }

    /// Semver - every versioned OP Stack contract exposes its version string
    #[sol(rpc)]
    interface ISemver {
        function version() external view returns (string memory);
    }

    /// OptimismPortal - legacy L1 portal backed by the L2OutputOracle
    #[sol(rpc)]
    interface IOptimismPortal {
        /// Query proven withdrawals by hash
        function provenWithdrawals(bytes32 withdrawalHash)
            external view returns (bytes32 outputRoot, uint128 timestamp, uint128 l2OutputIndex);

        /// Query if a withdrawal has been finalized
        function finalizedWithdrawals(bytes32 withdrawalHash)
            external view returns (bool);
    }

    /// OptimismPortal2 - L1 portal for the fault proof system
    #[sol(rpc)]
    interface IOptimismPortal2 {
        /// Proven withdrawal data stored on L1
        #[derive(Debug)]
        struct ProvenWithdrawal {
            address disputeGameProxy;
            uint64 timestamp;
        }

        /// Query proven withdrawals by hash and proof submitter
        function provenWithdrawals(bytes32 withdrawalHash, address proofSubmitter)
            external view returns (ProvenWithdrawal memory);

        /// Query if a withdrawal has been finalized
        function finalizedWithdrawals(bytes32 withdrawalHash)
            external view returns (bool);

        /// Reverts with a reason string if the withdrawal cannot be finalized yet
        function checkWithdrawal(bytes32 withdrawalHash, address proofSubmitter)
            external view;

        /// Get the respected game type for filtering dispute games
        function respectedGameType()
            external view returns (uint32);
    }

    /// L2OutputOracle - legacy store of L2 output proposals
    #[sol(rpc)]
    interface IL2OutputOracle {
        #[derive(Debug)]
        struct OutputProposal {
            bytes32 outputRoot;
            uint128 timestamp;
            uint128 l2BlockNumber;
        }

        /// Reverts if no output covering the block has been proposed
        function getL2OutputIndexAfter(uint256 l2BlockNumber)
            external view returns (uint256);

        function getL2Output(uint256 l2OutputIndex)
            external view returns (OutputProposal memory);

        function latestOutputIndex() external view returns (uint256);

        function SUBMISSION_INTERVAL() external view returns (uint256);

        function L2_BLOCK_TIME() external view returns (uint256);

        function FINALIZATION_PERIOD_SECONDS() external view returns (uint256);
    }

    /// DisputeGameFactory - Used to find dispute games covering an L2 block
    #[sol(rpc)]
    interface IDisputeGameFactory {
        /// Dispute game search result
        struct GameSearchResult {
            uint256 index;
            bytes32 metadata;
            uint64 timestamp;
            bytes32 rootClaim;
            bytes extraData;
        }

        /// Get the total number of dispute games created
        function gameCount() external view returns (uint256 gameCount_);

        /// Find latest games of a given type, searching backwards from `_start`
        function findLatestGames(
            uint32 _gameType,
            uint256 _start,
            uint256 _n
        ) external view returns (GameSearchResult[] memory);
    }

    /// Withdrawal transaction structure (shared across contracts)
    #[derive(Debug, PartialEq, Eq)]
    struct WithdrawalTransaction {
        uint256 nonce;
        address sender;
        address target;
        uint256 value;
        uint256 gasLimit;
        bytes data;
    }
}
