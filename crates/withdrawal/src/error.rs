use crate::revert::RevertReason;
use config::ConfigError;
use thiserror::Error;

/// Failure of a single contract read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// The call reverted
    #[error("execution reverted: {0}")]
    Reverted(RevertReason),

    /// RPC or network failure
    #[error("transport error: {0}")]
    Transport(String),

    /// The call returned data that could not be decoded
    #[error("decode error: {0}")]
    Decode(String),
}

pub type ReadResult<T> = std::result::Result<T, ReadError>;

#[derive(Error, Debug)]
pub enum Error {
    /// The receipt contains no `MessagePassed` log
    #[error("No withdrawal found in receipt")]
    NoWithdrawalInReceipt,

    /// The receipt has not been included in a block
    #[error("Receipt has no block number")]
    ReceiptPending,

    /// Transport failure on a contract read
    #[error("Contract read failed: {0}")]
    ContractRead(String),

    /// A revert reason with no status mapping in this context
    #[error("Unclassified revert: {0}")]
    UnclassifiedRevert(RevertReason),

    /// Malformed contract data
    #[error("Decode error: {0}")]
    Decode(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The output wait was cancelled before a result was found
    #[error("Output wait cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<ReadError> for Error {
    fn from(err: ReadError) -> Self {
        match err {
            ReadError::Reverted(reason) => Self::UnclassifiedRevert(reason),
            ReadError::Transport(msg) => Self::ContractRead(msg),
            ReadError::Decode(msg) => Self::Decode(msg),
        }
    }
}
