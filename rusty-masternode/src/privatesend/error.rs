//! Wire error codes and the pool's own fallible-operation error type.

use thiserror::Error;

/// One semantic failure kind per wire error code. Carries both the numeric
/// code sent over the wire (`code()`) and the human string used for
/// logging/UI (`message()`), mirroring the original `GetMessageByID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolErrorKind {
    AlreadyHave,
    Denom,
    EntriesFull,
    ExistingTx,
    Fees,
    InvalidCollateral,
    InvalidInput,
    InvalidScript,
    InvalidTx,
    Maximum,
    MnList,
    Mode,
    NonStandardPubkey,
    NotAMn,
    QueueFull,
    Recent,
    Session,
    MissingTx,
    Version,
    Success,
    EntriesAdded,
    NoErr,
}

impl PoolErrorKind {
    pub fn code(self) -> i32 {
        match self {
            PoolErrorKind::AlreadyHave => 1,
            PoolErrorKind::Denom => 2,
            PoolErrorKind::EntriesFull => 3,
            PoolErrorKind::ExistingTx => 4,
            PoolErrorKind::Fees => 5,
            PoolErrorKind::InvalidCollateral => 6,
            PoolErrorKind::InvalidInput => 7,
            PoolErrorKind::InvalidScript => 8,
            PoolErrorKind::InvalidTx => 9,
            PoolErrorKind::Maximum => 10,
            PoolErrorKind::MnList => 11,
            PoolErrorKind::Mode => 12,
            PoolErrorKind::NonStandardPubkey => 13,
            PoolErrorKind::NotAMn => 14,
            PoolErrorKind::QueueFull => 15,
            PoolErrorKind::Recent => 16,
            PoolErrorKind::Session => 17,
            PoolErrorKind::MissingTx => 18,
            PoolErrorKind::Version => 19,
            PoolErrorKind::Success => 0,
            PoolErrorKind::EntriesAdded => 20,
            PoolErrorKind::NoErr => 21,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PoolErrorKind::AlreadyHave => "Already have that input.",
            PoolErrorKind::Denom => "No matching denominations found for mixing.",
            PoolErrorKind::EntriesFull => "Entries are full.",
            PoolErrorKind::ExistingTx => "Not compatible with existing transactions.",
            PoolErrorKind::Fees => "Transaction fees are too high.",
            PoolErrorKind::InvalidCollateral => "Collateral not valid.",
            PoolErrorKind::InvalidInput => "Input is not valid.",
            PoolErrorKind::InvalidScript => "Invalid script detected.",
            PoolErrorKind::InvalidTx => "Transaction not valid.",
            PoolErrorKind::Maximum => "Value more than mixing pool maximum allows.",
            PoolErrorKind::MnList => "Not in the masternode list.",
            PoolErrorKind::Mode => "Incompatible mode.",
            PoolErrorKind::NonStandardPubkey => "Non-standard public key detected.",
            PoolErrorKind::NotAMn => "This is not a masternode.",
            PoolErrorKind::QueueFull => "Mixing queue is full.",
            PoolErrorKind::Recent => "Last queue was created too recently.",
            PoolErrorKind::Session => "Session not complete.",
            PoolErrorKind::MissingTx => "Missing input transaction information.",
            PoolErrorKind::Version => "Incompatible version.",
            PoolErrorKind::Success => "Request successful.",
            PoolErrorKind::EntriesAdded => "Entries successfully added.",
            PoolErrorKind::NoErr => "No errors detected.",
        }
    }
}

/// Fallible-operation error. `Internal` covers host-capability failures
/// that are logged and absorbed by the coordinator rather than surfaced to
/// a client over the wire.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("{}", .0.message())]
    Wire(PoolErrorKind),
    #[error("internal pool error: {0}")]
    Internal(String),
}

impl PoolError {
    pub fn kind(&self) -> PoolErrorKind {
        match self {
            PoolError::Wire(kind) => *kind,
            PoolError::Internal(_) => PoolErrorKind::Session,
        }
    }
}

impl From<PoolErrorKind> for PoolError {
    fn from(kind: PoolErrorKind) -> Self {
        PoolError::Wire(kind)
    }
}

pub type PoolResult<T> = Result<T, PoolError>;
