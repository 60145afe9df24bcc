use cosmwasm_std::{OverflowError, StdError, Uint128};
use red_envelope_common::split::SplitError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("split engine: {0}")]
    Split(#[from] SplitError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("invalid parameters: {reason}")]
    InvalidParameters { reason: String },

    #[error("amount {amount} is too small for {count} claim slots")]
    InsufficientAmount { amount: Uint128, count: u32 },

    #[error("transfer failed: {reason}")]
    TransferFailed { reason: String },

    #[error("envelope {envelope_id} not found")]
    NotFound { envelope_id: u64 },

    #[error("envelope {envelope_id} is not active")]
    NotActive { envelope_id: u64 },

    #[error("{claimant} already claimed envelope {envelope_id}")]
    AlreadyClaimed { envelope_id: u64, claimant: String },

    #[error("creator cannot claim own envelope {envelope_id}")]
    SelfClaimForbidden { envelope_id: u64 },

    #[error("only the creator can refund envelope {envelope_id}")]
    NotCreator { envelope_id: u64 },

    #[error("envelope {envelope_id} has nothing left to refund")]
    NothingToRefund { envelope_id: u64 },
}
