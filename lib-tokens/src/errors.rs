//! Token Errors

use lib_types::{Address, Amount, NftId};
use thiserror::Error;

/// Error during token or value operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: Amount, need: Amount },

    #[error("Insufficient allowance: have {have}, need {need}")]
    InsufficientAllowance { have: Amount, need: Amount },

    #[error("Token not found: {0}")]
    TokenNotFound(NftId),

    #[error("Zero amount not allowed")]
    ZeroAmount,

    #[error("Null address not allowed")]
    NullAddress,

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Recipient {0} refused the transfer")]
    RecipientRejected(Address),
}

/// Result type for token operations
pub type TokenResult<T> = Result<T, TokenError>;
