//! Sonad Errors
//!
//! Every failure is local, synchronous and returned before any state is
//! committed. The core never retries.

use thiserror::Error;

use lib_tokens::TokenError;
use lib_types::{Address, Amount, ExternalRef, NftId, PostId, TypeError};

/// Error taxonomy of the social-proof ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthorized,
    NotFound,
    DuplicateEntity,
    InactivePost,
    InsufficientBalance,
    AlreadyVoted,
    InvalidArgument,
    TransferFailed,
    Overflow,
}

/// Error during a ledger operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SonadError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Post not found: {0}")]
    PostNotFound(PostId),

    #[error("Reward token not found: {0}")]
    TokenNotFound(NftId),

    #[error("No post registered for external ref {0}")]
    ExternalRefNotFound(String),

    #[error("External ref {external_ref} already registered as post {existing}")]
    DuplicateExternalRef { external_ref: ExternalRef, existing: PostId },

    #[error("Post {0} is not active")]
    InactivePost(PostId),

    #[error("Insufficient balance: need {required}, have {available}")]
    InsufficientBalance { required: Amount, available: Amount },

    #[error("{voter} already voted on post {post_id}")]
    AlreadyVoted { voter: Address, post_id: PostId },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Transfer failed: {0}")]
    TransferFailed(String),

    #[error("Arithmetic overflow")]
    Overflow,
}

impl SonadError {
    /// Taxonomy bucket of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SonadError::Unauthorized(_) => ErrorKind::Unauthorized,
            SonadError::PostNotFound(_)
            | SonadError::TokenNotFound(_)
            | SonadError::ExternalRefNotFound(_) => ErrorKind::NotFound,
            SonadError::DuplicateExternalRef { .. } => ErrorKind::DuplicateEntity,
            SonadError::InactivePost(_) => ErrorKind::InactivePost,
            SonadError::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            SonadError::AlreadyVoted { .. } => ErrorKind::AlreadyVoted,
            SonadError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            SonadError::TransferFailed(_) => ErrorKind::TransferFailed,
            SonadError::Overflow => ErrorKind::Overflow,
        }
    }
}

impl From<TokenError> for SonadError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::TokenNotFound(id) => SonadError::TokenNotFound(id),
            TokenError::Unauthorized(reason) => SonadError::Unauthorized(reason),
            TokenError::Overflow => SonadError::Overflow,
            TokenError::InsufficientBalance { have, need } => SonadError::InsufficientBalance {
                required: need,
                available: have,
            },
            TokenError::RecipientRejected(_) => SonadError::TransferFailed(err.to_string()),
            TokenError::InsufficientAllowance { .. }
            | TokenError::ZeroAmount
            | TokenError::NullAddress => SonadError::InvalidArgument(err.to_string()),
        }
    }
}

impl From<TypeError> for SonadError {
    fn from(err: TypeError) -> Self {
        SonadError::InvalidArgument(err.to_string())
    }
}

/// Result type for ledger operations
pub type SonadResult<T> = Result<T, SonadError>;
