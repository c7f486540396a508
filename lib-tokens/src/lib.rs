//! Sonad value-side collaborators
//!
//! The social-proof ledger never owns money directly. It reads holdings,
//! moves native value and issues reward tokens through the types here.
//!
//! # Key Types
//!
//! - [`BalanceLedger`]: read-only holdings gate consulted before a vote
//! - [`FaucetToken`]: fungible ledger with a test faucet, implements [`BalanceLedger`]
//! - [`ValueBank`] / [`NativeBank`]: all-or-nothing native value settlement
//! - [`RewardCollection`]: non-fungible reward registry with delegated approvals

pub mod errors;
pub mod ledger;
pub mod bank;
pub mod nft;

pub use errors::*;
pub use ledger::{BalanceLedger, FaucetToken, FAUCET_AMOUNT};
pub use bank::{NativeBank, ValueBank, ValueTransfer};
pub use nft::{NftTransfer, RewardCollection};
