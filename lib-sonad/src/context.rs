//! Call context
//!
//! Immutable facts about the call being executed. Authorization is always
//! derived from `caller` here, never from an argument.

use serde::{Deserialize, Serialize};

use lib_types::{Address, BlockHeight, Timestamp};

/// Environment of a single ledger call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// Identity that submitted the call
    pub caller: Address,
    /// Block height the call executes at
    pub block_number: BlockHeight,
    /// Block timestamp the call executes at
    pub timestamp: Timestamp,
    /// Hash of the submitting transaction
    pub tx_hash: [u8; 32],
}

impl CallContext {
    pub fn new(caller: Address, block_number: BlockHeight, timestamp: Timestamp, tx_hash: [u8; 32]) -> Self {
        Self {
            caller,
            block_number,
            timestamp,
            tx_hash,
        }
    }

    /// Context with zeroed block data, for callers that have none
    pub fn from_caller(caller: Address) -> Self {
        Self::new(caller, 0, 0, [0u8; 32])
    }

    /// Same block, different caller
    pub fn with_caller(&self, caller: Address) -> Self {
        Self { caller, ..*self }
    }
}
