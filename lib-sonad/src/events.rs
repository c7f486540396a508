//! Sonad Events
//!
//! Every committed state change appends events here. External indexers read
//! the log by sequence number; a failed call appends nothing.

use serde::{Deserialize, Serialize};

use lib_types::{Address, Amount, BlockHeight, ExternalRef, NftId, PostId, Timestamp};

use crate::context::CallContext;

/// Ledger events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SonadEvent {
    /// Post registered by the owner
    PostVerified {
        post_id: PostId,
        external_ref: ExternalRef,
        creator: Address,
    },

    /// Post frozen by the owner
    PostDeactivated { post_id: PostId },

    /// Vote recorded
    VoteCast {
        post_id: PostId,
        voter: Address,
        is_lit: bool,
        points: u64,
        nft_awarded: bool,
    },

    /// Reward token issued by a winning drop
    NftMinted { recipient: Address, token_id: NftId },

    /// Tip accepted for a post
    TipSent {
        post_id: PostId,
        tipper: Address,
        amount: Amount,
    },

    /// Creator share credited under the pull payout model
    PayoutCredited { creator: Address, amount: Amount },

    /// Creator withdrew credited payouts
    PayoutWithdrawn { creator: Address, amount: Amount },

    /// Owner drained the protocol fee accumulator
    ProtocolFeesWithdrawn { to: Address, amount: Amount },

    /// Voting threshold replaced
    MinimumHoldingUpdated { new_minimum: Amount },

    /// Holdings ledger reference replaced
    HoldingTokenUpdated { previous: Address, current: Address },

    /// Owner changed (null `new_owner` means renounced)
    OwnershipTransferred {
        previous_owner: Address,
        new_owner: Address,
    },

    /// Reward token changed hands (`from` is `None` on mint)
    Transfer {
        from: Option<Address>,
        to: Address,
        token_id: NftId,
    },

    /// Single-token approval set or cleared
    Approval {
        owner: Address,
        approved: Address,
        token_id: NftId,
    },

    /// Operator approval toggled
    ApprovalForAll {
        owner: Address,
        operator: Address,
        approved: bool,
    },
}

impl SonadEvent {
    /// Stable event name for indexers
    pub fn event_type(&self) -> &'static str {
        match self {
            SonadEvent::PostVerified { .. } => "PostVerified",
            SonadEvent::PostDeactivated { .. } => "PostDeactivated",
            SonadEvent::VoteCast { .. } => "VoteCast",
            SonadEvent::NftMinted { .. } => "NFTMinted",
            SonadEvent::TipSent { .. } => "TipSent",
            SonadEvent::PayoutCredited { .. } => "PayoutCredited",
            SonadEvent::PayoutWithdrawn { .. } => "PayoutWithdrawn",
            SonadEvent::ProtocolFeesWithdrawn { .. } => "ProtocolFeesWithdrawn",
            SonadEvent::MinimumHoldingUpdated { .. } => "MinimumHoldingUpdated",
            SonadEvent::HoldingTokenUpdated { .. } => "HoldingTokenUpdated",
            SonadEvent::OwnershipTransferred { .. } => "OwnershipTransferred",
            SonadEvent::Transfer { .. } => "Transfer",
            SonadEvent::Approval { .. } => "Approval",
            SonadEvent::ApprovalForAll { .. } => "ApprovalForAll",
        }
    }
}

/// An event with its position in the log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventRecord {
    /// Position in the log, starting at 0
    pub seq: u64,
    pub block_number: BlockHeight,
    pub timestamp: Timestamp,
    pub event: SonadEvent,
}

/// Append-only event log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch produced by one committed call
    pub(crate) fn append(&mut self, ctx: &CallContext, events: Vec<SonadEvent>) {
        for event in events {
            let seq = self.records.len() as u64;
            self.records.push(EventRecord {
                seq,
                block_number: ctx.block_number,
                timestamp: ctx.timestamp,
                event,
            });
        }
    }

    /// Records with `seq >= from`
    pub fn since(&self, from: u64) -> &[EventRecord] {
        let start = usize::try_from(from).unwrap_or(usize::MAX).min(self.records.len());
        &self.records[start..]
    }

    pub fn all(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&SonadEvent> {
        self.records.last().map(|r| &r.event)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
