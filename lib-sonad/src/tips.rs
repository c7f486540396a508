//! Tip split and custody bookkeeping
//!
//! The creator share is computed first and the protocol share is the
//! remainder, so the two always add up to the tip exactly.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use lib_types::{Address, Amount};

use crate::errors::{SonadError, SonadResult};

// ============================================================================
// TIP SPLIT
// ============================================================================

/// Split of one tip between creator and protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TipSplit {
    pub creator_share: Amount,
    /// `amount - creator_share`
    pub protocol_share: Amount,
}

impl TipSplit {
    /// Split `amount` giving `creator_percentage` percent (rounded down) to
    /// the creator
    ///
    /// Works on quotient and remainder of `amount / 100` separately so the
    /// full `Amount` range is accepted without overflow.
    pub fn from_amount(amount: Amount, creator_percentage: u8) -> Self {
        let pct = Amount::from(creator_percentage.min(100));
        let creator_share = (amount / 100) * pct + (amount % 100) * pct / 100;
        let protocol_share = amount - creator_share;

        Self {
            creator_share,
            protocol_share,
        }
    }

    pub fn total(&self) -> Amount {
        self.creator_share + self.protocol_share
    }
}

// ============================================================================
// CUSTODY
// ============================================================================

/// Post-tip values computed by [`TipTreasury::prepare_tip`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TipEntry {
    creator: Address,
    protocol_fees: Amount,
    total_tipped: Amount,
    pending: Option<Amount>,
}

/// Value the contract holds on behalf of others
///
/// `protocol_fees` is owed to the owner; `pending_payouts` (pull mode only)
/// is owed to creators. Both are backed one-to-one by the contract's native
/// balance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TipTreasury {
    protocol_fees: Amount,
    pending_payouts: HashMap<Address, Amount>,
    /// Sum of every tip ever accepted
    total_tipped: Amount,
    /// Sum of every fee withdrawal ever paid
    total_fees_withdrawn: Amount,
}

impl TipTreasury {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn protocol_fees(&self) -> Amount {
        self.protocol_fees
    }

    pub fn pending_payout(&self, creator: &Address) -> Amount {
        self.pending_payouts.get(creator).copied().unwrap_or(0)
    }

    pub fn total_pending(&self) -> Amount {
        self.pending_payouts.values().fold(0, |acc, v| acc.saturating_add(*v))
    }

    pub fn total_tipped(&self) -> Amount {
        self.total_tipped
    }

    pub fn total_fees_withdrawn(&self) -> Amount {
        self.total_fees_withdrawn
    }

    /// Validate the bookkeeping for one tip without touching state
    ///
    /// With `credit_creator` the creator share is added to the creator's
    /// pending payout; otherwise it was already paid out.
    pub(crate) fn prepare_tip(
        &self,
        creator: &Address,
        amount: Amount,
        split: &TipSplit,
        credit_creator: bool,
    ) -> SonadResult<TipEntry> {
        let protocol_fees = self
            .protocol_fees
            .checked_add(split.protocol_share)
            .ok_or(SonadError::Overflow)?;
        let total_tipped = self.total_tipped.checked_add(amount).ok_or(SonadError::Overflow)?;
        let pending = if credit_creator {
            Some(
                self.pending_payout(creator)
                    .checked_add(split.creator_share)
                    .ok_or(SonadError::Overflow)?,
            )
        } else {
            None
        };

        Ok(TipEntry {
            creator: *creator,
            protocol_fees,
            total_tipped,
            pending,
        })
    }

    /// Apply an entry produced by [`Self::prepare_tip`]
    pub(crate) fn commit_tip(&mut self, entry: TipEntry) {
        self.protocol_fees = entry.protocol_fees;
        self.total_tipped = entry.total_tipped;
        if let Some(pending) = entry.pending {
            self.pending_payouts.insert(entry.creator, pending);
        }
    }

    /// Reset the fee accumulator after a successful payout of `paid`
    pub(crate) fn clear_fees(&mut self, paid: Amount) {
        self.protocol_fees = self.protocol_fees.saturating_sub(paid);
        self.total_fees_withdrawn = self.total_fees_withdrawn.saturating_add(paid);
    }

    /// Remove a creator's balance after a successful payout
    pub(crate) fn clear_payout(&mut self, creator: &Address) {
        self.pending_payouts.remove(creator);
    }
}
