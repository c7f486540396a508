//! Vote records and voter rewards
//!
//! Per (voter, post) pair the only legal transition is
//! `NotVoted -> Voted(direction)`. A record is written once and never
//! cleared, which is what makes "one vote per account per post" hold.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use lib_types::{Address, PostId};

use crate::errors::{SonadError, SonadResult};
use crate::registry::VoteDirection;

/// Accumulated rewards of one account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoterRecord {
    pub points: u64,
    pub nft_count: u64,
    /// Set by the account's first successful vote, never cleared
    pub has_voted: bool,
}

/// Write-once vote records plus the reward table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoteBook {
    votes: HashMap<(Address, PostId), VoteDirection>,
    rewards: HashMap<Address, VoterRecord>,
    /// Distinct voters per post
    voter_counts: HashMap<PostId, u64>,
    /// Votes committed so far; doubles as the drop nonce
    total_votes: u64,
}

impl VoteBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_voted(&self, voter: &Address, post_id: PostId) -> bool {
        self.votes.contains_key(&(*voter, post_id))
    }

    pub fn direction(&self, voter: &Address, post_id: PostId) -> Option<VoteDirection> {
        self.votes.get(&(*voter, post_id)).copied()
    }

    pub fn ensure_not_voted(&self, voter: &Address, post_id: PostId) -> SonadResult<()> {
        if self.has_voted(voter, post_id) {
            return Err(SonadError::AlreadyVoted {
                voter: *voter,
                post_id,
            });
        }
        Ok(())
    }

    pub fn rewards(&self, voter: &Address) -> VoterRecord {
        self.rewards.get(voter).copied().unwrap_or_default()
    }

    pub fn total_votes(&self) -> u64 {
        self.total_votes
    }

    /// Distinct accounts that voted on `post_id`
    pub fn voter_count(&self, post_id: PostId) -> u64 {
        self.voter_counts.get(&post_id).copied().unwrap_or(0)
    }

    /// Fail if one more vote would overflow a counter
    pub fn ensure_capacity(&self, voter: &Address, post_id: PostId, points: u64) -> SonadResult<()> {
        self.rewards(voter).points.checked_add(points).ok_or(SonadError::Overflow)?;
        self.voter_count(post_id).checked_add(1).ok_or(SonadError::Overflow)?;
        self.total_votes.checked_add(1).ok_or(SonadError::Overflow)?;
        Ok(())
    }

    /// Write the vote record and credit points
    ///
    /// Checks and sets in one step; all arithmetic is validated before the
    /// first write.
    pub(crate) fn record(
        &mut self,
        voter: &Address,
        post_id: PostId,
        direction: VoteDirection,
        points: u64,
    ) -> SonadResult<()> {
        self.ensure_not_voted(voter, post_id)?;

        let mut record = self.rewards(voter);
        record.points = record.points.checked_add(points).ok_or(SonadError::Overflow)?;
        record.has_voted = true;
        let voters = self.voter_count(post_id).checked_add(1).ok_or(SonadError::Overflow)?;
        let total_votes = self.total_votes.checked_add(1).ok_or(SonadError::Overflow)?;

        self.votes.insert((*voter, post_id), direction);
        self.rewards.insert(*voter, record);
        self.voter_counts.insert(post_id, voters);
        self.total_votes = total_votes;
        Ok(())
    }

    pub(crate) fn credit_nft(&mut self, voter: &Address) -> SonadResult<()> {
        let mut record = self.rewards(voter);
        record.nft_count = record.nft_count.checked_add(1).ok_or(SonadError::Overflow)?;
        self.rewards.insert(*voter, record);
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn set_total_votes(&mut self, total_votes: u64) {
        self.total_votes = total_votes;
    }
}
