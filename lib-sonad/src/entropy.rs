//! Reward drop entropy
//!
//! The drop check is a pure function of a 32-byte seed. Where the seed comes
//! from is pluggable: production wires a [`ChainEntropy`], tests wire a
//! [`ScriptedEntropy`] to force either branch.
//!
//! **Known weakness:** [`ChainEntropy`] hashes data every caller can see
//! before submitting (block number, timestamp, own address, post id). A voter
//! can predict a winning call. The drop is a game mechanic, not a fair
//! lottery; deployments needing fairness should plug in a VRF or commit-reveal
//! source behind [`EntropySource`].

use std::collections::VecDeque;

use lib_types::{Address, BlockHeight, PostId, Timestamp};

/// Domain separator for drop seeds
const DROP_DOMAIN: &[u8] = b"SONAD_REWARD_DROP_V1";

/// Inputs available to an entropy source at vote time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropRequest {
    pub voter: Address,
    pub post_id: PostId,
    pub block_number: BlockHeight,
    pub timestamp: Timestamp,
    pub tx_hash: [u8; 32],
    /// Number of votes committed before this one
    pub nonce: u64,
}

/// Source of drop seeds
pub trait EntropySource: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Seed for one drop check
    fn seed(&mut self, request: &DropRequest) -> [u8; 32];
}

/// Whether `seed` wins a 1-in-`chance` drop
///
/// `chance` of zero never wins.
pub fn drop_wins(seed: &[u8; 32], chance: u64) -> bool {
    if chance == 0 {
        return false;
    }
    let mut head = [0u8; 8];
    head.copy_from_slice(&seed[..8]);
    u64::from_le_bytes(head) % chance == 0
}

/// Deterministic seed from call context (predictable, see module docs)
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainEntropy;

impl EntropySource for ChainEntropy {
    fn name(&self) -> &'static str {
        "chain"
    }

    fn seed(&mut self, request: &DropRequest) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(DROP_DOMAIN);
        hasher.update(&request.block_number.to_le_bytes());
        hasher.update(&request.timestamp.to_le_bytes());
        hasher.update(&request.tx_hash);
        hasher.update(request.voter.as_bytes());
        hasher.update(&request.post_id.to_le_bytes());
        hasher.update(&request.nonce.to_le_bytes());
        *hasher.finalize().as_bytes()
    }
}

/// Replays a fixed list of drop outcomes
///
/// Once the script runs out, the fallback outcome repeats. A losing seed only
/// loses for `chance > 1`; with `chance == 1` every seed wins.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEntropy {
    script: VecDeque<bool>,
    fallback: bool,
}

impl ScriptedEntropy {
    /// Every drop wins (or loses)
    pub fn always(win: bool) -> Self {
        Self {
            script: VecDeque::new(),
            fallback: win,
        }
    }

    /// Outcomes in order, then losses
    pub fn sequence(outcomes: impl IntoIterator<Item = bool>) -> Self {
        Self {
            script: outcomes.into_iter().collect(),
            fallback: false,
        }
    }

    /// Outcomes still queued
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl EntropySource for ScriptedEntropy {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn seed(&mut self, _request: &DropRequest) -> [u8; 32] {
        let win = self.script.pop_front().unwrap_or(self.fallback);
        let mut seed = [0u8; 32];
        if !win {
            seed[0] = 1;
        }
        seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(nonce: u64) -> DropRequest {
        DropRequest {
            voter: Address::new([7; 32]),
            post_id: 1,
            block_number: 100,
            timestamp: 1_700_000_000,
            tx_hash: [0; 32],
            nonce,
        }
    }

    #[test]
    fn test_drop_wins() {
        assert!(drop_wins(&[0u8; 32], 100));
        let mut seed = [0u8; 32];
        seed[0] = 100;
        assert!(drop_wins(&seed, 100));
        seed[0] = 1;
        assert!(!drop_wins(&seed, 100));
        assert!(drop_wins(&seed, 1));
        assert!(!drop_wins(&[0u8; 32], 0));
    }

    #[test]
    fn test_chain_entropy_is_deterministic() {
        let mut a = ChainEntropy;
        let mut b = ChainEntropy;
        assert_eq!(a.seed(&request(3)), b.seed(&request(3)));
        assert_ne!(a.seed(&request(3)), a.seed(&request(4)));
    }

    #[test]
    fn test_chain_entropy_rate_is_plausible() {
        // 1-in-10 over 2000 nonces should land well inside 100..300
        let mut source = ChainEntropy;
        let wins = (0..2000)
            .filter(|n| drop_wins(&source.seed(&request(*n)), 10))
            .count();
        assert!((100..300).contains(&wins), "wins = {}", wins);
    }

    #[test]
    fn test_scripted_sequence_then_fallback() {
        let mut source = ScriptedEntropy::sequence([true, false, true]);
        let outcomes: Vec<bool> = (0..5)
            .map(|n| drop_wins(&source.seed(&request(n)), 100))
            .collect();
        assert_eq!(outcomes, vec![true, false, true, false, false]);
        assert_eq!(source.remaining(), 0);

        let mut always = ScriptedEntropy::always(true);
        assert!(drop_wins(&always.seed(&request(0)), 100));
    }
}
