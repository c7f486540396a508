//! Sonad Configuration
//!
//! Deployment-time parameters. Only `minimum_holding` stays tunable after
//! deployment (owner-gated); everything else is fixed for the contract's life.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

use lib_types::{Amount, NftId, ONE_TOKEN, MAX_CONTENT_LEN, MAX_EXTERNAL_REF_LEN};

use crate::errors::{SonadError, SonadResult};

/// Reward points credited per successful vote
pub const POINTS_PER_VOTE: u64 = 10;

/// Drop denominator: one reward token per this many votes on average
pub const NFT_DROP_CHANCE: u64 = 100;

/// Share of each tip paid to the post creator
pub const TIP_CREATOR_PERCENTAGE: u8 = 90;

/// How creator shares of tips reach the creator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutMode {
    /// Pay the creator inside the tip call; the tip fails if the payment does
    #[default]
    Push,
    /// Credit the creator; the creator withdraws later
    Pull,
}

/// Configuration for a Sonad deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SonadConfig {
    // =========================================================================
    // Voting
    // =========================================================================
    /// Points credited to a voter per vote
    pub points_per_vote: u64,
    /// Reward drop denominator (1 in N)
    pub nft_drop_chance: u64,
    /// Initial holdings threshold to vote, in base units
    pub minimum_holding: Amount,

    // =========================================================================
    // Tips
    // =========================================================================
    /// Creator share of tips, in percent
    pub tip_creator_percentage: u8,
    /// Push or pull creator payouts
    pub payout_mode: PayoutMode,

    // =========================================================================
    // Reward collection
    // =========================================================================
    pub reward_name: String,
    pub reward_symbol: String,
    /// First reward token id
    pub reward_base_token_id: NftId,
    /// Prefix for token URIs; empty disables URIs
    pub reward_base_uri: String,

    // =========================================================================
    // Boundary limits
    // =========================================================================
    pub max_external_ref_len: usize,
    pub max_content_len: usize,
}

impl Default for SonadConfig {
    fn default() -> Self {
        Self {
            points_per_vote: POINTS_PER_VOTE,
            nft_drop_chance: NFT_DROP_CHANCE,
            minimum_holding: ONE_TOKEN,

            tip_creator_percentage: TIP_CREATOR_PERCENTAGE,
            payout_mode: PayoutMode::Push,

            reward_name: "Sonad Reward".to_string(),
            reward_symbol: "SONAD".to_string(),
            reward_base_token_id: 1,
            reward_base_uri: String::new(),

            max_external_ref_len: MAX_EXTERNAL_REF_LEN,
            max_content_len: MAX_CONTENT_LEN,
        }
    }
}

impl SonadConfig {
    /// Defaults plus a reward URI prefix, for tests
    pub fn for_testing() -> Self {
        Self {
            reward_base_uri: "sonad://reward/".to_string(),
            ..Self::default()
        }
    }

    /// Default config with the pull payout model
    pub fn with_pull_payouts() -> Self {
        Self {
            payout_mode: PayoutMode::Pull,
            ..Self::default()
        }
    }

    /// Reject configurations the engine cannot run with
    pub fn validate(&self) -> SonadResult<()> {
        if self.nft_drop_chance == 0 {
            return Err(SonadError::InvalidArgument("nft_drop_chance must be > 0".to_string()));
        }
        if self.tip_creator_percentage > 100 {
            return Err(SonadError::InvalidArgument(format!(
                "tip_creator_percentage must be <= 100, got {}",
                self.tip_creator_percentage
            )));
        }
        if self.max_external_ref_len == 0 || self.max_external_ref_len > MAX_EXTERNAL_REF_LEN {
            return Err(SonadError::InvalidArgument(format!(
                "max_external_ref_len must be in 1..={}",
                MAX_EXTERNAL_REF_LEN
            )));
        }
        if self.max_content_len > MAX_CONTENT_LEN {
            return Err(SonadError::InvalidArgument(format!(
                "max_content_len must be <= {}",
                MAX_CONTENT_LEN
            )));
        }
        Ok(())
    }

    /// Parse and validate a TOML document; missing keys take defaults
    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(raw).context("Failed to parse Sonad config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read Sonad config {}", path.display()))?;
        Self::from_toml_str(&raw)
    }
}
