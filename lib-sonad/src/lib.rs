//! Sonad Social-Proof Ledger
//!
//! Registers verified social posts, lets token holders vote on them, drops
//! reward tokens to lucky voters and routes tips to creators.
//!
//! # Entry Points
//!
//! 1. **Posts**: `verify_and_register_post`, `deactivate_post` (owner only)
//! 2. **Votes**: `vote`, gated by a minimum balance on the holding token
//! 3. **Tips**: `tip_creator`, split 90/10 between creator and protocol
//! 4. **Payouts**: `withdraw_protocol_fees` (owner), `withdraw_payout` (pull mode)
//! 5. **Reward tokens**: `approve`, `set_approval_for_all`, `transfer_from`
//!
//! Every call either commits all of its state changes and events or returns
//! an error having changed nothing.
//!
//! # Usage
//!
//! ```ignore
//! use lib_sonad::{CallContext, Sonad, SonadConfig};
//!
//! let mut sonad = Sonad::deploy_with_chain_entropy(&ctx, contract, holding_token, SonadConfig::default())?;
//! let post_id = sonad.verify_and_register_post(&ctx, "1234567890", creator, "gm")?;
//! sonad.vote(&voter_ctx, post_id, true, &holding_ledger)?;
//! sonad.tip_creator(&tipper_ctx, post_id, amount, &mut bank)?;
//! ```

pub mod access;
pub mod config;
pub mod context;
pub mod contract;
pub mod entropy;
pub mod errors;
pub mod events;
pub mod registry;
pub mod shared;
pub mod tips;
pub mod voting;

pub use access::Ownable;
pub use config::{PayoutMode, SonadConfig, NFT_DROP_CHANCE, POINTS_PER_VOTE, TIP_CREATOR_PERCENTAGE};
pub use context::CallContext;
pub use contract::{Sonad, SonadState, VoteOutcome};
pub use entropy::{drop_wins, ChainEntropy, DropRequest, EntropySource, ScriptedEntropy};
pub use errors::{ErrorKind, SonadError, SonadResult};
pub use events::{EventLog, EventRecord, SonadEvent};
pub use registry::{Post, PostRegistry, VoteDirection};
pub use shared::SharedSonad;
pub use tips::{TipSplit, TipTreasury};
pub use voting::{VoteBook, VoterRecord};
