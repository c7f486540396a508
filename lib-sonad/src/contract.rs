//! Sonad contract
//!
//! Owns every piece of ledger state and exposes one method per entry point.
//!
//! **Atomicity:** every mutating method runs a validation phase that reads
//! only, then a mutation phase that cannot fail except on an external value
//! movement, which happens before any internal write. A returned error
//! therefore means nothing changed and no event was appended.
//!
//! **Collaborators:** the holdings ledger and the native value bank are
//! passed into the calls that need them; the contract never stores them.

use serde::{Deserialize, Serialize};
use std::fmt;

use lib_tokens::{BalanceLedger, NftTransfer, RewardCollection, ValueBank, ValueTransfer};
use lib_types::{Address, Amount, ExternalRef, NftId, PostContent, PostId};

use crate::access::Ownable;
use crate::config::{PayoutMode, SonadConfig};
use crate::context::CallContext;
use crate::entropy::{drop_wins, ChainEntropy, DropRequest, EntropySource};
use crate::errors::{SonadError, SonadResult};
use crate::events::{EventLog, EventRecord, SonadEvent};
use crate::registry::{Post, PostRegistry, VoteDirection};
use crate::tips::{TipSplit, TipTreasury};
use crate::voting::{VoteBook, VoterRecord};

/// Result of a successful vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOutcome {
    pub points: u64,
    /// Reward token minted by this vote, if the drop won
    pub nft: Option<NftId>,
}

/// Durable state of one deployment
///
/// Everything a storage layer has to persist. The entropy source is not
/// part of it and is supplied again on [`Sonad::restore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SonadState {
    /// Address the contract holds native value under
    contract_address: Address,
    access: Ownable,
    /// Ledger whose balances gate voting
    holding_token: Address,
    minimum_holding: Amount,
    config: SonadConfig,
    posts: PostRegistry,
    votes: VoteBook,
    treasury: TipTreasury,
    rewards: RewardCollection,
    events: EventLog,
}

impl SonadState {
    pub fn contract_address(&self) -> Address {
        self.contract_address
    }

    pub fn owner(&self) -> Address {
        self.access.owner()
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }
}

/// The social-proof ledger
pub struct Sonad {
    state: SonadState,
    entropy: Box<dyn EntropySource>,
}

impl fmt::Debug for Sonad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sonad")
            .field("contract_address", &self.state.contract_address)
            .field("owner", &self.state.access.owner())
            .field("total_posts", &self.state.posts.total_posts())
            .field("entropy", &self.entropy.name())
            .finish()
    }
}

impl Sonad {
    /// Deploy a new ledger owned by `ctx.caller`
    ///
    /// # Failure modes
    /// - config fails validation (`InvalidArgument`)
    /// - deployer, contract address or holding token is the null identity
    ///   (`InvalidArgument`)
    pub fn deploy(
        ctx: &CallContext,
        contract_address: Address,
        holding_token: Address,
        config: SonadConfig,
        entropy: Box<dyn EntropySource>,
    ) -> SonadResult<Self> {
        config.validate()?;
        if ctx.caller.is_zero() {
            return Err(SonadError::InvalidArgument("deployer is the null identity".to_string()));
        }
        if contract_address.is_zero() {
            return Err(SonadError::InvalidArgument("contract address is the null identity".to_string()));
        }
        if holding_token.is_zero() {
            return Err(SonadError::InvalidArgument("holding token is the null identity".to_string()));
        }

        let rewards = RewardCollection::new(
            config.reward_name.clone(),
            config.reward_symbol.clone(),
            config.reward_base_token_id,
            config.reward_base_uri.clone(),
        );

        let mut state = SonadState {
            contract_address,
            access: Ownable::new(ctx.caller),
            holding_token,
            minimum_holding: config.minimum_holding,
            config,
            posts: PostRegistry::new(),
            votes: VoteBook::new(),
            treasury: TipTreasury::new(),
            rewards,
            events: EventLog::new(),
        };
        state.events.append(
            ctx,
            vec![SonadEvent::OwnershipTransferred {
                previous_owner: Address::NULL,
                new_owner: ctx.caller,
            }],
        );

        tracing::info!(
            owner = %ctx.caller,
            contract = %contract_address,
            holding_token = %holding_token,
            entropy = entropy.name(),
            "Sonad deployed"
        );

        Ok(Self { state, entropy })
    }

    /// Deploy with the default [`ChainEntropy`] source
    pub fn deploy_with_chain_entropy(
        ctx: &CallContext,
        contract_address: Address,
        holding_token: Address,
        config: SonadConfig,
    ) -> SonadResult<Self> {
        Self::deploy(ctx, contract_address, holding_token, config, Box::new(ChainEntropy))
    }

    /// Rebuild a ledger from persisted state
    pub fn restore(state: SonadState, entropy: Box<dyn EntropySource>) -> SonadResult<Self> {
        state.config.validate()?;
        tracing::debug!(
            posts = state.posts.total_posts(),
            events = state.events.len(),
            "Sonad state restored"
        );
        Ok(Self { state, entropy })
    }

    /// Copy of the full durable state
    pub fn snapshot(&self) -> SonadState {
        self.state.clone()
    }

    fn commit(&mut self, ctx: &CallContext, events: Vec<SonadEvent>) {
        self.state.events.append(ctx, events);
    }

    /// Custody balance backs fees and payouts and may not act as a caller
    fn reject_custody_caller(&self, caller: &Address) -> SonadResult<()> {
        if *caller == self.state.contract_address {
            return Err(SonadError::InvalidArgument(format!(
                "contract address {} cannot act as caller",
                caller
            )));
        }
        Ok(())
    }

    // ========================================================================
    // ACCESS CONTROL
    // ========================================================================

    pub fn transfer_ownership(&mut self, ctx: &CallContext, new_owner: Address) -> SonadResult<()> {
        let event = self.state.access.transfer_ownership(&ctx.caller, new_owner)?;
        self.commit(ctx, vec![event]);
        Ok(())
    }

    /// Give up ownership for good; every owner-gated call fails afterwards
    pub fn renounce_ownership(&mut self, ctx: &CallContext) -> SonadResult<()> {
        let event = self.state.access.renounce_ownership(&ctx.caller)?;
        self.commit(ctx, vec![event]);
        Ok(())
    }

    // ========================================================================
    // POST REGISTRY
    // ========================================================================

    /// Register a verified post (owner only)
    ///
    /// # Failure modes
    /// - caller is not the owner (`Unauthorized`)
    /// - malformed ref or content, null creator (`InvalidArgument`)
    /// - ref already registered (`DuplicateExternalRef`)
    pub fn verify_and_register_post(
        &mut self,
        ctx: &CallContext,
        external_ref: &str,
        creator: Address,
        content: &str,
    ) -> SonadResult<PostId> {
        // === VALIDATION PHASE ===
        self.state.access.require_owner(&ctx.caller)?;
        let external_ref = ExternalRef::with_limit(external_ref, self.state.config.max_external_ref_len)?;
        let content = PostContent::with_limit(content, self.state.config.max_content_len)?;

        // === MUTATION PHASE ===
        let post_id = self
            .state
            .posts
            .register(external_ref.clone(), creator, content, ctx.timestamp)?;

        tracing::info!(post_id, external_ref = %external_ref, creator = %creator, "post verified");
        self.commit(
            ctx,
            vec![SonadEvent::PostVerified {
                post_id,
                external_ref,
                creator,
            }],
        );
        Ok(post_id)
    }

    /// Freeze a post (owner only); repeating the call is harmless
    pub fn deactivate_post(&mut self, ctx: &CallContext, post_id: PostId) -> SonadResult<()> {
        self.state.access.require_owner(&ctx.caller)?;
        self.state.posts.deactivate(post_id)?;

        tracing::info!(post_id, "post deactivated");
        self.commit(ctx, vec![SonadEvent::PostDeactivated { post_id }]);
        Ok(())
    }

    // ========================================================================
    // VOTING
    // ========================================================================

    /// Cast a lit (`true`) or shit (`false`) vote
    ///
    /// `holdings` must be the ledger configured as the holding token.
    ///
    /// # Failure modes, in check order
    /// - post missing (`PostNotFound`) or frozen (`InactivePost`)
    /// - null caller, the contract itself or wrong holdings ledger
    ///   (`InvalidArgument`)
    /// - caller holds less than the minimum (`InsufficientBalance`)
    /// - caller already voted on this post (`AlreadyVoted`)
    pub fn vote(
        &mut self,
        ctx: &CallContext,
        post_id: PostId,
        is_lit: bool,
        holdings: &dyn BalanceLedger,
    ) -> SonadResult<VoteOutcome> {
        let voter = ctx.caller;
        let direction = VoteDirection::from_is_lit(is_lit);

        // === VALIDATION PHASE (before any mutation) ===
        let post = self.state.posts.get_active(post_id)?;
        if voter.is_zero() {
            return Err(SonadError::InvalidArgument("voter is the null identity".to_string()));
        }
        self.reject_custody_caller(&voter)?;
        if holdings.ledger_address() != self.state.holding_token {
            return Err(SonadError::InvalidArgument(format!(
                "holdings ledger {} is not the configured holding token {}",
                holdings.ledger_address(),
                self.state.holding_token
            )));
        }
        let available = holdings.balance_of(&voter);
        if available < self.state.minimum_holding {
            return Err(SonadError::InsufficientBalance {
                required: self.state.minimum_holding,
                available,
            });
        }
        self.state.votes.ensure_not_voted(&voter, post_id)?;

        let counter = match direction {
            VoteDirection::Lit => post.lit_count,
            VoteDirection::Shit => post.shit_count,
        };
        counter.checked_add(1).ok_or(SonadError::Overflow)?;
        let record = self.state.votes.rewards(&voter);
        let points = self.state.config.points_per_vote;
        self.state.votes.ensure_capacity(&voter, post_id, points)?;

        let request = DropRequest {
            voter,
            post_id,
            block_number: ctx.block_number,
            timestamp: ctx.timestamp,
            tx_hash: ctx.tx_hash,
            nonce: self.state.votes.total_votes(),
        };
        let seed = self.entropy.seed(&request);
        let won = drop_wins(&seed, self.state.config.nft_drop_chance);
        tracing::debug!(
            voter = %voter,
            post_id,
            nonce = request.nonce,
            source = self.entropy.name(),
            won,
            "reward drop rolled"
        );
        if won {
            record.nft_count.checked_add(1).ok_or(SonadError::Overflow)?;
            self.state.rewards.ensure_mintable(&voter)?;
        }

        // === MUTATION PHASE ===
        let minted = if won {
            Some(self.state.rewards.mint(&voter)?)
        } else {
            None
        };
        self.state.votes.record(&voter, post_id, direction, points)?;
        if minted.is_some() {
            self.state.votes.credit_nft(&voter)?;
        }
        self.state.posts.get_active_mut(post_id)?.record_vote(direction)?;

        let mut events = Vec::with_capacity(3);
        if let Some(transfer) = minted {
            tracing::info!(recipient = %voter, token_id = transfer.token_id, "reward token minted");
            events.push(transfer_event(&transfer));
            events.push(SonadEvent::NftMinted {
                recipient: voter,
                token_id: transfer.token_id,
            });
        }
        events.push(SonadEvent::VoteCast {
            post_id,
            voter,
            is_lit,
            points,
            nft_awarded: minted.is_some(),
        });

        tracing::info!(post_id, voter = %voter, is_lit, points, "vote cast");
        self.commit(ctx, events);

        Ok(VoteOutcome {
            points,
            nft: minted.map(|t| t.token_id),
        })
    }

    /// Replace the voting threshold (owner only, any value accepted)
    pub fn update_minimum_holding(&mut self, ctx: &CallContext, new_minimum: Amount) -> SonadResult<()> {
        self.state.access.require_owner(&ctx.caller)?;
        self.state.minimum_holding = new_minimum;

        tracing::info!(new_minimum, "minimum holding updated");
        self.commit(ctx, vec![SonadEvent::MinimumHoldingUpdated { new_minimum }]);
        Ok(())
    }

    /// Point the voting gate at another holdings ledger (owner only)
    pub fn set_holding_token(&mut self, ctx: &CallContext, token: Address) -> SonadResult<()> {
        self.state.access.require_owner(&ctx.caller)?;
        if token.is_zero() {
            return Err(SonadError::InvalidArgument("holding token is the null identity".to_string()));
        }

        let previous = self.state.holding_token;
        self.state.holding_token = token;

        tracing::info!(previous = %previous, current = %token, "holding token updated");
        self.commit(ctx, vec![SonadEvent::HoldingTokenUpdated { previous, current: token }]);
        Ok(())
    }

    // ========================================================================
    // TIPS AND PAYOUTS
    // ========================================================================

    /// Tip the creator of `post_id` with `amount` of the caller's native value
    ///
    /// In push mode the creator share is paid in the same settlement as the
    /// protocol share; in pull mode the whole amount goes into custody and
    /// the creator share is credited for [`Self::withdraw_payout`].
    ///
    /// # Failure modes, in check order
    /// - post missing (`PostNotFound`) or frozen (`InactivePost`)
    /// - tipper is the contract itself, zero amount (`InvalidArgument`)
    /// - tipper cannot cover the amount (`InsufficientBalance`)
    /// - settlement refused, e.g. creator rejects value (`TransferFailed`)
    pub fn tip_creator(
        &mut self,
        ctx: &CallContext,
        post_id: PostId,
        amount: Amount,
        bank: &mut dyn ValueBank,
    ) -> SonadResult<TipSplit> {
        let tipper = ctx.caller;
        let custody = self.state.contract_address;

        // === VALIDATION PHASE (before any value moves) ===
        let post = self.state.posts.get_active(post_id)?;
        let creator = post.creator;
        self.reject_custody_caller(&tipper)?;
        if amount == 0 {
            return Err(SonadError::InvalidArgument("tip amount must be positive".to_string()));
        }
        let available = bank.balance(&tipper);
        if available < amount {
            return Err(SonadError::InsufficientBalance {
                required: amount,
                available,
            });
        }
        let total_tips = post.total_tips.checked_add(amount).ok_or(SonadError::Overflow)?;

        let split = TipSplit::from_amount(amount, self.state.config.tip_creator_percentage);
        let pull = self.state.config.payout_mode == PayoutMode::Pull;
        let entry = self.state.treasury.prepare_tip(&creator, amount, &split, pull)?;
        tracing::debug!(
            post_id,
            amount,
            creator_share = split.creator_share,
            protocol_share = split.protocol_share,
            "tip split"
        );

        // === VALUE MOVEMENT (all legs or none) ===
        let legs = if pull {
            vec![ValueTransfer::new(tipper, custody, amount)]
        } else {
            vec![
                ValueTransfer::new(tipper, creator, split.creator_share),
                ValueTransfer::new(tipper, custody, split.protocol_share),
            ]
        };
        bank.settle(&legs).map_err(|e| {
            tracing::warn!(post_id, creator = %creator, error = %e, "tip settlement failed");
            SonadError::TransferFailed(e.to_string())
        })?;

        // === MUTATION PHASE ===
        self.state.treasury.commit_tip(entry);
        self.state.posts.get_active_mut(post_id)?.total_tips = total_tips;

        let mut events = Vec::with_capacity(2);
        if pull {
            events.push(SonadEvent::PayoutCredited {
                creator,
                amount: split.creator_share,
            });
        }
        events.push(SonadEvent::TipSent { post_id, tipper, amount });

        tracing::info!(post_id, tipper = %tipper, amount, "tip sent");
        self.commit(ctx, events);
        Ok(split)
    }

    /// Pay the whole protocol fee accumulator to the owner (owner only)
    ///
    /// Returns the amount paid, which is zero when nothing accrued. On a
    /// failed payment the accumulator keeps its value.
    pub fn withdraw_protocol_fees(&mut self, ctx: &CallContext, bank: &mut dyn ValueBank) -> SonadResult<Amount> {
        self.state.access.require_owner(&ctx.caller)?;
        let to = self.state.access.owner();
        let amount = self.state.treasury.protocol_fees();

        bank.settle(&[ValueTransfer::new(self.state.contract_address, to, amount)])
            .map_err(|e| {
                tracing::warn!(to = %to, amount, error = %e, "fee withdrawal failed");
                SonadError::TransferFailed(e.to_string())
            })?;
        self.state.treasury.clear_fees(amount);

        tracing::info!(to = %to, amount, "protocol fees withdrawn");
        self.commit(ctx, vec![SonadEvent::ProtocolFeesWithdrawn { to, amount }]);
        Ok(amount)
    }

    /// Pay the caller every credited creator share (pull mode)
    pub fn withdraw_payout(&mut self, ctx: &CallContext, bank: &mut dyn ValueBank) -> SonadResult<Amount> {
        let creator = ctx.caller;
        self.reject_custody_caller(&creator)?;
        let amount = self.state.treasury.pending_payout(&creator);
        if amount == 0 {
            return Err(SonadError::InvalidArgument(format!("no payout owed to {}", creator)));
        }

        bank.settle(&[ValueTransfer::new(self.state.contract_address, creator, amount)])
            .map_err(|e| {
                tracing::warn!(creator = %creator, amount, error = %e, "payout withdrawal failed");
                SonadError::TransferFailed(e.to_string())
            })?;
        self.state.treasury.clear_payout(&creator);

        tracing::info!(creator = %creator, amount, "payout withdrawn");
        self.commit(ctx, vec![SonadEvent::PayoutWithdrawn { creator, amount }]);
        Ok(amount)
    }

    // ========================================================================
    // REWARD TOKENS
    // ========================================================================

    /// Approve `spender` for one reward token; null `spender` clears it
    pub fn approve(&mut self, ctx: &CallContext, spender: Address, token_id: NftId) -> SonadResult<()> {
        let owner = self.state.rewards.approve(&ctx.caller, &spender, token_id)?;
        self.commit(
            ctx,
            vec![SonadEvent::Approval {
                owner,
                approved: spender,
                token_id,
            }],
        );
        Ok(())
    }

    pub fn set_approval_for_all(&mut self, ctx: &CallContext, operator: Address, approved: bool) -> SonadResult<()> {
        self.state
            .rewards
            .set_approval_for_all(&ctx.caller, &operator, approved)?;
        self.commit(
            ctx,
            vec![SonadEvent::ApprovalForAll {
                owner: ctx.caller,
                operator,
                approved,
            }],
        );
        Ok(())
    }

    /// Move a reward token; caller must be holder, approved or operator
    pub fn transfer_from(&mut self, ctx: &CallContext, from: Address, to: Address, token_id: NftId) -> SonadResult<()> {
        let transfer = self.state.rewards.transfer_from(&ctx.caller, &from, &to, token_id)?;
        tracing::debug!(from = %from, to = %to, token_id, "reward token transferred");
        self.commit(ctx, vec![transfer_event(&transfer)]);
        Ok(())
    }

    /// Same as [`Self::transfer_from`]; there are no receiver hooks to call
    pub fn safe_transfer_from(
        &mut self,
        ctx: &CallContext,
        from: Address,
        to: Address,
        token_id: NftId,
    ) -> SonadResult<()> {
        self.transfer_from(ctx, from, to, token_id)
    }

    // ========================================================================
    // READ-ONLY VIEWS
    // ========================================================================

    pub fn owner(&self) -> Address {
        self.state.access.owner()
    }

    pub fn contract_address(&self) -> Address {
        self.state.contract_address
    }

    pub fn holding_token(&self) -> Address {
        self.state.holding_token
    }

    pub fn minimum_holding(&self) -> Amount {
        self.state.minimum_holding
    }

    pub fn config(&self) -> &SonadConfig {
        &self.state.config
    }

    pub fn get_post(&self, post_id: PostId) -> SonadResult<&Post> {
        self.state.posts.get(post_id)
    }

    pub fn get_creator_posts(&self, creator: &Address) -> &[PostId] {
        self.state.posts.creator_posts(creator)
    }

    pub fn get_total_posts(&self) -> u64 {
        self.state.posts.total_posts()
    }

    /// Last assigned post id (0 before the first post)
    pub fn post_id_counter(&self) -> PostId {
        self.state.posts.post_id_counter()
    }

    /// Post id registered for an external ref
    ///
    /// Fails only with `ExternalRefNotFound`, malformed input included.
    pub fn post_by_external_ref(&self, external_ref: &str) -> SonadResult<PostId> {
        self.state.posts.post_id_for(external_ref)
    }

    pub fn posts(&self) -> impl Iterator<Item = &Post> {
        self.state.posts.iter()
    }

    pub fn has_user_voted(&self, account: &Address, post_id: PostId) -> bool {
        self.state.votes.has_voted(account, post_id)
    }

    pub fn vote_direction(&self, account: &Address, post_id: PostId) -> Option<VoteDirection> {
        self.state.votes.direction(account, post_id)
    }

    /// `(points, nft_count)` of an account
    pub fn get_voter_rewards(&self, account: &Address) -> (u64, u64) {
        let record = self.state.votes.rewards(account);
        (record.points, record.nft_count)
    }

    pub fn voter_record(&self, account: &Address) -> VoterRecord {
        self.state.votes.rewards(account)
    }

    /// Distinct accounts that voted on a post
    pub fn voter_count(&self, post_id: PostId) -> u64 {
        self.state.votes.voter_count(post_id)
    }

    pub fn protocol_fees(&self) -> Amount {
        self.state.treasury.protocol_fees()
    }

    pub fn pending_payout(&self, creator: &Address) -> Amount {
        self.state.treasury.pending_payout(creator)
    }

    /// Value the contract holds for the owner and creators
    pub fn custody_owed(&self) -> Amount {
        self.state
            .treasury
            .protocol_fees()
            .saturating_add(self.state.treasury.total_pending())
    }

    pub fn treasury(&self) -> &TipTreasury {
        &self.state.treasury
    }

    pub fn rewards(&self) -> &RewardCollection {
        &self.state.rewards
    }

    pub fn owner_of(&self, token_id: NftId) -> SonadResult<Address> {
        Ok(self.state.rewards.owner_of(token_id)?)
    }

    pub fn token_uri(&self, token_id: NftId) -> SonadResult<String> {
        Ok(self.state.rewards.token_uri(token_id)?)
    }

    pub fn get_approved(&self, token_id: NftId) -> SonadResult<Option<Address>> {
        Ok(self.state.rewards.get_approved(token_id)?)
    }

    pub fn events(&self) -> &EventLog {
        &self.state.events
    }

    /// Records with sequence number `>= from`
    pub fn events_since(&self, from: u64) -> &[EventRecord] {
        self.state.events.since(from)
    }

    pub fn entropy_source(&self) -> &'static str {
        self.entropy.name()
    }
}

fn transfer_event(transfer: &NftTransfer) -> SonadEvent {
    SonadEvent::Transfer {
        from: transfer.from,
        to: transfer.to,
        token_id: transfer.token_id,
    }
}
