//! Reward token registry
//!
//! Minimal non-fungible collection: single owner per token, per-token
//! approval and per-holder operators. Tokens are never burned and ids are
//! allocated strictly upward from the configured base.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use lib_types::{Address, NftId};

use crate::errors::{TokenError, TokenResult};

/// Ownership change of a single reward token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftTransfer {
    /// `None` for a mint
    pub from: Option<Address>,
    pub to: Address,
    pub token_id: NftId,
}

/// Non-fungible reward collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardCollection {
    name: String,
    symbol: String,
    /// Prefix for `token_uri`; empty means no URI
    base_uri: String,
    /// Next id to hand out; never decreases
    next_token_id: NftId,
    owners: HashMap<NftId, Address>,
    /// Tokens held per account
    holdings: HashMap<Address, u64>,
    /// Single approved spender per token, cleared on transfer
    token_approvals: HashMap<NftId, Address>,
    /// (holder, operator) pairs allowed to move any of holder's tokens
    operators: HashSet<(Address, Address)>,
}

impl RewardCollection {
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        base_token_id: NftId,
        base_uri: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            base_uri: base_uri.into(),
            next_token_id: base_token_id,
            owners: HashMap::new(),
            holdings: HashMap::new(),
            token_approvals: HashMap::new(),
            operators: HashSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn next_token_id(&self) -> NftId {
        self.next_token_id
    }

    /// Number of tokens ever minted
    pub fn total_minted(&self) -> u64 {
        self.owners.len() as u64
    }

    pub fn owner_of(&self, token_id: NftId) -> TokenResult<Address> {
        self.owners
            .get(&token_id)
            .copied()
            .ok_or(TokenError::TokenNotFound(token_id))
    }

    /// Number of tokens held by `account`
    pub fn balance_of(&self, account: &Address) -> u64 {
        self.holdings.get(account).copied().unwrap_or(0)
    }

    pub fn get_approved(&self, token_id: NftId) -> TokenResult<Option<Address>> {
        self.owner_of(token_id)?;
        Ok(self.token_approvals.get(&token_id).copied())
    }

    pub fn is_approved_for_all(&self, holder: &Address, operator: &Address) -> bool {
        self.operators.contains(&(*holder, *operator))
    }

    pub fn token_uri(&self, token_id: NftId) -> TokenResult<String> {
        self.owner_of(token_id)?;
        if self.base_uri.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("{}{}", self.base_uri, token_id))
    }

    /// Issue the next token id to `to`
    ///
    /// The id counter advances before anything else can fail afterwards, so
    /// an id is never handed out twice.
    pub fn mint(&mut self, to: &Address) -> TokenResult<NftTransfer> {
        let (following, held) = self.next_mint(to)?;
        let token_id = self.next_token_id;

        self.next_token_id = following;
        self.owners.insert(token_id, *to);
        self.holdings.insert(*to, held);

        Ok(NftTransfer { from: None, to: *to, token_id })
    }

    /// Fail exactly when [`Self::mint`] to `to` would fail
    pub fn ensure_mintable(&self, to: &Address) -> TokenResult<()> {
        self.next_mint(to).map(|_| ())
    }

    fn next_mint(&self, to: &Address) -> TokenResult<(NftId, u64)> {
        if to.is_zero() {
            return Err(TokenError::NullAddress);
        }
        let following = self.next_token_id.checked_add(1).ok_or(TokenError::Overflow)?;
        let held = self.balance_of(to).checked_add(1).ok_or(TokenError::Overflow)?;
        Ok((following, held))
    }

    /// Approve `spender` for one token; caller must be the holder or an operator
    ///
    /// Passing the null address clears the approval.
    pub fn approve(&mut self, caller: &Address, spender: &Address, token_id: NftId) -> TokenResult<Address> {
        let holder = self.owner_of(token_id)?;
        if caller != &holder && !self.is_approved_for_all(&holder, caller) {
            return Err(TokenError::Unauthorized(format!(
                "{} may not approve token {}",
                caller, token_id
            )));
        }

        if spender.is_zero() {
            self.token_approvals.remove(&token_id);
        } else {
            self.token_approvals.insert(token_id, *spender);
        }
        Ok(holder)
    }

    pub fn set_approval_for_all(&mut self, caller: &Address, operator: &Address, approved: bool) -> TokenResult<()> {
        if operator.is_zero() {
            return Err(TokenError::NullAddress);
        }
        if approved {
            self.operators.insert((*caller, *operator));
        } else {
            self.operators.remove(&(*caller, *operator));
        }
        Ok(())
    }

    /// Move a token; caller must be holder, approved spender or operator
    pub fn transfer_from(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        token_id: NftId,
    ) -> TokenResult<NftTransfer> {
        let holder = self.owner_of(token_id)?;
        if &holder != from {
            return Err(TokenError::Unauthorized(format!(
                "token {} is not held by {}",
                token_id, from
            )));
        }
        if to.is_zero() {
            return Err(TokenError::NullAddress);
        }
        let authorized = caller == &holder
            || self.token_approvals.get(&token_id) == Some(caller)
            || self.is_approved_for_all(&holder, caller);
        if !authorized {
            return Err(TokenError::Unauthorized(format!(
                "{} may not move token {}",
                caller, token_id
            )));
        }

        if from != to {
            let to_held = self.balance_of(to).checked_add(1).ok_or(TokenError::Overflow)?;
            let from_held = self.balance_of(from).saturating_sub(1);
            self.holdings.insert(*from, from_held);
            self.holdings.insert(*to, to_held);
        }
        self.owners.insert(token_id, *to);
        self.token_approvals.remove(&token_id);

        Ok(NftTransfer { from: Some(*from), to: *to, token_id })
    }
}
