//! Fungible holdings ledger
//!
//! The social-proof ledger only ever *reads* holdings through
//! [`BalanceLedger`]. [`FaucetToken`] is the concrete ledger used in test and
//! demo deployments: a plain fungible token with an owner-gated `mint` and a
//! public `faucet`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use lib_types::{tokens, Address, Amount, DECIMALS};

use crate::errors::{TokenError, TokenResult};

/// Amount minted to the caller by each `faucet` call (100 tokens)
pub const FAUCET_AMOUNT: Amount = tokens(100);

/// Read-only holdings capability the voting gate depends on
pub trait BalanceLedger {
    /// Address this ledger is deployed at
    fn ledger_address(&self) -> Address;

    /// Current balance of `account` (zero when unknown)
    fn balance_of(&self, account: &Address) -> Amount;
}

/// Fungible token with a test faucet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaucetToken {
    /// Deployment address of this token
    address: Address,
    /// Human-readable token name
    name: String,
    /// Token symbol
    symbol: String,
    /// Mint authority
    owner: Address,
    /// Total supply in circulation
    total_supply: Amount,
    /// Account balances
    balances: HashMap<Address, Amount>,
    /// (holder, spender) -> remaining allowance
    allowances: HashMap<(Address, Address), Amount>,
}

impl FaucetToken {
    /// Deploy a new token owned by `owner`
    pub fn new(address: Address, owner: Address) -> Self {
        Self::with_metadata(address, owner, "Mock Monad Token", "MONAD")
    }

    /// Deploy with explicit metadata
    pub fn with_metadata(
        address: Address,
        owner: Address,
        name: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Self {
        Self {
            address,
            name: name.into(),
            symbol: symbol.into(),
            owner,
            total_supply: 0,
            balances: HashMap::new(),
            allowances: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        DECIMALS
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Remaining allowance `spender` may move out of `holder`
    pub fn allowance(&self, holder: &Address, spender: &Address) -> Amount {
        self.allowances.get(&(*holder, *spender)).copied().unwrap_or(0)
    }

    /// Move `amount` from `caller` to `to`
    pub fn transfer(&mut self, caller: &Address, to: &Address, amount: Amount) -> TokenResult<()> {
        self.move_balance(caller, to, amount)
    }

    /// Set the allowance of `spender` over the caller's balance
    pub fn approve(&mut self, caller: &Address, spender: &Address, amount: Amount) -> TokenResult<()> {
        if spender.is_zero() {
            return Err(TokenError::NullAddress);
        }
        self.allowances.insert((*caller, *spender), amount);
        Ok(())
    }

    /// Move `amount` from `from` to `to` on behalf of `caller`, spending allowance
    pub fn transfer_from(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> TokenResult<()> {
        let allowed = self.allowance(from, caller);
        if allowed < amount {
            return Err(TokenError::InsufficientAllowance { have: allowed, need: amount });
        }

        self.move_balance(from, to, amount)?;

        // Allowance only shrinks once the move has committed
        self.allowances.insert((*from, *caller), allowed - amount);
        Ok(())
    }

    /// Owner-only mint
    pub fn mint(&mut self, caller: &Address, to: &Address, amount: Amount) -> TokenResult<()> {
        if caller != &self.owner {
            return Err(TokenError::Unauthorized("only the token owner may mint".to_string()));
        }
        self.mint_unchecked(to, amount)
    }

    /// Mint [`FAUCET_AMOUNT`] to the caller
    pub fn faucet(&mut self, caller: &Address) -> TokenResult<()> {
        self.mint_unchecked(caller, FAUCET_AMOUNT)?;
        tracing::debug!(account = %caller, amount = FAUCET_AMOUNT, "faucet drip");
        Ok(())
    }

    /// Hand the mint authority to `new_owner`
    pub fn transfer_ownership(&mut self, caller: &Address, new_owner: Address) -> TokenResult<()> {
        if caller != &self.owner {
            return Err(TokenError::Unauthorized("only the token owner may transfer ownership".to_string()));
        }
        if new_owner.is_zero() {
            return Err(TokenError::NullAddress);
        }
        self.owner = new_owner;
        Ok(())
    }

    fn mint_unchecked(&mut self, to: &Address, amount: Amount) -> TokenResult<()> {
        if to.is_zero() {
            return Err(TokenError::NullAddress);
        }
        let new_supply = self.total_supply.checked_add(amount).ok_or(TokenError::Overflow)?;
        let new_balance = self.balance_of(to).checked_add(amount).ok_or(TokenError::Overflow)?;

        self.total_supply = new_supply;
        self.balances.insert(*to, new_balance);
        Ok(())
    }

    fn move_balance(&mut self, from: &Address, to: &Address, amount: Amount) -> TokenResult<()> {
        if to.is_zero() {
            return Err(TokenError::NullAddress);
        }
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(TokenError::InsufficientBalance { have: from_balance, need: amount });
        }
        if from == to {
            return Ok(());
        }
        let to_balance = self.balance_of(to).checked_add(amount).ok_or(TokenError::Overflow)?;

        self.balances.insert(*from, from_balance - amount);
        self.balances.insert(*to, to_balance);
        Ok(())
    }
}

impl BalanceLedger for FaucetToken {
    fn ledger_address(&self) -> Address {
        self.address
    }

    fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }
}
