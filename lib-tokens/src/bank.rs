//! Native value settlement
//!
//! Tips and fee withdrawals move native value, not the holdings token.
//! [`ValueBank::settle`] is the only way value moves: a batch of legs is
//! validated against staged balances and committed as a whole, or not at all.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use lib_types::{Address, Amount};

use crate::errors::{TokenError, TokenResult};

/// One leg of a settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueTransfer {
    pub from: Address,
    pub to: Address,
    pub amount: Amount,
}

impl ValueTransfer {
    pub fn new(from: Address, to: Address, amount: Amount) -> Self {
        Self { from, to, amount }
    }
}

/// Native value capability used by the tip and payout engine
pub trait ValueBank {
    /// Spendable native balance of `account`
    fn balance(&self, account: &Address) -> Amount;

    /// Apply every leg or none of them
    ///
    /// Legs are applied in order against staged balances, so a later leg may
    /// spend value credited by an earlier one. Zero-amount legs are skipped.
    fn settle(&mut self, legs: &[ValueTransfer]) -> TokenResult<()>;
}

/// In-memory native value ledger
///
/// Accounts marked with [`NativeBank::set_rejecting`] refuse incoming value,
/// the way a contract without a payable fallback would.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NativeBank {
    balances: HashMap<Address, Amount>,
    rejecting: HashSet<Address>,
}

impl NativeBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit value from outside the ledger (genesis allocation, bridge-in)
    pub fn deposit(&mut self, account: Address, amount: Amount) -> TokenResult<()> {
        if account.is_zero() {
            return Err(TokenError::NullAddress);
        }
        if amount == 0 {
            return Err(TokenError::ZeroAmount);
        }
        let balance = self.balance(&account).checked_add(amount).ok_or(TokenError::Overflow)?;
        self.balances.insert(account, balance);
        Ok(())
    }

    /// Make `account` refuse (or accept again) incoming value
    pub fn set_rejecting(&mut self, account: Address, rejecting: bool) {
        if rejecting {
            self.rejecting.insert(account);
        } else {
            self.rejecting.remove(&account);
        }
    }

    /// Sum of all balances held by the bank
    pub fn total_value(&self) -> Amount {
        self.balances.values().fold(0, |acc, v| acc.saturating_add(*v))
    }
}

impl ValueBank for NativeBank {
    fn balance(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn settle(&mut self, legs: &[ValueTransfer]) -> TokenResult<()> {
        // === VALIDATION PHASE (staged, nothing committed) ===
        let mut staged: HashMap<Address, Amount> = HashMap::new();

        for leg in legs.iter().filter(|l| l.amount > 0) {
            if leg.to.is_zero() {
                return Err(TokenError::NullAddress);
            }
            if self.rejecting.contains(&leg.to) {
                return Err(TokenError::RecipientRejected(leg.to));
            }

            let from_balance = match staged.get(&leg.from) {
                Some(b) => *b,
                None => self.balance(&leg.from),
            };
            if from_balance < leg.amount {
                return Err(TokenError::InsufficientBalance { have: from_balance, need: leg.amount });
            }
            staged.insert(leg.from, from_balance - leg.amount);

            let to_balance = match staged.get(&leg.to) {
                Some(b) => *b,
                None => self.balance(&leg.to),
            };
            let to_balance = to_balance.checked_add(leg.amount).ok_or(TokenError::Overflow)?;
            staged.insert(leg.to, to_balance);
        }

        // === COMMIT PHASE ===
        for (account, balance) in staged {
            self.balances.insert(account, balance);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(id: u8) -> Address {
        Address::new([id; 32])
    }

    #[test]
    fn test_settle_moves_value() {
        let mut bank = NativeBank::new();
        bank.deposit(addr(1), 100).unwrap();

        bank.settle(&[
            ValueTransfer::new(addr(1), addr(2), 90),
            ValueTransfer::new(addr(1), addr(3), 10),
        ])
        .unwrap();

        assert_eq!(bank.balance(&addr(1)), 0);
        assert_eq!(bank.balance(&addr(2)), 90);
        assert_eq!(bank.balance(&addr(3)), 10);
        assert_eq!(bank.total_value(), 100);
    }

    #[test]
    fn test_settle_is_all_or_nothing() {
        let mut bank = NativeBank::new();
        bank.deposit(addr(1), 100).unwrap();
        bank.set_rejecting(addr(3), true);

        let result = bank.settle(&[
            ValueTransfer::new(addr(1), addr(2), 90),
            ValueTransfer::new(addr(1), addr(3), 10),
        ]);

        assert_eq!(result, Err(TokenError::RecipientRejected(addr(3))));
        assert_eq!(bank.balance(&addr(1)), 100);
        assert_eq!(bank.balance(&addr(2)), 0);
    }

    #[test]
    fn test_settle_checks_cumulative_balance() {
        let mut bank = NativeBank::new();
        bank.deposit(addr(1), 50).unwrap();

        let result = bank.settle(&[
            ValueTransfer::new(addr(1), addr(2), 40),
            ValueTransfer::new(addr(1), addr(3), 40),
        ]);

        assert_eq!(result, Err(TokenError::InsufficientBalance { have: 10, need: 40 }));
        assert_eq!(bank.balance(&addr(1)), 50);
    }

    #[test]
    fn test_later_leg_spends_earlier_credit() {
        let mut bank = NativeBank::new();
        bank.deposit(addr(1), 10).unwrap();

        bank.settle(&[
            ValueTransfer::new(addr(1), addr(2), 10),
            ValueTransfer::new(addr(2), addr(3), 7),
        ])
        .unwrap();

        assert_eq!(bank.balance(&addr(2)), 3);
        assert_eq!(bank.balance(&addr(3)), 7);
    }

    #[test]
    fn test_deposit_validation() {
        let mut bank = NativeBank::new();
        assert_eq!(bank.deposit(Address::NULL, 5), Err(TokenError::NullAddress));
        assert_eq!(bank.deposit(addr(1), 0), Err(TokenError::ZeroAmount));
        assert_eq!(bank.total_value(), 0);
    }

    #[test]
    fn test_zero_legs_skipped() {
        let mut bank = NativeBank::new();
        bank.set_rejecting(addr(2), true);
        bank.settle(&[ValueTransfer::new(addr(1), addr(2), 0)]).unwrap();
        assert_eq!(bank.total_value(), 0);
    }

    #[test]
    fn test_rejecting_can_be_lifted() {
        let mut bank = NativeBank::new();
        bank.deposit(addr(1), 5).unwrap();
        bank.set_rejecting(addr(2), true);
        assert!(bank.settle(&[ValueTransfer::new(addr(1), addr(2), 5)]).is_err());

        bank.set_rejecting(addr(2), false);
        bank.settle(&[ValueTransfer::new(addr(1), addr(2), 5)]).unwrap();
        assert_eq!(bank.balance(&addr(2)), 5);
    }
}
