//! Single-owner access guard
//!
//! Exactly one owner at a time. Renouncing hands ownership to the null
//! identity, after which no owner-gated call can ever succeed again.

use serde::{Deserialize, Serialize};

use lib_types::Address;

use crate::errors::{SonadError, SonadResult};
use crate::events::SonadEvent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownable {
    owner: Address,
}

impl Ownable {
    pub fn new(owner: Address) -> Self {
        Self { owner }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn is_renounced(&self) -> bool {
        self.owner.is_zero()
    }

    /// Fail unless `caller` is the live owner
    ///
    /// A renounced guard rejects everyone, including a caller that presents
    /// the null identity.
    pub fn require_owner(&self, caller: &Address) -> SonadResult<()> {
        if self.owner.is_zero() || caller != &self.owner {
            tracing::warn!(caller = %caller, "owner-gated call rejected");
            return Err(SonadError::Unauthorized(format!("{} is not the owner", caller)));
        }
        Ok(())
    }

    pub fn transfer_ownership(&mut self, caller: &Address, new_owner: Address) -> SonadResult<SonadEvent> {
        self.require_owner(caller)?;
        if new_owner.is_zero() {
            return Err(SonadError::InvalidArgument(
                "new owner is the null identity; use renounce_ownership".to_string(),
            ));
        }

        let previous_owner = self.owner;
        self.owner = new_owner;
        tracing::info!(previous = %previous_owner, new = %new_owner, "ownership transferred");

        Ok(SonadEvent::OwnershipTransferred { previous_owner, new_owner })
    }

    pub fn renounce_ownership(&mut self, caller: &Address) -> SonadResult<SonadEvent> {
        self.require_owner(caller)?;

        let previous_owner = self.owner;
        self.owner = Address::NULL;
        tracing::info!(previous = %previous_owner, "ownership renounced");

        Ok(SonadEvent::OwnershipTransferred {
            previous_owner,
            new_owner: Address::NULL,
        })
    }
}
