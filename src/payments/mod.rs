pub mod waterfall;
pub mod withdrawal;

use serde::{Deserialize, Serialize};

use crate::decimal::Money;

pub use waterfall::{allocate_payment, PaymentAllocator};
pub use withdrawal::{validate_withdrawal, WithdrawalValidator};

/// balances after a payment and how the payment was split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentAllocation {
    pub principal_owed: Money,
    pub interest_owed: Money,
    pub applied_to_interest: Money,
    pub applied_to_principal: Money,
}

impl PaymentAllocation {
    /// (principal, interest) after the payment
    pub fn balances(&self) -> (Money, Money) {
        (self.principal_owed, self.interest_owed)
    }

    pub fn total_owed(&self) -> Money {
        self.principal_owed + self.interest_owed
    }

    pub fn total_applied(&self) -> Money {
        self.applied_to_interest + self.applied_to_principal
    }
}
