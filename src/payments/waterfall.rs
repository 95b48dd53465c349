use crate::decimal::Money;
use crate::errors::{LedgerError, PaymentRejection, Result};

use super::PaymentAllocation;

/// order in which a payment is applied to what is owed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BalanceComponent {
    Interest,
    Principal,
}

const INTEREST_FIRST: [BalanceComponent; 2] = [BalanceComponent::Interest, BalanceComponent::Principal];

/// splits payments between interest and principal, interest first
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentAllocator;

impl PaymentAllocator {
    pub fn new() -> Self {
        Self
    }

    /// apply `payment` against the current balances.
    ///
    /// the payment must be positive and no larger than everything owed;
    /// the split is exact and nothing is left over.
    pub fn allocate(
        &self,
        principal_owed: Money,
        interest_owed: Money,
        payment: Money,
    ) -> Result<PaymentAllocation> {
        if !payment.is_positive() {
            return Err(LedgerError::InvalidPayment {
                reason: PaymentRejection::NonPositive,
                amount: payment,
            });
        }
        if payment > principal_owed + interest_owed {
            return Err(LedgerError::InvalidPayment {
                reason: PaymentRejection::ExceedsBalance,
                amount: payment,
            });
        }

        let mut allocation = PaymentAllocation {
            principal_owed,
            interest_owed,
            applied_to_interest: Money::ZERO,
            applied_to_principal: Money::ZERO,
        };

        let mut remaining = payment;
        for component in INTEREST_FIRST {
            remaining = apply_to_component(component, remaining, &mut allocation);
            if remaining.is_zero() {
                break;
            }
        }

        Ok(allocation)
    }
}

fn apply_to_component(
    component: BalanceComponent,
    available: Money,
    allocation: &mut PaymentAllocation,
) -> Money {
    let (balance, applied) = match component {
        BalanceComponent::Interest => (&mut allocation.interest_owed, &mut allocation.applied_to_interest),
        BalanceComponent::Principal => (&mut allocation.principal_owed, &mut allocation.applied_to_principal),
    };

    let payment = available.min(*balance);
    *balance -= payment;
    *applied = payment;

    available - payment
}

/// apply a payment with the interest-first allocator
pub fn allocate_payment(
    principal_owed: Money,
    interest_owed: Money,
    payment: Money,
) -> Result<PaymentAllocation> {
    PaymentAllocator::new().allocate(principal_owed, interest_owed, payment)
}
