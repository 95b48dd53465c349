use crate::decimal::Money;
use crate::errors::{LedgerError, Result, WithdrawalRejection};

/// checks a withdrawal against the credit still available
#[derive(Debug, Clone, Copy, Default)]
pub struct WithdrawalValidator;

impl WithdrawalValidator {
    pub fn new() -> Self {
        Self
    }

    /// available credit left after withdrawing `amount`
    pub fn validate(&self, available_credit: Money, amount: Money) -> Result<Money> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidWithdrawal {
                reason: WithdrawalRejection::NonPositive,
                amount,
            });
        }
        if amount > available_credit {
            return Err(LedgerError::InvalidWithdrawal {
                reason: WithdrawalRejection::ExceedsAvailableCredit,
                amount,
            });
        }

        Ok(available_credit - amount)
    }
}

pub fn validate_withdrawal(available_credit: Money, amount: Money) -> Result<Money> {
    WithdrawalValidator::new().validate(available_credit, amount)
}
