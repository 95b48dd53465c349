use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decimal::Money;

/// why a payment was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentRejection {
    NonPositive,
    ExceedsBalance,
}

impl fmt::Display for PaymentRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentRejection::NonPositive => write!(f, "non_positive"),
            PaymentRejection::ExceedsBalance => write!(f, "exceeds_balance"),
        }
    }
}

/// why a withdrawal was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalRejection {
    NonPositive,
    ExceedsAvailableCredit,
}

impl fmt::Display for WithdrawalRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WithdrawalRejection::NonPositive => write!(f, "non_positive"),
            WithdrawalRejection::ExceedsAvailableCredit => write!(f, "exceeds_available_credit"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("{entity} not found: {id}")]
    NotFound {
        entity: &'static str,
        id: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("invalid payment ({reason}): {amount}")]
    InvalidPayment {
        reason: PaymentRejection,
        amount: Money,
    },

    #[error("invalid withdrawal ({reason}): {amount}")]
    InvalidWithdrawal {
        reason: WithdrawalRejection,
        amount: Money,
    },

    #[error("snapshot out of order: latest {latest}, attempted {attempted}")]
    OutOfOrderSnapshot {
        latest: DateTime<Utc>,
        attempted: DateTime<Utc>,
    },

    #[error("ledger has no snapshots")]
    EmptyLedger,

    #[error("calculation error: {message}")]
    CalculationError {
        message: String,
    },

    #[error("store error: {message}")]
    Store {
        message: String,
    },
}

impl LedgerError {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        LedgerError::InvalidConfiguration {
            message: message.into(),
        }
    }

    pub(crate) fn account_not_found(id: impl fmt::Display) -> Self {
        LedgerError::NotFound {
            entity: "account",
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
