use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};

/// unique identifier for a credit account
pub type AccountId = Uuid;

/// unique identifier for the customer holding an account
pub type CustomerId = Uuid;

/// a revolving credit line. immutable once opened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub customer_id: CustomerId,
    pub apr: Rate,
    pub max_credit: Money,
    pub time_opened: DateTime<Utc>,
}

impl Account {
    pub fn new(
        customer_id: CustomerId,
        apr: Rate,
        max_credit: Money,
        time_opened: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id,
            apr,
            max_credit,
            time_opened,
        }
    }
}

/// audit record of a payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub account_id: AccountId,
    pub amount: Money,
    pub time: DateTime<Utc>,
}

impl PaymentRecord {
    pub fn new(account_id: AccountId, amount: Money, time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            amount,
            time,
        }
    }
}

/// audit record of a withdrawal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRecord {
    pub id: Uuid,
    pub account_id: AccountId,
    pub amount: Money,
    pub time: DateTime<Utc>,
}

impl WithdrawalRecord {
    pub fn new(account_id: AccountId, amount: Money, time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            amount,
            time,
        }
    }
}

/// account activity committed alongside ledger snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activity {
    Payment(PaymentRecord),
    Withdrawal(WithdrawalRecord),
}

impl Activity {
    pub fn amount(&self) -> Money {
        match self {
            Activity::Payment(record) => record.amount,
            Activity::Withdrawal(record) => record.amount,
        }
    }

    pub fn time(&self) -> DateTime<Utc> {
        match self {
            Activity::Payment(record) => record.time,
            Activity::Withdrawal(record) => record.time,
        }
    }
}
