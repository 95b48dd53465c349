use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::AccountId;

/// one immutable point-in-time balance record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub id: Uuid,
    pub account_id: AccountId,
    pub timestamp: DateTime<Utc>,
    pub principal_owed: Money,
    pub interest_owed: Money,
    pub available_credit: Money,
}

impl BalanceSnapshot {
    /// available credit is derived from the limit and what is owed.
    /// callers validate that it stays non-negative before building one
    pub fn new(
        account_id: AccountId,
        timestamp: DateTime<Utc>,
        principal_owed: Money,
        interest_owed: Money,
        max_credit: Money,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            timestamp,
            principal_owed,
            interest_owed,
            available_credit: max_credit - (principal_owed + interest_owed),
        }
    }

    /// zero balance snapshot recorded when an account opens
    pub fn opening(account_id: AccountId, time_opened: DateTime<Utc>, max_credit: Money) -> Self {
        Self::new(account_id, time_opened, Money::ZERO, Money::ZERO, max_credit)
    }

    pub fn total_owed(&self) -> Money {
        self.principal_owed + self.interest_owed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_available_credit_is_derived() {
        let at = Utc.with_ymd_and_hms(2017, 10, 1, 0, 0, 0).unwrap();
        let snapshot = BalanceSnapshot::new(
            Uuid::new_v4(),
            at,
            Money::from_minor(700),
            Money::from_minor(50),
            Money::from_minor(1_000),
        );

        assert_eq!(snapshot.available_credit, Money::from_minor(250));
        assert_eq!(snapshot.total_owed(), Money::from_minor(750));
    }

    #[test]
    fn test_opening_snapshot() {
        let at = Utc.with_ymd_and_hms(2017, 10, 1, 0, 0, 0).unwrap();
        let snapshot = BalanceSnapshot::opening(Uuid::new_v4(), at, Money::from_minor(1_000));

        assert_eq!(snapshot.principal_owed, Money::ZERO);
        assert_eq!(snapshot.interest_owed, Money::ZERO);
        assert_eq!(snapshot.available_credit, Money::from_minor(1_000));
    }
}
