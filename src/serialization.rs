/// serialization support for accounts
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::ledger::BalanceSnapshot;
use crate::types::{Account, AccountId, CustomerId, PaymentRecord, WithdrawalRecord};

/// account with its current balances, using the api's field names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    #[serde(rename = "accountUUID")]
    pub account_id: AccountId,
    #[serde(rename = "customerUUID")]
    pub customer_id: CustomerId,
    pub apr: Rate,
    pub max_credit: Money,
    pub time_opened: DateTime<Utc>,
    pub available_credit: Money,
    pub principal_owed: Money,
    pub interest_owed: Money,
}

impl AccountView {
    pub fn new(account: &Account, latest: &BalanceSnapshot) -> Self {
        AccountView {
            account_id: account.id,
            customer_id: account.customer_id,
            apr: account.apr,
            max_credit: account.max_credit,
            time_opened: account.time_opened,
            available_credit: latest.available_credit,
            principal_owed: latest.principal_owed,
            interest_owed: latest.interest_owed,
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// full history of an account for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub account: Account,
    pub snapshots: Vec<BalanceSnapshot>,
    pub payments: Vec<PaymentRecord>,
    pub withdrawals: Vec<WithdrawalRecord>,
}

impl Statement {
    pub fn total_paid(&self) -> Money {
        self.payments.iter().map(|p| p.amount).sum()
    }

    pub fn total_withdrawn(&self) -> Money {
        self.withdrawals.iter().map(|w| w.amount).sum()
    }

    pub fn latest(&self) -> Option<&BalanceSnapshot> {
        self.snapshots.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    #[test]
    fn test_view_uses_wire_field_names() {
        let opened = Utc.with_ymd_and_hms(2017, 10, 1, 0, 0, 0).unwrap();
        let account = Account::new(
            Uuid::new_v4(),
            Rate::from_percentage(35),
            Money::from_minor(100_000_000_000),
            opened,
        );
        let latest = BalanceSnapshot::new(
            account.id,
            opened,
            Money::from_minor(50_000_000_000),
            Money::from_minor(1_438_356_164),
            account.max_credit,
        );

        let view = AccountView::new(&account, &latest);
        let json: serde_json::Value = serde_json::to_value(&view).unwrap();

        assert_eq!(json["accountUUID"], serde_json::json!(account.id.to_string()));
        assert_eq!(json["customerUUID"], serde_json::json!(account.customer_id.to_string()));
        assert_eq!(json["maxCredit"], serde_json::json!(100_000_000_000_i64));
        assert_eq!(json["principalOwed"], serde_json::json!(50_000_000_000_i64));
        assert_eq!(json["interestOwed"], serde_json::json!(1_438_356_164_i64));
        assert_eq!(json["availableCredit"], serde_json::json!(48_561_643_836_i64));
        assert!(json.get("apr").is_some());
        assert!(json.get("timeOpened").is_some());

        let back: AccountView = serde_json::from_value(json).unwrap();
        assert_eq!(back, view);
    }
}
