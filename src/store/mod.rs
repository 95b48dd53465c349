pub mod memory;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::ledger::BalanceSnapshot;
use crate::types::{Account, AccountId, Activity, PaymentRecord, WithdrawalRecord};

pub use memory::MemoryStore;

/// everything one account operation writes, committed as a unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerBatch {
    pub snapshots: Vec<BalanceSnapshot>,
    pub activity: Option<Activity>,
}

impl LedgerBatch {
    pub fn new(snapshots: Vec<BalanceSnapshot>, activity: Option<Activity>) -> Self {
        Self { snapshots, activity }
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty() && self.activity.is_none()
    }
}

/// persistence for account definitions
pub trait AccountStore: Send + Sync {
    /// fails `NotFound` if the account does not exist
    fn load(&self, account_id: AccountId) -> Result<Account>;

    /// store a new account together with its opening snapshot
    fn create(&self, account: &Account, opening: &BalanceSnapshot) -> Result<()>;

    /// remove an account with all of its snapshots and activity records
    fn delete(&self, account_id: AccountId) -> Result<()>;
}

/// persistence for the append-only balance history and audit records
pub trait LedgerStore: Send + Sync {
    /// snapshots ordered by timestamp, opening snapshot first
    fn load(&self, account_id: AccountId) -> Result<Vec<BalanceSnapshot>>;

    /// append the batch atomically: either all of it is stored or none of it
    fn append_all(&self, account_id: AccountId, batch: &LedgerBatch) -> Result<()>;

    fn payments(&self, account_id: AccountId) -> Result<Vec<PaymentRecord>>;

    fn withdrawals(&self, account_id: AccountId) -> Result<Vec<WithdrawalRecord>>;
}
