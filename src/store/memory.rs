//! In-memory store, used by tests and demos.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::errors::{LedgerError, Result};
use crate::ledger::BalanceSnapshot;
use crate::types::{Account, AccountId, Activity, PaymentRecord, WithdrawalRecord};

use super::{AccountStore, LedgerBatch, LedgerStore};

#[derive(Debug, Default)]
struct AccountData {
    account: Option<Account>,
    snapshots: Vec<BalanceSnapshot>,
    payments: Vec<PaymentRecord>,
    withdrawals: Vec<WithdrawalRecord>,
}

/// keeps every account behind one lock so a batch lands all at once
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: Mutex<HashMap<AccountId, AccountData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<AccountId, AccountData>>> {
        self.accounts.lock().map_err(|_| LedgerError::Store {
            message: "memory store lock poisoned".to_string(),
        })
    }

    pub fn account_count(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }
}

impl AccountStore for MemoryStore {
    fn load(&self, account_id: AccountId) -> Result<Account> {
        self.lock()?
            .get(&account_id)
            .and_then(|data| data.account.clone())
            .ok_or_else(|| LedgerError::account_not_found(account_id))
    }

    fn create(&self, account: &Account, opening: &BalanceSnapshot) -> Result<()> {
        let mut accounts = self.lock()?;
        if accounts.contains_key(&account.id) {
            return Err(LedgerError::Store {
                message: format!("account {} already exists", account.id),
            });
        }

        accounts.insert(
            account.id,
            AccountData {
                account: Some(account.clone()),
                snapshots: vec![opening.clone()],
                ..AccountData::default()
            },
        );
        Ok(())
    }

    fn delete(&self, account_id: AccountId) -> Result<()> {
        self.lock()?
            .remove(&account_id)
            .map(|_| ())
            .ok_or_else(|| LedgerError::account_not_found(account_id))
    }
}

impl LedgerStore for MemoryStore {
    fn load(&self, account_id: AccountId) -> Result<Vec<BalanceSnapshot>> {
        self.lock()?
            .get(&account_id)
            .map(|data| data.snapshots.clone())
            .ok_or_else(|| LedgerError::account_not_found(account_id))
    }

    fn append_all(&self, account_id: AccountId, batch: &LedgerBatch) -> Result<()> {
        let mut accounts = self.lock()?;
        let data = accounts
            .get_mut(&account_id)
            .ok_or_else(|| LedgerError::account_not_found(account_id))?;

        // validate the whole batch before touching anything
        let mut latest = data.snapshots.last().map(|s| s.timestamp);
        for snapshot in &batch.snapshots {
            if let Some(previous) = latest {
                if snapshot.timestamp < previous {
                    return Err(LedgerError::OutOfOrderSnapshot {
                        latest: previous,
                        attempted: snapshot.timestamp,
                    });
                }
            }
            latest = Some(snapshot.timestamp);
        }

        data.snapshots.extend(batch.snapshots.iter().cloned());
        match &batch.activity {
            Some(Activity::Payment(record)) => data.payments.push(record.clone()),
            Some(Activity::Withdrawal(record)) => data.withdrawals.push(record.clone()),
            None => {}
        }
        Ok(())
    }

    fn payments(&self, account_id: AccountId) -> Result<Vec<PaymentRecord>> {
        self.lock()?
            .get(&account_id)
            .map(|data| data.payments.clone())
            .ok_or_else(|| LedgerError::account_not_found(account_id))
    }

    fn withdrawals(&self, account_id: AccountId) -> Result<Vec<WithdrawalRecord>> {
        self.lock()?
            .get(&account_id)
            .map(|data| data.withdrawals.clone())
            .ok_or_else(|| LedgerError::account_not_found(account_id))
    }
}
