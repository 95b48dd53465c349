use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::interest::AccruedPeriod;
use crate::types::AccountId;

use super::BalanceSnapshot;

/// append-only snapshot sequence for one account.
///
/// entries loaded from the store are the committed prefix; everything
/// appended afterwards is pending until the caller persists it.
#[derive(Debug, Clone)]
pub struct BalanceLedger {
    account_id: AccountId,
    entries: Vec<BalanceSnapshot>,
    committed: usize,
}

impl BalanceLedger {
    /// start a ledger for a freshly opened account
    pub fn open(opening: BalanceSnapshot) -> Self {
        Self {
            account_id: opening.account_id,
            entries: vec![opening],
            committed: 0,
        }
    }

    /// rebuild a ledger from stored history, checking its ordering
    pub fn from_history(account_id: AccountId, history: Vec<BalanceSnapshot>) -> Result<Self> {
        if history.is_empty() {
            return Err(LedgerError::EmptyLedger);
        }

        for pair in history.windows(2) {
            if pair[1].timestamp < pair[0].timestamp {
                return Err(LedgerError::OutOfOrderSnapshot {
                    latest: pair[0].timestamp,
                    attempted: pair[1].timestamp,
                });
            }
        }

        let committed = history.len();
        Ok(Self {
            account_id,
            entries: history,
            committed,
        })
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn latest(&self) -> Result<&BalanceSnapshot> {
        self.entries.last().ok_or(LedgerError::EmptyLedger)
    }

    pub fn opening(&self) -> Result<&BalanceSnapshot> {
        self.entries.first().ok_or(LedgerError::EmptyLedger)
    }

    pub fn entries(&self) -> &[BalanceSnapshot] {
        &self.entries
    }

    /// snapshots appended since the ledger was loaded
    pub fn pending(&self) -> &[BalanceSnapshot] {
        &self.entries[self.committed..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// append a snapshot; timestamps may repeat but never go backwards
    pub fn append(&mut self, snapshot: BalanceSnapshot) -> Result<()> {
        if let Some(latest) = self.entries.last() {
            if snapshot.timestamp < latest.timestamp {
                return Err(LedgerError::OutOfOrderSnapshot {
                    latest: latest.timestamp,
                    attempted: snapshot.timestamp,
                });
            }
        }

        self.entries.push(snapshot);
        Ok(())
    }

    /// record engine output, one snapshot per period end, carrying principal forward
    pub fn apply_accrual(
        &mut self,
        periods: &[AccruedPeriod],
        principal_owed: Money,
        max_credit: Money,
    ) -> Result<()> {
        for period in periods {
            self.append(BalanceSnapshot::new(
                self.account_id,
                period.period_end,
                principal_owed,
                period.interest_owed,
                max_credit,
            ))?;
        }

        Ok(())
    }
}
