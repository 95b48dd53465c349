use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use tracing::{info, warn};

use crate::config::LedgerConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::interest::AccrualEngine;
use crate::ledger::{BalanceLedger, BalanceSnapshot};
use crate::payments::{PaymentAllocator, WithdrawalValidator};
use crate::serialization::{AccountView, Statement};
use crate::store::{AccountStore, LedgerBatch, LedgerStore};
use crate::types::{Account, AccountId, Activity, CustomerId, PaymentRecord, WithdrawalRecord};

/// Runs account operations against the stores, one writer per account.
///
/// Every operation first brings the ledger current to its timestamp, then
/// applies its own change, then commits all new snapshots and the audit
/// record in a single batch. Operations on different accounts do not block
/// each other.
pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
    ledger: Arc<dyn LedgerStore>,
    engine: AccrualEngine,
    allocator: PaymentAllocator,
    validator: WithdrawalValidator,
    locks: Mutex<HashMap<AccountId, Arc<Mutex<()>>>>,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountStore>, ledger: Arc<dyn LedgerStore>) -> Self {
        Self::build(accounts, ledger, &LedgerConfig::default())
    }

    pub fn with_config(
        accounts: Arc<dyn AccountStore>,
        ledger: Arc<dyn LedgerStore>,
        config: &LedgerConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(accounts, ledger, config))
    }

    fn build(
        accounts: Arc<dyn AccountStore>,
        ledger: Arc<dyn LedgerStore>,
        config: &LedgerConfig,
    ) -> Self {
        Self {
            accounts,
            ledger,
            engine: AccrualEngine::from_config(config),
            allocator: PaymentAllocator::new(),
            validator: WithdrawalValidator::new(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// open a credit line with a zero opening balance
    pub fn open_account(
        &self,
        customer_id: CustomerId,
        apr: Rate,
        max_credit: Money,
        opened_at: DateTime<Utc>,
    ) -> Result<AccountView> {
        if apr.is_negative() {
            return Err(LedgerError::invalid_config(format!("apr must not be negative, got {}", apr)));
        }
        if max_credit.is_negative() {
            return Err(LedgerError::invalid_config(format!(
                "max credit must not be negative, got {}",
                max_credit
            )));
        }

        let account = Account::new(customer_id, apr, max_credit, opened_at);
        let opening = BalanceSnapshot::opening(account.id, opened_at, max_credit);
        self.accounts.create(&account, &opening)?;

        info!(
            account_id = %account.id,
            customer_id = %customer_id,
            apr = %apr,
            max_credit = %max_credit,
            "opened credit account"
        );

        Ok(AccountView::new(&account, &opening))
    }

    /// open a credit line at the provider's current time
    pub fn open_account_now(
        &self,
        customer_id: CustomerId,
        apr: Rate,
        max_credit: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<AccountView> {
        self.open_account(customer_id, apr, max_credit, time_provider.now())
    }

    /// bring the ledger current as of `as_of` and return the latest snapshot
    pub fn get(&self, account_id: AccountId, as_of: DateTime<Utc>) -> Result<BalanceSnapshot> {
        self.transact(account_id, as_of, "accrue", |_, _| Ok(None))
            .map(|(_, latest)| latest)
    }

    pub fn get_now(&self, account_id: AccountId, time_provider: &SafeTimeProvider) -> Result<BalanceSnapshot> {
        self.get(account_id, time_provider.now())
    }

    /// like `get`, returning the account view
    pub fn view(&self, account_id: AccountId, as_of: DateTime<Utc>) -> Result<AccountView> {
        self.transact(account_id, as_of, "accrue", |_, _| Ok(None))
            .map(|(account, latest)| AccountView::new(&account, &latest))
    }

    pub fn view_now(&self, account_id: AccountId, time_provider: &SafeTimeProvider) -> Result<AccountView> {
        self.view(account_id, time_provider.now())
    }

    /// accrue to `at`, then apply a payment interest first
    pub fn pay(&self, account_id: AccountId, amount: Money, at: DateTime<Utc>) -> Result<BalanceSnapshot> {
        self.transact(account_id, at, "payment", |account, ledger| {
            let latest = ledger.latest()?;
            let allocation = self
                .allocator
                .allocate(latest.principal_owed, latest.interest_owed, amount)
                .map_err(|e| {
                    warn!(account_id = %account.id, amount = %amount, error = %e, "payment rejected");
                    e
                })?;

            ledger.append(BalanceSnapshot::new(
                account.id,
                at,
                allocation.principal_owed,
                allocation.interest_owed,
                account.max_credit,
            ))?;

            info!(
                account_id = %account.id,
                amount = %amount,
                to_interest = %allocation.applied_to_interest,
                to_principal = %allocation.applied_to_principal,
                "payment applied"
            );

            Ok(Some(Activity::Payment(PaymentRecord::new(account.id, amount, at))))
        })
        .map(|(_, latest)| latest)
    }

    pub fn pay_now(
        &self,
        account_id: AccountId,
        amount: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<BalanceSnapshot> {
        self.pay(account_id, amount, time_provider.now())
    }

    /// accrue to `at`, then draw `amount` against available credit
    pub fn withdraw(&self, account_id: AccountId, amount: Money, at: DateTime<Utc>) -> Result<BalanceSnapshot> {
        self.transact(account_id, at, "withdrawal", |account, ledger| {
            let latest = ledger.latest()?;
            let remaining = self
                .validator
                .validate(latest.available_credit, amount)
                .map_err(|e| {
                    warn!(account_id = %account.id, amount = %amount, error = %e, "withdrawal rejected");
                    e
                })?;

            let snapshot = BalanceSnapshot::new(
                account.id,
                at,
                latest.principal_owed + amount,
                latest.interest_owed,
                account.max_credit,
            );
            debug_assert_eq!(snapshot.available_credit, remaining);
            ledger.append(snapshot)?;

            info!(
                account_id = %account.id,
                amount = %amount,
                available_credit = %remaining,
                "withdrawal applied"
            );

            Ok(Some(Activity::Withdrawal(WithdrawalRecord::new(account.id, amount, at))))
        })
        .map(|(_, latest)| latest)
    }

    pub fn withdraw_now(
        &self,
        account_id: AccountId,
        amount: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<BalanceSnapshot> {
        self.withdraw(account_id, amount, time_provider.now())
    }

    /// stored history of an account, without accruing
    pub fn statement(&self, account_id: AccountId) -> Result<Statement> {
        let lock = self.account_lock(account_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        Ok(Statement {
            account: self.load_account(account_id)?,
            snapshots: self.ledger.load(account_id)?,
            payments: self.ledger.payments(account_id)?,
            withdrawals: self.ledger.withdrawals(account_id)?,
        })
    }

    /// delete an account and everything recorded against it
    pub fn delete_account(&self, account_id: AccountId) -> Result<()> {
        let lock = self.account_lock(account_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        self.accounts
            .delete(account_id)
            .map_err(|e| self.forget_unknown(account_id, e))?;
        self.release_lock(account_id);

        info!(account_id = %account_id, "deleted credit account");
        Ok(())
    }

    fn account_lock(&self, account_id: AccountId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(account_id).or_default().clone()
    }

    fn release_lock(&self, account_id: AccountId) {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&account_id);
    }

    /// unknown ids must not leave a lock entry behind
    fn forget_unknown(&self, account_id: AccountId, err: LedgerError) -> LedgerError {
        if matches!(err, LedgerError::NotFound { .. }) {
            self.release_lock(account_id);
        }
        err
    }

    fn load_account(&self, account_id: AccountId) -> Result<Account> {
        self.accounts
            .load(account_id)
            .map_err(|e| self.forget_unknown(account_id, e))
    }

    /// load, accrue to `at`, apply `mutate`, and commit everything new at once
    fn transact<F>(
        &self,
        account_id: AccountId,
        at: DateTime<Utc>,
        operation: &'static str,
        mutate: F,
    ) -> Result<(Account, BalanceSnapshot)>
    where
        F: FnOnce(&Account, &mut BalanceLedger) -> Result<Option<Activity>>,
    {
        let lock = self.account_lock(account_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let account = self.load_account(account_id)?;
        let mut ledger = BalanceLedger::from_history(account_id, self.ledger.load(account_id)?)?;

        let periods = self.engine.accrue(account.apr, at, ledger.entries())?;
        let principal_owed = ledger.latest()?.principal_owed;
        ledger.apply_accrual(&periods, principal_owed, account.max_credit)?;

        let activity = mutate(&account, &mut ledger)?;

        let batch = LedgerBatch::new(ledger.pending().to_vec(), activity);
        if !batch.is_empty() {
            self.ledger.append_all(account_id, &batch)?;
        }

        info!(
            account_id = %account_id,
            operation,
            periods_accrued = periods.len(),
            snapshots_written = batch.snapshots.len(),
            "committed account operation"
        );

        let latest = ledger.latest()?.clone();
        Ok((account, latest))
    }
}
