pub mod config;
pub mod decimal;
pub mod errors;
pub mod interest;
pub mod ledger;
pub mod payments;
pub mod serialization;
pub mod service;
pub mod store;
pub mod types;

// re-export key types
pub use config::LedgerConfig;
pub use decimal::{Money, Rate};
pub use errors::{LedgerError, PaymentRejection, Result, WithdrawalRejection};
pub use interest::{accrue, interest_for, AccrualEngine, AccruedPeriod};
pub use ledger::{BalanceLedger, BalanceSnapshot};
pub use payments::{allocate_payment, validate_withdrawal, PaymentAllocation};
pub use serialization::{AccountView, Statement};
pub use service::AccountService;
pub use store::{AccountStore, LedgerBatch, LedgerStore, MemoryStore};
pub use types::{Account, AccountId, Activity, CustomerId, PaymentRecord, WithdrawalRecord};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
