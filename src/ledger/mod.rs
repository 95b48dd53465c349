pub mod balance;
pub mod snapshot;

pub use balance::BalanceLedger;
pub use snapshot::BalanceSnapshot;
