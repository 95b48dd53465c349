/// quick start - minimal example to get started
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use credit_line_rs::{AccountService, MemoryStore, Money, Rate, Uuid};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(MemoryStore::new());
    let service = AccountService::new(store.clone(), store);

    // open a $1,000,000,000 line at 35% apr
    let opened = Utc.with_ymd_and_hms(2017, 10, 1, 0, 0, 0).unwrap();
    let account = service.open_account(
        Uuid::new_v4(),
        Rate::from_percentage(35),
        Money::from_minor(100_000_000_000),
        opened,
    )?;

    // draw half of it on day one
    service.withdraw(account.account_id, Money::from_minor(50_000_000_000), opened)?;

    // read the account at the end of the first pay period
    let month_end = Utc.with_ymd_and_hms(2017, 10, 31, 0, 0, 0).unwrap();
    let view = service.view(account.account_id, month_end)?;

    println!("{}", view.to_json_pretty()?);

    Ok(())
}
