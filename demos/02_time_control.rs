/// time control - deterministic testing with controlled time
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use credit_line_rs::{AccountService, MemoryStore, Money, Rate, SafeTimeProvider, TimeSource, Uuid};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== time control example ===\n");

    // create controlled time for testing
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    println!("starting date: {}", time.now().format("%Y-%m-%d"));

    let store = Arc::new(MemoryStore::new());
    let service = AccountService::new(store.clone(), store);

    let account = service.open_account_now(
        Uuid::new_v4(),
        Rate::from_percentage(18),
        Money::from_minor(5_000_000),
        &time,
    )?;
    service.withdraw_now(account.account_id, Money::from_minor(2_000_000), &time)?;
    println!("withdrew {} on {}", Money::from_minor(2_000_000), time.now().format("%Y-%m-%d"));

    // each read records interest for the pay period that just closed
    for _ in 0..6 {
        controller.advance(Duration::days(30));
        let latest = service.get_now(account.account_id, &time)?;
        println!(
            "{}: interest owed {} available {}",
            time.now().format("%Y-%m-%d"),
            latest.interest_owed,
            latest.available_credit
        );
    }

    // pay everything off
    controller.advance(Duration::days(1));
    let owed = service.get_now(account.account_id, &time)?.total_owed();
    let paid = service.pay_now(account.account_id, owed, &time)?;
    println!("\npaid {} on {}", owed, time.now().format("%Y-%m-%d"));
    println!("remaining: {}", paid.total_owed());

    Ok(())
}
