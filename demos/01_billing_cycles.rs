/// billing cycles - interest across several pay periods with mixed activity
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use credit_line_rs::{AccountService, MemoryStore, Money, Rate, Uuid};

fn date(m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2017, m, d, 0, 0, 0).unwrap()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== billing cycles example ===\n");

    let store = Arc::new(MemoryStore::new());
    let service = AccountService::new(store.clone(), store);

    let account = service.open_account(
        Uuid::new_v4(),
        Rate::from_percentage(35),
        Money::from_minor(100_000_000_000),
        date(10, 1),
    )?;
    let id = account.account_id;

    service.withdraw(id, Money::from_minor(50_000_000_000), date(10, 1))?;
    println!("10-01 withdrew 50,000,000,000");

    service.pay(id, Money::from_minor(20_000_000_000), date(10, 16))?;
    println!("10-16 paid 20,000,000,000");

    service.withdraw(id, Money::from_minor(10_000_000_000), date(10, 26))?;
    println!("10-26 withdrew 10,000,000,000");

    // nothing is accrued until the account is read
    let latest = service.get(id, date(12, 1))?;
    println!(
        "\nas of 12-01: principal {} interest {} available {}",
        latest.principal_owed, latest.interest_owed, latest.available_credit
    );

    println!("\nledger:");
    let statement = service.statement(id)?;
    for snapshot in &statement.snapshots {
        println!(
            "  {}  principal {:>14}  interest {:>14}  available {:>14}",
            snapshot.timestamp.format("%Y-%m-%d"),
            snapshot.principal_owed.to_string(),
            snapshot.interest_owed.to_string(),
            snapshot.available_credit.to_string()
        );
    }

    // pay off the interest
    let cleared = service.pay(id, latest.interest_owed, date(12, 2))?;
    println!("\n12-02 paid {} of interest, interest now {}", latest.interest_owed, cleared.interest_owed);

    println!("total paid: {}", service.statement(id)?.total_paid());

    Ok(())
}
