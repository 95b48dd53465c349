pub mod accrual;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};

pub use accrual::{accrue, AccrualEngine};

/// cumulative interest owed as of the end of one pay period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccruedPeriod {
    pub interest_owed: Money,
    pub period_end: DateTime<Utc>,
}

/// principal held constant from `time` until the next point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalancePoint {
    pub time: DateTime<Utc>,
    pub principal_owed: Money,
}

impl BalancePoint {
    pub fn new(time: DateTime<Utc>, principal_owed: Money) -> Self {
        Self { time, principal_owed }
    }
}

/// simple interest on `principal` held for `days`, rounded half away from zero
/// to a whole minor unit: `principal * days * apr / (days_per_year * 100)`
pub fn interest_for(principal: Money, days: i64, apr: Rate, days_per_year: i64) -> Result<Money> {
    if days <= 0 || principal.is_zero() || apr.as_percentage().is_zero() {
        return Ok(Money::ZERO);
    }

    let overflow = || LedgerError::CalculationError {
        message: format!("interest on {} over {} days overflows", principal, days),
    };

    let numerator = principal
        .as_decimal()
        .checked_mul(Decimal::from(days))
        .and_then(|n| n.checked_mul(apr.as_percentage()))
        .ok_or_else(overflow)?;
    let divisor = Decimal::from(days_per_year) * Decimal::ONE_HUNDRED;
    let interest = numerator.checked_div(divisor).ok_or_else(overflow)?;

    Money::from_decimal_rounded(interest).ok_or_else(overflow)
}

/// day-weighted interest over an ascending balance history.
///
/// each point's principal accrues until the next point; the last point only
/// marks the end of the span. rounding is applied per term, not to the sum.
pub fn interest_over_balances(apr: Rate, points: &[BalancePoint], days_per_year: i64) -> Result<Money> {
    let mut total = Money::ZERO;
    for pair in points.windows(2) {
        let days = (pair[1].time - pair[0].time).num_days();
        total += interest_for(pair[0].principal_owed, days, apr, days_per_year)?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn oct(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2017, 10, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_interest_for_standard_apr() {
        let apr = Rate::from_percentage(35);
        assert_eq!(
            interest_for(Money::from_minor(50_000_000_000), 30, apr, 365).unwrap(),
            Money::from_minor(1_438_356_164)
        );
    }

    #[test]
    fn test_interest_for_degenerate_inputs() {
        assert_eq!(interest_for(Money::ZERO, 30, Rate::from_percentage(1), 365).unwrap(), Money::ZERO);
        assert_eq!(interest_for(Money::from_minor(500), 0, Rate::from_percentage(1), 365).unwrap(), Money::ZERO);
        assert_eq!(interest_for(Money::from_minor(500), 30, Rate::ZERO, 365).unwrap(), Money::ZERO);
    }

    #[test]
    fn test_interest_for_rounds_midpoint_up() {
        // 73 * 250 * 1 / 36500 = 0.5
        let interest = interest_for(Money::from_minor(73), 250, Rate::from_percentage(1), 365).unwrap();
        assert_eq!(interest, Money::from_minor(1));
    }

    #[test]
    fn test_interest_over_balances() {
        let apr = Rate::from_percentage(35);

        let points = [
            BalancePoint::new(oct(1), Money::from_minor(50_000_000_000)),
            BalancePoint::new(oct(20), Money::from_minor(30_000_000_000)),
            BalancePoint::new(oct(31), Money::ZERO),
        ];
        assert_eq!(interest_over_balances(apr, &points, 365).unwrap(), Money::from_minor(1_227_397_260));

        let points = [
            BalancePoint::new(oct(1), Money::from_minor(50_000_000_000)),
            BalancePoint::new(oct(16), Money::from_minor(30_000_000_000)),
            BalancePoint::new(oct(26), Money::from_minor(40_000_000_000)),
            BalancePoint::new(oct(31), Money::ZERO),
        ];
        assert_eq!(interest_over_balances(apr, &points, 365).unwrap(), Money::from_minor(1_198_630_137));
    }

    #[test]
    fn test_zero_length_span_accrues_nothing() {
        let points = [
            BalancePoint::new(oct(1), Money::from_minor(50_000_000_000)),
            BalancePoint::new(oct(1), Money::ZERO),
        ];
        assert_eq!(
            interest_over_balances(Rate::from_percentage(35), &points, 365).unwrap(),
            Money::ZERO
        );
    }
}
