use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::config::LedgerConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::ledger::BalanceSnapshot;

use super::{interest_over_balances, AccruedPeriod, BalancePoint};

/// engine that brings a balance history current to a pay-period boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccrualEngine {
    pub pay_period_days: i64,
    pub days_per_year: i64,
}

impl Default for AccrualEngine {
    fn default() -> Self {
        Self::from_config(&LedgerConfig::default())
    }
}

impl AccrualEngine {
    pub fn new(pay_period_days: i64, days_per_year: i64) -> Self {
        Self {
            pay_period_days,
            days_per_year,
        }
    }

    pub fn from_config(config: &LedgerConfig) -> Self {
        Self::new(
            i64::from(config.pay_period_days),
            i64::from(config.days_per_year),
        )
    }

    /// latest period boundary at or before `as_of`, anchored on the opening time.
    ///
    /// boundaries fall on `opened + k * pay_period_days` whole days, so an
    /// `as_of` later in the day than the opening still maps to the same
    /// boundary instead of one shifted by the time-of-day difference.
    pub fn period_boundary(&self, opened: DateTime<Utc>, as_of: DateTime<Utc>) -> DateTime<Utc> {
        let elapsed = (as_of - opened).num_days();
        let completed = elapsed - elapsed.rem_euclid(self.pay_period_days);
        opened + Duration::days(completed)
    }

    /// compute the cumulative interest owed at every period boundary the
    /// ledger has not yet recorded, up to the boundary at or before `as_of`.
    ///
    /// walks backward from that boundary one period at a time until it meets
    /// a period that already holds a snapshot; that period is recomputed
    /// (its snapshots weight the interest) and nothing earlier is touched.
    /// totals are cumulative within the result: each entry includes every
    /// period before it in the same call, and the recomputed period starts
    /// from zero.
    pub fn accrue(
        &self,
        apr: Rate,
        as_of: DateTime<Utc>,
        snapshots: &[BalanceSnapshot],
    ) -> Result<Vec<AccruedPeriod>> {
        let (opening, latest) = self.check_preconditions(apr, as_of, snapshots)?;
        let opened = opening.timestamp;

        let mut boundary = self.period_boundary(opened, as_of);
        if boundary <= opened || latest.timestamp >= boundary {
            // first period still open, or this boundary is already recorded
            return Ok(Vec::new());
        }

        let period = Duration::days(self.pay_period_days);
        let mut periods: Vec<AccruedPeriod> = Vec::new();
        // snapshots[..remaining] have not been assigned to a window yet
        let mut remaining = snapshots.len();

        while boundary > opened {
            let period_start = boundary - period;
            let first_in_window =
                snapshots[..remaining].partition_point(|s| s.timestamp < period_start);
            let in_window = &snapshots[first_in_window..remaining];

            let carried_principal = first_in_window
                .checked_sub(1)
                .map(|i| snapshots[i].principal_owed)
                .unwrap_or(Money::ZERO);

            let mut points = Vec::with_capacity(in_window.len() + 2);
            points.push(BalancePoint::new(period_start, carried_principal));
            points.extend(
                in_window
                    .iter()
                    .map(|s| BalancePoint::new(s.timestamp, s.principal_owed)),
            );
            points.push(BalancePoint::new(boundary, Money::ZERO));

            let interest = interest_over_balances(apr, &points, self.days_per_year)?;
            debug!(
                period_start = %period_start,
                period_end = %boundary,
                balance_points = in_window.len(),
                interest = %interest,
                "accrued pay period"
            );

            // unpaid interest from this period rolls into every later one
            for later in periods.iter_mut() {
                later.interest_owed = later
                    .interest_owed
                    .checked_add(interest)
                    .ok_or_else(|| LedgerError::CalculationError {
                        message: format!("cumulative interest through {} overflows", later.period_end),
                    })?;
            }
            periods.push(AccruedPeriod {
                interest_owed: interest,
                period_end: boundary,
            });

            if !in_window.is_empty() {
                break;
            }

            remaining = first_in_window;
            boundary = period_start;
        }

        periods.reverse();

        Ok(periods)
    }

    fn check_preconditions<'a>(
        &self,
        apr: Rate,
        as_of: DateTime<Utc>,
        snapshots: &'a [BalanceSnapshot],
    ) -> Result<(&'a BalanceSnapshot, &'a BalanceSnapshot)> {
        if self.pay_period_days <= 0 {
            return Err(LedgerError::invalid_config(format!(
                "pay period must be positive, got {} days",
                self.pay_period_days
            )));
        }
        if self.days_per_year <= 0 {
            return Err(LedgerError::invalid_config(format!(
                "days per year must be positive, got {}",
                self.days_per_year
            )));
        }
        if apr.is_negative() {
            return Err(LedgerError::invalid_config(format!("apr must not be negative, got {}", apr)));
        }

        let (opening, latest) = match (snapshots.first(), snapshots.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(LedgerError::invalid_config(
                    "balance history must start with the opening snapshot",
                ))
            }
        };

        if as_of < opening.timestamp {
            return Err(LedgerError::invalid_config(format!(
                "as-of {} precedes account opening {}",
                as_of, opening.timestamp
            )));
        }
        if snapshots.windows(2).any(|pair| pair[1].timestamp < pair[0].timestamp) {
            return Err(LedgerError::invalid_config(
                "balance history must be ordered by timestamp",
            ));
        }

        Ok((opening, latest))
    }
}

/// accrue with explicit pay period and the default 365-day year
pub fn accrue(
    apr: Rate,
    pay_period_days: i64,
    as_of: DateTime<Utc>,
    snapshots: &[BalanceSnapshot],
) -> Result<Vec<AccruedPeriod>> {
    AccrualEngine::new(pay_period_days, i64::from(LedgerConfig::default().days_per_year))
        .accrue(apr, as_of, snapshots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    const MAX_CREDIT: Money = Money::from_minor(100_000_000_000);

    fn date(m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2017, m, d, 0, 0, 0).unwrap()
    }

    fn history(account_id: Uuid, points: &[(DateTime<Utc>, i64)]) -> Vec<BalanceSnapshot> {
        points
            .iter()
            .map(|&(at, principal)| {
                BalanceSnapshot::new(account_id, at, Money::from_minor(principal), Money::ZERO, MAX_CREDIT)
            })
            .collect()
    }

    fn amounts(periods: &[AccruedPeriod]) -> Vec<(i64, DateTime<Utc>)> {
        periods
            .iter()
            .map(|p| (p.interest_owed.as_minor(), p.period_end))
            .collect()
    }

    #[test]
    fn test_single_period_with_paydown() {
        let snapshots = history(
            Uuid::new_v4(),
            &[(date(10, 1), 0), (date(10, 1), 50_000_000_000), (date(10, 20), 30_000_000_000)],
        );

        let periods = accrue(Rate::from_percentage(35), 30, date(10, 31), &snapshots).unwrap();
        assert_eq!(amounts(&periods), vec![(1_227_397_260, date(10, 31))]);
    }

    #[test]
    fn test_single_period_constant_principal() {
        let snapshots = history(Uuid::new_v4(), &[(date(10, 1), 0), (date(10, 1), 50_000_000_000)]);

        let periods = accrue(Rate::from_percentage(35), 30, date(10, 31), &snapshots).unwrap();
        assert_eq!(amounts(&periods), vec![(1_438_356_164, date(10, 31))]);
    }

    #[test]
    fn test_interest_carries_into_later_periods() {
        let snapshots = history(
            Uuid::new_v4(),
            &[
                (date(10, 1), 0),
                (date(10, 1), 50_000_000_000),
                (date(10, 16), 30_000_000_000),
                (date(10, 26), 40_000_000_000),
            ],
        );

        let periods = accrue(Rate::from_percentage(35), 30, date(12, 1), &snapshots).unwrap();
        assert_eq!(
            amounts(&periods),
            vec![(1_198_630_137, date(10, 31)), (2_349_315_069, date(11, 30))]
        );
    }

    #[test]
    fn test_stops_at_period_with_existing_snapshot() {
        let snapshots = history(
            Uuid::new_v4(),
            &[
                (date(10, 1), 0),
                (date(10, 5), 50_000_000_000),
                (date(10, 16), 30_000_000_000),
                (date(11, 5), 40_000_000_000),
            ],
        );

        let periods = accrue(Rate::from_percentage(35), 30, date(12, 1), &snapshots).unwrap();
        assert_eq!(amounts(&periods), vec![(1_102_739_726, date(11, 30))]);
    }

    #[test]
    fn test_recorded_accrual_is_not_counted_twice() {
        let account_id = Uuid::new_v4();
        let mut snapshots = history(
            account_id,
            &[(date(10, 1), 0), (date(10, 5), 50_000_000_000), (date(10, 16), 30_000_000_000)],
        );
        snapshots.push(BalanceSnapshot::new(
            account_id,
            date(10, 31),
            Money::from_minor(30_000_000_000),
            Money::from_minor(958_904_109),
            MAX_CREDIT,
        ));
        snapshots.push(BalanceSnapshot::new(
            account_id,
            date(11, 5),
            Money::from_minor(40_000_000_000),
            Money::from_minor(958_904_109),
            MAX_CREDIT,
        ));

        let periods = accrue(Rate::from_percentage(35), 30, date(12, 1), &snapshots).unwrap();
        assert_eq!(amounts(&periods), vec![(1_102_739_726, date(11, 30))]);
    }

    #[test]
    fn test_cumulative_total_overflow_is_an_error() {
        // one period of interest fits in an i64, two do not
        let snapshots = history(Uuid::new_v4(), &[(date(1, 1), 0), (date(1, 1), i64::MAX / 50)]);

        assert!(matches!(
            AccrualEngine::new(30, 1).accrue(Rate::from_percentage(100), date(12, 31), &snapshots),
            Err(LedgerError::CalculationError { .. })
        ));
    }

    #[test]
    fn test_first_incomplete_period_accrues_nothing() {
        let snapshots = history(Uuid::new_v4(), &[(date(10, 1), 0), (date(10, 1), 50_000_000_000)]);

        assert!(accrue(Rate::from_percentage(35), 30, date(10, 1), &snapshots).unwrap().is_empty());
        assert!(accrue(Rate::from_percentage(35), 30, date(10, 30), &snapshots).unwrap().is_empty());
    }

    #[test]
    fn test_idempotent_once_recorded() {
        let account_id = Uuid::new_v4();
        let mut snapshots = history(account_id, &[(date(10, 1), 0), (date(10, 1), 50_000_000_000)]);
        let as_of = date(12, 5);

        let periods = accrue(Rate::from_percentage(35), 30, as_of, &snapshots).unwrap();
        assert_eq!(periods.len(), 2);

        for period in &periods {
            snapshots.push(BalanceSnapshot::new(
                account_id,
                period.period_end,
                Money::from_minor(50_000_000_000),
                period.interest_owed,
                MAX_CREDIT,
            ));
        }

        assert!(accrue(Rate::from_percentage(35), 30, as_of, &snapshots).unwrap().is_empty());
    }

    #[test]
    fn test_resumes_from_recorded_boundary() {
        let account_id = Uuid::new_v4();
        let mut snapshots = history(account_id, &[(date(10, 1), 0), (date(10, 1), 50_000_000_000)]);
        snapshots.push(BalanceSnapshot::new(
            account_id,
            date(10, 31),
            Money::from_minor(50_000_000_000),
            Money::from_minor(1_438_356_164),
            MAX_CREDIT,
        ));

        let periods = accrue(Rate::from_percentage(35), 30, date(11, 30), &snapshots).unwrap();
        // the window holding the 10-31 snapshot is recomputed from zero
        assert_eq!(amounts(&periods), vec![(1_438_356_164, date(11, 30))]);
    }

    #[test]
    fn test_monotonic_when_principal_never_falls() {
        let snapshots = history(
            Uuid::new_v4(),
            &[(date(1, 1), 0), (date(1, 3), 1_000_000), (date(1, 20), 2_500_000)],
        );

        let periods = accrue(Rate::from_percentage(18), 30, date(12, 31), &snapshots).unwrap();
        assert_eq!(periods.len(), 12);
        for pair in periods.windows(2) {
            assert!(pair[1].interest_owed >= pair[0].interest_owed);
            assert_eq!((pair[1].period_end - pair[0].period_end).num_days(), 30);
        }
    }

    #[test]
    fn test_boundary_alignment() {
        let engine = AccrualEngine::new(30, 365);
        let opened = date(10, 1);

        assert_eq!(engine.period_boundary(opened, date(10, 1)), date(10, 1));
        assert_eq!(engine.period_boundary(opened, date(10, 30)), date(10, 1));
        assert_eq!(engine.period_boundary(opened, date(10, 31)), date(10, 31));
        assert_eq!(engine.period_boundary(opened, date(12, 1)), date(11, 30));

        // time of day on the as-of does not shift the boundary
        let afternoon = Utc.with_ymd_and_hms(2017, 11, 2, 15, 30, 0).unwrap();
        assert_eq!(engine.period_boundary(opened, afternoon), date(10, 31));
    }

    #[test]
    fn test_rejects_bad_configuration() {
        let snapshots = history(Uuid::new_v4(), &[(date(10, 1), 0)]);
        let apr = Rate::from_percentage(35);

        assert!(matches!(
            accrue(apr, 0, date(11, 1), &snapshots),
            Err(LedgerError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            accrue(Rate::from_percentage(-5), 30, date(11, 1), &snapshots),
            Err(LedgerError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            accrue(apr, 30, date(9, 1), &snapshots),
            Err(LedgerError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            accrue(apr, 30, date(11, 1), &[]),
            Err(LedgerError::InvalidConfiguration { .. })
        ));

        let unordered = history(Uuid::new_v4(), &[(date(10, 5), 0), (date(10, 1), 10)]);
        assert!(matches!(
            accrue(apr, 30, date(11, 10), &unordered),
            Err(LedgerError::InvalidConfiguration { .. })
        ));
    }
}
