//! Contribution schedule: maps calendar ticks onto series dates.
//!
//! The cursor starts at the requested start date and advances by the cadence
//! from its previous value. Month steps clamp to the last day of shorter
//! months, so a schedule started on the 31st drifts (Jan 31, Feb 29, Mar 29).

use crate::domain::error::DcasimError;
use crate::domain::series::SeriesWithSignal;
use chrono::{Days, Months, NaiveDate};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    Months(u32),
    Weeks(u32),
}

impl Cadence {
    pub fn monthly(months: i64) -> Result<Self, DcasimError> {
        Self::checked(months, "frequency_months").map(Cadence::Months)
    }

    pub fn weekly(weeks: i64) -> Result<Self, DcasimError> {
        Self::checked(weeks, "frequency_weeks").map(Cadence::Weeks)
    }

    fn checked(n: i64, what: &str) -> Result<u32, DcasimError> {
        u32::try_from(n)
            .ok()
            .filter(|&n| n >= 1)
            .ok_or_else(|| DcasimError::InvalidDateRange {
                reason: format!("{what} must be at least 1, got {n}"),
            })
    }

    pub fn validate(&self) -> Result<(), DcasimError> {
        match *self {
            Cadence::Months(n) => Self::monthly(n.into()).map(|_| ()),
            Cadence::Weeks(n) => Self::weekly(n.into()).map(|_| ()),
        }
    }

    /// Next scheduled date, or `None` past the calendar's range.
    pub fn advance(&self, date: NaiveDate) -> Option<NaiveDate> {
        match *self {
            Cadence::Months(n) => date.checked_add_months(Months::new(n)),
            Cadence::Weeks(n) => date.checked_add_days(Days::new(u64::from(n) * 7)),
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cadence::Months(1) => write!(f, "monthly"),
            Cadence::Months(n) => write!(f, "every {} months", n),
            Cadence::Weeks(1) => write!(f, "weekly"),
            Cadence::Weeks(n) => write!(f, "every {} weeks", n),
        }
    }
}

/// One scheduled contribution resolved to the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CadenceTick {
    /// Calendar date the contribution was scheduled for.
    pub scheduled: NaiveDate,
    /// Index into the series of the first point on or after `scheduled`.
    pub index: usize,
    /// Date of that series point.
    pub date: NaiveDate,
}

pub fn walk_cadence(
    series: &SeriesWithSignal,
    start: NaiveDate,
    cadence: Cadence,
) -> Result<Vec<CadenceTick>, DcasimError> {
    cadence.validate()?;

    let points = series.points();
    let Some(last) = series.last_date() else {
        return Ok(Vec::new());
    };

    let mut ticks = Vec::new();
    let mut cursor = start;
    // Cursors only move forward, so the search resumes where the last one stopped.
    let mut idx = series.first_index_on_or_after(start).unwrap_or(points.len());

    while cursor <= last {
        while idx < points.len() && points[idx].date() < cursor {
            idx += 1;
        }
        if idx == points.len() {
            break;
        }

        ticks.push(CadenceTick {
            scheduled: cursor,
            index: idx,
            date: points[idx].date(),
        });

        cursor = match cadence.advance(cursor) {
            Some(next) => next,
            None => break,
        };
    }

    Ok(ticks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::RawBar;
    use crate::domain::series::prepare_series;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn daily_series(start: NaiveDate, days: u64) -> SeriesWithSignal {
        let rows = (0..days)
            .map(|i| {
                let d = start.checked_add_days(Days::new(i)).unwrap();
                RawBar::new(d, 10.0, 10.0, 10.0, 10.0, 1.0)
            })
            .collect();
        prepare_series(rows, 1).unwrap()
    }

    fn series_on(dates: &[NaiveDate]) -> SeriesWithSignal {
        let rows = dates
            .iter()
            .map(|&d| RawBar::new(d, 10.0, 10.0, 10.0, 10.0, 1.0))
            .collect();
        prepare_series(rows, 1).unwrap()
    }

    #[test]
    fn monthly_ticks_on_daily_series() {
        let series = daily_series(date(2024, 1, 1), 100);
        let ticks = walk_cadence(&series, date(2024, 1, 15), Cadence::Months(1)).unwrap();
        let dates: Vec<_> = ticks.iter().map(|t| t.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 15), date(2024, 2, 15), date(2024, 3, 15)]
        );
    }

    #[test]
    fn tick_resolves_to_next_available_date() {
        // Weekend gap: the 6th and 7th have no data.
        let series = series_on(&[date(2024, 1, 5), date(2024, 1, 8), date(2024, 2, 6)]);
        let ticks = walk_cadence(&series, date(2024, 1, 6), Cadence::Months(1)).unwrap();

        assert_eq!(ticks.len(), 2);
        assert_eq!(ticks[0].scheduled, date(2024, 1, 6));
        assert_eq!(ticks[0].date, date(2024, 1, 8));
        assert_eq!(ticks[0].index, 1);
        assert_eq!(ticks[1].scheduled, date(2024, 2, 6));
        assert_eq!(ticks[1].date, date(2024, 2, 6));
    }

    #[test]
    fn start_on_31st_clamps_and_drifts() {
        let series = daily_series(date(2023, 1, 1), 200);
        let ticks = walk_cadence(&series, date(2023, 1, 31), Cadence::Months(1)).unwrap();
        let scheduled: Vec<_> = ticks.iter().take(4).map(|t| t.scheduled).collect();
        assert_eq!(
            scheduled,
            vec![
                date(2023, 1, 31),
                date(2023, 2, 28),
                date(2023, 3, 28),
                date(2023, 4, 28),
            ]
        );
    }

    #[test]
    fn start_on_31st_in_leap_year() {
        let series = daily_series(date(2024, 1, 1), 90);
        let ticks = walk_cadence(&series, date(2024, 1, 31), Cadence::Months(1)).unwrap();
        assert_eq!(ticks[1].scheduled, date(2024, 2, 29));
    }

    #[test]
    fn multi_month_frequency() {
        let series = daily_series(date(2024, 1, 1), 366);
        let ticks = walk_cadence(&series, date(2024, 1, 1), Cadence::Months(3)).unwrap();
        let dates: Vec<_> = ticks.iter().map(|t| t.date).collect();
        assert_eq!(
            dates,
            vec![
                date(2024, 1, 1),
                date(2024, 4, 1),
                date(2024, 7, 1),
                date(2024, 10, 1),
            ]
        );
    }

    #[test]
    fn weekly_ticks() {
        let series = daily_series(date(2024, 1, 1), 21);
        let ticks = walk_cadence(&series, date(2024, 1, 1), Cadence::Weeks(1)).unwrap();
        let dates: Vec<_> = ticks.iter().map(|t| t.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 1), date(2024, 1, 8), date(2024, 1, 15)]
        );
    }

    #[test]
    fn start_before_series_resolves_to_first_point() {
        let series = daily_series(date(2024, 3, 1), 10);
        let ticks = walk_cadence(&series, date(2024, 1, 1), Cadence::Months(1)).unwrap();
        // Jan 1 and Feb 1 both resolve to Mar 1; Mar 1 itself is the third tick.
        let dates: Vec<_> = ticks.iter().map(|t| t.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 3, 1), date(2024, 3, 1), date(2024, 3, 1)]
        );
    }

    #[test]
    fn start_after_last_date_is_empty() {
        let series = daily_series(date(2024, 1, 1), 10);
        let ticks = walk_cadence(&series, date(2025, 1, 1), Cadence::Months(1)).unwrap();
        assert!(ticks.is_empty());
    }

    #[test]
    fn start_on_last_date_yields_one_tick() {
        let series = daily_series(date(2024, 1, 1), 10);
        let ticks = walk_cadence(&series, date(2024, 1, 10), Cadence::Months(1)).unwrap();
        assert_eq!(ticks.len(), 1);
        assert_eq!(ticks[0].date, date(2024, 1, 10));
    }

    #[test]
    fn zero_frequency_is_rejected() {
        let series = daily_series(date(2024, 1, 1), 10);
        let err = walk_cadence(&series, date(2024, 1, 1), Cadence::Months(0)).unwrap_err();
        assert!(matches!(err, DcasimError::InvalidDateRange { .. }));
    }

    #[test]
    fn constructors_validate() {
        assert_eq!(Cadence::monthly(2).unwrap(), Cadence::Months(2));
        assert_eq!(Cadence::weekly(1).unwrap(), Cadence::Weeks(1));
        assert!(Cadence::monthly(0).is_err());
        assert!(Cadence::monthly(-3).is_err());
        assert!(Cadence::weekly(0).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Cadence::Months(1).to_string(), "monthly");
        assert_eq!(Cadence::Months(3).to_string(), "every 3 months");
        assert_eq!(Cadence::Weeks(1).to_string(), "weekly");
        assert_eq!(Cadence::Weeks(2).to_string(), "every 2 weeks");
    }
}
