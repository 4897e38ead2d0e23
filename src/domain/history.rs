//! Daily valuation curve rebuilt from the contribution ledger.

use crate::domain::portfolio::InvestmentEvent;
use crate::domain::series::SeriesWithSignal;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub price: f64,
    /// Held shares marked to this point's price, plus cash.
    pub portfolio_value: f64,
    pub total_invested: f64,
}

/// Values every series point against the latest event dated on or before it.
///
/// Points before the first event are omitted. Both inputs are ascending by
/// date, so a single forward cursor over `events` suffices.
pub fn reconstruct_history(
    series: &SeriesWithSignal,
    events: &[InvestmentEvent],
) -> Vec<HistoryPoint> {
    let mut history = Vec::with_capacity(series.len());
    let mut next = 0;

    for point in series.points() {
        while next < events.len() && events[next].date <= point.date() {
            next += 1;
        }
        if next == 0 {
            continue;
        }

        let latest = &events[next - 1];
        history.push(HistoryPoint {
            date: point.date(),
            price: point.close(),
            portfolio_value: latest.cumulative_shares * point.close() + latest.cash_balance,
            total_invested: latest.cumulative_invested,
        });
    }

    history
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::allocation::Allocation;
    use crate::domain::ohlcv::RawBar;
    use crate::domain::portfolio::Accumulator;
    use crate::domain::series::prepare_series;
    use approx::assert_relative_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn series(closes: &[(u32, f64)]) -> SeriesWithSignal {
        let rows = closes
            .iter()
            .map(|&(d, c)| RawBar::new(day(d), c, c, c, c, 1.0))
            .collect();
        prepare_series(rows, 1).unwrap()
    }

    #[test]
    fn points_before_first_event_are_omitted() {
        let s = series(&[(1, 10.0), (2, 10.0), (3, 20.0), (4, 40.0)]);
        let mut acc = Accumulator::new(100.0).unwrap();
        let events = vec![acc.record(day(3), 20.0, Allocation::Asset).unwrap()];

        let history = reconstruct_history(&s, &events);
        let dates: Vec<_> = history.iter().map(|h| h.date).collect();
        assert_eq!(dates, vec![day(3), day(4)]);
    }

    #[test]
    fn shares_marked_to_market_between_events() {
        let s = series(&[(1, 10.0), (2, 20.0), (3, 5.0)]);
        let mut acc = Accumulator::new(100.0).unwrap();
        let events = vec![acc.record(day(1), 10.0, Allocation::Asset).unwrap()];

        let history = reconstruct_history(&s, &events);
        let values: Vec<_> = history.iter().map(|h| h.portfolio_value).collect();
        assert_eq!(values, vec![100.0, 200.0, 50.0]);
        assert!(history.iter().all(|h| h.total_invested == 100.0));
    }

    #[test]
    fn cash_is_not_revalued() {
        let s = series(&[(1, 10.0), (2, 10.0), (3, 30.0)]);
        let mut acc = Accumulator::new(100.0).unwrap();
        let events = vec![
            acc.record(day(1), 10.0, Allocation::Asset).unwrap(),
            acc.record(day(2), 10.0, Allocation::Cash).unwrap(),
        ];

        let history = reconstruct_history(&s, &events);
        assert_relative_eq!(history[2].portfolio_value, 10.0 * 30.0 + 100.0);
        assert_eq!(history[2].total_invested, 200.0);
    }

    #[test]
    fn same_day_events_use_the_last_one() {
        let s = series(&[(5, 10.0), (6, 10.0)]);
        let mut acc = Accumulator::new(50.0).unwrap();
        let events = vec![
            acc.record(day(5), 10.0, Allocation::Asset).unwrap(),
            acc.record(day(5), 10.0, Allocation::Asset).unwrap(),
        ];

        let history = reconstruct_history(&s, &events);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].total_invested, 100.0);
        assert_eq!(history[0].portfolio_value, 100.0);
    }

    #[test]
    fn no_events_means_no_history() {
        let s = series(&[(1, 10.0), (2, 11.0)]);
        assert!(reconstruct_history(&s, &[]).is_empty());
    }

    #[test]
    fn one_point_per_series_point_after_first_event() {
        let s = series(&[(1, 1.0), (2, 2.0), (3, 3.0), (4, 4.0), (5, 5.0)]);
        let mut acc = Accumulator::new(10.0).unwrap();
        let events = vec![
            acc.record(day(2), 2.0, Allocation::Asset).unwrap(),
            acc.record(day(4), 4.0, Allocation::Asset).unwrap(),
        ];

        let history = reconstruct_history(&s, &events);
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].total_invested, 10.0);
        assert_eq!(history[1].total_invested, 10.0);
        assert_eq!(history[2].total_invested, 20.0);
        assert_eq!(history[3].total_invested, 20.0);
    }
}
