//! OHLCV bar representation.
//!
//! [`RawBar`] is a row as a data supplier hands it over, with any price or
//! volume cell possibly absent. [`OhlcvBar`] is the cleaned price point the
//! engine works with.

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl RawBar {
    /// A fully populated row.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            volume: Some(volume),
        }
    }

    /// Converts to an [`OhlcvBar`], or `None` when the row has no finite close.
    ///
    /// Missing or non-finite open/high/low take the close; volume becomes zero.
    pub fn to_bar(&self) -> Option<OhlcvBar> {
        let close = self.close.filter(|c| c.is_finite())?;
        let or_close = |v: Option<f64>| v.filter(|x| x.is_finite()).unwrap_or(close);
        Some(OhlcvBar {
            date: self.date,
            open: or_close(self.open),
            high: or_close(self.high),
            low: or_close(self.low),
            close,
            volume: self.volume.filter(|v| v.is_finite()).unwrap_or(0.0),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn complete_row_converts_unchanged() {
        let raw = RawBar::new(day(15), 100.0, 110.0, 90.0, 105.0, 50_000.0);
        let bar = raw.to_bar().unwrap();
        assert_eq!(bar.date, day(15));
        assert_eq!(bar.open, 100.0);
        assert_eq!(bar.high, 110.0);
        assert_eq!(bar.low, 90.0);
        assert_eq!(bar.close, 105.0);
        assert_eq!(bar.volume, 50_000.0);
    }

    #[test]
    fn missing_close_is_dropped() {
        let raw = RawBar {
            close: None,
            ..RawBar::new(day(2), 1.0, 1.0, 1.0, 1.0, 1.0)
        };
        assert!(raw.to_bar().is_none());
    }

    #[test]
    fn nan_close_is_dropped() {
        let raw = RawBar::new(day(2), 1.0, 1.0, 1.0, f64::NAN, 1.0);
        assert!(raw.to_bar().is_none());
    }

    #[test]
    fn infinite_close_is_dropped() {
        let raw = RawBar::new(day(2), 1.0, 1.0, 1.0, f64::INFINITY, 1.0);
        assert!(raw.to_bar().is_none());
        let raw = RawBar::new(day(2), 1.0, 1.0, 1.0, f64::NEG_INFINITY, 1.0);
        assert!(raw.to_bar().is_none());
    }

    #[test]
    fn infinite_side_values_fall_back() {
        let raw = RawBar::new(day(4), f64::INFINITY, 12.0, f64::NAN, 11.0, f64::INFINITY);
        let bar = raw.to_bar().unwrap();
        assert_eq!(bar.open, 11.0);
        assert_eq!(bar.high, 12.0);
        assert_eq!(bar.low, 11.0);
        assert_eq!(bar.volume, 0.0);
    }

    #[test]
    fn partial_row_falls_back_to_close() {
        let raw = RawBar {
            date: day(3),
            open: None,
            high: Some(12.0),
            low: None,
            close: Some(11.0),
            volume: None,
        };
        let bar = raw.to_bar().unwrap();
        assert_eq!(bar.open, 11.0);
        assert_eq!(bar.high, 12.0);
        assert_eq!(bar.low, 11.0);
        assert_eq!(bar.volume, 0.0);
    }
}
