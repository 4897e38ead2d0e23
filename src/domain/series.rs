//! Series preparation: ordering, de-duplication and the moving-average signal.

use crate::domain::error::DcasimError;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::ohlcv::{OhlcvBar, RawBar};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// One price point with its trailing moving average.
///
/// `moving_average` is `None` until `window` points of history exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    #[serde(flatten)]
    pub bar: OhlcvBar,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moving_average: Option<f64>,
}

impl SeriesPoint {
    pub fn date(&self) -> NaiveDate {
        self.bar.date
    }

    pub fn close(&self) -> f64 {
        self.bar.close
    }
}

/// Price points strictly ascending by date, with an aligned MA signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesWithSignal {
    window: usize,
    points: Vec<SeriesPoint>,
}

impl SeriesWithSignal {
    pub fn window(&self) -> usize {
        self.window
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(SeriesPoint::date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(SeriesPoint::date)
    }

    /// Index of the earliest point dated on or after `date`.
    pub fn first_index_on_or_after(&self, date: NaiveDate) -> Option<usize> {
        let idx = self.points.partition_point(|p| p.date() < date);
        (idx < self.points.len()).then_some(idx)
    }

    /// Same points, signal recomputed over a different window.
    pub fn with_window(&self, window: usize) -> Result<Self, DcasimError> {
        if window == 0 {
            return Err(DcasimError::InvalidWindow { window: 0 });
        }
        let bars: Vec<OhlcvBar> = self.points.iter().map(|p| p.bar.clone()).collect();
        Ok(attach_signal(bars, window))
    }
}

/// Normalises a raw supplier series and attaches a `window`-point SMA.
///
/// Rows without a close are dropped. When a date appears more than once the
/// last row for it wins.
pub fn prepare_series(raw: Vec<RawBar>, window: usize) -> Result<SeriesWithSignal, DcasimError> {
    if window == 0 {
        return Err(DcasimError::InvalidWindow { window: 0 });
    }
    if raw.is_empty() {
        return Err(DcasimError::EmptySeries);
    }

    let raw_rows = raw.len();
    let mut by_date: BTreeMap<NaiveDate, OhlcvBar> = BTreeMap::new();
    for row in &raw {
        match row.to_bar() {
            Some(bar) => {
                by_date.insert(bar.date, bar);
            }
            None => tracing::debug!(date = %row.date, "dropping row without close"),
        }
    }

    if by_date.is_empty() {
        return Err(DcasimError::EmptySeries);
    }

    let bars: Vec<OhlcvBar> = by_date.into_values().collect();
    tracing::debug!(
        raw_rows,
        kept = bars.len(),
        window,
        "prepared price series"
    );
    Ok(attach_signal(bars, window))
}

fn attach_signal(bars: Vec<OhlcvBar>, window: usize) -> SeriesWithSignal {
    let sma = calculate_sma(&bars, window);
    tracing::debug!(
        indicator = %sma.indicator_type,
        valid = sma.valid_count(),
        "attached moving average"
    );
    let points = bars
        .into_iter()
        .zip(sma.values)
        .map(|(bar, point)| SeriesPoint {
            bar,
            moving_average: point.value,
        })
        .collect();
    SeriesWithSignal { window, points }
}
