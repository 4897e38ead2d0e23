//! Simulation entry point: schedule, decide, accumulate, revalue.
//!
//! One call is a single synchronous pass over an already-fetched series.

use crate::domain::allocation::{self, MissingSignalPolicy};
use crate::domain::cadence::{walk_cadence, Cadence};
use crate::domain::error::DcasimError;
use crate::domain::history::{reconstruct_history, HistoryPoint};
use crate::domain::ohlcv::RawBar;
use crate::domain::portfolio::{Accumulator, InvestmentEvent};
use crate::domain::series::SeriesWithSignal;
use chrono::NaiveDate;
use serde::Serialize;
use std::borrow::Cow;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationParams {
    pub contribution_amount: f64,
    pub start_date: NaiveDate,
    pub cadence: Cadence,
    pub ma_window: usize,
    pub use_ma_strategy: bool,
    pub missing_signal: MissingSignalPolicy,
}

impl SimulationParams {
    pub fn validate(&self) -> Result<(), DcasimError> {
        if !self.contribution_amount.is_finite() || self.contribution_amount <= 0.0 {
            return Err(DcasimError::InvalidAmount {
                amount: self.contribution_amount,
            });
        }
        if self.ma_window == 0 {
            return Err(DcasimError::InvalidWindow { window: 0 });
        }
        self.cadence.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub investments: Vec<InvestmentEvent>,
    pub history: Vec<HistoryPoint>,
}

pub fn parse_start_date(s: &str) -> Result<NaiveDate, DcasimError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|e| DcasimError::InvalidDateRange {
        reason: format!("start date '{}' is not YYYY-MM-DD: {}", s.trim(), e),
    })
}

/// Runs one backtest over `series`.
///
/// `cash_series` is reserved for an interest-bearing cash leg; it is accepted
/// but cash currently earns nothing.
pub fn simulate(
    series: &SeriesWithSignal,
    cash_series: Option<&[RawBar]>,
    params: &SimulationParams,
) -> Result<SimulationResult, DcasimError> {
    params.validate()?;
    if series.is_empty() {
        return Err(DcasimError::EmptySeries);
    }
    if let Some(cash) = cash_series {
        tracing::debug!(rows = cash.len(), "cash series supplied; not applied");
    }

    let series: Cow<'_, SeriesWithSignal> =
        if params.use_ma_strategy && series.window() != params.ma_window {
            tracing::debug!(
                from = series.window(),
                to = params.ma_window,
                "recomputing moving average"
            );
            Cow::Owned(series.with_window(params.ma_window)?)
        } else {
            Cow::Borrowed(series)
        };

    let ticks = walk_cadence(&series, params.start_date, params.cadence)?;
    let points = series.points();

    let mut accumulator = Accumulator::new(params.contribution_amount)?;
    let mut investments = Vec::with_capacity(ticks.len());

    for tick in &ticks {
        let point = &points[tick.index];
        let decision = allocation::decide(
            point.close(),
            point.moving_average,
            params.use_ma_strategy,
            params.missing_signal,
        );
        tracing::debug!(
            scheduled = %tick.scheduled,
            date = %tick.date,
            price = point.close(),
            moving_average = ?point.moving_average,
            allocation = ?decision,
            "contribution"
        );
        investments.push(accumulator.record(tick.date, point.close(), decision)?);
    }

    let history = reconstruct_history(&series, &investments);

    tracing::info!(
        ticks = investments.len(),
        history = history.len(),
        invested = accumulator.cumulative_invested(),
        shares = accumulator.cumulative_shares(),
        cash = accumulator.cash_balance(),
        "simulation complete"
    );

    Ok(SimulationResult {
        investments,
        history,
    })
}
