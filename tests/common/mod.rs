#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use dcasim::domain::allocation::MissingSignalPolicy;
use dcasim::domain::cadence::Cadence;
use dcasim::domain::error::DcasimError;
pub use dcasim::domain::ohlcv::RawBar;
use dcasim::domain::simulation::SimulationParams;
use dcasim::ports::data_port::{DataPort, Period};
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<RawBar>>,
    pub errors: HashMap<String, String>,
    pub requested: RefCell<Vec<(String, Period)>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            requested: RefCell::new(Vec::new()),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<RawBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_series(&self, ticker: &str, period: Period) -> Result<Vec<RawBar>, DcasimError> {
        self.requested
            .borrow_mut()
            .push((ticker.to_string(), period));
        if let Some(reason) = self.errors.get(ticker) {
            return Err(DcasimError::Data {
                ticker: ticker.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(ticker).cloned().unwrap_or_default())
    }

    fn list_tickers(&self) -> Result<Vec<String>, DcasimError> {
        let mut tickers: Vec<String> = self.data.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date_str: &str, close: f64) -> RawBar {
    let d = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap();
    RawBar::new(d, close, close, close, close, 1000.0)
}

/// One bar per `step_days`, starting at `start`, with the given closes.
pub fn bars_every(start: NaiveDate, step_days: i64, closes: &[f64]) -> Vec<RawBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            RawBar::new(
                start + Duration::days(step_days * i as i64),
                c,
                c,
                c,
                c,
                1000.0,
            )
        })
        .collect()
}

pub fn daily_bars(start: NaiveDate, closes: &[f64]) -> Vec<RawBar> {
    bars_every(start, 1, closes)
}

pub fn weekly_bars(start: NaiveDate, closes: &[f64]) -> Vec<RawBar> {
    bars_every(start, 7, closes)
}

pub fn params(amount: f64, start: NaiveDate, cadence: Cadence) -> SimulationParams {
    SimulationParams {
        contribution_amount: amount,
        start_date: start,
        cadence,
        ma_window: 10,
        use_ma_strategy: false,
        missing_signal: MissingSignalPolicy::Invest,
    }
}

pub fn ma_params(amount: f64, start: NaiveDate, cadence: Cadence, window: usize) -> SimulationParams {
    SimulationParams {
        ma_window: window,
        use_ma_strategy: true,
        ..params(amount, start, cadence)
    }
}
