//! CSV file data adapter.
//!
//! One file per ticker, `<directory>/<TICKER>.csv`, with a header naming the
//! columns `date,open,high,low,close,volume` in any order and case (so a
//! yfinance `Date,Open,High,Low,Close,Adj Close,Volume` export loads as is).
//! Empty, `NaN` and `null` cells are read as absent values.

use crate::domain::error::DcasimError;
use crate::domain::ohlcv::RawBar;
use crate::ports::data_port::{DataPort, Period};
use chrono::{Months, NaiveDate};
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    close: usize,
    volume: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Option<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        Some(Columns {
            date: find("date")?,
            open: find("open"),
            high: find("high"),
            low: find("low"),
            close: find("close")?,
            volume: find("volume"),
        })
    }
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }
}

fn data_err(ticker: &str, reason: String) -> DcasimError {
    DcasimError::Data {
        ticker: ticker.to_string(),
        reason,
    }
}

fn parse_cell(
    ticker: &str,
    record: &csv::StringRecord,
    col: Option<usize>,
    name: &str,
) -> Result<Option<f64>, DcasimError> {
    let Some(raw) = col.and_then(|c| record.get(c)) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") || raw.eq_ignore_ascii_case("null") {
        return Ok(None);
    }
    let value = raw
        .parse::<f64>()
        .map_err(|e| data_err(ticker, format!("invalid {} value '{}': {}", name, raw, e)))?;
    if !value.is_finite() {
        tracing::debug!(ticker, column = name, raw, "treating non-finite cell as absent");
        return Ok(None);
    }
    Ok(Some(value))
}

fn parse_date(ticker: &str, raw: &str) -> Result<NaiveDate, DcasimError> {
    // Timestamped exports carry a time suffix after the date.
    let raw = raw.trim();
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| data_err(ticker, format!("invalid date '{}': {}", raw, e)))
}

impl DataPort for CsvAdapter {
    fn fetch_series(&self, ticker: &str, period: Period) -> Result<Vec<RawBar>, DcasimError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path)
            .map_err(|e| data_err(ticker, format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| data_err(ticker, format!("CSV header error: {}", e)))?
            .clone();
        let cols = Columns::from_headers(&headers)
            .ok_or_else(|| data_err(ticker, "header must name date and close columns".into()))?;

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| data_err(ticker, format!("CSV parse error: {}", e)))?;
            let date_str = record
                .get(cols.date)
                .ok_or_else(|| data_err(ticker, "missing date column".into()))?;
            if date_str.trim().is_empty() {
                continue;
            }

            rows.push(RawBar {
                date: parse_date(ticker, date_str)?,
                open: parse_cell(ticker, &record, cols.open, "open")?,
                high: parse_cell(ticker, &record, cols.high, "high")?,
                low: parse_cell(ticker, &record, cols.low, "low")?,
                close: parse_cell(ticker, &record, Some(cols.close), "close")?,
                volume: parse_cell(ticker, &record, cols.volume, "volume")?,
            });
        }

        if let (Period::Years(years), Some(newest)) = (period, rows.iter().map(|r| r.date).max()) {
            let cutoff = newest
                .checked_sub_months(Months::new(years.saturating_mul(12)))
                .unwrap_or(NaiveDate::MIN);
            rows.retain(|r| r.date >= cutoff);
        }

        tracing::debug!(ticker, rows = rows.len(), path = %path.display(), "loaded csv series");
        Ok(rows)
    }

    fn list_tickers(&self) -> Result<Vec<String>, DcasimError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| {
            data_err(
                "*",
                format!("failed to read directory {}: {}", self.base_path.display(), e),
            )
        })?;

        let mut tickers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| data_err("*", format!("directory entry error: {}", e)))?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")) {
                if let Some(stem) = path.file_stem() {
                    tickers.push(stem.to_string_lossy().into_owned());
                }
            }
        }

        tickers.sort();
        Ok(tickers)
    }
}
