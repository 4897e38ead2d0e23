//! Market data port trait.

use crate::domain::error::DcasimError;
use crate::domain::ohlcv::RawBar;

/// How much history to request, counted back from the newest available row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Years(u32),
    Max,
}

impl Default for Period {
    fn default() -> Self {
        Period::Years(5)
    }
}

pub trait DataPort {
    /// Raw rows for `ticker`, in whatever order the source holds them.
    ///
    /// An empty vector is a valid answer; the engine rejects it as an empty
    /// series.
    fn fetch_series(&self, ticker: &str, period: Period) -> Result<Vec<RawBar>, DcasimError>;

    fn list_tickers(&self) -> Result<Vec<String>, DcasimError>;
}
