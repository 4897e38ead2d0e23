//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for dcasim.
///
/// Every simulation failure is terminal for the current call: the engine
/// returns one of these instead of a partial result.
#[derive(Debug, thiserror::Error)]
pub enum DcasimError {
    #[error("price series is empty")]
    EmptySeries,

    #[error("invalid moving average window {window}: must be at least 1")]
    InvalidWindow { window: i64 },

    #[error("invalid price {price} on {date}: must be positive")]
    InvalidPrice { date: NaiveDate, price: f64 },

    #[error("invalid date range: {reason}")]
    InvalidDateRange { reason: String },

    #[error("invalid contribution amount {amount}: must be positive")]
    InvalidAmount { amount: f64 },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error for {ticker}: {reason}")]
    Data { ticker: String, reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&DcasimError> for std::process::ExitCode {
    fn from(err: &DcasimError) -> Self {
        let code: u8 = match err {
            DcasimError::Io(_) | DcasimError::Report { .. } => 1,
            DcasimError::ConfigParse { .. }
            | DcasimError::ConfigMissing { .. }
            | DcasimError::ConfigInvalid { .. } => 2,
            DcasimError::Data { .. } | DcasimError::EmptySeries => 3,
            DcasimError::InvalidWindow { .. }
            | DcasimError::InvalidPrice { .. }
            | DcasimError::InvalidDateRange { .. }
            | DcasimError::InvalidAmount { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
