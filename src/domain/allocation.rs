//! Per-tick allocation between the tracked asset and cash.

use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Allocation {
    Asset,
    Cash,
}

/// What to do when the MA strategy is on but the average is still warming up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingSignalPolicy {
    /// Treat an absent signal as bullish and buy.
    #[default]
    Invest,
    /// Park the contribution in cash until the signal exists.
    #[serde(rename = "cash")]
    HoldCash,
}

impl FromStr for MissingSignalPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "invest" | "asset" => Ok(MissingSignalPolicy::Invest),
            "cash" | "hold_cash" => Ok(MissingSignalPolicy::HoldCash),
            other => Err(format!("expected 'invest' or 'cash', got '{other}'")),
        }
    }
}

/// Decides where one contribution goes.
///
/// Without the MA strategy everything buys the asset. With it, the asset is
/// bought only while `price > moving_average`; equality counts as bearish.
/// The branch is on the presence of the average, never its numeric value.
pub fn decide(
    price: f64,
    moving_average: Option<f64>,
    use_ma_strategy: bool,
    missing_signal: MissingSignalPolicy,
) -> Allocation {
    if !use_ma_strategy {
        return Allocation::Asset;
    }

    match moving_average {
        Some(ma) if price > ma => Allocation::Asset,
        Some(_) => Allocation::Cash,
        None => match missing_signal {
            MissingSignalPolicy::Invest => Allocation::Asset,
            MissingSignalPolicy::HoldCash => Allocation::Cash,
        },
    }
}
