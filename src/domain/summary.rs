//! Headline figures for a finished simulation.

use crate::domain::allocation::Allocation;
use crate::domain::simulation::SimulationResult;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub contributions: usize,
    pub asset_contributions: usize,
    pub cash_contributions: usize,
    pub total_invested: f64,
    pub final_shares: f64,
    pub cash_balance: f64,
    /// Value at the last history point (shares at the final price plus cash).
    pub final_value: f64,
    pub gain: f64,
    /// `gain / total_invested`, or 0 when nothing was invested.
    pub total_return: f64,
}

impl SimulationSummary {
    pub fn compute(result: &SimulationResult) -> Self {
        let asset_contributions = result
            .investments
            .iter()
            .filter(|e| e.allocation == Allocation::Asset)
            .count();
        let contributions = result.investments.len();

        let (total_invested, final_shares, cash_balance) = result
            .investments
            .last()
            .map(|e| (e.cumulative_invested, e.cumulative_shares, e.cash_balance))
            .unwrap_or((0.0, 0.0, 0.0));

        let final_value = result
            .history
            .last()
            .map(|h| h.portfolio_value)
            .unwrap_or(0.0);

        let gain = final_value - total_invested;
        let total_return = if total_invested > 0.0 {
            gain / total_invested
        } else {
            0.0
        };

        SimulationSummary {
            contributions,
            asset_contributions,
            cash_contributions: contributions - asset_contributions,
            total_invested,
            final_shares,
            cash_balance,
            final_value,
            gain,
            total_return,
        }
    }
}
