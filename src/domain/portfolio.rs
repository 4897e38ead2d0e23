//! Running contribution ledger.

use crate::domain::allocation::Allocation;
use crate::domain::error::DcasimError;
use chrono::NaiveDate;
use serde::Serialize;

/// Snapshot of the ledger right after one contribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentEvent {
    pub date: NaiveDate,
    pub price: f64,
    pub allocation: Allocation,
    pub contribution_amount: f64,
    pub shares_bought: f64,
    pub cumulative_shares: f64,
    pub cumulative_invested: f64,
    pub cash_balance: f64,
    pub portfolio_value: f64,
    pub total_value: f64,
}

/// Folds allocation decisions into shares held, cash held and money put in.
///
/// Shares are never sold and cash is never withdrawn, so both only grow.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulator {
    contribution_amount: f64,
    contributions: usize,
    cumulative_shares: f64,
    cash_balance: f64,
}

impl Accumulator {
    pub fn new(contribution_amount: f64) -> Result<Self, DcasimError> {
        if !contribution_amount.is_finite() || contribution_amount <= 0.0 {
            return Err(DcasimError::InvalidAmount {
                amount: contribution_amount,
            });
        }
        Ok(Self {
            contribution_amount,
            contributions: 0,
            cumulative_shares: 0.0,
            cash_balance: 0.0,
        })
    }

    pub fn contributions(&self) -> usize {
        self.contributions
    }

    pub fn cumulative_shares(&self) -> f64 {
        self.cumulative_shares
    }

    pub fn cash_balance(&self) -> f64 {
        self.cash_balance
    }

    /// Exactly `contributions * contribution_amount`, regardless of allocation.
    pub fn cumulative_invested(&self) -> f64 {
        self.contributions as f64 * self.contribution_amount
    }

    pub fn record(
        &mut self,
        date: NaiveDate,
        price: f64,
        allocation: Allocation,
    ) -> Result<InvestmentEvent, DcasimError> {
        if !price.is_finite() || price <= 0.0 {
            return Err(DcasimError::InvalidPrice { date, price });
        }

        let shares_bought = match allocation {
            Allocation::Asset => {
                let shares = self.contribution_amount / price;
                self.cumulative_shares += shares;
                shares
            }
            Allocation::Cash => {
                self.cash_balance += self.contribution_amount;
                0.0
            }
        };
        self.contributions += 1;

        let portfolio_value = self.cumulative_shares * price;
        Ok(InvestmentEvent {
            date,
            price,
            allocation,
            contribution_amount: self.contribution_amount,
            shares_bought,
            cumulative_shares: self.cumulative_shares,
            cumulative_invested: self.cumulative_invested(),
            cash_balance: self.cash_balance,
            portfolio_value,
            total_value: portfolio_value + self.cash_balance,
        })
    }
}
