//! JSON report adapter implementing ReportPort.
//!
//! Writes the full ledger and valuation curve as
//! `{ticker, name, parameters, summary, investments, history}`.

use crate::domain::catalog;
use crate::domain::error::DcasimError;
use crate::domain::history::HistoryPoint;
use crate::domain::portfolio::InvestmentEvent;
use crate::domain::simulation::SimulationParams;
use crate::domain::summary::SimulationSummary;
use crate::ports::report_port::{ReportContext, ReportPort};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Serialize)]
struct JsonReport<'a> {
    ticker: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    parameters: &'a SimulationParams,
    summary: &'a SimulationSummary,
    investments: &'a [InvestmentEvent],
    history: &'a [HistoryPoint],
}

pub struct JsonReportAdapter;

impl JsonReportAdapter {
    pub fn render(ctx: &ReportContext<'_>) -> Result<String, DcasimError> {
        let report = JsonReport {
            ticker: ctx.ticker,
            name: catalog::lookup(ctx.ticker).map(|l| l.name),
            parameters: ctx.params,
            summary: ctx.summary,
            investments: &ctx.result.investments,
            history: &ctx.result.history,
        };
        serde_json::to_string_pretty(&report).map_err(|e| DcasimError::Report {
            reason: format!("failed to serialise report: {}", e),
        })
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(&self, ctx: &ReportContext<'_>, output_path: &Path) -> Result<(), DcasimError> {
        let body = Self::render(ctx)?;
        fs::write(output_path, body).map_err(|e| DcasimError::Report {
            reason: format!("failed to write {}: {}", output_path.display(), e),
        })
    }
}
