//! CSV report adapter: the daily valuation curve, one row per history point.

use crate::domain::error::DcasimError;
use crate::domain::simulation::DATE_FORMAT;
use crate::ports::report_port::{ReportContext, ReportPort};
use std::io::Write;
use std::path::Path;

pub struct CsvReportAdapter;

fn report_err(e: impl std::fmt::Display) -> DcasimError {
    DcasimError::Report {
        reason: e.to_string(),
    }
}

impl CsvReportAdapter {
    pub fn write_to<W: Write>(ctx: &ReportContext<'_>, writer: W) -> Result<(), DcasimError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["date", "price", "portfolio_value", "total_invested"])
            .map_err(report_err)?;
        for point in &ctx.result.history {
            wtr.write_record([
                point.date.format(DATE_FORMAT).to_string(),
                point.price.to_string(),
                point.portfolio_value.to_string(),
                point.total_invested.to_string(),
            ])
            .map_err(report_err)?;
        }
        wtr.flush().map_err(report_err)
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, ctx: &ReportContext<'_>, output_path: &Path) -> Result<(), DcasimError> {
        let file = std::fs::File::create(output_path).map_err(|e| DcasimError::Report {
            reason: format!("failed to create {}: {}", output_path.display(), e),
        })?;
        Self::write_to(ctx, file)
    }
}
