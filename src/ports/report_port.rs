//! Report generation port trait.

use crate::domain::error::DcasimError;
use crate::domain::simulation::{SimulationParams, SimulationResult};
use crate::domain::summary::SimulationSummary;
use std::path::Path;

/// Everything a report may render about one run.
pub struct ReportContext<'a> {
    pub ticker: &'a str,
    pub params: &'a SimulationParams,
    pub result: &'a SimulationResult,
    pub summary: &'a SimulationSummary,
}

/// Port for writing simulation reports.
pub trait ReportPort {
    fn write(&self, ctx: &ReportContext<'_>, output_path: &Path) -> Result<(), DcasimError>;
}
