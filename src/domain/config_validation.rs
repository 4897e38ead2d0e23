//! Configuration validation.
//!
//! Validates all config fields before a simulation runs. Keys that are absent
//! fall back to defaults later; keys that are present must parse.

use crate::domain::allocation::MissingSignalPolicy;
use crate::domain::error::DcasimError;
use crate::domain::simulation::DATE_FORMAT;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::str::FromStr;

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), DcasimError> {
    validate_directory(config)?;
    validate_period(config)?;
    Ok(())
}

pub fn validate_simulation_config(config: &dyn ConfigPort) -> Result<(), DcasimError> {
    validate_amount(config)?;
    validate_start_date(config)?;
    validate_frequency(config)?;
    validate_ma_length(config)?;
    validate_flags(config)?;
    validate_report(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> DcasimError {
    DcasimError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn parse_present<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    expected: &str,
) -> Result<Option<T>, DcasimError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| invalid(section, key, format!("expected {expected}, got '{raw}'"))),
    }
}

fn validate_directory(config: &dyn ConfigPort) -> Result<(), DcasimError> {
    match config.get_string("data", "directory") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(DcasimError::ConfigMissing {
            section: "data".to_string(),
            key: "directory".to_string(),
        }),
    }
}

fn validate_period(config: &dyn ConfigPort) -> Result<(), DcasimError> {
    if let Some(raw) = config.get_string("data", "period_years") {
        if raw.trim().eq_ignore_ascii_case("max") {
            return Ok(());
        }
        let years: Option<i64> = parse_present(config, "data", "period_years", "an integer or 'max'")?;
        if years.is_some_and(|y| y < 1) {
            return Err(invalid("data", "period_years", "period_years must be at least 1"));
        }
    }
    Ok(())
}

fn validate_amount(config: &dyn ConfigPort) -> Result<(), DcasimError> {
    let amount: Option<f64> = parse_present(config, "simulation", "investment_amount", "a number")?;
    if amount.is_some_and(|a| !a.is_finite() || a <= 0.0) {
        return Err(invalid(
            "simulation",
            "investment_amount",
            "investment_amount must be positive",
        ));
    }
    Ok(())
}

fn validate_start_date(config: &dyn ConfigPort) -> Result<(), DcasimError> {
    if let Some(s) = config.get_string("simulation", "start_date") {
        NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| {
            invalid(
                "simulation",
                "start_date",
                "invalid start_date format, expected YYYY-MM-DD",
            )
        })?;
    }
    Ok(())
}

fn validate_frequency(config: &dyn ConfigPort) -> Result<(), DcasimError> {
    for key in ["frequency_months", "frequency_weeks"] {
        let n: Option<i64> = parse_present(config, "simulation", key, "an integer")?;
        if n.is_some_and(|n| n < 1) {
            return Err(invalid("simulation", key, format!("{key} must be at least 1")));
        }
    }
    Ok(())
}

fn validate_ma_length(config: &dyn ConfigPort) -> Result<(), DcasimError> {
    let n: Option<i64> = parse_present(config, "simulation", "ma_length", "an integer")?;
    if n.is_some_and(|n| n < 1) {
        return Err(invalid("simulation", "ma_length", "ma_length must be at least 1"));
    }
    Ok(())
}

fn validate_flags(config: &dyn ConfigPort) -> Result<(), DcasimError> {
    if let Some(raw) = config.get_string("simulation", "use_ma_strategy") {
        if !matches!(
            raw.trim().to_lowercase().as_str(),
            "true" | "yes" | "1" | "false" | "no" | "0"
        ) {
            return Err(invalid(
                "simulation",
                "use_ma_strategy",
                format!("expected a boolean, got '{raw}'"),
            ));
        }
    }
    if let Some(raw) = config.get_string("simulation", "missing_signal") {
        raw.parse::<MissingSignalPolicy>()
            .map_err(|reason| invalid("simulation", "missing_signal", reason))?;
    }
    Ok(())
}

fn validate_report(config: &dyn ConfigPort) -> Result<(), DcasimError> {
    if let Some(raw) = config.get_string("report", "format") {
        if !matches!(raw.trim().to_lowercase().as_str(), "json" | "csv") {
            return Err(invalid(
                "report",
                "format",
                format!("expected 'json' or 'csv', got '{raw}'"),
            ));
        }
    }
    Ok(())
}
