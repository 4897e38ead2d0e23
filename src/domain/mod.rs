//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod series;
pub mod cadence;
pub mod allocation;
pub mod portfolio;
pub mod history;
pub mod simulation;
pub mod summary;
pub mod catalog;
pub mod config_validation;
pub mod error;
