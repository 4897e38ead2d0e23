//! CLI definition and dispatch.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report::JsonReportAdapter;
use crate::domain::allocation::MissingSignalPolicy;
use crate::domain::cadence::Cadence;
use crate::domain::catalog;
use crate::domain::config_validation::{validate_data_config, validate_simulation_config};
use crate::domain::error::DcasimError;
use crate::domain::indicator::IndicatorType;
use crate::domain::series::{prepare_series, SeriesWithSignal};
use crate::domain::simulation::{self, parse_start_date, SimulationParams, SimulationResult};
use crate::domain::summary::SimulationSummary;
use crate::logging::{init_logging, LoggingConfig};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::{DataPort, Period};
use crate::ports::report_port::{ReportContext, ReportPort};

pub const DEFAULT_AMOUNT: f64 = 100.0;
pub const DEFAULT_START_DATE: &str = "2018-01-01";
pub const DEFAULT_FREQUENCY_MONTHS: i64 = 1;
pub const DEFAULT_MA_LENGTH: i64 = 10;
pub const DEFAULT_PERIOD_YEARS: i64 = 5;

#[derive(Parser, Debug)]
#[command(name = "dcasim", about = "Dollar-cost averaging backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Json,
    Csv,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a periodic investment simulation
    Simulate {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        amount: Option<f64>,
        #[arg(long)]
        frequency_months: Option<i64>,
        #[arg(long, conflicts_with = "frequency_months")]
        frequency_weeks: Option<i64>,
        #[arg(long)]
        ma_length: Option<i64>,
        /// Only buy while the price is above its moving average
        #[arg(long)]
        use_ma: bool,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum)]
        format: Option<ReportFormat>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Print a prepared price series with its moving average as JSON
    Series {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
        #[arg(long)]
        ma_length: Option<i64>,
    },
    /// List catalogue tickers and those available in the data directory
    Tickers {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct SimulationOverrides {
    pub start_date: Option<String>,
    pub amount: Option<f64>,
    pub frequency_months: Option<i64>,
    pub frequency_weeks: Option<i64>,
    pub ma_length: Option<i64>,
    pub use_ma: bool,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Simulate {
            config,
            ticker,
            start_date,
            amount,
            frequency_months,
            frequency_weeks,
            ma_length,
            use_ma,
            output,
            format,
            dry_run,
        } => {
            let overrides = SimulationOverrides {
                start_date,
                amount,
                frequency_months,
                frequency_weeks,
                ma_length,
                use_ma,
            };
            run_simulate(
                &config,
                ticker.as_deref(),
                &overrides,
                output.as_ref(),
                format,
                dry_run,
            )
        }
        Command::Series {
            config,
            ticker,
            ma_length,
        } => run_series(&config, ticker.as_deref(), ma_length),
        Command::Tickers { config } => run_tickers(config.as_ref()),
        Command::Validate { config } => run_validate(&config),
    }
}

fn fail(err: DcasimError) -> ExitCode {
    tracing::error!(error = %err, "command failed");
    eprintln!("error: {err}");
    (&err).into()
}

/// Loads the INI file and starts logging at its `[logging] level`.
pub fn load_config(path: &Path) -> Result<FileConfigAdapter, DcasimError> {
    let adapter = FileConfigAdapter::from_file(path)?;
    init_logging(&LoggingConfig::new(adapter.get_string("logging", "level")));
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(adapter)
}

pub fn resolve_ticker(
    ticker_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<String, DcasimError> {
    ticker_override
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .or_else(|| config.get_string("simulation", "ticker"))
        .map(|t| t.to_uppercase())
        .ok_or_else(|| DcasimError::ConfigMissing {
            section: "simulation".into(),
            key: "ticker".into(),
        })
}

pub fn resolve_period(config: &dyn ConfigPort) -> Result<Period, DcasimError> {
    match config.get_string("data", "period_years") {
        Some(raw) if raw.trim().eq_ignore_ascii_case("max") => Ok(Period::Max),
        Some(raw) => raw
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|&y| y >= 1)
            .map(Period::Years)
            .ok_or_else(|| DcasimError::ConfigInvalid {
                section: "data".into(),
                key: "period_years".into(),
                reason: format!("expected a positive integer or 'max', got '{raw}'"),
            }),
        None => Ok(Period::Years(DEFAULT_PERIOD_YEARS as u32)),
    }
}

fn window_from(n: i64) -> Result<usize, DcasimError> {
    usize::try_from(n)
        .ok()
        .filter(|&w| w >= 1)
        .ok_or(DcasimError::InvalidWindow { window: n })
}

pub fn build_params(
    config: &dyn ConfigPort,
    overrides: &SimulationOverrides,
) -> Result<SimulationParams, DcasimError> {
    let contribution_amount = overrides.amount.unwrap_or_else(|| {
        config.get_double("simulation", "investment_amount", DEFAULT_AMOUNT)
    });

    let start_str = overrides
        .start_date
        .clone()
        .or_else(|| config.get_string("simulation", "start_date"))
        .unwrap_or_else(|| DEFAULT_START_DATE.to_string());
    let start_date = parse_start_date(&start_str)?;

    let cadence = match (overrides.frequency_weeks, overrides.frequency_months) {
        (Some(weeks), _) => Cadence::weekly(weeks)?,
        (None, Some(months)) => Cadence::monthly(months)?,
        (None, None) => match config.get_string("simulation", "frequency_weeks") {
            Some(_) => Cadence::weekly(config.get_int("simulation", "frequency_weeks", 0))?,
            None => Cadence::monthly(config.get_int(
                "simulation",
                "frequency_months",
                DEFAULT_FREQUENCY_MONTHS,
            ))?,
        },
    };

    let ma_window = window_from(
        overrides
            .ma_length
            .unwrap_or_else(|| config.get_int("simulation", "ma_length", DEFAULT_MA_LENGTH)),
    )?;

    let missing_signal = match config.get_string("simulation", "missing_signal") {
        Some(raw) => raw
            .parse::<MissingSignalPolicy>()
            .map_err(|reason| DcasimError::ConfigInvalid {
                section: "simulation".into(),
                key: "missing_signal".into(),
                reason,
            })?,
        None => MissingSignalPolicy::default(),
    };

    let params = SimulationParams {
        contribution_amount,
        start_date,
        cadence,
        ma_window,
        use_ma_strategy: overrides.use_ma
            || config.get_bool("simulation", "use_ma_strategy", false),
        missing_signal,
    };
    params.validate()?;
    Ok(params)
}

pub fn resolve_format(
    format_override: Option<ReportFormat>,
    output: Option<&Path>,
    config: &dyn ConfigPort,
) -> ReportFormat {
    if let Some(f) = format_override {
        return f;
    }
    if let Some(f) = config.get_string("report", "format") {
        if f.eq_ignore_ascii_case("csv") {
            return ReportFormat::Csv;
        }
        return ReportFormat::Json;
    }
    match output.and_then(|p| p.extension()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => ReportFormat::Csv,
        _ => ReportFormat::Json,
    }
}

/// Fetch, prepare and simulate one ticker.
pub fn run_simulation_pipeline(
    data_port: &dyn DataPort,
    ticker: &str,
    period: Period,
    params: &SimulationParams,
) -> Result<(SeriesWithSignal, SimulationResult), DcasimError> {
    let raw = data_port.fetch_series(ticker, period)?;
    tracing::info!(ticker, rows = raw.len(), "fetched price series");

    let series = prepare_series(raw, params.ma_window)?;
    let result = simulation::simulate(&series, None, params)?;
    Ok((series, result))
}

fn print_summary(
    ticker: &str,
    series: &SeriesWithSignal,
    params: &SimulationParams,
    summary: &SimulationSummary,
) {
    let name = catalog::lookup(ticker).map(|l| l.name).unwrap_or("");
    eprintln!("\n=== {} {} ===", ticker, name);
    if let (Some(first), Some(last)) = (series.first_date(), series.last_date()) {
        eprintln!("Data:             {} points, {} to {}", series.len(), first, last);
    }
    eprintln!(
        "Plan:             {:.2} {} from {}",
        params.contribution_amount, params.cadence, params.start_date
    );
    if params.use_ma_strategy {
        eprintln!(
            "MA filter:        {} on close",
            IndicatorType::Sma(params.ma_window)
        );
    }
    eprintln!(
        "Contributions:    {} ({} asset, {} cash)",
        summary.contributions, summary.asset_contributions, summary.cash_contributions
    );
    eprintln!("Total Invested:   {:.2}", summary.total_invested);
    eprintln!("Shares Held:      {:.4}", summary.final_shares);
    eprintln!("Cash Balance:     {:.2}", summary.cash_balance);
    eprintln!("Final Value:      {:.2}", summary.final_value);
    eprintln!(
        "Gain:             {:.2} ({:.2}%)",
        summary.gain,
        summary.total_return * 100.0
    );
}

fn run_simulate(
    config_path: &Path,
    ticker_override: Option<&str>,
    overrides: &SimulationOverrides,
    output_override: Option<&PathBuf>,
    format_override: Option<ReportFormat>,
    dry_run: bool,
) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    if let Err(e) =
        validate_data_config(&config).and_then(|_| validate_simulation_config(&config))
    {
        return fail(e);
    }

    // Stage 2: Resolve parameters
    let (ticker, period, params) = match resolve_ticker(ticker_override, &config).and_then(|t| {
        Ok((t, resolve_period(&config)?, build_params(&config, overrides)?))
    }) {
        Ok(v) => v,
        Err(e) => return fail(e),
    };

    let output = output_override
        .cloned()
        .or_else(|| config.get_string("report", "output").map(PathBuf::from));
    let format = resolve_format(format_override, output.as_deref(), &config);

    if dry_run {
        eprintln!("\nTicker:    {}", ticker);
        eprintln!("Period:    {:?}", period);
        eprintln!(
            "Plan:      {:.2} {} from {}",
            params.contribution_amount, params.cadence, params.start_date
        );
        eprintln!(
            "MA filter: {} (window {}, missing signal {:?})",
            params.use_ma_strategy, params.ma_window, params.missing_signal
        );
        let target = output
            .as_ref()
            .map_or("stdout".to_string(), |p| p.display().to_string());
        eprintln!("Report:    {:?} -> {}", format, target);
        eprintln!("\nDry run complete: configuration is valid");
        return ExitCode::SUCCESS;
    }

    // Stage 3: Fetch, prepare, simulate
    let data_dir = config
        .get_string("data", "directory")
        .map(PathBuf::from)
        .unwrap_or_default();
    let data_port = CsvAdapter::new(data_dir);

    let (series, result) = match run_simulation_pipeline(&data_port, &ticker, period, &params) {
        Ok(v) => v,
        Err(e) => return fail(e),
    };

    // Stage 4: Summarise and report
    let summary = SimulationSummary::compute(&result);
    print_summary(&ticker, &series, &params, &summary);

    let ctx = ReportContext {
        ticker: &ticker,
        params: &params,
        result: &result,
        summary: &summary,
    };

    let written = match (&output, format) {
        (Some(path), ReportFormat::Json) => JsonReportAdapter.write(&ctx, path),
        (Some(path), ReportFormat::Csv) => CsvReportAdapter.write(&ctx, path),
        (None, ReportFormat::Json) => JsonReportAdapter::render(&ctx).map(|body| println!("{body}")),
        (None, ReportFormat::Csv) => CsvReportAdapter::write_to(&ctx, std::io::stdout().lock()),
    };

    match written {
        Ok(()) => {
            if let Some(path) = &output {
                eprintln!("\nReport written to: {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_series(
    config_path: &Path,
    ticker_override: Option<&str>,
    ma_length: Option<i64>,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    if let Err(e) = validate_data_config(&config) {
        return fail(e);
    }

    let prepared = resolve_ticker(ticker_override, &config).and_then(|ticker| {
        let window = window_from(
            ma_length.unwrap_or_else(|| config.get_int("simulation", "ma_length", DEFAULT_MA_LENGTH)),
        )?;
        let period = resolve_period(&config)?;
        let data_dir = config
            .get_string("data", "directory")
            .map(PathBuf::from)
            .unwrap_or_default();
        let raw = CsvAdapter::new(data_dir).fetch_series(&ticker, period)?;
        let series = prepare_series(raw, window)?;
        serde_json::to_string_pretty(&series).map_err(|e| DcasimError::Report {
            reason: format!("failed to serialise series: {}", e),
        })
    });

    match prepared {
        Ok(body) => {
            println!("{body}");
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_tickers(config_path: Option<&PathBuf>) -> ExitCode {
    for listing in catalog::all() {
        println!("{}\t{}", listing.ticker, listing.name);
    }

    let Some(config_path) = config_path else {
        return ExitCode::SUCCESS;
    };
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let Some(dir) = config.get_string("data", "directory") else {
        return fail(DcasimError::ConfigMissing {
            section: "data".into(),
            key: "directory".into(),
        });
    };

    match CsvAdapter::new(PathBuf::from(&dir)).list_tickers() {
        Ok(tickers) => {
            eprintln!("\nAvailable in {}:", dir);
            for t in &tickers {
                let marker = if catalog::lookup(t).is_some() { "*" } else { " " };
                println!("{} {}", marker, t);
            }
            eprintln!("{} tickers found", tickers.len());
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    let checked = validate_data_config(&config)
        .and_then(|_| validate_simulation_config(&config))
        .and_then(|_| resolve_ticker(None, &config))
        .and_then(|ticker| Ok((ticker, build_params(&config, &SimulationOverrides::default())?)));

    match checked {
        Ok((ticker, params)) => {
            eprintln!("  ticker:  {}", ticker);
            eprintln!(
                "  plan:    {:.2} {} from {}",
                params.contribution_amount, params.cadence, params.start_date
            );
            eprintln!("\nConfiguration is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}
