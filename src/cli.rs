//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::console_report_adapter::ConsoleReportAdapter;
use crate::adapters::csv_history_adapter::CsvHistoryAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::run_backtest;
use crate::domain::config_validation::{build_request, data_path, RequestOverrides};
use crate::domain::error::RewindError;
use crate::domain::strategy::StrategyRegistry;
use crate::ports::history_port::HistoryPort;

#[derive(Parser, Debug)]
#[command(
    name = "traderewind",
    about = "Replay a trading strategy against historical daily prices"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Ticker symbol or company name
        #[arg(short, long)]
        ticker: Option<String>,
        #[arg(long)]
        start_date: Option<NaiveDate>,
        #[arg(long)]
        end_date: Option<NaiveDate>,
        #[arg(short, long)]
        strategy: Option<String>,
        /// Starting capital
        #[arg(long)]
        capital: Option<f64>,
        /// Directory of per-ticker CSV files
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// List instruments available in the data directory
    ListTickers {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Show the available date range for one instrument
    Info {
        #[arg(short, long)]
        ticker: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            ticker,
            start_date,
            end_date,
            strategy,
            capital,
            data_dir,
        } => {
            let overrides = RequestOverrides {
                ticker,
                start_date,
                end_date,
                strategy,
                initial_capital: capital,
            };
            run_backtest_command(config.as_deref(), data_dir.as_deref(), &overrides)
        }
        Command::ListTickers { config, data_dir } => {
            run_list_tickers(config.as_deref(), data_dir.as_deref())
        }
        Command::Info {
            ticker,
            config,
            data_dir,
        } => run_info(&ticker, config.as_deref(), data_dir.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, ExitCode> {
    match path {
        None => Ok(FileConfigAdapter::empty()),
        Some(path) => FileConfigAdapter::from_file(path).map_err(|e| {
            let err = RewindError::ConfigParse {
                file: path.display().to_string(),
                reason: e.to_string(),
            };
            eprintln!("error: {err}");
            ExitCode::from(&err)
        }),
    }
}

fn open_history(
    adapter: &FileConfigAdapter,
    data_dir: Option<&Path>,
) -> Result<CsvHistoryAdapter, RewindError> {
    let dir = data_path(adapter, data_dir.map(|p| p.to_string_lossy().into_owned()).as_deref())?;
    CsvHistoryAdapter::load(Path::new(&dir))
}

fn run_backtest_command(
    config_path: Option<&Path>,
    data_dir: Option<&Path>,
    overrides: &RequestOverrides,
) -> ExitCode {
    // Stage 1: config
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    // Stage 2: typed request
    let request = match build_request(&adapter, overrides) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!(
        "Backtesting '{}' with strategy '{}'",
        request.ticker, request.strategy
    );

    // Stage 3: data
    let history = match open_history(&adapter, data_dir) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 4: run
    let registry = StrategyRegistry::default();
    match run_backtest(&history, &registry, &ConsoleReportAdapter, &request) {
        Ok(outcome) => {
            eprintln!("Done: {} simulated days", outcome.series.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_list_tickers(config_path: Option<&Path>, data_dir: Option<&Path>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let history = match open_history(&adapter, data_dir) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match history.list_instruments() {
        Ok(instruments) => {
            for (ticker, company) in instruments {
                println!("{ticker}\t{company}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_info(ticker: &str, config_path: Option<&Path>, data_dir: Option<&Path>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let history = match open_history(&adapter, data_dir) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match history.available_range(ticker) {
        Ok((first, last, rows)) => {
            println!("{ticker}: {rows} rows, {first} .. {last}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
