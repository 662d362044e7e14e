//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::config_validation::{
    validate_simulation_config, EXIT_RULE_SIGNAL, EXIT_RULE_THRESHOLD,
};
use crate::domain::error::TradesimError;
use crate::domain::metrics::{PerformanceReport, DEFAULT_RISK_FREE_RATE};
use crate::domain::series::{ensure_aligned, PriceSeries, SignalSeries};
use crate::domain::simulator::{simulate, ExitRule, SimulationConfig};
use crate::domain::sweep::{run_sweep, SweepCase};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "tradesim", about = "Signal-series trade simulator and scorer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Simulate a signal series against prices and score the result
    Run {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        prices: PathBuf,
        #[arg(long)]
        signals: PathBuf,
        /// Write the trace (and a .summary.csv sidecar) here
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write the full run as a JSON document here
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Re-run the same series across a list of transaction costs
    Sweep {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        prices: PathBuf,
        #[arg(long)]
        signals: PathBuf,
        /// Comma-separated per-trade costs, e.g. 0,5,10
        #[arg(long)]
        costs: String,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show row counts, date ranges and signal tallies for input files
    Info {
        #[arg(long)]
        prices: PathBuf,
        #[arg(long)]
        signals: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            prices,
            signals,
            output,
            json,
        } => run_simulation(&config, &prices, &signals, output.as_ref(), json.as_ref()),
        Command::Sweep {
            config,
            prices,
            signals,
            costs,
        } => run_cost_sweep(&config, &prices, &signals, &costs),
        Command::Validate { config } => run_validate(&config),
        Command::Info { prices, signals } => run_info(&prices, signals.as_ref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = TradesimError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Build the simulation parameters and risk-free rate from a validated
/// config.
pub fn build_simulation_config(
    adapter: &dyn ConfigPort,
) -> Result<(SimulationConfig, f64), TradesimError> {
    let rule = adapter
        .get_str("simulation", "exit_rule")
        .unwrap_or_else(|| EXIT_RULE_SIGNAL.to_string());

    let exit_rule = match rule.as_str() {
        EXIT_RULE_SIGNAL => ExitRule::SignalDriven,
        EXIT_RULE_THRESHOLD => ExitRule::Threshold {
            take_profit: adapter.get_float("simulation", "take_profit", 0.05),
            stop_loss: adapter.get_float("simulation", "stop_loss", 0.02),
        },
        other => {
            return Err(TradesimError::ConfigInvalid {
                section: "simulation".into(),
                key: "exit_rule".into(),
                reason: format!("unknown exit_rule {other:?}"),
            });
        }
    };

    let config = SimulationConfig {
        initial_balance: adapter.get_float("simulation", "initial_balance", 10_000.0),
        transaction_cost: adapter.get_float("simulation", "transaction_cost", 10.0),
        exit_rule,
    };
    let risk_free_rate =
        adapter.get_float("metrics", "risk_free_rate", DEFAULT_RISK_FREE_RATE);

    Ok((config, risk_free_rate))
}

fn load_series(
    prices_path: &PathBuf,
    signals_path: &PathBuf,
) -> Result<(PriceSeries, SignalSeries), TradesimError> {
    let adapter = CsvAdapter::new(prices_path.clone(), signals_path.clone());
    let prices = adapter.fetch_prices()?;
    let signals = adapter.fetch_signals()?;
    Ok((prices, signals))
}

fn run_simulation(
    config_path: &PathBuf,
    prices_path: &PathBuf,
    signals_path: &PathBuf,
    output_path: Option<&PathBuf>,
    json_path: Option<&PathBuf>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_simulation_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let (sim_config, risk_free_rate) = match build_simulation_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "Loading series from {} and {}",
        prices_path.display(),
        signals_path.display()
    );
    let (prices, signals) = match load_series(prices_path, signals_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("Simulating {} rows", prices.len());
    let trace = match simulate(&prices, &signals, &sim_config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let report =
        match PerformanceReport::compute(&trace, sim_config.initial_balance, risk_free_rate) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

    print_summary(&report);

    if let Some(path) = output_path {
        let writer = CsvReportAdapter::new();
        if let Err(e) = writer.write(&trace, &report, &path.display().to_string()) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        eprintln!("Trace written to {}", path.display());
    }

    if let Some(path) = json_path {
        let writer = JsonReportAdapter::new();
        if let Err(e) = writer.write(&trace, &report, &path.display().to_string()) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        eprintln!("JSON report written to {}", path.display());
    }

    ExitCode::SUCCESS
}

fn print_summary(report: &PerformanceReport) {
    eprintln!("\n=== Results ===");
    eprintln!("Total Return:   {:.2}%", report.total_return_pct);
    eprintln!("Sharpe Ratio:   {:.2}", report.sharpe_ratio);
    eprintln!("Max Drawdown:   {:.2}%", report.max_drawdown_pct);
    eprintln!("Win Rate:       {:.1}%", report.win_rate_pct);
    eprintln!("Closed Trades:  {}", report.closed_trades);
}

pub fn parse_cost_list(input: &str) -> Result<Vec<f64>, TradesimError> {
    let mut costs = Vec::new();
    for token in input.split(',') {
        let trimmed = token.trim();
        let value: f64 = trimmed.parse().map_err(|_| TradesimError::ConfigInvalid {
            section: "sweep".into(),
            key: "costs".into(),
            reason: format!("not a number: {trimmed:?}"),
        })?;
        if value < 0.0 {
            return Err(TradesimError::ConfigInvalid {
                section: "sweep".into(),
                key: "costs".into(),
                reason: format!("negative cost: {value}"),
            });
        }
        costs.push(value);
    }
    Ok(costs)
}

fn run_cost_sweep(
    config_path: &PathBuf,
    prices_path: &PathBuf,
    signals_path: &PathBuf,
    costs: &str,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_simulation_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let (base_config, risk_free_rate) = match build_simulation_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let costs = match parse_cost_list(costs) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let (prices, signals) = match load_series(prices_path, signals_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let cases: Vec<SweepCase> = costs
        .iter()
        .map(|&transaction_cost| SweepCase {
            label: format!("cost {transaction_cost}"),
            config: SimulationConfig {
                transaction_cost,
                ..base_config.clone()
            },
        })
        .collect();

    eprintln!("Sweeping {} configurations over {} rows", cases.len(), prices.len());
    let outcomes = run_sweep(&prices, &signals, &cases, risk_free_rate);

    println!(
        "{:<12} {:>12} {:>8} {:>12} {:>9} {:>7}",
        "case", "return%", "sharpe", "drawdown%", "winrate%", "trades"
    );
    let mut failed = false;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(report) => println!(
                "{:<12} {:>12.2} {:>8.2} {:>12.2} {:>9.1} {:>7}",
                outcome.label,
                report.total_return_pct,
                report.sharpe_ratio,
                report.max_drawdown_pct,
                report.win_rate_pct,
                report.closed_trades,
            ),
            Err(e) => {
                failed = true;
                println!("{:<12} error: {e}", outcome.label);
            }
        }
    }

    if failed {
        ExitCode::from(5)
    } else {
        ExitCode::SUCCESS
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match validate_simulation_config(&adapter) {
        Ok(()) => {
            eprintln!("{} is valid", config_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_info(prices_path: &PathBuf, signals_path: Option<&PathBuf>) -> ExitCode {
    // The signal file is optional here; reuse the adapter with a dummy
    // signal path when only prices are inspected.
    let signals_file = signals_path.cloned().unwrap_or_else(|| prices_path.clone());
    let adapter = CsvAdapter::new(prices_path.clone(), signals_file);

    let prices = match adapter.fetch_prices() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    println!("prices: {} rows", prices.len());
    if let Some((first, last)) = prices.date_range() {
        println!("  range: {first} to {last}");
    }

    if signals_path.is_some() {
        let signals = match adapter.fetch_signals() {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };
        let (buys, holds, sells) = signals.tally();
        println!("signals: {} rows", signals.len());
        println!("  buy: {buys}  hold: {holds}  sell: {sells}");

        match ensure_aligned(&prices, &signals) {
            Ok(()) => println!("alignment: ok"),
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }

    ExitCode::SUCCESS
}
