//! CSV report adapter.
//!
//! Writes the full trace as a CSV table at the requested path, plus a
//! small `<stem>.summary.csv` next to it with the scalar metrics. Both
//! are plain tables a charting or spreadsheet collaborator can consume
//! directly.

use crate::domain::error::TradesimError;
use crate::domain::metrics::PerformanceReport;
use crate::domain::simulator::SimulationTrace;
use crate::ports::report_port::ReportPort;
use std::path::Path;

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }

    fn summary_path(output_path: &str) -> std::path::PathBuf {
        let path = Path::new(output_path);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report".to_string());
        path.with_file_name(format!("{stem}.summary.csv"))
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        trace: &SimulationTrace,
        report: &PerformanceReport,
        output_path: &str,
    ) -> Result<(), TradesimError> {
        let mut wtr = csv::Writer::from_path(output_path).map_err(|e| TradesimError::Data {
            reason: format!("failed to open {output_path}: {e}"),
        })?;

        wtr.write_record([
            "date",
            "close",
            "signal",
            "shares_held",
            "cash",
            "transaction_cost_paid",
            "position_open",
            "portfolio_value",
            "benchmark_cumulative_return",
            "strategy_cumulative_return",
        ])
        .map_err(|e| TradesimError::Data {
            reason: format!("CSV write error: {e}"),
        })?;

        for (i, row) in trace.rows().iter().enumerate() {
            wtr.write_record([
                row.date.to_string(),
                row.close.to_string(),
                row.signal.to_string(),
                row.shares_held.to_string(),
                row.cash.to_string(),
                row.transaction_cost_paid.to_string(),
                row.position_open.to_string(),
                row.portfolio_value.to_string(),
                report.cumulative_return_curve[i].to_string(),
                report.strategy_cumulative_return_curve[i].to_string(),
            ])
            .map_err(|e| TradesimError::Data {
                reason: format!("CSV write error: {e}"),
            })?;
        }

        wtr.flush().map_err(|e| TradesimError::Data {
            reason: format!("CSV flush error: {e}"),
        })?;

        let summary_path = Self::summary_path(output_path);
        let mut summary =
            csv::Writer::from_path(&summary_path).map_err(|e| TradesimError::Data {
                reason: format!("failed to open {}: {}", summary_path.display(), e),
            })?;

        let pairs: [(&str, String); 5] = [
            ("total_return_pct", report.total_return_pct.to_string()),
            ("sharpe_ratio", report.sharpe_ratio.to_string()),
            ("max_drawdown_pct", report.max_drawdown_pct.to_string()),
            ("win_rate_pct", report.win_rate_pct.to_string()),
            ("closed_trades", report.closed_trades.to_string()),
        ];

        summary
            .write_record(["metric", "value"])
            .and_then(|_| {
                for (metric, value) in &pairs {
                    summary.write_record([*metric, value.as_str()])?;
                }
                summary.flush()?;
                Ok(())
            })
            .map_err(|e| TradesimError::Data {
                reason: format!("CSV write error: {e}"),
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::PerformanceReport;
    use crate::domain::series::{
        PricePoint, PriceSeries, Signal, SignalPoint, SignalSeries,
    };
    use crate::domain::simulator::{simulate, SimulationConfig};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample_run() -> (SimulationTrace, PerformanceReport) {
        let closes = [100.0, 110.0, 90.0];
        let seq = [Signal::Buy, Signal::Hold, Signal::Sell];
        let prices = PriceSeries::new(
            closes
                .iter()
                .enumerate()
                .map(|(i, &close)| PricePoint {
                    date: NaiveDate::from_ymd_opt(2024, 1, i as u32 + 1).unwrap(),
                    close,
                })
                .collect(),
        )
        .unwrap();
        let signals = SignalSeries::new(
            seq.iter()
                .enumerate()
                .map(|(i, &signal)| SignalPoint {
                    date: NaiveDate::from_ymd_opt(2024, 1, i as u32 + 1).unwrap(),
                    signal,
                })
                .collect(),
        )
        .unwrap();
        let trace = simulate(&prices, &signals, &SimulationConfig::default()).unwrap();
        let report = PerformanceReport::compute(&trace, 10_000.0, 0.01).unwrap();
        (trace, report)
    }

    #[test]
    fn writes_one_row_per_timestamp_plus_header() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("trace.csv");
        let (trace, report) = sample_run();

        CsvReportAdapter::new()
            .write(&trace, &report, out.to_str().unwrap())
            .unwrap();

        let content = std::fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("date,close,signal"));
        assert!(lines[1].starts_with("2024-01-01,100,buy"));
        assert!(lines[3].contains("sell"));
    }

    #[test]
    fn writes_summary_sidecar() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("trace.csv");
        let (trace, report) = sample_run();

        CsvReportAdapter::new()
            .write(&trace, &report, out.to_str().unwrap())
            .unwrap();

        let summary = std::fs::read_to_string(dir.path().join("trace.summary.csv")).unwrap();
        assert!(summary.contains("total_return_pct"));
        assert!(summary.contains("win_rate_pct"));
        assert!(summary.contains("closed_trades,1"));
    }

    #[test]
    fn unwritable_path_is_a_data_error() {
        let (trace, report) = sample_run();
        let result =
            CsvReportAdapter::new().write(&trace, &report, "/nonexistent/dir/trace.csv");
        assert!(matches!(result, Err(TradesimError::Data { .. })));
    }
}
