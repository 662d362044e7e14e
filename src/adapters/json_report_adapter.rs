//! JSON report adapter.
//!
//! Serializes the whole run — scalar metrics, both curves, the trace
//! rows, and the closed-trade log — as one pretty-printed JSON document.

use crate::domain::error::TradesimError;
use crate::domain::metrics::PerformanceReport;
use crate::domain::simulator::SimulationTrace;
use crate::ports::report_port::ReportPort;
use serde::Serialize;
use std::fs;

#[derive(Serialize)]
struct RunDocument<'a> {
    report: &'a PerformanceReport,
    trace: &'a SimulationTrace,
}

pub struct JsonReportAdapter;

impl JsonReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(
        &self,
        trace: &SimulationTrace,
        report: &PerformanceReport,
        output_path: &str,
    ) -> Result<(), TradesimError> {
        let document = RunDocument { report, trace };
        let json = serde_json::to_string_pretty(&document).map_err(|e| TradesimError::Data {
            reason: format!("JSON serialization error: {e}"),
        })?;
        fs::write(output_path, json).map_err(|e| TradesimError::Data {
            reason: format!("failed to write {output_path}: {e}"),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn document_contains_report_and_trace() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("run.json");
        let (trace, report) = sample_run();

        JsonReportAdapter::new()
            .write(&trace, &report, out.to_str().unwrap())
            .unwrap();

        let content = fs::read_to_string(&out).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert!(value["report"]["total_return_pct"].is_number());
        assert_eq!(value["trace"]["rows"].as_array().unwrap().len(), 3);
        assert_eq!(
            value["trace"]["closed_trades"].as_array().unwrap().len(),
            1
        );
        assert_eq!(value["trace"]["rows"][0]["signal"], "buy");
    }

    #[test]
    fn unwritable_path_is_a_data_error() {
        let (trace, report) = sample_run();
        let result =
            JsonReportAdapter::new().write(&trace, &report, "/nonexistent/dir/run.json");
        assert!(matches!(result, Err(TradesimError::Data { .. })));
    }
}
