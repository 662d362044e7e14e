//! CSV file data adapter.
//!
//! Loads the two input files the engine consumes: a `date,close` price
//! file and a `date,signal` file. Signal cells accept `1/0/-1` or
//! `buy/hold/sell` (case-insensitive). Both files must have a header
//! row. Series validation (ordering, positive closes) happens in the
//! series constructors; this adapter adds row-level parse context.

use crate::domain::error::TradesimError;
use crate::domain::series::{
    PricePoint, PriceSeries, Signal, SignalPoint, SignalSeries,
};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    prices_path: PathBuf,
    signals_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(prices_path: PathBuf, signals_path: PathBuf) -> Self {
        Self {
            prices_path,
            signals_path,
        }
    }
}

fn read_file(path: &PathBuf) -> Result<String, TradesimError> {
    fs::read_to_string(path).map_err(|e| TradesimError::Data {
        reason: format!("failed to read {}: {}", path.display(), e),
    })
}

fn parse_date(raw: &str, row: usize) -> Result<NaiveDate, TradesimError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| TradesimError::Data {
        reason: format!("row {row}: invalid date {raw:?}: {e}"),
    })
}

fn field<'a>(
    record: &'a csv::StringRecord,
    index: usize,
    name: &str,
    row: usize,
) -> Result<&'a str, TradesimError> {
    record.get(index).ok_or_else(|| TradesimError::Data {
        reason: format!("row {row}: missing {name} column"),
    })
}

impl DataPort for CsvAdapter {
    fn fetch_prices(&self) -> Result<PriceSeries, TradesimError> {
        let content = read_file(&self.prices_path)?;
        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut points = Vec::new();

        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| TradesimError::Data {
                reason: format!("CSV parse error in {}: {}", self.prices_path.display(), e),
            })?;

            let date = parse_date(field(&record, 0, "date", row)?, row)?;
            let close: f64 = field(&record, 1, "close", row)?
                .trim()
                .parse()
                .map_err(|e| TradesimError::Data {
                    reason: format!("row {row}: invalid close value: {e}"),
                })?;

            points.push(PricePoint { date, close });
        }

        PriceSeries::new(points)
    }

    fn fetch_signals(&self) -> Result<SignalSeries, TradesimError> {
        let content = read_file(&self.signals_path)?;
        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut points = Vec::new();

        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| TradesimError::Data {
                reason: format!("CSV parse error in {}: {}", self.signals_path.display(), e),
            })?;

            let date = parse_date(field(&record, 0, "date", row)?, row)?;
            let raw = field(&record, 1, "signal", row)?;
            let signal = Signal::parse(raw).ok_or_else(|| TradesimError::InvalidSignal {
                date,
                value: raw.trim().to_string(),
            })?;

            points.push(SignalPoint { date, signal });
        }

        SignalSeries::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_files(prices: &str, signals: &str) -> (TempDir, CsvAdapter) {
        let dir = TempDir::new().unwrap();
        let prices_path = dir.path().join("prices.csv");
        let signals_path = dir.path().join("signals.csv");
        fs::write(&prices_path, prices).unwrap();
        fs::write(&signals_path, signals).unwrap();
        (dir, CsvAdapter::new(prices_path, signals_path))
    }

    #[test]
    fn fetch_prices_parses_rows_in_order() {
        let (_dir, adapter) = write_files(
            "date,close\n2024-01-15,100.5\n2024-01-16,101.25\n",
            "date,signal\n",
        );

        let series = adapter.fetch_prices().unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(
            series.points()[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert_eq!(series.points()[0].close, 100.5);
        assert_eq!(series.points()[1].close, 101.25);
    }

    #[test]
    fn fetch_signals_accepts_both_vocabularies() {
        let (_dir, adapter) = write_files(
            "date,close\n",
            "date,signal\n2024-01-15,1\n2024-01-16,hold\n2024-01-17,-1.0\n2024-01-18,SELL\n",
        );

        let series = adapter.fetch_signals().unwrap();
        let signals: Vec<Signal> = series.points().iter().map(|p| p.signal).collect();
        assert_eq!(
            signals,
            vec![Signal::Buy, Signal::Hold, Signal::Sell, Signal::Sell]
        );
    }

    #[test]
    fn unknown_signal_cell_is_rejected_with_date() {
        let (_dir, adapter) = write_files(
            "date,close\n",
            "date,signal\n2024-01-15,1\n2024-01-16,2.5\n",
        );

        match adapter.fetch_signals() {
            Err(TradesimError::InvalidSignal { date, value }) => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 16).unwrap());
                assert_eq!(value, "2.5");
            }
            other => panic!("expected InvalidSignal, got {:?}", other),
        }
    }

    #[test]
    fn non_positive_close_is_rejected() {
        let (_dir, adapter) = write_files(
            "date,close\n2024-01-15,100.0\n2024-01-16,-5.0\n",
            "date,signal\n",
        );
        assert!(matches!(
            adapter.fetch_prices(),
            Err(TradesimError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn out_of_order_dates_are_rejected() {
        let (_dir, adapter) = write_files(
            "date,close\n2024-01-16,100.0\n2024-01-15,101.0\n",
            "date,signal\n",
        );
        assert!(matches!(
            adapter.fetch_prices(),
            Err(TradesimError::UnorderedSeries { row: 1, .. })
        ));
    }

    #[test]
    fn malformed_date_names_the_row() {
        let (_dir, adapter) = write_files(
            "date,close\n2024-01-15,100.0\nnot-a-date,101.0\n",
            "date,signal\n",
        );
        match adapter.fetch_prices() {
            Err(TradesimError::Data { reason }) => {
                assert!(reason.contains("row 1"), "reason was: {reason}");
            }
            other => panic!("expected Data error, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_a_data_error() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvAdapter::new(
            dir.path().join("absent.csv"),
            dir.path().join("also-absent.csv"),
        );
        assert!(matches!(
            adapter.fetch_prices(),
            Err(TradesimError::Data { .. })
        ));
    }

    #[test]
    fn empty_files_produce_empty_series() {
        let (_dir, adapter) = write_files("date,close\n", "date,signal\n");
        assert!(adapter.fetch_prices().unwrap().is_empty());
        assert!(adapter.fetch_signals().unwrap().is_empty());
    }
}
