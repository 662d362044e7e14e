//! Domain error types.
//!
//! Every failure here is a synchronous validation error: the simulation
//! and metrics passes are deterministic, so nothing is retryable. Each
//! variant carries the offending row or date where one exists.

use chrono::NaiveDate;

/// Top-level error type for tradesim.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TradesimError {
    #[error("price and signal series differ in length: {price_rows} price rows, {signal_rows} signal rows")]
    LengthMismatch {
        price_rows: usize,
        signal_rows: usize,
    },

    #[error("price and signal dates diverge at row {row}: price {price_date}, signal {signal_date}")]
    DateMismatch {
        row: usize,
        price_date: NaiveDate,
        signal_date: NaiveDate,
    },

    #[error("empty {name} series")]
    EmptySeries { name: &'static str },

    #[error("insufficient data: have {rows} rows, need {minimum}")]
    InsufficientData { rows: usize, minimum: usize },

    #[error("invalid signal value {value:?} at {date}")]
    InvalidSignal { date: NaiveDate, value: String },

    #[error("non-positive portfolio value {value} at {date}")]
    Valuation { date: NaiveDate, value: f64 },

    #[error("non-positive close {close} at {date}")]
    InvalidPrice { date: NaiveDate, close: f64 },

    #[error("series dates not strictly increasing at row {row} ({date})")]
    UnorderedSeries { row: usize, date: NaiveDate },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("io error: {reason}")]
    Io { reason: String },
}

impl From<std::io::Error> for TradesimError {
    fn from(err: std::io::Error) -> Self {
        TradesimError::Io {
            reason: err.to_string(),
        }
    }
}

impl From<&TradesimError> for std::process::ExitCode {
    fn from(err: &TradesimError) -> Self {
        let code: u8 = match err {
            TradesimError::Io { .. } => 1,
            TradesimError::ConfigParse { .. }
            | TradesimError::ConfigMissing { .. }
            | TradesimError::ConfigInvalid { .. } => 2,
            TradesimError::Data { .. } => 3,
            TradesimError::LengthMismatch { .. }
            | TradesimError::DateMismatch { .. }
            | TradesimError::InvalidSignal { .. }
            | TradesimError::InvalidPrice { .. }
            | TradesimError::UnorderedSeries { .. } => 4,
            TradesimError::EmptySeries { .. }
            | TradesimError::InsufficientData { .. }
            | TradesimError::Valuation { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
