#![allow(dead_code)]

use chrono::NaiveDate;
use tradesim::domain::error::TradesimError;
use tradesim::domain::series::{
    PricePoint, PriceSeries, Signal, SignalPoint, SignalSeries,
};
use tradesim::domain::simulator::{ExitRule, SimulationConfig};
use tradesim::ports::data_port::DataPort;

/// In-memory data port: hands back pre-built series or a canned error.
pub struct MockDataPort {
    pub prices: Option<PriceSeries>,
    pub signals: Option<SignalSeries>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            prices: None,
            signals: None,
            error: None,
        }
    }

    pub fn with_prices(mut self, prices: PriceSeries) -> Self {
        self.prices = Some(prices);
        self
    }

    pub fn with_signals(mut self, signals: SignalSeries) -> Self {
        self.signals = Some(signals);
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(&self) -> Result<PriceSeries, TradesimError> {
        if let Some(reason) = &self.error {
            return Err(TradesimError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .prices
            .clone()
            .unwrap_or_else(|| PriceSeries::new(vec![]).unwrap()))
    }

    fn fetch_signals(&self) -> Result<SignalSeries, TradesimError> {
        if let Some(reason) = &self.error {
            return Err(TradesimError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .signals
            .clone()
            .unwrap_or_else(|| SignalSeries::new(vec![]).unwrap()))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive daily dates from 2024-01-01.
pub fn day(offset: usize) -> NaiveDate {
    date(2024, 1, 1) + chrono::Duration::days(offset as i64)
}

pub fn make_prices(closes: &[f64]) -> PriceSeries {
    PriceSeries::new(
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                date: day(i),
                close,
            })
            .collect(),
    )
    .unwrap()
}

pub fn make_signals(seq: &[Signal]) -> SignalSeries {
    SignalSeries::new(
        seq.iter()
            .enumerate()
            .map(|(i, &signal)| SignalPoint {
                date: day(i),
                signal,
            })
            .collect(),
    )
    .unwrap()
}

pub fn signal_config(initial_balance: f64, transaction_cost: f64) -> SimulationConfig {
    SimulationConfig {
        initial_balance,
        transaction_cost,
        exit_rule: ExitRule::SignalDriven,
    }
}

pub fn threshold_config(
    initial_balance: f64,
    transaction_cost: f64,
    take_profit: f64,
    stop_loss: f64,
) -> SimulationConfig {
    SimulationConfig {
        initial_balance,
        transaction_cost,
        exit_rule: ExitRule::Threshold {
            take_profit,
            stop_loss,
        },
    }
}
