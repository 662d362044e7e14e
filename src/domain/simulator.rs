//! Trade simulation state machine.
//!
//! A single left-to-right pass over an aligned price/signal pair. Every
//! decision at row `t` uses only data at or before `t`; there is exactly
//! one position open at a time; a flat per-trade fee is charged on entry
//! and exit; rows where nothing executes carry the previous state
//! forward unchanged.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::TradesimError;
use super::portfolio::{ClosedTrade, PortfolioState};
use super::series::{ensure_aligned, PriceSeries, Signal, SignalSeries};

/// How an open position gets closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExitRule {
    /// A Sell signal closes the position (a Buy while flat opens one;
    /// anything else is a no-op).
    SignalDriven,
    /// The position closes on the first row where the close has moved
    /// `take_profit` above or `stop_loss` below the entry price, both
    /// expressed as positive fractions of entry. Sell signals are
    /// ignored in this mode.
    Threshold { take_profit: f64, stop_loss: f64 },
}

/// Parameters for one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub initial_balance: f64,
    pub transaction_cost: f64,
    pub exit_rule: ExitRule,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            initial_balance: 10_000.0,
            transaction_cost: 10.0,
            exit_rule: ExitRule::SignalDriven,
        }
    }
}

/// One row of the trace. `portfolio_value` equals
/// `cash + shares_held * close` on every row by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRow {
    pub date: NaiveDate,
    pub close: f64,
    pub signal: Signal,
    pub shares_held: f64,
    pub cash: f64,
    pub transaction_cost_paid: f64,
    pub position_open: bool,
    pub portfolio_value: f64,
}

/// The completed simulation: per-row state plus the closed-trade log.
/// Append-only during the pass, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationTrace {
    rows: Vec<TraceRow>,
    closed_trades: Vec<ClosedTrade>,
}

impl SimulationTrace {
    pub fn rows(&self) -> &[TraceRow] {
        &self.rows
    }

    pub fn closed_trades(&self) -> &[ClosedTrade] {
        &self.closed_trades
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Portfolio value on the last row.
    pub fn final_value(&self) -> Option<f64> {
        self.rows.last().map(|row| row.portfolio_value)
    }
}

/// Walk the aligned series once and produce the trace.
///
/// Fails before producing any row if either series is empty or the two
/// timestamp sets differ. The inputs are never mutated.
pub fn simulate(
    prices: &PriceSeries,
    signals: &SignalSeries,
    config: &SimulationConfig,
) -> Result<SimulationTrace, TradesimError> {
    if prices.is_empty() {
        return Err(TradesimError::EmptySeries { name: "price" });
    }
    if signals.is_empty() {
        return Err(TradesimError::EmptySeries { name: "signal" });
    }
    ensure_aligned(prices, signals)?;

    let fee = config.transaction_cost;
    let mut state = PortfolioState::new(config.initial_balance);
    let mut rows = Vec::with_capacity(prices.len());
    let mut closed_trades = Vec::new();
    let mut entry_date: Option<NaiveDate> = None;

    for (price, point) in prices.points().iter().zip(signals.points().iter()) {
        let close = price.close;
        let signal = point.signal;
        let mut fee_paid = 0.0;

        if state.is_flat() {
            // Entry: fund shares from cash net of the fee. Rejected as a
            // no-op when the fee already exhausts the cash.
            if signal == Signal::Buy && state.cash > fee {
                let shares = (state.cash - fee) / close;
                // The debit `shares * close + fee` is the entire balance;
                // assigning zero keeps cash from picking up rounding dust.
                state.cash = 0.0;
                state.shares_held = shares;
                state.position_open = true;
                state.entry_price = Some(close);
                entry_date = Some(price.date);
                fee_paid = fee;
            }
        } else if let Some(entry_price) = state.entry_price {
            let exit = match config.exit_rule {
                ExitRule::SignalDriven => signal == Signal::Sell,
                ExitRule::Threshold {
                    take_profit,
                    stop_loss,
                } => {
                    let change = (close - entry_price) / entry_price;
                    change >= take_profit || change <= -stop_loss
                }
            };

            if exit {
                let shares = state.shares_held;
                let proceeds = shares * close - fee;
                state.cash += proceeds;
                state.shares_held = 0.0;
                state.position_open = false;
                state.entry_price = None;
                fee_paid = fee;

                closed_trades.push(ClosedTrade {
                    entry_date: entry_date.take().unwrap_or(price.date),
                    exit_date: price.date,
                    shares,
                    entry_price,
                    exit_price: close,
                    cost_basis: shares * entry_price + fee,
                    proceeds,
                    pnl: proceeds - (shares * entry_price + fee),
                });
            }
        }

        rows.push(TraceRow {
            date: price.date,
            close,
            signal,
            shares_held: state.shares_held,
            cash: state.cash,
            transaction_cost_paid: fee_paid,
            position_open: state.position_open,
            portfolio_value: state.value_at(close),
        });
    }

    Ok(SimulationTrace {
        rows,
        closed_trades,
    })
}
