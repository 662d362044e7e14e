//! Portfolio state and the closed-trade log.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Mutable state owned by the simulation pass. Created with the initial
/// balance, updated row by row, discarded once the trace is built.
///
/// Invariants maintained by the simulator: `shares_held > 0` exactly when
/// `position_open`, `entry_price` is `Some` exactly when `position_open`,
/// and `cash` never goes negative (an entry that cannot be funded is a
/// no-op, not a clamp).
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioState {
    pub cash: f64,
    pub shares_held: f64,
    pub position_open: bool,
    pub entry_price: Option<f64>,
}

impl PortfolioState {
    pub fn new(initial_balance: f64) -> Self {
        PortfolioState {
            cash: initial_balance,
            shares_held: 0.0,
            position_open: false,
            entry_price: None,
        }
    }

    pub fn is_flat(&self) -> bool {
        !self.position_open
    }

    /// cash + shares * close
    pub fn value_at(&self, close: f64) -> f64 {
        self.cash + self.shares_held * close
    }
}

/// One completed round trip. Cost basis and proceeds both include the
/// flat per-trade fee, so `pnl` is the realized, fee-inclusive result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedTrade {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub shares: f64,
    pub entry_price: f64,
    pub exit_price: f64,
    pub cost_basis: f64,
    pub proceeds: f64,
    pub pnl: f64,
}

impl ClosedTrade {
    pub fn is_win(&self) -> bool {
        self.pnl > 0.0
    }
}
