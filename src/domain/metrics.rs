//! Performance statistics derived from a completed simulation trace.

use serde::{Deserialize, Serialize};

use super::error::TradesimError;
use super::simulator::SimulationTrace;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Annualized risk-free rate assumed when the config does not override it.
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.01;

/// Scalar summary plus the two return curves. Created once from a trace,
/// never mutated; recomputing from the same trace yields identical values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub total_return_pct: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown_pct: f64,
    pub win_rate_pct: f64,
    pub closed_trades: usize,
    /// Buy-and-hold benchmark: cumulative close-price returns.
    pub cumulative_return_curve: Vec<f64>,
    /// Cumulative portfolio-value returns.
    pub strategy_cumulative_return_curve: Vec<f64>,
}

impl PerformanceReport {
    pub fn compute(
        trace: &SimulationTrace,
        initial_balance: f64,
        risk_free_rate: f64,
    ) -> Result<Self, TradesimError> {
        let rows = trace.rows();
        if rows.len() < 2 {
            return Err(TradesimError::InsufficientData {
                rows: rows.len(),
                minimum: 2,
            });
        }

        for row in rows {
            if row.portfolio_value <= 0.0 {
                return Err(TradesimError::Valuation {
                    date: row.date,
                    value: row.portfolio_value,
                });
            }
        }

        let values: Vec<f64> = rows.iter().map(|row| row.portfolio_value).collect();
        let closes: Vec<f64> = rows.iter().map(|row| row.close).collect();

        let strategy_returns = daily_returns(&values);
        let benchmark_returns = daily_returns(&closes);

        let last_value = values[values.len() - 1];
        let total_return_pct = (last_value - initial_balance) / initial_balance * 100.0;

        let daily_rf = risk_free_rate / TRADING_DAYS_PER_YEAR;
        let excess: Vec<f64> = strategy_returns.iter().map(|r| r - daily_rf).collect();
        let sharpe_ratio = sharpe(&excess);

        let strategy_curve = cumulative_curve(&strategy_returns);
        let benchmark_curve = cumulative_curve(&benchmark_returns);
        let max_drawdown_pct = max_drawdown(&strategy_curve) * 100.0;

        let trades = trace.closed_trades();
        let win_rate_pct = if trades.is_empty() {
            0.0
        } else {
            let wins = trades.iter().filter(|trade| trade.is_win()).count();
            wins as f64 / trades.len() as f64 * 100.0
        };

        Ok(PerformanceReport {
            total_return_pct,
            sharpe_ratio,
            max_drawdown_pct,
            win_rate_pct,
            closed_trades: trades.len(),
            cumulative_return_curve: benchmark_curve,
            strategy_cumulative_return_curve: strategy_curve,
        })
    }
}

/// Simple returns with `r_0 = 0`. Callers guarantee positive inputs.
fn daily_returns(values: &[f64]) -> Vec<f64> {
    let mut returns = Vec::with_capacity(values.len());
    returns.push(0.0);
    for window in values.windows(2) {
        returns.push((window[1] - window[0]) / window[0]);
    }
    returns
}

/// `C_t = Π_{i≤t}(1 + r_i) - 1`.
fn cumulative_curve(returns: &[f64]) -> Vec<f64> {
    let mut curve = Vec::with_capacity(returns.len());
    let mut product = 1.0;
    for r in returns {
        product *= 1.0 + r;
        curve.push(product - 1.0);
    }
    curve
}

/// Annualized Sharpe over excess daily returns, sample standard
/// deviation. Zero deviation (flat or no-trade series) yields 0 rather
/// than a division error.
fn sharpe(excess: &[f64]) -> f64 {
    let n = excess.len() as f64;
    let mean = excess.iter().sum::<f64>() / n;
    let variance = excess.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let stddev = variance.sqrt();
    if stddev > 0.0 {
        TRADING_DAYS_PER_YEAR.sqrt() * mean / stddev
    } else {
        0.0
    }
}

/// Most negative drawdown of a cumulative-return curve, as a fraction
/// (always ≤ 0; 0 for a non-decreasing curve).
fn max_drawdown(curve: &[f64]) -> f64 {
    let mut running_max = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for &c in curve {
        if c > running_max {
            running_max = c;
        }
        let drawdown = (c - running_max) / (1.0 + running_max);
        if drawdown < worst {
            worst = drawdown;
        }
    }
    worst
}
