//! Parameter sweeps over independent simulation configurations.
//!
//! Each case gets its own simulate + compute pass over the shared,
//! read-only series; cases share no mutable state, so they run on the
//! rayon worker pool. A failing case carries its error in the outcome
//! instead of aborting its siblings.

use rayon::prelude::*;

use super::error::TradesimError;
use super::metrics::PerformanceReport;
use super::series::{PriceSeries, SignalSeries};
use super::simulator::{simulate, SimulationConfig};

/// One labelled configuration to evaluate.
#[derive(Debug, Clone)]
pub struct SweepCase {
    pub label: String,
    pub config: SimulationConfig,
}

/// Result of one case. Outcomes come back in case order.
#[derive(Debug, Clone)]
pub struct SweepOutcome {
    pub label: String,
    pub result: Result<PerformanceReport, TradesimError>,
}

pub fn run_sweep(
    prices: &PriceSeries,
    signals: &SignalSeries,
    cases: &[SweepCase],
    risk_free_rate: f64,
) -> Vec<SweepOutcome> {
    cases
        .par_iter()
        .map(|case| {
            let result = simulate(prices, signals, &case.config).and_then(|trace| {
                PerformanceReport::compute(&trace, case.config.initial_balance, risk_free_rate)
            });
            SweepOutcome {
                label: case.label.clone(),
                result,
            }
        })
        .collect()
}
