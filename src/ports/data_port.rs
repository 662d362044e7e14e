//! Series input port trait.
//!
//! The engine consumes already-computed close prices and signals; where
//! they come from (files, a database, a signal generator upstream) is
//! the adapter's business. Implementations return fully validated
//! series; alignment between the two is checked by the simulator.

use crate::domain::error::TradesimError;
use crate::domain::series::{PriceSeries, SignalSeries};

pub trait DataPort {
    fn fetch_prices(&self) -> Result<PriceSeries, TradesimError>;

    fn fetch_signals(&self) -> Result<SignalSeries, TradesimError>;
}
