//! Price and signal series value types.
//!
//! Both series are validated at construction: strictly increasing dates,
//! no duplicates, positive closes. The simulator additionally requires
//! the two index sets to match exactly; [`ensure_aligned`] checks that.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::TradesimError;

/// A single close observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Per-timestamp trading instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Buy,
    Hold,
    Sell,
}

impl Signal {
    /// Parse a raw signal cell. Accepts the numeric vocabulary
    /// (`1` buy, `0` hold, `-1` sell, with or without a decimal part)
    /// and the word forms, case-insensitively. Returns `None` for
    /// anything else; the caller decides how to report it.
    pub fn parse(raw: &str) -> Option<Signal> {
        match raw.trim().to_lowercase().as_str() {
            "1" | "1.0" | "buy" => Some(Signal::Buy),
            "0" | "0.0" | "hold" => Some(Signal::Hold),
            "-1" | "-1.0" | "sell" => Some(Signal::Sell),
            _ => None,
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Signal::Buy => "buy",
            Signal::Hold => "hold",
            Signal::Sell => "sell",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalPoint {
    pub date: NaiveDate,
    pub signal: Signal,
}

/// Time-ordered close prices. Read-only once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self, TradesimError> {
        for (row, point) in points.iter().enumerate() {
            if point.close <= 0.0 || !point.close.is_finite() {
                return Err(TradesimError::InvalidPrice {
                    date: point.date,
                    close: point.close,
                });
            }
            if row > 0 && point.date <= points[row - 1].date {
                return Err(TradesimError::UnorderedSeries {
                    row,
                    date: point.date,
                });
            }
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }
}

/// Time-ordered trading signals, aligned 1:1 with a [`PriceSeries`].
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSeries {
    points: Vec<SignalPoint>,
}

impl SignalSeries {
    pub fn new(points: Vec<SignalPoint>) -> Result<Self, TradesimError> {
        for (row, point) in points.iter().enumerate() {
            if row > 0 && point.date <= points[row - 1].date {
                return Err(TradesimError::UnorderedSeries {
                    row,
                    date: point.date,
                });
            }
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[SignalPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Counts of (buy, hold, sell) signals.
    pub fn tally(&self) -> (usize, usize, usize) {
        let mut buys = 0;
        let mut holds = 0;
        let mut sells = 0;
        for point in &self.points {
            match point.signal {
                Signal::Buy => buys += 1,
                Signal::Hold => holds += 1,
                Signal::Sell => sells += 1,
            }
        }
        (buys, holds, sells)
    }
}

/// Verify the two series cover exactly the same timestamps.
///
/// Length is checked first so a truncated file is reported as such
/// rather than as a date divergence at the shorter file's end.
pub fn ensure_aligned(
    prices: &PriceSeries,
    signals: &SignalSeries,
) -> Result<(), TradesimError> {
    if prices.len() != signals.len() {
        return Err(TradesimError::LengthMismatch {
            price_rows: prices.len(),
            signal_rows: signals.len(),
        });
    }
    for (row, (price, signal)) in prices
        .points()
        .iter()
        .zip(signals.points().iter())
        .enumerate()
    {
        if price.date != signal.date {
            return Err(TradesimError::DateMismatch {
                row,
                price_date: price.date,
                signal_date: signal.date,
            });
        }
    }
    Ok(())
}
