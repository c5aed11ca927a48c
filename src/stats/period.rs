//! Month-over-month percentage change.

use std::fmt::Display;

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Which way a value moved between two periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// The current period is higher.
    Up,
    /// The current period is lower.
    Down,
    /// No change after rounding, or there was nothing to compare against.
    Unchanged,
}

/// The change from one period to the next.
///
/// `magnitude` is never negative. The direction lives in `trend` so that a
/// fall is shown as "down by 25%" and not "down by -25%".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentChange {
    /// Size of the change in percent, rounded to one decimal place.
    pub magnitude: f64,
    /// Direction of the change.
    pub trend: Trend,
}

impl PercentChange {
    /// The change with its sign, e.g. `-25.0` for a 25% fall.
    pub fn signed(&self) -> f64 {
        match self.trend {
            Trend::Down => -self.magnitude,
            Trend::Up | Trend::Unchanged => self.magnitude,
        }
    }
}

impl Display for PercentChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.trend {
            Trend::Up => write!(f, "Up by {}%", self.magnitude),
            Trend::Down => write!(f, "Down by {}%", self.magnitude),
            Trend::Unchanged => write!(f, "No change"),
        }
    }
}

/// Compute the percentage change from `previous` to `current`.
///
/// The change is `(current - previous) / previous * 100` rounded to one
/// decimal place with halves rounded away from zero. The arithmetic is exact,
/// a change of 1.45% rounds to 1.5%.
///
/// A `previous` of zero always gives zero, whatever `current` is. There is
/// no meaningful percentage to report against an empty baseline.
pub fn percent_change(previous: Decimal, current: Decimal) -> PercentChange {
    if previous.is_zero() {
        return PercentChange {
            magnitude: 0.0,
            trend: Trend::Unchanged,
        };
    }

    let rounded = current
        .checked_sub(previous)
        .and_then(|change| change.checked_div(previous))
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .map(|change| change.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|change| change.to_f64())
        .unwrap_or_else(|| {
            // Only reachable for changes too large for a decimal.
            let previous = previous.to_f64().unwrap_or(1.0);
            let change = (current.to_f64().unwrap_or_default() - previous) / previous * 100.0;
            (change * 10.0).round() / 10.0
        });

    let trend = if rounded > 0.0 {
        Trend::Up
    } else if rounded < 0.0 {
        Trend::Down
    } else {
        Trend::Unchanged
    };

    PercentChange {
        magnitude: rounded.abs(),
        trend,
    }
}
