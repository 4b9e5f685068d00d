//! Restocking advisories derived from predicted demand.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Predicted daily quantity above which the advisory is "restock high".
pub const HIGH_DEMAND_THRESHOLD: u32 = 35;

/// Predicted daily quantity below which the advisory is "reduce".
pub const LOW_DEMAND_THRESHOLD: u32 = 15;

/// A discrete restocking recommendation.
///
/// Derived from a predicted quantity via fixed policy thresholds - these
/// are operational constants, not learned values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Advisory {
    /// Demand is expected to spike; stock up.
    #[serde(rename = "restock high")]
    RestockHigh,
    /// Demand looks ordinary.
    #[serde(rename = "normal")]
    Normal,
    /// Demand is expected to be weak; hold back stock.
    #[serde(rename = "reduce")]
    Reduce,
}

impl Advisory {
    /// Assign the advisory for a predicted daily quantity.
    #[must_use]
    pub const fn for_quantity(quantity: u32) -> Self {
        if quantity > HIGH_DEMAND_THRESHOLD {
            Self::RestockHigh
        } else if quantity < LOW_DEMAND_THRESHOLD {
            Self::Reduce
        } else {
            Self::Normal
        }
    }

    /// The wire label for this advisory.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RestockHigh => "restock high",
            Self::Normal => "normal",
            Self::Reduce => "reduce",
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
