//! Metered-usage counters for billing analytics.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fmt;

use super::{Metadata, Timestamp};

/// Aggregation window for usage counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsagePeriod {
    /// Daily window.
    Day,
    /// Weekly window.
    Week,
    /// Monthly window.
    Month,
    /// Yearly window.
    Year,
}

impl UsagePeriod {
    /// Returns the wire name of this period.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for UsagePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A time-windowed usage counter for one customer and feature.
///
/// Shaped and passed through to the provider; never persisted by this
/// layer.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetrics {
    /// The metered customer.
    pub customer_id: String,
    /// The metered feature.
    pub feature_id: String,
    /// Units consumed in the window.
    pub usage: u64,
    /// Plan limit for the window, if any.
    pub limit: Option<u64>,
    /// Aggregation window.
    pub period: UsagePeriod,
    /// Window start.
    pub start_date: Timestamp,
    /// Window end.
    pub end_date: Timestamp,
    /// String-to-string annotations.
    pub metadata: Option<Metadata>,
}

/// Token-level usage for one customer and model, for AI metered billing.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiUsageMetrics {
    /// The metered customer.
    pub customer_id: String,
    /// The model that served the request.
    pub model_id: String,
    /// Total tokens.
    pub tokens: u64,
    /// Prompt-side tokens.
    pub input_tokens: u64,
    /// Completion-side tokens.
    pub output_tokens: u64,
    /// Cost in minor units.
    pub cost: i64,
    /// When the usage occurred.
    pub timestamp: Timestamp,
    /// String-to-string annotations.
    pub metadata: Option<Metadata>,
}
