//! Report periods and output formats.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// Time window a report covers, ending now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReportPeriod {
    #[serde(rename = "24h")]
    Day,
    #[default]
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "all")]
    All,
}

/// Width of a timeline bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Hour,
    Day,
}

impl Granularity {
    pub fn seconds(self) -> i64 {
        match self {
            Granularity::Hour => 60 * 60,
            Granularity::Day => 24 * 60 * 60,
        }
    }
}

impl ReportPeriod {
    /// Earliest timestamp inside the period, `None` for [`ReportPeriod::All`].
    pub fn since(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            ReportPeriod::Day => Some(now - Duration::hours(24)),
            ReportPeriod::Week => Some(now - Duration::days(7)),
            ReportPeriod::Month => Some(now - Duration::days(30)),
            ReportPeriod::All => None,
        }
    }

    /// Hourly buckets for the 24h period, calendar days otherwise.
    pub fn granularity(self) -> Granularity {
        match self {
            ReportPeriod::Day => Granularity::Hour,
            _ => Granularity::Day,
        }
    }

    pub fn contains(self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.since(now).map_or(true, |since| timestamp >= since)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReportPeriod::Day => "24h",
            ReportPeriod::Week => "7d",
            ReportPeriod::Month => "30d",
            ReportPeriod::All => "all",
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportPeriod {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "24h" | "day" => Ok(ReportPeriod::Day),
            "7d" | "week" => Ok(ReportPeriod::Week),
            "30d" | "month" => Ok(ReportPeriod::Month),
            "all" => Ok(ReportPeriod::All),
            other => Err(ReportError::UnknownPeriod(other.to_string())),
        }
    }
}

/// Output shape requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Structured data.
    #[default]
    Data,
    /// Markdown document rendered from the same data.
    Document,
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "data" | "json" => Ok(ReportFormat::Data),
            "document" | "markdown" | "md" => Ok(ReportFormat::Document),
            other => Err(ReportError::UnknownFormat(other.to_string())),
        }
    }
}
