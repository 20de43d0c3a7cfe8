// crates/domain/src/options.rs
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Aggregation applied to each group by [`crate::Aggregator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateOp {
    /// Arithmetic total of the metric column.
    Sum,
    /// Total divided by the number of usable values.
    Avg,
    /// Partition size; the metric column is not read.
    Count,
}

impl AggregateOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Avg => "avg",
            Self::Count => "count",
        }
    }

    /// Whether the op reads and coerces the metric column.
    pub const fn reads_metric(self) -> bool {
        !matches!(self, Self::Count)
    }

    /// Name of the output column: `sum(<metric>)`, `avg(<metric>)` or `count`.
    pub fn output_column(self, metric: &str) -> String {
        match self {
            Self::Count => "count".to_string(),
            op => format!("{}({metric})", op.as_str()),
        }
    }
}

impl fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregateOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(Self::Sum),
            "avg" | "mean" => Ok(Self::Avg),
            "count" => Ok(Self::Count),
            other => Err(format!("Unknown aggregate op: {other}")),
        }
    }
}
