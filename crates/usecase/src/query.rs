// crates/usecase/src/query.rs
use std::fmt;

use serde::{Deserialize, Serialize};
use shopstats_domain::{
    AggregateOp, Aggregator, LoadOptions, NumericPolicy, SortOrder, distinct_count, order_by, top_n, top1,
};
use shopstats_ports::DatasetSource;
use shopstats_shared_kernel::{ApplicationError, DomainError, ErrorContext, Result};

use crate::dto::QueryOutput;

/// One ad-hoc question asked of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "query", rename_all = "kebab-case")]
pub enum QuerySpec {
    /// Number of distinct values in `column`.
    Distinct { column: String },
    /// `op` of `metric` per value of `group`, optionally ranked and cut.
    GroupBy {
        group: String,
        metric: Option<String>,
        op: AggregateOp,
        sort: Option<SortOrder>,
        limit: Option<usize>,
    },
    /// The first `n` rows by `column`; `n == 1` returns a single row.
    Top { column: String, order: SortOrder, n: usize },
}

impl fmt::Display for QuerySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Distinct { column } => write!(f, "distinct({column})"),
            Self::GroupBy { group, metric, op, .. } => {
                write!(f, "{op}({}) by {group}", metric.as_deref().unwrap_or("*"))
            }
            Self::Top { column, order, n } => write!(f, "top {n} by {column} {order}"),
        }
    }
}

/// Runs a [`QuerySpec`] against a dataset.
pub struct RunQuery<'a> {
    source: &'a dyn DatasetSource,
}

impl<'a> RunQuery<'a> {
    pub fn new(source: &'a dyn DatasetSource) -> Self {
        Self { source }
    }

    pub fn run(&self, spec: &QuerySpec, load: &LoadOptions, policy: NumericPolicy) -> Result<QueryOutput> {
        let relation = crate::load_relation(self.source, load)?;
        log::debug!("running {spec}");

        let output = match spec {
            QuerySpec::Distinct { column } => QueryOutput::Scalar {
                label: format!("distinct {column}"),
                value: distinct_count(&relation, column)?,
            },
            QuerySpec::GroupBy { group, metric, op, sort, limit } => {
                let metric = match (op.reads_metric(), metric.as_deref()) {
                    (false, _) => "",
                    (true, Some(m)) => m,
                    (true, None) => {
                        return Err(ApplicationError::QueryFailed {
                            query: spec.to_string(),
                            reason: format!("{op} needs a metric column"),
                        }
                        .into());
                    }
                };
                let grouped = Aggregator::group_by_aggregate(&relation, group, metric, *op, policy)
                    .with_context(|| format!("running {spec}"))?;
                let metric_column = op.output_column(metric);
                let rows = match (sort, limit) {
                    (Some(order), Some(n)) => top_n(&grouped, &metric_column, *order, *n)?,
                    (Some(order), None) => order_by(&grouped, &metric_column, *order)?,
                    (None, Some(0)) => return Err(DomainError::InvalidLimit { n: 0 }.into()),
                    (None, Some(n)) => grouped.head(*n),
                    (None, None) => grouped,
                };
                QueryOutput::Table { rows }
            }
            QuerySpec::Top { column, order, n: 1 } => QueryOutput::Row { row: top1(&relation, column, *order)? },
            QuerySpec::Top { column, order, n } => QueryOutput::Table { rows: top_n(&relation, column, *order, *n)? },
        };
        Ok(output)
    }
}
