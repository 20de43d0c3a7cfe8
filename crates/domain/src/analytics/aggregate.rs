use std::collections::HashMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use shopstats_shared_kernel::{DomainResult, RowCount};

use crate::{
    model::{Cell, CellKey, Column, Relation, Row, Schema},
    numeric::{self, NumericPolicy},
    options::AggregateOp,
};

/// Running totals for one group.
#[derive(Debug, Clone)]
struct GroupAccumulator {
    key: Cell,
    rows: RowCount,
    sum: f64,
    usable: RowCount,
}

impl GroupAccumulator {
    fn new(key: Cell) -> Self {
        Self { key, rows: RowCount::zero(), sum: 0.0, usable: RowCount::zero() }
    }

    fn push(&mut self, value: Option<f64>) {
        self.rows += 1;
        if let Some(v) = value {
            self.sum += v;
            self.usable += 1;
        }
    }

    fn finish(self, op: AggregateOp) -> Vec<Cell> {
        let metric = match op {
            AggregateOp::Sum => Cell::Number(self.sum),
            AggregateOp::Avg if self.usable.is_zero() => Cell::Missing,
            AggregateOp::Avg => Cell::Number(self.sum / self.usable.as_f64()),
            AggregateOp::Count => Cell::Number(self.rows.as_f64()),
        };
        vec![self.key, metric]
    }
}

/// Group-by aggregation over a relation.
pub struct Aggregator;

impl Aggregator {
    /// Partitions `relation` by exact equality of `group_column` and reduces
    /// `metric_column` in each partition with `op`.
    ///
    /// The result has two columns, the group column (same kind as the input)
    /// and a numeric metric column named by [`AggregateOp::output_column`].
    /// Groups appear in the order their key is first seen. An empty input gives
    /// an empty result. For [`AggregateOp::Count`] the metric column is not
    /// looked up at all.
    ///
    /// # Errors
    ///
    /// `UnknownColumn` for a missing group or metric column, and
    /// `NonNumericValue` for the first unparseable metric value under
    /// [`NumericPolicy::Strict`].
    pub fn group_by_aggregate(
        relation: &Relation,
        group_column: &str,
        metric_column: &str,
        op: AggregateOp,
        policy: NumericPolicy,
    ) -> DomainResult<Relation> {
        let group_index = relation.column_index(group_column)?;
        let values = if op.reads_metric() {
            let metric_index = relation.column_index(metric_column)?;
            Self::coerce_column(relation, metric_index, metric_column, policy)?
        } else {
            vec![None; relation.len()]
        };

        let mut index: HashMap<CellKey<'_>, usize> = HashMap::new();
        let mut groups: Vec<GroupAccumulator> = Vec::new();
        for (row, value) in relation.rows().iter().zip(values) {
            let key = &row.cells()[group_index];
            let slot = *index.entry(key.key()).or_insert_with(|| {
                groups.push(GroupAccumulator::new(key.clone()));
                groups.len() - 1
            });
            groups[slot].push(value);
        }

        let schema = Schema::new(vec![
            Column { name: group_column.into(), kind: relation.kind_of(group_index) },
            Column::numeric(op.output_column(metric_column)),
        ])?;
        log::debug!(
            "group by '{group_column}' {op}({metric_column}): {} rows -> {} groups",
            relation.len(),
            groups.len()
        );
        Relation::new(schema, groups.into_iter().map(|g| g.finish(op)).collect())
    }

    pub fn sum(relation: &Relation, group_column: &str, metric_column: &str) -> DomainResult<Relation> {
        Self::group_by_aggregate(relation, group_column, metric_column, AggregateOp::Sum, NumericPolicy::Strict)
    }

    pub fn avg(relation: &Relation, group_column: &str, metric_column: &str) -> DomainResult<Relation> {
        Self::group_by_aggregate(relation, group_column, metric_column, AggregateOp::Avg, NumericPolicy::Strict)
    }

    pub fn count(relation: &Relation, group_column: &str) -> DomainResult<Relation> {
        Self::group_by_aggregate(relation, group_column, "", AggregateOp::Count, NumericPolicy::Strict)
    }

    /// Coerces every metric value in row order.
    ///
    /// With the `parallel` feature the parsing fans out over rayon, but the
    /// first error is still the one with the lowest row number.
    fn coerce_column(
        relation: &Relation,
        index: usize,
        column: &str,
        policy: NumericPolicy,
    ) -> DomainResult<Vec<Option<f64>>> {
        let coerce_row = |(i, row): (usize, &Row)| numeric::coerce(&row.cells()[index], column, i + 1, policy);

        #[cfg(feature = "parallel")]
        let results: Vec<DomainResult<Option<f64>>> = relation.rows().par_iter().enumerate().map(coerce_row).collect();
        #[cfg(not(feature = "parallel"))]
        let results: Vec<DomainResult<Option<f64>>> = relation.rows().iter().enumerate().map(coerce_row).collect();

        let values = results.into_iter().collect::<DomainResult<Vec<_>>>()?;
        let skipped = values.iter().filter(|v| v.is_none()).count();
        if skipped > 0 {
            log::warn!("skipped {skipped} non-numeric value(s) in column '{column}'");
        }
        Ok(values)
    }
}
