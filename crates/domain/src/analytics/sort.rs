// domain analytics ranking utilities
use std::{borrow::Cow, cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use shopstats_shared_kernel::{DomainError, DomainResult};

use crate::model::{Cell, ColumnKind, Relation, Row};

/// ソート順序
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    #[inline]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl From<bool> for SortOrder {
    #[inline]
    fn from(desc: bool) -> Self {
        if desc { Self::Descending } else { Self::Ascending }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(format!("Unknown sort order: {other}")),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        })
    }
}

/// 列の種類に応じた比較関数
///
/// Numeric columns compare as numbers (text that parses is treated as a number);
/// text columns compare byte-wise on the stored text.
fn compare_cells(kind: ColumnKind, a: &Cell, b: &Cell) -> Ordering {
    match kind {
        ColumnKind::Numeric => as_numeric(a).total_cmp(&as_numeric(b)),
        ColumnKind::Text => a.total_cmp(b),
    }
}

fn as_numeric(cell: &Cell) -> Cow<'_, Cell> {
    match cell {
        Cell::Text(s) => crate::numeric::parse_number(s).map_or(Cow::Borrowed(cell), |n| Cow::Owned(Cell::Number(n))),
        other => Cow::Borrowed(other),
    }
}

/// Stable sort of the whole relation by `column`.
///
/// Rows with equal keys keep their input order in both directions.
pub fn order_by(relation: &Relation, column: &str, order: SortOrder) -> DomainResult<Relation> {
    let index = relation.column_index(column)?;
    let kind = relation.kind_of(index);
    let mut rows: Vec<Row> = relation.rows().to_vec();
    rows.sort_by(|a, b| order.apply(compare_cells(kind, &a.cells()[index], &b.cells()[index])));
    Ok(relation.with_rows(rows))
}

/// First `n` rows of [`order_by`]; all rows when the relation is shorter.
///
/// # Errors
///
/// `InvalidLimit` for `n == 0`, `UnknownColumn` for a missing sort column.
pub fn top_n(relation: &Relation, column: &str, order: SortOrder, n: usize) -> DomainResult<Relation> {
    if n == 0 {
        return Err(DomainError::InvalidLimit { n });
    }
    let sorted = order_by(relation, column, order)?;
    let mut rows = sorted.rows().to_vec();
    rows.truncate(n);
    Ok(sorted.with_rows(rows))
}

/// The single first row of [`order_by`], found in one pass.
///
/// Among rows tied for first place, the earliest one wins.
///
/// # Errors
///
/// `EmptyRelation` when there are no rows, `UnknownColumn` for a missing column.
pub fn top1(relation: &Relation, column: &str, order: SortOrder) -> DomainResult<Row> {
    let index = relation.column_index(column)?;
    let kind = relation.kind_of(index);
    relation
        .rows()
        .iter()
        .reduce(|best, row| {
            let cmp = order.apply(compare_cells(kind, &row.cells()[index], &best.cells()[index]));
            if cmp == Ordering::Less { row } else { best }
        })
        .cloned()
        .ok_or_else(|| DomainError::EmptyRelation { operation: "top1".to_string() })
}
