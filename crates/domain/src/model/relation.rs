use std::sync::Arc;

use serde::{
    Serialize, Serializer,
    ser::{SerializeMap, SerializeSeq},
};
use shopstats_shared_kernel::{ColumnName, DomainError, DomainResult, RowCount};

use super::{Cell, Column, ColumnKind, Schema};
use crate::numeric::{self, NumericPolicy};

/// One row of a relation, addressable by column name.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    schema: Arc<Schema>,
    cells: Vec<Cell>,
}

impl Row {
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.schema.index_of(column).and_then(|i| self.cells.get(i))
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, cell) in self.schema.names().zip(&self.cells) {
            map.serialize_entry(name.as_str(), cell)?;
        }
        map.end()
    }
}

/// An immutable, ordered table of rows sharing one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    schema: Arc<Schema>,
    rows: Vec<Row>,
}

impl Relation {
    /// Builds a relation, checking that every row matches the schema's width.
    ///
    /// A mismatch reports the 1-based position of the offending row.
    pub fn new(schema: Schema, rows: Vec<Vec<Cell>>) -> DomainResult<Self> {
        let expected = schema.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(DomainError::MalformedRow { line: i + 1, expected, found: row.len() });
        }
        let schema = Arc::new(schema);
        let rows = rows
            .into_iter()
            .map(|cells| Row { schema: Arc::clone(&schema), cells })
            .collect();
        Ok(Self { schema, rows })
    }

    pub fn empty(schema: Schema) -> Self {
        Self { schema: Arc::new(schema), rows: Vec::new() }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> RowCount {
        RowCount::new(self.rows.len())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> DomainResult<usize> {
        self.schema.require(column)
    }

    /// Iterates the cells of one column in row order.
    pub fn column(&self, column: &str) -> DomainResult<impl Iterator<Item = &Cell>> {
        let index = self.column_index(column)?;
        Ok(self.rows.iter().map(move |row| &row.cells[index]))
    }

    /// Numbers of one column in row order.
    ///
    /// Text cells go through the same strict coercion that `sum`/`avg` use.
    pub fn numeric_values(&self, column: &str) -> DomainResult<Vec<f64>> {
        let index = self.column_index(column)?;
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(i, row)| {
                numeric::coerce(&row.cells[index], column, i + 1, NumericPolicy::Strict).transpose()
            })
            .collect()
    }

    /// Same rows, with `from` renamed to `to`.
    pub fn rename_column(&self, from: &str, to: impl Into<ColumnName>) -> DomainResult<Self> {
        let index = self.column_index(from)?;
        let mut columns = self.schema.columns().to_vec();
        columns[index].name = to.into();
        let schema = Schema::new(columns)?;
        Ok(self.rebuild(schema, |row| row.cells.clone()))
    }

    /// Projection onto `columns`, in the order given.
    pub fn select(&self, columns: &[&str]) -> DomainResult<Self> {
        let indices = columns
            .iter()
            .map(|c| self.column_index(c))
            .collect::<DomainResult<Vec<_>>>()?;
        let schema = Schema::new(
            indices
                .iter()
                .filter_map(|&i| self.schema.column(i).cloned())
                .collect::<Vec<Column>>(),
        )?;
        Ok(self.rebuild(schema, |row| indices.iter().map(|&i| row.cells[i].clone()).collect()))
    }

    /// Rows satisfying `predicate`, in their current order.
    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&Row) -> bool,
    {
        self.with_rows(self.rows.iter().filter(|row| predicate(row)).cloned().collect())
    }

    /// The first `n` rows in their current order.
    pub fn head(&self, n: usize) -> Self {
        self.with_rows(self.rows.iter().take(n).cloned().collect())
    }

    pub(crate) fn kind_of(&self, index: usize) -> ColumnKind {
        self.schema.column(index).map(|c| c.kind).unwrap_or_default()
    }

    /// Same schema, with the given rows (already belonging to this relation).
    pub(crate) fn with_rows(&self, rows: Vec<Row>) -> Self {
        Self { schema: Arc::clone(&self.schema), rows }
    }

    fn rebuild<F>(&self, schema: Schema, cells: F) -> Self
    where
        F: Fn(&Row) -> Vec<Cell>,
    {
        let schema = Arc::new(schema);
        let rows = self
            .rows
            .iter()
            .map(|row| Row { schema: Arc::clone(&schema), cells: cells(row) })
            .collect();
        Self { schema, rows }
    }
}

/// Serializes as a sequence of records, one map per row in column order.
impl Serialize for Relation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}
