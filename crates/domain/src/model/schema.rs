use std::collections::HashSet;

use serde::Serialize;
use shopstats_shared_kernel::{ColumnName, DomainError, DomainResult};

/// How a column's values are compared when ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Loaded text; ranked lexicographically.
    #[default]
    Text,
    /// Produced by an aggregate step; ranked numerically.
    Numeric,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: ColumnName,
    pub kind: ColumnKind,
}

impl Column {
    pub fn text(name: impl Into<ColumnName>) -> Self {
        Self { name: name.into(), kind: ColumnKind::Text }
    }

    pub fn numeric(name: impl Into<ColumnName>) -> Self {
        Self { name: name.into(), kind: ColumnKind::Numeric }
    }
}

/// Ordered list of uniquely named columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> DomainResult<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(DomainError::DuplicateColumn { column: column.name.to_string() });
            }
        }
        Ok(Self { columns })
    }

    /// Schema where every column is `Text`.
    pub fn text<I, N>(names: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = N>,
        N: Into<ColumnName>,
    {
        Self::new(names.into_iter().map(Column::text).collect())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn names(&self) -> impl Iterator<Item = &ColumnName> {
        self.columns.iter().map(|c| &c.name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Like [`Schema::index_of`], but a missing column is an `UnknownColumn` error.
    pub fn require(&self, name: &str) -> DomainResult<usize> {
        self.index_of(name).ok_or_else(|| DomainError::UnknownColumn { column: name.to_string() })
    }
}
