use std::{cmp::Ordering, fmt};

use serde::Serialize;

/// A single value in a relation.
///
/// The loader only ever produces `Text`; `Number` comes out of aggregation and
/// `Missing` marks an average over a partition with no usable values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
    Missing,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Total order used for ranking: `Missing` < numbers < text.
    ///
    /// Numbers compare with `f64::total_cmp`, text compares byte-wise.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Missing, Self::Missing) => Ordering::Equal,
            (Self::Missing, _) => Ordering::Less,
            (_, Self::Missing) => Ordering::Greater,
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
        }
    }
}

/// Hashable identity of a cell, used to partition and deduplicate rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum CellKey<'a> {
    Text(&'a str),
    Number(u64),
    Missing,
}

impl Cell {
    pub(crate) fn key(&self) -> CellKey<'_> {
        match self {
            Self::Text(s) => CellKey::Text(s),
            // -0.0 and 0.0 are the same group
            Self::Number(n) if *n == 0.0 => CellKey::Number(0f64.to_bits()),
            Self::Number(n) => CellKey::Number(n.to_bits()),
            Self::Missing => CellKey::Missing,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Missing => Ok(()),
        }
    }
}
