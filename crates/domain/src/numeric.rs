//! Text-to-number coercion for metric columns.
//!
//! Loaded values are plain text. `sum`/`avg` coerce them explicitly here, and a
//! value that does not parse is either fatal or skipped depending on the
//! [`NumericPolicy`] in force.

use serde::{Deserialize, Serialize};
use shopstats_shared_kernel::{DomainError, DomainResult};

use crate::model::Cell;

const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥'];

/// What to do with a metric value that is not a number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NumericPolicy {
    /// Fail the whole aggregation with `NonNumericValue`.
    #[default]
    Strict,
    /// Ignore the value: it adds nothing to `sum` and is left out of `avg`'s divisor.
    SkipInvalid,
}

/// Parses a metric value after stripping formatting.
///
/// Accepts an optional sign, one leading currency symbol, and `,`/`_` thousands
/// separators (`"$1,234.50"`, `"-€12"`). Non-finite results are rejected.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let unsigned = unsigned.strip_prefix(CURRENCY_SYMBOLS).unwrap_or(unsigned).trim_start();
    if unsigned.is_empty() || unsigned.starts_with(['-', '+']) {
        return None;
    }
    let digits: String = unsigned.chars().filter(|c| !matches!(c, ',' | '_')).collect();
    let value = digits.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(if negative { -value } else { value })
}

/// Coerces one cell of `column`.
///
/// `Ok(None)` means the value was skipped under [`NumericPolicy::SkipInvalid`].
/// `row` is the 1-based row position used in error messages.
pub(crate) fn coerce(cell: &Cell, column: &str, row: usize, policy: NumericPolicy) -> DomainResult<Option<f64>> {
    let parsed = match cell {
        Cell::Number(n) => Some(*n),
        Cell::Text(s) => parse_number(s),
        Cell::Missing => None,
    };
    match (parsed, policy) {
        (Some(v), _) => Ok(Some(v)),
        (None, NumericPolicy::SkipInvalid) => Ok(None),
        (None, NumericPolicy::Strict) => Err(DomainError::NonNumericValue {
            column: column.to_string(),
            row,
            value: cell.to_string(),
        }),
    }
}
