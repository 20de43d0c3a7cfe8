use std::collections::HashSet;

use shopstats_shared_kernel::DomainResult;

use crate::model::Relation;

/// Number of distinct values in `column`.
///
/// Values compare by exact text, so `"Red"`, `"red"` and `"Red "` are three values.
pub fn distinct_count(relation: &Relation, column: &str) -> DomainResult<usize> {
    let mut seen = HashSet::new();
    for cell in relation.column(column)? {
        seen.insert(cell.key());
    }
    Ok(seen.len())
}
