// crates/domain/src/loader.rs
use serde::{Deserialize, Serialize};
use shopstats_shared_kernel::{ColumnName, DomainError, DomainResult};

use crate::model::{Cell, Relation, Schema};

/// Options controlling how delimited text is split into a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    pub delimiter: char,
    pub has_header: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { delimiter: ',', has_header: true }
    }
}

impl LoadOptions {
    pub fn new(delimiter: char, has_header: bool) -> Self {
        Self { delimiter, has_header }
    }
}

/// Parses delimited text into a [`Relation`].
///
/// Every field is kept as verbatim text. Fields may be wrapped in double quotes
/// to carry the delimiter, with `""` standing for a literal quote. Text after a
/// closing quote is appended to the same field (`"Hat"x` reads as `Hatx`), and a
/// quote that does not open a field is kept literally. Empty lines are skipped. Without a header, columns are named by position (`"0"`, `"1"`, ...).
///
/// # Errors
///
/// - `EmptyInput` when `text` holds nothing but whitespace.
/// - `DuplicateColumn` when the header repeats a name.
/// - `MalformedRow` on the first row whose field count differs from the schema;
///   `line` is the 1-based line number in `text`.
pub fn load(text: &str, options: &LoadOptions) -> DomainResult<Relation> {
    if text.trim().is_empty() {
        return Err(DomainError::EmptyInput);
    }

    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .map(|(i, line)| (i + 1, split_fields(line, options.delimiter)));

    let mut pending = None;
    let schema = match lines.next() {
        Some((_, header)) if options.has_header => Schema::text(header)?,
        Some((line, first)) => {
            let schema = Schema::text((0..first.len()).map(ColumnName::positional))?;
            pending = Some((line, first));
            schema
        }
        None => return Err(DomainError::EmptyInput),
    };

    let expected = schema.len();
    let mut rows = Vec::new();
    for (line, fields) in pending.into_iter().chain(lines) {
        if fields.len() != expected {
            return Err(DomainError::MalformedRow { line, expected, found: fields.len() });
        }
        rows.push(fields.into_iter().map(Cell::Text).collect());
    }

    let relation = Relation::new(schema, rows)?;
    log::debug!("loaded relation: {} rows x {} columns", relation.len(), expected);
    Ok(relation)
}

fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c != '"' {
                field.push(c);
            } else if chars.peek() == Some(&'"') {
                field.push('"');
                chars.next();
            } else {
                in_quotes = false;
            }
        } else if c == delimiter {
            fields.push(std::mem::take(&mut field));
            quoted = false;
        } else if c == '"' && field.is_empty() && !quoted {
            in_quotes = true;
            quoted = true;
        } else {
            field.push(c);
        }
    }
    fields.push(field);
    fields
}
