// src/parsers.rs
use std::{fmt::Display, str::FromStr};

fn parse_bounded_number<T>(s: &str, min: T, max: Option<T>) -> Result<T, String>
where
    T: Copy + PartialOrd + Display + FromStr,
    <T as FromStr>::Err: Display,
{
    let value = s
        .parse::<T>()
        .map_err(|err| format!("invalid number '{s}': {err}"))?;
    if value < min {
        return Err(format!("value must be at least {min}"));
    }
    if let Some(max_bound) = max
        && value > max_bound
    {
        return Err(format!("value must be at most {max_bound}"));
    }
    Ok(value)
}

/// Parse a positive `usize` (>= 1) from CLI input.
///
/// # Errors
/// Returns an error if the input string is not a valid number or is less than 1.
pub fn parse_positive_usize(s: &str) -> Result<usize, String> {
    parse_bounded_number(s, 1, None)
}

/// Parse a `usize` constrained to the inclusive range [1, 512].
///
/// # Errors
/// Returns an error if the input string is not a valid number or is outside the range [1, 512].
pub fn parse_usize_1_to_512(s: &str) -> Result<usize, String> {
    parse_bounded_number(s, 1, Some(512))
}

/// 区切り文字の解釈
///
/// `tab` / `\t` name the tab character; anything else must be exactly one
/// character. Quotes and line breaks are rejected because the loader gives
/// them their own meaning.
///
/// # Errors
/// Returns a human-readable reason when the value is not a usable delimiter.
pub fn parse_delimiter(s: &str) -> Result<char, String> {
    let delimiter = match s {
        "tab" | "\\t" => '\t',
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                (None, _) => return Err("delimiter must not be empty".to_string()),
                (Some(_), Some(_)) => return Err("delimiter must be a single character".to_string()),
            }
        }
    };
    if matches!(delimiter, '"' | '\n' | '\r') {
        return Err(format!("{delimiter:?} cannot be used as a delimiter"));
    }
    Ok(delimiter)
}
