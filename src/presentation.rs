// src/presentation.rs
use std::fmt::Write;
use std::path::Path;

use comfy_table::{CellAlignment, ContentArrangement, Table, presets::UTF8_FULL};
use shopstats_domain::{Cell, Relation, Row};
use shopstats_infra::FileWriter;
use shopstats_shared_kernel::Result;
use shopstats_usecase::{QueryOutput, ReportOutput};

use crate::cli::OutputFormat;

/// Headers plus already formatted cells, ready for any text format.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Grid {
    title: Option<String>,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    /// Columns holding numbers, right-aligned in tables.
    numeric: Vec<bool>,
}

impl Grid {
    fn from_relation(title: Option<&str>, relation: &Relation) -> Self {
        let headers: Vec<String> = relation.schema().names().map(|n| n.to_string()).collect();
        let rows: Vec<Vec<String>> = relation.rows().iter().map(|r| format_cells(r.cells())).collect();
        let numeric = (0..headers.len())
            .map(|i| !relation.is_empty() && relation.rows().iter().all(|r| !matches!(r.cells()[i], Cell::Text(_))))
            .collect();
        Self { title: title.map(str::to_string), headers, rows, numeric }
    }

    fn from_row(row: &Row) -> Self {
        let headers: Vec<String> = row.schema().names().map(|n| n.to_string()).collect();
        let numeric = row.cells().iter().map(|c| matches!(c, Cell::Number(_))).collect();
        Self { title: None, headers, rows: vec![format_cells(row.cells())], numeric }
    }

    fn key_values(title: &str, pairs: Vec<(&str, String)>) -> Self {
        Self {
            title: Some(title.to_string()),
            headers: vec!["item".to_string(), "value".to_string()],
            rows: pairs.into_iter().map(|(k, v)| vec![k.to_string(), v]).collect(),
            numeric: vec![false, false],
        }
    }
}

/// Renders the retail report in `format`.
pub fn render_report(report: &ReportOutput, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)? + "\n"),
        OutputFormat::Yaml => to_yaml(report),
        text => {
            let grids = report_grids(report);
            let mut out = String::new();
            if text == OutputFormat::Table {
                let _ = writeln!(
                    out,
                    "shopstats v{} · {} · {} rows\n",
                    crate::VERSION,
                    report.meta.source,
                    report.meta.rows
                );
            }
            out.push_str(&render_grids(&grids, text));
            Ok(out)
        }
    }
}

/// Renders one ad-hoc query result in `format`.
pub fn render_query(output: &QueryOutput, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(output)? + "\n"),
        OutputFormat::Yaml => to_yaml(output),
        text => {
            if let (OutputFormat::Csv, QueryOutput::Scalar { value, .. }) = (text, output) {
                return Ok(format!("{value}\n"));
            }
            let grid = match output {
                QueryOutput::Scalar { label, value } => Grid::key_values(label, vec![(label.as_str(), value.to_string())]),
                QueryOutput::Table { rows } => Grid::from_relation(None, rows),
                QueryOutput::Row { row } => Grid::from_row(row),
            };
            Ok(render_grids(&[grid], text))
        }
    }
}

/// Writes `rendered` to `path` atomically, or to stdout when no path is given.
pub fn emit(rendered: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            FileWriter::atomic_write(path, rendered.as_bytes())?;
            log::info!("wrote {}", path.display());
            Ok(())
        }
        None => {
            print!("{rendered}");
            Ok(())
        }
    }
}

#[cfg(feature = "yaml")]
fn to_yaml<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(serde_yaml::to_string(value)?)
}

#[cfg(not(feature = "yaml"))]
fn to_yaml<T: serde::Serialize>(_value: &T) -> Result<String> {
    Err(shopstats_shared_kernel::InfrastructureError::SerializationError {
        format: "YAML".to_string(),
        details: "built without the `yaml` feature".to_string(),
    }
    .into())
}

fn report_grids(report: &ReportOutput) -> Vec<Grid> {
    let summary = Grid::key_values(
        "Summary",
        vec![
            ("Unique customers", report.unique_customers.to_string()),
            ("Season with the highest sales", report.highest_sales_season.clone()),
            ("Most popular color", report.most_popular_color.clone()),
            ("Most popular size", report.most_popular_size.clone()),
            ("Most popular product", report.most_popular_product.clone()),
            ("Category with the highest average purchase", report.highest_avg_category.clone()),
            ("Category with the lowest average purchase", report.lowest_avg_category.clone()),
        ],
    );
    vec![
        summary,
        Grid::from_relation(Some("Average purchase amount by category"), &report.category_avg_purchase),
        Grid::from_relation(Some("Locations by total purchase amount"), &report.top_locations),
        Grid::from_relation(Some("Average purchase amount by location"), &report.location_avg_purchase),
        Grid::from_relation(Some("Total purchase amount by season"), &report.seasonal_purchase_total),
        Grid::from_relation(Some("Purchases by category"), &report.category_purchase_distribution),
    ]
}

fn render_grids(grids: &[Grid], format: OutputFormat) -> String {
    let blocks: Vec<String> = grids
        .iter()
        .map(|grid| match format {
            OutputFormat::Csv => render_csv(grid),
            OutputFormat::Md => render_markdown(grid),
            _ => render_table(grid),
        })
        .collect();
    blocks.join("\n")
}

fn render_table(grid: &Grid) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(grid.headers.clone());
    for row in &grid.rows {
        table.add_row(row.clone());
    }
    for (i, numeric) in grid.numeric.iter().enumerate() {
        if *numeric && let Some(column) = table.column_mut(i) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    match &grid.title {
        Some(title) => format!("{title}\n{table}\n"),
        None => format!("{table}\n"),
    }
}

fn render_csv(grid: &Grid) -> String {
    let mut out = String::new();
    if let Some(title) = &grid.title {
        let _ = writeln!(out, "# {title}");
    }
    let _ = writeln!(out, "{}", csv_line(&grid.headers));
    for row in &grid.rows {
        let _ = writeln!(out, "{}", csv_line(row));
    }
    out
}

fn csv_line(fields: &[String]) -> String {
    fields.iter().map(|f| csv_field(f)).collect::<Vec<_>>().join(",")
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn render_markdown(grid: &Grid) -> String {
    let mut out = String::new();
    if let Some(title) = &grid.title {
        let _ = writeln!(out, "### {title}\n");
    }
    let escape = |s: &str| s.replace('|', "\\|");
    let header: Vec<String> = grid.headers.iter().map(|h| escape(h)).collect();
    let separator: Vec<&str> = grid.numeric.iter().map(|&n| if n { "---:" } else { ":---" }).collect();
    let _ = writeln!(out, "| {} |", header.join(" | "));
    let _ = writeln!(out, "|{}|", separator.join("|"));
    for row in &grid.rows {
        let cells: Vec<String> = row.iter().map(|c| escape(c)).collect();
        let _ = writeln!(out, "| {} |", cells.join(" | "));
    }
    out
}

fn format_cells(cells: &[Cell]) -> Vec<String> {
    cells.iter().map(format_cell).collect()
}

/// Numbers get at most two decimals, with trailing zeros dropped.
fn format_cell(cell: &Cell) -> String {
    match cell {
        Cell::Number(n) => {
            let fixed = format!("{n:.2}");
            let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
            if trimmed == "-0" { "0".to_string() } else { trimmed.to_string() }
        }
        other => other.to_string(),
    }
}
