use std::{fs, path::Path};

use shopstats::{
    app,
    cli::OutputFormat,
    config::{RunConfig, RunConfigBuilder, Task},
};
use shopstats_domain::{AggregateOp, SortOrder};
use shopstats_usecase::QuerySpec;
use tempfile::tempdir;

const SAMPLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/shopping_sample.csv");

fn build_config(task: Task, format: OutputFormat, output: &Path) -> RunConfig {
    RunConfigBuilder::default()
        .input(SAMPLE)
        .task(task)
        .format(format)
        .output_path(Some(output.to_path_buf()))
        .build()
        .unwrap()
}

fn render(task: Task, format: OutputFormat) -> String {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out");
    app::run(&build_config(task, format, &path)).unwrap();
    fs::read_to_string(path).unwrap()
}

fn report() -> Task {
    Task::Report { top_locations: Some(3) }
}

#[test]
fn report_table() {
    let out = render(report(), OutputFormat::Table);
    assert!(out.starts_with("shopstats v"));
    assert!(out.contains("Unique customers"));
    assert!(out.contains("Washington, D.C."));
}

#[test]
fn report_csv_blocks() {
    let out = render(report(), OutputFormat::Csv);
    assert!(out.starts_with("# Summary\nitem,value\nUnique customers,11\n"));
    assert!(out.contains("# Locations by total purchase amount\nLocation,sum(Purchase Amount (USD))\n\"Washington, D.C.\",1020\nMaine,104\nWest Virginia,97\n"));
    assert!(out.contains("Category,Average Purchase Amount\nClothing,56.86\n"));
}

#[test]
fn report_markdown() {
    let out = render(report(), OutputFormat::Md);
    assert!(out.contains("### Summary"));
    assert!(out.contains("| Category | count |\n|:---|---:|\n| Clothing | 7 |"));
}

#[test]
fn report_json_keeps_full_precision() {
    let out = render(report(), OutputFormat::Json);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let clothing = value["category_avg_purchase"][0]["Average Purchase Amount"].as_f64().unwrap();
    assert!((clothing - 398.0 / 7.0).abs() < 1e-9);
    assert!(value["meta"]["generated_at"].is_string());
}

#[cfg(feature = "yaml")]
#[test]
fn report_yaml() {
    let out = render(report(), OutputFormat::Yaml);
    assert!(out.contains("unique_customers: 11"));
    assert!(out.contains("highest_sales_season: Winter"));
}

#[test]
fn group_query_markdown() {
    let task = Task::Query(QuerySpec::GroupBy {
        group: "Season".into(),
        metric: Some("Purchase Amount (USD)".into()),
        op: AggregateOp::Sum,
        sort: Some(SortOrder::Ascending),
        limit: None,
    });
    let out = render(task, OutputFormat::Md);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "| Season | sum(Purchase Amount (USD)) |");
    assert_eq!(lines[2], "| Summer | 117 |");
    assert_eq!(lines[5], "| Winter | 1171 |");
}

#[test]
fn failed_run_leaves_no_output_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out");
    let task = Task::Query(QuerySpec::Distinct { column: "Region".into() });
    assert!(app::run(&build_config(task, OutputFormat::Csv, &path)).is_err());
    assert!(!path.exists());
}
