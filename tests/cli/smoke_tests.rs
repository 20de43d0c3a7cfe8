use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const SAMPLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/shopping_sample.csv");

fn shopstats() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_shopstats"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn stdout_json(args: &[&str]) -> serde_json::Value {
    let output = shopstats().args(args).output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn shows_help() {
    shopstats()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("shopstats"))
        .stdout(predicate::str::contains("report"));
}

#[test]
fn report_as_json() {
    let report = stdout_json(&["report", SAMPLE, "--format", "json"]);
    assert_eq!(report["unique_customers"], 11);
    assert_eq!(report["meta"]["rows"], 12);
    assert_eq!(report["highest_sales_season"], "Winter");
    assert_eq!(report["most_popular_color"], "Gray");
    assert_eq!(report["most_popular_size"], "M");
    assert_eq!(report["most_popular_product"], "Blouse");
    assert_eq!(report["highest_avg_category"], "Accessories");
    assert_eq!(report["lowest_avg_category"], "Footwear");
    assert_eq!(report["top_locations"][0]["Location"], "Washington, D.C.");
}

#[test]
fn report_table_is_the_default() {
    shopstats()
        .args(["report", SAMPLE])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unique customers"))
        .stdout(predicate::str::contains("Average Purchase Amount"));
}

#[test]
fn distinct_as_csv_prints_the_number() {
    shopstats()
        .args(["distinct", SAMPLE, "--column", "Color", "--format", "csv"])
        .assert()
        .success()
        .stdout("7\n");
}

#[test]
fn group_sorted_and_limited() {
    shopstats()
        .args([
            "group",
            SAMPLE,
            "--by",
            "Season",
            "--metric",
            "Purchase Amount (USD)",
            "--sort",
            "desc",
            "--limit",
            "1",
            "--format",
            "csv",
        ])
        .assert()
        .success()
        .stdout("Season,sum(Purchase Amount (USD))\nWinter,1171\n");
}

#[test]
fn group_count_without_metric() {
    let rows = stdout_json(&["group", SAMPLE, "--by", "Category", "--op", "count", "--format", "json"]);
    assert_eq!(rows["kind"], "table");
    assert_eq!(rows["rows"][0]["Category"], "Clothing");
    assert_eq!(rows["rows"][0]["count"], 7.0);
}

#[test]
fn top_single_row_and_top_n() {
    let best = stdout_json(&["top", SAMPLE, "--column", "Age", "--format", "json"]);
    assert_eq!(best["kind"], "row");
    assert_eq!(best["row"]["Customer ID"], "7");

    let two = stdout_json(&["top", SAMPLE, "--column", "Age", "-n", "2", "--format", "json"]);
    assert_eq!(two["rows"][1]["Customer ID"], "10");
}

#[test]
fn output_flag_writes_a_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.json");
    shopstats()
        .args(["report", SAMPLE, "--format", "json", "--output"])
        .arg(&path)
        .assert()
        .success()
        .stdout("");
    let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["unique_customers"], 11);
}

#[test]
fn missing_file_fails_with_exit_code_one() {
    shopstats()
        .args(["report", "does/not/exist.csv"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn malformed_row_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    fs::write(&path, "Color,Size\nRed,M\nBlue\n").unwrap();
    shopstats()
        .args(["distinct", "--column", "Color"])
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Malformed row at line 3: expected 2 fields, found 1"));
}

#[test]
fn non_numeric_amount_is_fatal_unless_skipped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("amounts.csv");
    fs::write(&path, "Category,Amount\nA,10\nA,n/a\nB,4\n").unwrap();
    let base = ["group", "--by", "Category", "--metric", "Amount", "--op", "avg", "--format", "csv"];

    shopstats()
        .args(base)
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Non-numeric value 'n/a'"));

    shopstats()
        .args(base)
        .arg(&path)
        .arg("--skip-invalid")
        .assert()
        .success()
        .stdout("Category,avg(Amount)\nA,10\nB,4\n");
}

#[test]
fn semicolon_delimiter_and_no_header() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plain.csv");
    fs::write(&path, "Red;M\nBlue;L\nRed;S\n").unwrap();
    shopstats()
        .args(["distinct", "--column", "0", "--no-header", "--delimiter", ";", "--format", "csv"])
        .arg(&path)
        .assert()
        .success()
        .stdout("2\n");
}

#[test]
fn quote_delimiter_is_rejected() {
    shopstats()
        .args(["distinct", SAMPLE, "--column", "Color", "--delimiter", "\""])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--delimiter"));
}

#[test]
fn unknown_format_is_a_usage_error() {
    shopstats()
        .args(["report", SAMPLE, "--format", "xml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("xml"));
}
