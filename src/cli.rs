// src/cli.rs
use std::path::{Path, PathBuf};

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum, ValueHint};
use serde::{Deserialize, Serialize};

use crate::parsers;

#[derive(Parser, Debug)]
#[command(name = "shopstats", version, about = "小売トランザクションCSVの集計レポートツール")]
pub struct Args {
    #[command(flatten)]
    pub input: InputOptions,

    #[command(flatten)]
    pub output: OutputOptions,

    #[command(flatten)]
    pub behavior: BehaviorOptions,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 購買データの定型レポート
    Report {
        /// 入力CSV
        #[arg(value_hint = ValueHint::FilePath)]
        csv: PathBuf,

        /// 数値に変換できない購入金額を無視する
        #[arg(long)]
        skip_invalid: bool,

        /// 地域別合計の上位N件のみ表示
        #[arg(long, value_parser = parsers::parse_positive_usize)]
        top_locations: Option<usize>,
    },

    /// 列のユニーク値の数
    Distinct {
        /// 入力CSV
        #[arg(value_hint = ValueHint::FilePath)]
        csv: PathBuf,

        /// 対象列
        #[arg(long, short)]
        column: String,
    },

    /// 列ごとのグループ集計
    Group {
        /// 入力CSV
        #[arg(value_hint = ValueHint::FilePath)]
        csv: PathBuf,

        /// グループ化する列
        #[arg(long)]
        by: String,

        /// 集計対象の数値列 (count では不要)
        #[arg(long)]
        metric: Option<String>,

        /// 集計関数
        #[arg(long, value_enum, default_value = "sum")]
        op: Aggregate,

        /// 集計値でソート
        #[arg(long, value_enum)]
        sort: Option<Direction>,

        /// 上位N件のみ表示
        #[arg(long, value_parser = parsers::parse_positive_usize)]
        limit: Option<usize>,

        /// 数値に変換できない値を無視する
        #[arg(long)]
        skip_invalid: bool,
    },

    /// 列の値で並べた先頭N行
    Top {
        /// 入力CSV
        #[arg(value_hint = ValueHint::FilePath)]
        csv: PathBuf,

        /// ソートキー列
        #[arg(long, short)]
        column: String,

        /// ソート方向
        #[arg(long, value_enum, default_value = "desc")]
        direction: Direction,

        /// 行数
        #[arg(short = 'n', long = "count", default_value_t = 1, value_parser = parsers::parse_positive_usize)]
        n: usize,
    },
}

impl Command {
    pub fn csv(&self) -> &Path {
        match self {
            Self::Report { csv, .. } | Self::Distinct { csv, .. } | Self::Group { csv, .. } | Self::Top { csv, .. } => {
                csv
            }
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct InputOptions {
    /// 区切り文字 (`tab` でタブ)
    #[arg(long, global = true, default_value = ",", help_heading = "入力")]
    pub delimiter: String,

    /// 1行目をヘッダとして扱わない
    #[arg(long, global = true, help_heading = "入力")]
    pub no_header: bool,
}

#[derive(ClapArgs, Debug)]
pub struct OutputOptions {
    /// 出力フォーマット
    #[arg(long, value_enum, global = true, default_value = "table", help_heading = "出力")]
    pub format: OutputFormat,

    /// 出力先ファイル
    #[arg(long, global = true, value_hint = ValueHint::FilePath, help_heading = "出力")]
    pub output: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct BehaviorOptions {
    /// 並列数 (デフォルト: CPU数)
    #[arg(long, short, global = true, value_parser = parsers::parse_usize_1_to_512, help_heading = "動作")]
    pub jobs: Option<usize>,

    /// 詳細ログを出力
    #[arg(long, short, global = true, help_heading = "動作")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
    Yaml,
    Md,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Aggregate {
    Sum,
    #[value(alias = "mean")]
    Avg,
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Direction {
    #[value(alias = "ascending")]
    Asc,
    #[value(alias = "descending")]
    Desc,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "shopstats", "group", "data.csv", "--by", "Season", "--metric", "Amount", "--format", "json", "-j", "2",
        ])
        .unwrap();
        assert_eq!(args.output.format, OutputFormat::Json);
        assert_eq!(args.behavior.jobs, Some(2));
        assert!(matches!(args.command, Command::Group { op: Aggregate::Sum, sort: None, .. }));
        assert_eq!(args.command.csv(), Path::new("data.csv"));
    }

    #[test]
    fn top_defaults_to_single_descending_row() {
        let args = Args::try_parse_from(["shopstats", "top", "data.csv", "--column", "Amount"]).unwrap();
        assert!(matches!(args.command, Command::Top { direction: Direction::Desc, n: 1, .. }));
    }

    #[test]
    fn rejects_zero_limits() {
        assert!(Args::try_parse_from(["shopstats", "report", "data.csv", "--top-locations", "0"]).is_err());
        assert!(Args::try_parse_from(["shopstats", "top", "data.csv", "-c", "A", "-n", "0"]).is_err());
    }
}
