// crates/usecase/src/dto.rs
use chrono::{DateTime, Local};
use serde::Serialize;
use shopstats_domain::{Relation, Row};
use shopstats_shared_kernel::RowCount;

/// Where a report came from and when it was computed.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub source: String,
    pub rows: RowCount,
    pub generated_at: DateTime<Local>,
}

/// Everything the retail report computes, in presentation order.
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutput {
    pub meta: ReportMeta,
    pub unique_customers: usize,
    /// `Category`, `Average Purchase Amount`
    pub category_avg_purchase: Relation,
    /// `Location`, `sum(Purchase Amount (USD))`, highest total first
    pub top_locations: Relation,
    pub location_avg_purchase: Relation,
    pub seasonal_purchase_total: Relation,
    pub highest_sales_season: String,
    pub most_popular_color: String,
    pub most_popular_size: String,
    pub most_popular_product: String,
    pub highest_avg_category: String,
    pub lowest_avg_category: String,
    /// `Category`, `count`
    pub category_purchase_distribution: Relation,
}

/// Result of a single ad-hoc query.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum QueryOutput {
    Scalar { label: String, value: usize },
    Table { rows: Relation },
    Row { row: Row },
}
