// crates/usecase/src/report.rs
use chrono::Local;
use serde::{Deserialize, Serialize};
use shopstats_domain::{
    AggregateOp, Aggregator, LoadOptions, NumericPolicy, Relation, SortOrder, distinct_count, order_by, top_n, top1,
};
use shopstats_ports::DatasetSource;
use shopstats_shared_kernel::{ErrorContext, Result};

use crate::dto::{ReportMeta, ReportOutput};

/// Column names of the shopping-behaviour dataset.
pub mod columns {
    pub const CUSTOMER_ID: &str = "Customer ID";
    pub const PURCHASE_AMOUNT: &str = "Purchase Amount (USD)";
    pub const CATEGORY: &str = "Category";
    pub const LOCATION: &str = "Location";
    pub const SEASON: &str = "Season";
    pub const COLOR: &str = "Color";
    pub const SIZE: &str = "Size";
    pub const ITEM_PURCHASED: &str = "Item Purchased";

    pub const AVERAGE_PURCHASE_AMOUNT: &str = "Average Purchase Amount";
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    pub load: LoadOptions,
    pub numeric_policy: NumericPolicy,
    /// Keep only this many locations in the ranked totals.
    pub top_locations: Option<usize>,
}

/// The retail report over one dataset.
pub struct ShoppingReport<'a> {
    source: &'a dyn DatasetSource,
}

impl<'a> ShoppingReport<'a> {
    pub fn new(source: &'a dyn DatasetSource) -> Self {
        Self { source }
    }

    pub fn run(&self, options: &ReportOptions) -> Result<ReportOutput> {
        let relation = crate::load_relation(self.source, &options.load)?;
        let ctx = ReportContext { relation: &relation, policy: options.numeric_policy };

        let unique_customers = distinct_count(&relation, columns::CUSTOMER_ID).context("counting unique customers")?;

        let category_avg = ctx.aggregate(columns::CATEGORY, AggregateOp::Avg)?;
        let avg_column = AggregateOp::Avg.output_column(columns::PURCHASE_AMOUNT);
        let highest_avg_category = leader(&category_avg, &avg_column, SortOrder::Descending)
            .context("finding the category with the highest average")?;
        let lowest_avg_category = leader(&category_avg, &avg_column, SortOrder::Ascending)
            .context("finding the category with the lowest average")?;
        let category_avg_purchase = category_avg.rename_column(&avg_column, columns::AVERAGE_PURCHASE_AMOUNT)?;

        let sum_column = AggregateOp::Sum.output_column(columns::PURCHASE_AMOUNT);
        let location_totals = ctx.aggregate(columns::LOCATION, AggregateOp::Sum)?;
        let top_locations = match options.top_locations {
            Some(n) => top_n(&location_totals, &sum_column, SortOrder::Descending, n)?,
            None => order_by(&location_totals, &sum_column, SortOrder::Descending)?,
        };
        let location_avg_purchase = ctx.aggregate(columns::LOCATION, AggregateOp::Avg)?;

        let seasonal_purchase_total = ctx.aggregate(columns::SEASON, AggregateOp::Sum)?;
        let highest_sales_season = leader(&seasonal_purchase_total, &sum_column, SortOrder::Descending)
            .context("finding the season with the highest sales")?;

        let most_popular_color = ctx.most_popular(columns::COLOR)?;
        let most_popular_size = ctx.most_popular(columns::SIZE)?;
        let most_popular_product = ctx.most_popular(columns::ITEM_PURCHASED)?;

        let category_purchase_distribution = ctx.aggregate(columns::CATEGORY, AggregateOp::Count)?;

        Ok(ReportOutput {
            meta: ReportMeta {
                source: self.source.describe(),
                rows: relation.row_count(),
                generated_at: Local::now(),
            },
            unique_customers,
            category_avg_purchase,
            top_locations,
            location_avg_purchase,
            seasonal_purchase_total,
            highest_sales_season,
            most_popular_color,
            most_popular_size,
            most_popular_product,
            highest_avg_category,
            lowest_avg_category,
            category_purchase_distribution,
        })
    }
}

struct ReportContext<'r> {
    relation: &'r Relation,
    policy: NumericPolicy,
}

impl ReportContext<'_> {
    fn aggregate(&self, group: &str, op: AggregateOp) -> Result<Relation> {
        Aggregator::group_by_aggregate(self.relation, group, columns::PURCHASE_AMOUNT, op, self.policy)
            .with_context(|| format!("{op} of {} by {group}", columns::PURCHASE_AMOUNT))
    }

    fn most_popular(&self, group: &str) -> Result<String> {
        let counts = self.aggregate(group, AggregateOp::Count)?;
        leader(&counts, "count", SortOrder::Descending).with_context(|| format!("finding the most popular {group}"))
    }
}

/// Group key of the first row when ranked by `metric`.
///
/// Groups whose metric is missing (no usable values) never lead.
fn leader(grouped: &Relation, metric: &str, order: SortOrder) -> Result<String> {
    let index = grouped.column_index(metric)?;
    let ranked = grouped.filter(|row| row.cell(index).is_some_and(|cell| !cell.is_missing()));
    let row = top1(&ranked, metric, order)?;
    Ok(row.cells().first().map(ToString::to_string).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use shopstats_domain::Cell;
    use shopstats_ports::TextSource;
    use shopstats_shared_kernel::DomainError;

    use super::*;

    const SAMPLE: &str = "\
Customer ID,Age,Gender,Item Purchased,Category,Purchase Amount (USD),Location,Size,Color,Season
1,55,Male,Blouse,Clothing,53,Kentucky,L,Gray,Winter
2,19,Male,Sweater,Clothing,64,Maine,L,Maroon,Winter
3,50,Male,Jeans,Clothing,73,Massachusetts,S,Maroon,Spring
4,21,Male,Sandals,Footwear,90,Rhode Island,M,Maroon,Spring
5,45,Male,Blouse,Clothing,49,Oregon,M,Turquoise,Spring
6,46,Male,Sneakers,Footwear,20,Wyoming,M,White,Summer
7,63,Male,Shirt,Clothing,85,Montana,M,Gray,Fall
8,27,Male,Shorts,Clothing,34,Louisiana,L,Charcoal,Winter
9,26,Male,Coat,Outerwear,97,West Virginia,L,Silver,Summer
10,57,Male,Handbag,Accessories,31,Missouri,M,Pink,Spring
1,55,Male,Blouse,Clothing,40,Maine,M,Gray,Fall
";

    fn run(text: &str, options: &ReportOptions) -> Result<ReportOutput> {
        let source = TextSource::new("sample.csv", text);
        ShoppingReport::new(&source).run(options)
    }

    fn keys(relation: &Relation) -> Vec<String> {
        relation.rows().iter().map(|r| r.cells()[0].to_string()).collect()
    }

    #[test]
    fn computes_the_full_report() {
        let report = run(SAMPLE, &ReportOptions::default()).unwrap();

        assert_eq!(report.meta.source, "sample.csv");
        assert_eq!(report.meta.rows, 11usize);
        assert_eq!(report.unique_customers, 10);

        assert_eq!(keys(&report.category_avg_purchase), vec!["Clothing", "Footwear", "Outerwear", "Accessories"]);
        assert_eq!(
            report.category_avg_purchase.rows()[1].get(columns::AVERAGE_PURCHASE_AMOUNT),
            Some(&Cell::Number(55.0))
        );
        assert_eq!(report.highest_avg_category, "Outerwear");
        assert_eq!(report.lowest_avg_category, "Accessories");

        assert_eq!(keys(&report.top_locations)[0], "Maine");
        assert_eq!(report.top_locations.rows()[0].cells()[1], Cell::Number(104.0));
        assert_eq!(report.top_locations.len(), 10);
        assert_eq!(report.location_avg_purchase.len(), 10);

        assert_eq!(keys(&report.seasonal_purchase_total), vec!["Winter", "Spring", "Summer", "Fall"]);
        assert_eq!(report.highest_sales_season, "Spring");

        assert_eq!(report.most_popular_color, "Gray");
        assert_eq!(report.most_popular_size, "M");
        assert_eq!(report.most_popular_product, "Blouse");

        assert_eq!(report.category_purchase_distribution.rows()[0].get("count"), Some(&Cell::Number(7.0)));
    }

    #[test]
    fn top_locations_can_be_limited() {
        let options = ReportOptions { top_locations: Some(3), ..ReportOptions::default() };
        let report = run(SAMPLE, &options).unwrap();
        assert_eq!(keys(&report.top_locations), vec!["Maine", "West Virginia", "Rhode Island"]);
    }

    #[test]
    fn strict_policy_rejects_bad_amounts() {
        let text = SAMPLE.replace("Jeans,Clothing,73", "Jeans,Clothing,n/a");
        let err = run(&text, &ReportOptions::default()).unwrap_err();
        assert_eq!(
            err.domain(),
            Some(&DomainError::NonNumericValue {
                column: columns::PURCHASE_AMOUNT.into(),
                row: 3,
                value: "n/a".into()
            })
        );
    }

    #[test]
    fn skip_policy_reports_anyway() {
        let text = SAMPLE.replace("Jeans,Clothing,73", "Jeans,Clothing,n/a");
        let options = ReportOptions { numeric_policy: NumericPolicy::SkipInvalid, ..ReportOptions::default() };
        let report = run(&text, &options).unwrap();
        assert_eq!(report.unique_customers, 10);
        assert_eq!(report.highest_avg_category, "Outerwear");
        let clothing = &report.category_avg_purchase.rows()[0];
        assert_eq!(clothing.get(columns::AVERAGE_PURCHASE_AMOUNT), Some(&Cell::Number(325.0 / 6.0)));
    }

    #[test]
    fn category_without_usable_amounts_is_never_lowest() {
        let text = "\
Customer ID,Item Purchased,Category,Purchase Amount (USD),Location,Size,Color,Season
1,Blouse,Clothing,53,Kentucky,L,Gray,Winter
2,Sandals,Footwear,n/a,Maine,M,Maroon,Spring
3,Coat,Outerwear,97,Oregon,L,Gray,Winter
";
        let options = ReportOptions { numeric_policy: NumericPolicy::SkipInvalid, ..ReportOptions::default() };
        let report = run(text, &options).unwrap();
        let footwear = &report.category_avg_purchase.rows()[1];
        assert_eq!(footwear.get(columns::AVERAGE_PURCHASE_AMOUNT), Some(&Cell::Missing));
        assert_eq!(report.lowest_avg_category, "Clothing");
        assert_eq!(report.highest_avg_category, "Outerwear");
    }

    #[test]
    fn empty_dataset_fails_on_first_ranking() {
        let header = SAMPLE.lines().next().unwrap();
        let err = run(header, &ReportOptions::default()).unwrap_err();
        assert_eq!(err.domain(), Some(&DomainError::EmptyRelation { operation: "top1".into() }));
        assert!(err.to_string().contains("highest average"));
    }

    #[test]
    fn missing_column_is_reported_with_context() {
        let text = SAMPLE.replace("Season", "Quarter");
        let err = run(&text, &ReportOptions::default()).unwrap_err();
        assert_eq!(err.domain(), Some(&DomainError::UnknownColumn { column: "Season".into() }));
    }
}
