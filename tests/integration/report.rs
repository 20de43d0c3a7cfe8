use shopstats_domain::Cell;
use shopstats_infra::FileSource;
use shopstats_usecase::{ReportOptions, ShoppingReport, columns};

const SAMPLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/shopping_sample.csv");

fn first_column(relation: &shopstats_domain::Relation) -> Vec<String> {
    relation.rows().iter().map(|r| r.cells()[0].to_string()).collect()
}

#[test]
fn report_over_fixture_file() {
    let source = FileSource::new(SAMPLE);
    let report = ShoppingReport::new(&source).run(&ReportOptions::default()).unwrap();

    assert!(report.meta.source.ends_with("shopping_sample.csv"));
    assert_eq!(report.meta.rows, 12usize);
    assert_eq!(report.unique_customers, 11);

    assert_eq!(
        first_column(&report.category_avg_purchase),
        vec!["Clothing", "Footwear", "Outerwear", "Accessories"]
    );
    let accessories = &report.category_avg_purchase.rows()[3];
    assert_eq!(accessories.get(columns::AVERAGE_PURCHASE_AMOUNT), Some(&Cell::Number(525.5)));

    assert_eq!(first_column(&report.top_locations)[..3], ["Washington, D.C.", "Maine", "West Virginia"]);
    assert_eq!(report.location_avg_purchase.len(), 11);

    assert_eq!(first_column(&report.seasonal_purchase_total), vec!["Winter", "Spring", "Summer", "Fall"]);
    assert_eq!(report.highest_sales_season, "Winter");
    assert_eq!(report.most_popular_color, "Gray");
    assert_eq!(report.most_popular_size, "M");
    assert_eq!(report.most_popular_product, "Blouse");
    assert_eq!(report.highest_avg_category, "Accessories");
    assert_eq!(report.lowest_avg_category, "Footwear");

    let counts: Vec<Cell> = report.category_purchase_distribution.rows().iter().map(|r| r.cells()[1].clone()).collect();
    assert_eq!(counts, vec![Cell::Number(7.0), Cell::Number(2.0), Cell::Number(1.0), Cell::Number(2.0)]);
}

#[test]
fn limited_top_locations() {
    let source = FileSource::new(SAMPLE);
    let options = ReportOptions { top_locations: Some(2), ..ReportOptions::default() };
    let report = ShoppingReport::new(&source).run(&options).unwrap();
    assert_eq!(first_column(&report.top_locations), vec!["Washington, D.C.", "Maine"]);
}
