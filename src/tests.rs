use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use futures::executor::block_on;

use crate::app::{dropdown_label, tab_button_style, table_container_style, table_header_cell_style};
use crate::config::{ReportConfig, SheetConfig, SheetKind, SheetSpec};
use crate::domain::entities::dataset::Dataset;
use crate::domain::entities::filter::{apply_filters, FilterCriteria, FilterDimension};
use crate::domain::metrics::hero_styles::hero_styles_report;
use crate::infra::export::html::export_dashboard;
use crate::logging;
use crate::usecase::ports::source::{LoadError, RawTable, SheetSource};
use crate::usecase::services::load_service::{validate_headers, LoadService};
use crate::usecase::services::report_service::ReportService;

fn unique_test_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("demand-planner-{prefix}-{nanos}"))
}

fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
    RawTable {
        headers: headers.iter().map(|header| header.to_string()).collect(),
        rows: rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect(),
    }
}

/// In-memory sheets keyed by tab name. Unknown tabs fail like a bad request.
struct FakeSource {
    tables: HashMap<String, Result<RawTable, LoadError>>,
}

impl FakeSource {
    fn new() -> Self {
        Self {
            tables: HashMap::new(),
        }
    }

    fn with(mut self, kind: SheetKind, table: RawTable) -> Self {
        self.tables.insert(kind.default_name().to_string(), Ok(table));
        self
    }

    fn without(mut self, kind: SheetKind) -> Self {
        self.tables.remove(kind.default_name());
        self
    }
}

#[async_trait]
impl SheetSource for FakeSource {
    async fn fetch_table(&self, sheet: &SheetSpec) -> Result<RawTable, LoadError> {
        self.tables
            .get(&sheet.label())
            .cloned()
            .unwrap_or_else(|| {
                Err(LoadError::HttpStatus {
                    sheet: sheet.label(),
                    status: 400,
                })
            })
    }

    fn describe(&self) -> String {
        "in-memory sheets".to_string()
    }
}

fn sample_source() -> FakeSource {
    FakeSource::new()
        .with(
            SheetKind::Sale,
            table(
                SheetKind::Sale.expected_headers(),
                &[
                    &["JAN-24", "Myntra", "Main", "BLR", "A1-M", "A1-M", "A1", "M", "300"],
                    &["JAN-24", "Myntra", "Main", "BLR", "A1-L", "A1-L", "A1", "L", "150"],
                    &["FEB-24", "Ajio", "Main", "DEL", "A1-M", "A1-M", "A1", "M", "290"],
                    &["JAN-24", "Myntra", "Main", "BLR", "A10-M", "A10-M", "A10", "M", "90"],
                    &["FEB-24", "Ajio", "Main", "DEL", "B2-S", "B2-S", "B2", "S", "60"],
                    &["JAN-24", "Myntra", "Main", "BLR", "CL-M", "CL-M", "CL", "M", "999"],
                ],
            ),
        )
        .with(
            SheetKind::Stock,
            table(
                SheetKind::Stock.expected_headers(),
                &[
                    &["Seller", "A1-M", "A1-M", "A1", "M", "100"],
                    &["Seller", "A1-L", "A1-L", "A1", "L", "4"],
                    &["BLR", "A1-M", "A1-M", "A1", "M", "200"],
                    &["Seller", "A10-M", "A10-M", "A10", "M", "500"],
                    &["DEL", "B2-S", "B2-S", "B2", "S", "1,000"],
                    &["Seller", "CL-M", "CL-M", "CL", "M", "2"],
                ],
            ),
        )
        .with(
            SheetKind::StyleStatus,
            table(
                SheetKind::StyleStatus.expected_headers(),
                &[
                    &["A1", "Kurta", "Hero"],
                    &["A10", "Dress", ""],
                    &["CL", "Kurta", "Closed"],
                ],
            ),
        )
        .with(
            SheetKind::SaleDays,
            table(
                SheetKind::SaleDays.expected_headers(),
                &[&["JAN-24", "30"], &["FEB-24", "29"]],
            ),
        )
        .with(
            SheetKind::SizeCount,
            table(SheetKind::SizeCount.expected_headers(), &[&["A1", "4"]]),
        )
}

fn load(source: FakeSource) -> Result<Dataset, LoadError> {
    logging::init_test();
    let service = LoadService::new(Arc::new(source), SheetConfig::default());
    block_on(service.load_all())
}

fn sample_dataset() -> Dataset {
    load(sample_source()).expect("sample sheets should load")
}

#[test]
fn load_all_builds_typed_dataset() {
    let data = sample_dataset();

    assert_eq!(data.sale.len(), 6);
    assert_eq!(data.sale[0].style_id, "A1");
    assert_eq!(data.sale[0].units, 300);
    assert_eq!(data.stock[4].units, 1000, "thousands separator is accepted");
    assert_eq!(data.style_status.len(), 3);
    assert_eq!(data.size_count[0].expected_size_count, 4);
    assert_eq!(data.total_sale_days, 59, "days summed across every month");
}

#[test]
fn optional_sheet_that_cannot_be_fetched_is_skipped() {
    let data = load(sample_source().without(SheetKind::SizeCount))
        .expect("missing optional sheets should not fail the load");

    assert!(data.size_count.is_empty());
    assert!(data.production.is_empty());
}

#[test]
fn required_sheet_fetch_failure_aborts_load() {
    let result = load(sample_source().without(SheetKind::Stock));

    assert_eq!(
        result,
        Err(LoadError::HttpStatus {
            sheet: "Stock".to_string(),
            status: 400,
        })
    );
}

#[test]
fn header_mismatch_aborts_load() {
    let swapped = table(
        &["FC", "Uniware SKU", "MP SKU", "Style ID", "Size", "Units"],
        &[&["Seller", "A1-M", "A1-M", "A1", "M", "1"]],
    );

    let result = load(sample_source().with(SheetKind::Stock, swapped));

    match result {
        Err(LoadError::HeaderMismatch {
            sheet,
            expected,
            actual,
        }) => {
            assert_eq!(sheet, "Stock");
            assert_eq!(expected[1], "MP SKU");
            assert_eq!(actual[1], "Uniware SKU");
        }
        other => panic!("expected header mismatch, got {other:?}"),
    }
}

#[test]
fn optional_sheet_with_wrong_headers_still_aborts_load() {
    let wrong = table(&["Style", "Count"], &[&["A1", "4"]]);

    let result = load(sample_source().with(SheetKind::SizeCount, wrong));

    assert!(matches!(result, Err(LoadError::HeaderMismatch { .. })), "{result:?}");
}

#[test]
fn validate_headers_rejects_extra_columns() {
    let sheet = SheetSpec::named(SheetKind::SaleDays, true);
    let extra = table(&["Month", "Days", "Notes"], &[]);

    assert!(validate_headers(&sheet, &table(&["Month", "Days"], &[])).is_ok());
    assert!(validate_headers(&sheet, &extra).is_err());
}

#[test]
fn empty_filter_returns_the_input_unchanged() {
    let data = sample_dataset();

    let filtered = apply_filters(&data, &FilterCriteria::default());

    assert_eq!(filtered, data);
}

#[test]
fn style_search_keeps_exact_matches_only() {
    let data = sample_dataset();
    let criteria = FilterCriteria::default()
        .with_selection(FilterDimension::Fc, BTreeSet::from(["DEL".to_string()]))
        .with_style_search(" A1 ");

    let filtered = apply_filters(&data, &criteria);

    assert_eq!(filtered.sale.len(), 3, "search overrides the FC filter");
    assert!(filtered.sale.iter().all(|row| row.style_id == "A1"));
    assert_eq!(filtered.stock.len(), 3);
    assert_eq!(filtered.sale_days, data.sale_days);
}

#[test]
fn month_filter_narrows_the_sale_day_window() {
    let data = sample_dataset();
    let criteria = FilterCriteria::default().toggled(FilterDimension::Month, "FEB-24");

    let filtered = apply_filters(&data, &criteria);

    assert_eq!(filtered.sale.len(), 2);
    assert_eq!(filtered.total_sale_days, 29);
    assert_eq!(filtered.stock.len(), data.stock.len(), "stock has no month");
}

#[test]
fn blank_remark_groups_unlisted_and_empty_styles() {
    let data = sample_dataset();
    let criteria = FilterCriteria::default().toggled(FilterDimension::Remark, "Blank");

    let filtered = apply_filters(&data, &criteria);

    let styles = filtered
        .sale
        .iter()
        .map(|row| row.style_id.as_str())
        .collect::<BTreeSet<_>>();
    assert_eq!(styles, BTreeSet::from(["A10", "B2"]));
}

#[test]
fn dashboard_reports_follow_the_loaded_data() {
    let data = sample_dataset();
    let service = ReportService::new(ReportConfig::default());

    let dashboard = service.build_dashboard(&data, &FilterCriteria::default());

    assert_eq!(dashboard.options.months, vec!["JAN-24", "FEB-24"]);
    assert_eq!(dashboard.options.fcs, vec!["BLR", "DEL", "Seller"]);
    assert!(dashboard.options.remarks.contains(&"Blank".to_string()));

    assert_eq!(dashboard.sale.total_units, 1889);
    let a1 = dashboard
        .demand
        .iter()
        .find(|row| row.style_id == "A1")
        .expect("A1 should have demand");
    // 740 units over 59 days, 45-day target, 104 seller units on hand
    assert_eq!(a1.demand, 460);
    assert!(dashboard.demand.iter().all(|row| row.style_id != "CL"));

    let broken = dashboard
        .broken_size
        .iter()
        .find(|row| row.style_id == "A1")
        .expect("A1 sells over the cutoff and has a thin size");
    assert_eq!(broken.broken_sizes, vec!["L"]);
    assert_eq!(broken.expected_sizes, Some(4));

    assert!(dashboard.overstock.iter().any(|row| row.style_id == "B2"));
    assert!(!dashboard.has_production);
}

#[test]
fn dashboard_rebuild_is_idempotent() {
    let data = sample_dataset();
    let service = ReportService::default();
    let criteria = FilterCriteria::default().toggled(FilterDimension::Category, "Kurta");

    let first = service.build_dashboard(&data, &criteria);
    let second = service.build_dashboard(&data, &criteria);

    assert_eq!(first, second);
}

#[test]
fn hero_selection_with_a_tie_at_the_cutoff_ignores_row_order() {
    let mut data = sample_dataset();
    let mut tied = data.sale[4].clone();
    tied.style_id = "A10".to_string();
    tied.mp_sku = "A10-S".to_string();
    tied.uniware_sku = "A10-S".to_string();
    data.sale.push(tied);
    let mut reversed = data.clone();
    reversed.sale.reverse();
    let config = ReportConfig {
        hero_top_n: 2,
        ..ReportConfig::default()
    };

    let heroes = |data: &Dataset| {
        hero_styles_report(data, &config)
            .rows
            .into_iter()
            .map(|row| row.style_id)
            .collect::<BTreeSet<_>>()
    };

    // FEB-24: A1 290, then A10 and B2 tied on 60 for the last place
    assert_eq!(heroes(&data), heroes(&reversed));
    assert_eq!(
        heroes(&data),
        BTreeSet::from(["A1".to_string(), "A10".to_string()])
    );
}

#[test]
fn export_writes_standalone_html() {
    let temp_dir = unique_test_dir("export");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let path = temp_dir.join("report.html");
    let dashboard = ReportService::default().build_dashboard(&sample_dataset(), &FilterCriteria::default());

    export_dashboard(&path, &dashboard).expect("export should succeed");

    let html = fs::read_to_string(&path).expect("should read exported file");
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<h2>Hero Styles</h2>"));
    assert!(html.contains("<h2>Sale Summary</h2>"));

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn export_to_missing_directory_reports_context() {
    let path = unique_test_dir("missing").join("nested").join("report.html");
    let dashboard = ReportService::default().build_dashboard(&Dataset::default(), &FilterCriteria::default());

    let err = export_dashboard(&path, &dashboard).expect_err("export should fail");

    assert!(format!("{err:#}").contains("failed to write report"));
}

#[test]
fn table_header_cell_style_is_sticky() {
    let style = table_header_cell_style();

    assert!(style.contains("position: sticky"));
    assert!(style.contains("top: 0"));
    assert!(style.contains("z-index"));
}

#[test]
fn table_container_style_allows_scroll() {
    assert!(table_container_style().contains("overflow: auto"));
}

#[test]
fn active_tab_is_highlighted() {
    assert!(tab_button_style(true).contains("font-weight: bold"));
    assert!(!tab_button_style(false).contains("font-weight"));
}

#[test]
fn dropdown_label_summarises_selection() {
    assert_eq!(dropdown_label(&BTreeSet::new()), "(All)");
    assert_eq!(dropdown_label(&BTreeSet::from(["BLR".to_string()])), "BLR");
    assert_eq!(
        dropdown_label(&BTreeSet::from(["BLR".to_string(), "DEL".to_string()])),
        "2 selected"
    );
}
