use std::cmp::Reverse;
use std::collections::HashMap;

use indexmap::IndexMap;

use crate::config::ReportConfig;
use crate::domain::entities::dataset::Dataset;
use crate::domain::metrics::kpi::{drr, StockCover};
use crate::domain::metrics::style_totals::{style_totals, StyleTotals};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Critical,
    Warning,
    Good,
}

impl Severity {
    pub fn classify(broken_count: usize, config: &ReportConfig) -> Self {
        if broken_count > config.broken_critical_above {
            Severity::Critical
        } else if broken_count > config.broken_warning_above {
            Severity::Warning
        } else {
            Severity::Good
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::Warning => "Warning",
            Severity::Good => "Good",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrokenSizeRow {
    pub style_id: String,
    pub expected_sizes: Option<i64>,
    pub broken_count: usize,
    pub broken_sizes: Vec<String>,
    pub units_sold: i64,
    pub total_stock: i64,
    pub drr: f64,
    pub stock_cover: StockCover,
    pub severity: Severity,
}

/// Sizes whose stock, summed over every fulfillment channel, is under
/// `threshold`.
pub fn broken_sizes(stock_by_size: &IndexMap<String, i64>, threshold: i64) -> Vec<String> {
    stock_by_size
        .iter()
        .filter(|(_, units)| **units < threshold)
        .map(|(size, _)| size.clone())
        .collect()
}

/// Stock per size for every size the style stocks or sells. A size that sold
/// but has no stock rows carries zero.
fn stock_per_size(totals: &StyleTotals) -> IndexMap<String, i64> {
    let mut sizes = totals.stock_by_size.clone();
    for size in totals.sales_by_size.keys() {
        sizes.entry(size.clone()).or_insert(0);
    }
    sizes
}

/// Non-closed styles with at least one broken size, most broken
/// first and then by sales volume.
pub fn broken_size_report(data: &Dataset, config: &ReportConfig) -> Vec<BrokenSizeRow> {
    let closed = data.closed_styles();
    let expected = data
        .size_count
        .iter()
        .map(|row| (row.style_id.as_str(), row.expected_size_count))
        .collect::<HashMap<_, _>>();

    let mut rows = style_totals(data)
        .into_iter()
        .filter(|(style_id, _)| !closed.contains(style_id.as_str()))
        .filter(|(_, totals)| match config.broken_min_units_sold {
            Some(minimum) => totals.units_sold > minimum,
            None => true,
        })
        .filter_map(|(style_id, totals)| {
            let broken = broken_sizes(&stock_per_size(&totals), config.broken_size_threshold);
            if broken.is_empty() {
                return None;
            }
            let total_stock = totals.total_stock();
            let style_drr = drr(totals.units_sold, data.total_sale_days);
            Some(BrokenSizeRow {
                expected_sizes: expected.get(style_id.as_str()).copied(),
                broken_count: broken.len(),
                severity: Severity::classify(broken.len(), config),
                broken_sizes: broken,
                units_sold: totals.units_sold,
                total_stock,
                drr: style_drr,
                stock_cover: StockCover::compute(total_stock, style_drr),
                style_id,
            })
        })
        .collect::<Vec<_>>();

    rows.sort_by_key(|row| (Reverse(row.broken_count), Reverse(row.units_sold)));
    rows
}

/// Broken-size count per style without the report's sales cutoff. Used by
/// the hero-styles report.
pub fn broken_counts(data: &Dataset, threshold: i64) -> HashMap<String, usize> {
    style_totals(data)
        .into_iter()
        .map(|(style_id, totals)| {
            let count = broken_sizes(&stock_per_size(&totals), threshold).len();
            (style_id, count)
        })
        .collect()
}
