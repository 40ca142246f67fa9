use std::cmp::Reverse;

use crate::config::ReportConfig;
use crate::domain::entities::dataset::Dataset;
use crate::domain::metrics::kpi::{allocate, drr, excess_units, format_drr, StockCover};
use crate::domain::metrics::style_totals::{style_totals, StyleTotals};

#[derive(Debug, Clone, PartialEq)]
pub struct MonthDrr {
    pub month: String,
    pub drr: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkuExcessRow {
    pub uniware_sku: String,
    pub size: String,
    pub units_sold: i64,
    pub fc_stock: i64,
    pub seller_stock: i64,
    pub total_stock: i64,
    pub excess: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverstockRow {
    pub style_id: String,
    pub units_sold: i64,
    pub fc_stock: i64,
    pub seller_stock: i64,
    pub total_stock: i64,
    pub drr: f64,
    pub stock_cover: StockCover,
    pub excess: i64,
    pub drr_trail: Vec<MonthDrr>,
    pub drr_dropped: bool,
    pub skus: Vec<SkuExcessRow>,
}

impl OverstockRow {
    /// `DRR Dropped: JAN-24 2.00 → FEB-24 1.50`, or empty when the latest
    /// month held up.
    pub fn remark(&self) -> String {
        if !self.drr_dropped {
            return String::new();
        }
        let trail = self
            .drr_trail
            .iter()
            .map(|point| format!("{} {}", point.month, format_drr(point.drr)))
            .collect::<Vec<_>>()
            .join(" → ");
        format!("DRR Dropped: {trail}")
    }
}

fn drr_trail(totals: &StyleTotals, months: &[String], data: &Dataset) -> Vec<MonthDrr> {
    let days = data.sale_days_by_month();
    months
        .iter()
        .map(|month| MonthDrr {
            month: month.clone(),
            drr: drr(
                totals.sales_by_month.get(month).copied().unwrap_or(0),
                days.get(month.as_str()).copied().unwrap_or(0),
            ),
        })
        .collect()
}

/// Styles holding more stock than the planning horizon needs, largest excess
/// first. Closed styles are left out.
pub fn overstock_report(data: &Dataset, config: &ReportConfig) -> Vec<OverstockRow> {
    let closed = data.closed_styles();
    let months = data.sale_months();

    let mut rows = style_totals(data)
        .into_iter()
        .filter(|(style_id, _)| !closed.contains(style_id.as_str()))
        .filter_map(|(style_id, totals)| {
            let total_stock = totals.total_stock();
            let style_drr = drr(totals.units_sold, data.total_sale_days);
            let excess = excess_units(style_drr, total_stock, config.planning_horizon_days);
            if excess <= 0 {
                return None;
            }

            let drr_trail = drr_trail(&totals, &months, data);
            let drr_dropped = match drr_trail.as_slice() {
                [.., previous, latest] => latest.drr < previous.drr,
                _ => false,
            };
            let skus = totals
                .skus
                .iter()
                .map(|(sku, sku_totals)| SkuExcessRow {
                    uniware_sku: sku.clone(),
                    size: sku_totals.size.clone(),
                    units_sold: sku_totals.units_sold,
                    fc_stock: sku_totals.fc_stock,
                    seller_stock: sku_totals.seller_stock,
                    total_stock: sku_totals.total_stock(),
                    excess: allocate(excess, sku_totals.total_stock(), total_stock),
                })
                .collect();

            Some(OverstockRow {
                units_sold: totals.units_sold,
                fc_stock: totals.fc_stock,
                seller_stock: totals.seller_stock,
                total_stock,
                drr: style_drr,
                stock_cover: StockCover::compute(total_stock, style_drr),
                excess,
                drr_trail,
                drr_dropped,
                skus,
                style_id,
            })
        })
        .collect::<Vec<_>>();

    rows.sort_by_key(|row| Reverse(row.excess));
    rows
}
