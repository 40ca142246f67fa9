use std::cmp::Reverse;

use indexmap::IndexMap;

use crate::config::{ReportConfig, SIZE_ORDER};
use crate::domain::entities::dataset::{label_or_blank, Dataset, StyleStatus};
use crate::domain::entities::month::compare_month_labels;
use crate::domain::metrics::grouping::group_sum;
use crate::domain::metrics::kpi::{drr, share_pct, StockCover};
use crate::domain::metrics::style_totals::style_totals;

#[derive(Debug, Clone, PartialEq)]
pub struct MonthSaleRow {
    pub month: String,
    pub units_sold: i64,
    pub sale_days: i64,
    pub drr: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaleSummary {
    pub rows: Vec<MonthSaleRow>,
    pub total_units: i64,
    pub total_sale_days: i64,
    pub total_drr: f64,
}

/// Units and DRR per month, oldest first. The grand total divides summed
/// units by summed sale days of the window.
pub fn sale_summary(data: &Dataset) -> SaleSummary {
    let days = data.sale_days_by_month();
    let mut by_month = group_sum(&data.sale, |row| row.month.clone(), |row| row.units);
    by_month.sort_by(|a, _, b, _| compare_month_labels(a, b));

    let rows = by_month
        .into_iter()
        .map(|(month, units_sold)| {
            let sale_days = days.get(month.as_str()).copied().unwrap_or(0);
            MonthSaleRow {
                drr: drr(units_sold, sale_days),
                month,
                units_sold,
                sale_days,
            }
        })
        .collect::<Vec<_>>();

    let total_units = rows.iter().map(|row| row.units_sold).sum();
    SaleSummary {
        rows,
        total_units,
        total_sale_days: data.total_sale_days,
        total_drr: drr(total_units, data.total_sale_days),
    }
}

/// One labelled line of a stock-vs-sales rollup.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSaleRow {
    pub label: String,
    pub units_sold: i64,
    pub stock: i64,
    pub drr: f64,
    pub stock_cover: StockCover,
}

impl GroupSaleRow {
    fn new(label: String, units_sold: i64, stock: i64, sale_days: i64) -> Self {
        let drr = drr(units_sold, sale_days);
        Self {
            label,
            units_sold,
            stock,
            drr,
            stock_cover: StockCover::compute(stock, drr),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub rows: Vec<GroupSaleRow>,
    pub total: GroupSaleRow,
}

impl GroupSummary {
    /// Grand totals come from summed numerators and denominators, never from
    /// averaging row ratios. Groups holding stock without sales get a row, so
    /// the totals cover every stock unit.
    fn from_groups(
        sales: IndexMap<String, i64>,
        stock: IndexMap<String, i64>,
        sale_days: i64,
    ) -> Self {
        let mut labels = sales.keys().cloned().collect::<Vec<_>>();
        labels.extend(stock.keys().filter(|key| !sales.contains_key(*key)).cloned());
        let rows = labels
            .into_iter()
            .map(|label| {
                let units = sales.get(&label).copied().unwrap_or(0);
                let on_hand = stock.get(&label).copied().unwrap_or(0);
                GroupSaleRow::new(label, units, on_hand, sale_days)
            })
            .collect::<Vec<_>>();
        let total_units = rows.iter().map(|row| row.units_sold).sum();
        let total_stock = rows.iter().map(|row| row.stock).sum();
        Self {
            rows,
            total: GroupSaleRow::new("Grand Total".to_string(), total_units, total_stock, sale_days),
        }
    }
}

/// Stock and sales per fulfillment center.
pub fn stock_summary(data: &Dataset) -> GroupSummary {
    let sales = group_sum(&data.sale, |row| row.fc.clone(), |row| row.units);
    let stock = group_sum(&data.stock, |row| row.fc.clone(), |row| row.units);
    GroupSummary::from_groups(sales, stock, data.total_sale_days)
}

fn style_attribute_summary(
    data: &Dataset,
    attribute: impl Fn(&StyleStatus) -> &str,
) -> GroupSummary {
    let lookup = data.style_lookup();
    let label_for = |style_id: &str| {
        label_or_blank(lookup.get(style_id).map(|status| attribute(*status)).unwrap_or(""))
    };
    let sales = group_sum(&data.sale, |row| label_for(&row.style_id), |row| row.units);
    let stock = group_sum(&data.stock, |row| label_for(&row.style_id), |row| row.units);
    GroupSummary::from_groups(sales, stock, data.total_sale_days)
}

/// Sales, DRR and cover per style category, highest volume first.
pub fn category_summary(data: &Dataset) -> GroupSummary {
    let mut summary = style_attribute_summary(data, |status| status.category.as_str());
    summary.rows.sort_by_key(|row| Reverse(row.units_sold));
    summary
}

/// Sales, DRR and cover per company remark in business priority order.
pub fn remark_summary(data: &Dataset, config: &ReportConfig) -> GroupSummary {
    let mut summary = style_attribute_summary(data, |status| status.company_remark.as_str());
    let priority = |label: &str| {
        config
            .remark_priority
            .iter()
            .position(|remark| remark.eq_ignore_ascii_case(label))
            .unwrap_or(usize::MAX)
    };
    summary
        .rows
        .sort_by_key(|row| (priority(&row.label), Reverse(row.units_sold)));
    summary
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScBand {
    UpTo30,
    UpTo60,
    UpTo120,
    Above120,
}

impl ScBand {
    pub const ALL: [ScBand; 4] = [ScBand::UpTo30, ScBand::UpTo60, ScBand::UpTo120, ScBand::Above120];

    /// Styles without any run rate land in the top band.
    pub fn classify(cover: StockCover) -> Self {
        match cover {
            StockCover::Days(days) if days < 30.0 => ScBand::UpTo30,
            StockCover::Days(days) if days < 60.0 => ScBand::UpTo60,
            StockCover::Days(days) if days < 120.0 => ScBand::UpTo120,
            _ => ScBand::Above120,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScBand::UpTo30 => "0–30",
            ScBand::UpTo60 => "30–60",
            ScBand::UpTo120 => "60–120",
            ScBand::Above120 => "120+",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScBandRow {
    pub band: ScBand,
    pub styles: usize,
    pub units_sold: i64,
    pub stock: i64,
}

/// Count styles and roll up units per cover band. Always four rows.
pub fn sc_band_summary(data: &Dataset) -> Vec<ScBandRow> {
    let mut rows = ScBand::ALL
        .iter()
        .map(|band| ScBandRow {
            band: *band,
            styles: 0,
            units_sold: 0,
            stock: 0,
        })
        .collect::<Vec<_>>();

    for totals in style_totals(data).values() {
        let style_drr = drr(totals.units_sold, data.total_sale_days);
        let band = ScBand::classify(StockCover::compute(totals.total_stock(), style_drr));
        if let Some(row) = rows.iter_mut().find(|row| row.band == band) {
            row.styles += 1;
            row.units_sold += totals.units_sold;
            row.stock += totals.total_stock();
        }
    }
    rows
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeBand {
    FreeSize,
    Normal,
    Plus1,
    Plus2,
}

impl SizeBand {
    pub fn of(size: &str) -> Self {
        match size {
            "FS" => SizeBand::FreeSize,
            "3XL" | "4XL" | "5XL" | "6XL" => SizeBand::Plus1,
            "7XL" | "8XL" | "9XL" | "10XL" => SizeBand::Plus2,
            _ => SizeBand::Normal,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SizeBand::FreeSize => "FS",
            SizeBand::Normal => "Normal",
            SizeBand::Plus1 => "PLUS 1",
            SizeBand::Plus2 => "PLUS 2",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SizeRow {
    pub size: String,
    pub band: SizeBand,
    pub units_sold: i64,
    pub band_units_sold: i64,
    pub size_share_pct: f64,
    pub band_share_pct: f64,
    pub stock: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SizeSummary {
    pub rows: Vec<SizeRow>,
    pub total_units_sold: i64,
    pub total_stock: i64,
}

/// Sales mix over the locked size order. Sizes outside the order still count
/// toward the totals but get no row.
pub fn size_summary(data: &Dataset) -> SizeSummary {
    let sales = group_sum(&data.sale, |row| row.size.clone(), |row| row.units);
    let stock = group_sum(&data.stock, |row| row.size.clone(), |row| row.units);
    let total_units_sold = sales.values().sum::<i64>();
    let total_stock = stock.values().sum::<i64>();
    let band_totals = group_sum(sales.iter(), |(size, _)| SizeBand::of(size), |(_, units)| **units);

    let rows = SIZE_ORDER
        .iter()
        .filter_map(|size| {
            let units_sold = sales.get(*size).copied().unwrap_or(0);
            let on_hand = stock.get(*size).copied().unwrap_or(0);
            if units_sold == 0 && on_hand == 0 {
                return None;
            }
            let band = SizeBand::of(size);
            let band_units_sold = band_totals.get(&band).copied().unwrap_or(0);
            Some(SizeRow {
                size: size.to_string(),
                band,
                units_sold,
                band_units_sold,
                size_share_pct: share_pct(units_sold, total_units_sold),
                band_share_pct: share_pct(band_units_sold, total_units_sold),
                stock: on_hand,
            })
        })
        .collect();

    SizeSummary {
        rows,
        total_units_sold,
        total_stock,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::dataset::{SaleDays, SaleRecord, StockRecord};

    fn sale(month: &str, fc: &str, style: &str, size: &str, units: i64) -> SaleRecord {
        SaleRecord {
            month: month.to_string(),
            marketplace: "MP".to_string(),
            account: "ACC".to_string(),
            fc: fc.to_string(),
            mp_sku: format!("{style}-{size}"),
            uniware_sku: format!("{style}-{size}"),
            style_id: style.to_string(),
            size: size.to_string(),
            units,
        }
    }

    fn stock(fc: &str, style: &str, size: &str, units: i64) -> StockRecord {
        StockRecord {
            fc: fc.to_string(),
            mp_sku: format!("{style}-{size}"),
            uniware_sku: format!("{style}-{size}"),
            style_id: style.to_string(),
            size: size.to_string(),
            units,
        }
    }

    fn days(month: &str, days: i64) -> SaleDays {
        SaleDays {
            month: month.to_string(),
            days,
        }
    }

    fn status(style: &str, category: &str, remark: &str) -> StyleStatus {
        StyleStatus {
            style_id: style.to_string(),
            category: category.to_string(),
            company_remark: remark.to_string(),
        }
    }

    fn dataset() -> Dataset {
        let sale_days = vec![days("JAN-24", 30), days("FEB-24", 20)];
        Dataset {
            sale: vec![
                sale("FEB-24", "BLR", "A", "M", 100),
                sale("JAN-24", "BLR", "A", "M", 300),
                sale("JAN-24", "DEL", "B", "3XL", 150),
            ],
            stock: vec![
                stock("BLR", "A", "M", 500),
                stock("Seller", "B", "3XL", 40),
                stock("Seller", "C", "L", 10),
            ],
            style_status: vec![
                status("A", "Kurta", "Running"),
                status("B", "Dress", "Hero"),
                status("C", "", ""),
            ],
            total_sale_days: Dataset::sum_sale_days(&sale_days),
            sale_days,
            ..Dataset::default()
        }
    }

    #[test]
    fn sale_summary_orders_months_and_uses_window_total() {
        let summary = sale_summary(&dataset());

        let months = summary.rows.iter().map(|row| row.month.as_str()).collect::<Vec<_>>();
        assert_eq!(months, vec!["JAN-24", "FEB-24"]);
        assert_eq!(summary.rows[0].drr, 15.0);
        assert_eq!(summary.rows[1].drr, 5.0);
        assert_eq!(summary.total_units, 550);
        assert_eq!(summary.total_drr, 11.0, "550 / 50, not the mean of 15 and 5");
    }

    #[test]
    fn stock_summary_includes_stock_only_centers_and_sums_totals() {
        let summary = stock_summary(&dataset());

        let labels = summary.rows.iter().map(|row| row.label.as_str()).collect::<Vec<_>>();
        assert_eq!(labels, vec!["BLR", "DEL", "Seller"]);
        let seller = &summary.rows[2];
        assert_eq!(seller.units_sold, 0);
        assert_eq!(seller.stock_cover, StockCover::Infinite);
        assert_eq!(summary.total.units_sold, 550);
        assert_eq!(summary.total.stock, 550);
        assert_eq!(summary.total.drr, 11.0);
    }

    #[test]
    fn sc_band_summary_buckets_styles_by_cover() {
        let rows = sc_band_summary(&dataset());

        // A: 400 sold / 50 days = 8/day, 500 stock -> 62.5 days
        // B: 150 / 50 = 3/day, 40 stock -> 13.3 days
        // C: no sales -> top band
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].styles, 1);
        assert_eq!(rows[0].stock, 40);
        assert_eq!(rows[2].styles, 1);
        assert_eq!(rows[2].units_sold, 400);
        assert_eq!(rows[3].styles, 1);
        assert_eq!(rows[3].stock, 10);
    }

    #[test]
    fn size_summary_follows_locked_order_with_band_shares() {
        let summary = size_summary(&dataset());

        let sizes = summary.rows.iter().map(|row| row.size.as_str()).collect::<Vec<_>>();
        assert_eq!(sizes, vec!["M", "L", "3XL"]);
        assert_eq!(summary.rows[0].band, SizeBand::Normal);
        assert_eq!(summary.rows[2].band, SizeBand::Plus1);
        assert_eq!(summary.rows[2].band_units_sold, 150);
        assert!((summary.rows[0].size_share_pct - 400.0 / 550.0 * 100.0).abs() < 1e-9);
        assert_eq!(summary.total_stock, 550);
    }

    #[test]
    fn category_summary_groups_missing_category_as_blank() {
        let mut data = dataset();
        data.sale.push(sale("JAN-24", "DEL", "D", "S", 50));
        data.stock.push(stock("DEL", "D", "S", 20));

        let summary = category_summary(&data);

        let labels = summary.rows.iter().map(|row| row.label.as_str()).collect::<Vec<_>>();
        assert_eq!(labels, vec!["Kurta", "Dress", "Blank"]);
        let blank = &summary.rows[2];
        assert_eq!(blank.units_sold, 50, "unlisted D joins C's empty category");
        assert_eq!(blank.stock, 30);
    }

    #[test]
    fn attribute_totals_cover_stock_of_unsold_groups() {
        let data = dataset();
        let stock_total = stock_summary(&data).total.stock;

        let categories = category_summary(&data);
        let remarks = remark_summary(&data, &ReportConfig::default());

        assert_eq!(categories.total.stock, stock_total);
        assert_eq!(remarks.total.stock, stock_total);
        let blank = categories
            .rows
            .iter()
            .find(|row| row.label == "Blank")
            .expect("stock-only category row");
        assert_eq!(blank.units_sold, 0);
        assert_eq!(blank.stock_cover, StockCover::Infinite);
        // 550 units over 50 days against 550 stock
        assert_eq!(categories.total.stock_cover, StockCover::Days(50.0));
    }

    #[test]
    fn remark_summary_uses_priority_before_volume() {
        let summary = remark_summary(&dataset(), &ReportConfig::default());

        let labels = summary.rows.iter().map(|row| row.label.as_str()).collect::<Vec<_>>();
        assert_eq!(labels, vec!["Hero", "Running", "Blank"]);
    }
}
