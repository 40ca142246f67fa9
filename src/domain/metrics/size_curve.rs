use std::cmp::Ordering;

use crate::config::{ReportConfig, SIZE_ORDER};
use crate::domain::entities::dataset::Dataset;
use crate::domain::metrics::demand::style_demand;
use crate::domain::metrics::kpi::{allocate, share_pct};
use crate::domain::metrics::style_totals::{style_totals, StyleTotals};

#[derive(Debug, Clone, PartialEq)]
pub struct SizeMixRow {
    pub size: String,
    pub units_sold: i64,
    pub sale_pct: f64,
    pub stock: i64,
    pub stock_pct: f64,
    /// Stock share minus sales share, in percentage points.
    pub variance_pct: f64,
    pub recommended_buy: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SizeCurveRow {
    pub style_id: String,
    pub units_sold: i64,
    pub stock: i64,
    pub demand: i64,
    pub max_variance_pct: f64,
    pub sizes: Vec<SizeMixRow>,
}

fn size_rank(size: &str) -> usize {
    SIZE_ORDER
        .iter()
        .position(|known| *known == size)
        .unwrap_or(SIZE_ORDER.len())
}

/// Sizes sold or stocked for a style, in locked size order; unknown sizes
/// follow in first-seen order.
fn style_sizes(totals: &StyleTotals) -> Vec<String> {
    let mut sizes = totals.sales_by_size.keys().cloned().collect::<Vec<_>>();
    sizes.extend(
        totals
            .stock_by_size
            .keys()
            .filter(|size| !totals.sales_by_size.contains_key(*size))
            .cloned(),
    );
    sizes.sort_by_key(|size| size_rank(size));
    sizes
}

/// Compare each selling style's sales mix with its stock mix per size. Styles
/// with the widest gap come first. Each size also carries a recommended buy:
/// style demand split by the size's share of sales.
pub fn size_curve_report(data: &Dataset, config: &ReportConfig) -> Vec<SizeCurveRow> {
    let mut rows = style_totals(data)
        .into_iter()
        .filter(|(_, totals)| totals.units_sold > 0)
        .map(|(style_id, totals)| {
            let stock = totals.total_stock();
            let demand = style_demand(&totals, data.total_sale_days, config);
            let sizes = style_sizes(&totals)
                .into_iter()
                .map(|size| {
                    let units_sold = totals.sales_by_size.get(&size).copied().unwrap_or(0);
                    let size_stock = totals.stock_by_size.get(&size).copied().unwrap_or(0);
                    let sale_pct = share_pct(units_sold, totals.units_sold);
                    let stock_pct = share_pct(size_stock, stock);
                    SizeMixRow {
                        size,
                        units_sold,
                        sale_pct,
                        stock: size_stock,
                        stock_pct,
                        variance_pct: stock_pct - sale_pct,
                        recommended_buy: allocate(demand, units_sold, totals.units_sold),
                    }
                })
                .collect::<Vec<_>>();
            let max_variance_pct = sizes
                .iter()
                .map(|size| size.variance_pct.abs())
                .fold(0.0, f64::max);
            SizeCurveRow {
                style_id,
                units_sold: totals.units_sold,
                stock,
                demand,
                max_variance_pct,
                sizes,
            }
        })
        .collect::<Vec<_>>();

    rows.sort_by(|a, b| {
        b.max_variance_pct
            .partial_cmp(&a.max_variance_pct)
            .unwrap_or(Ordering::Equal)
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::dataset::{SaleRecord, StockRecord};

    fn sale(style: &str, size: &str, units: i64) -> SaleRecord {
        SaleRecord {
            month: "JAN-24".to_string(),
            marketplace: "MP".to_string(),
            account: "ACC".to_string(),
            fc: "BLR".to_string(),
            mp_sku: format!("{style}-{size}"),
            uniware_sku: format!("{style}-{size}"),
            style_id: style.to_string(),
            size: size.to_string(),
            units,
        }
    }

    fn stock(style: &str, size: &str, units: i64) -> StockRecord {
        StockRecord {
            fc: "Seller".to_string(),
            mp_sku: format!("{style}-{size}"),
            uniware_sku: format!("{style}-{size}"),
            style_id: style.to_string(),
            size: size.to_string(),
            units,
        }
    }

    #[test]
    fn size_curve_reports_mix_variance_and_buy_split() {
        let data = Dataset {
            sale: vec![
                sale("BAL", "M", 50),
                sale("BAL", "S", 50),
                sale("SKEW", "L", 75),
                sale("SKEW", "M", 25),
            ],
            stock: vec![
                stock("BAL", "S", 10),
                stock("BAL", "M", 10),
                stock("SKEW", "M", 30),
                stock("SKEW", "XL", 10),
            ],
            total_sale_days: 10,
            ..Dataset::default()
        };

        let rows = size_curve_report(&data, &ReportConfig::default());

        assert_eq!(rows[0].style_id, "SKEW");
        let sizes = rows[0].sizes.iter().map(|s| s.size.as_str()).collect::<Vec<_>>();
        assert_eq!(sizes, vec!["M", "L", "XL"]);
        let large = &rows[0].sizes[1];
        assert_eq!(large.sale_pct, 75.0);
        assert_eq!(large.stock_pct, 0.0);
        assert_eq!(large.variance_pct, -75.0);
        assert_eq!(rows[0].max_variance_pct, 75.0);

        // SKEW: 10/day, target 450, seller stock 40 -> 410 to buy
        assert_eq!(rows[0].demand, 410);
        assert_eq!(large.recommended_buy, 308);
        assert_eq!(rows[0].sizes[2].recommended_buy, 0, "unsold size gets no buy");

        assert_eq!(rows[1].style_id, "BAL");
        assert_eq!(rows[1].max_variance_pct, 0.0);
    }
}
