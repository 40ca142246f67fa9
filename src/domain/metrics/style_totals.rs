use indexmap::IndexMap;

use crate::domain::entities::dataset::{Dataset, SaleRecord, StockRecord};

/// Per-SKU rollup inside a style.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkuTotals {
    pub size: String,
    pub units_sold: i64,
    pub seller_stock: i64,
    pub fc_stock: i64,
}

impl SkuTotals {
    pub fn total_stock(&self) -> i64 {
        self.seller_stock + self.fc_stock
    }
}

/// Per-style rollup shared by the style-level reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleTotals {
    pub units_sold: i64,
    pub seller_stock: i64,
    pub fc_stock: i64,
    pub sales_by_month: IndexMap<String, i64>,
    pub sales_by_size: IndexMap<String, i64>,
    pub stock_by_size: IndexMap<String, i64>,
    pub skus: IndexMap<String, SkuTotals>,
}

impl StyleTotals {
    pub fn total_stock(&self) -> i64 {
        self.seller_stock + self.fc_stock
    }

    fn add_sale(&mut self, row: &SaleRecord) {
        self.units_sold += row.units;
        *self.sales_by_month.entry(row.month.clone()).or_insert(0) += row.units;
        *self.sales_by_size.entry(row.size.clone()).or_insert(0) += row.units;
        let sku = self.sku_entry(&row.uniware_sku, &row.size);
        sku.units_sold += row.units;
    }

    fn add_stock(&mut self, row: &StockRecord) {
        if row.is_seller() {
            self.seller_stock += row.units;
        } else {
            self.fc_stock += row.units;
        }
        *self.stock_by_size.entry(row.size.clone()).or_insert(0) += row.units;
        let seller = row.is_seller();
        let sku = self.sku_entry(&row.uniware_sku, &row.size);
        if seller {
            sku.seller_stock += row.units;
        } else {
            sku.fc_stock += row.units;
        }
    }

    fn sku_entry(&mut self, sku: &str, size: &str) -> &mut SkuTotals {
        self.skus
            .entry(sku.to_string())
            .or_insert_with(|| SkuTotals {
                size: size.to_string(),
                ..SkuTotals::default()
            })
    }
}

/// Roll sale and stock rows up per style in one pass over each. Styles keep
/// first-seen order: sale rows first, then styles only present in stock.
pub fn style_totals(data: &Dataset) -> IndexMap<String, StyleTotals> {
    let mut styles: IndexMap<String, StyleTotals> = IndexMap::new();
    for row in &data.sale {
        styles
            .entry(row.style_id.clone())
            .or_default()
            .add_sale(row);
    }
    for row in &data.stock {
        styles
            .entry(row.style_id.clone())
            .or_default()
            .add_stock(row);
    }
    styles
}
