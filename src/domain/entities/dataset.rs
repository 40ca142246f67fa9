use std::collections::{BTreeSet, HashMap};

use crate::domain::entities::month::sort_months;

pub const SELLER_FC: &str = "SELLER";
pub const CLOSED_REMARK: &str = "CLOSED";
pub const BLANK_LABEL: &str = "Blank";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleRecord {
    pub month: String,
    pub marketplace: String,
    pub account: String,
    pub fc: String,
    pub mp_sku: String,
    pub uniware_sku: String,
    pub style_id: String,
    pub size: String,
    pub units: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRecord {
    pub fc: String,
    pub mp_sku: String,
    pub uniware_sku: String,
    pub style_id: String,
    pub size: String,
    pub units: i64,
}

impl StockRecord {
    /// Seller-held stock is tagged `Seller` in the FC column; everything else
    /// sits in a marketplace fulfillment center.
    pub fn is_seller(&self) -> bool {
        is_seller_fc(&self.fc)
    }
}

pub fn is_seller_fc(fc: &str) -> bool {
    fc.trim().eq_ignore_ascii_case(SELLER_FC)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleStatus {
    pub style_id: String,
    pub category: String,
    pub company_remark: String,
}

impl StyleStatus {
    pub fn is_closed(&self) -> bool {
        self.company_remark.trim().eq_ignore_ascii_case(CLOSED_REMARK)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleDays {
    pub month: String,
    pub days: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeCount {
    pub style_id: String,
    pub expected_size_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductionRecord {
    pub uniware_sku: String,
    pub units_in_production: i64,
}

/// Everything loaded for one session. Never mutated after load; filtering
/// produces a new value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub sale: Vec<SaleRecord>,
    pub stock: Vec<StockRecord>,
    pub style_status: Vec<StyleStatus>,
    pub sale_days: Vec<SaleDays>,
    pub size_count: Vec<SizeCount>,
    pub production: Vec<ProductionRecord>,
    pub total_sale_days: i64,
}

impl Dataset {
    pub fn sum_sale_days(sale_days: &[SaleDays]) -> i64 {
        sale_days.iter().map(|row| row.days).sum()
    }

    pub fn closed_styles(&self) -> BTreeSet<&str> {
        self.style_status
            .iter()
            .filter(|row| row.is_closed())
            .map(|row| row.style_id.as_str())
            .collect()
    }

    /// Last entry wins when a style is listed twice.
    pub fn style_lookup(&self) -> HashMap<&str, &StyleStatus> {
        self.style_status
            .iter()
            .map(|row| (row.style_id.as_str(), row))
            .collect()
    }

    pub fn sale_days_by_month(&self) -> HashMap<&str, i64> {
        self.sale_days
            .iter()
            .map(|row| (row.month.as_str(), row.days))
            .collect()
    }

    /// Distinct months present in the sale rows, oldest first.
    pub fn sale_months(&self) -> Vec<String> {
        let mut months = self
            .sale
            .iter()
            .map(|row| row.month.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();
        sort_months(&mut months);
        months
    }
}

pub fn label_or_blank(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        BLANK_LABEL.to_string()
    } else {
        trimmed.to_string()
    }
}
