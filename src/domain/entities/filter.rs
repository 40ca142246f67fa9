use std::collections::{BTreeSet, HashSet};

use crate::domain::entities::dataset::{label_or_blank, Dataset, SaleDays};
use crate::domain::entities::month::sort_months;

/// Selection the user has made in the filter bar. An empty set places no
/// constraint on its dimension. A non-empty `style_search` overrides every
/// other dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub months: BTreeSet<String>,
    pub fcs: BTreeSet<String>,
    pub categories: BTreeSet<String>,
    pub remarks: BTreeSet<String>,
    pub style_search: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterDimension {
    Month,
    Fc,
    Category,
    Remark,
}

impl FilterDimension {
    pub const ALL: [FilterDimension; 4] = [
        FilterDimension::Month,
        FilterDimension::Fc,
        FilterDimension::Category,
        FilterDimension::Remark,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterDimension::Month => "Month",
            FilterDimension::Fc => "FC",
            FilterDimension::Category => "Category",
            FilterDimension::Remark => "Company Remark",
        }
    }
}

impl FilterCriteria {
    pub fn selected(&self, dimension: FilterDimension) -> &BTreeSet<String> {
        match dimension {
            FilterDimension::Month => &self.months,
            FilterDimension::Fc => &self.fcs,
            FilterDimension::Category => &self.categories,
            FilterDimension::Remark => &self.remarks,
        }
    }

    pub fn with_selection(mut self, dimension: FilterDimension, values: BTreeSet<String>) -> Self {
        match dimension {
            FilterDimension::Month => self.months = values,
            FilterDimension::Fc => self.fcs = values,
            FilterDimension::Category => self.categories = values,
            FilterDimension::Remark => self.remarks = values,
        }
        self
    }

    /// Flip one value in a dimension, returning the new criteria.
    pub fn toggled(&self, dimension: FilterDimension, value: &str) -> Self {
        let mut values = self.selected(dimension).clone();
        if !values.remove(value) {
            values.insert(value.to_string());
        }
        self.clone().with_selection(dimension, values)
    }

    pub fn with_style_search(mut self, term: &str) -> Self {
        let trimmed = term.trim();
        self.style_search = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

}

fn allows(selection: &BTreeSet<String>, value: &str) -> bool {
    selection.is_empty() || selection.contains(value)
}

/// Project `raw` through `criteria`. The input is never modified.
pub fn apply_filters(raw: &Dataset, criteria: &FilterCriteria) -> Dataset {
    if let Some(style_id) = criteria.style_search.as_deref() {
        return Dataset {
            sale: raw
                .sale
                .iter()
                .filter(|row| row.style_id == style_id)
                .cloned()
                .collect(),
            stock: raw
                .stock
                .iter()
                .filter(|row| row.style_id == style_id)
                .cloned()
                .collect(),
            style_status: raw
                .style_status
                .iter()
                .filter(|row| row.style_id == style_id)
                .cloned()
                .collect(),
            sale_days: raw.sale_days.clone(),
            size_count: raw
                .size_count
                .iter()
                .filter(|row| row.style_id == style_id)
                .cloned()
                .collect(),
            production: raw.production.clone(),
            total_sale_days: raw.total_sale_days,
        };
    }

    let lookup = raw.style_lookup();
    let style_matches = |style_id: &str| {
        let (category, remark) = lookup
            .get(style_id)
            .map(|status| {
                (
                    label_or_blank(&status.category),
                    label_or_blank(&status.company_remark),
                )
            })
            .unwrap_or_else(|| (label_or_blank(""), label_or_blank("")));
        allows(&criteria.categories, &category) && allows(&criteria.remarks, &remark)
    };

    let sale = raw
        .sale
        .iter()
        .filter(|row| allows(&criteria.months, &row.month))
        .filter(|row| allows(&criteria.fcs, &row.fc))
        .filter(|row| style_matches(&row.style_id))
        .cloned()
        .collect();

    let stock = raw
        .stock
        .iter()
        .filter(|row| allows(&criteria.fcs, &row.fc))
        .filter(|row| style_matches(&row.style_id))
        .cloned()
        .collect();

    let total_sale_days = if criteria.months.is_empty() {
        raw.total_sale_days
    } else {
        let window = raw
            .sale_days
            .iter()
            .filter(|row| criteria.months.contains(&row.month))
            .cloned()
            .collect::<Vec<SaleDays>>();
        Dataset::sum_sale_days(&window)
    };

    Dataset {
        sale,
        stock,
        style_status: raw.style_status.clone(),
        sale_days: raw.sale_days.clone(),
        size_count: raw.size_count.clone(),
        production: raw.production.clone(),
        total_sale_days,
    }
}

/// Distinct values offered by each filter dropdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub months: Vec<String>,
    pub fcs: Vec<String>,
    pub categories: Vec<String>,
    pub remarks: Vec<String>,
}

impl FilterOptions {
    pub fn from_dataset(raw: &Dataset) -> Self {
        let mut months = raw
            .sale
            .iter()
            .map(|row| row.month.clone())
            .chain(raw.sale_days.iter().map(|row| row.month.clone()))
            .filter(|month| !month.trim().is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();
        sort_months(&mut months);

        let fcs = raw
            .sale
            .iter()
            .map(|row| row.fc.clone())
            .chain(raw.stock.iter().map(|row| row.fc.clone()))
            .filter(|fc| !fc.trim().is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut categories = BTreeSet::new();
        let mut remarks = BTreeSet::new();
        let known = raw
            .style_status
            .iter()
            .map(|row| row.style_id.as_str())
            .collect::<HashSet<_>>();
        for row in &raw.style_status {
            categories.insert(label_or_blank(&row.category));
            remarks.insert(label_or_blank(&row.company_remark));
        }
        let has_unlisted_style = raw
            .sale
            .iter()
            .map(|row| row.style_id.as_str())
            .chain(raw.stock.iter().map(|row| row.style_id.as_str()))
            .any(|style| !known.contains(style));
        if has_unlisted_style {
            categories.insert(label_or_blank(""));
            remarks.insert(label_or_blank(""));
        }

        Self {
            months,
            fcs,
            categories: categories.into_iter().collect(),
            remarks: remarks.into_iter().collect(),
        }
    }

    pub fn values(&self, dimension: FilterDimension) -> &[String] {
        match dimension {
            FilterDimension::Month => &self.months,
            FilterDimension::Fc => &self.fcs,
            FilterDimension::Category => &self.categories,
            FilterDimension::Remark => &self.remarks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::dataset::{SaleRecord, StockRecord, StyleStatus};

    fn sale(month: &str, fc: &str, style: &str) -> SaleRecord {
        SaleRecord {
            month: month.to_string(),
            marketplace: "MP".to_string(),
            account: "Main".to_string(),
            fc: fc.to_string(),
            mp_sku: format!("{style}-M"),
            uniware_sku: format!("{style}-M"),
            style_id: style.to_string(),
            size: "M".to_string(),
            units: 1,
        }
    }

    #[test]
    fn toggled_adds_then_removes_a_value() {
        let criteria = FilterCriteria::default().toggled(FilterDimension::Fc, "BLR");
        assert!(criteria.fcs.contains("BLR"));

        let cleared = criteria.toggled(FilterDimension::Fc, "BLR");
        assert_eq!(cleared, FilterCriteria::default());
    }

    #[test]
    fn blank_style_search_is_no_search() {
        assert_eq!(FilterCriteria::default().with_style_search("   ").style_search, None);
    }

    #[test]
    fn options_list_months_chronologically_and_flag_unlisted_styles() {
        let data = Dataset {
            sale: vec![sale("FEB-24", "DEL", "A"), sale("DEC-23", "BLR", "X")],
            stock: vec![StockRecord {
                fc: "Seller".to_string(),
                mp_sku: "A-M".to_string(),
                uniware_sku: "A-M".to_string(),
                style_id: "A".to_string(),
                size: "M".to_string(),
                units: 5,
            }],
            style_status: vec![StyleStatus {
                style_id: "A".to_string(),
                category: "Kurta".to_string(),
                company_remark: "Hero".to_string(),
            }],
            ..Dataset::default()
        };

        let options = FilterOptions::from_dataset(&data);

        assert_eq!(options.months, vec!["DEC-23", "FEB-24"]);
        assert_eq!(options.fcs, vec!["BLR", "DEL", "Seller"]);
        assert_eq!(options.categories, vec!["Blank", "Kurta"]);
        assert_eq!(options.values(FilterDimension::Remark), ["Blank", "Hero"]);
    }
}
