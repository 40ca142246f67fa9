use tracing::debug;

use crate::config::ReportConfig;
use crate::domain::entities::dataset::Dataset;
use crate::domain::entities::filter::{apply_filters, FilterCriteria, FilterOptions};
use crate::domain::metrics::broken_size::{broken_size_report, BrokenSizeRow};
use crate::domain::metrics::demand::{demand_report, StyleDemandRow};
use crate::domain::metrics::hero_styles::{hero_styles_report, HeroStylesReport};
use crate::domain::metrics::overstock::{overstock_report, OverstockRow};
use crate::domain::metrics::size_curve::{size_curve_report, SizeCurveRow};
use crate::domain::metrics::summary::{
    category_summary, remark_summary, sale_summary, sc_band_summary, size_summary,
    stock_summary, GroupSummary, SaleSummary, ScBandRow, SizeSummary,
};

/// Every summary and report computed from one filtered projection.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub criteria: FilterCriteria,
    pub options: FilterOptions,
    pub total_sale_days: i64,
    pub has_production: bool,
    pub sale: SaleSummary,
    pub stock: GroupSummary,
    pub sc_bands: Vec<ScBandRow>,
    pub sizes: SizeSummary,
    pub categories: GroupSummary,
    pub remarks: GroupSummary,
    pub demand: Vec<StyleDemandRow>,
    pub overstock: Vec<OverstockRow>,
    pub size_curve: Vec<SizeCurveRow>,
    pub broken_size: Vec<BrokenSizeRow>,
    pub hero_styles: HeroStylesReport,
}

#[derive(Debug, Clone, Default)]
pub struct ReportService {
    config: ReportConfig,
}

impl ReportService {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Filter `raw` and compute every table from the result. Filter options
    /// always come from the unfiltered data so a selection can be undone.
    pub fn build_dashboard(&self, raw: &Dataset, criteria: &FilterCriteria) -> Dashboard {
        let data = apply_filters(raw, criteria);
        debug!(
            sale = data.sale.len(),
            stock = data.stock.len(),
            total_sale_days = data.total_sale_days,
            "filters applied"
        );

        Dashboard {
            criteria: criteria.clone(),
            options: FilterOptions::from_dataset(raw),
            total_sale_days: data.total_sale_days,
            has_production: !data.production.is_empty(),
            sale: sale_summary(&data),
            stock: stock_summary(&data),
            sc_bands: sc_band_summary(&data),
            sizes: size_summary(&data),
            categories: category_summary(&data),
            remarks: remark_summary(&data, &self.config),
            demand: demand_report(&data, &self.config),
            overstock: overstock_report(&data, &self.config),
            size_curve: size_curve_report(&data, &self.config),
            broken_size: broken_size_report(&data, &self.config),
            hero_styles: hero_styles_report(&data, &self.config),
        }
    }
}
