use std::cmp::Reverse;
use std::collections::HashMap;

use crate::config::{ReportConfig, StockBasis};
use crate::domain::entities::dataset::Dataset;
use crate::domain::metrics::grouping::group_sum;
use crate::domain::metrics::kpi::{allocate, demand_units, drr};
use crate::domain::metrics::style_totals::{style_totals, SkuTotals, StyleTotals};

/// Pendancy bucket for styles with production data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    OverProduction,
    Urgent,
    Medium,
    Low,
}

impl Urgency {
    pub fn classify(pendancy: i64, config: &ReportConfig) -> Self {
        if pendancy < 0 {
            Urgency::OverProduction
        } else if pendancy > config.urgent_pendancy_above {
            Urgency::Urgent
        } else if pendancy >= config.medium_pendancy_from {
            Urgency::Medium
        } else {
            Urgency::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Urgency::OverProduction => "Over Production",
            Urgency::Urgent => "Urgent",
            Urgency::Medium => "Medium",
            Urgency::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pendancy {
    pub in_production: i64,
    pub pendancy: i64,
    pub urgency: Urgency,
}

impl Pendancy {
    fn new(demand: i64, in_production: i64, config: &ReportConfig) -> Self {
        let pendancy = demand - in_production;
        Self {
            in_production,
            pendancy,
            urgency: Urgency::classify(pendancy, config),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkuDemandRow {
    pub uniware_sku: String,
    pub size: String,
    pub units_sold: i64,
    pub seller_stock: i64,
    pub total_stock: i64,
    pub drr: f64,
    /// Style demand split by this SKU's share of style sales.
    pub allocated_demand: i64,
    /// Demand from this SKU's own run rate and stock.
    pub direct_demand: i64,
    pub pendancy: Option<Pendancy>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyleDemandRow {
    pub style_id: String,
    pub units_sold: i64,
    pub seller_stock: i64,
    pub fc_stock: i64,
    pub total_stock: i64,
    pub drr: f64,
    pub target_stock: f64,
    pub demand: i64,
    pub pendancy: Option<Pendancy>,
    pub skus: Vec<SkuDemandRow>,
}

fn planning_stock(basis: StockBasis, seller: i64, total: i64) -> i64 {
    match basis {
        StockBasis::Seller => seller,
        StockBasis::Total => total,
    }
}

/// Style-level demand only, for reports that split it further.
pub fn style_demand(totals: &StyleTotals, sale_days: i64, config: &ReportConfig) -> i64 {
    let style_drr = drr(totals.units_sold, sale_days);
    let stock = planning_stock(
        config.demand_stock_basis,
        totals.seller_stock,
        totals.total_stock(),
    );
    demand_units(style_drr, stock, config.planning_horizon_days)
}

fn sku_row(
    sku: &str,
    totals: &SkuTotals,
    style: &StyleTotals,
    demand: i64,
    sale_days: i64,
    production: Option<&HashMap<String, i64>>,
    config: &ReportConfig,
) -> SkuDemandRow {
    let sku_drr = drr(totals.units_sold, sale_days);
    let stock = planning_stock(
        config.demand_stock_basis,
        totals.seller_stock,
        totals.total_stock(),
    );
    let allocated_demand = allocate(demand, totals.units_sold, style.units_sold);
    SkuDemandRow {
        uniware_sku: sku.to_string(),
        size: totals.size.clone(),
        units_sold: totals.units_sold,
        seller_stock: totals.seller_stock,
        total_stock: totals.total_stock(),
        drr: sku_drr,
        allocated_demand,
        direct_demand: demand_units(sku_drr, stock, config.planning_horizon_days),
        pendancy: production.map(|units| {
            Pendancy::new(
                allocated_demand,
                units.get(sku).copied().unwrap_or(0),
                config,
            )
        }),
    }
}

/// Demand to reach the planning horizon for every selling, non-closed style,
/// largest demand first. Pendancy is filled in only when production data is
/// loaded.
pub fn demand_report(data: &Dataset, config: &ReportConfig) -> Vec<StyleDemandRow> {
    let closed = data.closed_styles();
    let production = if data.production.is_empty() {
        None
    } else {
        let by_sku = group_sum(
            &data.production,
            |row| row.uniware_sku.clone(),
            |row| row.units_in_production,
        );
        Some(by_sku.into_iter().collect::<HashMap<_, _>>())
    };

    let mut rows = style_totals(data)
        .into_iter()
        .filter(|(style_id, totals)| !closed.contains(style_id.as_str()) && totals.units_sold > 0)
        .map(|(style_id, totals)| {
            let style_drr = drr(totals.units_sold, data.total_sale_days);
            let demand = style_demand(&totals, data.total_sale_days, config);
            let skus = totals
                .skus
                .iter()
                .map(|(sku, sku_totals)| {
                    sku_row(
                        sku,
                        sku_totals,
                        &totals,
                        demand,
                        data.total_sale_days,
                        production.as_ref(),
                        config,
                    )
                })
                .collect::<Vec<_>>();
            let pendancy = production.as_ref().map(|units| {
                let in_production = totals
                    .skus
                    .keys()
                    .map(|sku| units.get(sku).copied().unwrap_or(0))
                    .sum();
                Pendancy::new(demand, in_production, config)
            });
            StyleDemandRow {
                units_sold: totals.units_sold,
                seller_stock: totals.seller_stock,
                fc_stock: totals.fc_stock,
                total_stock: totals.total_stock(),
                drr: style_drr,
                target_stock: style_drr * config.planning_horizon_days,
                demand,
                pendancy,
                skus,
                style_id,
            }
        })
        .collect::<Vec<_>>();

    rows.sort_by_key(|row| Reverse(row.demand));
    rows
}
