use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;

use crate::config::ReportConfig;
use crate::domain::entities::dataset::Dataset;
use crate::domain::metrics::broken_size::broken_counts;
use crate::domain::metrics::grouping::group_sum_nested;
use crate::domain::metrics::kpi::{drr, StockCover};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeroRemark {
    NewAddition,
    DrrDropped,
    RankDropped,
    RankImproved,
}

impl HeroRemark {
    pub fn label(self) -> &'static str {
        match self {
            HeroRemark::NewAddition => "New Addition",
            HeroRemark::DrrDropped => "DRR Dropped",
            HeroRemark::RankDropped => "Rank Dropped",
            HeroRemark::RankImproved => "Rank Improved",
        }
    }

    /// Compare the latest month with the one before it. Checks run in
    /// priority order and the first match wins.
    pub fn classify(previous: &HeroMonth, latest: &HeroMonth) -> Option<Self> {
        match (previous.rank, latest.rank) {
            (None, Some(_)) => Some(HeroRemark::NewAddition),
            _ if latest.drr < previous.drr => Some(HeroRemark::DrrDropped),
            (Some(before), Some(now)) if now > before => Some(HeroRemark::RankDropped),
            (Some(before), Some(now)) if now < before => Some(HeroRemark::RankImproved),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeroMonth {
    pub units_sold: i64,
    /// Only set when the style made that month's top list.
    pub rank: Option<usize>,
    pub drr: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeroStyleRow {
    pub style_id: String,
    pub months: Vec<HeroMonth>,
    /// Cover at the latest month's run rate.
    pub stock_cover: StockCover,
    pub total_stock: i64,
    pub broken_count: usize,
    pub remark: Option<HeroRemark>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeroStylesReport {
    pub months: Vec<String>,
    pub rows: Vec<HeroStyleRow>,
}

/// Rank styles by units within one month and keep the top `n`. Ties rank by
/// style id, so row order never changes the selection.
pub fn top_styles(month_sales: &IndexMap<String, i64>, n: usize) -> HashMap<String, usize> {
    let mut ranked = month_sales.iter().collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(idx, (style, _))| (style.clone(), idx + 1))
        .collect()
}

/// Styles that made the monthly top list in at least one month of the
/// window, with their month-by-month sale, rank and DRR.
pub fn hero_styles_report(data: &Dataset, config: &ReportConfig) -> HeroStylesReport {
    let closed = data.closed_styles();
    let months = data.sale_months();
    let days = data.sale_days_by_month();

    let sales = group_sum_nested(
        data.sale
            .iter()
            .filter(|row| !closed.contains(row.style_id.as_str())),
        |row| row.month.clone(),
        |row| row.style_id.clone(),
        |row| row.units,
    );
    let empty = IndexMap::new();
    let ranks = months
        .iter()
        .map(|month| top_styles(sales.get(month).unwrap_or(&empty), config.hero_top_n))
        .collect::<Vec<_>>();

    let heroes = ranks
        .iter()
        .flat_map(|ranked| ranked.keys().cloned())
        .collect::<BTreeSet<_>>();

    let mut stock = HashMap::<&str, i64>::new();
    for row in data
        .stock
        .iter()
        .filter(|row| !closed.contains(row.style_id.as_str()))
    {
        *stock.entry(row.style_id.as_str()).or_insert(0) += row.units;
    }
    let broken = broken_counts(data, config.broken_size_threshold);

    let mut rows = heroes
        .into_iter()
        .map(|style_id| {
            let history = months
                .iter()
                .zip(&ranks)
                .map(|(month, ranked)| {
                    let units_sold = sales
                        .get(month)
                        .and_then(|by_style| by_style.get(&style_id))
                        .copied()
                        .unwrap_or(0);
                    HeroMonth {
                        units_sold,
                        rank: ranked.get(&style_id).copied(),
                        drr: drr(units_sold, days.get(month.as_str()).copied().unwrap_or(0)),
                    }
                })
                .collect::<Vec<_>>();
            let total_stock = stock.get(style_id.as_str()).copied().unwrap_or(0);
            let latest_drr = history.last().map(|month| month.drr).unwrap_or(0.0);
            let remark = match history.as_slice() {
                [.., previous, latest] => HeroRemark::classify(previous, latest),
                _ => None,
            };
            HeroStyleRow {
                months: history,
                stock_cover: StockCover::compute(total_stock, latest_drr),
                total_stock,
                broken_count: broken.get(&style_id).copied().unwrap_or(0),
                remark,
                style_id,
            }
        })
        .collect::<Vec<_>>();

    rows.sort_by_key(|row| {
        let latest_rank = row
            .months
            .last()
            .and_then(|month| month.rank)
            .unwrap_or(usize::MAX);
        let units = row.months.iter().map(|month| month.units_sold).sum::<i64>();
        (latest_rank, Reverse(units))
    });

    HeroStylesReport { months, rows }
}
