//! Display-ready tables built from a [`Dashboard`]. Both the Dioxus view and
//! the HTML export render from these, so numbers are formatted once.

use crate::domain::metrics::kpi::{format_drr, format_pct};
use crate::domain::metrics::summary::{GroupSaleRow, GroupSummary};
use crate::usecase::services::report_service::Dashboard;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

impl Align {
    pub fn css(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub label: String,
    pub align: Align,
}

fn text(label: &str) -> Column {
    Column {
        label: label.to_string(),
        align: Align::Left,
    }
}

fn num(label: &str) -> Column {
    Column {
        label: label.to_string(),
        align: Align::Right,
    }
}

/// One top-level row and the detail rows revealed when it is expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowGroup {
    pub key: String,
    pub cells: Vec<String>,
    pub detail: Vec<Vec<String>>,
}

impl RowGroup {
    fn flat(cells: Vec<String>) -> Self {
        Self {
            key: cells.first().cloned().unwrap_or_default(),
            cells,
            detail: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    pub title: String,
    pub columns: Vec<Column>,
    /// Header of the nested detail table, empty when rows do not expand.
    pub detail_columns: Vec<Column>,
    pub groups: Vec<RowGroup>,
    pub footer: Option<Vec<String>>,
}

impl ReportTable {
    pub fn expandable(&self) -> bool {
        !self.detail_columns.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportTab {
    Demand,
    Overstock,
    SizeCurve,
    BrokenSize,
    HeroStyles,
}

impl ReportTab {
    pub const ALL: [ReportTab; 5] = [
        ReportTab::Demand,
        ReportTab::Overstock,
        ReportTab::SizeCurve,
        ReportTab::BrokenSize,
        ReportTab::HeroStyles,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ReportTab::Demand => "Demand",
            ReportTab::Overstock => "Overstock",
            ReportTab::SizeCurve => "Size Curve",
            ReportTab::BrokenSize => "Broken Size",
            ReportTab::HeroStyles => "Hero Styles",
        }
    }
}

fn int(value: i64) -> String {
    value.to_string()
}

fn group_table(title: &str, first_column: &str, summary: &GroupSummary) -> ReportTable {
    let cells = |row: &GroupSaleRow| {
        vec![
            row.label.clone(),
            int(row.units_sold),
            int(row.stock),
            format_drr(row.drr),
            row.stock_cover.to_string(),
        ]
    };
    ReportTable {
        title: title.to_string(),
        columns: vec![text(first_column), num("Units Sold"), num("Stock"), num("DRR"), num("SC")],
        detail_columns: Vec::new(),
        groups: summary.rows.iter().map(|row| RowGroup::flat(cells(row))).collect(),
        footer: Some(cells(&summary.total)),
    }
}

pub fn sale_summary_table(dashboard: &Dashboard) -> ReportTable {
    let sale = &dashboard.sale;
    ReportTable {
        title: "Sale Summary".to_string(),
        columns: vec![text("Month"), num("Units Sold"), num("Sale Days"), num("DRR")],
        detail_columns: Vec::new(),
        groups: sale
            .rows
            .iter()
            .map(|row| {
                RowGroup::flat(vec![
                    row.month.clone(),
                    int(row.units_sold),
                    int(row.sale_days),
                    format_drr(row.drr),
                ])
            })
            .collect(),
        footer: Some(vec![
            "Grand Total".to_string(),
            int(sale.total_units),
            int(sale.total_sale_days),
            format_drr(sale.total_drr),
        ]),
    }
}

pub fn stock_summary_table(dashboard: &Dashboard) -> ReportTable {
    group_table("Stock Summary", "FC", &dashboard.stock)
}

pub fn category_summary_table(dashboard: &Dashboard) -> ReportTable {
    group_table("Category Summary", "Category", &dashboard.categories)
}

pub fn remark_summary_table(dashboard: &Dashboard) -> ReportTable {
    group_table("Company Remark Summary", "Company Remark", &dashboard.remarks)
}

pub fn sc_band_table(dashboard: &Dashboard) -> ReportTable {
    ReportTable {
        title: "SC Band Summary".to_string(),
        columns: vec![text("SC Band"), num("Styles"), num("Units Sold"), num("Stock")],
        detail_columns: Vec::new(),
        groups: dashboard
            .sc_bands
            .iter()
            .map(|row| {
                RowGroup::flat(vec![
                    row.band.label().to_string(),
                    row.styles.to_string(),
                    int(row.units_sold),
                    int(row.stock),
                ])
            })
            .collect(),
        footer: None,
    }
}

pub fn size_summary_table(dashboard: &Dashboard) -> ReportTable {
    let sizes = &dashboard.sizes;
    ReportTable {
        title: "Size-wise Summary".to_string(),
        columns: vec![
            text("Size"),
            text("Band"),
            num("Units Sold"),
            num("Size %"),
            num("Band %"),
            num("Stock"),
        ],
        detail_columns: Vec::new(),
        groups: sizes
            .rows
            .iter()
            .map(|row| {
                RowGroup::flat(vec![
                    row.size.clone(),
                    row.band.label().to_string(),
                    int(row.units_sold),
                    format_pct(row.size_share_pct),
                    format_pct(row.band_share_pct),
                    int(row.stock),
                ])
            })
            .collect(),
        footer: Some(vec![
            "Grand Total".to_string(),
            String::new(),
            int(sizes.total_units_sold),
            String::new(),
            String::new(),
            int(sizes.total_stock),
        ]),
    }
}

pub fn summary_tables(dashboard: &Dashboard) -> Vec<ReportTable> {
    vec![
        sale_summary_table(dashboard),
        stock_summary_table(dashboard),
        sc_band_table(dashboard),
        size_summary_table(dashboard),
        category_summary_table(dashboard),
        remark_summary_table(dashboard),
    ]
}

fn demand_table(dashboard: &Dashboard) -> ReportTable {
    let production = dashboard.has_production;
    let mut columns = vec![
        text("Style ID"),
        num("Units Sold"),
        num("Seller Stock"),
        num("FC Stock"),
        num("DRR"),
        num("Target Stock"),
        num("Demand"),
    ];
    let mut detail_columns = vec![
        text("Uniware SKU"),
        text("Size"),
        num("Units Sold"),
        num("Seller Stock"),
        num("DRR"),
        num("Allocated Demand"),
        num("Direct Demand"),
    ];
    if production {
        for header in ["In Production", "Pendancy"] {
            columns.push(num(header));
            detail_columns.push(num(header));
        }
        columns.push(text("Urgency"));
        detail_columns.push(text("Urgency"));
    }

    let groups = dashboard
        .demand
        .iter()
        .map(|row| {
            let mut cells = vec![
                row.style_id.clone(),
                int(row.units_sold),
                int(row.seller_stock),
                int(row.fc_stock),
                format_drr(row.drr),
                format!("{:.0}", row.target_stock),
                int(row.demand),
            ];
            if let Some(pendancy) = row.pendancy.filter(|_| production) {
                cells.push(int(pendancy.in_production));
                cells.push(int(pendancy.pendancy));
                cells.push(pendancy.urgency.label().to_string());
            }
            let detail = row
                .skus
                .iter()
                .map(|sku| {
                    let mut line = vec![
                        sku.uniware_sku.clone(),
                        sku.size.clone(),
                        int(sku.units_sold),
                        int(sku.seller_stock),
                        format_drr(sku.drr),
                        int(sku.allocated_demand),
                        int(sku.direct_demand),
                    ];
                    if let Some(pendancy) = sku.pendancy.filter(|_| production) {
                        line.push(int(pendancy.in_production));
                        line.push(int(pendancy.pendancy));
                        line.push(pendancy.urgency.label().to_string());
                    }
                    line
                })
                .collect();
            RowGroup {
                key: row.style_id.clone(),
                cells,
                detail,
            }
        })
        .collect();

    ReportTable {
        title: ReportTab::Demand.label().to_string(),
        columns,
        detail_columns,
        groups,
        footer: None,
    }
}

fn overstock_table(dashboard: &Dashboard) -> ReportTable {
    ReportTable {
        title: ReportTab::Overstock.label().to_string(),
        columns: vec![
            text("Style ID"),
            num("Units Sold"),
            num("FC Stock"),
            num("Seller Stock"),
            num("Total Stock"),
            num("DRR"),
            num("SC"),
            num("Excess"),
            text("Remark"),
        ],
        detail_columns: vec![
            text("Uniware SKU"),
            text("Size"),
            num("Units Sold"),
            num("FC Stock"),
            num("Seller Stock"),
            num("Total Stock"),
            num("Excess"),
        ],
        groups: dashboard
            .overstock
            .iter()
            .map(|row| RowGroup {
                key: row.style_id.clone(),
                cells: vec![
                    row.style_id.clone(),
                    int(row.units_sold),
                    int(row.fc_stock),
                    int(row.seller_stock),
                    int(row.total_stock),
                    format_drr(row.drr),
                    row.stock_cover.to_string(),
                    int(row.excess),
                    row.remark(),
                ],
                detail: row
                    .skus
                    .iter()
                    .map(|sku| {
                        vec![
                            sku.uniware_sku.clone(),
                            sku.size.clone(),
                            int(sku.units_sold),
                            int(sku.fc_stock),
                            int(sku.seller_stock),
                            int(sku.total_stock),
                            int(sku.excess),
                        ]
                    })
                    .collect(),
            })
            .collect(),
        footer: None,
    }
}

fn size_curve_table(dashboard: &Dashboard) -> ReportTable {
    ReportTable {
        title: ReportTab::SizeCurve.label().to_string(),
        columns: vec![
            text("Style ID"),
            num("Units Sold"),
            num("Stock"),
            num("Demand"),
            num("Max Variance"),
        ],
        detail_columns: vec![
            text("Size"),
            num("Units Sold"),
            num("Sale %"),
            num("Stock"),
            num("Stock %"),
            num("Variance"),
            num("Recommended Buy"),
        ],
        groups: dashboard
            .size_curve
            .iter()
            .map(|row| RowGroup {
                key: row.style_id.clone(),
                cells: vec![
                    row.style_id.clone(),
                    int(row.units_sold),
                    int(row.stock),
                    int(row.demand),
                    format_pct(row.max_variance_pct),
                ],
                detail: row
                    .sizes
                    .iter()
                    .map(|size| {
                        vec![
                            size.size.clone(),
                            int(size.units_sold),
                            format_pct(size.sale_pct),
                            int(size.stock),
                            format_pct(size.stock_pct),
                            format_pct(size.variance_pct),
                            int(size.recommended_buy),
                        ]
                    })
                    .collect(),
            })
            .collect(),
        footer: None,
    }
}

fn broken_size_table(dashboard: &Dashboard) -> ReportTable {
    ReportTable {
        title: ReportTab::BrokenSize.label().to_string(),
        columns: vec![
            text("Style ID"),
            num("Expected Sizes"),
            num("Broken Count"),
            text("Broken Sizes"),
            num("Units Sold"),
            num("Total Stock"),
            num("DRR"),
            num("SC"),
            text("Severity"),
        ],
        detail_columns: Vec::new(),
        groups: dashboard
            .broken_size
            .iter()
            .map(|row| {
                RowGroup::flat(vec![
                    row.style_id.clone(),
                    row.expected_sizes.map(int).unwrap_or_else(|| "-".to_string()),
                    row.broken_count.to_string(),
                    row.broken_sizes.join(", "),
                    int(row.units_sold),
                    int(row.total_stock),
                    format_drr(row.drr),
                    row.stock_cover.to_string(),
                    row.severity.label().to_string(),
                ])
            })
            .collect(),
        footer: None,
    }
}

fn hero_styles_table(dashboard: &Dashboard) -> ReportTable {
    let report = &dashboard.hero_styles;
    let mut columns = vec![text("Style ID")];
    for month in &report.months {
        columns.push(num(&format!("{month} Sale")));
        columns.push(num(&format!("{month} Rank")));
        columns.push(num(&format!("{month} DRR")));
    }
    columns.extend([num("Stock"), num("SC"), num("Broken Sizes"), text("Remark")]);

    let groups = report
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.style_id.clone()];
            for month in &row.months {
                cells.push(int(month.units_sold));
                cells.push(
                    month
                        .rank
                        .map(|rank| rank.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                );
                cells.push(format_drr(month.drr));
            }
            cells.push(int(row.total_stock));
            cells.push(row.stock_cover.to_string());
            cells.push(row.broken_count.to_string());
            cells.push(row.remark.map(|remark| remark.label().to_string()).unwrap_or_default());
            RowGroup::flat(cells)
        })
        .collect();

    ReportTable {
        title: ReportTab::HeroStyles.label().to_string(),
        columns,
        detail_columns: Vec::new(),
        groups,
        footer: None,
    }
}

pub fn report_table(dashboard: &Dashboard, tab: ReportTab) -> ReportTable {
    match tab {
        ReportTab::Demand => demand_table(dashboard),
        ReportTab::Overstock => overstock_table(dashboard),
        ReportTab::SizeCurve => size_curve_table(dashboard),
        ReportTab::BrokenSize => broken_size_table(dashboard),
        ReportTab::HeroStyles => hero_styles_table(dashboard),
    }
}
