//! Sheet layout and planning constants.
//!
//! Several thresholds below have changed repeatedly on the business side
//! (stock basis for demand, urgency and severity bands). They are kept as
//! named fields so a single place decides them.

pub const SHEET_ID: &str = "1kGUn-Sdp16NJB9rLjijrYnnSl9Jjrom5ZpYiTXFBZ1E";

pub const SALE_HEADERS: &[&str] = &[
    "Month",
    "MP",
    "Account",
    "FC",
    "MP SKU",
    "Uniware SKU",
    "Style ID",
    "Size",
    "Units",
];
pub const STOCK_HEADERS: &[&str] = &["FC", "MP SKU", "Uniware SKU", "Style ID", "Size", "Units"];
pub const STYLE_STATUS_HEADERS: &[&str] = &["Style ID", "Category", "Company Remark"];
pub const SALE_DAYS_HEADERS: &[&str] = &["Month", "Days"];
pub const SIZE_COUNT_HEADERS: &[&str] = &["Style ID", "Size Count"];
pub const PRODUCTION_HEADERS: &[&str] = &["Uniware SKU", "In Production"];

/// Locked size sequence used by every size-ordered table.
pub const SIZE_ORDER: &[&str] = &[
    "FS", "S", "M", "L", "XL", "XXL", "3XL", "4XL", "5XL", "6XL", "7XL", "8XL", "9XL", "10XL",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SheetKind {
    Sale,
    Stock,
    StyleStatus,
    SaleDays,
    SizeCount,
    Production,
}

impl SheetKind {
    pub fn default_name(self) -> &'static str {
        match self {
            SheetKind::Sale => "Sale",
            SheetKind::Stock => "Stock",
            SheetKind::StyleStatus => "Style Status",
            SheetKind::SaleDays => "Sale Days",
            SheetKind::SizeCount => "Size Count",
            SheetKind::Production => "Production",
        }
    }

    pub fn expected_headers(self) -> &'static [&'static str] {
        match self {
            SheetKind::Sale => SALE_HEADERS,
            SheetKind::Stock => STOCK_HEADERS,
            SheetKind::StyleStatus => STYLE_STATUS_HEADERS,
            SheetKind::SaleDays => SALE_DAYS_HEADERS,
            SheetKind::SizeCount => SIZE_COUNT_HEADERS,
            SheetKind::Production => PRODUCTION_HEADERS,
        }
    }
}

/// How a sheet is addressed on the published spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetLocator {
    /// Tab name, fetched through the query CSV endpoint.
    Name(String),
    /// Numeric grid id, fetched through the direct export endpoint.
    #[allow(dead_code)]
    Gid(u64),
}

impl SheetLocator {
    pub fn display_name(&self) -> String {
        match self {
            SheetLocator::Name(name) => name.clone(),
            SheetLocator::Gid(gid) => format!("gid {gid}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSpec {
    pub kind: SheetKind,
    pub locator: SheetLocator,
    pub required: bool,
}

impl SheetSpec {
    pub fn named(kind: SheetKind, required: bool) -> Self {
        Self {
            kind,
            locator: SheetLocator::Name(kind.default_name().to_string()),
            required,
        }
    }

    pub fn label(&self) -> String {
        self.locator.display_name()
    }

    pub fn expected_headers(&self) -> &'static [&'static str] {
        self.kind.expected_headers()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetConfig {
    pub sheet_id: String,
    pub sheets: Vec<SheetSpec>,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            sheet_id: SHEET_ID.to_string(),
            sheets: vec![
                SheetSpec::named(SheetKind::Sale, true),
                SheetSpec::named(SheetKind::Stock, true),
                SheetSpec::named(SheetKind::StyleStatus, true),
                SheetSpec::named(SheetKind::SaleDays, true),
                SheetSpec::named(SheetKind::SizeCount, false),
                SheetSpec::named(SheetKind::Production, false),
            ],
        }
    }
}

/// Which stock figure demand is planned against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockBasis {
    Seller,
    #[allow(dead_code)]
    Total,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub planning_horizon_days: f64,
    pub broken_size_threshold: i64,
    pub hero_top_n: usize,
    /// Styles selling at or below this many units are left out of the
    /// broken-size report. `None` keeps every style.
    pub broken_min_units_sold: Option<i64>,
    pub broken_critical_above: usize,
    pub broken_warning_above: usize,
    pub urgent_pendancy_above: i64,
    pub medium_pendancy_from: i64,
    pub demand_stock_basis: StockBasis,
    /// Business order of company remarks in the remark summary. Remarks not
    /// listed follow in descending sales order.
    pub remark_priority: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            planning_horizon_days: 45.0,
            broken_size_threshold: 10,
            hero_top_n: 20,
            broken_min_units_sold: Some(300),
            broken_critical_above: 4,
            broken_warning_above: 2,
            urgent_pendancy_above: 500,
            medium_pendancy_from: 100,
            demand_stock_basis: StockBasis::Seller,
            remark_priority: ["Hero", "Running", "New Launch", "Slow Moving", "Discontinued", "Closed"]
                .iter()
                .map(|remark| remark.to_string())
                .collect(),
        }
    }
}
