use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{error, info, warn};

use crate::config::{SheetConfig, SheetKind, SheetSpec};
use crate::domain::entities::dataset::{
    Dataset, ProductionRecord, SaleDays, SaleRecord, SizeCount, StockRecord, StyleStatus,
};
use crate::infra::import::csv::parse_units;
use crate::usecase::ports::source::{LoadError, RawTable, SheetSource};

/// Header row must equal the expected list exactly, order and count included.
/// The diff is logged before the error is returned.
pub fn validate_headers(sheet: &SheetSpec, table: &RawTable) -> Result<(), LoadError> {
    let expected = sheet.expected_headers();
    if table.headers.iter().map(String::as_str).eq(expected.iter().copied()) {
        return Ok(());
    }

    let missing = expected
        .iter()
        .filter(|header| !table.headers.iter().any(|actual| actual == *header))
        .collect::<Vec<_>>();
    let unexpected = table
        .headers
        .iter()
        .filter(|actual| !expected.contains(&actual.as_str()))
        .collect::<Vec<_>>();
    error!(
        sheet = %sheet.label(),
        expected = ?expected,
        actual = ?table.headers,
        missing = ?missing,
        unexpected = ?unexpected,
        "header mismatch"
    );
    Err(LoadError::HeaderMismatch {
        sheet: sheet.label(),
        expected: expected.iter().map(|header| header.to_string()).collect(),
        actual: table.headers.clone(),
    })
}

fn sale_records(table: &RawTable) -> Vec<SaleRecord> {
    table
        .rows
        .iter()
        .map(|row| SaleRecord {
            month: RawTable::cell(row, 0).to_string(),
            marketplace: RawTable::cell(row, 1).to_string(),
            account: RawTable::cell(row, 2).to_string(),
            fc: RawTable::cell(row, 3).to_string(),
            mp_sku: RawTable::cell(row, 4).to_string(),
            uniware_sku: RawTable::cell(row, 5).to_string(),
            style_id: RawTable::cell(row, 6).to_string(),
            size: RawTable::cell(row, 7).to_string(),
            units: parse_units(RawTable::cell(row, 8)),
        })
        .collect()
}

fn stock_records(table: &RawTable) -> Vec<StockRecord> {
    table
        .rows
        .iter()
        .map(|row| StockRecord {
            fc: RawTable::cell(row, 0).to_string(),
            mp_sku: RawTable::cell(row, 1).to_string(),
            uniware_sku: RawTable::cell(row, 2).to_string(),
            style_id: RawTable::cell(row, 3).to_string(),
            size: RawTable::cell(row, 4).to_string(),
            units: parse_units(RawTable::cell(row, 5)),
        })
        .collect()
}

fn style_status_records(table: &RawTable) -> Vec<StyleStatus> {
    table
        .rows
        .iter()
        .map(|row| StyleStatus {
            style_id: RawTable::cell(row, 0).to_string(),
            category: RawTable::cell(row, 1).to_string(),
            company_remark: RawTable::cell(row, 2).to_string(),
        })
        .collect()
}

fn sale_days_records(table: &RawTable) -> Vec<SaleDays> {
    table
        .rows
        .iter()
        .map(|row| SaleDays {
            month: RawTable::cell(row, 0).to_string(),
            days: parse_units(RawTable::cell(row, 1)),
        })
        .collect()
}

fn size_count_records(table: &RawTable) -> Vec<SizeCount> {
    table
        .rows
        .iter()
        .map(|row| SizeCount {
            style_id: RawTable::cell(row, 0).to_string(),
            expected_size_count: parse_units(RawTable::cell(row, 1)),
        })
        .collect()
}

fn production_records(table: &RawTable) -> Vec<ProductionRecord> {
    table
        .rows
        .iter()
        .map(|row| ProductionRecord {
            uniware_sku: RawTable::cell(row, 0).to_string(),
            units_in_production: parse_units(RawTable::cell(row, 1)),
        })
        .collect()
}

pub struct LoadService {
    source: Arc<dyn SheetSource>,
    config: SheetConfig,
}

impl LoadService {
    pub fn new(source: Arc<dyn SheetSource>, config: SheetConfig) -> Self {
        Self { source, config }
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    /// Fetch and validate one sheet. An optional sheet that cannot be reached
    /// yields `None`; a malformed one is still an error.
    async fn load_sheet(&self, sheet: &SheetSpec) -> Result<Option<RawTable>, LoadError> {
        let table = match self.source.fetch_table(sheet).await {
            Ok(table) => table,
            Err(err) if !sheet.required && err.is_unavailable() => {
                warn!(sheet = %sheet.label(), error = %err, "optional sheet skipped");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        validate_headers(sheet, &table)?;
        info!(sheet = %sheet.label(), rows = table.rows.len(), "sheet loaded");
        Ok(Some(table))
    }

    /// Load every configured sheet concurrently. Any sheet error that is not
    /// a skipped optional sheet aborts the whole load.
    pub async fn load_all(&self) -> Result<Dataset, LoadError> {
        info!(
            source = %self.source.describe(),
            sheets = self.config.sheets.len(),
            "loading sheets"
        );
        let tables = try_join_all(self.config.sheets.iter().map(|sheet| async move {
            self.load_sheet(sheet)
                .await
                .map(|table| (sheet.kind, table))
        }))
        .await?;

        let mut dataset = Dataset::default();
        for (kind, table) in tables {
            let Some(table) = table else {
                continue;
            };
            match kind {
                SheetKind::Sale => dataset.sale.extend(sale_records(&table)),
                SheetKind::Stock => dataset.stock.extend(stock_records(&table)),
                SheetKind::StyleStatus => {
                    dataset.style_status.extend(style_status_records(&table))
                }
                SheetKind::SaleDays => dataset.sale_days.extend(sale_days_records(&table)),
                SheetKind::SizeCount => dataset.size_count.extend(size_count_records(&table)),
                SheetKind::Production => dataset.production.extend(production_records(&table)),
            }
        }
        dataset.total_sale_days = Dataset::sum_sale_days(&dataset.sale_days);

        info!(
            sale = dataset.sale.len(),
            stock = dataset.stock.len(),
            styles = dataset.style_status.len(),
            total_sale_days = dataset.total_sale_days,
            "dataset ready"
        );
        Ok(dataset)
    }
}
