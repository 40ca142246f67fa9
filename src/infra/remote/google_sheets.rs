use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use crate::config::{SheetLocator, SheetSpec};
use crate::infra::import::csv::parse_csv_table;
use crate::usecase::ports::source::{LoadError, RawTable, SheetSource};

const SHEETS_BASE: &str = "https://docs.google.com/spreadsheets/d";

/// Published spreadsheet read through its CSV endpoints.
#[derive(Clone)]
pub struct GoogleSheetsSource {
    client: Client,
    sheet_id: String,
}

impl GoogleSheetsSource {
    pub fn new(sheet_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            sheet_id: sheet_id.into(),
        }
    }

    /// Named tabs go through the query endpoint, grid ids through export.
    pub fn csv_url(&self, locator: &SheetLocator) -> Result<Url, LoadError> {
        let (path, params) = match locator {
            SheetLocator::Name(name) => (
                format!("{SHEETS_BASE}/{}/gviz/tq", self.sheet_id),
                vec![("tqx", "out:csv".to_string()), ("sheet", name.clone())],
            ),
            SheetLocator::Gid(gid) => (
                format!("{SHEETS_BASE}/{}/export", self.sheet_id),
                vec![("format", "csv".to_string()), ("gid", gid.to_string())],
            ),
        };
        Url::parse_with_params(&path, &params).map_err(|err| LoadError::Fetch {
            sheet: locator.display_name(),
            message: err.to_string(),
        })
    }
}

#[async_trait]
impl SheetSource for GoogleSheetsSource {
    async fn fetch_table(&self, sheet: &SheetSpec) -> Result<RawTable, LoadError> {
        let label = sheet.label();
        let url = self.csv_url(&sheet.locator)?;
        debug!(sheet = %label, %url, "fetching sheet");

        let fetch_error = |err: reqwest::Error| LoadError::Fetch {
            sheet: label.clone(),
            message: err.to_string(),
        };
        let response = self.client.get(url).send().await.map_err(fetch_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::HttpStatus {
                sheet: label.clone(),
                status: status.as_u16(),
            });
        }
        let text = response.text().await.map_err(fetch_error)?;
        parse_csv_table(&label, &text)
    }

    fn describe(&self) -> String {
        format!("spreadsheet {}", self.sheet_id)
    }
}
