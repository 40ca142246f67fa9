use std::path::PathBuf;

use async_trait::async_trait;
use calamine::{open_workbook_auto, Data, Range, Reader};

use crate::config::{SheetLocator, SheetSpec};
use crate::usecase::ports::source::{LoadError, RawTable, SheetSource};

pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.trim().to_string(),
        Data::Float(v) if v.fract() == 0.0 => format!("{v:.0}"),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => v.to_string(),
        Data::DateTimeIso(v) => v.to_string(),
        Data::DurationIso(v) => v.to_string(),
        Data::Error(v) => format!("{v:?}"),
        Data::Empty => String::new(),
    }
}

/// First row is the header; fully blank rows are dropped.
pub fn range_to_table(sheet: &str, range: &Range<Data>) -> Result<RawTable, LoadError> {
    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>());
    let headers = rows.next().ok_or_else(|| LoadError::EmptySheet {
        sheet: sheet.to_string(),
    })?;
    let rows = rows
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .collect();
    Ok(RawTable { headers, rows })
}

/// A local export of the planning spreadsheet. Sheets are looked up by tab
/// name; grid ids only exist on the published sheet.
pub struct WorkbookSource {
    path: PathBuf,
}

impl WorkbookSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_sheet(&self, sheet: &SheetSpec) -> Result<RawTable, LoadError> {
        let name = match &sheet.locator {
            SheetLocator::Name(name) => name.clone(),
            SheetLocator::Gid(_) => sheet.kind.default_name().to_string(),
        };
        let mut workbook = open_workbook_auto(&self.path)
            .map_err(|err| LoadError::Workbook(format!("{}: {err}", self.path.display())))?;
        if !workbook.sheet_names().iter().any(|known| *known == name) {
            return Err(LoadError::MissingSheet { sheet: name });
        }
        let range = workbook
            .worksheet_range(&name)
            .map_err(|err| LoadError::Parse {
                sheet: name.clone(),
                message: err.to_string(),
            })?;
        range_to_table(&name, &range)
    }
}

#[async_trait]
impl SheetSource for WorkbookSource {
    async fn fetch_table(&self, sheet: &SheetSpec) -> Result<RawTable, LoadError> {
        self.read_sheet(sheet)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SheetKind;
    use futures::executor::block_on;

    #[test]
    fn range_to_table_reads_header_and_values() {
        let mut range = Range::new((0, 0), (3, 1));
        range.set_value((0, 0), Data::String("Month".to_string()));
        range.set_value((0, 1), Data::String("Days".to_string()));
        range.set_value((1, 0), Data::String(" JAN-24 ".to_string()));
        range.set_value((1, 1), Data::Float(31.0));
        range.set_value((3, 0), Data::String("FEB-24".to_string()));
        range.set_value((3, 1), Data::Int(29));

        let table = range_to_table("Sale Days", &range).expect("range should convert");

        assert_eq!(table.headers, vec!["Month", "Days"]);
        assert_eq!(
            table.rows,
            vec![
                vec!["JAN-24".to_string(), "31".to_string()],
                vec!["FEB-24".to_string(), "29".to_string()],
            ]
        );
    }

    #[test]
    fn cell_to_string_keeps_fractional_floats() {
        assert_eq!(cell_to_string(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }

    #[test]
    fn missing_workbook_is_a_workbook_error() {
        let source = WorkbookSource::new(std::env::temp_dir().join("no-such-planner-book.xlsx"));

        let result = block_on(source.fetch_table(&SheetSpec::named(SheetKind::Sale, true)));

        assert!(matches!(result, Err(LoadError::Workbook(_))), "{result:?}");
    }
}
