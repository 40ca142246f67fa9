use csv::{ReaderBuilder, Trim};

use crate::usecase::ports::source::{LoadError, RawTable};

/// Parse CSV text into a header row and data rows.
///
/// Quoted fields are honoured, so a comma inside quotes stays in its cell.
/// Rows may be ragged, and blank lines are skipped.
pub fn parse_csv_table(sheet: &str, text: &str) -> Result<RawTable, LoadError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let headers = match records.next() {
        Some(record) => record
            .map_err(|err| LoadError::Parse {
                sheet: sheet.to_string(),
                message: err.to_string(),
            })?
            .iter()
            .map(|cell| cell.trim_start_matches('\u{feff}').to_string())
            .collect::<Vec<_>>(),
        None => {
            return Err(LoadError::EmptySheet {
                sheet: sheet.to_string(),
            })
        }
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(|err| LoadError::Parse {
            sheet: sheet.to_string(),
            message: err.to_string(),
        })?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable { headers, rows })
}

/// Unit counts as typed into the sheet. Thousands separators are accepted,
/// fractional values round, and anything unreadable counts as zero.
pub fn parse_units(value: &str) -> i64 {
    let cleaned = value.trim().replace(',', "");
    if cleaned.is_empty() {
        return 0;
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
        .map(|parsed| parsed.round() as i64)
        .unwrap_or(0)
}
