// src/source/mod.rs
//
// Workbook adapter for CSV exports: one file per sheet, file stem = sheet
// name. The spreadsheet itself types its cells; a CSV export flattens
// everything to text, so typing is re-derived here and nowhere else.

use std::{fs::File, io::Read, path::Path};

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use glob::glob;
use tracing::{debug, info};

use crate::grid::{Cell, Sheet, Workbook};

// Known date serializations of the sheet. Full-cell matches only, so free
// text that merely mentions a date stays text.
const DATETIME_FORMATS: &[&str] = &["%Y/%m/%d %H:%M:%S", "%Y-%m-%d %H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%Y-%m-%d"];

/// Load every `*.csv` directly under `dir` as one sheet each.
#[tracing::instrument(level = "info", skip(dir), fields(dir = %dir.as_ref().display()))]
pub fn load_workbook<P: AsRef<Path>>(dir: P) -> Result<Workbook> {
    let pattern = dir.as_ref().join("*.csv");
    let pattern = pattern
        .to_str()
        .with_context(|| format!("workbook path {:?} is not valid UTF-8", dir.as_ref()))?;

    let mut book = Workbook::new();
    for entry in glob(pattern).context("invalid workbook glob pattern")? {
        let path = entry.context("unreadable workbook directory entry")?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();

        let file =
            File::open(&path).with_context(|| format!("opening {}", path.display()))?;
        let sheet = sheet_from_csv(&name, file)
            .with_context(|| format!("parsing {}", path.display()))?;
        debug!(sheet = %name, rows = sheet.row_count(), "loaded sheet");
        book.insert(sheet);
    }

    info!(sheets = book.len(), "workbook loaded");
    Ok(book)
}

/// Parse one CSV stream into a typed sheet. No header handling here: row 0
/// of the sheet is the header row downstream. Rows may differ in width.
pub fn sheet_from_csv<R: Read>(name: &str, reader: R) -> Result<Sheet> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result
            .with_context(|| format!("CSV parse error in sheet `{}` at record {}", name, idx))?;
        rows.push(record.iter().map(parse_cell).collect());
    }

    Ok(Sheet::new(name, rows))
}

// Typing order: empty, date, number, text. A date-looking value that fails
// every known format falls through to text and stays invalid downstream.
fn parse_cell(raw: &str) -> Cell {
    let v = raw.trim();
    if v.is_empty() {
        return Cell::Empty;
    }
    if let Some(d) = parse_date(v) {
        return Cell::Date(d);
    }
    if let Ok(n) = v.parse::<f64>() {
        return Cell::Number(n);
    }
    Cell::Text(raw.to_string())
}

fn parse_date(v: &str) -> Option<NaiveDate> {
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(v, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(v, fmt) {
            return Some(d);
        }
    }
    None
}
