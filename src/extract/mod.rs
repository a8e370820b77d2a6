// src/extract/mod.rs

pub mod date;
pub mod header;
pub mod setlist;

use anyhow::{bail, Result};
use chrono::Datelike;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::extract::setlist::{build_setlist, count_songs, SetlistEntry};
use crate::grid::{row_text, Cell, Workbook};

/// Sheet holding one live event per row.
pub const RECORDS_SHEET: &str = "記録";

/// Substring marking a medley, in header columns and trigger cells alike.
pub const MEDLEY_MARKER: &str = "メドレー";

/// Canonical venue/region value for online-only events.
pub const ONLINE_TOKEN: &str = "オンライン";

/// Venue suffix identifying an online event. Fullwidth parentheses, as the
/// sheet writes them.
const ONLINE_VENUE_MARKER: &str = "（オンライン）";

/// Column layout of the records sheet, 0-indexed. The metadata prefix is
/// fixed; everything from `setlist_start` onward is the variable-width
/// setlist region.
#[derive(Debug, Clone)]
pub struct RecordsLayout {
    pub tour_name: usize,
    pub date: usize,
    pub region: usize,
    pub venue: usize,
    /// Song performed first, one column ahead of the generic run.
    pub opening_song: usize,
    /// First column of the generic setlist run.
    pub setlist_start: usize,
}

impl Default for RecordsLayout {
    // Columns E, H, K, L, M, N of the 記録 sheet.
    fn default() -> Self {
        Self {
            tour_name: 4,
            date: 7,
            region: 10,
            venue: 11,
            opening_song: 12,
            setlist_start: 13,
        }
    }
}

/// One fully normalized live event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveRecord {
    pub tour_name: String,
    /// `YYYY/MM/DD`, month and day always two digits.
    pub date: String,
    pub year: i32,
    pub day_of_week: &'static str,
    pub region: String,
    pub venue: String,
    /// Count of setlist songs, excluding titles carrying the medley word.
    pub song_count: usize,
    pub setlist: Vec<SetlistEntry>,
}

/// Extract every valid live record from the workbook's records sheet,
/// preserving source row order.
///
/// The one fatal condition is a workbook without the records sheet. Rows
/// that are not real dated events are skipped without notice; a sheet with
/// no data rows yields an empty result.
#[tracing::instrument(level = "info", skip(book))]
pub fn extract_live_records(book: &Workbook) -> Result<Vec<LiveRecord>> {
    extract_live_records_with_layout(book, &RecordsLayout::default())
}

/// Same as [`extract_live_records`], with an explicit column layout.
pub fn extract_live_records_with_layout(
    book: &Workbook,
    layout: &RecordsLayout,
) -> Result<Vec<LiveRecord>> {
    let sheet = match book.sheet(RECORDS_SHEET) {
        Some(s) => s,
        None => bail!("sheet `{}` not found", RECORDS_SHEET),
    };

    if sheet.row_count() < 2 {
        return Ok(Vec::new());
    }

    // Scanned once per call; read-only for every row thereafter.
    let medley_slots = header::medley_slot_columns(sheet.header());
    debug!(slots = ?medley_slots, "medley slot columns");

    // Rows are independent, so fan out; the collect restores source order.
    let records: Vec<LiveRecord> = sheet
        .data_rows()
        .par_iter()
        .filter_map(|row| process_row(row, &medley_slots, layout))
        .collect();

    info!(count = records.len(), "extracted live records");
    Ok(records)
}

/// One data row → one record, or `None` when the row is not a real dated
/// event (blank tour name, or a date cell that is not date-typed).
fn process_row(row: &[Cell], medley_slots: &[usize], layout: &RecordsLayout) -> Option<LiveRecord> {
    let tour_name = row_text(row, layout.tour_name);
    if tour_name.is_empty() {
        return None;
    }

    // Only a genuinely date-typed cell qualifies; date-looking text does not.
    let date = match row.get(layout.date) {
        Some(Cell::Date(d)) => *d,
        _ => return None,
    };

    let region = row_text(row, layout.region);
    let venue = row_text(row, layout.venue);
    let (region, venue) = canonicalize_online(region, venue);

    let setlist = build_setlist(row, medley_slots, layout);
    let song_count = count_songs(&setlist);

    Some(LiveRecord {
        tour_name,
        date: date::format_date(date),
        year: date.year(),
        day_of_week: date::day_of_week(date),
        region,
        venue,
        song_count,
        setlist,
    })
}

/// Collapse the naming variants of online-only events into the canonical
/// token, for both fields at once. Idempotent: once both fields hold the
/// token, reapplying keeps them there.
pub fn canonicalize_online(region: String, venue: String) -> (String, String) {
    if venue.contains(ONLINE_VENUE_MARKER) || region == ONLINE_TOKEN {
        (ONLINE_TOKEN.to_string(), ONLINE_TOKEN.to_string())
    } else {
        (region, venue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Sheet;
    use chrono::NaiveDate;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,livescraper::extract=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn date(y: i32, m: u32, d: u32) -> Cell {
        Cell::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    /// Header matching the default layout: two medley slots at columns 14/15.
    fn header_row() -> Vec<Cell> {
        let mut h = vec![Cell::Empty; 14];
        h[4] = text("ツアー名");
        h[7] = text("日付");
        h[10] = text("地方");
        h[11] = text("会場");
        h[12] = text("1曲目");
        h[13] = text("2曲目");
        h.push(text("メドレー曲目1"));
        h.push(text("メドレー曲目2"));
        h.push(text("3曲目"));
        h
    }

    /// Data row with the metadata prefix filled in and the setlist region
    /// left to the caller. Columns: 13 generic, 14/15 medley slots, 16 generic.
    fn base_row(tour: &str) -> Vec<Cell> {
        let mut r = vec![Cell::Empty; 17];
        r[4] = text(tour);
        r[7] = date(2023, 5, 14);
        r[10] = text("関東");
        r[11] = text("日本武道館");
        r
    }

    fn book_with(rows: Vec<Vec<Cell>>) -> Workbook {
        let mut all = vec![header_row()];
        all.extend(rows);
        let mut book = Workbook::new();
        book.insert(Sheet::new(RECORDS_SHEET, all));
        book
    }

    #[test]
    fn missing_records_sheet_is_fatal() {
        let book = Workbook::new();
        let err = extract_live_records(&book).unwrap_err();
        assert!(err.to_string().contains(RECORDS_SHEET));
    }

    #[test]
    fn header_only_sheet_yields_empty_result() -> Result<()> {
        let book = book_with(Vec::new());
        assert!(extract_live_records(&book)?.is_empty());
        Ok(())
    }

    #[test]
    fn rows_without_tour_name_or_typed_date_are_dropped() -> Result<()> {
        init_test_logging();

        let mut no_tour = base_row("");
        no_tour[12] = text("花火");

        // A date written as text must not pass validation.
        let mut text_date = base_row("Love Like Pop");
        text_date[7] = text("2023/05/14");

        let mut ok = base_row("Love Like Pop");
        ok[12] = text("花火");

        let records = extract_live_records(&book_with(vec![no_tour, text_date, ok]))?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tour_name, "Love Like Pop");
        Ok(())
    }

    #[test]
    fn records_keep_source_row_order() -> Result<()> {
        let rows: Vec<Vec<Cell>> = (1..=8)
            .map(|i| {
                let mut r = base_row(&format!("tour {}", i));
                r[12] = text(&format!("song {}", i));
                r
            })
            .collect();
        let records = extract_live_records(&book_with(rows))?;
        let names: Vec<&str> = records.iter().map(|r| r.tour_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "tour 1", "tour 2", "tour 3", "tour 4", "tour 5", "tour 6", "tour 7", "tour 8"
            ]
        );
        Ok(())
    }

    #[test]
    fn record_fields_are_normalized() -> Result<()> {
        let mut row = base_row("Love Like Pop vol.1");
        row[7] = date(2006, 3, 5);
        row[12] = text("スター");
        row[13] = text("桜の時");

        let records = extract_live_records(&book_with(vec![row]))?;
        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec.date, "2006/03/05");
        assert_eq!(rec.year, 2006);
        assert_eq!(rec.day_of_week, "日");
        assert_eq!(rec.region, "関東");
        assert_eq!(rec.venue, "日本武道館");
        assert_eq!(rec.song_count, 2);
        assert_eq!(
            rec.setlist,
            vec![
                SetlistEntry::Song("スター".into()),
                SetlistEntry::Song("桜の時".into()),
            ]
        );
        Ok(())
    }

    #[test]
    fn online_events_collapse_to_the_canonical_token() -> Result<()> {
        let mut row = base_row("配信ライブ");
        row[10] = text("関東");
        row[11] = text("Tokyo Hall（オンライン）");
        row[12] = text("花火");

        let records = extract_live_records(&book_with(vec![row]))?;
        assert_eq!(records[0].region, ONLINE_TOKEN);
        assert_eq!(records[0].venue, ONLINE_TOKEN);
        Ok(())
    }

    #[test]
    fn canonicalize_online_covers_both_directions() {
        // Marker in the venue.
        let (r, v) = canonicalize_online("関東".into(), "Zepp Tokyo（オンライン）".into());
        assert_eq!((r.as_str(), v.as_str()), (ONLINE_TOKEN, ONLINE_TOKEN));

        // Region already canonical.
        let (r, v) = canonicalize_online(ONLINE_TOKEN.into(), "自宅スタジオ".into());
        assert_eq!((r.as_str(), v.as_str()), (ONLINE_TOKEN, ONLINE_TOKEN));

        // Ordinary events pass through untouched.
        let (r, v) = canonicalize_online("近畿".into(), "大阪城ホール".into());
        assert_eq!((r.as_str(), v.as_str()), ("近畿", "大阪城ホール"));
    }

    #[test]
    fn canonicalize_online_is_idempotent() {
        let once = canonicalize_online("関東".into(), "Tokyo Hall（オンライン）".into());
        let twice = canonicalize_online(once.0.clone(), once.1.clone());
        assert_eq!(once, twice);

        let once = canonicalize_online("近畿".into(), "大阪城ホール".into());
        let twice = canonicalize_online(once.0.clone(), once.1.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn song_count_ignores_markers_and_medley_titles() -> Result<()> {
        let mut row = base_row("Love Like Pop");
        row[12] = text("スター");
        row[13] = text("ヒットメドレー"); // trigger
        row[14] = text("カブトムシ");
        row[15] = text("花火メドレー抜粋"); // slot title carrying the marker word
        row[16] = text("milk");

        let records = extract_live_records(&book_with(vec![row]))?;
        let rec = &records[0];
        assert_eq!(
            rec.setlist,
            vec![
                SetlistEntry::Song("スター".into()),
                SetlistEntry::MedleyStart,
                SetlistEntry::Song("カブトムシ".into()),
                SetlistEntry::Song("花火メドレー抜粋".into()),
                SetlistEntry::MedleyEnd,
                SetlistEntry::Song("milk".into()),
            ]
        );
        // スター, カブトムシ, milk — the marker-carrying slot title is excluded.
        assert_eq!(rec.song_count, 3);
        Ok(())
    }
}
