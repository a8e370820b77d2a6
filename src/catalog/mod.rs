// src/catalog/mod.rs
//
// Album listings from the アルバム sheet. Independent of the live-record
// pipeline; shares only the cell normalizer with it.

use serde::Serialize;
use tracing::warn;

use crate::grid::{clean_str, row_text, Cell, Workbook};

/// Sheet holding the album catalog.
pub const ALBUM_SHEET: &str = "アルバム";

// Album catalog columns, 0-indexed: I = exclusion flag, J = album name,
// K = play count; D/F hold the album-to-song pairs.
const EXCLUDE_FLAG_COL: usize = 8;
const ALBUM_NAME_COL: usize = 9;
const PLAY_COUNT_COL: usize = 10;
const SONG_ALBUM_COL: usize = 3;
const SONG_NAME_COL: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumEntry {
    pub album_name: String,
    pub play_count: u32,
}

/// One (album, song) inclusion pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlbumSong {
    pub album: String,
    pub song: String,
}

/// Albums eligible for display: exclusion flag unset, named, and played at
/// least once. A workbook without the album sheet yields an empty list —
/// unlike the records sheet, its absence is not fatal.
pub fn album_entries(book: &Workbook) -> Vec<AlbumEntry> {
    let sheet = match book.sheet(ALBUM_SHEET) {
        Some(s) => s,
        None => {
            warn!("sheet `{}` not found", ALBUM_SHEET);
            return Vec::new();
        }
    };

    sheet
        .data_rows()
        .iter()
        .filter(|row| row_text(row, EXCLUDE_FLAG_COL) != "1")
        .map(|row| AlbumEntry {
            album_name: row_text(row, ALBUM_NAME_COL),
            play_count: lenient_count(row.get(PLAY_COUNT_COL)),
        })
        .filter(|e| !e.album_name.is_empty() && e.play_count > 0)
        .collect()
}

/// Every (album, song) pair with both cells filled, in sheet order.
pub fn album_song_list(book: &Workbook) -> Vec<AlbumSong> {
    let sheet = match book.sheet(ALBUM_SHEET) {
        Some(s) => s,
        None => {
            warn!("sheet `{}` not found", ALBUM_SHEET);
            return Vec::new();
        }
    };

    sheet
        .data_rows()
        .iter()
        .filter_map(|row| {
            let album = row_text(row, SONG_ALBUM_COL);
            let song = row_text(row, SONG_NAME_COL);
            (!album.is_empty() && !song.is_empty()).then_some(AlbumSong { album, song })
        })
        .collect()
}

// Malformed count cells degrade to zero instead of failing the listing.
// Negative numbers also land on zero through the cast.
fn lenient_count(cell: Option<&Cell>) -> u32 {
    match cell {
        Some(Cell::Number(n)) => *n as u32,
        Some(Cell::Text(s)) => clean_str(s).parse().unwrap_or(0),
        _ => 0,
    }
}
