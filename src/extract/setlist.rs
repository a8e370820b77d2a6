// src/extract/setlist.rs

use serde::Serialize;

use crate::grid::{row_text, Cell};

use super::{RecordsLayout, MEDLEY_MARKER};

/// One entry of a reconstructed setlist, in performance order.
///
/// Medley boundaries are variants of their own, so a consumer can never
/// mistake a marker for a song title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SetlistEntry {
    Song(String),
    MedleyStart,
    MedleyEnd,
}

/// Rebuild the ordered setlist for one data row.
///
/// The opening-song column is emitted first when non-empty, regardless of
/// the role map. The walk then visits the generic run left to right,
/// skipping medley-slot columns. A non-slot cell carrying the medley word is
/// a trigger: the slot columns are spliced in at that point, bracketed by
/// `MedleyStart`/`MedleyEnd`, so the medley lands at its position in the
/// running order even though its slots sit at fixed columns. Empty cells
/// contribute nothing; a row with nothing at all yields an empty setlist.
pub fn build_setlist(
    row: &[Cell],
    medley_slots: &[usize],
    layout: &RecordsLayout,
) -> Vec<SetlistEntry> {
    let mut setlist = Vec::new();

    let opening = row_text(row, layout.opening_song);
    if !opening.is_empty() {
        setlist.push(SetlistEntry::Song(opening));
    }

    for col in layout.setlist_start..row.len() {
        if medley_slots.contains(&col) {
            continue;
        }
        let song = row[col].text();
        if song.is_empty() {
            continue;
        }
        if song.contains(MEDLEY_MARKER) {
            setlist.push(SetlistEntry::MedleyStart);
            for &slot in medley_slots {
                let s = row_text(row, slot);
                if !s.is_empty() {
                    setlist.push(SetlistEntry::Song(s));
                }
            }
            setlist.push(SetlistEntry::MedleyEnd);
        } else {
            setlist.push(SetlistEntry::Song(song));
        }
    }

    setlist
}

/// Count of `Song` entries, excluding titles that themselves carry the
/// medley word.
pub fn count_songs(setlist: &[SetlistEntry]) -> usize {
    setlist
        .iter()
        .filter(|e| matches!(e, SetlistEntry::Song(name) if !name.contains(MEDLEY_MARKER)))
        .count()
}
