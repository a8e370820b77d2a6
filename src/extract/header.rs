// src/extract/header.rs

use crate::grid::Cell;

use super::MEDLEY_MARKER;

/// Header substring naming a numbered slot ("n曲目") within a medley block.
const SLOT_MARKER: &str = "曲目";

/// Scan the header row once and collect the medley-slot column indices, in
/// ascending order.
///
/// A column is a medley slot iff its normalized header text contains both
/// the medley word and the slot ordinal word — i.e. the header names a
/// numbered item inside a medley. Any number of slots may exist; no matches
/// means medley handling downstream is a no-op.
pub fn medley_slot_columns(header: &[Cell]) -> Vec<usize> {
    header
        .iter()
        .enumerate()
        .filter_map(|(i, cell)| {
            let h = cell.text();
            (h.contains(MEDLEY_MARKER) && h.contains(SLOT_MARKER)).then_some(i)
        })
        .collect()
}
