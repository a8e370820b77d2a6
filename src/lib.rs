// src/lib.rs
//
// Extraction pipeline for the live-history workbook: typed grids in,
// normalized concert records and album listings out. Loading the workbook
// from disk lives in `source`; everything downstream only reads grids.

pub mod catalog;
pub mod extract;
pub mod grid;
pub mod source;
