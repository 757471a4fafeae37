//! Turning raw sheet data (a CSV file, or a bare grid of strings) into the
//! typed [`crate::table::Table`]s the rest of the crate operates on
//! (spec.md §7 "ingestion", SPEC_FULL.md's CSV-ingestion supplement).

mod csv_source;
mod tables;

pub use csv_source::read_csv;
pub use tables::{build_tables, detect_table_ranges};
