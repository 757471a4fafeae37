//! CSV ingestion via the `csv` crate, kept schema-free: every record is
//! read as plain strings, with no header row and no type coercion (cell
//! typing happens in [`crate::types::CellType::detect`]).

use std::io::Read;
use std::path::Path;

use crate::error::{GridError, TacleError};

/// Parse a CSV file into a rectangular grid of raw cell text. Rows are
/// padded with empty strings, not rejected, if shorter than the header
/// row would suggest — spreadsheets routinely have ragged trailing cells,
/// and [`GridError::JaggedRow`] is still raised if a row is genuinely
/// malformed (e.g. an unterminated quote the `csv` crate itself rejects).
pub fn read_csv(path: impl AsRef<Path>) -> Result<Vec<Vec<String>>, TacleError> {
	let mut file = std::fs::File::open(path)?;
	let mut contents = String::new();
	file.read_to_string(&mut contents)?;
	read_csv_str(&contents)
}

/// As [`read_csv`], but from an in-memory CSV string.
pub fn read_csv_str(contents: &str) -> Result<Vec<Vec<String>>, TacleError> {
	let mut reader = csv::ReaderBuilder::new()
		.has_headers(false)
		.flexible(true)
		.from_reader(contents.as_bytes());

	let mut grid = Vec::new();
	for record in reader.records() {
		let record = record?;
		grid.push(record.iter().map(str::to_owned).collect::<Vec<_>>());
	}
	if grid.is_empty() {
		return Err(GridError::EmptySheet.into());
	}
	let width = grid.iter().map(Vec::len).max().unwrap_or(0);
	for (row, cells) in grid.iter_mut().enumerate() {
		if cells.len() > width {
			return Err(GridError::JaggedRow {
				row,
				found: cells.len(),
				expected: width,
			}
			.into());
		}
		cells.resize(width, String::new());
	}
	Ok(grid)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn pads_short_rows_and_rejects_empty_input() {
		let grid = read_csv_str("1,2,3\n4,5\n").unwrap();
		assert_eq!(grid, vec![vec!["1", "2", "3"], vec!["4", "5", ""]]);
		assert!(matches!(read_csv_str(""), Err(TacleError::Grid(GridError::EmptySheet))));
	}
}
