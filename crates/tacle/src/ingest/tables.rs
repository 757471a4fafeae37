//! Table-rectangle detection: splitting a bare grid of strings into the
//! named, contiguous regions that become [`crate::table::Table`]s,
//! grounded in the original's "tables are separated by blank rows/columns"
//! segmentation (SPEC_FULL.md's ingestion supplement).

use std::rc::Rc;

use crate::block::Orientation;
use crate::error::TacleError;
use crate::geometry::Range;
use crate::table::Table;
use crate::types::CellType;

fn row_is_blank(grid: &[Vec<String>], row: usize) -> bool {
	grid[row].iter().all(|c| c.trim().is_empty())
}

/// Split `grid` into row-bands separated by fully blank rows, then each
/// band into column-bands separated by fully blank columns, trimming each
/// resulting band to the tight bounding box of its non-blank cells.
pub fn detect_table_ranges(grid: &[Vec<String>]) -> Vec<Range> {
	if grid.is_empty() || grid[0].is_empty() {
		return Vec::new();
	}
	let height = grid.len();
	let width = grid[0].len();

	let mut row_bands = Vec::new();
	let mut start = None;
	for row in 0..height {
		if row_is_blank(grid, row) {
			if let Some(s) = start.take() {
				row_bands.push((s, row));
			}
		} else if start.is_none() {
			start = Some(row);
		}
	}
	if let Some(s) = start {
		row_bands.push((s, height));
	}

	let mut ranges = Vec::new();
	for (row_start, row_end) in row_bands {
		let mut col_start = None;
		for col in 0..width {
			let blank = (row_start..row_end).all(|r| grid[r][col].trim().is_empty());
			if blank {
				if let Some(s) = col_start.take() {
					if let Some(r) = tight_bounding_box(grid, row_start, row_end, s, col) {
						ranges.push(r);
					}
				}
			} else if col_start.is_none() {
				col_start = Some(col);
			}
		}
		if let Some(s) = col_start {
			if let Some(r) = tight_bounding_box(grid, row_start, row_end, s, width) {
				ranges.push(r);
			}
		}
	}
	ranges
}

fn tight_bounding_box(
	grid: &[Vec<String>],
	row_start: usize,
	row_end: usize,
	col_start: usize,
	col_end: usize,
) -> Option<Range> {
	let mut min_row = None;
	let mut max_row = None;
	let mut min_col = None;
	let mut max_col = None;
	for row in row_start..row_end {
		for col in col_start..col_end {
			if !grid[row][col].trim().is_empty() {
				min_row = Some(min_row.map_or(row, |m: usize| m.min(row)));
				max_row = Some(max_row.map_or(row, |m: usize| m.max(row)));
				min_col = Some(min_col.map_or(col, |m: usize| m.min(col)));
				max_col = Some(max_col.map_or(col, |m: usize| m.max(col)));
			}
		}
	}
	Some(Range::from_coordinates(min_col?, min_row?, max_col? + 1, max_row? + 1))
}

/// Build typed [`Table`]s for each detected range, named `"Table1"`,
/// `"Table2"`, … in reading order.
pub fn build_tables(grid: &[Vec<String>], ranges: &[Range]) -> Result<Vec<Rc<Table>>, TacleError> {
	ranges
		.iter()
		.enumerate()
		.map(|(i, range)| {
			let mut cell_types = Vec::with_capacity(range.rows());
			let mut numeric = Vec::with_capacity(range.rows());
			let mut text = Vec::with_capacity(range.rows());
			for row in range.y0()..range.y1() {
				let mut t_row = Vec::with_capacity(range.columns());
				let mut n_row = Vec::with_capacity(range.columns());
				let mut s_row = Vec::with_capacity(range.columns());
				for col in range.x0()..range.x1() {
					let raw = &grid[row][col];
					let ty = CellType::detect(raw);
					t_row.push(ty);
					match ty {
						Some(CellType::String) => {
							n_row.push(f64::NAN);
							s_row.push(Some(raw.clone()));
						}
						Some(t) => {
							n_row.push(crate::types::cast_numeric(t, raw));
							s_row.push(None);
						}
						None => {
							n_row.push(f64::NAN);
							s_row.push(None);
						}
					}
				}
				cell_types.push(t_row);
				numeric.push(n_row);
				text.push(s_row);
			}
			let orientation = guess_orientation(&cell_types);
			Ok(Rc::new(Table::new(
				format!("Table{}", i + 1),
				*range,
				cell_types,
				numeric,
				text,
				Some(orientation),
			)?))
		})
		.collect()
}

/// Heuristic orientation hint: a table is more likely laid out with
/// records as rows (`Horizontal` headers down the left) when it has more
/// rows than columns, and vice versa — used only as a search-order hint,
/// never a hard constraint (blocks are tried in both orientations
/// regardless, spec.md §4.2).
fn guess_orientation(cell_types: &[Vec<Option<CellType>>]) -> Orientation {
	let rows = cell_types.len();
	let cols = cell_types.first().map_or(0, Vec::len);
	if cols >= rows {
		Orientation::Vertical
	} else {
		Orientation::Horizontal
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn grid_of(rows: &[&[&str]]) -> Vec<Vec<String>> {
		rows.iter()
			.map(|r| r.iter().map(|c| c.to_string()).collect())
			.collect()
	}

	#[test]
	fn single_table_fills_whole_grid() {
		let grid = grid_of(&[&["1", "2"], &["3", "4"]]);
		let ranges = detect_table_ranges(&grid);
		assert_eq!(ranges, vec![Range::new(0, 0, 2, 2)]);
	}

	#[test]
	fn blank_row_splits_two_tables() {
		let grid = grid_of(&[&["1", "2"], &["", ""], &["3", "4"]]);
		let ranges = detect_table_ranges(&grid);
		assert_eq!(ranges.len(), 2);
		assert_eq!(ranges[0], Range::new(0, 0, 2, 1));
		assert_eq!(ranges[1], Range::new(0, 2, 2, 1));
	}
}
