//! A named, typed rectangle of sheet data (spec.md §3 "Table").

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::block::Orientation;
use crate::error::GridError;
use crate::geometry::Range;
use crate::types::CellType;

/// A table: a named [`Range`] together with its backing, already-typed
/// data. Equality and ordering are by name (spec.md §3).
#[derive(Debug, Clone)]
pub struct Table {
	name: String,
	range: Range,
	/// Per-cell detected type; `None` marks a blank cell.
	cell_types: Vec<Vec<Option<CellType>>>,
	/// Per-cell numeric value (`NaN` for blanks and for textual cells).
	numeric: Vec<Vec<f64>>,
	/// Per-cell original text, populated only where `cell_types` is
	/// `Some(CellType::String)`.
	text: Vec<Vec<Option<String>>>,
	/// Optional orientation hint carried from table-rectangle detection.
	orientation: Option<Orientation>,
}

impl Table {
	/// Build a table, validating that all backing grids agree with `range`'s
	/// dimensions.
	pub fn new(
		name: impl Into<String>,
		range: Range,
		cell_types: Vec<Vec<Option<CellType>>>,
		numeric: Vec<Vec<f64>>,
		text: Vec<Vec<Option<String>>>,
		orientation: Option<Orientation>,
	) -> Result<Self, GridError> {
		let data_rows = numeric.len();
		let data_cols = numeric.first().map_or(0, Vec::len);
		if data_rows != range.rows() || data_cols != range.columns() {
			return Err(GridError::RangeDataMismatch {
				data_rows,
				data_cols,
				range_rows: range.rows(),
				range_cols: range.columns(),
			});
		}
		Ok(Table {
			name: name.into(),
			range,
			cell_types,
			numeric,
			text,
			orientation,
		})
	}

	/// The table's name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The table's absolute position and size on the sheet.
	pub fn range(&self) -> Range {
		self.range
	}

	/// Row count.
	pub fn rows(&self) -> usize {
		self.range.rows()
	}

	/// Column count.
	pub fn columns(&self) -> usize {
		self.range.columns()
	}

	/// The orientation hint carried from table-rectangle detection, if any.
	pub fn orientation_hint(&self) -> Option<Orientation> {
		self.orientation
	}

	/// Per-cell detected type at `(row, col)`, relative to the table.
	pub fn cell_type(&self, row: usize, col: usize) -> Option<CellType> {
		self.cell_types[row][col]
	}

	/// Per-cell numeric value at `(row, col)`, relative to the table.
	pub fn numeric_at(&self, row: usize, col: usize) -> f64 {
		self.numeric[row][col]
	}

	/// Per-cell text at `(row, col)`, relative to the table, if textual.
	pub fn text_at(&self, row: usize, col: usize) -> Option<&str> {
		self.text[row][col].as_deref()
	}
}

impl PartialEq for Table {
	fn eq(&self, other: &Self) -> bool {
		self.name == other.name
	}
}

impl Eq for Table {}

impl Hash for Table {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.name.hash(state);
	}
}

impl PartialOrd for Table {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Table {
	fn cmp(&self, other: &Self) -> Ordering {
		self.name.cmp(&other.name)
	}
}
