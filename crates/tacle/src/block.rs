//! A same-typed, same-orientation, contiguous strip of vectors within a
//! table (spec.md §3 "Block" / GLOSSARY).

use std::cell::RefCell;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::error::GridError;
use crate::geometry::Range;
use crate::table::Table;
use crate::types::CellType;

/// Whether a block's vectors are its columns (`Vertical`) or its rows
/// (`Horizontal`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
	/// Vectors are columns.
	Vertical,
	/// Vectors are rows.
	Horizontal,
}

impl Orientation {
	/// Parse the orientation hints accepted at the external boundary
	/// (`"vertical"`/`"horizontal"`), per spec.md §7.
	pub fn parse(s: &str) -> Result<Self, GridError> {
		match s {
			"vertical" => Ok(Orientation::Vertical),
			"horizontal" => Ok(Orientation::Horizontal),
			other => Err(GridError::InvalidOrientation(other.to_string())),
		}
	}

	/// The other orientation.
	pub fn flip(self) -> Orientation {
		match self {
			Orientation::Vertical => Orientation::Horizontal,
			Orientation::Horizontal => Orientation::Vertical,
		}
	}
}

/// A table-relative oriented range with a uniform per-vector type list
/// (spec.md §3). Equality is `(table, relative range, orientation)`;
/// ordering is lexicographic over `(table, orientation, index, count,
/// length)`. `sub_block` results are memoised per-instance.
#[derive(Debug, Clone)]
pub struct Block {
	table: Rc<Table>,
	relative_range: Range,
	orientation: Orientation,
	vector_types: Vec<CellType>,
	dominant_type: CellType,
	has_blanks: bool,
	cache: Rc<RefCell<std::collections::HashMap<(usize, usize), Block>>>,
}

impl Block {
	/// Build a block over `relative_range` of `table`, computing its
	/// per-vector types, dominant type, and blank flag from the table's
	/// backing data.
	pub fn new(table: Rc<Table>, relative_range: Range, orientation: Orientation) -> Block {
		let count = relative_range.vector_count(orientation);
		let length = relative_range.vector_length(orientation);
		let mut vector_types = Vec::with_capacity(count);
		let mut has_blanks = false;
		for v in 0..count {
			let mut seen = Vec::with_capacity(length);
			for i in 0..length {
				let (row, col) = match orientation {
					Orientation::Vertical => {
						(relative_range.y0() + i, relative_range.x0() + v)
					}
					Orientation::Horizontal => {
						(relative_range.y0() + v, relative_range.x0() + i)
					}
				};
				match table.cell_type(row, col) {
					Some(t) => seen.push(t),
					None => has_blanks = true,
				}
			}
			vector_types.push(CellType::max(&seen).unwrap_or(CellType::String));
		}
		let dominant_type = CellType::max(&vector_types).unwrap_or(CellType::String);
		Block {
			table,
			relative_range,
			orientation,
			vector_types,
			dominant_type,
			has_blanks,
			cache: Rc::new(RefCell::new(std::collections::HashMap::new())),
		}
	}

	/// The owning table.
	pub fn table(&self) -> &Rc<Table> {
		&self.table
	}

	/// The block's range, relative to its table's origin.
	pub fn relative_range(&self) -> Range {
		self.relative_range
	}

	/// Whether vectors are columns or rows.
	pub fn orientation(&self) -> Orientation {
		self.orientation
	}

	/// Number of vectors in the block.
	pub fn vector_count(&self) -> usize {
		self.relative_range.vector_count(self.orientation)
	}

	/// Length (cell count) of each vector.
	pub fn vector_length(&self) -> usize {
		self.relative_range.vector_length(self.orientation)
	}

	/// Alias of [`Block::vector_length`], matching the `SameLength` filter's
	/// use of "length" in spec.md §4.3.
	pub fn length(&self) -> usize {
		self.vector_length()
	}

	/// Index (within the table) of the block's first vector.
	pub fn vector_index(&self) -> usize {
		self.relative_range.vector_index(self.orientation)
	}

	/// Row count of the block's range.
	pub fn rows(&self) -> usize {
		self.relative_range.rows()
	}

	/// Column count of the block's range.
	pub fn columns(&self) -> usize {
		self.relative_range.columns()
	}

	/// The lattice join of the block's per-vector types (spec.md §4.1).
	pub fn dominant_type(&self) -> CellType {
		self.dominant_type
	}

	/// The type of the vector at `index` (0-based).
	pub fn vector_type(&self, index: usize) -> CellType {
		self.vector_types[index]
	}

	/// Whether the block's data contains any blank cell.
	pub fn has_blanks(&self) -> bool {
		self.has_blanks
	}

	/// Alias of [`Block::has_blanks`] matching the GLOSSARY's "partial
	/// block".
	pub fn is_partial(&self) -> bool {
		self.has_blanks
	}

	/// Whether every value in the block admits `allowed` under the cell-type
	/// lattice (spec.md §3's type-admissible invariant): every vector's type
	/// must be `allowed`-or-a-descendant of some member of `allowed`.
	pub fn admits(&self, allowed: &[CellType]) -> bool {
		self.vector_types
			.iter()
			.all(|vt| allowed.iter().any(|a| vt.is_descendant_of_or_eq(*a)))
	}

	/// A contiguous slice of `vector_count` vectors starting at
	/// `vector_index`, cached by `(vector_index, vector_count)`.
	pub fn sub_block(&self, vector_index: usize, vector_count: usize) -> Option<Block> {
		let key = (vector_index, vector_count);
		if let Some(hit) = self.cache.borrow().get(&key) {
			return Some(hit.clone());
		}
		let new_range = self
			.relative_range
			.sub_range(vector_index, vector_count, self.orientation)?;
		let block = Block::new(Rc::clone(&self.table), new_range, self.orientation);
		self.cache.borrow_mut().insert(key, block.clone());
		Some(block)
	}

	/// Iterate the block's vectors as length-1 sub-blocks.
	pub fn vectors(&self) -> impl Iterator<Item = Block> + '_ {
		(0..self.vector_count()).map(move |i| self.sub_block(i, 1).expect("i < vector_count"))
	}

	/// The single vector at `index` as a length-1 sub-block.
	pub fn get_vector(&self, index: usize) -> Block {
		self.sub_block(index, 1).expect("index < vector_count")
	}

	/// Whether `self`'s range contains `other`'s range within the same
	/// table — i.e. `other` is a subgroup of `self`.
	pub fn is_subgroup(&self, other: &Block) -> bool {
		self.table == other.table && self.relative_range.contains(&other.relative_range)
	}

	/// Whether `self` and `other` share any cell within the same table.
	pub fn overlaps_with(&self, other: &Block) -> bool {
		self.table == other.table && self.relative_range.overlaps_with(&other.relative_range)
	}

	/// The block's data, one row per sheet row, one column per sheet column
	/// (not reoriented).
	pub fn numeric_data(&self) -> Vec<Vec<f64>> {
		(0..self.rows())
			.map(|r| {
				(0..self.columns())
					.map(|c| {
						self.table.numeric_at(
							self.relative_range.y0() + r,
							self.relative_range.x0() + c,
						)
					})
					.collect()
			})
			.collect()
	}

	/// Flattened numeric data of a length-1 (single-vector) block, in
	/// vector order.
	pub fn vector_numeric(&self) -> Vec<f64> {
		debug_assert_eq!(self.vector_count(), 1, "vector_numeric on a multi-vector block");
		let len = self.vector_length();
		(0..len)
			.map(|i| {
				let (row, col) = match self.orientation {
					Orientation::Vertical => (self.relative_range.y0() + i, self.relative_range.x0()),
					Orientation::Horizontal => (self.relative_range.y0(), self.relative_range.x0() + i),
				};
				self.table.numeric_at(row, col)
			})
			.collect()
	}

	/// Flattened text data of a length-1 (single-vector) block, in vector
	/// order. Entries are `None` for blank or numeric cells.
	pub fn vector_text(&self) -> Vec<Option<String>> {
		debug_assert_eq!(self.vector_count(), 1, "vector_text on a multi-vector block");
		let len = self.vector_length();
		(0..len)
			.map(|i| {
				let (row, col) = match self.orientation {
					Orientation::Vertical => (self.relative_range.y0() + i, self.relative_range.x0()),
					Orientation::Horizontal => (self.relative_range.y0(), self.relative_range.x0() + i),
				};
				self.table.text_at(row, col).map(str::to_owned)
			})
			.collect()
	}
}

impl PartialEq for Block {
	fn eq(&self, other: &Self) -> bool {
		self.table == other.table
			&& self.relative_range == other.relative_range
			&& self.orientation == other.orientation
	}
}

impl Eq for Block {}

impl Hash for Block {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.table.hash(state);
		self.relative_range.hash(state);
		self.orientation.hash(state);
	}
}

impl PartialOrd for Block {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Block {
	fn cmp(&self, other: &Self) -> Ordering {
		let orient_key = |o: Orientation| matches!(o, Orientation::Horizontal);
		(
			self.table.name(),
			orient_key(self.orientation),
			self.vector_index(),
			self.vector_count(),
			self.vector_length(),
		)
			.cmp(&(
				other.table.name(),
				orient_key(other.orientation),
				other.vector_index(),
				other.vector_count(),
				other.vector_length(),
			))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn table_with(rows: &[&[&str]]) -> Rc<Table> {
		let height = rows.len();
		let width = rows[0].len();
		let mut cell_types = Vec::new();
		let mut numeric = Vec::new();
		let mut text = Vec::new();
		for row in rows {
			let mut t_row = Vec::new();
			let mut n_row = Vec::new();
			let mut s_row = Vec::new();
			for cell in *row {
				let ty = CellType::detect(cell);
				t_row.push(ty);
				match ty {
					Some(CellType::String) => {
						n_row.push(f64::NAN);
						s_row.push(Some((*cell).to_string()));
					}
					Some(t) => {
						n_row.push(crate::types::cast_numeric(t, cell));
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
		Rc::new(
			Table::new(
				"T",
				Range::new(0, 0, width, height),
				cell_types,
				numeric,
				text,
				None,
			)
			.unwrap(),
		)
	}

	#[test]
	fn sub_block_is_memoised_and_relative() {
		let table = table_with(&[&["1", "2", "3"], &["4", "5", "6"]]);
		let block = Block::new(Rc::clone(&table), Range::new(0, 0, 3, 2), Orientation::Vertical);
		let a = block.sub_block(1, 1).unwrap();
		let b = block.sub_block(1, 1).unwrap();
		assert_eq!(a, b);
		assert_eq!(a.vector_numeric(), vec![2.0, 5.0]);
	}

	#[test]
	fn is_subgroup_and_overlap() {
		let table = table_with(&[&["1", "2", "3"], &["4", "5", "6"]]);
		let whole = Block::new(Rc::clone(&table), Range::new(0, 0, 3, 2), Orientation::Vertical);
		let part = whole.sub_block(0, 2).unwrap();
		assert!(whole.is_subgroup(&part));
		assert!(whole.overlaps_with(&part));
	}

	#[test]
	fn dominant_type_joins_mixed_numeric_columns() {
		let table = table_with(&[&["1", "2.5"], &["4", "5.5"]]);
		let block = Block::new(Rc::clone(&table), Range::new(0, 0, 2, 2), Orientation::Horizontal);
		assert_eq!(block.dominant_type(), CellType::Numeric);
		assert!(block.admits(&[CellType::Int, CellType::Float]));
		assert!(!block.admits(&[CellType::Int]));
	}
}
