//! `tacle`: schema-free discovery of structural and arithmetic constraints
//! (sums, foreign keys, lookups, series, ranks, …) over a grid of typed
//! cells (spec.md §1 PURPOSE & SCOPE).
//!
//! The crate root exposes a small façade over the engine's pipeline:
//! ingest raw cells into [`Table`]s, hand them to the [`orchestrator`],
//! and read back the accepted [`ConstraintInstance`]s.

pub mod assignment;
pub mod block;
pub mod catalogue;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod ingest;
pub mod instance;
pub mod operation;
pub mod orchestrator;
pub mod solutions;
pub mod source;
pub mod table;
pub mod template;
pub mod types;
pub mod validate;
pub mod variable;

use std::path::Path;
use std::rc::Rc;

pub use block::{Block, Orientation};
pub use error::{CatalogError, GridError, TacleError};
pub use geometry::Range;
pub use instance::ConstraintInstance;
pub use operation::Operation;
pub use solutions::SolutionsStore;
pub use table::Table;
pub use types::CellType;
pub use variable::Variable;

/// Detect table rectangles in a bare grid of cell text (spec.md §7).
pub fn ranges_from_cells(cells: &[Vec<String>]) -> Vec<Range> {
	ingest::detect_table_ranges(cells)
}

/// Detect and build typed [`Table`]s from a bare grid of cell text.
pub fn tables_from_cells(cells: &[Vec<String>]) -> Result<Vec<Rc<Table>>, TacleError> {
	let ranges = ranges_from_cells(cells);
	ingest::build_tables(cells, &ranges)
}

/// Learn every constraint the catalogue finds over a bare grid of cell
/// text: detect tables, then run the full template catalogue.
pub fn learn_from_cells(cells: &[Vec<String>]) -> Result<SolutionsStore, TacleError> {
	let tables = tables_from_cells(cells)?;
	Ok(orchestrator::learn(&tables)?)
}

/// Learn every constraint the catalogue finds over a CSV file on disk.
pub fn learn_from_csv(path: impl AsRef<Path>) -> Result<SolutionsStore, TacleError> {
	let cells = ingest::read_csv(path)?;
	learn_from_cells(&cells)
}

/// Filter a learned [`SolutionsStore`] down to instances whose rendered
/// print format matches a shell-style glob pattern (`*`, `?`), e.g.
/// `"sum(*)"` or `"Table1!*"` — a small hand-rolled matcher rather than a
/// regex dependency, since the vocabulary is limited to these two wildcard
/// characters (spec.md §7 "filter_constraints").
pub fn filter_constraints<'a>(
	store: &'a SolutionsStore,
	templates: &'a [template::Template],
	pattern: &str,
) -> Vec<(&'a ConstraintInstance, String)> {
	let mut out = Vec::new();
	for template in templates {
		for instance in store.solutions_for(template.name()) {
			let rendered = template.format(instance);
			if glob_match(pattern, &rendered) {
				out.push((instance, rendered));
			}
		}
	}
	out
}

/// A minimal shell-style glob matcher supporting `*` (any run of
/// characters) and `?` (any single character), with no character classes.
fn glob_match(pattern: &str, text: &str) -> bool {
	let pattern: Vec<char> = pattern.chars().collect();
	let text: Vec<char> = text.chars().collect();
	let mut dp = vec![vec![false; text.len() + 1]; pattern.len() + 1];
	dp[0][0] = true;
	for i in 1..=pattern.len() {
		if pattern[i - 1] == '*' {
			dp[i][0] = dp[i - 1][0];
		}
	}
	for i in 1..=pattern.len() {
		for j in 1..=text.len() {
			dp[i][j] = match pattern[i - 1] {
				'*' => dp[i - 1][j] || dp[i][j - 1],
				'?' => dp[i - 1][j - 1],
				c => dp[i - 1][j - 1] && c == text[j - 1],
			};
		}
	}
	dp[pattern.len()][text.len()]
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn glob_matches_star_and_question_mark() {
		assert!(glob_match("sum(*)", "sum(Table1!(0,0-1,3))"));
		assert!(glob_match("Table?!*", "Table1!(0,0-2,2)"));
		assert!(!glob_match("Table?!*", "Table12!(0,0-2,2)"));
	}

	#[test]
	fn learn_from_cells_finds_a_series() {
		let cells: Vec<Vec<String>> = vec![
			vec!["1".into()],
			vec!["2".into()],
			vec!["3".into()],
			vec!["4".into()],
		];
		let store = learn_from_cells(&cells).unwrap();
		assert!(!store.solutions_for("series").is_empty());
	}
}
