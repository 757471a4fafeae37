//! The assignment CSP: a small backtracking solver that binds each
//! template's variables to candidate blocks, pruned by admissible type,
//! orientation and the template's filter (spec.md §9 "Assignment CSP").

use std::collections::HashMap;

use crate::block::{Block, Orientation};
use crate::filter::Filter;
use crate::table::Table;
use crate::variable::Variable;

/// A binding of variable name to the block assigned to it.
pub type Assignment = HashMap<&'static str, Block>;

/// All single-vector and whole-block candidates within `tables` that a
/// variable could possibly bind to, ignoring filters (the per-variable
/// domain, before cross-variable pruning).
fn candidates(variable: &Variable, tables: &[std::rc::Rc<Table>]) -> Vec<Block> {
	let mut out = Vec::new();
	for table in tables {
		for orientation in [Orientation::Vertical, Orientation::Horizontal] {
			let whole = Block::new(
				std::rc::Rc::clone(table),
				crate::geometry::Range::new(0, 0, table.columns(), table.rows()),
				orientation,
			);
			if variable.is_vector() {
				for v in whole.vectors() {
					if v.admits(variable.types()) {
						out.push(v);
					}
				}
			} else {
				for count in 1..=whole.vector_count() {
					for index in 0..=(whole.vector_count() - count) {
						if let Some(sub) = whole.sub_block(index, count) {
							if sub.admits(variable.types()) {
								out.push(sub);
							}
						}
					}
				}
			}
		}
	}
	out
}

/// Enumerate every assignment of `variables` to blocks of `tables` that
/// satisfies `filter`, via straightforward backtracking. The search space
/// is small in practice (template arity is at most five, per spec.md §9),
/// so no constraint propagation beyond per-variable domain pruning and
/// "test the filter as soon as its variables are all bound" is needed.
pub fn solve(variables: &[Variable], tables: &[std::rc::Rc<Table>], filter: &Filter) -> Vec<Assignment> {
	let domains: Vec<Vec<Block>> = variables.iter().map(|v| candidates(v, tables)).collect();
	let mut solutions = Vec::new();
	let mut current = Assignment::new();
	backtrack(variables, &domains, filter, 0, &mut current, &mut solutions);
	solutions
}

fn backtrack(
	variables: &[Variable],
	domains: &[Vec<Block>],
	filter: &Filter,
	index: usize,
	current: &mut Assignment,
	solutions: &mut Vec<Assignment>,
) {
	if index == variables.len() {
		if filter.test(current) {
			solutions.push(current.clone());
		}
		return;
	}
	let name = variables[index].name();
	for candidate in &domains[index] {
		current.insert(name, candidate.clone());
		if partial_filter_ok(filter, current) {
			backtrack(variables, domains, filter, index + 1, current, solutions);
		}
		current.remove(name);
	}
}

/// Whether `filter` can already be evaluated (all its variables bound) and,
/// if so, whether it passes — used to prune mid-search rather than only at
/// a complete assignment.
fn partial_filter_ok(filter: &Filter, current: &Assignment) -> bool {
	if filter.variables().iter().all(|v| current.contains_key(v)) {
		filter.test(current)
	} else {
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::{cast_numeric, CellType};

	fn table(name: &str, rows: &[&[&str]]) -> std::rc::Rc<Table> {
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
						n_row.push(cast_numeric(t, cell));
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
		std::rc::Rc::new(
			Table::new(
				name,
				crate::geometry::Range::new(0, 0, width, height),
				cell_types,
				numeric,
				text,
				None,
			)
			.unwrap(),
		)
	}

	#[test]
	fn solve_enumerates_vector_candidates() {
		let t = table("T", &[&["1", "2"], &["3", "4"]]);
		let vars = vec![Variable::vector("x", crate::variable::numeric_types())];
		let solutions = solve(&vars, &[t], &Filter::NoFilter);
		// 2 vertical + 2 horizontal single-vector candidates.
		assert_eq!(solutions.len(), 4);
	}

	#[test]
	fn solve_prunes_with_same_length_filter() {
		let t = table("T", &[&["1", "2", "3"], &["4", "5", "6"]]);
		let vars = vec![
			Variable::vector("x", crate::variable::numeric_types()),
			Variable::vector("y", crate::variable::numeric_types()),
		];
		let filter = Filter::SameLength(vec!["x", "y"]);
		let solutions = solve(&vars, &[t], &filter);
		assert!(solutions.iter().all(|a| a["x"].length() == a["y"].length()));
		assert!(!solutions.is_empty());
	}
}
