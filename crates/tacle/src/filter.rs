//! The filter algebra: primitive structural predicates over an assignment,
//! plus `Not`/`If`/`NoFilter` combinators, evaluated as a small AST rather
//! than through run-time subclassing (spec.md §9 "Filter algebra →
//! algebraic data type").

use std::fmt;
use std::rc::Rc;

use crate::assignment::Assignment;
use crate::block::Orientation;

/// A structural predicate over a (possibly partial) variable→block
/// assignment, used by the CSP to prune candidate tuples before a
/// template's semantic validator ever runs.
#[derive(Clone)]
pub enum Filter {
	/// Always satisfied.
	NoFilter,
	/// All referenced variables' blocks have equal `length()`.
	SameLength(Vec<&'static str>),
	/// All referenced variables' blocks belong to the same table.
	SameTable(Vec<&'static str>),
	/// All referenced variables' blocks share an orientation.
	SameOrientation(Vec<&'static str>),
	/// All referenced variables' blocks share a dominant type.
	SameType(Vec<&'static str>),
	/// Bounds on rows/columns/length/vector-count, `>=` by default or `<=`
	/// when `max_size` is set.
	Size {
		/// Variables the bound applies to.
		vars: Vec<&'static str>,
		/// Minimum (or maximum) row count.
		rows: Option<usize>,
		/// Minimum (or maximum) column count.
		cols: Option<usize>,
		/// Minimum (or maximum) vector length.
		length: Option<usize>,
		/// Minimum (or maximum) vector count.
		vectors: Option<usize>,
		/// Treat the bounds as maxima instead of minima.
		max_size: bool,
	},
	/// All referenced variables' blocks have the given orientation.
	HasOrientation {
		/// Variables the requirement applies to.
		vars: Vec<&'static str>,
		/// Required orientation.
		orientation: Orientation,
	},
	/// None of the referenced variables' blocks contain blanks.
	NotPartial(Vec<&'static str>),
	/// All referenced variables' blocks contain at least one blank.
	Partial(Vec<&'static str>),
	/// The first variable's block is not a (relative-range-containing)
	/// supergroup of the second's.
	NotSubgroup(&'static str, &'static str),
	/// No two of the referenced variables' blocks share a cell on the
	/// sheet (spec.md §3/§8 "Overlap-free").
	NotOverlapping(Vec<&'static str>),
	/// The first variable's block strictly precedes the second's under
	/// `Block`'s structural ordering, breaking the symmetry of templates
	/// whose variables are otherwise interchangeable (spec.md §4.3
	/// `ordered(O1<O2)`).
	Ordered(&'static str, &'static str),
	/// Conjunction of several filters.
	All(Vec<Filter>),
	/// Negation of another filter.
	Not(Box<Filter>),
	/// `if cond { then } else { else_ }`.
	If(Box<Filter>, Box<Filter>, Box<Filter>),
	/// An escape hatch for template-specific structural rules that do not
	/// fit the primitives above (e.g. `Aggregate`'s orientation/length
	/// matching rule, spec.md §4.3).
	Custom {
		/// Debug label.
		name: &'static str,
		/// Variables the closure inspects.
		vars: Vec<&'static str>,
		/// The predicate itself.
		test: Rc<dyn Fn(&Assignment) -> bool>,
	},
}

impl Filter {
	/// The variable names this filter (transitively) references.
	pub fn variables(&self) -> Vec<&'static str> {
		match self {
			Filter::NoFilter => Vec::new(),
			Filter::SameLength(v)
			| Filter::SameTable(v)
			| Filter::SameOrientation(v)
			| Filter::SameType(v)
			| Filter::NotPartial(v)
			| Filter::Partial(v) => v.clone(),
			Filter::Size { vars, .. } | Filter::HasOrientation { vars, .. } => vars.clone(),
			Filter::NotSubgroup(a, b) => vec![a, b],
			Filter::NotOverlapping(v) => v.clone(),
			Filter::Ordered(a, b) => vec![a, b],
			Filter::All(fs) => {
				let mut vars: Vec<&'static str> = fs.iter().flat_map(Filter::variables).collect();
				vars.sort_unstable();
				vars.dedup();
				vars
			}
			Filter::Not(f) => f.variables(),
			Filter::If(c, t, e) => {
				let mut vars = c.variables();
				vars.extend(t.variables());
				vars.extend(e.variables());
				vars.sort_unstable();
				vars.dedup();
				vars
			}
			Filter::Custom { vars, .. } => vars.clone(),
		}
	}

	/// Evaluate the filter against a (fully bound, for the variables this
	/// filter references) assignment.
	pub fn test(&self, assignment: &Assignment) -> bool {
		match self {
			Filter::NoFilter => true,
			Filter::SameLength(vars) => Self::all_equal(assignment, vars, |b| b.length()),
			Filter::SameTable(vars) => Self::all_equal(assignment, vars, |b| b.table().name().to_string()),
			Filter::SameOrientation(vars) => {
				Self::all_equal(assignment, vars, |b| format!("{:?}", b.orientation()))
			}
			Filter::SameType(vars) => Self::all_equal(assignment, vars, |b| format!("{}", b.dominant_type())),
			Filter::Size {
				vars,
				rows,
				cols,
				length,
				vectors,
				max_size,
			} => {
				let op = |x: usize, y: usize| if *max_size { x <= y } else { x >= y };
				vars.iter().all(|name| {
					let b = &assignment[*name];
					rows.map_or(true, |r| op(b.rows(), r))
						&& cols.map_or(true, |c| op(b.columns(), c))
						&& length.map_or(true, |l| op(b.length(), l))
						&& vectors.map_or(true, |v| op(b.vector_count(), v))
				})
			}
			Filter::HasOrientation { vars, orientation } => {
				vars.iter().all(|name| assignment[*name].orientation() == *orientation)
			}
			Filter::NotPartial(vars) => vars.iter().all(|name| !assignment[*name].is_partial()),
			Filter::Partial(vars) => vars.iter().all(|name| assignment[*name].is_partial()),
			Filter::NotSubgroup(a, b) => !assignment[*a].is_subgroup(&assignment[*b]),
			Filter::NotOverlapping(vars) => vars
				.iter()
				.enumerate()
				.all(|(i, a)| vars[i + 1..].iter().all(|b| !assignment[*a].overlaps_with(&assignment[*b]))),
			Filter::Ordered(a, b) => assignment[*a] < assignment[*b],
			Filter::All(fs) => fs.iter().all(|f| f.test(assignment)),
			Filter::Not(f) => !f.test(assignment),
			Filter::If(c, t, e) => {
				if c.test(assignment) {
					t.test(assignment)
				} else {
					e.test(assignment)
				}
			}
			Filter::Custom { test, .. } => test(assignment),
		}
	}

	/// Shared helper for the `Same*` family: every referenced variable's
	/// block must map to the same key under `key_of`.
	fn all_equal<K: PartialEq>(
		assignment: &Assignment,
		vars: &[&'static str],
		key_of: impl Fn(&crate::block::Block) -> K,
	) -> bool {
		let mut keys = vars.iter().map(|name| key_of(&assignment[*name]));
		let Some(first) = keys.next() else {
			return true;
		};
		keys.all(|k| k == first)
	}
}

impl fmt::Debug for Filter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Filter::NoFilter => write!(f, "NoFilter"),
			Filter::SameLength(v) => write!(f, "SameLength({v:?})"),
			Filter::SameTable(v) => write!(f, "SameTable({v:?})"),
			Filter::SameOrientation(v) => write!(f, "SameOrientation({v:?})"),
			Filter::SameType(v) => write!(f, "SameType({v:?})"),
			Filter::Size { vars, .. } => write!(f, "Size({vars:?})"),
			Filter::HasOrientation { vars, orientation } => {
				write!(f, "HasOrientation({vars:?}, {orientation:?})")
			}
			Filter::NotPartial(v) => write!(f, "NotPartial({v:?})"),
			Filter::Partial(v) => write!(f, "Partial({v:?})"),
			Filter::NotSubgroup(a, b) => write!(f, "NotSubgroup({a}, {b})"),
			Filter::NotOverlapping(v) => write!(f, "NotOverlapping({v:?})"),
			Filter::Ordered(a, b) => write!(f, "Ordered({a}, {b})"),
			Filter::All(fs) => write!(f, "All({fs:?})"),
			Filter::Not(inner) => write!(f, "Not({inner:?})"),
			Filter::If(c, t, e) => write!(f, "If({c:?}, {t:?}, {e:?})"),
			Filter::Custom { name, .. } => write!(f, "Custom({name})"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::geometry::Range;
	use crate::table::Table;
	use crate::types::CellType;
	use std::rc::Rc;

	fn table() -> Rc<Table> {
		Rc::new(
			Table::new(
				"T",
				Range::new(0, 0, 2, 2),
				vec![vec![Some(CellType::Int); 2]; 2],
				vec![vec![1.0; 2]; 2],
				vec![vec![None; 2]; 2],
				None,
			)
			.unwrap(),
		)
	}

	#[test]
	fn not_overlapping_rejects_the_same_column_bound_twice() {
		let t = table();
		let col0 = crate::block::Block::new(Rc::clone(&t), Range::new(0, 0, 1, 2), Orientation::Vertical);
		let col1 = crate::block::Block::new(Rc::clone(&t), Range::new(1, 0, 1, 2), Orientation::Vertical);

		let mut same = Assignment::new();
		same.insert("X", col0.clone());
		same.insert("Y", col0.clone());
		assert!(!Filter::NotOverlapping(vec!["X", "Y"]).test(&same));

		let mut distinct = Assignment::new();
		distinct.insert("X", col0);
		distinct.insert("Y", col1);
		assert!(Filter::NotOverlapping(vec!["X", "Y"]).test(&distinct));
	}

	#[test]
	fn ordered_breaks_the_symmetry_of_an_interchangeable_pair() {
		let t = table();
		let col0 = crate::block::Block::new(Rc::clone(&t), Range::new(0, 0, 1, 2), Orientation::Vertical);
		let col1 = crate::block::Block::new(Rc::clone(&t), Range::new(1, 0, 1, 2), Orientation::Vertical);

		let mut forward = Assignment::new();
		forward.insert("X", col0.clone());
		forward.insert("Y", col1.clone());
		let mut backward = Assignment::new();
		backward.insert("X", col1);
		backward.insert("Y", col0);

		assert!(Filter::Ordered("X", "Y").test(&forward) != Filter::Ordered("X", "Y").test(&backward));
	}
}
