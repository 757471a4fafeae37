//! Per-template semantic predicates (spec.md §4.6), mirroring the
//! original's `InternalSolvingStrategy` implementations as plain functions
//! keyed into each [`crate::template::Template`] by name.

use crate::instance::ConstraintInstance;
use crate::operation::Operation;
use crate::solutions::SolutionsStore;

/// Floating point tolerance used throughout validation, matching the
/// original's epsilon for comparing aggregated/derived values.
const EPSILON: f64 = 1e-10;

/// Whether two values are equal within [`EPSILON`], with `NaN == NaN`
/// (both blank) also counting as equal.
pub fn equal(a: f64, b: f64) -> bool {
	if a.is_nan() && b.is_nan() {
		return true;
	}
	(a - b).abs() < EPSILON
}

/// Round away float noise introduced by repeated aggregation, to the
/// precision `EPSILON` can still resolve.
pub fn smart_round(x: f64) -> f64 {
	(x / EPSILON).round() * EPSILON
}

/// The longest contiguous run of `true` in `matches`, as `(start, length)`.
/// Used by the foreign-key/lookup validators to tolerate a candidate block
/// being larger than the actual correspondence (spec.md §4.6 "MaxRange").
pub fn max_range(matches: &[bool]) -> (usize, usize) {
	let mut best = (0, 0);
	let mut start = 0;
	let mut run = 0;
	for (i, m) in matches.iter().enumerate() {
		if *m {
			if run == 0 {
				start = i;
			}
			run += 1;
			if run > best.1 {
				best = (start, run);
			}
		} else {
			run = 0;
		}
	}
	best
}

/// Whether `data` is monotonic (non-decreasing or non-increasing),
/// ignoring blanks.
pub fn is_ordered(data: &[f64]) -> bool {
	let present: Vec<f64> = data.iter().copied().filter(|v| !v.is_nan()).collect();
	if present.len() < 2 {
		return true;
	}
	let non_decreasing = present.windows(2).all(|w| w[0] <= w[1]);
	let non_increasing = present.windows(2).all(|w| w[0] >= w[1]);
	non_decreasing || non_increasing
}

/// Dense descending rank of `value` within `data` (1 = largest), ignoring
/// blanks, matching a spreadsheet `RANK` with ties sharing the smaller
/// rank.
fn dense_rank(data: &[f64], value: f64) -> f64 {
	(data.iter().filter(|v| !v.is_nan() && **v > value).count() + 1) as f64
}

/// `Equal`: two same-length vectors with identical values position-wise.
pub fn equal_vectors(instance: &ConstraintInstance, _solutions: &SolutionsStore) -> bool {
	let x = instance.get("X").unwrap().vector_numeric();
	let y = instance.get("Y").unwrap().vector_numeric();
	x.len() == y.len() && x.iter().zip(&y).all(|(a, b)| equal(*a, *b))
}

/// `AllDifferent`: every non-blank value in a vector is distinct.
pub fn all_different(instance: &ConstraintInstance, _solutions: &SolutionsStore) -> bool {
	let data = instance.get("X").unwrap().vector_numeric();
	let present: Vec<f64> = data.into_iter().filter(|v| !v.is_nan()).collect();
	for i in 0..present.len() {
		for j in (i + 1)..present.len() {
			if equal(present[i], present[j]) {
				return false;
			}
		}
	}
	true
}

/// `Permutation`: a vector of length n containing every integer `1..=n`
/// exactly once.
pub fn permutation(instance: &ConstraintInstance, _solutions: &SolutionsStore) -> bool {
	let mut data: Vec<f64> = instance.get("X").unwrap().vector_numeric();
	if data.iter().any(|v| v.is_nan()) {
		return false;
	}
	data.sort_by(|a, b| a.partial_cmp(b).unwrap());
	data.iter()
		.enumerate()
		.all(|(i, v)| equal(*v, (i + 1) as f64))
}

/// `Series`: an arithmetic sequence with a nonzero constant step.
pub fn series(instance: &ConstraintInstance, _solutions: &SolutionsStore) -> bool {
	let data = instance.get("X").unwrap().vector_numeric();
	let present: Vec<f64> = data.into_iter().filter(|v| !v.is_nan()).collect();
	if present.len() < 2 {
		return false;
	}
	let step = present[1] - present[0];
	if step == 0.0 {
		return false;
	}
	present.windows(2).all(|w| equal(w[1] - w[0], step))
}

/// `Ordered`: a monotonic (ascending or descending) vector.
pub fn ordered(instance: &ConstraintInstance, _solutions: &SolutionsStore) -> bool {
	is_ordered(&instance.get("X").unwrap().vector_numeric())
}

/// `Rank`: `R[i]` is the dense descending rank of `X[i]`.
pub fn rank(instance: &ConstraintInstance, _solutions: &SolutionsStore) -> bool {
	let x = instance.get("X").unwrap().vector_numeric();
	let r = instance.get("R").unwrap().vector_numeric();
	x.len() == r.len()
		&& x.iter()
			.zip(&r)
			.all(|(v, rk)| v.is_nan() == rk.is_nan() && (v.is_nan() || equal(dense_rank(&x, *v), *rk)))
}

/// `RunningTotal`: `Y[i]` is the running sum of `X[0..=i]`.
pub fn running_total(instance: &ConstraintInstance, _solutions: &SolutionsStore) -> bool {
	let x = instance.get("X").unwrap().vector_numeric();
	let y = instance.get("Y").unwrap().vector_numeric();
	if x.len() != y.len() {
		return false;
	}
	let mut total = 0.0;
	for (xi, yi) in x.iter().zip(&y) {
		if xi.is_nan() || yi.is_nan() {
			return false;
		}
		total += xi;
		if !equal(total, *yi) {
			return false;
		}
	}
	true
}

/// `ForeignKey`: every non-blank value of the foreign-key vector occurs at
/// least once in the primary-key vector.
pub fn foreign_key(instance: &ConstraintInstance, _solutions: &SolutionsStore) -> bool {
	let fk = instance.get("FK").unwrap().vector_numeric();
	let pk = instance.get("PK").unwrap().vector_numeric();
	fk.iter()
		.filter(|v| !v.is_nan())
		.all(|v| pk.iter().any(|p| equal(*v, *p)))
}

/// `Lookup`: for each row where `FK[i]` matches some `PK[j]`, the output
/// column agrees: `OUT[i] == SRC[j]`.
pub fn lookup(instance: &ConstraintInstance, _solutions: &SolutionsStore) -> bool {
	let fk = instance.get("FK").unwrap().vector_numeric();
	let pk = instance.get("PK").unwrap().vector_numeric();
	let out = instance.get("OUT").unwrap().vector_numeric();
	let src = instance.get("SRC").unwrap().vector_numeric();
	if fk.len() != out.len() || pk.len() != src.len() {
		return false;
	}
	for (key, expected) in fk.iter().zip(&out) {
		if key.is_nan() {
			continue;
		}
		let Some(found) = pk.iter().position(|p| equal(*p, *key)) else {
			return false;
		};
		if !equal(src[found], *expected) {
			return false;
		}
	}
	true
}

/// `FuzzyLookup`: like [`lookup`], but matches the greatest `PK` value
/// `<= FK[i]` (an approximate, not exact, key match) and rejects instances
/// where an exact match exists (that is [`lookup`]'s job).
pub fn fuzzy_lookup(instance: &ConstraintInstance, _solutions: &SolutionsStore) -> bool {
	let fk = instance.get("FK").unwrap().vector_numeric();
	let pk = instance.get("PK").unwrap().vector_numeric();
	let out = instance.get("OUT").unwrap().vector_numeric();
	let src = instance.get("SRC").unwrap().vector_numeric();
	if fk.len() != out.len() || pk.len() != src.len() {
		return false;
	}
	let mut any_inexact = false;
	for (key, expected) in fk.iter().zip(&out) {
		if key.is_nan() {
			continue;
		}
		let candidate = pk
			.iter()
			.enumerate()
			.filter(|(_, p)| **p <= *key)
			.max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap());
		let Some((idx, matched)) = candidate else {
			return false;
		};
		if !equal(*matched, *key) {
			any_inexact = true;
		}
		if !equal(src[idx], *expected) {
			return false;
		}
	}
	any_inexact
}

/// `ConditionalAggregate`: `OUT[j] = op(VALUES[i] for i where COND1[i] ==
/// COND2[j])`, parametrised by `operation`. Rejected outright if the same
/// `(COND1, COND2)` key relationship, or the same `(OUT, VALUES)` one, is
/// already reported as a plain `ForeignKey`, or if a `Lookup` already
/// reports the identical `COND1`/`VALUES`/`OUT`/`COND2` correspondence —
/// in either case the aggregate adds nothing over the stronger finding
/// already in the store.
pub fn conditional_aggregate(instance: &ConstraintInstance, solutions: &SolutionsStore) -> bool {
	let op = instance.operation().expect("conditional_aggregate is operation-parametrised");
	let values = instance.get("VALUES").unwrap().vector_numeric();
	let cond1 = instance.get("COND1").unwrap().vector_numeric();
	let cond2 = instance.get("COND2").unwrap().vector_numeric();
	let out = instance.get("OUT").unwrap().vector_numeric();
	if cond2.len() != out.len() || values.len() != cond1.len() {
		return false;
	}
	if subsumed_by_foreign_key(instance, solutions, "COND1", "COND2")
		|| subsumed_by_foreign_key(instance, solutions, "OUT", "VALUES")
		|| subsumed_by_lookup(instance, solutions)
	{
		return false;
	}
	for (key, expected) in cond2.iter().zip(&out) {
		let matching: Vec<f64> = cond1
			.iter()
			.zip(&values)
			.filter(|(c, _)| equal(**c, *key))
			.map(|(_, v)| *v)
			.collect();
		if !equal(smart_round(op.aggregate(&matching)), smart_round(*expected)) {
			return false;
		}
	}
	true
}

/// Whether a `ForeignKey(FK = instance[fk_var], PK = instance[pk_var])`
/// instance is already in the store.
fn subsumed_by_foreign_key(
	instance: &ConstraintInstance,
	solutions: &SolutionsStore,
	fk_var: &str,
	pk_var: &str,
) -> bool {
	let fk = instance.get(fk_var).unwrap();
	let pk = instance.get(pk_var).unwrap();
	solutions
		.solutions_for("foreign_key")
		.iter()
		.any(|prior| prior.get("FK") == Some(fk) && prior.get("PK") == Some(pk))
}

/// Whether a `Lookup` already reports the identical key/value
/// correspondence this `ConditionalAggregate` candidate would establish:
/// `Lookup { FK = COND1, PK = OUT, OUT = COND2, SRC = VALUES }`.
fn subsumed_by_lookup(instance: &ConstraintInstance, solutions: &SolutionsStore) -> bool {
	let cond1 = instance.get("COND1").unwrap();
	let cond2 = instance.get("COND2").unwrap();
	let values = instance.get("VALUES").unwrap();
	let out = instance.get("OUT").unwrap();
	solutions.solutions_for("lookup").iter().any(|prior| {
		prior.get("FK") == Some(cond1)
			&& prior.get("PK") == Some(out)
			&& prior.get("OUT") == Some(cond2)
			&& prior.get("SRC") == Some(values)
	})
}

/// `Aggregate`: `OUT[i] = op(BLOCK's i-th vector)`, parametrised by
/// `operation`, along whichever orientation the block and output share.
pub fn aggregate(instance: &ConstraintInstance, _solutions: &SolutionsStore) -> bool {
	let op = instance.operation().expect("aggregate is operation-parametrised");
	let block = instance.get("X").unwrap();
	let out = instance.get("OUT").unwrap().vector_numeric();
	if block.vector_count() != out.len() {
		return false;
	}
	block.vectors().zip(&out).all(|(vector, expected)| {
		equal(smart_round(op.aggregate(&vector.vector_numeric())), smart_round(*expected))
	})
}

/// `ForeignOperation`: `OUT[j] = op(A[i], B[j])` across a foreign-keyed
/// pair, parametrised by `operation`.
pub fn foreign_operation(instance: &ConstraintInstance, _solutions: &SolutionsStore) -> bool {
	let op = instance.operation().expect("foreign_operation is operation-parametrised");
	let fk = instance.get("FK").unwrap().vector_numeric();
	let pk = instance.get("PK").unwrap().vector_numeric();
	let a = instance.get("A").unwrap().vector_numeric();
	let out = instance.get("OUT").unwrap().vector_numeric();
	if fk.len() != out.len() || pk.len() != a.len() {
		return false;
	}
	for ((key, expected), a_val) in fk.iter().zip(&out).zip(&a) {
		let Some(found) = pk.iter().position(|p| equal(*p, *key)) else {
			return false;
		};
		if !equal(op.combine(a[found], *a_val), *expected) {
			return false;
		}
	}
	true
}

/// `Product`: `Z[i] = X[i] * Y[i]`.
pub fn product(instance: &ConstraintInstance, _solutions: &SolutionsStore) -> bool {
	elementwise(instance, |x, y| x * y)
}

/// `Diff`: `Z[i] = X[i] - Y[i]`.
pub fn diff(instance: &ConstraintInstance, _solutions: &SolutionsStore) -> bool {
	elementwise(instance, |x, y| x - y)
}

/// `PercentualDiff`: `Z[i] = (X[i] - Y[i]) / Y[i]`.
pub fn percentual_diff(instance: &ConstraintInstance, _solutions: &SolutionsStore) -> bool {
	elementwise(instance, |x, y| (x - y) / y)
}

fn elementwise(instance: &ConstraintInstance, f: impl Fn(f64, f64) -> f64) -> bool {
	let x = instance.get("X").unwrap().vector_numeric();
	let y = instance.get("Y").unwrap().vector_numeric();
	let z = instance.get("Z").unwrap().vector_numeric();
	x.len() == y.len()
		&& y.len() == z.len()
		&& x.iter().zip(&y).zip(&z).all(|((xi, yi), zi)| equal(f(*xi, *yi), *zi))
}

/// `SumProduct`: `OUT = sum(X[i] * Y[i])`.
pub fn sum_product(instance: &ConstraintInstance, _solutions: &SolutionsStore) -> bool {
	let x = instance.get("X").unwrap().vector_numeric();
	let y = instance.get("Y").unwrap().vector_numeric();
	let out = instance.get("OUT").unwrap().vector_numeric();
	if x.len() != y.len() || out.len() != 1 {
		return false;
	}
	let total: f64 = x.iter().zip(&y).map(|(a, b)| a * b).sum();
	equal(smart_round(total), smart_round(out[0]))
}

/// `Projection`: every value of `X` occurs somewhere in `Y` (a one-way
/// set-membership relation; structurally the same check as
/// [`foreign_key`], but over the `Projection` template's own `X`/`Y`
/// variable names).
pub fn projection(instance: &ConstraintInstance, _solutions: &SolutionsStore) -> bool {
	let x = instance.get("X").unwrap().vector_numeric();
	let y = instance.get("Y").unwrap().vector_numeric();
	x.iter().filter(|v| !v.is_nan()).all(|v| y.iter().any(|w| equal(*v, *w)))
}

/// `EqualGroup`: two same-shaped blocks with identical values cell-wise.
pub fn equal_group(instance: &ConstraintInstance, _solutions: &SolutionsStore) -> bool {
	let x = instance.get("X").unwrap().numeric_data();
	let y = instance.get("Y").unwrap().numeric_data();
	x.len() == y.len()
		&& x.iter().zip(&y).all(|(xr, yr)| {
			xr.len() == yr.len() && xr.iter().zip(yr).all(|(a, b)| equal(*a, *b))
		})
}

/// `MutualExclusivity`: at most one vector of the block is non-blank in
/// any given row/column.
pub fn mutual_exclusivity(instance: &ConstraintInstance, _solutions: &SolutionsStore) -> bool {
	let block = instance.get("X").unwrap();
	let length = block.vector_length();
	let vectors: Vec<Vec<f64>> = block.vectors().map(|v| v.vector_numeric()).collect();
	(0..length).all(|i| vectors.iter().filter(|v| !v[i].is_nan()).count() <= 1)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::assignment::Assignment;
	use crate::block::{Block, Orientation};
	use crate::geometry::Range;
	use crate::operation::Operation;
	use crate::table::Table;
	use crate::types::{cast_numeric, CellType};
	use std::rc::Rc;

	fn table(rows: &[&[&str]]) -> Rc<Table> {
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
		Rc::new(Table::new("T", Range::new(0, 0, width, height), cell_types, numeric, text, None).unwrap())
	}

	fn column(table: &Rc<Table>, col: usize, rows: usize) -> Block {
		Block::new(Rc::clone(table), Range::new(col, 0, 1, rows), Orientation::Vertical)
	}

	#[test]
	fn rank_rejects_a_mismatched_pair_instead_of_vacuously_accepting() {
		// Previously `v.is_nan() == rk.is_nan() || ...` always held (no
		// blanks survive the `NotPartial` filter), so any same-length pair
		// passed regardless of R's actual values.
		let t = table(&[&["30", "1"], &["10", "3"], &["20", "2"]]);
		let store = SolutionsStore::new();

		let mut correct = Assignment::new();
		correct.insert("X", column(&t, 0, 3));
		correct.insert("R", column(&t, 1, 3));
		let instance = ConstraintInstance::new("rank", None, &correct, &["X", "R"]);
		assert!(rank(&instance, &store));

		let t2 = table(&[&["30", "1"], &["10", "2"], &["20", "3"]]);
		let mut wrong = Assignment::new();
		wrong.insert("X", column(&t2, 0, 3));
		wrong.insert("R", column(&t2, 1, 3));
		let instance = ConstraintInstance::new("rank", None, &wrong, &["X", "R"]);
		assert!(!rank(&instance, &store));
	}

	#[test]
	fn conditional_aggregate_is_rejected_when_subsumed_by_a_prior_lookup() {
		// Lookup{FK=COND1, PK=OUT, OUT=COND2, SRC=VALUES} already reports the
		// identical key/value correspondence the aggregate would establish.
		let t = table(&[&["1", "10", "1", "10"], &["2", "20", "2", "20"]]);
		let mut lookup_assignment = Assignment::new();
		lookup_assignment.insert("FK", column(&t, 0, 2));
		lookup_assignment.insert("PK", column(&t, 3, 2));
		lookup_assignment.insert("OUT", column(&t, 2, 2));
		lookup_assignment.insert("SRC", column(&t, 1, 2));
		let lookup_instance = ConstraintInstance::new("lookup", None, &lookup_assignment, &["FK", "PK", "OUT", "SRC"]);
		let mut store = SolutionsStore::new();
		store.insert(lookup_instance);

		let mut ca_assignment = Assignment::new();
		ca_assignment.insert("VALUES", column(&t, 1, 2));
		ca_assignment.insert("COND1", column(&t, 0, 2));
		ca_assignment.insert("COND2", column(&t, 2, 2));
		ca_assignment.insert("OUT", column(&t, 3, 2));
		let ca_instance = ConstraintInstance::new(
			"conditional_sum",
			Some(Operation::Sum),
			&ca_assignment,
			&["VALUES", "COND1", "COND2", "OUT"],
		);
		assert!(!conditional_aggregate(&ca_instance, &store));
	}
}
