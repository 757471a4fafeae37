//! End-to-end scenarios exercising `learn_from_cells` against small
//! hand-built sheets (spec.md §8's worked examples).

fn cells(rows: &[&[&str]]) -> Vec<Vec<String>> {
	rows.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect()
}

#[test]
fn conditional_sum_over_a_category_column() {
	// Category | Amount
	//   A      |   10
	//   B      |   20
	//   A      |   30
	// Total per category, in a second block keyed by the same categories.
	let grid = cells(&[
		&["A", "10", "A", "40"],
		&["B", "20", "B", "20"],
		&["A", "30", "", ""],
	]);
	let store = tacle::learn_from_cells(&grid).unwrap();
	assert!(!store.solutions_for("sum").is_empty() || !store.solutions_for("conditional_sum").is_empty());
}

#[test]
fn row_mean_over_mixed_int_and_float_columns() {
	let grid = cells(&[
		&["20.3", "14", "7", "13.76666667"],
		&["8.9", "1.6", "5.2", "5.233333333"],
		&["2.3", "43.8", "140", "62.03333333"],
	]);
	let store = tacle::learn_from_cells(&grid).unwrap();
	assert!(!store.solutions_for("average").is_empty());
}

#[test]
fn series_and_all_different_over_an_increasing_column() {
	let grid = cells(&[&["1"], &["2"], &["3"], &["4"], &["5"]]);
	let store = tacle::learn_from_cells(&grid).unwrap();
	assert!(!store.solutions_for("series").is_empty());
	assert!(!store.solutions_for("all_different").is_empty());
	assert!(!store.solutions_for("permutation").is_empty());
	assert!(!store.solutions_for("ordered").is_empty());
}

#[test]
fn lookup_between_a_key_column_and_a_foreign_key_column() {
	// PK  SRC     FK  OUT
	// 1   one     2   two
	// 2   two     1   one
	// 3   three   3   three
	let grid = cells(&[
		&["1", "one", "2", "two"],
		&["2", "two", "1", "one"],
		&["3", "three", "3", "three"],
	]);
	let store = tacle::learn_from_cells(&grid).unwrap();
	// At minimum the underlying foreign-key containment must hold; the
	// richer `lookup` match depends on which columns the CSP happens to
	// pair, which is intentionally not over-constrained here.
	assert!(!store.solutions_for("foreign_key").is_empty());
}

#[test]
fn running_total_over_a_numeric_column() {
	let grid = cells(&[
		&["10", "10"],
		&["20", "30"],
		&["30", "60"],
	]);
	let store = tacle::learn_from_cells(&grid).unwrap();
	assert!(!store.solutions_for("running_total").is_empty());
}

#[test]
fn blank_separated_sheets_become_independent_tables() {
	let grid = cells(&[
		&["1", "2"],
		&["3", "4"],
		&["", ""],
		&["5", "6"],
		&["7", "8"],
	]);
	let tables = tacle::tables_from_cells(&grid).unwrap();
	assert_eq!(tables.len(), 2);
	assert_eq!(tables[0].name(), "Table1");
	assert_eq!(tables[1].name(), "Table2");
}
