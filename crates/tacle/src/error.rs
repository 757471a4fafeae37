//! Error types produced while ingesting a sheet or learning its constraints.

use thiserror::Error;

/// Errors raised while turning raw input into the `cells`/`type-grid`
/// preprocessing stage accepts, before the core engine ever runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
	/// The sheet contained no rows at all.
	#[error("the input sheet is empty")]
	EmptySheet,
	/// A row did not have the same number of columns as the widest row.
	#[error("row {row} has {found} columns, expected {expected}")]
	JaggedRow {
		/// Index of the offending row.
		row: usize,
		/// Number of columns the row actually has.
		found: usize,
		/// Number of columns every row is expected to have.
		expected: usize,
	},
	/// A `Table`'s backing data did not match the dimensions of its range.
	#[error("table data is {data_rows}x{data_cols}, but its range is {range_rows}x{range_cols}")]
	RangeDataMismatch {
		/// Row count of the supplied data.
		data_rows: usize,
		/// Column count of the supplied data.
		data_cols: usize,
		/// Row count declared by the range.
		range_rows: usize,
		/// Column count declared by the range.
		range_cols: usize,
	},
	/// A string did not match `"vertical"` or `"horizontal"`.
	#[error("invalid orientation string: {0:?}")]
	InvalidOrientation(String),
}

/// Errors raised when the template catalogue itself is malformed.
///
/// These are programmer errors: they indicate a bug in the catalogue
/// construction, not a problem with input data, and are therefore fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
	/// A variable was declared with no admissible cell types.
	#[error("variable {0:?} has an empty admissible type set")]
	EmptyTypeSet(String),
	/// A filter referenced a variable name not declared by its template.
	#[error("template {template:?} has a filter referencing unknown variable {variable:?}")]
	UnknownFilterVariable {
		/// Name of the template whose filter is at fault.
		template: String,
		/// The offending variable name.
		variable: String,
	},
	/// The `depends_on` relation between templates contains a cycle.
	#[error("dependency cycle detected amongst templates: {0:?}")]
	DependencyCycle(Vec<String>),
}

/// Top level error type for the façade functions in the crate root.
#[derive(Error, Debug)]
pub enum TacleError {
	/// The input sheet was malformed.
	#[error(transparent)]
	Grid(#[from] GridError),
	/// The template catalogue was malformed (a programmer error).
	#[error(transparent)]
	Catalog(#[from] CatalogError),
	/// Failure while reading a CSV file from disk.
	#[error("failed to read CSV input: {0}")]
	Csv(#[from] csv::Error),
	/// Failure while opening the input file.
	#[error("failed to open input: {0}")]
	Io(#[from] std::io::Error),
}
