//! The fixed catalogue of constraint templates (spec.md §4.3), built once
//! at start-up as plain data rather than discovered via reflection.

use std::rc::Rc;

use crate::filter::Filter;
use crate::instance::ConstraintInstance;
use crate::operation::Operation;
use crate::source::Source;
use crate::template::Template;
use crate::variable::{any_type, discrete_types, integer_types, numeric_types, Variable};
use crate::validate;

fn free(filter: Filter) -> Source {
	Source::Free { filter }
}

fn same(vars: &[&'static str]) -> Filter {
	Filter::SameLength(vars.to_vec())
}

fn not_partial(vars: &[&'static str]) -> Filter {
	Filter::NotPartial(vars.to_vec())
}

fn all(filters: Vec<Filter>) -> Filter {
	Filter::All(filters)
}

/// No two of `vars` may share a cell on the sheet (spec.md §3/§8
/// "Overlap-free").
fn not_overlapping(vars: &[&'static str]) -> Filter {
	Filter::NotOverlapping(vars.to_vec())
}

/// Build the full, fixed set of templates. Operation-parametrised families
/// (`Aggregate`, `ConditionalAggregate`, `ForeignOperation`) expand into
/// one [`Template`] per [`Operation`], named after the operation, matching
/// the original's one-catalogue-entry-per-operation layout.
pub fn catalogue() -> Vec<Template> {
	let mut templates = Vec::new();

	templates.push(Template::new(
		"equal",
		vec![Variable::vector("X", any_type()), Variable::vector("Y", any_type())],
		free(all(vec![
			same(&["X", "Y"]),
			not_partial(&["X", "Y"]),
			not_overlapping(&["X", "Y"]),
			Filter::Ordered("X", "Y"),
		])),
		validate::equal_vectors,
		|i| format!("{} = {}", render(i, "X"), render(i, "Y")),
	));

	templates.push(Template::new(
		"equal_group",
		vec![
			Variable::block("X", any_type()),
			Variable::block("Y", any_type()),
		],
		free(all(vec![
			Filter::SameOrientation(vec!["X", "Y"]),
			same(&["X", "Y"]),
			Filter::Size {
				vars: vec!["X", "Y"],
				rows: None,
				cols: None,
				length: None,
				vectors: Some(2),
				max_size: false,
			},
			not_overlapping(&["X", "Y"]),
			Filter::Ordered("X", "Y"),
		])),
		validate::equal_group,
		|i| format!("{} = {}", render(i, "X"), render(i, "Y")),
	));

	templates.push(Template::new(
		"all_different",
		vec![Variable::vector("X", numeric_types())],
		free(not_partial(&["X"])),
		validate::all_different,
		|i| format!("all_different({})", render(i, "X")),
	));

	templates.push(Template::new(
		"permutation",
		vec![Variable::vector("X", integer_types())],
		free(not_partial(&["X"])),
		validate::permutation,
		|i| format!("permutation({})", render(i, "X")),
	));

	templates.push(Template::new(
		"series",
		vec![Variable::vector("X", numeric_types())],
		free(all(vec![
			not_partial(&["X"]),
			Filter::Size {
				vars: vec!["X"],
				rows: None,
				cols: None,
				length: Some(2),
				vectors: None,
				max_size: false,
			},
		])),
		validate::series,
		|i| format!("series({})", render(i, "X")),
	));

	templates.push(Template::new(
		"ordered",
		vec![Variable::vector("X", numeric_types())],
		free(not_partial(&["X"])),
		validate::ordered,
		|i| format!("ordered({})", render(i, "X")),
	));

	templates.push(Template::new(
		"rank",
		vec![
			Variable::vector("X", numeric_types()),
			Variable::vector("R", numeric_types()),
		],
		free(all(vec![
			Filter::SameTable(vec!["X", "R"]),
			same(&["X", "R"]),
			not_partial(&["X", "R"]),
			not_overlapping(&["X", "R"]),
		])),
		validate::rank,
		|i| format!("{} = rank({})", render(i, "R"), render(i, "X")),
	));

	templates.push(Template::new(
		"running_total",
		vec![
			Variable::vector("X", numeric_types()),
			Variable::vector("Y", numeric_types()),
		],
		free(all(vec![
			Filter::SameTable(vec!["X", "Y"]),
			same(&["X", "Y"]),
			not_partial(&["X", "Y"]),
			not_overlapping(&["X", "Y"]),
		])),
		validate::running_total,
		|i| format!("{} = running_total({})", render(i, "Y"), render(i, "X")),
	));

	templates.push(Template::new(
		"foreign_key",
		vec![
			Variable::vector("FK", discrete_types()),
			Variable::vector("PK", discrete_types()),
		],
		free(all(vec![
			not_partial(&["PK"]),
			Filter::NotSubgroup("PK", "FK"),
			not_overlapping(&["FK", "PK"]),
		])),
		validate::foreign_key,
		|i| format!("foreign_key({}, {})", render(i, "FK"), render(i, "PK")),
	));

	templates.push(Template::new(
		"projection",
		vec![
			Variable::vector("X", discrete_types()),
			Variable::vector("Y", discrete_types()),
		],
		free(all(vec![not_partial(&["Y"]), not_overlapping(&["X", "Y"])])),
		validate::projection,
		|i| format!("projection({}, {})", render(i, "X"), render(i, "Y")),
	));

	templates.push(Template::new(
		"lookup",
		vec![
			Variable::vector("FK", discrete_types()),
			Variable::vector("PK", discrete_types()),
			Variable::vector("OUT", any_type()),
			Variable::vector("SRC", any_type()),
		],
		free(all(vec![
			same(&["FK", "OUT"]),
			same(&["PK", "SRC"]),
			not_partial(&["PK"]),
			not_overlapping(&["FK", "PK", "OUT", "SRC"]),
		])),
		validate::lookup,
		|i| format!("{} = lookup({}, {}, {})", render(i, "OUT"), render(i, "FK"), render(i, "PK"), ),
	));

	templates.push(Template::new(
		"fuzzy_lookup",
		vec![
			Variable::vector("FK", numeric_types()),
			Variable::vector("PK", numeric_types()),
			Variable::vector("OUT", any_type()),
			Variable::vector("SRC", any_type()),
		],
		free(all(vec![
			same(&["FK", "OUT"]),
			same(&["PK", "SRC"]),
			not_partial(&["PK"]),
			not_overlapping(&["FK", "PK", "OUT", "SRC"]),
		])),
		validate::fuzzy_lookup,
		|i| format!("{} = fuzzy_lookup({}, {})", render(i, "OUT"), render(i, "FK"), render(i, "PK")),
	));

	templates.push(Template::new(
		"product",
		vec![
			Variable::vector("X", numeric_types()),
			Variable::vector("Y", numeric_types()),
			Variable::vector("Z", numeric_types()),
		],
		free(all(vec![
			Filter::SameTable(vec!["X", "Y", "Z"]),
			same(&["X", "Y"]),
			same(&["Y", "Z"]),
			not_overlapping(&["X", "Y", "Z"]),
			Filter::Ordered("X", "Y"),
		])),
		validate::product,
		|i| format!("{} = {} * {}", render(i, "Z"), render(i, "X"), render(i, "Y")),
	));

	templates.push(Template::new(
		"diff",
		vec![
			Variable::vector("X", numeric_types()),
			Variable::vector("Y", numeric_types()),
			Variable::vector("Z", numeric_types()),
		],
		free(all(vec![
			Filter::SameTable(vec!["X", "Y", "Z"]),
			same(&["X", "Y"]),
			same(&["Y", "Z"]),
			not_overlapping(&["X", "Y", "Z"]),
		])),
		validate::diff,
		|i| format!("{} = {} - {}", render(i, "Z"), render(i, "X"), render(i, "Y")),
	));

	templates.push(Template::new(
		"percentual_diff",
		vec![
			Variable::vector("X", numeric_types()),
			Variable::vector("Y", numeric_types()),
			Variable::vector("Z", numeric_types()),
		],
		free(all(vec![
			Filter::SameTable(vec!["X", "Y", "Z"]),
			same(&["X", "Y"]),
			same(&["Y", "Z"]),
			not_overlapping(&["X", "Y", "Z"]),
		])),
		validate::percentual_diff,
		|i| format!("{} = ({} - {}) / {}", render(i, "Z"), render(i, "X"), render(i, "Y"), render(i, "Y")),
	));

	templates.push(Template::new(
		"sum_product",
		vec![
			Variable::vector("X", numeric_types()),
			Variable::vector("Y", numeric_types()),
			Variable::vector("OUT", numeric_types()),
		],
		free(all(vec![
			same(&["X", "Y"]),
			Filter::Size {
				vars: vec!["OUT"],
				rows: None,
				cols: None,
				length: Some(1),
				vectors: None,
				max_size: true,
			},
			not_overlapping(&["X", "Y", "OUT"]),
			Filter::Ordered("X", "Y"),
		])),
		validate::sum_product,
		|i| format!("{} = sum_product({}, {})", render(i, "OUT"), render(i, "X"), render(i, "Y")),
	));

	templates.push(Template::new(
		"mutual_exclusivity",
		vec![Variable::block("X", any_type())],
		free(Filter::Size {
			vars: vec!["X"],
			rows: None,
			cols: None,
			length: None,
			vectors: Some(2),
			max_size: false,
		}),
		validate::mutual_exclusivity,
		|i| format!("mutual_exclusivity({})", render(i, "X")),
	));

	for op in Operation::ALL {
		templates.push(aggregate_template(op));
		templates.push(conditional_aggregate_template(op));
		templates.push(foreign_operation_template(op));
	}

	templates
}

fn aggregate_shape_filter() -> Filter {
	Filter::Custom {
		name: "aggregate_shape",
		vars: vec!["X", "OUT"],
		test: Rc::new(|a| {
			let block = &a["X"];
			let out = &a["OUT"];
			out.vector_count() == 1 && out.vector_length() == block.vector_count()
		}),
	}
}

fn aggregate_template(op: Operation) -> Template {
	let name: &'static str = op.name();
	Template::new(
		name,
		vec![
			Variable::block("X", numeric_types()),
			Variable::vector("OUT", numeric_types()),
		],
		Source::Free {
			filter: Filter::All(vec![
				Filter::NotPartial(vec!["X"]),
				Filter::Size {
					vars: vec!["X"],
					rows: None,
					cols: None,
					length: None,
					vectors: Some(op.min_vectors()),
					max_size: false,
				},
				aggregate_shape_filter(),
				not_overlapping(&["X", "OUT"]),
			]),
		},
		validate::aggregate,
		move |i| format!("{} = {}({})", render(i, "OUT"), name, render(i, "X")),
	)
	.with_operation(op)
}

fn conditional_aggregate_template(op: Operation) -> Template {
	let name: &'static str = op.name();
	Template::new(
		Box::leak(format!("conditional_{name}").into_boxed_str()),
		vec![
			Variable::vector("VALUES", numeric_types()),
			Variable::vector("COND1", discrete_types()),
			Variable::vector("COND2", discrete_types()),
			Variable::vector("OUT", numeric_types()),
		],
		free(all(vec![
			same(&["VALUES", "COND1"]),
			same(&["COND2", "OUT"]),
			not_overlapping(&["VALUES", "COND1", "COND2", "OUT"]),
		])),
		validate::conditional_aggregate,
		move |i| format!("{} = conditional_{}({}, {}, {})", render(i, "OUT"), name, render(i, "VALUES"), render(i, "COND1"), render(i, "COND2")),
	)
	.with_operation(op)
	.after(&["foreign_key", "lookup"])
}

fn foreign_operation_template(op: Operation) -> Template {
	let name: &'static str = op.name();
	Template::new(
		Box::leak(format!("foreign_{name}").into_boxed_str()),
		vec![
			Variable::vector("FK", discrete_types()),
			Variable::vector("PK", discrete_types()),
			Variable::vector("A", numeric_types()),
			Variable::vector("OUT", numeric_types()),
		],
		free(all(vec![
			same(&["FK", "OUT"]),
			same(&["PK", "A"]),
			not_partial(&["PK"]),
			not_overlapping(&["FK", "PK", "A", "OUT"]),
		])),
		validate::foreign_operation,
		move |i| format!("{} = foreign_{}({}, {}, {})", render(i, "OUT"), name, render(i, "FK"), render(i, "PK"), render(i, "A")),
	)
	.with_operation(op)
}

fn render(instance: &ConstraintInstance, var: &str) -> String {
	let block = instance.get(var).expect("print_format referenced an unbound variable");
	format!("{}!{}", block.table().name(), block.relative_range())
}
