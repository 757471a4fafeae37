//! The learning loop: topologically order the template catalogue by
//! `depends_on` (deterministic tie-break by name) and solve each template
//! in turn, feeding earlier solutions to later `Derived` sources
//! (spec.md §9 "Learning loop / orchestrator").

use std::rc::Rc;

use crate::catalogue;
use crate::error::CatalogError;
use crate::solutions::SolutionsStore;
use crate::table::Table;
use crate::template::Template;

/// Order templates so every `Derived` source is solved after the
/// template it depends on, breaking ties by name for a deterministic
/// learning order.
fn topological_order(templates: &[Template]) -> Result<Vec<usize>, CatalogError> {
	let mut remaining: Vec<usize> = (0..templates.len()).collect();
	let mut done = vec![false; templates.len()];
	let mut order = Vec::with_capacity(templates.len());

	while !remaining.is_empty() {
		let mut ready: Vec<usize> = remaining
			.iter()
			.copied()
			.filter(|&i| {
				templates[i].depends_on().iter().all(|dep| {
					templates
						.iter()
						.enumerate()
						.find(|(_, t)| t.name() == *dep)
						.is_some_and(|(j, _)| done[j])
				})
			})
			.collect();
		if ready.is_empty() {
			let cycle = remaining.iter().map(|&i| templates[i].name().to_string()).collect();
			return Err(CatalogError::DependencyCycle(cycle));
		}
		ready.sort_unstable_by_key(|&i| templates[i].name());
		for i in ready {
			done[i] = true;
			order.push(i);
			remaining.retain(|&r| r != i);
		}
	}
	Ok(order)
}

/// Run every template in the catalogue, in dependency order, against
/// `tables`, and return every accepted constraint instance.
pub fn learn(tables: &[Rc<Table>]) -> Result<SolutionsStore, CatalogError> {
	let templates = catalogue::catalogue();
	let order = topological_order(&templates)?;
	tracing::info!(templates = order.len(), tables = tables.len(), "learning loop starting");
	let mut store = SolutionsStore::new();
	for index in order {
		let span = tracing::debug_span!("template", name = templates[index].name());
		let _enter = span.enter();
		for instance in templates[index].solve(tables, &store) {
			store.insert(instance);
		}
	}
	tracing::info!(constraints = store.len(), "learning loop finished");
	Ok(store)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::filter::Filter;
	use crate::source::Source;
	use crate::variable::{numeric_types, Variable};

	#[test]
	fn topological_order_breaks_ties_by_name() {
		let templates = vec![
			Template::new("b", vec![], Source::Free { filter: Filter::NoFilter }, |_, _| true, |_| String::new()),
			Template::new("a", vec![], Source::Free { filter: Filter::NoFilter }, |_, _| true, |_| String::new()),
		];
		let order = topological_order(&templates).unwrap();
		assert_eq!(templates[order[0]].name(), "a");
		assert_eq!(templates[order[1]].name(), "b");
	}

	#[test]
	fn dependency_cycle_is_detected() {
		let templates = vec![
			Template::new(
				"x",
				vec![Variable::vector("X", numeric_types())],
				Source::Derived {
					prerequisite: "y",
					rewrite: |a| Some(a.clone()),
				},
				|_, _| true,
				|_| String::new(),
			),
			Template::new(
				"y",
				vec![Variable::vector("X", numeric_types())],
				Source::Derived {
					prerequisite: "x",
					rewrite: |a| Some(a.clone()),
				},
				|_, _| true,
				|_| String::new(),
			),
		];
		assert!(matches!(topological_order(&templates), Err(CatalogError::DependencyCycle(_))));
	}
}
