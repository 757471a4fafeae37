//! An append-only store of accepted constraint instances, indexed by
//! template name, with O(1) duplicate checks (spec.md §9 "Solutions store").

use std::collections::{HashMap, HashSet};

use crate::instance::ConstraintInstance;

/// Every constraint instance accepted so far, grouped by template name.
/// Instances are never removed or mutated once inserted — later templates
/// (via [`crate::source::Source::Derived`]) only ever read from earlier
/// ones.
#[derive(Debug, Default)]
pub struct SolutionsStore {
	by_template: HashMap<&'static str, Vec<ConstraintInstance>>,
	seen: HashSet<ConstraintInstance>,
}

impl SolutionsStore {
	/// An empty store.
	pub fn new() -> Self {
		SolutionsStore::default()
	}

	/// Record `instance`, unless an equal instance was already recorded.
	/// Returns whether it was newly inserted.
	pub fn insert(&mut self, instance: ConstraintInstance) -> bool {
		if self.seen.contains(&instance) {
			return false;
		}
		self.seen.insert(instance.clone());
		self.by_template.entry(instance.template()).or_default().push(instance);
		true
	}

	/// Whether an equal instance has already been recorded.
	pub fn has(&self, instance: &ConstraintInstance) -> bool {
		self.seen.contains(instance)
	}

	/// All instances recorded for `template`, in insertion order.
	pub fn solutions_for(&self, template: &str) -> &[ConstraintInstance] {
		self.by_template.get(template).map_or(&[], Vec::as_slice)
	}

	/// All instances recorded, grouped by template name.
	pub fn all(&self) -> &HashMap<&'static str, Vec<ConstraintInstance>> {
		&self.by_template
	}

	/// Total number of instances recorded across all templates.
	pub fn len(&self) -> usize {
		self.seen.len()
	}

	/// Whether the store is empty.
	pub fn is_empty(&self) -> bool {
		self.seen.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::block::{Block, Orientation};
	use crate::geometry::Range;
	use crate::table::Table;
	use crate::types::CellType;
	use std::rc::Rc;

	fn sample_instance() -> ConstraintInstance {
		let table = Rc::new(
			Table::new(
				"T",
				Range::new(0, 0, 2, 2),
				vec![vec![Some(CellType::Int); 2]; 2],
				vec![vec![1.0; 2]; 2],
				vec![vec![None; 2]; 2],
				None,
			)
			.unwrap(),
		);
		let block = Block::new(table, Range::new(0, 0, 1, 2), Orientation::Vertical);
		let mut assignment = crate::assignment::Assignment::new();
		assignment.insert("x", block);
		ConstraintInstance::new("series", None, &assignment, &["x"])
	}

	#[test]
	fn insert_is_idempotent() {
		let mut store = SolutionsStore::new();
		assert!(store.insert(sample_instance()));
		assert!(!store.insert(sample_instance()));
		assert_eq!(store.len(), 1);
		assert!(store.has(&sample_instance()));
		assert_eq!(store.solutions_for("series").len(), 1);
	}
}
