//! A single accepted constraint: a template name, the operation it was
//! parametrised with (if any), and the variable→block bindings that
//! satisfied it (spec.md §4 "constraint instance").

use std::hash::{Hash, Hasher};

use crate::assignment::Assignment;
use crate::block::Block;
use crate::operation::Operation;

/// One accepted instance of a template: which blocks its variables bound
/// to, in the template's declared variable order (not the `HashMap`'s
/// iteration order, so printing and deduplication are deterministic).
#[derive(Debug, Clone)]
pub struct ConstraintInstance {
	template: &'static str,
	operation: Option<Operation>,
	bindings: Vec<(&'static str, Block)>,
}

impl ConstraintInstance {
	/// Build an instance from a satisfied assignment, keeping only the
	/// named variables and in the given order.
	pub fn new(
		template: &'static str,
		operation: Option<Operation>,
		assignment: &Assignment,
		variable_order: &[&'static str],
	) -> Self {
		let bindings = variable_order
			.iter()
			.map(|name| (*name, assignment[*name].clone()))
			.collect();
		ConstraintInstance {
			template,
			operation,
			bindings,
		}
	}

	/// The template name (e.g. `"aggregate"`, `"series"`).
	pub fn template(&self) -> &'static str {
		self.template
	}

	/// The operation this instance was found under, for templates
	/// parametrised by [`Operation`] (`Aggregate`, `ConditionalAggregate`,
	/// `ForeignOperation`).
	pub fn operation(&self) -> Option<Operation> {
		self.operation
	}

	/// The block bound to `name`, or `None` if this template has no such
	/// variable.
	pub fn get(&self, name: &str) -> Option<&Block> {
		self.bindings.iter().find(|(n, _)| *n == name).map(|(_, b)| b)
	}

	/// The bindings in declared variable order.
	pub fn bindings(&self) -> &[(&'static str, Block)] {
		&self.bindings
	}

	/// Rebuild a variable→block assignment from this instance's bindings,
	/// for feeding into a [`crate::source::Source::Derived`] `rewrite` fn.
	pub fn as_assignment(&self) -> Assignment {
		self.bindings.iter().cloned().collect()
	}
}

impl PartialEq for ConstraintInstance {
	fn eq(&self, other: &Self) -> bool {
		self.template == other.template
			&& self.operation == other.operation
			&& self.bindings.len() == other.bindings.len()
			&& self
				.bindings
				.iter()
				.zip(&other.bindings)
				.all(|((an, ab), (bn, bb))| an == bn && ab == bb)
	}
}

impl Eq for ConstraintInstance {}

impl Hash for ConstraintInstance {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.template.hash(state);
		self.operation.hash(state);
		for (name, block) in &self.bindings {
			name.hash(state);
			block.hash(state);
		}
	}
}
