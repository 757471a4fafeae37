//! A constraint template: a name, its variables, where its candidate
//! assignments come from, how they're validated, and how an accepted
//! instance prints (spec.md §9 "Template catalogue → declarative schema").

use std::rc::Rc;

use crate::assignment;
use crate::instance::ConstraintInstance;
use crate::operation::Operation;
use crate::solutions::SolutionsStore;
use crate::source::Source;
use crate::table::Table;
use crate::variable::Variable;

/// A template's print-format renderer. Boxed rather than a bare function
/// pointer so operation-parametrised families (`Aggregate`,
/// `ConditionalAggregate`, `ForeignOperation`) can close over their
/// operation's name without needing a distinct type per instantiation.
pub type PrintFormat = Rc<dyn Fn(&ConstraintInstance) -> String>;

/// One entry in the template catalogue. Templates are plain data plus a
/// validator function pointer and a boxed print-format renderer, rather
/// than trait objects or a class hierarchy — every template is a value of
/// this one type, dispatched on by name.
pub struct Template {
	name: &'static str,
	variables: Vec<Variable>,
	source: Source,
	operation: Option<Operation>,
	validate: fn(&ConstraintInstance, &SolutionsStore) -> bool,
	print_format: PrintFormat,
	/// Other templates whose solutions this one's validator consults from
	/// the [`SolutionsStore`] (spec.md §4.6's subsumption checks), without
	/// rewriting their candidates the way [`Source::Derived`] does. The
	/// orchestrator schedules these before this template so the store is
	/// already populated when validation runs.
	after: Vec<&'static str>,
}

impl Template {
	/// Construct a catalogue entry not parametrised by an [`Operation`].
	pub fn new(
		name: &'static str,
		variables: Vec<Variable>,
		source: Source,
		validate: fn(&ConstraintInstance, &SolutionsStore) -> bool,
		print_format: impl Fn(&ConstraintInstance) -> String + 'static,
	) -> Self {
		Template {
			name,
			variables,
			source,
			operation: None,
			validate,
			print_format: Rc::new(print_format),
			after: Vec::new(),
		}
	}

	/// Tag this template with the [`Operation`] it was instantiated for
	/// (`Aggregate`, `ConditionalAggregate`, `ForeignOperation`).
	pub fn with_operation(mut self, operation: Operation) -> Self {
		self.operation = Some(operation);
		self
	}

	/// Require the named templates to be fully solved (their solutions
	/// present in the store) before this one runs, without rewriting their
	/// candidates the way [`Source::Derived`] does.
	pub fn after(mut self, templates: &[&'static str]) -> Self {
		self.after.extend(templates.iter().copied());
		self
	}

	/// The template's name, as recorded on each accepted
	/// [`ConstraintInstance`].
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// The template's variables, in declaration order.
	pub fn variables(&self) -> &[Variable] {
		&self.variables
	}

	/// The variable names, in declaration order.
	pub fn variable_names(&self) -> Vec<&'static str> {
		self.variables.iter().map(Variable::name).collect()
	}

	/// Every template that must be fully solved before this one: its
	/// [`Source::Derived`] prerequisite (if any), plus any templates named
	/// via [`Template::after`].
	pub fn depends_on(&self) -> Vec<&'static str> {
		let mut deps: Vec<&'static str> = self.source.depends_on().into_iter().collect();
		deps.extend(self.after.iter().copied());
		deps
	}

	/// Find every assignment of this template's variables that satisfies
	/// both its source (CSP filter, or prerequisite rewrite) and its
	/// semantic validator.
	pub fn solve(&self, tables: &[Rc<Table>], solutions: &SolutionsStore) -> Vec<ConstraintInstance> {
		let names = self.variable_names();
		let (candidates, validated): (usize, Vec<ConstraintInstance>) = match &self.source {
			Source::Free { filter } => {
				let candidates = assignment::solve(&self.variables, tables, filter);
				let count = candidates.len();
				let validated = candidates
					.into_iter()
					.filter_map(|assignment| {
						let instance = ConstraintInstance::new(self.name, self.operation, &assignment, &names);
						(self.validate)(&instance, solutions).then_some(instance)
					})
					.collect();
				(count, validated)
			}
			Source::Derived { prerequisite, rewrite } => {
				let candidates = solutions.solutions_for(prerequisite);
				let count = candidates.len();
				let validated = candidates
					.iter()
					.filter_map(|prior| {
						let rewritten = rewrite(&prior.as_assignment())?;
						let instance = ConstraintInstance::new(self.name, self.operation, &rewritten, &names);
						(self.validate)(&instance, solutions).then_some(instance)
					})
					.collect();
				(count, validated)
			}
		};
		tracing::debug!(template = self.name, candidates, validated = validated.len(), "template processed");
		validated
	}

	/// Render an accepted instance in the template's print format.
	pub fn format(&self, instance: &ConstraintInstance) -> String {
		(self.print_format)(instance)
	}
}
