//! Where a template's candidate assignments come from: generated fresh, or
//! rewritten from another template's already-accepted solutions (spec.md
//! §9 "Source variants → Free vs Derived").

use crate::assignment::Assignment;
use crate::filter::Filter;

/// How a template obtains candidate assignments before validation.
pub enum Source {
	/// Generate candidates from scratch via the assignment CSP, pruned by
	/// `filter`.
	Free {
		/// The structural filter pruning the CSP search.
		filter: Filter,
	},
	/// Rewrite every accepted solution of `prerequisite` into a candidate
	/// assignment for this template, via `rewrite`. Used when a template's
	/// domain is exactly "however `prerequisite` was solved" (e.g. `Rank`
	/// candidates are `Ordered` solutions reinterpreted).
	Derived {
		/// The name of the template whose solutions feed this one.
		prerequisite: &'static str,
		/// Turn one prerequisite solution into one candidate assignment for
		/// this template. May return `None` to skip a solution that does
		/// not translate (e.g. wrong arity).
		rewrite: fn(&Assignment) -> Option<Assignment>,
	},
}

impl Source {
	/// The name of the prerequisite template this source depends on, if any.
	pub fn depends_on(&self) -> Option<&'static str> {
		match self {
			Source::Free { .. } => None,
			Source::Derived { prerequisite, .. } => Some(prerequisite),
		}
	}
}
