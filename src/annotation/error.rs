//! Error types for annotations

use thiserror::Error;

/// A precondition an annotation found violated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
	/// The argument list has no `...` placeholder
	#[error("argument list has no variadic placeholder `...`")]
	MissingPlaceholder,

	/// The `...` placeholder is the first argument
	#[error("variadic placeholder has no preceding named parameter")]
	UnnamedVariadic,

	/// The named argument is not in the current argument list
	#[error("argument `{key}` not found among ({available})")]
	UnknownMapKey {
		/// The requested argument name
		key: String,
		/// The argument names at the time of the lookup
		available: String,
	},

	/// Two annotations that cannot share a function were combined
	#[error("`{second}` cannot be combined with `{first}` on the same function")]
	IncompatibleAnnotations {
		first: &'static str,
		second: &'static str,
	},
}
