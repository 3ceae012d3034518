//! Error types for catalog construction
//!
//! Every error here is a mistake in the catalog definition itself and
//! aborts the whole generation run.

use thiserror::Error;

use crate::annotation::AnnotationError;

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Error type for catalog operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
	/// The declaration string could not be split into its parts
	#[error("malformed signature `{declaration}`: {reason}")]
	MalformedSignature {
		declaration: String,
		reason: &'static str,
	},

	/// An explicit argument-name override contains a bad entry
	#[error("invalid argument name `{name}` in the override for `{declaration}`")]
	InvalidArgName { declaration: String, name: String },

	/// An explicit argument-name override does not name every parameter
	#[error("override for `{declaration}` names {found} arguments, the declaration has {expected}")]
	ArgCountMismatch {
		declaration: String,
		expected: usize,
		found: usize,
	},

	/// An annotation rejected the function it was applied to
	#[error("annotation `{annotation}` rejected `{declaration}`: {source}")]
	Annotation {
		declaration: String,
		annotation: &'static str,
		#[source]
		source: AnnotationError,
	},
}

impl CatalogError {
	/// The annotation error behind this failure, if any
	#[must_use]
	pub const fn annotation_error(&self) -> Option<&AnnotationError> {
		match self {
			Self::Annotation { source, .. } => Some(source),
			_ => None,
		}
	}
}
