//! Annotation engine
//!
//! Annotations are small transformations applied, in registration order,
//! to a freshly parsed `Function`. Each one may rename or remove argument
//! slots, set generation flags, and contribute a `Fragment` describing the
//! code the renderer has to splice into the wrapper.

mod error;
mod mapping;
mod variadic;
mod variant;

pub use error::AnnotationError;
pub use mapping::{MapArg, MapAt, map, map_at};
pub use variadic::{OptionalCreateMode, VaListPassthrough, optional_arg_is_create_mode, pass_va_list};
pub use variant::{NomapNologVariant, create_nomap_nolog_version};

use crate::function::{Fragment, Function};

/// Result of applying one annotation
pub type AnnotationResult = std::result::Result<Option<Fragment>, AnnotationError>;

/// Trait for catalog annotations
///
/// Annotations observe the mutations of the annotations applied before
/// them, so their order within a registration matters.
pub trait Annotation: Send + Sync {
	/// Apply the annotation to a function
	///
	/// Returns the fragment this annotation contributes, if any. An error
	/// means the catalog definition itself is wrong and aborts the build.
	fn apply(&self, func: &mut Function) -> AnnotationResult;

	/// Get the name of the annotation
	///
	/// This is used in diagnostics and logging.
	fn name(&self) -> &'static str {
		std::any::type_name::<Self>()
	}

	fn clone_box(&self) -> Box<dyn Annotation>;
}

impl Clone for Box<dyn Annotation> {
	fn clone(&self) -> Self {
		self.clone_box()
	}
}

impl std::fmt::Debug for dyn Annotation {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}
