//! Annotations requesting extra wrapper variants

use crate::annotation::{Annotation, AnnotationResult};
use crate::function::Function;

/// Also emit a `NAME_nomap_nolog` wrapper that forwards its arguments
/// unmodified and logs nothing
#[wrapgen_macros::annotation]
pub fn nomap_nolog_variant(func: &mut Function) -> AnnotationResult {
	func.flags_mut().emit_nomap_nolog_variant = true;
	Ok(None)
}

/// Create a `NomapNologVariant` annotation
#[must_use]
pub fn create_nomap_nolog_version() -> Box<dyn Annotation> {
	Box::new(NomapNologVariant::new())
}
