extern crate proc_macro;

use proc_macro::TokenStream;

mod annotation;

use annotation::handle_annotation;

/// Define a catalog annotation
///
/// This macro transforms a plain function over a `Function` into a unit
/// struct that implements the `Annotation` trait, so it can be listed in a
/// registration next to the configurable annotations.
///
/// # Example
///
/// ```ignore
/// use wrapgen::{AnnotationResult, Function};
///
/// #[wrapgen::annotation]
/// fn mark_nolog(func: &mut Function) -> AnnotationResult {
///     func.flags_mut().emit_nomap_nolog_variant = true;
///     Ok(None)
/// }
///
/// // registered as `Box::new(MarkNolog::new())`
/// ```
#[proc_macro_attribute]
pub fn annotation(attr: TokenStream, item: TokenStream) -> TokenStream {
	handle_annotation(attr, item)
}
