//! wrapgen - A generator for path-mapping libc interposition wrappers
//!
//! Each wrapped function is described once, as a C declaration plus an
//! ordered list of annotations. The annotations rewrite the argument list
//! and attach code fragments; a renderer then turns the finished catalog
//! into the wrapper source and its header.
//!
//! # Getting Started
//!
//! ```rust
//! use wrapgen::annotation::{map, optional_arg_is_create_mode};
//! use wrapgen::{CRenderer, CatalogBuilder, Renderer};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut catalog = CatalogBuilder::new();
//!     catalog.wrap(
//!         "int open(const char *pathname, int flags, ...)",
//!         vec![map("pathname"), optional_arg_is_create_mode("flags&O_CREAT")],
//!     )?;
//!     let catalog = catalog.build();
//!
//!     assert_eq!(catalog.wraps()[0].arg_names(), ["mapped__pathname", "flags", "mode"]);
//!
//!     let source = CRenderer::default().render_source(&catalog)?;
//!     assert!(source.contains("next_open(mapped__pathname, flags, mode)"));
//!     Ok(())
//! }
//! ```

// Lets the `annotation` attribute's `::wrapgen::` paths resolve in this crate
extern crate self as wrapgen;

pub mod annotation;
pub mod catalog;
pub mod function;
pub mod render;
pub mod signature;
pub mod util;

pub use wrapgen_macros::annotation;

pub use annotation::{Annotation, AnnotationError, AnnotationResult};
pub use catalog::{Catalog, CatalogBuilder, CatalogError, Entry, Target, builtin_catalog};
pub use function::{Directive, Flags, Fragment, Function};
pub use render::{Artifacts, CRenderer, RenderConfig, RenderError, Renderer, render_all};

/// Build the built-in catalog and render both artifacts with `renderer`
pub fn generate<R: Renderer + ?Sized>(renderer: &R) -> Result<Artifacts, Box<dyn std::error::Error + Send + Sync>> {
	let catalog = builtin_catalog()?;
	Ok(render_all(renderer, &catalog)?)
}
