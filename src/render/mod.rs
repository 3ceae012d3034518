//! Renderer boundary
//!
//! A renderer turns a finished `Catalog` into the two generated artifacts:
//! the C source implementing the wrappers and the header declaring the
//! symbols other parts of the preload library call.

mod c;
mod config;

pub use c::CRenderer;
pub use config::RenderConfig;

use thiserror::Error;

use crate::catalog::Catalog;

/// Error type for rendering
#[derive(Debug, Error)]
pub enum RenderError {
	/// A plain wrapper cannot hand a `va_list` to a variadic real function
	#[error("`{name}` forwards a va_list but is not a gate")]
	UnsupportedPassthrough { name: String },

	/// Writing to the output buffer failed
	#[error("formatting error: {0}")]
	Fmt(#[from] std::fmt::Error),
}

/// Trait for catalog renderers
pub trait Renderer {
	/// Render the source file implementing the wrappers
	fn render_source(&self, catalog: &Catalog) -> Result<String, RenderError>;

	/// Render the header declaring the exported symbols
	fn render_header(&self, catalog: &Catalog) -> Result<String, RenderError>;
}

/// Both rendered artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
	pub source: String,
	pub header: String,
}

/// Render both artifacts, failing if either does
pub fn render_all<R: Renderer + ?Sized>(renderer: &R, catalog: &Catalog) -> Result<Artifacts, RenderError> {
	Ok(Artifacts {
		source: renderer.render_source(catalog)?,
		header: renderer.render_header(catalog)?,
	})
}
