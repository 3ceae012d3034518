//! Path-mapping annotations

use tracing::debug;

use crate::annotation::{Annotation, AnnotationError, AnnotationResult};
use crate::function::{Directive, Fragment, Function, MAPPED_PREFIX};

/// Map the argument `key` through the path-translation function
///
/// The slot is renamed to `mapped__KEY`: the wrapper still receives the
/// caller's path as `KEY` and hands the mapped value to the real call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapArg {
	key: String,
}

impl MapArg {
	#[must_use]
	pub fn new(key: impl Into<String>) -> Self {
		Self { key: key.into() }
	}
}

impl Annotation for MapArg {
	fn apply(&self, func: &mut Function) -> AnnotationResult {
		map_argument(func, &self.key).map(Some)
	}

	fn name(&self) -> &'static str {
		"map"
	}

	fn clone_box(&self) -> Box<dyn Annotation> {
		Box::new(self.clone())
	}
}

/// Map the argument `key` relative to the directory fd in `dir_fd`
///
/// This is the `*at` flavour of `MapArg`, e.g. for `openat`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapAt {
	dir_fd: String,
	key: String,
}

impl MapAt {
	#[must_use]
	pub fn new(dir_fd: impl Into<String>, key: impl Into<String>) -> Self {
		Self {
			dir_fd: dir_fd.into(),
			key: key.into(),
		}
	}
}

impl Annotation for MapAt {
	fn apply(&self, func: &mut Function) -> AnnotationResult {
		// Check the fd first so a bad entry leaves the function untouched
		position_of(func, &self.dir_fd)?;

		let mut fragment = map_argument(func, &self.key)?;
		fragment.pre = Some(Directive::MapAtPre {
			dir_fd: self.dir_fd.clone(),
			key: self.key.clone(),
		});
		func.flags_mut().map_fd = Some(self.dir_fd.clone());
		Ok(Some(fragment))
	}

	fn name(&self) -> &'static str {
		"map_at"
	}

	fn clone_box(&self) -> Box<dyn Annotation> {
		Box::new(self.clone())
	}
}

/// Create a `MapArg` annotation
#[must_use]
pub fn map(key: &str) -> Box<dyn Annotation> {
	Box::new(MapArg::new(key))
}

/// Create a `MapAt` annotation
#[must_use]
pub fn map_at(dir_fd: &str, key: &str) -> Box<dyn Annotation> {
	Box::new(MapAt::new(dir_fd, key))
}

fn position_of(func: &Function, key: &str) -> Result<usize, AnnotationError> {
	func.arg_position(key).ok_or_else(|| AnnotationError::UnknownMapKey {
		key: key.to_string(),
		available: func.arg_names().join(", "),
	})
}

fn map_argument(func: &mut Function, key: &str) -> Result<Fragment, AnnotationError> {
	let index = position_of(func, key)?;
	debug!(function = func.name(), key, index, "mapping argument");

	func.rename_arg(index, format!("{MAPPED_PREFIX}{key}"));
	let flags = func.flags_mut();
	flags.emit_nomap_variant = true;
	flags.map_key = Some(key.to_string());

	Ok(Fragment {
		decls: Some(Directive::MapDecls { key: key.to_string() }),
		pre: Some(Directive::MapPre { key: key.to_string() }),
		post: Some(Directive::MapPost { key: key.to_string() }),
		suppress_default_mapping: false,
	})
}
