//! Builder for function catalogs
//!
//! This module contains the `CatalogBuilder` struct and the `Entry`
//! registration request it consumes.

use tracing::{debug, error, info};

use crate::annotation::Annotation;
use crate::catalog::{Catalog, CatalogError, Result, Target};
use crate::function::Function;
use crate::signature;

/// A registration request
///
/// An entry pairs a declaration string with the ordered annotations to
/// apply to it and, optionally, an explicit list of argument names for
/// declarations the default name heuristic gets wrong.
#[derive(Debug, Clone)]
pub struct Entry {
	declaration: String,
	annotations: Vec<Box<dyn Annotation>>,
	arg_names: Option<Vec<String>>,
}

impl Entry {
	/// Create an entry for a declaration
	#[must_use]
	pub fn new(declaration: impl Into<String>) -> Self {
		Self {
			declaration: declaration.into(),
			annotations: Vec::new(),
			arg_names: None,
		}
	}

	/// Append one annotation
	#[must_use]
	pub fn annotate(mut self, annotation: Box<dyn Annotation>) -> Self {
		self.annotations.push(annotation);
		self
	}

	/// Append several annotations, in order
	#[must_use]
	pub fn annotations(mut self, annotations: impl IntoIterator<Item = Box<dyn Annotation>>) -> Self {
		self.annotations.extend(annotations);
		self
	}

	/// Override the argument names derived from the declaration
	#[must_use]
	pub fn arg_names<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.arg_names = Some(names.into_iter().map(Into::into).collect());
		self
	}

	/// Parse the declaration and run every annotation over it
	fn into_function(self) -> Result<Function> {
		let Self {
			declaration,
			annotations,
			arg_names,
		} = self;

		let sig = signature::parse(&declaration)?;
		let arg_names = match arg_names {
			Some(names) => {
				signature::validate_arg_names(&declaration, &sig.raw_args, &names)?;
				names
			},
			None => signature::default_arg_names(&sig.raw_args),
		};

		let mut func = Function::new(declaration, sig, arg_names);
		for annotation in &annotations {
			match annotation.apply(&mut func) {
				Ok(Some(fragment)) => func.push_fragment(fragment),
				Ok(None) => {},
				Err(source) => {
					return Err(CatalogError::Annotation {
						declaration: func.declaration().to_string(),
						annotation: annotation.name(),
						source,
					});
				},
			}
		}

		Ok(func)
	}
}

/// Builder for function catalogs
///
/// Registrations are processed immediately and in order; a failed
/// registration leaves both lists as they were.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
	wraps: Vec<Function>,
	gates: Vec<Function>,
}

impl CatalogBuilder {
	/// Create an empty catalog builder
	#[must_use]
	pub const fn new() -> Self {
		Self {
			wraps: Vec::new(),
			gates: Vec::new(),
		}
	}

	/// Register an entry into the given list
	///
	/// Returns the finished function record.
	pub fn register(&mut self, target: Target, entry: Entry) -> Result<&Function> {
		let func = entry
			.into_function()
			.inspect_err(|err| error!(?target, "rejected catalog entry: {}", err))?;
		debug!(
			?target,
			name = func.name(),
			args = ?func.arg_names(),
			fragments = func.fragments().len(),
			"registered function"
		);

		let list = match target {
			Target::Wraps => &mut self.wraps,
			Target::Gates => &mut self.gates,
		};
		list.push(func);
		Ok(&list[list.len() - 1])
	}

	/// Register a declaration into `wraps`
	pub fn wrap(&mut self, declaration: &str, annotations: Vec<Box<dyn Annotation>>) -> Result<&Function> {
		self.register(Target::Wraps, Entry::new(declaration).annotations(annotations))
	}

	/// Register a declaration into `gates`
	pub fn gate(&mut self, declaration: &str, annotations: Vec<Box<dyn Annotation>>) -> Result<&Function> {
		self.register(Target::Gates, Entry::new(declaration).annotations(annotations))
	}

	/// Finish the catalog
	#[must_use]
	pub fn build(self) -> Catalog {
		info!(wraps = self.wraps.len(), gates = self.gates.len(), "catalog built");
		Catalog::new(self.wraps, self.gates)
	}
}

#[cfg(test)]
mod tests {
	use std::io;
	use std::sync::{Arc, Mutex};

	use tracing_subscriber::fmt::MakeWriter;

	use super::*;
	use crate::annotation::{AnnotationError, map, map_at, optional_arg_is_create_mode};

	#[derive(Clone, Default)]
	struct Captured(Arc<Mutex<Vec<u8>>>);

	impl io::Write for Captured {
		fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
			self.0.lock().unwrap().extend_from_slice(buf);
			Ok(buf.len())
		}

		fn flush(&mut self) -> io::Result<()> {
			Ok(())
		}
	}

	impl<'a> MakeWriter<'a> for Captured {
		type Writer = Self;

		fn make_writer(&'a self) -> Self::Writer {
			self.clone()
		}
	}

	impl Captured {
		fn text(&self) -> String {
			String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
		}
	}

	#[test]
	fn preserves_registration_order() {
		let mut builder = CatalogBuilder::new();
		builder.wrap("int b(const char *path)", vec![map("path")]).unwrap();
		builder
			.wrap(
				"int a(int dirfd, const char *path, int flags, ...)",
				vec![map_at("dirfd", "path"), optional_arg_is_create_mode("flags&O_CREAT")],
			)
			.unwrap();
		builder.wrap("int c(void)", Vec::new()).unwrap();
		builder.gate("int z(const char *path)", Vec::new()).unwrap();

		let catalog = builder.build();
		let names: Vec<_> = catalog.wraps().iter().map(Function::name).collect();
		assert_eq!(names, ["b", "a", "c"]);
		assert_eq!(catalog.gates().len(), 1);
		assert_eq!(catalog.len(), 4);
	}

	#[test]
	fn duplicates_are_kept() {
		let mut builder = CatalogBuilder::new();
		builder.wrap("int stat(const char *p, struct stat *b)", Vec::new()).unwrap();
		builder.wrap("int stat(const char *p, struct stat *b)", Vec::new()).unwrap();
		assert_eq!(builder.build().wraps().len(), 2);
	}

	#[test]
	fn failed_registration_appends_nothing() {
		let mut builder = CatalogBuilder::new();
		builder.wrap("int creat(const char *pathname, mode_t mode)", vec![map("pathname")]).unwrap();

		let err = builder
			.wrap(
				"int mkdir(const char *pathname, mode_t mode)",
				vec![map("pathname"), optional_arg_is_create_mode("1")],
			)
			.unwrap_err();
		assert_eq!(
			err,
			CatalogError::Annotation {
				declaration: "int mkdir(const char *pathname, mode_t mode)".into(),
				annotation: "optional_arg_is_create_mode",
				source: AnnotationError::MissingPlaceholder,
			}
		);

		let catalog = builder.build();
		assert_eq!(catalog.wraps().len(), 1);
		assert_eq!(catalog.wraps()[0].name(), "creat");
	}

	#[test]
	fn diagnostic_names_declaration_and_annotation() {
		let mut builder = CatalogBuilder::new();
		let err = builder.wrap("int rmdir(const char *pathname)", vec![map("path")]).unwrap_err();
		let message = err.to_string();
		assert!(message.contains("int rmdir(const char *pathname)"));
		assert!(message.contains("`map`"));
		assert!(matches!(err.annotation_error(), Some(AnnotationError::UnknownMapKey { .. })));
	}

	#[test]
	fn overrides_replace_derived_names() {
		let mut builder = CatalogBuilder::new();
		let func = builder
			.register(
				Target::Wraps,
				Entry::new("int utimes(const char *filename, const struct timeval tv[2])")
					.annotate(map("filename"))
					.arg_names(["filename", "tv"]),
			)
			.unwrap();
		assert_eq!(func.arg_names(), ["mapped__filename", "tv"]);
		assert_eq!(func.original_arg_names(), ["filename", "tv"]);
	}

	#[test]
	fn short_override_is_rejected() {
		let mut builder = CatalogBuilder::new();
		let err = builder
			.register(
				Target::Wraps,
				Entry::new(
					"int nftw(const char *dir, int (*fn)(const char *file, const struct stat *sb, int flag, struct FTW *s), int nopenfd, int flags)",
				)
				.annotate(map("dir"))
				.arg_names(["dir", "fn"]),
			)
			.unwrap_err();
		assert!(matches!(err, CatalogError::ArgCountMismatch { expected: 4, found: 2, .. }));
		assert!(builder.build().is_empty());
	}

	#[test]
	fn void_declaration_has_no_arguments() {
		let mut builder = CatalogBuilder::new();
		let func = builder.wrap("int sync_all(void)", Vec::new()).unwrap();
		assert!(func.arg_names().is_empty());
		assert!(func.original_arg_names().is_empty());
	}

	#[test]
	fn every_failure_is_logged() {
		let captured = Captured::default();
		let subscriber = tracing_subscriber::fmt()
			.with_writer(captured.clone())
			.with_ansi(false)
			.finish();

		tracing::subscriber::with_default(subscriber, || {
			let mut builder = CatalogBuilder::new();
			assert!(builder.wrap("int broken(const char *path", Vec::new()).is_err());
			assert!(
				builder
					.register(Target::Wraps, Entry::new("int a(int x, int y)").arg_names(["x"]))
					.is_err()
			);
			assert!(builder.wrap("int rmdir(const char *pathname)", vec![map("path")]).is_err());
		});

		let text = captured.text();
		assert_eq!(text.matches("ERROR").count(), 3, "{text}");
		assert!(text.contains("int broken(const char *path"));
		assert!(text.contains("int a(int x, int y)"));
		assert!(text.contains("int rmdir(const char *pathname)"));
	}

	#[test]
	fn bad_override_is_rejected() {
		let mut builder = CatalogBuilder::new();
		let err = builder
			.register(
				Target::Gates,
				Entry::new("int glob (const char *pattern, int flags)").arg_names(["pattern", "pattern"]),
			)
			.unwrap_err();
		assert!(matches!(err, CatalogError::InvalidArgName { .. }));
		assert!(builder.build().is_empty());
	}

	#[test]
	fn malformed_declaration_is_rejected() {
		let mut builder = CatalogBuilder::new();
		assert!(matches!(
			builder.wrap("int broken(const char *path", Vec::new()),
			Err(CatalogError::MalformedSignature { .. })
		));
	}
}
