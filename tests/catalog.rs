//! End-to-end checks of catalog construction and rendering

use wrapgen::annotation::{create_nomap_nolog_version, map, map_at, optional_arg_is_create_mode, pass_va_list};
use wrapgen::{
	AnnotationError, AnnotationResult, CRenderer, CatalogBuilder, CatalogError, Entry, Function, Renderer, Target,
	builtin_catalog, render_all,
};

/// Marks a function as wanting the plain no-mapping variant without mapping anything
#[wrapgen::annotation]
fn force_nomap_variant(func: &mut Function) -> AnnotationResult {
	func.flags_mut().emit_nomap_variant = true;
	Ok(None)
}

#[test]
fn name_lists_stay_aligned_across_the_builtin_catalog() {
	let catalog = builtin_catalog().unwrap();
	for func in catalog.wraps().iter().chain(catalog.gates()) {
		assert_eq!(
			func.arg_names().len(),
			func.original_arg_names().len(),
			"{} lost track of its arguments",
			func.name()
		);
	}
}

#[test]
fn passthrough_drops_exactly_one_slot() {
	let catalog = builtin_catalog().unwrap();
	for name in ["execl", "execle", "execlp"] {
		let func = catalog.find(name).unwrap();
		let declared = func.raw_args().split(',').count();
		assert_eq!(func.arg_names().len(), declared - 1);
		assert!(func.flags().va_list_passthrough);
	}
}

#[test]
fn open_family_gets_create_mode() {
	let catalog = builtin_catalog().unwrap();
	let open = catalog.find("open").unwrap();

	assert_eq!(open.arg_names(), ["mapped__pathname", "flags", "mode"]);
	assert_eq!(open.flags().opt_arg_prev_name.as_deref(), Some("flags"));
	assert!(open.flags().emit_nomap_variant);
	assert!(open.flags().emit_nomap_nolog_variant);
	assert!(open.fragments()[1].suppress_default_mapping);

	let openat = catalog.find("openat").unwrap();
	assert_eq!(openat.arg_names(), ["dirfd", "mapped__pathname", "flags", "mode"]);
	assert_eq!(openat.flags().map_fd.as_deref(), Some("dirfd"));
}

#[test]
fn registration_order_is_kept_regardless_of_annotations() {
	let mut builder = CatalogBuilder::new();
	builder
		.wrap(
			"int a(const char *path, int flags, ...)",
			vec![
				map("path"),
				optional_arg_is_create_mode("flags&O_CREAT"),
				create_nomap_nolog_version(),
			],
		)
		.unwrap();
	builder.wrap("int b(void)", vec![]).unwrap();
	builder
		.wrap("int c(int fd, const char *path)", vec![map_at("fd", "path")])
		.unwrap();
	builder.gate("int g(const char *p, ...)", vec![pass_va_list()]).unwrap();

	let catalog = builder.build();
	let wraps: Vec<_> = catalog.wraps().iter().map(Function::name).collect();
	assert_eq!(wraps, ["a", "b", "c"]);
	assert_eq!(catalog.get(Target::Gates)[0].name(), "g");
}

#[test]
fn missing_placeholder_aborts_without_appending() {
	let mut builder = CatalogBuilder::new();
	let err = builder
		.register(
			Target::Wraps,
			Entry::new("int open(const char *pathname, int flags)")
				.annotate(map("pathname"))
				.annotate(optional_arg_is_create_mode("flags&O_CREAT")),
		)
		.unwrap_err();

	assert_eq!(err.annotation_error(), Some(&AnnotationError::MissingPlaceholder));
	assert!(matches!(err, CatalogError::Annotation { annotation: "optional_arg_is_create_mode", .. }));
	assert!(builder.build().is_empty());
}

#[test]
fn macro_defined_annotations_compose_with_builtin_ones() {
	let mut builder = CatalogBuilder::new();
	let func = builder
		.register(
			Target::Wraps,
			Entry::new("int umount(const char *target)").annotate(Box::new(ForceNomapVariant::new())),
		)
		.unwrap();
	assert!(func.flags().emit_nomap_variant);
	assert!(func.fragments().is_empty());

	let source = CRenderer::default().render_source(&builder.build()).unwrap();
	assert!(source.contains("int umount_nomap(const char *target)"));
	assert!(source.contains("\tresult = next_umount(target);"));
}

#[test]
fn builtin_catalog_renders() {
	let catalog = builtin_catalog().unwrap();
	let artifacts = render_all(&CRenderer::default(), &catalog).unwrap();

	assert!(artifacts.source.contains("int open64(const char *pathname, int flags, ...)"));
	assert!(
		artifacts
			.source
			.contains("result = glob_gate(&result_errno, next_glob, \"glob\", mapped__pattern, flags, errfunc, pglob);")
	);
	assert!(artifacts.source.contains("result = next_link(mapped__oldpath, mapped__newpath);"));
	assert!(artifacts.header.contains("extern int open_nomap_nolog(const char *pathname, int flags, ...);"));
	assert!(artifacts.header.contains("extern int uname_gate("));
}

#[test]
fn variadic_tail_starts_after_the_caller_visible_parameter() {
	let mut builder = CatalogBuilder::new();
	builder
		.wrap(
			"int f(int fd, const char *path, ...)",
			vec![map("path"), optional_arg_is_create_mode("fd")],
		)
		.unwrap();
	builder.gate("int g(const char *path, ...)", vec![map("path"), pass_va_list()]).unwrap();
	let source = CRenderer::default().render_source(&builder.build()).unwrap();

	assert_eq!(source.matches("va_start(opt, path);").count(), 2, "{source}");
	assert!(source.contains("va_start(ap, path);"));
	assert!(!source.contains("va_start(opt, mapped__"));
	assert!(!source.contains("va_start(ap, mapped__"));
}

#[test]
fn void_declarations_forward_without_arguments() {
	let mut builder = CatalogBuilder::new();
	builder.wrap("int sync_all(void)", vec![]).unwrap();
	let source = CRenderer::default().render_source(&builder.build()).unwrap();

	assert!(source.contains("result = next_sync_all();"), "{source}");
}
