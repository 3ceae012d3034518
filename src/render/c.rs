//! C renderer
//!
//! Emits one interposed definition per catalog entry. Wrappers resolve the
//! real function with `dlsym(RTLD_NEXT, ...)`, run the fragment directives
//! around the call and forward the post-annotation argument list. Gates
//! forward to a hand-written `NAME_gate` function instead.

use std::fmt::Write;

use tracing::debug;

use crate::catalog::{Catalog, Target};
use crate::function::{Directive, Function, MAPPED_PREFIX};
use crate::render::{RenderConfig, RenderError, Renderer};

/// Which definition of a wrapper is being emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
	/// The interposed symbol itself
	Main,
	/// `NAME_nomap`: logs, does not map
	Nomap,
	/// `NAME_nomap_nolog`: neither maps nor logs
	NomapNolog,
}

impl Variant {
	const fn suffix(self) -> &'static str {
		match self {
			Self::Main => "",
			Self::Nomap => "_nomap",
			Self::NomapNolog => "_nomap_nolog",
		}
	}

	const fn maps(self) -> bool {
		matches!(self, Self::Main)
	}

	const fn logs(self) -> bool {
		!matches!(self, Self::NomapNolog)
	}

	fn enabled(self, func: &Function) -> bool {
		match self {
			Self::Main => true,
			Self::Nomap => func.flags().emit_nomap_variant,
			Self::NomapNolog => func.flags().emit_nomap_nolog_variant,
		}
	}
}

/// Renderer producing C source and header text
#[derive(Debug, Clone, Default)]
pub struct CRenderer {
	config: RenderConfig,
}

impl CRenderer {
	#[must_use]
	pub const fn new(config: RenderConfig) -> Self {
		Self { config }
	}

	#[must_use]
	pub const fn config(&self) -> &RenderConfig {
		&self.config
	}

	fn check(target: Target, func: &Function) -> Result<(), RenderError> {
		if target == Target::Wraps && func.flags().va_list_passthrough {
			return Err(RenderError::UnsupportedPassthrough {
				name: func.name().to_string(),
			});
		}
		Ok(())
	}

	fn write_real_pointer(out: &mut String, func: &Function) -> std::fmt::Result {
		writeln!(
			out,
			"typedef {} (*{}_fn_t)({});",
			func.return_type().trim_end(),
			func.name(),
			func.raw_args()
		)?;
		writeln!(out, "static {name}_fn_t next_{name};\n", name = func.name())
	}

	fn write_wrapper(&self, out: &mut String, target: Target, func: &Function, variant: Variant) -> std::fmt::Result {
		let name = func.name();
		let returns = !func.returns_void();
		// The no-mapping variants only keep fragments with bespoke code
		let fragments: Vec<_> = func
			.fragments()
			.iter()
			.filter(|fragment| variant.maps() || fragment.suppress_default_mapping)
			.collect();

		writeln!(out, "{}", prototype(func, variant.suffix()))?;
		writeln!(out, "{{")?;
		if returns {
			writeln!(out, "\t{} result;", func.return_type().trim_end())?;
		}
		if target == Target::Gates {
			writeln!(out, "\tint result_errno = errno;")?;
		}
		for fragment in &fragments {
			if let Some(directive) = &fragment.decls {
				self.write_directive(out, name, directive)?;
			}
		}

		writeln!(out, "\n\tWRAPGEN_RESOLVE({name});")?;
		for fragment in &fragments {
			if let Some(directive) = &fragment.pre {
				self.write_directive(out, name, directive)?;
			}
		}

		if variant.logs() {
			writeln!(
				out,
				"\t{}({}, \"%s\", \"{name}{}\");",
				self.config.log_macro,
				self.config.log_level,
				variant.suffix()
			)?;
		}
		if variant.maps() {
			for fragment in fragments.iter().filter(|fragment| !fragment.suppress_default_mapping) {
				if let Some(Directive::MapPre { key } | Directive::MapAtPre { key, .. }) = &fragment.pre {
					writeln!(
						out,
						"\t{}({}, \"{name}: '%s' -> '%s'\", {key}, {MAPPED_PREFIX}{key});",
						self.config.log_macro, self.config.log_level
					)?;
				}
			}
		}

		let arg_names = if variant.maps() { func.arg_names() } else { func.original_arg_names() };
		let mut args: Vec<String> = Vec::new();
		let callee = match target {
			Target::Wraps => format!("next_{name}"),
			Target::Gates => {
				args.extend(["&result_errno".to_string(), format!("next_{name}"), format!("\"{name}\"")]);
				format!("{name}_gate")
			},
		};
		args.extend(arg_names.iter().cloned());
		if func.flags().va_list_passthrough {
			args.push("ap".to_string());
		}
		let assign = if returns { "result = " } else { "" };
		writeln!(out, "\t{assign}{callee}({});", args.join(", "))?;

		for fragment in &fragments {
			if let Some(directive) = &fragment.post {
				self.write_directive(out, name, directive)?;
			}
		}
		if target == Target::Gates {
			writeln!(out, "\terrno = result_errno;")?;
		}
		if returns {
			writeln!(out, "\treturn result;")?;
		}
		writeln!(out, "}}\n")
	}

	fn write_directive(&self, out: &mut String, name: &str, directive: &Directive) -> std::fmt::Result {
		let config = &self.config;
		match directive {
			Directive::MapDecls { key } => writeln!(out, "\tchar *{MAPPED_PREFIX}{key};"),
			Directive::MapPre { key } => {
				writeln!(out, "\t{MAPPED_PREFIX}{key} = {}(\"{name}\", {key});", config.map_function)
			},
			Directive::MapAtPre { dir_fd, key } => writeln!(
				out,
				"\t{MAPPED_PREFIX}{key} = {}(\"{name}\", {dir_fd}, {key});",
				config.map_at_function
			),
			Directive::MapPost { key } => writeln!(out, "\t{}({MAPPED_PREFIX}{key});", config.release_function),
			Directive::OptArgDecls => writeln!(out, "\tmode_t mode = 0;"),
			Directive::OptArgPre { condition, prev } => {
				writeln!(out, "\tif ({condition}) {{")?;
				writeln!(out, "\t\tva_list opt;")?;
				writeln!(out, "\t\tva_start(opt, {prev});")?;
				writeln!(out, "\t\tmode = va_arg(opt, int);")?;
				writeln!(out, "\t\tva_end(opt);")?;
				writeln!(out, "\t}}")
			},
			Directive::VaSkipDecls => writeln!(out, "\tva_list ap;"),
			Directive::VaSkipPre { prev } => writeln!(out, "\tva_start(ap, {prev});"),
			Directive::VaSkipPost => writeln!(out, "\tva_end(ap);"),
			Directive::Noop => Ok(()),
		}
	}
}

impl Renderer for CRenderer {
	fn render_source(&self, catalog: &Catalog) -> Result<String, RenderError> {
		let mut out = String::new();
		writeln!(out, "/* Generated by wrapgen. Do not edit. */\n")?;
		writeln!(out, "#define _GNU_SOURCE")?;
		for include in ["<dlfcn.h>", "<errno.h>", "<stdarg.h>", "<stdlib.h>"] {
			writeln!(out, "#include {include}")?;
		}
		for include in &self.config.includes {
			writeln!(out, "#include {include}")?;
		}
		writeln!(out, "#include \"{}\"\n", self.config.header_name)?;
		writeln!(out, "#define WRAPGEN_RESOLVE(name) \\")?;
		writeln!(out, "\tdo {{ \\")?;
		writeln!(out, "\t\tif (!next_##name) \\")?;
		writeln!(out, "\t\t\tnext_##name = (name##_fn_t)dlsym(RTLD_NEXT, #name); \\")?;
		writeln!(out, "\t}} while (0)\n")?;

		for (target, functions) in [(Target::Wraps, catalog.wraps()), (Target::Gates, catalog.gates())] {
			for func in functions {
				Self::check(target, func)?;
				debug!(?target, name = func.name(), "rendering wrapper");
				Self::write_real_pointer(&mut out, func)?;
				for variant in [Variant::Main, Variant::Nomap, Variant::NomapNolog] {
					// Gates only ever get the interposed definition
					if variant.enabled(func) && (target == Target::Wraps || variant == Variant::Main) {
						self.write_wrapper(&mut out, target, func, variant)?;
					}
				}
			}
		}

		Ok(out)
	}

	fn render_header(&self, catalog: &Catalog) -> Result<String, RenderError> {
		let guard = &self.config.header_guard;
		let mut out = String::new();
		writeln!(out, "/* Generated by wrapgen. Do not edit. */\n")?;
		writeln!(out, "#ifndef {guard}\n#define {guard}\n")?;
		writeln!(out, "#include <stdarg.h>\n")?;

		for func in catalog.wraps() {
			Self::check(Target::Wraps, func)?;
			for variant in [Variant::Nomap, Variant::NomapNolog] {
				if variant.enabled(func) {
					writeln!(out, "extern {};", prototype(func, variant.suffix()))?;
				}
			}
		}
		for func in catalog.gates() {
			writeln!(out, "extern {};", gate_prototype(func))?;
		}

		writeln!(out, "\n#endif /* {guard} */")?;
		Ok(out)
	}
}

fn prototype(func: &Function, suffix: &str) -> String {
	format!("{}{}{}({})", func.return_type(), func.name(), suffix, func.raw_args())
}

/// `NAME_gate(int *result_errno_ptr, real_ptr, realfnname, args...)`
fn gate_prototype(func: &Function) -> String {
	let name = func.name();
	let raw_args = func.raw_args();
	let mut params = format!(
		"int *result_errno_ptr, {} (*real_{name}_ptr)({raw_args}), const char *realfnname",
		func.return_type().trim_end()
	);

	let args = if func.flags().va_list_passthrough {
		match raw_args.rfind("...") {
			Some(at) => format!("{}va_list args", &raw_args[..at]),
			None => raw_args.to_string(),
		}
	} else {
		raw_args.to_string()
	};
	if !args.trim().is_empty() && args.trim() != "void" {
		params.push_str(", ");
		params.push_str(args.trim());
	}

	format!("{}{name}_gate({params})", func.return_type())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::annotation::{create_nomap_nolog_version, map, map_at, optional_arg_is_create_mode, pass_va_list};
	use crate::catalog::{CatalogBuilder, Entry};

	fn catalog() -> Catalog {
		let mut builder = CatalogBuilder::new();
		builder
			.wrap(
				"int open(const char *pathname, int flags, ...)",
				vec![
					map("pathname"),
					optional_arg_is_create_mode("flags&O_CREAT"),
					create_nomap_nolog_version(),
				],
			)
			.unwrap();
		builder
			.wrap(
				"int renameat(int olddirfd, const char *oldpath, int newdirfd, const char *newpath)",
				vec![map_at("olddirfd", "oldpath"), map_at("newdirfd", "newpath")],
			)
			.unwrap();
		builder.wrap("char* tmpnam(char *s)", vec![]).unwrap();
		builder
			.gate("int execl (const char *path, const char *arg, ...)", vec![pass_va_list()])
			.unwrap();
		builder
			.register(
				Target::Gates,
				Entry::new("char * get_current_dir_name (void)").arg_names(Vec::<String>::new()),
			)
			.unwrap();
		builder.build()
	}

	#[test]
	fn source_maps_and_forwards() {
		let source = CRenderer::default().render_source(&catalog()).unwrap();

		assert!(source.contains("typedef int (*open_fn_t)(const char *pathname, int flags, ...);"));
		assert!(source.contains("int open(const char *pathname, int flags, ...)\n{"));
		assert!(source.contains("\tmapped__pathname = scratchbox_path(\"open\", pathname);"));
		assert!(source.contains("\tresult = next_open(mapped__pathname, flags, mode);"));
		assert!(source.contains("\tif (flags&O_CREAT) {"));
		assert!(source.contains("\tfree(mapped__pathname);"));
	}

	#[test]
	fn source_emits_requested_variants() {
		let source = CRenderer::default().render_source(&catalog()).unwrap();

		assert!(source.contains("int open_nomap(const char *pathname, int flags, ...)"));
		assert!(source.contains("int open_nomap_nolog(const char *pathname, int flags, ...)"));
		assert!(source.contains("\tresult = next_open(pathname, flags, mode);"));
		assert!(!source.contains("renameat_nomap_nolog"));
		assert!(!source.contains("tmpnam_nomap"));
	}

	#[test]
	fn nolog_variant_does_not_log() {
		let source = CRenderer::default().render_source(&catalog()).unwrap();
		let start = source.find("int open_nomap_nolog(").unwrap();
		let body = &source[start..start + source[start..].find("\n}\n").unwrap()];
		assert!(!body.contains("SB_LOG"));
		assert!(!body.contains("scratchbox_path"));
		assert!(body.contains("va_start(opt, flags);"));
	}

	#[test]
	fn at_mappings_use_their_own_fd() {
		let source = CRenderer::default().render_source(&catalog()).unwrap();
		assert!(source.contains("\tmapped__oldpath = scratchbox_path_at(\"renameat\", olddirfd, oldpath);"));
		assert!(source.contains("\tmapped__newpath = scratchbox_path_at(\"renameat\", newdirfd, newpath);"));
		assert!(source.contains("\tresult = next_renameat(olddirfd, mapped__oldpath, newdirfd, mapped__newpath);"));
	}

	#[test]
	fn gates_forward_to_gate_functions() {
		let source = CRenderer::default().render_source(&catalog()).unwrap();
		assert!(source.contains("\tva_start(ap, arg);"));
		assert!(source.contains("\tresult = execl_gate(&result_errno, next_execl, \"execl\", path, arg, ap);"));
		assert!(source.contains(
			"\tresult = get_current_dir_name_gate(&result_errno, next_get_current_dir_name, \"get_current_dir_name\");"
		));
	}

	#[test]
	fn header_declares_variants_and_gates() {
		let header = CRenderer::default().render_header(&catalog()).unwrap();
		assert!(header.starts_with("/* Generated by wrapgen. Do not edit. */"));
		assert!(header.contains("#ifndef LIBSB2_EXPORTED_H"));
		assert!(header.contains("extern int open_nomap(const char *pathname, int flags, ...);"));
		assert!(header.contains("extern int open_nomap_nolog(const char *pathname, int flags, ...);"));
		assert!(header.contains(
			"extern int execl_gate(int *result_errno_ptr, int (*real_execl_ptr)(const char *path, const char *arg, ...), \
			 const char *realfnname, const char *path, const char *arg, va_list args);"
		));
		assert!(header.contains(
			"extern char * get_current_dir_name_gate(int *result_errno_ptr, char * (*real_get_current_dir_name_ptr)(void), \
			 const char *realfnname);"
		));
		assert!(!header.contains("tmpnam"));
	}

	#[test]
	fn passthrough_in_a_plain_wrap_is_rejected() {
		let mut builder = CatalogBuilder::new();
		builder
			.wrap("int execl (const char *path, const char *arg, ...)", vec![pass_va_list()])
			.unwrap();
		let err = CRenderer::default().render_source(&builder.build()).unwrap_err();
		assert!(matches!(err, RenderError::UnsupportedPassthrough { name } if name == "execl"));
	}

	#[test]
	fn map_function_is_configurable() {
		let renderer = CRenderer::new(RenderConfig::default().map_function("fake_root_path"));
		let source = renderer.render_source(&catalog()).unwrap();
		assert!(source.contains("mapped__pathname = fake_root_path(\"open\", pathname);"));
	}
}
