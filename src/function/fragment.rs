//! Code-generation fragments contributed by annotations

/// A typed code-generation directive
///
/// Each directive names a piece of C the renderer knows how to expand.
/// Keys are the caller-visible argument names, not the `mapped__` slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
	/// Declare the local holding the mapped value of `key`
	MapDecls { key: String },
	/// Map `key` through the path-translation function
	MapPre { key: String },
	/// Map `key` relative to the directory fd `dir_fd`
	MapAtPre { dir_fd: String, key: String },
	/// Release the mapped value of `key` after the call
	MapPost { key: String },
	/// Declare the optional create-mode argument
	OptArgDecls,
	/// Fetch the optional argument after `prev` when `condition` holds
	OptArgPre { condition: String, prev: String },
	/// Declare the `va_list` forwarded to the gate
	VaSkipDecls,
	/// Start the `va_list` after `prev`
	VaSkipPre { prev: String },
	/// Finish the `va_list`
	VaSkipPost,
	/// Occupies a slot without emitting anything
	Noop,
}

/// A fixed-shape bundle of directives for one function
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
	/// Local declarations
	pub decls: Option<Directive>,
	/// Code run before the real call
	pub pre: Option<Directive>,
	/// Code run after the real call
	pub post: Option<Directive>,
	/// The fragment carries bespoke code instead of a path mapping, and is
	/// kept in the no-mapping variants
	pub suppress_default_mapping: bool,
}
