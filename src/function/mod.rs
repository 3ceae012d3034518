//! Catalog entries
//!
//! This module contains the `Function` record that describes one wrapped
//! libc function, together with the flags and fragments the annotations
//! attach to it.

mod fragment;

pub use fragment::{Directive, Fragment};

use crate::signature::Signature;

/// Placeholder argument name for a C variadic tail
pub const VARIADIC: &str = "...";

/// Prefix given to an argument slot whose value is replaced by its mapped path
pub const MAPPED_PREFIX: &str = "mapped__";

/// Name given to the optional `mode_t` argument of the `open` family
pub const CREATE_MODE_ARG: &str = "mode";

/// Generation flags set by annotations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags {
	/// Emit a `NAME_nomap` wrapper that logs but does not map
	pub emit_nomap_variant: bool,
	/// Emit a `NAME_nomap_nolog` wrapper that neither maps nor logs
	pub emit_nomap_nolog_variant: bool,
	/// Runtime test deciding whether the optional argument was passed
	pub opt_arg_condition: Option<String>,
	/// Name of the parameter right before the variadic tail
	pub opt_arg_prev_name: Option<String>,
	/// Directory-fd argument of the last at-relative mapping
	pub map_fd: Option<String>,
	/// The last argument that was mapped
	pub map_key: Option<String>,
	/// The variadic tail is forwarded as a `va_list`
	pub va_list_passthrough: bool,
}

/// One wrapped function
///
/// A `Function` is created from a parsed declaration, mutated in order by
/// its annotations, and then frozen inside a `Catalog`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
	declaration: String,
	return_type: String,
	name: String,
	raw_args: String,
	arg_names: Vec<String>,
	original_arg_names: Vec<String>,
	fragments: Vec<Fragment>,
	flags: Flags,
}

impl Function {
	/// Create a function record from a parsed signature and its argument names
	///
	/// `original_arg_names` is snapshotted from `arg_names` here, before any
	/// annotation gets to run.
	#[must_use]
	pub fn new(declaration: impl Into<String>, signature: Signature, arg_names: Vec<String>) -> Self {
		Self {
			declaration: declaration.into(),
			return_type: signature.return_type,
			name: signature.name,
			raw_args: signature.raw_args,
			original_arg_names: arg_names.clone(),
			arg_names,
			fragments: Vec::new(),
			flags: Flags::default(),
		}
	}

	/// The declaration string this function was parsed from
	#[must_use]
	pub fn declaration(&self) -> &str {
		&self.declaration
	}

	/// The return type, verbatim from the declaration
	#[must_use]
	pub fn return_type(&self) -> &str {
		&self.return_type
	}

	#[must_use]
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The unparsed argument list
	#[must_use]
	pub fn raw_args(&self) -> &str {
		&self.raw_args
	}

	/// Argument names as passed to the real function
	#[must_use]
	pub fn arg_names(&self) -> &[String] {
		&self.arg_names
	}

	/// Argument names before any slot was renamed for mapping
	#[must_use]
	pub fn original_arg_names(&self) -> &[String] {
		&self.original_arg_names
	}

	#[must_use]
	pub fn fragments(&self) -> &[Fragment] {
		&self.fragments
	}

	#[must_use]
	pub const fn flags(&self) -> &Flags {
		&self.flags
	}

	pub const fn flags_mut(&mut self) -> &mut Flags {
		&mut self.flags
	}

	/// Whether the function returns nothing
	#[must_use]
	pub fn returns_void(&self) -> bool {
		self.return_type.trim() == "void"
	}

	/// Position of `name` in the live argument list
	#[must_use]
	pub fn arg_position(&self, name: &str) -> Option<usize> {
		self.arg_names.iter().position(|arg| arg == name)
	}

	/// Rename a slot in the live argument list only
	pub fn rename_arg(&mut self, index: usize, name: impl Into<String>) {
		self.arg_names[index] = name.into();
	}

	/// Rename a slot in both the live and the original argument lists
	pub fn rename_arg_everywhere(&mut self, index: usize, name: impl Into<String>) {
		let name = name.into();
		self.original_arg_names[index] = name.clone();
		self.arg_names[index] = name;
	}

	/// Remove a slot from both argument lists, returning the live name
	pub fn remove_arg(&mut self, index: usize) -> String {
		self.original_arg_names.remove(index);
		self.arg_names.remove(index)
	}

	pub(crate) fn push_fragment(&mut self, fragment: Fragment) {
		self.fragments.push(fragment);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::signature;

	fn open() -> Function {
		let declaration = "int open(const char *pathname, int flags, ...)";
		let sig = signature::parse(declaration).unwrap();
		let names = signature::default_arg_names(&sig.raw_args);
		Function::new(declaration, sig, names)
	}

	#[test]
	fn snapshot_is_taken_at_creation() {
		let mut func = open();
		func.rename_arg(0, "mapped__pathname");
		assert_eq!(func.arg_names()[0], "mapped__pathname");
		assert_eq!(func.original_arg_names()[0], "pathname");
	}

	#[test]
	fn removal_keeps_lists_in_sync() {
		let mut func = open();
		assert_eq!(func.remove_arg(2), "...");
		assert_eq!(func.arg_names(), func.original_arg_names());
		assert_eq!(func.arg_names().len(), 2);
	}

	#[test]
	fn void_detection_ignores_spacing() {
		let declaration = "void  sync(void)";
		let sig = signature::parse(declaration).unwrap();
		let func = Function::new(declaration, sig, Vec::new());
		assert!(func.returns_void());
		assert!(!open().returns_void());
	}
}
