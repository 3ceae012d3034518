//! C declaration parsing
//!
//! Declarations are written in C surface syntax, e.g.
//! `int openat(int dirfd, const char *pathname, int flags, ...)`.
//! The parser only splits out the pieces the catalog needs; argument
//! types are never interpreted.

use std::collections::HashSet;

use crate::catalog::{CatalogError, Result};
use crate::function::VARIADIC;

/// The parts of a declaration string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
	/// Everything before the function name, verbatim
	pub return_type: String,
	pub name: String,
	/// Text between the first `(` and the last `)`
	pub raw_args: String,
}

/// Parse a declaration into its return type, name and raw argument list
///
/// The name is the last whitespace-separated token before the first `(`,
/// with any pointer markers stripped. The argument list runs to the last
/// `)` so that function-pointer parameters stay intact.
pub fn parse(declaration: &str) -> Result<Signature> {
	let malformed = |reason| CatalogError::MalformedSignature {
		declaration: declaration.to_string(),
		reason,
	};

	let open = declaration.find('(').ok_or_else(|| malformed("missing `(`"))?;
	let close = declaration
		.rfind(')')
		.filter(|&close| close > open)
		.ok_or_else(|| malformed("missing `)` after the argument list"))?;

	let head = declaration[..open].trim_end();
	let token = head.split_whitespace().next_back().unwrap_or_default();
	let name = token.rsplit('*').next().unwrap_or_default();
	if name.is_empty() {
		return Err(malformed("empty function name"));
	}
	if !is_c_identifier(name) {
		return Err(malformed("function name is not an identifier"));
	}

	let return_type = &declaration[..head.len() - name.len()];
	if return_type.trim().is_empty() {
		return Err(malformed("missing return type"));
	}

	Ok(Signature {
		return_type: return_type.to_string(),
		name: name.to_string(),
		raw_args: declaration[open + 1..close].to_string(),
	})
}

/// Guess the parameter names of a raw argument list
///
/// For each comma-separated argument this keeps the text after the last
/// space, then after the last `*`, then drops any array suffix. Arguments
/// that are themselves function pointers come out wrong, which is what
/// explicit overrides are for. An empty or `void` list has no names.
#[must_use]
pub fn default_arg_names(raw_args: &str) -> Vec<String> {
	if takes_no_args(raw_args) {
		return Vec::new();
	}
	raw_args
		.split(',')
		.map(|arg| {
			let word = arg.rsplit(' ').next().unwrap_or_default();
			let word = word.rsplit('*').next().unwrap_or_default();
			word.split('[').next().unwrap_or_default().to_string()
		})
		.collect()
}

/// Number of parameters in a raw argument list
///
/// Only commas outside parentheses and brackets separate parameters, so
/// function-pointer parameters count once.
#[must_use]
pub fn arg_count(raw_args: &str) -> usize {
	if takes_no_args(raw_args) {
		return 0;
	}
	let mut depth = 0usize;
	let mut count = 1;
	for c in raw_args.chars() {
		match c {
			'(' | '[' => depth += 1,
			')' | ']' => depth = depth.saturating_sub(1),
			',' if depth == 0 => count += 1,
			_ => {},
		}
	}
	count
}

fn takes_no_args(raw_args: &str) -> bool {
	matches!(raw_args.trim(), "" | "void")
}

/// Check an explicit argument-name override
///
/// The override must name every parameter of `raw_args` exactly once.
/// Every entry must be a C identifier or the variadic placeholder, and no
/// entry may repeat.
pub fn validate_arg_names(declaration: &str, raw_args: &str, names: &[String]) -> Result<()> {
	let expected = arg_count(raw_args);
	if names.len() != expected {
		return Err(CatalogError::ArgCountMismatch {
			declaration: declaration.to_string(),
			expected,
			found: names.len(),
		});
	}

	let mut seen = HashSet::new();
	for name in names {
		let valid = name == VARIADIC || is_c_identifier(name);
		if !valid || !seen.insert(name.as_str()) {
			return Err(CatalogError::InvalidArgName {
				declaration: declaration.to_string(),
				name: name.clone(),
			});
		}
	}
	Ok(())
}

/// Whether `s` is a valid C identifier
#[must_use]
pub fn is_c_identifier(s: &str) -> bool {
	let mut chars = s.chars();
	chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
		&& chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
