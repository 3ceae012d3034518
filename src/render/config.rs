//! Configuration for the C renderer

/// Names the generated C code refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
	/// File name of the generated header, included by the source
	pub header_name: String,
	/// Include guard of the generated header
	pub header_guard: String,
	/// Extra `#include` targets for the source, e.g. `<fcntl.h>` or `"sb2.h"`
	pub includes: Vec<String>,
	/// Path-translation function, called as `f(fn_name, path)`
	pub map_function: String,
	/// Directory-fd relative translation, called as `f(fn_name, dirfd, path)`
	pub map_at_function: String,
	/// Releases a mapped path after the real call
	pub release_function: String,
	/// Logging macro, called as `LOG(level, fmt, ...)`
	pub log_macro: String,
	/// Level passed to the logging macro
	pub log_level: String,
}

impl Default for RenderConfig {
	fn default() -> Self {
		Self {
			header_name: "exported.h".to_string(),
			header_guard: "LIBSB2_EXPORTED_H".to_string(),
			includes: ["<fcntl.h>", "<sys/stat.h>", "\"libsb2.h\""].map(String::from).into(),
			map_function: "scratchbox_path".to_string(),
			map_at_function: "scratchbox_path_at".to_string(),
			release_function: "free".to_string(),
			log_macro: "SB_LOG".to_string(),
			log_level: "SB_LOGLEVEL_DEBUG".to_string(),
		}
	}
}

impl RenderConfig {
	/// Set the header file name and derive its include guard
	#[must_use]
	pub fn header_name(mut self, name: impl Into<String>) -> Self {
		self.header_name = name.into();
		self.header_guard = self
			.header_name
			.chars()
			.map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
			.collect();
		self
	}

	/// Set the path-translation function
	#[must_use]
	pub fn map_function(mut self, name: impl Into<String>) -> Self {
		self.map_function = name.into();
		self
	}

	/// Set the directory-fd relative path-translation function
	#[must_use]
	pub fn map_at_function(mut self, name: impl Into<String>) -> Self {
		self.map_at_function = name.into();
		self
	}

	/// Add an include to the generated source
	#[must_use]
	pub fn include(mut self, target: impl Into<String>) -> Self {
		self.includes.push(target.into());
		self
	}
}
