//! Function catalogs
//!
//! A catalog is two ordered lists of finished `Function` records:
//! `wraps`, the plain map-and-log wrappers, and `gates`, whose wrappers
//! hand off to hand-written gate functions. Registration order is kept as
//! is and drives the order of the generated definitions.

mod builder;
mod builtin;
mod error;

pub use builder::{CatalogBuilder, Entry};
pub use builtin::builtin_catalog;
pub use error::{CatalogError, Result};

use crate::function::Function;

/// Which list a registration goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
	Wraps,
	Gates,
}

/// A finished catalog
///
/// Only `CatalogBuilder::build` creates one, so a renderer never sees a
/// partially built catalog, and entries cannot be changed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
	wraps: Vec<Function>,
	gates: Vec<Function>,
}

impl Catalog {
	pub(crate) const fn new(wraps: Vec<Function>, gates: Vec<Function>) -> Self {
		Self { wraps, gates }
	}

	#[must_use]
	pub fn wraps(&self) -> &[Function] {
		&self.wraps
	}

	#[must_use]
	pub fn gates(&self) -> &[Function] {
		&self.gates
	}

	/// The list for a given target
	#[must_use]
	pub fn get(&self, target: Target) -> &[Function] {
		match target {
			Target::Wraps => &self.wraps,
			Target::Gates => &self.gates,
		}
	}

	/// Total number of entries in both lists
	#[must_use]
	pub fn len(&self) -> usize {
		self.wraps.len() + self.gates.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.wraps.is_empty() && self.gates.is_empty()
	}

	/// Find the first entry with the given name, wraps before gates
	#[must_use]
	pub fn find(&self, name: &str) -> Option<&Function> {
		self.wraps.iter().chain(&self.gates).find(|func| func.name() == name)
	}
}
