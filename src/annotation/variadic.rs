//! Annotations for functions with a variadic tail

use tracing::debug;

use crate::annotation::{Annotation, AnnotationError, AnnotationResult};
use crate::function::{CREATE_MODE_ARG, Directive, Fragment, Function, VARIADIC};

const CREATE_MODE: &str = "optional_arg_is_create_mode";
const PASSTHROUGH: &str = "va_list_passthrough";

/// The variadic tail carries an optional `mode_t`, present when `condition`
/// holds at run time (`open` with `O_CREAT`)
///
/// The placeholder slot becomes a named `mode` argument in both the live
/// and the original argument lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionalCreateMode {
	condition: String,
}

impl OptionalCreateMode {
	#[must_use]
	pub fn new(condition: impl Into<String>) -> Self {
		Self {
			condition: condition.into(),
		}
	}
}

impl Annotation for OptionalCreateMode {
	fn apply(&self, func: &mut Function) -> AnnotationResult {
		if func.flags().va_list_passthrough {
			return Err(AnnotationError::IncompatibleAnnotations {
				first: PASSTHROUGH,
				second: CREATE_MODE,
			});
		}

		let index = variadic_slot(func)?;
		let prev = func.original_arg_names()[index - 1].clone();
		debug!(function = func.name(), condition = %self.condition, prev = %prev, "optional create mode");

		func.rename_arg_everywhere(index, CREATE_MODE_ARG);
		let flags = func.flags_mut();
		flags.opt_arg_condition = Some(self.condition.clone());
		flags.opt_arg_prev_name = Some(prev.clone());

		Ok(Some(Fragment {
			decls: Some(Directive::OptArgDecls),
			pre: Some(Directive::OptArgPre {
				condition: self.condition.clone(),
				prev,
			}),
			post: Some(Directive::Noop),
			suppress_default_mapping: true,
		}))
	}

	fn name(&self) -> &'static str {
		CREATE_MODE
	}

	fn clone_box(&self) -> Box<dyn Annotation> {
		Box::new(self.clone())
	}
}

/// Forward the variadic tail opaquely as a `va_list` (the `execl` family)
///
/// The placeholder is dropped from both argument lists; the tail is started
/// after the last named parameter and handed on as a whole.
#[wrapgen_macros::annotation]
pub fn va_list_passthrough(func: &mut Function) -> AnnotationResult {
	if func.flags().opt_arg_condition.is_some() {
		return Err(AnnotationError::IncompatibleAnnotations {
			first: CREATE_MODE,
			second: PASSTHROUGH,
		});
	}

	let index = variadic_slot(func)?;
	let prev = func.original_arg_names()[index - 1].clone();
	debug!(function = func.name(), prev = %prev, "passing va_list through");

	func.remove_arg(index);
	let flags = func.flags_mut();
	flags.opt_arg_prev_name = Some(prev.clone());
	flags.va_list_passthrough = true;

	Ok(Some(Fragment {
		decls: Some(Directive::VaSkipDecls),
		pre: Some(Directive::VaSkipPre { prev }),
		post: Some(Directive::VaSkipPost),
		suppress_default_mapping: true,
	}))
}

/// Create an `OptionalCreateMode` annotation
#[must_use]
pub fn optional_arg_is_create_mode(condition: &str) -> Box<dyn Annotation> {
	Box::new(OptionalCreateMode::new(condition))
}

/// Create a `VaListPassthrough` annotation
#[must_use]
pub fn pass_va_list() -> Box<dyn Annotation> {
	Box::new(VaListPassthrough::new())
}

fn variadic_slot(func: &Function) -> Result<usize, AnnotationError> {
	match func.arg_position(VARIADIC) {
		None => Err(AnnotationError::MissingPlaceholder),
		Some(0) => Err(AnnotationError::UnnamedVariadic),
		Some(index) => Ok(index),
	}
}
