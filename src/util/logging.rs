//! Logging utilities for wrapgen

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

// Initialize logging once
static INIT: Once = Once::new();

/// Initialize the tracing system
///
/// This function sets up tracing with an `EnvFilter` that:
/// - Honors the `RUST_LOG` environment variable if set
/// - Uses the `WRAPGEN_DEBUG` environment variable to control logging level
/// - Only logs warnings and errors by default
pub fn init_logging() {
	let fallback = if std::env::var("WRAPGEN_DEBUG").is_ok() {
		"wrapgen=debug"
	} else {
		"wrapgen=warn"
	};
	init_logging_with(fallback);
}

/// Initialize the tracing system with an explicit fallback directive
///
/// `RUST_LOG` still wins when it is set. Later calls are no-ops.
pub fn init_logging_with(fallback: &str) {
	INIT.call_once(|| {
		let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

		tracing_subscriber::registry()
			.with(fmt::layer().with_target(true).with_writer(std::io::stderr))
			.with(filter)
			.init();
	});
}
