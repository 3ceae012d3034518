//! Command-line front end for wrapgen
//!
//! Builds the built-in catalog, renders the wrapper source and header, and
//! writes them out.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use wrapgen::{CRenderer, RenderConfig, builtin_catalog, render_all};

/// Generate the path-mapping libc wrappers
#[derive(Debug, Parser)]
#[command(name = "wrapgen")]
#[command(version, about, long_about = None)]
pub struct Cli {
	/// Directory the generated files are written to
	#[arg(short, long, env = "WRAPGEN_OUT_DIR", default_value = ".")]
	pub out_dir: PathBuf,

	/// File name of the generated wrapper source
	#[arg(long, default_value = "wrappers.c")]
	pub source: String,

	/// File name of the generated header
	#[arg(long, default_value = "exported.h")]
	pub header: String,

	/// Path-translation function the wrappers call
	#[arg(long, env = "WRAPGEN_MAP_FUNCTION")]
	pub map_function: Option<String>,

	/// Build and render the catalog without writing anything
	#[arg(long)]
	pub check: bool,

	/// Log every registration
	#[arg(short, long)]
	pub verbose: bool,
}

/// What a run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
	pub wraps: usize,
	pub gates: usize,
	/// Files written, empty for `--check`
	pub written: Vec<PathBuf>,
}

/// Run the generator
pub fn run(cli: &Cli) -> Result<Summary> {
	let catalog = builtin_catalog().context("invalid wrapper catalog")?;

	let mut config = RenderConfig::default().header_name(&cli.header);
	if let Some(map_function) = &cli.map_function {
		config = config.map_function(map_function);
	}
	let artifacts = render_all(&CRenderer::new(config), &catalog).context("failed to render wrappers")?;

	let mut written = Vec::new();
	if !cli.check {
		fs::create_dir_all(&cli.out_dir)
			.with_context(|| format!("failed to create {}", cli.out_dir.display()))?;
		written.push(write(&cli.out_dir.join(&cli.source), &artifacts.source)?);
		written.push(write(&cli.out_dir.join(&cli.header), &artifacts.header)?);
	}

	info!(wraps = catalog.wraps().len(), gates = catalog.gates().len(), "generation finished");
	Ok(Summary {
		wraps: catalog.wraps().len(),
		gates: catalog.gates().len(),
		written,
	})
}

fn write(path: &Path, contents: &str) -> Result<PathBuf> {
	fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
	info!(path = %path.display(), bytes = contents.len(), "wrote file");
	Ok(path.to_path_buf())
}
