use anyhow::Result;
use clap::Parser;
use wrapgen::util::{init_logging, init_logging_with};
use wrapgen_cli::{Cli, run};

fn main() -> Result<()> {
	let cli = Cli::parse();
	if cli.verbose {
		init_logging_with("wrapgen=debug,wrapgen_cli=debug");
	} else {
		init_logging();
	}

	let summary = run(&cli)?;
	for path in &summary.written {
		println!("wrote {}", path.display());
	}
	if cli.check {
		println!("catalog ok: {} wraps, {} gates", summary.wraps, summary.gates);
	}
	Ok(())
}
