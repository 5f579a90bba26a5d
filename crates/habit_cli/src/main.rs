//! habit CLI entry point.
//!
//! Runs one command against a local SQLite file and exits non-zero on error.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
