//! # kcompdb CLI Entry Point
//!
//! Parses the command line, resolves the run configuration and hands off to
//! [`kcompdb::compdb::generate`]. Any fatal error ends the process with a
//! non-zero status and no `compile_commands.json` is written.

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use std::time::Instant;

use kcompdb::compdb;
use kcompdb::config::{FileConfig, GenConfig};
use kcompdb::report::QuietReporter;
use kcompdb::ui::{ConsoleReporter, Table};

#[derive(Parser)]
#[command(name = "kcompdb")]
#[command(about = "Generate compile_commands.json from Kbuild .o.cmd files", version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
struct Cli {
    /// Build output directory to scan [default: current directory]
    #[arg(short = 'O', long)]
    out_dir: Option<PathBuf>,

    /// Out-of-tree driver source directories
    #[arg(short = 'd', long, num_args = 1.., required = true)]
    drivers: Vec<String>,

    /// Number of parser threads [default: available parallelism]
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Tuning file [default: ./kcompdb.toml if present]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print only errors and skipped-item warnings
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let file_config =
        FileConfig::discover(cli.config.as_deref()).context("Failed to load configuration")?;
    let config = GenConfig::resolve(cli.out_dir, cli.drivers, cli.jobs, file_config)?;

    if cli.quiet {
        compdb::generate(&config, &QuietReporter)?;
        return Ok(());
    }

    let start_time = Instant::now();
    let reporter = ConsoleReporter::new()?;
    let summary = compdb::generate(&config, &reporter).with_context(|| {
        format!(
            "Failed to generate compilation database for {}",
            config.out_dir.display()
        )
    })?;

    let mut table = Table::new(&["Item", "Count"]);
    table.add_row(vec![
        "Metadata files".dimmed().to_string(),
        summary.metadata_files.to_string(),
    ]);
    table.add_row(vec![
        "Parsed entries".green().to_string(),
        summary.parsed_entries.to_string(),
    ]);
    table.add_row(vec![
        "Driver entries".cyan().to_string(),
        summary.driver_entries.to_string(),
    ]);
    table.add_row(vec![
        "Diagnostics".yellow().to_string(),
        reporter.diagnostic_count().to_string(),
    ]);
    table.print();

    eprintln!(
        "{} Wrote {} in {:.2?}",
        "✓".green(),
        summary.output.display().to_string().bold(),
        start_time.elapsed()
    );
    Ok(())
}
