//! Compilation database generation.
//!
//! The pipeline runs once, front to back:
//!
//! 1. [`scanner`] finds every `*.o.cmd` file under the build output tree.
//! 2. [`aggregate`] parses them on a worker pool ([`parser`] does one file).
//! 3. [`drivers`] adds approximate entries for out-of-tree driver sources.
//! 4. [`emit`] writes `compile_commands.json`.
//!
//! Nothing is cached between runs.

pub mod aggregate;
pub mod drivers;
pub mod emit;
pub mod entry;
pub mod parser;
pub mod scanner;

pub use entry::CompileEntry;
pub use emit::COMPDB_FILE_NAME;

use crate::config::GenConfig;
use crate::error::Result;
use crate::report::Reporter;
use std::path::PathBuf;

/// In-memory result of one run, before it is written out.
#[derive(Debug, Default)]
pub struct CompilationDatabase {
    /// Number of metadata files that were scanned.
    pub metadata_files: usize,
    /// Entries recovered from metadata files, in completion order.
    pub parsed: Vec<CompileEntry>,
    /// Synthesized driver entries.
    pub drivers: Vec<CompileEntry>,
}

impl CompilationDatabase {
    pub fn len(&self) -> usize {
        self.parsed.len() + self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries, parsed first.
    pub fn entries(&self) -> impl Iterator<Item = &CompileEntry> {
        self.parsed.iter().chain(&self.drivers)
    }
}

/// What a finished run produced.
#[derive(Debug)]
pub struct GenerationSummary {
    pub metadata_files: usize,
    pub parsed_entries: usize,
    pub driver_entries: usize,
    pub output: PathBuf,
}

/// Scan, parse and synthesize, without touching the artifact.
pub fn build_compdb(config: &GenConfig, reporter: &dyn Reporter) -> Result<CompilationDatabase> {
    reporter.stage("Building *.o.cmd file list...");
    let files = scanner::find_metadata_files(&config.out_dir, &config.scan.suffix, reporter)?;

    reporter.stage("Parsing *.o.cmd files...");
    let parsed = aggregate::aggregate(&files, &config.out_dir, config.jobs, reporter)?;

    reporter.stage("Generating commands for device drivers...");
    let drivers = drivers::synthesize_driver_entries(
        &config.driver_dirs,
        &parsed,
        &config.drivers,
        reporter,
    )?;

    Ok(CompilationDatabase {
        metadata_files: files.len(),
        parsed,
        drivers,
    })
}

/// Run the whole pipeline and write `compile_commands.json` to the working
/// directory. Nothing is written if any fatal error occurs.
pub fn generate(config: &GenConfig, reporter: &dyn Reporter) -> Result<GenerationSummary> {
    let compdb = build_compdb(config, reporter)?;

    reporter.stage(&format!("Writing {}...", COMPDB_FILE_NAME));
    emit::write_compdb(&compdb.parsed, &compdb.drivers)?;

    Ok(GenerationSummary {
        metadata_files: compdb.metadata_files,
        parsed_entries: compdb.parsed.len(),
        driver_entries: compdb.drivers.len(),
        output: PathBuf::from(COMPDB_FILE_NAME),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileConfig;
    use crate::error::CompdbError;
    use crate::report::CollectingReporter;
    use std::fs;
    use std::path::Path;

    fn config(out_dir: &Path, drivers: &Path) -> GenConfig {
        GenConfig::resolve(
            Some(out_dir.to_path_buf()),
            vec![drivers.to_string_lossy().into_owned()],
            Some(2),
            FileConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_build_compdb_end_to_end() {
        let out = tempfile::tempdir().unwrap();
        let drv = tempfile::tempdir().unwrap();
        fs::create_dir_all(out.path().join("kernel")).unwrap();
        fs::write(
            out.path().join("kernel/.fork.o.cmd"),
            "cmd_kernel/fork.o := gcc -c -o kernel/fork.o kernel/fork.c\nsource_kernel/fork.o := kernel/fork.c\n",
        )
        .unwrap();
        fs::write(drv.path().join("drv.c"), "#include <linux/init.h>\n").unwrap();
        fs::write(drv.path().join("other.c"), "int x;\n").unwrap();

        let reporter = CollectingReporter::new();
        let db = build_compdb(&config(out.path(), drv.path()), &reporter).unwrap();

        assert_eq!(db.metadata_files, 1);
        assert_eq!(db.parsed.len(), 1);
        assert_eq!(db.drivers.len(), 1);
        assert_eq!(db.len(), 2);
        assert_eq!(db.drivers[0].command, db.parsed[0].command);
        assert_eq!(db.entries().last().map(|e| e.file.ends_with("drv.c")), Some(true));
        assert_eq!(reporter.diagnostics().len(), 1);
    }

    #[test]
    fn test_no_metadata_files_is_fatal() {
        let out = tempfile::tempdir().unwrap();
        let drv = tempfile::tempdir().unwrap();
        let err = build_compdb(&config(out.path(), drv.path()), &CollectingReporter::new())
            .unwrap_err();
        assert!(matches!(err, CompdbError::NoMetadataFiles(_)));
    }

    #[test]
    fn test_only_unmatched_metadata_is_empty_database() {
        let out = tempfile::tempdir().unwrap();
        let drv = tempfile::tempdir().unwrap();
        fs::write(out.path().join(".bar.o.cmd"), "cmd_bar.o := gcc -c bar.c\n").unwrap();

        let err = build_compdb(&config(out.path(), drv.path()), &CollectingReporter::new())
            .unwrap_err();
        assert!(matches!(err, CompdbError::EmptyCompilationDatabase));
    }
}
