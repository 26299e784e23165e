//! Synthesized entries for out-of-tree driver sources.
//!
//! Drivers built outside the scanned tree leave no `.o.cmd` files behind, so
//! their entries are approximated: the command of an existing entry is
//! reused verbatim with the driver's own file and object names. The
//! `-DKBUILD_BASENAME` / `-DKBUILD_MODNAME` flags in that command keep
//! naming the template's object, not the driver.

use super::entry::CompileEntry;
use super::scanner::is_file_entry;
use crate::config::DriverConfig;
use crate::error::{CompdbError, Result};
use crate::report::Reporter;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn driver_candidates(dir: &Path, cfg: &DriverConfig) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() || fs::read_dir(dir).is_err() {
        return Err(CompdbError::DirectoryNotFound(dir.to_path_buf()));
    }

    let candidates = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(is_file_entry)
        .filter(|e| {
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.') && !name.ends_with(&cfg.exclude_suffix)
        })
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.to_string_lossy() == cfg.extension.as_str())
        })
        .collect();
    Ok(candidates)
}

/// Does the file at `path` look like kernel module code?
fn is_driver_source(path: &Path, marker: &str) -> Result<bool> {
    let bytes = fs::read(path).map_err(|source| CompdbError::UnreadableDriverSource {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).contains(marker))
}

fn synthesize_entry(src: &Path, template: &CompileEntry, cfg: &DriverConfig) -> CompileEntry {
    CompileEntry {
        directory: template.directory.clone(),
        command: template.command.clone(),
        file: src.to_string_lossy().into_owned(),
        output: src
            .with_extension(&cfg.object_extension)
            .to_string_lossy()
            .into_owned(),
    }
}

/// Build one entry per driver source found directly inside each of `dirs`.
///
/// The first entry of `compdb` serves as the command template. Candidates
/// without `cfg.marker` are skipped with a [`CompdbError::NotADriverSource`]
/// diagnostic.
pub fn synthesize_driver_entries(
    dirs: &[PathBuf],
    compdb: &[CompileEntry],
    cfg: &DriverConfig,
    reporter: &dyn Reporter,
) -> Result<Vec<CompileEntry>> {
    let template = compdb.first().ok_or(CompdbError::EmptyCompilationDatabase)?;

    let mut entries = Vec::new();
    for dir in dirs {
        for src in driver_candidates(dir, cfg)? {
            match is_driver_source(&src, &cfg.marker) {
                Ok(true) => entries.push(synthesize_entry(&src, template, cfg)),
                Ok(false) => reporter.diagnostic(&CompdbError::NotADriverSource(src)),
                Err(e) => reporter.diagnostic(&e),
            }
        }
    }
    Ok(entries)
}
