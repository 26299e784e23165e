use super::entry::CompileEntry;
use super::parser::{ParsedMetadata, parse_metadata};
use crate::error::{CompdbError, Result};
use crate::report::Reporter;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

fn parse_file(path: &Path, directory: &str) -> Result<ParsedMetadata> {
    let bytes = fs::read(path).map_err(|source| CompdbError::UnreadableMetadataFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_metadata(&String::from_utf8_lossy(&bytes), directory, path))
}

/// Parse every metadata file on a pool of `jobs` workers and concatenate the
/// per-file chunks in completion order.
///
/// Each worker sends back its own chunk; only this thread touches the result
/// vector. Unreadable files and dropped keys go to `reporter` as
/// diagnostics. The pool is torn down before returning.
pub fn aggregate(
    files: &[PathBuf],
    root: &Path,
    jobs: usize,
    reporter: &dyn Reporter,
) -> Result<Vec<CompileEntry>> {
    if files.is_empty() {
        return Err(CompdbError::NoMetadataFiles(root.to_path_buf()));
    }

    let total = files.len();
    let directory = root.to_string_lossy().into_owned();
    let min_len = ((total as f64).sqrt() as usize).max(1);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .thread_name(|i| format!("kcompdb-parse-{i}"))
        .build()?;

    let (tx, rx) = mpsc::channel::<Result<ParsedMetadata>>();
    let mut entries = Vec::new();

    std::thread::scope(|s| {
        let pool = &pool;
        let directory = directory.as_str();
        s.spawn(move || {
            pool.install(|| {
                files
                    .par_iter()
                    .with_min_len(min_len)
                    .for_each_with(tx, |tx, path| {
                        // The receiver outlives every sender.
                        let _ = tx.send(parse_file(path, directory));
                    });
            });
        });

        reporter.progress(0, total);
        for (done, chunk) in rx.iter().enumerate() {
            match chunk {
                Ok(parsed) => {
                    for diag in &parsed.diagnostics {
                        reporter.diagnostic(diag);
                    }
                    entries.extend(parsed.entries);
                }
                Err(e) => reporter.diagnostic(&e),
            }
            reporter.progress(done + 1, total);
        }
    });

    reporter.finish_progress();
    Ok(entries)
}
