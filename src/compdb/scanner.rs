use crate::error::{CompdbError, Result};
use crate::report::Reporter;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Regular files and symlinks that resolve to one.
pub(crate) fn is_file_entry(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

/// Collect every file under `root` whose name ends with `suffix`, at any
/// depth. Result order follows the directory walk and carries no meaning.
///
/// Subdirectories that cannot be read are skipped with a
/// [`CompdbError::UnreadableDirectory`] diagnostic.
pub fn find_metadata_files(
    root: &Path,
    suffix: &str,
    reporter: &dyn Reporter,
) -> Result<Vec<PathBuf>> {
    if !root.is_dir() || std::fs::read_dir(root).is_err() {
        return Err(CompdbError::DirectoryNotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).min_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                reporter.diagnostic(&CompdbError::UnreadableDirectory { path, source: e });
                continue;
            }
        };
        if is_file_entry(&entry) && entry.file_name().to_string_lossy().ends_with(suffix) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
