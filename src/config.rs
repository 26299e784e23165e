//! Run configuration.
//!
//! The CLI flags and the optional `kcompdb.toml` tuning file are resolved
//! once into a [`GenConfig`], which is then passed by reference through the
//! whole pipeline and never mutated.

use crate::error::{CompdbError, Result};
use serde::Deserialize;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Tuning file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "kcompdb.toml";

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub jobs: Option<usize>,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub drivers: DriverConfig,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScanConfig {
    /// File name suffix of Kbuild metadata files.
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DriverConfig {
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Generated sources (`foo.mod.c`) that are never drivers.
    #[serde(default = "default_exclude_suffix")]
    pub exclude_suffix: String,
    /// Substring a driver source must contain.
    #[serde(default = "default_marker")]
    pub marker: String,
    #[serde(default = "default_object_extension")]
    pub object_extension: String,
}

fn default_suffix() -> String {
    ".o.cmd".to_string()
}

fn default_extension() -> String {
    "c".to_string()
}

fn default_exclude_suffix() -> String {
    ".mod.c".to_string()
}

fn default_marker() -> String {
    "<linux/".to_string()
}

fn default_object_extension() -> String {
    "o".to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            suffix: default_suffix(),
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            exclude_suffix: default_exclude_suffix(),
            marker: default_marker(),
            object_extension: default_object_extension(),
        }
    }
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| CompdbError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| CompdbError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `explicit` if given, otherwise `kcompdb.toml` from the working
    /// directory if it exists, otherwise defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Self::default()),
        }
    }
}

/// Everything one run needs, resolved up front.
#[derive(Debug, Clone)]
pub struct GenConfig {
    /// Absolute build output directory to scan.
    pub out_dir: PathBuf,
    pub driver_dirs: Vec<PathBuf>,
    pub jobs: usize,
    pub scan: ScanConfig,
    pub drivers: DriverConfig,
}

impl GenConfig {
    /// Merge CLI values over the tuning file. `out_dir` defaults to the
    /// working directory and is made absolute.
    pub fn resolve(
        out_dir: Option<PathBuf>,
        driver_dirs: Vec<String>,
        jobs: Option<usize>,
        file: FileConfig,
    ) -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|source| CompdbError::Io {
            path: PathBuf::from("."),
            source,
        })?;
        let out_dir = match out_dir {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => cwd.join(dir),
            None => cwd,
        };

        let driver_dirs: Vec<PathBuf> = driver_dirs
            .iter()
            .map(|d| d.trim())
            .filter(|d| !d.is_empty())
            .map(PathBuf::from)
            .collect();
        if driver_dirs.is_empty() {
            return Err(CompdbError::InvalidConfig(
                "at least one driver directory is required".to_string(),
            ));
        }

        let jobs = match jobs.or(file.jobs) {
            Some(0) => {
                return Err(CompdbError::InvalidConfig(
                    "jobs must be greater than zero".to_string(),
                ));
            }
            Some(n) => n,
            None => std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
        };

        Ok(Self {
            out_dir,
            driver_dirs,
            jobs,
            scan: file.scan,
            drivers: file.drivers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_kbuild_layout() {
        let cfg = FileConfig::default();
        assert_eq!(cfg.scan.suffix, ".o.cmd");
        assert_eq!(cfg.drivers.extension, "c");
        assert_eq!(cfg.drivers.exclude_suffix, ".mod.c");
        assert_eq!(cfg.drivers.marker, "<linux/");
        assert_eq!(cfg.drivers.object_extension, "o");
        assert!(cfg.jobs.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg: FileConfig = toml::from_str(
            r#"
jobs = 4

[drivers]
marker = "<zephyr/"
"#,
        )
        .unwrap();
        assert_eq!(cfg.jobs, Some(4));
        assert_eq!(cfg.drivers.marker, "<zephyr/");
        assert_eq!(cfg.drivers.extension, "c");
        assert_eq!(cfg.scan, ScanConfig::default());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let parsed: std::result::Result<FileConfig, _> = toml::from_str("threads = 3\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_load_reports_parse_error_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kcompdb.toml");
        fs::write(&path, "[scan\nsuffix = 1").unwrap();

        let err = FileConfig::load(&path).unwrap_err();
        assert!(matches!(err, CompdbError::ConfigParse { .. }));
        assert!(err.to_string().contains("kcompdb.toml"));
    }

    #[test]
    fn test_resolve_trims_drivers_and_absolutizes_out_dir() {
        let cfg = GenConfig::resolve(
            Some(PathBuf::from("build")),
            vec!["  drivers/foo ".to_string(), " ".to_string()],
            Some(2),
            FileConfig::default(),
        )
        .unwrap();
        assert!(cfg.out_dir.is_absolute());
        assert!(cfg.out_dir.ends_with("build"));
        assert_eq!(cfg.driver_dirs, vec![PathBuf::from("drivers/foo")]);
        assert_eq!(cfg.jobs, 2);
    }

    #[test]
    fn test_resolve_cli_jobs_override_file() {
        let file = FileConfig {
            jobs: Some(8),
            ..Default::default()
        };
        let cfg = GenConfig::resolve(None, vec!["drv".to_string()], Some(3), file).unwrap();
        assert_eq!(cfg.jobs, 3);
    }

    #[test]
    fn test_resolve_rejects_zero_jobs_and_no_drivers() {
        let err = GenConfig::resolve(None, vec!["drv".to_string()], Some(0), FileConfig::default())
            .unwrap_err();
        assert!(matches!(err, CompdbError::InvalidConfig(_)));

        let err = GenConfig::resolve(None, Vec::new(), None, FileConfig::default()).unwrap_err();
        assert!(matches!(err, CompdbError::InvalidConfig(_)));
    }
}
