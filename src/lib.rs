//! # kcompdb - compile_commands.json for Kbuild trees
//!
//! Kbuild records the exact compiler invocation of every object it builds in
//! a `.<object>.cmd` file. kcompdb turns those files into a JSON Compilation
//! Database for clangd and other indexers, and adds approximate entries for
//! out-of-tree driver sources that were never built in the scanned tree.
//!
//! ## Quick Start
//!
//! ```bash
//! # From the kernel build output directory
//! kcompdb -d ../my-driver
//!
//! # Explicit build directory, several driver directories
//! kcompdb -O ~/linux/out -d drivers/a drivers/b
//! ```
//!
//! ## Module Organization
//!
//! - [`compdb`] - scan, parse, synthesize and emit
//! - [`config`] - CLI and `kcompdb.toml` resolution
//! - [`error`] - error taxonomy
//! - [`report`] - progress and diagnostics side channel

/// Compilation database pipeline.
pub mod compdb;

/// Run configuration (`GenConfig`, `kcompdb.toml`).
pub mod config;

/// Fatal and recoverable error kinds.
pub mod error;

/// Progress and diagnostic reporting.
pub mod report;

/// Terminal UI (progress bar, summary table).
pub mod ui;
