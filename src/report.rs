//! Side channel for runtime feedback.
//!
//! The pipeline never writes to the console itself. Stage changes, progress
//! and recoverable diagnostics are pushed through a [`Reporter`], so the
//! binary can draw a progress bar while tests collect or ignore them.

use crate::error::CompdbError;
use colored::*;
use std::sync::Mutex;

pub trait Reporter {
    /// A new pipeline stage started.
    fn stage(&self, message: &str);

    /// `done` of `total` metadata files have been parsed. `total` is never 0.
    fn progress(&self, done: usize, total: usize);

    /// A recoverable problem; the item it names was skipped.
    fn diagnostic(&self, diagnostic: &CompdbError);

    /// Parsing finished, no more progress updates follow.
    fn finish_progress(&self) {}
}

/// Discards everything.
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn stage(&self, _message: &str) {}
    fn progress(&self, _done: usize, _total: usize) {}
    fn diagnostic(&self, _diagnostic: &CompdbError) {}
}

/// Writes diagnostics to stderr as they occur and nothing else. Used by
/// `--quiet`.
pub struct QuietReporter;

impl Reporter for QuietReporter {
    fn stage(&self, _message: &str) {}
    fn progress(&self, _done: usize, _total: usize) {}

    fn diagnostic(&self, diagnostic: &CompdbError) {
        eprintln!("{} {}", "!".yellow(), diagnostic);
    }
}

/// Keeps diagnostics and progress ticks in memory, for tests.
#[doc(hidden)]
#[derive(Default)]
pub struct CollectingReporter {
    diagnostics: Mutex<Vec<String>>,
    progress: Mutex<Vec<(usize, usize)>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<String> {
        self.diagnostics
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    pub fn progress_ticks(&self) -> Vec<(usize, usize)> {
        self.progress.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl Reporter for CollectingReporter {
    fn stage(&self, _message: &str) {}

    fn progress(&self, done: usize, total: usize) {
        if let Ok(mut ticks) = self.progress.lock() {
            ticks.push((done, total));
        }
    }

    fn diagnostic(&self, diagnostic: &CompdbError) {
        if let Ok(mut diags) = self.diagnostics.lock() {
            diags.push(diagnostic.to_string());
        }
    }
}
