//! Terminal feedback.
//!
//! - `ConsoleReporter` - progress bar and colored diagnostics on stderr
//! - `Table` - box-drawn summary table, shrunk to the terminal width
//!
//! ```text
//!   ┌──────────────────┬───────────────────────┐
//!   │ Item             │ Count                 │
//!   ├──────────────────┼───────────────────────┤
//!   │ Metadata files   │ 21034                 │
//!   │ Parsed entries   │ 21030                 │
//!   └──────────────────┴───────────────────────┘
//! ```

use crate::error::CompdbError;
use crate::report::Reporter;
use anyhow::Result;
use colored::*;
use console::{Term, measure_text_width, truncate_str};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct ConsoleReporter {
    pb: ProgressBar,
    diagnostics: AtomicUsize,
}

impl ConsoleReporter {
    pub fn new() -> Result<Self> {
        let style = ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] {bar:50.cyan/blue} {percent:>3}% {pos}/{len} {msg}",
            )?
            .progress_chars("|>-");

        // Hidden until the first progress tick so stage lines print cleanly.
        let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden());
        pb.set_style(style);
        Ok(Self {
            pb,
            diagnostics: AtomicUsize::new(0),
        })
    }

    pub fn diagnostic_count(&self) -> usize {
        self.diagnostics.load(Ordering::Relaxed)
    }

    fn line(&self, text: String) {
        if self.pb.is_hidden() {
            eprintln!("{}", text);
        } else {
            self.pb.println(text);
        }
    }
}

impl Reporter for ConsoleReporter {
    fn stage(&self, message: &str) {
        self.line(format!("{} {}", "⚙️".cyan(), message));
    }

    fn progress(&self, done: usize, total: usize) {
        if self.pb.is_hidden() && !self.pb.is_finished() {
            self.pb.set_draw_target(ProgressDrawTarget::stderr());
            self.pb.set_message("parsing");
        }
        self.pb.set_length(total as u64);
        self.pb.set_position(done as u64);
    }

    fn diagnostic(&self, diagnostic: &CompdbError) {
        self.diagnostics.fetch_add(1, Ordering::Relaxed);
        self.line(format!("   {} {}", "!".yellow(), diagnostic));
    }

    fn finish_progress(&self) {
        self.pb.finish_with_message("done");
        self.pb.set_draw_target(ProgressDrawTarget::hidden());
    }
}

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Rows with the wrong number of cells are dropped.
    pub fn add_row(&mut self, row: Vec<String>) {
        if row.len() == self.headers.len() {
            self.rows.push(row);
        }
    }

    fn column_widths(&self, max_width: usize) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| measure_text_width(h)).collect();
        for row in &self.rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(measure_text_width(cell));
            }
        }

        // Borders: "  │" plus " x │" per column.
        let overhead = 3 + 3 * widths.len();
        let mut total: usize = widths.iter().sum();
        let available = max_width.saturating_sub(overhead);
        while total > available {
            let Some(widest) = widths.iter_mut().filter(|w| **w > 8).max_by_key(|w| **w) else {
                break;
            };
            *widest -= 1;
            total -= 1;
        }
        widths
    }

    pub fn render(&self, max_width: usize) -> String {
        if self.headers.is_empty() {
            return String::new();
        }
        let widths = self.column_widths(max_width);

        let border = |left: &str, mid: &str, right: &str| {
            let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("  {}{}{}\n", left, segments.join(mid), right)
        };
        let row_line = |cells: &[String], bold: bool| {
            let mut line = String::from("  │");
            for (cell, &w) in cells.iter().zip(&widths) {
                let text = truncate_str(cell, w, "...");
                let pad = w.saturating_sub(measure_text_width(&text));
                let text = if bold {
                    text.bold().to_string()
                } else {
                    text.into_owned()
                };
                line.push_str(&format!(" {}{} │", text, " ".repeat(pad)));
            }
            line.push('\n');
            line
        };

        let mut out = border("┌", "┬", "┐");
        out.push_str(&row_line(&self.headers, true));
        out.push_str(&border("├", "┼", "┤"));
        for row in &self.rows {
            out.push_str(&row_line(row, false));
        }
        out.push_str(&border("└", "┴", "┘"));
        out
    }

    /// Print to stderr, fitted to the terminal.
    pub fn print(&self) {
        let (_rows, cols) = Term::stderr().size();
        eprint!("{}", self.render(cols as usize));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_aligns_columns() {
        colored::control::set_override(false);
        let mut table = Table::new(&["Item", "Count"]);
        table.add_row(vec!["Metadata files".to_string(), "3".to_string()]);
        table.add_row(vec!["too".to_string(), "many".to_string(), "cells".to_string()]);

        let out = table.render(120);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "  ┌────────────────┬───────┐");
        assert_eq!(lines[1], "  │ Item           │ Count │");
        assert_eq!(lines[3], "  │ Metadata files │ 3     │");
    }

    #[test]
    fn test_render_shrinks_wide_cells() {
        colored::control::set_override(false);
        let mut table = Table::new(&["Item", "Value"]);
        table.add_row(vec!["Output".to_string(), "x".repeat(200)]);

        let out = table.render(40);
        assert!(out.lines().all(|l| measure_text_width(l) <= 40));
        assert!(out.contains("..."));
    }

    #[test]
    fn test_reporter_counts_diagnostics() {
        let reporter = ConsoleReporter::new().unwrap();
        reporter.diagnostic(&CompdbError::NotADriverSource("a.c".into()));
        reporter.diagnostic(&CompdbError::NotADriverSource("b.c".into()));
        assert_eq!(reporter.diagnostic_count(), 2);
    }
}
