//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable) with specialized
//! support for violations and batch reports.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::logging::redaction;
use colored::Colorize;
use perkos_validators::{format_violations, BatchReport, FormattedViolation, Violation};
use serde::Serialize;
use std::io::{self, Write};
use tracing::{debug, trace};

/// Machine-readable body for a rejected document
#[derive(Debug, Serialize)]
pub struct ViolationReport<'a> {
    pub rule_set: &'a str,
    pub ok: bool,
    pub violations: Vec<FormattedViolation>,
}

/// Machine-readable body for a batch run
#[derive(Debug, Serialize)]
pub struct BatchSummary<'a> {
    pub rule_set: &'a str,
    pub accepted: usize,
    pub rejected: usize,
    #[serde(flatten)]
    pub report: &'a BatchReport,
}

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format the violations of one rejected document
    fn format_violations(&self, rule_set: &str, violations: &[Violation]) -> Result<String>;

    /// Format a batch report with per-document violations
    fn format_batch_report(&self, rule_set: &str, report: &BatchReport) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => {
                // For human format, use pretty JSON as fallback
                Ok(serde_json::to_string_pretty(value)?)
            }
        }
    }

    fn format_violations(&self, rule_set: &str, violations: &[Violation]) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_violations_human(rule_set, violations)),
            _ => self.format(&ViolationReport {
                rule_set,
                ok: false,
                violations: format_violations(violations),
            }),
        }
    }

    fn format_batch_report(&self, rule_set: &str, report: &BatchReport) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_batch_report_human(rule_set, report)),
            _ => self.format(&BatchSummary {
                rule_set,
                accepted: report.accepted(),
                rejected: report.rejected(),
                report,
            }),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    verbose: u8,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, verbose: u8) -> Self {
        Self::with_writer(format, use_color, quiet, verbose, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        verbose: u8,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            verbose,
            writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Whether the human format is active
    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.verbose == 0 || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format, with secrets redacted
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let mut value_json = serde_json::to_value(value)?;
        redaction::redact_json_value(&mut value_json);

        trace!(
            "Outputting data: {}",
            serde_json::to_string(&value_json).unwrap_or_else(|_| "[failed to serialize]".to_string())
        );

        let formatted = self.format.format(&value_json)?;
        self.emit(&formatted)
    }

    /// Write the violations of one rejected document
    pub fn violations(&mut self, rule_set: &str, violations: &[Violation]) -> Result<()> {
        let formatted = self.format.format_violations(rule_set, violations)?;
        self.emit(&formatted)
    }

    /// Write a batch report
    pub fn batch_report(&mut self, rule_set: &str, report: &BatchReport) -> Result<()> {
        let formatted = self.format.format_batch_report(rule_set, report)?;
        self.emit(&formatted)
    }

    /// Write a table (for human format)
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        // Calculate column widths
        let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }

        let header_row = headers
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
            .collect::<Vec<_>>()
            .join(" │ ");

        if self.use_color {
            self.writeln(&header_row.bold().to_string())?;
        } else {
            self.writeln(&header_row)?;
        }

        let separator = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        self.writeln(&separator)?;

        for row in rows {
            let row_str = row
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    if i < widths.len() {
                        format!("{:width$}", cell, width = widths[i])
                    } else {
                        cell.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join(" │ ");
            self.writeln(row_str.trim_end())?;
        }

        Ok(())
    }

    /// Human output ends with a newline; machine formats are written as-is
    fn emit(&mut self, formatted: &str) -> Result<()> {
        match self.format {
            OutputFormat::Human | OutputFormat::Json | OutputFormat::JsonPretty => {
                self.writeln(formatted.trim_end_matches('\n'))
            }
            OutputFormat::Yaml => self.write(formatted),
        }
    }
}

/// Display form of a violation path
fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "(root)"
    } else {
        path
    }
}

/// Format the violations of one document for human reading
fn format_violations_human(rule_set: &str, violations: &[Violation]) -> String {
    let mut output = format!(
        "❌ '{}' rejected the document with {} violation(s)\n",
        rule_set,
        violations.len()
    );

    for (i, violation) in violations.iter().enumerate() {
        output.push_str(&format!(
            "  {}. 📍 {} [{}] {}\n",
            i + 1,
            display_path(&violation.path),
            violation.code,
            violation.message
        ));
    }

    output
}

/// Format a batch report for human reading
fn format_batch_report_human(rule_set: &str, report: &BatchReport) -> String {
    let mut output = format!("═══ Batch '{}' ═══\n", rule_set);
    output.push_str(&format!(
        "  Processed: {} of {}\n",
        report.items.len(),
        report.total
    ));
    output.push_str(&format!("  ✅ Accepted: {}\n", report.accepted()));
    output.push_str(&format!("  ❌ Rejected: {}\n", report.rejected()));

    if report.stopped_early {
        output.push_str("  ⚠️ Stopped early\n");
    }

    let violations = report.violations();
    if !violations.is_empty() {
        output.push('\n');
        for violation in &violations {
            output.push_str(&format!(
                "  📍 {} [{}] {}\n",
                violation.path, violation.code, violation.message
            ));
        }
    }

    output
}

/// In-memory writer for inspecting output in tests
#[cfg(test)]
pub(crate) mod capture {
    use super::{OutputFormat, OutputWriter};
    use std::cell::RefCell;
    use std::io::{self, Write};
    use std::rc::Rc;

    #[derive(Clone, Default)]
    pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        pub fn contents(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    /// Colorless writer over a fresh buffer
    pub fn writer(format: OutputFormat, quiet: bool) -> (OutputWriter, SharedBuffer) {
        let buffer = SharedBuffer::default();
        let writer = OutputWriter::with_writer(format, false, quiet, 0, Box::new(buffer.clone()));
        (writer, buffer)
    }
}
