//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable), with table rendering
//! for list endpoints and spinners for requests in flight.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::logging::redaction;
use chrono::NaiveDateTime;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;
use ojclient_core::types::server_time;
use ojclient_core::{Category, Contest, Page, Problem, Submission, TestCase, User};
use serde::Serialize;
use std::io::{self, Write};
use std::time::Duration;
use tracing::{debug, trace};

/// Trait for formatting output
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;
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
}

/// Records that render as one table row in human output
pub trait Tabular {
    fn headers() -> &'static [&'static str];
    fn row(&self) -> Vec<String>;
}

fn time_cell(time: &Option<NaiveDateTime>) -> String {
    time.map(|t| t.format(server_time::FORMAT).to_string())
        .unwrap_or_default()
}

impl Tabular for Problem {
    fn headers() -> &'static [&'static str] {
        &["IDENTITY", "TITLE", "PASSED", "SUBMITTED", "CREATED"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.identity.clone(),
            self.title.clone(),
            self.pass_num.to_string(),
            self.submit_num.to_string(),
            time_cell(&self.created_at),
        ]
    }
}

impl Tabular for Category {
    fn headers() -> &'static [&'static str] {
        &["ID", "IDENTITY", "NAME", "PARENT"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.identity.clone(),
            self.name.clone(),
            self.parent_id.to_string(),
        ]
    }
}

impl Tabular for User {
    fn headers() -> &'static [&'static str] {
        &["IDENTITY", "NAME", "PASSED", "SUBMITTED"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.identity.clone(),
            self.name.clone(),
            self.pass_num.to_string(),
            self.submit_num.to_string(),
        ]
    }
}

impl Tabular for Submission {
    fn headers() -> &'static [&'static str] {
        &["IDENTITY", "PROBLEM", "USER", "STATUS", "CREATED"]
    }

    fn row(&self) -> Vec<String> {
        let problem = self
            .problem_basic
            .as_ref()
            .map(|p| p.title.clone())
            .unwrap_or_else(|| self.problem_identity.clone());
        let user = self
            .user_basic
            .as_ref()
            .map(|u| u.name.clone())
            .unwrap_or_else(|| self.user_identity.clone());
        let status = self
            .verdict()
            .map(|s| s.label().to_string())
            .unwrap_or_else(|| self.status.to_string());
        vec![
            self.identity.clone(),
            problem,
            user,
            status,
            time_cell(&self.created_at),
        ]
    }
}

impl Tabular for Contest {
    fn headers() -> &'static [&'static str] {
        &["IDENTITY", "NAME", "STARTS", "ENDS"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.identity.clone(),
            self.name.clone(),
            time_cell(&self.start_at),
            time_cell(&self.end_at),
        ]
    }
}

impl Tabular for TestCase {
    fn headers() -> &'static [&'static str] {
        &["IDENTITY", "INPUT", "OUTPUT"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.identity.clone(),
            self.input.replace('\n', "⏎"),
            self.output.replace('\n', "⏎"),
        ]
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, progress: bool) -> Self {
        Self {
            format,
            use_color,
            show_progress: progress && !quiet && io::stdout().is_terminal(),
            quiet,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    #[cfg(test)]
    pub fn with_writer(format: OutputFormat, use_color: bool, quiet: bool, writer: Box<dyn Write>) -> Self {
        Self {
            format,
            use_color,
            show_progress: false, // No progress bars with custom writers
            quiet,
            writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Whether output is colorized
    pub fn use_color(&self) -> bool {
        self.use_color
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

        if self.quiet || self.format != OutputFormat::Human {
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
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let mut value_json = serde_json::to_value(value)?;
        redaction::redact_json_value(&mut value_json);
        trace!(
            "Outputting data: {}",
            serde_json::to_string(&value_json).unwrap_or_else(|_| "[failed to serialize]".to_string())
        );

        let formatted = self.format.format(value)?;

        if self.format == OutputFormat::Yaml {
            // serde_yaml already ends with a newline
            self.write(&formatted)
        } else {
            self.writeln(&formatted)
        }
    }

    /// Write one page of a list endpoint
    ///
    /// Human output is a table followed by the total count; other formats
    /// serialize the page as-is.
    pub fn page<T: Tabular + Serialize>(&mut self, page: &Page<T>) -> Result<()> {
        if self.format != OutputFormat::Human {
            return self.data(page);
        }

        if page.list.is_empty() {
            return self.info(&format!("No results ({} total)", page.count));
        }

        let rows = page.list.iter().map(Tabular::row).collect();
        self.table(T::headers(), rows)?;
        if !self.quiet {
            self.writeln("")?;
            self.writeln(&format!("{} of {} shown", page.list.len(), page.count))?;
        }
        Ok(())
    }

    /// Write a table (for human format)
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if self.format != OutputFormat::Human {
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

    /// Create a spinner for a request in flight
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(default_spinner_style());
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

/// Helper function to create a spinner style
pub fn default_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

#[cfg(test)]
mod tests;
