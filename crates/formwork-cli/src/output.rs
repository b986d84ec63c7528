//! Output formatting and writing utilities
//!
//! This module formats and writes output as JSON, YAML, or
//! human-readable text, with specialised human output for
//! validation errors and schema summaries.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use formwork_schemas::{SchemaMetadata, ValidationErrors};
use serde::Serialize;
use std::io::{self, Write};
use tracing::{debug, trace};

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format validation errors as a field to message listing
    fn format_validation_errors(&self, errors: &ValidationErrors) -> Result<String>;

    /// Format a schema summary
    fn format_metadata(&self, metadata: &SchemaMetadata) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            // Human output falls back to pretty JSON for arbitrary data
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_validation_errors(&self, errors: &ValidationErrors) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_validation_errors_human(errors)),
            _ => self.format(errors),
        }
    }

    fn format_metadata(&self, metadata: &SchemaMetadata) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_metadata_human(metadata)),
            _ => self.format(metadata),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writer(format, use_color, quiet, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
        }
    }

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

        if self.quiet || !self.is_human() {
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

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if !self.is_human() {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!(bytes = formatted.len(), "Outputting data");

        if self.format == OutputFormat::Yaml {
            // serde_yaml already ends with a newline
            self.write(&formatted)
        } else {
            self.writeln(&formatted)
        }
    }

    /// Write validation errors with specialized formatting
    pub fn validation_errors(&mut self, errors: &ValidationErrors) -> Result<()> {
        let formatted = self.format.format_validation_errors(errors)?;
        self.writeln(formatted.trim_end())
    }

    /// Write a schema summary with specialized formatting
    pub fn metadata(&mut self, metadata: &SchemaMetadata) -> Result<()> {
        let formatted = self.format.format_metadata(metadata)?;
        self.writeln(formatted.trim_end())
    }
}

/// Lay out rows under headers with padded columns
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| match widths.get(i) {
                Some(width) => format!("{:width$}", cell, width = *width),
                None => cell.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" │ ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(headers.to_vec()));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─"),
    );
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}

/// Format validation errors for human reading
fn format_validation_errors_human(errors: &ValidationErrors) -> String {
    if errors.is_empty() {
        return "✓ No validation errors\n".to_string();
    }

    let mut output = format!("✗ Validation failed - {} error(s)\n\n", errors.len());
    for (path, message) in errors.iter() {
        output.push_str(&format!("  • {}: {}\n", path, message));
    }
    output
}

/// Format a schema summary for human reading
fn format_metadata_human(metadata: &SchemaMetadata) -> String {
    let mut output = format!("{}\n", metadata.title.as_deref().unwrap_or("Schema"));
    if let Some(description) = &metadata.description {
        output.push_str(&format!("{}\n", description));
    }
    output.push('\n');

    if metadata.fields.is_empty() {
        output.push_str("No fields declared\n");
        return output;
    }

    let rows = metadata
        .fields
        .iter()
        .map(|field| {
            vec![
                field.name.clone(),
                field.type_info.display_type(),
                if field.required { "required" } else { "optional" }.to_string(),
                field.description.clone().unwrap_or_default(),
            ]
        })
        .collect::<Vec<_>>();
    output.push_str(&render_table(&["Field", "Type", "Required", "Description"], &rows));

    let undeclared: Vec<&str> = metadata
        .required
        .iter()
        .filter(|name| metadata.field(name).is_none())
        .map(String::as_str)
        .collect();
    if !undeclared.is_empty() {
        output.push_str(&format!("\nRequired but not declared: {}\n", undeclared.join(", ")));
    }
    output
}

#[cfg(test)]
mod tests {
    include!("output/tests.rs");
}
