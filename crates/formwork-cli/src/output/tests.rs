// Tests for output formatting
//
// These cover the human formatting of validation errors and schema
// summaries, and the writer's handling of quiet and machine formats.

use super::*;
use formwork_schemas::extract_metadata;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

/// Writer that keeps everything written for inspection
#[derive(Clone, Default)]
struct Captured(Rc<RefCell<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Captured {
    fn text(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

fn writer(format: OutputFormat, quiet: bool) -> (OutputWriter, Captured) {
    let captured = Captured::default();
    let writer = OutputWriter::with_writer(format, false, quiet, Box::new(captured.clone()));
    (writer, captured)
}

fn sample_errors() -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.insert_required("title");
    errors.insert("end", "End must be after start");
    errors
}

#[test]
fn test_validation_errors_formatting_human() {
    let formatted = OutputFormat::Human.format_validation_errors(&sample_errors()).unwrap();
    assert!(formatted.starts_with("✗ Validation failed - 2 error(s)"));
    assert!(formatted.contains("  • end: End must be after start\n"));
    assert!(formatted.contains("  • title: This field is required\n"));

    let empty = OutputFormat::Human
        .format_validation_errors(&ValidationErrors::new())
        .unwrap();
    assert_eq!(empty, "✓ No validation errors\n");
}

#[test]
fn test_validation_errors_formatting_json() {
    let formatted = OutputFormat::Json.format_validation_errors(&sample_errors()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&formatted).unwrap();
    assert_eq!(
        value,
        json!({"end": "End must be after start", "title": "This field is required"})
    );
}

#[test]
fn test_metadata_formatting_human() {
    let metadata = extract_metadata(&json!({
        "title": "Event",
        "properties": {
            "title": {"type": "string", "description": "Shown in the calendar"},
            "tags": {"type": "array", "items": {"type": "string"}}
        },
        "required": ["title", "ghost"]
    }));

    let formatted = OutputFormat::Human.format_metadata(&metadata).unwrap();
    assert!(formatted.starts_with("Event\n"));
    assert!(formatted.contains("Field"));
    assert!(formatted.contains("required"));
    assert!(formatted.contains("Shown in the calendar"));
    assert!(formatted.contains("Required but not declared: ghost"));
}

#[test]
fn test_render_table_alignment() {
    let table = render_table(
        &["Field", "Type"],
        &[vec!["a".to_string(), "string".to_string()]],
    );
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines[0], "Field │ Type");
    assert_eq!(lines[1], "──────┼───────");
    assert_eq!(lines[2], "a     │ string");
}

#[test]
fn test_quiet_suppresses_messages_not_data() {
    let (mut output, captured) = writer(OutputFormat::Human, true);
    output.info("loading").unwrap();
    output.success("done").unwrap();
    output.data(&json!({"a": 1})).unwrap();
    assert_eq!(captured.text(), "{\n  \"a\": 1\n}\n");
}

#[test]
fn test_machine_formats_skip_messages() {
    let (mut output, captured) = writer(OutputFormat::Json, false);
    output.info("loading").unwrap();
    output.warning("careful").unwrap();
    output.data(&json!({"a": [1, 2]})).unwrap();
    assert_eq!(captured.text(), "{\"a\":[1,2]}\n");
}

#[test]
fn test_plain_messages_without_color() {
    let (mut output, captured) = writer(OutputFormat::Human, false);
    output.info("loading").unwrap();
    output.warning("careful").unwrap();
    assert_eq!(captured.text(), "INFO: loading\nWARNING: careful\n");
}
