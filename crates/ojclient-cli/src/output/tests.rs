// Tests for output formatting
//
// A shared in-memory buffer stands in for stdout so the rendered text can be
// inspected.

use super::*;
use crate::handlers::test_support::SharedBuffer;
use ojclient_core::SubmitStatus;

fn writer(format: OutputFormat, quiet: bool) -> (OutputWriter, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let writer = OutputWriter::with_writer(format, false, quiet, Box::new(buffer.clone()));
    (writer, buffer)
}

fn sample_page() -> Page<Problem> {
    Page {
        list: vec![
            Problem {
                identity: "p-1".to_string(),
                title: "A+B".to_string(),
                pass_num: 3,
                submit_num: 5,
                ..Default::default()
            },
            Problem {
                identity: "p-2".to_string(),
                title: "Two Sum".to_string(),
                ..Default::default()
            },
        ],
        count: 12,
    }
}

#[test]
fn test_page_renders_table_in_human_mode() {
    let (mut out, buffer) = writer(OutputFormat::Human, false);
    out.page(&sample_page()).unwrap();

    let text = buffer.contents();
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].starts_with("IDENTITY"));
    assert!(lines[0].contains("TITLE"));
    assert!(lines[1].contains("─┼─"));
    assert!(lines[2].contains("A+B"));
    assert!(lines[3].contains("Two Sum"));
    assert!(text.contains("2 of 12 shown"));
}

#[test]
fn test_page_serializes_in_machine_modes() {
    let (mut out, buffer) = writer(OutputFormat::Json, false);
    out.page(&sample_page()).unwrap();

    let value: serde_json::Value = serde_json::from_str(buffer.contents().trim()).unwrap();
    assert_eq!(value["count"], 12);
    assert_eq!(value["list"][1]["identity"], "p-2");
}

#[test]
fn test_yaml_output() {
    let (mut out, buffer) = writer(OutputFormat::Yaml, false);
    out.data(&serde_json::json!({"token": "abc", "is_admin": 0})).unwrap();
    let text = buffer.contents();
    assert!(text.contains("is_admin: 0"));
    // redaction only applies to the trace log, never to the output itself
    assert!(text.contains("token: abc"));
}

#[test]
fn test_messages_suppressed_outside_human_mode() {
    let (mut out, buffer) = writer(OutputFormat::Json, false);
    out.info("fetching").unwrap();
    out.success("done").unwrap();
    out.warning("careful").unwrap();
    out.section("Problem").unwrap();
    assert!(buffer.contents().is_empty());
}

#[test]
fn test_quiet_keeps_warnings() {
    let (mut out, buffer) = writer(OutputFormat::Human, true);
    out.info("fetching").unwrap();
    out.success("done").unwrap();
    out.warning("careful").unwrap();
    assert_eq!(buffer.contents(), "WARNING: careful\n");
}

#[test]
fn test_empty_page_reports_total() {
    let (mut out, buffer) = writer(OutputFormat::Human, false);
    let page: Page<Category> = Page {
        list: Vec::new(),
        count: 0,
    };
    out.page(&page).unwrap();
    assert_eq!(buffer.contents(), "INFO: No results (0 total)\n");
}

#[test]
fn test_submission_row_prefers_names_and_labels() {
    let submission = Submission {
        identity: "s-1".to_string(),
        problem_identity: "p-1".to_string(),
        user_identity: "u-1".to_string(),
        user_basic: Some(User {
            name: "alice".to_string(),
            ..Default::default()
        }),
        status: SubmitStatus::WrongAnswer.code(),
        ..Default::default()
    };
    let row = submission.row();
    assert_eq!(row[1], "p-1");
    assert_eq!(row[2], "alice");
    assert_eq!(row[3], "wrong answer");
}

#[test]
fn test_spinner_disabled_for_custom_writers() {
    let (out, _) = writer(OutputFormat::Human, false);
    assert!(out.spinner("loading").is_none());
}
