//! Tests for output formatting and writing

use super::*;
use crate::models::AnalysisReport;
use std::path::PathBuf;

fn sample_report() -> AnalysisReport {
    AnalysisReport {
        entry: PathBuf::from("/proj/main.lua"),
        scripts: vec![
            PathBuf::from("/proj/util.lua"),
            PathBuf::from("/proj/net/http.lua"),
        ],
        libraries: vec![PathBuf::from("/proj/fastjson.so")],
        analyzed_at: chrono::Utc::now(),
    }
}

#[test]
fn test_text_formatter_lists_everything() {
    let formatter = TextFormatter::new(false, false, false);
    let output = formatter.format(&sample_report()).unwrap();

    assert!(output.contains("/proj/main.lua"));
    assert!(output.contains("Scripts (2):"));
    assert!(output.contains("/proj/util.lua"));
    assert!(output.contains("/proj/net/http.lua"));
    assert!(output.contains("Native libraries (1):"));
    assert!(output.contains("/proj/fastjson.so"));
}

#[test]
fn test_text_formatter_quiet_is_paths_only() {
    let formatter = TextFormatter::new(false, false, true);
    let output = formatter.format(&sample_report()).unwrap();

    assert_eq!(
        output,
        "/proj/util.lua\n/proj/net/http.lua\n/proj/fastjson.so\n"
    );
}

#[test]
fn test_json_formatter_round_trips() {
    let formatter = JsonFormatter::new(true);
    let output = formatter.format(&sample_report()).unwrap();

    let parsed: AnalysisReport = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed.scripts.len(), 2);
    assert_eq!(parsed.libraries.len(), 1);
}

#[test]
fn test_file_writer_writes_content() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("report.txt");

    let writer = FileWriter::new(&path);
    writer.write("manifest contents\n").unwrap();

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "manifest contents\n"
    );
}

#[test]
fn test_create_formatter_honors_format() {
    let report = sample_report();
    let json = create_formatter(crate::models::OutputFormat::Json, false, false, false)
        .format(&report)
        .unwrap();
    assert!(json.trim_start().starts_with('{'));

    let text = create_formatter(crate::models::OutputFormat::Text, false, false, false)
        .format(&report)
        .unwrap();
    assert!(text.starts_with("Entry:"));
}
