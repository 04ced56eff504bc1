// Tests for report generation functionality

use harvest_core::report::{
    generate_json_report, generate_markdown_report, generate_report, generate_text_report,
    save_archive, save_report, ReportFormat,
};
use harvest_core::{ArchivedBytes, ScrapeResult};
use harvest_scanner::{Extractor, RenderMode, RenderedPage};

const URL: &str = "https://example.com/guide/";

fn sample_result() -> ScrapeResult {
    let html = r#"
        <pre>cargo add harvest</pre>
        <pre>```inner```</pre>
        <a href="setup.js">setup</a>
        <a href="/theme.css">theme</a>
    "#;
    Extractor::new()
        .extract(&RenderedPage::new(URL, html, RenderMode::Static), URL)
        .unwrap()
}

// ============================================================================
// Report Format Tests
// ============================================================================

#[test]
fn test_report_format_from_str_text() {
    assert!(matches!(ReportFormat::from_str("text"), Some(ReportFormat::Text)));
}

#[test]
fn test_report_format_from_str_json() {
    assert!(matches!(ReportFormat::from_str("json"), Some(ReportFormat::Json)));
}

#[test]
fn test_report_format_from_str_markdown_aliases() {
    assert!(matches!(
        ReportFormat::from_str("markdown"),
        Some(ReportFormat::Markdown)
    ));
    assert!(matches!(ReportFormat::from_str("md"), Some(ReportFormat::Markdown)));
}

#[test]
fn test_report_format_from_str_case_insensitive() {
    assert!(matches!(ReportFormat::from_str("TEXT"), Some(ReportFormat::Text)));
    assert!(matches!(ReportFormat::from_str("Json"), Some(ReportFormat::Json)));
}

#[test]
fn test_report_format_from_str_invalid() {
    assert!(ReportFormat::from_str("csv").is_none());
    assert!(ReportFormat::from_str("").is_none());
}

#[test]
fn test_report_format_extension() {
    assert_eq!(ReportFormat::Text.extension(), "txt");
    assert_eq!(ReportFormat::Json.extension(), "json");
    assert_eq!(ReportFormat::Markdown.extension(), "md");
}

// ============================================================================
// Report Content Tests
// ============================================================================

#[test]
fn test_text_report_lists_blocks_and_links() {
    let report = generate_text_report(URL, &sample_result());

    assert!(report.contains("HARVEST SCRAPE REPORT"));
    assert!(report.contains(&format!("Target:       {}", URL)));
    assert!(report.contains("Code blocks:  2"));
    assert!(report.contains("Asset links:  2"));
    assert!(report.contains("[1] 1 lines"));
    assert!(report.contains("cargo add harvest"));
    assert!(report.contains("https://example.com/guide/setup.js"));
    assert!(report.contains("https://example.com/theme.css"));
}

#[test]
fn test_json_report_uses_wire_field_names() {
    let json = generate_json_report(URL, &sample_result()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["url"], URL);
    assert!(value["generated_at"].is_string());
    assert_eq!(value["generator"]["name"], "harvest");
    assert_eq!(value["code_blocks"][0], "cargo add harvest");
    assert_eq!(value["file_links"][0]["filename"], "setup.js");
    assert_eq!(value["file_links"][1]["url"], "https://example.com/theme.css");
}

#[test]
fn test_markdown_report_fences_survive_backticks() {
    let report = generate_markdown_report(URL, &sample_result());

    assert!(report.starts_with("# Harvest report for <https://example.com/guide/>"));
    assert!(report.contains("## Code blocks (2)"));
    assert!(report.contains("````\n```inner```\n````"));
    assert!(report.contains("- [setup.js](https://example.com/guide/setup.js)"));
}

#[test]
fn test_generate_report_dispatches_on_format() {
    let result = sample_result();

    let text = generate_report(URL, &result, ReportFormat::Text).unwrap();
    let markdown = generate_report(URL, &result, ReportFormat::Markdown).unwrap();
    let json = generate_report(URL, &result, ReportFormat::Json).unwrap();

    assert!(text.contains("HARVEST SCRAPE REPORT"));
    assert!(markdown.starts_with("# Harvest report"));
    assert!(json.trim_start().starts_with('{'));
}

// ============================================================================
// Saving Tests
// ============================================================================

#[test]
fn test_save_report_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.txt");

    save_report("hello", &path).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
}

#[test]
fn test_save_archive_creates_directory() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("downloads").join("nested");
    let archive = ArchivedBytes {
        archive_name: "app.js.zip".to_string(),
        entry_name: "app.js".to_string(),
        bytes: vec![0x50, 0x4b, 0x05, 0x06],
    };

    let path = save_archive(&archive, &target).unwrap();

    assert_eq!(path, target.join("app.js.zip"));
    assert_eq!(std::fs::read(&path).unwrap(), archive.bytes);
}
