//! Report writer tests against files on disk

use std::fs;
use tempfile::TempDir;
use telegram_chat_stats::file_writer::{
    report_file_name, write_chat_table, write_report_to_file, ReportOptions,
};
use telegram_chat_stats::{analyze_str, AggregatedChat, AnalysisResult, Granularity, OutputFormat};

fn sample() -> AnalysisResult {
    analyze_str(
        r#"{"chats": {"list": [
            {"name": "Bob", "id": 7, "messages": [
                {"date": "2023-05-01T10:00:00", "from": "Bob Stone", "from_id": "user7"},
                {"date": "2023-05-08T10:00:00"}
            ]},
            {"name": "مریم", "id": 9, "messages": [{"date": "2023-05-09T10:00:00"}]}
        ]}}"#,
    )
    .unwrap()
}

#[test]
fn test_report_file_names() {
    assert_eq!(report_file_name(OutputFormat::Csv), "chat_stats.csv");
    assert_eq!(report_file_name(OutputFormat::Txt), "chat_stats.txt");
    assert_eq!(report_file_name(OutputFormat::Json), "chat_stats.json");
}

#[test]
fn test_write_json_report_creates_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/out").join(report_file_name(OutputFormat::Json));

    write_report_to_file(&sample(), OutputFormat::Json, &ReportOptions::default(), &path).unwrap();

    let written: AnalysisResult = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written, sample());
}

#[test]
fn test_write_csv_report() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stats.csv");

    write_report_to_file(&sample(), OutputFormat::Csv, &ReportOptions::default(), &path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Rank,Name,Full Name,ID,Messages");
    assert_eq!(lines[1], "1,Bob,Bob Stone,7,2");
    assert_eq!(lines[2], "2,مریم,مریم,9,1");
}

#[test]
fn test_write_txt_report_weekly() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stats.txt");
    let options = ReportOptions {
        granularity: Granularity::Weekly,
        activity_limit: Some(1),
    };

    write_report_to_file(&sample(), OutputFormat::Txt, &options, &path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("2 chats, 3 messages"));
    assert!(content.contains("weekly activity (1 buckets, 2 messages)"));
    assert!(content.contains("2023-05-07"));
    assert!(!content.contains("2023-04-30"));
}

#[test]
fn test_chat_table_isolates_rtl_names() {
    let chat = AggregatedChat {
        name: "مریم".to_string(),
        id: "9".to_string(),
        full_name: String::new(),
        message_count: 4,
    };
    let mut out = Vec::new();
    write_chat_table(&[(3, &chat)], &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("\u{2068}مریم\u{2069}"));
    assert!(text.lines().nth(1).unwrap().trim_start().starts_with('3'));
}
