//! Report writers for analysis results.
//!
//! Reports can be rendered as JSON (the full result), CSV (the ranking) or plain
//! text (the ranking followed by an activity window). Every writer accepts any
//! `io::Write`, so the binary can target stdout or a file.

use csv::Writer;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::models::{AggregatedChat, AnalysisResult, Granularity, OutputFormat};
use crate::query::{default_window, ActivityWindow};
use crate::text::ScriptDetector;

/// Settings for the activity part of text reports
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    /// Histogram granularity to include
    pub granularity: Granularity,
    /// Most recent buckets to show; `None` shows all
    pub activity_limit: Option<usize>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            granularity: Granularity::Daily,
            activity_limit: default_window(Granularity::Daily),
        }
    }
}

/// Default file name for a report in `format`
#[must_use]
pub fn report_file_name(format: OutputFormat) -> String {
    format!("chat_stats.{}", format.extension())
}

/// Write a report in the requested format
pub fn write_report<W: Write>(
    result: &AnalysisResult,
    format: OutputFormat,
    options: &ReportOptions,
    writer: W,
) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(result, writer),
        OutputFormat::Csv => write_csv(&result.chats, writer),
        OutputFormat::Txt => write_txt(result, options, writer),
    }
}

/// Write a report to `file_path`, creating parent directories as needed
pub fn write_report_to_file(
    result: &AnalysisResult,
    format: OutputFormat,
    options: &ReportOptions,
    file_path: &Path,
) -> Result<()> {
    if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent)?;
    }
    let file = File::create(file_path)?;
    let mut writer = BufWriter::new(file);
    write_report(result, format, options, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Pretty-printed JSON of the whole result
fn write_json<W: Write>(result: &AnalysisResult, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, result)?;
    writeln!(writer)?;
    Ok(())
}

/// Ranked chats as CSV.
///
/// Header: `Rank, Name, Full Name, ID, Messages`
fn write_csv<W: Write>(chats: &[AggregatedChat], writer: W) -> Result<()> {
    let mut writer = Writer::from_writer(writer);
    writer.write_record(["Rank", "Name", "Full Name", "ID", "Messages"])?;

    for (i, chat) in chats.iter().enumerate() {
        let rank = (i + 1).to_string();
        let count = chat.message_count.to_string();
        writer.write_record([
            rank.as_str(),
            chat.name.as_str(),
            chat.full_name.as_str(),
            chat.id.as_str(),
            count.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn write_txt<W: Write>(result: &AnalysisResult, options: &ReportOptions, mut writer: W) -> Result<()> {
    writeln!(
        writer,
        "{} chats, {} messages",
        result.chats.len(),
        result.total_messages()
    )?;
    writeln!(writer)?;

    let ranked: Vec<(usize, &AggregatedChat)> = result
        .chats
        .iter()
        .enumerate()
        .map(|(i, chat)| (i + 1, chat))
        .collect();
    write_chat_table(&ranked, &mut writer)?;
    writeln!(writer)?;

    let window = result
        .message_activity
        .window(options.granularity, options.activity_limit);
    write_activity(&window, &mut writer)
}

/// Plain-text table of ranked chats: rank, display name, id, message count.
///
/// The id column is blank for chats without an id; right-to-left names are isolated.
pub fn write_chat_table<W: Write>(rows: &[(usize, &AggregatedChat)], mut writer: W) -> Result<()> {
    let detector = ScriptDetector::new()?;

    writeln!(writer, "{:>5}  {:<40}  {:>16}  {:>10}", "Rank", "Name", "ID", "Messages")?;
    for (rank, chat) in rows {
        let id = if chat.has_known_id() { chat.id.as_str() } else { "" };
        writeln!(
            writer,
            "{:>5}  {:<40}  {:>16}  {:>10}",
            rank,
            detector.isolate(chat.display_name()),
            id,
            chat.message_count
        )?;
    }
    Ok(())
}

/// Plain-text listing of an activity window with its total
pub fn write_activity<W: Write>(window: &ActivityWindow<'_>, mut writer: W) -> Result<()> {
    writeln!(
        writer,
        "{} activity ({} buckets, {} messages)",
        window.granularity,
        window.buckets.len(),
        window.total_messages
    )?;
    for bucket in window.buckets {
        writeln!(writer, "{:<10}  {:>10}", bucket.date, bucket.message_count)?;
    }
    Ok(())
}
