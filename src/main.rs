use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use telegram_chat_stats::config::AppConfig;
use telegram_chat_stats::file_writer::{
    report_file_name, write_activity, write_chat_table, write_report, write_report_to_file,
    ReportOptions,
};
use telegram_chat_stats::logging::init_logging;
use telegram_chat_stats::models::{AnalysisResult, Granularity, OutputFormat};
use telegram_chat_stats::query::{ChatQuery, Page};
use telegram_chat_stats::validation::InputValidator;
use telegram_chat_stats::AnalysisService;

#[derive(Parser)]
#[command(name = "tgstats", author, version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); overrides configuration
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also write JSON logs, rotated daily, next to this path
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse an export and print or save the full report
    Analyze {
        /// Path to the export's result.json
        file: PathBuf,

        /// Report format (txt, csv or json); defaults to the configured format
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Write the report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the report into the configured output directory
        #[arg(long, conflicts_with = "output")]
        save: bool,

        /// Activity granularity shown in text reports
        #[arg(short, long, default_value = "daily")]
        granularity: Granularity,
    },
    /// List ranked chats, optionally filtered by name or id
    Chats {
        /// Path to the export's result.json
        file: PathBuf,

        /// Case-insensitive text to look for in name, full name or id
        #[arg(short, long, default_value = "")]
        search: String,

        /// Page to show, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Chats per page; defaults to the configured page size
        #[arg(long)]
        per_page: Option<usize>,
    },
    /// Show the message-activity histogram
    Activity {
        /// Path to the export's result.json
        file: PathBuf,

        /// Bucket size
        #[arg(short, long, default_value = "daily")]
        granularity: Granularity,

        /// Number of most recent buckets to show
        #[arg(short, long, conflicts_with = "all")]
        limit: Option<usize>,

        /// Show every bucket
        #[arg(long)]
        all: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize logging
    let level = cli.log_level.clone().unwrap_or_else(|| config.get_log_level());
    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.logging.file_path.as_ref().map(PathBuf::from));
    let _log_guard = init_logging(
        Some(&level),
        log_file.as_deref(),
        config.logging.format == "json",
    )?;

    let mut service = AnalysisService::new(config);

    match cli.command {
        Commands::Analyze {
            file,
            format,
            output,
            save,
            granularity,
        } => analyze_command(&mut service, &file, format, output, save, granularity),
        Commands::Chats {
            file,
            search,
            page,
            per_page,
        } => chats_command(&mut service, &file, &search, page, per_page),
        Commands::Activity {
            file,
            granularity,
            limit,
            all,
        } => activity_command(&mut service, &file, granularity, limit, all),
    }
}

/// Analyse an export file, attaching the path to any error
fn load_result(service: &mut AnalysisService, file: &Path) -> Result<AnalysisResult> {
    service
        .analyze_file(file)
        .with_context(|| format!("Could not analyse {}", file.display()))
}

/// Configured number of recent buckets for a granularity; months are never windowed
fn configured_window(config: &AppConfig, granularity: Granularity) -> Option<usize> {
    match granularity {
        Granularity::Daily => Some(config.display.daily_window),
        Granularity::Weekly => Some(config.display.weekly_window),
        Granularity::Monthly => None,
    }
}

fn analyze_command(
    service: &mut AnalysisService,
    file: &Path,
    format: Option<OutputFormat>,
    output: Option<PathBuf>,
    save: bool,
    granularity: Granularity,
) -> Result<()> {
    let result = load_result(service, file)?;

    let format = match format {
        Some(format) => format,
        None => service
            .config()
            .report
            .default_format
            .parse()
            .context("Invalid report format in configuration")?,
    };
    let options = ReportOptions {
        granularity,
        activity_limit: configured_window(service.config(), granularity),
    };

    let target = output.or_else(|| {
        save.then(|| {
            Path::new(&service.config().report.output_directory).join(report_file_name(format))
        })
    });

    match target {
        Some(path) => {
            write_report_to_file(&result, format, &options, &path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!(path = %path.display(), format = %format, "Report written");
        }
        None => {
            let stdout = io::stdout();
            write_report(&result, format, &options, stdout.lock())?;
        }
    }

    Ok(())
}

fn chats_command(
    service: &mut AnalysisService,
    file: &Path,
    search: &str,
    page: usize,
    per_page: Option<usize>,
) -> Result<()> {
    let per_page = per_page.unwrap_or(service.config().display.page_size);
    InputValidator::validate_page_size(per_page)?;

    let result = load_result(service, file)?;
    let query = ChatQuery::new(search);
    let ranked = query.filter_ranked(&result.chats);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if ranked.is_empty() {
        if query.is_blank() {
            writeln!(out, "No chats with messages in this export")?;
        } else {
            writeln!(out, "No chats match \"{}\"", search.trim())?;
        }
        return Ok(());
    }

    let page = Page::of(ranked.len(), per_page, page);
    write_chat_table(page.slice(&ranked), &mut out)?;
    writeln!(
        out,
        "\nPage {} of {} ({} of {} chats)",
        page.number,
        page.total_pages,
        ranked.len(),
        result.chats.len()
    )?;

    Ok(())
}

fn activity_command(
    service: &mut AnalysisService,
    file: &Path,
    granularity: Granularity,
    limit: Option<usize>,
    all: bool,
) -> Result<()> {
    let limit = if all {
        None
    } else {
        limit.or_else(|| configured_window(service.config(), granularity))
    };
    if let Some(limit) = limit {
        InputValidator::validate_window(limit)?;
    }

    let result = load_result(service, file)?;
    let window = result.message_activity.window(granularity, limit);
    if window.buckets.is_empty() {
        warn!("No dated messages found in export");
    }

    let stdout = io::stdout();
    write_activity(&window, stdout.lock())?;
    Ok(())
}
