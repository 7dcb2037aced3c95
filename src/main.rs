//! CLI entry point for `tnefextract`.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use humansize::{format_size, BINARY};

use tnefextract::config::{self, Config};
use tnefextract::error::TnefError;
use tnefextract::export;
use tnefextract::model::message::TnefMessage;
use tnefextract::parser::tnef;

#[derive(Parser)]
#[command(
    name = "tnefextract",
    version,
    about = "Extract attachments and message bodies from TNEF (winmail.dat) files"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// TNEF file to extract (shorthand for `extract <FILE>`)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Write the ZIP archive here instead of `<FILE>_extracted.zip`
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a TNEF file into a ZIP archive
    Extract {
        path: PathBuf,
        /// Archive output path (default: `<FILE>` plus the configured suffix)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show what a TNEF file contains without extracting it
    Inspect {
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::load_config();

    // Configure logging: stderr + optional log file
    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    match cli.command {
        Some(Commands::Extract { path, output }) => cmd_extract(&path, output.as_deref(), &config),
        Some(Commands::Inspect { path, json }) => cmd_inspect(&path, json),
        Some(Commands::Completions { shell }) => cmd_completions(shell),
        Some(Commands::Manpage) => cmd_manpage(),
        None => {
            if let Some(path) = cli.file {
                cmd_extract(&path, cli.output.as_deref(), &config)
            } else {
                // No file, no subcommand: print usage and fail.
                Cli::command().print_help()?;
                std::process::exit(2);
            }
        }
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    // Try to set up file logging
    let log_dir = config::cache_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "tnefextract.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        // Fall back to stderr only
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "tnefextract", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}

/// Decode a TNEF file and package its contents into a ZIP archive.
fn cmd_extract(path: &Path, output: Option<&Path>, config: &Config) -> anyhow::Result<()> {
    let data = map_tnef_file(path)?;
    let message =
        tnef::decode(&data).with_context(|| format!("Failed to decode {}", path.display()))?;

    if message.is_empty() {
        tracing::info!(path = %path.display(), "Stream decoded to an empty message");
    }

    let output_path = resolve_output_path(path, output, config);
    let entries = export::archive::export_zip(&message, &output_path)?;

    println!(
        "  Extracted {} file(s) to {}",
        entries.len(),
        output_path.display()
    );
    Ok(())
}

/// Show a summary of a TNEF file's contents.
fn cmd_inspect(path: &Path, json: bool) -> anyhow::Result<()> {
    let data = map_tnef_file(path)?;
    let message =
        tnef::decode(&data).with_context(|| format!("Failed to decode {}", path.display()))?;

    if json {
        print_summary_json(path, data.len(), &message)?;
    } else {
        print_summary_table(path, data.len(), &message);
    }
    Ok(())
}

/// Map the input file read-only. The decoder only ever reads the buffer.
fn map_tnef_file(path: &Path) -> anyhow::Result<memmap2::Mmap> {
    if !path.exists() {
        return Err(TnefError::FileNotFound(path.to_path_buf()).into());
    }
    let file = File::open(path).map_err(|e| TnefError::io(path, e))?;
    if file.metadata()?.len() == 0 {
        anyhow::bail!("Not a TNEF stream: {} is empty", path.display());
    }
    // Safety: the map is read-only and dropped before the command returns.
    let mmap = unsafe { memmap2::Mmap::map(&file) }.map_err(|e| TnefError::io(path, e))?;
    Ok(mmap)
}

/// Where the archive goes: explicit `-o`, else the configured output
/// directory, else next to the input, named `<input><suffix>`.
fn resolve_output_path(input: &Path, output: Option<&Path>, config: &Config) -> PathBuf {
    if let Some(path) = output {
        return path.to_path_buf();
    }

    let mut name = input
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "tnef".into());
    name.push(&config.export.zip_suffix);

    match &config.export.default_output_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

/// Print a human-readable summary table.
fn print_summary_table(path: &Path, file_size: usize, message: &TnefMessage) {
    println!();
    println!("  {:<20} {}", "File", path.display());
    println!("  {:<20} {}", "File size", format_size(file_size, BINARY));
    println!("  {:<20} {}", "Attachments", message.attachments.len());
    println!(
        "  {:<20} {}",
        "Plain body",
        describe_size(message.body.len())
    );
    println!(
        "  {:<20} {}",
        "HTML body",
        describe_size(message.body_html.len())
    );

    let mut keys: Vec<&String> = message.attributes.keys().collect();
    keys.sort();
    println!(
        "  {:<20} {}",
        "MAPI attributes",
        if keys.is_empty() {
            "(none)".to_string()
        } else {
            keys.iter()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }
    );

    if !message.attachments.is_empty() {
        println!();
        println!("  Attachments:");
        for (index, attachment) in message.attachments.iter().enumerate() {
            let name = export::attachment::attachment_filename(attachment, index);
            println!(
                "    {:>4}  {} ({})",
                index + 1,
                name,
                format_size(attachment.data.len(), BINARY)
            );
        }
    }
    println!();
}

/// Print the summary as JSON.
fn print_summary_json(path: &Path, file_size: usize, message: &TnefMessage) -> anyhow::Result<()> {
    let attachments: Vec<serde_json::Value> = message
        .attachments
        .iter()
        .enumerate()
        .map(|(index, a)| {
            serde_json::json!({
                "index": index,
                "title": a.title,
                "filename": export::attachment::attachment_filename(a, index),
                "size": a.data.len(),
            })
        })
        .collect();

    let mut keys: Vec<&String> = message.attributes.keys().collect();
    keys.sort();

    let summary = serde_json::json!({
        "file": path.to_string_lossy(),
        "file_size": file_size,
        "attachment_count": message.attachments.len(),
        "attachments": attachments,
        "body_bytes": message.body.len(),
        "body_html_bytes": message.body_html.len(),
        "mapi_attributes": keys,
    });

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn describe_size(bytes: usize) -> String {
    if bytes == 0 {
        "(none)".to_string()
    } else {
        format_size(bytes, BINARY)
    }
}
