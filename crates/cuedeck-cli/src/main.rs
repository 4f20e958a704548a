//! CueDeck CLI
//!
//! Headless subtitle conversion, retiming and inspection built on the
//! CueDeck core engine.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};

use cuedeck_core::core::{
    captions::{Cue, Dialect, ExportFormat},
    commands::EditCommand,
    project::Session,
    settings::{EditorSettings, SettingsManager},
    timeline::{chronological_cmp, is_chronological, locate, ShiftMode},
    TimeSec, TrackId,
};

#[derive(Parser)]
#[command(name = "cuedeck")]
#[command(about = "CueDeck - subtitle timeline tools", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    /// Directory holding settings.json
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a subtitle file to another form
    Convert {
        /// Input file (.srt or .vtt)
        input: PathBuf,

        /// Output form: srt, vtt, txt, csv (defaults to the configured format)
        #[arg(long)]
        to: Option<String>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Shift cue timings by a signed offset
    Shift {
        /// Input file (.srt or .vtt)
        input: PathBuf,

        /// Offset in seconds (negative moves earlier)
        #[arg(long, allow_hyphen_values = true)]
        offset: TimeSec,

        /// Which edges move: start, end or both
        #[arg(long, default_value = "both", value_parser = parse_shift_mode)]
        mode: ShiftMode,

        /// Sequence numbers to shift, comma separated (all cues if omitted)
        #[arg(long, value_delimiter = ',')]
        cues: Vec<u32>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Summarize a subtitle file
    Info {
        /// Input file (.srt or .vtt)
        input: PathBuf,
    },

    /// Show the cue visible at a time
    At {
        /// Input file (.srt or .vtt)
        input: PathBuf,

        /// Time in seconds
        #[arg(long)]
        time: TimeSec,
    },
}

fn parse_shift_mode(value: &str) -> Result<ShiftMode, String> {
    match value.to_ascii_lowercase().as_str() {
        "start" => Ok(ShiftMode::Start),
        "end" => Ok(ShiftMode::End),
        "both" => Ok(ShiftMode::Both),
        other => Err(format!("unknown shift mode '{other}' (expected start, end or both)")),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::prelude::*;

    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    // Logs go to stderr so stdout stays clean for document output.
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = match &cli.config_dir {
        Some(dir) => SettingsManager::new(dir).load(),
        None => EditorSettings::default(),
    };

    match cli.command {
        Commands::Convert { input, to, output } => {
            let format = match to {
                Some(to) => to.parse::<ExportFormat>()?,
                None => settings.export_format(),
            };
            let document = Document::open(&input, settings).await?;
            let content = document.session.export_track(&document.track_id, format)?;

            emit_document(&content, output.as_deref(), cli.json, |written_to| ConvertSummary {
                input: input.display().to_string(),
                output: written_to,
                format: format.extension(),
                cues: document.session.active_cues().len(),
            })
            .await?;
        }

        Commands::Shift {
            input,
            offset,
            mode,
            cues,
            output,
        } => {
            let mut document = Document::open(&input, settings).await?;
            let cue_ids = document.select(&cues)?;
            let selected = cue_ids.len();

            let result = document.session.execute(&EditCommand::BulkShift {
                cue_ids,
                offset_sec: offset,
                mode,
            })?;
            debug!(op_id = %result.op_id, changes = result.changes.len(), "Shift applied");

            let format = match document.dialect {
                Dialect::Srt => ExportFormat::Srt,
                Dialect::Vtt => ExportFormat::Vtt,
            };
            let content = document.session.export_track(&document.track_id, format)?;

            emit_document(&content, output.as_deref(), cli.json, |written_to| ShiftSummary {
                input: input.display().to_string(),
                output: written_to,
                selected,
                modified: result.changes.len(),
                committed: result.committed,
            })
            .await?;
        }

        Commands::Info { input } => {
            let document = Document::open(&input, settings).await?;
            let summary = DocumentInfo::from_cues(
                &input,
                document.dialect,
                document.session.active_cues(),
            );

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("File:         {}", summary.input);
                println!("Dialect:      {}", summary.dialect);
                println!("Cues:         {}", summary.cues);
                println!("Span:         {:.3}s - {:.3}s", summary.first_start, summary.last_end);
                println!("Overlaps:     {}", summary.overlaps);
                println!("Chronological: {}", if summary.out_of_order { "no" } else { "yes" });
            }
        }

        Commands::At { input, time } => {
            let document = Document::open(&input, settings).await?;
            let index = document.session.timing_index();
            let active = locate(&index, time, None).and_then(|i| {
                document
                    .session
                    .active_cues()
                    .iter()
                    .find(|c| c.uuid == index[i].uuid)
            });

            if cli.json {
                let value = serde_json::json!({ "time": time, "cue": active });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                match active {
                    Some(cue) => println!(
                        "#{} {} --> {}\n{}",
                        cue.id, cue.start_time, cue.end_time, cue.text
                    ),
                    None => println!("No cue at {time:.3}s"),
                }
            }
        }
    }

    Ok(())
}

// =============================================================================
// Document Loading
// =============================================================================

/// A subtitle file loaded into a single-track session
struct Document {
    session: Session,
    track_id: TrackId,
    dialect: Dialect,
}

impl Document {
    async fn open(path: &Path, settings: EditorSettings) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let file_name = path.file_name().and_then(|n| n.to_str());
        let dialect = Dialect::resolve(file_name, &content);
        let name = path
            .file_stem()
            .map_or_else(|| "Untitled".to_string(), |s| s.to_string_lossy().to_string());

        let mut session = Session::new(settings);
        let track_id = session.load_document(&name, &content, dialect)?;
        if session.active_cues().is_empty() {
            bail!("No cues found in {}", path.display());
        }

        Ok(Self {
            session,
            track_id,
            dialect,
        })
    }

    /// Maps sequence numbers to cue uuids; an empty selection means all cues
    fn select(&self, sequence_numbers: &[u32]) -> Result<Vec<String>> {
        let cues = self.session.active_cues();
        if sequence_numbers.is_empty() {
            return Ok(cues.iter().map(|c| c.uuid.clone()).collect());
        }

        sequence_numbers
            .iter()
            .map(|n| {
                cues.iter()
                    .find(|c| c.id == *n)
                    .map(|c| c.uuid.clone())
                    .with_context(|| format!("No cue with sequence number {n}"))
            })
            .collect()
    }
}

/// Writes document text to a file or stdout, then reports it
async fn emit_document<S, F>(
    content: &str,
    output: Option<&Path>,
    json: bool,
    summary: F,
) -> Result<()>
where
    S: Serialize,
    F: FnOnce(Option<String>) -> S,
{
    match output {
        Some(path) => {
            tokio::fs::write(path, content)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());

            let report = summary(Some(path.display().to_string()));
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        None => {
            if json {
                let mut value = serde_json::to_value(summary(None))?;
                value["content"] = serde_json::Value::String(content.to_string());
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print!("{content}");
            }
        }
    }
    Ok(())
}

// =============================================================================
// Reports
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConvertSummary {
    input: String,
    output: Option<String>,
    format: &'static str,
    cues: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShiftSummary {
    input: String,
    output: Option<String>,
    selected: usize,
    modified: usize,
    committed: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentInfo {
    input: String,
    dialect: &'static str,
    cues: usize,
    first_start: TimeSec,
    last_end: TimeSec,
    /// Chronologically adjacent pairs that overlap
    overlaps: usize,
    out_of_order: bool,
}

impl DocumentInfo {
    fn from_cues(path: &Path, dialect: Dialect, cues: &[Cue]) -> Self {
        let mut sorted: Vec<&Cue> = cues.iter().collect();
        sorted.sort_by(|a, b| chronological_cmp(a, b));

        let overlaps = sorted
            .windows(2)
            .filter(|pair| pair[0].range().overlaps(&pair[1].range()))
            .count();
        let finite = |t: TimeSec| t.is_finite().then_some(t);

        Self {
            input: path.display().to_string(),
            dialect: dialect.extension(),
            cues: cues.len(),
            first_start: cues
                .iter()
                .filter_map(|c| finite(c.start_sec()))
                .reduce(f64::min)
                .unwrap_or(0.0),
            last_end: cues
                .iter()
                .filter_map(|c| finite(c.end_sec()))
                .fold(0.0, f64::max),
            overlaps,
            out_of_order: !is_chronological(cues),
        }
    }
}
