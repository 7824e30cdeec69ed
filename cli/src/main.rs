//! slidekit CLI - PowerPoint audio embedding and Markdown decks
//!
//! A command-line tool for adding narration to PPTX slides and building
//! PPTX decks from Marp-style Markdown.

use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use log::{LevelFilter, Log, Metadata, Record};
use slidekit::embed::{AudioEmbedder, EmbedOptions, EmbedReport, IconPolicy};
use slidekit::{DeckOptions, NoProgress, Progress, Step};
use std::path::PathBuf;

/// Embed audio into PowerPoint slides and build decks from Markdown
#[derive(Parser)]
#[command(
    name = "slidekit",
    version,
    about = "Embed audio into PowerPoint slides",
    long_about = "slidekit - PowerPoint audio embedding tool.\n\n\
                  Adds MP3 narration to PPTX slides as click-to-play controls and\n\
                  converts Markdown slide files to PPTX decks."
)]
struct Cli {
    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Library log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "SLIDEKIT_LOG", value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed an MP3 file into one slide
    Embed {
        /// Slide number (1-indexed)
        slide: u32,

        /// Input PPTX file
        package: PathBuf,

        /// MP3 file to embed
        audio: PathBuf,

        /// Output file path (default: <input>_with_audio.pptx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Store the audio without a visible icon
        #[arg(long)]
        hidden: bool,

        /// PNG to use as the audio icon
        #[arg(long, value_name = "PNG", conflicts_with = "hidden")]
        icon: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Embed every `*-N.mp3` file of a directory into slide N
    Batch {
        /// Input PPTX file
        package: PathBuf,

        /// Directory holding the MP3 files
        audio_dir: PathBuf,

        /// Output file path (default: <input>_with_audio.pptx)
        output: Option<PathBuf>,

        /// Store the audio without visible icons
        #[arg(long)]
        hidden: bool,

        /// PNG to use as the audio icon
        #[arg(long, value_name = "PNG", conflicts_with = "hidden")]
        icon: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert a Markdown slide file to PPTX
    #[command(visible_alias = "md")]
    Deck {
        /// Input Markdown file
        input: PathBuf,

        /// Output file path (default: input with .pptx extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show slide count, media and content types of a package
    Info {
        /// Input PPTX file
        input: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_level.as_deref());

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Embed {
            slide,
            package,
            audio,
            output,
            hidden,
            icon,
            json,
        } => {
            let embedder = AudioEmbedder::new(embed_options(output, hidden, icon));

            if json {
                let report = embedder.embed_with_progress(&package, slide, &audio, &mut NoProgress)?;
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let mut progress = CliProgress::new("Embedding audio...");
                let report = embedder.embed_with_progress(&package, slide, &audio, &mut progress);
                progress.finish();
                print_embed_summary(&report?);
            }
        }

        Commands::Batch {
            package,
            audio_dir,
            output,
            hidden,
            icon,
            json,
        } => {
            let embedder = AudioEmbedder::new(embed_options(output, hidden, icon));

            if json {
                let report = embedder.embed_batch_with_progress(&package, &audio_dir, &mut NoProgress)?;
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let mut progress = CliProgress::new("Embedding audio files...");
                let report = embedder.embed_batch_with_progress(&package, &audio_dir, &mut progress);
                progress.finish();
                print_embed_summary(&report?);
            }
        }

        Commands::Deck { input, output } => {
            println!("Reading {}...", input.display());
            let mut progress = CliProgress::new("Creating PowerPoint presentation...");
            let summary = slidekit::markdown_to_pptx_with_progress(
                &input,
                output.as_ref(),
                &DeckOptions::default(),
                &mut progress,
            );
            progress.finish();
            let summary = summary?;
            println!(
                "{} PowerPoint presentation saved to: {}",
                "✓".green().bold(),
                summary.output.display()
            );
        }

        Commands::Info { input, json } => {
            let info = slidekit::inspect(&input)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
                return Ok(());
            }

            println!("{}", "Package Information".cyan().bold());
            println!("{}", "─".repeat(40));
            println!(
                "{}: {}",
                "File".bold(),
                input.file_name().unwrap_or_default().to_string_lossy()
            );
            println!("{}: {}", "Slides".bold(), info.slide_count);
            println!("{}: {}", "Media files".bold(), info.media.len());
            for name in &info.media {
                println!("  {}", name);
            }

            println!("\n{}", "Default Content Types".cyan().bold());
            println!("{}", "─".repeat(40));
            for (extension, content_type) in &info.default_types {
                println!("{}: {}", extension.bold(), content_type);
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn embed_options(output: Option<PathBuf>, hidden: bool, icon: Option<PathBuf>) -> EmbedOptions {
    let policy = if hidden {
        IconPolicy::Hidden
    } else {
        IconPolicy::Visible
    };
    let mut options = EmbedOptions::new().with_icon_policy(policy);
    if let Some(path) = output {
        options = options.with_output(path);
    }
    if let Some(path) = icon {
        options = options.with_icon_file(path);
    }
    options
}

fn print_embed_summary(report: &EmbedReport) {
    for item in &report.embedded {
        println!(
            "{} Slide {}: {} ({})",
            "✓".green().bold(),
            item.slide,
            item.source.display(),
            item.audio_asset
        );
    }
    println!(
        "\n{} Embedded {} audio file(s) into {}",
        "✓".green().bold(),
        report.embedded.len(),
        report.output.display()
    );
    if report.icon_policy == IconPolicy::Hidden {
        println!(
            "{} Audio was stored without an icon; add a control in PowerPoint to play it",
            "!".yellow().bold()
        );
    }
}

fn print_version() {
    println!("{} {}", "slidekit".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Embed audio into PowerPoint slides and build decks from Markdown");
    println!();
    println!("Audio: MP3");
    println!("Packages: PPTX");
}

/// Prints each finished step above a spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new(message: &str) -> Self {
        Self {
            spinner: create_spinner(message),
        }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl Progress for CliProgress {
    fn on_step(&mut self, step: &Step) {
        let mark = match step {
            Step::SkippedFile { .. } => "!".yellow().bold(),
            _ => "✓".green().bold(),
        };
        self.spinner.println(format!("{} {}", mark, step));
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Writes library log records to stderr.
struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = match record.level() {
            log::Level::Error => "error".red().bold(),
            log::Level::Warn => "warn".yellow().bold(),
            log::Level::Info => "info".green(),
            log::Level::Debug => "debug".blue(),
            log::Level::Trace => "trace".dimmed(),
        };
        eprintln!("{}: {}", level, record.args());
    }

    fn flush(&self) {}
}

/// `--verbose` wins over `--log-level`/`SLIDEKIT_LOG`; the default is `warn`.
fn log_level(verbose: bool, requested: Option<&str>) -> LevelFilter {
    if verbose {
        return LevelFilter::Debug;
    }
    requested
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(LevelFilter::Warn)
}

fn init_logging(verbose: bool, requested: Option<&str>) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log_level(verbose, requested));
    }
}
