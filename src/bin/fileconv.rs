//! CLI binary for fileconv-client.
//!
//! A thin shim over the library crate that maps CLI flags onto a workflow,
//! submits it once and reports the outcome.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fileconv_client::{
    Artifact, Client, ClientConfig, ImageOperationKind, ImageWorkflow, PdfOperationKind,
    PdfWorkflow, RequestOutcome, SplitMode, SubmissionObserver, UploadFile, DEFAULT_BASE_URL,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── Spinner observer using indicatif ─────────────────────────────────────────

/// Shows a spinner while the request is in flight.
struct SpinnerObserver {
    bar: ProgressBar,
}

impl SpinnerObserver {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Processing");
        Arc::new(Self { bar })
    }
}

impl SubmissionObserver for SpinnerObserver {
    fn on_submit(&self, endpoint: &str) {
        self.bar.set_message(format!("POST /{endpoint}"));
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn on_success(&self, _artifact: &Artifact) {
        self.bar.finish_and_clear();
    }

    fn on_error(&self, _message: &str) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Compress a JPEG at quality 40 (result saved next to you as compressed.jpg)
  fileconv image photo.jpg --op compress --quality 40

  # Resize to 800x600
  fileconv image photo.png --op resize --width 800 --height 600

  # Wrap an image in a PDF, saved as out/converted.pdf
  fileconv -o out image scan.jpg --op image-to-pdf

  # Merge PDFs in the order given → merged.pdf
  fileconv merge intro.pdf body.pdf appendix.pdf

  # Split by page ranges or by pages per file → split_pdfs.zip
  fileconv split book.pdf --pages 1-3,5,7-9
  fileconv split book.pdf --count 10

ENVIRONMENT VARIABLES:
  FILECONV_BASE_URL       Backend root (default http://localhost:3000/)
  FILECONV_OUTPUT_DIR     Where results are written (default .)
  FILECONV_TIMEOUT        Request timeout in seconds (default: none)
  RUST_LOG                Override the log filter
"#;

/// Convert images and PDFs through the file-conversion backend.
#[derive(Parser, Debug)]
#[command(
    name = "fileconv",
    version,
    about = "Convert images and PDFs through the file-conversion backend",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Backend base URL.
    #[arg(long, env = "FILECONV_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Directory results are written to.
    #[arg(short, long, env = "FILECONV_OUTPUT_DIR", default_value = ".", global = true)]
    output_dir: PathBuf,

    /// Request timeout in seconds. Waits indefinitely when unset.
    #[arg(long, env = "FILECONV_TIMEOUT", global = true)]
    timeout: Option<u64>,

    /// Print a JSON summary of the outcome on stdout.
    #[arg(long, global = true)]
    json: bool,

    /// Disable the spinner.
    #[arg(long, env = "FILECONV_NO_PROGRESS", global = true)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "FILECONV_VERBOSE", global = true)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "FILECONV_QUIET", global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process one image.
    Image(ImageArgs),
    /// Merge two or more PDFs, in the order given.
    Merge(MergeArgs),
    /// Split one PDF by page ranges or pages per file.
    Split(SplitArgs),
}

#[derive(Args, Debug)]
struct ImageArgs {
    /// Image file (JPEG or PNG).
    input: Option<PathBuf>,

    /// Operation to apply.
    #[arg(long = "op", value_enum, default_value_t = ImageOperationKind::Compress)]
    operation: ImageOperationKind,

    /// Quality 1–100 for compress; out-of-range values are clamped.
    #[arg(long, default_value = "50", allow_hyphen_values = true)]
    quality: String,

    /// Target width for resize.
    #[arg(long)]
    width: Option<String>,

    /// Target height for resize.
    #[arg(long)]
    height: Option<String>,
}

#[derive(Args, Debug)]
struct MergeArgs {
    /// PDF files, in merge order.
    inputs: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct SplitArgs {
    /// PDF file to split.
    input: Option<PathBuf>,

    /// Page ranges, e.g. 1-3,5,7-9. Checked by the backend.
    #[arg(long, conflicts_with = "count")]
    pages: Option<String>,

    /// Pages per output file.
    #[arg(long, allow_hyphen_values = true)]
    count: Option<String>,
}

/// JSON summary printed with `--json`.
#[derive(Serialize, Debug)]
#[serde(tag = "status", rename_all = "lowercase")]
enum Summary {
    Success {
        path: PathBuf,
        bytes: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        format: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        width: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        height: Option<u32>,
    },
    Error {
        message: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner carries all the feedback that matters while it runs, so
    // library INFO logs are muted unless asked for.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build client ─────────────────────────────────────────────────────
    let client = build_client(&cli, show_progress)?;

    // ── Run the workflow ─────────────────────────────────────────────────
    let outcome = match &cli.command {
        Command::Image(args) => run_image(&client, args).await?,
        Command::Merge(args) => run_merge(&client, args).await?,
        Command::Split(args) => run_split(&client, args).await?,
    };

    report(&cli, outcome).await
}

/// Map CLI args to a `Client`.
fn build_client(cli: &Cli, show_progress: bool) -> Result<Client> {
    let mut builder = ClientConfig::builder()
        .base_url(cli.base_url.clone())
        .output_dir(cli.output_dir.clone());

    if let Some(secs) = cli.timeout {
        builder = builder.request_timeout_secs(secs);
    }
    if show_progress {
        builder = builder.observer(SpinnerObserver::new());
    }

    let config = builder.build().context("Invalid configuration")?;
    Client::new(config).context("Failed to create client")
}

async fn load(path: &Path) -> Result<UploadFile> {
    UploadFile::from_path(path)
        .await
        .with_context(|| format!("Failed to load {}", path.display()))
}

async fn run_image(client: &Client, args: &ImageArgs) -> Result<RequestOutcome> {
    let mut wf = ImageWorkflow::new();
    wf.set_operation(args.operation);
    wf.set_quality_input(&args.quality);
    wf.set_width(args.width.clone().unwrap_or_default());
    wf.set_height(args.height.clone().unwrap_or_default());

    if let Some(ref path) = args.input {
        wf.select_file(load(path).await?);
    }

    Ok(wf.submit(client).await.clone())
}

async fn run_merge(client: &Client, args: &MergeArgs) -> Result<RequestOutcome> {
    let mut wf = PdfWorkflow::new();
    wf.set_operation(PdfOperationKind::Merge);

    let mut files = Vec::with_capacity(args.inputs.len());
    for path in &args.inputs {
        files.push(load(path).await?);
    }
    wf.add_files(files);

    Ok(wf.submit(client).await.clone())
}

async fn run_split(client: &Client, args: &SplitArgs) -> Result<RequestOutcome> {
    let mut wf = PdfWorkflow::new();
    wf.set_operation(PdfOperationKind::Split);

    if let Some(ref count) = args.count {
        wf.set_split_mode(SplitMode::Count);
        wf.set_count(count.clone());
    } else {
        wf.set_split_mode(SplitMode::Pages);
        wf.set_pages(args.pages.clone().unwrap_or_default());
    }

    if let Some(ref path) = args.input {
        wf.add_files([load(path).await?]);
    }

    Ok(wf.submit(client).await.clone())
}

/// Print the outcome; an error outcome becomes a non-zero exit.
async fn report(cli: &Cli, outcome: RequestOutcome) -> Result<()> {
    let summary = match outcome {
        RequestOutcome::Success(Artifact::Downloaded { path, bytes }) => Summary::Success {
            path,
            bytes,
            format: None,
            width: None,
            height: None,
        },
        RequestOutcome::Success(Artifact::Inline(image)) => {
            // The inline result's download link: keep a copy on disk.
            let path = image
                .save_to(&cli.output_dir)
                .await
                .context("Failed to save result")?;
            let preview = image.preview();
            Summary::Success {
                path,
                bytes: image.data().len() as u64,
                format: preview.map(|p| format!("{:?}", p.format).to_uppercase()),
                width: preview.map(|p| p.width),
                height: preview.map(|p| p.height),
            }
        }
        RequestOutcome::Error(message) => Summary::Error { message },
        RequestOutcome::Idle | RequestOutcome::Loading => {
            anyhow::bail!("Submission did not complete")
        }
    };

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?
        );
    }

    match summary {
        Summary::Success {
            path,
            bytes,
            format,
            width,
            height,
        } => {
            if !cli.quiet && !cli.json {
                let details = match (format, width, height) {
                    (Some(f), Some(w), Some(h)) => format!("{f} {w}×{h}  "),
                    _ => String::new(),
                };
                eprintln!(
                    "{}  {}{}  →  {}",
                    green("✔"),
                    dim(&details),
                    dim(&format!("{bytes} bytes")),
                    bold(&path.display().to_string()),
                );
            }
            Ok(())
        }
        Summary::Error { message } => {
            if !cli.json {
                eprintln!("{} {}", red("✘"), message);
            }
            std::process::exit(1);
        }
    }
}
