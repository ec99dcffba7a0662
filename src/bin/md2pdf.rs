//! CLI binary for md2pdf.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use md2pdf::cli::{init_logging, RenderArgs};
use md2pdf::{convert_sync, ConversionProgressCallback, ProgressCallback};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

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

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal spinner that follows the conversion stages.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Reading");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, input: &Path, input_bytes: usize) {
        self.bar.set_prefix("Rendering");
        self.bar.set_message(format!(
            "{}  {}",
            input.display(),
            dim(&format!("{input_bytes} bytes"))
        ));
    }

    fn on_render_complete(&self, page_count: usize, pdf_bytes: usize) {
        self.bar.set_prefix("Writing");
        self.bar.set_message(dim(&format!("{page_count} pages, {pdf_bytes} bytes")));
    }

    fn on_conversion_complete(&self, _output: &Path, _page_count: usize) {
        self.bar.finish_and_clear();
    }

    fn on_conversion_error(&self, _input: &Path, error: &str) {
        self.bar.abandon_with_message(red(error));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Write README.pdf next to README.md
  md2pdf README.md

  # Explicit output path
  md2pdf notes.md -o /tmp/notes.pdf

  # US Letter, deeper outline, custom title
  md2pdf --page-size letter --toc-level 3 --title "Design Notes" design.md

  # Machine-readable statistics
  md2pdf --json report.md

ENVIRONMENT VARIABLES:
  Every flag can also be set through MD2PDF_<FLAG>, e.g. MD2PDF_PAGE_SIZE=letter.
  RUST_LOG overrides the log filter (e.g. RUST_LOG=md2pdf=debug).
"#;

/// Convert a Markdown file to PDF.
#[derive(Parser, Debug)]
#[command(
    name = "md2pdf",
    version,
    about = "Convert a Markdown file to PDF",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Markdown file to convert.
    input: PathBuf,

    /// Write the PDF here instead of next to the input.
    #[arg(short, long, env = "MD2PDF_OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    render: RenderArgs,

    /// Print conversion statistics as JSON on stdout.
    #[arg(long, env = "MD2PDF_JSON")]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "MD2PDF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MD2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MD2PDF_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.verbose;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };
    init_logging(filter, false);

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };
    let config = cli
        .render
        .to_config(progress_cb)
        .context("Invalid configuration")?;

    // ── Run conversion ───────────────────────────────────────────────────
    let output = convert_sync(&cli.input, cli.output.as_deref(), &config)
        .with_context(|| format!("Failed to convert '{}'", cli.input.display()))?;

    if cli.json {
        let json =
            serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if !cli.quiet {
        println!(
            "Successfully converted '{}' to '{}'",
            cli.input.display(),
            output.output_path.display()
        );
        eprintln!(
            "{}  {} pages  {}ms",
            green("✔"),
            output.stats.page_count,
            output.stats.total_duration_ms
        );
    }

    Ok(())
}
