//! HTTP server binary for md2pdf.
//!
//! Serves `POST /api/convert` and `GET /api/health` until Ctrl-C.

use anyhow::{Context, Result};
use clap::Parser;
use md2pdf::cli::{init_logging, RenderArgs};
use md2pdf::server::{self, AppState, ServerConfig};
use std::path::PathBuf;
use tracing::info;

/// Serve Markdown-to-PDF conversion over HTTP.
#[derive(Parser, Debug)]
#[command(name = "md2pdf-server", version, about = "Serve Markdown-to-PDF conversion over HTTP")]
struct Cli {
    /// Address to bind.
    #[arg(long, env = "MD2PDF_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on.
    #[arg(short, long, env = "MD2PDF_PORT", default_value_t = 8000)]
    port: u16,

    /// Largest accepted request body, in MiB.
    #[arg(long, env = "MD2PDF_MAX_UPLOAD_MB", default_value_t = 16,
          value_parser = clap::value_parser!(u64).range(1..=1024))]
    max_upload_mb: u64,

    /// Directory for per-request scratch space. Defaults to the system temp dir.
    #[arg(long, env = "MD2PDF_SCRATCH_DIR")]
    scratch_dir: Option<PathBuf>,

    #[command(flatten)]
    render: RenderArgs,

    /// Emit logs as JSON lines.
    #[arg(long, env = "MD2PDF_LOG_JSON")]
    log_json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MD2PDF_VERBOSE")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else {
        "info,tower_http=debug"
    };
    init_logging(filter, cli.log_json);

    let config = cli
        .render
        .to_config(None)
        .context("Invalid configuration")?;
    info!(?config, "Conversion settings");

    let mut state =
        AppState::new(config).with_max_upload_bytes((cli.max_upload_mb * 1024 * 1024) as usize);
    if let Some(dir) = cli.scratch_dir {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create scratch directory {}", dir.display()))?;
        state = state.with_scratch_root(dir);
    }

    let server_config = ServerConfig {
        host: cli.host,
        port: cli.port,
    };
    server::run(state, &server_config)
        .await
        .context("HTTP server failed")?;

    Ok(())
}
