//! Server binary for slipscan.
//!
//! A thin shim over the library crate that maps CLI flags and environment
//! variables to a `ServiceConfig` and serves the HTTP routes.

use anyhow::{Context, Result};
use clap::Parser;
use slipscan::{server, Extractor, ServiceConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Serve on the default port
  export DASHSCOPE_API_KEY=sk-...
  slipscan

  # Custom bind address and model
  slipscan --bind 127.0.0.1:8080 --model qwen-vl-plus

  # Point at a local OpenAI-compatible host (vLLM, Ollama, LiteLLM)
  slipscan --base-url http://localhost:8000/v1 --api-key unused

ENDPOINTS:
  POST /ocr             multipart field 'pdf' → extracted invoice JSON
  POST /extract-weight  multipart field 'pdf' → weight in kilograms
  GET  /health          liveness probe

SETUP:
  1. Set API key:  export DASHSCOPE_API_KEY=sk-...
  2. Serve:        slipscan
  3. Extract:      curl -F pdf=@invoice.pdf http://localhost:5000/ocr
"#;

/// Extract invoice and weigh-slip data from scanned PDFs over HTTP.
#[derive(Parser, Debug)]
#[command(
    name = "slipscan",
    version,
    about = "Document-extraction service: scanned PDFs in, structured data out",
    long_about = "Serve an HTTP API that rasterises uploaded PDF scans, reads them with a \
vision language model, and returns structured invoice data or a numeric weight. Works with \
DashScope and any OpenAI-compatible endpoint (vLLM, Ollama, LiteLLM, etc.).",
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Socket address to listen on.
    #[arg(long, env = "SLIPSCAN_BIND", default_value = "0.0.0.0:5000")]
    bind: SocketAddr,

    /// OpenAI-compatible chat-completions base URL.
    #[arg(long, env = "SLIPSCAN_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// API key for the inference backend.
    #[arg(long, env = "DASHSCOPE_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Vision model identifier.
    #[arg(long, env = "SLIPSCAN_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Maximum rendered page dimension in pixels.
    #[arg(long, env = "SLIPSCAN_MAX_PIXELS", default_value_t = 2480)]
    max_pixels: u32,

    /// Per-backend-call timeout in seconds.
    #[arg(long, env = "SLIPSCAN_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,

    /// Enable DEBUG-level tracing logs (includes raw model replies).
    #[arg(short, long, env = "SLIPSCAN_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "SLIPSCAN_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    // ── Build config and extractor ───────────────────────────────────────
    let config = ServiceConfig::builder()
        .base_url(cli.base_url)
        .api_key(cli.api_key)
        .model(cli.model)
        .max_rendered_pixels(cli.max_pixels)
        .api_timeout_secs(cli.api_timeout)
        .build()
        .context("Invalid configuration")?;

    let extractor = Arc::new(Extractor::new(config).context("Failed to build extractor")?);

    // ── Serve ────────────────────────────────────────────────────────────
    server::serve(cli.bind, extractor)
        .await
        .context("Server error")?;

    Ok(())
}
