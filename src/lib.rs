//! # slipscan
//!
//! Extract structured data from scanned documents using Vision Language
//! Models: invoices become structured JSON, weigh-slips become a single
//! weight in kilograms.
//!
//! ## Why a VLM instead of OCR?
//!
//! Scanned invoices defeat classic OCR-plus-rules pipelines: layouts vary
//! per supplier, labels are inconsistent ("Invoice No" / "Bill No" / "Tax
//! Invoice No"), and table structure is visual, not textual. Rendering the
//! page to a PNG and letting a vision model read it like a human does
//! sidesteps all of that — at the price of an untrusted, free-form reply
//! that this crate's interpreter turns back into a typed result.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF upload
//!  │
//!  ├─ 1. Render     first page → bitmap via pdfium (spawn_blocking)
//!  ├─ 2. Encode     PNG → base64 data-URL
//!  ├─ 3. Backend    one multimodal request, temperature 0, no retries
//!  └─ 4. Interpret  recover JSON from the raw reply → typed result
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use slipscan::{Extractor, ServiceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServiceConfig::builder()
//!         .api_key(std::env::var("DASHSCOPE_API_KEY")?)
//!         .build()?;
//!     let extractor = Extractor::new(config)?;
//!
//!     let pdf = std::fs::read("weigh-slip.pdf")?;
//!     let outcome = extractor.extract_weight(pdf).await?;
//!     println!("weight: {:?} kg", outcome.value());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `server` | on      | Enables the `slipscan` binary and HTTP routes (axum + clap + anyhow + tracing-subscriber) |
//!
//! Disable `server` when using only the library:
//! ```toml
//! slipscan = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod prompts;
pub mod schema;
#[cfg(feature = "server")]
pub mod server;
pub mod task;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ServiceConfig, ServiceConfigBuilder, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use error::ExtractError;
pub use extract::{Extractor, InvoiceExtraction};
pub use pipeline::backend::{CompletionOptions, OpenAiCompatBackend, VisionBackend};
pub use pipeline::interpret::{interpret_weight, WeightOutcome};
pub use schema::{parse_invoice, InvoiceParse, InvoiceRecord, LineItem};
pub use task::ExtractionTask;
