//! Extraction orchestration: wire the pipeline stages per request.
//!
//! [`Extractor`] owns the backend handle and the configuration; each call
//! sequences render → encode → backend → interpret for one uploaded
//! document. There is no shared mutable state, no cache, and no retry:
//! concurrent requests are trivially independent and a single backend
//! failure is a single request failure.
//!
//! The `*_from_image` entry points exist so the network and interpretation
//! stages can be exercised (and tested) without pdfium in the loop.

use crate::config::ServiceConfig;
use crate::error::ExtractError;
use crate::pipeline::backend::{CompletionOptions, OpenAiCompatBackend, VisionBackend};
use crate::pipeline::interpret::{interpret_weight, WeightOutcome};
use crate::pipeline::{encode, render};
use crate::schema::{parse_invoice, InvoiceParse};
use crate::task::ExtractionTask;
use image::DynamicImage;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Result of an invoice extraction.
///
/// `raw` is the backend's reply verbatim — the endpoint contract is
/// best-effort passthrough and downstream consumers parse it themselves.
/// `parse` is the typed parse attempt for callers that want a
/// guaranteed-shape record.
#[derive(Debug, Clone)]
pub struct InvoiceExtraction {
    pub raw: String,
    pub parse: InvoiceParse,
}

/// The document-extraction pipeline, configured once at process start.
pub struct Extractor {
    backend: Arc<dyn VisionBackend>,
    config: ServiceConfig,
}

impl Extractor {
    /// Build an extractor with the production OpenAI-compatible backend.
    pub fn new(config: ServiceConfig) -> Result<Self, ExtractError> {
        let backend = Arc::new(OpenAiCompatBackend::new(&config)?);
        Ok(Self::with_backend(config, backend))
    }

    /// Build an extractor with a caller-supplied backend (tests, middleware).
    pub fn with_backend(config: ServiceConfig, backend: Arc<dyn VisionBackend>) -> Self {
        Self { backend, config }
    }

    /// Extract invoice fields from an uploaded PDF.
    ///
    /// Rasterises the first page, sends it with the invoice instruction,
    /// and returns the reply verbatim alongside a typed parse attempt.
    pub async fn extract_invoice(&self, pdf_bytes: Vec<u8>) -> Result<InvoiceExtraction, ExtractError> {
        let page = self.render(pdf_bytes).await?;
        self.extract_invoice_from_image(&page).await
    }

    /// Extract a weight (kilograms) from an uploaded weigh-slip PDF.
    pub async fn extract_weight(&self, pdf_bytes: Vec<u8>) -> Result<WeightOutcome, ExtractError> {
        let page = self.render(pdf_bytes).await?;
        self.extract_weight_from_image(&page).await
    }

    /// Invoice extraction from an already rasterised page image.
    pub async fn extract_invoice_from_image(
        &self,
        page: &DynamicImage,
    ) -> Result<InvoiceExtraction, ExtractError> {
        let raw = self.complete(page, ExtractionTask::Invoice).await?;

        let parse = parse_invoice(&raw);
        match &parse {
            InvoiceParse::Parsed(record) => {
                debug!(
                    "invoice reply parsed: number={:?}, {} line items",
                    record.invoice_number,
                    record.items.len()
                );
            }
            InvoiceParse::Unparsed => {
                warn!("invoice reply did not parse as typed record; forwarding raw text");
            }
        }

        Ok(InvoiceExtraction { raw, parse })
    }

    /// Weight extraction from an already rasterised page image.
    pub async fn extract_weight_from_image(
        &self,
        page: &DynamicImage,
    ) -> Result<WeightOutcome, ExtractError> {
        let raw = self.complete(page, ExtractionTask::Weight).await?;

        let outcome = interpret_weight(&raw);
        match &outcome {
            WeightOutcome::Found(kg) => info!("weight extracted: {kg} kg"),
            WeightOutcome::NotFound => info!("no weight value in reply"),
            WeightOutcome::Ambiguous(_) => {
                warn!("weight reply was unrecoverable; reporting null")
            }
        }

        Ok(outcome)
    }

    // ── Stage helpers ─────────────────────────────────────────────────────

    async fn render(&self, pdf_bytes: Vec<u8>) -> Result<DynamicImage, ExtractError> {
        let start = Instant::now();
        let page = render_first_page_checked(pdf_bytes, self.config.max_rendered_pixels).await?;
        debug!("rendered first page in {:?}", start.elapsed());
        Ok(page)
    }

    async fn complete(
        &self,
        page: &DynamicImage,
        task: ExtractionTask,
    ) -> Result<String, ExtractError> {
        let data_url = encode::encode_page(page).map_err(|e| {
            ExtractError::Internal(format!("image encoding failed: {e}"))
        })?;

        let options = CompletionOptions {
            temperature: self.config.temperature,
            max_tokens: task.max_tokens(),
        };

        let start = Instant::now();
        let raw = self
            .backend
            .complete(&data_url, task.instruction(), options)
            .await?;
        info!(
            "{} inference complete in {:?} ({} chars)",
            task.label(),
            start.elapsed(),
            raw.len()
        );
        debug!("raw {} reply: {raw}", task.label());

        Ok(raw)
    }
}

/// Render wrapper that rejects obviously-empty uploads before pdfium sees them.
async fn render_first_page_checked(
    pdf_bytes: Vec<u8>,
    max_pixels: u32,
) -> Result<DynamicImage, ExtractError> {
    if pdf_bytes.is_empty() {
        return Err(ExtractError::DecodeFailure {
            detail: "empty upload".into(),
        });
    }
    render::render_first_page(pdf_bytes, max_pixels).await
}
