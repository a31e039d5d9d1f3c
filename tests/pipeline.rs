//! Integration tests for the extraction pipeline with a scripted backend.
//!
//! These drive the orchestrator at the image level, so the full
//! encode → backend → interpret path runs without pdfium or a live API.
//! Rasterisation itself is covered by the env-gated tests in `e2e.rs`.

use async_trait::async_trait;
use image::{DynamicImage, Rgba, RgbaImage};
use slipscan::{
    CompletionOptions, ExtractError, Extractor, InvoiceParse, ServiceConfig, VisionBackend,
    WeightOutcome,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ── Test helpers ─────────────────────────────────────────────────────────

/// Backend that replies with a fixed script and records what it was asked.
struct MockBackend {
    reply: Result<String, String>,
    calls: AtomicUsize,
    seen: Mutex<Vec<SeenRequest>>,
}

#[derive(Clone)]
struct SeenRequest {
    instruction: String,
    image_data_url: String,
    options: CompletionOptions,
}

impl MockBackend {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn failing(detail: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(detail.to_string()),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> SeenRequest {
        self.seen.lock().unwrap().last().cloned().expect("no request recorded")
    }
}

#[async_trait]
impl VisionBackend for MockBackend {
    async fn complete(
        &self,
        image_data_url: &str,
        instruction: &str,
        options: CompletionOptions,
    ) -> Result<String, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(SeenRequest {
            instruction: instruction.to_string(),
            image_data_url: image_data_url.to_string(),
            options,
        });
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(detail) => Err(ExtractError::InferenceFailure {
                detail: detail.clone(),
            }),
        }
    }
}

fn test_page() -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(32, 32, Rgba([255, 255, 255, 255])))
}

fn extractor_with(backend: Arc<MockBackend>) -> Extractor {
    let config = ServiceConfig::builder().api_key("sk-test").build().unwrap();
    Extractor::with_backend(config, backend)
}

// ── Weight path ──────────────────────────────────────────────────────────

#[tokio::test]
async fn weight_recovered_from_conversational_reply() {
    let backend = MockBackend::replying("Sure! Here is the result:\n{\"weight\": \"2.35\"}");
    let extractor = extractor_with(Arc::clone(&backend));

    let outcome = extractor.extract_weight_from_image(&test_page()).await.unwrap();
    assert_eq!(outcome, WeightOutcome::Found(2.35));
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn weight_null_reply_is_not_found() {
    let backend = MockBackend::replying("{\"weight\": null}");
    let extractor = extractor_with(backend);

    let outcome = extractor.extract_weight_from_image(&test_page()).await.unwrap();
    assert_eq!(outcome, WeightOutcome::NotFound);
    assert_eq!(outcome.value(), None);
}

#[tokio::test]
async fn weight_garbage_reply_collapses_without_error() {
    let backend = MockBackend::replying("{\"weight\": 12,,}");
    let extractor = extractor_with(backend);

    let outcome = extractor.extract_weight_from_image(&test_page()).await.unwrap();
    assert!(matches!(outcome, WeightOutcome::Ambiguous(_)));
    assert_eq!(outcome.value(), None);
}

#[tokio::test]
async fn weight_request_uses_task_budget_and_zero_temperature() {
    let backend = MockBackend::replying("{\"weight\": 840}");
    let extractor = extractor_with(Arc::clone(&backend));

    extractor.extract_weight_from_image(&test_page()).await.unwrap();

    let seen = backend.last_request();
    assert_eq!(seen.options.max_tokens, 200);
    assert_eq!(seen.options.temperature, 0.0);
    assert!(seen.instruction.contains("weight slip"));
    assert!(seen.image_data_url.starts_with("data:image/png;base64,"));
}

// ── Invoice path ─────────────────────────────────────────────────────────

#[tokio::test]
async fn invoice_reply_passes_through_verbatim() {
    // Even a non-JSON reply must be forwarded untouched.
    let reply = "I am sorry, the image is too blurry to read.";
    let backend = MockBackend::replying(reply);
    let extractor = extractor_with(Arc::clone(&backend));

    let extraction = extractor.extract_invoice_from_image(&test_page()).await.unwrap();
    assert_eq!(extraction.raw, reply);
    assert_eq!(extraction.parse, InvoiceParse::Unparsed);
}

#[tokio::test]
async fn invoice_typed_parse_runs_alongside_passthrough() {
    let reply = "{\"invoiceNumber\":\"INV-7\",\"totalAmount\":\"4200.00\",\"items\":[]}";
    let backend = MockBackend::replying(reply);
    let extractor = extractor_with(backend);

    let extraction = extractor.extract_invoice_from_image(&test_page()).await.unwrap();
    assert_eq!(extraction.raw, reply);
    let record = extraction.parse.record().expect("typed parse succeeds");
    assert_eq!(record.invoice_number, "INV-7");
    assert_eq!(record.total_amount, "4200.00");
}

#[tokio::test]
async fn invoice_request_uses_larger_budget() {
    let backend = MockBackend::replying("{}");
    let extractor = extractor_with(Arc::clone(&backend));

    extractor.extract_invoice_from_image(&test_page()).await.unwrap();

    let seen = backend.last_request();
    assert_eq!(seen.options.max_tokens, 1200);
    assert!(seen.instruction.contains("invoice data extraction"));
}

// ── Failure propagation ──────────────────────────────────────────────────

#[tokio::test]
async fn backend_failure_propagates_unretried() {
    let backend = MockBackend::failing("HTTP 401: invalid key");
    let extractor = extractor_with(Arc::clone(&backend));

    let err = extractor
        .extract_weight_from_image(&test_page())
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::InferenceFailure { .. }));
    // Exactly one attempt — the pipeline never retries.
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn empty_upload_never_reaches_backend() {
    let backend = MockBackend::replying("{\"weight\": 1}");
    let extractor = extractor_with(Arc::clone(&backend));

    let err = extractor.extract_weight(Vec::new()).await.unwrap_err();
    assert!(err.is_decode());
    assert_eq!(backend.call_count(), 0);
}
