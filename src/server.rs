//! HTTP surface: three routes over the extraction pipeline.
//!
//! The transport layer is deliberately thin — every line here either moves
//! bytes (multipart in, JSON out) or flattens an error. All failure causes
//! collapse to one fixed message per endpoint with HTTP 500 and a
//! `{"detail": …}` body; full diagnostic detail is logged server-side
//! before flattening, never leaked to the caller.
//!
//! | Route             | Method | Contract                                        |
//! |-------------------|--------|-------------------------------------------------|
//! | `/ocr`            | POST   | multipart `pdf` → `{success, invoice_json}`     |
//! | `/extract-weight` | POST   | multipart `pdf` → `{success, weight: kg\|null}` |
//! | `/health`         | GET    | `{"status": "ok"}`                              |

use crate::error::ExtractError;
use crate::extract::Extractor;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

/// Fixed failure message for the invoice endpoint.
const INVOICE_FAILED: &str = "Qwen OCR failed";
/// Fixed failure message for the weight endpoint.
const WEIGHT_FAILED: &str = "Weight extraction failed";

// ── Response envelopes ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct InvoiceResponse {
    success: bool,
    /// The backend reply verbatim — an opaque, JSON-likely string.
    invoice_json: String,
}

#[derive(Debug, Serialize)]
struct WeightResponse {
    success: bool,
    /// Weight in kilograms, or `null` when no value was recovered.
    weight: Option<f64>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: &'static str,
}

type ServiceError = (StatusCode, Json<ErrorBody>);

/// Flatten any pipeline error into the endpoint's fixed 500 response,
/// logging the real cause first.
fn flatten(err: ExtractError, message: &'static str) -> ServiceError {
    error!("{message}: {err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody { detail: message }),
    )
}

// ── Router ───────────────────────────────────────────────────────────────

/// Build the service router over a shared extractor.
pub fn router(extractor: Arc<Extractor>) -> Router {
    Router::new()
        .route("/ocr", post(extract_invoice))
        .route("/extract-weight", post(extract_weight))
        .route("/health", get(health))
        .with_state(extractor)
}

/// Bind and serve until the process is terminated.
pub async fn serve(addr: SocketAddr, extractor: Arc<Extractor>) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {addr}");
    axum::serve(listener, router(extractor)).await
}

// ── Handlers ─────────────────────────────────────────────────────────────

async fn extract_invoice(
    State(extractor): State<Arc<Extractor>>,
    multipart: Multipart,
) -> Result<Json<InvoiceResponse>, ServiceError> {
    let pdf_bytes = read_pdf_field(multipart)
        .await
        .map_err(|e| flatten(e, INVOICE_FAILED))?;

    let extraction = extractor
        .extract_invoice(pdf_bytes)
        .await
        .map_err(|e| flatten(e, INVOICE_FAILED))?;

    Ok(Json(InvoiceResponse {
        success: true,
        invoice_json: extraction.raw,
    }))
}

async fn extract_weight(
    State(extractor): State<Arc<Extractor>>,
    multipart: Multipart,
) -> Result<Json<WeightResponse>, ServiceError> {
    let pdf_bytes = read_pdf_field(multipart)
        .await
        .map_err(|e| flatten(e, WEIGHT_FAILED))?;

    let outcome = extractor
        .extract_weight(pdf_bytes)
        .await
        .map_err(|e| flatten(e, WEIGHT_FAILED))?;

    Ok(Json(WeightResponse {
        success: true,
        weight: outcome.value(),
    }))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Pull the `pdf` file field out of a multipart upload.
async fn read_pdf_field(mut multipart: Multipart) -> Result<Vec<u8>, ExtractError> {
    loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| ExtractError::Internal(format!("multipart read failed: {e}")))?;

        match field {
            Some(field) if field.name() == Some("pdf") => {
                let bytes = field.bytes().await.map_err(|e| {
                    ExtractError::Internal(format!("upload body read failed: {e}"))
                })?;
                return Ok(bytes.to_vec());
            }
            Some(_) => continue,
            None => {
                return Err(ExtractError::Internal(
                    "multipart upload has no 'pdf' field".into(),
                ))
            }
        }
    }
}
