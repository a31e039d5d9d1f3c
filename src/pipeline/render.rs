//! PDF rasterisation: render the first page of an upload via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async contexts.
//! `tokio::task::spawn_blocking` moves the work onto a dedicated thread pool
//! thread so the Tokio workers serving other requests never stall on a
//! CPU-heavy render.
//!
//! ## Why only the first page?
//!
//! Invoices and weigh-slips are single-page documents; when a scan has a
//! second page it is a duplicate or a terms sheet. The service contract is
//! first-page-only, and multi-page fusion is explicitly out of scope.

use crate::error::ExtractError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use tracing::debug;

/// Rasterise the first page of a PDF byte stream into an image.
///
/// Runs inside `spawn_blocking` since pdfium operations are CPU-bound.
/// `max_pixels` caps the longest rendered edge regardless of physical page
/// size, keeping memory bounded for oversized scans.
///
/// # Errors
/// * [`ExtractError::DecodeFailure`] — bytes are not a loadable PDF
/// * [`ExtractError::EmptyDocument`] — the PDF has zero pages
/// * [`ExtractError::RasterisationFailed`] — pdfium failed on the page
pub async fn render_first_page(
    pdf_bytes: Vec<u8>,
    max_pixels: u32,
) -> Result<DynamicImage, ExtractError> {
    tokio::task::spawn_blocking(move || render_first_page_blocking(&pdf_bytes, max_pixels))
        .await
        .map_err(|e| ExtractError::Internal(format!("Render task panicked: {e}")))?
}

/// Blocking implementation of first-page rendering.
fn render_first_page_blocking(
    pdf_bytes: &[u8],
    max_pixels: u32,
) -> Result<DynamicImage, ExtractError> {
    let pdfium = Pdfium::default();

    let document = pdfium
        .load_pdf_from_byte_slice(pdf_bytes, None)
        .map_err(|e| ExtractError::DecodeFailure {
            detail: format!("{e:?}"),
        })?;

    let pages = document.pages();
    if pages.len() == 0 {
        return Err(ExtractError::EmptyDocument);
    }
    debug!("PDF loaded: {} pages, using first", pages.len());

    let page = pages
        .first()
        .map_err(|e| ExtractError::RasterisationFailed {
            detail: format!("{e:?}"),
        })?;

    let render_config = PdfRenderConfig::new()
        .set_target_width(max_pixels as i32)
        .set_maximum_height(max_pixels as i32);

    let bitmap =
        page.render_with_config(&render_config)
            .map_err(|e| ExtractError::RasterisationFailed {
                detail: format!("{e:?}"),
            })?;

    let image = bitmap.as_image();
    debug!("Rendered first page → {}x{} px", image.width(), image.height());

    Ok(image)
}
