//! Image encoding: `DynamicImage` → base64 PNG data-URL.
//!
//! OpenAI-compatible vision APIs accept images as base64 data-URIs embedded
//! in the JSON request body. PNG is chosen over JPEG because it is lossless —
//! text crispness matters far more than payload size when the model's job is
//! reading printed labels and digits off a scan.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Encode a rasterised page as a `data:image/png;base64,…` URL ready for
/// the backend request body.
pub fn encode_page(img: &DynamicImage) -> Result<String, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;

    let b64 = STANDARD.encode(&buf);
    debug!("Encoded page → {} bytes base64", b64.len());

    Ok(format!("data:image/png;base64,{b64}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn encode_small_image() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])));
        let url = encode_page(&img).expect("encode should succeed");

        let b64 = url
            .strip_prefix("data:image/png;base64,")
            .expect("data-URL prefix");
        let decoded = STANDARD.decode(b64).expect("valid base64");
        // PNG magic bytes survive the round trip.
        assert_eq!(&decoded[..4], &[0x89, b'P', b'N', b'G']);
    }
}
