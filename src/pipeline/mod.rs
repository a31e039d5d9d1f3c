//! Pipeline stages for document extraction.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different rasteriser or backend) without
//! touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! render ──▶ encode ──▶ backend ──▶ interpret
//! (pdfium)   (base64)   (VLM call)  (JSON recovery)
//! ```
//!
//! 1. [`render`]    — rasterise the first page; runs in `spawn_blocking`
//!    because pdfium is not async-safe
//! 2. [`encode`]    — PNG-encode and base64-wrap the page image for the
//!    multimodal API request body
//! 3. [`backend`]   — the single network call: image + instruction in, raw
//!    text out; no retries
//! 4. [`interpret`] — recover a typed result from the untrusted reply

pub mod backend;
pub mod encode;
pub mod interpret;
pub mod render;
