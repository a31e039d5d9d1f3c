//! Service configuration.
//!
//! Every knob lives in [`ServiceConfig`], built via its builder. The backend
//! credential and endpoint are *constructor inputs*, never read from ambient
//! process state inside the pipeline: whoever boots the service resolves env
//! vars or flags exactly once and hands the result in. That keeps the
//! library testable (inject a fake endpoint) and makes two differently
//! configured extractors in one process possible.

use crate::error::ExtractError;
use std::fmt;

/// Default OpenAI-compatible endpoint (DashScope international).
pub const DEFAULT_BASE_URL: &str = "https://dashscope-intl.aliyuncs.com/compatible-mode/v1";

/// Default vision model identifier.
pub const DEFAULT_MODEL: &str = "qwen-vl-max";

/// Configuration for a slipscan extraction service.
///
/// Built via [`ServiceConfig::builder()`].
///
/// # Example
/// ```rust
/// use slipscan::ServiceConfig;
///
/// let config = ServiceConfig::builder()
///     .api_key("sk-test")
///     .model("qwen-vl-max")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ServiceConfig {
    /// Base URL of the OpenAI-compatible chat-completions endpoint.
    /// Default: [`DEFAULT_BASE_URL`].
    pub base_url: String,

    /// API key sent as a bearer token on every backend call.
    pub api_key: String,

    /// Vision model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Maximum rendered image dimension (width or height) in pixels. Default: 2480.
    ///
    /// A cap rather than a DPI: page sizes vary, and an oversized scan at a
    /// fixed DPI could exhaust memory. 2480 px equals an A4 page at 300 DPI,
    /// the scan quality the extraction instructions were tuned against.
    pub max_rendered_pixels: u32,

    /// Sampling temperature for the backend completion. Default: 0.0.
    ///
    /// Extraction wants the most deterministic reply available; anything
    /// above zero trades accuracy for variety we have no use for.
    pub temperature: f32,

    /// Per-backend-call timeout in seconds. Default: 120.
    pub api_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            max_rendered_pixels: 2480,
            temperature: 0.0,
            api_timeout_secs: 120,
        }
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("temperature", &self.temperature)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .finish()
    }
}

impl ServiceConfig {
    /// Create a new builder for `ServiceConfig`.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ServiceConfig`].
#[derive(Debug)]
pub struct ServiceConfigBuilder {
    config: ServiceConfig,
}

impl ServiceConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ServiceConfig, ExtractError> {
        let c = &self.config;
        if c.api_key.is_empty() {
            return Err(ExtractError::InvalidConfig(
                "API key must not be empty".into(),
            ));
        }
        if c.base_url.is_empty() {
            return Err(ExtractError::InvalidConfig(
                "Backend base URL must not be empty".into(),
            ));
        }
        if c.api_timeout_secs == 0 {
            return Err(ExtractError::InvalidConfig(
                "API timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}
