//! Reply interpretation: turn an untrusted backend reply into a weight.
//!
//! ## Why so tolerant?
//!
//! The backend is instructed to return bare JSON, but vision models routinely
//! disobey: they wrap the object in prose ("Sure! Here is the result:"),
//! fence it in markdown, or embed units inside the value. Every rule here
//! exists to recover the value from a reply that is *almost* right, and to
//! collapse everything else into a terminal state rather than an error.
//!
//! ## State machine
//!
//! ```text
//! reply ──▶ brace span? ──▶ JSON object? ──▶ weight key? ──▶ numeric?
//!              │no              │no              │absent/falsy   │yes
//!              ▼                ▼                ▼               ▼
//!           NotFound        Ambiguous         NotFound         Found
//! ```
//!
//! Every branch terminates in exactly one of the three outcomes; no input
//! can make this module return an error or panic. `Ambiguous` (the reply
//! contained braces but no recoverable value) is distinguished from
//! `NotFound` so telemetry can separate "document has no weight" from
//! "model returned garbage" — but both surface to callers as `null`,
//! preserving the service's observed contract.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

/// Greedy brace span: first `{` through last `}`, newlines included.
static RE_BRACE_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Terminal outcome of weight interpretation.
#[derive(Debug, Clone, PartialEq)]
pub enum WeightOutcome {
    /// A numeric weight was recovered, in kilograms per the instruction's
    /// own unit contract (no pipeline-side conversion).
    Found(f64),
    /// The reply or document carries no weight value.
    NotFound,
    /// The reply contained a brace span but no recoverable value; the raw
    /// text is kept for diagnostics. Reported to callers as `null`, same
    /// as `NotFound`.
    Ambiguous(String),
}

impl WeightOutcome {
    /// The value callers see: `Some(kg)` for `Found`, `None` otherwise.
    pub fn value(&self) -> Option<f64> {
        match self {
            WeightOutcome::Found(v) => Some(*v),
            WeightOutcome::NotFound | WeightOutcome::Ambiguous(_) => None,
        }
    }
}

/// Locate the first well-formed-looking JSON object span in a reply.
///
/// "Well-formed-looking" is deliberate: this is a best-effort locator
/// (first `{` to last `}`), not a parser. Validation happens when the span
/// is handed to `serde_json`.
pub(crate) fn brace_span(reply: &str) -> Option<&str> {
    RE_BRACE_SPAN.find(reply).map(|m| m.as_str())
}

/// Interpret a raw backend reply as a weight in kilograms.
///
/// Rules, in order:
/// 1. No brace span → `NotFound`.
/// 2. Span is not valid JSON → `Ambiguous` (parse errors are swallowed,
///    never propagated).
/// 3. `weight` key absent, `null`, `""`, or `0` → `NotFound`.
/// 4. String value: strip every character that is not a digit or a decimal
///    point, then parse as `f64`. Recovers `"12.5 kg"` → `12.5`; a string
///    that still fails to parse (multiple decimal points, no digits) is
///    `Ambiguous`.
/// 5. Numeric value: taken as-is.
/// 6. Anything else (bool, array, object) → `Ambiguous`.
pub fn interpret_weight(reply: &str) -> WeightOutcome {
    let Some(span) = brace_span(reply) else {
        debug!("weight reply contains no JSON object span");
        return WeightOutcome::NotFound;
    };

    let parsed: Value = match serde_json::from_str(span) {
        Ok(v) => v,
        Err(e) => {
            warn!("weight reply brace span is not valid JSON: {e}");
            return WeightOutcome::Ambiguous(reply.to_string());
        }
    };

    match parsed.get("weight") {
        None | Some(Value::Null) => WeightOutcome::NotFound,
        Some(Value::String(s)) => interpret_text_value(s, reply),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(v) if v != 0.0 => WeightOutcome::Found(v),
            // Zero is falsy by contract; a number that exceeds f64 range is
            // not recoverable.
            Some(_) => WeightOutcome::NotFound,
            None => WeightOutcome::Ambiguous(reply.to_string()),
        },
        Some(other) => {
            warn!("weight key has unexpected JSON type: {other}");
            WeightOutcome::Ambiguous(reply.to_string())
        }
    }
}

/// Coerce a textual weight value, stripping units and stray punctuation.
fn interpret_text_value(text: &str, reply: &str) -> WeightOutcome {
    if text.is_empty() {
        return WeightOutcome::NotFound;
    }

    let digits: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    match digits.parse::<f64>() {
        Ok(v) => WeightOutcome::Found(v),
        Err(_) => {
            warn!("weight value {text:?} has no recoverable number (stripped: {digits:?})");
            WeightOutcome::Ambiguous(reply.to_string())
        }
    }
}
