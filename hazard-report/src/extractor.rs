//! Locates the JSON object embedded in raw model output.
//!
//! Models tend to wrap their answer in prose or code fences. The extractor
//! takes the span from the first `{` to the last `}` and parses it. When that
//! is not possible it returns a degraded fallback object instead of an error,
//! so the normalizer always has something to work with.

use serde_json::{json, Value};

/// Summary used in the fallback object when a brace span exists but does not
/// parse.
pub const PARSE_FAILED_SUMMARY: &str = "Failed to parse response";

/// Why extraction fell back to the degraded shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// The text contains no `{` at all.
    NoJsonFound,
    /// A `{` exists but no parseable object spans to a later `}`.
    ParseFailed {
        /// Parser message, or a note that the closing brace is missing.
        error: String,
    },
}

/// How the extracted value was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionSource {
    /// Parsed from the byte range `start..end` of the input.
    Embedded { start: usize, end: usize },
    /// The fallback object was produced.
    Fallback { reason: FallbackReason },
}

/// The result of extraction: always a value, plus how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// The parsed object, or the fallback object.
    pub value: Value,
    /// Information about how this value was produced.
    pub source: ExtractionSource,
}

impl Extraction {
    /// Returns `true` if the fallback object was produced.
    #[inline]
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, ExtractionSource::Fallback { .. })
    }

    /// Consumes the extraction and returns the value.
    #[inline]
    pub fn into_value(self) -> Value {
        self.value
    }
}

/// Extracts the embedded JSON object from `text`.
///
/// The parsed object is returned unchanged; checking its shape is the
/// normalizer's job. This function never fails.
///
/// # Examples
///
/// ```
/// use hazard_report::extractor::extract;
/// use serde_json::json;
///
/// let extraction = extract(r#"Here you go: {"summary": "ok"} Thanks!"#);
/// assert!(!extraction.is_fallback());
/// assert_eq!(extraction.value, json!({"summary": "ok"}));
///
/// let fallback = extract("no braces here");
/// assert!(fallback.is_fallback());
/// assert_eq!(fallback.value["summary"], "no braces here");
/// ```
pub fn extract(text: &str) -> Extraction {
    let Some(start) = text.find('{') else {
        tracing::debug!(len = text.len(), "no opening brace in model output");
        return fallback(text, text, FallbackReason::NoJsonFound);
    };

    let end = match text.rfind('}') {
        Some(end) if end >= start => end + 1,
        _ => {
            tracing::debug!(start, "no closing brace after first opening brace");
            return fallback(
                text,
                PARSE_FAILED_SUMMARY,
                FallbackReason::ParseFailed {
                    error: "no closing brace after opening brace".to_string(),
                },
            );
        }
    };

    match serde_json::from_str::<Value>(&text[start..end]) {
        Ok(value) => {
            tracing::debug!(start, end, "parsed embedded JSON object");
            Extraction {
                value,
                source: ExtractionSource::Embedded { start, end },
            }
        }
        Err(e) => {
            tracing::debug!(start, end, error = %e, "embedded JSON failed to parse");
            fallback(
                text,
                PARSE_FAILED_SUMMARY,
                FallbackReason::ParseFailed {
                    error: e.to_string(),
                },
            )
        }
    }
}

/// Builds the degraded shape: a flat `hazards_detected` list instead of
/// `hazards_by_category`, with the raw text kept in `raw_response`.
fn fallback(raw: &str, summary: &str, reason: FallbackReason) -> Extraction {
    Extraction {
        value: json!({
            "overall_risk_level": "unknown",
            "hazards_detected": [],
            "summary": summary,
            "urgent_actions": [],
            "confidence_score": 0.0,
            "raw_response": raw,
        }),
        source: ExtractionSource::Fallback { reason },
    }
}
