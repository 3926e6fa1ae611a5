//! # hazard-report
//!
//! Turns the raw, possibly malformed answer of a generative model into a
//! strictly typed hazard report.
//!
//! Model output is unreliable in predictable ways:
//! - JSON wrapped in prose or markdown code fences
//! - Missing or wrongly typed fields
//! - Risk levels outside the allowed set
//! - Negative or fractional counts
//!
//! ## Quick Start
//!
//! ```rust
//! use hazard_report::{parse_report, report::RiskLevel};
//!
//! let answer = r#"Sure! {"overall_risk_level": "extreme", "hazards_by_category": {},
//!     "risk_summary": {}, "urgent_actions": [], "summary": "ok", "confidence_score": 0.5}"#;
//!
//! let report = parse_report(answer);
//! assert_eq!(report.overall_risk_level, RiskLevel::Unknown);
//! assert_eq!(report.validation.errors, vec!["Invalid overall_risk_level: extreme"]);
//! ```
//!
//! ## Pipeline
//!
//! - [`extractor::extract`] finds the embedded object, or produces a fallback
//!   object when there is none. It never fails.
//! - [`normalizer::normalize`] coerces any JSON value into an
//!   [`report::AnalysisReport`] and records container-level problems in
//!   `validation.errors`. It never fails either.
//! - [`analyzer::Analyzer`] runs both behind a pluggable [`analyzer::ModelClient`].

pub mod analyzer;
pub mod config;
pub mod error;
pub mod extractor;
pub mod normalizer;
pub mod report;

use extractor::{extract, Extraction};
use normalizer::{Coercion, Normalizer};
use report::AnalysisReport;

pub use normalizer::{normalize, normalize_traced};

/// Extracts and normalizes a raw model answer in one step.
///
/// # Examples
///
/// ```
/// use hazard_report::parse_report;
///
/// let report = parse_report("no braces here");
/// assert_eq!(report.summary, "no braces here");
/// assert_eq!(report.confidence_score, 0.0);
/// assert!(!report.is_valid());
/// ```
pub fn parse_report(raw: &str) -> AnalysisReport {
    Normalizer::new().normalize(&extract(raw).value)
}

/// Extracts and normalizes a raw model answer, returning every stage.
///
/// The extraction tells whether the fallback object was used; the coercions
/// list every silent correction.
pub fn parse_report_with_trace(raw: &str) -> (AnalysisReport, Extraction, Vec<Coercion>) {
    let extraction = extract(raw);
    let (report, coercions) = Normalizer::new().normalize_traced(&extraction.value);
    (report, extraction, coercions)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::report::RiskLevel;

    #[test]
    fn test_parse_report_embedded() {
        let report = parse_report(
            r#"```json
{"overall_risk_level": "critical", "hazards_by_category": {}, "risk_summary": {},
 "urgent_actions": ["evacuate"], "summary": "roof failing", "confidence_score": 1}
```"#,
        );
        assert_eq!(report.overall_risk_level, RiskLevel::Critical);
        assert_eq!(report.urgent_actions, vec!["evacuate"]);
        assert!(report.is_valid());
    }

    #[test]
    fn test_parse_report_with_trace_reports_fallback() {
        let (report, extraction, _) = parse_report_with_trace("{broken");
        assert!(extraction.is_fallback());
        assert_eq!(report.summary, "Failed to parse response");
        assert_eq!(report.extra.get("raw_response"), Some(&json!("{broken")));
    }

    #[test]
    fn test_normalize_reexport() {
        let report = normalize(&json!({}));
        assert_eq!(report.validation.errors.len(), 6);
    }
}
