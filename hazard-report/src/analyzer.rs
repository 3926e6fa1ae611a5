//! Runs a model over an image and turns its answer into a report.
//!
//! The model itself is a black box behind [`ModelClient`]; this crate ships
//! no network client. [`Analyzer`] wires a client to extraction and
//! normalization.

use crate::{
    config::AnalyzerConfig,
    error::Result,
    extractor::{extract, ExtractionSource},
    normalizer::{Coercion, Normalizer},
    report::{AnalysisReport, RiskLevel},
};

/// Everything a client needs for one model call.
#[derive(Debug, Clone, Copy)]
pub struct ModelRequest<'a> {
    /// Model settings and credentials.
    pub config: &'a AnalyzerConfig,
    /// Extra analysis guidelines appended to the prompt, if any.
    pub guidelines: Option<&'a str>,
    /// Encoded image bytes, passed through untouched.
    pub image: &'a [u8],
    /// MIME type of `image`, e.g. `image/jpeg`.
    pub media_type: &'a str,
}

/// A generative model that answers with raw text.
pub trait ModelClient: Send + Sync + std::fmt::Debug {
    /// Returns the name of this client for logging.
    fn name(&self) -> &'static str;

    /// Sends the request and returns the model's raw text answer.
    fn complete(&self, request: &ModelRequest<'_>) -> Result<String>;
}

/// The report produced for one input, with how it was obtained.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub report: AnalysisReport,
    /// Whether the report came from an embedded object or the fallback.
    pub source: ExtractionSource,
    /// Silent corrections applied during normalization.
    pub coercions: Vec<Coercion>,
}

/// One named input of a batch.
#[derive(Debug, Clone, Copy)]
pub struct BatchItem<'a> {
    pub name: &'a str,
    pub image: &'a [u8],
    pub media_type: &'a str,
}

/// Result of analyzing one batch input.
#[derive(Debug)]
pub struct BatchResult {
    pub name: String,
    pub outcome: Result<AnalysisOutcome>,
}

/// Results of a batch run, in input order.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub results: Vec<BatchResult>,
}

impl BatchSummary {
    /// Number of inputs that produced a report.
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_ok()).count()
    }

    /// Count of successful reports per overall risk level, for every level.
    pub fn distribution(&self) -> Vec<(RiskLevel, usize)> {
        RiskLevel::ALL
            .into_iter()
            .map(|level| {
                let count = self
                    .results
                    .iter()
                    .filter_map(|r| r.outcome.as_ref().ok())
                    .filter(|o| o.report.overall_risk_level == level)
                    .count();
                (level, count)
            })
            .collect()
    }
}

/// Connects a [`ModelClient`] to extraction and normalization.
#[derive(Debug)]
pub struct Analyzer<C> {
    config: AnalyzerConfig,
    client: C,
    normalizer: Normalizer,
}

impl<C: ModelClient> Analyzer<C> {
    /// Creates an analyzer from an explicit config and client.
    pub fn new(config: AnalyzerConfig, client: C) -> Self {
        Self {
            config,
            client,
            normalizer: Normalizer::new(),
        }
    }

    /// Returns the configuration this analyzer was built with.
    #[inline]
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyzes one image.
    ///
    /// # Errors
    ///
    /// Only a failing model client produces an error. Unparseable or
    /// malformed answers still yield a (low-confidence) report.
    pub fn analyze(
        &self,
        image: &[u8],
        media_type: &str,
        guidelines: Option<&str>,
    ) -> Result<AnalysisOutcome> {
        let request = ModelRequest {
            config: &self.config,
            guidelines,
            image,
            media_type,
        };

        let raw = self.client.complete(&request).map_err(|e| {
            tracing::warn!(client = self.client.name(), error = %e, "model call failed");
            e
        })?;

        let extraction = extract(&raw);
        let (report, coercions) = self.normalizer.normalize_traced(&extraction.value);

        if self.config.debug {
            tracing::debug!(
                client = self.client.name(),
                report = %serde_json::to_string(&report).unwrap_or_default(),
                "analysis completed"
            );
        }

        Ok(AnalysisOutcome {
            report,
            source: extraction.source,
            coercions,
        })
    }

    /// Analyzes every item, collecting per-item outcomes.
    ///
    /// A failing item does not stop the batch.
    pub fn analyze_batch<'a, I>(&self, items: I, guidelines: Option<&str>) -> BatchSummary
    where
        I: IntoIterator<Item = BatchItem<'a>>,
    {
        let results: Vec<_> = items
            .into_iter()
            .map(|item| BatchResult {
                name: item.name.to_string(),
                outcome: self.analyze(item.image, item.media_type, guidelines),
            })
            .collect();
        tracing::debug!(total = results.len(), "batch analysis finished");
        BatchSummary { results }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::AnalyzerError;

    #[derive(Debug)]
    struct CannedClient {
        answers: Mutex<Vec<Option<String>>>,
        seen_guidelines: Mutex<Vec<Option<String>>>,
    }

    impl CannedClient {
        fn new(answers: Vec<Option<&str>>) -> Self {
            Self {
                answers: Mutex::new(answers.into_iter().rev().map(|a| a.map(String::from)).collect()),
                seen_guidelines: Mutex::new(Vec::new()),
            }
        }
    }

    impl ModelClient for CannedClient {
        fn name(&self) -> &'static str {
            "canned"
        }

        fn complete(&self, request: &ModelRequest<'_>) -> Result<String> {
            self.seen_guidelines
                .lock()
                .unwrap()
                .push(request.guidelines.map(String::from));
            match self.answers.lock().unwrap().pop().flatten() {
                Some(answer) => Ok(answer),
                None => Err(AnalyzerError::model("service unavailable")),
            }
        }
    }

    fn analyzer(answers: Vec<Option<&str>>) -> Analyzer<CannedClient> {
        Analyzer::new(AnalyzerConfig::new("test-key"), CannedClient::new(answers))
    }

    #[test]
    fn test_analyze_embedded_answer() {
        let analyzer = analyzer(vec![Some(
            r#"Result: {"overall_risk_level": "high", "hazards_by_category": {}, "risk_summary": {}, "urgent_actions": [], "summary": "windy", "confidence_score": 0.9}"#,
        )]);
        let outcome = analyzer
            .analyze(b"jpeg", "image/jpeg", Some("focus on rooftops"))
            .unwrap();

        assert_eq!(outcome.report.overall_risk_level, RiskLevel::High);
        assert!(outcome.report.is_valid());
        assert!(matches!(outcome.source, ExtractionSource::Embedded { .. }));
        assert_eq!(
            analyzer.client.seen_guidelines.lock().unwrap()[0].as_deref(),
            Some("focus on rooftops")
        );
    }

    #[test]
    fn test_analyze_prose_answer_degrades() {
        let analyzer = analyzer(vec![Some("I cannot see any hazards.")]);
        let outcome = analyzer.analyze(b"", "image/png", None).unwrap();

        assert!(matches!(outcome.source, ExtractionSource::Fallback { .. }));
        assert_eq!(outcome.report.summary, "I cannot see any hazards.");
        assert_eq!(outcome.report.confidence_score, 0.0);
        assert_eq!(outcome.report.validation.errors.len(), 2);
    }

    #[test]
    fn test_debug_logging_does_not_change_outcome() {
        let answer = r#"{"overall_risk_level": "medium", "summary": "gusty"}"#;
        let quiet = analyzer(vec![Some(answer)]);
        let mut config = AnalyzerConfig::new("test-key");
        config.debug = true;
        let verbose = Analyzer::new(config, CannedClient::new(vec![Some(answer)]));

        let expected = quiet.analyze(b"", "image/jpeg", None).unwrap();
        let outcome = verbose.analyze(b"", "image/jpeg", None).unwrap();
        assert!(verbose.config().debug);
        assert_eq!(outcome.report, expected.report);
        assert_eq!(outcome.coercions, expected.coercions);
    }

    #[test]
    fn test_client_error_propagates() {
        let analyzer = analyzer(vec![None]);
        let err = analyzer.analyze(b"", "image/png", None).unwrap_err();
        assert!(matches!(err, AnalyzerError::Model { .. }));
    }

    #[test]
    fn test_batch_distribution() {
        let analyzer = analyzer(vec![
            Some(r#"{"overall_risk_level": "low"}"#),
            None,
            Some(r#"{"overall_risk_level": "low"}"#),
            Some("nothing"),
        ]);
        let items = ["a", "b", "c", "d"].map(|name| BatchItem {
            name,
            image: b"",
            media_type: "image/jpeg",
        });

        let summary = analyzer.analyze_batch(items, None);
        assert_eq!(summary.results.len(), 4);
        assert_eq!(summary.succeeded(), 3);
        assert!(summary.results[1].outcome.is_err());
        assert_eq!(summary.results[3].name, "d");
        assert_eq!(
            summary.distribution(),
            vec![
                (RiskLevel::Low, 2),
                (RiskLevel::Medium, 0),
                (RiskLevel::High, 0),
                (RiskLevel::Critical, 0),
                (RiskLevel::Unknown, 1),
            ]
        );
    }
}
