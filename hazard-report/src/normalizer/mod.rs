//! Schema normalization of untrusted analysis results.
//!
//! The normalizer turns any JSON value into an [`AnalysisReport`]. Problems
//! with a top-level field or container are recorded in `validation.errors`;
//! problems nested beneath a valid container are corrected silently and only
//! show up in the coercion trail from [`Normalizer::normalize_traced`].

mod coercion;
mod fields;
mod hazards;

pub use coercion::{Coercion, CoercionKind};
use coercion::CoercionContext;
use fields::render;
pub use hazards::{
    NO_DESCRIPTION, NO_LOCATION, NO_RECOMMENDATION, UNKNOWN_OBJECT, UNKNOWN_STRUCTURE,
};
use serde_json::{Map, Value};

use crate::report::{AnalysisReport, HazardsByCategory, RiskLevel, RiskSummary, ValidationReport};

/// Summary used when the source has none.
pub const DEFAULT_SUMMARY: &str = "Analysis incomplete";

/// Top-level fields every report must carry, in check order.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "overall_risk_level",
    "hazards_by_category",
    "risk_summary",
    "urgent_actions",
    "summary",
    "confidence_score",
];

/// Error recorded when the input itself is not a mapping.
pub const NOT_A_MAPPING: &str = "analysis result must be a dictionary";

/// Converts untrusted analysis results into conformant reports.
///
/// Normalization is a total function: every input, including `null`, arrays
/// and deeply malformed objects, produces a report. The input is never
/// modified, and identical inputs produce identical reports, including the
/// order of `validation.errors`.
///
/// # Examples
///
/// ```
/// use hazard_report::normalizer::Normalizer;
/// use hazard_report::report::RiskLevel;
/// use serde_json::json;
///
/// let report = Normalizer::new().normalize(&json!({}));
/// assert_eq!(report.overall_risk_level, RiskLevel::Unknown);
/// assert_eq!(report.validation.errors.len(), 6);
/// assert!(!report.is_valid());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer;

impl Normalizer {
    /// Creates a normalizer.
    #[inline]
    pub const fn new() -> Self {
        Self
    }

    /// Normalizes `input` into a report.
    pub fn normalize(&self, input: &Value) -> AnalysisReport {
        self.normalize_traced(input).0
    }

    /// Normalizes `input` and also returns every silent coercion applied.
    ///
    /// The trail never contains what `validation.errors` already reports.
    pub fn normalize_traced(&self, input: &Value) -> (AnalysisReport, Vec<Coercion>) {
        let mut ctx = CoercionContext::new();

        let empty = Map::new();
        let source = match input {
            Value::Object(map) => map,
            _ => {
                ctx.error(NOT_A_MAPPING);
                &empty
            }
        };

        for field in REQUIRED_FIELDS {
            if !source.contains_key(field) {
                ctx.error(format!("Missing required field: {}", field));
            }
        }

        let overall_risk_level = overall_risk_level(&mut ctx, source.get("overall_risk_level"));
        let hazards_by_category = hazards_by_category(&mut ctx, source.get("hazards_by_category"));
        let risk_summary = risk_summary(&mut ctx, source.get("risk_summary"));
        let confidence_score = confidence_score(&mut ctx, source.get("confidence_score"));
        let urgent_actions = urgent_actions(&mut ctx, source.get("urgent_actions"));
        let summary = if source.contains_key("summary") {
            fields::text(&mut ctx, source, "summary", DEFAULT_SUMMARY)
        } else {
            DEFAULT_SUMMARY.to_string()
        };

        let extra: Map<String, Value> = source
            .iter()
            .filter(|(key, _)| !AnalysisReport::KNOWN_FIELDS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let (errors, coercions) = ctx.into_parts();
        tracing::debug!(
            errors = errors.len(),
            coercions = coercions.len(),
            "normalized analysis result"
        );

        let report = AnalysisReport {
            overall_risk_level,
            hazards_by_category,
            risk_summary,
            urgent_actions,
            summary,
            confidence_score,
            validation: ValidationReport::from_errors(errors),
            extra,
        };
        (report, coercions)
    }
}

fn overall_risk_level(ctx: &mut CoercionContext, value: Option<&Value>) -> RiskLevel {
    let Some(value) = value else {
        return RiskLevel::Unknown;
    };
    if let Some(level) = value.as_str().and_then(RiskLevel::from_label) {
        return level;
    }
    ctx.error(format!("Invalid overall_risk_level: {}", render(value)));
    RiskLevel::Unknown
}

fn hazards_by_category(ctx: &mut CoercionContext, value: Option<&Value>) -> HazardsByCategory {
    match value {
        Some(Value::Object(map)) => hazards::normalize_hazards(ctx, map),
        Some(_) => {
            ctx.error("hazards_by_category must be a dictionary");
            HazardsByCategory::default()
        }
        None => HazardsByCategory::default(),
    }
}

fn risk_summary(ctx: &mut CoercionContext, value: Option<&Value>) -> RiskSummary {
    match value {
        Some(Value::Object(map)) => {
            let mut summary = RiskSummary::default();
            ctx.push_scope("risk_summary");
            for field in RiskSummary::FIELDS {
                let n = fields::count(ctx, map, field);
                if let Some(slot) = summary.count_mut(field) {
                    *slot = n;
                }
            }
            ctx.pop_scope();
            summary
        }
        Some(_) => {
            ctx.error("risk_summary must be a dictionary");
            RiskSummary::default()
        }
        None => RiskSummary::default(),
    }
}

fn confidence_score(ctx: &mut CoercionContext, value: Option<&Value>) -> f64 {
    let Some(value) = value else {
        return 0.0;
    };
    match value.as_f64() {
        Some(score) if value.is_number() && (0.0..=1.0).contains(&score) => score,
        _ => {
            ctx.error(format!("Invalid confidence_score: {}", render(value)));
            0.0
        }
    }
}

fn urgent_actions(ctx: &mut CoercionContext, value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => {
            ctx.push_scope("urgent_actions");
            let actions = items
                .iter()
                .enumerate()
                .map(|(index, item)| match item {
                    Value::String(s) => s.clone(),
                    other => {
                        ctx.push_index(index);
                        ctx.coerce_here(CoercionKind::Stringified {
                            original: other.clone(),
                        });
                        ctx.pop_index();
                        other.to_string()
                    }
                })
                .collect();
            ctx.pop_scope();
            actions
        }
        Some(_) => {
            ctx.error("urgent_actions must be a list");
            Vec::new()
        }
        None => Vec::new(),
    }
}

/// Normalizes `input` with a default [`Normalizer`].
#[inline]
pub fn normalize(input: &Value) -> AnalysisReport {
    Normalizer::new().normalize(input)
}

/// Normalizes `input` and returns the silent coercion trail as well.
#[inline]
pub fn normalize_traced(input: &Value) -> (AnalysisReport, Vec<Coercion>) {
    Normalizer::new().normalize_traced(input)
}
