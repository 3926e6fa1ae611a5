//! The strictly typed hazard report produced by normalization.

mod hazard;
mod risk;

pub use hazard::{
    ElevatedObject, FlyingObject, HazardCategory, HazardEntry, HazardsByCategory,
    StructuralDamage, TreeHazard,
};
pub use risk::{FallRisk, MovementRisk, RiskLevel};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Per-severity hazard counts as supplied by the model.
///
/// These counts are stored, not derived: they may disagree with the hazard
/// lists. See [`RiskSummary::derive_from`] and
/// [`AnalysisReport::summary_mismatch`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub critical_count: u64,
    pub high_count: u64,
    pub medium_count: u64,
    pub low_count: u64,
    pub total_hazards: u64,
}

impl RiskSummary {
    /// Count field names, in report order.
    pub const FIELDS: [&'static str; 5] = [
        "critical_count",
        "high_count",
        "medium_count",
        "low_count",
        "total_hazards",
    ];

    /// Recomputes counts from each entry's headline risk.
    ///
    /// Entries with `unknown` risk count toward `total_hazards` only.
    ///
    /// # Examples
    ///
    /// ```
    /// use hazard_report::report::{HazardsByCategory, RiskSummary};
    ///
    /// let summary = RiskSummary::derive_from(&HazardsByCategory::default());
    /// assert_eq!(summary, RiskSummary::default());
    /// ```
    pub fn derive_from(hazards: &HazardsByCategory) -> Self {
        let mut summary = Self::default();
        for entry in hazards.iter() {
            summary.total_hazards += 1;
            match entry.risk() {
                RiskLevel::Critical => summary.critical_count += 1,
                RiskLevel::High => summary.high_count += 1,
                RiskLevel::Medium => summary.medium_count += 1,
                RiskLevel::Low => summary.low_count += 1,
                RiskLevel::Unknown => {}
            }
        }
        summary
    }

    /// Mutable access to a count by field name.
    pub(crate) fn count_mut(&mut self, field: &str) -> Option<&mut u64> {
        match field {
            "critical_count" => Some(&mut self.critical_count),
            "high_count" => Some(&mut self.high_count),
            "medium_count" => Some(&mut self.medium_count),
            "low_count" => Some(&mut self.low_count),
            "total_hazards" => Some(&mut self.total_hazards),
            _ => None,
        }
    }
}

/// Structural problems found while normalizing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Recorded problems, in check order.
    pub errors: Vec<String>,
    /// `true` iff `errors` is empty.
    pub is_valid: bool,
}

impl ValidationReport {
    pub fn from_errors(errors: Vec<String>) -> Self {
        let is_valid = errors.is_empty();
        Self { errors, is_valid }
    }
}

/// A schema-conformant hazard report.
///
/// Keys of the source object that are not part of the schema are kept in
/// `extra` and serialized back alongside the known fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub overall_risk_level: RiskLevel,
    pub hazards_by_category: HazardsByCategory,
    pub risk_summary: RiskSummary,
    pub urgent_actions: Vec<String>,
    pub summary: String,
    pub confidence_score: f64,
    pub validation: ValidationReport,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnalysisReport {
    /// Top-level keys owned by the schema; never carried in `extra`.
    pub const KNOWN_FIELDS: [&'static str; 7] = [
        "overall_risk_level",
        "hazards_by_category",
        "risk_summary",
        "urgent_actions",
        "summary",
        "confidence_score",
        "validation",
    ];

    /// Returns `true` if normalization recorded no errors.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.validation.is_valid
    }

    /// The summary recomputed from the hazard lists, when it differs from the
    /// stored one.
    pub fn summary_mismatch(&self) -> Option<RiskSummary> {
        let derived = RiskSummary::derive_from(&self.hazards_by_category);
        (derived != self.risk_summary).then_some(derived)
    }

    /// Parses a previously serialized report.
    ///
    /// This is a strict typed parse; untrusted model output goes through
    /// [`crate::normalize`] instead.
    pub fn from_json_str(input: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Serializes the report as a JSON value.
    pub fn to_value(&self) -> Value {
        // All map keys are strings, so conversion cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn report() -> AnalysisReport {
        AnalysisReport {
            overall_risk_level: RiskLevel::High,
            hazards_by_category: HazardsByCategory {
                structural_damage: vec![StructuralDamage {
                    item: "간판".to_string(),
                    description: "느슨한 간판".to_string(),
                    risk_level: RiskLevel::High,
                    location: "2층 외벽".to_string(),
                    recommendation: "고정 필요".to_string(),
                }],
                ..Default::default()
            },
            risk_summary: RiskSummary {
                high_count: 1,
                total_hazards: 1,
                ..Default::default()
            },
            urgent_actions: vec!["secure signboard".to_string()],
            summary: "one loose sign".to_string(),
            confidence_score: 0.8,
            validation: ValidationReport::from_errors(Vec::new()),
            extra: Map::new(),
        }
    }

    #[test]
    fn test_derive_from_counts_headline_risk() {
        let summary = RiskSummary::derive_from(&report().hazards_by_category);
        assert_eq!(
            summary,
            RiskSummary {
                high_count: 1,
                total_hazards: 1,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_summary_mismatch() {
        let mut report = report();
        assert_eq!(report.summary_mismatch(), None);

        report.risk_summary.total_hazards = 5;
        let derived = report.summary_mismatch().unwrap();
        assert_eq!(derived.total_hazards, 1);
    }

    #[test]
    fn test_json_round_trip_keeps_non_ascii() {
        let mut report = report();
        report.extra.insert("raw_response".to_string(), json!("원문"));

        let text = serde_json::to_string(&report).unwrap();
        assert!(text.contains("느슨한 간판"));
        assert!(text.contains("\"raw_response\":\"원문\""));

        let parsed = AnalysisReport::from_json_str(&text).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_validation_from_errors() {
        assert!(ValidationReport::from_errors(vec![]).is_valid);
        assert!(!ValidationReport::from_errors(vec!["x".to_string()]).is_valid);
    }

    #[test]
    fn test_count_mut_covers_every_field() {
        let mut summary = RiskSummary::default();
        for field in RiskSummary::FIELDS {
            *summary.count_mut(field).unwrap() = 1;
        }
        assert_eq!(summary.total_hazards, 1);
        assert_eq!(summary.critical_count, 1);
        assert!(summary.count_mut("bogus").is_none());
    }
}
