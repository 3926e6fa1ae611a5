//! Hazard categories and the per-category entry shapes.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::risk::{FallRisk, MovementRisk, RiskLevel};

/// The four fixed buckets a detected hazard is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardCategory {
    /// Loose objects that wind can pick up.
    FlyingObjects,
    /// Damaged or weakened structures.
    StructuralDamage,
    /// Objects placed at height that can fall.
    ElevatedObjects,
    /// Trees and branches.
    TreeHazards,
}

impl HazardCategory {
    /// All categories, in report order.
    pub const ALL: [HazardCategory; 4] = [
        HazardCategory::FlyingObjects,
        HazardCategory::StructuralDamage,
        HazardCategory::ElevatedObjects,
        HazardCategory::TreeHazards,
    ];

    /// Returns the mapping key used for this category.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            HazardCategory::FlyingObjects => "flying_objects",
            HazardCategory::StructuralDamage => "structural_damage",
            HazardCategory::ElevatedObjects => "elevated_objects",
            HazardCategory::TreeHazards => "tree_hazards",
        }
    }

    /// Looks up a category by its exact key.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }
}

impl fmt::Display for HazardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An object likely to be carried by strong wind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlyingObject {
    pub item: String,
    pub description: String,
    pub movement_risk: MovementRisk,
    pub impact_severity: RiskLevel,
    pub overall_risk: RiskLevel,
    pub location: String,
    pub recommendation: String,
}

/// A structural weakness such as a cracked window or loose signboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralDamage {
    pub item: String,
    pub description: String,
    pub risk_level: RiskLevel,
    pub location: String,
    pub recommendation: String,
}

/// An object resting at height (balcony, rooftop) that could fall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevatedObject {
    pub item: String,
    pub description: String,
    pub fall_risk: FallRisk,
    pub impact_severity: RiskLevel,
    pub overall_risk: RiskLevel,
    pub location: String,
    pub recommendation: String,
}

/// A tree-related hazard. Trees carry no `item` name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeHazard {
    pub description: String,
    pub risk_level: RiskLevel,
    pub location: String,
    pub recommendation: String,
}

/// A borrowed view over one entry of any category.
///
/// Serializes to exactly the entry's own field set, without a tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HazardEntry<'a> {
    FlyingObject(&'a FlyingObject),
    StructuralDamage(&'a StructuralDamage),
    ElevatedObject(&'a ElevatedObject),
    TreeHazard(&'a TreeHazard),
}

impl<'a> HazardEntry<'a> {
    /// The category this entry belongs to.
    pub fn category(&self) -> HazardCategory {
        match *self {
            HazardEntry::FlyingObject(_) => HazardCategory::FlyingObjects,
            HazardEntry::StructuralDamage(_) => HazardCategory::StructuralDamage,
            HazardEntry::ElevatedObject(_) => HazardCategory::ElevatedObjects,
            HazardEntry::TreeHazard(_) => HazardCategory::TreeHazards,
        }
    }

    /// The headline risk: `overall_risk` for objects, `risk_level` otherwise.
    pub fn risk(&self) -> RiskLevel {
        match *self {
            HazardEntry::FlyingObject(e) => e.overall_risk,
            HazardEntry::StructuralDamage(e) => e.risk_level,
            HazardEntry::ElevatedObject(e) => e.overall_risk,
            HazardEntry::TreeHazard(e) => e.risk_level,
        }
    }

    /// The named item, if the category has one.
    pub fn item(&self) -> Option<&'a str> {
        match *self {
            HazardEntry::FlyingObject(e) => Some(e.item.as_str()),
            HazardEntry::StructuralDamage(e) => Some(e.item.as_str()),
            HazardEntry::ElevatedObject(e) => Some(e.item.as_str()),
            HazardEntry::TreeHazard(_) => None,
        }
    }

    pub fn description(&self) -> &'a str {
        match *self {
            HazardEntry::FlyingObject(e) => e.description.as_str(),
            HazardEntry::StructuralDamage(e) => e.description.as_str(),
            HazardEntry::ElevatedObject(e) => e.description.as_str(),
            HazardEntry::TreeHazard(e) => e.description.as_str(),
        }
    }

    pub fn location(&self) -> &'a str {
        match *self {
            HazardEntry::FlyingObject(e) => e.location.as_str(),
            HazardEntry::StructuralDamage(e) => e.location.as_str(),
            HazardEntry::ElevatedObject(e) => e.location.as_str(),
            HazardEntry::TreeHazard(e) => e.location.as_str(),
        }
    }

    pub fn recommendation(&self) -> &'a str {
        match *self {
            HazardEntry::FlyingObject(e) => e.recommendation.as_str(),
            HazardEntry::StructuralDamage(e) => e.recommendation.as_str(),
            HazardEntry::ElevatedObject(e) => e.recommendation.as_str(),
            HazardEntry::TreeHazard(e) => e.recommendation.as_str(),
        }
    }
}

/// Hazards grouped by category.
///
/// All four keys are always present when serialized, even when empty, and
/// each bucket can only hold entries of its own shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HazardsByCategory {
    #[serde(default)]
    pub flying_objects: Vec<FlyingObject>,
    #[serde(default)]
    pub structural_damage: Vec<StructuralDamage>,
    #[serde(default)]
    pub elevated_objects: Vec<ElevatedObject>,
    #[serde(default)]
    pub tree_hazards: Vec<TreeHazard>,
}

impl HazardsByCategory {
    /// Number of entries filed under `category`.
    pub fn len(&self, category: HazardCategory) -> usize {
        match category {
            HazardCategory::FlyingObjects => self.flying_objects.len(),
            HazardCategory::StructuralDamage => self.structural_damage.len(),
            HazardCategory::ElevatedObjects => self.elevated_objects.len(),
            HazardCategory::TreeHazards => self.tree_hazards.len(),
        }
    }

    /// Entries filed under `category`, in source order.
    pub fn get(&self, category: HazardCategory) -> Vec<HazardEntry<'_>> {
        match category {
            HazardCategory::FlyingObjects => {
                self.flying_objects.iter().map(HazardEntry::FlyingObject).collect()
            }
            HazardCategory::StructuralDamage => self
                .structural_damage
                .iter()
                .map(HazardEntry::StructuralDamage)
                .collect(),
            HazardCategory::ElevatedObjects => self
                .elevated_objects
                .iter()
                .map(HazardEntry::ElevatedObject)
                .collect(),
            HazardCategory::TreeHazards => {
                self.tree_hazards.iter().map(HazardEntry::TreeHazard).collect()
            }
        }
    }

    /// Iterates every entry, category by category in report order.
    pub fn iter(&self) -> impl Iterator<Item = HazardEntry<'_>> {
        self.flying_objects
            .iter()
            .map(HazardEntry::FlyingObject)
            .chain(self.structural_damage.iter().map(HazardEntry::StructuralDamage))
            .chain(self.elevated_objects.iter().map(HazardEntry::ElevatedObject))
            .chain(self.tree_hazards.iter().map(HazardEntry::TreeHazard))
    }

    /// Yields each category with its entries, in report order.
    ///
    /// Empty categories are included.
    pub fn iter_categories(&self) -> impl Iterator<Item = (HazardCategory, Vec<HazardEntry<'_>>)> {
        HazardCategory::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }

    /// Total number of entries across all categories.
    pub fn total(&self) -> usize {
        HazardCategory::ALL.iter().map(|c| self.len(*c)).sum()
    }

    /// Returns `true` if no category holds any entry.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn tree(risk: RiskLevel) -> TreeHazard {
        TreeHazard {
            description: "leaning pine".to_string(),
            risk_level: risk,
            location: "left edge".to_string(),
            recommendation: "call arborist".to_string(),
        }
    }

    #[test]
    fn test_empty_buckets_serialize_all_keys() {
        let value = serde_json::to_value(HazardsByCategory::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "flying_objects": [],
                "structural_damage": [],
                "elevated_objects": [],
                "tree_hazards": [],
            })
        );
    }

    #[test]
    fn test_entry_view_serializes_untagged() {
        let hazard = tree(RiskLevel::High);
        let value = serde_json::to_value(HazardEntry::TreeHazard(&hazard)).unwrap();
        assert_eq!(
            value,
            json!({
                "description": "leaning pine",
                "risk_level": "high",
                "location": "left edge",
                "recommendation": "call arborist",
            })
        );
    }

    #[test]
    fn test_iter_and_total() {
        let hazards = HazardsByCategory {
            tree_hazards: vec![tree(RiskLevel::Low), tree(RiskLevel::Critical)],
            ..Default::default()
        };
        assert_eq!(hazards.total(), 2);
        assert_eq!(hazards.len(HazardCategory::TreeHazards), 2);
        assert!(hazards.get(HazardCategory::FlyingObjects).is_empty());

        let risks: Vec<_> = hazards.iter().map(|e| e.risk()).collect();
        assert_eq!(risks, vec![RiskLevel::Low, RiskLevel::Critical]);
        assert!(hazards.iter().all(|e| e.item().is_none()));
    }

    #[test]
    fn test_iter_categories_pairs_each_bucket() {
        let hazards = HazardsByCategory {
            tree_hazards: vec![tree(RiskLevel::Medium)],
            ..Default::default()
        };
        let pairs: Vec<_> = hazards
            .iter_categories()
            .map(|(category, entries)| (category, entries.len()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (HazardCategory::FlyingObjects, 0),
                (HazardCategory::StructuralDamage, 0),
                (HazardCategory::ElevatedObjects, 0),
                (HazardCategory::TreeHazards, 1),
            ]
        );
        let (_, trees) = hazards.iter_categories().last().unwrap();
        assert_eq!(trees[0].category(), HazardCategory::TreeHazards);
        assert_eq!(trees[0].description(), "leaning pine");
    }

    #[test]
    fn test_category_labels_round_trip() {
        for category in HazardCategory::ALL {
            assert_eq!(HazardCategory::from_label(category.as_str()), Some(category));
        }
        assert_eq!(HazardCategory::from_label("hazards_detected"), None);
    }
}
