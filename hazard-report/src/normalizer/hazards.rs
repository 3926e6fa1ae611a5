//! Normalization of `hazards_by_category` and its entries.
//!
//! Corrections made here are silent: they are logged to the coercion trail
//! and never to `validation.errors`.

use serde_json::{json, Map, Value};

use super::{
    coercion::{CoercionContext, CoercionKind},
    fields::{risk, text},
};
use crate::report::{
    ElevatedObject, FlyingObject, HazardCategory, HazardsByCategory, StructuralDamage,
    TreeHazard,
};

pub const UNKNOWN_OBJECT: &str = "Unknown object";
pub const UNKNOWN_STRUCTURE: &str = "Unknown structure";
pub const NO_DESCRIPTION: &str = "No description";
pub const NO_LOCATION: &str = "Location not specified";
pub const NO_RECOMMENDATION: &str = "No recommendation";

/// Normalizes a `hazards_by_category` mapping.
///
/// Every category key is produced. Keys outside the four categories are
/// dropped.
pub(crate) fn normalize_hazards(
    ctx: &mut CoercionContext,
    source: &Map<String, Value>,
) -> HazardsByCategory {
    ctx.push_scope("hazards_by_category");
    let hazards = HazardsByCategory {
        flying_objects: category(ctx, source, HazardCategory::FlyingObjects, flying_object),
        structural_damage: category(
            ctx,
            source,
            HazardCategory::StructuralDamage,
            structural_damage,
        ),
        elevated_objects: category(
            ctx,
            source,
            HazardCategory::ElevatedObjects,
            elevated_object,
        ),
        tree_hazards: category(ctx, source, HazardCategory::TreeHazards, tree_hazard),
    };
    ctx.pop_scope();
    hazards
}

fn category<T>(
    ctx: &mut CoercionContext,
    source: &Map<String, Value>,
    category: HazardCategory,
    entry: fn(&mut CoercionContext, &Map<String, Value>) -> T,
) -> Vec<T> {
    let key = category.as_str();
    let items = match source.get(key) {
        Some(Value::Array(items)) => items,
        Some(other) => {
            ctx.coerce(
                key,
                CoercionKind::NotASequence {
                    original: other.clone(),
                },
            );
            return Vec::new();
        }
        None => {
            ctx.coerce(key, CoercionKind::DefaultInserted { default: json!([]) });
            return Vec::new();
        }
    };

    let empty = Map::new();
    let mut entries = Vec::with_capacity(items.len());
    ctx.push_scope(key);
    for (index, item) in items.iter().enumerate() {
        ctx.push_index(index);
        let obj = match item {
            Value::Object(obj) => obj,
            other => {
                ctx.coerce_here(CoercionKind::NotAMapping {
                    original: other.clone(),
                });
                &empty
            }
        };
        entries.push(entry(ctx, obj));
        ctx.pop_index();
    }
    ctx.pop_scope();
    entries
}

fn flying_object(ctx: &mut CoercionContext, obj: &Map<String, Value>) -> FlyingObject {
    FlyingObject {
        item: text(ctx, obj, "item", UNKNOWN_OBJECT),
        description: text(ctx, obj, "description", NO_DESCRIPTION),
        movement_risk: risk(ctx, obj, "movement_risk"),
        impact_severity: risk(ctx, obj, "impact_severity"),
        overall_risk: risk(ctx, obj, "overall_risk"),
        location: text(ctx, obj, "location", NO_LOCATION),
        recommendation: text(ctx, obj, "recommendation", NO_RECOMMENDATION),
    }
}

fn structural_damage(ctx: &mut CoercionContext, obj: &Map<String, Value>) -> StructuralDamage {
    StructuralDamage {
        item: text(ctx, obj, "item", UNKNOWN_STRUCTURE),
        description: text(ctx, obj, "description", NO_DESCRIPTION),
        risk_level: risk(ctx, obj, "risk_level"),
        location: text(ctx, obj, "location", NO_LOCATION),
        recommendation: text(ctx, obj, "recommendation", NO_RECOMMENDATION),
    }
}

fn elevated_object(ctx: &mut CoercionContext, obj: &Map<String, Value>) -> ElevatedObject {
    ElevatedObject {
        item: text(ctx, obj, "item", UNKNOWN_OBJECT),
        description: text(ctx, obj, "description", NO_DESCRIPTION),
        fall_risk: risk(ctx, obj, "fall_risk"),
        impact_severity: risk(ctx, obj, "impact_severity"),
        overall_risk: risk(ctx, obj, "overall_risk"),
        location: text(ctx, obj, "location", NO_LOCATION),
        recommendation: text(ctx, obj, "recommendation", NO_RECOMMENDATION),
    }
}

fn tree_hazard(ctx: &mut CoercionContext, obj: &Map<String, Value>) -> TreeHazard {
    TreeHazard {
        description: text(ctx, obj, "description", NO_DESCRIPTION),
        risk_level: risk(ctx, obj, "risk_level"),
        location: text(ctx, obj, "location", NO_LOCATION),
        recommendation: text(ctx, obj, "recommendation", NO_RECOMMENDATION),
    }
}
