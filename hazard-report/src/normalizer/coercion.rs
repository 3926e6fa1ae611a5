//! Record of the corrections normalization applies without reporting them.
//!
//! Container-level problems go to `validation.errors`. Everything beneath a
//! valid container (entry fields, summary counts, list elements) is fixed
//! quietly; the trail collected here makes those fixes observable without
//! changing the error list.

use serde::Serialize;
use serde_json::Value;

/// A single silent correction, located by a dotted path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coercion {
    /// Location in the source, e.g. `hazards_by_category.tree_hazards[1].risk_level`.
    pub path: String,
    /// What was done.
    #[serde(flatten)]
    pub kind: CoercionKind,
}

/// The kinds of silent correction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoercionKind {
    /// The field was absent and its default was inserted.
    DefaultInserted {
        /// The inserted value.
        default: Value,
    },

    /// A present value was outside its legal set and was replaced.
    Replaced {
        /// The source value.
        original: Value,
        /// What it was replaced with.
        replacement: Value,
    },

    /// A non-string value was rendered as its JSON text.
    Stringified {
        /// The source value.
        original: Value,
    },

    /// An entry was not a mapping and was treated as an empty one.
    NotAMapping {
        /// The source value.
        original: Value,
    },

    /// A category held something other than a sequence; it became empty.
    NotASequence {
        /// The source value.
        original: Value,
    },
}

impl CoercionKind {
    /// Returns a short human-readable description.
    pub fn description(&self) -> String {
        match self {
            Self::DefaultInserted { default } => format!("inserted default {}", default),
            Self::Replaced {
                original,
                replacement,
            } => format!("replaced {} with {}", original, replacement),
            Self::Stringified { original } => format!("rendered {} as text", original),
            Self::NotAMapping { original } => {
                format!("treated {} as an empty mapping", original)
            }
            Self::NotASequence { original } => {
                format!("treated {} as an empty sequence", original)
            }
        }
    }
}

/// Collects recorded errors and silent coercions during one normalization.
///
/// Keeps a scope trail so coercions can be located in the source.
#[derive(Debug, Default)]
pub(crate) struct CoercionContext {
    errors: Vec<String>,
    coercions: Vec<Coercion>,
    scope: Vec<String>,
}

impl CoercionContext {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records a structural error that will appear in `validation.errors`.
    pub(crate) fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::trace!(%message, "validation error");
        self.errors.push(message);
    }

    /// Records a silent coercion of `field` in the current scope.
    pub(crate) fn coerce(&mut self, field: &str, kind: CoercionKind) {
        let path = self.path_to(field);
        tracing::trace!(%path, change = %kind.description(), "silent coercion");
        self.coercions.push(Coercion { path, kind });
    }

    /// Records a silent coercion of the current scope itself.
    pub(crate) fn coerce_here(&mut self, kind: CoercionKind) {
        let path = self.scope.join(".");
        tracing::trace!(%path, change = %kind.description(), "silent coercion");
        self.coercions.push(Coercion { path, kind });
    }

    pub(crate) fn push_scope(&mut self, segment: impl Into<String>) {
        self.scope.push(segment.into());
    }

    /// Appends an index to the innermost segment: `flying_objects` → `flying_objects[2]`.
    pub(crate) fn push_index(&mut self, index: usize) {
        if let Some(last) = self.scope.last_mut() {
            last.push_str(&format!("[{}]", index));
        }
    }

    /// Removes an index added by [`Self::push_index`].
    pub(crate) fn pop_index(&mut self) {
        if let Some(last) = self.scope.last_mut() {
            if let Some(open) = last.rfind('[') {
                last.truncate(open);
            }
        }
    }

    pub(crate) fn pop_scope(&mut self) {
        self.scope.pop();
    }

    fn path_to(&self, field: &str) -> String {
        if self.scope.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", self.scope.join("."), field)
        }
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<Coercion>) {
        (self.errors, self.coercions)
    }
}
