use std::collections::HashSet;

use serde::{Deserialize, Deserializer};

use super::error::GrammarError;
use super::strategy::Strategy;
use super::value::Value;

/// One named argument slot.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArgSlot {
    /// Slot name, unique within its [`Args`].
    pub name: String,
    /// How the slot matches tokens.
    #[serde(rename = "pattern")]
    pub strategy: Strategy,
    /// Value written when the slot's token does not match or is absent.
    /// `Some(Value::Null)` is an explicit null default.
    #[serde(default, deserialize_with = "present_default")]
    pub default: Option<Value>,
    /// Leave the slot absent instead of failing when nothing matches.
    #[serde(default)]
    pub optional: bool,
}

/// A present `"default": null` is an explicit null default, not "no default".
fn present_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl ArgSlot {
    /// Create a required slot.
    pub fn new(name: impl Into<String>, strategy: Strategy) -> Self {
        Self {
            name: name.into(),
            strategy,
            default: None,
            optional: false,
        }
    }

    /// Set the default value (builder pattern).
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Mark the slot optional (builder pattern).
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// A slot that must be filled from the input.
    pub fn is_required(&self) -> bool {
        self.default.is_none() && !self.optional
    }
}

/// An ordered argument specification.
///
/// Immutable once built; slot names are unique.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(try_from = "Vec<ArgSlot>")]
pub struct Args {
    slots: Vec<ArgSlot>,
}

impl Args {
    /// An empty specification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from slots, rejecting duplicate names.
    pub fn from_slots(slots: Vec<ArgSlot>) -> Result<Self, GrammarError> {
        let mut seen = HashSet::new();
        for slot in &slots {
            if slot.name.is_empty() {
                return Err(GrammarError::EmptyName);
            }
            if !seen.insert(slot.name.as_str()) {
                return Err(GrammarError::DuplicateArgument(slot.name.clone()));
            }
        }
        Ok(Self { slots })
    }

    /// Slots in declared order.
    pub fn slots(&self) -> &[ArgSlot] {
        &self.slots
    }

    /// Total number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether there are no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots carrying a default.
    pub fn optional_count(&self) -> usize {
        self.slots.iter().filter(|s| s.default.is_some()).count()
    }

    /// `len() - optional_count()`.
    pub fn required_count(&self) -> usize {
        self.len() - self.optional_count()
    }

    /// Whether at least one slot has neither a default nor the optional flag.
    pub fn needs_input(&self) -> bool {
        self.slots.iter().any(ArgSlot::is_required)
    }

    /// Required slots declared after position `index`.
    pub(crate) fn required_after(&self, index: usize) -> usize {
        self.slots
            .get(index + 1..)
            .map_or(0, |rest| rest.iter().filter(|s| s.is_required()).count())
    }
}

impl TryFrom<Vec<ArgSlot>> for Args {
    type Error = GrammarError;

    fn try_from(slots: Vec<ArgSlot>) -> Result<Self, Self::Error> {
        Args::from_slots(slots)
    }
}
