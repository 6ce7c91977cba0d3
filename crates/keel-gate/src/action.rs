use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A nested, order-independent value in an action's detail map.
///
/// Serializes as the bare JSON value. Detail values are carried for
/// audit purposes only; the gate never interprets them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionValue {
    Str(String),
    Bool(bool),
    Seq(Vec<ActionValue>),
    Map(BTreeMap<String, ActionValue>),
}

impl From<&str> for ActionValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for ActionValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<bool> for ActionValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<ActionValue>> for ActionValue {
    fn from(values: Vec<ActionValue>) -> Self {
        Self::Seq(values)
    }
}

/// Immutable description of a proposed action.
///
/// The required fields are typed; everything else lives in the sorted
/// `details` map. Two descriptors built from the same fields are equal
/// and canonicalize to identical bytes regardless of insertion order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    kind: String,
    effects: Vec<String>,
    is_replication: bool,
    respects_life: bool,
    details: BTreeMap<String, ActionValue>,
}

impl ActionDescriptor {
    /// Builder with defaults: not a replication, respects life, no
    /// effects or details.
    pub fn builder(kind: impl Into<String>) -> ActionBuilder {
        ActionBuilder {
            kind: kind.into(),
            effects: Vec::new(),
            is_replication: false,
            respects_life: true,
            details: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Effect strings in declared order; the only field the gate scans
    /// for harm patterns.
    pub fn effects(&self) -> &[String] {
        &self.effects
    }

    pub fn is_replication(&self) -> bool {
        self.is_replication
    }

    pub fn respects_life(&self) -> bool {
        self.respects_life
    }

    pub fn details(&self) -> &BTreeMap<String, ActionValue> {
        &self.details
    }
}

/// Builder for [`ActionDescriptor`].
pub struct ActionBuilder {
    kind: String,
    effects: Vec<String>,
    is_replication: bool,
    respects_life: bool,
    details: BTreeMap<String, ActionValue>,
}

impl ActionBuilder {
    pub fn effect(mut self, effect: impl Into<String>) -> Self {
        self.effects.push(effect.into());
        self
    }

    pub fn is_replication(mut self, value: bool) -> Self {
        self.is_replication = value;
        self
    }

    pub fn respects_life(mut self, value: bool) -> Self {
        self.respects_life = value;
        self
    }

    pub fn detail(mut self, key: impl Into<String>, value: impl Into<ActionValue>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> ActionDescriptor {
        ActionDescriptor {
            kind: self.kind,
            effects: self.effects,
            is_replication: self.is_replication,
            respects_life: self.respects_life,
            details: self.details,
        }
    }
}
