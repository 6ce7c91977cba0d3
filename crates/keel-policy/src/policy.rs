use crate::error::PolicyError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The frozen policy value.
///
/// All fields are private and no mutator exists; once built, a `Policy`
/// can only be read. Rule and trait sets are `BTreeSet`s so the canonical
/// serialization is sorted without extra bookkeeping. Deserialization
/// runs the same validation as the builder, so an out-of-range record
/// cannot smuggle a policy past construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolicyWire")]
pub struct Policy {
    rules: BTreeSet<String>,
    humanitarian_enhanced: bool,
    respects_all_life: bool,
    no_self_replication: bool,
    curiosity: f64,
    traits: BTreeSet<String>,
}

impl Policy {
    /// Builder with conservative defaults: replication forbidden, life
    /// respected, curiosity 0.5, no rules or traits.
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder {
            rules: BTreeSet::new(),
            humanitarian_enhanced: false,
            respects_all_life: true,
            no_self_replication: true,
            curiosity: 0.5,
            traits: BTreeSet::new(),
        }
    }

    pub fn rules(&self) -> &BTreeSet<String> {
        &self.rules
    }

    pub fn has_rule(&self, rule: &str) -> bool {
        self.rules.contains(rule)
    }

    pub fn humanitarian_enhanced(&self) -> bool {
        self.humanitarian_enhanced
    }

    pub fn respects_all_life(&self) -> bool {
        self.respects_all_life
    }

    pub fn no_self_replication(&self) -> bool {
        self.no_self_replication
    }

    pub fn curiosity(&self) -> f64 {
        self.curiosity
    }

    pub fn traits(&self) -> &BTreeSet<String> {
        &self.traits
    }

    pub fn has_trait(&self, tag: &str) -> bool {
        self.traits.contains(tag)
    }
}

fn curiosity_in_range(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

/// Wire shape for deserialization; `TryFrom` re-runs builder validation.
#[derive(Deserialize)]
struct PolicyWire {
    rules: BTreeSet<String>,
    humanitarian_enhanced: bool,
    respects_all_life: bool,
    no_self_replication: bool,
    curiosity: f64,
    traits: BTreeSet<String>,
}

impl TryFrom<PolicyWire> for Policy {
    type Error = PolicyError;

    fn try_from(wire: PolicyWire) -> Result<Self, Self::Error> {
        if !curiosity_in_range(wire.curiosity) {
            return Err(PolicyError::CuriosityOutOfRange(wire.curiosity));
        }
        Ok(Policy {
            rules: wire.rules,
            humanitarian_enhanced: wire.humanitarian_enhanced,
            respects_all_life: wire.respects_all_life,
            no_self_replication: wire.no_self_replication,
            curiosity: wire.curiosity,
            traits: wire.traits,
        })
    }
}

/// Builder for [`Policy`].
pub struct PolicyBuilder {
    rules: BTreeSet<String>,
    humanitarian_enhanced: bool,
    respects_all_life: bool,
    no_self_replication: bool,
    curiosity: f64,
    traits: BTreeSet<String>,
}

impl PolicyBuilder {
    pub fn rule(mut self, rule: impl Into<String>) -> Self {
        self.rules.insert(rule.into());
        self
    }

    pub fn humanitarian_enhanced(mut self, enabled: bool) -> Self {
        self.humanitarian_enhanced = enabled;
        self
    }

    pub fn respects_all_life(mut self, enabled: bool) -> Self {
        self.respects_all_life = enabled;
        self
    }

    pub fn no_self_replication(mut self, enabled: bool) -> Self {
        self.no_self_replication = enabled;
        self
    }

    pub fn curiosity(mut self, value: f64) -> Self {
        self.curiosity = value;
        self
    }

    pub fn trait_tag(mut self, tag: impl Into<String>) -> Self {
        self.traits.insert(tag.into());
        self
    }

    pub fn build(self) -> Result<Policy, PolicyError> {
        if !curiosity_in_range(self.curiosity) {
            return Err(PolicyError::CuriosityOutOfRange(self.curiosity));
        }
        Ok(Policy {
            rules: self.rules,
            humanitarian_enhanced: self.humanitarian_enhanced,
            respects_all_life: self.respects_all_life,
            no_self_replication: self.no_self_replication,
            curiosity: self.curiosity,
            traits: self.traits,
        })
    }
}
