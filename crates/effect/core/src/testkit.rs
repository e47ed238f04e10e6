//! Shared fixtures for unit tests.

use std::sync::Arc;

use crate::definition::{Effect, EffectDefinition};
use crate::policy::MergePolicy;

/// Stat set of the test game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
pub(crate) enum Attribute {
    Strength,
    Agility,
    Intellect,
    Vigor,
    Luck,
}

/// Effect kinds of the test game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum BuffKind {
    Strengthen,
    Haste,
    Poison,
    IronSkin,
}

/// Table-driven effect: each listed stat gains `per_power × power`.
pub(crate) struct StaticEffect {
    pub kind: BuffKind,
    pub policy: MergePolicy,
    pub per_power: &'static [(Attribute, i32)],
    pub base_duration_ms: i32,
}

impl Effect<Attribute, BuffKind> for StaticEffect {
    fn kind(&self) -> BuffKind {
        self.kind
    }

    fn merge_policy(&self) -> MergePolicy {
        self.policy
    }

    fn effect_time(&self, power: u16) -> i32 {
        self.base_duration_ms.saturating_add(i32::from(power) * 100)
    }

    fn stat_modifier(&self, stat: Attribute, power: u16) -> Option<i32> {
        self.per_power
            .iter()
            .find(|(affected, _)| *affected == stat)
            .map(|(_, per_power)| per_power * i32::from(power))
    }
}

/// Registered definition for a table-driven effect.
pub(crate) fn static_definition(
    kind: BuffKind,
    policy: MergePolicy,
    per_power: &'static [(Attribute, i32)],
    base_duration_ms: i32,
) -> Arc<EffectDefinition<Attribute, BuffKind>> {
    Arc::new(EffectDefinition::new(Box::new(StaticEffect {
        kind,
        policy,
        per_power,
        base_duration_ms,
    })))
}
