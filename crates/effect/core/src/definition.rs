//! Effect definitions - immutable descriptions of one kind of effect.
//!
//! A definition answers three questions: how much does this effect modify
//! each stat at a given power, how long does it run at a given power, and
//! how do overlapping applications of it merge. Game content implements the
//! [`Effect`] trait; the registry wraps each implementation into an
//! [`EffectDefinition`] exactly once, and that wrapper lives for the
//! process lifetime.
//!
//! # Purity Contract
//!
//! `effect_time` and `stat_modifier` must be pure functions of their
//! arguments for the lifetime of the process. The merge algorithm and the
//! add/subtract round trip both assume referential transparency; a
//! nondeterministic definition corrupts the stat ledger over time and is
//! rejected at registry construction (see `effect-runtime`).

use std::fmt;

use strum::IntoEnumIterator;

use crate::config::EffectConfig;
use crate::kind::{EffectKind, StatKind};
use crate::policy::MergePolicy;

/// Behavior of one kind of effect, implemented by game content.
pub trait Effect<S: StatKind, E: EffectKind>: Send + Sync {
    /// Identity of this effect. One implementation per kind.
    fn kind(&self) -> E;

    /// How overlapping applications of this effect merge.
    fn merge_policy(&self) -> MergePolicy;

    /// Duration in milliseconds an application of the given power runs.
    ///
    /// Must be a pure function of `power`.
    fn effect_time(&self, power: u16) -> i32;

    /// Signed additive bonus (or penalty) to `stat` at the given power, or
    /// `None` when this effect does not touch the stat.
    ///
    /// Must be a pure function of `(stat, power)`, and a stat that is
    /// `None` at any power must be `None` at every power.
    fn stat_modifier(&self, stat: S, power: u16) -> Option<i32>;
}

/// Registered, immutable form of an effect description.
///
/// Wraps the content-supplied [`Effect`] and caches its identity, merge
/// policy, and the set of stats it modifies. The modified set is derived
/// exactly once at construction by probing every stat kind at
/// [`EffectConfig::PROBE_POWER`] and is never recomputed.
pub struct EffectDefinition<S: StatKind, E: EffectKind> {
    behavior: Box<dyn Effect<S, E>>,
    kind: E,
    merge_policy: MergePolicy,
    modified_stats: Vec<S>,
}

impl<S: StatKind, E: EffectKind> EffectDefinition<S, E> {
    /// Wraps a behavior, probing which stats it modifies.
    pub fn new(behavior: Box<dyn Effect<S, E>>) -> Self {
        let kind = behavior.kind();
        let merge_policy = behavior.merge_policy();
        let modified_stats = S::iter()
            .filter(|&stat| behavior.stat_modifier(stat, EffectConfig::PROBE_POWER).is_some())
            .collect();

        Self {
            behavior,
            kind,
            merge_policy,
            modified_stats,
        }
    }

    /// Identity of this definition.
    pub fn kind(&self) -> E {
        self.kind
    }

    /// Resolution strategy for overlapping applications.
    pub fn merge_policy(&self) -> MergePolicy {
        self.merge_policy
    }

    /// Stats this effect modifies, in stat declaration order.
    pub fn modified_stats(&self) -> &[S] {
        &self.modified_stats
    }

    /// True when `stat` is in the modified set.
    pub fn modifies(&self, stat: S) -> bool {
        self.modified_stats.contains(&stat)
    }

    /// Duration in milliseconds an application of the given power runs.
    pub fn effect_time(&self, power: u16) -> i32 {
        self.behavior.effect_time(power)
    }

    /// Modifier for `stat` at `power`, `None` when the stat is unaffected.
    pub fn stat_modifier(&self, stat: S, power: u16) -> Option<i32> {
        self.behavior.stat_modifier(stat, power)
    }

    /// Convenience wrapper returning `0` for unaffected stats.
    pub fn modifier_or_zero(&self, stat: S, power: u16) -> i32 {
        self.stat_modifier(stat, power).unwrap_or(0)
    }
}

impl<S: StatKind, E: EffectKind> fmt::Debug for EffectDefinition<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectDefinition")
            .field("kind", &self.kind)
            .field("merge_policy", &self.merge_policy)
            .field("modified_stats", &self.modified_stats)
            .finish_non_exhaustive()
    }
}
