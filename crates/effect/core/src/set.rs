//! Per-subject bookkeeping of active effects.
//!
//! Each subject (character) owns one [`EffectSet`]. Applying an effect kind
//! that is already present routes through the merge algorithm instead of
//! stacking a second instance, and the set keeps the subject's stat
//! container consistent across inserts, merges, and removals.
//!
//! The set never schedules anything itself; the owner calls
//! [`EffectSet::purge_expired`] from its update step.

use std::sync::Arc;

use arrayvec::ArrayVec;

use crate::active::ActiveEffect;
use crate::config::EffectConfig;
use crate::definition::EffectDefinition;
use crate::error::EffectError;
use crate::kind::{EffectKind, StatKind};
use crate::stats::StatContainer;
use crate::time::Tick;

/// How an application was absorbed into the set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// No instance of this kind was active; a new one was added.
    Added,
    /// An instance was already active and the application was merged into
    /// it. `changed` reports whether power or expiry actually moved.
    Merged {
        /// Result of the merge's snapshot comparison.
        changed: bool,
    },
}

/// Active status effects on one subject.
#[derive(Clone, Debug)]
pub struct EffectSet<S: StatKind, E: EffectKind> {
    effects: ArrayVec<ActiveEffect<S, E>, { EffectConfig::MAX_ACTIVE_EFFECTS }>,
}

impl<S: StatKind, E: EffectKind> Default for EffectSet<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StatKind, E: EffectKind> EffectSet<S, E> {
    /// Creates an empty effect set.
    pub fn new() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    /// Applies `definition` at `power`, with expiry derived from the
    /// definition's duration at that power.
    pub fn apply<C: StatContainer<S>>(
        &mut self,
        definition: &Arc<EffectDefinition<S, E>>,
        power: u16,
        now: Tick,
        stats: &mut C,
    ) -> Result<ApplyOutcome, EffectError> {
        // A duration cannot move expiry backwards.
        let duration = definition.effect_time(power).max(0) as u64;
        self.apply_until(definition, power, now, now.advanced_by(duration), stats)
    }

    /// Applies `definition` at `power` with an explicit expiry tick.
    ///
    /// If an instance of the same kind is active the application merges
    /// into it and the subject's stat container is re-led only when the
    /// merge changed the power.
    pub fn apply_until<C: StatContainer<S>>(
        &mut self,
        definition: &Arc<EffectDefinition<S, E>>,
        power: u16,
        now: Tick,
        expires_at: Tick,
        stats: &mut C,
    ) -> Result<ApplyOutcome, EffectError> {
        let kind = definition.kind();

        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind() == kind) {
            let old_power = existing.power();
            let changed = existing.merge_with(now, power, expires_at);
            let new_power = existing.power();
            if new_power != old_power {
                let definition = existing.definition();
                for &stat in definition.modified_stats() {
                    stats.subtract(stat, definition.modifier_or_zero(stat, old_power));
                    stats.add(stat, definition.modifier_or_zero(stat, new_power));
                }
            }
            return Ok(ApplyOutcome::Merged { changed });
        }

        if self.effects.is_full() {
            return Err(EffectError::EffectListFull {
                max: EffectConfig::MAX_ACTIVE_EFFECTS,
                current: self.effects.len(),
            });
        }

        let effect = ActiveEffect::new(Arc::clone(definition), power, expires_at);
        effect.add_bonuses_to(stats);
        self.effects.push(effect);
        Ok(ApplyOutcome::Added)
    }

    /// Removes an effect immediately, subtracting its bonuses.
    ///
    /// Returns true if an instance of `kind` was present.
    pub fn remove<C: StatContainer<S>>(&mut self, kind: E, stats: &mut C) -> bool {
        let mut removed = false;
        self.effects.retain(|e| {
            if e.kind() == kind {
                e.subtract_bonuses_from(stats);
                removed = true;
                false
            } else {
                true
            }
        });
        removed
    }

    /// Removes every expired effect, subtracting its bonuses.
    ///
    /// Call this from the subject's update step when the tick advances.
    /// Returns the number of effects removed.
    pub fn purge_expired<C: StatContainer<S>>(&mut self, now: Tick, stats: &mut C) -> usize {
        let mut purged = 0;
        self.effects.retain(|e| {
            if e.is_expired(now) {
                e.subtract_bonuses_from(stats);
                purged += 1;
                false
            } else {
                true
            }
        });
        purged
    }

    /// Checks if an effect of `kind` is active at the given tick.
    pub fn has(&self, kind: E, now: Tick) -> bool {
        self.effects
            .iter()
            .any(|e| e.kind() == kind && !e.is_expired(now))
    }

    /// Expiration tick of an active effect, None when not active.
    pub fn expires_at(&self, kind: E, now: Tick) -> Option<Tick> {
        self.effects
            .iter()
            .find(|e| e.kind() == kind && !e.is_expired(now))
            .map(|e| e.expires_at())
    }

    /// The instance of `kind`, expired or not.
    pub fn get(&self, kind: E) -> Option<&ActiveEffect<S, E>> {
        self.effects.iter().find(|e| e.kind() == kind)
    }

    /// Iterator over effects still active at the given tick.
    pub fn active_at(&self, now: Tick) -> impl Iterator<Item = &ActiveEffect<S, E>> + '_ {
        self.effects.iter().filter(move |e| !e.is_expired(now))
    }

    /// Iterator over all effects (including expired, not yet purged).
    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect<S, E>> {
        self.effects.iter()
    }

    /// Number of instances held (including expired, not yet purged).
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// True when no instances are held.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::policy::MergePolicy;
    use crate::testkit::{Attribute, BuffKind, static_definition};

    type Stats = HashMap<Attribute, i32>;

    #[test]
    fn applying_adds_bonuses_and_tracks_expiry() {
        let strengthen = static_definition(
            BuffKind::Strengthen,
            MergePolicy::UseGreatestTimeAndPower,
            &[(Attribute::Strength, 5)],
            10_000,
        );
        let mut set = EffectSet::new();
        let mut stats = Stats::new();

        let outcome = set.apply(&strengthen, 2, Tick::ZERO, &mut stats).unwrap();
        assert_eq!(outcome, ApplyOutcome::Added);
        assert_eq!(stats.value(Attribute::Strength), 10);
        // duration = base 10_000 + 2 × 100
        assert_eq!(
            set.expires_at(BuffKind::Strengthen, Tick::ZERO),
            Some(Tick(10_200))
        );
        assert!(set.has(BuffKind::Strengthen, Tick::ZERO));
        assert!(!set.has(BuffKind::Haste, Tick::ZERO));
    }

    #[test]
    fn duplicate_application_merges_and_keeps_the_ledger_consistent() {
        let strengthen = static_definition(
            BuffKind::Strengthen,
            MergePolicy::UseGreatestTimeAndPower,
            &[(Attribute::Strength, 5)],
            0,
        );
        let mut set = EffectSet::new();
        let mut stats = Stats::new();
        stats.insert(Attribute::Strength, 100);

        set.apply_until(&strengthen, 10, Tick::ZERO, Tick(5_000), &mut stats)
            .unwrap();
        assert_eq!(stats.value(Attribute::Strength), 150);

        // Weaker but longer: power stays, expiry extends, ledger untouched.
        let outcome = set
            .apply_until(&strengthen, 6, Tick::ZERO, Tick(9_000), &mut stats)
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::Merged { changed: true });
        assert_eq!(set.len(), 1);
        assert_eq!(stats.value(Attribute::Strength), 150);
        assert_eq!(
            set.expires_at(BuffKind::Strengthen, Tick::ZERO),
            Some(Tick(9_000))
        );

        // Stronger: the ledger moves from the old power to the new one.
        set.apply_until(&strengthen, 20, Tick::ZERO, Tick(9_000), &mut stats)
            .unwrap();
        assert_eq!(stats.value(Attribute::Strength), 200);

        // Identical re-application changes nothing.
        let outcome = set
            .apply_until(&strengthen, 20, Tick::ZERO, Tick(9_000), &mut stats)
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::Merged { changed: false });
        assert_eq!(stats.value(Attribute::Strength), 200);
    }

    #[test]
    fn purge_expired_restores_the_ledger() {
        let strengthen = static_definition(
            BuffKind::Strengthen,
            MergePolicy::DiscardNewer,
            &[(Attribute::Strength, 5)],
            0,
        );
        let haste = static_definition(
            BuffKind::Haste,
            MergePolicy::DiscardNewer,
            &[(Attribute::Agility, 3)],
            0,
        );
        let mut set = EffectSet::new();
        let mut stats = Stats::new();

        set.apply_until(&strengthen, 2, Tick::ZERO, Tick(5_000), &mut stats)
            .unwrap();
        set.apply_until(&haste, 4, Tick::ZERO, Tick(9_000), &mut stats)
            .unwrap();
        assert_eq!(stats.value(Attribute::Strength), 10);
        assert_eq!(stats.value(Attribute::Agility), 12);

        assert_eq!(set.purge_expired(Tick(5_000), &mut stats), 1);
        assert_eq!(stats.value(Attribute::Strength), 0);
        assert_eq!(stats.value(Attribute::Agility), 12);
        assert_eq!(set.len(), 1);

        assert_eq!(set.purge_expired(Tick(9_000), &mut stats), 1);
        assert_eq!(stats.value(Attribute::Agility), 0);
        assert!(set.is_empty());
    }

    #[test]
    fn remove_dispels_an_active_effect() {
        let poison = static_definition(
            BuffKind::Poison,
            MergePolicy::DiscardNewer,
            &[(Attribute::Vigor, -4)],
            0,
        );
        let mut set = EffectSet::new();
        let mut stats = Stats::new();
        stats.insert(Attribute::Vigor, 50);

        set.apply_until(&poison, 3, Tick::ZERO, Tick(5_000), &mut stats)
            .unwrap();
        assert_eq!(stats.value(Attribute::Vigor), 38);

        assert!(set.remove(BuffKind::Poison, &mut stats));
        assert_eq!(stats.value(Attribute::Vigor), 50);
        assert!(!set.remove(BuffKind::Poison, &mut stats));
    }

    #[test]
    fn capacity_overflow_is_a_validation_error() {
        let mut set: EffectSet<Attribute, u16> = EffectSet::new();
        let mut stats = Stats::new();

        struct NumberedEffect(u16);
        impl crate::Effect<Attribute, u16> for NumberedEffect {
            fn kind(&self) -> u16 {
                self.0
            }
            fn merge_policy(&self) -> MergePolicy {
                MergePolicy::DiscardNewer
            }
            fn effect_time(&self, _power: u16) -> i32 {
                1_000
            }
            fn stat_modifier(&self, stat: Attribute, power: u16) -> Option<i32> {
                (stat == Attribute::Luck).then_some(i32::from(power))
            }
        }

        for kind in 0..EffectConfig::MAX_ACTIVE_EFFECTS as u16 {
            let definition = Arc::new(EffectDefinition::new(Box::new(NumberedEffect(kind))));
            set.apply(&definition, 1, Tick::ZERO, &mut stats).unwrap();
        }

        let one_too_many = Arc::new(EffectDefinition::new(Box::new(NumberedEffect(u16::MAX))));
        let err = set
            .apply(&one_too_many, 1, Tick::ZERO, &mut stats)
            .unwrap_err();
        assert_eq!(
            err,
            EffectError::EffectListFull {
                max: EffectConfig::MAX_ACTIVE_EFFECTS,
                current: EffectConfig::MAX_ACTIVE_EFFECTS,
            }
        );
    }
}
