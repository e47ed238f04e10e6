//! Active effect instances and the duplicate-application merge algorithm.
//!
//! An [`ActiveEffect`] is the mutable runtime record "effect kind X is
//! active at power P until tick T". Its bonuses are applied to an external
//! [`StatContainer`] when it becomes active and subtracted when the owner
//! removes it; in between, every duplicate application of the same kind is
//! routed through [`ActiveEffect::merge_with`] instead of creating a
//! second instance.
//!
//! # State Machine
//!
//! Two conceptual states: *Active* (bonuses applied) and *Removed*
//! (bonuses subtracted, instance dropped). All transitions within Active
//! are merge updates. Expiry is a passive time comparison - the subject's
//! owner observes `is_expired` and performs the terminal transition; the
//! engine never schedules its own removal.

use std::sync::Arc;

use crate::config::EffectConfig;
use crate::definition::EffectDefinition;
use crate::kind::{EffectKind, StatKind};
use crate::policy::MergePolicy;
use crate::stats::StatContainer;
use crate::time::Tick;

/// A live, time-bounded application of one effect definition on one subject.
#[derive(Clone, Debug)]
pub struct ActiveEffect<S: StatKind, E: EffectKind> {
    definition: Arc<EffectDefinition<S, E>>,
    power: u16,
    expires_at: Tick,
}

impl<S: StatKind, E: EffectKind> ActiveEffect<S, E> {
    /// Binds a definition to a subject at the given power and expiry.
    pub fn new(definition: Arc<EffectDefinition<S, E>>, power: u16, expires_at: Tick) -> Self {
        Self {
            definition,
            power,
            expires_at,
        }
    }

    /// The shared definition this instance was created from.
    pub fn definition(&self) -> &Arc<EffectDefinition<S, E>> {
        &self.definition
    }

    /// Identity of the underlying effect.
    pub fn kind(&self) -> E {
        self.definition.kind()
    }

    /// Current effect strength. Only `merge_with` changes this.
    pub fn power(&self) -> u16 {
        self.power
    }

    /// Tick at which the owner should remove this effect.
    pub fn expires_at(&self) -> Tick {
        self.expires_at
    }

    /// True once `now` has reached the expiry tick.
    pub fn is_expired(&self, now: Tick) -> bool {
        !self.expires_at.is_after(now)
    }

    /// Ticks until expiry, as modular unsigned arithmetic.
    ///
    /// Callers purge expired instances before querying; an already-expired
    /// instance wraps to a large value like any other stale timestamp.
    pub fn time_remaining(&self, now: Tick) -> u64 {
        self.expires_at.duration_since(now)
    }

    /// Adds this instance's bonuses to the subject's stat container.
    pub fn add_bonuses_to<C: StatContainer<S>>(&self, stats: &mut C) {
        for &stat in self.definition.modified_stats() {
            stats.add(stat, self.definition.modifier_or_zero(stat, self.power));
        }
    }

    /// Exact inverse of [`ActiveEffect::add_bonuses_to`].
    pub fn subtract_bonuses_from<C: StatContainer<S>>(&self, stats: &mut C) {
        for &stat in self.definition.modified_stats() {
            stats.subtract(stat, self.definition.modifier_or_zero(stat, self.power));
        }
    }

    /// Resolves a second application of the same effect kind against this
    /// instance, mutating power and expiry in place per the definition's
    /// [`MergePolicy`].
    ///
    /// Expiry selection ("later"/"earlier") compares remaining time from
    /// `now`, which is wraparound-safe and coincides with comparing the
    /// raw ticks whenever the counter has not wrapped between them.
    ///
    /// Returns whether the `(power, expiry)` pair actually changed, by
    /// before/after snapshot comparison. Callers use this to decide
    /// whether the stat delta must be re-applied.
    pub fn merge_with(&mut self, now: Tick, new_power: u16, new_expires_at: Tick) -> bool {
        let before = (self.power, self.expires_at);

        let remaining_existing = self.expires_at.duration_since(now);
        let remaining_incoming = new_expires_at.duration_since(now);
        let later = if remaining_incoming > remaining_existing {
            new_expires_at
        } else {
            self.expires_at
        };
        let earlier = if remaining_incoming < remaining_existing {
            new_expires_at
        } else {
            self.expires_at
        };

        match self.definition.merge_policy() {
            MergePolicy::DiscardNewer => {}

            MergePolicy::DiscardOlder => {
                self.power = new_power;
                self.expires_at = new_expires_at;
            }

            MergePolicy::DiscardWeakest | MergePolicy::UseLeastTimeAndPower => {
                self.power = self.power.min(new_power);
                self.expires_at = earlier;
            }

            MergePolicy::DiscardStrongest => {
                if self.power > new_power {
                    self.power = new_power;
                    self.expires_at = new_expires_at;
                }
            }

            MergePolicy::UseGreatestTimeAndPower => {
                self.power = self.power.max(new_power);
                self.expires_at = later;
            }

            MergePolicy::CombineTimeOnGreaterPower => {
                self.power = self.power.max(new_power);
                self.expires_at =
                    now.advanced_by(remaining_existing.wrapping_add(remaining_incoming));
            }

            MergePolicy::CombineTimeOnWeakerPower => {
                self.power = self.power.min(new_power);
                self.expires_at =
                    now.advanced_by(remaining_existing.wrapping_add(remaining_incoming));
            }

            MergePolicy::CombinePowerOnGreaterTime => {
                self.power = self.power.saturating_add(new_power);
                self.expires_at = later;
            }

            MergePolicy::CombinePowerOnLeastTime => {
                self.power = self.power.saturating_add(new_power);
                self.expires_at = earlier;
            }

            MergePolicy::DiscardWeakestUnlessNearExpiry => {
                if new_power == self.power {
                    self.expires_at = later;
                } else if self.power > new_power {
                    // Existing is stronger: yield only when it is about to
                    // run out and the incoming one lasts at least as long.
                    if remaining_existing < EffectConfig::NEAR_EXPIRY_WINDOW
                        && remaining_incoming >= remaining_existing
                    {
                        self.power = new_power;
                        self.expires_at = new_expires_at;
                    }
                } else {
                    // Incoming is stronger: take it only when the existing
                    // weak buff still has plenty of time left and the
                    // strong one is short-lived.
                    if remaining_existing >= EffectConfig::NEAR_EXPIRY_WINDOW
                        && remaining_incoming < EffectConfig::NEAR_EXPIRY_WINDOW
                    {
                        self.power = new_power;
                        self.expires_at = new_expires_at;
                    }
                }
            }
        }

        (self.power, self.expires_at) != before
    }
}
