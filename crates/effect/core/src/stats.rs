//! Boundary to the external stat ledger.
//!
//! The engine does not own a stat model; it only needs an indexable
//! key→value store it can read and compound-update. Arithmetic is wrapping
//! so that adding a bonus and subtracting it again is an exact no-op even
//! at the integer boundaries.

use std::collections::HashMap;

use crate::kind::StatKind;

/// External stat container an effect's bonuses are applied to.
pub trait StatContainer<S: StatKind> {
    /// Current value for a stat, zero when the stat was never touched.
    fn value(&self, stat: S) -> i32;

    /// Compound-add `amount` at `stat`.
    fn add(&mut self, stat: S, amount: i32);

    /// Compound-subtract `amount` at `stat`.
    ///
    /// Must be the exact inverse of [`StatContainer::add`] for the same
    /// amount.
    fn subtract(&mut self, stat: S, amount: i32) {
        self.add(stat, amount.wrapping_neg());
    }
}

impl<S: StatKind> StatContainer<S> for HashMap<S, i32> {
    fn value(&self, stat: S) -> i32 {
        self.get(&stat).copied().unwrap_or(0)
    }

    fn add(&mut self, stat: S, amount: i32) {
        let slot = self.entry(stat).or_insert(0);
        *slot = slot.wrapping_add(amount);
    }
}
