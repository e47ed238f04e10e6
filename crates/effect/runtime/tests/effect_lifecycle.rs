//! End-to-end lifecycle: discovery, application, merge, expiry.

use std::collections::HashMap;

use effect_core::{ApplyOutcome, Effect, EffectSet, MergePolicy, StatContainer, Tick};
use effect_runtime::EffectRegistry;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
enum Attribute {
    Might,
    Swiftness,
    Guard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum BuffKind {
    Strengthen,
    Quickstep,
    Venom,
}

#[derive(Default)]
struct Strengthen;

impl Effect<Attribute, BuffKind> for Strengthen {
    fn kind(&self) -> BuffKind {
        BuffKind::Strengthen
    }

    fn merge_policy(&self) -> MergePolicy {
        MergePolicy::UseGreatestTimeAndPower
    }

    fn effect_time(&self, power: u16) -> i32 {
        5_000 + i32::from(power) * 500
    }

    fn stat_modifier(&self, stat: Attribute, power: u16) -> Option<i32> {
        (stat == Attribute::Might).then_some(i32::from(power) * 5)
    }
}

#[derive(Default)]
struct Quickstep;

impl Effect<Attribute, BuffKind> for Quickstep {
    fn kind(&self) -> BuffKind {
        BuffKind::Quickstep
    }

    fn merge_policy(&self) -> MergePolicy {
        MergePolicy::DiscardWeakestUnlessNearExpiry
    }

    fn effect_time(&self, _power: u16) -> i32 {
        20_000
    }

    fn stat_modifier(&self, stat: Attribute, power: u16) -> Option<i32> {
        (stat == Attribute::Swiftness).then_some(i32::from(power) * 2)
    }
}

#[derive(Default)]
struct Venom;

impl Effect<Attribute, BuffKind> for Venom {
    fn kind(&self) -> BuffKind {
        BuffKind::Venom
    }

    fn merge_policy(&self) -> MergePolicy {
        MergePolicy::CombinePowerOnGreaterTime
    }

    fn effect_time(&self, _power: u16) -> i32 {
        5_000
    }

    fn stat_modifier(&self, stat: Attribute, power: u16) -> Option<i32> {
        match stat {
            Attribute::Guard => Some(-2 * i32::from(power)),
            Attribute::Swiftness => Some(-i32::from(power)),
            _ => None,
        }
    }
}

fn registry() -> EffectRegistry<Attribute, BuffKind> {
    EffectRegistry::builder()
        .register::<Strengthen>()
        .register::<Quickstep>()
        .register::<Venom>()
        .build()
        .unwrap()
}

#[test]
fn apply_merge_and_expire_keep_the_stat_ledger_consistent() {
    let registry = registry();
    let strengthen = registry.get(BuffKind::Strengthen).unwrap();
    let venom = registry.get(BuffKind::Venom).unwrap();

    let mut effects = EffectSet::new();
    let mut stats: HashMap<Attribute, i32> = HashMap::new();
    stats.insert(Attribute::Might, 18);
    stats.insert(Attribute::Guard, 12);

    // First application of each kind adds its bonuses.
    let outcome = effects
        .apply_until(strengthen, 10, Tick::ZERO, Tick(5_000), &mut stats)
        .unwrap();
    assert_eq!(outcome, ApplyOutcome::Added);
    effects
        .apply_until(venom, 10, Tick::ZERO, Tick(5_000), &mut stats)
        .unwrap();
    assert_eq!(stats.value(Attribute::Might), 18 + 50);
    assert_eq!(stats.value(Attribute::Guard), 12 - 20);
    assert_eq!(stats.value(Attribute::Swiftness), -10);

    // A weaker, longer Strengthen keeps the higher power but extends the
    // expiry; the ledger does not move.
    let outcome = effects
        .apply_until(strengthen, 6, Tick::ZERO, Tick(9_000), &mut stats)
        .unwrap();
    assert_eq!(outcome, ApplyOutcome::Merged { changed: true });
    assert_eq!(effects.expires_at(BuffKind::Strengthen, Tick::ZERO), Some(Tick(9_000)));
    assert_eq!(stats.value(Attribute::Might), 18 + 50);

    // A second Venom dose stacks power and takes the later expiry.
    effects
        .apply_until(venom, 6, Tick::ZERO, Tick(9_000), &mut stats)
        .unwrap();
    let venom_instance = effects.get(BuffKind::Venom).unwrap();
    assert_eq!(venom_instance.power(), 16);
    assert_eq!(venom_instance.expires_at(), Tick(9_000));
    assert_eq!(stats.value(Attribute::Guard), 12 - 32);
    assert_eq!(stats.value(Attribute::Swiftness), -16);

    // Nothing expires before the common expiry tick.
    assert_eq!(effects.purge_expired(Tick(8_999), &mut stats), 0);
    assert_eq!(effects.len(), 2);

    // At expiry both effects are removed and the ledger is restored.
    assert_eq!(effects.purge_expired(Tick(9_000), &mut stats), 2);
    assert!(effects.is_empty());
    assert_eq!(stats.value(Attribute::Might), 18);
    assert_eq!(stats.value(Attribute::Guard), 12);
    assert_eq!(stats.value(Attribute::Swiftness), 0);
}

#[test]
fn expiry_is_derived_from_the_definition_duration() {
    let registry = registry();
    let strengthen = registry.get(BuffKind::Strengthen).unwrap();

    let mut effects = EffectSet::new();
    let mut stats: HashMap<Attribute, i32> = HashMap::new();

    effects
        .apply(strengthen, 4, Tick(1_000), &mut stats)
        .unwrap();
    // 1_000 + (5_000 + 4 × 500)
    assert_eq!(
        effects.expires_at(BuffKind::Strengthen, Tick(1_000)),
        Some(Tick(8_000))
    );
}

#[test]
fn near_expiry_guard_plays_out_through_the_set() {
    let registry = registry();
    let quickstep = registry.get(BuffKind::Quickstep).unwrap();

    let mut effects = EffectSet::new();
    let mut stats: HashMap<Attribute, i32> = HashMap::new();

    // Strong application, 20s remaining: inside the near-expiry window.
    effects
        .apply_until(quickstep, 10, Tick::ZERO, Tick(20_000), &mut stats)
        .unwrap();
    assert_eq!(stats.value(Attribute::Swiftness), 20);

    // Weaker but at least as long: takes over.
    let outcome = effects
        .apply_until(quickstep, 5, Tick::ZERO, Tick(25_000), &mut stats)
        .unwrap();
    assert_eq!(outcome, ApplyOutcome::Merged { changed: true });
    let instance = effects.get(BuffKind::Quickstep).unwrap();
    assert_eq!((instance.power(), instance.expires_at()), (5, Tick(25_000)));
    assert_eq!(stats.value(Attribute::Swiftness), 10);

    // A stronger application only displaces a weak buff that has plenty
    // of time left; this one is itself near expiry, so it is kept.
    let outcome = effects
        .apply_until(quickstep, 9, Tick::ZERO, Tick(24_000), &mut stats)
        .unwrap();
    assert_eq!(outcome, ApplyOutcome::Merged { changed: false });
    assert_eq!(stats.value(Attribute::Swiftness), 10);
}

#[test]
fn registry_reads_are_shareable_across_threads() {
    let registry = registry();
    let strengthen = registry.get(BuffKind::Strengthen).unwrap();

    // Post-construction the registry is read-only; concurrent lookups see
    // the same definition instance.
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let looked_up = registry.get(BuffKind::Strengthen).unwrap();
                assert!(std::sync::Arc::ptr_eq(looked_up, strengthen));
            });
        }
    });
}
