//! Consistency checks for effect definitions.
//!
//! The merge algorithm and the add/subtract round trip both assume a
//! definition's modifier and duration functions are pure in `power`. A
//! definition that violates that corrupts the stat ledger slowly and
//! silently, so the check rejects it before it can enter the registry.
//!
//! The registry runs this under `cfg(debug_assertions)` as a development
//! gate; the primary correctness gate is the test suite, which calls
//! [`check_definition`] directly with a seeded generator.

use rand::Rng;
use strum::IntoEnumIterator;

use effect_core::{DefinitionError, EffectDefinition, EffectKind, StatKind};

/// Random powers sampled per definition, in addition to the fixed
/// endpoints 0 and `u16::MAX`. Every sampled power is evaluated twice.
const RANDOM_SAMPLES: usize = 8;

/// Verifies a definition's purity contract.
///
/// Checks, at power 0, `u16::MAX`, and [`RANDOM_SAMPLES`] random powers:
/// - `effect_time` returns the same duration on repeated evaluation
/// - `stat_modifier` returns the same value on repeated evaluation, for
///   every stat kind
/// - stats outside the declared modified set never produce a modifier
pub fn check_definition<S, E, R>(
    definition: &EffectDefinition<S, E>,
    rng: &mut R,
) -> Result<(), DefinitionError<S, E>>
where
    S: StatKind,
    E: EffectKind,
    R: Rng + ?Sized,
{
    let mut powers: Vec<u16> = Vec::with_capacity(RANDOM_SAMPLES + 2);
    powers.push(0);
    powers.push(u16::MAX);
    powers.extend((0..RANDOM_SAMPLES).map(|_| rng.gen_range(1..u16::MAX)));

    let kind = definition.kind();

    for &power in &powers {
        let first = definition.effect_time(power);
        let second = definition.effect_time(power);
        if first != second {
            return Err(DefinitionError::InconsistentDuration {
                kind,
                power,
                first,
                second,
            });
        }
    }

    for stat in S::iter() {
        let declared = definition.modifies(stat);
        for &power in &powers {
            let first = definition.stat_modifier(stat, power);
            let second = definition.stat_modifier(stat, power);
            if first != second {
                return Err(DefinitionError::InconsistentModifier {
                    kind,
                    stat,
                    power,
                    first,
                    second,
                });
            }
            if !declared {
                if let Some(value) = first {
                    return Err(DefinitionError::PhantomModifier {
                        kind,
                        stat,
                        power,
                        value,
                    });
                }
            }
        }
    }

    Ok(())
}
