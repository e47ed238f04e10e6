//! Identifier sets supplied by the embedding game.
//!
//! The engine is generic over two closed, finite identifier sets: the stats
//! an effect can modify and the effect kinds themselves. Both are expected
//! to be fieldless `Copy` enums on the embedding side; `StatKind`
//! additionally requires [`strum::IntoEnumIterator`] so definition
//! construction can probe every stat exactly once.

use std::fmt;
use std::hash::Hash;

use strum::IntoEnumIterator;

/// Bounds for the stat identifier set.
///
/// Implemented automatically for any type satisfying the bounds; embedding
/// applications derive `strum::EnumIter` on their stat enum and get this
/// for free.
pub trait StatKind:
    Copy + Eq + Ord + Hash + fmt::Debug + IntoEnumIterator + Send + Sync + 'static
{
}

impl<T> StatKind for T where
    T: Copy + Eq + Ord + Hash + fmt::Debug + IntoEnumIterator + Send + Sync + 'static
{
}

/// Bounds for the effect identifier set.
///
/// Effect kinds are only used as lookup keys and log context, so iteration
/// is not required.
pub trait EffectKind: Copy + Eq + Ord + Hash + fmt::Debug + Send + Sync + 'static {}

impl<T> EffectKind for T where T: Copy + Eq + Ord + Hash + fmt::Debug + Send + Sync + 'static {}
