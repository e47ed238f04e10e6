//! Common error infrastructure for the effect engine.
//!
//! Every error type in the engine implements [`EngineError`] so callers can
//! branch on severity and log a stable code without matching on variants.
//!
//! # Design Principles
//!
//! - **Type Safety**: each failure surface has its own error type
//! - **Rich Context**: errors carry the kind, stat, and values involved
//! - **Severity Classification**: errors are categorized for recovery
//!   strategies; configuration defects are fatal, capacity limits are not

use crate::kind::{EffectKind, StatKind};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative input.
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: effect list at capacity
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - configuration defect, the process should not continue.
    ///
    /// Examples: duplicate effect kind, nondeterministic definition
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a defect rather than bad input.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common interface implemented by all engine error types.
pub trait EngineError {
    /// Severity classification for recovery strategies.
    fn severity(&self) -> ErrorSeverity;

    /// Stable machine-readable code for logs and metrics.
    fn error_code(&self) -> &'static str;
}

/// Contract violations detected in an effect definition.
///
/// The merge algorithm assumes modifier and duration functions are pure in
/// `power`; a definition that breaks that silently corrupts the stat ledger
/// over time, so these are fatal at registry-construction time.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError<S: StatKind, E: EffectKind> {
    /// The modifier function returned different values for the same input.
    #[error(
        "Effect {kind:?} modifier for {stat:?} is nondeterministic at power {power} \
         ({first:?} vs {second:?})"
    )]
    InconsistentModifier {
        /// Effect kind being verified.
        kind: E,
        /// Stat whose modifier disagreed.
        stat: S,
        /// Power at which the disagreement was observed.
        power: u16,
        /// First evaluation.
        first: Option<i32>,
        /// Second evaluation.
        second: Option<i32>,
    },

    /// The duration function returned different values for the same power.
    #[error(
        "Effect {kind:?} duration is nondeterministic at power {power} ({first} vs {second})"
    )]
    InconsistentDuration {
        /// Effect kind being verified.
        kind: E,
        /// Power at which the disagreement was observed.
        power: u16,
        /// First evaluation.
        first: i32,
        /// Second evaluation.
        second: i32,
    },

    /// A stat outside the declared modified set produced a modifier.
    ///
    /// The modified set is derived once at construction; a stat that only
    /// responds at some powers would make add/subtract asymmetric.
    #[error(
        "Effect {kind:?} modifies undeclared stat {stat:?} at power {power} (value {value})"
    )]
    PhantomModifier {
        /// Effect kind being verified.
        kind: E,
        /// Stat outside the declared modified set.
        stat: S,
        /// Power at which a modifier appeared.
        power: u16,
        /// The unexpected modifier value.
        value: i32,
    },
}

impl<S: StatKind, E: EffectKind> EngineError for DefinitionError<S, E> {
    fn severity(&self) -> ErrorSeverity {
        // Every definition defect is a build-time programming error.
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        use DefinitionError::*;
        match self {
            InconsistentModifier { .. } => "DEFINITION_INCONSISTENT_MODIFIER",
            InconsistentDuration { .. } => "DEFINITION_INCONSISTENT_DURATION",
            PhantomModifier { .. } => "DEFINITION_PHANTOM_MODIFIER",
        }
    }
}

/// Errors from mutating a subject's active effect list.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EffectError {
    /// Effect list is full (max capacity reached).
    #[error("Active effect list is full (max: {max}, current: {current})")]
    EffectListFull {
        /// Maximum capacity.
        max: usize,
        /// Current count.
        current: usize,
    },
}

impl EngineError for EffectError {
    fn severity(&self) -> ErrorSeverity {
        use EffectError::*;
        match self {
            EffectListFull { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use EffectError::*;
        match self {
            EffectListFull { .. } => "EFFECT_LIST_FULL",
        }
    }
}
