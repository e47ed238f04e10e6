//! Effect definition registry - discovery, instantiation, and lookup.
//!
//! The registry is the single authority mapping each effect kind to its one
//! definition instance. It is populated exactly once, at construction, from
//! an explicit registration table: game content registers every definition
//! type (or a custom factory) on the builder, `build()` instantiates each
//! factory exactly once, and the resulting index is read-only for the rest
//! of the process lifetime - safe for unsynchronized concurrent reads.
//!
//! A duplicate effect kind is a build-time defect, not a runtime condition:
//! `build()` logs it with full context and fails rather than silently
//! overwriting or skipping.

use std::any;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error};

use effect_core::{
    DefinitionError, Effect, EffectDefinition, EffectKind, EngineError, ErrorSeverity, StatKind,
};

type BoxedEffect<S, E> = Box<dyn Effect<S, E>>;

struct FactoryEntry<S: StatKind, E: EffectKind> {
    type_name: &'static str,
    construct: Box<dyn Fn() -> BoxedEffect<S, E>>,
}

/// Errors that occur while building the registry.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError<S: StatKind, E: EffectKind> {
    /// Two registered definitions declared the same effect kind.
    #[error("Duplicate effect kind {kind:?}: {second} conflicts with already-registered {first}")]
    DuplicateKind {
        /// The contested effect kind.
        kind: E,
        /// Implementation that registered the kind first.
        first: &'static str,
        /// Implementation whose registration was rejected.
        second: &'static str,
    },

    /// A definition failed its consistency check (debug builds only).
    #[error("Definition {type_name} for effect kind {kind:?} failed its consistency check")]
    InvalidDefinition {
        /// The defective definition's effect kind.
        kind: E,
        /// Implementation type that produced the defective definition.
        type_name: &'static str,
        /// The underlying contract violation.
        #[source]
        source: DefinitionError<S, E>,
    },
}

impl<S: StatKind, E: EffectKind> EngineError for RegistryError<S, E> {
    fn severity(&self) -> ErrorSeverity {
        // Both variants indicate a build-time configuration defect; the
        // process should not continue with a corrupted registry.
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        use RegistryError::*;
        match self {
            DuplicateKind { .. } => "REGISTRY_DUPLICATE_KIND",
            InvalidDefinition { .. } => "REGISTRY_INVALID_DEFINITION",
        }
    }
}

/// Registration table for effect definitions.
///
/// The explicit counterpart of reflection-style plugin discovery: every
/// definition type the build ships is listed here, and each registered
/// factory is invoked exactly once when the registry is built.
pub struct EffectRegistryBuilder<S: StatKind, E: EffectKind> {
    factories: Vec<FactoryEntry<S, E>>,
}

impl<S: StatKind, E: EffectKind> EffectRegistryBuilder<S, E> {
    /// Creates an empty registration table.
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// Registers a definition type constructible with no arguments.
    pub fn register<D>(mut self) -> Self
    where
        D: Effect<S, E> + Default + 'static,
    {
        self.factories.push(FactoryEntry {
            type_name: any::type_name::<D>(),
            construct: Box::new(|| Box::new(D::default()) as BoxedEffect<S, E>),
        });
        self
    }

    /// Registers a definition built by a custom factory.
    ///
    /// The factory runs exactly once, at [`EffectRegistryBuilder::build`].
    pub fn register_with<D, F>(mut self, factory: F) -> Self
    where
        D: Effect<S, E> + 'static,
        F: Fn() -> D + 'static,
    {
        self.factories.push(FactoryEntry {
            type_name: any::type_name::<D>(),
            construct: Box::new(move || Box::new(factory()) as BoxedEffect<S, E>),
        });
        self
    }

    /// Number of registrations recorded so far.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// True when nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Instantiates every registered factory and builds the index.
    ///
    /// In debug builds each definition also runs the consistency check in
    /// [`crate::verify`] before it is admitted; a nondeterministic
    /// definition must never enter the registry, because the merge
    /// algorithm assumes referential transparency.
    pub fn build(self) -> Result<EffectRegistry<S, E>, RegistryError<S, E>> {
        let mut by_kind = HashMap::with_capacity(self.factories.len());
        let mut registered_by: HashMap<E, &'static str> =
            HashMap::with_capacity(self.factories.len());

        #[cfg(debug_assertions)]
        let mut rng = rand::thread_rng();

        for entry in self.factories {
            let definition = EffectDefinition::new((entry.construct)());
            let kind = definition.kind();

            if let Some(&first) = registered_by.get(&kind) {
                error!(
                    target: "effect_runtime::registry",
                    kind = ?kind,
                    first,
                    second = entry.type_name,
                    "Duplicate effect kind during registry discovery"
                );
                return Err(RegistryError::DuplicateKind {
                    kind,
                    first,
                    second: entry.type_name,
                });
            }

            #[cfg(debug_assertions)]
            if let Err(source) = crate::verify::check_definition(&definition, &mut rng) {
                error!(
                    target: "effect_runtime::registry",
                    kind = ?kind,
                    implementation = entry.type_name,
                    error = ?source,
                    "Effect definition failed its consistency check"
                );
                return Err(RegistryError::InvalidDefinition {
                    kind,
                    type_name: entry.type_name,
                    source,
                });
            }

            debug!(
                target: "effect_runtime::registry",
                kind = ?kind,
                implementation = entry.type_name,
                policy = %definition.merge_policy(),
                modified_stats = definition.modified_stats().len(),
                "Registered effect definition"
            );
            registered_by.insert(kind, entry.type_name);
            by_kind.insert(kind, Arc::new(definition));
        }

        Ok(EffectRegistry { by_kind })
    }
}

impl<S: StatKind, E: EffectKind> Default for EffectRegistryBuilder<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only index of every effect definition in the running program.
#[derive(Debug)]
pub struct EffectRegistry<S: StatKind, E: EffectKind> {
    by_kind: HashMap<E, Arc<EffectDefinition<S, E>>>,
}

impl<S: StatKind, E: EffectKind> EffectRegistry<S, E> {
    /// Starts an empty registration table.
    pub fn builder() -> EffectRegistryBuilder<S, E> {
        EffectRegistryBuilder::new()
    }

    /// O(1) lookup by effect kind.
    ///
    /// Absence is not an error - a kind may simply not be registered in
    /// this build; callers must branch on `None`.
    pub fn get(&self, kind: E) -> Option<&Arc<EffectDefinition<S, E>>> {
        self.by_kind.get(&kind)
    }

    /// Number of registered definitions.
    pub fn len(&self) -> usize {
        self.by_kind.len()
    }

    /// True when no definitions are registered.
    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }

    /// Iterator over registered effect kinds (for debugging).
    pub fn kinds(&self) -> impl Iterator<Item = E> + '_ {
        self.by_kind.keys().copied()
    }

    /// Iterator over registered definitions.
    pub fn definitions(&self) -> impl Iterator<Item = &Arc<EffectDefinition<S, E>>> {
        self.by_kind.values()
    }
}
