//! Registry construction and verification for the status-effect engine.
//!
//! `effect-runtime` hosts everything that happens once, at startup, before
//! gameplay logic runs: assembling the [`EffectRegistry`] from the explicit
//! registration table and (in debug builds) verifying each definition's
//! purity contract. The deterministic per-tick machinery lives in
//! `effect-core` and stays free of logging; this crate owns the tracing
//! instrumentation around discovery.

pub mod registry;
pub mod verify;

pub use registry::{EffectRegistry, EffectRegistryBuilder, RegistryError};
