/// Engine configuration constants and tunable parameters.
pub struct EffectConfig;

impl EffectConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of simultaneously active effects per subject.
    pub const MAX_ACTIVE_EFFECTS: usize = 16;

    // ===== fixed rule parameters =====
    /// Power used to probe which stats a definition modifies.
    pub const PROBE_POWER: u16 = 1;

    /// Remaining time (in ticks) under which an application counts as
    /// "about to expire" for `MergePolicy::DiscardWeakestUnlessNearExpiry`.
    pub const NEAR_EXPIRY_WINDOW: u64 = 30_000;
}
