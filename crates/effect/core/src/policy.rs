//! Merge policies for overlapping applications of the same effect kind.
//!
//! When a second application of an already-active effect arrives, the
//! definition's policy decides which power and expiry survive. Policies are
//! a closed set; content files refer to them by snake_case name and an
//! unknown name fails to parse, which is how a misconfigured policy is
//! caught at load time.

/// Resolution strategy applied by `ActiveEffect::merge_with`.
///
/// In the rules below `P`/`T` are the existing power and expiry, `p`/`t`
/// the incoming ones, and "remaining" is measured from the merge instant.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MergePolicy {
    /// Keep the existing application untouched.
    DiscardNewer,

    /// Replace with the incoming application.
    DiscardOlder,

    /// Keep the lower power and the earlier expiry.
    DiscardWeakest,

    /// If the existing application is stronger, replace it with the
    /// incoming one; otherwise keep the existing.
    DiscardStrongest,

    /// Keep the higher power and the later expiry.
    UseGreatestTimeAndPower,

    /// Keep the lower power and the earlier expiry.
    UseLeastTimeAndPower,

    /// Keep the higher power; remaining times add together.
    CombineTimeOnGreaterPower,

    /// Keep the lower power; remaining times add together.
    CombineTimeOnWeakerPower,

    /// Powers add together; keep the later expiry.
    CombinePowerOnGreaterTime,

    /// Powers add together; keep the earlier expiry.
    CombinePowerOnLeastTime,

    /// Keep the stronger application, except near expiry: a stronger buff
    /// about to run out yields to a weaker one that lasts at least as
    /// long, and a long-lived weak buff is not clobbered by a fleeting
    /// strong one. See `ActiveEffect::merge_with` for the exact windows.
    DiscardWeakestUnlessNearExpiry,
}

impl MergePolicy {
    /// True when the merge result is independent of which of two
    /// applications arrived first. Used by tests to exercise symmetry.
    pub fn is_commutative(self) -> bool {
        match self {
            MergePolicy::DiscardWeakest
            | MergePolicy::UseGreatestTimeAndPower
            | MergePolicy::UseLeastTimeAndPower
            | MergePolicy::CombineTimeOnGreaterPower
            | MergePolicy::CombineTimeOnWeakerPower
            | MergePolicy::CombinePowerOnGreaterTime
            | MergePolicy::CombinePowerOnLeastTime => true,

            MergePolicy::DiscardNewer
            | MergePolicy::DiscardOlder
            | MergePolicy::DiscardStrongest
            | MergePolicy::DiscardWeakestUnlessNearExpiry => false,
        }
    }
}
