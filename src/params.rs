use crate::address::Address;

/// Read-only collaborator carrying the simulation-wide constants the
/// engine needs, mirroring the teacher's `SwimConfig` (one struct, a
/// `Default` impl, plumbed in at construction rather than read from
/// process-wide state).
#[derive(Debug, Clone, Copy)]
pub struct Params {
    /// Direct-probe timeout before escalating to indirect probing.
    pub t_fail: i32,
    /// Round length / indirect-probe timeout before declaring failure.
    pub t_remove: i32,
    /// The well-known address used for bootstrap.
    pub introducer: Address,
    /// Seed for the membership-list shuffle RNG (Design Note: plumbed
    /// through construction instead of reseeding a global generator from
    /// wall-clock time every round, which would destroy determinism).
    pub shuffle_seed: u64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            t_fail: 4,
            t_remove: 20,
            introducer: Address::INTRODUCER,
            shuffle_seed: 0,
        }
    }
}
