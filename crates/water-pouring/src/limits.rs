//! Bounds on the configuration space.
//!
//! Container `i` can hold any of `capacity[i] + 1` volumes, so the search
//! visits at most the product of those counts. Large capacity lists make
//! that product explode; the solver refuses them up front instead of
//! running out of memory mid-search.

use crate::error::SolveError;
use crate::puzzle::Capacities;

/// Default ceiling on the number of reachable configurations
pub const DEFAULT_MAX_STATE_SPACE: u64 = 10_000_000;

/// Upper bound on the number of distinct configurations, saturating at `u64::MAX`
pub fn state_space_size(capacities: &Capacities) -> u64 {
    capacities
        .as_slice()
        .iter()
        .fold(1u64, |size, &capacity| {
            size.saturating_mul(u64::from(capacity) + 1)
        })
}

/// Fail if the configuration space is larger than `limit`; otherwise return its size
pub fn check_state_space(capacities: &Capacities, limit: u64) -> Result<u64, SolveError> {
    let size = state_space_size(capacities);
    if size > limit {
        return Err(SolveError::SearchSpaceTooLarge { size, limit });
    }
    Ok(size)
}
