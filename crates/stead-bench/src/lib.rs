//! Benchmark layouts and utilities for the Stead claim engine.
//!
//! Provides deterministic claim layouts for benchmarking:
//!
//! - [`scattered_store`]: seeded random claims spread over a square extent
//! - [`query_points`]: seeded random probe coordinates over the same extent

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::{RngExt, SeedableRng};
use rand_chacha::ChaCha8Rng;
use stead_claims::{ClaimStore, DEFAULT_BUFFER_RULE};
use stead_core::Dimension;

/// Number of distinct owners claims are distributed across.
pub const OWNER_POOL: usize = 32;

/// Build a store with `count` seeded random claims in the overworld.
///
/// Claim centers land uniformly in `[-extent, extent]` on both axes,
/// radii are multiples of 50 between 50 and 500, and ownership cycles
/// through a pool of [`OWNER_POOL`] names. Claims may overlap; the
/// layouts exercise query paths, not spacing admission.
pub fn scattered_store(seed: u64, count: usize, extent: i32) -> ClaimStore {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut store = ClaimStore::new();
    for i in 0..count {
        let owner = format!("settler_{}", i % OWNER_POOL);
        let x = rng.random_range(-extent..=extent);
        let z = rng.random_range(-extent..=extent);
        let radius = 50 * rng.random_range(1..=10u32);
        store.create_claim(
            &owner,
            x,
            64,
            z,
            radius,
            Dimension::Overworld,
            DEFAULT_BUFFER_RULE,
        );
    }
    store
}

/// Generate `count` seeded random probe points in `[-extent, extent]`.
pub fn query_points(seed: u64, count: usize, extent: i32) -> Vec<(i32, i32)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            (
                rng.random_range(-extent..=extent),
                rng.random_range(-extent..=extent),
            )
        })
        .collect()
}
