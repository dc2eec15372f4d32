//! Spacing validation for claim creation and growth.
//!
//! [`SpacingValidator`] answers "how large may a circle get here"
//! against two rules: a minimum distance from the dimension's world
//! spawn, and a per-pair buffer between claim edges. Conflicts come
//! back as structured [`Conflict`] records so callers can explain
//! exactly which neighbors stopped growth.

use stead_claims::{Claim, ClaimStore, SettingsView, SpacingRules};
use stead_core::{identity, Dimension};
use stead_space::geom;

/// Radius stepping increment for feasibility scans.
pub const RADIUS_STEP: u32 = 50;

/// One neighbor that blocks a proposed circle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conflict {
    /// The neighbor's owner, display form.
    pub owner: String,
    /// Neighbor center x.
    pub center_x: i32,
    /// Neighbor center z.
    pub center_z: i32,
    /// The dimension both circles live in.
    pub dimension: Dimension,
}

/// Feasibility checks for proposed claim circles.
#[derive(Clone, Copy, Debug)]
pub struct SpacingValidator<'a> {
    store: &'a ClaimStore,
    settings: &'a SettingsView,
}

impl<'a> SpacingValidator<'a> {
    /// Bind the validator to a store and settings snapshot.
    pub fn new(store: &'a ClaimStore, settings: &'a SettingsView) -> Self {
        Self { store, settings }
    }

    /// The spacing rules currently in force.
    pub fn rules(&self) -> SpacingRules {
        self.settings.spacing_rules()
    }

    /// Whether a circle of `radius` at `(x, z)` sits too close to the
    /// dimension's world spawn.
    ///
    /// Blocked iff `distance < radius + spawnBuffer`, so the boundary
    /// itself is allowed. Dimensions with no configured spawn never
    /// block.
    pub fn spawn_blocked(&self, dimension: Dimension, x: i32, z: i32, radius: u32) -> bool {
        let Some((sx, sz)) = self.settings.spawn_center(dimension) else {
            return false;
        };
        let needed = f64::from(radius) + f64::from(self.rules().spawn_buffer);
        geom::center_distance(x, z, sx, sz) < needed
    }

    /// All neighbors conflicting with a circle of `radius` at
    /// `(x, z)`, deduplicated by owner and center.
    ///
    /// A neighbor conflicts iff
    /// `distance < radius + otherRadius + max(ownBuffer, otherBuffer)`
    /// strictly; equality is not a conflict. The prospective owner's
    /// own claims never conflict, and `ignore_center` excludes one
    /// center from the scan so a claim can test its own growth.
    pub fn conflicts_with(
        &self,
        owner: &str,
        dimension: Dimension,
        x: i32,
        z: i32,
        radius: u32,
        own_buffer: u32,
        ignore_center: Option<(i32, i32)>,
    ) -> Vec<Conflict> {
        let mut out: Vec<Conflict> = Vec::new();
        let mut seen: Vec<(String, i32, i32)> = Vec::new();
        for (other_owner, other) in self.store.all_claims() {
            if other.dimension != dimension {
                continue;
            }
            if ignore_center == Some((other.x, other.z)) {
                continue;
            }
            if identity::same(other_owner, owner) {
                continue;
            }
            let needed =
                f64::from(radius) + f64::from(other.radius) + f64::from(own_buffer.max(other.buffer()));
            if other.center_distance(x, z) < needed {
                let key = (identity::fold(other_owner), other.x, other.z);
                if !seen.contains(&key) {
                    seen.push(key);
                    out.push(Conflict {
                        owner: other_owner.to_owned(),
                        center_x: other.x,
                        center_z: other.z,
                        dimension,
                    });
                }
            }
        }
        out
    }

    /// The largest radius a new claim could take at `(x, z)`, stepping
    /// by [`RADIUS_STEP`] up to `admin_cap`.
    ///
    /// Returns 0 the moment any step is spawn-blocked: a new claim is
    /// refused outright where growth within the cap would reach the
    /// spawn buffer. Otherwise the scan stops at the first step with
    /// conflicts and returns the last clean step.
    pub fn max_feasible_new_radius(
        &self,
        owner: &str,
        dimension: Dimension,
        x: i32,
        z: i32,
        admin_cap: u32,
    ) -> u32 {
        let own_buffer = self.rules().buffer;
        let mut best = 0;
        let mut radius = RADIUS_STEP;
        while radius <= admin_cap {
            if self.spawn_blocked(dimension, x, z, radius) {
                return 0;
            }
            if !self
                .conflicts_with(owner, dimension, x, z, radius, own_buffer, None)
                .is_empty()
            {
                break;
            }
            best = radius;
            radius += RADIUS_STEP;
        }
        best
    }

    /// The largest radius an existing claim could grow to in place.
    ///
    /// Starts from the claim's current radius and proposes
    /// [`RADIUS_STEP`] increments, stopping at `rules_cap`, the spawn
    /// buffer, or the first conflicting neighbor. The claim's own
    /// center is excluded from the scan. Never returns less than the
    /// current radius.
    pub fn max_feasible_resize(&self, owner: &str, claim: &Claim, rules_cap: u32) -> u32 {
        let mut best = claim.radius;
        loop {
            let candidate = best + RADIUS_STEP;
            if candidate > rules_cap {
                break;
            }
            if self.spawn_blocked(claim.dimension, claim.x, claim.z, candidate) {
                break;
            }
            let offenders = self.conflicts_with(
                owner,
                claim.dimension,
                claim.x,
                claim.z,
                candidate,
                claim.buffer(),
                Some((claim.x, claim.z)),
            );
            if !offenders.is_empty() {
                break;
            }
            best = candidate;
        }
        best
    }
}
