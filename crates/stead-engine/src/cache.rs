//! Spatial index cache with version-gated invalidation.
//!
//! [`IndexCache`] lazily builds a [`ClaimIndex`] on first use and
//! reuses it as long as the store's [`ClaimsVersion`] and the
//! configured cell size both match the stamped values; otherwise the
//! index is rebuilt transparently.
//!
//! The version check runs on every call, so a query can never observe
//! an index built for a different claim set. The settings read for the
//! cell size is the only work debounced by tick: within one host tick
//! the cached cell size is trusted, and a cell-size change in settings
//! takes effect on the next tick.

use stead_claims::{Claim, ClaimStore, SettingsView};
use stead_core::{ClaimId, ClaimsVersion, Dimension, TickId};
use stead_space::GridIndex;

/// Identifies one indexed claim: the owner's display name and the
/// claim id, resolvable back to the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexEntry {
    /// Owner display name as stored.
    pub owner: String,
    /// The claim's id within that owner's set.
    pub id: ClaimId,
}

/// An immutable grid index over one snapshot of the claim set.
///
/// Entry `i` of the entry list corresponds to footprint `i` of the
/// grid, so candidate indices from the grid resolve directly to
/// `(owner, claim id)` pairs.
#[derive(Clone, Debug)]
pub struct ClaimIndex {
    grid: GridIndex,
    entries: Vec<IndexEntry>,
    version: ClaimsVersion,
}

impl ClaimIndex {
    /// Build an index over the store's current claim set.
    pub fn build(store: &ClaimStore, cell: u32) -> Self {
        let mut entries = Vec::with_capacity(store.len());
        let mut footprints = Vec::with_capacity(store.len());
        for (owner, claim) in store.all_claims() {
            entries.push(IndexEntry {
                owner: owner.to_owned(),
                id: claim.id.clone(),
            });
            footprints.push(claim.footprint());
        }
        Self {
            grid: GridIndex::build(cell, footprints),
            entries,
            version: store.version(),
        }
    }

    /// The store version this index was built against.
    pub fn version(&self) -> ClaimsVersion {
        self.version
    }

    /// The clamped cell size the grid was built with.
    pub fn cell_size(&self) -> u32 {
        self.grid.cell_size()
    }

    /// Number of indexed claims.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose bounding squares reach the point's grid
    /// neighborhood. Candidates are bounding-box coarse; callers must
    /// confirm circle containment.
    pub fn candidates_near(&self, dimension: Dimension, x: i32, z: i32) -> Vec<&IndexEntry> {
        self.grid
            .candidates_near(dimension, x, z)
            .into_iter()
            .map(|i| &self.entries[i as usize])
            .collect()
    }

    /// Resolve a candidate entry back to its claim in the store.
    ///
    /// Returns `None` when the store has moved past this index's
    /// version and the claim is gone.
    pub fn resolve<'a>(&self, store: &'a ClaimStore, entry: &IndexEntry) -> Option<&'a Claim> {
        store.get(&entry.owner, &entry.id)
    }
}

/// Fingerprint of the inputs the cached index was built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct IndexFingerprint {
    version: ClaimsVersion,
    cell: u32,
}

/// Lazily maintained [`ClaimIndex`] with version and cell-size gating.
///
/// # Invalidation
///
/// The index is rebuilt when:
/// - No index has been built yet.
/// - The store's version differs from the stamped version.
/// - The configured cell size differs from the stamped cell size
///   (checked at most once per tick).
/// - [`invalidate`](Self::invalidate) is called explicitly.
#[derive(Clone, Debug, Default)]
pub struct IndexCache {
    cached: Option<CachedIndex>,
}

#[derive(Clone, Debug)]
struct CachedIndex {
    index: ClaimIndex,
    fingerprint: IndexFingerprint,
    tick: TickId,
}

impl IndexCache {
    /// An empty cache; the index builds on first use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current index, rebuilding if the store or configuration
    /// has moved on.
    ///
    /// `tick` gates the settings read: within one tick the previously
    /// read cell size is reused rather than consulting `settings`
    /// again. The version comparison against `store` always runs.
    pub fn get_or_build(
        &mut self,
        store: &ClaimStore,
        settings: &SettingsView,
        tick: TickId,
    ) -> &ClaimIndex {
        let cell = match &self.cached {
            Some(cached) if cached.tick == tick => cached.fingerprint.cell,
            _ => settings.cell_size(),
        };
        let fingerprint = IndexFingerprint {
            version: store.version(),
            cell,
        };

        let needs_rebuild = match &self.cached {
            None => true,
            Some(cached) => cached.fingerprint != fingerprint,
        };

        if needs_rebuild {
            self.cached = Some(CachedIndex {
                index: ClaimIndex::build(store, cell),
                fingerprint,
                tick,
            });
        } else if let Some(cached) = &mut self.cached {
            cached.tick = tick;
        }

        &self.cached.as_ref().unwrap().index
    }

    /// Whether an index is currently cached.
    pub fn is_built(&self) -> bool {
        self.cached.is_some()
    }

    /// The stamped version of the cached index, if any.
    pub fn cached_version(&self) -> Option<ClaimsVersion> {
        self.cached.as_ref().map(|c| c.index.version())
    }

    /// Drop the cached index, forcing a rebuild on next use.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
