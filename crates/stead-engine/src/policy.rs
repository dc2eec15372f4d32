//! Ownership resolution and action authorization.
//!
//! [`PolicyEngine`] borrows one consistent snapshot of the claim
//! store, the merged settings, and a built [`ClaimIndex`], and answers
//! the two questions every host event handler asks: who owns this
//! point, and may this actor do that here.
//!
//! Ownership prefers the grid-accelerated path. When the borrowed
//! index was built against a different store version the engine
//! silently degrades to the linear scan, which returns identical
//! results on any claim set.

use stead_claims::{Claim, ClaimStore, SettingsView};
use stead_core::{identity, ActionKind, Dimension};

use crate::cache::ClaimIndex;

/// A resolved ownership hit: the claim covering a point and its owner.
#[derive(Clone, Copy, Debug)]
pub struct Ownership<'a> {
    /// Owner display name as stored.
    pub owner: &'a str,
    /// The covering claim.
    pub claim: &'a Claim,
}

/// Point-ownership and authorization queries over one snapshot.
#[derive(Clone, Copy, Debug)]
pub struct PolicyEngine<'a> {
    store: &'a ClaimStore,
    settings: &'a SettingsView,
    index: &'a ClaimIndex,
}

impl<'a> PolicyEngine<'a> {
    /// Bind the engine to a store, settings, and index snapshot.
    pub fn new(store: &'a ClaimStore, settings: &'a SettingsView, index: &'a ClaimIndex) -> Self {
        Self {
            store,
            settings,
            index,
        }
    }

    /// The claim covering `(x, z)` in `dimension`, if any.
    ///
    /// Among overlapping claims the one whose center is nearest to the
    /// point wins; exact distance ties order on the folded owner name
    /// and then the claim id, so the result never depends on insertion
    /// order.
    pub fn owner_at(&self, dimension: Dimension, x: i32, z: i32) -> Option<Ownership<'a>> {
        if self.index.version() != self.store.version() {
            return self.owner_at_linear(dimension, x, z);
        }
        let hits = self
            .index
            .candidates_near(dimension, x, z)
            .into_iter()
            .filter_map(|entry| {
                let claim = self.store.get(&entry.owner, &entry.id)?;
                claim.contains(dimension, x, z).then_some(Ownership {
                    owner: entry.owner.as_str(),
                    claim,
                })
            });
        nearest(hits, x, z)
    }

    /// Ownership by full scan over the store, bypassing the grid.
    ///
    /// Applies the same containment and tie-break rules as
    /// [`owner_at`](Self::owner_at) and must agree with it whenever
    /// the index matches the store version.
    pub fn owner_at_linear(&self, dimension: Dimension, x: i32, z: i32) -> Option<Ownership<'a>> {
        let hits = self
            .store
            .all_claims()
            .filter(|(_, claim)| claim.contains(dimension, x, z))
            .map(|(owner, claim)| Ownership { owner, claim });
        nearest(hits, x, z)
    }

    /// Whether `acting` bypasses the claim's flags entirely.
    pub fn is_trusted(&self, acting: &str, owner: &str, claim: &Claim) -> bool {
        is_trusted(self.settings, acting, owner, claim)
    }

    /// Whether `acting` may manage the claim's mates and flags.
    pub fn can_manage(&self, acting: &str, owner: &str, claim: &Claim) -> bool {
        can_manage(acting, owner, claim)
    }

    /// Whether `acting` may perform `action` at `(x, y, z)`.
    ///
    /// Inside a claim the decision is trust or the claim's resolved
    /// flag. Outside any claim, free-build areas allow everything,
    /// then the spawn overlay applies with an admin bypass, and
    /// unrestricted ground defaults to allowed.
    pub fn can_act(
        &self,
        acting: &str,
        dimension: Dimension,
        x: i32,
        y: i32,
        z: i32,
        action: ActionKind,
    ) -> bool {
        if let Some(hit) = self.owner_at(dimension, x, z) {
            if self.is_trusted(acting, hit.owner, hit.claim) {
                return true;
            }
            return hit.claim.resolved_flags().allows(action);
        }
        if self
            .settings
            .free_areas(dimension)
            .iter()
            .any(|area| area.bounds.contains(x, y, z))
        {
            return true;
        }
        if self.settings.is_admin(acting) {
            return true;
        }
        let overlay = self.settings.spawn_overlay(dimension);
        if !overlay.contains(x, z) {
            return true;
        }
        !overlay.blocks(action)
    }
}

/// Whether `acting` bypasses a claim's flags entirely.
///
/// Admins, the owner, and mates at any rank are trusted. All
/// comparisons fold case.
pub fn is_trusted(settings: &SettingsView, acting: &str, owner: &str, claim: &Claim) -> bool {
    settings.is_admin(acting) || identity::same(acting, owner) || claim.mates.contains(acting)
}

/// Whether `acting` may manage a claim's mates and flags.
///
/// Stricter than [`is_trusted`]: only the owner and manager-rank
/// mates qualify. Admin bypass for management is the host's call,
/// made at its own command surfaces.
pub fn can_manage(acting: &str, owner: &str, claim: &Claim) -> bool {
    identity::same(acting, owner) || claim.mates.is_manager(acting)
}

/// Nearest-center selection with the deterministic tie-break.
fn nearest<'a>(
    hits: impl Iterator<Item = Ownership<'a>>,
    x: i32,
    z: i32,
) -> Option<Ownership<'a>> {
    let mut best: Option<(f64, String, Ownership<'a>)> = None;
    for hit in hits {
        let distance = hit.claim.center_distance(x, z);
        let key = identity::fold(hit.owner);
        let replace = match &best {
            None => true,
            Some((best_distance, best_key, best_hit)) => {
                distance < *best_distance
                    || (distance == *best_distance
                        && (key.as_str(), &hit.claim.id) < (best_key.as_str(), &best_hit.claim.id))
            }
        };
        if replace {
            best = Some((distance, key, hit));
        }
    }
    best.map(|(_, _, hit)| hit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stead_claims::DEFAULT_BUFFER_RULE;
    use stead_core::ClaimId;

    fn index_for(store: &ClaimStore) -> ClaimIndex {
        ClaimIndex::build(store, 64)
    }

    fn no_settings() -> SettingsView {
        SettingsView::new()
    }

    // ── Ownership resolution ────────────────────────────────────────

    #[test]
    fn nearest_center_wins_regardless_of_insertion_order() {
        for flipped in [false, true] {
            let mut store = ClaimStore::new();
            let (first, second) = if flipped {
                (("bob", 30), ("alice", 0))
            } else {
                (("alice", 0), ("bob", 30))
            };
            store.create_claim(first.0, first.1, 64, 0, 100, Dimension::Overworld, 200);
            store.create_claim(second.0, second.1, 64, 0, 100, Dimension::Overworld, 200);

            let settings = no_settings();
            let index = index_for(&store);
            let policy = PolicyEngine::new(&store, &settings, &index);

            let hit = policy.owner_at(Dimension::Overworld, 40, 0).unwrap();
            assert_eq!(hit.owner, "bob");
        }
    }

    #[test]
    fn exact_distance_tie_orders_on_owner_then_id() {
        for flipped in [false, true] {
            let mut store = ClaimStore::new();
            let (first, second) = if flipped { ("carol", "bob") } else { ("bob", "carol") };
            store.create_claim(first, -50, 64, 0, 100, Dimension::Overworld, 200);
            store.create_claim(second, 50, 64, 0, 100, Dimension::Overworld, 200);

            let settings = no_settings();
            let index = index_for(&store);
            let policy = PolicyEngine::new(&store, &settings, &index);

            // (0, 0) is exactly 50 blocks from both centers.
            let hit = policy.owner_at(Dimension::Overworld, 0, 0).unwrap();
            assert_eq!(hit.owner, "bob");
        }
    }

    #[test]
    fn ownership_is_dimension_filtered() {
        let mut store = ClaimStore::new();
        store.create_claim("alice", 0, 64, 0, 100, Dimension::Nether, 200);

        let settings = no_settings();
        let index = index_for(&store);
        let policy = PolicyEngine::new(&store, &settings, &index);

        assert!(policy.owner_at(Dimension::Nether, 10, 10).is_some());
        assert!(policy.owner_at(Dimension::Overworld, 10, 10).is_none());
    }

    #[test]
    fn containment_boundary_is_inclusive() {
        let mut store = ClaimStore::new();
        store.create_claim("alice", 0, 64, 0, 100, Dimension::Overworld, 200);

        let settings = no_settings();
        let index = index_for(&store);
        let policy = PolicyEngine::new(&store, &settings, &index);

        assert!(policy.owner_at(Dimension::Overworld, 100, 0).is_some());
        assert!(policy.owner_at(Dimension::Overworld, 101, 0).is_none());
    }

    #[test]
    fn stale_index_degrades_to_linear_scan() {
        let mut store = ClaimStore::new();
        store.create_claim("alice", 0, 64, 0, 100, Dimension::Overworld, 200);
        let index = index_for(&store);

        // Mutate past the index's version; the grid no longer knows bob.
        store.create_claim("bob", 5000, 64, 0, 100, Dimension::Overworld, 200);

        let settings = no_settings();
        let policy = PolicyEngine::new(&store, &settings, &index);
        let hit = policy.owner_at(Dimension::Overworld, 5000, 0).unwrap();
        assert_eq!(hit.owner, "bob");
    }

    // ── Trust ───────────────────────────────────────────────────────

    #[test]
    fn trust_covers_admin_owner_and_any_rank_mate() {
        let mut store = ClaimStore::new();
        let id = store.create_claim("alice", 0, 64, 0, 100, Dimension::Overworld, 200);
        store.add_mate("alice", &id, "Carol", stead_claims::MateRank::Member);
        let claim = store.get("alice", &id).unwrap().clone();

        let settings = SettingsView::from_layers([&json!({ "admins": ["Root"] })]);
        let index = index_for(&store);
        let policy = PolicyEngine::new(&store, &settings, &index);

        assert!(policy.is_trusted("ALICE", "alice", &claim));
        assert!(policy.is_trusted("carol", "alice", &claim));
        assert!(policy.is_trusted("root", "alice", &claim));
        assert!(!policy.is_trusted("mallory", "alice", &claim));
    }

    #[test]
    fn management_needs_owner_or_manager_rank() {
        let mut store = ClaimStore::new();
        let id = store.create_claim("alice", 0, 64, 0, 100, Dimension::Overworld, 200);
        store.add_mate("alice", &id, "carol", stead_claims::MateRank::Member);
        store.add_mate("alice", &id, "dave", stead_claims::MateRank::Manager);
        let claim = store.get("alice", &id).unwrap().clone();

        let settings = SettingsView::from_layers([&json!({ "admins": ["Root"] })]);
        let index = index_for(&store);
        let policy = PolicyEngine::new(&store, &settings, &index);

        assert!(policy.can_manage("Alice", "alice", &claim));
        assert!(policy.can_manage("dave", "alice", &claim));
        assert!(!policy.can_manage("carol", "alice", &claim));
        assert!(!policy.can_manage("root", "alice", &claim));
    }

    // ── can_act inside claims ───────────────────────────────────────

    #[test]
    fn locked_claim_denies_strangers_but_not_trusted() {
        let mut store = ClaimStore::new();
        let id = store.create_claim("alice", 0, 64, 0, 100, Dimension::Overworld, 200);
        store.add_mate("alice", &id, "carol", stead_claims::MateRank::Member);

        let settings = SettingsView::from_layers([&json!({ "admins": ["root"] })]);
        let index = index_for(&store);
        let policy = PolicyEngine::new(&store, &settings, &index);

        for action in ActionKind::ALL {
            assert!(!policy.can_act("bob", Dimension::Overworld, 10, 64, 10, action));
            assert!(policy.can_act("alice", Dimension::Overworld, 10, 64, 10, action));
            assert!(policy.can_act("carol", Dimension::Overworld, 10, 64, 10, action));
            assert!(policy.can_act("root", Dimension::Overworld, 10, 64, 10, action));
        }
    }

    #[test]
    fn opened_flag_admits_strangers() {
        let mut store = ClaimStore::new();
        let id = store.create_claim("alice", 0, 64, 0, 100, Dimension::Overworld, 200);
        store.set_flags("alice", &id, Some(true), None, None);

        let settings = no_settings();
        let index = index_for(&store);
        let policy = PolicyEngine::new(&store, &settings, &index);

        assert!(policy.can_act("bob", Dimension::Overworld, 10, 64, 10, ActionKind::Build));
        assert!(!policy.can_act("bob", Dimension::Overworld, 10, 64, 10, ActionKind::Interact));
    }

    // ── can_act outside claims ──────────────────────────────────────

    #[test]
    fn wilderness_fails_open() {
        let store = ClaimStore::new();
        let settings = no_settings();
        let index = index_for(&store);
        let policy = PolicyEngine::new(&store, &settings, &index);

        for action in ActionKind::ALL {
            assert!(policy.can_act("bob", Dimension::Overworld, 9999, 64, 9999, action));
        }
    }

    #[test]
    fn spawn_security_blocks_inside_radius_only() {
        let store = ClaimStore::new();
        let settings = SettingsView::from_layers([&json!({
            "worldspawn": "0 64 0",
            "spawn_protection_radius": 100,
            "spawn_security_overworld_build": true,
        })]);
        let index = index_for(&store);
        let policy = PolicyEngine::new(&store, &settings, &index);

        assert!(!policy.can_act("bob", Dimension::Overworld, 10, 64, 10, ActionKind::Build));
        // Interact security not configured: open even inside spawn.
        assert!(policy.can_act("bob", Dimension::Overworld, 10, 64, 10, ActionKind::Interact));
        // Outside the radius the overlay does not apply.
        assert!(policy.can_act("bob", Dimension::Overworld, 200, 64, 0, ActionKind::Build));
    }

    #[test]
    fn admins_bypass_spawn_security() {
        let store = ClaimStore::new();
        let settings = SettingsView::from_layers([&json!({
            "worldspawn": "0 64 0",
            "spawn_protection_radius": 100,
            "spawn_security_overworld_build": true,
            "admins": ["Root"],
        })]);
        let index = index_for(&store);
        let policy = PolicyEngine::new(&store, &settings, &index);

        assert!(policy.can_act("root", Dimension::Overworld, 10, 64, 10, ActionKind::Build));
    }

    #[test]
    fn free_area_overrides_spawn_security() {
        let store = ClaimStore::new();
        let settings = SettingsView::from_layers([&json!({
            "worldspawn": "0 64 0",
            "spawn_protection_radius": 100,
            "spawn_security_overworld_build": true,
            "spawn_free_areas": {
                "overworld": [{ "name": "market", "a": [0, -64, 0], "b": [20, 320, 20] }]
            },
        })]);
        let index = index_for(&store);
        let policy = PolicyEngine::new(&store, &settings, &index);

        assert!(policy.can_act("bob", Dimension::Overworld, 10, 64, 10, ActionKind::Build));
        // Outside the box the spawn security still applies.
        assert!(!policy.can_act("bob", Dimension::Overworld, 50, 64, 50, ActionKind::Build));
    }

    #[test]
    fn free_area_is_a_3d_box() {
        let store = ClaimStore::new();
        let settings = SettingsView::from_layers([&json!({
            "worldspawn": "0 64 0",
            "spawn_protection_radius": 100,
            "spawn_security_overworld_build": true,
            "spawn_free_areas": {
                "overworld": [{ "a": [0, 60, 0], "b": [20, 70, 20] }]
            },
        })]);
        let index = index_for(&store);
        let policy = PolicyEngine::new(&store, &settings, &index);

        assert!(policy.can_act("bob", Dimension::Overworld, 10, 64, 10, ActionKind::Build));
        // Same column, below the box floor.
        assert!(!policy.can_act("bob", Dimension::Overworld, 10, 30, 10, ActionKind::Build));
    }

    // ── Grid and linear agreement ───────────────────────────────────

    #[test]
    fn grid_and_linear_paths_agree() {
        let mut store = ClaimStore::new();
        store.create_claim("alice", 0, 64, 0, 120, Dimension::Overworld, 200);
        store.create_claim("bob", 90, 64, 0, 100, Dimension::Overworld, 200);
        store.create_claim("carol", -400, 64, 300, 80, Dimension::Overworld, 200);

        let settings = no_settings();
        let index = index_for(&store);
        let policy = PolicyEngine::new(&store, &settings, &index);

        for (x, z) in [(0, 0), (95, 5), (-390, 290), (500, 500), (40, 0)] {
            let grid = policy.owner_at(Dimension::Overworld, x, z);
            let linear = policy.owner_at_linear(Dimension::Overworld, x, z);
            assert_eq!(
                grid.map(|h| (h.owner.to_owned(), h.claim.id.clone())),
                linear.map(|h| (h.owner.to_owned(), h.claim.id.clone())),
                "disagreement at ({x}, {z})"
            );
        }
    }

    #[test]
    fn owner_at_returns_resolvable_claim() {
        let mut store = ClaimStore::new();
        let id = store.create_claim("alice", 0, 64, 0, 100, Dimension::Overworld, 200);

        let settings = no_settings();
        let index = index_for(&store);
        let policy = PolicyEngine::new(&store, &settings, &index);

        let hit = policy.owner_at(Dimension::Overworld, 0, 0).unwrap();
        assert_eq!(hit.claim.id, ClaimId::new("base_1"));
        assert_eq!(hit.claim.id, id);
        assert_eq!(hit.claim.buffer(), DEFAULT_BUFFER_RULE);
    }
}
