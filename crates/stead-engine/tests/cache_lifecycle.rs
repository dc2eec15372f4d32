//! Index cache behavior across ticks, mutations, and settings swaps.
//!
//! The cache contract: claim mutations are visible to the very next
//! query regardless of tick, the settings read is debounced so a cell
//! size change waits for the next tick, and a policy engine handed a
//! stale index degrades to the linear scan with identical answers.

use serde_json::json;
use stead_claims::{ClaimStore, SettingsView};
use stead_core::{ActionKind, Dimension, TickId};
use stead_engine::{ClaimIndex, ClaimService, IndexCache, PolicyEngine};
use stead_test_utils::{row_of_claims, ManualClock};

// ── Debounce and version gate ───────────────────────────────────

#[test]
fn mutations_rebuild_within_the_same_tick() {
    let mut store = ClaimStore::new();
    let settings = SettingsView::new();
    let mut cache = IndexCache::new();

    let t0 = TickId(0);
    let before = cache.get_or_build(&store, &settings, t0).version();

    store.create_claim("alice", 0, 64, 0, 100, Dimension::Overworld, 200);
    let index = cache.get_or_build(&store, &settings, t0);
    assert!(index.version() > before);
    assert_eq!(index.len(), 1);
}

#[test]
fn cell_size_change_waits_for_the_next_tick() {
    let mut store = ClaimStore::new();
    row_of_claims(&mut store, "alice", 3, Dimension::Overworld);
    let small = SettingsView::from_layers([&json!({ "lc_index_cell_size": 32 })]);
    let large = SettingsView::from_layers([&json!({ "lc_index_cell_size": 128 })]);
    let mut cache = IndexCache::new();

    let t0 = TickId(0);
    assert_eq!(cache.get_or_build(&store, &small, t0).cell_size(), 32);

    // Same tick: the settings read is debounced, the old cell stays.
    assert_eq!(cache.get_or_build(&store, &large, t0).cell_size(), 32);

    // Next tick: the new cell size takes effect.
    let t1 = TickId(1);
    assert_eq!(cache.get_or_build(&store, &large, t1).cell_size(), 128);
}

#[test]
fn unchanged_state_reuses_the_index_across_ticks() {
    let mut store = ClaimStore::new();
    row_of_claims(&mut store, "alice", 2, Dimension::Overworld);
    let settings = SettingsView::new();
    let mut cache = IndexCache::new();

    let v0 = cache.get_or_build(&store, &settings, TickId(0)).version();
    for tick in 1..10 {
        let index = cache.get_or_build(&store, &settings, TickId(tick));
        assert_eq!(index.version(), v0);
        assert_eq!(index.len(), 2);
    }
}

// ── Stale index degradation ─────────────────────────────────────

#[test]
fn stale_index_answers_match_a_fresh_one() {
    let mut store = ClaimStore::new();
    row_of_claims(&mut store, "alice", 2, Dimension::Overworld);
    let settings = SettingsView::new();
    let stale = ClaimIndex::build(&store, 64);

    // Mutate after the build: add a claim and remove the first one.
    store.create_claim("bob", 500, 64, 500, 100, Dimension::Overworld, 200);
    let first = store.claims_of("alice").next().unwrap().id.clone();
    store.delete_claim("alice", &first);

    let fresh = ClaimIndex::build(&store, 64);
    let with_stale = PolicyEngine::new(&store, &settings, &stale);
    let with_fresh = PolicyEngine::new(&store, &settings, &fresh);

    for &(x, z) in &[(0, 0), (500, 500), (10_000, 0), (9_999_999, 0)] {
        let a = with_stale
            .owner_at(Dimension::Overworld, x, z)
            .map(|o| (o.owner.to_owned(), o.claim.id.clone()));
        let b = with_fresh
            .owner_at(Dimension::Overworld, x, z)
            .map(|o| (o.owner.to_owned(), o.claim.id.clone()));
        assert_eq!(a, b, "stale index diverged at ({x}, {z})");
    }
}

// ── Through the service ─────────────────────────────────────────

#[test]
fn settings_swap_invalidates_and_answers_stay_correct() {
    let clock = ManualClock::new();
    let mut service = ClaimService::new(SettingsView::new(), Box::new(clock.clone()));
    service
        .create_claim("alice", 0, 64, 0, 100, Dimension::Overworld)
        .unwrap();
    clock.advance();
    assert_eq!(
        service.owner_at(Dimension::Overworld, 50, 0).unwrap().owner,
        "alice"
    );

    // Swapping settings drops the cache; queries keep resolving and
    // pick up the new policy inputs immediately.
    service.set_settings(SettingsView::from_layers([&json!({
        "lc_index_cell_size": 256,
        "admins": ["root"],
    })]));
    assert_eq!(
        service.owner_at(Dimension::Overworld, 50, 0).unwrap().owner,
        "alice"
    );
    assert!(service.can_act("root", Dimension::Overworld, 50, 64, 0, ActionKind::Build));
}

#[test]
fn queries_on_an_empty_service_are_clean_misses() {
    let clock = ManualClock::new();
    let mut service = ClaimService::new(SettingsView::new(), Box::new(clock));
    assert!(service.owner_at(Dimension::Overworld, 0, 0).is_none());
    assert!(service.can_act("anyone", Dimension::Overworld, 0, 64, 0, ActionKind::Build));
}
