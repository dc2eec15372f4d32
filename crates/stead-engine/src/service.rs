//! The host-facing facade over the whole decision layer.
//!
//! [`ClaimService`] owns the canonical [`ClaimStore`], the merged
//! [`SettingsView`], and the [`IndexCache`], and wires them through
//! the policy and spacing engines. Hosts drive every entry point
//! synchronously from their own tick loop; the service never blocks,
//! spawns work, or touches files.
//!
//! Persistence stays with the host: the service loads and renders the
//! claim document and raises a dirty signal after every effective
//! mutation, and the host decides when and where to write.

use serde_json::Value;
use stead_claims::{Claim, ClaimStore, DocumentError, MateRank, SettingsView};
use stead_core::{ActionKind, ActorAdapter, ClaimId, ClaimsVersion, Dimension, EntityAdapter, TickSource};
use std::fmt;

use crate::cache::IndexCache;
use crate::error::CreateError;
use crate::fauna;
use crate::policy::{self, PolicyEngine};
use crate::spacing::{Conflict, SpacingValidator};

/// An ownership query result, detached from the store's lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnerHit {
    /// Owner display name.
    pub owner: String,
    /// The covering claim's id.
    pub claim_id: ClaimId,
}

/// The engine facade a host embeds.
pub struct ClaimService {
    store: ClaimStore,
    settings: SettingsView,
    cache: IndexCache,
    ticks: Box<dyn TickSource>,
    dirty: bool,
}

impl fmt::Debug for ClaimService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClaimService")
            .field("claims", &self.store.len())
            .field("version", &self.store.version())
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl ClaimService {
    /// A service with an empty store and the given settings.
    pub fn new(settings: SettingsView, ticks: Box<dyn TickSource>) -> Self {
        Self {
            store: ClaimStore::new(),
            settings,
            cache: IndexCache::new(),
            ticks,
            dirty: false,
        }
    }

    // ── State access ────────────────────────────────────────────────

    /// The canonical claim store.
    pub fn store(&self) -> &ClaimStore {
        &self.store
    }

    /// The merged settings in force.
    pub fn settings(&self) -> &SettingsView {
        &self.settings
    }

    /// Replace the settings, dropping the cached index.
    pub fn set_settings(&mut self, settings: SettingsView) {
        self.settings = settings;
        self.cache.invalidate();
    }

    /// The current claim-set version.
    pub fn version(&self) -> ClaimsVersion {
        self.store.version()
    }

    /// A claim by owner and id.
    pub fn claim(&self, owner: &str, id: &ClaimId) -> Option<&Claim> {
        self.store.get(owner, id)
    }

    /// All of an owner's claims.
    pub fn claims_of(&self, owner: &str) -> impl Iterator<Item = &Claim> {
        self.store.claims_of(owner)
    }

    /// How many claims an owner holds.
    pub fn count_for(&self, owner: &str) -> usize {
        self.store.count_for(owner)
    }

    // ── Persistence boundary ────────────────────────────────────────

    /// Replace the store from the host's persisted document.
    ///
    /// Clears the dirty signal; the loaded state is by definition what
    /// is on disk.
    pub fn load_document(&mut self, doc: &Value) -> Result<(), DocumentError> {
        let buffer_rule = self.settings.spacing_rules().buffer;
        self.store = ClaimStore::from_document(doc, buffer_rule)?;
        self.cache.invalidate();
        self.dirty = false;
        Ok(())
    }

    /// Render the store into the persisted document form.
    pub fn to_document(&self) -> Result<Value, DocumentError> {
        self.store.to_document()
    }

    /// Whether unsaved mutations have accumulated since the last
    /// [`load_document`](Self::load_document) or
    /// [`mark_saved`](Self::mark_saved).
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Acknowledge that the host has persisted the current state.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    // ── Ownership and authorization ─────────────────────────────────

    /// The owner and claim covering `(x, z)` in `dimension`, if any.
    pub fn owner_at(&mut self, dimension: Dimension, x: i32, z: i32) -> Option<OwnerHit> {
        let tick = self.ticks.current_tick();
        let index = self.cache.get_or_build(&self.store, &self.settings, tick);
        let engine = PolicyEngine::new(&self.store, &self.settings, index);
        engine.owner_at(dimension, x, z).map(|hit| OwnerHit {
            owner: hit.owner.to_owned(),
            claim_id: hit.claim.id.clone(),
        })
    }

    /// Whether `acting` may perform `action` at `(x, y, z)`.
    pub fn can_act(
        &mut self,
        acting: &str,
        dimension: Dimension,
        x: i32,
        y: i32,
        z: i32,
        action: ActionKind,
    ) -> bool {
        let tick = self.ticks.current_tick();
        let index = self.cache.get_or_build(&self.store, &self.settings, tick);
        let engine = PolicyEngine::new(&self.store, &self.settings, index);
        engine.can_act(acting, dimension, x, y, z, action)
    }

    /// Whether an actor may perform `action` at `(x, y, z)` in their
    /// current dimension.
    pub fn actor_can(
        &mut self,
        actor: &dyn ActorAdapter,
        x: i32,
        y: i32,
        z: i32,
        action: ActionKind,
    ) -> bool {
        let name = actor.name().to_owned();
        self.can_act(&name, actor.dimension(), x, y, z, action)
    }

    /// Whether an actor may damage `victim` at the victim's position.
    ///
    /// Players and hostile entities are exempt from the gate entirely;
    /// only passive, non-player victims consult the kill-passive
    /// policy.
    pub fn can_damage(
        &mut self,
        actor: &dyn ActorAdapter,
        victim: &dyn EntityAdapter,
        x: i32,
        y: i32,
        z: i32,
    ) -> bool {
        if !fauna::is_gated_victim(victim) {
            return true;
        }
        self.actor_can(actor, x, y, z, ActionKind::KillPassive)
    }

    /// Whether `acting` is trusted on the given claim.
    pub fn is_trusted(&self, acting: &str, owner: &str, id: &ClaimId) -> bool {
        self.store
            .get(owner, id)
            .is_some_and(|claim| policy::is_trusted(&self.settings, acting, owner, claim))
    }

    /// Whether `acting` may manage the given claim's mates and flags.
    pub fn can_manage(&self, acting: &str, owner: &str, id: &ClaimId) -> bool {
        self.store
            .get(owner, id)
            .is_some_and(|claim| policy::can_manage(acting, owner, claim))
    }

    // ── Claim CRUD ──────────────────────────────────────────────────

    /// Create a claim after checking the cap, spawn buffer, and
    /// neighbor spacing.
    ///
    /// The buffer rule in force is stamped onto the new claim. The
    /// new claim starts fully locked with no mates.
    pub fn create_claim(
        &mut self,
        owner: &str,
        x: i32,
        y: i32,
        z: i32,
        radius: u32,
        dimension: Dimension,
    ) -> Result<ClaimId, CreateError> {
        let rules = self.settings.spacing_rules();
        let held = self.store.count_for(owner);
        if held as u64 >= u64::from(rules.max_bases) {
            return Err(CreateError::LimitExceeded {
                max_bases: rules.max_bases,
            });
        }
        let cap = rules.cap_for(held);
        if radius > cap {
            return Err(CreateError::CapExceeded {
                requested: radius,
                cap,
            });
        }
        let validator = SpacingValidator::new(&self.store, &self.settings);
        if validator.spawn_blocked(dimension, x, z, radius) {
            return Err(CreateError::SpawnBlocked { dimension });
        }
        let conflicts = validator.conflicts_with(owner, dimension, x, z, radius, rules.buffer, None);
        if !conflicts.is_empty() {
            return Err(CreateError::ConflictDetected { conflicts });
        }
        let id = self
            .store
            .create_claim(owner, x, y, z, radius, dimension, rules.buffer);
        self.dirty = true;
        Ok(id)
    }

    /// Delete a claim. False (and no dirty signal) if absent.
    pub fn delete_claim(&mut self, owner: &str, id: &ClaimId) -> bool {
        self.flag_dirty(|s| s.store.delete_claim(owner, id))
    }

    /// Rename a claim.
    pub fn rename_claim(&mut self, owner: &str, id: &ClaimId, name: &str) -> bool {
        self.flag_dirty(|s| s.store.rename_claim(owner, id, name))
    }

    /// Set a claim's radius.
    ///
    /// Advisory only: hosts are expected to consult
    /// [`max_feasible_resize`](Self::max_feasible_resize) first, and
    /// admins may set any radius.
    pub fn resize_claim(&mut self, owner: &str, id: &ClaimId, radius: u32) -> bool {
        self.flag_dirty(|s| s.store.resize_claim(owner, id, radius))
    }

    /// Move a claim's center.
    pub fn move_claim(&mut self, owner: &str, id: &ClaimId, x: i32, y: i32, z: i32) -> bool {
        self.flag_dirty(|s| s.store.move_claim(owner, id, x, y, z))
    }

    /// Partially update a claim's flags.
    pub fn set_flags(
        &mut self,
        owner: &str,
        id: &ClaimId,
        build: Option<bool>,
        interact: Option<bool>,
        kill_passive: Option<bool>,
    ) -> bool {
        self.flag_dirty(|s| s.store.set_flags(owner, id, build, interact, kill_passive))
    }

    // ── Mate management ─────────────────────────────────────────────

    /// Add a mate. False if already present.
    pub fn add_mate(&mut self, owner: &str, id: &ClaimId, name: &str, rank: MateRank) -> bool {
        self.flag_dirty(|s| s.store.add_mate(owner, id, name, rank))
    }

    /// Remove a mate. False if absent.
    pub fn remove_mate(&mut self, owner: &str, id: &ClaimId, name: &str) -> bool {
        self.flag_dirty(|s| s.store.remove_mate(owner, id, name))
    }

    /// Change an existing mate's rank. Absent mates are not added.
    pub fn set_rank(&mut self, owner: &str, id: &ClaimId, name: &str, rank: MateRank) -> bool {
        self.flag_dirty(|s| s.store.set_rank(owner, id, name, rank))
    }

    // ── Spacing advisories ──────────────────────────────────────────

    /// The largest radius a new claim could take at `(x, z)`, under
    /// the cap for the owner's next claim slot.
    pub fn max_feasible_new_radius(
        &self,
        owner: &str,
        dimension: Dimension,
        x: i32,
        z: i32,
    ) -> u32 {
        let rules = self.settings.spacing_rules();
        let cap = rules.cap_for(self.store.count_for(owner));
        SpacingValidator::new(&self.store, &self.settings)
            .max_feasible_new_radius(owner, dimension, x, z, cap)
    }

    /// The largest radius an existing claim could grow to in place,
    /// or `None` if the claim does not exist.
    pub fn max_feasible_resize(&self, owner: &str, id: &ClaimId) -> Option<u32> {
        let claim = self.store.get(owner, id)?;
        let rules = self.settings.spacing_rules();
        let cap = if self.store.count_for(owner) <= 1 {
            rules.first_base_cap
        } else {
            rules.other_base_cap
        };
        Some(SpacingValidator::new(&self.store, &self.settings).max_feasible_resize(owner, claim, cap))
    }

    /// The neighbors that conflict with a circle of `radius` at
    /// `(x, z)`, for user-facing diagnostics.
    pub fn conflicts_at(
        &self,
        owner: &str,
        dimension: Dimension,
        x: i32,
        z: i32,
        radius: u32,
    ) -> Vec<Conflict> {
        let buffer = self.settings.spacing_rules().buffer;
        SpacingValidator::new(&self.store, &self.settings)
            .conflicts_with(owner, dimension, x, z, radius, buffer, None)
    }

    fn flag_dirty(&mut self, op: impl FnOnce(&mut Self) -> bool) -> bool {
        let changed = op(self);
        if changed {
            self.dirty = true;
        }
        changed
    }
}
