//! The canonical claim store.
//!
//! Owns the owner to claims mapping and every mutation path. Each
//! mutation that changes geometry, flags, or mates bumps the version
//! clock before returning, which is what invalidates the spatial
//! index. Owner lookups are case-insensitive; the display casing of
//! the first-seen spelling is preserved for persistence.

use indexmap::IndexMap;
use serde_json::Value;
use stead_core::{identity, ClaimId, ClaimsVersion, Dimension, VersionClock};

use crate::claim::Claim;
use crate::error::DocumentError;
use crate::mates::MateRank;

#[derive(Clone, Debug)]
struct OwnerEntry {
    name: String,
    claims: IndexMap<ClaimId, Claim>,
}

/// Canonical mapping of owner to claim set.
#[derive(Clone, Debug, Default)]
pub struct ClaimStore {
    owners: IndexMap<String, OwnerEntry>,
    clock: VersionClock,
}

impl ClaimStore {
    /// An empty store at version zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current claim-set version.
    pub fn version(&self) -> ClaimsVersion {
        self.clock.current()
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// The claim `id` of `owner`, case-insensitive on the owner.
    pub fn get(&self, owner: &str, id: &ClaimId) -> Option<&Claim> {
        self.owners.get(&identity::fold(owner))?.claims.get(id)
    }

    /// How many claims `owner` holds.
    pub fn count_for(&self, owner: &str) -> usize {
        self.owners
            .get(&identity::fold(owner))
            .map_or(0, |e| e.claims.len())
    }

    /// The claims of one owner, in insertion order.
    pub fn claims_of(&self, owner: &str) -> impl Iterator<Item = &Claim> {
        self.owners
            .get(&identity::fold(owner))
            .into_iter()
            .flat_map(|e| e.claims.values())
    }

    /// Every claim with its owner's display name, in insertion order.
    pub fn all_claims(&self) -> impl Iterator<Item = (&str, &Claim)> {
        self.owners
            .values()
            .flat_map(|e| e.claims.values().map(move |c| (e.name.as_str(), c)))
    }

    /// Total number of claims across all owners.
    pub fn len(&self) -> usize {
        self.owners.values().map(|e| e.claims.len()).sum()
    }

    /// Whether the store holds no claims at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ── Claim CRUD ──────────────────────────────────────────────────

    /// Create a claim for `owner` with a fresh `base_<n>` id.
    ///
    /// The new claim starts fully locked with no mates. The claim
    /// count cap is deliberately not enforced here; callers check
    /// [`ClaimStore::count_for`] against the rule first.
    pub fn create_claim(
        &mut self,
        owner: &str,
        x: i32,
        y: i32,
        z: i32,
        radius: u32,
        dimension: Dimension,
        buffer_rule: u32,
    ) -> ClaimId {
        let entry = self
            .owners
            .entry(identity::fold(owner))
            .or_insert_with(|| OwnerEntry {
                name: owner.to_owned(),
                claims: IndexMap::new(),
            });
        let mut n = 1usize;
        while entry.claims.contains_key(&ClaimId::new(format!("base_{n}"))) {
            n += 1;
        }
        let id = ClaimId::new(format!("base_{n}"));
        let claim = Claim::new(id.clone(), x, y, z, radius, dimension, buffer_rule);
        entry.claims.insert(id.clone(), claim);
        self.clock.bump();
        id
    }

    /// Delete a claim. Returns false, without bumping, if it was
    /// already absent.
    pub fn delete_claim(&mut self, owner: &str, id: &ClaimId) -> bool {
        let Some(entry) = self.owners.get_mut(&identity::fold(owner)) else {
            return false;
        };
        if entry.claims.shift_remove(id).is_none() {
            return false;
        }
        self.clock.bump();
        true
    }

    /// Change a claim's display name.
    pub fn rename_claim(&mut self, owner: &str, id: &ClaimId, name: &str) -> bool {
        self.mutate(owner, id, |c| c.name = name.to_owned())
    }

    /// Change a claim's radius.
    pub fn resize_claim(&mut self, owner: &str, id: &ClaimId, radius: u32) -> bool {
        self.mutate(owner, id, |c| c.radius = radius)
    }

    /// Move a claim's center.
    pub fn move_claim(&mut self, owner: &str, id: &ClaimId, x: i32, y: i32, z: i32) -> bool {
        self.mutate(owner, id, |c| {
            c.x = x;
            c.y = y;
            c.z = z;
        })
    }

    /// Partially update a claim's flags. Unspecified actions keep
    /// their prior value; specified ones write both the direct boolean
    /// and its legacy mirror.
    pub fn set_flags(
        &mut self,
        owner: &str,
        id: &ClaimId,
        build: Option<bool>,
        interact: Option<bool>,
        kill_passive: Option<bool>,
    ) -> bool {
        self.mutate(owner, id, |c| {
            if let Some(allow) = build {
                c.flags.set(stead_core::ActionKind::Build, allow);
            }
            if let Some(allow) = interact {
                c.flags.set(stead_core::ActionKind::Interact, allow);
            }
            if let Some(allow) = kill_passive {
                c.flags.set(stead_core::ActionKind::KillPassive, allow);
            }
        })
    }

    // ── Mates ───────────────────────────────────────────────────────

    /// Add a mate to a claim. False if the claim is missing or the
    /// mate is already present (case-insensitive).
    pub fn add_mate(&mut self, owner: &str, id: &ClaimId, name: &str, rank: MateRank) -> bool {
        self.mutate_if(owner, id, |c| c.mates.add(name, rank))
    }

    /// Remove a mate from a claim. False if claim or mate is absent.
    pub fn remove_mate(&mut self, owner: &str, id: &ClaimId, name: &str) -> bool {
        self.mutate_if(owner, id, |c| c.mates.remove(name))
    }

    /// Change an existing mate's rank. False if the claim or mate is
    /// absent or the rank did not change; absent mates are not added.
    pub fn set_rank(&mut self, owner: &str, id: &ClaimId, name: &str, rank: MateRank) -> bool {
        self.mutate_if(owner, id, |c| c.mates.set_rank(name, rank))
    }

    // ── Persistence ─────────────────────────────────────────────────

    /// Load a store from the host's persisted document.
    ///
    /// The document root must be an object; everything below it is
    /// read leniently. Claims that fail to parse are skipped, claims
    /// missing their `id` field inherit their map key, and every
    /// loaded claim is normalized in place with `buffer_rule` as the
    /// current stamping rule. Loading does not bump the version.
    pub fn from_document(doc: &Value, buffer_rule: u32) -> Result<Self, DocumentError> {
        let root = doc.as_object().ok_or_else(|| DocumentError::MalformedRoot {
            reason: format!("expected object, got {}", json_kind(doc)),
        })?;
        let mut store = Self::new();
        let Some(players) = root.get("players").and_then(Value::as_object) else {
            return Ok(store);
        };
        for (owner, record) in players {
            let entry = store
                .owners
                .entry(identity::fold(owner))
                .or_insert_with(|| OwnerEntry {
                    name: owner.clone(),
                    claims: IndexMap::new(),
                });
            let Some(claims) = record.get("claims").and_then(Value::as_object) else {
                continue;
            };
            for (key, raw) in claims {
                let Ok(mut claim) = serde_json::from_value::<Claim>(raw.clone()) else {
                    continue;
                };
                if claim.id.as_str().is_empty() {
                    claim.id = ClaimId::new(key.clone());
                }
                claim.ensure_defaults(buffer_rule);
                entry.claims.insert(claim.id.clone(), claim);
            }
        }
        Ok(store)
    }

    /// Render the store back into the persisted document shape.
    pub fn to_document(&self) -> Result<Value, DocumentError> {
        let mut players = serde_json::Map::new();
        for entry in self.owners.values() {
            let mut claims = serde_json::Map::new();
            for (id, claim) in &entry.claims {
                let rendered =
                    serde_json::to_value(claim).map_err(|e| DocumentError::Serialize {
                        claim: format!("{}/{}", entry.name, id),
                        reason: e.to_string(),
                    })?;
                claims.insert(id.as_str().to_owned(), rendered);
            }
            players.insert(
                entry.name.clone(),
                serde_json::json!({ "claims": claims }),
            );
        }
        Ok(serde_json::json!({ "players": players }))
    }

    fn mutate(&mut self, owner: &str, id: &ClaimId, f: impl FnOnce(&mut Claim)) -> bool {
        self.mutate_if(owner, id, |c| {
            f(c);
            true
        })
    }

    fn mutate_if(&mut self, owner: &str, id: &ClaimId, f: impl FnOnce(&mut Claim) -> bool) -> bool {
        let Some(claim) = self
            .owners
            .get_mut(&identity::fold(owner))
            .and_then(|e| e.claims.get_mut(id))
        else {
            return false;
        };
        if !f(claim) {
            return false;
        }
        self.clock.bump();
        true
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
