//! Claim access flags and their legacy-format resolution.
//!
//! Flags are stored twice in the persisted document: the direct
//! `allow_*` booleans and their inverted `security_*` mirrors
//! (true means blocked). Very old claims carry `security_*` keys at
//! the claim root instead of under `flags`, and the oldest spelling of
//! the build toggle is `security_place_break`. Resolution reads, per
//! action, `allow_*` first, then the nested `security_*` mirror, then
//! the root legacy keys, and finally defaults to blocked.

use serde::{Deserialize, Serialize};
use stead_core::ActionKind;

/// The per-action flag booleans resolved from whatever combination of
/// current and legacy keys a claim carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedFlags {
    /// Whether untrusted players may place and break blocks.
    pub build: bool,
    /// Whether untrusted players may use doors, chests, and the like.
    pub interact: bool,
    /// Whether untrusted players may kill passive fauna.
    pub kill_passive: bool,
}

impl ResolvedFlags {
    /// The resolved value for one action.
    pub fn allows(&self, action: ActionKind) -> bool {
        match action {
            ActionKind::Build => self.build,
            ActionKind::Interact => self.interact,
            ActionKind::KillPassive => self.kill_passive,
        }
    }

    /// The inverted, blocked-means-true view shown to owners.
    pub fn blocks(&self, action: ActionKind) -> bool {
        !self.allows(action)
    }
}

/// The `flags` sub-object of a persisted claim.
///
/// Every field is optional on disk; [`FlagSet::resolve`] turns any
/// combination into a [`ResolvedFlags`]. Mutations through
/// [`FlagSet::set`] always write both the direct boolean and its
/// `security_*` mirror so older readers keep working.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    allow_build: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    allow_interact: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    allow_kill_passive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    security_build: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    security_interact: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    security_kill_passive: Option<bool>,
    /// Deprecated spelling of `security_build`. Read, never written.
    #[serde(default, skip_serializing)]
    security_place_break: Option<bool>,
}

impl FlagSet {
    /// All three actions blocked. New claims start this way.
    pub fn locked() -> Self {
        Self {
            allow_build: Some(false),
            allow_interact: Some(false),
            allow_kill_passive: Some(false),
            security_build: Some(true),
            security_interact: Some(true),
            security_kill_passive: Some(true),
            security_place_break: None,
        }
    }

    /// All three actions allowed. Pre-flag claims migrate this way.
    pub fn open() -> Self {
        Self {
            allow_build: Some(true),
            allow_interact: Some(true),
            allow_kill_passive: Some(true),
            security_build: Some(false),
            security_interact: Some(false),
            security_kill_passive: Some(false),
            security_place_break: None,
        }
    }

    /// Whether the sub-object carries no flag information at all.
    pub fn is_unset(&self) -> bool {
        self.allow_build.is_none()
            && self.allow_interact.is_none()
            && self.allow_kill_passive.is_none()
            && self.security_build.is_none()
            && self.security_interact.is_none()
            && self.security_kill_passive.is_none()
            && self.security_place_break.is_none()
    }

    /// Set one action's flag, writing both the direct boolean and the
    /// inverted `security_*` mirror.
    pub fn set(&mut self, action: ActionKind, allow: bool) {
        match action {
            ActionKind::Build => {
                self.allow_build = Some(allow);
                self.security_build = Some(!allow);
                self.security_place_break = None;
            }
            ActionKind::Interact => {
                self.allow_interact = Some(allow);
                self.security_interact = Some(!allow);
            }
            ActionKind::KillPassive => {
                self.allow_kill_passive = Some(allow);
                self.security_kill_passive = Some(!allow);
            }
        }
    }

    /// The stored direct boolean for one action, if present.
    pub fn allow(&self, action: ActionKind) -> Option<bool> {
        match action {
            ActionKind::Build => self.allow_build,
            ActionKind::Interact => self.allow_interact,
            ActionKind::KillPassive => self.allow_kill_passive,
        }
    }

    fn security(&self, action: ActionKind) -> Option<bool> {
        match action {
            ActionKind::Build => self.security_build.or(self.security_place_break),
            ActionKind::Interact => self.security_interact,
            ActionKind::KillPassive => self.security_kill_passive,
        }
    }

    /// Resolve the stored keys into concrete per-action booleans.
    ///
    /// Per action: `allow_*` wins if present, else the nested
    /// `security_*` mirror inverted, else the claim-root legacy keys
    /// inverted, else blocked. A claim with no flag information
    /// anywhere resolves fully blocked.
    pub fn resolve(&self, legacy: &RootSecurity) -> ResolvedFlags {
        let one = |action: ActionKind| match self.allow(action) {
            Some(allow) => allow,
            None => match self.security(action) {
                Some(blocked) => !blocked,
                None => match legacy.blocked(action) {
                    Some(blocked) => !blocked,
                    None => false,
                },
            },
        };
        ResolvedFlags {
            build: one(ActionKind::Build),
            interact: one(ActionKind::Interact),
            kill_passive: one(ActionKind::KillPassive),
        }
    }
}

/// Legacy `security_*` keys stored at the claim root instead of under
/// `flags`. Read during resolution, cleared by claim normalization,
/// never written back.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootSecurity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    security_build: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    security_interact: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    security_kill_passive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    security_place_break: Option<bool>,
}

impl RootSecurity {
    /// The blocked-means-true value for one action, if any legacy key
    /// for it is present.
    pub fn blocked(&self, action: ActionKind) -> Option<bool> {
        match action {
            ActionKind::Build => self.security_build.or(self.security_place_break),
            ActionKind::Interact => self.security_interact,
            ActionKind::KillPassive => self.security_kill_passive,
        }
    }

    /// Whether no legacy root key is present.
    pub fn is_unset(&self) -> bool {
        self.security_build.is_none()
            && self.security_interact.is_none()
            && self.security_kill_passive.is_none()
            && self.security_place_break.is_none()
    }

    /// Drop all legacy keys. Called once flags have been normalized.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_legacy() -> RootSecurity {
        RootSecurity::default()
    }

    // ── Resolution chain ────────────────────────────────────────────

    #[test]
    fn empty_flags_resolve_blocked() {
        let flags = FlagSet::default();
        let r = flags.resolve(&no_legacy());
        assert!(!r.build);
        assert!(!r.interact);
        assert!(!r.kill_passive);
    }

    #[test]
    fn allow_keys_win_over_security_mirrors() {
        let flags: FlagSet = serde_json::from_value(serde_json::json!({
            "allow_build": true,
            "security_build": true,
        }))
        .unwrap();
        assert!(flags.resolve(&no_legacy()).build);
    }

    #[test]
    fn security_mirror_is_inverted_when_allow_absent() {
        let flags: FlagSet = serde_json::from_value(serde_json::json!({
            "security_build": false,
            "security_interact": true,
        }))
        .unwrap();
        let r = flags.resolve(&no_legacy());
        assert!(r.build);
        assert!(!r.interact);
        assert!(!r.kill_passive);
    }

    #[test]
    fn root_legacy_keys_are_last_before_default() {
        let legacy: RootSecurity = serde_json::from_value(serde_json::json!({
            "security_build": false,
        }))
        .unwrap();
        let r = FlagSet::default().resolve(&legacy);
        assert!(r.build);
        assert!(!r.interact);
    }

    #[test]
    fn nested_security_beats_root_legacy() {
        let flags: FlagSet = serde_json::from_value(serde_json::json!({
            "security_build": true,
        }))
        .unwrap();
        let legacy: RootSecurity = serde_json::from_value(serde_json::json!({
            "security_build": false,
        }))
        .unwrap();
        assert!(!flags.resolve(&legacy).build);
    }

    #[test]
    fn place_break_spelling_feeds_build() {
        let flags: FlagSet = serde_json::from_value(serde_json::json!({
            "security_place_break": false,
        }))
        .unwrap();
        assert!(flags.resolve(&no_legacy()).build);

        let legacy: RootSecurity = serde_json::from_value(serde_json::json!({
            "security_place_break": true,
        }))
        .unwrap();
        assert!(!FlagSet::default().resolve(&legacy).build);
    }

    // ── Mutation ────────────────────────────────────────────────────

    #[test]
    fn locked_resolves_fully_blocked() {
        let r = FlagSet::locked().resolve(&no_legacy());
        assert!(!r.build && !r.interact && !r.kill_passive);
    }

    #[test]
    fn set_writes_both_mirrors() {
        let mut flags = FlagSet::locked();
        flags.set(ActionKind::Build, true);
        let v = serde_json::to_value(&flags).unwrap();
        assert_eq!(v["allow_build"], serde_json::json!(true));
        assert_eq!(v["security_build"], serde_json::json!(false));
        assert!(flags.resolve(&no_legacy()).build);
        assert!(!flags.resolve(&no_legacy()).interact);
    }

    #[test]
    fn place_break_is_never_written_back() {
        let flags: FlagSet = serde_json::from_value(serde_json::json!({
            "security_place_break": true,
        }))
        .unwrap();
        let v = serde_json::to_value(&flags).unwrap();
        assert!(v.get("security_place_break").is_none());
    }

    #[test]
    fn blocked_view_is_the_inverse() {
        let r = FlagSet::open().resolve(&no_legacy());
        assert!(!r.blocks(ActionKind::Build));
        assert!(r.allows(ActionKind::KillPassive));
    }
}
