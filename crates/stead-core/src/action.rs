//! The three gated action classes.

use std::fmt;

/// An action class gated by claim flags and spawn security.
///
/// Every authorization query resolves exactly one of these. The kill
/// gate only applies to passive, non-player victims; hostile mobs and
/// players are exempted before the policy is consulted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Placing or breaking blocks.
    Build,
    /// Using blocks, doors, containers, and items.
    Interact,
    /// Damaging a passive, non-player entity.
    KillPassive,
}

impl ActionKind {
    /// All action kinds, in canonical order.
    pub const ALL: [ActionKind; 3] = [
        ActionKind::Build,
        ActionKind::Interact,
        ActionKind::KillPassive,
    ];

    /// Key fragment used in settings and flag names
    /// (`spawn_security_<dim>_<key>`, `allow_<key>`, `security_<key>`).
    pub fn key(&self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Interact => "interact",
            Self::KillPassive => "kill_passive",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
