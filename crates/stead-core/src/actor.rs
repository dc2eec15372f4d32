//! Collaborator traits implemented by the host game server.
//!
//! The engine never talks to the host directly. Ticks, actors, and
//! entities cross the boundary through these traits, so each target
//! host writes one adapter per capability instead of the engine
//! probing host objects ad hoc.

use crate::{Dimension, TickId};

/// Source of the host's monotonic tick counter.
///
/// Used only to debounce spatial index maintenance to at most once per
/// tick. The engine never advances ticks itself and attaches no timing
/// semantics beyond "two equal values are the same tick".
pub trait TickSource {
    /// The current host tick.
    fn current_tick(&self) -> TickId;
}

/// A player as seen by the engine.
///
/// One adapter implementation per target host. Positions are block
/// coordinates; the vertical component is only consulted for
/// free-build-area containment.
pub trait ActorAdapter {
    /// The actor's display name. Compared case-insensitively.
    fn name(&self) -> &str;

    /// The actor's current block position as `(x, y, z)`.
    fn position(&self) -> (i32, i32, i32);

    /// The dimension the actor currently occupies.
    fn dimension(&self) -> Dimension;
}

/// A damage victim as seen by the kill-passive gate.
///
/// Family tags are the host's entity classification groups (for
/// example `monster`, `undead`); the type identifier is the host's
/// entity type string (for example `minecraft:creeper`). Either may be
/// empty on hosts that do not expose it.
pub trait EntityAdapter {
    /// Whether the victim is another player. Players are never gated.
    fn is_player(&self) -> bool;

    /// The entity's family tags, if the host exposes them.
    fn families(&self) -> Vec<String>;

    /// The entity's type identifier, or an empty string.
    fn type_id(&self) -> &str;
}
