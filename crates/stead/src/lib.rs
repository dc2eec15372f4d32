//! Stead: a land-claim ownership and access-policy engine for multiplayer
//! game worlds.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Stead sub-crates. For most hosts, adding `stead` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use stead::prelude::*;
//! use serde_json::json;
//!
//! // A tick source would normally be backed by the host game loop.
//! struct FrozenClock;
//! impl TickSource for FrozenClock {
//!     fn current_tick(&self) -> TickId {
//!         TickId(0)
//!     }
//! }
//!
//! let overrides = json!({ "lc_first_base_radius_cap": 500 });
//! let settings = SettingsView::from_layers([&overrides]);
//! let mut service = ClaimService::new(settings, Box::new(FrozenClock));
//!
//! let id = service
//!     .create_claim("alice", 100, 64, -40, 150, Dimension::Overworld)
//!     .unwrap();
//!
//! let hit = service.owner_at(Dimension::Overworld, 120, -30).unwrap();
//! assert_eq!(hit.owner, "alice");
//! assert_eq!(hit.claim_id, id);
//!
//! // Alice builds inside her own claim; a stranger does not.
//! assert!(service.can_act("alice", Dimension::Overworld, 120, 64, -30, ActionKind::Build));
//! assert!(!service.can_act("mallory", Dimension::Overworld, 120, 64, -30, ActionKind::Build));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `stead-core` | IDs, dimensions, actions, version clock, host traits |
//! | [`space`] | `stead-space` | Geometry primitives and the uniform claim grid |
//! | [`claims`] | `stead-claims` | Claim model, canonical store, layered settings |
//! | [`engine`] | `stead-engine` | Index cache, access policy, spacing, host service |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`stead-core`).
///
/// Contains the dimension and action vocabularies, strongly-typed IDs,
/// the version clock, identity folding, and the collaborator traits the
/// host implements ([`types::ActorAdapter`], [`types::EntityAdapter`],
/// [`types::TickSource`]).
pub use stead_core as types;

/// Geometry primitives and the uniform claim grid (`stead-space`).
///
/// Pure spatial machinery: 2D distance and circle containment
/// ([`space::geom`]), inclusive 3D boxes ([`space::Aabb`]), and the
/// bucketed footprint grid ([`space::GridIndex`]).
pub use stead_space as space;

/// Claim model, canonical store, and layered settings (`stead-claims`).
///
/// The [`claims::ClaimStore`] is the single source of truth for claim
/// state; [`claims::SettingsView`] resolves configuration from layered
/// JSON documents.
pub use stead_claims as claims;

/// Index cache, access policy, spacing validation, and the host-facing
/// service (`stead-engine`).
///
/// Most hosts only need [`engine::ClaimService`], which wires the
/// store, settings, cached spatial index, and policy engine behind one
/// surface driven from event handlers.
pub use stead_engine as engine;

/// Common imports for typical Stead usage.
///
/// ```rust
/// use stead::prelude::*;
/// ```
///
/// This imports the most frequently used types: the claim service, the
/// store and settings it wraps, the core vocabularies, and the host
/// collaborator traits.
pub mod prelude {
    // Core vocabularies, IDs, and host traits
    pub use stead_core::{
        ActionKind, ActorAdapter, ClaimId, ClaimsVersion, Dimension, EntityAdapter, TickId,
        TickSource,
    };

    // Claim model and settings
    pub use stead_claims::{
        Claim, ClaimStore, DocumentError, MateRank, ResolvedFlags, SettingsView, SpacingRules,
    };

    // Engine surface
    pub use stead_engine::{ClaimService, Conflict, CreateError, OwnerHit};
}
