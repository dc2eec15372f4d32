//! Claim documents, the canonical claim store, and layered settings.
//!
//! This crate owns everything about claims at rest: the persisted
//! [`Claim`] record with its lenient legacy parsing, the mutable
//! [`ClaimStore`] keyed by owner, and the [`SettingsView`] that merges
//! host configuration layers into the rules the engine consults.
//!
//! Spatial queries and access decisions live one crate up in
//! `stead-engine`; this crate only models the data they act on.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod claim;
pub mod error;
pub mod flags;
pub mod mates;
pub mod settings;
pub mod store;

pub use claim::Claim;
pub use error::DocumentError;
pub use flags::{FlagSet, ResolvedFlags, RootSecurity};
pub use mates::{MateRank, MateSet};
pub use settings::{
    FreeArea, SettingsView, SpacingRules, SpawnOverlay, DEFAULT_BUFFER_RULE,
    DEFAULT_FIRST_BASE_CAP, DEFAULT_MAX_BASES, DEFAULT_OTHER_BASE_CAP, DEFAULT_SPAWN_BUFFER,
};
pub use store::ClaimStore;
