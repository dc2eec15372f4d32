//! The decision layer: spatial index cache, access policy, spacing
//! validation, and the host-facing service facade.
//!
//! Data flows one way: mutations land in the
//! [`ClaimStore`](stead_claims::ClaimStore) and bump its version, the
//! [`IndexCache`] notices the bump and rebuilds the grid, and the
//! [`PolicyEngine`] answers ownership and authorization queries
//! against one consistent snapshot. [`ClaimService`] wires the whole
//! pipeline behind a surface a host game server can drive from its
//! event handlers.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod error;
pub mod fauna;
pub mod policy;
pub mod service;
pub mod spacing;

pub use cache::{ClaimIndex, IndexCache, IndexEntry};
pub use error::CreateError;
pub use policy::{Ownership, PolicyEngine};
pub use service::{ClaimService, OwnerHit};
pub use spacing::{Conflict, SpacingValidator, RADIUS_STEP};
