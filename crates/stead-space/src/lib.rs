//! Geometry primitives and the uniform claim grid for Stead.
//!
//! This crate is pure spatial machinery with no claim semantics: 2D
//! distance and circle containment ([`geom`]), inclusive 3D boxes with
//! corner sorting ([`aabb`]), and the bucketed footprint grid that
//! accelerates point-ownership queries ([`grid`]).
//!
//! # Grid acceleration
//!
//! Claim footprints are inserted into every grid cell their bounding
//! square overlaps. A point query inspects the 3x3 cell neighbourhood
//! around the query point, which is guaranteed to contain every
//! footprint whose bounding square covers the point. Candidates are
//! bounding-square matches only; callers must confirm circle
//! containment themselves.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod aabb;
pub mod geom;
pub mod grid;

pub use aabb::Aabb;
pub use grid::{
    clamp_cell_size, Footprint, GridIndex, DEFAULT_CELL_SIZE, MAX_CELL_SIZE, MIN_CELL_SIZE,
};
