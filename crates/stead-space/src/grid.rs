//! Bucketed footprint grid for point-ownership queries.
//!
//! Each footprint is inserted into every cell its bounding square
//! overlaps. A point query then only needs to look at the 3x3 cell
//! neighbourhood around the query point: any footprint whose bounding
//! square covers the point was inserted into the point's own cell, and
//! the surrounding ring covers footprints straddling cell edges.

use crate::geom::cell_of;
use indexmap::IndexMap;
use smallvec::SmallVec;
use stead_core::Dimension;

/// Default grid cell size in blocks.
pub const DEFAULT_CELL_SIZE: u32 = 64;

/// Smallest accepted grid cell size.
pub const MIN_CELL_SIZE: u32 = 16;

/// Largest accepted grid cell size.
pub const MAX_CELL_SIZE: u32 = 256;

/// Clamp a configured cell size into the accepted range.
pub fn clamp_cell_size(cell: u32) -> u32 {
    cell.clamp(MIN_CELL_SIZE, MAX_CELL_SIZE)
}

/// The spatial footprint of one claim: a circle on the ground plane
/// in a specific dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Footprint {
    /// Center x in block coordinates.
    pub x: i32,
    /// Center z in block coordinates.
    pub z: i32,
    /// Circle radius in blocks.
    pub radius: u32,
    /// The dimension the footprint lives in.
    pub dimension: Dimension,
}

impl Footprint {
    /// Whether the footprint's circle contains `(x, z)` in `dimension`.
    /// The circle boundary is inclusive.
    pub fn contains(&self, dimension: Dimension, x: i32, z: i32) -> bool {
        self.dimension == dimension && crate::geom::circle_contains(self.x, self.z, self.radius, x, z)
    }
}

/// A uniform grid over claim footprints.
///
/// Built in one pass from a footprint list; never mutated afterwards.
/// Footprints are stored once and cells hold indices into that list,
/// so a footprint overlapping many cells costs one copy plus indices.
#[derive(Clone, Debug)]
pub struct GridIndex {
    cell: u32,
    footprints: Vec<Footprint>,
    cells: IndexMap<(Dimension, i32, i32), SmallVec<[u32; 4]>>,
}

impl GridIndex {
    /// Build a grid with the given cell size over the given footprints.
    ///
    /// The cell size is clamped into `[MIN_CELL_SIZE, MAX_CELL_SIZE]`.
    /// Each footprint lands in every cell overlapped by its bounding
    /// square, `center +/- radius` on both ground axes.
    pub fn build(cell: u32, footprints: Vec<Footprint>) -> Self {
        let cell = clamp_cell_size(cell);
        let mut cells: IndexMap<(Dimension, i32, i32), SmallVec<[u32; 4]>> = IndexMap::new();
        for (i, fp) in footprints.iter().enumerate() {
            let r = fp.radius as i32;
            let (cx_lo, cz_lo) = cell_of(fp.x.saturating_sub(r), fp.z.saturating_sub(r), cell);
            let (cx_hi, cz_hi) = cell_of(fp.x.saturating_add(r), fp.z.saturating_add(r), cell);
            for cx in cx_lo..=cx_hi {
                for cz in cz_lo..=cz_hi {
                    cells
                        .entry((fp.dimension, cx, cz))
                        .or_default()
                        .push(i as u32);
                }
            }
        }
        Self {
            cell,
            footprints,
            cells,
        }
    }

    /// The clamped cell size this grid was built with.
    pub fn cell_size(&self) -> u32 {
        self.cell
    }

    /// Number of indexed footprints.
    pub fn len(&self) -> usize {
        self.footprints.len()
    }

    /// Whether the grid indexes no footprints.
    pub fn is_empty(&self) -> bool {
        self.footprints.is_empty()
    }

    /// The footprint stored at `index`, as handed to [`Self::build`].
    pub fn footprint(&self, index: u32) -> &Footprint {
        &self.footprints[index as usize]
    }

    /// Indices of candidate footprints near `(x, z)` in `dimension`.
    ///
    /// Scans the 3x3 cell neighbourhood around the query point and
    /// returns the deduplicated union, in ascending index order. The
    /// result is a superset of the footprints whose circle contains
    /// the point; callers confirm containment with
    /// [`Footprint::contains`].
    pub fn candidates_near(&self, dimension: Dimension, x: i32, z: i32) -> Vec<u32> {
        let (cx, cz) = cell_of(x, z, self.cell);
        let mut out: Vec<u32> = Vec::new();
        for dx in -1..=1 {
            for dz in -1..=1 {
                if let Some(bucket) = self.cells.get(&(dimension, cx + dx, cz + dz)) {
                    out.extend_from_slice(bucket);
                }
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }
}
