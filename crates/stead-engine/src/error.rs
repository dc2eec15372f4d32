//! Error types for the decision layer.

use std::error::Error;
use std::fmt;
use stead_core::Dimension;

use crate::spacing::Conflict;

/// Why a claim creation request was refused.
///
/// Every variant carries the data a host needs to explain the refusal
/// to the player; bare lookups and no-op mutations return `bool` or
/// `Option` instead of surfacing here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CreateError {
    /// The owner already holds the maximum number of claims.
    LimitExceeded {
        /// The configured claim cap.
        max_bases: u32,
    },
    /// The requested radius exceeds the cap for this claim slot.
    CapExceeded {
        /// The radius asked for.
        requested: u32,
        /// The applicable cap.
        cap: u32,
    },
    /// The circle sits too close to the dimension's world spawn.
    SpawnBlocked {
        /// The dimension whose spawn buffer was hit.
        dimension: Dimension,
    },
    /// Existing claims leave no room for the circle.
    ConflictDetected {
        /// The neighbors in the way, deduplicated.
        conflicts: Vec<Conflict>,
    },
}

impl fmt::Display for CreateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LimitExceeded { max_bases } => {
                write!(f, "claim limit reached ({max_bases} bases)")
            }
            Self::CapExceeded { requested, cap } => {
                write!(f, "radius {requested} exceeds the cap of {cap}")
            }
            Self::SpawnBlocked { dimension } => {
                write!(f, "too close to the {dimension} world spawn")
            }
            Self::ConflictDetected { conflicts } => {
                write!(f, "conflicts with {} existing claim(s)", conflicts.len())
            }
        }
    }
}

impl Error for CreateError {}
