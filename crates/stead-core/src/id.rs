//! Strongly-typed identifiers for claims, versions, and ticks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a claim within an owner's claim set.
///
/// IDs are assigned at creation time (`base_1`, `base_2`, ...) and are
/// unique per owner, not globally. Comparison is exact; the
/// case-insensitivity rules for player names do not apply to claim IDs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimId(String);

impl ClaimId {
    /// Wrap a raw identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ClaimId {
    fn from(v: &str) -> Self {
        Self(v.to_string())
    }
}

impl From<String> for ClaimId {
    fn from(v: String) -> Self {
        Self(v)
    }
}

impl AsRef<str> for ClaimId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Monotonically increasing version of the canonical claim set.
///
/// Incremented by [`VersionClock`](crate::VersionClock) on every claim
/// mutation. The spatial index stamps the version it was built against
/// and rebuilds on mismatch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClaimsVersion(pub u64);

impl fmt::Display for ClaimsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ClaimsVersion {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Monotonically increasing tick counter supplied by the host.
///
/// Used only as a second-level debounce for spatial index maintenance;
/// the engine never advances it itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
