//! Claim mates and their legacy-format normalization.
//!
//! Mates persist as a map from name to rank, but old documents store a
//! plain list of names. Deserialization accepts both and always yields
//! the map form with ranks coerced into {0, 1}, so normalizing twice
//! is the same as normalizing once. Name comparisons are
//! case-insensitive; stored names keep their original casing for
//! display.

use indexmap::IndexMap;
use serde::de::Deserializer;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use stead_core::identity;

/// A mate's rank on a claim.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum MateRank {
    /// Trusted for access, cannot manage the claim.
    #[default]
    Member,
    /// Trusted for access and for mate management.
    Manager,
}

impl MateRank {
    /// Coerce a stored rank value: anything >= 1 is manager.
    pub fn from_raw(raw: i64) -> Self {
        if raw >= 1 {
            Self::Manager
        } else {
            Self::Member
        }
    }

    /// The persisted numeric form.
    pub fn as_raw(self) -> u8 {
        match self {
            Self::Member => 0,
            Self::Manager => 1,
        }
    }
}

impl fmt::Display for MateRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Member => write!(f, "member"),
            Self::Manager => write!(f, "manager"),
        }
    }
}

/// The mates of one claim, keyed by display name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MateSet {
    entries: IndexMap<String, MateRank>,
}

impl MateSet {
    /// An empty mate set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mate. Returns false without changing anything if a mate
    /// with the same name (case-insensitive) is already present.
    pub fn add(&mut self, name: &str, rank: MateRank) -> bool {
        if self.contains(name) {
            return false;
        }
        self.entries.insert(name.to_owned(), rank);
        true
    }

    /// Remove a mate by name, case-insensitive. Returns false if absent.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.key_of(name) {
            Some(key) => self.entries.shift_remove(&key).is_some(),
            None => false,
        }
    }

    /// Change an existing mate's rank. Returns true only when the mate
    /// exists and the stored rank actually changed; absent mates are
    /// left alone rather than added.
    pub fn set_rank(&mut self, name: &str, rank: MateRank) -> bool {
        let Some(key) = self.key_of(name) else {
            return false;
        };
        match self.entries.get_mut(&key) {
            Some(stored) if *stored != rank => {
                *stored = rank;
                true
            }
            _ => false,
        }
    }

    /// The rank of `name`, case-insensitive.
    pub fn rank_of(&self, name: &str) -> Option<MateRank> {
        self.entries
            .iter()
            .find(|(stored, _)| identity::same(stored, name))
            .map(|(_, rank)| *rank)
    }

    /// Whether `name` is a mate at any rank, case-insensitive.
    pub fn contains(&self, name: &str) -> bool {
        self.rank_of(name).is_some()
    }

    /// Whether `name` is a rank-1 mate, case-insensitive.
    pub fn is_manager(&self, name: &str) -> bool {
        self.rank_of(name) == Some(MateRank::Manager)
    }

    /// Stored names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// All entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, MateRank)> {
        self.entries.iter().map(|(name, rank)| (name.as_str(), *rank))
    }

    /// Number of mates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no mates.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn key_of(&self, name: &str) -> Option<String> {
        self.entries
            .keys()
            .find(|stored| identity::same(stored, name))
            .cloned()
    }
}

impl Serialize for MateSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, rank) in &self.entries {
            map.serialize_entry(name, &rank.as_raw())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MateSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            List(Vec<String>),
            Map(IndexMap<String, serde_json::Value>),
        }

        let mut out = MateSet::new();
        match Repr::deserialize(deserializer)? {
            Repr::List(names) => {
                for name in names {
                    out.add(&name, MateRank::Member);
                }
            }
            Repr::Map(map) => {
                for (name, value) in map {
                    out.add(&name, rank_from_value(&value));
                }
            }
        }
        Ok(out)
    }
}

fn rank_from_value(value: &serde_json::Value) -> MateRank {
    let raw = match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0) as i64,
        serde_json::Value::Bool(b) => i64::from(*b),
        serde_json::Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0) as i64,
        _ => 0,
    };
    MateRank::from_raw(raw)
}
