//! World dimensions and lenient dimension parsing.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// One of the three world layers a claim can live in.
///
/// Claims never span dimensions, and spawn configuration is scoped per
/// dimension. Hosts hand the engine dimension names and numeric IDs in
/// a variety of legacy shapes; [`Dimension::from_name`] and
/// [`Dimension::from_id`] accept all of them, defaulting to
/// [`Dimension::Overworld`] for anything unrecognized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    /// The surface world. The default for unrecognized input.
    #[default]
    Overworld,
    /// The nether.
    Nether,
    /// The end.
    End,
}

impl Dimension {
    /// All dimensions, in canonical order.
    pub const ALL: [Dimension; 3] = [Dimension::Overworld, Dimension::Nether, Dimension::End];

    /// Canonical lowercase key used in settings and persisted claims.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Overworld => "overworld",
            Self::Nether => "nether",
            Self::End => "end",
        }
    }

    /// Human-readable label for this dimension's spawn overlay.
    pub fn spawn_label(&self) -> &'static str {
        match self {
            Self::Overworld => "Overworld Spawn",
            Self::Nether => "Nether Spawn",
            Self::End => "The End Spawn",
        }
    }

    /// Parse a dimension from a host-supplied name.
    ///
    /// Substring match: any name containing `nether` maps to
    /// [`Dimension::Nether`], containing `end` to [`Dimension::End`],
    /// everything else to [`Dimension::Overworld`].
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.contains("nether") {
            Self::Nether
        } else if lower.contains("end") {
            Self::End
        } else {
            Self::Overworld
        }
    }

    /// Parse a dimension from a numeric host ID.
    ///
    /// `0` is the overworld, `1` and `-1` the nether (some hosts use
    /// either), `2` the end. Anything else falls back to the overworld.
    pub fn from_id(id: i64) -> Self {
        match id {
            1 | -1 => Self::Nether,
            2 => Self::End,
            _ => Self::Overworld,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl Serialize for Dimension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for Dimension {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DimVisitor;

        impl Visitor<'_> for DimVisitor {
            type Value = Dimension;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a dimension name or numeric id")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Dimension, E> {
                Ok(Dimension::from_name(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Dimension, E> {
                Ok(Dimension::from_id(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Dimension, E> {
                Ok(Dimension::from_id(v as i64))
            }
        }

        deserializer.deserialize_any(DimVisitor)
    }
}
