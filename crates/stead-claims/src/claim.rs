//! The persisted claim record.
//!
//! Claims are read from host-managed documents that have accumulated
//! years of format drift, so every numeric field deserializes
//! leniently: integers, floats, and numeric strings are all accepted,
//! and malformed values degrade to zero rather than failing the whole
//! document. [`Claim::ensure_defaults`] stamps missing fields in place
//! so a claim is fully populated after its first load.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use stead_core::{ClaimId, Dimension};
use stead_space::Footprint;

use crate::flags::{FlagSet, ResolvedFlags, RootSecurity};
use crate::mates::MateSet;

/// One claim: a named circle of protected ground.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Unique within the owner's claim set.
    #[serde(default)]
    pub id: ClaimId,
    /// Display label, mutable, defaults to the id.
    #[serde(default)]
    pub name: String,
    /// Center x in block coordinates.
    #[serde(default, deserialize_with = "lenient_i32")]
    pub x: i32,
    /// Center y. Stored for teleport convenience, ignored by containment.
    #[serde(default, deserialize_with = "lenient_i32")]
    pub y: i32,
    /// Center z in block coordinates.
    #[serde(default, deserialize_with = "lenient_i32")]
    pub z: i32,
    /// Circle radius in blocks.
    #[serde(default, deserialize_with = "lenient_u32")]
    pub radius: u32,
    /// Required distance from other claims' edges, stamped at creation
    /// from the then-current rule. Old claims keep their stamped value.
    #[serde(
        default,
        rename = "buffer_rule",
        deserialize_with = "lenient_opt_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub buffer_rule: Option<u32>,
    /// The dimension the claim lives in.
    #[serde(default, rename = "dim")]
    pub dimension: Dimension,
    /// Access flags, both direct and mirrored forms.
    #[serde(default)]
    pub flags: FlagSet,
    /// Trusted players.
    #[serde(default)]
    pub mates: MateSet,
    #[serde(flatten)]
    legacy_security: RootSecurity,
}

impl Claim {
    /// A freshly created claim: named after its id, fully locked,
    /// no mates.
    pub fn new(
        id: ClaimId,
        x: i32,
        y: i32,
        z: i32,
        radius: u32,
        dimension: Dimension,
        buffer_rule: u32,
    ) -> Self {
        Self {
            name: id.as_str().to_owned(),
            id,
            x,
            y,
            z,
            radius,
            buffer_rule: Some(buffer_rule),
            dimension,
            flags: FlagSet::locked(),
            mates: MateSet::new(),
            legacy_security: RootSecurity::default(),
        }
    }

    /// The stamped buffer rule, or zero for claims never normalized.
    pub fn buffer(&self) -> u32 {
        self.buffer_rule.unwrap_or(0)
    }

    /// Whether the claim's circle contains `(x, z)` in `dimension`.
    pub fn contains(&self, dimension: Dimension, x: i32, z: i32) -> bool {
        self.footprint().contains(dimension, x, z)
    }

    /// Distance from the claim center to `(x, z)` on the ground plane.
    pub fn center_distance(&self, x: i32, z: i32) -> f64 {
        stead_space::geom::center_distance(self.x, self.z, x, z)
    }

    /// The claim's spatial footprint for grid indexing.
    pub fn footprint(&self) -> Footprint {
        Footprint {
            x: self.x,
            z: self.z,
            radius: self.radius,
            dimension: self.dimension,
        }
    }

    /// Resolve the access flags, including legacy root keys.
    pub fn resolved_flags(&self) -> ResolvedFlags {
        self.flags.resolve(&self.legacy_security)
    }

    /// Stamp missing fields in place.
    ///
    /// A claim carrying no flag information at all predates the flag
    /// system and migrates to fully open; any partial flag data is
    /// resolved through the normal chain and written back in both
    /// mirrored forms. Legacy root security keys are consumed and
    /// cleared. Missing buffer rules are stamped from the current rule.
    pub fn ensure_defaults(&mut self, current_buffer_rule: u32) {
        if self.id.as_str().is_empty() {
            return;
        }
        if self.name.is_empty() {
            self.name = self.id.as_str().to_owned();
        }
        if self.buffer_rule.is_none() {
            self.buffer_rule = Some(current_buffer_rule);
        }
        if self.flags.is_unset() && self.legacy_security.is_unset() {
            self.flags = FlagSet::open();
        } else {
            let resolved = self.resolved_flags();
            for action in stead_core::ActionKind::ALL {
                self.flags.set(action, resolved.allows(action));
            }
        }
        self.legacy_security.clear();
    }
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct NumVisitor;

    impl<'de> Visitor<'de> for NumVisitor {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number or numeric string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            Ok(v as i64)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
            Ok(v as i64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
            Ok(v.trim().parse::<f64>().unwrap_or(0.0) as i64)
        }

        fn visit_bool<E: de::Error>(self, _v: bool) -> Result<i64, E> {
            Ok(0)
        }

        fn visit_unit<E: de::Error>(self) -> Result<i64, E> {
            Ok(0)
        }
    }

    deserializer.deserialize_any(NumVisitor)
}

fn lenient_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_i64(deserializer)?.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_i64(deserializer)?.clamp(0, i64::from(u32::MAX)) as u32)
}

fn lenient_opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(lenient_u32(deserializer)?))
}
