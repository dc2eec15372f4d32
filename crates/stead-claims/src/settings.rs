//! Layered settings with lenient typed accessors.
//!
//! Settings arrive as JSON objects from more than one host store and
//! are merged in priority order, later layers overriding earlier ones.
//! Values have accumulated type drift over the years, so the typed
//! accessors coerce: integers accept floats and numeric strings,
//! booleans accept a handful of string spellings. Malformed values
//! degrade to the caller's default rather than erroring.

use serde_json::Value;
use stead_core::{ActionKind, Dimension};
use stead_space::{clamp_cell_size, Aabb, DEFAULT_CELL_SIZE};

/// Default required gap between claim edges, in blocks.
pub const DEFAULT_BUFFER_RULE: u32 = 200;
/// Default required gap between a claim edge and world spawn.
pub const DEFAULT_SPAWN_BUFFER: u32 = 300;
/// Default radius cap for a player's first base.
pub const DEFAULT_FIRST_BASE_CAP: u32 = 500;
/// Default radius cap for subsequent bases.
pub const DEFAULT_OTHER_BASE_CAP: u32 = 250;
/// Default maximum number of bases per player.
pub const DEFAULT_MAX_BASES: u32 = 3;

/// Merged view over the host's settings stores.
#[derive(Clone, Debug, Default)]
pub struct SettingsView {
    merged: serde_json::Map<String, Value>,
}

impl SettingsView {
    /// An empty view; every accessor returns its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge settings layers in ascending priority: keys in later
    /// layers override earlier ones. Layers that are not JSON objects
    /// are skipped.
    pub fn from_layers<'a>(layers: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut merged = serde_json::Map::new();
        for layer in layers {
            if let Value::Object(map) = layer {
                for (key, value) in map {
                    merged.insert(key.clone(), value.clone());
                }
            }
        }
        Self { merged }
    }

    /// The raw value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.merged.get(key)
    }

    /// Integer accessor with string/float coercion.
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(coerce_int).unwrap_or(default)
    }

    /// Non-negative integer accessor; negatives clamp to zero.
    pub fn get_u32(&self, key: &str, default: u32) -> u32 {
        self.get(key)
            .and_then(coerce_int)
            .map(|v| v.clamp(0, i64::from(u32::MAX)) as u32)
            .unwrap_or(default)
    }

    /// Boolean accessor accepting bools, numbers, and the string
    /// spellings "true", "1", "yes", "on" (case-insensitive).
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(coerce_bool).unwrap_or(default)
    }

    /// String accessor; non-string values yield `None`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(Value::String(s)) => Some(s.trim()),
            _ => None,
        }
    }

    /// The spacing rules for claim creation and resize.
    pub fn spacing_rules(&self) -> SpacingRules {
        SpacingRules {
            first_base_cap: self.get_u32("lc_first_base_radius_cap", DEFAULT_FIRST_BASE_CAP),
            other_base_cap: self.get_u32("lc_other_base_radius_cap", DEFAULT_OTHER_BASE_CAP),
            buffer: self.get_u32("lc_min_distance_between_bases", DEFAULT_BUFFER_RULE),
            max_bases: self.get_u32("lc_max_bases", DEFAULT_MAX_BASES),
            spawn_buffer: self.get_u32("lc_min_distance_from_spawn", DEFAULT_SPAWN_BUFFER),
        }
    }

    /// The configured grid cell size, clamped to the accepted range.
    pub fn cell_size(&self) -> u32 {
        clamp_cell_size(self.get_u32("lc_index_cell_size", DEFAULT_CELL_SIZE))
    }

    /// The spawn center for a dimension, if one is configured.
    ///
    /// Probes `worldspawn_<dim>` (plus the `worldspawn_the_end`
    /// spelling) before falling back to the unsuffixed legacy
    /// `worldspawn` key. The value is an "x y z" string; commas are
    /// tolerated. Only x and z are returned.
    pub fn spawn_center(&self, dimension: Dimension) -> Option<(i32, i32)> {
        let mut keys: Vec<String> = vec![format!("worldspawn_{}", dimension.key())];
        if dimension == Dimension::End {
            keys.push("worldspawn_the_end".to_owned());
        }
        keys.push("worldspawn".to_owned());
        for key in &keys {
            if let Some(raw) = self.get_str(key) {
                if raw.is_empty() {
                    continue;
                }
                let nums = parse_numbers(raw);
                if nums.len() >= 3 {
                    return Some((nums[0], nums[2]));
                }
            }
        }
        None
    }

    /// The spawn protection radius for a dimension, with legacy
    /// fallback to the unsuffixed key.
    pub fn spawn_radius(&self, dimension: Dimension) -> u32 {
        let per_dim = self.get_u32(&format!("spawn_protection_radius_{}", dimension.key()), 0);
        if per_dim > 0 {
            return per_dim;
        }
        if dimension == Dimension::End {
            let the_end = self.get_u32("spawn_protection_radius_the_end", 0);
            if the_end > 0 {
                return the_end;
            }
        }
        self.get_u32("spawn_protection_radius", 0)
    }

    /// The virtual spawn claim for a dimension: center, protection
    /// radius, and the three blocked-means-true security toggles.
    pub fn spawn_overlay(&self, dimension: Dimension) -> SpawnOverlay {
        let blocked = |action: ActionKind| {
            self.get_bool(
                &format!("spawn_security_{}_{}", dimension.key(), action.key()),
                false,
            )
        };
        SpawnOverlay {
            dimension,
            center: self.spawn_center(dimension),
            radius: self.spawn_radius(dimension),
            blocked_build: blocked(ActionKind::Build),
            blocked_interact: blocked(ActionKind::Interact),
            blocked_kill_passive: blocked(ActionKind::KillPassive),
        }
    }

    /// The free-build boxes configured for a dimension.
    ///
    /// Reads the structured `spawn_free_areas` map first, then imports
    /// the legacy single-area string `spawn_free_area_<dim>`: six
    /// numbers form a full box, four numbers are x1 z1 x2 z2 with the
    /// world's full vertical range filled in.
    pub fn free_areas(&self, dimension: Dimension) -> Vec<FreeArea> {
        let mut out = Vec::new();
        if let Some(Value::Object(root)) = self.get("spawn_free_areas") {
            for (raw_dim, areas) in root {
                if Dimension::from_name(raw_dim) != dimension {
                    continue;
                }
                let Value::Array(areas) = areas else { continue };
                for (idx, entry) in areas.iter().enumerate() {
                    if let Some(area) = parse_structured_area(entry, idx) {
                        out.push(area);
                    }
                }
            }
        }
        let legacy_key = format!("spawn_free_area_{}", dimension.key());
        if let Some(raw) = self.get_str(&legacy_key) {
            if let Some(bounds) = parse_legacy_area(raw) {
                out.push(FreeArea {
                    name: format!("Free Area {}", out.len() + 1),
                    bounds,
                });
            }
        }
        out
    }

    /// The admin roster, case-folded. Accepts a list of names, a
    /// comma-separated string, or a map whose keys are names.
    pub fn admins(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let mut push = |name: &str| {
            let folded = stead_core::identity::fold(name);
            if !folded.is_empty() && !out.contains(&folded) {
                out.push(folded);
            }
        };
        match self.get("admins") {
            Some(Value::Array(items)) => {
                for item in items {
                    if let Value::String(s) = item {
                        push(s);
                    }
                }
            }
            Some(Value::String(s)) => {
                for part in s.split(',') {
                    push(part);
                }
            }
            Some(Value::Object(map)) => {
                for key in map.keys() {
                    push(key);
                }
            }
            _ => {}
        }
        out
    }

    /// Whether `name` is on the admin roster, case-insensitive.
    pub fn is_admin(&self, name: &str) -> bool {
        let folded = stead_core::identity::fold(name);
        !folded.is_empty() && self.admins().contains(&folded)
    }
}

/// The per-creation and per-resize spacing rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpacingRules {
    /// Radius cap for a player's first base.
    pub first_base_cap: u32,
    /// Radius cap for every base after the first.
    pub other_base_cap: u32,
    /// Required gap between claim edges. Stamped onto new claims.
    pub buffer: u32,
    /// Maximum number of bases per player.
    pub max_bases: u32,
    /// Required gap between a claim edge and the spawn center.
    pub spawn_buffer: u32,
}

impl SpacingRules {
    /// The radius cap that applies when the owner already holds
    /// `other_bases` claims besides the one being sized.
    pub fn cap_for(&self, other_bases: usize) -> u32 {
        if other_bases == 0 {
            self.first_base_cap
        } else {
            self.other_base_cap
        }
    }
}

/// The virtual spawn claim of one dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnOverlay {
    /// The dimension this overlay covers.
    pub dimension: Dimension,
    /// Spawn center on the ground plane, if configured.
    pub center: Option<(i32, i32)>,
    /// Protection radius; zero disables the overlay.
    pub radius: u32,
    /// Whether building is blocked inside the radius.
    pub blocked_build: bool,
    /// Whether interaction is blocked inside the radius.
    pub blocked_interact: bool,
    /// Whether killing passive fauna is blocked inside the radius.
    pub blocked_kill_passive: bool,
}

impl SpawnOverlay {
    /// Whether `(x, z)` lies inside the protected radius. Always false
    /// when no center is configured or the radius is zero.
    pub fn contains(&self, x: i32, z: i32) -> bool {
        match self.center {
            Some((cx, cz)) if self.radius > 0 => {
                stead_space::geom::circle_contains(cx, cz, self.radius, x, z)
            }
            _ => false,
        }
    }

    /// Whether the overlay blocks `action` inside its radius.
    pub fn blocks(&self, action: ActionKind) -> bool {
        match action {
            ActionKind::Build => self.blocked_build,
            ActionKind::Interact => self.blocked_interact,
            ActionKind::KillPassive => self.blocked_kill_passive,
        }
    }

    /// Display label, "Overworld Spawn" and friends.
    pub fn label(&self) -> &'static str {
        self.dimension.spawn_label()
    }
}

/// One free-build box: inside it, every action is allowed for
/// everyone, regardless of spawn security.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FreeArea {
    /// Display name, defaulted to "Free Area N" when unnamed.
    pub name: String,
    /// The box, inclusive on all axes.
    pub bounds: Aabb,
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_f64().map(|f| f as i64),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f as i64),
        _ => None,
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_f64().unwrap_or(0.0) != 0.0),
        Value::String(s) => Some(matches!(
            s.trim().to_lowercase().as_str(),
            "true" | "1" | "yes" | "on"
        )),
        _ => None,
    }
}

fn parse_numbers(raw: &str) -> Vec<i32> {
    raw.replace(',', " ")
        .split_whitespace()
        .filter_map(|p| p.parse::<f64>().ok())
        .map(|f| f as i32)
        .collect()
}

fn parse_structured_area(entry: &Value, idx: usize) -> Option<FreeArea> {
    let obj = entry.as_object()?;
    let corner = |key: &str| -> Option<[i32; 3]> {
        let arr = obj.get(key)?.as_array()?;
        if arr.len() < 3 {
            return None;
        }
        Some([
            coerce_int(&arr[0])? as i32,
            coerce_int(&arr[1])? as i32,
            coerce_int(&arr[2])? as i32,
        ])
    };
    let a = corner("a")?;
    let b = corner("b")?;
    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| format!("Free Area {}", idx + 1));
    Some(FreeArea {
        name,
        bounds: Aabb::new(a, b),
    })
}

fn parse_legacy_area(raw: &str) -> Option<Aabb> {
    let nums = parse_numbers(raw);
    if nums.len() >= 6 {
        Some(Aabb::new(
            [nums[0], nums[1], nums[2]],
            [nums[3], nums[4], nums[5]],
        ))
    } else if nums.len() >= 4 {
        // Ground-only form: fill in the world's full vertical range.
        Some(Aabb::new([nums[0], -64, nums[1]], [nums[2], 320, nums[3]]))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn view(v: Value) -> SettingsView {
        SettingsView::from_layers([&v])
    }

    // ── Merge and coercion ──────────────────────────────────────────

    #[test]
    fn later_layers_override_earlier() {
        let base = json!({"lc_max_bases": 3, "lc_first_base_radius_cap": 500});
        let over = json!({"lc_max_bases": 5});
        let s = SettingsView::from_layers([&base, &over]);
        assert_eq!(s.get_int("lc_max_bases", 0), 5);
        assert_eq!(s.get_int("lc_first_base_radius_cap", 0), 500);
    }

    #[test]
    fn int_accessor_coerces_strings_and_floats() {
        let s = view(json!({"a": "250", "b": 99.9, "c": "nope"}));
        assert_eq!(s.get_int("a", 0), 250);
        assert_eq!(s.get_int("b", 0), 99);
        assert_eq!(s.get_int("c", 7), 7);
        assert_eq!(s.get_int("missing", 7), 7);
    }

    #[test]
    fn bool_accessor_accepts_string_spellings() {
        let s = view(json!({"a": true, "b": "Yes", "c": "off", "d": 1, "e": 0}));
        assert!(s.get_bool("a", false));
        assert!(s.get_bool("b", false));
        assert!(!s.get_bool("c", true));
        assert!(s.get_bool("d", false));
        assert!(!s.get_bool("e", true));
        assert!(s.get_bool("missing", true));
    }

    #[test]
    fn spacing_rules_use_documented_defaults() {
        let r = SettingsView::new().spacing_rules();
        assert_eq!(r.first_base_cap, 500);
        assert_eq!(r.other_base_cap, 250);
        assert_eq!(r.buffer, 200);
        assert_eq!(r.max_bases, 3);
        assert_eq!(r.spawn_buffer, 300);
        assert_eq!(r.cap_for(0), 500);
        assert_eq!(r.cap_for(2), 250);
    }

    #[test]
    fn cell_size_is_clamped() {
        assert_eq!(view(json!({"lc_index_cell_size": 4})).cell_size(), 16);
        assert_eq!(view(json!({"lc_index_cell_size": 999})).cell_size(), 256);
        assert_eq!(SettingsView::new().cell_size(), 64);
    }

    // ── Spawn config ────────────────────────────────────────────────

    #[test]
    fn spawn_center_prefers_per_dimension_keys() {
        let s = view(json!({
            "worldspawn": "0 64 0",
            "worldspawn_nether": "10, 64, -20",
        }));
        assert_eq!(s.spawn_center(Dimension::Nether), Some((10, -20)));
        assert_eq!(s.spawn_center(Dimension::Overworld), Some((0, 0)));
    }

    #[test]
    fn spawn_center_accepts_the_end_spelling() {
        let s = view(json!({"worldspawn_the_end": "5 70 5"}));
        assert_eq!(s.spawn_center(Dimension::End), Some((5, 5)));
    }

    #[test]
    fn unparseable_spawn_center_is_none() {
        let s = view(json!({"worldspawn_overworld": "here"}));
        assert_eq!(s.spawn_center(Dimension::Overworld), None);
    }

    #[test]
    fn spawn_radius_falls_back_to_legacy_key() {
        let s = view(json!({
            "spawn_protection_radius": 60,
            "spawn_protection_radius_nether": 30,
        }));
        assert_eq!(s.spawn_radius(Dimension::Nether), 30);
        assert_eq!(s.spawn_radius(Dimension::Overworld), 60);
        assert_eq!(s.spawn_radius(Dimension::End), 60);
    }

    #[test]
    fn overlay_without_center_contains_nothing() {
        let s = view(json!({"spawn_protection_radius_overworld": 100}));
        let overlay = s.spawn_overlay(Dimension::Overworld);
        assert!(!overlay.contains(0, 0));
    }

    #[test]
    fn overlay_radius_boundary_is_inclusive() {
        let s = view(json!({
            "worldspawn_overworld": "0 64 0",
            "spawn_protection_radius_overworld": 100,
            "spawn_security_overworld_build": true,
        }));
        let overlay = s.spawn_overlay(Dimension::Overworld);
        assert!(overlay.contains(100, 0));
        assert!(!overlay.contains(101, 0));
        assert!(overlay.blocks(ActionKind::Build));
        assert!(!overlay.blocks(ActionKind::Interact));
        assert_eq!(overlay.label(), "Overworld Spawn");
    }

    // ── Free areas ──────────────────────────────────────────────────

    #[test]
    fn structured_free_areas_are_parsed_per_dimension() {
        let s = view(json!({
            "spawn_free_areas": {
                "overworld": [
                    {"name": "Market", "a": [0, 60, 0], "b": [10, 80, 10]},
                    {"a": [100, 60, 100], "b": [90, 80, 90]},
                ],
                "nether": [{"a": [0, 0, 0], "b": [5, 5, 5]}],
            }
        }));
        let areas = s.free_areas(Dimension::Overworld);
        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].name, "Market");
        assert_eq!(areas[1].name, "Free Area 2");
        assert!(areas[1].bounds.contains(95, 70, 95));
        assert_eq!(s.free_areas(Dimension::Nether).len(), 1);
        assert!(s.free_areas(Dimension::End).is_empty());
    }

    #[test]
    fn legacy_free_area_strings_are_imported() {
        let s = view(json!({
            "spawn_free_area_overworld": "0, 60, 0, 10, 80, 10",
            "spawn_free_area_nether": "0 0 20 20",
        }));
        let ow = s.free_areas(Dimension::Overworld);
        assert_eq!(ow.len(), 1);
        assert!(ow[0].bounds.contains(5, 70, 5));
        let nether = s.free_areas(Dimension::Nether);
        assert_eq!(nether.len(), 1);
        assert!(nether[0].bounds.contains(10, -64, 10));
        assert!(nether[0].bounds.contains(10, 320, 10));
        assert!(!nether[0].bounds.contains(10, 321, 10));
    }

    #[test]
    fn malformed_free_area_entries_are_skipped() {
        let s = view(json!({
            "spawn_free_areas": {
                "overworld": [
                    {"a": [0, 0], "b": [10, 80, 10]},
                    "not an object",
                    {"a": [0, 60, 0], "b": [10, 80, 10]},
                ]
            }
        }));
        assert_eq!(s.free_areas(Dimension::Overworld).len(), 1);
    }

    // ── Admins ──────────────────────────────────────────────────────

    #[test]
    fn admin_roster_accepts_all_three_forms() {
        let list = view(json!({"admins": ["Alice", "BOB"]}));
        assert!(list.is_admin("alice"));
        assert!(list.is_admin("Bob"));
        assert!(!list.is_admin("carol"));

        let csv = view(json!({"admins": "Alice, Bob , "}));
        assert!(csv.is_admin("ALICE"));
        assert!(csv.is_admin("bob"));

        let map = view(json!({"admins": {"Alice": true, "Bob": 0}}));
        assert!(map.is_admin("alice"));
        assert!(map.is_admin("bob"));
    }

    #[test]
    fn empty_name_is_never_admin() {
        let s = view(json!({"admins": ["Alice"]}));
        assert!(!s.is_admin(""));
        assert!(!s.is_admin("   "));
    }
}
