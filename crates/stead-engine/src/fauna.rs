//! Hostile/passive classification for the kill-passive gate.
//!
//! The gate only protects passive, non-player entities. Hostility is
//! decided from a fixed vocabulary: the entity's family tags are
//! checked against the hostile keys first, then the type identifier is
//! substring-matched, with passive hints short-circuiting the
//! substring pass so that, for example, a "cave_spider_jockey_chicken"
//! style compound id never misclassifies livestock.

use stead_core::EntityAdapter;

/// Family tags and type-id fragments that mark an entity hostile.
pub const MONSTER_KEYS: [&str; 34] = [
    "monster",
    "hostile",
    "undead",
    "arthropod",
    "illager",
    "raider",
    "zombie",
    "husk",
    "drowned",
    "skeleton",
    "stray",
    "creeper",
    "spider",
    "cave_spider",
    "enderman",
    "slime",
    "magma_cube",
    "blaze",
    "guardian",
    "elder_guardian",
    "witch",
    "phantom",
    "wither",
    "warden",
    "shulker",
    "ghast",
    "piglin",
    "hoglin",
    "zoglin",
    "piglin_brute",
    "vindicator",
    "pillager",
    "evoker",
    "ravager",
];

/// Type-id fragments that force an entity to classify as passive.
pub const PASSIVE_HINTS: [&str; 24] = [
    "cow",
    "chicken",
    "sheep",
    "pig",
    "horse",
    "donkey",
    "mule",
    "llama",
    "camel",
    "mooshroom",
    "rabbit",
    "turtle",
    "bee",
    "cat",
    "wolf",
    "fox",
    "sniffer",
    "villager",
    "iron_golem",
    "snow_golem",
    "parrot",
    "axolotl",
    "salmon",
    "cod",
];

/// Whether the entity classifies as hostile.
///
/// Family tags win outright. When no family tag matches, the type
/// identifier is scanned: a passive hint anywhere in it classifies
/// the entity passive before any hostile fragment is considered.
pub fn is_hostile(entity: &dyn EntityAdapter) -> bool {
    for family in entity.families() {
        let family = family.trim().to_lowercase();
        if MONSTER_KEYS.contains(&family.as_str()) {
            return true;
        }
    }
    let type_id = entity.type_id().trim().to_lowercase();
    if type_id.is_empty() {
        return false;
    }
    if PASSIVE_HINTS.iter().any(|hint| type_id.contains(hint)) {
        return false;
    }
    MONSTER_KEYS.iter().any(|key| type_id.contains(key))
}

/// Whether the kill-passive gate applies to this victim at all.
///
/// Players and hostile entities are exempt before any ownership or
/// flag resolution runs.
pub fn is_gated_victim(entity: &dyn EntityAdapter) -> bool {
    !entity.is_player() && !is_hostile(entity)
}
