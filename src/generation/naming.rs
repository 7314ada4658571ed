//! # Name Synthesis
//!
//! Genre-flavoured name construction. Prefixes come from the genre definition
//! itself; nouns, suffixes and personal-name syllables come from the style
//! tables here. All draws go through the caller's stream so a name is fully
//! determined by the object's sub-seed.

use crate::genre::GenreDefinition;
use crate::RarityTier;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Vocabulary family used to flavour nouns and personal names.
///
/// Every [`GenreDefinition`] carries one; blended genres inherit it from a
/// source genre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NamingStyle {
    /// Swords and sorcery
    #[default]
    Arcane,
    /// Starships and lasers
    Tech,
    /// Gothic dread
    Dread,
    /// Neon streets and chrome
    Street,
    /// Scavenged ruins
    Wasteland,
}

impl NamingStyle {
    pub const ALL: [NamingStyle; 5] = [
        NamingStyle::Arcane,
        NamingStyle::Tech,
        NamingStyle::Dread,
        NamingStyle::Street,
        NamingStyle::Wasteland,
    ];

    fn creatures(self) -> &'static [&'static str] {
        match self {
            NamingStyle::Arcane => &["Goblin", "Orc", "Troll", "Wraith", "Drake", "Golem", "Harpy"],
            NamingStyle::Tech => &["Drone", "Android", "Xenomorph", "Sentinel", "Mech", "Parasite"],
            NamingStyle::Dread => &["Ghoul", "Revenant", "Shade", "Abomination", "Husk", "Crawler"],
            NamingStyle::Street => &["Enforcer", "Cyborg", "Ganger", "Hunter-Killer", "Glitch", "Razorboy"],
            NamingStyle::Wasteland => &["Raider", "Mutant", "Radroach", "Scav", "Brute", "Feral"],
        }
    }

    fn roles(self) -> &'static [&'static str] {
        match self {
            NamingStyle::Arcane => &["Blacksmith", "Herbalist", "Innkeeper", "Sage", "Guard"],
            NamingStyle::Tech => &["Engineer", "Medic", "Pilot", "Quartermaster", "Officer"],
            NamingStyle::Dread => &["Gravedigger", "Priest", "Lamplighter", "Physician", "Widow"],
            NamingStyle::Street => &["Fixer", "Ripperdoc", "Netrunner", "Bartender", "Courier"],
            NamingStyle::Wasteland => &["Trader", "Mechanic", "Doc", "Water Seller", "Scout"],
        }
    }

    fn suffixes(self) -> &'static [&'static str] {
        match self {
            NamingStyle::Arcane => &["the Dawn", "Embers", "the Old Kings", "Frost", "Valor"],
            NamingStyle::Tech => &["the Void", "Entropy", "the Nebula", "Overclock", "the Core"],
            NamingStyle::Dread => &["Whispers", "the Grave", "Sorrow", "the Hollow", "Midnight"],
            NamingStyle::Street => &["the Grid", "Static", "Chrome", "the Undercity", "Neon"],
            NamingStyle::Wasteland => &["the Ashes", "Rust", "the Fallout", "Dust", "Salvage"],
        }
    }

    fn places(self) -> &'static [&'static str] {
        match self {
            NamingStyle::Arcane => &["Keep", "Woods", "Barrow", "Citadel", "Vale"],
            NamingStyle::Tech => &["Station", "Outpost", "Reactor", "Hangar", "Array"],
            NamingStyle::Dread => &["Manor", "Crypt", "Asylum", "Chapel", "Marsh"],
            NamingStyle::Street => &["Arcology", "Market", "Datacenter", "Sprawl", "Docks"],
            NamingStyle::Wasteland => &["Crater", "Junkyard", "Bunker", "Overpass", "Flats"],
        }
    }

    fn onsets(self) -> &'static [&'static str] {
        match self {
            NamingStyle::Arcane => &["Al", "Bor", "Cael", "Dra", "El", "Thal", "Myr"],
            NamingStyle::Tech => &["Ax", "Kor", "Ny", "Ze", "Vex", "Tal", "Ori"],
            NamingStyle::Dread => &["Mor", "Vel", "Ash", "Cor", "Grim", "Sil", "Ober"],
            NamingStyle::Street => &["Jax", "Ky", "Rin", "Zed", "Mika", "Lo", "Vee"],
            NamingStyle::Wasteland => &["Rus", "Cal", "Dex", "Gun", "Brak", "Sal", "Tuck"],
        }
    }

    fn codas(self) -> &'static [&'static str] {
        match self {
            NamingStyle::Arcane => &["dric", "wen", "ion", "ara", "mir", "eth"],
            NamingStyle::Tech => &["on", "ix", "ara", "en", "is", "ov"],
            NamingStyle::Dread => &["ick", "ora", "ith", "ane", "ius", "ell"],
            NamingStyle::Street => &["", "o", "ra", "ex", "ko", "i"],
            NamingStyle::Wasteland => &["ty", "o", "ker", "ner", "ie", "ss"],
        }
    }
}

/// Picks one entry uniformly, or `fallback` for an empty list.
pub fn pick<'a, R: Rng + ?Sized>(rng: &mut R, list: &'a [String], fallback: &'a str) -> &'a str {
    if list.is_empty() {
        return fallback;
    }
    &list[rng.gen_range(0..list.len())]
}

fn pick_static<R: Rng + ?Sized>(rng: &mut R, list: &'static [&'static str]) -> &'static str {
    list[rng.gen_range(0..list.len())]
}

/// A two-part personal name such as "Thalwen" or "Vexon".
pub fn person_name<R: Rng + ?Sized>(rng: &mut R, style: NamingStyle) -> String {
    let onset = pick_static(rng, style.onsets());
    let coda = pick_static(rng, style.codas());
    format!("{onset}{coda}")
}

/// Creature noun for a monster, boss or minion.
pub fn creature_noun<R: Rng + ?Sized>(rng: &mut R, style: NamingStyle) -> &'static str {
    pick_static(rng, style.creatures())
}

/// Occupation noun for a non-hostile character.
pub fn role_noun<R: Rng + ?Sized>(rng: &mut R, style: NamingStyle) -> &'static str {
    pick_static(rng, style.roles())
}

/// Item name built from a genre prefix, a base noun and, for rarer tiers, a
/// suffix or a maker's name.
pub fn item_name<R: Rng + ?Sized>(
    rng: &mut R,
    genre: &GenreDefinition,
    base_noun: &str,
    tier: RarityTier,
) -> String {
    let style = genre.naming_style;
    let prefix = pick(rng, &genre.item_prefixes, "Plain");
    match tier {
        RarityTier::Common | RarityTier::Uncommon => format!("{prefix} {base_noun}"),
        RarityTier::Rare | RarityTier::Epic => {
            let suffix = pick_static(rng, style.suffixes());
            format!("{prefix} {base_noun} of {suffix}")
        }
        RarityTier::Legendary => {
            let maker = person_name(rng, style);
            let suffix = pick_static(rng, style.suffixes());
            format!("{maker}'s {prefix} {base_noun} of {suffix}")
        }
    }
}

/// Place name such as "Shadowed Crypt".
pub fn location_name<R: Rng + ?Sized>(rng: &mut R, genre: &GenreDefinition) -> String {
    let style = genre.naming_style;
    let prefix = pick(rng, &genre.location_prefixes, "Forgotten");
    let place = pick_static(rng, style.places());
    format!("{prefix} {place}")
}

/// Thematic suffix used for quest and spell titles.
pub fn epithet<R: Rng + ?Sized>(rng: &mut R, style: NamingStyle) -> &'static str {
    pick_static(rng, style.suffixes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::utils::create_rng;
    use crate::GenreRegistry;

    #[test]
    fn test_base_genre_styles() {
        let registry = GenreRegistry::with_base_genres();
        let style = |id| registry.get(id).unwrap().naming_style;
        assert_eq!(style("fantasy"), NamingStyle::Arcane);
        assert_eq!(style("scifi"), NamingStyle::Tech);
        assert_eq!(style("horror"), NamingStyle::Dread);
        assert_eq!(style("cyberpunk"), NamingStyle::Street);
        assert_eq!(style("postapoc"), NamingStyle::Wasteland);
    }

    #[test]
    fn test_style_follows_definition_not_id() {
        // A custom genre with an unfamiliar id still gets its own vocabulary
        let registry = GenreRegistry::with_base_genres();
        let mut genre = registry.get("fantasy").unwrap().clone();
        genre.id = "starfarers".to_string();
        genre.naming_style = NamingStyle::Tech;
        for seed in 0..20 {
            let name = item_name(&mut create_rng(seed), &genre, "Rifle", RarityTier::Epic);
            assert!(
                NamingStyle::Tech.suffixes().iter().any(|s| name.ends_with(s)),
                "{name}"
            );
            let place = location_name(&mut create_rng(seed), &genre);
            assert!(NamingStyle::Tech.places().iter().any(|p| place.ends_with(p)));
        }
    }

    #[test]
    fn test_item_names_are_deterministic() {
        let registry = GenreRegistry::with_base_genres();
        let genre = registry.get("fantasy").unwrap();
        for tier in RarityTier::ALL {
            let a = item_name(&mut create_rng(11), genre, "Sword", tier);
            let b = item_name(&mut create_rng(11), genre, "Sword", tier);
            assert_eq!(a, b);
            assert!(a.contains("Sword"));
        }
    }

    #[test]
    fn test_rare_items_get_suffix() {
        let registry = GenreRegistry::with_base_genres();
        let genre = registry.get("horror").unwrap();
        let name = item_name(&mut create_rng(3), genre, "Dagger", RarityTier::Epic);
        assert!(name.contains(" of "));
        let name = item_name(&mut create_rng(3), genre, "Dagger", RarityTier::Legendary);
        assert!(name.contains("'s "));
    }

    #[test]
    fn test_pick_falls_back_on_empty_list() {
        let mut rng = create_rng(1);
        assert_eq!(pick(&mut rng, &[], "Plain"), "Plain");
    }

    #[test]
    fn test_person_name_not_empty() {
        let mut rng = create_rng(8);
        for style in NamingStyle::ALL {
            assert!(person_name(&mut rng, style).len() >= 2);
        }
    }
}
