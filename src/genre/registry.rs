//! # Genre Registry
//!
//! Immutable catalog of base genres, looked up by id.

use super::{Color, GenreDefinition};
use crate::generation::NamingStyle;
use crate::{ForgeResult, LookupError};
use std::collections::HashMap;

/// Read-only table of genre definitions.
///
/// Build it once, wrap it in an `Arc`, and hand clones of that handle to
/// every generator and blender. Listing order is insertion order and never
/// changes.
///
/// # Examples
///
/// ```
/// use seedforge::GenreRegistry;
///
/// let registry = GenreRegistry::with_base_genres();
/// assert_eq!(registry.get("fantasy").unwrap().name, "Fantasy");
/// assert!(registry.get("western").is_none());
/// assert_eq!(registry.all()[0].id, "fantasy");
/// ```
#[derive(Debug, Clone, Default)]
pub struct GenreRegistry {
    genres: Vec<GenreDefinition>,
    index: HashMap<String, usize>,
}

impl GenreRegistry {
    /// Builds a registry from definitions; later duplicates of an id are
    /// ignored.
    pub fn from_definitions(definitions: impl IntoIterator<Item = GenreDefinition>) -> Self {
        let mut registry = Self::default();
        for definition in definitions {
            if registry.index.contains_key(&definition.id) {
                log::warn!("ignoring duplicate genre id {}", definition.id);
                continue;
            }
            registry
                .index
                .insert(definition.id.clone(), registry.genres.len());
            registry.genres.push(definition);
        }
        registry
    }

    /// Registry holding the five base genres.
    pub fn with_base_genres() -> Self {
        Self::from_definitions(base_genres())
    }

    /// Looks up a genre by id.
    pub fn get(&self, id: &str) -> Option<&GenreDefinition> {
        self.index.get(id).map(|&i| &self.genres[i])
    }

    /// Looks up a genre by id, failing with a lookup error.
    pub fn require(&self, id: &str) -> ForgeResult<&GenreDefinition> {
        self.get(id)
            .ok_or_else(|| LookupError::UnknownGenre(id.to_string()).into())
    }

    /// Whether a genre id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All definitions in stable order.
    pub fn all(&self) -> &[GenreDefinition] {
        &self.genres
    }

    /// All ids in stable order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.genres.iter().map(|g| g.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn genre(
    id: &str,
    name: &str,
    description: &str,
    themes: &[&str],
    colors: [Color; 3],
    naming_style: NamingStyle,
    entity_prefixes: &[&str],
    item_prefixes: &[&str],
    location_prefixes: &[&str],
) -> GenreDefinition {
    let [primary_color, secondary_color, accent_color] = colors;
    GenreDefinition {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        themes: strings(themes),
        primary_color,
        secondary_color,
        accent_color,
        naming_style,
        entity_prefixes: strings(entity_prefixes),
        item_prefixes: strings(item_prefixes),
        location_prefixes: strings(location_prefixes),
    }
}

/// The built-in base genres, in registry order.
pub fn base_genres() -> Vec<GenreDefinition> {
    vec![
        genre(
            "fantasy",
            "Fantasy",
            "Medieval realms of magic, monsters and ancient ruins.",
            &["magic", "medieval", "dragons", "knights", "ancient"],
            [
                Color::rgb(0x8B, 0x45, 0x13),
                Color::rgb(0xDA, 0xA5, 0x20),
                Color::rgb(0x22, 0x8B, 0x22),
            ],
            NamingStyle::Arcane,
            &["Elder", "Ancient", "Mystic", "Shadow", "Golden"],
            &["Enchanted", "Blessed", "Runed", "Elven", "Dwarven"],
            &["Castle", "Tower", "Forest", "Dragon's", "Kings'"],
        ),
        genre(
            "scifi",
            "Sci-Fi",
            "Distant stars, derelict stations and runaway technology.",
            &["technology", "space", "aliens", "robots", "future"],
            [
                Color::rgb(0x00, 0xCE, 0xD1),
                Color::rgb(0x1E, 0x90, 0xFF),
                Color::rgb(0xC0, 0xC0, 0xC0),
            ],
            NamingStyle::Tech,
            &["Cyber", "Quantum", "Nano", "Plasma", "Stellar"],
            &["Laser", "Photon", "Ion", "Fusion", "Neural"],
            &["Station", "Colony", "Orbital", "Deep", "Sector"],
        ),
        genre(
            "horror",
            "Horror",
            "Dread, decay and things that should not exist.",
            &["dark", "supernatural", "undead", "fear", "cursed"],
            [
                Color::rgb(0x8B, 0x00, 0x00),
                Color::rgb(0x2F, 0x4F, 0x4F),
                Color::rgb(0x69, 0x69, 0x69),
            ],
            NamingStyle::Dread,
            &["Cursed", "Twisted", "Rotting", "Haunted", "Blighted"],
            &["Bloodstained", "Bone", "Rusted", "Wailing", "Forsaken"],
            &["Abandoned", "Desecrated", "Shadowed", "Silent", "Hollow"],
        ),
        genre(
            "cyberpunk",
            "Cyberpunk",
            "Neon-lit megacities ruled by corporations and code.",
            &["technology", "urban", "corporate", "hacking", "neon"],
            [
                Color::rgb(0xFF, 0x00, 0xFF),
                Color::rgb(0x00, 0xFF, 0xFF),
                Color::rgb(0xFF, 0xFF, 0x00),
            ],
            NamingStyle::Street,
            &["Chrome", "Neon", "Synth", "Glitch", "Black-ICE"],
            &["Smart", "Cyber", "Holo", "Mono", "Street"],
            &["Neon", "Corporate", "Lower", "Downtown", "Grid"],
        ),
        genre(
            "postapoc",
            "Post-Apocalyptic",
            "The scavenged remains of a world that ended.",
            &["survival", "wasteland", "mutation", "scarcity", "ruins"],
            [
                Color::rgb(0xA0, 0x52, 0x2D),
                Color::rgb(0x80, 0x80, 0x00),
                Color::rgb(0xCD, 0x85, 0x3F),
            ],
            NamingStyle::Wasteland,
            &["Irradiated", "Feral", "Scarred", "Mutant", "Scrap"],
            &["Makeshift", "Salvaged", "Patched", "Jury-rigged", "Scorched"],
            &["Ruined", "Toxic", "Scorched", "Buried", "Forsaken"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ForgeError;

    #[test]
    fn test_base_registry_contents() {
        let registry = GenreRegistry::with_base_genres();
        assert_eq!(registry.len(), 5);
        let ids: Vec<&str> = registry.ids().collect();
        assert_eq!(ids, vec!["fantasy", "scifi", "horror", "cyberpunk", "postapoc"]);
        for genre in registry.all() {
            assert!(!genre.themes.is_empty());
            assert!(!genre.entity_prefixes.is_empty());
            assert!(!genre.item_prefixes.is_empty());
            assert!(!genre.location_prefixes.is_empty());
        }
    }

    #[test]
    fn test_require_unknown_genre() {
        let registry = GenreRegistry::with_base_genres();
        assert!(registry.require("horror").is_ok());
        assert_eq!(
            registry.require("western").unwrap_err(),
            ForgeError::Lookup(LookupError::UnknownGenre("western".to_string()))
        );
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let mut copy = base_genres()[0].clone();
        copy.name = "Impostor".to_string();
        let registry = GenreRegistry::from_definitions(base_genres().into_iter().chain([copy]));
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.get("fantasy").unwrap().name, "Fantasy");
    }

    #[test]
    fn test_registry_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GenreRegistry>();
    }
}
