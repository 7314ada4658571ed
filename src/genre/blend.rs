//! # Genre Blending
//!
//! Derives hybrid genres by weighted interpolation of two registered genres.
//!
//! - Colors are convex combinations with coefficient = blend weight.
//! - Themes are the deduplicated union, shuffled by the seed and truncated.
//! - Naming prefixes are drawn per slot with the same cumulative-weight draw
//!   the rarity engine uses, so low weights favour the primary genre and high
//!   weights the secondary.

use super::{GenreDefinition, GenreRegistry};
use crate::generation::utils::create_rng;
use crate::utils::{clamp_unit, cumulative_pick};
use crate::{config, ForgeResult, LookupError};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A named (primary, secondary, weight) triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PresetBlend {
    pub name: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
    pub weight: f64,
}

/// Static preset table.
pub const PRESET_BLENDS: [PresetBlend; 5] = [
    PresetBlend {
        name: "sci-fi-horror",
        primary: "scifi",
        secondary: "horror",
        weight: 0.5,
    },
    PresetBlend {
        name: "dark-fantasy",
        primary: "fantasy",
        secondary: "horror",
        weight: 0.3,
    },
    PresetBlend {
        name: "cyber-horror",
        primary: "cyberpunk",
        secondary: "horror",
        weight: 0.4,
    },
    PresetBlend {
        name: "post-apoc-scifi",
        primary: "postapoc",
        secondary: "scifi",
        weight: 0.5,
    },
    PresetBlend {
        name: "wasteland-fantasy",
        primary: "postapoc",
        secondary: "fantasy",
        weight: 0.6,
    },
];

/// All preset blends in table order.
pub fn presets() -> &'static [PresetBlend] {
    &PRESET_BLENDS
}

/// Looks up a preset by name.
pub fn preset(name: &str) -> Option<&'static PresetBlend> {
    PRESET_BLENDS.iter().find(|p| p.name == name)
}

/// A genre derived from two registered genres.
///
/// Holds the blended definition plus the ids of its sources. The sources
/// themselves stay owned by the registry and are resolved on demand through
/// [`BlendedGenre::base_genres`].
#[derive(Clone, Serialize)]
pub struct BlendedGenre {
    /// The blended definition, usable wherever a base genre is
    pub genre: GenreDefinition,
    /// Weight of the secondary genre in `[0, 1]`
    pub blend_weight: f64,
    pub primary_id: String,
    pub secondary_id: String,
    #[serde(skip)]
    registry: Arc<GenreRegistry>,
}

impl BlendedGenre {
    /// The two source definitions, resolved through the registry.
    pub fn base_genres(&self) -> ForgeResult<(&GenreDefinition, &GenreDefinition)> {
        Ok((
            self.registry.require(&self.primary_id)?,
            self.registry.require(&self.secondary_id)?,
        ))
    }

    /// The blended definition.
    pub fn definition(&self) -> &GenreDefinition {
        &self.genre
    }

    /// Whether the secondary genre dominates the blend.
    pub fn leans_secondary(&self) -> bool {
        self.blend_weight > 0.5
    }
}

impl PartialEq for BlendedGenre {
    fn eq(&self, other: &Self) -> bool {
        self.genre == other.genre
            && self.blend_weight == other.blend_weight
            && self.primary_id == other.primary_id
            && self.secondary_id == other.secondary_id
    }
}

impl fmt::Debug for BlendedGenre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlendedGenre")
            .field("genre", &self.genre)
            .field("blend_weight", &self.blend_weight)
            .field("primary_id", &self.primary_id)
            .field("secondary_id", &self.secondary_id)
            .finish_non_exhaustive()
    }
}

/// Produces blended genres from a shared registry.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use seedforge::{GenreBlender, GenreRegistry};
///
/// let blender = GenreBlender::new(Arc::new(GenreRegistry::with_base_genres()));
/// let blended = blender.blend("fantasy", "scifi", 0.25, 7).unwrap();
///
/// assert_eq!(blended.blend_weight, 0.25);
/// let (primary, secondary) = blended.base_genres().unwrap();
/// assert_eq!(primary.id, "fantasy");
/// assert_eq!(secondary.id, "scifi");
/// ```
#[derive(Debug, Clone)]
pub struct GenreBlender {
    registry: Arc<GenreRegistry>,
    theme_limit: usize,
}

impl GenreBlender {
    /// Creates a blender over a registry.
    pub fn new(registry: Arc<GenreRegistry>) -> Self {
        Self {
            registry,
            theme_limit: config::BLENDED_THEME_LIMIT,
        }
    }

    /// Changes how many themes a blend keeps.
    pub fn with_theme_limit(mut self, limit: usize) -> Self {
        self.theme_limit = limit;
        self
    }

    /// The registry this blender reads from.
    pub fn registry(&self) -> &Arc<GenreRegistry> {
        &self.registry
    }

    /// Blends two registered genres.
    ///
    /// `weight` is the share of the secondary genre; it is clamped into
    /// `[0, 1]` (NaN reads as zero) and stored as given after clamping. Fails
    /// only when either id is unknown.
    pub fn blend(
        &self,
        primary_id: &str,
        secondary_id: &str,
        weight: f64,
        seed: u64,
    ) -> ForgeResult<BlendedGenre> {
        let primary = self.registry.require(primary_id)?;
        let secondary = self.registry.require(secondary_id)?;
        let weight = clamp_unit(weight);

        log::debug!(
            "blending {} and {} at weight {} with seed {}",
            primary_id,
            secondary_id,
            weight,
            seed
        );

        let mut rng = create_rng(seed);
        let themes = self.blend_themes(primary, secondary, &mut rng);
        let entity_prefixes =
            blend_slots(&primary.entity_prefixes, &secondary.entity_prefixes, weight, &mut rng);
        let item_prefixes =
            blend_slots(&primary.item_prefixes, &secondary.item_prefixes, weight, &mut rng);
        let location_prefixes = blend_slots(
            &primary.location_prefixes,
            &secondary.location_prefixes,
            weight,
            &mut rng,
        );
        let naming_style = match cumulative_pick(rng.gen(), &[1.0 - weight, weight]) {
            0 => primary.naming_style,
            _ => secondary.naming_style,
        };

        let genre = GenreDefinition {
            id: blended_id(primary, secondary, weight),
            name: blended_name(primary, secondary, weight),
            description: blended_description(primary, secondary, weight),
            themes,
            primary_color: primary.primary_color.lerp(&secondary.primary_color, weight),
            secondary_color: primary
                .secondary_color
                .lerp(&secondary.secondary_color, weight),
            accent_color: primary.accent_color.lerp(&secondary.accent_color, weight),
            naming_style,
            entity_prefixes,
            item_prefixes,
            location_prefixes,
        };

        Ok(BlendedGenre {
            genre,
            blend_weight: weight,
            primary_id: primary.id.clone(),
            secondary_id: secondary.id.clone(),
            registry: Arc::clone(&self.registry),
        })
    }

    /// Resolves a named preset and blends it.
    pub fn create_preset_blend(&self, name: &str, seed: u64) -> ForgeResult<BlendedGenre> {
        let preset = preset(name).ok_or_else(|| LookupError::UnknownPreset(name.to_string()))?;
        self.blend(preset.primary, preset.secondary, preset.weight, seed)
    }

    fn blend_themes<R: Rng + ?Sized>(
        &self,
        primary: &GenreDefinition,
        secondary: &GenreDefinition,
        rng: &mut R,
    ) -> Vec<String> {
        let mut themes: Vec<String> = Vec::new();
        for theme in primary.themes.iter().chain(secondary.themes.iter()) {
            if !themes.contains(theme) {
                themes.push(theme.clone());
            }
        }
        themes.shuffle(rng);
        themes.truncate(self.theme_limit);
        themes
    }
}

/// Fills each prefix slot from the primary or secondary list.
///
/// Slot count follows the dominant source, so the endpoints reproduce one
/// list exactly. Each slot draws `[1 - w, w]` cumulatively.
fn blend_slots<R: Rng + ?Sized>(
    primary: &[String],
    secondary: &[String],
    weight: f64,
    rng: &mut R,
) -> Vec<String> {
    let slots = if weight <= 0.5 {
        primary.len()
    } else {
        secondary.len()
    };
    let weights = [1.0 - weight, weight];

    let mut blended = Vec::with_capacity(slots);
    for slot in 0..slots {
        let source = match cumulative_pick(rng.gen(), &weights) {
            0 if !primary.is_empty() => primary,
            _ if !secondary.is_empty() => secondary,
            _ => primary,
        };
        blended.push(source[slot % source.len()].clone());
    }
    blended
}

fn percent(weight: f64) -> u32 {
    (weight * 100.0).round() as u32
}

fn blended_id(primary: &GenreDefinition, secondary: &GenreDefinition, weight: f64) -> String {
    format!("{}-{}-{}", primary.id, secondary.id, percent(weight))
}

fn blended_name(primary: &GenreDefinition, secondary: &GenreDefinition, weight: f64) -> String {
    if weight < 0.5 {
        format!("{} with {} Elements", primary.name, secondary.name)
    } else if weight > 0.5 {
        format!("{} with {} Elements", secondary.name, primary.name)
    } else {
        format!("{}-{} Fusion", primary.name, secondary.name)
    }
}

fn blended_description(
    primary: &GenreDefinition,
    secondary: &GenreDefinition,
    weight: f64,
) -> String {
    format!(
        "A blend of {} ({}%) and {} ({}%). {} {}",
        primary.name,
        percent(1.0 - weight),
        secondary.name,
        percent(weight),
        primary.description,
        secondary.description
    )
}
