//! # Entity Generation
//!
//! Procedural monsters, bosses, minions and non-player characters. Each
//! entity gets a size, a rarity tier, a stat block scaled by both, and a
//! derived hostility and threat score.

use super::naming;
use super::utils::{self, check_float, check_int, check_name, check_non_empty, violation};
use crate::generation::{ForgeRng, GenerationParams, Generator, PowerCurve, RarityTier, StatRange};
use crate::genre::{GenreDefinition, GenreRegistry};
use crate::utils::cumulative_pick;
use crate::{config, ForgeResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Role of an entity in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Monster,
    Boss,
    Minion,
    Npc,
    Merchant,
}

impl EntityType {
    /// Types drawn when no filter is given, with their weights.
    ///
    /// Merchants are left out; they come from the merchant generator.
    const DRAWN: [(EntityType, f64); 4] = [
        (EntityType::Monster, 0.65),
        (EntityType::Minion, 0.20),
        (EntityType::Npc, 0.10),
        (EntityType::Boss, 0.05),
    ];

    /// Whether entities of this type attack on sight.
    pub fn default_hostility(self) -> bool {
        match self {
            EntityType::Monster | EntityType::Boss | EntityType::Minion => true,
            EntityType::Npc | EntityType::Merchant => false,
        }
    }

    /// Health, damage and defense multipliers.
    fn profile(self) -> (f64, f64, f64) {
        match self {
            EntityType::Monster => (1.0, 1.0, 1.0),
            EntityType::Boss => (5.0, 2.0, 1.8),
            EntityType::Minion => (0.5, 0.6, 0.5),
            EntityType::Npc => (0.8, 0.3, 0.6),
            EntityType::Merchant => (0.9, 0.2, 0.8),
        }
    }
}

/// Body size; trades speed for bulk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntitySize {
    Tiny,
    Small,
    Medium,
    Large,
    Huge,
}

impl EntitySize {
    pub const ALL: [EntitySize; 5] = [
        EntitySize::Tiny,
        EntitySize::Small,
        EntitySize::Medium,
        EntitySize::Large,
        EntitySize::Huge,
    ];

    /// Health and speed multipliers.
    fn profile(self) -> (f64, f64) {
        match self {
            EntitySize::Tiny => (0.5, 1.5),
            EntitySize::Small => (0.75, 1.25),
            EntitySize::Medium => (1.0, 1.0),
            EntitySize::Large => (1.5, 0.8),
            EntitySize::Huge => (2.2, 0.6),
        }
    }

    fn adjective(self) -> &'static str {
        match self {
            EntitySize::Tiny => "tiny",
            EntitySize::Small => "small",
            EntitySize::Medium => "man-sized",
            EntitySize::Large => "large",
            EntitySize::Huge => "towering",
        }
    }
}

/// Rolled entity statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityStats {
    pub level: i32,
    pub health: i32,
    pub max_health: i32,
    pub damage: i32,
    pub defense: i32,
    /// Movement speed relative to a medium entity
    pub speed: f64,
}

/// A generated creature or character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedEntity {
    pub name: String,
    pub entity_type: EntityType,
    pub size: EntitySize,
    pub rarity: RarityTier,
    pub stats: EntityStats,
    pub hostile: bool,
    pub tags: Vec<String>,
    pub description: String,
    /// Sub-seed this entity was generated from
    pub seed: u64,
}

impl GeneratedEntity {
    pub fn is_hostile(&self) -> bool {
        self.hostile
    }

    pub fn is_boss(&self) -> bool {
        self.entity_type == EntityType::Boss
    }

    /// Combat danger in `[0, 100]`.
    ///
    /// Weighted sum of level, damage, defense and max health, clamped.
    pub fn threat_level(&self) -> i32 {
        threat_score(&self.stats)
    }
}

/// Threat score of a stat block in `[0, 100]`.
pub fn threat_score(stats: &EntityStats) -> i32 {
    let raw = f64::from(stats.level) * 1.5
        + f64::from(stats.damage) * 0.8
        + f64::from(stats.defense) * 0.5
        + f64::from(stats.max_health) * 0.05;
    raw.round().clamp(0.0, 100.0) as i32
}

const HEALTH_RANGE: StatRange = StatRange {
    low_frac: 0.9,
    high_frac: 1.1,
};
const ATTACK_RANGE: StatRange = StatRange {
    low_frac: 0.8,
    high_frac: 1.2,
};
const ARMOR_RANGE: StatRange = StatRange {
    low_frac: 0.4,
    high_frac: 0.7,
};
const SPEED_RANGE: StatRange = StatRange {
    low_frac: 0.9,
    high_frac: 1.1,
};

/// Generates monsters, bosses, minions and NPCs.
#[derive(Debug, Clone)]
pub struct EntityGenerator {
    registry: Arc<GenreRegistry>,
    curve: PowerCurve,
}

impl EntityGenerator {
    /// Creates an entity generator using the default power curve.
    pub fn new(registry: Arc<GenreRegistry>) -> Self {
        Self {
            registry,
            curve: PowerCurve::default(),
        }
    }

    /// Replaces the power curve.
    pub fn with_curve(mut self, curve: PowerCurve) -> Self {
        self.curve = curve;
        self
    }

    /// Regenerates a single entity from its stored sub-seed.
    pub fn generate_one(
        &self,
        seed: u64,
        params: &GenerationParams<EntityType>,
    ) -> ForgeResult<GeneratedEntity> {
        let genre = self.registry.require(&params.genre_id)?;
        Ok(self.build_entity(seed, params, genre, params.type_filter))
    }

    pub(crate) fn build_entity(
        &self,
        seed: u64,
        params: &GenerationParams<EntityType>,
        genre: &GenreDefinition,
        entity_type: Option<EntityType>,
    ) -> GeneratedEntity {
        let mut rng = utils::create_rng(seed);
        let depth = params.clamped_depth();
        let difficulty = params.clamped_difficulty();

        let entity_type = match entity_type {
            Some(entity_type) => entity_type,
            None => draw_type(&mut rng),
        };
        let size = match entity_type {
            EntityType::Boss => EntitySize::ALL[rng.gen_range(3..EntitySize::ALL.len())],
            EntityType::Minion => EntitySize::ALL[rng.gen_range(0..3)],
            _ => EntitySize::ALL[rng.gen_range(0..EntitySize::ALL.len())],
        };
        let mut rarity = self.curve.distribution(depth, difficulty).draw(&mut rng);
        if entity_type == EntityType::Boss {
            rarity = rarity.at_least(RarityTier::Rare);
        }

        let budget = self.curve.budget(depth, difficulty, rarity);
        let stats = self.roll_stats(&mut rng, entity_type, size, rarity, budget, depth);
        let name = entity_name(&mut rng, genre, entity_type, rarity);

        let mut tags = vec![
            genre.id.clone(),
            format!("{entity_type:?}").to_lowercase(),
            format!("{size:?}").to_lowercase(),
        ];
        if rarity >= RarityTier::Epic {
            tags.push("elite".to_string());
        }

        let hostile = entity_type.default_hostility();
        let description = format!(
            "A {} {} {} of the {} world, level {}{}.",
            size.adjective(),
            rarity.as_str().to_lowercase(),
            format!("{entity_type:?}").to_lowercase(),
            genre.name,
            stats.level,
            if hostile { ", hostile on sight" } else { "" }
        );
        log::trace!("entity {} (seed {seed}): {:?} {}", name, entity_type, rarity);

        GeneratedEntity {
            name,
            entity_type,
            size,
            rarity,
            stats,
            hostile,
            tags,
            description,
            seed,
        }
    }

    fn roll_stats(
        &self,
        rng: &mut ForgeRng,
        entity_type: EntityType,
        size: EntitySize,
        rarity: RarityTier,
        budget: f64,
        depth: u32,
    ) -> EntityStats {
        let (health_mult, damage_mult, defense_mult) = entity_type.profile();
        let (size_health, size_speed) = size.profile();

        let level = self
            .curve
            .required_level(depth, rarity)
            .saturating_add(rng.gen_range(0..=2));
        let max_health = HEALTH_RANGE
            .roll_int(rng, budget * 5.0 * health_mult * size_health)
            .max(1);

        EntityStats {
            level,
            health: max_health,
            max_health,
            damage: ATTACK_RANGE.roll_int(rng, budget * damage_mult),
            defense: ARMOR_RANGE.roll_int(rng, budget * defense_mult),
            speed: SPEED_RANGE.roll_float(rng, size_speed),
        }
    }
}

fn draw_type(rng: &mut ForgeRng) -> EntityType {
    let weights = EntityType::DRAWN.map(|(_, weight)| weight);
    EntityType::DRAWN[cumulative_pick(rng.gen(), &weights)].0
}

fn entity_name(
    rng: &mut ForgeRng,
    genre: &GenreDefinition,
    entity_type: EntityType,
    rarity: RarityTier,
) -> String {
    let style = genre.naming_style;
    match entity_type {
        EntityType::Npc | EntityType::Merchant => {
            let person = naming::person_name(rng, style);
            let role = if entity_type == EntityType::Merchant {
                "Merchant"
            } else {
                naming::role_noun(rng, style)
            };
            format!("{person} the {role}")
        }
        EntityType::Boss => {
            let person = naming::person_name(rng, style);
            let prefix = naming::pick(rng, &genre.entity_prefixes, "Dread");
            let creature = naming::creature_noun(rng, style);
            format!("{person}, {prefix} {creature} Lord")
        }
        EntityType::Monster | EntityType::Minion => {
            let prefix = naming::pick(rng, &genre.entity_prefixes, "Wild");
            let creature = naming::creature_noun(rng, style);
            match (entity_type, rarity >= RarityTier::Epic) {
                (EntityType::Minion, _) => format!("{prefix} {creature} Spawn"),
                (_, true) => format!("{prefix} {creature} Champion"),
                _ => format!("{prefix} {creature}"),
            }
        }
    }
}

/// Validates one entity; shared with the merchant generator.
pub(crate) fn validate_entity(
    generator: &'static str,
    index: usize,
    entity: &GeneratedEntity,
) -> ForgeResult<()> {
    check_name(generator, index, &entity.name)?;
    let name = entity.name.as_str();
    let stats = &entity.stats;

    check_int(generator, index, name, "level", stats.level)?;
    check_int(generator, index, name, "health", stats.health)?;
    check_int(generator, index, name, "max_health", stats.max_health)?;
    check_int(generator, index, name, "damage", stats.damage)?;
    check_int(generator, index, name, "defense", stats.defense)?;
    check_float(generator, index, name, "speed", stats.speed)?;

    if stats.level == 0 {
        return Err(violation(generator, index, name, "level must be at least 1"));
    }
    if stats.max_health == 0 || stats.health > stats.max_health {
        return Err(violation(
            generator,
            index,
            name,
            "health must be within 1..=max_health",
        ));
    }
    if entity.entity_type == EntityType::Boss && entity.rarity < RarityTier::Rare {
        return Err(violation(generator, index, name, "boss rarity below Rare"));
    }
    Ok(())
}

impl Generator for EntityGenerator {
    type Output = GeneratedEntity;
    type Filter = EntityType;

    fn generate(
        &self,
        seed: u64,
        params: &GenerationParams<EntityType>,
    ) -> ForgeResult<Vec<GeneratedEntity>> {
        let genre = self.registry.require(&params.genre_id)?;
        let count = params.count_or(config::DEFAULT_ENTITY_COUNT);
        log::debug!(
            "generating {} entities with seed {} (depth {}, difficulty {}, genre {})",
            count,
            seed,
            params.depth,
            params.difficulty,
            params.genre_id
        );

        Ok((0..count as u64)
            .map(|i| {
                self.build_entity(utils::derive_seed(seed, i), params, genre, params.type_filter)
            })
            .collect())
    }

    fn validate(
        &self,
        entities: &[GeneratedEntity],
        params: &GenerationParams<EntityType>,
    ) -> ForgeResult<()> {
        let generator = self.generator_type();
        check_non_empty(generator, entities, params.count_or(config::DEFAULT_ENTITY_COUNT))?;

        for (index, entity) in entities.iter().enumerate() {
            validate_entity(generator, index, entity)?;
            if let Some(filter) = params.type_filter {
                if entity.entity_type != filter {
                    return Err(violation(
                        generator,
                        index,
                        &entity.name,
                        format!("{:?} does not match filter {:?}", entity.entity_type, filter),
                    ));
                }
            }
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "EntityGenerator"
    }
}
