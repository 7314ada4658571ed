//! # Spell Generation
//!
//! Spells combine a type, an element and a target pattern with a stat block
//! rolled against the shared power budget.

use super::naming;
use super::utils::{self, check_float, check_int, check_name, check_non_empty, violation};
use crate::generation::{
    ForgeRng, GenerationParams, Generator, PowerCurve, RarityTier, StatRange,
};
use crate::genre::{GenreDefinition, GenreRegistry};
use crate::{config, ForgeResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpellType {
    Offensive,
    Defensive,
    Healing,
    Buff,
    Debuff,
    Utility,
    Summon,
}

impl SpellType {
    pub const ALL: [SpellType; 7] = [
        SpellType::Offensive,
        SpellType::Defensive,
        SpellType::Healing,
        SpellType::Buff,
        SpellType::Debuff,
        SpellType::Utility,
        SpellType::Summon,
    ];

    /// Target patterns a spell of this type may use.
    fn patterns(self) -> &'static [TargetPattern] {
        use TargetPattern::*;
        match self {
            SpellType::Offensive => &[Single, Line, Cone, Circle],
            SpellType::Defensive => &[SelfTarget, Single],
            SpellType::Healing => &[SelfTarget, Single, Circle],
            SpellType::Buff => &[SelfTarget, Single, Circle],
            SpellType::Debuff => &[Single, Cone, Circle],
            SpellType::Utility => &[SelfTarget, Single, Line],
            SpellType::Summon => &[Single, Circle],
        }
    }

    fn nouns(self) -> &'static [&'static str] {
        match self {
            SpellType::Offensive => &["Bolt", "Lance", "Burst", "Strike", "Nova"],
            SpellType::Defensive => &["Ward", "Barrier", "Aegis", "Shell"],
            SpellType::Healing => &["Mending", "Renewal", "Balm", "Restoration"],
            SpellType::Buff => &["Blessing", "Surge", "Empowerment", "Haste"],
            SpellType::Debuff => &["Curse", "Hex", "Blight", "Snare"],
            SpellType::Utility => &["Step", "Sight", "Veil", "Beacon"],
            SpellType::Summon => &["Familiar", "Conjuring", "Servitor", "Legion"],
        }
    }

    /// Whether effects of this type linger after the cast.
    fn lasting(self) -> bool {
        matches!(
            self,
            SpellType::Defensive | SpellType::Buff | SpellType::Debuff | SpellType::Summon
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    Fire,
    Ice,
    Lightning,
    Earth,
    Poison,
    Holy,
    Shadow,
    Arcane,
}

impl ElementType {
    pub const ALL: [ElementType; 8] = [
        ElementType::Fire,
        ElementType::Ice,
        ElementType::Lightning,
        ElementType::Earth,
        ElementType::Poison,
        ElementType::Holy,
        ElementType::Shadow,
        ElementType::Arcane,
    ];

    pub fn adjective(self) -> &'static str {
        match self {
            ElementType::Fire => "Searing",
            ElementType::Ice => "Frozen",
            ElementType::Lightning => "Crackling",
            ElementType::Earth => "Stone",
            ElementType::Poison => "Venomous",
            ElementType::Holy => "Radiant",
            ElementType::Shadow => "Umbral",
            ElementType::Arcane => "Arcane",
        }
    }
}

/// Shape of the area a spell affects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetPattern {
    /// Affects only the caster
    SelfTarget,
    Single,
    Line,
    Cone,
    Circle,
}

impl TargetPattern {
    /// Whether the pattern covers an area and so needs a positive area size.
    pub fn is_area(self) -> bool {
        matches!(
            self,
            TargetPattern::Line | TargetPattern::Cone | TargetPattern::Circle
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellStats {
    pub damage: i32,
    pub healing: i32,
    pub mana_cost: i32,
    /// Seconds before the spell can be cast again
    pub cooldown: f64,
    /// Seconds to cast
    pub cast_time: f64,
    pub range: f64,
    /// Radius or length of the affected area; zero for non-area patterns
    pub area_size: f64,
    /// Seconds the effect lasts; zero for instant spells
    pub duration: f64,
    pub required_level: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSpell {
    pub name: String,
    pub spell_type: SpellType,
    pub element: ElementType,
    pub target_pattern: TargetPattern,
    pub rarity: RarityTier,
    pub stats: SpellStats,
    pub tags: Vec<String>,
    pub description: String,
    pub seed: u64,
}

impl GeneratedSpell {
    /// Reduces the stat block to a score in `0..=100`.
    ///
    /// Output (damage, healing, area, duration, range) raises the score;
    /// cooldown and cast time lower it.
    pub fn power_level(&self) -> i32 {
        let stats = &self.stats;
        let raw = f64::from(stats.damage) * 0.6
            + f64::from(stats.healing) * 0.5
            + stats.area_size * 3.0
            + stats.duration * 0.8
            + stats.range * 0.2
            + f64::from(stats.required_level) * 0.5
            - stats.cooldown * 0.5
            - stats.cast_time * 2.0;
        if raw.is_nan() {
            return 0;
        }
        raw.round().clamp(0.0, 100.0) as i32
    }

    /// Whether the spell harms its targets.
    pub fn is_offensive(&self) -> bool {
        matches!(self.spell_type, SpellType::Offensive | SpellType::Debuff)
    }

    /// Whether the spell aids the caster or allies.
    pub fn is_support(&self) -> bool {
        matches!(
            self.spell_type,
            SpellType::Healing | SpellType::Buff | SpellType::Defensive
        )
    }
}

const OUTPUT_RANGE: StatRange = StatRange {
    low_frac: 0.8,
    high_frac: 1.2,
};
const TIMING_RANGE: StatRange = StatRange {
    low_frac: 0.75,
    high_frac: 1.25,
};

/// Generates spells of every school.
#[derive(Debug, Clone)]
pub struct SpellGenerator {
    registry: Arc<GenreRegistry>,
    curve: PowerCurve,
}

impl SpellGenerator {
    /// Creates a spell generator using the default power curve.
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

    /// Regenerates a single spell from its stored sub-seed.
    pub fn generate_one(
        &self,
        seed: u64,
        params: &GenerationParams<SpellType>,
    ) -> ForgeResult<GeneratedSpell> {
        let genre = self.registry.require(&params.genre_id)?;
        Ok(self.build_spell(seed, params, genre))
    }

    fn build_spell(
        &self,
        seed: u64,
        params: &GenerationParams<SpellType>,
        genre: &GenreDefinition,
    ) -> GeneratedSpell {
        let mut rng = utils::create_rng(seed);
        let depth = params.clamped_depth();
        let difficulty = params.clamped_difficulty();

        let spell_type = match params.type_filter {
            Some(spell_type) => spell_type,
            None => SpellType::ALL[rng.gen_range(0..SpellType::ALL.len())],
        };
        let element = ElementType::ALL[rng.gen_range(0..ElementType::ALL.len())];
        let patterns = spell_type.patterns();
        let target_pattern = patterns[rng.gen_range(0..patterns.len())];
        let rarity = self.curve.distribution(depth, difficulty).draw(&mut rng);
        let budget = self.curve.budget(depth, difficulty, rarity);

        let stats = self.roll_stats(&mut rng, spell_type, target_pattern, rarity, budget, depth);
        let name = spell_name(&mut rng, genre, spell_type, element, rarity);

        let tags = vec![
            genre.id.clone(),
            format!("{spell_type:?}").to_lowercase(),
            format!("{element:?}").to_lowercase(),
            rarity.as_str().to_lowercase(),
        ];
        let description = format!(
            "{} {:?} magic ({}) from the {} world, costing {} mana.",
            rarity.as_str(),
            spell_type,
            describe_pattern(target_pattern),
            genre.name,
            stats.mana_cost
        );
        log::trace!("spell {} (seed {seed}): {:?} {:?} {}", name, spell_type, element, rarity);

        GeneratedSpell {
            name,
            spell_type,
            element,
            target_pattern,
            rarity,
            stats,
            tags,
            description,
            seed,
        }
    }

    fn roll_stats(
        &self,
        rng: &mut ForgeRng,
        spell_type: SpellType,
        pattern: TargetPattern,
        rarity: RarityTier,
        budget: f64,
        depth: u32,
    ) -> SpellStats {
        let damage = match spell_type {
            SpellType::Offensive => OUTPUT_RANGE.roll_int(rng, budget * 1.2).max(1),
            SpellType::Debuff => OUTPUT_RANGE.roll_int(rng, budget * 0.3),
            _ => 0,
        };
        let healing = match spell_type {
            SpellType::Healing => OUTPUT_RANGE.roll_int(rng, budget * 1.5).max(1),
            _ => 0,
        };
        let area_size = if pattern.is_area() {
            OUTPUT_RANGE
                .roll_float(rng, 2.0 + rarity.index() as f64)
                .max(0.5)
        } else {
            0.0
        };
        let duration = if spell_type.lasting() {
            TIMING_RANGE.roll_float(rng, 5.0 + budget * 0.1)
        } else {
            0.0
        };
        let range = match pattern {
            TargetPattern::SelfTarget => 0.0,
            _ => TIMING_RANGE.roll_float(rng, 8.0 + rarity.index() as f64 * 2.0),
        };

        SpellStats {
            damage,
            healing,
            mana_cost: OUTPUT_RANGE.roll_int(rng, 5.0 + budget * 0.6).max(1),
            // Stronger tiers recharge faster
            cooldown: TIMING_RANGE.roll_float(rng, 12.0 / self.curve.tier_multiplier(rarity)),
            cast_time: TIMING_RANGE.roll_float(rng, 1.5),
            range,
            area_size,
            duration,
            required_level: self.curve.required_level(depth, rarity),
        }
    }
}

fn spell_name(
    rng: &mut ForgeRng,
    genre: &GenreDefinition,
    spell_type: SpellType,
    element: ElementType,
    rarity: RarityTier,
) -> String {
    let style = genre.naming_style;
    let nouns = spell_type.nouns();
    let noun = nouns[rng.gen_range(0..nouns.len())];
    let base = format!("{} {}", element.adjective(), noun);
    match rarity {
        RarityTier::Common | RarityTier::Uncommon => base,
        RarityTier::Rare | RarityTier::Epic => {
            format!("{} of {}", base, naming::epithet(rng, style))
        }
        RarityTier::Legendary => {
            let author = naming::person_name(rng, style);
            format!("{}'s {} of {}", author, base, naming::epithet(rng, style))
        }
    }
}

fn describe_pattern(pattern: TargetPattern) -> &'static str {
    match pattern {
        TargetPattern::SelfTarget => "affects the caster",
        TargetPattern::Single => "single target",
        TargetPattern::Line => "strikes along a line",
        TargetPattern::Cone => "fills a cone",
        TargetPattern::Circle => "fills a circle",
    }
}

impl Generator for SpellGenerator {
    type Output = GeneratedSpell;
    type Filter = SpellType;

    fn generate(
        &self,
        seed: u64,
        params: &GenerationParams<SpellType>,
    ) -> ForgeResult<Vec<GeneratedSpell>> {
        let genre = self.registry.require(&params.genre_id)?;
        let count = params.count_or(config::DEFAULT_SPELL_COUNT);
        log::debug!(
            "generating {} spells with seed {} (depth {}, difficulty {}, genre {})",
            count,
            seed,
            params.depth,
            params.difficulty,
            params.genre_id
        );

        Ok((0..count as u64)
            .map(|i| self.build_spell(utils::derive_seed(seed, i), params, genre))
            .collect())
    }

    fn validate(
        &self,
        spells: &[GeneratedSpell],
        params: &GenerationParams<SpellType>,
    ) -> ForgeResult<()> {
        let generator = self.generator_type();
        check_non_empty(generator, spells, params.count_or(config::DEFAULT_SPELL_COUNT))?;

        for (index, spell) in spells.iter().enumerate() {
            check_name(generator, index, &spell.name)?;
            let name = spell.name.as_str();
            let stats = &spell.stats;

            check_int(generator, index, name, "damage", stats.damage)?;
            check_int(generator, index, name, "healing", stats.healing)?;
            check_int(generator, index, name, "mana_cost", stats.mana_cost)?;
            check_float(generator, index, name, "cooldown", stats.cooldown)?;
            check_float(generator, index, name, "cast_time", stats.cast_time)?;
            check_float(generator, index, name, "range", stats.range)?;
            check_float(generator, index, name, "area_size", stats.area_size)?;
            check_float(generator, index, name, "duration", stats.duration)?;
            check_int(generator, index, name, "required_level", stats.required_level)?;

            if spell.target_pattern.is_area() && stats.area_size <= 0.0 {
                return Err(violation(generator, index, name, "area spell has no area"));
            }
            match spell.spell_type {
                SpellType::Offensive if stats.damage == 0 => {
                    return Err(violation(generator, index, name, "offensive spell deals no damage"));
                }
                SpellType::Healing if stats.healing == 0 => {
                    return Err(violation(generator, index, name, "healing spell heals nothing"));
                }
                _ => {}
            }
            if let Some(filter) = params.type_filter {
                if spell.spell_type != filter {
                    return Err(violation(
                        generator,
                        index,
                        name,
                        format!("{:?} does not match filter {:?}", spell.spell_type, filter),
                    ));
                }
            }
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "SpellGenerator"
    }
}
