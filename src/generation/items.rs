//! # Item Generation
//!
//! Procedural item generation for weapons, armor and consumables. Stats are
//! rolled against the shared power budget and scaled by per-kind multipliers.

use super::naming::{self, NamingStyle};
use super::utils::{self, check_float, check_int, check_name, check_non_empty, violation};
use crate::generation::{ForgeRng, GenerationParams, Generator, PowerCurve, RarityTier, StatRange};
use crate::genre::{GenreDefinition, GenreRegistry};
use crate::{config, ForgeResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Item categories accepted as a type filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    Weapon,
    Armor,
    Consumable,
}

impl ItemType {
    pub const ALL: [ItemType; 3] = [ItemType::Weapon, ItemType::Armor, ItemType::Consumable];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponType {
    Sword,
    Axe,
    Bow,
    Staff,
    Dagger,
    Spear,
}

impl WeaponType {
    pub const ALL: [WeaponType; 6] = [
        WeaponType::Sword,
        WeaponType::Axe,
        WeaponType::Bow,
        WeaponType::Staff,
        WeaponType::Dagger,
        WeaponType::Spear,
    ];

    /// Damage and attack speed multipliers.
    fn profile(self) -> (f64, f64) {
        match self {
            WeaponType::Sword => (1.0, 1.0),
            WeaponType::Axe => (1.3, 0.8),
            WeaponType::Bow => (0.9, 1.1),
            WeaponType::Staff => (0.8, 0.9),
            WeaponType::Dagger => (0.6, 1.6),
            WeaponType::Spear => (1.1, 0.9),
        }
    }

    fn noun(self, style: NamingStyle) -> &'static str {
        let tech = matches!(style, NamingStyle::Tech | NamingStyle::Street);
        match (self, tech) {
            (WeaponType::Sword, false) => "Sword",
            (WeaponType::Sword, true) => "Vibroblade",
            (WeaponType::Axe, false) => "Axe",
            (WeaponType::Axe, true) => "Shredder",
            (WeaponType::Bow, false) => "Bow",
            (WeaponType::Bow, true) => "Rifle",
            (WeaponType::Staff, false) => "Staff",
            (WeaponType::Staff, true) => "Emitter",
            (WeaponType::Dagger, false) => "Dagger",
            (WeaponType::Dagger, true) => "Monoknife",
            (WeaponType::Spear, false) => "Spear",
            (WeaponType::Spear, true) => "Lance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArmorType {
    Helmet,
    Chest,
    Legs,
    Boots,
    Gloves,
    Shield,
}

impl ArmorType {
    pub const ALL: [ArmorType; 6] = [
        ArmorType::Helmet,
        ArmorType::Chest,
        ArmorType::Legs,
        ArmorType::Boots,
        ArmorType::Gloves,
        ArmorType::Shield,
    ];

    /// Defense and weight multipliers.
    fn profile(self) -> (f64, f64) {
        match self {
            ArmorType::Helmet => (0.6, 0.5),
            ArmorType::Chest => (1.0, 1.5),
            ArmorType::Legs => (0.8, 1.0),
            ArmorType::Boots => (0.5, 0.6),
            ArmorType::Gloves => (0.4, 0.3),
            ArmorType::Shield => (1.2, 1.2),
        }
    }

    fn noun(self) -> &'static str {
        match self {
            ArmorType::Helmet => "Helm",
            ArmorType::Chest => "Cuirass",
            ArmorType::Legs => "Greaves",
            ArmorType::Boots => "Boots",
            ArmorType::Gloves => "Gauntlets",
            ArmorType::Shield => "Shield",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsumableType {
    Potion,
    Scroll,
    Food,
    Bomb,
}

impl ConsumableType {
    pub const ALL: [ConsumableType; 4] = [
        ConsumableType::Potion,
        ConsumableType::Scroll,
        ConsumableType::Food,
        ConsumableType::Bomb,
    ];

    fn noun(self, style: NamingStyle) -> &'static str {
        match (self, style) {
            (ConsumableType::Potion, NamingStyle::Tech | NamingStyle::Street) => "Stim",
            (ConsumableType::Potion, _) => "Potion",
            (ConsumableType::Scroll, NamingStyle::Tech | NamingStyle::Street) => "Datachip",
            (ConsumableType::Scroll, _) => "Scroll",
            (ConsumableType::Food, NamingStyle::Wasteland) => "Canned Ration",
            (ConsumableType::Food, _) => "Ration",
            (ConsumableType::Bomb, _) => "Bomb",
        }
    }
}

/// Sub-kind of an item; the variant carries the specific type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Weapon(WeaponType),
    Armor(ArmorType),
    Consumable(ConsumableType),
}

impl ItemKind {
    /// Category of this kind.
    pub fn item_type(self) -> ItemType {
        match self {
            ItemKind::Weapon(_) => ItemType::Weapon,
            ItemKind::Armor(_) => ItemType::Armor,
            ItemKind::Consumable(_) => ItemType::Consumable,
        }
    }

    fn noun(self, style: NamingStyle) -> &'static str {
        match self {
            ItemKind::Weapon(weapon) => weapon.noun(style),
            ItemKind::Armor(armor) => armor.noun(),
            ItemKind::Consumable(consumable) => consumable.noun(style),
        }
    }

    fn tag(self) -> &'static str {
        match self {
            ItemKind::Weapon(WeaponType::Bow) | ItemKind::Weapon(WeaponType::Staff) => "ranged",
            ItemKind::Weapon(_) => "melee",
            ItemKind::Armor(ArmorType::Shield) => "offhand",
            ItemKind::Armor(_) => "wearable",
            ItemKind::Consumable(_) => "stackable",
        }
    }
}

/// Rolled item statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStats {
    pub damage: i32,
    /// Attacks per second
    pub attack_speed: f64,
    pub defense: i32,
    /// Base trade value in gold
    pub value: i32,
    pub weight: f64,
    pub required_level: i32,
    pub durability: i32,
    pub durability_max: i32,
}

/// A generated item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedItem {
    pub name: String,
    pub kind: ItemKind,
    pub rarity: RarityTier,
    pub stats: ItemStats,
    pub tags: Vec<String>,
    pub description: String,
    /// Sub-seed this item was generated from
    pub seed: u64,
}

impl GeneratedItem {
    pub fn item_type(&self) -> ItemType {
        self.kind.item_type()
    }

    /// Whether the item can be worn or wielded.
    pub fn is_equippable(&self) -> bool {
        matches!(self.kind, ItemKind::Weapon(_) | ItemKind::Armor(_))
    }

    pub fn is_consumable(&self) -> bool {
        matches!(self.kind, ItemKind::Consumable(_))
    }
}

const DAMAGE_RANGE: StatRange = StatRange {
    low_frac: 0.8,
    high_frac: 1.2,
};
const DEFENSE_RANGE: StatRange = StatRange {
    low_frac: 0.5,
    high_frac: 0.8,
};
const SPEED_RANGE: StatRange = StatRange {
    low_frac: 0.85,
    high_frac: 1.15,
};
const WEIGHT_RANGE: StatRange = StatRange {
    low_frac: 0.8,
    high_frac: 1.2,
};
const VALUE_RANGE: StatRange = StatRange {
    low_frac: 0.9,
    high_frac: 1.3,
};

/// Generates weapons, armor and consumables.
///
/// Sub-kinds are drawn uniformly: first the category, then the specific type.
#[derive(Debug, Clone)]
pub struct ItemGenerator {
    registry: Arc<GenreRegistry>,
    curve: PowerCurve,
}

impl ItemGenerator {
    /// Creates an item generator using the default power curve.
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

    pub fn curve(&self) -> &PowerCurve {
        &self.curve
    }

    /// Regenerates a single item from its stored sub-seed.
    ///
    /// Reproduces items from [`Generator::generate`]; merchant stock also
    /// depends on the merchant's rarity bias, see [`Self::generate_biased`].
    pub fn generate_one(
        &self,
        seed: u64,
        params: &GenerationParams<ItemType>,
    ) -> ForgeResult<GeneratedItem> {
        let genre = self.registry.require(&params.genre_id)?;
        Ok(self.build_item(seed, params, genre, 0.0))
    }

    /// Regenerates a single item drawn with a rarity bias.
    pub fn generate_one_biased(
        &self,
        seed: u64,
        params: &GenerationParams<ItemType>,
        rarity_bias: f64,
    ) -> ForgeResult<GeneratedItem> {
        let genre = self.registry.require(&params.genre_id)?;
        Ok(self.build_item(seed, params, genre, rarity_bias))
    }

    /// Generates `count` items whose rarity skews upward by `rarity_bias`.
    ///
    /// Used to stock merchants; `rarity_bias` is passed to
    /// [`crate::RarityDistribution::biased`].
    pub fn generate_biased(
        &self,
        seed: u64,
        params: &GenerationParams<ItemType>,
        count: usize,
        rarity_bias: f64,
    ) -> ForgeResult<Vec<GeneratedItem>> {
        let genre = self.registry.require(&params.genre_id)?;
        Ok((0..count as u64)
            .map(|i| self.build_item(utils::derive_seed(seed, i), params, genre, rarity_bias))
            .collect())
    }

    fn build_item(
        &self,
        seed: u64,
        params: &GenerationParams<ItemType>,
        genre: &GenreDefinition,
        rarity_bias: f64,
    ) -> GeneratedItem {
        let mut rng = utils::create_rng(seed);
        let depth = params.clamped_depth();
        let difficulty = params.clamped_difficulty();

        let kind = self.draw_kind(&mut rng, params.type_filter);
        let rarity = self
            .curve
            .distribution(depth, difficulty)
            .biased(rarity_bias)
            .draw(&mut rng);
        let budget = self.curve.budget(depth, difficulty, rarity);
        let stats = self.roll_stats(&mut rng, kind, rarity, budget, depth);

        let style = genre.naming_style;
        let name = naming::item_name(&mut rng, genre, kind.noun(style), rarity);

        let mut tags = vec![
            genre.id.clone(),
            rarity.as_str().to_lowercase(),
            kind.tag().to_string(),
        ];
        if let Some(theme) = genre.themes.first() {
            tags.push(theme.clone());
        }

        let description = describe(kind, rarity, &stats, genre);
        log::trace!("item {} (seed {seed}): {:?} {}", name, kind, rarity);

        GeneratedItem {
            name,
            kind,
            rarity,
            stats,
            tags,
            description,
            seed,
        }
    }

    fn draw_kind(&self, rng: &mut ForgeRng, filter: Option<ItemType>) -> ItemKind {
        let item_type = match filter {
            Some(item_type) => item_type,
            None => ItemType::ALL[rng.gen_range(0..ItemType::ALL.len())],
        };
        match item_type {
            ItemType::Weapon => {
                ItemKind::Weapon(WeaponType::ALL[rng.gen_range(0..WeaponType::ALL.len())])
            }
            ItemType::Armor => {
                ItemKind::Armor(ArmorType::ALL[rng.gen_range(0..ArmorType::ALL.len())])
            }
            ItemType::Consumable => ItemKind::Consumable(
                ConsumableType::ALL[rng.gen_range(0..ConsumableType::ALL.len())],
            ),
        }
    }

    fn roll_stats(
        &self,
        rng: &mut ForgeRng,
        kind: ItemKind,
        rarity: RarityTier,
        budget: f64,
        depth: u32,
    ) -> ItemStats {
        let required_level = self.curve.required_level(depth, rarity);
        let value_budget = budget * rarity.price_multiplier();

        match kind {
            ItemKind::Weapon(weapon) => {
                let (damage_mult, speed_mult) = weapon.profile();
                let durability_max = DAMAGE_RANGE.roll_int(rng, 50.0 + budget * 2.0).max(1);
                ItemStats {
                    damage: DAMAGE_RANGE.roll_int(rng, budget * damage_mult).max(1),
                    attack_speed: SPEED_RANGE.roll_float(rng, speed_mult).max(0.1),
                    defense: 0,
                    value: VALUE_RANGE.roll_int(rng, value_budget * 2.0),
                    weight: WEIGHT_RANGE.roll_float(rng, 2.0 + damage_mult * 3.0),
                    required_level,
                    durability: durability_max,
                    durability_max,
                }
            }
            ItemKind::Armor(armor) => {
                let (defense_mult, weight_mult) = armor.profile();
                let durability_max = DAMAGE_RANGE.roll_int(rng, 60.0 + budget * 2.5).max(1);
                ItemStats {
                    damage: 0,
                    attack_speed: 0.0,
                    defense: DEFENSE_RANGE.roll_int(rng, budget * defense_mult).max(1),
                    value: VALUE_RANGE.roll_int(rng, value_budget * 1.5),
                    weight: WEIGHT_RANGE.roll_float(rng, 4.0 * weight_mult),
                    required_level,
                    durability: durability_max,
                    durability_max,
                }
            }
            ItemKind::Consumable(consumable) => {
                // Bombs carry their blast as damage
                let damage = match consumable {
                    ConsumableType::Bomb => DAMAGE_RANGE.roll_int(rng, budget * 1.5),
                    _ => 0,
                };
                ItemStats {
                    damage,
                    attack_speed: 0.0,
                    defense: 0,
                    value: VALUE_RANGE.roll_int(rng, value_budget * 0.5),
                    weight: WEIGHT_RANGE.roll_float(rng, 0.3),
                    required_level,
                    durability: 1,
                    durability_max: 1,
                }
            }
        }
    }
}

fn describe(kind: ItemKind, rarity: RarityTier, stats: &ItemStats, genre: &GenreDefinition) -> String {
    let detail = match kind {
        ItemKind::Weapon(weapon) => format!(
            "A {:?} dealing {} damage at {:.2} attacks per second.",
            weapon, stats.damage, stats.attack_speed
        )
        .to_lowercase(),
        ItemKind::Armor(armor) => {
            format!("A {:?} piece granting {} defense.", armor, stats.defense).to_lowercase()
        }
        ItemKind::Consumable(consumable) => {
            format!("A single-use {:?}.", consumable).to_lowercase()
        }
    };
    format!(
        "{} {} item from the {} world. {}",
        article(rarity.as_str()),
        rarity.as_str().to_lowercase(),
        genre.name,
        capitalize(&detail)
    )
}

fn article(word: &str) -> &'static str {
    match word.chars().next() {
        Some('A' | 'E' | 'I' | 'O' | 'U') => "An",
        _ => "A",
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Generator for ItemGenerator {
    type Output = GeneratedItem;
    type Filter = ItemType;

    fn generate(&self, seed: u64, params: &GenerationParams<ItemType>) -> ForgeResult<Vec<GeneratedItem>> {
        let count = params.count_or(config::DEFAULT_ITEM_COUNT);
        log::debug!(
            "generating {} items with seed {} (depth {}, difficulty {}, genre {})",
            count,
            seed,
            params.depth,
            params.difficulty,
            params.genre_id
        );
        self.generate_biased(seed, params, count, 0.0)
    }

    fn validate(&self, items: &[GeneratedItem], params: &GenerationParams<ItemType>) -> ForgeResult<()> {
        let generator = self.generator_type();
        check_non_empty(generator, items, params.count_or(config::DEFAULT_ITEM_COUNT))?;

        for (index, item) in items.iter().enumerate() {
            check_name(generator, index, &item.name)?;
            let name = item.name.as_str();
            let stats = &item.stats;

            check_int(generator, index, name, "damage", stats.damage)?;
            check_float(generator, index, name, "attack_speed", stats.attack_speed)?;
            check_int(generator, index, name, "defense", stats.defense)?;
            check_int(generator, index, name, "value", stats.value)?;
            check_float(generator, index, name, "weight", stats.weight)?;
            check_int(generator, index, name, "required_level", stats.required_level)?;
            check_int(generator, index, name, "durability", stats.durability)?;
            check_int(generator, index, name, "durability_max", stats.durability_max)?;

            if stats.durability > stats.durability_max {
                return Err(violation(generator, index, name, "durability exceeds durability_max"));
            }
            if let Some(filter) = params.type_filter {
                if item.item_type() != filter {
                    return Err(violation(
                        generator,
                        index,
                        name,
                        format!("{:?} does not match filter {:?}", item.item_type(), filter),
                    ));
                }
            }
            match item.kind {
                ItemKind::Weapon(_) if stats.damage == 0 || stats.attack_speed <= 0.0 => {
                    return Err(violation(
                        generator,
                        index,
                        name,
                        "weapon needs positive damage and attack speed",
                    ));
                }
                ItemKind::Armor(_) if stats.defense == 0 => {
                    return Err(violation(generator, index, name, "armor needs positive defense"));
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "ItemGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ForgeError, LookupError};

    fn generator() -> ItemGenerator {
        ItemGenerator::new(Arc::new(GenreRegistry::with_base_genres()))
    }

    #[test]
    fn test_generate_default_count() {
        let generator = generator();
        let params = GenerationParams::new(3, 0.5, "fantasy");
        let items = generator.generate(1, &params).unwrap();
        assert_eq!(items.len(), config::DEFAULT_ITEM_COUNT);
        assert!(generator.validate(&items, &params).is_ok());
    }

    #[test]
    fn test_generate_is_deterministic() {
        let generator = generator();
        let params = GenerationParams::new(8, 0.7, "scifi").with_count(15);
        assert_eq!(
            generator.generate(777, &params).unwrap(),
            generator.generate(777, &params).unwrap()
        );
    }

    #[test]
    fn test_batch_prefix_is_stable() {
        let generator = generator();
        let long = generator
            .generate(42, &GenerationParams::new(4, 0.4, "horror").with_count(10))
            .unwrap();
        let short = generator
            .generate(42, &GenerationParams::new(4, 0.4, "horror").with_count(3))
            .unwrap();
        assert_eq!(&long[..3], &short[..]);
    }

    #[test]
    fn test_generate_one_reproduces_item() {
        let generator = generator();
        let params = GenerationParams::new(6, 0.2, "cyberpunk").with_count(5);
        let items = generator.generate(9001, &params).unwrap();
        let again = generator.generate_one(items[3].seed, &params).unwrap();
        assert_eq!(again, items[3]);
    }

    #[test]
    fn test_type_filter() {
        let generator = generator();
        let params = GenerationParams::new(2, 0.5, "fantasy")
            .with_count(25)
            .with_filter(ItemType::Weapon);
        let items = generator.generate(5, &params).unwrap();
        assert!(items.iter().all(|item| item.item_type() == ItemType::Weapon));
        assert!(items.iter().all(|item| item.is_equippable() && !item.is_consumable()));
        assert!(generator.validate(&items, &params).is_ok());
    }

    #[test]
    fn test_unknown_genre_fails() {
        let generator = generator();
        let params = GenerationParams::new(2, 0.5, "western");
        assert_eq!(
            generator.generate(5, &params).unwrap_err(),
            ForgeError::Lookup(LookupError::UnknownGenre("western".to_string()))
        );
    }

    #[test]
    fn test_validate_detects_negative_damage() {
        let generator = generator();
        let params = GenerationParams::new(5, 0.5, "fantasy").with_count(6);
        let mut items = generator.generate(12, &params).unwrap();
        items[2].stats.damage = -1;
        match generator.validate(&items, &params).unwrap_err() {
            ForgeError::Validation(err) => {
                assert_eq!(err.index, 2);
                assert_eq!(err.object, items[2].name);
                assert!(err.violation.contains("damage"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_detects_shape_violations() {
        let generator = generator();
        let params = GenerationParams::new(5, 0.5, "fantasy")
            .with_count(4)
            .with_filter(ItemType::Armor);
        let mut items = generator.generate(12, &params).unwrap();
        items[0].stats.defense = 0;
        assert!(generator.validate(&items, &params).is_err());

        let mut items = generator.generate(12, &params).unwrap();
        items[1].stats.durability = items[1].stats.durability_max + 1;
        assert!(generator.validate(&items, &params).is_err());

        let mut items = generator.generate(12, &params).unwrap();
        items[3].stats.weight = f64::NAN;
        assert!(generator.validate(&items, &params).is_err());

        assert!(generator.validate(&[], &params).is_err());
    }

    #[test]
    fn test_required_level_tracks_rarity() {
        let generator = generator();
        let params = GenerationParams::new(10, 0.5, "postapoc").with_count(200);
        let items = generator.generate(31337, &params).unwrap();
        for a in &items {
            for b in &items {
                if a.rarity < b.rarity {
                    assert!(a.stats.required_level <= b.stats.required_level);
                }
            }
        }
    }

    #[test]
    fn test_extreme_level_bonus_table_still_generates() {
        let mut table = serde_json::to_value(PowerCurve::default()).unwrap();
        table["tier_level_bonus"] = serde_json::json!([0, 1, 2, 4, u32::MAX]);
        let curve: PowerCurve = serde_json::from_value(table).unwrap();

        let generator = generator().with_curve(curve);
        let params = GenerationParams::new(100, 1.0, "fantasy").with_count(200);
        let items = generator.generate(4242, &params).unwrap();
        assert_eq!(items.len(), 200);
        assert!(generator.validate(&items, &params).is_ok());
        for item in items.iter().filter(|item| item.rarity == RarityTier::Legendary) {
            assert_eq!(item.stats.required_level, i32::MAX);
        }
    }

    #[test]
    fn test_out_of_range_params_still_generate() {
        let generator = generator();
        let params = GenerationParams::new(u32::MAX, -4.0, "fantasy").with_count(5);
        let items = generator.generate(0, &params).unwrap();
        assert!(generator.validate(&items, &params).is_ok());
    }

    #[test]
    fn test_description_mentions_genre() {
        let generator = generator();
        let params = GenerationParams::new(1, 0.1, "horror").with_count(3);
        for item in generator.generate(8, &params).unwrap() {
            assert!(item.description.contains("Horror"));
            assert!(item.tags.contains(&"horror".to_string()));
        }
    }
}
