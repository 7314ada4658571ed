//! # Merchant Generation
//!
//! Merchants are entities with a trade profile and a stocked inventory.
//! Consecutive merchants of a batch use additively offset seeds
//! (`seed + index * MERCHANT_SEED_STRIDE`), and their stock comes from the
//! item generator with a rarity bias that grows with the merchant's level.

use super::entities::{validate_entity, EntityGenerator, EntityType, GeneratedEntity};
use super::items::{GeneratedItem, ItemGenerator, ItemType};
use super::utils::{self, check_float, check_non_empty, violation};
use crate::generation::{GenerationParams, Generator, PowerCurve};
use crate::genre::GenreRegistry;
use crate::utils::{clamp_unit, lerp};
use crate::{config, ForgeResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How a merchant moves through the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MerchantType {
    /// Keeps a shop at one location
    Fixed,
    /// Wanders between locations
    Nomadic,
}

/// Ordered, owned stock of items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<GeneratedItem>,
}

impl Inventory {
    pub fn new(items: Vec<GeneratedItem>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeneratedItem> {
        self.items.iter()
    }

    pub fn get(&self, index: usize) -> Option<&GeneratedItem> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[GeneratedItem] {
        &self.items
    }

    /// Appends an item at the end of the stock.
    pub fn add(&mut self, item: GeneratedItem) {
        self.items.push(item);
    }

    /// Removes and returns the item at `index`, keeping the order of the rest.
    pub fn remove(&mut self, index: usize) -> Option<GeneratedItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Sum of the base values of all items.
    pub fn total_value(&self) -> i64 {
        self.items.iter().map(|item| i64::from(item.stats.value)).sum()
    }
}

/// A trader: an entity plus its trade profile and stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Merchant {
    pub entity: GeneratedEntity,
    pub merchant_type: MerchantType,
    /// Markup applied when selling to the player; always positive
    pub price_multiplier: f64,
    /// Share of base value paid when buying from the player, in `[0, 1]`
    pub buy_back_percentage: f64,
    pub inventory: Inventory,
}

impl Merchant {
    pub fn name(&self) -> &str {
        &self.entity.name
    }

    /// Price the merchant asks for an item.
    pub fn sell_price(&self, item: &GeneratedItem) -> i64 {
        (f64::from(item.stats.value) * self.price_multiplier)
            .round()
            .max(0.0) as i64
    }

    /// Price the merchant pays for an item.
    pub fn buy_back_price(&self, item: &GeneratedItem) -> i64 {
        (f64::from(item.stats.value) * self.buy_back_percentage)
            .round()
            .max(0.0) as i64
    }
}

/// Rectangular world region, inclusive of its edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl WorldBounds {
    /// Creates bounds; corners are reordered if given backwards.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x: min_x.min(max_x),
            min_y: min_y.min(max_y),
            max_x: min_x.max(max_x),
            max_y: min_y.max(max_y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn contains(&self, point: SpawnPoint) -> bool {
        (self.min_x..=self.max_x).contains(&point.x) && (self.min_y..=self.max_y).contains(&point.y)
    }
}

/// A 2D spawn location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub x: f64,
    pub y: f64,
}

/// Produces `count` spawn points spread across `bounds`.
///
/// The bounds are split into a near-square grid with one cell per point.
/// Fixed merchants sit near their cell's centre; nomadic merchants may land
/// anywhere inside their cell. Point `i` depends only on `(seed, i, count)`.
///
/// Backwards corners are reordered first. Bounds with a non-finite corner or
/// extent have no usable grid and yield no points.
///
/// # Examples
///
/// ```
/// use seedforge::{spawn_points, MerchantType, WorldBounds};
///
/// let bounds = WorldBounds::new(0.0, 0.0, 100.0, 100.0);
/// let points = spawn_points(42, 4, bounds, MerchantType::Fixed);
/// assert_eq!(points.len(), 4);
/// assert!(points.iter().all(|p| bounds.contains(*p)));
/// assert_eq!(points, spawn_points(42, 4, bounds, MerchantType::Fixed));
/// ```
pub fn spawn_points(
    seed: u64,
    count: usize,
    bounds: WorldBounds,
    merchant_type: MerchantType,
) -> Vec<SpawnPoint> {
    let corners = [bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y];
    let bounds = WorldBounds::new(bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y);
    if !corners.iter().chain(&[bounds.width(), bounds.height()]).all(|v| v.is_finite()) {
        log::warn!("no spawn points for non-finite bounds {:?}", bounds);
        return Vec::new();
    }
    if count == 0 {
        return Vec::new();
    }

    let columns = grid_columns(count);
    let rows = count.div_ceil(columns);
    let cell_width = bounds.width() / columns as f64;
    let cell_height = bounds.height() / rows as f64;
    // Fraction of the cell a point may stray from the centre
    let spread = match merchant_type {
        MerchantType::Fixed => 0.25,
        MerchantType::Nomadic => 1.0,
    };

    (0..count)
        .map(|i| {
            let mut rng = utils::create_rng(utils::derive_seed(seed, i as u64));
            let column = (i % columns) as f64;
            let row = (i / columns) as f64;
            let jitter_x = (rng.gen::<f64>() - 0.5) * spread;
            let jitter_y = (rng.gen::<f64>() - 0.5) * spread;
            SpawnPoint {
                x: (bounds.min_x + (column + 0.5 + jitter_x) * cell_width)
                    .clamp(bounds.min_x, bounds.max_x),
                y: (bounds.min_y + (row + 0.5 + jitter_y) * cell_height)
                    .clamp(bounds.min_y, bounds.max_y),
            }
        })
        .collect()
}

/// Smallest column count whose square holds `count` cells.
fn grid_columns(count: usize) -> usize {
    let mut columns = 1;
    while columns * columns < count {
        columns += 1;
    }
    columns
}

/// Generates merchants with stocked inventories.
#[derive(Debug, Clone)]
pub struct MerchantGenerator {
    registry: Arc<GenreRegistry>,
    entities: EntityGenerator,
    items: ItemGenerator,
    inventory_size: usize,
}

impl MerchantGenerator {
    /// Creates a merchant generator stocking the default inventory size.
    pub fn new(registry: Arc<GenreRegistry>) -> Self {
        Self {
            entities: EntityGenerator::new(Arc::clone(&registry)),
            items: ItemGenerator::new(Arc::clone(&registry)),
            registry,
            inventory_size: config::DEFAULT_INVENTORY_SIZE,
        }
    }

    /// Sets how many items every merchant stocks.
    pub fn with_inventory_size(mut self, size: usize) -> Self {
        self.inventory_size = size;
        self
    }

    /// Replaces the power curve used for the merchant and its stock.
    pub fn with_curve(mut self, curve: PowerCurve) -> Self {
        self.entities = self.entities.with_curve(curve.clone());
        self.items = self.items.with_curve(curve);
        self
    }

    pub fn inventory_size(&self) -> usize {
        self.inventory_size
    }

    /// Seed of merchant `index` in a batch.
    pub fn merchant_seed(seed: u64, index: u64) -> u64 {
        seed.wrapping_add(index.wrapping_mul(config::MERCHANT_SEED_STRIDE))
    }

    /// Regenerates a single merchant from its seed.
    pub fn generate_one(
        &self,
        seed: u64,
        params: &GenerationParams<MerchantType>,
    ) -> ForgeResult<Merchant> {
        let genre = self.registry.require(&params.genre_id)?;
        let entity_params: GenerationParams<EntityType> = params.retarget();
        let entity = self
            .entities
            .build_entity(seed, &entity_params, genre, Some(EntityType::Merchant));

        let mut rng = utils::create_rng(utils::derive_purpose_seed(seed, "trade"));
        let depth_factor = self.items.curve().depth_factor(params.clamped_depth());
        let difficulty = params.clamped_difficulty();

        let merchant_type = match params.type_filter {
            Some(merchant_type) => merchant_type,
            None if rng.gen_bool(0.6) => MerchantType::Fixed,
            None => MerchantType::Nomadic,
        };

        // Nomads charge more for the convenience of finding them
        let (low, high) = match merchant_type {
            MerchantType::Fixed => (1.0, 1.3),
            MerchantType::Nomadic => (1.2, 1.6),
        };
        let price_multiplier =
            lerp(low, high, rng.gen::<f64>()) * (1.0 + 0.25 * difficulty + 0.15 * depth_factor);
        let buy_back_percentage = clamp_unit(
            0.5 - 0.2 * depth_factor - 0.1 * difficulty + (rng.gen::<f64>() - 0.5) * 0.1,
        );

        // Higher level merchants stock rarer goods
        let level_factor = f64::from(entity.stats.level) / f64::from(config::MAX_DEPTH + 1);
        let rarity_bias = clamp_unit(level_factor * 0.5);
        let mut item_params: GenerationParams<ItemType> = params.retarget();
        item_params.depth = u32::try_from(entity.stats.level.max(0)).unwrap_or(0);
        let stock = self.items.generate_biased(
            utils::derive_purpose_seed(seed, "inventory"),
            &item_params,
            self.inventory_size,
            rarity_bias,
        )?;

        log::trace!(
            "merchant {} (seed {seed}): {:?}, {} items",
            entity.name,
            merchant_type,
            stock.len()
        );

        Ok(Merchant {
            entity,
            merchant_type,
            price_multiplier,
            buy_back_percentage,
            inventory: Inventory::new(stock),
        })
    }
}

impl Generator for MerchantGenerator {
    type Output = Merchant;
    type Filter = MerchantType;

    fn generate(
        &self,
        seed: u64,
        params: &GenerationParams<MerchantType>,
    ) -> ForgeResult<Vec<Merchant>> {
        let count = params.count_or(config::DEFAULT_MERCHANT_COUNT);
        log::debug!(
            "generating {} merchants with seed {} (depth {}, difficulty {}, genre {})",
            count,
            seed,
            params.depth,
            params.difficulty,
            params.genre_id
        );

        (0..count as u64)
            .map(|i| self.generate_one(Self::merchant_seed(seed, i), params))
            .collect()
    }

    fn validate(
        &self,
        merchants: &[Merchant],
        params: &GenerationParams<MerchantType>,
    ) -> ForgeResult<()> {
        let generator = self.generator_type();
        check_non_empty(generator, merchants, params.count_or(config::DEFAULT_MERCHANT_COUNT))?;

        let item_params: GenerationParams<ItemType> =
            params.retarget::<ItemType>().with_count(self.inventory_size);
        for (index, merchant) in merchants.iter().enumerate() {
            validate_entity(generator, index, &merchant.entity)?;
            let name = merchant.name();

            if merchant.entity.entity_type != EntityType::Merchant {
                return Err(violation(generator, index, name, "entity is not a merchant"));
            }
            check_float(generator, index, name, "price_multiplier", merchant.price_multiplier)?;
            if merchant.price_multiplier <= 0.0 {
                return Err(violation(generator, index, name, "price_multiplier must be positive"));
            }
            check_float(
                generator,
                index,
                name,
                "buy_back_percentage",
                merchant.buy_back_percentage,
            )?;
            if merchant.buy_back_percentage > 1.0 {
                return Err(violation(generator, index, name, "buy_back_percentage above 1"));
            }
            if merchant.inventory.len() != self.inventory_size {
                return Err(violation(
                    generator,
                    index,
                    name,
                    format!(
                        "inventory holds {} items, expected {}",
                        merchant.inventory.len(),
                        self.inventory_size
                    ),
                ));
            }
            if let Err(err) = self.items.validate(merchant.inventory.items(), &item_params) {
                return Err(violation(
                    generator,
                    index,
                    name,
                    format!("inventory invalid: {err}"),
                ));
            }
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "MerchantGenerator"
    }
}
