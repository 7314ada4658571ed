//! # Generation Module
//!
//! Procedural content generation systems for items, entities, merchants,
//! quests and spells.
//!
//! Every generator follows the same recipe per object: derive a sub-seed,
//! draw a sub-kind, draw a rarity tier, roll stats against the power budget,
//! then synthesize a name and description from the genre's naming tables.

pub mod entities;
pub mod items;
pub mod merchants;
pub mod naming;
pub mod quests;
pub mod rarity;
pub mod spells;

pub use entities::*;
pub use items::*;
pub use merchants::*;
pub use naming::NamingStyle;
pub use quests::*;
pub use rarity::*;
pub use spells::*;

use crate::utils::clamp_unit;
use crate::{config, ForgeResult, ValidationError};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Random stream used by every generator.
///
/// ChaCha8 has a documented, version-stable output sequence, which is what
/// makes seeds a compatibility contract.
pub type ForgeRng = ChaCha8Rng;

/// Parameters for one generation call.
///
/// `F` is the generator's own sub-kind enum, so the type filter is checked at
/// compile time: an item generator only accepts an [`ItemType`] filter.
///
/// # Examples
///
/// ```
/// use seedforge::{GenerationParams, ItemType};
///
/// let params = GenerationParams::new(5, 0.5, "fantasy")
///     .with_count(3)
///     .with_filter(ItemType::Weapon);
/// assert_eq!(params.count, Some(3));
/// assert_eq!(params.type_filter, Some(ItemType::Weapon));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams<F> {
    /// Dungeon depth; values past `MAX_DEPTH` are clamped
    pub depth: u32,
    /// Difficulty multiplier in `[0, 1]`; other values are clamped
    pub difficulty: f64,
    /// Registry key of the genre used for naming
    pub genre_id: String,
    /// Number of objects requested; generators fall back to their default
    pub count: Option<usize>,
    /// Restricts generation to a single sub-kind
    pub type_filter: Option<F>,
}

impl<F> GenerationParams<F> {
    /// Creates params with no count and no filter.
    pub fn new(depth: u32, difficulty: f64, genre_id: impl Into<String>) -> Self {
        Self {
            depth,
            difficulty,
            genre_id: genre_id.into(),
            count: None,
            type_filter: None,
        }
    }

    /// Requests a specific number of objects.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Restricts generation to one sub-kind.
    pub fn with_filter(mut self, filter: F) -> Self {
        self.type_filter = Some(filter);
        self
    }

    /// Depth clamped into the range the power curve distinguishes.
    pub fn clamped_depth(&self) -> u32 {
        if self.depth > config::MAX_DEPTH {
            log::debug!(
                "clamping depth {} to {}",
                self.depth,
                config::MAX_DEPTH
            );
        }
        self.depth.min(config::MAX_DEPTH)
    }

    /// Difficulty clamped into `[0, 1]`, NaN treated as zero.
    pub fn clamped_difficulty(&self) -> f64 {
        let clamped = clamp_unit(self.difficulty);
        if clamped != self.difficulty {
            log::debug!("clamping difficulty {} to {}", self.difficulty, clamped);
        }
        clamped
    }

    /// Requested count, or `default` when none was given.
    pub fn count_or(&self, default: usize) -> usize {
        self.count.unwrap_or(default)
    }

    /// Copies depth, difficulty and genre into params for another generator.
    pub fn retarget<G>(&self) -> GenerationParams<G> {
        GenerationParams {
            depth: self.depth,
            difficulty: self.difficulty,
            genre_id: self.genre_id.clone(),
            count: None,
            type_filter: None,
        }
    }
}

/// Trait for procedural generators.
///
/// All generation systems implement this trait, giving callers a uniform,
/// statically typed way to produce and check collections.
pub trait Generator {
    /// Object produced by this generator
    type Output;
    /// Sub-kind accepted as a type filter
    type Filter;

    /// Generates a collection from a seed.
    ///
    /// Fails only when a lookup fails (an unknown genre id).
    fn generate(
        &self,
        seed: u64,
        params: &GenerationParams<Self::Filter>,
    ) -> ForgeResult<Vec<Self::Output>>;

    /// Checks structural invariants of a generated collection.
    ///
    /// Reports the first violation and never repairs data.
    fn validate(
        &self,
        content: &[Self::Output],
        params: &GenerationParams<Self::Filter>,
    ) -> ForgeResult<()>;

    /// Gets the generator type name for logging and error reports.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;
    use rand::SeedableRng;

    /// Creates the random stream for a seed.
    pub fn create_rng(seed: u64) -> ForgeRng {
        ForgeRng::seed_from_u64(seed)
    }

    /// SplitMix64 finalizer; a bijection on `u64` with good avalanche.
    pub fn mix64(mut z: u64) -> u64 {
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Derives the sub-seed for object `index` of a batch.
    ///
    /// `mix64(base + index * SEED_STRIDE)`, wrapping. Object `i` never depends
    /// on how many objects are requested, so generating #7 alone or changing
    /// the batch size leaves earlier objects untouched. This formula is part
    /// of the save compatibility contract and must not change.
    ///
    /// # Examples
    ///
    /// ```
    /// use seedforge::generation::utils::derive_seed;
    ///
    /// assert_eq!(derive_seed(42, 3), derive_seed(42, 3));
    /// assert_ne!(derive_seed(42, 3), derive_seed(42, 4));
    /// ```
    pub fn derive_seed(base: u64, index: u64) -> u64 {
        mix64(base.wrapping_add(index.wrapping_mul(config::SEED_STRIDE)))
    }

    /// Derives a seed for a named purpose within one object.
    ///
    /// Lets a generator split off independent streams (an inventory, a
    /// reward item) without consuming draws from the object's own stream.
    pub fn derive_purpose_seed(seed: u64, purpose: &str) -> u64 {
        // FNV-1a over the purpose label
        let mut hash: u64 = 0xCBF2_9CE4_8422_2325;
        for byte in purpose.bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01B3);
        }
        mix64(seed ^ hash)
    }

    /// Fails when a collection that should hold objects is empty.
    pub fn check_non_empty<T>(
        generator: &'static str,
        content: &[T],
        requested: usize,
    ) -> ForgeResult<()> {
        if requested > 0 && content.is_empty() {
            return Err(ValidationError::new(
                generator,
                0,
                "<collection>",
                format!("expected {requested} objects, collection is empty"),
            )
            .into());
        }
        Ok(())
    }

    /// Fails on a negative integer stat.
    pub fn check_int(
        generator: &'static str,
        index: usize,
        object: &str,
        field: &str,
        value: i32,
    ) -> ForgeResult<()> {
        if value < 0 {
            return Err(ValidationError::new(
                generator,
                index,
                object,
                format!("{field} is negative ({value})"),
            )
            .into());
        }
        Ok(())
    }

    /// Fails on a negative, NaN or infinite float stat.
    pub fn check_float(
        generator: &'static str,
        index: usize,
        object: &str,
        field: &str,
        value: f64,
    ) -> ForgeResult<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::new(
                generator,
                index,
                object,
                format!("{field} is not a finite non-negative number ({value})"),
            )
            .into());
        }
        Ok(())
    }

    /// Fails on a blank object name.
    pub fn check_name(generator: &'static str, index: usize, name: &str) -> ForgeResult<()> {
        if name.trim().is_empty() {
            return Err(ValidationError::new(generator, index, "<unnamed>", "name is empty").into());
        }
        Ok(())
    }

    /// Builds a shape-rule violation for the object at `index`.
    pub fn violation(
        generator: &'static str,
        index: usize,
        object: &str,
        violation: impl Into<String>,
    ) -> crate::ForgeError {
        ValidationError::new(generator, index, object, violation).into()
    }
}
