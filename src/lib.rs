//! # Seedforge
//!
//! Deterministic procedural content generation for a role-playing game.
//!
//! ## Architecture Overview
//!
//! Every piece of content is a pure function of a numeric seed and a small set
//! of tuning parameters. The core architecture revolves around a few concepts:
//!
//! - **Seed Derivation**: each generated object gets its own sub-seed, so one
//!   object can be reproduced alone and batches never perturb each other
//! - **Rarity & Power Curve**: depth and difficulty become a rarity
//!   distribution and a stat budget shared by all generators
//! - **Domain Generators**: items, entities, merchants, quests and spells,
//!   all behind the typed [`Generator`] contract
//! - **Genres**: an immutable registry of base genres plus a blender that
//!   interpolates two of them into a hybrid
//!
//! ## Determinism
//!
//! Same seed and params produce the same content on every run and platform.
//! Streams come from `ChaCha8Rng` and all curve math uses basic IEEE
//! arithmetic only.
//!
//! ```
//! use std::sync::Arc;
//! use seedforge::{GenerationParams, Generator, GenreRegistry, ItemGenerator};
//!
//! let registry = Arc::new(GenreRegistry::with_base_genres());
//! let generator = ItemGenerator::new(registry);
//! let params = GenerationParams::new(5, 0.5, "fantasy").with_count(20);
//!
//! let items = generator.generate(12345, &params).unwrap();
//! assert_eq!(items.len(), 20);
//! assert!(generator.validate(&items, &params).is_ok());
//! assert_eq!(items, generator.generate(12345, &params).unwrap());
//! ```

pub mod generation;
pub mod genre;
pub mod utils;

// Core module re-exports
pub use generation::*;
pub use genre::*;

/// A failed lookup of a catalogued key.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No genre with this id is registered
    #[error("unknown genre id: {0}")]
    UnknownGenre(String),

    /// No preset blend with this name exists
    #[error("unknown preset blend: {0}")]
    UnknownPreset(String),
}

/// The first structural invariant violated by a generated collection.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{generator} object #{index} ({object}): {violation}")]
pub struct ValidationError {
    /// Generator that produced the collection
    pub generator: &'static str,
    /// Position of the offending object in the collection
    pub index: usize,
    /// Name of the offending object
    pub object: String,
    /// Description of the violated invariant
    pub violation: String,
}

impl ValidationError {
    /// Creates a validation error for the object at `index`.
    pub fn new(
        generator: &'static str,
        index: usize,
        object: impl Into<String>,
        violation: impl Into<String>,
    ) -> Self {
        Self {
            generator,
            index,
            object: object.into(),
            violation: violation.into(),
        }
    }
}

/// Core error type for the Seedforge generation framework.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ForgeError {
    /// A genre id or preset name was not found
    #[error("Lookup failed: {0}")]
    Lookup(#[from] LookupError),

    /// A generated collection broke a structural invariant
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// Result type used throughout the Seedforge codebase.
pub type ForgeResult<T> = Result<T, ForgeError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generation configuration constants.
pub mod config {
    /// Deepest dungeon level the power curve distinguishes; deeper values clamp
    pub const MAX_DEPTH: u32 = 100;

    /// Items generated when no count is requested
    pub const DEFAULT_ITEM_COUNT: usize = 10;

    /// Entities generated when no count is requested
    pub const DEFAULT_ENTITY_COUNT: usize = 10;

    /// Merchants generated when no count is requested
    pub const DEFAULT_MERCHANT_COUNT: usize = 1;

    /// Quests generated when no count is requested
    pub const DEFAULT_QUEST_COUNT: usize = 5;

    /// Spells generated when no count is requested
    pub const DEFAULT_SPELL_COUNT: usize = 8;

    /// Items stocked by a merchant unless configured otherwise
    pub const DEFAULT_INVENTORY_SIZE: usize = 8;

    /// Maximum number of themes a blended genre keeps
    pub const BLENDED_THEME_LIMIT: usize = 6;

    /// Odd 64-bit constant spacing per-object sub-seeds apart
    pub const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

    /// Offset between consecutive merchants of one batch
    pub const MERCHANT_SEED_STRIDE: u64 = 1_000;
}
