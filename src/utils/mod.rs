//! # Utilities Module
//!
//! Numeric helpers shared by the rarity engine, the generators and the genre
//! blender.

pub mod math;

pub use math::*;
