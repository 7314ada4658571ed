//! # Rarity & Power Curve
//!
//! Turns dungeon depth and difficulty into a rarity distribution and a stat
//! budget. Every domain generator draws its tier and rolls its stats here, so
//! the whole game shares one progression curve.
//!
//! The coefficients live in [`PowerCurve`], a plain data table that can be
//! recalibrated (or loaded from JSON) without touching the algorithms.

use crate::config;
use crate::utils::{clamp_unit, cumulative_pick, lerp, non_negative, round_stat, saturate};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered rarity tiers, from most to least common.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RarityTier {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl RarityTier {
    /// Canonical tier order used by every cumulative draw.
    pub const ALL: [RarityTier; 5] = [
        RarityTier::Common,
        RarityTier::Uncommon,
        RarityTier::Rare,
        RarityTier::Epic,
        RarityTier::Legendary,
    ];

    /// Position in the canonical order.
    pub fn index(self) -> usize {
        match self {
            RarityTier::Common => 0,
            RarityTier::Uncommon => 1,
            RarityTier::Rare => 2,
            RarityTier::Epic => 3,
            RarityTier::Legendary => 4,
        }
    }

    /// Display name of the tier.
    pub fn as_str(self) -> &'static str {
        match self {
            RarityTier::Common => "Common",
            RarityTier::Uncommon => "Uncommon",
            RarityTier::Rare => "Rare",
            RarityTier::Epic => "Epic",
            RarityTier::Legendary => "Legendary",
        }
    }

    /// Trade value multiplier applied on top of the stat budget.
    pub fn price_multiplier(self) -> f64 {
        match self {
            RarityTier::Common => 1.0,
            RarityTier::Uncommon => 2.0,
            RarityTier::Rare => 5.0,
            RarityTier::Epic => 12.0,
            RarityTier::Legendary => 30.0,
        }
    }

    /// Returns the higher of `self` and `floor`.
    pub fn at_least(self, floor: RarityTier) -> RarityTier {
        self.max(floor)
    }
}

impl fmt::Display for RarityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probability of each tier, in canonical order, summing to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RarityDistribution {
    weights: [f64; 5],
}

impl RarityDistribution {
    /// Builds a distribution from raw non-negative weights.
    ///
    /// Weights are normalized; an all-zero (or invalid) table collapses to
    /// always-Common.
    pub fn from_weights(raw: [f64; 5]) -> Self {
        let mut weights = raw.map(non_negative);
        let total: f64 = weights.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            return Self {
                weights: [1.0, 0.0, 0.0, 0.0, 0.0],
            };
        }
        for weight in weights.iter_mut() {
            *weight /= total;
        }
        Self { weights }
    }

    /// Probability of one tier.
    pub fn weight(&self, tier: RarityTier) -> f64 {
        self.weights[tier.index()]
    }

    /// All weights in canonical order.
    pub fn weights(&self) -> [f64; 5] {
        self.weights
    }

    /// Sum of the weights; one up to rounding.
    pub fn total(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Draws a tier by cumulative weight over the canonical order.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> RarityTier {
        let roll: f64 = rng.gen();
        RarityTier::ALL[cumulative_pick(roll, &self.weights)]
    }

    /// Moves `shift` (clamped to `[0, 1]`) of each tier's mass one tier up.
    ///
    /// Used for stock that should skew rarer than loose loot.
    pub fn biased(&self, shift: f64) -> Self {
        let shift = clamp_unit(shift);
        let mut shifted = self.weights;
        for i in 0..shifted.len() - 1 {
            let moved = self.weights[i] * shift;
            shifted[i] -= moved;
            shifted[i + 1] += moved;
        }
        Self::from_weights(shifted)
    }
}

/// Fractional bounds a stat is rolled within, relative to the budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatRange {
    pub low_frac: f64,
    pub high_frac: f64,
}

impl StatRange {
    /// Creates a range; bounds are reordered if given backwards.
    pub fn new(low_frac: f64, high_frac: f64) -> Self {
        if low_frac <= high_frac {
            Self { low_frac, high_frac }
        } else {
            Self {
                low_frac: high_frac,
                high_frac: low_frac,
            }
        }
    }

    /// Draws a float in `[budget * low, budget * high]`, never negative.
    pub fn roll_float<R: Rng + ?Sized>(&self, rng: &mut R, budget: f64) -> f64 {
        let frac: f64 = rng.gen();
        let scale = lerp(self.low_frac, self.high_frac, frac);
        non_negative(budget * scale)
    }

    /// Draws a rounded integer stat in the same bounds.
    pub fn roll_int<R: Rng + ?Sized>(&self, rng: &mut R, budget: f64) -> i32 {
        round_stat(self.roll_float(rng, budget))
    }
}

/// Tunable coefficients of the rarity distribution and power budget.
///
/// Tier weights interpolate from `base_weights` (depth 0, difficulty 0)
/// toward `peak_weights` as progress rises. Progress mixes a saturating depth
/// term and the difficulty. Budgets grow with the same saturating depth term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerCurve {
    /// Tier weights at the start of the game
    pub base_weights: [f64; 5],
    /// Tier weights at full progress
    pub peak_weights: [f64; 5],
    /// Share of progress driven by depth; the rest comes from difficulty
    pub depth_share: f64,
    /// Depth at which the saturating depth term reaches one half
    pub depth_half_saturation: f64,
    /// Budget at depth 0, difficulty 0, Common tier
    pub budget_base: f64,
    /// Extra budget multiple reached as depth saturates
    pub budget_depth_growth: f64,
    /// Extra budget multiple at difficulty 1
    pub budget_difficulty_scale: f64,
    /// Budget multiplier per tier, canonical order
    pub tier_multipliers: [f64; 5],
    /// Required level bonus per tier, canonical order
    pub tier_level_bonus: [u32; 5],
}

impl Default for PowerCurve {
    fn default() -> Self {
        Self {
            base_weights: [0.60, 0.25, 0.10, 0.04, 0.01],
            peak_weights: [0.22, 0.30, 0.25, 0.15, 0.08],
            depth_share: 0.7,
            depth_half_saturation: 20.0,
            budget_base: 10.0,
            budget_depth_growth: 9.0,
            budget_difficulty_scale: 0.5,
            tier_multipliers: [1.0, 1.4, 1.9, 2.6, 3.5],
            tier_level_bonus: [0, 1, 2, 4, 6],
        }
    }
}

impl PowerCurve {
    /// Saturating depth term in `[0, 1)`, depth clamped to `MAX_DEPTH`.
    pub fn depth_factor(&self, depth: u32) -> f64 {
        let depth = depth.min(config::MAX_DEPTH);
        saturate(depth as f64, self.depth_half_saturation)
    }

    /// Combined progress in `[0, 1]` from depth and difficulty.
    pub fn progress(&self, depth: u32, difficulty: f64) -> f64 {
        let share = clamp_unit(self.depth_share);
        clamp_unit(lerp(clamp_unit(difficulty), self.depth_factor(depth), share))
    }

    /// Rarity distribution for a depth and difficulty.
    ///
    /// # Examples
    ///
    /// ```
    /// use seedforge::{PowerCurve, RarityTier};
    ///
    /// let curve = PowerCurve::default();
    /// let shallow = curve.distribution(0, 0.0);
    /// let deep = curve.distribution(80, 1.0);
    ///
    /// assert!((shallow.total() - 1.0).abs() < 1e-9);
    /// assert!(deep.weight(RarityTier::Legendary) > shallow.weight(RarityTier::Legendary));
    /// ```
    pub fn distribution(&self, depth: u32, difficulty: f64) -> RarityDistribution {
        let progress = self.progress(depth, difficulty);
        let mut weights = [0.0; 5];
        for (i, weight) in weights.iter_mut().enumerate() {
            *weight = lerp(self.base_weights[i], self.peak_weights[i], progress);
        }
        RarityDistribution::from_weights(weights)
    }

    /// Stat budget for a depth, difficulty and tier.
    ///
    /// Non-decreasing in depth and tier; never negative.
    pub fn budget(&self, depth: u32, difficulty: f64, tier: RarityTier) -> f64 {
        let depth_scale = 1.0 + self.budget_depth_growth * self.depth_factor(depth);
        let difficulty_scale = 1.0 + self.budget_difficulty_scale * clamp_unit(difficulty);
        non_negative(
            self.budget_base * depth_scale * difficulty_scale * self.tier_multiplier(tier),
        )
    }

    /// Budget multiplier of one tier.
    pub fn tier_multiplier(&self, tier: RarityTier) -> f64 {
        self.tier_multipliers[tier.index()]
    }

    /// Required level: `1 + depth + tier bonus`, saturating at `i32::MAX`.
    ///
    /// Deterministic, so it is non-decreasing with tier at a fixed depth as
    /// long as the bonus table is.
    pub fn required_level(&self, depth: u32, tier: RarityTier) -> i32 {
        let depth = depth.min(config::MAX_DEPTH);
        let level = 1u32
            .saturating_add(depth)
            .saturating_add(self.tier_level_bonus[tier.index()]);
        i32::try_from(level).unwrap_or(i32::MAX)
    }
}
