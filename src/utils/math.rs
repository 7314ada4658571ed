//! # Generation Mathematics
//!
//! Small numeric helpers. Everything here sticks to IEEE-754 basic operations
//! (add, multiply, divide, compare) so results are bit-identical on every
//! platform.

/// Linear interpolation written as a convex combination.
///
/// Exact at both endpoints: `lerp(a, b, 0.0) == a` and `lerp(a, b, 1.0) == b`.
///
/// # Examples
///
/// ```
/// use seedforge::utils::lerp;
///
/// assert_eq!(lerp(10.0, 20.0, 0.0), 10.0);
/// assert_eq!(lerp(10.0, 20.0, 1.0), 20.0);
/// assert_eq!(lerp(10.0, 20.0, 0.5), 15.0);
/// ```
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Clamps a value into `[0, 1]`, mapping NaN to zero.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Saturating curve `x / (x + half)`.
///
/// Zero at `x = 0`, one half at `x = half`, approaching one as `x` grows.
/// Non-decreasing for all non-negative `x`.
///
/// # Examples
///
/// ```
/// use seedforge::utils::saturate;
///
/// assert_eq!(saturate(0.0, 20.0), 0.0);
/// assert_eq!(saturate(20.0, 20.0), 0.5);
/// assert!(saturate(1000.0, 20.0) < 1.0);
/// ```
pub fn saturate(x: f64, half: f64) -> f64 {
    if x <= 0.0 || half <= 0.0 {
        return if x > 0.0 { 1.0 } else { 0.0 };
    }
    x / (x + half)
}

/// Rounds to the nearest integer stat, never below zero.
pub fn round_stat(value: f64) -> i32 {
    if value.is_nan() || value <= 0.0 {
        0
    } else if value >= i32::MAX as f64 {
        i32::MAX
    } else {
        value.round() as i32
    }
}

/// Clamps a float stat to be finite and non-negative.
pub fn non_negative(value: f64) -> f64 {
    if value.is_nan() || value <= 0.0 {
        0.0
    } else {
        value.min(f64::MAX)
    }
}

/// Picks an index by cumulative weight.
///
/// Subtracts each weight from `roll` in slice order and returns the first
/// index where the remainder drops below zero. Falls back to the last index
/// with a positive weight when rounding leaves a remainder.
///
/// # Examples
///
/// ```
/// use seedforge::utils::cumulative_pick;
///
/// let weights = [0.5, 0.3, 0.2];
/// assert_eq!(cumulative_pick(0.1, &weights), 0);
/// assert_eq!(cumulative_pick(0.6, &weights), 1);
/// assert_eq!(cumulative_pick(0.95, &weights), 2);
/// ```
pub fn cumulative_pick(roll: f64, weights: &[f64]) -> usize {
    let mut remaining = roll;
    for (index, weight) in weights.iter().enumerate() {
        remaining -= weight;
        if remaining < 0.0 {
            return index;
        }
    }

    weights
        .iter()
        .rposition(|weight| *weight > 0.0)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints_are_exact() {
        let a = 37.25;
        let b = 211.0;
        assert_eq!(lerp(a, b, 0.0), a);
        assert_eq!(lerp(a, b, 1.0), b);
    }

    #[test]
    fn test_clamp_unit() {
        assert_eq!(clamp_unit(-0.5), 0.0);
        assert_eq!(clamp_unit(1.5), 1.0);
        assert_eq!(clamp_unit(0.25), 0.25);
        assert_eq!(clamp_unit(f64::NAN), 0.0);
    }

    #[test]
    fn test_saturate_is_monotonic() {
        let mut previous = 0.0;
        for x in 0..500 {
            let value = saturate(x as f64, 20.0);
            assert!(value >= previous);
            assert!(value < 1.0);
            previous = value;
        }
    }

    #[test]
    fn test_round_stat_never_negative() {
        assert_eq!(round_stat(-3.7), 0);
        assert_eq!(round_stat(f64::NAN), 0);
        assert_eq!(round_stat(2.5), 3);
        assert_eq!(round_stat(1e12), i32::MAX);
    }

    #[test]
    fn test_cumulative_pick_skips_zero_weights() {
        let weights = [0.0, 1.0, 0.0];
        assert_eq!(cumulative_pick(0.0, &weights), 1);
        assert_eq!(cumulative_pick(0.999, &weights), 1);

        // Rounding leftovers land on the last weighted slot
        let short = [0.3, 0.3, 0.0];
        assert_eq!(cumulative_pick(0.9, &short), 1);
    }
}
