//! Damage calculation and application.

use crate::env::RandomSource;

/// Inclusive bounds of the random damage offset.
pub const DAMAGE_OFFSET_MIN: i32 = -1;
pub const DAMAGE_OFFSET_MAX: i32 = 2;

/// Damage for a single strike.
///
/// # Formula
///
/// ```text
/// damage = max(1, (atk - def + offset) * multiplier)
/// ```
///
/// Never returns less than 1, however lopsided the stats.
pub fn compute_damage(atk: u32, def: u32, offset: i32, multiplier: u32) -> u32 {
    let raw = (i64::from(atk) - i64::from(def) + i64::from(offset)) * i64::from(multiplier);
    raw.clamp(1, i64::from(u32::MAX)) as u32
}

/// [`compute_damage`] with an offset drawn uniformly from the injected source.
pub fn roll_damage(atk: u32, def: u32, multiplier: u32, rng: &mut dyn RandomSource) -> u32 {
    let offset = rng.range(DAMAGE_OFFSET_MIN, DAMAGE_OFFSET_MAX);
    compute_damage(atk, def, offset, multiplier)
}

/// Remaining hp after a hit, saturating at zero.
pub fn apply_damage(hp: u32, amount: u32) -> u32 {
    hp.saturating_sub(amount)
}
