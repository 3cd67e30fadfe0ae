//! Combat resolution.
//!
//! - `damage`: the damage formula and hp arithmetic (pure functions)
//! - `resolve`: strikes between the player and enemies, deaths and their side effects
//! - `buffs`: item pickups and the player buffs they grant

pub mod buffs;
pub mod damage;
pub mod resolve;

pub use buffs::apply_pickup;
pub use damage::{DAMAGE_OFFSET_MAX, DAMAGE_OFFSET_MIN, apply_damage, compute_damage, roll_damage};
pub use resolve::{AttackOutcome, damage_player, enemy_strikes_player, kill_enemy, player_strikes_enemy};
