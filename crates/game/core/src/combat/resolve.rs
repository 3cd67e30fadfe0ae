//! Strikes, deaths and their side effects.

use std::f32::consts::TAU;

use arrayvec::ArrayVec;
use tracing::{debug, info};

use crate::config::SimConfig;
use crate::env::SimEnv;
use crate::error::SimError;
use crate::state::{
    BURST_PARTICLES, Combatant, DamageFeedback, EntityId, Particle, Position, Scene, SimEvent,
};

use super::{apply_damage, roll_damage};

/// Angle jitter applied to each burst particle, in radians.
const BURST_JITTER: f32 = 0.2;

/// Result of a strike against an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct AttackOutcome {
    pub damage: u32,
    pub killed: bool,
    /// The kill emptied the deepest level.
    pub victory: bool,
}

/// Player strikes an enemy. An armed overclock multiplies the damage and is consumed.
///
/// # Errors
///
/// Returns [`SimError::EnemyNotFound`] if `target` is not an enemy on the level.
pub fn player_strikes_enemy(
    scene: &mut Scene<'_>,
    target: EntityId,
    config: &SimConfig,
    env: &mut SimEnv<'_>,
) -> Result<AttackOutcome, SimError> {
    let enemy = scene
        .level
        .enemy_mut(target)
        .ok_or(SimError::EnemyNotFound(target))?;

    let multiplier = if scene.player.buffs.overclock {
        scene.player.buffs.overclock = false;
        config.overclock_multiplier
    } else {
        1
    };
    let damage = roll_damage(scene.player.atk, enemy.def, multiplier, env.rng);
    enemy.hp = apply_damage(enemy.hp, damage);
    let position = enemy.position;
    let dead = enemy.hp == 0;

    scene.events.push(SimEvent::Damage {
        target: Combatant::Enemy(target),
        position,
        amount: damage,
    });
    debug!(%target, damage, multiplier, "player strikes");

    let mut outcome = AttackOutcome {
        damage,
        ..AttackOutcome::default()
    };
    if dead {
        outcome.killed = true;
        outcome.victory = kill_enemy(scene, target, config, env)?;
    }
    Ok(outcome)
}

/// Enemy strikes the player with its own attack stat.
pub fn enemy_strikes_player(
    scene: &mut Scene<'_>,
    attacker_atk: u32,
    config: &SimConfig,
    env: &mut SimEnv<'_>,
) -> u32 {
    let damage = roll_damage(attacker_atk, scene.player.def, 1, env.rng);
    damage_player(scene, damage, config, env);
    damage
}

/// Applies incoming damage to the player.
///
/// The firewall pool absorbs first. A hit that leaves hp at zero is handed to
/// the death collaborator; otherwise a hit that crosses the low-health line
/// raises [`DamageFeedback::Critical`] and any other hit raises
/// [`DamageFeedback::Hurt`]. Hits on an already dead player are ignored.
pub fn damage_player(scene: &mut Scene<'_>, amount: u32, config: &SimConfig, env: &mut SimEnv<'_>) {
    let player = &mut *scene.player;
    if !player.is_alive() {
        return;
    }

    let absorbed = amount.min(player.buffs.firewall_hp);
    if absorbed > 0 {
        player.buffs.firewall_hp -= absorbed;
        scene.events.push(SimEvent::Absorbed { amount: absorbed });
    }
    let remaining = amount - absorbed;
    if remaining == 0 {
        return;
    }

    let before = player.hp;
    player.hp = apply_damage(player.hp, remaining);
    scene.events.push(SimEvent::Damage {
        target: Combatant::Player,
        position: player.position,
        amount: remaining,
    });

    if player.hp == 0 {
        info!(level = %scene.level.kind, "player died");
        scene.events.push(SimEvent::PlayerDied);
        env.death.on_player_death(player, scene.level.kind);
        return;
    }

    let threshold = player.max_hp * config.low_hp_percent;
    let crossed = before * 100 >= threshold && player.hp * 100 < threshold;
    let feedback = if crossed {
        DamageFeedback::Critical
    } else {
        DamageFeedback::Hurt
    };
    scene.events.push(SimEvent::PlayerFeedback(feedback));
}

/// Removes a dead enemy and runs every death side effect.
///
/// Returns true when the kill wins the run: the level is at the configured
/// maximum depth and no enemies remain.
///
/// # Errors
///
/// Returns [`SimError::EnemyNotFound`] if `target` is not on the level.
pub fn kill_enemy(
    scene: &mut Scene<'_>,
    target: EntityId,
    config: &SimConfig,
    env: &mut SimEnv<'_>,
) -> Result<bool, SimError> {
    let actor = scene
        .level
        .remove_actor(target)
        .ok_or(SimError::EnemyNotFound(target))?;
    let position = actor.position();
    scene.level.tally.kills += 1;

    scene.events.push(SimEvent::DeathBurst {
        position,
        particles: burst(env),
    });

    let alerted = sound_wave(scene, position, config);
    scene.events.push(SimEvent::SoundWave {
        origin: position,
        radius: config.sound_radius,
    });

    env.narrative.increment("enemies_killed", "enemy destroyed");

    let victory = scene.level.depth() == config.max_depth && !scene.level.has_enemies();
    if victory {
        info!(depth = scene.level.depth(), "deepest level cleared");
        scene.events.push(SimEvent::Victory);
    }
    debug!(%target, %position, alerted, "enemy destroyed");
    Ok(victory)
}

fn burst(env: &mut SimEnv<'_>) -> ArrayVec<Particle, BURST_PARTICLES> {
    (0..BURST_PARTICLES)
        .map(|i| {
            let base = i as f32 * TAU / BURST_PARTICLES as f32;
            let jitter = (env.rng.unit() * 2.0 - 1.0) * BURST_JITTER;
            Particle {
                angle: base + jitter,
                speed: 0.5 + env.rng.unit(),
            }
        })
        .collect()
}

/// Alerts every non-hunting enemy within the sound radius. Returns how many heard it.
fn sound_wave(scene: &mut Scene<'_>, origin: Position, config: &SimConfig) -> usize {
    scene
        .level
        .enemies_mut()
        .filter(|enemy| enemy.position.manhattan(origin) <= config.sound_radius)
        .filter_map(|enemy| enemy.hear(origin, config.alert_ticks).then_some(()))
        .count()
}
