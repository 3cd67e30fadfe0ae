//! Per-enemy state machine.
//!
//! Every non-curfew enemy moves through patrol, alert and hunting. The
//! transition is decided first from what the enemy perceives, then the
//! archetype picks an [`EnemyAction`] for the resulting state. Decisions are
//! made on a copy of the enemy against a read-only [`AiContext`]; the action is
//! applied afterwards so combat can mutate the level freely.
mod sight;
mod tactics;

pub use sight::AiContext;
pub use tactics::EnemyAction;

use tracing::debug;

use crate::combat::enemy_strikes_player;
use crate::config::SimConfig;
use crate::env::{RandomSource, SimEnv};
use crate::error::SimError;
use crate::state::{AiState, Behavior, Enemy, EntityId, Position, Scene, SimEvent};

/// Updates the enemy's AI state and chooses its action.
pub fn decide(enemy: &mut Enemy, ctx: &AiContext<'_>, rng: &mut dyn RandomSource) -> EnemyAction {
    if enemy.behavior == Behavior::Curfew {
        return tactics::curfew(enemy, ctx);
    }

    let player = ctx.player.position;
    let distance = ctx.distance(enemy);
    if distance == 1 && !ctx.player.buffs.is_cloaked() {
        spot(enemy, player);
        return match enemy.behavior {
            Behavior::Sentinel => tactics::shoot(enemy, ctx),
            _ => EnemyAction::Attack,
        };
    }

    if ctx.sees_player(enemy) {
        spot(enemy, player);
    } else if enemy.ai == AiState::Hunting {
        debug!(enemy = %enemy.id, "lost sight, searching");
        enemy.ai = AiState::Alert;
        enemy.alert_timer = ctx.config.alert_ticks;
    } else if enemy.ai == AiState::Alert {
        enemy.alert_timer = enemy.alert_timer.saturating_sub(1);
        if enemy.alert_timer == 0 {
            debug!(enemy = %enemy.id, "alert expired, back to patrol");
            enemy.ai = AiState::Patrol;
            enemy.alert_target = None;
            enemy.patrol_target = None;
        }
    }

    match (enemy.ai, enemy.behavior) {
        (AiState::Hunting | AiState::Alert, Behavior::Sentinel) => tactics::shoot(enemy, ctx),
        (AiState::Patrol, Behavior::Sentinel) => EnemyAction::Idle,
        (AiState::Hunting, Behavior::Tracker) if distance <= ctx.config.flank_distance => {
            tactics::flank(enemy, ctx, rng)
        }
        (AiState::Hunting, _) => tactics::chase(enemy, ctx),
        (AiState::Alert, _) => tactics::investigate(enemy, ctx, rng),
        (AiState::Patrol, _) => tactics::patrol(enemy, ctx, rng),
    }
}

fn spot(enemy: &mut Enemy, player: Position) {
    if enemy.ai != AiState::Hunting {
        debug!(enemy = %enemy.id, "player spotted");
    }
    enemy.ai = AiState::Hunting;
    enemy.alert_target = Some(player);
    enemy.alert_timer = 0;
}

/// Runs one AI tick for an enemy. Stunned enemies only count their stun down.
///
/// # Errors
///
/// Returns [`SimError::EnemyNotFound`] if `id` is not an enemy on the level.
pub fn step_enemy(
    scene: &mut Scene<'_>,
    id: EntityId,
    config: &SimConfig,
    env: &mut SimEnv<'_>,
) -> Result<EnemyAction, SimError> {
    let mut enemy = scene.level.enemy(id).cloned().ok_or(SimError::EnemyNotFound(id))?;
    if enemy.is_stunned() {
        enemy.stun_turns -= 1;
        write_back(scene, enemy)?;
        return Ok(EnemyAction::Idle);
    }

    let action = {
        let ctx = AiContext::new(scene.level, scene.player, scene.clock.day(), config);
        decide(&mut enemy, &ctx, env.rng)
    };
    if let EnemyAction::Move(next) = action {
        enemy.position = next;
    }
    let (atk, from) = (enemy.atk, enemy.position);
    write_back(scene, enemy)?;

    match action {
        EnemyAction::Attack => {
            enemy_strikes_player(scene, atk, config, env);
        }
        EnemyAction::Shoot(direction) => {
            scene.events.push(SimEvent::Shot {
                shooter: id,
                direction,
                from,
                to: scene.player.position,
            });
            enemy_strikes_player(scene, atk, config, env);
        }
        EnemyAction::Idle | EnemyAction::Move(_) => {}
    }
    Ok(action)
}

fn write_back(scene: &mut Scene<'_>, enemy: Enemy) -> Result<(), SimError> {
    let id = enemy.id;
    let slot = scene.level.enemy_mut(id).ok_or(SimError::EnemyNotFound(id))?;
    *slot = enemy;
    Ok(())
}

/// Runs [`step_enemy`] over every enemy in collection order.
///
/// # Errors
///
/// Propagates [`SimError::EnemyNotFound`] from [`step_enemy`].
pub fn step_enemies(scene: &mut Scene<'_>, config: &SimConfig, env: &mut SimEnv<'_>) -> Result<(), SimError> {
    for id in scene.level.enemy_ids() {
        step_enemy(scene, id, config, env)?;
    }
    Ok(())
}
