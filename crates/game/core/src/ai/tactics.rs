//! Movement and attack choices, one per AI state and archetype.

use tracing::trace;

use crate::env::RandomSource;
use crate::pathfinding::{greedy_step, step_towards};
use crate::state::{Direction, Enemy, Position};

use super::AiContext;

/// What an enemy does with its tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyAction {
    Idle,
    Move(Position),
    Attack,
    Shoot(Direction),
}

// ============================================================================
// Engagement
// ============================================================================

/// Shortest-path chase. Stepping onto the player's cell is a melee attack.
pub fn chase(enemy: &Enemy, ctx: &AiContext<'_>) -> EnemyAction {
    let target = ctx.player.position;
    let occupancy = ctx.occupancy();
    let can_step = |cell| occupancy.can_step(cell, enemy.id);
    match step_towards(&ctx.level.grid, enemy.position, target, can_step) {
        Some(direction) => step_or_strike(enemy, ctx, enemy.position.step(direction)),
        None => EnemyAction::Idle,
    }
}

/// Sidestep across the dominant axis, falling back to a direct chase.
///
/// The two perpendicular directions are tried in random order and a legal
/// sidestep is taken even if it does not shorten the distance.
pub fn flank(enemy: &Enemy, ctx: &AiContext<'_>, rng: &mut dyn RandomSource) -> EnemyAction {
    let dx = ctx.player.position.x - enemy.position.x;
    let dy = ctx.player.position.y - enemy.position.y;
    let dominant = if dx.abs() >= dy.abs() {
        Direction::East
    } else {
        Direction::South
    };
    let mut sides = dominant.perpendicular();
    if rng.coin() {
        sides.reverse();
    }
    let occupancy = ctx.occupancy();
    for side in sides {
        let next = enemy.position.step(side);
        if occupancy.can_step(next, enemy.id) {
            trace!(enemy = %enemy.id, ?side, "flanking");
            return EnemyAction::Move(next);
        }
    }
    chase(enemy, ctx)
}

/// Fires along an aligned, open line if there is one.
pub fn shoot(enemy: &Enemy, ctx: &AiContext<'_>) -> EnemyAction {
    ctx.firing_line(enemy.position)
        .map_or(EnemyAction::Idle, EnemyAction::Shoot)
}

/// Scripted town enforcer: greedy chase that never enters a home zone.
pub fn curfew(enemy: &Enemy, ctx: &AiContext<'_>) -> EnemyAction {
    if ctx.distance(enemy) == 1 {
        return EnemyAction::Attack;
    }
    let occupancy = ctx.occupancy();
    let Some(direction) = greedy_step(enemy.position, ctx.player.position, |cell| {
        occupancy.can_step(cell, enemy.id)
    }) else {
        return EnemyAction::Idle;
    };
    let next = enemy.position.step(direction);
    if ctx.level.zones.is_home(next) {
        trace!(enemy = %enemy.id, %next, "curfew step into a home reverted");
        return EnemyAction::Idle;
    }
    EnemyAction::Move(next)
}

// ============================================================================
// Search
// ============================================================================

/// Heads for the remembered target; once there, a random legal step.
pub fn investigate(enemy: &Enemy, ctx: &AiContext<'_>, rng: &mut dyn RandomSource) -> EnemyAction {
    let Some(target) = enemy.alert_target else {
        return EnemyAction::Idle;
    };
    if enemy.position == target {
        return random_step(enemy, ctx, rng);
    }
    move_towards(enemy, ctx, target)
}

/// Walks to a room center, choosing a fresh one when none is set or it was reached.
pub fn patrol(enemy: &mut Enemy, ctx: &AiContext<'_>, rng: &mut dyn RandomSource) -> EnemyAction {
    let rooms = &ctx.level.rooms;
    if rooms.is_empty() {
        return EnemyAction::Idle;
    }
    let target = match enemy.patrol_target {
        Some(target) if target != enemy.position => target,
        _ => {
            let room = &rooms[rng.below(rooms.len() as u32) as usize];
            let target = room.center();
            enemy.patrol_target = Some(target);
            target
        }
    };
    if target == enemy.position {
        return EnemyAction::Idle;
    }
    move_towards(enemy, ctx, target)
}

fn random_step(enemy: &Enemy, ctx: &AiContext<'_>, rng: &mut dyn RandomSource) -> EnemyAction {
    let occupancy = ctx.occupancy();
    let open: Vec<Position> = Direction::ALL
        .into_iter()
        .map(|direction| enemy.position.step(direction))
        .filter(|cell| occupancy.can_step(*cell, enemy.id))
        .collect();
    if open.is_empty() {
        return EnemyAction::Idle;
    }
    EnemyAction::Move(open[rng.below(open.len() as u32) as usize])
}

fn move_towards(enemy: &Enemy, ctx: &AiContext<'_>, target: Position) -> EnemyAction {
    let occupancy = ctx.occupancy();
    let can_step = |cell| occupancy.can_step(cell, enemy.id);
    step_towards(&ctx.level.grid, enemy.position, target, can_step)
        .map(|direction| enemy.position.step(direction))
        .filter(|next| occupancy.can_step(*next, enemy.id))
        .map_or(EnemyAction::Idle, EnemyAction::Move)
}

fn step_or_strike(enemy: &Enemy, ctx: &AiContext<'_>, next: Position) -> EnemyAction {
    if next == ctx.player.position {
        return EnemyAction::Attack;
    }
    if ctx.occupancy().can_step(next, enemy.id) {
        EnemyAction::Move(next)
    } else {
        EnemyAction::Idle
    }
}
