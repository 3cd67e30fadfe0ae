use tracing::{debug, warn};

use crate::collision::Occupancy;
use crate::config::SimConfig;
use crate::env::{NarrativeValue, SimEnv};
use crate::error::SimError;
use crate::pathfinding::step_towards;
use crate::state::{
    EntityId, GoalKind, Level, Npc, Position, Scene, SimEvent, TimePeriod, ZoneCells,
};

use super::{DailySchedule, scheduled_goal};

/// Read-only inputs shared by every NPC decision in one turn.
#[derive(Clone, Copy)]
pub struct NpcContext<'a> {
    pub zones: &'a ZoneCells,
    pub config: &'a SimConfig,
}

/// Picks the scheduled goal and resolves it to a cell.
///
/// The profile's rule list is evaluated against the narrative state; an NPC
/// whose profile is missing falls back to the default schedule, so a goal is
/// always chosen. A zone goal that did not change keeps its cell while the
/// cell stays walkable.
pub fn reselect_goal(
    npc: &mut Npc,
    level: &Level,
    period: TimePeriod,
    ctx: NpcContext<'_>,
    env: &mut SimEnv<'_>,
) {
    let goal = match env.content.npc_profile(&npc.profile) {
        Some(profile) => scheduled_goal(&profile.schedule, &*env.narrative, period),
        None => {
            warn!(profile = %npc.profile, "npc profile missing, using default schedule");
            DailySchedule::default().goal(period)
        }
    };
    let target = match npc.goal_position {
        Some(cell)
            if npc.goal == Some(goal)
                && goal.zone().is_some()
                && level.grid.is_walkable(cell) =>
        {
            cell
        }
        _ => goal_cell(npc, goal, level, ctx, env),
    };
    npc.goal = Some(goal);
    npc.goal_position = Some(target);
    npc.idle_turns = 0;
    npc.follow_turns = 0;
    debug!(npc = %npc.id, %goal, %target, "npc goal selected");
}

fn goal_cell(
    npc: &Npc,
    goal: GoalKind,
    level: &Level,
    ctx: NpcContext<'_>,
    env: &mut SimEnv<'_>,
) -> Position {
    match goal.zone() {
        Some(zone) => {
            let cells = ctx.zones.cells(zone);
            if cells.is_empty() {
                npc.anchors.anchor(zone)
            } else {
                cells[env.rng.below(cells.len() as u32) as usize]
            }
        }
        None => wander_cell(level, npc.position, ctx.config.wander_radius, env),
    }
}

/// Random walkable cell within a Manhattan radius, or `origin` when there is none.
fn wander_cell(level: &Level, origin: Position, radius: u32, env: &mut SimEnv<'_>) -> Position {
    let radius = radius as i32;
    let mut candidates = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let cell = Position::new(origin.x + dx, origin.y + dy);
            if cell != origin && cell.manhattan(origin) <= radius as u32 && level.grid.is_walkable(cell) {
                candidates.push(cell);
            }
        }
    }
    if candidates.is_empty() {
        return origin;
    }
    candidates[env.rng.below(candidates.len() as u32) as usize]
}

/// Reselects goals for every NPC on the level.
pub fn reselect_all(scene: &mut Scene<'_>, ctx: NpcContext<'_>, env: &mut SimEnv<'_>) {
    reselect_matching(scene, ctx, env, |_| true);
}

/// Reselects goals for NPCs whose schedule reads one of the `changed`
/// variables or graphs.
pub fn reselect_affected(
    scene: &mut Scene<'_>,
    changed: &[String],
    ctx: NpcContext<'_>,
    env: &mut SimEnv<'_>,
) {
    let content = env.content;
    reselect_matching(scene, ctx, env, |id| {
        content.npc_profile(id).is_some_and(|profile| {
            profile
                .schedule
                .rules()
                .iter()
                .any(|rule| changed.iter().any(|name| rule.when.mentions(name)))
        })
    });
}

fn reselect_matching(
    scene: &mut Scene<'_>,
    ctx: NpcContext<'_>,
    env: &mut SimEnv<'_>,
    affected: impl Fn(&str) -> bool,
) {
    let period = scene.clock.period();
    for id in scene.level.npc_ids() {
        let Some(mut npc) = scene.level.npc(id).cloned() else {
            continue;
        };
        if npc.is_pursuing_player() || !affected(npc.profile.as_str()) {
            continue;
        }
        reselect_goal(&mut npc, scene.level, period, ctx, env);
        if let Some(slot) = scene.level.npc_mut(id) {
            *slot = npc;
        }
    }
}

/// Resets daily conversation flags from each NPC's profile.
pub fn start_new_day(level: &mut Level, env: &SimEnv<'_>) {
    for npc in level.npcs_mut() {
        npc.talked_today = false;
        npc.wants_talk = env
            .content
            .npc_profile(&npc.profile)
            .is_some_and(|profile| profile.wants_talk);
    }
}

/// Runs the scheduler over every NPC that has appeared.
///
/// # Errors
///
/// Returns [`SimError::NpcNotFound`] if an NPC vanishes mid-iteration.
pub fn tick_npcs(scene: &mut Scene<'_>, ctx: NpcContext<'_>, env: &mut SimEnv<'_>) -> Result<(), SimError> {
    for id in scene.level.npc_ids() {
        tick_npc(scene, id, ctx, env)?;
    }
    Ok(())
}

/// One scheduler tick for a single NPC.
///
/// # Errors
///
/// Returns [`SimError::NpcNotFound`] if `id` is not an NPC on the level.
pub fn tick_npc(
    scene: &mut Scene<'_>,
    id: EntityId,
    ctx: NpcContext<'_>,
    env: &mut SimEnv<'_>,
) -> Result<(), SimError> {
    let mut npc = scene.level.npc(id).cloned().ok_or(SimError::NpcNotFound(id))?;
    let day = scene.clock.day();
    if day < npc.appears_on_day {
        return Ok(());
    }
    let player = scene.player.position;
    let period = scene.clock.period();

    if npc.wants_talk
        && !npc.talked_today
        && !npc.is_pursuing_player()
        && npc.position.manhattan(player) <= ctx.config.talk_radius
    {
        debug!(npc = %id, "npc approaches the player");
        npc.goal = Some(GoalKind::Player);
        npc.goal_position = Some(player);
        npc.follow_turns = 0;
        npc.idle_turns = 0;
    }

    if npc.is_pursuing_player() {
        if npc.position.manhattan(player) == 1 {
            write_back(scene.level, npc)?;
            return talk(scene, id, ctx, env);
        }
        npc.follow_turns += 1;
        if npc.follow_turns > ctx.config.follow_limit {
            debug!(npc = %id, "npc gives up on talking");
            npc.wants_talk = false;
            reselect_goal(&mut npc, scene.level, period, ctx, env);
        } else {
            npc.goal_position = Some(player);
            move_towards(&mut npc, scene.level, player, player, day);
        }
        return write_back(scene.level, npc);
    }

    // Idling counts every tick; pace only gates movement.
    if npc.idle_turns > 0 {
        npc.idle_turns -= 1;
        if npc.idle_turns == 0 {
            reselect_goal(&mut npc, scene.level, period, ctx, env);
        }
        return write_back(scene.level, npc);
    }

    npc.pace_counter += 1;
    if npc.pace_counter < npc.pace {
        return write_back(scene.level, npc);
    }
    npc.pace_counter = 0;

    let target = match npc.goal_position {
        Some(target) if npc.goal.is_some() => target,
        _ => {
            reselect_goal(&mut npc, scene.level, period, ctx, env);
            npc.goal_position.unwrap_or(npc.position)
        }
    };

    let arrived = if npc.position == target {
        true
    } else {
        // A goal cell held by another actor counts as reached once adjacent.
        let moved = move_towards(&mut npc, scene.level, target, player, day);
        !moved && npc.position.manhattan(target) == 1
    };
    if arrived {
        npc.idle_turns = idle_duration(ctx.config, env);
        debug!(npc = %id, idle = npc.idle_turns, "npc reached its goal");
    }
    write_back(scene.level, npc)
}

fn idle_duration(config: &SimConfig, env: &mut SimEnv<'_>) -> u32 {
    env.rng.range(config.idle_min as i32, config.idle_max as i32).max(1) as u32
}

/// Moves one step; returns false when no legal step exists.
fn move_towards(npc: &mut Npc, level: &Level, target: Position, player: Position, day: u32) -> bool {
    let occupancy = Occupancy::new(level, player, day);
    let id = npc.id;
    let can_step = |cell| occupancy.can_step(cell, id);
    let Some(direction) = step_towards(&level.grid, npc.position, target, can_step) else {
        return false;
    };
    let next = npc.position.step(direction);
    if !occupancy.can_step(next, id) {
        return false;
    }
    npc.position = next;
    true
}

fn write_back(level: &mut Level, npc: Npc) -> Result<(), SimError> {
    let id = npc.id;
    let slot = level.npc_mut(id).ok_or(SimError::NpcNotFound(id))?;
    *slot = npc;
    Ok(())
}

/// Resolves a conversation with an NPC, from adjacency or a player bump.
///
/// Records the meeting on the narrative state and sends the NPC back to its
/// schedule.
///
/// # Errors
///
/// Returns [`SimError::NpcNotFound`] if `id` is not an NPC on the level.
pub fn talk(
    scene: &mut Scene<'_>,
    id: EntityId,
    ctx: NpcContext<'_>,
    env: &mut SimEnv<'_>,
) -> Result<(), SimError> {
    let mut npc = scene.level.npc(id).cloned().ok_or(SimError::NpcNotFound(id))?;
    npc.talked_today = true;
    npc.wants_talk = false;
    env.narrative.set_variable(
        &format!("met_{}", npc.profile),
        NarrativeValue::Bool(true),
        "talked with npc",
    );
    env.narrative
        .increment(&format!("talks_{}", npc.profile), "talked with npc");
    scene.events.push(SimEvent::Talked {
        npc: id,
        profile: npc.profile.clone(),
    });
    debug!(npc = %id, profile = %npc.profile, "conversation");
    reselect_goal(&mut npc, scene.level, scene.clock.period(), ctx, env);
    write_back(scene.level, npc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{
        ContentOracle, DeathLog, NarrativeMemory, NarrativeOracle, ScriptedRng,
    };
    use crate::fixtures::FixtureContent;
    use strum::IntoEnumIterator;
    use crate::state::{
        Actor, EventLog, Grid, LevelId, LevelKind, Player, Room, TileKind, WorldClock, ZoneKind,
        ZoneMap,
    };

    struct Town {
        level: Level,
        player: Player,
        events: EventLog,
        clock: WorldClock,
        zones: ZoneCells,
        config: SimConfig,
        content: FixtureContent,
        narrative: NarrativeMemory,
        death: DeathLog,
        rng: ScriptedRng,
    }

    impl Town {
        fn new() -> Self {
            let content = FixtureContent::default();
            let layout = content.town();
            let grid = Grid::from_rows(&layout.rows).unwrap();
            let mut level = Level::new(
                LevelId(1),
                LevelKind::Town,
                grid,
                vec![Room::new(1, 1, 8, 4)],
                layout.player_start,
            );
            level.zones = ZoneMap::from_rows(&layout.zones).unwrap();
            let zones = level.zones.walkable_cells(&level.grid);
            Self {
                level,
                player: Player::new(Position::new(8, 4), 30, 5, 1),
                events: EventLog::default(),
                clock: WorldClock::default(),
                zones,
                config: SimConfig::default(),
                content,
                narrative: NarrativeMemory::default(),
                death: DeathLog::default(),
                rng: ScriptedRng::constant(0),
            }
        }

        fn add_npc(&mut self, wants_talk: bool, position: Position) -> EntityId {
            let id = self.level.allocate_id();
            let mut npc = self.content.npc_profile("ada").unwrap().spawn(id);
            npc.wants_talk = wants_talk;
            npc.position = position;
            self.level.actors.push(Actor::Npc(npc));
            id
        }

        fn tick(&mut self, id: EntityId) {
            let ctx = NpcContext {
                zones: &self.zones,
                config: &self.config,
            };
            let mut env = SimEnv::new(
                &self.content,
                &mut self.narrative,
                &mut self.death,
                &mut self.rng,
            );
            let mut scene = Scene {
                level: &mut self.level,
                player: &mut self.player,
                events: &mut self.events,
                clock: &self.clock,
            };
            tick_npc(&mut scene, id, ctx, &mut env).unwrap();
        }

        fn npc(&self, id: EntityId) -> &Npc {
            self.level.npc(id).unwrap()
        }
    }

    #[test]
    fn zone_goals_resolve_to_zone_cells() {
        let mut town = Town::new();
        let id = town.add_npc(false, Position::new(4, 2));
        town.tick(id);
        let npc = town.npc(id);
        // Morning on the default schedule is the cafe.
        assert_eq!(npc.goal, Some(GoalKind::Cafe));
        let target = npc.goal_position.unwrap();
        assert_eq!(town.level.zones.zone_at(target), Some(ZoneKind::Cafe));
    }

    #[test]
    fn empty_zone_falls_back_to_the_anchor() {
        let mut town = Town::new();
        town.zones = ZoneCells::default();
        town.clock = WorldClock::new(1, 23 * 60);
        let id = town.add_npc(false, Position::new(4, 2));
        town.tick(id);
        let npc = town.npc(id);
        assert_eq!(npc.goal, Some(GoalKind::Home));
        assert_eq!(npc.goal_position, Some(npc.anchors.home));
    }

    #[test]
    fn every_period_yields_a_goal() {
        let mut town = Town::new();
        let id = town.add_npc(false, Position::new(4, 2));
        for period in TimePeriod::iter() {
            let mut npc = town.npc(id).clone();
            let ctx = NpcContext {
                zones: &town.zones,
                config: &town.config,
            };
            let mut env = SimEnv::new(
                &town.content,
                &mut town.narrative,
                &mut town.death,
                &mut town.rng,
            );
            reselect_goal(&mut npc, &town.level, period, ctx, &mut env);
            assert!(npc.goal.is_some());
            assert!(npc.goal_position.is_some());
        }
    }

    #[test]
    fn talk_override_pursues_then_gives_up() {
        let mut town = Town::new();
        town.player.position = Position::new(5, 1);
        // Wall the NPC in so it can never reach the player.
        let id = town.add_npc(true, Position::new(1, 4));
        town.level.grid.set(Position::new(1, 3), TileKind::Wall);
        town.level.grid.set(Position::new(2, 4), TileKind::Wall);

        town.tick(id);
        assert!(town.npc(id).is_pursuing_player());
        town.tick(id);
        town.tick(id);
        assert!(town.npc(id).is_pursuing_player());
        town.tick(id);
        let npc = town.npc(id);
        assert!(!npc.is_pursuing_player());
        assert!(!npc.wants_talk);
        assert!(!npc.talked_today);
    }

    #[test]
    fn adjacent_pursuit_talks_and_records_milestones() {
        let mut town = Town::new();
        town.player.position = Position::new(4, 2);
        let id = town.add_npc(true, Position::new(5, 2));
        town.tick(id);
        // Override engages and talks on the same tick when adjacent.
        let npc = town.npc(id);
        assert!(npc.talked_today);
        assert!(!npc.wants_talk);
        assert_ne!(npc.goal, Some(GoalKind::Player));
        assert_eq!(
            town.narrative.get_variable("met_ada"),
            Some(NarrativeValue::Bool(true))
        );
        assert_eq!(
            town.narrative.get_variable("talks_ada"),
            Some(NarrativeValue::Int(1))
        );
        assert!(town.events.iter().any(|event| matches!(event, SimEvent::Talked { .. })));
    }

    #[test]
    fn pace_gates_scheduled_movement() {
        let mut town = Town::new();
        let id = town.add_npc(false, Position::new(4, 2));
        town.level.npc_mut(id).unwrap().pace = 3;
        let start = town.npc(id).position;
        town.tick(id);
        town.tick(id);
        assert_eq!(town.npc(id).position, start);
        town.tick(id);
        assert_ne!(town.npc(id).position, start);
    }

    #[test]
    fn arriving_starts_an_idle_spell() {
        let mut town = Town::new();
        let id = town.add_npc(false, Position::new(7, 1));
        {
            let npc = town.level.npc_mut(id).unwrap();
            npc.goal = Some(GoalKind::Cafe);
            npc.goal_position = Some(Position::new(7, 1));
        }
        town.tick(id);
        // Scripted draw 0 lands on the configured minimum.
        assert_eq!(town.npc(id).idle_turns, 2);
        town.tick(id);
        town.tick(id);
        assert_eq!(town.npc(id).idle_turns, 0);
        assert!(town.npc(id).goal_position.is_some());
    }

    #[test]
    fn zone_cell_holds_while_the_goal_is_unchanged() {
        let mut town = Town::new();
        // A draw of 1 would pick the other cafe cell, (8, 1).
        town.rng = ScriptedRng::constant(1);
        let id = town.add_npc(false, Position::new(7, 1));
        {
            let npc = town.level.npc_mut(id).unwrap();
            npc.goal = Some(GoalKind::Cafe);
            npc.goal_position = Some(Position::new(7, 1));
            npc.idle_turns = 1;
        }
        town.tick(id);
        let npc = town.npc(id);
        assert_eq!(npc.goal, Some(GoalKind::Cafe));
        assert_eq!(npc.goal_position, Some(Position::new(7, 1)));
    }

    #[test]
    fn changed_goal_draws_a_new_cell() {
        let mut town = Town::new();
        town.clock = WorldClock::new(1, 23 * 60);
        let id = town.add_npc(false, Position::new(7, 1));
        {
            let npc = town.level.npc_mut(id).unwrap();
            npc.goal = Some(GoalKind::Cafe);
            npc.goal_position = Some(Position::new(7, 1));
            npc.idle_turns = 1;
        }
        town.tick(id);
        let npc = town.npc(id);
        assert_eq!(npc.goal, Some(GoalKind::Home));
        let target = npc.goal_position.unwrap();
        assert_eq!(town.level.zones.zone_at(target), Some(ZoneKind::Home));
    }

    #[test]
    fn idle_spells_count_ticks_not_paced_steps() {
        let mut town = Town::new();
        let id = town.add_npc(false, Position::new(7, 1));
        {
            let npc = town.level.npc_mut(id).unwrap();
            npc.pace = 3;
            npc.goal = Some(GoalKind::Cafe);
            npc.goal_position = Some(Position::new(7, 1));
            npc.idle_turns = 2;
        }
        town.tick(id);
        assert_eq!(town.npc(id).idle_turns, 1);
        town.tick(id);
        assert_eq!(town.npc(id).idle_turns, 0);
    }

    #[test]
    fn unappeared_npcs_do_nothing() {
        let mut town = Town::new();
        let id = town.add_npc(true, Position::new(4, 2));
        town.level.npc_mut(id).unwrap().appears_on_day = 2;
        town.tick(id);
        assert_eq!(town.npc(id).goal, None);
    }

    #[test]
    fn new_day_restores_talk_wishes() {
        let mut town = Town::new();
        let id = town.add_npc(false, Position::new(4, 2));
        town.level.npc_mut(id).unwrap().talked_today = true;
        let env = SimEnv::new(
            &town.content,
            &mut town.narrative,
            &mut town.death,
            &mut town.rng,
        );
        start_new_day(&mut town.level, &env);
        let npc = town.npc(id);
        assert!(!npc.talked_today);
        assert!(npc.wants_talk);
    }
}
