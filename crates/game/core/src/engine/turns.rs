use tracing::{debug, info, trace};

use crate::ai;
use crate::collision::Occupancy;
use crate::combat::{apply_pickup, player_strikes_enemy};
use crate::config::SimConfig;
use crate::env::{CURFEW_TEMPLATE, SimEnv};
use crate::error::SimError;
use crate::npc::{self, NpcContext};
use crate::state::{
    Actor, AmbientCue, Behavior, ClockAdvance, EntityId, Position, Scene, SimEvent, TileKind,
    TimePeriod,
};

use super::{Intent, TurnEngine, TurnReport, zone_cells};

/// What the player bumped into.
enum Bump {
    Enemy(EntityId),
    Npc(EntityId),
    Service(EntityId, String),
}

impl TurnEngine<'_> {
    /// Runs one full turn for `intent`.
    ///
    /// # Errors
    ///
    /// Fails fast with [`SimError::NoActiveLevel`] before a session exists, and
    /// propagates missing-entity and missing-template errors from subsystems.
    pub fn run_turn(&mut self, intent: Intent, env: &mut SimEnv<'_>) -> Result<TurnReport, SimError> {
        self.state.active_level()?;

        let moved = self.resolve_intent(intent, env)?;
        let exited_level = if moved { self.trigger_tile(env)? } else { false };
        self.advance_time(env)?;
        self.refresh_visibility()?;
        self.run_actors(env)?;
        self.emit_ambient()?;

        let events = self.state.events.drain();
        if events.contains(&SimEvent::Victory) {
            self.state.victory = true;
        }
        let report = TurnReport {
            turn: self.state.turn,
            level: self.state.active_level()?.kind,
            events,
            exited_level,
            player_alive: self.state.player.is_alive(),
            victory: self.state.victory,
        };
        trace!(turn = report.turn, events = report.events.len(), "turn complete");
        Ok(report)
    }

    /// Step 1. Returns true when the player changed cells.
    fn resolve_intent(&mut self, intent: Intent, env: &mut SimEnv<'_>) -> Result<bool, SimError> {
        if !self.state.player.is_alive() {
            return Ok(false);
        }
        let (direction, may_move) = match intent {
            Intent::Wait => return Ok(false),
            Intent::Move(direction) => (direction, true),
            Intent::Interact(direction) => (direction, false),
        };

        let config = self.config;
        let day = self.state.clock.day();
        let token = self.state.cache_token()?;
        let (mut scene, caches) = self.state.scene_and_caches()?;
        let target = scene.player.position.step(direction);

        let bump = scene.level.actor_at(target, day).map(|actor| match actor {
            Actor::Enemy(enemy) => Bump::Enemy(enemy.id),
            Actor::Npc(npc) => Bump::Npc(npc.id),
            Actor::SystemNpc(system) => Bump::Service(system.id, system.service.clone()),
        });
        match bump {
            Some(Bump::Enemy(id)) => {
                let outcome = player_strikes_enemy(&mut scene, id, config, env)?;
                debug!(enemy = %id, damage = outcome.damage, killed = outcome.killed, "bump attack");
                return Ok(false);
            }
            Some(Bump::Npc(id)) => {
                let zones = zone_cells(caches, scene.level, token);
                npc::talk(&mut scene, id, NpcContext { zones, config }, env)?;
                return Ok(false);
            }
            Some(Bump::Service(id, service)) => {
                env.narrative
                    .increment(&format!("visits_{service}"), "visited service");
                scene.events.push(SimEvent::ServiceVisited { id, service });
                return Ok(false);
            }
            None => {}
        }

        if !may_move {
            if scene.level.grid.get(target) == Some(TileKind::Terminal) {
                use_terminal(&mut scene, target, env);
            }
            return Ok(false);
        }

        let occupancy = Occupancy::new(scene.level, scene.player.position, day);
        if !occupancy.can_step(target, EntityId::PLAYER) {
            return Ok(false);
        }
        scene.player.position = target;
        if let Some(item) = scene.level.take_item_at(target) {
            apply_pickup(&mut scene, item, config);
        }
        Ok(true)
    }

    /// Step 2. Returns true when the player left the generated level.
    fn trigger_tile(&mut self, env: &mut SimEnv<'_>) -> Result<bool, SimError> {
        let position = self.state.player.position;
        let tile = self.state.active_level()?.grid.get(position);
        match tile {
            Some(TileKind::StairsUp) if self.state.in_expedition() => {
                self.exit_level()?;
                Ok(true)
            }
            Some(TileKind::Terminal) => {
                let mut scene = self.state.scene()?;
                use_terminal(&mut scene, position, env);
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    /// Step 3: shared counter, town clock and its consequences, buff countdowns.
    fn advance_time(&mut self, env: &mut SimEnv<'_>) -> Result<(), SimError> {
        let config = self.config;
        self.state.turn += 1;
        self.state.player.buffs.tick();

        let in_town = self.state.active_level()?.kind.is_town();
        let advance = if in_town {
            self.state.clock.advance(config.minutes_per_turn)
        } else {
            ClockAdvance::default()
        };
        let changed: Vec<String> = env
            .narrative
            .drain_notifications()
            .into_iter()
            .map(|notification| notification.subject)
            .collect();

        let token = self.state.cache_token()?;
        let (mut scene, caches) = self.state.scene_and_caches()?;
        scene.level.turn += 1;
        if !in_town {
            return Ok(());
        }

        if let Some(day) = advance.new_day {
            info!(day, "new day");
            scene.events.push(SimEvent::NewDay(day));
            npc::start_new_day(scene.level, env);
        }
        if let Some(period) = advance.period_changed {
            info!(%period, "time period changed");
            scene.events.push(SimEvent::PeriodChanged(period));
            update_curfew(&mut scene, period, env)?;
        }
        if advance.period_changed.is_some() {
            let zones = zone_cells(caches, scene.level, token);
            npc::reselect_all(&mut scene, NpcContext { zones, config }, env);
        } else if !changed.is_empty() {
            let zones = zone_cells(caches, scene.level, token);
            npc::reselect_affected(&mut scene, &changed, NpcContext { zones, config }, env);
        }
        Ok(())
    }

    /// Step 5: enemies first, then town characters.
    fn run_actors(&mut self, env: &mut SimEnv<'_>) -> Result<(), SimError> {
        let config = self.config;
        let token = self.state.cache_token()?;
        let (mut scene, caches) = self.state.scene_and_caches()?;
        ai::step_enemies(&mut scene, config, env)?;
        if scene.level.kind.is_town() {
            let zones = zone_cells(caches, scene.level, token);
            npc::tick_npcs(&mut scene, NpcContext { zones, config }, env)?;
        }
        Ok(())
    }

    /// Step 6: cues on fixed multiples of the level-local counter.
    fn emit_ambient(&mut self) -> Result<(), SimError> {
        let turn = self.state.active_level()?.turn;
        for cue in ambient_cues(turn, self.config) {
            self.state.events.push(SimEvent::Ambient(cue));
        }
        Ok(())
    }
}

fn ambient_cues(turn: u64, config: &SimConfig) -> impl Iterator<Item = AmbientCue> {
    let due = |interval: u64| interval > 0 && turn % interval == 0;
    let hum = due(config.hum_interval).then_some(AmbientCue::Hum);
    let prompt = due(config.prompt_interval).then_some(AmbientCue::Prompt);
    hum.into_iter().chain(prompt)
}

fn use_terminal(scene: &mut Scene<'_>, position: Position, env: &mut SimEnv<'_>) {
    scene.level.grid.set(position, TileKind::TerminalUsed);
    scene.events.push(SimEvent::TerminalUsed { position });
    let used = env.narrative.increment("terminals_used", "terminal used");
    debug!(%position, used, "terminal used");
}

/// Enforcers take their posts at night and withdraw in the morning.
fn update_curfew(scene: &mut Scene<'_>, period: TimePeriod, env: &mut SimEnv<'_>) -> Result<(), SimError> {
    match period {
        TimePeriod::Night => {
            let template = env
                .content
                .enemy(CURFEW_TEMPLATE)
                .ok_or_else(|| SimError::MissingTemplate(CURFEW_TEMPLATE.to_string()))?;
            let day = scene.clock.day();
            let free: Vec<Position> = {
                let occupancy = Occupancy::new(scene.level, scene.player.position, day);
                env.content
                    .town()
                    .curfew_posts
                    .iter()
                    .copied()
                    .filter(|post| occupancy.can_step(*post, EntityId::PLAYER))
                    .collect()
            };
            for post in &free {
                let id = scene.level.allocate_id();
                scene
                    .level
                    .actors
                    .push(Actor::Enemy(template.spawn(id, *post, 1)));
            }
            info!(enforcers = free.len(), "curfew begins");
        }
        TimePeriod::Morning => {
            let before = scene.level.actors.len();
            scene.level.actors.retain(|actor| {
                !matches!(actor, Actor::Enemy(enemy) if enemy.behavior == Behavior::Curfew)
            });
            info!(withdrawn = before - scene.level.actors.len(), "curfew lifted");
        }
        TimePeriod::Afternoon | TimePeriod::Evening => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{
        DeathLog, NarrativeMemory, NarrativeOracle, NarrativeValue, NpcProfile, ScriptedRng,
    };
    use crate::fixtures::{FixtureContent, arena, spawn_enemy};
    use crate::npc::DailySchedule;
    use crate::rules::{Condition, RuleList};
    use crate::state::{
        Direction, Expedition, GoalKind, Item, ItemKind, Level, LevelKind, Player, SimState,
        WorldClock,
    };

    struct Game {
        state: SimState,
        config: SimConfig,
        content: FixtureContent,
        narrative: NarrativeMemory,
        death: DeathLog,
        rng: ScriptedRng,
    }

    impl Game {
        fn new() -> Self {
            Self::with_content(FixtureContent::default())
        }

        fn with_content(content: FixtureContent) -> Self {
            let mut game = Self {
                state: SimState::new(Player::new(Position::ORIGIN, 1, 1, 0)),
                config: SimConfig::default(),
                content,
                narrative: NarrativeMemory::default(),
                death: DeathLog::default(),
                rng: ScriptedRng::constant(2),
            };
            game.session(|engine, env| engine.new_session(env)).unwrap();
            game
        }

        /// Swaps in a hand-built expedition level.
        fn with_expedition(mut self, mut level: Level, player: Position) -> Self {
            level.id = self.state.allocate_level_id();
            self.state.expedition = Some(Expedition {
                level,
                return_position: self.state.player.position,
            });
            self.state.player.position = player;
            self
        }

        fn session<T>(&mut self, f: impl FnOnce(&mut TurnEngine<'_>, &mut SimEnv<'_>) -> T) -> T {
            let mut env = SimEnv::new(
                &self.content,
                &mut self.narrative,
                &mut self.death,
                &mut self.rng,
            );
            let mut engine = TurnEngine::new(&mut self.state, &self.config);
            f(&mut engine, &mut env)
        }

        fn turn(&mut self, intent: Intent) -> TurnReport {
            self.session(|engine, env| engine.run_turn(intent, env)).unwrap()
        }
    }

    #[test]
    fn turns_require_a_session() {
        let mut state = SimState::new(Player::new(Position::ORIGIN, 10, 1, 0));
        let config = SimConfig::default();
        let content = FixtureContent::default();
        let mut narrative = NarrativeMemory::default();
        let mut death = DeathLog::default();
        let mut rng = ScriptedRng::constant(0);
        let mut env = SimEnv::new(&content, &mut narrative, &mut death, &mut rng);
        let mut engine = TurnEngine::new(&mut state, &config);
        assert_eq!(
            engine.run_turn(Intent::Wait, &mut env),
            Err(SimError::NoActiveLevel)
        );
    }

    #[test]
    fn moving_onto_an_item_picks_it_up() {
        let mut level = arena(10);
        let id = level.allocate_id();
        level
            .items
            .push(Item::new(id, Position::new(3, 2), ItemKind::Currency { value: 15 }));
        let mut game = Game::new().with_expedition(level, Position::new(2, 2));

        let report = game.turn(Intent::Move(Direction::East));
        assert_eq!(game.state.player.position, Position::new(3, 2));
        assert_eq!(game.state.active_level().unwrap().tally.currency, 15);
        assert!(report.events.iter().any(|event| matches!(event, SimEvent::Pickup { .. })));
        assert_eq!(report.turn, 1);
    }

    #[test]
    fn walls_turn_moves_into_no_ops() {
        let mut level = arena(10);
        level.grid.set(Position::new(3, 2), TileKind::Wall);
        let mut game = Game::new().with_expedition(level, Position::new(2, 2));
        let report = game.turn(Intent::Move(Direction::East));
        assert_eq!(game.state.player.position, Position::new(2, 2));
        assert_eq!(report.turn, 1);
    }

    #[test]
    fn bumping_an_enemy_attacks_instead_of_moving() {
        let mut level = arena(10);
        let target = spawn_enemy(&mut level, "drone", Position::new(3, 2));
        let mut game = Game::new().with_expedition(level, Position::new(2, 2));
        game.turn(Intent::Move(Direction::East));
        assert_eq!(game.state.player.position, Position::new(2, 2));
        let enemy = game.state.active_level().unwrap().enemy(target).unwrap();
        // Player atk 5 against def 0 with +1 offset.
        assert_eq!(enemy.hp, 2);
    }

    #[test]
    fn stairs_return_the_player_to_town() {
        let mut level = arena(10);
        level.grid.set(Position::new(3, 2), TileKind::StairsUp);
        level.tally.kills = 2;
        let mut game = Game::new().with_expedition(level, Position::new(2, 2));
        let home = game.state.expedition.as_ref().unwrap().return_position;

        let report = game.turn(Intent::Move(Direction::East));
        assert!(report.exited_level);
        assert_eq!(report.level, LevelKind::Town);
        assert_eq!(game.state.player.position, home);
        assert_eq!(game.state.totals.kills, 2);
        assert!(report.events.contains(&SimEvent::LevelExited(LevelKind::Depth(1))));
    }

    #[test]
    fn terminals_are_used_once() {
        let mut level = arena(10);
        level.grid.set(Position::new(3, 2), TileKind::Terminal);
        let mut game = Game::new().with_expedition(level, Position::new(2, 2));
        game.turn(Intent::Move(Direction::East));
        let level = game.state.active_level().unwrap();
        assert_eq!(level.grid.get(Position::new(3, 2)), Some(TileKind::TerminalUsed));
        assert_eq!(
            game.narrative.get_variable("terminals_used"),
            Some(NarrativeValue::Int(1))
        );
        game.turn(Intent::Move(Direction::West));
        game.turn(Intent::Move(Direction::East));
        assert_eq!(
            game.narrative.get_variable("terminals_used"),
            Some(NarrativeValue::Int(1))
        );
    }

    #[test]
    fn interacting_uses_an_adjacent_terminal_without_moving() {
        let mut level = arena(10);
        level.grid.set(Position::new(2, 1), TileKind::Terminal);
        let mut game = Game::new().with_expedition(level, Position::new(2, 2));
        let report = game.turn(Intent::Interact(Direction::North));
        assert_eq!(game.state.player.position, Position::new(2, 2));
        assert!(report.events.iter().any(|event| matches!(event, SimEvent::TerminalUsed { .. })));
    }

    #[test]
    fn bumping_an_npc_talks() {
        let mut game = Game::new();
        let npc = game.state.active_level().unwrap().npcs().next().unwrap().id;
        {
            let level = game.state.active_level_mut().unwrap();
            level.npc_mut(npc).unwrap().position = Position::new(5, 2);
        }
        game.state.player.position = Position::new(4, 2);
        game.turn(Intent::Move(Direction::East));
        assert_eq!(
            game.narrative.get_variable("met_ada"),
            Some(NarrativeValue::Bool(true))
        );
        assert!(game.state.active_level().unwrap().npc(npc).unwrap().talked_today);
    }

    #[test]
    fn talking_replans_only_schedules_that_read_the_talk() {
        let mut content = FixtureContent::default();
        content
            .npcs
            .push(NpcProfile::builder("bo").spawn(Position::new(7, 4)).build());
        content.npcs.push(
            NpcProfile::builder("cy")
                .spawn(Position::new(1, 4))
                .schedule(RuleList::new(DailySchedule::default()).with_rule(
                    Condition::AtLeast("talks_ada".into(), 1),
                    DailySchedule::constant(GoalKind::Garden),
                ))
                .build(),
        );
        let mut game = Game::with_content(content);
        let find = |game: &Game, profile: &str| {
            let town = game.state.active_level().unwrap();
            town.npcs().find(|npc| npc.profile == profile).unwrap().id
        };
        let (ada, bo, cy) = (find(&game, "ada"), find(&game, "bo"), find(&game, "cy"));
        {
            let town = game.state.active_level_mut().unwrap();
            town.npc_mut(ada).unwrap().position = Position::new(5, 2);
            town.npc_mut(bo).unwrap().idle_turns = 5;
        }
        game.state.player.position = Position::new(4, 2);
        let bo_cell = game.state.active_level().unwrap().npc(bo).unwrap().goal_position;

        game.turn(Intent::Move(Direction::East));
        let town = game.state.active_level().unwrap();
        let bo = town.npc(bo).unwrap();
        // Bo's schedule never reads talks_ada: its idle spell just counts down.
        assert_eq!(bo.idle_turns, 4);
        assert_eq!(bo.goal_position, bo_cell);
        assert_eq!(town.npc(cy).unwrap().goal, Some(GoalKind::Garden));
    }

    #[test]
    fn town_clock_advances_and_curfew_comes_and_goes() {
        let mut game = Game::new();
        game.state.clock = WorldClock::new(1, 22 * 60 - 5);
        let report = game.turn(Intent::Wait);
        assert!(report.events.contains(&SimEvent::PeriodChanged(TimePeriod::Night)));
        let town = game.state.active_level().unwrap();
        assert_eq!(
            town.enemies()
                .filter(|enemy| enemy.behavior == Behavior::Curfew)
                .count(),
            1
        );

        game.state.clock = WorldClock::new(2, 6 * 60 - 5);
        let report = game.turn(Intent::Wait);
        assert!(report.events.contains(&SimEvent::PeriodChanged(TimePeriod::Morning)));
        assert!(!game.state.active_level().unwrap().has_enemies());
    }

    #[test]
    fn generated_levels_keep_the_clock_still() {
        let mut game = Game::new().with_expedition(arena(10), Position::new(2, 2));
        let minute = game.state.clock.minute();
        game.turn(Intent::Wait);
        game.turn(Intent::Wait);
        assert_eq!(game.state.clock.minute(), minute);
        assert_eq!(game.state.active_level().unwrap().turn, 2);
        assert_eq!(game.state.turn, 2);
    }

    #[test]
    fn buffs_tick_once_per_turn() {
        let mut game = Game::new().with_expedition(arena(10), Position::new(2, 2));
        game.state.player.buffs.cloak_turns = 2;
        game.turn(Intent::Wait);
        assert_eq!(game.state.player.buffs.cloak_turns, 1);
    }

    #[test]
    fn ambient_cues_follow_the_level_counter() {
        let config = SimConfig::default();
        assert_eq!(ambient_cues(15, &config).collect::<Vec<_>>(), vec![AmbientCue::Hum]);
        assert_eq!(ambient_cues(40, &config).collect::<Vec<_>>(), vec![AmbientCue::Prompt]);
        assert_eq!(
            ambient_cues(120, &config).collect::<Vec<_>>(),
            vec![AmbientCue::Hum, AmbientCue::Prompt]
        );
        assert_eq!(ambient_cues(7, &config).count(), 0);
    }

    #[test]
    fn killing_the_last_enemy_on_the_deepest_level_wins() {
        let mut level = arena(10);
        level.kind = LevelKind::Depth(5);
        let last = spawn_enemy(&mut level, "drone", Position::new(3, 2));
        let mut game = Game::new().with_expedition(level, Position::new(2, 2));
        game.state.expedition.as_mut().unwrap().level.enemy_mut(last).unwrap().hp = 1;
        let report = game.turn(Intent::Move(Direction::East));
        assert!(report.victory);
        assert!(game.state.victory);
    }

    #[test]
    fn waiting_player_keeps_the_cached_light_while_enemies_move() {
        let mut level = arena(12);
        let drone = spawn_enemy(&mut level, "drone", Position::new(8, 2));
        let mut game = Game::new().with_expedition(level, Position::new(2, 2));
        game.turn(Intent::Wait);
        let light = game.state.active_level().unwrap().light.clone();
        let first = game.state.active_level().unwrap().enemy(drone).unwrap().position;

        game.turn(Intent::Wait);
        let level = game.state.active_level().unwrap();
        assert_ne!(level.enemy(drone).unwrap().position, first);
        assert_eq!(level.light, light);
        assert_eq!(game.state.caches.light.len(), 1);
    }

    #[test]
    fn enemies_act_after_the_player() {
        let mut level = arena(10);
        spawn_enemy(&mut level, "drone", Position::new(4, 2));
        let mut game = Game::new().with_expedition(level, Position::new(2, 2));
        game.turn(Intent::Wait);
        // The drone closed to melee range during its own step.
        let level = game.state.active_level().unwrap();
        assert_eq!(level.enemies().next().unwrap().position, Position::new(3, 2));
        assert_eq!(game.state.player.hp, 30);
    }
}
