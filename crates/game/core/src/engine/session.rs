use tracing::info;

use crate::env::{ContentOracle, NarrativeValue, NotificationKind, SimEnv};
use crate::error::SimError;
use crate::generation::{generate_level, populate};
use crate::npc::{self, NpcContext};
use crate::state::{
    Actor, EventLog, Expedition, Grid, Level, LevelId, LevelKind, Room, RunTally, SimEvent,
    Totals, WorldClock, ZoneMap,
};
use crate::visibility;

use super::{TurnEngine, zone_cells};

/// Builds the persistent town level from content.
///
/// # Errors
///
/// Returns [`SimError::InvalidLayout`] if the tile rows or zone rows do not parse.
pub fn build_town(id: LevelId, content: &dyn ContentOracle) -> Result<Level, SimError> {
    let layout = content.town();
    let grid = Grid::from_rows(&layout.rows)?;
    let bounds = Room::new(0, 0, grid.width(), grid.height());
    let mut town = Level::new(id, LevelKind::Town, grid, vec![bounds], layout.player_start);
    if !layout.zones.is_empty() {
        town.zones = ZoneMap::from_rows(&layout.zones)?;
    }
    for profile in content.npc_profiles() {
        let id = town.allocate_id();
        town.actors.push(Actor::Npc(profile.spawn(id)));
    }
    for profile in content.system_npcs() {
        let id = town.allocate_id();
        town.actors.push(Actor::SystemNpc(profile.spawn(id)));
    }
    Ok(town)
}

impl TurnEngine<'_> {
    /// Starts a fresh session in the town.
    ///
    /// Resets the clock, totals and player, spawns every town character and
    /// gives each NPC its first goal.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidLayout`] for an unparsable town.
    pub fn new_session(&mut self, env: &mut SimEnv<'_>) -> Result<(), SimError> {
        let town_id = self.state.allocate_level_id();
        let town = build_town(town_id, env.content)?;
        let start = town.entry;

        let state = &mut *self.state;
        state.player = env.content.player_template().spawn(start);
        state.clock = WorldClock::default();
        state.turn = 0;
        state.town = Some(town);
        state.expedition = None;
        state.totals = Totals::default();
        state.events = EventLog::default();
        state.victory = false;

        env.narrative.subscribe(NotificationKind::VariableChanged);
        env.narrative.subscribe(NotificationKind::NodeTransition);

        let config = self.config;
        let token = self.state.cache_token()?;
        let (mut scene, caches) = self.state.scene_and_caches()?;
        let zones = zone_cells(caches, scene.level, token);
        npc::reselect_all(&mut scene, NpcContext { zones, config }, env);

        self.refresh_visibility()?;
        info!(level = %town_id, version = self.state.version, "session started");
        Ok(())
    }

    /// Leaves the town for a freshly generated level at `depth`.
    ///
    /// # Errors
    ///
    /// - [`SimError::AlreadyInLevel`] when an expedition is in progress
    /// - [`SimError::InvalidDepth`] outside `1..=max_depth`
    /// - [`SimError::NoActiveLevel`] before a session was started
    /// - [`SimError::MissingTemplate`] when population names unknown content
    pub fn enter_level(&mut self, depth: u32, env: &mut SimEnv<'_>) -> Result<(), SimError> {
        if let Some(expedition) = &self.state.expedition {
            return Err(SimError::AlreadyInLevel(expedition.level.kind));
        }
        let max = self.config.max_depth;
        if depth == 0 || depth > max {
            return Err(SimError::InvalidDepth { depth, max });
        }
        if self.state.town.is_none() {
            return Err(SimError::NoActiveLevel);
        }

        let config = self.config;
        let map = generate_level(config.level_width, config.level_height, depth, env.rng);
        let id = self.state.allocate_level_id();
        let kind = LevelKind::Depth(depth);
        let mut level = Level::new(id, kind, map.grid, map.rooms, map.entry);
        level.exit = Some(map.exit);
        let summary = populate(&mut level, map.entry, env.content, config, env.rng)?;

        let return_position = self.state.player.position;
        self.state.player.position = map.entry;
        self.state.expedition = Some(Expedition {
            level,
            return_position,
        });
        self.state.totals.deepest = self.state.totals.deepest.max(depth);
        env.narrative.set_variable(
            &format!("visited_depth_{depth}"),
            NarrativeValue::Bool(true),
            "entered generated level",
        );
        self.state.events.push(SimEvent::LevelEntered(kind));
        info!(%id, depth, fallback = map.fallback, ?summary, "entered level");

        self.refresh_visibility()
    }

    /// Returns to town, merging the level's tally into the persistent totals.
    ///
    /// The generated level and its light cache are dropped. Calling this twice
    /// in a row fails the second time, so a tally is never merged twice.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NotInLevel`] when no expedition is in progress.
    pub fn exit_level(&mut self) -> Result<RunTally, SimError> {
        let expedition = self.state.expedition.take().ok_or(SimError::NotInLevel)?;
        let tally = expedition.level.tally;
        let kind = expedition.level.kind;
        self.state.totals.merge(tally);
        self.state.player.position = expedition.return_position;
        self.state.caches.light.invalidate();
        self.state.events.push(SimEvent::LevelExited(kind));
        info!(
            level = %kind,
            currency = tally.currency,
            kills = tally.kills,
            "returned to town"
        );
        self.refresh_visibility()?;
        Ok(tally)
    }

    /// Discards the session and starts over, invalidating every session cache.
    ///
    /// # Errors
    ///
    /// Same as [`TurnEngine::new_session`].
    pub fn restart(&mut self, env: &mut SimEnv<'_>) -> Result<(), SimError> {
        self.state.version += 1;
        self.state.caches.invalidate();
        info!(version = self.state.version, "restarting session");
        self.new_session(env)
    }

    pub(super) fn refresh_visibility(&mut self) -> Result<(), SimError> {
        let token = self.state.cache_token()?;
        let radius = self.config.light_radius;
        let (scene, caches) = self.state.scene_and_caches()?;
        let origin = scene.player.position;
        visibility::refresh(scene.level, origin, radius, &mut caches.light, token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::env::{DeathLog, NarrativeMemory, NarrativeOracle, SimRng};
    use crate::fixtures::FixtureContent;
    use crate::state::{Player, Position, SimState};

    struct Session {
        state: SimState,
        config: SimConfig,
        content: FixtureContent,
        narrative: NarrativeMemory,
        death: DeathLog,
        rng: SimRng,
    }

    impl Session {
        fn new() -> Self {
            Self {
                state: SimState::new(Player::new(Position::ORIGIN, 1, 1, 0)),
                config: SimConfig::default(),
                content: FixtureContent::default(),
                narrative: NarrativeMemory::default(),
                death: DeathLog::default(),
                rng: SimRng::seeded(7),
            }
        }

        fn run<T>(&mut self, f: impl FnOnce(&mut TurnEngine<'_>, &mut SimEnv<'_>) -> T) -> T {
            let mut env = SimEnv::new(
                &self.content,
                &mut self.narrative,
                &mut self.death,
                &mut self.rng,
            );
            let mut engine = TurnEngine::new(&mut self.state, &self.config);
            f(&mut engine, &mut env)
        }
    }

    #[test]
    fn session_starts_in_town_with_characters() {
        let mut session = Session::new();
        session.run(|engine, env| engine.new_session(env)).unwrap();
        let town = session.state.active_level().unwrap();
        assert!(town.kind.is_town());
        assert_eq!(town.npcs().count(), 1);
        assert_eq!(session.state.player.position, Position::new(4, 2));
        assert_eq!(session.state.player.max_hp, 30);
        assert!(town.npcs().all(|npc| npc.goal.is_some()));
        assert!(town.explored.is_explored(Position::new(4, 2)));
    }

    #[test]
    fn enter_then_exit_restores_position_and_merges_once() {
        let mut session = Session::new();
        session.run(|engine, env| engine.new_session(env)).unwrap();
        let before = session.state.player.position;

        session.run(|engine, env| engine.enter_level(2, env)).unwrap();
        assert_eq!(
            session.narrative.get_variable("visited_depth_2"),
            Some(NarrativeValue::Bool(true))
        );
        {
            let level = session.state.active_level_mut().unwrap();
            assert_eq!(level.kind, LevelKind::Depth(2));
            level.tally = RunTally {
                currency: 25,
                kills: 3,
            };
        }

        let tally = session.run(|engine, _| engine.exit_level()).unwrap();
        assert_eq!(tally.kills, 3);
        assert_eq!(session.state.player.position, before);
        assert_eq!(session.state.totals.currency, 25);
        assert_eq!(session.state.totals.kills, 3);
        assert_eq!(session.state.totals.deepest, 2);

        let again = session.run(|engine, _| engine.exit_level());
        assert_eq!(again, Err(SimError::NotInLevel));
        assert_eq!(session.state.totals.kills, 3);
    }

    #[test]
    fn depth_bounds_and_nesting_are_validated() {
        let mut session = Session::new();
        assert_eq!(
            session.run(|engine, env| engine.enter_level(1, env)),
            Err(SimError::NoActiveLevel)
        );
        session.run(|engine, env| engine.new_session(env)).unwrap();
        assert_eq!(
            session.run(|engine, env| engine.enter_level(0, env)),
            Err(SimError::InvalidDepth { depth: 0, max: 5 })
        );
        assert_eq!(
            session.run(|engine, env| engine.enter_level(6, env)),
            Err(SimError::InvalidDepth { depth: 6, max: 5 })
        );
        session.run(|engine, env| engine.enter_level(1, env)).unwrap();
        assert_eq!(
            session.run(|engine, env| engine.enter_level(2, env)),
            Err(SimError::AlreadyInLevel(LevelKind::Depth(1)))
        );
    }

    #[test]
    fn restart_bumps_the_version_and_rebuilds_town() {
        let mut session = Session::new();
        session.run(|engine, env| engine.new_session(env)).unwrap();
        let first = session.state.active_level().unwrap().id;
        session.state.totals.kills = 9;

        session.run(|engine, env| engine.restart(env)).unwrap();
        assert_eq!(session.state.version, 1);
        assert_ne!(session.state.active_level().unwrap().id, first);
        assert_eq!(session.state.totals, Totals::default());
    }

    #[test]
    fn broken_town_rows_are_fatal() {
        let mut session = Session::new();
        session.content.town.rows = vec!["..".into(), "...".into()];
        let result = session.run(|engine, env| engine.new_session(env));
        assert!(matches!(result, Err(SimError::InvalidLayout(_))));
    }
}
