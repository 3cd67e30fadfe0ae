//! Shared test fixtures: an in-memory content catalog and open arenas.

use crate::env::{
    ContentOracle, EnemyTemplate, ItemTable, NpcProfile, PlayerTemplate, SystemNpcProfile,
    TownLayout,
};
use crate::rules::{EnemyTable, default_enemy_table};
use crate::state::{
    Actor, Appearance, Behavior, EntityId, Grid, Level, LevelId, LevelKind, ModuleKind, Position,
    Room, TileKind, ZoneAnchors,
};

fn template(id: &str, glyph: char, hp: u32, atk: u32, def: u32, behavior: Behavior) -> EnemyTemplate {
    EnemyTemplate {
        id: id.into(),
        appearance: Appearance::new(glyph, id),
        hp,
        atk,
        def,
        behavior,
    }
}

pub(crate) struct FixtureContent {
    pub enemies: Vec<EnemyTemplate>,
    pub table: EnemyTable,
    pub items: ItemTable,
    pub modules: Vec<ModuleKind>,
    pub player: PlayerTemplate,
    pub npcs: Vec<NpcProfile>,
    pub system_npcs: Vec<SystemNpcProfile>,
    pub town: TownLayout,
}

impl Default for FixtureContent {
    fn default() -> Self {
        Self {
            enemies: vec![
                template("drone", 'd', 8, 3, 0, Behavior::Chaser),
                template("sentinel", 's', 10, 4, 1, Behavior::Sentinel),
                template("tracker", 't', 9, 3, 1, Behavior::Tracker),
                template("curfew_enforcer", 'E', 14, 4, 1, Behavior::Curfew),
            ],
            table: default_enemy_table(),
            items: ItemTable::default(),
            modules: ModuleKind::ALL.to_vec(),
            player: PlayerTemplate::default(),
            npcs: vec![
                NpcProfile::builder("ada")
                    .spawn(Position::new(2, 2))
                    .anchors(ZoneAnchors {
                        home: Position::new(1, 1),
                        cafe: Position::new(8, 1),
                        terminal: Position::new(8, 4),
                        garden: Position::new(4, 4),
                    })
                    .wants_talk(true)
                    .build(),
            ],
            system_npcs: vec![SystemNpcProfile {
                id: "clerk".into(),
                appearance: Appearance::new('$', "clerk"),
                position: Position::new(5, 1),
                service: "shop".into(),
                appears_on_day: 1,
            }],
            town: TownLayout {
                rows: vec![
                    "##########".into(),
                    "#........#".into(),
                    "#........#".into(),
                    "#........#".into(),
                    "#........#".into(),
                    "##########".into(),
                ],
                zones: vec![
                    "..........".into(),
                    ".hh....cc.".into(),
                    ".hh.......".into(),
                    "...gg.....".into(),
                    "...gg...t.".into(),
                    "..........".into(),
                ],
                player_start: Position::new(4, 2),
                curfew_posts: vec![Position::new(6, 3)],
            },
        }
    }
}

impl ContentOracle for FixtureContent {
    fn enemy(&self, id: &str) -> Option<&EnemyTemplate> {
        self.enemies.iter().find(|template| template.id == id)
    }

    fn enemy_table(&self) -> &EnemyTable {
        &self.table
    }

    fn item_table(&self) -> &ItemTable {
        &self.items
    }

    fn module_catalog(&self) -> &[ModuleKind] {
        &self.modules
    }

    fn player_template(&self) -> &PlayerTemplate {
        &self.player
    }

    fn npc_profiles(&self) -> &[NpcProfile] {
        &self.npcs
    }

    fn system_npcs(&self) -> &[SystemNpcProfile] {
        &self.system_npcs
    }

    fn town(&self) -> &TownLayout {
        &self.town
    }
}

/// Open floor square at depth 1 with a single room covering it.
pub(crate) fn arena(size: u32) -> Level {
    Level::new(
        LevelId(1),
        LevelKind::Depth(1),
        Grid::filled(size, size, TileKind::Floor),
        vec![Room::new(0, 0, size, size)],
        Position::ORIGIN,
    )
}

/// Spawns a fixture template at the level's depth.
pub(crate) fn spawn_enemy(level: &mut Level, template_id: &str, position: Position) -> EntityId {
    let content = FixtureContent::default();
    let template = content
        .enemy(template_id)
        .unwrap_or_else(|| panic!("unknown fixture template {template_id}"));
    let id = level.allocate_id();
    let depth = level.depth().max(1);
    level
        .actors
        .push(Actor::Enemy(template.spawn(id, position, depth)));
    id
}
