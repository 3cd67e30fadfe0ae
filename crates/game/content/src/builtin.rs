//! Built-in catalog compiled into the binary.
//!
//! Used when no data directory is configured, and as the reference shape for
//! the RON files under `data/`.

use undercity_core::rules::default_enemy_table;
use undercity_core::state::{Appearance, Behavior, GoalKind, ModuleKind, Position, ZoneAnchors};
use undercity_core::{
    CURFEW_TEMPLATE, Condition, DailySchedule, EnemyTemplate, ItemTable, NpcProfile,
    PlayerTemplate, RuleList, SystemNpcProfile, TownLayout,
};

use crate::registry::ContentRegistry;

pub(crate) fn registry() -> ContentRegistry {
    ContentRegistry {
        enemies: enemies(),
        enemy_table: default_enemy_table(),
        items: ItemTable::default(),
        modules: ModuleKind::ALL.to_vec(),
        player: PlayerTemplate::default(),
        npcs: npcs(),
        system_npcs: system_npcs(),
        town: town(),
    }
}

fn enemy(id: &str, glyph: char, hp: u32, atk: u32, def: u32, behavior: Behavior) -> EnemyTemplate {
    EnemyTemplate {
        id: id.to_string(),
        appearance: Appearance::new(glyph, id.replace('_', " ")),
        hp,
        atk,
        def,
        behavior,
    }
}

pub(crate) fn enemies() -> Vec<EnemyTemplate> {
    vec![
        enemy("drone", 'd', 8, 3, 0, Behavior::Chaser),
        enemy("sentinel", 's', 10, 4, 1, Behavior::Sentinel),
        enemy("tracker", 'r', 9, 3, 1, Behavior::Tracker),
        enemy(CURFEW_TEMPLATE, 'E', 14, 4, 1, Behavior::Curfew),
    ]
}

pub(crate) fn npcs() -> Vec<NpcProfile> {
    let stay_home = DailySchedule::constant(GoalKind::Home);
    vec![
        NpcProfile::builder("mara")
            .appearance(Appearance::new('m', "Mara"))
            .spawn(Position::new(2, 2))
            .anchors(ZoneAnchors {
                home: Position::new(2, 1),
                cafe: Position::new(16, 1),
                terminal: Position::new(17, 4),
                garden: Position::new(7, 8),
            })
            .wants_talk(true)
            .schedule(
                RuleList::new(DailySchedule::default())
                    .with_rule(Condition::Flag("curfew_warning".into()), stay_home),
            )
            .build(),
        NpcProfile::builder("ivo")
            .appearance(Appearance::new('i', "Ivo"))
            .spawn(Position::new(16, 8))
            .anchors(ZoneAnchors {
                home: Position::new(16, 8),
                cafe: Position::new(16, 2),
                terminal: Position::new(17, 4),
                garden: Position::new(8, 8),
            })
            .pace(2)
            .schedule(RuleList::new(DailySchedule::new(
                GoalKind::Terminal,
                GoalKind::Cafe,
                GoalKind::Wander,
                GoalKind::Home,
            )))
            .build(),
        NpcProfile::builder("nell")
            .appearance(Appearance::new('n', "Nell"))
            .spawn(Position::new(8, 8))
            .anchors(ZoneAnchors {
                home: Position::new(3, 2),
                cafe: Position::new(15, 2),
                terminal: Position::new(16, 4),
                garden: Position::new(8, 8),
            })
            .wants_talk(true)
            .appears_on_day(2)
            .schedule(
                RuleList::new(DailySchedule::new(
                    GoalKind::Garden,
                    GoalKind::Garden,
                    GoalKind::Garden,
                    GoalKind::Home,
                ))
                .with_rule(
                    Condition::AtLeast("talks_mara".into(), 3),
                    DailySchedule::new(GoalKind::Cafe, GoalKind::Cafe, GoalKind::Garden, GoalKind::Home),
                ),
            )
            .build(),
    ]
}

pub(crate) fn system_npcs() -> Vec<SystemNpcProfile> {
    vec![SystemNpcProfile {
        id: "quartermaster".into(),
        appearance: Appearance::new('$', "Quartermaster"),
        position: Position::new(12, 1),
        service: "supply".into(),
        appears_on_day: 1,
    }]
}

pub(crate) fn town() -> TownLayout {
    let rows = [
        "####################",
        "#....#........#....#",
        "#....#........#....#",
        "#....##.####..#....#",
        "#.................T#",
        "#..%...........%...#",
        "#..................#",
        "#....#....%...#....#",
        "#....#........#....#",
        "#....#........#....#",
        "#..................#",
        "####################",
    ];
    let zones = [
        "....................",
        ".hhhh..........cccc.",
        ".hhhh..........cccc.",
        "....................",
        "................ttt.",
        "....................",
        "....................",
        "......gggg.....hhhh.",
        "......gggg.....hhhh.",
        "......gggg.....hhhh.",
        "....................",
        "....................",
    ];
    TownLayout {
        rows: rows.iter().map(|row| row.to_string()).collect(),
        zones: zones.iter().map(|row| row.to_string()).collect(),
        player_start: Position::new(10, 5),
        curfew_posts: vec![Position::new(7, 4), Position::new(13, 10)],
    }
}
