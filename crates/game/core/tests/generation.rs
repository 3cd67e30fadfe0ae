use undercity_core::generation::{dig_target_percent, generate_level};
use undercity_core::pathfinding::reachable_from;
use undercity_core::state::TileKind;
use undercity_core::visibility::compute_light;
use undercity_core::{Position, SimConfig, SimRng};

/// Seeds 0..SEEDS at every depth.
const SEEDS: u64 = 24;

#[test]
fn every_generated_level_connects_entry_to_exit() {
    let config = SimConfig::default();
    for depth in 1..=config.max_depth {
        for seed in 0..SEEDS {
            let mut rng = SimRng::seeded(seed);
            let map = generate_level(config.level_width, config.level_height, depth, &mut rng);

            assert!(map.grid.is_walkable(map.entry), "seed {seed} depth {depth}: entry blocked");
            assert_eq!(map.grid.get(map.exit), Some(TileKind::StairsUp));
            assert_eq!(map.grid.count(TileKind::StairsUp), 1);

            let reachable = reachable_from(&map.grid, map.entry);
            assert!(
                reachable.contains(&map.exit),
                "seed {seed} depth {depth}: exit unreachable"
            );
        }
    }
}

#[test]
fn generated_levels_keep_a_wall_ring() {
    let config = SimConfig::default();
    let (width, height) = (config.level_width as i32, config.level_height as i32);
    for seed in 0..SEEDS {
        let mut rng = SimRng::seeded(seed);
        let map = generate_level(config.level_width, config.level_height, 3, &mut rng);
        for x in 0..width {
            assert_eq!(map.grid.get(Position::new(x, 0)), Some(TileKind::Wall));
            assert_eq!(map.grid.get(Position::new(x, height - 1)), Some(TileKind::Wall));
        }
        for y in 0..height {
            assert_eq!(map.grid.get(Position::new(0, y)), Some(TileKind::Wall));
            assert_eq!(map.grid.get(Position::new(width - 1, y)), Some(TileKind::Wall));
        }
    }
}

#[test]
fn same_seed_same_level() {
    let mut first = SimRng::seeded(42);
    let mut second = SimRng::seeded(42);
    let a = generate_level(60, 30, 2, &mut first);
    let b = generate_level(60, 30, 2, &mut second);
    assert_eq!(a.grid, b.grid);
    assert_eq!(a.rooms, b.rooms);
    assert_eq!(a.entry, b.entry);
}

#[test]
fn small_maps_still_have_two_connected_rooms() {
    for seed in 0..SEEDS {
        let mut rng = SimRng::seeded(seed);
        let map = generate_level(12, 8, 1, &mut rng);
        assert!(map.rooms.len() >= 2);
        assert!(reachable_from(&map.grid, map.entry).contains(&map.exit));
    }
}

#[test]
fn dig_target_grows_with_depth() {
    assert_eq!(dig_target_percent(1), 38);
    assert_eq!(dig_target_percent(5), 50);
}

#[test]
fn light_stays_inside_the_grid_and_radius() {
    let config = SimConfig::default();
    let mut rng = SimRng::seeded(9);
    let map = generate_level(config.level_width, config.level_height, 1, &mut rng);
    let light = compute_light(&map.grid, map.entry, config.light_radius);
    assert!(light.light_at(map.entry) > 0.99);
    for (position, _) in light.iter() {
        assert!(map.grid.contains(position));
        assert!(position.manhattan(map.entry) <= 2 * config.light_radius);
    }
}
