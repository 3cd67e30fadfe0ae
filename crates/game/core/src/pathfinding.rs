//! 4-directional pathfinding over the tile grid.
//!
//! [`find_path`] is a breadth-first search where only walls and blocking
//! decorations are impassable; actors are ignored so a path can end on an
//! occupied cell. Callers that need single-step guidance, or that found no
//! path, use [`greedy_step`], which never fails and simply yields `None` when
//! every direction is blocked.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::state::{Direction, Grid, Position};

/// Shortest path from `start` to `goal`, both inclusive.
///
/// Returns `[start]` when they coincide and an empty vec when `goal` cannot
/// be reached.
pub fn find_path(grid: &Grid, start: Position, goal: Position) -> Vec<Position> {
    if start == goal {
        return vec![start];
    }
    if !grid.is_walkable(goal) {
        return Vec::new();
    }

    let mut parents: HashMap<Position, Position> = HashMap::new();
    let mut queue = VecDeque::from([start]);
    parents.insert(start, start);

    while let Some(current) = queue.pop_front() {
        if current == goal {
            return walk_back(&parents, start, goal);
        }
        for next in current.neighbors() {
            if grid.is_walkable(next) && !parents.contains_key(&next) {
                parents.insert(next, current);
                queue.push_back(next);
            }
        }
    }
    Vec::new()
}

fn walk_back(parents: &HashMap<Position, Position>, start: Position, goal: Position) -> Vec<Position> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        current = parents[&current];
        path.push(current);
    }
    path.reverse();
    path
}

/// Every walkable cell connected to `start`.
pub fn reachable_from(grid: &Grid, start: Position) -> HashSet<Position> {
    let mut seen = HashSet::new();
    if !grid.is_walkable(start) {
        return seen;
    }
    let mut queue = VecDeque::from([start]);
    seen.insert(start);
    while let Some(current) = queue.pop_front() {
        for next in current.neighbors() {
            if grid.is_walkable(next) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

/// Candidate directions in greedy priority order.
///
/// The axis with the larger remaining delta comes first (horizontal on ties),
/// then the perpendicular axis towards the target, its reverse, and finally
/// the reverse of the primary direction.
pub fn greedy_order(from: Position, to: Position) -> Option<[Direction; 4]> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx == 0 && dy == 0 {
        return None;
    }
    let (primary, secondary) = if dx.abs() >= dy.abs() {
        let primary = Direction::from_dx(dx)?;
        (primary, Direction::from_dy(dy).unwrap_or(Direction::South))
    } else {
        let primary = Direction::from_dy(dy)?;
        (primary, Direction::from_dx(dx).unwrap_or(Direction::East))
    };
    Some([primary, secondary, secondary.reverse(), primary.reverse()])
}

/// First legal step in greedy order, or `None` when fully blocked.
pub fn greedy_step(
    from: Position,
    to: Position,
    can_step: impl Fn(Position) -> bool,
) -> Option<Direction> {
    greedy_order(from, to)?
        .into_iter()
        .find(|direction| can_step(from.step(*direction)))
}

/// Step along the shortest path, falling back to the greedy stepper.
///
/// The path's next cell is taken only if `can_step` allows it or it is the
/// goal itself (the caller decides what stepping onto the goal means).
pub fn step_towards(
    grid: &Grid,
    from: Position,
    to: Position,
    can_step: impl Fn(Position) -> bool,
) -> Option<Direction> {
    let path = find_path(grid, from, to);
    if let Some(next) = path.get(1).copied()
        && (next == to || can_step(next))
    {
        return Direction::ALL
            .into_iter()
            .find(|direction| from.step(*direction) == next);
    }
    greedy_step(from, to, can_step)
}
