use std::fmt;

/// Unique identifier for any entity tracked on a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    /// Reserved identifier for the controllable player character.
    pub const PLAYER: Self = Self(0);

    /// Returns true if this entity represents the player.
    #[inline]
    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::PLAYER
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete grid position expressed in tile coordinates.
///
/// `y` grows downwards (row-major grids), so [`Direction::North`] is `-y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring position one step in `direction`.
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Manhattan distance, the metric used for AI ranges and radii.
    pub fn manhattan(self, other: Position) -> u32 {
        (self.x - other.x).unsigned_abs() + (self.y - other.y).unsigned_abs()
    }

    /// Squared euclidean distance, used by the lighting falloff.
    pub fn distance_squared(self, other: Position) -> i32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// The four orthogonal neighbours in [`Direction::ALL`] order.
    pub fn neighbors(self) -> [Position; 4] {
        Direction::ALL.map(|direction| self.step(direction))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal movement direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Fixed scan order. Sentinel ray casts and BFS expansion both rely on it.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    pub const fn reverse(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Returns true for the horizontal axis (east/west).
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::East | Direction::West)
    }

    /// The two directions on the perpendicular axis.
    pub const fn perpendicular(self) -> [Direction; 2] {
        if self.is_horizontal() {
            [Direction::North, Direction::South]
        } else {
            [Direction::East, Direction::West]
        }
    }

    /// Direction of a signed horizontal delta (`None` when zero).
    pub fn from_dx(dx: i32) -> Option<Self> {
        match dx.signum() {
            1 => Some(Direction::East),
            -1 => Some(Direction::West),
            _ => None,
        }
    }

    /// Direction of a signed vertical delta (`None` when zero).
    pub fn from_dy(dy: i32) -> Option<Self> {
        match dy.signum() {
            1 => Some(Direction::South),
            -1 => Some(Direction::North),
            _ => None,
        }
    }
}

/// Display attributes shared by every actor kind.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Appearance {
    pub glyph: char,
    pub name: String,
}

impl Appearance {
    pub fn new(glyph: char, name: impl Into<String>) -> Self {
        Self {
            glyph,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn north_points_up_the_rows() {
        let origin = Position::new(3, 3);
        assert_eq!(origin.step(Direction::North), Position::new(3, 2));
        assert_eq!(origin.step(Direction::East), Position::new(4, 3));
    }

    #[test]
    fn perpendicular_axis_is_the_other_one() {
        assert_eq!(
            Direction::East.perpendicular(),
            [Direction::North, Direction::South]
        );
        assert_eq!(
            Direction::South.perpendicular(),
            [Direction::East, Direction::West]
        );
    }

    #[test]
    fn manhattan_is_symmetric() {
        let a = Position::new(-2, 5);
        let b = Position::new(4, 1);
        assert_eq!(a.manhattan(b), 10);
        assert_eq!(b.manhattan(a), 10);
    }
}
