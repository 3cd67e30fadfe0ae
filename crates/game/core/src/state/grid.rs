//! Tile grid and room rectangles.

use super::Position;

/// Terrain kind of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileKind {
    #[default]
    Wall,
    Floor,
    StairsUp,
    Terminal,
    TerminalUsed,
    /// Furniture, planters and other props that block movement.
    Decoration,
}

impl TileKind {
    /// Walls and blocking decorations are never walkable; everything else is.
    pub const fn is_walkable(self) -> bool {
        !matches!(self, TileKind::Wall | TileKind::Decoration)
    }

    /// Opaque tiles stop light and line of sight.
    pub const fn is_opaque(self) -> bool {
        !self.is_walkable()
    }

    pub const fn glyph(self) -> char {
        match self {
            TileKind::Wall => '#',
            TileKind::Floor => '.',
            TileKind::StairsUp => '<',
            TileKind::Terminal => 'T',
            TileKind::TerminalUsed => 't',
            TileKind::Decoration => '%',
        }
    }

    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '#' => Some(TileKind::Wall),
            '.' => Some(TileKind::Floor),
            '<' => Some(TileKind::StairsUp),
            'T' => Some(TileKind::Terminal),
            't' => Some(TileKind::TerminalUsed),
            '%' => Some(TileKind::Decoration),
            _ => None,
        }
    }
}

/// Errors raised when parsing a grid from text rows.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridParseError {
    #[error("grid has no rows")]
    Empty,

    #[error("row {row} has width {found}, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown tile glyph {glyph:?} at {position}")]
    UnknownGlyph { glyph: char, position: Position },
}

/// Dense row-major tile grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    tiles: Vec<TileKind>,
}

impl Grid {
    /// Creates a grid filled with a single tile kind.
    pub fn filled(width: u32, height: u32, kind: TileKind) -> Self {
        Self {
            width,
            height,
            tiles: vec![kind; (width * height) as usize],
        }
    }

    /// Parses a grid from text rows using [`TileKind::from_glyph`].
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, GridParseError> {
        let first = rows.first().ok_or(GridParseError::Empty)?;
        let width = first.as_ref().chars().count();
        let mut tiles = Vec::with_capacity(width * rows.len());

        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(GridParseError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, glyph) in row.chars().enumerate() {
                let kind = TileKind::from_glyph(glyph).ok_or(GridParseError::UnknownGlyph {
                    glyph,
                    position: Position::new(x as i32, y as i32),
                })?;
                tiles.push(kind);
            }
        }

        Ok(Self {
            width: width as u32,
            height: rows.len() as u32,
            tiles,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    /// Row-major index of a position, `None` when out of bounds.
    pub fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.y as usize * self.width as usize + position.x as usize)
    }

    pub fn position_of(&self, index: usize) -> Position {
        let width = self.width as usize;
        Position::new((index % width) as i32, (index / width) as i32)
    }

    pub fn get(&self, position: Position) -> Option<TileKind> {
        self.index(position).map(|index| self.tiles[index])
    }

    /// Overwrites a tile. Returns false when the position is out of bounds.
    pub fn set(&mut self, position: Position, kind: TileKind) -> bool {
        match self.index(position) {
            Some(index) => {
                self.tiles[index] = kind;
                true
            }
            None => false,
        }
    }

    /// Out-of-bounds cells are never walkable.
    pub fn is_walkable(&self, position: Position) -> bool {
        self.get(position).is_some_and(TileKind::is_walkable)
    }

    /// Out-of-bounds cells are opaque.
    pub fn is_opaque(&self, position: Position) -> bool {
        self.get(position).is_none_or(TileKind::is_opaque)
    }

    /// Iterates every cell position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.tiles.len()).map(|index| self.position_of(index))
    }

    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|tile| **tile == kind).count()
    }

    /// Renders the grid back into glyph rows.
    pub fn to_rows(&self) -> Vec<String> {
        self.tiles
            .chunks(self.width.max(1) as usize)
            .map(|row| row.iter().map(|tile| tile.glyph()).collect())
            .collect()
    }
}

/// Axis-aligned rectangle of floor carved by the generator.
///
/// Covers cells `x..x + width` by `y..y + height`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Room {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32 - 1
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32 - 1
    }

    pub fn center(&self) -> Position {
        Position::new(
            self.x + self.width as i32 / 2,
            self.y + self.height as i32 / 2,
        )
    }

    /// Top-left interior cell, the last-resort placement target.
    pub fn corner(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= self.x
            && position.x <= self.right()
            && position.y >= self.y
            && position.y <= self.bottom()
    }

    /// Overlap test with a gap of `margin` cells kept between the rooms.
    pub fn intersects(&self, other: &Room, margin: i32) -> bool {
        self.x - margin <= other.right()
            && self.right() + margin >= other.x
            && self.y - margin <= other.bottom()
            && self.bottom() + margin >= other.y
    }

    /// Cells scanned left-to-right, top-to-bottom.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (self.y..=self.bottom())
            .flat_map(move |y| (self.x..=self.right()).map(move |x| Position::new(x, y)))
    }

    pub fn area(&self) -> u32 {
        self.width * self.height
    }
}
