//! Social-purpose zone overlay used by the NPC scheduler.

use std::collections::HashMap;

use super::{Grid, GridParseError, Position};

/// Social purpose of a cell in the town.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZoneKind {
    Home,
    Cafe,
    Terminal,
    Garden,
}

impl ZoneKind {
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            'h' => Some(ZoneKind::Home),
            'c' => Some(ZoneKind::Cafe),
            't' => Some(ZoneKind::Terminal),
            'g' => Some(ZoneKind::Garden),
            _ => None,
        }
    }
}

/// Character grid labelling cells by zone, independent of the tile grid.
///
/// Any glyph other than `h`, `c`, `t`, `g` means "no zone". Rows shorter than
/// the widest row are treated as unzoned past their end.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ZoneMap {
    width: u32,
    height: u32,
    cells: Vec<Option<ZoneKind>>,
}

impl ZoneMap {
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, GridParseError> {
        if rows.is_empty() {
            return Err(GridParseError::Empty);
        }
        let width = rows
            .iter()
            .map(|row| row.as_ref().chars().count())
            .max()
            .unwrap_or(0);
        let mut cells = vec![None; width * rows.len()];
        for (y, row) in rows.iter().enumerate() {
            for (x, glyph) in row.as_ref().chars().enumerate() {
                cells[y * width + x] = ZoneKind::from_glyph(glyph);
            }
        }
        Ok(Self {
            width: width as u32,
            height: rows.len() as u32,
            cells,
        })
    }

    pub fn zone_at(&self, position: Position) -> Option<ZoneKind> {
        if position.x < 0
            || position.y < 0
            || position.x >= self.width as i32
            || position.y >= self.height as i32
        {
            return None;
        }
        self.cells[position.y as usize * self.width as usize + position.x as usize]
    }

    pub fn is_home(&self, position: Position) -> bool {
        self.zone_at(position) == Some(ZoneKind::Home)
    }

    /// Collects the walkable cells of every zone.
    pub fn walkable_cells(&self, grid: &Grid) -> ZoneCells {
        let mut by_zone: HashMap<ZoneKind, Vec<Position>> = HashMap::new();
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let position = Position::new(x, y);
                if let Some(zone) = self.zone_at(position)
                    && grid.is_walkable(position)
                {
                    by_zone.entry(zone).or_default().push(position);
                }
            }
        }
        ZoneCells { by_zone }
    }
}

/// Walkable cells grouped by zone, cached once per town session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ZoneCells {
    by_zone: HashMap<ZoneKind, Vec<Position>>,
}

impl ZoneCells {
    pub fn cells(&self, zone: ZoneKind) -> &[Position] {
        self.by_zone.get(&zone).map(Vec::as_slice).unwrap_or(&[])
    }
}
