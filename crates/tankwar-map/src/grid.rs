//! TileGrid: the immutable tile layout a round is built from.

use serde::{Deserialize, Serialize};

use tankwar_core::error::{Result, TankwarError};
use tankwar_core::types::TileCoord;

/// Kind of a single map cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Empty,
    BreakableWall,
    IndestructibleWall,
    Bush,
    HazardCore,
}

impl TileKind {
    /// Decode a numeric tile code. Unknown codes are Empty.
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => TileKind::BreakableWall,
            2 => TileKind::IndestructibleWall,
            3 => TileKind::Bush,
            5 => TileKind::HazardCore,
            _ => TileKind::Empty,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            TileKind::Empty => 0,
            TileKind::BreakableWall => 1,
            TileKind::IndestructibleWall => 2,
            TileKind::Bush => 3,
            TileKind::HazardCore => 5,
        }
    }
}

/// Marker characters for player spawn cells in map text.
pub const P1_SPAWN_MARKER: char = 'A';
pub const P2_SPAWN_MARKER: char = 'B';

/// Immutable grid of tiles plus the two player spawn cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    /// Row-major, top row first.
    tiles: Vec<TileKind>,
    player_spawns: [TileCoord; 2],
}

impl TileGrid {
    /// Build from rows of numeric tile codes. Ragged rows are padded with Empty.
    pub fn from_codes(rows: &[Vec<u8>]) -> Self {
        let kinds: Vec<Vec<TileKind>> = rows
            .iter()
            .map(|row| row.iter().map(|&c| TileKind::from_code(c)).collect())
            .collect();
        Self::from_kinds(kinds, None)
    }

    fn from_kinds(rows: Vec<Vec<TileKind>>, spawns: Option<[Option<TileCoord>; 2]>) -> Self {
        let height = rows.len();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);

        let mut tiles = Vec::with_capacity(width * height);
        for row in &rows {
            tiles.extend_from_slice(row);
            tiles.extend(std::iter::repeat(TileKind::Empty).take(width - row.len()));
        }

        let [p1, p2] = spawns.unwrap_or([None, None]);
        let defaults = default_spawns(width, height);
        Self {
            width,
            height,
            tiles,
            player_spawns: [p1.unwrap_or(defaults[0]), p2.unwrap_or(defaults[1])],
        }
    }

    /// Parse map text: one row per line, one character per cell.
    ///
    /// Digits are tile codes, `A`/`B` mark the P1/P2 spawn cells,
    /// any other character is Empty. Blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut rows = Vec::new();
        let mut spawns: [Option<TileCoord>; 2] = [None, None];

        for line in text.lines() {
            let line = line.trim_end();
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let row_index = rows.len() as i32;
            let mut row = Vec::with_capacity(line.len());
            for (col, ch) in line.chars().enumerate() {
                let kind = match ch {
                    P1_SPAWN_MARKER => {
                        spawns[0] = Some(TileCoord::new(col as i32, row_index));
                        TileKind::Empty
                    }
                    P2_SPAWN_MARKER => {
                        spawns[1] = Some(TileCoord::new(col as i32, row_index));
                        TileKind::Empty
                    }
                    _ => ch
                        .to_digit(10)
                        .map(|d| TileKind::from_code(d as u8))
                        .unwrap_or_default(),
                };
                row.push(kind);
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(TankwarError::InvalidMap("map has no rows".to_string()));
        }

        let grid = Self::from_kinds(rows, Some(spawns));
        log::debug!(
            "Parsed {}x{} map, spawns P1={:?} P2={:?}",
            grid.width,
            grid.height,
            grid.player_spawns[0],
            grid.player_spawns[1]
        );
        Ok(grid)
    }

    /// Read and parse a map file.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Tile at a cell, or `None` outside the grid.
    pub fn get(&self, coord: TileCoord) -> Option<TileKind> {
        if coord.col < 0 || coord.row < 0 {
            return None;
        }
        let (col, row) = (coord.col as usize, coord.row as usize);
        if col >= self.width || row >= self.height {
            return None;
        }
        Some(self.tiles[row * self.width + col])
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (TileCoord, TileKind)> + '_ {
        self.tiles.iter().enumerate().map(move |(i, &kind)| {
            let coord = TileCoord::new((i % self.width) as i32, (i / self.width) as i32);
            (coord, kind)
        })
    }

    pub fn player_spawns(&self) -> [TileCoord; 2] {
        self.player_spawns
    }

    /// Render back to map text (spawn markers included).
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in 0..self.height {
            for col in 0..self.width {
                let coord = TileCoord::new(col as i32, row as i32);
                let ch = if coord == self.player_spawns[0] {
                    P1_SPAWN_MARKER
                } else if coord == self.player_spawns[1] {
                    P2_SPAWN_MARKER
                } else {
                    char::from(b'0' + self.tiles[row * self.width + col].code())
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

/// Bottom interior row, one third and two thirds across.
fn default_spawns(width: usize, height: usize) -> [TileCoord; 2] {
    let row = height.saturating_sub(2) as i32;
    [
        TileCoord::new((width / 3) as i32, row),
        TileCoord::new((width * 2 / 3) as i32, row),
    ]
}
