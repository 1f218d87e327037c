//! Fundamental geometric and simulation types.
//!
//! All geometry is integer pixels: the playfield is a grid of square tiles
//! and every entity occupies an axis-aligned rectangle.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::constants::TICK_RATE;
use crate::enums::Direction;

/// A cell coordinate on the tile grid (column, row).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub col: i32,
    pub row: i32,
}

impl TileCoord {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Top-left pixel of this cell.
    pub fn to_pixel(self, tile_size: i32) -> IVec2 {
        IVec2::new(self.col * tile_size, self.row * tile_size)
    }

    /// The pixel-aligned rectangle covering this cell.
    pub fn to_rect(self, tile_size: i32) -> Rect {
        let origin = self.to_pixel(tile_size);
        Rect::new(origin.x, origin.y, tile_size, tile_size)
    }
}

/// Axis-aligned rectangle in pixels. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn center(&self) -> IVec2 {
        IVec2::new(self.x + self.w / 2, self.y + self.h / 2)
    }

    /// Strict overlap test: rectangles that merely share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    pub fn translate(&mut self, delta: IVec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Rectangle of `size` launched from `origin` in `direction`, with its
    /// trailing edge on `origin` and centred on the perpendicular axis.
    pub fn launched_from(origin: IVec2, size: i32, direction: Direction) -> Self {
        let half = size / 2;
        match direction {
            Direction::Up => Rect::new(origin.x - half, origin.y - size, size, size),
            Direction::Down => Rect::new(origin.x - half, origin.y, size, size),
            Direction::Left => Rect::new(origin.x - size, origin.y - half, size, size),
            Direction::Right => Rect::new(origin.x, origin.y - half, size, size),
        }
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
}

impl SimTime {
    /// Round clock in milliseconds.
    pub fn elapsed_ms(&self) -> u64 {
        self.tick * 1000 / TICK_RATE as u64
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
    }
}

/// True once strictly more than `interval_ms` has passed since `since_ms`.
pub fn interval_elapsed(now_ms: u64, since_ms: u64, interval_ms: u64) -> bool {
    now_ms.saturating_sub(since_ms) > interval_ms
}
