//! Movement system: drives tanks and resolves them against obstacles.
//!
//! Motion is resolved one axis at a time, horizontal first. When the moved
//! rectangle overlaps an obstacle it is snapped flush against the first one
//! (lowest row-major cell) and the tank stops on both axes for this tick.
//! Tanks never collide with each other here; overlap is a combat concern.

use glam::IVec2;
use hecs::World;

use tankwar_core::components::{Body, Drive, Obstacle};
use tankwar_core::types::{Rect, TileCoord};

use crate::round::Arena;

/// Result of resolving one tank's motion for a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMove {
    pub rect: Rect,
    /// True when an obstacle or the playfield edge stopped the tank.
    pub blocked: bool,
}

/// Axis-separated move of `rect` by `velocity`.
///
/// `obstacles` must be ordered by cell, row-major; the first overlapping
/// entry is the one snapped against. `bounds` keeps the tank on the field.
pub fn resolve_motion(
    rect: Rect,
    velocity: IVec2,
    obstacles: &[Rect],
    bounds: Rect,
) -> ResolvedMove {
    let mut rect = rect;
    let mut velocity = velocity;
    let mut blocked = false;

    rect.x += velocity.x;
    if let Some(hit) = first_overlap(&rect, obstacles) {
        if velocity.x > 0 {
            rect.x = hit.left() - rect.w;
        } else if velocity.x < 0 {
            rect.x = hit.right();
        }
        velocity = IVec2::ZERO;
        blocked = true;
    }
    if clamp_x(&mut rect, bounds) {
        velocity = IVec2::ZERO;
        blocked = true;
    }

    rect.y += velocity.y;
    if let Some(hit) = first_overlap(&rect, obstacles) {
        if velocity.y > 0 {
            rect.y = hit.top() - rect.h;
        } else if velocity.y < 0 {
            rect.y = hit.bottom();
        }
        blocked = true;
    }
    if clamp_y(&mut rect, bounds) {
        blocked = true;
    }

    ResolvedMove { rect, blocked }
}

fn first_overlap(rect: &Rect, obstacles: &[Rect]) -> Option<Rect> {
    obstacles.iter().find(|o| rect.intersects(o)).copied()
}

fn clamp_x(rect: &mut Rect, bounds: Rect) -> bool {
    let max_x = (bounds.right() - rect.w).max(bounds.left());
    let clamped = rect.x.clamp(bounds.left(), max_x);
    let moved = clamped != rect.x;
    rect.x = clamped;
    moved
}

fn clamp_y(rect: &mut Rect, bounds: Rect) -> bool {
    let max_y = (bounds.bottom() - rect.h).max(bounds.top());
    let clamped = rect.y.clamp(bounds.top(), max_y);
    let moved = clamped != rect.y;
    rect.y = clamped;
    moved
}

/// Obstacle rectangles in row-major cell order.
pub fn obstacle_rects(world: &World) -> Vec<Rect> {
    let mut found: Vec<(TileCoord, Rect)> = world
        .query::<(&Obstacle, &Body)>()
        .iter()
        .map(|(_, (obstacle, body))| (obstacle.cell, body.rect))
        .collect();
    found.sort_by_key(|(cell, _)| (cell.row, cell.col));
    found.into_iter().map(|(_, rect)| rect).collect()
}

/// Move every driven tank by `facing * speed`.
pub fn run(world: &mut World, arena: &Arena) {
    let obstacles = obstacle_rects(world);

    for (_entity, (drive, body)) in world.query_mut::<(&Drive, &mut Body)>() {
        if drive.speed == 0 {
            continue;
        }
        let velocity = drive.facing.unit() * drive.speed;
        body.rect = resolve_motion(body.rect, velocity, &obstacles, arena.playfield).rect;
    }
}
