//! Collision detection and bounds checks
//!
//! Two flavours: discrete grid tests for Chase (walls, self-intersection) and
//! continuous circle-vs-rectangle tests with reflection for Duel.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::intent::Direction;

/// A grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbouring cell in `dir` (may fall outside the grid)
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Play area for grid games, cells `[0, width) x [0, height)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
}

impl Grid {
    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.width).contains(&cell.x) && (0..self.height).contains(&cell.y)
    }

    pub fn center(&self) -> Cell {
        Cell::new(self.width / 2, self.height / 2)
    }

    /// Row-major iteration over every cell
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Cell::new(x, y)))
    }
}

/// Outcome of moving a grid head
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridHit {
    Clear,
    Wall,
    Body,
}

/// Test a proposed head position against the walls and the current body.
/// The whole body counts, including the tail cell about to be vacated.
pub fn grid_collision(grid: &Grid, body: &VecDeque<Cell>, head: Cell) -> GridHit {
    if !grid.contains(head) {
        GridHit::Wall
    } else if body.contains(&head) {
        GridHit::Body
    } else {
        GridHit::Clear
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Closest point on the rectangle (if hit)
    pub point: Vec2,
    /// Surface normal at collision (pointing toward ball center, for reflection)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check overlap between a circle and a rectangle
pub fn ball_rect_collision(center: Vec2, radius: f32, rect: &Rect) -> CollisionResult {
    let closest = center.clamp(rect.min, rect.max);
    let offset = center - closest;
    let dist_sq = offset.length_squared();

    if dist_sq >= radius * radius {
        return CollisionResult::miss();
    }

    if dist_sq > f32::EPSILON {
        let dist = dist_sq.sqrt();
        return CollisionResult {
            hit: true,
            point: closest,
            normal: offset / dist,
            penetration: radius - dist,
        };
    }

    // Center inside the rectangle: push out along the shallowest axis
    let to_min = center - rect.min;
    let to_max = rect.max - center;
    let candidates = [
        (to_min.x, Vec2::NEG_X),
        (to_max.x, Vec2::X),
        (to_min.y, Vec2::NEG_Y),
        (to_max.y, Vec2::Y),
    ];
    let (depth, normal) = candidates
        .into_iter()
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .unwrap_or((0.0, Vec2::X));
    CollisionResult {
        hit: true,
        point: center,
        normal,
        penetration: depth + radius,
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Scale `velocity` down so its magnitude never exceeds `max`
#[inline]
pub fn clamp_speed(velocity: Vec2, max: f32) -> Vec2 {
    velocity.clamp_length_max(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_walls() {
        let grid = Grid {
            width: 4,
            height: 3,
        };
        let body = VecDeque::from([Cell::new(0, 0)]);
        assert_eq!(grid_collision(&grid, &body, Cell::new(-1, 0)), GridHit::Wall);
        assert_eq!(grid_collision(&grid, &body, Cell::new(4, 0)), GridHit::Wall);
        assert_eq!(grid_collision(&grid, &body, Cell::new(0, 3)), GridHit::Wall);
        assert_eq!(grid_collision(&grid, &body, Cell::new(3, 2)), GridHit::Clear);
    }

    #[test]
    fn test_grid_body_includes_tail() {
        let grid = Grid {
            width: 10,
            height: 10,
        };
        let body = VecDeque::from([Cell::new(2, 2), Cell::new(2, 3), Cell::new(3, 3)]);
        assert_eq!(grid_collision(&grid, &body, Cell::new(3, 3)), GridHit::Body);
        assert_eq!(grid_collision(&grid, &body, Cell::new(3, 2)), GridHit::Clear);
    }

    #[test]
    fn test_grid_cells_cover_area() {
        let grid = Grid {
            width: 3,
            height: 2,
        };
        assert_eq!(grid.cells().count(), 6);
        assert!(grid.cells().all(|c| grid.contains(c)));
    }

    #[test]
    fn test_ball_rect_edge_hit() {
        let rect = Rect::new(10.0, 0.0, 10.0, 60.0);
        // Ball touching the right face
        let result = ball_rect_collision(Vec2::new(24.0, 30.0), 6.0, &rect);
        assert!(result.hit);
        assert!((result.normal - Vec2::X).length() < 0.001);
        assert!((result.penetration - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_ball_rect_miss() {
        let rect = Rect::new(10.0, 0.0, 10.0, 60.0);
        assert!(!ball_rect_collision(Vec2::new(30.0, 30.0), 6.0, &rect).hit);
        // Beyond the corner diagonally
        assert!(!ball_rect_collision(Vec2::new(25.0, 65.0), 6.0, &rect).hit);
    }

    #[test]
    fn test_ball_center_inside_rect() {
        let rect = Rect::new(0.0, 0.0, 10.0, 100.0);
        let result = ball_rect_collision(Vec2::new(8.0, 50.0), 3.0, &rect);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::X);
    }

    #[test]
    fn test_reflect_velocity() {
        let reflected = reflect_velocity(Vec2::new(-4.0, 1.0), Vec2::X);
        assert!((reflected.x - 4.0).abs() < 0.001);
        assert!((reflected.y - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_clamp_speed() {
        let v = clamp_speed(Vec2::new(30.0, 40.0), 10.0);
        assert!((v.length() - 10.0).abs() < 0.001);
        assert_eq!(clamp_speed(Vec2::new(3.0, 4.0), 10.0), Vec2::new(3.0, 4.0));
    }
}
