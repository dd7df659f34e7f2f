use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// Cumulative displacement on the integer grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// The point one step away in `direction`.
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Euclidean norm, `sqrt(x² + y²)`.
    pub fn distance_from_origin(&self) -> f64 {
        let (x, y) = (self.x as f64, self.y as f64);
        (x * x + y * y).sqrt()
    }

    /// Number of unit moves on the shortest path back to the origin.
    pub fn manhattan(&self) -> u64 {
        self.x.unsigned_abs() + self.y.unsigned_abs()
    }

    /// Both coordinates multiplied by `factor`.
    pub fn scaled(&self, factor: i64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}
