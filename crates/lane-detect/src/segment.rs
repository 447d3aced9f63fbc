//! Line segment geometry shared by every detection stage

use serde::{Deserialize, Serialize};

/// Line segment `(x1, y1) -> (x2, y2)`; endpoint order carries orientation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl LineSegment {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Euclidean length
    pub fn length(&self) -> f64 {
        (self.x2 - self.x1).hypot(self.y2 - self.y1)
    }

    /// Absolute angle from the x axis in `[0, pi]`
    pub fn angle(&self) -> f64 {
        (self.y2 - self.y1).atan2(self.x2 - self.x1).abs()
    }

    pub fn is_vertical(&self) -> bool {
        self.x1 == self.x2
    }

    /// `dy / dx`, or `None` for a vertical line
    pub fn slope(&self) -> Option<f64> {
        if self.is_vertical() {
            None
        } else {
            Some((self.y2 - self.y1) / (self.x2 - self.x1))
        }
    }

    /// Same segment shifted by `(dx, dy)`
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            x1: self.x1 + dx,
            y1: self.y1 + dy,
            x2: self.x2 + dx,
            y2: self.y2 + dy,
        }
    }

    /// Where the infinite line crosses `y = 0`.
    ///
    /// `None` for a horizontal line, which never reaches the base row.
    pub fn base_crossing(&self) -> Option<f64> {
        let Some(m) = self.slope() else {
            return Some(self.x1);
        };
        if m == 0.0 {
            return None;
        }
        let c = self.y1 - m * self.x1;
        Some(-c / m)
    }

    /// Intersection of the two infinite lines, `None` when parallel
    pub fn intersection(&self, other: &LineSegment) -> Option<(f64, f64)> {
        let (dx1, dy1) = (self.x2 - self.x1, self.y2 - self.y1);
        let (dx2, dy2) = (other.x2 - other.x1, other.y2 - other.y1);
        let denom = dx1 * dy2 - dy1 * dx2;
        if denom == 0.0 {
            return None;
        }
        let t = ((other.x1 - self.x1) * dy2 - (other.y1 - self.y1) * dx2) / denom;
        Some((self.x1 + t * dx1, self.y1 + t * dy1))
    }
}

impl From<[f64; 4]> for LineSegment {
    fn from([x1, y1, x2, y2]: [f64; 4]) -> Self {
        Self::new(x1, y1, x2, y2)
    }
}
