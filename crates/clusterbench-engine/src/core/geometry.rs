use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// A point in the arena plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to `other`.
    #[must_use]
    pub fn squared_distance(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Position plus orientation (radians) of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Position,
    pub angle: f64,
}

impl Pose {
    /// Placeholder pose used when the block count is randomized; always
    /// overwritten by full layout randomization.
    pub const PLACEHOLDER: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, angle: f64) -> Self {
        Self {
            position: Position::new(x, y),
            angle,
        }
    }
}

/// Axis-aligned arena bounds (left, right, bottom, top).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl ArenaBounds {
    /// The square arena every task in the suite is played in.
    pub const DEFAULT: Self = Self {
        left: -1.0,
        right: 1.0,
        bottom: -1.0,
        top: 1.0,
    };

    /// Ranges of valid centre coordinates for a disc of the given radius.
    ///
    /// Returns `None` if the disc does not fit.
    #[must_use]
    pub fn shrunk(&self, radius: f64) -> Option<((f64, f64), (f64, f64))> {
        let x = (self.left + radius, self.right - radius);
        let y = (self.bottom + radius, self.top - radius);
        (x.0 <= x.1 && y.0 <= y.1).then_some((x, y))
    }
}

/// Bounds of the small perturbation applied by minor layout randomization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JitterLimits {
    /// Maximum L∞ offset from the default position.
    pub pos_limit: f64,
    /// Maximum absolute rotation offset from the default angle (radians).
    pub rot_limit: f64,
}

/// Maximum positional jitter applied in minor layout randomization.
pub const JITTER_POS_BOUND: f64 = 0.05;
/// Maximum rotational jitter applied in minor layout randomization.
pub const JITTER_ROT_BOUND: f64 = PI / 16.0;

impl JitterLimits {
    pub const DEFAULT: Self = Self {
        pos_limit: JITTER_POS_BOUND,
        rot_limit: JITTER_ROT_BOUND,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squared_distance() {
        let a = Position::new(1.0, 2.0);
        let b = Position::new(4.0, 6.0);
        assert!((a.squared_distance(b) - 25.0).abs() < 1e-12);
        assert!(a.squared_distance(a).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shrunk_arena() {
        let ((x_lo, x_hi), (y_lo, y_hi)) = ArenaBounds::DEFAULT.shrunk(0.25).unwrap();
        assert!((x_lo + 0.75).abs() < 1e-12);
        assert!((x_hi - 0.75).abs() < 1e-12);
        assert!((y_lo + 0.75).abs() < 1e-12);
        assert!((y_hi - 0.75).abs() < 1e-12);

        assert!(ArenaBounds::DEFAULT.shrunk(1.5).is_none());
    }
}
