//! Brick module dimensions and snapping grid

use nalgebra::Vector3;

use crate::geometry::numeric::{approx_eq, round_length};

/// Nominal dimensions of one brick
///
/// Length and width are normalized at construction so that `length` is
/// always the larger of the two. The value is immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrickModule {
    length: f64,
    width: f64,
    height: f64,
    grid: [f64; 3],
}

impl BrickModule {
    /// Create a module, swapping length and width when given out of order
    pub fn new(length: f64, width: f64, height: f64, grid: [f64; 3]) -> Self {
        let (length, width) = if width > length {
            (width, length)
        } else {
            (length, width)
        };
        Self {
            length: round_length(length),
            width: round_length(width),
            height: round_length(height),
            grid,
        }
    }

    /// Create a module whose snapping grid matches its own dimensions
    pub fn uniform(length: f64, width: f64, height: f64) -> Self {
        let (long, short) = if width > length {
            (width, length)
        } else {
            (length, width)
        };
        Self::new(long, short, height, [long, short, height])
    }

    /// Brick length along its long axis
    pub const fn length(&self) -> f64 {
        self.length
    }

    /// Brick width across its long axis
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Brick height
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Snapping increments along x, y and z
    pub const fn grid(&self) -> [f64; 3] {
        self.grid
    }

    /// Dimensions as a vector `(length, width, height)`
    pub fn size(&self) -> Vector3<f64> {
        Vector3::new(self.length, self.width, self.height)
    }

    /// Check that every dimension and grid increment is positive and finite
    pub fn is_valid(&self) -> bool {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        positive(self.length)
            && positive(self.width)
            && positive(self.height)
            && self.grid.iter().all(|&g| positive(g))
    }

    /// Compare two modules within the layout tolerance
    pub fn same_as(&self, other: &Self) -> bool {
        approx_eq(self.length, other.length)
            && approx_eq(self.width, other.width)
            && approx_eq(self.height, other.height)
    }

    /// Snap a value to the module grid along one axis
    pub fn snap(&self, value: f64, axis: usize) -> f64 {
        match self.grid.get(axis) {
            Some(&step) if step > 0.0 => round_length((value / step).round() * step),
            _ => round_length(value),
        }
    }
}
