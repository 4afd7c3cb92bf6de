//! Transformation templates for repeating brick positions
//!
//! A template describes where one brick role of a course sits, and how that
//! position moves as the pattern repeats. Evaluating it for a repetition
//! multiplier yields a concrete [`BrickTransform`].

use nalgebra::Vector3;

use crate::geometry::BrickModule;
use crate::geometry::numeric::round_length;

/// One affine rule `offset + value * (mask * multiplier)`, elementwise
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    /// Constant part
    pub offset: Vector3<f64>,
    /// Step applied per unit of multiplier
    pub value: Vector3<f64>,
    /// Selects which axes scale with the multiplier (0 or 1 per axis)
    pub mask: Vector3<f64>,
}

impl Rule {
    /// Rule that ignores the multiplier
    pub fn fixed(offset: Vector3<f64>) -> Self {
        Self {
            offset,
            value: Vector3::zeros(),
            mask: Vector3::zeros(),
        }
    }

    /// Rule advancing along x by `period` per repetition
    pub fn periodic_x(offset: Vector3<f64>, period: f64) -> Self {
        Self {
            offset,
            value: Vector3::new(period, 0.0, 0.0),
            mask: Vector3::new(1.0, 0.0, 0.0),
        }
    }

    /// Evaluate the rule for a multiplier
    pub fn evaluate(&self, multiplier: &Vector3<f64>) -> Vector3<f64> {
        let scaled = self.value.component_mul(&self.mask.component_mul(multiplier));
        self.offset + scaled
    }
}

/// Placement rule for one brick role
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Template {
    /// Rule for the brick center
    pub translation: Rule,
    /// Rule for Euler angles (radians, applied about x, y, z)
    pub rotation: Rule,
    /// Fraction of the module size per axis
    pub scale: Vector3<f64>,
}

impl Template {
    /// Brick along the course at `x`, offset `y` across the wall
    pub fn stretcher(x: f64, y: f64, period: f64) -> Self {
        Self {
            translation: Rule::periodic_x(Vector3::new(x, y, 0.0), period),
            rotation: Rule::fixed(Vector3::zeros()),
            scale: Vector3::repeat(1.0),
        }
    }

    /// Brick across the course at `x`, offset `y` across the wall
    pub fn header(x: f64, y: f64, period: f64) -> Self {
        Self {
            translation: Rule::periodic_x(Vector3::new(x, y, 0.0), period),
            rotation: Rule::fixed(Vector3::new(0.0, 0.0, std::f64::consts::FRAC_PI_2)),
            scale: Vector3::repeat(1.0),
        }
    }

    /// Brick at a fixed position with a fixed rotation about the vertical axis
    pub fn fixed(x: f64, y: f64, yaw: f64) -> Self {
        Self {
            translation: Rule::fixed(Vector3::new(x, y, 0.0)),
            rotation: Rule::fixed(Vector3::new(0.0, 0.0, yaw)),
            scale: Vector3::repeat(1.0),
        }
    }

    /// Queen closer: a fixed brick split lengthwise to half the module width
    pub fn closer(x: f64, y: f64, yaw: f64) -> Self {
        Self {
            scale: Vector3::new(1.0, 0.5, 1.0),
            ..Self::fixed(x, y, yaw)
        }
    }

    /// Evaluate both rules into a brick transform sized by `module`
    ///
    /// Translations are rounded to the layout precision; angles are kept exact
    /// so quarter turns keep exact footprints.
    pub fn evaluate(&self, multiplier: &Vector3<f64>, module: &BrickModule) -> BrickTransform {
        BrickTransform {
            translation: self.translation.evaluate(multiplier).map(round_length),
            rotation: self.rotation.evaluate(multiplier),
            size: module.size().component_mul(&self.scale).map(round_length),
            kind: BrickKind::Whole,
        }
    }
}

/// Role of a placed brick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BrickKind {
    /// Regular module brick from the course plan
    Whole,
    /// Cut brick sized to a leftover
    Filler,
    /// Brick from a corner insert
    Corner,
    /// Lintel over an opening
    Lintel,
}

/// Local placement of one brick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrickTransform {
    /// Brick center in the local frame
    pub translation: Vector3<f64>,
    /// Euler angles in radians
    pub rotation: Vector3<f64>,
    /// Brick dimensions `(length, width, height)` before rotation
    pub size: Vector3<f64>,
    /// Role of the brick
    pub kind: BrickKind,
}

impl BrickTransform {
    /// Rotation about the vertical axis
    pub fn yaw(&self) -> f64 {
        self.rotation.z
    }

    /// Footprint extent along the local x and y axes
    pub fn footprint(&self) -> (f64, f64) {
        let (sin, cos) = self.yaw().sin_cos();
        let (sin, cos) = (sin.abs(), cos.abs());
        (
            round_length(cos * self.size.x + sin * self.size.y),
            round_length(sin * self.size.x + cos * self.size.y),
        )
    }

    /// Start of the footprint along x
    pub fn start_x(&self) -> f64 {
        round_length(self.translation.x - self.footprint().0 / 2.0)
    }

    /// End of the footprint along x
    pub fn end_x(&self) -> f64 {
        round_length(self.translation.x + self.footprint().0 / 2.0)
    }

    /// Shift the brick along the local x axis
    #[must_use]
    pub fn shifted_x(mut self, dx: f64) -> Self {
        self.translation.x = round_length(self.translation.x + dx);
        self
    }
}
