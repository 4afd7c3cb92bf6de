//! Bond evaluation: bricks per course, leftovers and corner inserts
//!
//! The plan describes one repetition of each course. Walking a course means
//! evaluating its templates for increasing repetition multipliers until the
//! next brick would leave the course, then keeping the bricks that start
//! inside it.

use nalgebra::Vector3;
use std::f64::consts::FRAC_PI_2;

use crate::bond::plans::BondKind;
use crate::bond::template::{BrickKind, BrickTransform, Template};
use crate::geometry::BrickModule;
use crate::geometry::numeric::{is_zero, round_length};
use crate::io::configuration::LENGTH_EPSILON;

/// Bricks that fit a course and the residual length at each end
#[derive(Debug, Clone, PartialEq)]
pub struct LayerFit {
    /// Bricks with centers measured from the course start
    pub bricks: Vec<BrickTransform>,
    /// Unfilled length before the first brick
    pub left: f64,
    /// Unfilled length after the last brick
    pub right: f64,
}

impl LayerFit {
    /// Length along the course covered by at least one brick
    pub fn covered(&self) -> f64 {
        let mut spans: Vec<(f64, f64)> = self
            .bricks
            .iter()
            .map(|brick| (brick.start_x(), brick.end_x()))
            .collect();
        spans.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut total = 0.0;
        let mut reach = f64::NEG_INFINITY;
        for (start, end) in spans {
            let from = start.max(reach);
            if end > from {
                total += end - from;
            }
            reach = reach.max(end);
        }
        round_length(total)
    }

    /// Residual on one side of the course
    pub const fn leftover(&self, side: Side) -> f64 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// End of a course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    /// End at the wall's negative x direction
    Left,
    /// End at the wall's positive x direction
    Right,
}

impl Side {
    /// The opposite end
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Parametric bond for one brick module
///
/// Constructed once per distinct module and bond kind; all queries are pure.
#[derive(Debug, Clone, PartialEq)]
pub struct Bond {
    kind: BondKind,
    module: BrickModule,
    plan: Vec<Vec<Template>>,
    corner_plan: Vec<Vec<Template>>,
}

impl Bond {
    /// Build the plan and corner plan for a bond kind
    pub fn new(kind: BondKind, module: BrickModule) -> Self {
        Self {
            kind,
            module,
            plan: kind.plan(&module),
            corner_plan: kind.corner_plan(&module),
        }
    }

    /// Bond kind
    pub const fn kind(&self) -> BondKind {
        self.kind
    }

    /// Brick module
    pub const fn module(&self) -> &BrickModule {
        &self.module
    }

    /// Wall thickness the plan is laid out for
    pub const fn thickness(&self) -> f64 {
        self.kind.thickness(&self.module)
    }

    /// Number of distinct courses before the pattern repeats vertically
    pub const fn repeat_layer(&self) -> usize {
        self.plan.len()
    }

    /// Number of templates in a course before horizontal repetition
    pub fn repeat_step(&self, course: usize) -> usize {
        self.course(course).len()
    }

    /// Number of corner offset choices
    pub const fn corner_plan_repeat_step(&self) -> usize {
        self.corner_plan.len()
    }

    fn course(&self, course: usize) -> &[Template] {
        let repeat = self.plan.len().max(1);
        self.plan.get(course % repeat).map_or(&[], Vec::as_slice)
    }

    fn corner_variant(&self, step: usize) -> &[Template] {
        let repeat = self.corner_plan.len().max(1);
        self.corner_plan.get(step % repeat).map_or(&[], Vec::as_slice)
    }

    /// Bricks of a course that fit `length` starting `x_offset` into the pattern
    ///
    /// With `reversed` the result is mirrored: leftovers swap sides and every
    /// brick moves to `length - position - brick length`.
    pub fn bricks_in_layer(
        &self,
        course: usize,
        length: f64,
        x_offset: f64,
        reversed: bool,
    ) -> LayerFit {
        let length = round_length(length);
        let x_offset = round_length(x_offset);
        let limit = round_length(length + x_offset);
        let templates = self.course(course);

        let period = templates
            .iter()
            .map(|template| template.translation.value.x)
            .fold(f64::INFINITY, f64::min);
        let repetitions = if period.is_finite() && period > LENGTH_EPSILON {
            (limit / period).ceil() as usize + 1
        } else {
            1
        };

        let mut bricks = Vec::new();
        'walk: for n in 0..repetitions {
            let multiplier = Vector3::new(n as f64, course as f64, 0.0);
            for template in templates {
                let brick = template.evaluate(&multiplier, &self.module);
                if brick.end_x() > limit + LENGTH_EPSILON {
                    break 'walk;
                }
                if brick.start_x() >= x_offset - LENGTH_EPSILON {
                    bricks.push(brick.shifted_x(-x_offset));
                }
            }
        }

        let (left, right) = if bricks.is_empty() {
            (round_length(length / 2.0), round_length(length / 2.0))
        } else {
            let first = bricks
                .iter()
                .map(BrickTransform::start_x)
                .fold(f64::INFINITY, f64::min);
            let last = bricks
                .iter()
                .map(BrickTransform::end_x)
                .fold(f64::NEG_INFINITY, f64::max);
            (round_length(first.max(0.0)), round_length((length - last).max(0.0)))
        };

        if reversed {
            let mirrored = bricks
                .into_iter()
                .map(|mut brick| {
                    brick.translation.x = round_length(length - brick.translation.x);
                    brick
                })
                .collect();
            LayerFit {
                bricks: mirrored,
                left: right,
                right: left,
            }
        } else {
            LayerFit {
                bricks,
                left,
                right,
            }
        }
    }

    /// Course transforms centered on the layer, with optional fillers
    ///
    /// Fillers are sized to the leftover and turned across the wall when the
    /// leftover is narrower than the wall. When no whole brick fits and only
    /// one side is filled, that side takes the whole length.
    pub fn apply_layer(
        &self,
        length: f64,
        width: f64,
        fill_left: bool,
        fill_right: bool,
        course: usize,
        x_offset: f64,
        reversed: bool,
    ) -> Vec<BrickTransform> {
        let fit = self.bricks_in_layer(course, length, x_offset, reversed);
        let mut left = fit.left;
        let mut right = fit.right;

        if left + right >= length - LENGTH_EPSILON {
            if fill_left && !fill_right {
                left = length;
                right = 0.0;
            } else if fill_right && !fill_left {
                left = 0.0;
                right = length;
            }
        }

        let mut transforms = fit.bricks;
        if fill_left && !is_zero(left) {
            transforms.push(self.filler(left, width, left / 2.0));
        }
        if fill_right && !is_zero(right) {
            transforms.push(self.filler(right, width, length - right / 2.0));
        }

        transforms
            .into_iter()
            .map(|brick| brick.shifted_x(-length / 2.0))
            .collect()
    }

    fn filler(&self, leftover: f64, width: f64, center: f64) -> BrickTransform {
        let height = self.module.height();
        let (size, yaw) = if leftover < width {
            (Vector3::new(width, leftover, height), FRAC_PI_2)
        } else {
            (Vector3::new(leftover, width, height), 0.0)
        };
        BrickTransform {
            translation: Vector3::new(round_length(center), 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, yaw),
            size: size.map(round_length),
            kind: BrickKind::Filler,
        }
    }

    /// Furthest reach of a corner variant along a direction
    ///
    /// `rotation` is the angle, about the vertical axis, from the corner frame's
    /// x axis to the direction of interest.
    pub fn corner_length(&self, step: usize, rotation: f64) -> f64 {
        let (sin, cos) = rotation.sin_cos();
        self.corner_variant(step)
            .iter()
            .map(|template| {
                let mut brick = template.evaluate(&Vector3::zeros(), &self.module);
                let (x, y) = (brick.translation.x, brick.translation.y);
                brick.translation.x = round_length(x * cos + y * sin);
                brick.rotation.z -= rotation;
                brick.end_x()
            })
            .fold(0.0, f64::max)
    }

    /// Corner bricks in the corner frame, mirrored across x when requested
    pub fn apply_corner(&self, step: usize, mirrored: bool) -> Vec<BrickTransform> {
        self.corner_variant(step)
            .iter()
            .map(|template| {
                let mut brick = template.evaluate(&Vector3::zeros(), &self.module);
                brick.kind = BrickKind::Corner;
                if mirrored {
                    brick.translation.y = -brick.translation.y;
                    brick.rotation.z = -brick.rotation.z;
                }
                brick
            })
            .collect()
    }
}
