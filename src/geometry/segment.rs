//! Planar line segments and intersection predicates
//!
//! Layers are compared in plan view: a layer's center line projected onto the
//! horizontal plane is a [`Segment2`]. Parallel or coincident lines have no
//! unique intersection and are reported as `None` rather than as errors.

use nalgebra::{Point2, Vector2};

use crate::io::configuration::LENGTH_EPSILON;

/// Where an intersection point lies relative to a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentPosition {
    /// Within tolerance of the start point
    NearStart,
    /// Within tolerance of the end point
    NearEnd,
    /// Strictly between the endpoints and away from both
    Interior,
    /// Beyond the segment by more than the tolerance
    Outside,
}

impl SegmentPosition {
    /// Check if the point lies near either endpoint
    pub const fn is_endpoint(self) -> bool {
        matches!(self, Self::NearStart | Self::NearEnd)
    }
}

/// Directed planar segment from `start` to `end`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment2 {
    /// First endpoint
    pub start: Point2<f64>,
    /// Second endpoint
    pub end: Point2<f64>,
}

impl Segment2 {
    /// Create a segment between two points
    pub const fn new(start: Point2<f64>, end: Point2<f64>) -> Self {
        Self { start, end }
    }

    /// Euclidean length
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Unit direction from start to end, `None` for a degenerate segment
    pub fn direction(&self) -> Option<Vector2<f64>> {
        let delta = self.end - self.start;
        let norm = delta.norm();
        (norm > LENGTH_EPSILON).then(|| delta / norm)
    }

    /// Signed distance of a point's projection from the start, along the segment
    pub fn parameter(&self, point: &Point2<f64>) -> Option<f64> {
        self.direction().map(|dir| (point - self.start).dot(&dir))
    }

    /// Intersect the infinite lines through both segments
    ///
    /// Returns the intersection point and its distance from each segment's
    /// start along that segment, or `None` when the lines are parallel.
    pub fn intersect_lines(&self, other: &Self) -> Option<(Point2<f64>, f64, f64)> {
        let d1 = self.direction()?;
        let d2 = other.direction()?;
        let denominator = d1.perp(&d2);
        if denominator.abs() <= LENGTH_EPSILON {
            return None;
        }

        let offset = other.start - self.start;
        let t = offset.perp(&d2) / denominator;
        let s = offset.perp(&d1) / denominator;
        Some((self.start + d1 * t, t, s))
    }

    /// Classify a parameter along this segment against an endpoint tolerance
    pub fn classify(&self, parameter: f64, tolerance: f64) -> SegmentPosition {
        let length = self.length();
        if parameter.abs() <= tolerance {
            SegmentPosition::NearStart
        } else if (parameter - length).abs() <= tolerance {
            SegmentPosition::NearEnd
        } else if parameter > 0.0 && parameter < length {
            SegmentPosition::Interior
        } else {
            SegmentPosition::Outside
        }
    }

    /// Check if a point's projection lies between the endpoints
    ///
    /// The comparison admits `tolerance` on the outside of both endpoints.
    pub fn contains_projection(&self, point: &Point2<f64>, tolerance: f64) -> bool {
        self.parameter(point)
            .is_some_and(|t| t >= -tolerance && t <= self.length() + tolerance)
    }

    /// Distance from a point's projection to the nearest endpoint, negative when outside
    pub fn endpoint_clearance(&self, point: &Point2<f64>) -> f64 {
        self.parameter(point)
            .map_or(f64::NEG_INFINITY, |t| t.min(self.length() - t))
    }
}
