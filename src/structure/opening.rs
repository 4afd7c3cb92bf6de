//! Wall openings and the layer splits they cause

use nalgebra::{UnitQuaternion, Vector3};

use crate::geometry::BrickModule;
use crate::geometry::numeric::round_length;
use crate::io::configuration::LENGTH_EPSILON;

/// Rectangular opening in a wall, such as a door or window
#[derive(Debug, Clone, PartialEq)]
pub struct Opening {
    /// Opening center relative to the wall center, in wall coordinates
    pub translation: Vector3<f64>,
    /// Orientation relative to the wall
    pub rotation: UnitQuaternion<f64>,
    /// Extent along the wall
    pub length: f64,
    /// Extent across the wall
    pub width: f64,
    /// Vertical extent
    pub height: f64,
    /// Lintel brick spanning the opening, if any
    pub lintel: Option<BrickModule>,
}

impl Opening {
    /// Create an axis-aligned opening without lintel
    pub fn new(translation: Vector3<f64>, length: f64, width: f64, height: f64) -> Self {
        Self {
            translation,
            rotation: UnitQuaternion::identity(),
            length,
            width,
            height,
            lintel: None,
        }
    }

    /// Attach a lintel
    #[must_use]
    pub const fn with_lintel(mut self, lintel: BrickModule) -> Self {
        self.lintel = Some(lintel);
        self
    }

    /// Lower edge in wall coordinates
    pub fn bottom(&self) -> f64 {
        round_length(self.translation.z - self.height / 2.0)
    }

    /// Upper edge in wall coordinates
    pub fn top(&self) -> f64 {
        round_length(self.translation.z + self.height / 2.0)
    }

    /// Span of the lintel along the wall, never shorter than the opening
    pub fn lintel_span(&self) -> Option<f64> {
        self.lintel.map(|lintel| lintel.length().max(self.length))
    }

    /// Upper edge of the lintel, or of the opening when there is none
    pub fn lintel_top(&self) -> f64 {
        round_length(self.top() + self.lintel.map_or(0.0, |lintel| lintel.height()))
    }

    /// Horizontal span cut from a course occupying `[bottom, top]`
    ///
    /// Courses beside the opening lose the opening's length; courses beside
    /// the lintel lose the lintel's span.
    pub fn span_for_course(&self, bottom: f64, top: f64) -> Option<f64> {
        let overlaps =
            |low: f64, high: f64| bottom < high - LENGTH_EPSILON && low < top - LENGTH_EPSILON;

        if overlaps(self.bottom(), self.top()) {
            Some(self.length)
        } else if overlaps(self.top(), self.lintel_top()) {
            self.lintel_span()
        } else {
            None
        }
    }
}

/// Split a course span `[start, end]` around a cut `[center - span/2, center + span/2]`
///
/// Returns the left and right remainders as `(start, end)` pairs when the cut
/// lies strictly inside the span.
pub fn split_span(
    start: f64,
    end: f64,
    center: f64,
    span: f64,
) -> Option<((f64, f64), (f64, f64))> {
    let cut_start = round_length(center - span / 2.0);
    let cut_end = round_length(center + span / 2.0);
    if cut_start > start + LENGTH_EPSILON && cut_end < end - LENGTH_EPSILON {
        Some(((start, cut_start), (cut_end, end)))
    } else {
        None
    }
}
