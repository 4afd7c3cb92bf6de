//! Geometric primitives and numeric policy
//!
//! This module contains:
//! - The brick module description shared by bonds and walls
//! - Rounding and tolerance helpers applied to every derived length
//! - Planar segment predicates used by corner detection

/// Brick module dimensions and snapping grid
pub mod module;
/// Rounding and tolerance helpers
pub mod numeric;
/// Planar line segments and intersection predicates
pub mod segment;

pub use module::BrickModule;
pub use segment::Segment2;
