//! Bond pattern engine
//!
//! This module contains:
//! - Transformation templates that describe unbounded repeating patterns
//! - The closed set of bond kinds and the plans they build
//! - Evaluation of plans into bricks, leftovers and corner inserts

/// Plan evaluation for courses and corners
pub mod engine;
/// Bond kinds and plan builders
pub mod plans;
/// Repeating placement rules
pub mod template;

pub use engine::{Bond, LayerFit, Side};
pub use plans::BondKind;
pub use template::{BrickKind, BrickTransform, Rule, Template};
