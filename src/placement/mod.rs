//! Brick placement and adjacency
//!
//! This module contains:
//! - Composition of bond transforms into world placements
//! - Face adjacency and laying dependencies between placed bricks

/// Face adjacency between placed bricks
pub mod neighbors;
/// World placement of wall, lintel and corner bricks
pub mod placer;

pub use neighbors::{Aabb, Direction, Neighbors, find_neighbors};
pub use placer::{BrickPlacement, BrickPlacer, PlacerConfig};
