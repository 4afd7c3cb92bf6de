//! Brick bond layout for walls meeting at corners
//!
//! Walls are reduced to stacks of straight courses, corners between courses of
//! different walls are detected, and every wall and corner is assigned a plan
//! offset so that the chosen bond closes at the corners with as few unfilled
//! gaps as possible. The result is a list of brick placements in world space.

#![forbid(unsafe_code)]

/// Bond patterns, course plans and corner inserts
pub mod bond;
/// Brick modules, numeric policy and planar predicates
pub mod geometry;
/// Input/output operations and error handling
pub mod io;
/// World placement and neighbor adjacency of bricks
pub mod placement;
/// Plan offset assignment for walls and corners
pub mod solver;
/// Walls, courses, openings and the corner graph
pub mod structure;

pub use io::error::{BondError, Result};
