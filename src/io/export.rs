//! Brick placements written as JSON

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bond::BrickKind;
use crate::geometry::numeric::round_length;
use crate::io::error::{BondError, Result, file_error};
use crate::placement::{BrickPlacement, Direction, Neighbors};

/// One exported brick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickRecord {
    /// Placement index
    pub id: usize,
    /// Brick role: `whole`, `filler`, `corner` or `lintel`
    pub kind: String,
    /// Owning wall, absent for corner bricks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wall: Option<usize>,
    /// Dimensions `[length, width, height]`
    pub shape: [f64; 3],
    /// World position of the brick center
    pub position: [f64; 3],
    /// World orientation as a quaternion `[x, y, z, w]`
    pub rotation: [f64; 4],
    /// Touching bricks keyed by side name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub neighbors: BTreeMap<String, Vec<usize>>,
    /// Bricks that must be laid first
    #[serde(default)]
    pub depends_on: Vec<usize>,
}

/// Exported layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickExport {
    /// Hole length left at connected layer ends
    pub score: f64,
    /// Every placed brick
    pub bricks: Vec<BrickRecord>,
}

const fn kind_name(kind: BrickKind) -> &'static str {
    match kind {
        BrickKind::Whole => "whole",
        BrickKind::Filler => "filler",
        BrickKind::Corner => "corner",
        BrickKind::Lintel => "lintel",
    }
}

impl BrickRecord {
    /// Build a record from a placement and its optional neighbor lists
    pub fn new(placement: &BrickPlacement, neighbors: Option<&Neighbors>) -> Self {
        let q = placement.rotation.quaternion();
        let p = placement.position;
        let s = placement.size;
        let (neighbors, depends_on) = neighbors.map_or_else(
            || (BTreeMap::new(), Vec::new()),
            |entry| {
                let lists = Direction::ALL
                    .into_iter()
                    .filter(|&direction| !entry.on(direction).is_empty())
                    .map(|direction| (direction.name().to_string(), entry.on(direction).to_vec()))
                    .collect();
                (lists, entry.depends_on.clone())
            },
        );

        Self {
            id: placement.id,
            kind: kind_name(placement.kind).to_string(),
            wall: placement.wall.map(|wall| wall.0),
            shape: [s.x, s.y, s.z],
            position: [p.x, p.y, p.z],
            rotation: [q.i, q.j, q.k, q.w].map(round_length),
            neighbors,
            depends_on,
        }
    }
}

impl BrickExport {
    /// Assemble an export, pairing placements with neighbor lists by index
    pub fn new(score: f64, placements: &[BrickPlacement], neighbors: Option<&[Neighbors]>) -> Self {
        let bricks = placements
            .iter()
            .enumerate()
            .map(|(index, placement)| {
                BrickRecord::new(placement, neighbors.and_then(|all| all.get(index)))
            })
            .collect();
        Self { score, bricks }
    }

    /// Write the export as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).map_err(|source| {
            BondError::Serialization {
                path: path.to_path_buf(),
                source,
            }
        })?;
        fs::write(path, text).map_err(|e| file_error(path, "write", e))
    }
}
