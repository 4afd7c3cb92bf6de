//! Wall descriptions read from JSON
//!
//! The description is the hand-off format of an external model importer:
//! one record per wall with its world pose, dimensions, brick module, bond
//! and openings. Rotations are given either as a unit quaternion
//! `[x, y, z, w]` or as a row-major 3x3 matrix.

use std::fs;
use std::path::Path;

use nalgebra::{Matrix3, Quaternion, Rotation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::bond::BondKind;
use crate::geometry::BrickModule;
use crate::io::error::{BondError, Result, file_error, invalid_parameter};
use crate::structure::{Opening, WallSpec, combine_walls};

/// Orientation in a wall description
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RotationDescription {
    /// Unit quaternion as `[x, y, z, w]`
    Quaternion {
        /// Components `[x, y, z, w]`
        quaternion: [f64; 4],
    },
    /// Row-major rotation matrix
    Matrix {
        /// Rows of the matrix
        matrix: [[f64; 3]; 3],
    },
}

impl Default for RotationDescription {
    fn default() -> Self {
        Self::Quaternion {
            quaternion: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl RotationDescription {
    /// Convert to a unit quaternion
    ///
    /// # Errors
    ///
    /// Returns an error for a zero quaternion or a matrix that is not a rotation
    pub fn to_unit_quaternion(&self) -> Result<UnitQuaternion<f64>> {
        match *self {
            Self::Quaternion {
                quaternion: [x, y, z, w],
            } => UnitQuaternion::try_new(Quaternion::new(w, x, y, z), f64::EPSILON).ok_or_else(
                || invalid_parameter("rotation", &format!("{:?}", [x, y, z, w]), &"zero quaternion"),
            ),
            Self::Matrix { matrix: [r0, r1, r2] } => {
                let [a, b, c] = r0;
                let [d, e, f] = r1;
                let [g, h, i] = r2;
                let m = Matrix3::new(a, b, c, d, e, f, g, h, i);
                let orthonormal = (m.transpose() * m - Matrix3::identity()).norm() <= 1e-6;
                if !orthonormal || m.determinant() <= 0.0 {
                    return Err(invalid_parameter(
                        "rotation",
                        &format!("{:?}", [r0, r1, r2]),
                        &"matrix is not a proper rotation",
                    ));
                }
                Ok(UnitQuaternion::from_rotation_matrix(
                    &Rotation3::from_matrix_unchecked(m),
                ))
            }
        }
    }
}

/// Brick module in a wall description
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModuleDescription {
    /// Brick length
    pub length: f64,
    /// Brick width
    pub width: f64,
    /// Brick height
    pub height: f64,
    /// Snapping increments, defaulting to the brick dimensions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<[f64; 3]>,
}

impl From<ModuleDescription> for BrickModule {
    fn from(module: ModuleDescription) -> Self {
        module.grid.map_or_else(
            || Self::uniform(module.length, module.width, module.height),
            |grid| Self::new(module.length, module.width, module.height, grid),
        )
    }
}

/// Opening in a wall description, positioned relative to the wall center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningDescription {
    /// Center relative to the wall center
    pub translation: [f64; 3],
    /// Extent along the wall
    pub length: f64,
    /// Extent across the wall
    pub width: f64,
    /// Vertical extent
    pub height: f64,
    /// Orientation relative to the wall
    #[serde(default)]
    pub rotation: RotationDescription,
    /// Lintel brick spanning the opening
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lintel: Option<ModuleDescription>,
}

impl OpeningDescription {
    fn to_opening(&self) -> Result<Opening> {
        let mut opening = Opening::new(
            Vector3::from(self.translation),
            self.length,
            self.width,
            self.height,
        );
        opening.rotation = self.rotation.to_unit_quaternion()?;
        Ok(match self.lintel {
            Some(lintel) => opening.with_lintel(lintel.into()),
            None => opening,
        })
    }
}

/// One wall in a description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallDescription {
    /// Wall type identifier
    #[serde(default)]
    pub id: String,
    /// World orientation
    #[serde(default)]
    pub rotation: RotationDescription,
    /// World position of the wall center
    pub translation: [f64; 3],
    /// Extent along the wall axis
    pub length: f64,
    /// Thickness
    pub width: f64,
    /// Vertical extent
    pub height: f64,
    /// Brick module
    pub module: ModuleDescription,
    /// Bond pattern name such as `StretchedBond`
    pub bond: BondKind,
    /// Openings cut from the wall
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub openings: Vec<OpeningDescription>,
    /// Build courses from the right end
    #[serde(default)]
    pub reversed: bool,
}

impl WallDescription {
    /// Convert to a validated wall specification
    ///
    /// # Errors
    ///
    /// Returns an error if the rotation, dimensions or module are invalid
    pub fn to_spec(&self) -> Result<WallSpec> {
        let spec = WallSpec {
            name: self.id.clone(),
            rotation: self.rotation.to_unit_quaternion()?,
            translation: Vector3::from(self.translation),
            length: self.length,
            width: self.width,
            height: self.height,
            module: self.module.into(),
            bond: self.bond,
            openings: self
                .openings
                .iter()
                .map(OpeningDescription::to_opening)
                .collect::<Result<_>>()?,
            reversed: self.reversed,
        };
        spec.validate()?;
        Ok(spec)
    }
}

/// Top-level wall description document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureDescription {
    /// Walls in input order
    pub walls: Vec<WallDescription>,
}

impl StructureDescription {
    /// Convert every wall and merge collinear neighbors
    ///
    /// # Errors
    ///
    /// Returns an error if any wall is invalid
    pub fn to_specs(&self) -> Result<Vec<WallSpec>> {
        let specs = self
            .walls
            .iter()
            .map(WallDescription::to_spec)
            .collect::<Result<Vec<_>>>()?;
        Ok(combine_walls(specs))
    }
}

/// Read a wall description file
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid description
pub fn load_description(path: &Path) -> Result<StructureDescription> {
    let text = fs::read_to_string(path).map_err(|e| file_error(path, "read", e))?;
    serde_json::from_str(&text).map_err(|source| BondError::Serialization {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a wall description file and convert it to wall specifications
///
/// # Errors
///
/// Returns an error if the file cannot be read or any wall is invalid
pub fn load_walls(path: &Path) -> Result<Vec<WallSpec>> {
    load_description(path)?.to_specs()
}
