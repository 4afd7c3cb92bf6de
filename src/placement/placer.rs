//! World placement of course, corner and lintel bricks
//!
//! Every brick is composed as `wall * layer * brick`: the brick transform from
//! the bond engine is local to its course, the course is offset inside its
//! wall, and the wall isometry carries everything into world coordinates.
//! Corner bricks are composed with their corner frame instead.

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};

use crate::bond::{BrickKind, BrickTransform};
use crate::geometry::numeric::round_length;
use crate::io::configuration::LENGTH_EPSILON;
use crate::structure::{CornId, Corns, GroupId, Structure, WallLayerGroup};

/// Placement options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacerConfig {
    /// Emit filler bricks for residual lengths
    pub fill: bool,
}

impl Default for PlacerConfig {
    fn default() -> Self {
        Self { fill: true }
    }
}

/// One brick in world coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct BrickPlacement {
    /// Sequential index in placement order
    pub id: usize,
    /// Role of the brick
    pub kind: BrickKind,
    /// Wall the brick belongs to, `None` for corner bricks
    pub wall: Option<GroupId>,
    /// Corner the brick belongs to, `None` for wall bricks
    pub corner: Option<CornId>,
    /// Dimensions `(length, width, height)` before rotation
    pub size: Vector3<f64>,
    /// World position of the brick center
    pub position: Point3<f64>,
    /// World orientation
    pub rotation: UnitQuaternion<f64>,
}

impl BrickPlacement {
    /// Rigid transform from brick to world coordinates
    pub fn isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(Translation3::from(self.position.coords), self.rotation)
    }
}

/// Local isometry of a brick transform
fn brick_isometry(brick: &BrickTransform) -> Isometry3<f64> {
    let rotation =
        UnitQuaternion::from_euler_angles(brick.rotation.x, brick.rotation.y, brick.rotation.z);
    Isometry3::from_parts(Translation3::from(brick.translation), rotation)
}

/// Converts solved walls and corners into brick placements
#[derive(Debug, Clone, Copy, Default)]
pub struct BrickPlacer {
    config: PlacerConfig,
}

impl BrickPlacer {
    /// Create a placer
    pub const fn new(config: PlacerConfig) -> Self {
        Self { config }
    }

    /// Place every brick of the structure
    ///
    /// Walls come first in wall and course order, then lintels, then corners.
    pub fn place(&self, structure: &Structure, corns: &Corns) -> Vec<BrickPlacement> {
        let mut placements = Vec::new();
        for group in structure.groups() {
            self.place_wall(structure, group, &mut placements);
        }
        for group in structure.groups() {
            Self::place_lintels(group, &mut placements);
        }
        Self::place_corners(structure, corns, &mut placements);
        placements
    }

    fn place_wall(
        &self,
        structure: &Structure,
        group: &WallLayerGroup,
        placements: &mut Vec<BrickPlacement>,
    ) {
        let Some(bond) = structure.bond_of(group.id) else {
            return;
        };
        let wall = group.isometry();

        for &layer_id in &group.layers {
            let Some(layer) = structure.layer(layer_id).filter(|layer| !layer.is_covered()) else {
                continue;
            };
            let bricks = bond.apply_layer(
                layer.length,
                group.width,
                self.config.fill,
                self.config.fill,
                group.plan_course(layer),
                group.x_offset(layer),
                group.reversed,
            );
            let course = wall * Translation3::from(layer.translation);
            for brick in &bricks {
                push(
                    placements,
                    brick,
                    &(course * brick_isometry(brick)),
                    Some(group.id),
                    None,
                );
            }
        }
    }

    /// One lintel brick per course overlapping each lintel
    fn place_lintels(group: &WallLayerGroup, placements: &mut Vec<BrickPlacement>) {
        let module = group.module;
        let courses = (module.snap(group.height, 2) / module.height()).round() as usize;
        let wall = group.isometry();

        for opening in &group.openings {
            let (Some(lintel), Some(span)) = (opening.lintel, opening.lintel_span()) else {
                continue;
            };
            for course in 0..courses {
                let bottom = -group.height / 2.0 + module.height() * course as f64;
                let top = bottom + module.height();
                let overlaps = bottom < opening.lintel_top() - LENGTH_EPSILON
                    && opening.top() < top - LENGTH_EPSILON;
                if !overlaps {
                    continue;
                }

                let brick = BrickTransform {
                    translation: Vector3::new(
                        opening.translation.x,
                        0.0,
                        round_length(bottom + module.height() / 2.0),
                    ),
                    rotation: Vector3::zeros(),
                    size: Vector3::new(span, lintel.width().max(group.width), module.height())
                        .map(round_length),
                    kind: BrickKind::Lintel,
                };
                push(
                    placements,
                    &brick,
                    &(wall * brick_isometry(&brick)),
                    Some(group.id),
                    None,
                );
            }
        }
    }

    fn place_corners(structure: &Structure, corns: &Corns, placements: &mut Vec<BrickPlacement>) {
        for id in corns.ids() {
            let Some(corn) = corns.get(id) else {
                continue;
            };
            let Some(frame) = corn.frame.as_ref() else {
                continue;
            };
            let Some(bond) = structure.bond_of_layer(frame.main_layer) else {
                continue;
            };

            let origin = Isometry3::from_parts(
                Translation3::from(frame.origin.coords),
                frame.rotation(),
            );
            for brick in bond.apply_corner(corn.plan_offset, frame.mirrored) {
                push(
                    placements,
                    &brick,
                    &(origin * brick_isometry(&brick)),
                    None,
                    Some(id),
                );
            }
        }
    }
}

fn push(
    placements: &mut Vec<BrickPlacement>,
    brick: &BrickTransform,
    world: &Isometry3<f64>,
    wall: Option<GroupId>,
    corner: Option<CornId>,
) {
    placements.push(BrickPlacement {
        id: placements.len(),
        kind: brick.kind,
        wall,
        corner,
        size: brick.size,
        position: Point3::from(world.translation.vector.map(round_length)),
        rotation: world.rotation,
    });
}
