//! Face adjacency between placed bricks
//!
//! Bricks are compared by world axis-aligned bounding boxes. Two bricks are
//! neighbors along an axis when a face of one touches the opposite face of
//! the other and their extents overlap on the two remaining axes.

use std::collections::BTreeMap;

use nalgebra::{Point3, Vector3};

use crate::io::configuration::LENGTH_EPSILON;
use crate::placement::placer::BrickPlacement;

/// Side of a brick a neighbor touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Above, `+z`
    Top,
    /// Below, `-z`
    Bottom,
    /// Toward `-x`
    Left,
    /// Toward `+x`
    Right,
    /// Toward `-y`
    Front,
    /// Toward `+y`
    Back,
}

impl Direction {
    /// All directions
    pub const ALL: [Self; 6] = [
        Self::Top,
        Self::Bottom,
        Self::Left,
        Self::Right,
        Self::Front,
        Self::Back,
    ];

    /// Name used in brick exports
    pub const fn name(self) -> &'static str {
        match self {
            Self::Top => "TOP",
            Self::Bottom => "BOTTOM",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Front => "FRONT",
            Self::Back => "BACK",
        }
    }

    /// The facing direction on the other brick
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }

    /// Direction of the positive side of an axis (0 = x, 1 = y, 2 = z)
    const fn positive(axis: usize) -> Self {
        match axis {
            0 => Self::Right,
            1 => Self::Back,
            _ => Self::Top,
        }
    }
}

/// World axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Point3<f64>,
    /// Maximum corner
    pub max: Point3<f64>,
}

impl Aabb {
    /// Bounds of a placed brick
    pub fn of(placement: &BrickPlacement) -> Self {
        let iso = placement.isometry();
        let half = placement.size / 2.0;
        let mut min = Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
        let mut max = Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);

        for sx in [-1.0, 1.0] {
            for sy in [-1.0, 1.0] {
                for sz in [-1.0, 1.0] {
                    let corner = iso * Point3::from(half.component_mul(&Vector3::new(sx, sy, sz)));
                    min = min.inf(&corner);
                    max = max.sup(&corner);
                }
            }
        }
        Self { min, max }
    }

    fn lower(&self, axis: usize) -> f64 {
        component(&self.min, axis)
    }

    fn upper(&self, axis: usize) -> f64 {
        component(&self.max, axis)
    }

    /// Check if the interiors overlap along one axis
    fn overlaps_on(&self, other: &Self, axis: usize) -> bool {
        self.lower(axis) < other.upper(axis) - LENGTH_EPSILON
            && other.lower(axis) < self.upper(axis) - LENGTH_EPSILON
    }

    /// Side of `self` that `other` touches, if any
    pub fn touching(&self, other: &Self) -> Option<Direction> {
        for axis in 0..3 {
            let others_overlap = (0..3)
                .filter(|&k| k != axis)
                .all(|k| self.overlaps_on(other, k));
            if !others_overlap {
                continue;
            }
            if (self.upper(axis) - other.lower(axis)).abs() <= LENGTH_EPSILON {
                return Some(Direction::positive(axis));
            }
            if (other.upper(axis) - self.lower(axis)).abs() <= LENGTH_EPSILON {
                return Some(Direction::positive(axis).opposite());
            }
        }
        None
    }
}

fn component(point: &Point3<f64>, axis: usize) -> f64 {
    match axis {
        0 => point.x,
        1 => point.y,
        _ => point.z,
    }
}

/// Neighbor lists of one brick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Neighbors {
    /// Touching bricks per side, in ascending id order
    pub adjacent: BTreeMap<Direction, Vec<usize>>,
    /// Bricks that must be laid first: the ones below
    pub depends_on: Vec<usize>,
}

impl Neighbors {
    /// Touching bricks on one side
    pub fn on(&self, direction: Direction) -> &[usize] {
        self.adjacent.get(&direction).map_or(&[], Vec::as_slice)
    }
}

/// Compute neighbor lists for every placement, indexed like the input
pub fn find_neighbors(placements: &[BrickPlacement]) -> Vec<Neighbors> {
    let boxes: Vec<Aabb> = placements.iter().map(Aabb::of).collect();
    let mut neighbors = vec![Neighbors::default(); placements.len()];

    // Sweep along x so only boxes with touching or overlapping x ranges meet
    let mut order: Vec<usize> = (0..boxes.len()).collect();
    order.sort_by(|&a, &b| {
        let key = |i: usize| boxes.get(i).map_or(f64::INFINITY, |aabb| aabb.min.x);
        key(a).total_cmp(&key(b))
    });

    let mut links: Vec<(usize, usize, Direction)> = Vec::new();
    for (position, &i) in order.iter().enumerate() {
        let Some(a) = boxes.get(i) else {
            continue;
        };
        for &j in order.iter().skip(position + 1) {
            let Some(b) = boxes.get(j) else {
                continue;
            };
            if b.min.x > a.max.x + LENGTH_EPSILON {
                break;
            }
            if let Some(direction) = a.touching(b) {
                links.push((i, j, direction));
            }
        }
    }

    for (i, j, direction) in links {
        let (Some(id_i), Some(id_j)) = (placements.get(i), placements.get(j)) else {
            continue;
        };
        let (id_i, id_j) = (id_i.id, id_j.id);
        if let Some(entry) = neighbors.get_mut(i) {
            entry.adjacent.entry(direction).or_default().push(id_j);
        }
        if let Some(entry) = neighbors.get_mut(j) {
            entry.adjacent.entry(direction.opposite()).or_default().push(id_i);
        }
    }

    for entry in &mut neighbors {
        for ids in entry.adjacent.values_mut() {
            ids.sort_unstable();
        }
        entry.depends_on = entry.on(Direction::Bottom).to_vec();
    }
    neighbors
}
