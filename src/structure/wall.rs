//! Walls reduced to stacks of straight courses
//!
//! A [`Structure`] owns every wall ([`WallLayerGroup`]) and every course
//! ([`WallLayer`]) in flat arenas addressed by index. Layers only ever shrink:
//! openings split them when walls are added, corner inserts trim their ends
//! once a solution has been applied.

use std::collections::BTreeSet;

use nalgebra::{Isometry3, Point2, Point3, Translation3, UnitQuaternion, Vector3};

use crate::bond::{Bond, BondKind, Side};
use crate::geometry::numeric::{approx_eq, is_zero, quarter_turns, round_length};
use crate::geometry::{BrickModule, Segment2};
use crate::io::configuration::{ALIGNMENT_TOLERANCE, LENGTH_EPSILON};
use crate::io::error::{AssignTarget, BondError, Result, invalid_parameter};
use crate::structure::opening::{Opening, split_span};

/// Index of a layer in its structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub usize);

/// Index of a wall layer group in its structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub usize);

/// Index of a bond in a structure's bond table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BondId(pub usize);

/// Geometry and bond selection for one wall before layering
#[derive(Debug, Clone, PartialEq)]
pub struct WallSpec {
    /// Wall type identifier carried through to the export
    pub name: String,
    /// World orientation; the wall runs along its local x axis
    pub rotation: UnitQuaternion<f64>,
    /// World position of the wall center
    pub translation: Vector3<f64>,
    /// Extent along the wall axis
    pub length: f64,
    /// Thickness
    pub width: f64,
    /// Vertical extent
    pub height: f64,
    /// Brick module used for every course
    pub module: BrickModule,
    /// Bond pattern
    pub bond: BondKind,
    /// Openings cut from the courses
    pub openings: Vec<Opening>,
    /// Build the courses from the right end
    pub reversed: bool,
}

impl WallSpec {
    /// Wall axis direction in world coordinates
    pub fn axis(&self) -> Vector3<f64> {
        self.rotation * Vector3::x()
    }

    /// World endpoints of the wall axis at the wall's center height
    pub fn endpoints(&self) -> (Point3<f64>, Point3<f64>) {
        let half = self.axis() * (self.length / 2.0);
        let center = Point3::from(self.translation);
        (center - half, center + half)
    }

    /// Check dimensions and module before layering
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension is not positive or the module is invalid
    pub fn validate(&self) -> Result<()> {
        for (parameter, value) in [
            ("length", self.length),
            ("width", self.width),
            ("height", self.height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid_parameter(parameter, &value, &"must be positive"));
            }
        }
        if !self.module.is_valid() {
            return Err(invalid_parameter(
                "module",
                &format!("{:?}", self.module),
                &"dimensions and grid must be positive",
            ));
        }
        Ok(())
    }
}

/// Merge walls that continue each other in a straight line
///
/// Two walls are combined when they share orientation, thickness, height,
/// elevation, module and bond, and the end of one coincides with the start of
/// the other. Openings are carried over into the combined wall's frame.
pub fn combine_walls(walls: Vec<WallSpec>) -> Vec<WallSpec> {
    let mut pending = walls;
    let mut merged = true;
    while merged {
        merged = false;
        'search: for i in 0..pending.len() {
            for j in 0..pending.len() {
                if i == j {
                    continue;
                }
                let (Some(a), Some(b)) = (pending.get(i), pending.get(j)) else {
                    continue;
                };
                if let Some(combined) = combine_pair(a, b) {
                    let (first, second) = (i.min(j), i.max(j));
                    pending.remove(second);
                    if let Some(slot) = pending.get_mut(first) {
                        *slot = combined;
                    }
                    merged = true;
                    break 'search;
                }
            }
        }
    }
    pending
}

fn combine_pair(a: &WallSpec, b: &WallSpec) -> Option<WallSpec> {
    let aligned = a.rotation.angle_to(&b.rotation) <= ALIGNMENT_TOLERANCE;
    let compatible = aligned
        && a.bond == b.bond
        && a.reversed == b.reversed
        && a.module.same_as(&b.module)
        && approx_eq(a.width, b.width)
        && approx_eq(a.height, b.height)
        && approx_eq(a.translation.z, b.translation.z);
    if !compatible {
        return None;
    }

    let (_, a_end) = a.endpoints();
    let (b_start, b_end) = b.endpoints();
    if (a_end - b_start).norm() > LENGTH_EPSILON {
        return None;
    }

    let (a_start, _) = a.endpoints();
    let length = round_length(a.length + b.length);
    let center = Point3::from((a_start.coords + b_end.coords) / 2.0);
    let shift_a = -(b.length / 2.0);
    let shift_b = a.length / 2.0;

    let openings = a
        .openings
        .iter()
        .map(|opening| (opening, shift_a))
        .chain(b.openings.iter().map(|opening| (opening, shift_b)))
        .map(|(opening, shift)| {
            let mut moved = opening.clone();
            moved.translation.x = round_length(moved.translation.x + shift);
            moved
        })
        .collect();

    Some(WallSpec {
        name: a.name.clone(),
        rotation: a.rotation,
        translation: center.coords,
        length,
        width: a.width,
        height: a.height,
        module: a.module,
        bond: a.bond,
        openings,
        reversed: a.reversed,
    })
}

/// One straight course of a wall
#[derive(Debug, Clone, PartialEq)]
pub struct WallLayer {
    /// Index of this layer
    pub id: LayerId,
    /// Extent along the wall axis
    pub length: f64,
    /// Course center relative to the wall center, in wall coordinates
    pub translation: Vector3<f64>,
    /// Course height
    pub height: f64,
    /// Owning wall
    pub group: GroupId,
    /// Course index within the wall, counted from the bottom
    pub course: usize,
    /// Height tier shared with courses of other walls at the same elevation
    pub tier: usize,
    /// Layers touching this layer's left end
    pub left_connections: BTreeSet<LayerId>,
    /// Layers touching this layer's right end
    pub right_connections: BTreeSet<LayerId>,
    trims: [f64; 2],
    covered: bool,
}

impl WallLayer {
    fn new(
        id: LayerId,
        group: GroupId,
        course: usize,
        start: f64,
        end: f64,
        z: f64,
        height: f64,
    ) -> Self {
        Self {
            id,
            length: round_length(end - start),
            translation: Vector3::new(round_length((start + end) / 2.0), 0.0, round_length(z)),
            height,
            group,
            course,
            tier: 0,
            left_connections: BTreeSet::new(),
            right_connections: BTreeSet::new(),
            trims: [0.0; 2],
            covered: false,
        }
    }

    /// Left end along the wall axis, in wall coordinates
    pub fn start_x(&self) -> f64 {
        round_length(self.translation.x - self.length / 2.0)
    }

    /// Right end along the wall axis, in wall coordinates
    pub fn end_x(&self) -> f64 {
        round_length(self.translation.x + self.length / 2.0)
    }

    /// Layers touching one end
    pub const fn connections(&self, side: Side) -> &BTreeSet<LayerId> {
        match side {
            Side::Left => &self.left_connections,
            Side::Right => &self.right_connections,
        }
    }

    /// Record a layer touching one end
    ///
    /// A layer is never connected at both ends, so it is removed from the
    /// opposite set first.
    pub fn connect(&mut self, side: Side, other: LayerId) {
        let (target, opposite) = match side {
            Side::Left => (&mut self.left_connections, &mut self.right_connections),
            Side::Right => (&mut self.right_connections, &mut self.left_connections),
        };
        opposite.remove(&other);
        target.insert(other);
    }

    /// Check if an end touches another layer
    pub fn is_connected(&self, side: Side) -> bool {
        !self.connections(side).is_empty()
    }

    /// Length removed from one end by corner inserts
    pub const fn trim(&self, side: Side) -> f64 {
        match side {
            Side::Left => self.trims[0],
            Side::Right => self.trims[1],
        }
    }

    /// Shorten the layer from one end
    ///
    /// Non-positive amounts leave the layer unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the reduction would consume the whole layer
    pub fn reduce_length(&mut self, amount: f64, side: Side) -> Result<()> {
        let amount = round_length(amount);
        if amount >= self.length {
            return Err(BondError::InvalidLength {
                layer: self.id,
                requested: amount,
                current: self.length,
            });
        }
        if amount <= 0.0 {
            return Ok(());
        }

        self.length = round_length(self.length - amount);
        let (shift, slot) = match side {
            Side::Left => (amount / 2.0, &mut self.trims[0]),
            Side::Right => (-amount / 2.0, &mut self.trims[1]),
        };
        *slot = round_length(*slot + amount);
        self.translation.x = round_length(self.translation.x + shift);
        Ok(())
    }

    /// Hand the whole layer to the corner inserts at its ends
    ///
    /// A covered layer keeps its length for later solves but places no bricks.
    pub const fn cover(&mut self) {
        self.covered = true;
    }

    /// Check if corner inserts occupy the whole layer
    pub const fn is_covered(&self) -> bool {
        self.covered
    }

    /// Undo every corner trim
    pub fn restore_trims(&mut self) {
        let [left, right] = self.trims;
        self.length = round_length(self.length + left + right);
        self.translation.x = round_length(self.translation.x + (right - left) / 2.0);
        self.trims = [0.0; 2];
        self.covered = false;
    }

    /// Ends of the layer before corner trims, in wall coordinates
    pub fn untrimmed_span(&self) -> (f64, f64) {
        let [left, right] = self.trims;
        (
            round_length(self.start_x() - left),
            round_length(self.end_x() + right),
        )
    }
}

/// One wall's full course stack
#[derive(Debug, Clone, PartialEq)]
pub struct WallLayerGroup {
    /// Index of this group
    pub id: GroupId,
    /// Wall type identifier
    pub name: String,
    /// World orientation
    pub rotation: UnitQuaternion<f64>,
    /// World position of the wall center
    pub translation: Vector3<f64>,
    /// Extent along the wall axis
    pub length: f64,
    /// Thickness
    pub width: f64,
    /// Vertical extent
    pub height: f64,
    /// Brick module
    pub module: BrickModule,
    /// Bond used by every course
    pub bond: BondId,
    /// Shift of the whole wall within the bond's course cycle
    pub plan_offset: usize,
    /// Set once `plan_offset` is final for the current search trial
    pub touched: bool,
    /// Courses are built from the right end
    pub reversed: bool,
    /// Courses from bottom to top, split courses left to right
    pub layers: Vec<LayerId>,
    /// Openings cut from the courses
    pub openings: Vec<Opening>,
}

impl WallLayerGroup {
    /// Rigid transform from wall to world coordinates
    pub fn isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(Translation3::from(self.translation), self.rotation)
    }

    /// Fix the plan offset for the current trial
    ///
    /// # Errors
    ///
    /// Returns an error if the offset was already fixed
    pub fn set_plan_offset(&mut self, offset: usize) -> Result<()> {
        if self.touched {
            return Err(BondError::DoubleAssignment {
                target: AssignTarget::Wall(self.id),
            });
        }
        self.plan_offset = offset;
        self.touched = true;
        Ok(())
    }

    /// Distance from the bond origin to a layer's start
    ///
    /// The origin is the wall's left end, or its right end when reversed.
    pub fn x_offset(&self, layer: &WallLayer) -> f64 {
        let half = self.length / 2.0;
        if self.reversed {
            round_length(half - layer.end_x())
        } else {
            round_length(layer.start_x() + half)
        }
    }

    /// Course index into the bond plan after applying the plan offset
    pub const fn plan_course(&self, layer: &WallLayer) -> usize {
        layer.course + self.plan_offset
    }
}

/// Arena of walls, courses and bonds
#[derive(Debug, Clone, Default)]
pub struct Structure {
    groups: Vec<WallLayerGroup>,
    layers: Vec<WallLayer>,
    bonds: Vec<Bond>,
}

impl Structure {
    /// Create an empty structure
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a structure from wall specifications
    ///
    /// # Errors
    ///
    /// Returns an error if any wall fails validation
    pub fn from_walls(walls: impl IntoIterator<Item = WallSpec>) -> Result<Self> {
        let mut structure = Self::new();
        for wall in walls {
            structure.add_wall(wall)?;
        }
        Ok(structure)
    }

    /// Add a wall, split it into courses and cut its openings
    ///
    /// # Errors
    ///
    /// Returns an error if the wall fails validation
    pub fn add_wall(&mut self, wall: WallSpec) -> Result<GroupId> {
        wall.validate()?;

        let id = GroupId(self.groups.len());
        let bond = self.bond_id(wall.bond, wall.module);
        let module = wall.module;
        let courses = (module.snap(wall.height, 2) / module.height()).round() as usize;
        let half = wall.length / 2.0;

        let mut layer_ids = Vec::new();
        for course in 0..courses {
            let bottom = -wall.height / 2.0 + module.height() * course as f64;
            let top = bottom + module.height();
            let z = bottom + module.height() / 2.0;

            let mut spans = vec![(-half, half)];
            for opening in &wall.openings {
                let Some(span) = opening.span_for_course(bottom, top) else {
                    continue;
                };
                spans = spans
                    .into_iter()
                    .flat_map(|(start, end)| {
                        split_span(start, end, opening.translation.x, span)
                            .map_or_else(|| vec![(start, end)], |(l, r)| vec![l, r])
                    })
                    .collect();
            }

            for (start, end) in spans {
                let layer_id = LayerId(self.layers.len());
                self.layers.push(WallLayer::new(
                    layer_id,
                    id,
                    course,
                    start,
                    end,
                    z,
                    module.height(),
                ));
                layer_ids.push(layer_id);
            }
        }

        self.groups.push(WallLayerGroup {
            id,
            name: wall.name,
            rotation: wall.rotation,
            translation: wall.translation,
            length: wall.length,
            width: wall.width,
            height: wall.height,
            module,
            bond,
            plan_offset: 0,
            touched: false,
            reversed: wall.reversed,
            layers: layer_ids,
            openings: wall.openings,
        });
        self.assign_tiers();
        Ok(id)
    }

    fn bond_id(&mut self, kind: BondKind, module: BrickModule) -> BondId {
        if let Some(index) = self
            .bonds
            .iter()
            .position(|bond| bond.kind() == kind && bond.module().same_as(&module))
        {
            return BondId(index);
        }
        self.bonds.push(Bond::new(kind, module));
        BondId(self.bonds.len() - 1)
    }

    /// Number height tiers by the world elevation of each course center
    pub fn assign_tiers(&mut self) {
        let elevations: Vec<f64> = self
            .layers
            .iter()
            .map(|layer| round_length(self.layer_center(layer).z))
            .collect();
        let mut tiers = elevations.clone();
        tiers.sort_by(f64::total_cmp);
        tiers.dedup_by(|a, b| approx_eq(*a, *b));

        for (layer, elevation) in self.layers.iter_mut().zip(elevations) {
            layer.tier = tiers
                .iter()
                .position(|&tier| approx_eq(tier, elevation))
                .unwrap_or(0);
        }
    }

    /// All wall groups
    pub fn groups(&self) -> &[WallLayerGroup] {
        &self.groups
    }

    /// All layers
    pub fn layers(&self) -> &[WallLayer] {
        &self.layers
    }

    /// All distinct bonds
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Group by index
    pub fn group(&self, id: GroupId) -> Option<&WallLayerGroup> {
        self.groups.get(id.0)
    }

    /// Mutable group by index
    pub fn group_mut(&mut self, id: GroupId) -> Option<&mut WallLayerGroup> {
        self.groups.get_mut(id.0)
    }

    /// Layer by index
    pub fn layer(&self, id: LayerId) -> Option<&WallLayer> {
        self.layers.get(id.0)
    }

    /// Mutable layer by index
    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut WallLayer> {
        self.layers.get_mut(id.0)
    }

    /// Bond used by a group
    pub fn bond_of(&self, group: GroupId) -> Option<&Bond> {
        self.group(group).and_then(|g| self.bonds.get(g.bond.0))
    }

    /// Bond used by the group owning a layer
    pub fn bond_of_layer(&self, layer: LayerId) -> Option<&Bond> {
        self.layer(layer).and_then(|l| self.bond_of(l.group))
    }

    /// World position of a layer's center
    pub fn layer_center(&self, layer: &WallLayer) -> Point3<f64> {
        self.group(layer.group).map_or_else(
            || Point3::from(layer.translation),
            |group| group.isometry() * Point3::from(layer.translation),
        )
    }

    /// Plan-view center line of a layer before corner trims
    pub fn layer_segment(&self, id: LayerId) -> Option<Segment2> {
        let layer = self.layer(id)?;
        let group = self.group(layer.group)?;
        let (start, end) = layer.untrimmed_span();
        let iso = group.isometry();
        let a = iso * Point3::new(start, 0.0, layer.translation.z);
        let b = iso * Point3::new(end, 0.0, layer.translation.z);
        Some(Segment2::new(Point2::new(a.x, a.y), Point2::new(b.x, b.y)))
    }

    /// Check if two walls can meet in a corner
    ///
    /// Courses must stack the same way, the walls must be rotated against
    /// each other by a multiple of a quarter turn, and share a brick module.
    pub fn walls_compatible(&self, a: GroupId, b: GroupId) -> bool {
        let (Some(a), Some(b)) = (self.group(a), self.group(b)) else {
            return false;
        };
        let up_a = a.rotation * Vector3::z();
        let up_b = b.rotation * Vector3::z();
        if up_a.dot(&up_b) < 1.0 - ALIGNMENT_TOLERANCE {
            return false;
        }

        let axis_a = a.rotation * Vector3::x();
        let axis_b = b.rotation * Vector3::x();
        let angle = axis_a.cross(&axis_b).dot(&up_a).atan2(axis_a.dot(&axis_b));
        quarter_turns(angle, ALIGNMENT_TOLERANCE).is_some()
            && a.module.same_as(&b.module)
    }

    /// Groups with at least one connected layer end
    pub fn connected_groups(&self) -> Vec<GroupId> {
        let involved: BTreeSet<GroupId> = self
            .layers
            .iter()
            .filter(|layer| layer.is_connected(Side::Left) || layer.is_connected(Side::Right))
            .map(|layer| layer.group)
            .collect();
        involved.into_iter().collect()
    }

    /// Clear plan offsets and assignment flags on every wall
    pub fn reset_assignments(&mut self) {
        for group in &mut self.groups {
            group.plan_offset = 0;
            group.touched = false;
        }
    }

    /// Undo corner trims on every layer
    pub fn restore_trims(&mut self) {
        for layer in &mut self.layers {
            layer.restore_trims();
        }
    }

    /// Check if any layer carries a corner trim or is covered by a corner
    pub fn is_trimmed(&self) -> bool {
        self.layers.iter().any(|layer| {
            layer.is_covered()
                || !is_zero(layer.trim(Side::Left))
                || !is_zero(layer.trim(Side::Right))
        })
    }
}
