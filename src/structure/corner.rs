//! Corner graph: where courses of different walls meet
//!
//! Corners are found by intersecting the plan-view center lines of every pair
//! of courses at the same height tier. Points that coincide are merged, so a
//! third or fourth course meeting at an existing corner turns it into a
//! T-joint or crossing. Only two-course corners receive a corner insert and
//! take part in solving; the others keep their course ends open.

use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::FRAC_PI_2;

use nalgebra::{Point2, Point3, UnitQuaternion, Vector3};

use crate::bond::Side;
use crate::geometry::numeric::{normalize_angle, round_length};
use crate::geometry::segment::SegmentPosition;
use crate::io::configuration::{ALIGNMENT_TOLERANCE, CORNER_COINCIDENCE_TOLERANCE, LENGTH_EPSILON};
use crate::io::error::{AssignTarget, BondError, Result, modeling_error};
use crate::structure::wall::{GroupId, LayerId, Structure};

/// Index of a corner in its collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CornId(pub usize);

/// Junction classification by how the courses meet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JunctionKind {
    /// Two courses ending at the same point
    Corner,
    /// One course ending against the side of another
    TJoint,
    /// Two courses passing through each other
    Crossing,
}

/// One course meeting a corner, expressed in the corner frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerLeg {
    /// Course meeting the corner
    pub layer: LayerId,
    /// End of the course at the corner
    pub side: Side,
    /// Angle from the frame's x axis to the course's inward direction
    pub angle: f64,
    /// Signed distance from the corner point to the course end, measured inward
    pub setback: f64,
}

/// Local frame anchoring a corner insert
#[derive(Debug, Clone, PartialEq)]
pub struct CornerFrame {
    /// Course whose inward direction is the frame's x axis
    pub main_layer: LayerId,
    /// Corner point
    pub origin: Point3<f64>,
    /// World angle of the frame's x axis about the vertical
    pub yaw: f64,
    /// The secondary leg runs along the frame's negative y axis
    pub mirrored: bool,
    /// Every course meeting the corner, main course first
    pub legs: Vec<CornerLeg>,
}

impl CornerFrame {
    /// World rotation of the frame
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_axis_angle(&Vector3::z_axis(), self.yaw)
    }

    /// Leg for a course
    pub fn leg(&self, layer: LayerId) -> Option<&CornerLeg> {
        self.legs.iter().find(|leg| leg.layer == layer)
    }
}

/// Point where courses of different walls meet
#[derive(Debug, Clone, PartialEq)]
pub struct Corn {
    /// Intersection of the course center lines at course mid height
    pub point: Point3<f64>,
    /// Courses meeting here
    pub layers: BTreeSet<LayerId>,
    /// Height tier of the courses
    pub tier: usize,
    /// Corner plan variant, before wrapping by the corner repeat step
    pub plan_offset: usize,
    /// Set once `plan_offset` is final for the current search trial
    pub touched: bool,
    /// Course anchoring the corner frame, pinned when solving starts
    pub main_layer: Option<LayerId>,
    /// Frame pinned together with the main layer
    pub frame: Option<CornerFrame>,
}

impl Corn {
    fn new(point: Point3<f64>, tier: usize) -> Self {
        Self {
            point,
            layers: BTreeSet::new(),
            tier,
            plan_offset: 0,
            touched: false,
            main_layer: None,
            frame: None,
        }
    }

    /// Classification by number of courses
    pub fn kind(&self) -> JunctionKind {
        match self.layers.len() {
            0..=2 => JunctionKind::Corner,
            3 => JunctionKind::TJoint,
            _ => JunctionKind::Crossing,
        }
    }

    /// Only two-course corners receive an insert and take part in solving
    pub fn is_solvable(&self) -> bool {
        self.layers.len() == 2
    }

    /// Walls whose courses meet here
    pub fn wall_ids(&self, structure: &Structure) -> BTreeSet<GroupId> {
        self.layers
            .iter()
            .filter_map(|&id| structure.layer(id).map(|layer| layer.group))
            .collect()
    }

    /// Fix the plan offset for the current trial
    ///
    /// # Errors
    ///
    /// Returns an error if the offset was already fixed
    pub fn set_plan_offset(&mut self, id: CornId, offset: usize) -> Result<()> {
        if self.touched {
            return Err(BondError::DoubleAssignment {
                target: AssignTarget::Corner(id),
            });
        }
        self.plan_offset = offset;
        self.touched = true;
        Ok(())
    }
}

/// Check if two corner points coincide
///
/// Used only when inserting corners; tolerance equality is not transitive and
/// is never used as the corner type's equality.
pub fn is_same_corner(a: &Point3<f64>, b: &Point3<f64>, tolerance: f64) -> bool {
    (a - b).norm() <= tolerance
}

/// T-joint or crossing between two courses
#[derive(Debug, Clone, PartialEq)]
pub struct Junction {
    /// Intersection point
    pub point: Point3<f64>,
    /// Height tier
    pub tier: usize,
    /// Course the intersection lies strictly inside
    pub through: LayerId,
    /// The other course
    pub other: LayerId,
    /// T-joint or crossing
    pub kind: JunctionKind,
}

/// All corners and junctions of a structure
#[derive(Debug, Clone, Default)]
pub struct Corns {
    corners: Vec<Corn>,
    /// T-joints and crossings between course pairs
    pub junctions: Vec<Junction>,
}

impl Corns {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Detect corners and junctions and record course connections
    ///
    /// Degenerate pairs (parallel center lines, intersections beyond either
    /// course) are skipped.
    pub fn detect(structure: &mut Structure) -> Self {
        structure.assign_tiers();
        let mut corns = Self::new();
        let mut contacts: Vec<(LayerId, Side, LayerId)> = Vec::new();

        let group_count = structure.groups().len();
        for a in 0..group_count {
            for b in (a + 1)..group_count {
                let (ga, gb) = (GroupId(a), GroupId(b));
                if !structure.walls_compatible(ga, gb) {
                    continue;
                }
                let (Some(group_a), Some(group_b)) = (structure.group(ga), structure.group(gb))
                else {
                    continue;
                };
                let tolerance = group_a.width.max(group_b.width) / 2.0 + LENGTH_EPSILON;

                for &la in &group_a.layers {
                    for &lb in &group_b.layers {
                        if let Some(contact) = classify_pair(structure, la, lb, tolerance) {
                            corns.record(contact, &mut contacts);
                        }
                    }
                }
            }
        }

        for (layer, side, other) in contacts {
            let members: BTreeSet<LayerId> = [layer, other].into_iter().collect();
            let solvable = corns
                .corners
                .iter()
                .any(|corn| corn.layers == members && corn.is_solvable());
            if solvable {
                if let Some(target) = structure.layer_mut(layer) {
                    target.connect(side, other);
                }
            }
        }

        corns
    }

    fn record(&mut self, contact: Contact, contacts: &mut Vec<(LayerId, Side, LayerId)>) {
        match contact {
            Contact::Corner {
                point,
                tier,
                a,
                side_a,
                b,
                side_b,
            } => {
                self.insert(point, tier, [a, b]);
                contacts.push((a, side_a, b));
                contacts.push((b, side_b, a));
            }
            Contact::Junction(junction) => self.junctions.push(junction),
        }
    }

    /// Insert a corner, merging it into a coincident corner of the same tier
    pub fn insert(&mut self, point: Point3<f64>, tier: usize, layers: [LayerId; 2]) -> CornId {
        let existing = self.corners.iter().position(|corn| {
            corn.tier == tier && is_same_corner(&corn.point, &point, CORNER_COINCIDENCE_TOLERANCE)
        });
        let index = existing.unwrap_or_else(|| {
            self.corners.push(Corn::new(point, tier));
            self.corners.len() - 1
        });
        if let Some(corn) = self.corners.get_mut(index) {
            corn.layers.extend(layers);
        }
        CornId(index)
    }

    /// All corners
    pub fn corners(&self) -> &[Corn] {
        &self.corners
    }

    /// Number of corners
    pub fn len(&self) -> usize {
        self.corners.len()
    }

    /// Check if no corner was found
    pub fn is_empty(&self) -> bool {
        self.corners.is_empty()
    }

    /// Corner indices in ascending order
    pub fn ids(&self) -> impl Iterator<Item = CornId> + '_ {
        (0..self.corners.len()).map(CornId)
    }

    /// Corner by index
    pub fn get(&self, id: CornId) -> Option<&Corn> {
        self.corners.get(id.0)
    }

    /// Mutable corner by index
    pub fn get_mut(&mut self, id: CornId) -> Option<&mut Corn> {
        self.corners.get_mut(id.0)
    }

    /// Corner with exactly this set of courses
    pub fn find(&self, layers: &BTreeSet<LayerId>) -> Option<CornId> {
        self.corners
            .iter()
            .position(|corn| &corn.layers == layers)
            .map(CornId)
    }

    /// Two-course corner at one end of a course
    pub fn corner_at(&self, structure: &Structure, layer: LayerId, side: Side) -> Option<CornId> {
        let course = structure.layer(layer)?;
        course.connections(side).iter().find_map(|&other| {
            let members: BTreeSet<LayerId> = [layer, other].into_iter().collect();
            self.find(&members)
                .filter(|&id| self.get(id).is_some_and(Corn::is_solvable))
        })
    }

    /// Corner in the tier below joining the same walls at the same place
    pub fn below(&self, structure: &Structure, id: CornId) -> Option<CornId> {
        let corn = self.get(id)?;
        let tier = corn.tier.checked_sub(1)?;
        self.stacked(structure, corn, tier)
    }

    /// Corner in the tier above joining the same walls at the same place
    pub fn above(&self, structure: &Structure, id: CornId) -> Option<CornId> {
        let corn = self.get(id)?;
        self.stacked(structure, corn, corn.tier + 1)
    }

    fn stacked(&self, structure: &Structure, corn: &Corn, tier: usize) -> Option<CornId> {
        let walls = corn.wall_ids(structure);
        let plan = Point2::new(corn.point.x, corn.point.y);
        self.corners
            .iter()
            .position(|other| {
                other.tier == tier
                    && other.wall_ids(structure) == walls
                    && (Point2::new(other.point.x, other.point.y) - plan).norm()
                        <= CORNER_COINCIDENCE_TOLERANCE
            })
            .map(CornId)
    }

    /// Two-course corners grouped by the unordered pair of walls they join
    pub fn by_wall_pair(&self, structure: &Structure) -> BTreeMap<(GroupId, GroupId), Vec<CornId>> {
        let mut pairs: BTreeMap<(GroupId, GroupId), Vec<CornId>> = BTreeMap::new();
        for (index, corn) in self.corners.iter().enumerate() {
            if !corn.is_solvable() {
                continue;
            }
            let walls: Vec<GroupId> = corn.wall_ids(structure).into_iter().collect();
            if let [a, b] = walls.as_slice() {
                pairs.entry((*a, *b)).or_default().push(CornId(index));
            }
        }
        pairs
    }

    /// Clear plan offsets and assignment flags on every corner
    pub fn reset_assignments(&mut self) {
        for corn in &mut self.corners {
            corn.plan_offset = 0;
            corn.touched = false;
        }
    }

    /// Pin the main layer and frame of every two-course corner
    ///
    /// # Errors
    ///
    /// Returns an error if no course of a corner contains the corner point
    pub fn freeze(&mut self, structure: &Structure) -> Result<()> {
        for index in 0..self.corners.len() {
            let id = CornId(index);
            let Some(corn) = self.corners.get(index) else {
                continue;
            };
            if !corn.is_solvable() {
                continue;
            }
            let frame = corner_frame(structure, id, corn)?;
            if let Some(corn) = self.corners.get_mut(index) {
                corn.main_layer = Some(frame.main_layer);
                corn.frame = Some(frame);
            }
        }
        Ok(())
    }
}

enum Contact {
    Corner {
        point: Point3<f64>,
        tier: usize,
        a: LayerId,
        side_a: Side,
        b: LayerId,
        side_b: Side,
    },
    Junction(Junction),
}

fn classify_pair(structure: &Structure, la: LayerId, lb: LayerId, tolerance: f64) -> Option<Contact> {
    let (layer_a, layer_b) = (structure.layer(la)?, structure.layer(lb)?);
    if layer_a.tier != layer_b.tier {
        return None;
    }
    let seg_a = structure.layer_segment(la)?;
    let seg_b = structure.layer_segment(lb)?;
    let (point, t, s) = seg_a.intersect_lines(&seg_b)?;

    let z = structure.layer_center(layer_a).z;
    let point = Point3::new(round_length(point.x), round_length(point.y), round_length(z));
    let tier = layer_a.tier;

    let side = |position: SegmentPosition| match position {
        SegmentPosition::NearStart => Side::Left,
        _ => Side::Right,
    };

    match (seg_a.classify(t, tolerance), seg_b.classify(s, tolerance)) {
        (SegmentPosition::Outside, _) | (_, SegmentPosition::Outside) => None,
        (pa, pb) if pa.is_endpoint() && pb.is_endpoint() => Some(Contact::Corner {
            point,
            tier,
            a: la,
            side_a: side(pa),
            b: lb,
            side_b: side(pb),
        }),
        (SegmentPosition::Interior, SegmentPosition::Interior) => {
            Some(Contact::Junction(Junction {
                point,
                tier,
                through: la,
                other: lb,
                kind: JunctionKind::Crossing,
            }))
        }
        (SegmentPosition::Interior, _) => Some(Contact::Junction(Junction {
            point,
            tier,
            through: la,
            other: lb,
            kind: JunctionKind::TJoint,
        })),
        _ => Some(Contact::Junction(Junction {
            point,
            tier,
            through: lb,
            other: la,
            kind: JunctionKind::TJoint,
        })),
    }
}

fn corner_frame(structure: &Structure, id: CornId, corn: &Corn) -> Result<CornerFrame> {
    let plan = Point2::new(corn.point.x, corn.point.y);

    // (layer, side, world angle of the inward direction, setback, clearance)
    let mut legs = Vec::new();
    for &layer in &corn.layers {
        let segment = structure
            .layer_segment(layer)
            .ok_or_else(|| modeling_error(id, &format!("course {} is missing", layer.0)))?;
        let direction = segment
            .direction()
            .ok_or_else(|| modeling_error(id, &format!("course {} has no length", layer.0)))?;
        let along = segment.parameter(&plan).unwrap_or(0.0);
        let side = if along < segment.length() / 2.0 {
            Side::Left
        } else {
            Side::Right
        };
        let (end, inward) = match side {
            Side::Left => (segment.start, direction),
            Side::Right => (segment.end, -direction),
        };
        let setback = round_length((end - plan).dot(&inward));
        let angle = inward.y.atan2(inward.x);
        let clearance = segment
            .contains_projection(&plan, LENGTH_EPSILON)
            .then(|| segment.endpoint_clearance(&plan));
        legs.push((layer, side, angle, setback, clearance));
    }

    // Deepest containing course wins; ties keep the lowest course index
    let mut main: Option<(usize, f64)> = None;
    for (index, leg) in legs.iter().enumerate() {
        if let Some(clearance) = leg.4 {
            if main.is_none_or(|(_, best)| clearance > best + LENGTH_EPSILON) {
                main = Some((index, clearance));
            }
        }
    }
    let Some((main_index, _)) = main else {
        return Err(modeling_error(
            id,
            &"corner point lies outside every course meeting it",
        ));
    };
    legs.swap(0, main_index);

    let (main_layer, _, yaw, _, _) = legs
        .first()
        .copied()
        .ok_or_else(|| modeling_error(id, &"corner has no courses"))?;

    let relative: Vec<f64> = legs
        .iter()
        .map(|leg| normalize_angle(leg.2 - yaw))
        .collect();
    let mirrored = relative
        .iter()
        .skip(1)
        .any(|&angle| (angle + FRAC_PI_2).abs() <= ALIGNMENT_TOLERANCE.sqrt());

    let legs = legs
        .into_iter()
        .zip(relative)
        .map(|((layer, side, _, setback, _), angle)| CornerLeg {
            layer,
            side,
            angle: if mirrored { -angle } else { angle },
            setback,
        })
        .collect();

    Ok(CornerFrame {
        main_layer,
        origin: corn.point,
        yaw,
        mirrored,
        legs,
    })
}
