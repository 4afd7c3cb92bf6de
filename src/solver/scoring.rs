//! Hole scoring shared by every solver
//!
//! Corner trims are computed rather than applied while searching: a layer is
//! evaluated at its untrimmed length with the trims of the corners at its ends
//! subtracted on the fly. Only the final assignment is written back with
//! [`WallLayer::reduce_length`](crate::structure::WallLayer::reduce_length).

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::bond::Side;
use crate::geometry::numeric::round_length;
use crate::io::configuration::LENGTH_EPSILON;
use crate::io::error::{AssignTarget, BondError, Result};
use crate::solver::snapshot::Snapshot;
use crate::structure::{CornId, Corns, GroupId, LayerId, Structure};

/// Corners linked through shared layers at one height tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Height tier of every corner in the component
    pub tier: usize,
    /// Member corners in ascending order
    pub corners: Vec<CornId>,
    /// Corner the propagation starts from
    pub start: CornId,
    /// Resolved corner directly below `start`, if any
    pub below: Option<CornId>,
    /// Index into the search choices when the start has no corner below
    pub slot: Option<usize>,
    /// Number of corner variants of the start corner
    pub variants: usize,
    /// Walls of the start corner and their course cycle length, main wall first
    ///
    /// For a free start the search picks their plan offsets together with the
    /// start variant.
    pub walls: Vec<(GroupId, usize)>,
}

/// Layer state pinned before searching
#[derive(Debug, Clone, Default)]
pub struct Frozen {
    ends: BTreeMap<(LayerId, Side), CornId>,
    spans: Vec<(f64, f64)>,
    components: Vec<Component>,
    radices: Vec<usize>,
    involved: Vec<GroupId>,
}

impl Frozen {
    /// Pin layer spans, corner ends and the component order
    ///
    /// Corner frames must already be pinned with [`Corns::freeze`].
    pub fn freeze(structure: &Structure, corns: &Corns) -> Self {
        let spans = structure
            .layers()
            .iter()
            .map(|layer| {
                let x_offset = structure
                    .group(layer.group)
                    .map_or(0.0, |group| group.x_offset(layer));
                (layer.length, x_offset)
            })
            .collect();

        let mut ends = BTreeMap::new();
        for id in corns.ids() {
            let Some(frame) = corns.get(id).and_then(|corn| corn.frame.as_ref()) else {
                continue;
            };
            for leg in &frame.legs {
                ends.insert((leg.layer, leg.side), id);
            }
        }

        let involved: BTreeSet<GroupId> = ends
            .keys()
            .filter_map(|(layer, _)| structure.layer(*layer).map(|layer| layer.group))
            .collect();

        let mut frozen = Self {
            ends,
            spans,
            components: Vec::new(),
            radices: Vec::new(),
            involved: involved.into_iter().collect(),
        };
        frozen.build_components(structure, corns);
        frozen
    }

    fn build_components(&mut self, structure: &Structure, corns: &Corns) {
        let mut visited = BTreeSet::new();
        let mut components = Vec::new();

        for id in corns.ids() {
            let framed = corns.get(id).is_some_and(|corn| corn.frame.is_some());
            if !framed || !visited.insert(id) {
                continue;
            }

            let mut members = vec![id];
            let mut queue = VecDeque::from([id]);
            while let Some(current) = queue.pop_front() {
                let Some(corn) = corns.get(current) else {
                    continue;
                };
                for &layer in &corn.layers {
                    for side in [Side::Left, Side::Right] {
                        if let Some(&next) = self.ends.get(&(layer, side)) {
                            if visited.insert(next) {
                                members.push(next);
                                queue.push_back(next);
                            }
                        }
                    }
                }
            }
            members.sort_unstable();

            let tier = corns.get(id).map_or(0, |corn| corn.tier);
            components.push((tier, members));
        }
        components.sort_by_key(|(tier, members)| (*tier, members.first().copied()));

        for (tier, corners) in components {
            let stacked = corners.iter().find_map(|&corner| {
                corns
                    .below(structure, corner)
                    .filter(|&below| corns.get(below).is_some_and(|corn| corn.frame.is_some()))
                    .map(|below| (corner, below))
            });
            let (start, below) = match (stacked, corners.first()) {
                (Some((start, below)), _) => (start, Some(below)),
                (None, Some(&first)) => (first, None),
                (None, None) => continue,
            };
            let variants = corns
                .get(start)
                .and_then(|corn| corn.main_layer)
                .and_then(|layer| structure.bond_of_layer(layer))
                .map_or(1, |bond| bond.corner_plan_repeat_step().max(1));
            let walls = start_walls(structure, corns, start);

            let slot = below.is_none().then(|| {
                let radix = walls
                    .iter()
                    .fold(variants, |total, &(_, repeat)| total.saturating_mul(repeat));
                self.radices.push(radix);
                self.radices.len() - 1
            });
            self.components.push(Component {
                tier,
                corners,
                start,
                below,
                slot,
                variants,
                walls,
            });
        }
    }

    /// Corner at one end of a layer
    pub fn corner_at(&self, layer: LayerId, side: Side) -> Option<CornId> {
        self.ends.get(&(layer, side)).copied()
    }

    /// Components in solving order: by tier, then by lowest corner index
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Number of choices for each ambiguous start
    pub fn radices(&self) -> &[usize] {
        &self.radices
    }

    /// Walls with at least one layer end at a corner
    pub fn involved(&self) -> &[GroupId] {
        &self.involved
    }

    /// Untrimmed length and origin distance of a layer
    pub fn span(&self, layer: LayerId) -> Option<(f64, f64)> {
        self.spans.get(layer.0).copied()
    }
}

/// Walls meeting at a corner in leg order, each with its bond's course cycle
fn start_walls(structure: &Structure, corns: &Corns, corner: CornId) -> Vec<(GroupId, usize)> {
    let mut walls: Vec<(GroupId, usize)> = Vec::new();
    let legs = corns
        .get(corner)
        .and_then(|corn| corn.frame.as_ref())
        .map_or(&[][..], |frame| frame.legs.as_slice());
    for leg in legs {
        let Some(group) = structure.layer(leg.layer).map(|layer| layer.group) else {
            continue;
        };
        if walls.iter().any(|&(wall, _)| wall == group) {
            continue;
        }
        let repeat = structure
            .bond_of(group)
            .map_or(1, |bond| bond.repeat_layer().max(1));
        walls.push((group, repeat));
    }
    walls
}

/// Corner influence on one end of a layer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct End {
    counted: bool,
    trim: f64,
    gap: f64,
}

/// Residual lengths of a layer under the current assignment
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayerEval {
    /// Length removed from the left end by its corner
    pub left_trim: f64,
    /// Length removed from the right end by its corner
    pub right_trim: f64,
    /// Unfilled length at the left end
    pub left_hole: f64,
    /// Unfilled length at the right end
    pub right_hole: f64,
    /// Length by which the corner inserts reach past the far end of the layer
    pub penalty: f64,
    /// The corner inserts occupy the whole layer
    pub covered: bool,
    left_counted: bool,
    right_counted: bool,
}

impl LayerEval {
    /// Holes at the ends whose corner is known, plus any penalty
    pub fn holes(&self) -> f64 {
        let mut total = 0.0;
        if self.left_counted {
            total += self.left_hole;
        }
        if self.right_counted {
            total += self.right_hole;
        }
        if self.left_counted || self.right_counted {
            total += self.penalty;
        }
        round_length(total)
    }
}

/// Mutable search state: the structure, its corners and the pinned layout
pub struct Workspace<'a> {
    /// Walls and layers being assigned
    pub structure: &'a mut Structure,
    /// Corners being assigned
    pub corns: &'a mut Corns,
    /// State pinned before searching
    pub frozen: Frozen,
}

impl<'a> Workspace<'a> {
    /// Pin corner frames and layer state
    ///
    /// # Errors
    ///
    /// Returns an error if a corner has no course containing its point
    pub fn new(structure: &'a mut Structure, corns: &'a mut Corns) -> Result<Self> {
        corns.freeze(structure)?;
        let frozen = Frozen::freeze(structure, corns);
        Ok(Self {
            structure,
            corns,
            frozen,
        })
    }

    /// Record the assignment state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::take(self.structure, self.corns)
    }

    /// Return to a recorded assignment state
    pub fn restore(&mut self, snapshot: &Snapshot) {
        snapshot.restore(self.structure, self.corns);
    }

    /// Check if a corner's offset is fixed
    pub fn corner_touched(&self, corner: CornId) -> bool {
        self.corns.get(corner).is_some_and(|corn| corn.touched)
    }

    /// Check if a wall's offset is fixed
    pub fn wall_touched(&self, group: GroupId) -> bool {
        self.structure.group(group).is_some_and(|group| group.touched)
    }

    /// Wall owning a layer
    pub fn wall_of(&self, layer: LayerId) -> Option<GroupId> {
        self.structure.layer(layer).map(|layer| layer.group)
    }

    /// Length a corner's current variant removes from a layer end
    ///
    /// Negative when the corner bricks stop short of the layer end.
    pub fn corner_trim(&self, corner: CornId, layer: LayerId) -> Option<f64> {
        let corn = self.corns.get(corner)?;
        let frame = corn.frame.as_ref()?;
        let leg = frame.leg(layer)?;
        let bond = self.structure.bond_of_layer(frame.main_layer)?;
        let reach = bond.corner_length(corn.plan_offset, leg.angle);
        Some(round_length(reach - leg.setback))
    }

    fn end(&self, layer: LayerId, side: Side, known: &impl Fn(CornId) -> bool) -> End {
        let Some(corner) = self.frozen.corner_at(layer, side) else {
            return End::default();
        };
        if !known(corner) {
            return End::default();
        }
        let trim = self.corner_trim(corner, layer).unwrap_or(0.0);
        End {
            counted: true,
            trim: trim.max(0.0),
            gap: (-trim).max(0.0),
        }
    }

    /// Evaluate a layer with the corners accepted by `known` trimming its ends
    pub fn evaluate_layer(
        &self,
        layer_id: LayerId,
        known: &impl Fn(CornId) -> bool,
    ) -> Option<LayerEval> {
        let layer = self.structure.layer(layer_id)?;
        let group = self.structure.group(layer.group)?;
        let bond = self.structure.bond_of(layer.group)?;
        let (length, x_offset) = self.frozen.span(layer_id)?;

        let left = self.end(layer_id, Side::Left, known);
        let right = self.end(layer_id, Side::Right, known);
        let remaining = round_length(length - left.trim - right.trim);

        let mut eval = LayerEval {
            left_trim: left.trim,
            right_trim: right.trim,
            left_counted: left.counted,
            right_counted: right.counted,
            ..LayerEval::default()
        };

        if remaining <= LENGTH_EPSILON {
            eval.covered = true;
            eval.penalty = round_length((-remaining).max(0.0));
            eval.left_hole = left.gap;
            eval.right_hole = right.gap;
            return Some(eval);
        }

        let origin_trim = if group.reversed { right.trim } else { left.trim };
        let fit = bond.bricks_in_layer(
            group.plan_course(layer),
            remaining,
            x_offset + origin_trim,
            group.reversed,
        );
        eval.left_hole = round_length(fit.left + left.gap);
        eval.right_hole = round_length(fit.right + right.gap);
        Some(eval)
    }

    /// Holes at the ends of a layer joined to `corner` or to a fixed corner
    pub fn holes_between_corner_and_layer(&self, corner: CornId, layer: LayerId) -> f64 {
        let known = |id: CornId| id == corner || self.corner_touched(id);
        self.evaluate_layer(layer, &known)
            .map_or(0.0, |eval| eval.holes())
    }

    /// Holes a corner leaves on its layers belonging to fixed walls
    pub fn corner_holes(&self, corner: CornId) -> f64 {
        let Some(corn) = self.corns.get(corner) else {
            return 0.0;
        };
        let total: f64 = corn
            .layers
            .iter()
            .filter(|&&layer| self.wall_of(layer).is_some_and(|g| self.wall_touched(g)))
            .map(|&layer| self.holes_between_corner_and_layer(corner, layer))
            .sum();
        round_length(total)
    }

    /// Total hole length at corner-connected layer ends
    ///
    /// With `focus` only the layers of that wall are summed.
    pub fn score(&self, focus: Option<GroupId>) -> f64 {
        let known = |_: CornId| true;
        let total: f64 = self
            .frozen
            .involved()
            .iter()
            .filter(|&&group| focus.is_none_or(|focus| focus == group))
            .filter_map(|&group| self.structure.group(group))
            .flat_map(|group| group.layers.iter())
            .filter_map(|&layer| self.evaluate_layer(layer, &known))
            .map(|eval| eval.holes())
            .sum();
        round_length(total)
    }

    /// Choose the plan offset of an unfixed wall that best suits a corner
    ///
    /// Every offset in the bond's vertical cycle is tried; the first minimum
    /// wins and is fixed.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall was already fixed
    pub fn fit_layer_to_corner(&mut self, corner: CornId, layer: LayerId) -> Result<usize> {
        let Some(group_id) = self.wall_of(layer) else {
            return Ok(0);
        };
        if self.wall_touched(group_id) {
            return Err(BondError::DoubleAssignment {
                target: AssignTarget::Wall(group_id),
            });
        }
        let repeat = self
            .structure
            .bond_of(group_id)
            .map_or(1, |bond| bond.repeat_layer().max(1));

        let mut best = (f64::INFINITY, 0);
        for offset in 0..repeat {
            if let Some(group) = self.structure.group_mut(group_id) {
                group.plan_offset = offset;
            }
            let holes = self.holes_between_corner_and_layer(corner, layer);
            if holes < best.0 - LENGTH_EPSILON {
                best = (holes, offset);
            }
        }

        if let Some(group) = self.structure.group_mut(group_id) {
            group.set_plan_offset(best.1)?;
        }
        Ok(best.1)
    }

    /// Choose the variant of an unfixed corner that best suits its fixed walls
    ///
    /// # Errors
    ///
    /// Returns an error if the corner was already fixed
    pub fn fit_corner_to_layer(&mut self, corner: CornId) -> Result<usize> {
        if self.corner_touched(corner) {
            return Err(BondError::DoubleAssignment {
                target: AssignTarget::Corner(corner),
            });
        }
        let step = self
            .corns
            .get(corner)
            .and_then(|corn| corn.main_layer)
            .and_then(|layer| self.structure.bond_of_layer(layer))
            .map_or(1, |bond| bond.corner_plan_repeat_step().max(1));

        let mut best = (f64::INFINITY, 0);
        for offset in 0..step {
            if let Some(corn) = self.corns.get_mut(corner) {
                corn.plan_offset = offset;
            }
            let holes = self.corner_holes(corner);
            if holes < best.0 - LENGTH_EPSILON {
                best = (holes, offset);
            }
        }

        if let Some(corn) = self.corns.get_mut(corner) {
            corn.set_plan_offset(corner, best.1)?;
        }
        Ok(best.1)
    }

    /// Fit every unfixed corner in solving order
    ///
    /// # Errors
    ///
    /// Returns an error if a corner is assigned twice
    pub fn fit_remaining_corners(&mut self) -> Result<()> {
        let order: Vec<CornId> = self
            .frozen
            .components()
            .iter()
            .flat_map(|component| component.corners.iter().copied())
            .collect();
        for corner in order {
            if !self.corner_touched(corner) {
                self.fit_corner_to_layer(corner)?;
            }
        }
        Ok(())
    }

    /// Shorten every layer by the trims of its corners
    ///
    /// Layers the corner inserts swallow are marked covered instead and keep
    /// their length.
    ///
    /// # Errors
    ///
    /// Returns an error if a reduction is rejected by the layer
    pub fn apply_trims(&mut self) -> Result<()> {
        let known = |_: CornId| true;
        let layers: Vec<LayerId> = self.structure.layers().iter().map(|l| l.id).collect();
        for id in layers {
            let connected = [Side::Left, Side::Right]
                .into_iter()
                .any(|side| self.frozen.corner_at(id, side).is_some());
            if !connected {
                continue;
            }
            let Some(eval) = self.evaluate_layer(id, &known) else {
                continue;
            };
            let Some(layer) = self.structure.layer_mut(id) else {
                continue;
            };
            if eval.covered {
                layer.cover();
            } else {
                layer.reduce_length(eval.left_trim, Side::Left)?;
                layer.reduce_length(eval.right_trim, Side::Right)?;
            }
        }
        Ok(())
    }
}
