//! Breadth-first walk over the wall adjacency graph
//!
//! Walls are nodes and every pair of walls sharing a corner is an edge. The
//! first wall of each connected set keeps offset 0; every wall reached from
//! it tries each offset with the shared corners fit greedily, and the first
//! offset leaving the fewest holes at those corners is kept. Once the trial
//! budget is spent, remaining walls take the first offset untried.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::io::configuration::LENGTH_EPSILON;
use crate::io::error::Result;
use crate::solver::scoring::Workspace;
use crate::solver::{SolveReport, SolverConfig, SolverKind};
use crate::structure::{CornId, GroupId};

/// Wall adjacency with the corners carried by each edge
type Adjacency = BTreeMap<GroupId, BTreeMap<GroupId, Vec<CornId>>>;

fn adjacency(workspace: &Workspace<'_>) -> Adjacency {
    let mut graph: Adjacency = BTreeMap::new();
    for ((a, b), corners) in workspace.corns.by_wall_pair(workspace.structure) {
        let corners: Vec<CornId> = corners
            .into_iter()
            .filter(|&corner| {
                workspace
                    .corns
                    .get(corner)
                    .is_some_and(|corn| corn.frame.is_some())
            })
            .collect();
        if corners.is_empty() {
            continue;
        }
        graph
            .entry(a)
            .or_default()
            .insert(b, corners.clone());
        graph.entry(b).or_default().insert(a, corners);
    }
    graph
}

/// Fix a wall offset, then fit the corners it shares with fixed walls
fn place_wall(
    workspace: &mut Workspace<'_>,
    graph: &Adjacency,
    wall: GroupId,
    offset: usize,
) -> Result<f64> {
    if let Some(group) = workspace.structure.group_mut(wall) {
        group.set_plan_offset(offset)?;
    }

    let shared: BTreeSet<CornId> = graph
        .get(&wall)
        .into_iter()
        .flat_map(BTreeMap::iter)
        .filter(|&(&neighbor, _)| workspace.wall_touched(neighbor))
        .flat_map(|(_, corners)| corners.iter().copied())
        .collect();

    let mut holes = 0.0;
    for corner in shared {
        if !workspace.corner_touched(corner) {
            workspace.fit_corner_to_layer(corner)?;
        }
        holes += workspace.corner_holes(corner);
    }
    Ok(holes)
}

/// Walk every connected set of walls and fix offsets along the way
///
/// # Errors
///
/// Returns an error if an offset is assigned twice
pub fn solve(workspace: &mut Workspace<'_>, config: &SolverConfig) -> Result<SolveReport> {
    let graph = adjacency(workspace);
    let mut trials = 0;
    let mut exhausted = false;

    let walls: Vec<GroupId> = graph.keys().copied().collect();
    for root in walls {
        if workspace.wall_touched(root) {
            continue;
        }
        place_wall(workspace, &graph, root, 0)?;

        let mut queue = VecDeque::from([root]);
        while let Some(wall) = queue.pop_front() {
            let neighbors: Vec<GroupId> = graph
                .get(&wall)
                .map(|edges| edges.keys().copied().collect())
                .unwrap_or_default();

            for neighbor in neighbors {
                if workspace.wall_touched(neighbor) {
                    continue;
                }
                let repeat = workspace
                    .structure
                    .bond_of(neighbor)
                    .map_or(1, |bond| bond.repeat_layer().max(1));

                let mut best = (f64::INFINITY, 0);
                for offset in 0..repeat {
                    if trials >= config.max_trials {
                        exhausted = true;
                        break;
                    }
                    let before = workspace.snapshot();
                    let holes = place_wall(workspace, &graph, neighbor, offset)?;
                    workspace.restore(&before);
                    trials += 1;

                    if holes < best.0 - LENGTH_EPSILON {
                        best = (holes, offset);
                    }
                }

                place_wall(workspace, &graph, neighbor, best.1)?;
                queue.push_back(neighbor);
            }
        }
    }

    workspace.fit_remaining_corners()?;

    Ok(SolveReport {
        score: workspace.score(None),
        trials,
        ambiguous: 0,
        exhausted,
        solver: SolverKind::Graph,
    })
}
