//! Corner-driven propagation with an outer search over ambiguous starts
//!
//! Each component of the corner graph is solved from one start corner. When
//! the corner directly below the start is already fixed the start variant
//! follows from it; otherwise the variant and the plan offsets of the walls
//! meeting there are a free choice. A deterministic pass takes the first
//! choice everywhere, and if holes remain every combination of choices is
//! tried.

use std::collections::VecDeque;

use crate::io::configuration::LENGTH_EPSILON;
use crate::io::error::Result;
use crate::solver::scoring::{Component, Workspace};
use crate::solver::{SolveReport, SolverConfig, SolverKind};
use crate::structure::CornId;

/// Fix the start corner of a component and propagate from it
fn solve_component(
    workspace: &mut Workspace<'_>,
    component: &Component,
    choices: &[usize],
) -> Result<()> {
    if workspace.corner_touched(component.start) {
        return propagate(workspace, component.start);
    }

    let (offset, rest) = match (component.below, component.slot) {
        (Some(below), _) => {
            let offset = workspace
                .corns
                .get(below)
                .map_or(0, |corn| corn.plan_offset + 1);
            (offset % component.variants.max(1), None)
        }
        (None, Some(slot)) => {
            let choice = choices.get(slot).copied().unwrap_or(0);
            let variants = component.variants.max(1);
            (choice % variants, Some(choice / variants))
        }
        (None, None) => (0, None),
    };
    if let Some(corn) = workspace.corns.get_mut(component.start) {
        corn.set_plan_offset(component.start, offset)?;
    }

    // A free start also picks the courses of its own walls
    if let Some(mut rest) = rest {
        for &(wall, repeat) in &component.walls {
            let repeat = repeat.max(1);
            let wall_offset = rest % repeat;
            rest /= repeat;
            if workspace.wall_touched(wall) {
                continue;
            }
            if let Some(group) = workspace.structure.group_mut(wall) {
                group.set_plan_offset(wall_offset)?;
            }
        }
    }
    propagate(workspace, component.start)
}

/// Breadth-first fitting of walls and corners reachable from a fixed corner
///
/// Unfixed walls of a corner's layers are fit to that corner; unfixed corners
/// at the far end of those layers are then fit to their fixed walls and
/// queued.
fn propagate(workspace: &mut Workspace<'_>, start: CornId) -> Result<()> {
    let mut queue = VecDeque::from([start]);
    while let Some(corner) = queue.pop_front() {
        let legs: Vec<_> = workspace
            .corns
            .get(corner)
            .and_then(|corn| corn.frame.as_ref())
            .map(|frame| frame.legs.iter().map(|leg| (leg.layer, leg.side)).collect())
            .unwrap_or_default();

        for (layer, side) in legs {
            let wall_fixed = workspace
                .wall_of(layer)
                .is_some_and(|group| workspace.wall_touched(group));
            if !wall_fixed {
                workspace.fit_layer_to_corner(corner, layer)?;
            }

            let Some(next) = workspace.frozen.corner_at(layer, side.opposite()) else {
                continue;
            };
            if !workspace.corner_touched(next) {
                workspace.fit_corner_to_layer(next)?;
                queue.push_back(next);
            }
        }
    }
    Ok(())
}

/// Solve every component in order for one combination of start choices
fn run(workspace: &mut Workspace<'_>, choices: &[usize]) -> Result<f64> {
    let components = workspace.frozen.components().to_vec();
    for component in &components {
        solve_component(workspace, component, choices)?;
    }
    Ok(workspace.score(None))
}

/// Decode a combination index into one choice per ambiguous start
fn decode(mut index: usize, radices: &[usize]) -> Vec<usize> {
    radices
        .iter()
        .map(|&radix| {
            let radix = radix.max(1);
            let digit = index % radix;
            index /= radix;
            digit
        })
        .collect()
}

/// Number of start combinations, saturating on overflow
fn combinations(radices: &[usize]) -> usize {
    radices
        .iter()
        .try_fold(1usize, |total, &radix| total.checked_mul(radix.max(1)))
        .unwrap_or(usize::MAX)
}

/// Run the corner search and leave the best assignment on the workspace
///
/// # Errors
///
/// Returns an error if an offset is assigned twice within a trial
pub fn solve(workspace: &mut Workspace<'_>, config: &SolverConfig) -> Result<SolveReport> {
    let radices = workspace.frozen.radices().to_vec();
    let baseline = workspace.snapshot();

    let mut best_choices = vec![0; radices.len()];
    let mut best_score = run(workspace, &best_choices)?;
    let mut trials = 1;
    let mut exhausted = false;

    if best_score > LENGTH_EPSILON && !radices.is_empty() {
        // Later combinations win ties
        for index in (0..combinations(&radices)).rev() {
            if trials >= config.max_trials {
                exhausted = true;
                break;
            }
            let choices = decode(index, &radices);
            workspace.restore(&baseline);
            let score = run(workspace, &choices)?;
            trials += 1;

            if score <= best_score {
                best_score = score;
                best_choices = choices;
            }
            if best_score <= LENGTH_EPSILON {
                break;
            }
        }
    }

    workspace.restore(&baseline);
    let score = run(workspace, &best_choices)?;

    Ok(SolveReport {
        score,
        trials,
        ambiguous: radices.len(),
        exhausted,
        solver: SolverKind::Corner,
    })
}
