//! Exhaustive binary offsets over the walls meeting at corners
//!
//! Every wall involved in a corner gets plan offset 0 or 1, all `2^k`
//! assignments are tried, and corners are fit greedily to each assignment.

use bitvec::prelude::*;

use crate::io::configuration::LENGTH_EPSILON;
use crate::io::error::{Result, invalid_parameter};
use crate::solver::scoring::Workspace;
use crate::solver::{SolveReport, SolverConfig, SolverKind};
use crate::structure::GroupId;

/// Apply one wall assignment and fit every corner to it
fn run(workspace: &mut Workspace<'_>, walls: &[GroupId], mask: usize) -> Result<f64> {
    let bits = mask.view_bits::<Lsb0>();
    for (&wall, bit) in walls.iter().zip(bits.iter().by_vals()) {
        if let Some(group) = workspace.structure.group_mut(wall) {
            group.set_plan_offset(usize::from(bit))?;
        }
    }
    workspace.fit_remaining_corners()?;
    Ok(workspace.score(None))
}

/// Try every binary wall assignment and keep the first with the fewest holes
///
/// # Errors
///
/// Returns an error if more walls are involved than the configured limit, or
/// if an offset is assigned twice
pub fn solve(workspace: &mut Workspace<'_>, config: &SolverConfig) -> Result<SolveReport> {
    let walls = workspace.frozen.involved().to_vec();
    let limit = config.max_brute_force_walls.min(usize::BITS as usize - 1);
    if walls.len() > limit {
        return Err(invalid_parameter(
            "walls",
            &walls.len(),
            &format!("brute force enumerates at most {limit} walls"),
        ));
    }

    let baseline = workspace.snapshot();
    let mut best = (f64::INFINITY, 0);
    let mut trials = 0;
    let mut exhausted = false;

    for mask in 0..(1usize << walls.len()) {
        if trials >= config.max_trials {
            exhausted = true;
            break;
        }
        workspace.restore(&baseline);
        let score = run(workspace, &walls, mask)?;
        trials += 1;

        if score < best.0 - LENGTH_EPSILON {
            best = (score, mask);
        }
        if best.0 <= LENGTH_EPSILON {
            break;
        }
    }

    workspace.restore(&baseline);
    let score = run(workspace, &walls, best.1)?;

    Ok(SolveReport {
        score,
        trials,
        ambiguous: walls.len(),
        exhausted,
        solver: SolverKind::BruteForce,
    })
}
