//! Plan offset assignment for walls and corners
//!
//! This module contains:
//! - Hole scoring and the fitting steps shared by every solver
//! - Snapshot and restore of assignment state between trials
//! - The corner search, brute force and wall graph solvers

/// Exhaustive binary wall offsets
pub mod brute_force;
/// Corner propagation with search over ambiguous starts
pub mod corner_search;
/// Breadth-first walk over the wall adjacency graph
pub mod graph;
/// Hole scoring, corner trims and fitting steps
pub mod scoring;
/// Assignment state capture between trials
pub mod snapshot;

use std::fmt;

use crate::io::configuration::{DEFAULT_MAX_TRIALS, LENGTH_EPSILON, MAX_BRUTE_FORCE_WALLS};
use crate::io::error::{Result, invalid_parameter};
use crate::structure::{Corns, Structure};

pub use scoring::{Component, Frozen, LayerEval, Workspace};
pub use snapshot::Snapshot;

/// Available solving strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SolverKind {
    /// Corner propagation with search over ambiguous starts
    #[default]
    Corner,
    /// All binary wall offsets
    BruteForce,
    /// Breadth-first walk over walls
    Graph,
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Corner => "corner",
            Self::BruteForce => "brute-force",
            Self::Graph => "graph",
        };
        f.write_str(name)
    }
}

/// Search limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    /// Maximum number of full trials
    pub max_trials: usize,
    /// Maximum number of walls the brute force solver accepts
    pub max_brute_force_walls: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_trials: DEFAULT_MAX_TRIALS,
            max_brute_force_walls: MAX_BRUTE_FORCE_WALLS,
        }
    }
}

impl SolverConfig {
    /// Check the limits
    ///
    /// # Errors
    ///
    /// Returns an error if the trial budget is zero
    pub fn validate(&self) -> Result<()> {
        if self.max_trials == 0 {
            return Err(invalid_parameter(
                "max_trials",
                &self.max_trials,
                &"at least one trial is required",
            ));
        }
        Ok(())
    }
}

/// Outcome of a solver run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveReport {
    /// Total hole length left at connected layer ends
    pub score: f64,
    /// Number of full assignments evaluated
    pub trials: usize,
    /// Number of free choices the search ranged over
    pub ambiguous: usize,
    /// The trial budget ran out before every combination was tried
    pub exhausted: bool,
    /// Strategy that produced the assignment
    pub solver: SolverKind,
}

impl SolveReport {
    /// Check if every connected layer end closes without a hole
    pub const fn is_perfect(&self) -> bool {
        self.score <= LENGTH_EPSILON
    }
}

/// Assign plan offsets to every wall and corner, then trim the layers
///
/// Previous trims and assignments are discarded first, so solving the same
/// structure twice gives the same result. Walls without corners keep offset 0.
///
/// # Errors
///
/// Returns an error if:
/// - The configuration is invalid
/// - A corner has no course containing its point
/// - The brute force solver is given too many walls
pub fn solve(
    structure: &mut Structure,
    corns: &mut Corns,
    kind: SolverKind,
    config: &SolverConfig,
) -> Result<SolveReport> {
    config.validate()?;
    structure.restore_trims();
    structure.reset_assignments();
    corns.reset_assignments();

    let mut workspace = Workspace::new(structure, corns)?;
    let report = match kind {
        SolverKind::Corner => corner_search::solve(&mut workspace, config)?,
        SolverKind::BruteForce => brute_force::solve(&mut workspace, config)?,
        SolverKind::Graph => graph::solve(&mut workspace, config)?,
    };
    workspace.apply_trims()?;
    Ok(report)
}
