//! Command-line interface for batch processing wall description files

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, ValueEnum};

use crate::io::configuration::{
    DEFAULT_MAX_TRIALS, FILE_EXTENSION, MAX_BRUTE_FORCE_WALLS, OUTPUT_SUFFIX,
};
use crate::io::error::{Result, file_error, invalid_parameter};
use crate::io::export::BrickExport;
use crate::io::input::load_walls;
use crate::io::progress::{ProgressManager, Stage};
use crate::placement::{BrickPlacer, PlacerConfig, find_neighbors};
use crate::solver::{SolveReport, SolverConfig, SolverKind, solve};
use crate::structure::{Corns, Structure, WallSpec};

/// Solver selection on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SolverChoice {
    /// Corner propagation with search over ambiguous starts
    #[default]
    Corner,
    /// All binary wall offsets
    BruteForce,
    /// Breadth-first walk over walls
    Graph,
}

impl From<SolverChoice> for SolverKind {
    fn from(choice: SolverChoice) -> Self {
        match choice {
            SolverChoice::Corner => Self::Corner,
            SolverChoice::BruteForce => Self::BruteForce,
            SolverChoice::Graph => Self::Graph,
        }
    }
}

#[derive(Parser)]
#[command(name = "brickbond")]
#[command(
    author,
    version,
    about = "Lay out bricks for walls meeting at corners in a chosen bond"
)]
/// Command-line arguments for the brick layout tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input JSON wall description or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Strategy for assigning plan offsets
    #[arg(short, long, value_enum, default_value_t = SolverChoice::Corner)]
    pub solver: SolverChoice,

    /// Maximum number of search trials
    #[arg(short = 't', long, default_value_t = DEFAULT_MAX_TRIALS)]
    pub max_trials: usize,

    /// Leave residual lengths empty instead of emitting filler bricks
    #[arg(long)]
    pub no_fill: bool,

    /// Skip the neighbor adjacency pass
    #[arg(long)]
    pub no_neighbors: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Layout options selected by the flags
    pub fn options(&self) -> LayoutOptions {
        LayoutOptions {
            solver: self.solver.into(),
            solver_config: SolverConfig {
                max_trials: self.max_trials,
                max_brute_force_walls: MAX_BRUTE_FORCE_WALLS,
            },
            placer: PlacerConfig {
                fill: !self.no_fill,
            },
            neighbors: !self.no_neighbors,
        }
    }
}

/// Options for one layout run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Solving strategy
    pub solver: SolverKind,
    /// Search limits
    pub solver_config: SolverConfig,
    /// Placement options
    pub placer: PlacerConfig,
    /// Compute neighbor lists
    pub neighbors: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            solver: SolverKind::default(),
            solver_config: SolverConfig::default(),
            placer: PlacerConfig::default(),
            neighbors: true,
        }
    }
}

/// Run detection, solving and placement on wall specifications
///
/// `on_stage` is called as each stage starts.
///
/// # Errors
///
/// Returns an error if a wall is invalid or solving fails
pub fn layout_walls(
    walls: Vec<WallSpec>,
    options: &LayoutOptions,
    mut on_stage: impl FnMut(Stage),
) -> Result<(SolveReport, BrickExport)> {
    let mut structure = Structure::from_walls(walls)?;

    on_stage(Stage::Detect);
    let mut corns = Corns::detect(&mut structure);

    on_stage(Stage::Solve);
    let report = solve(
        &mut structure,
        &mut corns,
        options.solver,
        &options.solver_config,
    )?;

    on_stage(Stage::Place);
    let placements = BrickPlacer::new(options.placer).place(&structure, &corns);
    let neighbors = options.neighbors.then(|| find_neighbors(&placements));

    Ok((
        report,
        BrickExport::new(report.score, &placements, neighbors.as_deref()),
    ))
}

/// Orchestrates batch processing of wall description files with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if target validation or file processing fails
    pub fn process(&mut self) -> Result<()> {
        self.cli.options().solver_config.validate()?;
        let files = self.collect_files()?;

        if files.is_empty() {
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for (index, file) in files.iter().enumerate() {
            self.process_file(file, index)?;
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let target = &self.cli.target;
        if target.is_file() {
            if Self::is_description(target) {
                if self.should_process_file(target) {
                    Ok(vec![target.clone()])
                } else {
                    Ok(vec![])
                }
            } else {
                Err(invalid_parameter(
                    "target",
                    &target.display(),
                    &"target file must be a JSON wall description",
                ))
            }
        } else if target.is_dir() {
            let mut files = Vec::new();
            let entries =
                std::fs::read_dir(target).map_err(|e| file_error(target, "list directory", e))?;
            for entry in entries {
                let path = entry.map_err(|e| file_error(target, "list directory", e))?.path();
                if Self::is_description(&path) && self.should_process_file(&path) {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(invalid_parameter(
                "target",
                &target.display(),
                &"target must be a JSON file or directory",
            ))
        }
    }

    /// JSON files that are not themselves brick exports
    fn is_description(path: &Path) -> bool {
        let is_json = path.extension().and_then(|s| s.to_str()) == Some(FILE_EXTENSION);
        let is_output = path
            .file_stem()
            .and_then(|s| s.to_str())
            .is_some_and(|stem| stem.ends_with(OUTPUT_SUFFIX));
        is_json && !is_output
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = Self::get_output_path(input_path);
        if output_path.exists() {
            // Allow print for user feedback for progress messages
            #[allow(clippy::print_stderr)]
            if !self.cli.quiet {
                eprintln!("Skipping: {} (output exists)", input_path.display());
            }
            false
        } else {
            true
        }
    }

    fn process_file(&mut self, input_path: &Path, index: usize) -> Result<()> {
        let start_time = Instant::now();
        let output_path = Self::get_output_path(input_path);
        let options = self.cli.options();

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_file(index, input_path);
        }

        let walls = load_walls(input_path)?;
        let (report, export) = layout_walls(walls, &options, |stage| {
            if let Some(ref mut pm) = self.progress_manager {
                pm.update_stage(index, stage);
            }
        })?;

        if let Some(ref mut pm) = self.progress_manager {
            pm.update_stage(index, Stage::Export);
        }
        export.save(&output_path)?;

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index, report.score, start_time.elapsed());
        }

        Ok(())
    }

    /// Output path `<stem>_bricks.json` next to the input
    pub fn get_output_path(input_path: &Path) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let output_name = format!(
            "{}{}.{}",
            stem.to_string_lossy(),
            OUTPUT_SUFFIX,
            FILE_EXTENSION
        );

        if let Some(parent) = input_path.parent() {
            parent.join(output_name)
        } else {
            PathBuf::from(output_name)
        }
    }
}
