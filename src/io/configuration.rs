//! Layout constants and runtime configuration defaults

// Numeric policy shared by the bond engine and geometric predicates
/// Decimal places kept after every derived length computation
pub const ROUNDING_DECIMALS: i32 = 6;
/// Absolute tolerance for length comparisons
pub const LENGTH_EPSILON: f64 = 1e-6;

/// Maximum distance between two points considered the same corner
pub const CORNER_COINCIDENCE_TOLERANCE: f64 = 1e-4;

/// Maximum deviation of a dot product from 0 or 1 for axis alignment tests
pub const ALIGNMENT_TOLERANCE: f64 = 1e-6;

// Search budget for the corner solver
/// Default maximum number of full search trials
pub const DEFAULT_MAX_TRIALS: usize = 4096;

// 2^16 assignments is the largest exhaustive enumeration considered practical
/// Maximum number of walls the brute force solver enumerates
pub const MAX_BRUTE_FORCE_WALLS: usize = 16;

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 30;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_bricks";
/// Extension of wall description and brick export files
pub const FILE_EXTENSION: &str = "json";
