//! Input/output operations and error handling
//!
//! This module contains:
//! - The command-line interface and batch file processing
//! - Layout constants and defaults
//! - Error types shared across the crate
//! - JSON wall descriptions and brick exports
//! - Progress display

/// Command-line interface and batch processing
pub mod cli;
/// Layout constants and defaults
pub mod configuration;
/// Error types and constructors
pub mod error;
/// Brick placement export
pub mod export;
/// Wall description input
pub mod input;
/// Progress display through pipeline stages
pub mod progress;
