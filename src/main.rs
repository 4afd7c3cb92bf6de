//! CLI entry point for the brick bond layout tool

use brickbond::io::cli::{Cli, FileProcessor};
use clap::Parser;

fn main() -> brickbond::Result<()> {
    let cli = Cli::parse();
    let mut processor = FileProcessor::new(cli);
    processor.process()
}
