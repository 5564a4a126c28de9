//! Command-line argument definitions for the Ontoscope CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Besides input/output and logging, the arguments script a
//! short navigation session: classes to enter, levels to climb back out and
//! entities to select or hover before the scene is printed.

use clap::Parser;

/// Command-line arguments for the Ontoscope scene inspector
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the store snapshot (TOML)
    #[arg(help = "Path to the store snapshot")]
    pub input: String,

    /// Write the scene listing to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Class to drill into; repeat to go deeper
    #[arg(short, long = "enter", value_name = "ID")]
    pub enter: Vec<String>,

    /// Number of levels to climb back out after entering
    #[arg(long, default_value_t = 0)]
    pub exit: usize,

    /// Entity to select, as KIND:ID (kind is class, relationship or interface)
    #[arg(short, long = "select", value_name = "KIND:ID")]
    pub select: Vec<String>,

    /// Entity to hover, as KIND:ID
    #[arg(long, value_name = "KIND:ID")]
    pub hover: Option<String>,

    /// Seed for interface port placement
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
