//! CLI Module
//!
//! Dry-run tooling: shows which engine calls a sequence of deltas produces.

pub mod commands;

use clap::{Parser, Subcommand};

/// effect-sync - plan engine calls for declarative effect state
#[derive(Parser, Debug)]
#[command(name = "effect-sync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply deltas in order and print the engine calls each one issues
    #[command(name = "plan")]
    Plan {
        /// JSON deltas, e.g. '{"blur": 5}', or @path to a JSON file
        #[arg(required = true)]
        deltas: Vec<String>,
    },

    /// Fold deltas into state, then print what a freshly bound engine receives
    #[command(name = "replay")]
    Replay {
        /// JSON deltas, or @path to a JSON file
        deltas: Vec<String>,
    },

    /// Print the default effect state
    #[command(name = "defaults")]
    Defaults,
}
