// Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "crease")]
#[command(about = "Build and check fantasy cricket teams against the composition rules")]
#[command(version)]
pub struct Cli {
    /// Directory holding rules.toml (defaults: ./config, then the user config dir)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Re-open a saved team and report whether it can be saved as is
    Check {
        /// Match player pool (.json or .csv)
        #[arg(long)]
        pool: PathBuf,

        /// Saved team payload (JSON with players, captainId, viceCaptainId)
        #[arg(long)]
        team: PathBuf,
    },

    /// Apply picks in order and print the save payload if the team is complete
    Build {
        #[arg(long)]
        pool: PathBuf,

        /// Player id to add; repeat in selection order
        #[arg(long = "pick")]
        picks: Vec<String>,

        #[arg(long)]
        captain: Option<String>,

        #[arg(long)]
        vice_captain: Option<String>,
    },

    /// List the players that can still be added to a partial team
    Options {
        #[arg(long)]
        pool: PathBuf,

        #[arg(long = "pick")]
        picks: Vec<String>,
    },
}
