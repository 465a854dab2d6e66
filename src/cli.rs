use std::path::PathBuf;

use clap::Parser;

/// Command-line front end for the directory registry.
#[derive(Parser, Debug)]
#[command(
    name = "autodirs",
    version,
    about = "Ensure directories exist under a base location"
)]
pub struct Cli {
    /// Change to this directory before doing anything else.
    #[arg(short = 'C', long = "chdir")]
    pub chdir: Option<PathBuf>,
    /// Config file listing `base_dir` and `dirs` (defaults to ./autodirs.toml).
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,
    /// Base directory: an existing path, a file (its parent is used), `~`, `HOME` or `ROOT`.
    #[arg(short = 'b', long = "base-dir")]
    pub base_dir: Option<String>,
    /// Print the resolved directories as JSON.
    #[arg(long = "json")]
    pub json: bool,
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
    /// Directories to ensure, relative to the base directory or absolute.
    pub dirs: Vec<String>,
}

pub fn parse() -> Cli {
    Cli::parse()
}
