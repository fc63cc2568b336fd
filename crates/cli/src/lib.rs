mod matching;
mod resolve;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use resolve::ResolveArgs;

#[derive(Parser)]
#[command(
    name = "rescope",
    version,
    about = "Resolve location patterns to concrete resources",
    long_about = "Rescope expands location patterns such as `classpath*:conf/**/*.yml` or \
                  `file:/srv/data/*.csv` into the set of files and archive entries they match, \
                  searching directories, zip/jar archives and ordered search roots."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a location pattern and list the matching resources
    #[command(
        long_about = "Resolves PATTERN against the base directory and the configured search roots. \
                            Each matching resource is printed once, in discovery order."
    )]
    Resolve(ResolveArgs),
    /// Test whether a path matches a glob pattern
    #[command(
        long_about = "Prints `true` and exits with status 0 when PATH matches GLOB, \
                            otherwise prints `false` and exits with status 1."
    )]
    Match {
        /// Slash-separated path to test
        #[arg(value_name = "PATH")]
        path: String,
        /// Glob pattern (`*`, `?`, `**`, `[a-z]`, `{a,b}`)
        #[arg(value_name = "GLOB")]
        glob: String,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let _guard = rescope_runtime::init_logging("cli", false);

    match cli.command {
        Commands::Resolve(args) => resolve::run(args),
        Commands::Match { path, glob } => {
            let matched = matching::run(&path, &glob)?;
            if !matched {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

pub(crate) fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
