//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Tree Stager - Stage build artifacts into install and package trees
#[derive(Parser, Debug)]
#[command(name = "stage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging and per-operation trace lines
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Glob filters shared by the tree commands
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterArgs {
    /// Only keep paths matching at least one of these globs
    #[arg(short, long = "include", value_name = "GLOB")]
    pub includes: Vec<String>,

    /// Drop paths matching any of these globs
    #[arg(short, long = "exclude", value_name = "GLOB")]
    pub excludes: Vec<String>,

    /// Always keep paths matching these globs, overriding the other filters
    #[arg(long = "force-include", value_name = "GLOB")]
    pub force_includes: Vec<String>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Materialize one or more source trees into a destination
    ///
    /// Later sources win where relative paths collide.
    ///
    /// Examples:
    ///   stage copy build/dist/rocm --dest out/core
    ///   stage copy base overlay --dest out -e '**/cmake/**'
    ///   stage copy dist --dest out --always-copy --prefix rocm/
    Copy {
        /// Source trees, scanned in order
        #[arg(required = true)]
        sources: Vec<PathBuf>,

        /// Destination directory
        #[arg(short, long, env = "STAGE_DEST")]
        dest: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// String prepended to every destination-relative path
        #[arg(long, default_value = "")]
        prefix: String,

        /// Copy file contents instead of hardlinking to the sources
        #[arg(long)]
        always_copy: bool,

        /// Do not wipe the destination first; replace entries in place
        #[arg(long)]
        keep_dest: bool,
    },

    /// Print the relative paths a copy would place
    List {
        /// Source trees, scanned in order
        #[arg(required = true)]
        sources: Vec<PathBuf>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Run a staging config file (.toml, .json, .yaml)
    Run {
        /// Path to the config file
        config: PathBuf,
    },

    /// Filter artifact names with regular expressions
    Filter {
        /// Names to filter
        names: Vec<String>,

        /// Keep names matching at least one of these expressions
        #[arg(short, long = "include", value_name = "REGEX")]
        includes: Vec<String>,

        /// Drop names matching any of these expressions
        #[arg(short, long = "exclude", value_name = "REGEX")]
        excludes: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_copy_with_filters() {
        let cli = Cli::try_parse_from([
            "stage", "copy", "a", "b", "--dest", "out", "-i", "lib/**", "-e", "**/cmake/**",
            "--force-include", "lib/cmake/keep", "--always-copy",
        ])
        .unwrap();

        match cli.command {
            Commands::Copy {
                sources,
                dest,
                filters,
                prefix,
                always_copy,
                keep_dest,
            } => {
                assert_eq!(sources, vec![PathBuf::from("a"), PathBuf::from("b")]);
                assert_eq!(dest, PathBuf::from("out"));
                assert_eq!(filters.includes, vec!["lib/**"]);
                assert_eq!(filters.excludes, vec!["**/cmake/**"]);
                assert_eq!(filters.force_includes, vec!["lib/cmake/keep"]);
                assert_eq!(prefix, "");
                assert!(always_copy);
                assert!(!keep_dest);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn copy_requires_a_source() {
        assert!(Cli::try_parse_from(["stage", "copy", "--dest", "out"]).is_err());
    }
}
