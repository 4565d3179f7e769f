//! Command-line argument parsing

use crate::models::{OutputFormat, PartialSettings};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// luapack - package Lua scripts into standalone executables
#[derive(Parser, Debug)]
#[command(name = "luapack")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Package Lua scripts into standalone executables")]
#[command(long_about = "luapack statically analyzes the require graph of a Lua entry script, \
produces the ordered list of every source file and native library the program needs, and \
hands that manifest to luastatic to build a standalone executable.")]
#[command(after_help = "EXAMPLES:

Analysis:
    # Show the dependency manifest for a script
    luapack analyze main.lua

    # Allow a larger dependency tree
    luapack analyze main.lua --max-deps 112

    # Machine-readable report
    luapack analyze main.lua --output json --output-file report.json

Building:
    # Build main.lua and everything it requires
    luapack build main.lua

    # Bundle extra scripts the analysis cannot see
    luapack build main.lua --require plugins/extra.lua

    # Skip analysis entirely and bundle only what is listed
    luapack build main.lua --manual --require a.lua --require b.lua

Environment:
    # Check that luastatic and a C compiler are installed
    luapack engines

    # Create a default .luapack.toml in the current directory
    luapack init
")]
pub struct Args {
    #[command(subcommand)]
    pub command: CliCommand,

    /// Configuration file path
    #[arg(short, long, global = true, value_name = "FILE",
          help = "Path to configuration file (defaults to .luapack.toml in the current or home directory)")]
    pub config: Option<PathBuf>,

    /// Output format for reports
    #[arg(long, global = true, value_enum, value_name = "FORMAT",
          help = "Report format: 'text' for human-readable output, 'json' for machine processing")]
    pub output: Option<CliOutputFormat>,

    /// Output file path (stdout if not specified)
    #[arg(long, global = true, value_name = "FILE",
          help = "File to write the report to (uses stdout if not specified)")]
    pub output_file: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(short, long, global = true,
          help = "Suppress non-essential output (only emit the manifest paths)")]
    pub quiet: bool,

    /// Show detailed progress information
    #[arg(short, long, global = true,
          help = "Show detailed progress and timing information")]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true,
          help = "Disable colored output (useful when piping or for terminals without ANSI support)")]
    pub no_colors: bool,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Analyze a script's dependency tree without building
    Analyze {
        /// Entry script to analyze
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Maximum number of distinct dependencies to follow
        #[arg(long = "max-deps", value_name = "N",
              help = "Cap on distinct dependencies before analysis aborts (default: 36)")]
        max_deps: Option<usize>,
    },

    /// Analyze a script and build a standalone executable
    Build {
        /// Entry script to build
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Bundle an additional script (repeatable)
        #[arg(short = 'r', long = "require", value_name = "PATH",
              help = "Additional script to bundle; must exist (can be given multiple times)")]
        require: Vec<PathBuf>,

        /// Drop a script from the analyzed manifest (repeatable)
        #[arg(long = "exclude", value_name = "PATH",
              help = "Script to remove from the analyzed manifest (can be given multiple times)")]
        exclude: Vec<PathBuf>,

        /// Skip dependency analysis; bundle only --require'd scripts
        #[arg(long,
              help = "Disable automatic dependency analysis; the manifest is built solely from --require")]
        manual: bool,

        /// Maximum number of distinct dependencies to follow
        #[arg(long = "max-deps", value_name = "N",
              help = "Cap on distinct dependencies before analysis aborts (default: 36)")]
        max_deps: Option<usize>,

        /// Path for the produced executable
        #[arg(short = 'o', long = "binary", value_name = "FILE",
              help = "Where to place the produced executable (defaults to the entry name without extension)")]
        binary: Option<PathBuf>,
    },

    /// Report whether the external build tools are installed
    Engines,

    /// Create a default configuration file in the current directory
    Init,
}

/// Output format options as exposed on the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CliOutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(format: CliOutputFormat) -> Self {
        match format {
            CliOutputFormat::Text => OutputFormat::Text,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// The settings overrides this invocation carries
    pub fn to_partial_settings(&self) -> PartialSettings {
        let max_deps = match &self.command {
            CliCommand::Analyze { max_deps, .. } => *max_deps,
            CliCommand::Build { max_deps, .. } => *max_deps,
            _ => None,
        };

        PartialSettings {
            max_dependencies: max_deps,
            output_format: self.output.map(OutputFormat::from),
            output_file: self.output_file.clone(),
            use_colors: if self.no_colors { Some(false) } else { None },
            quiet: if self.quiet { Some(true) } else { None },
            verbose: if self.verbose { Some(true) } else { None },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_args() {
        let args = Args::parse_from(["luapack", "analyze", "main.lua", "--max-deps", "50"]);
        match &args.command {
            CliCommand::Analyze { script, max_deps } => {
                assert_eq!(script, &PathBuf::from("main.lua"));
                assert_eq!(*max_deps, Some(50));
            }
            other => panic!("expected analyze command, got {other:?}"),
        }
    }

    #[test]
    fn test_build_args_with_requires() {
        let args = Args::parse_from([
            "luapack", "build", "main.lua", "-r", "a.lua", "--require", "b.lua", "--manual",
        ]);
        match &args.command {
            CliCommand::Build { require, manual, .. } => {
                assert_eq!(require, &[PathBuf::from("a.lua"), PathBuf::from("b.lua")]);
                assert!(manual);
            }
            other => panic!("expected build command, got {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_become_overrides() {
        let args = Args::parse_from([
            "luapack", "analyze", "main.lua", "--output", "json", "--no-colors", "--quiet",
        ]);
        let partial = args.to_partial_settings();
        assert_eq!(partial.output_format, Some(OutputFormat::Json));
        assert_eq!(partial.use_colors, Some(false));
        assert_eq!(partial.quiet, Some(true));
        assert_eq!(partial.verbose, None);
    }
}
