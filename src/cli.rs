//! Command-line interface for importsort.
//!
//! Defines CLI arguments using clap builder API

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};

/// CLI arguments parsed from command line
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Files or directories to process; empty (or `-`) means standard input
    pub inputs: Vec<PathBuf>,

    /// Write results back to the source files
    pub write: bool,

    /// List files whose formatting differs
    pub list: bool,

    /// Exclude patterns for file names (glob patterns)
    pub exclude: Vec<String>,

    /// Source file extension override
    pub extension: Option<String>,

    /// Explicit config file (disables auto-discovery)
    pub config: Option<PathBuf>,

    /// Enable verbose output
    pub verbose: bool,
}

impl CliArgs {
    /// True when input should be read from standard input
    #[must_use]
    pub fn reads_stdin(&self) -> bool {
        self.inputs.is_empty() || (self.inputs.len() == 1 && self.inputs[0].as_os_str() == "-")
    }
}

/// Build the clap Command for parsing CLI arguments
#[must_use]
pub fn build_cli() -> Command {
    Command::new("importsort")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Sorts Go import blocks across files and directory trees")
        .arg(
            Arg::new("inputs")
                .help("Files or directories to process; '-' or nothing reads standard input")
                .value_name("PATH")
                .num_args(1..)
                .required(false)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("write")
                .short('w')
                .long("write")
                .help("Write result to (source) file instead of stdout")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list")
                .short('l')
                .long("list")
                .help("List files whose formatting differs")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .help("Skip files whose name matches pattern (glob syntax, can be repeated)")
                .value_name("PATTERN")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("extension")
                .short('x')
                .long("extension")
                .help("Source file extension to process [default: go]")
                .value_name("EXT"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to configuration file (overrides auto-discovery)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Trace every file processed or ignored")
                .action(ArgAction::SetTrue),
        )
}

/// Parse CLI arguments from command line
#[must_use]
pub fn parse_args() -> CliArgs {
    args_from_matches(&build_cli().get_matches())
}

/// Parse CLI arguments from an iterator (for testing)
#[must_use]
pub fn parse_args_from<I, T>(args: I) -> CliArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    args_from_matches(&build_cli().get_matches_from(args))
}

/// Convert clap `ArgMatches` to `CliArgs`
fn args_from_matches(matches: &clap::ArgMatches) -> CliArgs {
    CliArgs {
        inputs: matches
            .get_many::<PathBuf>("inputs")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        write: matches.get_flag("write"),
        list: matches.get_flag("list"),
        exclude: matches
            .get_many::<String>("exclude")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        extension: matches.get_one::<String>("extension").cloned(),
        config: matches.get_one::<PathBuf>("config").cloned(),
        verbose: matches.get_flag("verbose"),
    }
}
