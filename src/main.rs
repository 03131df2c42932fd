//! importsort - batch rewriter for Go import blocks

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use anyhow::Context;
use importsort::{
    logging, parse_args, CliArgs, Config, ConsolePresenter, ExecutionContext, ImportSorter,
    Presenter, Result, RunOptions,
};

fn main() -> ExitCode {
    let args = parse_args();
    logging::init(args.verbose);

    // If no inputs and running interactively, print usage; otherwise read from stdin
    if args.inputs.is_empty() && io::stdin().is_terminal() {
        print_usage();
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(e) => {
            eprintln!("importsort: {e:#}");
            ExitCode::from(2)
        }
    }
}

/// Process every input, returning how many per-file errors were reported
fn run(args: &CliArgs) -> Result<usize> {
    let config = build_config(args)?;
    let filter = config.traversal_filter()?;
    let options = RunOptions {
        write_back: args.write,
        list_files_differ: args.list,
    };

    let presenter = ConsolePresenter::new();
    let mut ctx = ExecutionContext::new(options, filter, &presenter, ImportSorter, io::stdout());

    if args.reads_stdin() {
        if args.write {
            anyhow::bail!("cannot use -w with standard input");
        }
        ctx.process_stdin(io::stdin().lock())?;
        return Ok(presenter.error_count());
    }

    for input in &args.inputs {
        if input.is_dir() {
            ctx.process_dir(input)?;
        } else if let Err(e) = ctx.process_file(input) {
            presenter.error(&input.display().to_string(), &e);
        }
    }

    Ok(presenter.error_count())
}

/// Build configuration from config files and CLI args
fn build_config(args: &CliArgs) -> Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        Config::from_toml_file(config_path)?
    } else {
        let cwd = std::env::current_dir().context("cannot determine current directory")?;
        Config::from_discovered_files(&cwd)?
    };

    // Override with CLI arguments
    if let Some(extension) = &args.extension {
        config.extension = extension
            .strip_prefix('.')
            .unwrap_or(extension)
            .to_string();
    }
    for pattern in &args.exclude {
        if !config.exclude.contains(pattern) {
            config.exclude.push(pattern.clone());
        }
    }

    tracing::debug!(?config, "resolved configuration");

    if let Some(error) = config.validate() {
        anyhow::bail!("Invalid configuration: {error}");
    }

    Ok(config)
}

fn print_usage() {
    println!(
        "importsort v{} - Go import block sorter",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("Usage:");
    println!("  importsort [OPTIONS] <PATH>...");
    println!("  importsort [OPTIONS] -              # Read from stdin");
    println!("  cat main.go | importsort           # Pipe input");
    println!();
    println!("Examples:");
    println!("  importsort -l .                    # List files that would change");
    println!("  importsort -w ./cmd ./pkg          # Rewrite files in place");
    println!("  importsort main.go                 # Print sorted file to stdout");
    println!("  importsort -w -e '*_gen.go' .      # Skip generated files");
    println!();
    println!("Options:");
    println!("  -w, --write                Write result to (source) file instead of stdout");
    println!("  -l, --list                 List files whose formatting differs");
    println!("  -e, --exclude <PATTERN>    Skip files whose name matches (repeatable)");
    println!("  -x, --extension <EXT>      Source file extension [default: go]");
    println!("  -c, --config <FILE>        Config file path (overrides auto-discovery)");
    println!("  -v, --verbose              Trace every file processed or ignored");
    println!("  -h, --help                 Print help");
    println!();
    println!("Directories are walked recursively. Entries starting with '.' or '_'");
    println!("and directories named 'vendor' are never visited.");
    println!();
    println!("Config file auto-discovery:");
    println!("  Searches for importsort.toml in the home directory and in every");
    println!("  directory from the filesystem root down to the current one.");
}
