//! importsort - batch rewriter for Go import blocks
//!
//! Walks a tree (or takes a single file, or standard input), sorts every
//! parenthesized import block, and either writes the result back, prints it,
//! or lists the files that would change.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod presenter;
pub mod process;

// Re-export commonly used types
pub use cli::{build_cli, parse_args, parse_args_from, CliArgs};
pub use config::Config;
pub use engine::{Engine, EngineError, ImportSorter, SourceUnit};
pub use error::Result;
pub use presenter::{ConsolePresenter, MemoryPresenter, Presenter};
pub use process::{ExecutionContext, RunOptions, TraversalFilter};
