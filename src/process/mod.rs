//! Batch processing of source files.
//!
//! An [`ExecutionContext`] ties together the run options, the traversal
//! filter, a [`Presenter`] and an [`Engine`]. It offers three entry points:
//!
//! - [`ExecutionContext::process_dir`] walks a tree, filtering every entry
//!   and isolating per-file failures so one bad file never stops the walk
//! - [`ExecutionContext::process_file`] runs a single file through the pipeline
//! - [`ExecutionContext::process_stdin`] transforms a stream to the output sink
//!
//! Each file is read, transformed and emitted before the next one is looked
//! at. Nothing is shared between files except the context itself.

pub mod filter;
pub mod pipeline;
pub mod walk;

use std::io::Write;

pub use filter::{Entry, IgnorePredicate, TraversalFilter, Visit};

use crate::engine::Engine;
use crate::presenter::Presenter;

/// Output-mode toggles for a run
///
/// The effects are additive: listing never suppresses write-back, and
/// transformed content only goes to the output sink when write-back is off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Overwrite each file with its transformed content
    pub write_back: bool,
    /// Report files whose transformed content differs from the original
    pub list_files_differ: bool,
}

/// Configuration and collaborators shared by every file in a run
pub struct ExecutionContext<'a, E, W> {
    options: RunOptions,
    filter: TraversalFilter,
    presenter: &'a dyn Presenter,
    engine: E,
    stdout: W,
}

impl<'a, E: Engine, W: Write> ExecutionContext<'a, E, W> {
    #[must_use]
    pub fn new(
        options: RunOptions,
        filter: TraversalFilter,
        presenter: &'a dyn Presenter,
        engine: E,
        stdout: W,
    ) -> Self {
        ExecutionContext {
            options,
            filter,
            presenter,
            engine,
            stdout,
        }
    }

    /// Give back the output sink, e.g. to inspect what was written
    pub fn into_output(self) -> W {
        self.stdout
    }
}
