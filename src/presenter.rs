//! Output channels used by the processing core.
//!
//! The core never prints directly. Everything it has to say goes through a
//! [`Presenter`]: verbose traces, per-path errors, and plain result lines.

use std::cell::{Cell, RefCell};
use std::io::{self, Write};

use anyhow::Context;

/// Receives leveled messages from the processing core
pub trait Presenter {
    /// Diagnostic trace, suppressible
    fn verbose(&self, message: &str);

    /// User-visible failure associated with a path (or other subject)
    fn error(&self, subject: &str, cause: &anyhow::Error);

    /// Plain result output, one line per call
    fn result(&self, line: &str);
}

/// Formats an error as `"<subject>: <cause chain>"`
#[must_use]
pub fn format_error(subject: &str, cause: &anyhow::Error) -> String {
    format!("{subject}: {cause:#}")
}

/// Presenter for the terminal.
///
/// Verbose traces go through `tracing` at debug level, errors are written to
/// stderr and results to stdout.
#[derive(Debug, Default)]
pub struct ConsolePresenter {
    errors: Cell<usize>,
}

impl ConsolePresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of errors reported so far
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.get()
    }

    /// Write one result line; a failed write is reported and counted as an error
    fn write_result(&self, out: &mut dyn Write, line: &str) {
        if let Err(e) = writeln!(out, "{line}")
            .and_then(|()| out.flush())
            .context("cannot write to standard output")
        {
            self.error(line, &e);
        }
    }
}

impl Presenter for ConsolePresenter {
    fn verbose(&self, message: &str) {
        tracing::debug!("{message}");
    }

    fn error(&self, subject: &str, cause: &anyhow::Error) {
        self.errors.set(self.errors.get() + 1);
        eprintln!("{}", format_error(subject, cause));
    }

    fn result(&self, line: &str) {
        self.write_result(&mut io::stdout().lock(), line);
    }
}

/// Presenter that keeps every message in memory, for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryPresenter {
    verbose: RefCell<Vec<String>>,
    errors: RefCell<Vec<String>>,
    results: RefCell<Vec<String>>,
}

impl MemoryPresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn verbose_messages(&self) -> Vec<String> {
        self.verbose.borrow().clone()
    }

    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }

    #[must_use]
    pub fn results(&self) -> Vec<String> {
        self.results.borrow().clone()
    }
}

impl Presenter for MemoryPresenter {
    fn verbose(&self, message: &str) {
        self.verbose.borrow_mut().push(message.to_string());
    }

    fn error(&self, subject: &str, cause: &anyhow::Error) {
        self.errors.borrow_mut().push(format_error(subject, cause));
    }

    fn result(&self, line: &str) {
        self.results.borrow_mut().push(line.to_string());
    }
}
