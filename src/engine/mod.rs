//! Transformation engines.
//!
//! The orchestration layer never looks inside source text. It hands raw bytes
//! to an [`Engine`], asks the parsed unit to normalize its imports, and
//! renders the result into a byte sink. Parse and render failures are kept
//! apart in [`EngineError`] so callers can report them differently.

pub mod imports;

use std::io::{Read, Write};

pub use imports::{GoSource, ImportSorter};

/// Failure raised by a transformation engine
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The input is not valid enough to parse
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The input could not be decoded at all
    #[error("input is not valid UTF-8")]
    Encoding(#[from] std::str::Utf8Error),

    /// The input was read but could not be rendered
    #[error("render failed")]
    Render(#[source] std::io::Error),

    /// Reading from the input stream failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        EngineError::Parse {
            line,
            message: message.into(),
        }
    }
}

/// A parsed source unit
pub trait SourceUnit {
    /// Normalize the ordering of import declarations in place
    fn sort_imports(&mut self);

    /// Write the canonical byte form to `sink`
    fn render(&self, sink: &mut dyn Write) -> Result<(), EngineError>;
}

/// Parses raw source into a [`SourceUnit`]
pub trait Engine {
    type Unit: SourceUnit;

    fn parse<R: Read>(&self, input: R) -> Result<Self::Unit, EngineError>;
}
