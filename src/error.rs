//! Error types and result aliases for importsort.
//!
//! The processing core reports failures as [`anyhow::Error`] values wrapped
//! with a short cause phrase ("cannot read file", "cannot format file",
//! "cannot open file for writing", "cannot write file"). Engine failures are
//! typed separately as [`crate::engine::EngineError`].

use anyhow::Result as AnyhowResult;

pub type Result<T> = AnyhowResult<T>;
