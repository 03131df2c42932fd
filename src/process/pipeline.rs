//! Per-file pipeline
//!
//! read bytes → engine (parse, sort imports, render) → list / write back / print

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use anyhow::Context;

use super::ExecutionContext;
use crate::engine::{Engine, SourceUnit};
use crate::Result;

impl<E: Engine, W: Write> ExecutionContext<'_, E, W> {
    /// Run one file through the pipeline.
    ///
    /// The file is only opened for writing once the engine has produced its
    /// output, so a parse or render failure leaves the original untouched.
    pub fn process_file(&mut self, path: &Path) -> Result<()> {
        self.presenter
            .verbose(&format!("processing file {}", path.display()));

        let original = fs::read(path).context("cannot read file")?;
        let formatted = self.transform(&original)?;

        // Compared against the pre-write content, so the listing is the same
        // whether or not write-back is on.
        if self.options.list_files_differ && original != formatted {
            self.presenter.result(&path.display().to_string());
        }

        if self.options.write_back {
            write_back(path, &formatted)
        } else {
            self.emit(&formatted)
        }
    }

    /// Transform everything read from `input` into the output sink.
    ///
    /// There is no path here: no filtering, no listing, no write-back.
    pub fn process_stdin<R: Read>(&mut self, mut input: R) -> Result<()> {
        self.presenter.verbose("processing standard input");

        let mut content = Vec::new();
        input
            .read_to_end(&mut content)
            .context("cannot read standard input")?;

        let formatted = self.transform(&content)?;
        self.emit(&formatted)
    }

    fn transform(&self, content: &[u8]) -> Result<Vec<u8>> {
        let mut unit = self.engine.parse(content).context("cannot read file")?;
        unit.sort_imports();

        let mut formatted = Vec::with_capacity(content.len());
        unit.render(&mut formatted).context("cannot format file")?;
        Ok(formatted)
    }

    fn emit(&mut self, formatted: &[u8]) -> Result<()> {
        self.stdout
            .write_all(formatted)
            .and_then(|()| self.stdout.flush())
            .context("cannot write to standard output")
    }
}

fn write_back(path: &Path, formatted: &[u8]) -> Result<()> {
    let mut file = File::create(path).context("cannot open file for writing")?;
    file.write_all(formatted).context("cannot write file")?;
    Ok(())
}
