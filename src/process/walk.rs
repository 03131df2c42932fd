//! Directory traversal

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use walkdir::WalkDir;

use super::{Entry, ExecutionContext, Visit};
use crate::engine::Engine;
use crate::Result;

impl<E: Engine, W: Write> ExecutionContext<'_, E, W> {
    /// Walk `root` depth-first in file-name order and process every file the
    /// filter lets through.
    ///
    /// Per-file failures are reported as `"<path>: <cause>"` and the walk
    /// carries on. Only traversal failures (missing root, unreadable entry)
    /// are returned.
    pub fn process_dir(&mut self, root: &Path) -> Result<()> {
        let mut walker = WalkDir::new(root).sort_by_file_name().into_iter();

        while let Some(entry) = walker.next() {
            let entry = entry.with_context(|| format!("cannot walk {}", root.display()))?;
            let is_dir = entry.file_type().is_dir();
            let name = entry.file_name().to_string_lossy();
            let candidate = if entry.depth() == 0 && is_dir {
                Entry::root(&name)
            } else {
                Entry::new(&name, is_dir)
            };

            match self.filter.decide(&candidate) {
                Visit::Process if is_dir => {}
                Visit::Process => {
                    let path = entry.path();
                    if let Err(err) = self.process_file(path) {
                        self.presenter.error(&path.display().to_string(), &err);
                    }
                }
                Visit::Skip | Visit::Prune => {
                    self.presenter
                        .verbose(&format!("ignoring {}", entry.path().display()));
                    if is_dir {
                        walker.skip_current_dir();
                    }
                }
            }
        }

        Ok(())
    }
}
