//! Visit policy for directory walks.
//!
//! Each walked entry runs through an ordered list of rules; the first rule
//! with an opinion decides. Entries no rule claims are processed.

use std::fmt;
use std::path::Path;

/// Directory name that is never descended into
const VENDOR_DIR: &str = "vendor";

/// Predicate over bare file names; `true` means ignore
pub type IgnorePredicate = Box<dyn Fn(&str) -> bool>;

/// Outcome of filtering one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Descend (directories) or run through the pipeline (files)
    Process,
    /// Leave this entry alone; a skipped directory is not descended
    Skip,
    /// Drop the directory and everything beneath it
    Prune,
}

/// What the filter needs to know about a walked entry
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    pub name: &'a str,
    pub is_dir: bool,
    /// The entry the walk started from
    pub is_root: bool,
}

impl<'a> Entry<'a> {
    #[must_use]
    pub fn new(name: &'a str, is_dir: bool) -> Self {
        Entry {
            name,
            is_dir,
            is_root: false,
        }
    }

    /// The directory a walk starts from
    #[must_use]
    pub fn root(name: &'a str) -> Self {
        Entry {
            name,
            is_dir: true,
            is_root: true,
        }
    }
}

type Rule = fn(&Entry<'_>, &TraversalFilter) -> Option<Visit>;

const RULES: &[Rule] = &[
    walk_root,
    hidden_or_underscore,
    vendor_dir,
    foreign_extension,
    user_ignored,
];

fn walk_root(entry: &Entry<'_>, _: &TraversalFilter) -> Option<Visit> {
    (entry.is_root || (entry.is_dir && entry.name == ".")).then_some(Visit::Process)
}

fn hidden_or_underscore(entry: &Entry<'_>, _: &TraversalFilter) -> Option<Visit> {
    (entry.name.starts_with('.') || entry.name.starts_with('_')).then_some(Visit::Skip)
}

fn vendor_dir(entry: &Entry<'_>, _: &TraversalFilter) -> Option<Visit> {
    (entry.is_dir && entry.name == VENDOR_DIR).then_some(Visit::Prune)
}

fn foreign_extension(entry: &Entry<'_>, filter: &TraversalFilter) -> Option<Visit> {
    if entry.is_dir {
        return None;
    }
    let ext = Path::new(entry.name).extension().and_then(|e| e.to_str());
    (ext != Some(filter.extension.as_str())).then_some(Visit::Skip)
}

fn user_ignored(entry: &Entry<'_>, filter: &TraversalFilter) -> Option<Visit> {
    if entry.is_dir {
        return None;
    }
    let ignore = filter.ignore.as_ref()?;
    ignore(entry.name).then_some(Visit::Skip)
}

/// Decides which walked entries are visited, skipped, or pruned
pub struct TraversalFilter {
    /// Recognized source extension, without the leading dot
    extension: String,
    ignore: Option<IgnorePredicate>,
}

impl TraversalFilter {
    #[must_use]
    pub fn new(extension: impl Into<String>) -> Self {
        TraversalFilter {
            extension: extension.into(),
            ignore: None,
        }
    }

    #[must_use]
    pub fn with_ignore(mut self, ignore: IgnorePredicate) -> Self {
        self.ignore = Some(ignore);
        self
    }

    #[must_use]
    pub fn decide(&self, entry: &Entry<'_>) -> Visit {
        RULES
            .iter()
            .find_map(|rule| rule(entry, self))
            .unwrap_or(Visit::Process)
    }
}

impl Default for TraversalFilter {
    fn default() -> Self {
        TraversalFilter::new("go")
    }
}

impl fmt::Debug for TraversalFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraversalFilter")
            .field("extension", &self.extension)
            .field("ignore", &self.ignore.is_some())
            .finish()
    }
}
