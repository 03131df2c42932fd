//! Configuration management for importsort.
//!
//! This module provides the [`Config`] struct which controls which files a
//! run considers. Configuration can be loaded from:
//! - TOML files (`importsort.toml`)
//! - CLI arguments (which override file settings)
//!
//! Config files are auto-discovered by searching from the user's home
//! directory, then every ancestor of the starting directory from the
//! filesystem root down. Files closer to the start override earlier ones.

use std::path::{Path, PathBuf};

use anyhow::Context;
use glob::Pattern;
use serde::Deserialize;

use crate::process::{IgnorePredicate, TraversalFilter};

/// Config file names to search for (in order of priority, later overrides earlier)
const CONFIG_FILE_NAMES: &[&str] = &["importsort.toml"];

/// Default source extension
const DEFAULT_EXTENSION: &str = "go";

/// Get the user's home directory
fn dirs_home() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home));
    }
    // Fallback for Windows
    if let Ok(userprofile) = std::env::var("USERPROFILE") {
        return Some(PathBuf::from(userprofile));
    }
    None
}

/// Main configuration struct for importsort
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Source file extension, without the leading dot (default: "go")
    pub extension: String,

    /// Glob patterns matched against file names; matching files are skipped
    pub exclude: Vec<String>,
}

/// Partial configuration for TOML parsing
///
/// `extension` is an `Option` so we can distinguish between "explicitly set"
/// and "not specified" when merging configs. Exclude lists accumulate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialConfig {
    pub extension: Option<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            extension: DEFAULT_EXTENSION.to_string(),
            exclude: Vec::new(),
        }
    }
}

impl Config {
    /// Validate configuration values
    ///
    /// Returns an error message if validation fails, None if valid.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if self.extension.is_empty() {
            return Some("extension must not be empty".to_string());
        }
        if self
            .extension
            .contains(|c: char| c == '.' || std::path::is_separator(c))
        {
            return Some(format!(
                "extension {:?} must be a bare extension such as \"go\"",
                self.extension
            ));
        }
        for pattern in &self.exclude {
            if let Err(e) = Pattern::new(pattern) {
                return Some(format!("invalid exclude pattern {pattern:?}: {e}"));
            }
        }
        None
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let partial: PartialConfig = toml::from_str(&contents)
            .with_context(|| format!("cannot parse config file {}", path.display()))?;
        let mut config = Self::default();
        config.apply_partial(&partial);
        Ok(config)
    }

    /// Apply a partial config, only overriding fields that are explicitly set
    fn apply_partial(&mut self, partial: &PartialConfig) {
        if let Some(ext) = &partial.extension {
            self.extension.clone_from(ext);
        }
        for pattern in &partial.exclude {
            if !self.exclude.contains(pattern) {
                self.exclude.push(pattern.clone());
            }
        }
    }

    /// Discover config files for a starting directory
    ///
    /// Returns list of config file paths in order of priority (least specific first).
    #[must_use]
    pub fn discover_config_files(start_dir: &Path) -> Vec<PathBuf> {
        let mut config_files = Vec::new();

        // Home directory config first (lowest priority)
        if let Some(home) = dirs_home() {
            for config_name in CONFIG_FILE_NAMES {
                let home_config = home.join(config_name);
                if home_config.is_file() {
                    config_files.push(home_config);
                }
            }
        }

        let mut ancestors: Vec<&Path> = start_dir.ancestors().collect();
        // Root first, so nearer files override
        ancestors.reverse();

        for ancestor in ancestors {
            for config_name in CONFIG_FILE_NAMES {
                let config_path = ancestor.join(config_name);
                if config_path.is_file() && !config_files.contains(&config_path) {
                    config_files.push(config_path);
                }
            }
        }

        config_files
    }

    /// Load and merge configuration from discovered config files
    ///
    /// Later files override earlier ones. A file that cannot be read or
    /// parsed is an error.
    pub fn from_discovered_files(start_dir: &Path) -> anyhow::Result<Self> {
        let mut config = Self::default();
        for path in Self::discover_config_files(start_dir) {
            tracing::debug!("loading config file {}", path.display());
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("cannot read config file {}", path.display()))?;
            let partial: PartialConfig = toml::from_str(&contents)
                .with_context(|| format!("cannot parse config file {}", path.display()))?;
            config.apply_partial(&partial);
        }
        Ok(config)
    }

    /// Build the name-exclusion predicate, if any patterns are configured
    pub fn ignore_predicate(&self) -> anyhow::Result<Option<IgnorePredicate>> {
        if self.exclude.is_empty() {
            return Ok(None);
        }
        let patterns = self
            .exclude
            .iter()
            .map(|p| Pattern::new(p).with_context(|| format!("invalid exclude pattern {p:?}")))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let predicate: IgnorePredicate =
            Box::new(move |name: &str| patterns.iter().any(|p| p.matches(name)));
        Ok(Some(predicate))
    }

    /// Build the traversal filter for this configuration
    pub fn traversal_filter(&self) -> anyhow::Result<TraversalFilter> {
        let filter = TraversalFilter::new(self.extension.clone());
        Ok(match self.ignore_predicate()? {
            Some(ignore) => filter.with_ignore(ignore),
            None => filter,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::process::{Entry, Visit};

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.extension, "go");
        assert!(config.exclude.is_empty());
        assert!(config.validate().is_none());
    }

    #[test]
    fn test_apply_partial_overrides_extension() {
        let mut config = Config::default();
        let partial = PartialConfig {
            extension: Some("gox".to_string()),
            ..Default::default()
        };
        config.apply_partial(&partial);
        assert_eq!(config.extension, "gox");
    }

    #[test]
    fn test_apply_partial_preserves_unset() {
        let mut config = Config {
            extension: "gox".to_string(),
            exclude: vec!["*_test.go".to_string()],
        };
        config.apply_partial(&PartialConfig::default());
        assert_eq!(config.extension, "gox");
        assert_eq!(config.exclude, vec!["*_test.go"]);
    }

    #[test]
    fn test_apply_partial_accumulates_excludes() {
        let mut config = Config {
            exclude: vec!["a*.go".to_string()],
            ..Default::default()
        };
        let partial = PartialConfig {
            exclude: vec!["a*.go".to_string(), "zz_*.go".to_string()],
            ..Default::default()
        };
        config.apply_partial(&partial);
        assert_eq!(config.exclude, vec!["a*.go", "zz_*.go"]);
    }

    #[test]
    fn test_validate_empty_extension() {
        let config = Config {
            extension: String::new(),
            ..Default::default()
        };
        assert!(config.validate().unwrap().contains("extension"));
    }

    #[test]
    fn test_validate_dotted_extension() {
        let config = Config {
            extension: ".go".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_some());
    }

    #[test]
    fn test_validate_bad_pattern() {
        let config = Config {
            exclude: vec!["[unclosed".to_string()],
            ..Default::default()
        };
        assert!(config.validate().unwrap().contains("[unclosed"));
        assert!(config.ignore_predicate().is_err());
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("importsort.toml");
        fs::write(&path, "extension = \"gox\"\nexclude = [\"*_gen.gox\"]\n").unwrap();

        let config = Config::from_toml_file(&path).unwrap();
        assert_eq!(config.extension, "gox");
        assert_eq!(config.exclude, vec!["*_gen.gox"]);
    }

    #[test]
    fn test_from_toml_file_rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("importsort.toml");
        fs::write(&path, "indent = 4\n").unwrap();
        assert!(Config::from_toml_file(&path).is_err());
    }

    #[test]
    fn test_discovery_nearest_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            dir.path().join("importsort.toml"),
            "extension = \"outer\"\nexclude = [\"x.go\"]\n",
        )
        .unwrap();
        fs::write(nested.join("importsort.toml"), "extension = \"inner\"\n").unwrap();

        let files = Config::discover_config_files(&nested);
        let outer = files
            .iter()
            .position(|p| p == &dir.path().join("importsort.toml"))
            .unwrap();
        let inner = files
            .iter()
            .position(|p| p == &nested.join("importsort.toml"))
            .unwrap();
        assert!(outer < inner);

        let config = Config::from_discovered_files(&nested).unwrap();
        assert_eq!(config.extension, "inner");
        assert!(config.exclude.contains(&"x.go".to_string()));
    }

    #[test]
    fn test_traversal_filter_uses_excludes() {
        let config = Config {
            exclude: vec!["*_test.go".to_string()],
            ..Default::default()
        };
        let filter = config.traversal_filter().unwrap();
        assert_eq!(filter.decide(&Entry::new("a_test.go", false)), Visit::Skip);
        assert_eq!(filter.decide(&Entry::new("a.go", false)), Visit::Process);
    }
}
