//! TOML-based configuration for git-thanos.
//!
//! Every field has a default, so an absent config file is equivalent to an
//! empty one.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::ConfigError;
use crate::selection::SelectionPolicy;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThanosConfig {
    /// Minimum tracing level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Author selection settings.
    #[serde(default)]
    pub selection: SelectionConfig,

    /// History rewrite settings.
    #[serde(default)]
    pub rewrite: RewriteConfig,
}

fn default_log_level() -> String {
    "warn".into()
}

impl Default for ThanosConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            selection: SelectionConfig::default(),
            rewrite: RewriteConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Reserved identities and the history scope used to list authors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Case-insensitive pattern for the identity that is never selected.
    #[serde(default = "default_tyrant_pattern")]
    pub tyrant_pattern: String,

    /// Case-insensitive pattern for the identity that is always selected
    /// whenever the tyrant is also present.
    #[serde(default = "default_rival_pattern")]
    pub rival_pattern: String,

    /// Revisions passed to `git shortlog` (default `HEAD`).
    #[serde(default = "default_revisions")]
    pub revisions: Vec<String>,
}

fn default_tyrant_pattern() -> String {
    "Thanos".into()
}
fn default_rival_pattern() -> String {
    "Linus Torvalds".into()
}
fn default_revisions() -> Vec<String> {
    vec!["HEAD".into()]
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            tyrant_pattern: default_tyrant_pattern(),
            rival_pattern: default_rival_pattern(),
            revisions: default_revisions(),
        }
    }
}

// ---------------------------------------------------------------------------
// Rewrite
// ---------------------------------------------------------------------------

/// How the history rewrite is carried out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteConfig {
    /// The git executable to invoke.
    #[serde(default = "default_git_binary")]
    pub git_binary: String,

    /// Where the dispatch scripts are written (system temp dir if unset).
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
}

fn default_git_binary() -> String {
    "git".into()
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            git_binary: default_git_binary(),
            scratch_dir: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading & validating
// ---------------------------------------------------------------------------

impl ThanosConfig {
    /// Load a [`ThanosConfig`] from a TOML file at the given path.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: ThanosConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!("configuration parsed successfully");
        Ok(config)
    }

    /// Validate that all fields are present and sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        SelectionPolicy::from_config(&self.selection)?;
        if self.selection.revisions.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "selection.revisions".into(),
                detail: "at least one revision is required".into(),
            });
        }
        if self.rewrite.git_binary.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "rewrite.git_binary".into(),
                detail: "git binary must not be empty".into(),
            });
        }
        if let Some(dir) = &self.rewrite.scratch_dir {
            if !dir.is_dir() {
                return Err(ConfigError::InvalidValue {
                    field: "rewrite.scratch_dir".into(),
                    detail: format!("'{}' is not a directory", dir.display()),
                });
            }
        }
        Ok(())
    }

    /// Convenience: load and validate in one call.
    pub fn load_and_validate<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_toml() -> &'static str {
        r#"
log_level = "debug"

[selection]
tyrant_pattern = "^Mad Titan$"
rival_pattern = "Grace Hopper"
revisions = ["--branches", "--tags"]

[rewrite]
git_binary = "/usr/local/bin/git"
"#
    }

    #[test]
    fn test_parse_full_config() {
        let config: ThanosConfig = toml::from_str(sample_toml()).expect("failed to parse toml");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.selection.tyrant_pattern, "^Mad Titan$");
        assert_eq!(config.selection.rival_pattern, "Grace Hopper");
        assert_eq!(config.selection.revisions, vec!["--branches", "--tags"]);
        assert_eq!(config.rewrite.git_binary, "/usr/local/bin/git");
        assert!(config.rewrite.scratch_dir.is_none());
    }

    #[test]
    fn test_defaults() {
        let config: ThanosConfig = toml::from_str("").unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.selection.tyrant_pattern, "Thanos");
        assert_eq!(config.selection.rival_pattern, "Linus Torvalds");
        assert_eq!(config.selection.revisions, vec!["HEAD"]);
        assert_eq!(config.rewrite.git_binary, "git");
        config.validate().unwrap();
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(sample_toml().as_bytes()).unwrap();

        let config = ThanosConfig::load_and_validate(&path).expect("load failed");
        assert_eq!(config.selection.rival_pattern, "Grace Hopper");
    }

    #[test]
    fn test_file_not_found() {
        let result = ThanosConfig::load_from_file("/nonexistent/config.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[selection\n").unwrap();
        let result = ThanosConfig::load_from_file(&path);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ThanosConfig::default();
        config.selection.revisions.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "selection.revisions"
        ));

        let mut config = ThanosConfig::default();
        config.rewrite.git_binary = String::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "rewrite.git_binary"
        ));

        let mut config = ThanosConfig::default();
        config.rewrite.scratch_dir = Some(PathBuf::from("/nonexistent/scratch"));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "rewrite.scratch_dir"
        ));

        let mut config = ThanosConfig::default();
        config.selection.tyrant_pattern = "[".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "selection.tyrant_pattern"
        ));
    }
}
