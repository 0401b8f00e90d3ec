//! Error types for the git-thanos core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them for callers that want a single
//! error type.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scratch(#[from] ScratchError),

    /// The run was interrupted while history was being rewritten.
    #[error("interrupted before the history rewrite finished")]
    Interrupted,
}

// ---------------------------------------------------------------------------
// Git errors
// ---------------------------------------------------------------------------

/// Errors from repository discovery and the `git` CLI.
#[derive(Debug, Error)]
pub enum GitError {
    /// The starting directory is not inside a git repository.
    #[error("Not a git repository: '{0}'")]
    RepositoryNotFound(String),

    /// The `git` binary was not found on `$PATH`.
    #[error("git binary not found: {0}")]
    BinaryNotFound(String),

    /// A `git` command exited with a non-zero status.
    #[error("git {command} failed (exit {exit_code}): {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    /// Generic I/O wrapper.
    #[error("git I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue {
        field: String,
        detail: String,
    },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Scratch file errors
// ---------------------------------------------------------------------------

/// Errors from creating, writing or removing the temporary dispatch scripts.
#[derive(Debug, Error)]
pub enum ScratchError {
    /// The temporary file could not be created.
    #[error("failed to create {kind} script in '{dir}': {source}")]
    CreateFailed {
        kind: &'static str,
        dir: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing the script body failed.
    #[error("failed to write {kind} script: {source}")]
    WriteFailed {
        kind: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Removing the script after use failed.
    #[error("failed to remove {kind} script: {source}")]
    RemoveFailed {
        kind: &'static str,
        #[source]
        source: std::io::Error,
    },
}
