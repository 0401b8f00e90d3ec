//! git-thanos core library.
//!
//! This crate provides the selection and redaction pipeline: parsing the
//! author summary, choosing the authors to redact, generating the lookup
//! scripts, and driving the full-history rewrite through a
//! [`RepositoryClient`].

pub mod cipher;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod git;
pub mod models;
pub mod pipeline;
pub mod scratch;
pub mod selection;

// Re-exports for convenience.
pub use config::ThanosConfig;
pub use git::{GitCliClient, RepositoryClient};
pub use models::{AuthorRecord, SnapReport};
pub use pipeline::SnapPipeline;
pub use selection::SelectionPolicy;
