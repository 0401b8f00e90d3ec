//! Git access: the shortlog parser and the repository client.

pub mod client;
pub mod shortlog;

pub use client::{env_filter, GitCliClient, RepositoryClient};
pub use shortlog::parse_shortlog;
